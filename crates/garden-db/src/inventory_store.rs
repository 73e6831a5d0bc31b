//! Inventory persistence over `PostgreSQL`.
//!
//! One JSONB row per (owner, day), same append-or-update shape as the
//! pet snapshot store. An owner with no rows yet simply has an empty
//! inventory.

use garden_types::{OwnerId, OwnerInventory};
use sqlx::PgPool;

use crate::error::DbError;
use crate::postgres::{owner_column, PostgresPool};
use crate::store::InventoryStore;

/// `PostgreSQL`-backed [`InventoryStore`].
#[derive(Clone)]
pub struct PgInventoryStore {
    pool: PgPool,
}

impl PgInventoryStore {
    /// Create an inventory store over a connection pool.
    pub fn new(pool: &PostgresPool) -> Self {
        Self {
            pool: pool.pool().clone(),
        }
    }
}

impl InventoryStore for PgInventoryStore {
    async fn load_inventory(&self, owner: OwnerId) -> Result<OwnerInventory, DbError> {
        let row: Option<(serde_json::Value,)> = sqlx::query_as(
            r"SELECT state
              FROM inventory_snapshots
              WHERE owner_id = $1
              ORDER BY snapshot_date DESC
              LIMIT 1",
        )
        .bind(owner_column(owner))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((state,)) => Ok(serde_json::from_value(state)?),
            None => Ok(OwnerInventory::default()),
        }
    }

    async fn save_inventory(&self, owner: OwnerId, inventory: &OwnerInventory) -> Result<(), DbError> {
        let state = serde_json::to_value(inventory)?;

        sqlx::query(
            r"INSERT INTO inventory_snapshots (owner_id, snapshot_date, state, updated_at)
              VALUES ($1, CURRENT_DATE, $2, now())
              ON CONFLICT (owner_id, snapshot_date) DO UPDATE SET
                state = EXCLUDED.state,
                updated_at = now()",
        )
        .bind(owner_column(owner))
        .bind(state)
        .execute(&self.pool)
        .await?;

        tracing::debug!(owner = %owner, "Saved inventory snapshot");
        Ok(())
    }
}
