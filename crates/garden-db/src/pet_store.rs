//! Pet snapshot persistence over `PostgreSQL`.
//!
//! One JSONB row per (owner, pet, day); a save upserts today's row and
//! a load returns the newest row. Old rows form the pet's history and
//! are never touched.

use chrono::{DateTime, Utc};
use garden_types::{OwnerId, PetSnapshot};
use sqlx::PgPool;

use crate::error::DbError;
use crate::postgres::{owner_column, PostgresPool};
use crate::store::PetStore;

/// `PostgreSQL`-backed [`PetStore`].
#[derive(Clone)]
pub struct PgPetStore {
    pool: PgPool,
}

impl PgPetStore {
    /// Create a pet store over a connection pool.
    pub fn new(pool: &PostgresPool) -> Self {
        Self {
            pool: pool.pool().clone(),
        }
    }

    /// Query the full dated history for one pet, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn history(
        &self,
        owner: OwnerId,
        name: &str,
        limit: i64,
    ) -> Result<Vec<PetSnapshotRow>, DbError> {
        let rows = sqlx::query_as::<_, PetSnapshotRow>(
            r"SELECT owner_id, pet_name, snapshot_date, state, updated_at
              FROM pet_snapshots
              WHERE owner_id = $1 AND pet_name = $2
              ORDER BY snapshot_date DESC
              LIMIT $3",
        )
        .bind(owner_column(owner))
        .bind(name)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

impl PetStore for PgPetStore {
    async fn load_pet(&self, owner: OwnerId, name: &str) -> Result<Option<PetSnapshot>, DbError> {
        let row: Option<(serde_json::Value,)> = sqlx::query_as(
            r"SELECT state
              FROM pet_snapshots
              WHERE owner_id = $1 AND pet_name = $2
              ORDER BY snapshot_date DESC
              LIMIT 1",
        )
        .bind(owner_column(owner))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((state,)) => Ok(Some(serde_json::from_value(state)?)),
            None => Ok(None),
        }
    }

    async fn save_pet(&self, owner: OwnerId, snapshot: &PetSnapshot) -> Result<(), DbError> {
        let state = serde_json::to_value(snapshot)?;

        // Upsert today's row; earlier days remain as history.
        sqlx::query(
            r"INSERT INTO pet_snapshots (owner_id, pet_name, snapshot_date, state, updated_at)
              VALUES ($1, $2, CURRENT_DATE, $3, now())
              ON CONFLICT (owner_id, pet_name, snapshot_date) DO UPDATE SET
                state = EXCLUDED.state,
                updated_at = now()",
        )
        .bind(owner_column(owner))
        .bind(&snapshot.name)
        .bind(state)
        .execute(&self.pool)
        .await?;

        tracing::debug!(owner = %owner, pet = %snapshot.name, "Saved pet snapshot");
        Ok(())
    }

    async fn list_pets(&self) -> Result<Vec<(OwnerId, String)>, DbError> {
        let rows: Vec<(i64, String)> = sqlx::query_as(
            r"SELECT DISTINCT owner_id, pet_name FROM pet_snapshots ORDER BY owner_id, pet_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(owner, name)| (OwnerId::new(u64::try_from(owner).unwrap_or(0)), name))
            .collect())
    }
}

/// A raw dated snapshot row, for history queries.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PetSnapshotRow {
    /// Owner snowflake as stored.
    pub owner_id: i64,
    /// Pet name.
    pub pet_name: String,
    /// The day this row covers.
    pub snapshot_date: chrono::NaiveDate,
    /// The serialized snapshot.
    pub state: serde_json::Value,
    /// When the row was last written.
    pub updated_at: DateTime<Utc>,
}
