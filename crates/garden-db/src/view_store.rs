//! Resumable view state persistence over `PostgreSQL`.
//!
//! Stores the current page or step of a paginated or cocoon-countdown
//! view, keyed by (owner, view key). Last-write-wins; there is no
//! history to keep here.

use garden_types::{OwnerId, ViewKey, ViewStateRecord};
use sqlx::PgPool;

use crate::error::DbError;
use crate::postgres::{owner_column, PostgresPool};
use crate::store::ViewStateStore;

/// `PostgreSQL`-backed [`ViewStateStore`].
#[derive(Clone)]
pub struct PgViewStateStore {
    pool: PgPool,
}

impl PgViewStateStore {
    /// Create a view state store over a connection pool.
    pub fn new(pool: &PostgresPool) -> Self {
        Self {
            pool: pool.pool().clone(),
        }
    }
}

impl ViewStateStore for PgViewStateStore {
    async fn load_view(&self, owner: OwnerId, key: &ViewKey) -> Result<Option<ViewStateRecord>, DbError> {
        let row: Option<(serde_json::Value,)> = sqlx::query_as(
            r"SELECT state FROM view_states WHERE owner_id = $1 AND view_key = $2",
        )
        .bind(owner_column(owner))
        .bind(key.to_string())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some((state,)) => Ok(Some(serde_json::from_value(state)?)),
            None => Ok(None),
        }
    }

    async fn save_view(
        &self,
        owner: OwnerId,
        key: &ViewKey,
        record: &ViewStateRecord,
    ) -> Result<(), DbError> {
        let state = serde_json::to_value(record)?;

        sqlx::query(
            r"INSERT INTO view_states (owner_id, view_key, state, updated_at)
              VALUES ($1, $2, $3, now())
              ON CONFLICT (owner_id, view_key) DO UPDATE SET
                state = EXCLUDED.state,
                updated_at = now()",
        )
        .bind(owner_column(owner))
        .bind(key.to_string())
        .bind(state)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear_view(&self, owner: OwnerId, key: &ViewKey) -> Result<(), DbError> {
        sqlx::query(r"DELETE FROM view_states WHERE owner_id = $1 AND view_key = $2")
            .bind(owner_column(owner))
            .bind(key.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
