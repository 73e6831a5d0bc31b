//! Error types for the persistence gateway.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] and serialization errors. Callers treat any variant as a
//! `PersistenceFailure`: no partial state survives a failed save, and
//! the decay scheduler catches these per pet rather than aborting a
//! pass.

/// Errors that can occur in the persistence gateway.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A snapshot payload failed to serialize or deserialize.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A generic store failure (used by test doubles and wrappers).
    #[error("Store failure: {0}")]
    Store(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
