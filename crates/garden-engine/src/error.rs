//! Error types for the garden-engine binary.

/// Errors that can occur during engine startup and shutdown.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration could not be loaded.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: garden_core::ConfigError,
    },

    /// The persistence gateway could not be reached or migrated.
    #[error("database error: {source}")]
    Db {
        /// The underlying database error.
        #[from]
        source: garden_db::DbError,
    },

    /// The scheduler task ended abnormally.
    #[error("scheduler task failed: {message}")]
    Scheduler {
        /// Description of the failure.
        message: String,
    },
}
