//! Error types for the orchestration layer.
//!
//! [`KeeperError`] is the taxonomy the command surface reports from:
//! validation errors (unknown pet, not enough fruit, frozen pet) are
//! raised before any mutation; persistence failures surface as a
//! generic failure with no partial state behind them.

use garden_db::DbError;
use garden_inventory::InventoryError;
use garden_pet::PetError;

/// Errors that can occur in keeper and scheduler operations.
#[derive(Debug, thiserror::Error)]
pub enum KeeperError {
    /// A pet lifecycle validation failed (not found, dead, cocooned).
    #[error(transparent)]
    Pet(#[from] PetError),

    /// An inventory validation failed (not enough fruit, eggs, rings).
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// The persistence gateway failed; no partial state was written.
    #[error("persistence failure: {0}")]
    Persistence(#[from] DbError),
}
