//! Error types for the garden-inventory crate.

use garden_types::Item;

/// Errors that can occur during inventory operations.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// Attempted to remove more of an item than the owner holds.
    #[error("insufficient {item:?}: wanted {requested} but only have {available}")]
    InsufficientItem {
        /// The item being removed.
        item: Item,
        /// The quantity the caller attempted to remove.
        requested: u64,
        /// The quantity the owner actually holds.
        available: u64,
    },

    /// Attempted to spend more rings than the owner holds.
    #[error("insufficient rings: wanted {requested} but only have {available}")]
    InsufficientRings {
        /// The amount the caller attempted to spend.
        requested: u64,
        /// The owner's ring balance.
        available: u64,
    },

    /// An item count or ring balance would overflow.
    #[error("inventory overflow: {context}")]
    Overflow {
        /// Description of what was being adjusted.
        context: String,
    },
}
