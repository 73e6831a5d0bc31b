//! Error types for the garden-pet crate.
//!
//! Validation errors are detected before any mutation and carry enough
//! context for the command surface to explain the rejection (remaining
//! cocoon time, death date).

use chrono::{DateTime, Utc};
use garden_types::{CocoonKind, OwnerId};

/// Errors that can occur during pet lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum PetError {
    /// No pet with this name exists for the owner.
    #[error("pet not found: {owner}/{name}")]
    PetNotFound {
        /// The owner that was queried.
        owner: OwnerId,
        /// The pet name that was queried.
        name: String,
    },

    /// The pet record exists but the egg has not been hatched.
    #[error("{name} is still an egg; hatch it first")]
    NotHatched {
        /// The pet name.
        name: String,
    },

    /// Attempted to hatch a pet that is already hatched and alive.
    #[error("{name} has already hatched")]
    AlreadyHatched {
        /// The pet name.
        name: String,
    },

    /// The pet is inside a cocoon; only observation is allowed.
    #[error("{name} is still in its {kind} cocoon, {remaining_secs} seconds remaining")]
    InCocoon {
        /// The pet name.
        name: String,
        /// Which transition the cocoon is carrying out.
        kind: CocoonKind,
        /// Whole seconds until the cocoon opens.
        remaining_secs: i64,
    },

    /// The pet is dead; its record is frozen except for display.
    #[error("{name} has passed away")]
    Dead {
        /// The pet name.
        name: String,
        /// When the pet died, if recorded.
        date_of_death: Option<DateTime<Utc>>,
    },

    /// A feed was requested with a zero quantity.
    #[error("cannot feed zero fruit to {name}")]
    ZeroQuantity {
        /// The pet name.
        name: String,
    },
}
