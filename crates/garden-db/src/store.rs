//! Persistence gateway traits.
//!
//! The gateway is the sole arbiter of record reads and writes: no layer
//! above it holds current stats in memory across calls. Every operation
//! re-reads the latest snapshot and every save is all-or-nothing.
//!
//! Implementations: the [`crate::postgres::PostgresPool`]-backed stores
//! for production and [`crate::memory::MemoryStore`] (which implements
//! all three traits) for tests.

use garden_types::{OwnerId, OwnerInventory, PetSnapshot, ViewKey, ViewStateRecord};

use crate::error::DbError;

/// Append-only versioned pet snapshot store.
///
/// Each save appends or updates a dated row; a load returns the latest
/// row. History is never destroyed.
pub trait PetStore: Send + Sync {
    /// Load the latest snapshot for a pet, or `None` if the pet has
    /// never been saved.
    fn load_pet(
        &self,
        owner: OwnerId,
        name: &str,
    ) -> impl Future<Output = Result<Option<PetSnapshot>, DbError>> + Send;

    /// Append or update today's dated snapshot row for a pet.
    fn save_pet(
        &self,
        owner: OwnerId,
        snapshot: &PetSnapshot,
    ) -> impl Future<Output = Result<(), DbError>> + Send;

    /// List every stored pet across all owners, as (owner, name) pairs.
    fn list_pets(&self) -> impl Future<Output = Result<Vec<(OwnerId, String)>, DbError>> + Send;
}

/// Append-only versioned inventory store, one record per owner.
pub trait InventoryStore: Send + Sync {
    /// Load the latest inventory for an owner. An owner with no record
    /// has an empty inventory.
    fn load_inventory(
        &self,
        owner: OwnerId,
    ) -> impl Future<Output = Result<OwnerInventory, DbError>> + Send;

    /// Append or update today's dated inventory row for an owner.
    fn save_inventory(
        &self,
        owner: OwnerId,
        inventory: &OwnerInventory,
    ) -> impl Future<Output = Result<(), DbError>> + Send;
}

/// Small keyed store for resumable view state (cocoon countdowns,
/// market pagination). Unlike the snapshot stores this is
/// last-write-wins: only the current step matters after a restart.
pub trait ViewStateStore: Send + Sync {
    /// Load the stored view state for a key, if any.
    fn load_view(
        &self,
        owner: OwnerId,
        key: &ViewKey,
    ) -> impl Future<Output = Result<Option<ViewStateRecord>, DbError>> + Send;

    /// Store the current view state for a key.
    fn save_view(
        &self,
        owner: OwnerId,
        key: &ViewKey,
        record: &ViewStateRecord,
    ) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Remove the stored view state for a key.
    fn clear_view(
        &self,
        owner: OwnerId,
        key: &ViewKey,
    ) -> impl Future<Output = Result<(), DbError>> + Send;
}
