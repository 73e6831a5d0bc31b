//! Persistence gateway for the Chao Garden lifecycle engine.
//!
//! `PostgreSQL` holds dated snapshot rows for pets and inventories
//! (append-or-update per day, latest row = current state, history never
//! deleted) plus last-write-wins view state for resumable views.
//!
//! The gateway traits in [`store`] are the only way the rest of the
//! workspace reads or writes records; nothing above this crate caches
//! current stats between calls.
//!
//! # Modules
//!
//! - [`store`] -- The gateway traits (`PetStore`, `InventoryStore`,
//!   `ViewStateStore`)
//! - [`postgres`] -- Connection pool, configuration, migrations
//! - [`pet_store`] -- Dated pet snapshot rows
//! - [`inventory_store`] -- Dated inventory rows
//! - [`view_store`] -- Resumable view state
//! - [`memory`] -- In-memory implementation for tests
//! - [`error`] -- Shared error types

pub mod error;
pub mod inventory_store;
pub mod memory;
pub mod pet_store;
pub mod postgres;
pub mod store;
pub mod view_store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use inventory_store::PgInventoryStore;
pub use memory::MemoryStore;
pub use pet_store::{PetSnapshotRow, PgPetStore};
pub use postgres::{PostgresConfig, PostgresPool};
pub use store::{InventoryStore, PetStore, ViewStateStore};
pub use view_store::PgViewStateStore;
