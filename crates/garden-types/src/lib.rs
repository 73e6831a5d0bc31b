//! Shared type definitions for the Chao Garden lifecycle engine.
//!
//! This crate is the single source of truth for the types used across
//! the workspace. Snapshots serialize to JSON at the persistence
//! boundary; corrupt stored grades, type strings, and timestamps decode
//! leniently to safe defaults instead of failing whole records.
//!
//! # Modules
//!
//! - [`ids`] -- Strongly-typed identifier wrappers
//! - [`enums`] -- Stats, grades, alignments, shapes, fruits, items
//! - [`structs`] -- Pet snapshot, inventory, cocoon, and view state
//! - [`present`] -- Presentation Adapter request payloads

pub mod enums;
pub mod ids;
pub mod present;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Alignment, CocoonKind, Form, Fruit, Grade, Item, Shape, TrainableStat, VitalStat};
pub use ids::{MarketSessionId, OwnerId};
pub use present::{PortraitRequest, StatSheetRequest};
pub use structs::{
    ChaoType, ChaoTypeParseError, Cocoon, OwnerInventory, PetSnapshot, TrainableTrack, ViewKey,
    ViewStateRecord, VitalGauge, LEVEL_CAP, TICKS_PER_LEVEL, VITAL_CAP,
};
