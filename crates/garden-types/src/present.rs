//! Presentation Adapter request payloads.
//!
//! The core never touches pixels. It hands the adapter symbolic sprite
//! keys and tick coordinates; compositing, and the placeholder fallback
//! for missing sprite assets, happen on the adapter's side.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::TrainableStat;

/// Inputs for rendering a pet portrait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortraitRequest {
    /// Background sprite key.
    pub background: String,
    /// Body sprite key (the canonical type string).
    pub body: String,
    /// Eyes sprite key.
    pub eyes: String,
    /// Mouth sprite key.
    pub mouth: String,
}

/// Inputs for rendering a stat sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatSheetRequest {
    /// Tick bar position per trainable stat (0--9).
    pub tick_positions: BTreeMap<TrainableStat, u8>,
    /// Level per trainable stat (0--99).
    pub levels: BTreeMap<TrainableStat, u8>,
    /// Accumulated experience per trainable stat.
    pub exp: BTreeMap<TrainableStat, u32>,
}
