//! Owner notification trait for decay alerts.
//!
//! The chat-platform layer implements this to DM owners when a pet's
//! HP crosses a critical threshold. The scheduler only reports strict
//! downward crossings, once each, after the decayed snapshot has been
//! persisted.

use std::sync::Mutex;

use garden_types::OwnerId;
use tracing::info;

/// Sink for decay alerts.
pub trait DecayNotifier: Send + Sync {
    /// A pet's HP strictly crossed `threshold` downward and now sits at
    /// `hp`.
    fn hp_threshold_crossed(&self, owner: OwnerId, pet: &str, threshold: u8, hp: u8);
}

/// A notifier that only logs, for headless runs and development.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    /// Create a new tracing notifier.
    pub const fn new() -> Self {
        Self
    }
}

impl DecayNotifier for TracingNotifier {
    fn hp_threshold_crossed(&self, owner: OwnerId, pet: &str, threshold: u8, hp: u8) {
        info!(owner = %owner, pet, threshold, hp, "HP threshold crossed");
    }
}

/// A notifier that records every alert, for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<(OwnerId, String, u8, u8)>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All alerts recorded so far, in order.
    pub fn alerts(&self) -> Vec<(OwnerId, String, u8, u8)> {
        self.alerts.lock().map(|alerts| alerts.clone()).unwrap_or_default()
    }
}

impl DecayNotifier for RecordingNotifier {
    fn hp_threshold_crossed(&self, owner: OwnerId, pet: &str, threshold: u8, hp: u8) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push((owner, pet.to_owned(), threshold, hp));
        }
    }
}
