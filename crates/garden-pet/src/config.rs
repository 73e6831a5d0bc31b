//! Tunables for the pet lifecycle.
//!
//! The defaults match the classic garden rules. The engine constructs
//! this from the YAML configuration at startup and passes it into the
//! resolver and lifecycle functions.

use serde::Deserialize;

/// Configuration for evolution thresholds and lifecycle timing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LifecycleConfig {
    /// Max stat-level at which Form 1 promotes to Form 2 (default: 5).
    #[serde(default = "defaults::form2_level")]
    pub form2_level: u8,

    /// Max stat-level at which Form 2 promotes to Form 3 (default: 20).
    #[serde(default = "defaults::form3_level")]
    pub form3_level: u8,

    /// Max stat-level at which Form 3 promotes to Form 4 (default: 60).
    #[serde(default = "defaults::form4_level")]
    pub form4_level: u8,

    /// Stat-level at Form 3 that triggers the evolving cocoon
    /// (default: 20).
    #[serde(default = "defaults::evolve_trigger_level")]
    pub evolve_trigger_level: u8,

    /// Stat-level at Form 4 that triggers the reincarnate/die fork
    /// (default: 99).
    #[serde(default = "defaults::finale_level")]
    pub finale_level: u8,

    /// Happiness must be strictly above this for the fork to choose
    /// reincarnation over death (default: 5). Ties die.
    #[serde(default = "defaults::happiness_rebirth_floor")]
    pub happiness_rebirth_floor: u8,

    /// Cocoon countdown length in seconds (default: 60).
    #[serde(default = "defaults::cocoon_secs")]
    pub cocoon_secs: i64,

    /// `dark_hero` value at or above which the pet is hero-aligned
    /// (default: 5).
    #[serde(default = "defaults::hero_threshold")]
    pub hero_threshold: i8,

    /// `dark_hero` value at or below which the pet is dark-aligned
    /// (default: -5).
    #[serde(default = "defaults::dark_threshold")]
    pub dark_threshold: i8,

    /// Absolute evolution-axis value that selects a shape suffix
    /// (default: 5).
    #[serde(default = "defaults::axis_extreme")]
    pub axis_extreme: i8,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            form2_level: defaults::form2_level(),
            form3_level: defaults::form3_level(),
            form4_level: defaults::form4_level(),
            evolve_trigger_level: defaults::evolve_trigger_level(),
            finale_level: defaults::finale_level(),
            happiness_rebirth_floor: defaults::happiness_rebirth_floor(),
            cocoon_secs: defaults::cocoon_secs(),
            hero_threshold: defaults::hero_threshold(),
            dark_threshold: defaults::dark_threshold(),
            axis_extreme: defaults::axis_extreme(),
        }
    }
}

mod defaults {
    pub(super) const fn form2_level() -> u8 {
        5
    }
    pub(super) const fn form3_level() -> u8 {
        20
    }
    pub(super) const fn form4_level() -> u8 {
        60
    }
    pub(super) const fn evolve_trigger_level() -> u8 {
        20
    }
    pub(super) const fn finale_level() -> u8 {
        99
    }
    pub(super) const fn happiness_rebirth_floor() -> u8 {
        5
    }
    pub(super) const fn cocoon_secs() -> i64 {
        60
    }
    pub(super) const fn hero_threshold() -> i8 {
        5
    }
    pub(super) const fn dark_threshold() -> i8 {
        -5
    }
    pub(super) const fn axis_extreme() -> i8 {
        5
    }
}
