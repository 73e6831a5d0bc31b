//! Core entity structs for the Chao Garden lifecycle engine.
//!
//! Covers the pet snapshot (the unit of persistence), its trainable and
//! vital sub-records, the structured type string, owner inventories, and
//! resumable view state.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{Alignment, CocoonKind, Form, Grade, Item, Shape, TrainableStat, VitalStat};
use crate::ids::MarketSessionId;

/// Cap on a vital gauge's ticks.
pub const VITAL_CAP: u8 = 10;

/// Cap on a trainable stat's level.
pub const LEVEL_CAP: u8 = 99;

/// Ticks per level for trainable stats.
pub const TICKS_PER_LEVEL: u8 = 10;

// ---------------------------------------------------------------------------
// Lenient decoding
// ---------------------------------------------------------------------------

/// Serde helpers that heal corrupt stored fields instead of failing the
/// whole record.
pub mod lenient {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Decode an optional timestamp, treating anything unparseable as
    /// uninitialized (`None`).
    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw.and_then(|value| match value {
            serde_json::Value::String(text) => DateTime::parse_from_rfc3339(&text)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
            _ => None,
        }))
    }
}

// ---------------------------------------------------------------------------
// Structured type string
// ---------------------------------------------------------------------------

/// Error returned when a stored type string does not match any known
/// layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaoTypeParseError {
    /// The string that failed to parse.
    pub raw: String,
}

impl core::fmt::Display for ChaoTypeParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unrecognized chao type string: {:?}", self.raw)
    }
}

impl std::error::Error for ChaoTypeParseError {}

/// Structured form of the composite type string that drives sprite
/// selection.
///
/// The canonical string renderings by form are:
///
/// | Form | Layout                              |
/// |------|-------------------------------------|
/// | 1    | `{alignment}_normal_1`              |
/// | 2    | `{alignment}_normal_{suffix}_2`     |
/// | 3    | `{alignment}_{suffix}_3`            |
/// | 4    | `{alignment}_{prefix}_{suffix}_4`   |
///
/// The prefix only appears at Form 4, carried from the Form-3 suffix.
/// Keeping the pieces structured here eliminates stringly-typed access;
/// the string form exists only at the persistence and sprite boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChaoType {
    /// Alignment token; locked once the pet reaches Form 3.
    pub alignment: Alignment,
    /// Carried shape lineage prefix (meaningful at Form 4).
    pub prefix: Shape,
    /// Current shape suffix from the evolution axes.
    pub suffix: Shape,
    /// The form this type was resolved at.
    pub form: Form,
}

impl ChaoType {
    /// The type every freshly hatched pet starts with.
    pub const fn hatchling() -> Self {
        Self {
            alignment: Alignment::Neutral,
            prefix: Shape::Normal,
            suffix: Shape::Normal,
            form: Form::First,
        }
    }
}

impl Default for ChaoType {
    fn default() -> Self {
        Self::hatchling()
    }
}

impl core::fmt::Display for ChaoType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let alignment = self.alignment.as_str();
        match self.form {
            Form::First => write!(f, "{alignment}_normal_1"),
            Form::Second => write!(f, "{alignment}_normal_{}_2", self.suffix.as_str()),
            Form::Third => write!(f, "{alignment}_{}_3", self.suffix.as_str()),
            Form::Fourth => {
                write!(f, "{alignment}_{}_{}_4", self.prefix.as_str(), self.suffix.as_str())
            }
        }
    }
}

impl core::str::FromStr for ChaoType {
    type Err = ChaoTypeParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || ChaoTypeParseError { raw: raw.to_owned() };
        let tokens: Vec<&str> = raw.split('_').collect();
        match tokens.as_slice() {
            [alignment, "normal", "1"] => Ok(Self {
                alignment: Alignment::from_token(alignment).ok_or_else(err)?,
                prefix: Shape::Normal,
                suffix: Shape::Normal,
                form: Form::First,
            }),
            [alignment, "normal", suffix, "2"] => Ok(Self {
                alignment: Alignment::from_token(alignment).ok_or_else(err)?,
                prefix: Shape::Normal,
                suffix: Shape::from_token(suffix).ok_or_else(err)?,
                form: Form::Second,
            }),
            [alignment, suffix, "3"] => Ok(Self {
                alignment: Alignment::from_token(alignment).ok_or_else(err)?,
                prefix: Shape::Normal,
                suffix: Shape::from_token(suffix).ok_or_else(err)?,
                form: Form::Third,
            }),
            [alignment, prefix, suffix, "4"] => Ok(Self {
                alignment: Alignment::from_token(alignment).ok_or_else(err)?,
                prefix: Shape::from_token(prefix).ok_or_else(err)?,
                suffix: Shape::from_token(suffix).ok_or_else(err)?,
                form: Form::Fourth,
            }),
            _ => Err(err()),
        }
    }
}

impl Serialize for ChaoType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ChaoType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Lenient decode: a corrupt type string heals to the hatchling
        // type; the resolver rebuilds the real one on the next update.
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Trainable tracks and vital gauges
// ---------------------------------------------------------------------------

/// Progress record for a single trainable stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainableTrack {
    /// Sub-level progress (0--9); ten ticks roll into one level.
    pub ticks: u8,
    /// Current level (0--99).
    pub level: u8,
    /// Accumulated experience.
    pub exp: u32,
    /// Experience grade.
    pub grade: Grade,
}

impl TrainableTrack {
    /// A zeroed track at the given grade.
    pub const fn new(grade: Grade) -> Self {
        Self {
            ticks: 0,
            level: 0,
            exp: 0,
            grade,
        }
    }

    /// Reset progress to zero while keeping the grade (reincarnation).
    pub const fn reset_progress(&mut self) {
        self.ticks = 0;
        self.level = 0;
        self.exp = 0;
    }
}

impl Default for TrainableTrack {
    fn default() -> Self {
        Self::new(Grade::D)
    }
}

/// State of a single vital gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VitalGauge {
    /// Current ticks (0--10).
    pub ticks: u8,
    /// When this gauge last decayed; `None` until the first scheduler
    /// pass initializes it. Corrupt stored values decode to `None`.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_decay: Option<DateTime<Utc>>,
}

impl VitalGauge {
    /// A full gauge with no decay history.
    pub const fn full() -> Self {
        Self {
            ticks: VITAL_CAP,
            last_decay: None,
        }
    }

    /// Whether the gauge is fully depleted.
    pub const fn is_depleted(self) -> bool {
        self.ticks == 0
    }
}

// ---------------------------------------------------------------------------
// Cocoon
// ---------------------------------------------------------------------------

/// A pending timed transition. At most one exists per pet at a time;
/// the `Option<Cocoon>` on the snapshot enforces the mutual exclusion
/// by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cocoon {
    /// Which transition the cocoon is carrying out.
    pub kind: CocoonKind,
    /// When the countdown ends and the effect applies.
    pub ends_at: DateTime<Utc>,
}

impl Cocoon {
    /// Whole seconds remaining until the cocoon opens (0 if due).
    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        let remaining = self.ends_at.signed_duration_since(now).num_seconds();
        remaining.max(0)
    }

    /// Whether the countdown has elapsed.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at
    }
}

// ---------------------------------------------------------------------------
// Pet snapshot
// ---------------------------------------------------------------------------

/// Full state of one pet: the unit read from and written to the
/// persistence gateway. One dated row per day; the latest row is the
/// current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetSnapshot {
    /// Pet name, unique per owner.
    pub name: String,
    /// When this lifetime began (reset on reincarnation).
    pub born_at: DateTime<Utc>,
    /// When the pet was last fed; drives the belly catch-up rule.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub last_fed_at: Option<DateTime<Utc>>,
    /// Whether the egg has hatched.
    pub hatched: bool,
    /// Whether the pet has gone through a shape evolution this lifetime.
    pub evolved: bool,
    /// Whether the pet is dead. Dead pets are frozen except display.
    pub dead: bool,
    /// How many times this pet has reincarnated.
    pub reincarnations: u32,
    /// How many lineages of this pet have died.
    pub deaths: u32,
    /// When the pet died, if it has.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub date_of_death: Option<DateTime<Utc>>,

    /// Swimming track.
    pub swim: TrainableTrack,
    /// Flying track.
    pub fly: TrainableTrack,
    /// Running track.
    pub run: TrainableTrack,
    /// Strength track.
    pub power: TrainableTrack,
    /// Endurance track.
    pub stamina: TrainableTrack,

    /// Fullness gauge.
    pub belly: VitalGauge,
    /// Mood gauge.
    pub happiness: VitalGauge,
    /// Stamina reserve gauge.
    pub energy: VitalGauge,
    /// Hit point gauge.
    pub hp: VitalGauge,

    /// Alignment axis (-5 dark .. +5 hero).
    pub dark_hero: i8,
    /// Run/power evolution axis (-5 run .. +5 power).
    pub run_power: i8,
    /// Swim/fly evolution axis (-5 swim .. +5 fly).
    pub swim_fly: i8,

    /// Resolved composite type driving sprite selection.
    pub chao_type: ChaoType,
    /// Eyes sprite key (admin-overridable).
    pub eyes: String,
    /// Mouth sprite key (admin-overridable).
    pub mouth: String,

    /// Pending timed transition, if any.
    pub cocoon: Option<Cocoon>,
}

impl PetSnapshot {
    /// Build the snapshot of a freshly hatched pet.
    ///
    /// Trainables start at zero with the supplied grades; vitals start
    /// full; axes are centered; the type is the neutral hatchling.
    pub fn fresh(name: String, grades: [Grade; 5], born_at: DateTime<Utc>) -> Self {
        let [swim, fly, run, power, stamina] = grades;
        Self {
            name,
            born_at,
            last_fed_at: None,
            hatched: true,
            evolved: false,
            dead: false,
            reincarnations: 0,
            deaths: 0,
            date_of_death: None,
            swim: TrainableTrack::new(swim),
            fly: TrainableTrack::new(fly),
            run: TrainableTrack::new(run),
            power: TrainableTrack::new(power),
            stamina: TrainableTrack::new(stamina),
            belly: VitalGauge::full(),
            happiness: VitalGauge::full(),
            energy: VitalGauge::full(),
            hp: VitalGauge::full(),
            dark_hero: 0,
            run_power: 0,
            swim_fly: 0,
            chao_type: ChaoType::hatchling(),
            eyes: String::from("eyes_normal"),
            mouth: String::from("mouth_normal"),
            cocoon: None,
        }
    }

    /// Borrow the track for a trainable stat.
    pub const fn track(&self, stat: TrainableStat) -> &TrainableTrack {
        match stat {
            TrainableStat::Swim => &self.swim,
            TrainableStat::Fly => &self.fly,
            TrainableStat::Run => &self.run,
            TrainableStat::Power => &self.power,
            TrainableStat::Stamina => &self.stamina,
        }
    }

    /// Mutably borrow the track for a trainable stat.
    pub const fn track_mut(&mut self, stat: TrainableStat) -> &mut TrainableTrack {
        match stat {
            TrainableStat::Swim => &mut self.swim,
            TrainableStat::Fly => &mut self.fly,
            TrainableStat::Run => &mut self.run,
            TrainableStat::Power => &mut self.power,
            TrainableStat::Stamina => &mut self.stamina,
        }
    }

    /// Borrow the gauge for a vital stat.
    pub const fn gauge(&self, vital: VitalStat) -> &VitalGauge {
        match vital {
            VitalStat::Belly => &self.belly,
            VitalStat::Happiness => &self.happiness,
            VitalStat::Energy => &self.energy,
            VitalStat::Hp => &self.hp,
        }
    }

    /// Mutably borrow the gauge for a vital stat.
    pub const fn gauge_mut(&mut self, vital: VitalStat) -> &mut VitalGauge {
        match vital {
            VitalStat::Belly => &mut self.belly,
            VitalStat::Happiness => &mut self.happiness,
            VitalStat::Energy => &mut self.energy,
            VitalStat::Hp => &mut self.hp,
        }
    }

    /// The current form (from the resolved type).
    pub const fn form(&self) -> Form {
        self.chao_type.form
    }

    /// The current alignment label (from the resolved type).
    pub const fn alignment(&self) -> Alignment {
        self.chao_type.alignment
    }

    /// The highest level among the five trainable tracks.
    pub fn max_level(&self) -> u8 {
        TrainableStat::ALL
            .iter()
            .map(|&stat| self.track(stat).level)
            .max()
            .unwrap_or(0)
    }

    /// Whether any interaction other than observation is allowed.
    ///
    /// Dead and cocooned pets are frozen.
    pub const fn is_interactive(&self) -> bool {
        self.hatched && !self.dead && self.cocoon.is_none()
    }
}

// ---------------------------------------------------------------------------
// Owner inventory
// ---------------------------------------------------------------------------

/// An owner's ring balance and item counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OwnerInventory {
    /// Ring balance.
    pub rings: u64,
    /// Held item counts. Items at zero are removed from the map.
    pub items: BTreeMap<Item, u64>,
}

impl OwnerInventory {
    /// How many of an item the owner holds.
    pub fn count(&self, item: Item) -> u64 {
        self.items.get(&item).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Key for a resumable view: a pet's cocoon-countdown view or a market
/// browsing session's pagination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViewKey {
    /// A per-pet view, keyed by pet name.
    Pet(String),
    /// A market browsing session.
    MarketSession(MarketSessionId),
}

impl core::fmt::Display for ViewKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Pet(name) => write!(f, "pet:{name}"),
            Self::MarketSession(id) => write!(f, "market:{id}"),
        }
    }
}

/// The persisted step of a resumable view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewStateRecord {
    /// Opaque view payload (current page or step).
    pub payload: serde_json::Value,
    /// When the view state was last written.
    pub updated_at: DateTime<Utc>,
}
