//! Enumeration types for the Chao Garden lifecycle engine.
//!
//! Stats, grades, alignments, shapes, fruits, inventory items, cocoon
//! kinds, and forms. Grades decode leniently: an unrecognized stored
//! letter heals to the default grade rather than failing the record.

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Trainable stats
// ---------------------------------------------------------------------------

/// One of the five trainable stats a Chao levels up through feeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrainableStat {
    /// Swimming proficiency.
    Swim,
    /// Flying proficiency.
    Fly,
    /// Running proficiency.
    Run,
    /// Physical strength.
    Power,
    /// Endurance.
    Stamina,
}

impl TrainableStat {
    /// All trainable stats, in canonical display order.
    pub const ALL: [Self; 5] = [Self::Swim, Self::Fly, Self::Run, Self::Power, Self::Stamina];

    /// Lowercase stat name used in sprite keys and log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Swim => "swim",
            Self::Fly => "fly",
            Self::Run => "run",
            Self::Power => "power",
            Self::Stamina => "stamina",
        }
    }
}

impl core::fmt::Display for TrainableStat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Grades
// ---------------------------------------------------------------------------

/// Ordinal experience grade of a trainable stat, worst to best.
///
/// The grade determines how much experience a stat earns per level
/// gained. Stored as a single letter; an unrecognized letter decodes to
/// [`Grade::D`] (the self-healing default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    /// Worst grade (1 exp per level).
    F,
    /// Poor grade (2 exp per level).
    E,
    /// Default grade (3 exp per level).
    D,
    /// Average grade (4 exp per level).
    C,
    /// Good grade (5 exp per level).
    B,
    /// Great grade (6 exp per level).
    A,
    /// Excellent grade (7 exp per level).
    S,
    /// Top grade, reached only through evolution (8 exp per level).
    X,
}

impl Grade {
    /// Experience awarded per level gained at this grade.
    pub const fn exp_gain(self) -> u32 {
        match self {
            Self::F => 1,
            Self::E => 2,
            Self::D => 3,
            Self::C => 4,
            Self::B => 5,
            Self::A => 6,
            Self::S => 7,
            Self::X => 8,
        }
    }

    /// The next grade up, capped at [`Grade::X`].
    pub const fn promoted(self) -> Self {
        match self {
            Self::F => Self::E,
            Self::E => Self::D,
            Self::D => Self::C,
            Self::C => Self::B,
            Self::B => Self::A,
            Self::A => Self::S,
            Self::S | Self::X => Self::X,
        }
    }

    /// Parse a stored grade letter (case-insensitive).
    ///
    /// Returns `None` for anything that is not a known letter.
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter.trim().to_ascii_uppercase().as_str() {
            "F" => Some(Self::F),
            "E" => Some(Self::E),
            "D" => Some(Self::D),
            "C" => Some(Self::C),
            "B" => Some(Self::B),
            "A" => Some(Self::A),
            "S" => Some(Self::S),
            "X" => Some(Self::X),
            _ => None,
        }
    }

    /// The letter used when storing or displaying this grade.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::F => "F",
            Self::E => "E",
            Self::D => "D",
            Self::C => "C",
            Self::B => "B",
            Self::A => "A",
            Self::S => "S",
            Self::X => "X",
        }
    }
}

impl Default for Grade {
    fn default() -> Self {
        Self::D
    }
}

impl core::fmt::Display for Grade {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Lenient decode: a corrupt grade letter in a stored snapshot
        // heals to the default grade instead of failing the whole record.
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_letter(&raw).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Alignment
// ---------------------------------------------------------------------------

/// Hero/dark/neutral classification derived from the `dark_hero` axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// Hero-aligned (`dark_hero` at the positive extreme).
    Hero,
    /// Dark-aligned (`dark_hero` at the negative extreme).
    Dark,
    /// Neither extreme.
    Neutral,
}

impl Alignment {
    /// Lowercase token used in type strings and sprite keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Dark => "dark",
            Self::Neutral => "neutral",
        }
    }

    /// Parse a type-string token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "hero" => Some(Self::Hero),
            "dark" => Some(Self::Dark),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl core::fmt::Display for Alignment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// Shape specialization lineage derived from the evolution axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// No specialization.
    Normal,
    /// Swim lineage (`swim_fly` at the negative extreme).
    Swim,
    /// Fly lineage (`swim_fly` at the positive extreme).
    Fly,
    /// Run lineage (`run_power` at the negative extreme).
    Run,
    /// Power lineage (`run_power` at the positive extreme).
    Power,
}

impl Shape {
    /// Lowercase token used in type strings and sprite keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Swim => "swim",
            Self::Fly => "fly",
            Self::Run => "run",
            Self::Power => "power",
        }
    }

    /// Parse a type-string token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "normal" => Some(Self::Normal),
            "swim" => Some(Self::Swim),
            "fly" => Some(Self::Fly),
            "run" => Some(Self::Run),
            "power" => Some(Self::Power),
            _ => None,
        }
    }

    /// The trainable stat whose grade an evolution into this shape
    /// promotes. The normal shape promotes stamina.
    pub const fn trainable_stat(self) -> TrainableStat {
        match self {
            Self::Normal => TrainableStat::Stamina,
            Self::Swim => TrainableStat::Swim,
            Self::Fly => TrainableStat::Fly,
            Self::Run => TrainableStat::Run,
            Self::Power => TrainableStat::Power,
        }
    }
}

impl core::fmt::Display for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Vitals
// ---------------------------------------------------------------------------

/// One of the four vital gauges that decay over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VitalStat {
    /// Fullness; refilled by feeding.
    Belly,
    /// Mood; gates the reincarnate/die fork.
    Happiness,
    /// Stamina reserve.
    Energy,
    /// Hit points; reaching 0 leads to death.
    Hp,
}

impl VitalStat {
    /// All vitals, in canonical display order.
    pub const ALL: [Self; 4] = [Self::Belly, Self::Happiness, Self::Energy, Self::Hp];

    /// Lowercase vital name used in log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Belly => "belly",
            Self::Happiness => "happiness",
            Self::Energy => "energy",
            Self::Hp => "hp",
        }
    }
}

impl core::fmt::Display for VitalStat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Fruits and inventory items
// ---------------------------------------------------------------------------

/// A fruit a Chao can be fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Fruit {
    /// Balanced garden staple; fills the belly, trains nothing hard.
    Round,
    /// Raises the `dark_hero` axis toward hero.
    Hero,
    /// Lowers the `dark_hero` axis toward dark.
    Dark,
    /// Trains swimming and pulls `swim_fly` toward the swim extreme.
    Swim,
    /// Trains flying and pulls `swim_fly` toward the fly extreme.
    Fly,
    /// Trains running and pulls `run_power` toward the run extreme.
    Run,
    /// Trains strength and pulls `run_power` toward the power extreme.
    Power,
    /// Trains stamina; very filling.
    Tasty,
    /// Pure happiness boost.
    Heart,
    /// Rare all-rounder; trains every stat a little.
    Chao,
}

impl Fruit {
    /// All fruits, in canonical display order.
    pub const ALL: [Self; 10] = [
        Self::Round,
        Self::Hero,
        Self::Dark,
        Self::Swim,
        Self::Fly,
        Self::Run,
        Self::Power,
        Self::Tasty,
        Self::Heart,
        Self::Chao,
    ];

    /// Lowercase fruit name used in commands and log fields.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Round => "round",
            Self::Hero => "hero",
            Self::Dark => "dark",
            Self::Swim => "swim",
            Self::Fly => "fly",
            Self::Run => "run",
            Self::Power => "power",
            Self::Tasty => "tasty",
            Self::Heart => "heart",
            Self::Chao => "chao",
        }
    }
}

impl core::fmt::Display for Fruit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An item an owner can hold in inventory.
///
/// Kept as unit variants so the item map serializes as a plain JSON
/// object when a snapshot is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Item {
    /// A Chao egg, consumed on hatch and credited on reincarnation.
    ChaoEgg,
    /// A round fruit.
    RoundFruit,
    /// A hero fruit.
    HeroFruit,
    /// A dark fruit.
    DarkFruit,
    /// A swim fruit.
    SwimFruit,
    /// A fly fruit.
    FlyFruit,
    /// A run fruit.
    RunFruit,
    /// A power fruit.
    PowerFruit,
    /// A tasty fruit.
    TastyFruit,
    /// A heart fruit.
    HeartFruit,
    /// A chao fruit.
    ChaoFruit,
}

impl From<Fruit> for Item {
    fn from(fruit: Fruit) -> Self {
        match fruit {
            Fruit::Round => Self::RoundFruit,
            Fruit::Hero => Self::HeroFruit,
            Fruit::Dark => Self::DarkFruit,
            Fruit::Swim => Self::SwimFruit,
            Fruit::Fly => Self::FlyFruit,
            Fruit::Run => Self::RunFruit,
            Fruit::Power => Self::PowerFruit,
            Fruit::Tasty => Self::TastyFruit,
            Fruit::Heart => Self::HeartFruit,
            Fruit::Chao => Self::ChaoFruit,
        }
    }
}

// ---------------------------------------------------------------------------
// Cocoon kinds and forms
// ---------------------------------------------------------------------------

/// Which timed transition a cocoon is carrying out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CocoonKind {
    /// Shape evolution; completion promotes a stat grade.
    Evolving,
    /// Rebirth; completion resets the pet to a fresh egg state.
    Reincarnating,
    /// Terminal decline; completion marks the pet dead.
    Dying,
}

impl CocoonKind {
    /// Lowercase kind name used in log fields and messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Evolving => "evolving",
            Self::Reincarnating => "reincarnating",
            Self::Dying => "dying",
        }
    }
}

impl core::fmt::Display for CocoonKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Evolutionary stage of a pet, gating shape specialization.
///
/// Forms only ever advance during a lifetime; reincarnation resets a
/// pet back to [`Form::First`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Form {
    /// Child form.
    First,
    /// Adolescent form.
    Second,
    /// Adult form; alignment locks here.
    Third,
    /// Final form.
    Fourth,
}

impl Form {
    /// Numeric rank (1 through 4) used in type strings.
    pub const fn rank(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
            Self::Fourth => 4,
        }
    }

    /// Build a form from its numeric rank.
    pub const fn from_rank(rank: u8) -> Option<Self> {
        match rank {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            4 => Some(Self::Fourth),
            _ => None,
        }
    }

    /// The next form up, capped at [`Form::Fourth`].
    pub const fn promoted(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::Third,
            Self::Third | Self::Fourth => Self::Fourth,
        }
    }

    /// Whether alignment is locked at this form (Form 3 and up).
    pub const fn alignment_locked(self) -> bool {
        matches!(self, Self::Third | Self::Fourth)
    }
}

impl core::fmt::Display for Form {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_exp_table() {
        assert_eq!(Grade::F.exp_gain(), 1);
        assert_eq!(Grade::D.exp_gain(), 3);
        assert_eq!(Grade::X.exp_gain(), 8);
    }

    #[test]
    fn grade_promotion_caps_at_x() {
        assert_eq!(Grade::F.promoted(), Grade::E);
        assert_eq!(Grade::S.promoted(), Grade::X);
        assert_eq!(Grade::X.promoted(), Grade::X);
    }

    #[test]
    fn grade_parses_case_insensitive() {
        assert_eq!(Grade::from_letter("s"), Some(Grade::S));
        assert_eq!(Grade::from_letter(" B "), Some(Grade::B));
        assert_eq!(Grade::from_letter("??"), None);
    }

    #[test]
    fn corrupt_grade_heals_to_default() {
        let grade: Grade = serde_json::from_str("\"Z9\"").unwrap_or(Grade::F);
        assert_eq!(grade, Grade::D);
    }

    #[test]
    fn grade_serializes_as_letter() {
        let json = serde_json::to_string(&Grade::A).unwrap_or_default();
        assert_eq!(json, "\"A\"");
    }

    #[test]
    fn shape_maps_to_trainable_stat() {
        assert_eq!(Shape::Run.trainable_stat(), TrainableStat::Run);
        assert_eq!(Shape::Normal.trainable_stat(), TrainableStat::Stamina);
    }

    #[test]
    fn form_promotion_caps_at_fourth() {
        assert_eq!(Form::First.promoted(), Form::Second);
        assert_eq!(Form::Fourth.promoted(), Form::Fourth);
    }

    #[test]
    fn form_ranks_roundtrip() {
        for form in [Form::First, Form::Second, Form::Third, Form::Fourth] {
            assert_eq!(Form::from_rank(form.rank()), Some(form));
        }
        assert_eq!(Form::from_rank(0), None);
        assert_eq!(Form::from_rank(5), None);
    }

    #[test]
    fn alignment_lock_starts_at_third() {
        assert!(!Form::First.alignment_locked());
        assert!(!Form::Second.alignment_locked());
        assert!(Form::Third.alignment_locked());
        assert!(Form::Fourth.alignment_locked());
    }

    #[test]
    fn every_fruit_maps_to_an_item() {
        for fruit in Fruit::ALL {
            let _: Item = fruit.into();
        }
    }
}
