//! Lifecycle transitions: hatching, feeding, the cocoon ladder, and the
//! reincarnate/die fork.
//!
//! Everything here mutates a working copy of a [`PetSnapshot`] and never
//! touches persistence; the orchestration layer loads the latest
//! snapshot, applies these transitions, and writes the result in one
//! all-or-nothing save. Ordering inside a feed is strict: stat mutation,
//! then evolution resolution, then (after the caller persists) the
//! post-condition check.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use garden_types::{
    ChaoType, Cocoon, CocoonKind, Form, Fruit, Grade, PetSnapshot, TrainableStat,
};
use rand::Rng;
use tracing::debug;

use crate::config::LifecycleConfig;
use crate::error::PetError;
use crate::evolution::{self, ResolveInput};
use crate::fruit::FruitEffects;
use crate::stats;

/// Grades a fresh egg can roll. The top grade is reserved for evolution
/// promotion.
const HATCH_GRADES: [Grade; 7] =
    [Grade::F, Grade::E, Grade::D, Grade::C, Grade::B, Grade::A, Grade::S];

/// Roll the five starting grades for a new egg.
pub fn roll_grades<R: Rng + ?Sized>(rng: &mut R) -> [Grade; 5] {
    let mut roll = || {
        let pick: usize = rng.random_range(0..HATCH_GRADES.len());
        HATCH_GRADES.get(pick).copied().unwrap_or_default()
    };
    [roll(), roll(), roll(), roll(), roll()]
}

/// Build the snapshot of a newly hatched pet with rolled grades.
pub fn hatch_new<R: Rng + ?Sized>(name: String, now: DateTime<Utc>, rng: &mut R) -> PetSnapshot {
    PetSnapshot::fresh(name, roll_grades(rng), now)
}

/// Re-hatch a reincarnated egg under the same name.
///
/// Grades and lifetime counters carry over from the previous lineage;
/// vitals refill and the birth date resets.
pub fn rehatch(pet: &mut PetSnapshot, now: DateTime<Utc>) {
    pet.hatched = true;
    pet.born_at = now;
    pet.last_fed_at = None;
    pet.belly.ticks = garden_types::VITAL_CAP;
    pet.happiness.ticks = garden_types::VITAL_CAP;
    pet.energy.ticks = garden_types::VITAL_CAP;
    pet.hp.ticks = garden_types::VITAL_CAP;
}

/// Reject any interaction with an unhatched, dead, or cocooned pet.
///
/// Called before any mutation; the errors carry the context the command
/// surface needs (remaining cocoon seconds, death date).
pub fn ensure_interactive(pet: &PetSnapshot, now: DateTime<Utc>) -> Result<(), PetError> {
    if !pet.hatched {
        return Err(PetError::NotHatched {
            name: pet.name.clone(),
        });
    }
    if pet.dead {
        return Err(PetError::Dead {
            name: pet.name.clone(),
            date_of_death: pet.date_of_death,
        });
    }
    if let Some(cocoon) = pet.cocoon {
        return Err(PetError::InCocoon {
            name: pet.name.clone(),
            kind: cocoon.kind,
            remaining_secs: cocoon.remaining_secs(now),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Feeding
// ---------------------------------------------------------------------------

/// What one feed did to the pet, for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedReport {
    /// Levels gained per trainable stat (absent = none).
    pub levels_gained: BTreeMap<TrainableStat, u8>,
    /// Total experience awarded across all stats.
    pub exp_gained: u32,
    /// Belly after the feed.
    pub belly: u8,
    /// The resolved type after the feed.
    pub chao_type: ChaoType,
    /// Whether the resolved type differs from before the feed.
    pub type_changed: bool,
    /// The cocoon the feed's post-conditions entered, if any. Filled by
    /// the orchestration layer after the post-condition check.
    pub cocoon: Option<Cocoon>,
}

/// Apply a feed to a working snapshot: belly catch-up, stat ticks,
/// vital fills, axis shifts with coupling, and one resolver call.
///
/// The caller has already validated interactivity and consumed the
/// fruit from the owner's inventory. Post-conditions are checked
/// separately, after the caller persists this mutation.
pub fn apply_feed(
    pet: &mut PetSnapshot,
    fruit: Fruit,
    qty: u32,
    now: DateTime<Utc>,
    config: &LifecycleConfig,
) -> Result<FeedReport, PetError> {
    if qty == 0 {
        return Err(PetError::ZeroQuantity {
            name: pet.name.clone(),
        });
    }

    let type_before = pet.chao_type;
    let effects = FruitEffects::of(fruit);

    // Whole days since the last feed drain the belly before the fruit
    // refills it.
    let hungry_days = pet
        .last_fed_at
        .map_or(0, |last| now.signed_duration_since(last).num_days().clamp(0, 255));
    let hungry_days = u8::try_from(hungry_days).unwrap_or(u8::MAX);
    pet.belly.ticks = stats::vital_drop(pet.belly.ticks, hungry_days);

    // Trainable ticks: one rollover pass per stat handles any number of
    // level-ups from qty fruit at once.
    let mut levels_gained = BTreeMap::new();
    let mut exp_gained: u32 = 0;
    for stat in TrainableStat::ALL {
        let per_fruit = u32::from(effects.tick_gain(stat));
        if per_fruit == 0 {
            continue;
        }
        let gain = stats::train(pet.track_mut(stat), per_fruit.saturating_mul(qty));
        if gain.levels_gained > 0 {
            levels_gained.insert(stat, gain.levels_gained);
        }
        exp_gained = exp_gained.saturating_add(gain.exp_gain);
    }

    // Vital fills saturate at the cap however much fruit was eaten.
    let fill = |delta: u8| u8::try_from(u32::from(delta).saturating_mul(qty).min(255)).unwrap_or(u8::MAX);
    pet.belly.ticks = stats::vital_gain(pet.belly.ticks, fill(effects.belly));
    pet.happiness.ticks = stats::vital_gain(pet.happiness.ticks, fill(effects.happiness));
    pet.energy.ticks = stats::vital_gain(pet.energy.ticks, fill(effects.energy));
    pet.hp.ticks = stats::vital_gain(pet.hp.ticks, fill(effects.hp));

    // Axis shifts apply per fruit so the coupling rule (the sibling
    // evolution axis steps toward zero) engages on every piece.
    for _ in 0..qty {
        pet.dark_hero = stats::clamp_axis(pet.dark_hero, effects.dark_hero);
        if effects.run_power != 0 {
            pet.run_power = stats::clamp_axis(pet.run_power, effects.run_power);
            pet.swim_fly = stats::step_toward_zero(pet.swim_fly);
        }
        if effects.swim_fly != 0 {
            pet.swim_fly = stats::clamp_axis(pet.swim_fly, effects.swim_fly);
            pet.run_power = stats::step_toward_zero(pet.run_power);
        }
    }

    pet.last_fed_at = Some(now);
    pet.chao_type = evolution::resolve(ResolveInput::from_snapshot(pet), config);

    Ok(FeedReport {
        levels_gained,
        exp_gained,
        belly: pet.belly.ticks,
        chao_type: pet.chao_type,
        type_changed: pet.chao_type != type_before,
        cocoon: None,
    })
}

// ---------------------------------------------------------------------------
// Post-conditions and the reincarnate/die fork
// ---------------------------------------------------------------------------

/// The happiness-based fork between rebirth and death.
///
/// Both the feed path and the admin force-check path call this exact
/// function so the boundary cannot drift between call sites: strictly
/// above the floor reincarnates, at or below it dies.
pub const fn exhaustion_fork(pet: &PetSnapshot, config: &LifecycleConfig) -> CocoonKind {
    if pet.happiness.ticks > config.happiness_rebirth_floor {
        CocoonKind::Reincarnating
    } else {
        CocoonKind::Dying
    }
}

/// Evaluate the post-feed transition ladder. At most one fires, in
/// priority order:
///
/// 1. Form 3, not yet evolved, any stat-level at the evolve trigger:
///    the evolving cocoon.
/// 2. Form 4 with a stat at the finale level: the reincarnate/die fork.
///
/// Returns the cocoon to enter, or `None`.
pub fn check_post_conditions(pet: &PetSnapshot, config: &LifecycleConfig) -> Option<CocoonKind> {
    if pet.cocoon.is_some() || pet.dead {
        return None;
    }
    let max_level = pet.max_level();
    if pet.form() == Form::Third && !pet.evolved && max_level >= config.evolve_trigger_level {
        return Some(CocoonKind::Evolving);
    }
    if pet.form() == Form::Fourth && max_level >= config.finale_level {
        return Some(exhaustion_fork(pet, config));
    }
    None
}

/// Evaluate the HP exhaustion path used by the decay scheduler: a pet
/// whose HP gauge has emptied heads into the same fork.
pub fn check_hp_exhaustion(pet: &PetSnapshot, config: &LifecycleConfig) -> Option<CocoonKind> {
    if pet.cocoon.is_some() || pet.dead || !pet.hatched {
        return None;
    }
    if pet.hp.is_depleted() {
        return Some(exhaustion_fork(pet, config));
    }
    None
}

/// Enter a cocoon, starting its countdown.
///
/// Mutual exclusion: a pet already inside a cocoon is left untouched
/// and `false` is returned.
pub fn enter_cocoon(
    pet: &mut PetSnapshot,
    kind: CocoonKind,
    now: DateTime<Utc>,
    config: &LifecycleConfig,
) -> bool {
    if pet.cocoon.is_some() {
        return false;
    }
    let ends_at = now
        .checked_add_signed(Duration::seconds(config.cocoon_secs))
        .unwrap_or(now);
    pet.cocoon = Some(Cocoon { kind, ends_at });
    debug!(pet = %pet.name, kind = %kind, cocoon_secs = config.cocoon_secs, "Cocoon entered");
    true
}

// ---------------------------------------------------------------------------
// Cocoon completion
// ---------------------------------------------------------------------------

/// What opening a cocoon did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CocoonOutcome {
    /// A shape evolution completed; one stat grade promoted.
    Evolved {
        /// The stat whose grade was promoted.
        stat: TrainableStat,
        /// The grade after promotion.
        grade: Grade,
    },
    /// The pet reincarnated into a fresh egg; the caller credits one
    /// Chao egg to the owner.
    Reincarnated,
    /// The pet died. Terminal.
    Died,
}

/// Open a due cocoon and apply its effect to the working snapshot.
///
/// Returns `None` while no cocoon is pending or the countdown has not
/// elapsed. The caller persists the mutated snapshot and, for
/// [`CocoonOutcome::Reincarnated`], credits the egg.
pub fn complete_cocoon(
    pet: &mut PetSnapshot,
    now: DateTime<Utc>,
    config: &LifecycleConfig,
) -> Option<CocoonOutcome> {
    let cocoon = pet.cocoon?;
    if !cocoon.is_due(now) {
        return None;
    }
    pet.cocoon = None;

    let outcome = match cocoon.kind {
        CocoonKind::Evolving => {
            let stat = pet.chao_type.suffix.trainable_stat();
            let track = pet.track_mut(stat);
            track.grade = track.grade.promoted();
            let grade = track.grade;
            pet.evolved = true;
            pet.chao_type = evolution::resolve(ResolveInput::from_snapshot(pet), config);
            CocoonOutcome::Evolved { stat, grade }
        }
        CocoonKind::Reincarnating => {
            pet.reincarnations = pet.reincarnations.saturating_add(1);
            pet.hatched = false;
            pet.evolved = false;
            for stat in TrainableStat::ALL {
                pet.track_mut(stat).reset_progress();
            }
            pet.happiness.ticks = garden_types::VITAL_CAP;
            pet.born_at = now;
            pet.last_fed_at = None;
            // A new lineage: the alignment lock releases and the type
            // re-resolves from the axes at Form 1.
            pet.chao_type = ChaoType::hatchling();
            pet.chao_type = evolution::resolve(ResolveInput::from_snapshot(pet), config);
            CocoonOutcome::Reincarnated
        }
        CocoonKind::Dying => {
            pet.deaths = pet.deaths.saturating_add(1);
            if pet.date_of_death.is_none() {
                pet.date_of_death = Some(now);
            }
            pet.dead = true;
            pet.hp.ticks = 0;
            CocoonOutcome::Died
        }
    };

    debug!(pet = %pet.name, kind = %cocoon.kind, "Cocoon opened");
    Some(outcome)
}

// ---------------------------------------------------------------------------
// Admin overrides
// ---------------------------------------------------------------------------

/// Set the happiness gauge directly (admin override).
pub const fn set_happiness(pet: &mut PetSnapshot, ticks: u8) {
    pet.happiness.ticks = if ticks > garden_types::VITAL_CAP {
        garden_types::VITAL_CAP
    } else {
        ticks
    };
}

/// Set a stat's grade directly (admin override).
pub const fn set_grade(pet: &mut PetSnapshot, stat: TrainableStat, grade: Grade) {
    pet.track_mut(stat).grade = grade;
}

/// Set a stat's experience directly (admin override).
pub const fn set_exp(pet: &mut PetSnapshot, stat: TrainableStat, exp: u32) {
    pet.track_mut(stat).exp = exp;
}

/// Set a stat's level directly (admin override).
///
/// Levels affect Form, so the resolver re-runs afterwards.
pub fn set_level(pet: &mut PetSnapshot, stat: TrainableStat, level: u8, config: &LifecycleConfig) {
    pet.track_mut(stat).level = level.min(garden_types::LEVEL_CAP);
    pet.chao_type = evolution::resolve(ResolveInput::from_snapshot(pet), config);
}

/// Set the face sprite keys directly (admin override).
pub fn set_face(pet: &mut PetSnapshot, eyes: Option<String>, mouth: Option<String>) {
    if let Some(eyes) = eyes {
        pet.eyes = eyes;
    }
    if let Some(mouth) = mouth {
        pet.mouth = mouth;
    }
}
