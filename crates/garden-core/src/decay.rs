//! Pure decay arithmetic for the vital gauges.
//!
//! Each vital has its own decay amount and interval, and its own
//! last-decay timestamp on the gauge. A pass computes whole elapsed
//! interval blocks, subtracts `amount x blocks` floored at zero, and
//! advances the timestamp by exactly the consumed blocks so partial
//! intervals are never lost and never double-counted.
//!
//! HP is conditional: it only decays while at least one of belly,
//! energy, or happiness is fully depleted. While all three are healthy,
//! HP's timestamp refreshes to now without subtracting, so no decay
//! debt accumulates.

use chrono::{DateTime, Duration, Utc};
use garden_types::{PetSnapshot, VitalGauge, VitalStat};
use serde::Deserialize;

/// HP values whose downward crossing notifies the owner.
pub const HP_ALERT_THRESHOLDS: [u8; 3] = [3, 1, 0];

/// Decay rate for one vital gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DecayRule {
    /// Ticks subtracted per elapsed block.
    pub amount: u8,
    /// Block length in minutes.
    pub interval_mins: i64,
}

/// Decay rates for all four vitals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DecayConfig {
    /// Belly decay (default: -1 every 180 minutes).
    #[serde(default = "defaults::belly")]
    pub belly: DecayRule,
    /// Happiness decay (default: -1 every 240 minutes).
    #[serde(default = "defaults::happiness")]
    pub happiness: DecayRule,
    /// Energy decay (default: -2 every 240 minutes).
    #[serde(default = "defaults::energy")]
    pub energy: DecayRule,
    /// HP decay (default: -1 every 720 minutes, conditional).
    #[serde(default = "defaults::hp")]
    pub hp: DecayRule,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            belly: defaults::belly(),
            happiness: defaults::happiness(),
            energy: defaults::energy(),
            hp: defaults::hp(),
        }
    }
}

mod defaults {
    use super::DecayRule;

    pub(super) const fn belly() -> DecayRule {
        DecayRule {
            amount: 1,
            interval_mins: 180,
        }
    }
    pub(super) const fn happiness() -> DecayRule {
        DecayRule {
            amount: 1,
            interval_mins: 240,
        }
    }
    pub(super) const fn energy() -> DecayRule {
        DecayRule {
            amount: 2,
            interval_mins: 240,
        }
    }
    pub(super) const fn hp() -> DecayRule {
        DecayRule {
            amount: 1,
            interval_mins: 720,
        }
    }
}

/// What one decay step did to a single gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GaugeStep {
    /// Whole blocks consumed.
    pub blocks: i64,
    /// Ticks actually subtracted (after the zero floor).
    pub subtracted: u8,
    /// Whether the timestamp was (re)initialized instead of advanced.
    pub initialized: bool,
}

impl GaugeStep {
    /// Whether the gauge changed in a way that needs persisting.
    pub const fn dirty(self) -> bool {
        self.blocks > 0 || self.initialized
    }
}

/// Apply time-based decay to one gauge.
///
/// A gauge with no timestamp (first-ever pass, or a corrupt stored
/// value healed to `None` at decode) only gets its timestamp
/// initialized; nothing is subtracted on that pass. A timestamp in the
/// future is treated the same way. Otherwise, whole elapsed blocks are
/// consumed and the timestamp advances by exactly `blocks x interval`,
/// which by construction never passes now.
pub fn step_gauge(gauge: &mut VitalGauge, rule: DecayRule, now: DateTime<Utc>) -> GaugeStep {
    let Some(last) = gauge.last_decay else {
        gauge.last_decay = Some(now);
        return GaugeStep {
            initialized: true,
            ..GaugeStep::default()
        };
    };

    let elapsed = now.signed_duration_since(last);
    if elapsed < Duration::zero() {
        gauge.last_decay = Some(now);
        return GaugeStep {
            initialized: true,
            ..GaugeStep::default()
        };
    }

    let interval = rule.interval_mins.max(1);
    let blocks = elapsed.num_minutes().checked_div(interval).unwrap_or(0);
    if blocks < 1 {
        return GaugeStep::default();
    }

    let total = u64::try_from(blocks)
        .unwrap_or(u64::MAX)
        .saturating_mul(u64::from(rule.amount));
    let subtracted = u8::try_from(total.min(u64::from(gauge.ticks))).unwrap_or(gauge.ticks);
    gauge.ticks = gauge.ticks.saturating_sub(subtracted);

    let advance = Duration::minutes(blocks.saturating_mul(interval));
    gauge.last_decay = last.checked_add_signed(advance).or(Some(now));

    GaugeStep {
        blocks,
        subtracted,
        initialized: false,
    }
}

/// Refresh a gauge's timestamp to now without subtracting.
///
/// Used for HP while the other vitals are healthy, so HP never builds
/// decay debt it would pay out the moment another vital empties.
pub fn refresh_gauge(gauge: &mut VitalGauge, now: DateTime<Utc>) -> bool {
    let dirty = gauge.last_decay != Some(now);
    gauge.last_decay = Some(now);
    dirty
}

/// Result of one decay pass over a pet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecayOutcome {
    /// Whether anything changed that needs persisting.
    pub dirty: bool,
    /// HP alert thresholds strictly crossed this pass, descending.
    pub hp_crossings: Vec<u8>,
}

/// Apply one decay pass to a pet's four vitals.
///
/// Belly, happiness, and energy decay unconditionally. HP decays only
/// if at least one of the other three ended the pass fully depleted;
/// otherwise its timestamp refreshes. An HP alert fires for each
/// threshold the gauge strictly crossed downward this pass -- sitting
/// at or below a threshold beforehand does not re-fire it.
pub fn decay_vitals(pet: &mut PetSnapshot, config: &DecayConfig, now: DateTime<Utc>) -> DecayOutcome {
    let belly = step_gauge(&mut pet.belly, config.belly, now);
    let happiness = step_gauge(&mut pet.happiness, config.happiness, now);
    let energy = step_gauge(&mut pet.energy, config.energy, now);

    let others_healthy = !pet.belly.is_depleted()
        && !pet.happiness.is_depleted()
        && !pet.energy.is_depleted();

    let hp_before = pet.hp.ticks;
    let (hp_dirty, hp_crossings) = if others_healthy {
        (refresh_gauge(&mut pet.hp, now), Vec::new())
    } else {
        let step = step_gauge(&mut pet.hp, config.hp, now);
        let crossings = HP_ALERT_THRESHOLDS
            .into_iter()
            .filter(|&threshold| hp_before > threshold && pet.hp.ticks <= threshold)
            .collect();
        (step.dirty(), crossings)
    };

    DecayOutcome {
        dirty: belly.dirty() || happiness.dirty() || energy.dirty() || hp_dirty,
        hp_crossings,
    }
}

/// Convenience for tests and callers: which vital a rule belongs to.
pub const fn rule_for(config: &DecayConfig, vital: VitalStat) -> DecayRule {
    match vital {
        VitalStat::Belly => config.belly,
        VitalStat::Happiness => config.happiness,
        VitalStat::Energy => config.energy,
        VitalStat::Hp => config.hp,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use garden_types::Grade;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
    }

    fn minutes(m: i64) -> DateTime<Utc> {
        at(m.saturating_mul(60))
    }

    fn gauge(ticks: u8, last_decay_min: Option<i64>) -> VitalGauge {
        VitalGauge {
            ticks,
            last_decay: last_decay_min.map(minutes),
        }
    }

    fn pet() -> PetSnapshot {
        PetSnapshot::fresh(String::from("decaytest"), [Grade::D; 5], at(0))
    }

    const RULE: DecayRule = DecayRule {
        amount: 1,
        interval_mins: 180,
    };

    #[test]
    fn first_pass_only_initializes() {
        let mut g = gauge(8, None);
        let step = step_gauge(&mut g, RULE, minutes(1000));
        assert!(step.initialized);
        assert_eq!(step.subtracted, 0);
        assert_eq!(g.ticks, 8);
        assert_eq!(g.last_decay, Some(minutes(1000)));
    }

    #[test]
    fn future_timestamp_resets_without_subtracting() {
        let mut g = gauge(8, Some(500));
        let step = step_gauge(&mut g, RULE, minutes(100));
        assert!(step.initialized);
        assert_eq!(g.ticks, 8);
        assert_eq!(g.last_decay, Some(minutes(100)));
    }

    #[test]
    fn sub_interval_elapse_is_a_no_op() {
        let mut g = gauge(8, Some(0));
        let step = step_gauge(&mut g, RULE, minutes(179));
        assert_eq!(step, GaugeStep::default());
        assert_eq!(g.ticks, 8);
        assert_eq!(g.last_decay, Some(minutes(0)));
    }

    #[test]
    fn whole_blocks_subtract_and_advance() {
        let mut g = gauge(8, Some(0));
        // 400 minutes = 2 whole 180-minute blocks, 40 minutes left over.
        let step = step_gauge(&mut g, RULE, minutes(400));
        assert_eq!(step.blocks, 2);
        assert_eq!(step.subtracted, 2);
        assert_eq!(g.ticks, 6);
        // Timestamp advances by exactly the consumed blocks, not to now.
        assert_eq!(g.last_decay, Some(minutes(360)));
    }

    #[test]
    fn decay_floors_at_zero() {
        let mut g = gauge(1, Some(0));
        let step = step_gauge(&mut g, RULE, minutes(180 * 5));
        assert_eq!(step.blocks, 5);
        assert_eq!(step.subtracted, 1);
        assert_eq!(g.ticks, 0);
    }

    #[test]
    fn decay_never_increases() {
        let mut g = gauge(0, Some(0));
        let _ = step_gauge(&mut g, RULE, minutes(10_000));
        assert_eq!(g.ticks, 0);
    }

    #[test]
    fn energy_rule_subtracts_two_per_block() {
        let config = DecayConfig::default();
        let mut g = gauge(10, Some(0));
        let _ = step_gauge(&mut g, config.energy, minutes(480));
        assert_eq!(g.ticks, 6);
    }

    #[test]
    fn hp_refreshes_while_others_are_healthy() {
        let config = DecayConfig::default();
        let mut p = pet();
        for vital in [VitalStat::Belly, VitalStat::Happiness, VitalStat::Energy, VitalStat::Hp] {
            p.gauge_mut(vital).last_decay = Some(minutes(0));
        }
        // Far beyond the HP interval, but all other vitals are above 0.
        let outcome = decay_vitals(&mut p, &config, minutes(800));
        assert_eq!(p.hp.ticks, 10);
        assert_eq!(p.hp.last_decay, Some(minutes(800)));
        assert!(outcome.hp_crossings.is_empty());
    }

    #[test]
    fn hp_decays_once_a_vital_is_depleted() {
        let config = DecayConfig::default();
        let mut p = pet();
        p.belly.ticks = 0;
        for vital in [VitalStat::Belly, VitalStat::Happiness, VitalStat::Energy, VitalStat::Hp] {
            p.gauge_mut(vital).last_decay = Some(minutes(0));
        }
        let outcome = decay_vitals(&mut p, &config, minutes(720));
        assert_eq!(p.hp.ticks, 9);
        assert!(outcome.dirty);
    }

    #[test]
    fn crossing_into_three_notifies_once() {
        let config = DecayConfig::default();
        let mut p = pet();
        p.belly.ticks = 0;
        p.hp.ticks = 4;
        for vital in [VitalStat::Belly, VitalStat::Happiness, VitalStat::Energy, VitalStat::Hp] {
            p.gauge_mut(vital).last_decay = Some(minutes(0));
        }
        let outcome = decay_vitals(&mut p, &config, minutes(720));
        assert_eq!(p.hp.ticks, 3);
        assert_eq!(outcome.hp_crossings, vec![3]);
    }

    #[test]
    fn already_below_threshold_does_not_refire() {
        // The spec scenario: hp=3 with belly depleted; one block elapses.
        let config = DecayConfig::default();
        let mut p = pet();
        p.belly.ticks = 0;
        p.hp.ticks = 3;
        for vital in [VitalStat::Belly, VitalStat::Happiness, VitalStat::Energy, VitalStat::Hp] {
            p.gauge_mut(vital).last_decay = Some(minutes(0));
        }
        let outcome = decay_vitals(&mut p, &config, minutes(720));
        assert_eq!(p.hp.ticks, 2);
        // 3 -> 2 crosses neither 3 (already at it) nor 1.
        assert!(outcome.hp_crossings.is_empty());

        // The next block, 2 -> 1, fires the "1 HP" alert.
        let outcome = decay_vitals(&mut p, &config, minutes(1440));
        assert_eq!(p.hp.ticks, 1);
        assert_eq!(outcome.hp_crossings, vec![1]);
    }

    #[test]
    fn a_long_gap_can_cross_several_thresholds_at_once() {
        let config = DecayConfig::default();
        let mut p = pet();
        p.belly.ticks = 0;
        p.hp.ticks = 5;
        for vital in [VitalStat::Belly, VitalStat::Happiness, VitalStat::Energy, VitalStat::Hp] {
            p.gauge_mut(vital).last_decay = Some(minutes(0));
        }
        // Five HP blocks at once: 5 -> 0 crosses 3, 1, and 0.
        let outcome = decay_vitals(&mut p, &config, minutes(720 * 5));
        assert_eq!(p.hp.ticks, 0);
        assert_eq!(outcome.hp_crossings, vec![3, 1, 0]);
    }

    #[test]
    fn rule_lookup_matches_fields() {
        let config = DecayConfig::default();
        assert_eq!(rule_for(&config, VitalStat::Belly), config.belly);
        assert_eq!(rule_for(&config, VitalStat::Hp), config.hp);
    }
}
