//! The fruit effect table.
//!
//! Each fruit maps to a fixed bundle of trainable tick gains, vital
//! fills, and axis shifts. Axis shifts interact with the coupling rule
//! in the lifecycle layer (raising one evolution axis steps the other
//! toward zero); this table only declares the per-fruit deltas.

use garden_types::{Fruit, TrainableStat};

/// The stat deltas a single fruit applies when eaten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FruitEffects {
    /// Swim ticks gained.
    pub swim: u8,
    /// Fly ticks gained.
    pub fly: u8,
    /// Run ticks gained.
    pub run: u8,
    /// Power ticks gained.
    pub power: u8,
    /// Stamina ticks gained.
    pub stamina: u8,
    /// Belly fill.
    pub belly: u8,
    /// Happiness fill.
    pub happiness: u8,
    /// Energy fill.
    pub energy: u8,
    /// HP fill.
    pub hp: u8,
    /// Shift on the `dark_hero` axis.
    pub dark_hero: i8,
    /// Shift on the `run_power` axis (negative = run).
    pub run_power: i8,
    /// Shift on the `swim_fly` axis (negative = swim).
    pub swim_fly: i8,
}

impl FruitEffects {
    /// Look up the effect bundle for a fruit.
    pub const fn of(fruit: Fruit) -> Self {
        match fruit {
            Fruit::Round => Self {
                stamina: 1,
                belly: 3,
                happiness: 1,
                ..EMPTY
            },
            Fruit::Hero => Self {
                stamina: 2,
                belly: 2,
                happiness: 1,
                dark_hero: 1,
                ..EMPTY
            },
            Fruit::Dark => Self {
                stamina: 2,
                belly: 2,
                happiness: 1,
                dark_hero: -1,
                ..EMPTY
            },
            Fruit::Swim => Self {
                swim: 4,
                belly: 1,
                swim_fly: -1,
                ..EMPTY
            },
            Fruit::Fly => Self {
                fly: 4,
                belly: 1,
                swim_fly: 1,
                ..EMPTY
            },
            Fruit::Run => Self {
                run: 4,
                belly: 1,
                run_power: -1,
                ..EMPTY
            },
            Fruit::Power => Self {
                power: 4,
                belly: 1,
                run_power: 1,
                ..EMPTY
            },
            Fruit::Tasty => Self {
                stamina: 3,
                belly: 5,
                happiness: 1,
                ..EMPTY
            },
            Fruit::Heart => Self {
                happiness: 3,
                belly: 1,
                hp: 1,
                ..EMPTY
            },
            Fruit::Chao => Self {
                swim: 2,
                fly: 2,
                run: 2,
                power: 2,
                stamina: 2,
                belly: 2,
                happiness: 2,
                energy: 1,
                hp: 1,
                ..EMPTY
            },
        }
    }

    /// Tick gain for one trainable stat.
    pub const fn tick_gain(&self, stat: TrainableStat) -> u8 {
        match stat {
            TrainableStat::Swim => self.swim,
            TrainableStat::Fly => self.fly,
            TrainableStat::Run => self.run,
            TrainableStat::Power => self.power,
            TrainableStat::Stamina => self.stamina,
        }
    }
}

/// The all-zero effect bundle used as the struct-update base above.
const EMPTY: FruitEffects = FruitEffects {
    swim: 0,
    fly: 0,
    run: 0,
    power: 0,
    stamina: 0,
    belly: 0,
    happiness: 0,
    energy: 0,
    hp: 0,
    dark_hero: 0,
    run_power: 0,
    swim_fly: 0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fruit_fills_the_belly_or_the_heart() {
        for fruit in Fruit::ALL {
            let effects = FruitEffects::of(fruit);
            assert!(
                effects.belly > 0 || effects.happiness > 0,
                "{fruit} feeds nothing"
            );
        }
    }

    #[test]
    fn axis_fruits_shift_one_axis_only() {
        let run = FruitEffects::of(Fruit::Run);
        assert_eq!(run.run_power, -1);
        assert_eq!(run.swim_fly, 0);
        assert_eq!(run.dark_hero, 0);

        let fly = FruitEffects::of(Fruit::Fly);
        assert_eq!(fly.swim_fly, 1);
        assert_eq!(fly.run_power, 0);
    }

    #[test]
    fn alignment_fruits_mirror_each_other() {
        let hero = FruitEffects::of(Fruit::Hero);
        let dark = FruitEffects::of(Fruit::Dark);
        assert_eq!(hero.dark_hero, 1);
        assert_eq!(dark.dark_hero, -1);
        assert_eq!(hero.belly, dark.belly);
    }

    #[test]
    fn tick_gain_addresses_the_right_stat() {
        let swim = FruitEffects::of(Fruit::Swim);
        assert_eq!(swim.tick_gain(TrainableStat::Swim), 4);
        assert_eq!(swim.tick_gain(TrainableStat::Run), 0);
    }
}
