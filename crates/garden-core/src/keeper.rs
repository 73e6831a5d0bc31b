//! The garden keeper: orchestration of every user-facing pet operation.
//!
//! Each operation re-reads the latest snapshot through the persistence
//! gateway (never a cached copy), validates before mutating, applies the
//! pure lifecycle functions to a working copy, and persists with a
//! single all-or-nothing save. Inside a feed the order is strict: stat
//! mutation, evolution resolution, persistence write, post-condition
//! transition check.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use garden_db::{InventoryStore, PetStore, ViewStateStore};
use garden_inventory as inventory;
use garden_pet::lifecycle::{self, CocoonOutcome, FeedReport};
use garden_pet::{LifecycleConfig, PetError};
use garden_types::{
    CocoonKind, Fruit, Grade, Item, OwnerId, OwnerInventory, PetSnapshot, PortraitRequest,
    StatSheetRequest, TrainableStat, ViewKey, ViewStateRecord,
};
use tracing::{info, warn};

use crate::error::KeeperError;

/// Result of polling a pet's cocoon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CocoonPoll {
    /// No cocoon is pending.
    Idle,
    /// The countdown is still running.
    Waiting {
        /// Which transition is pending.
        kind: CocoonKind,
        /// Whole seconds remaining.
        remaining_secs: i64,
    },
    /// The cocoon opened and its effect has been persisted.
    Opened(CocoonOutcome),
}

/// Orchestrates pet operations over the persistence gateway.
///
/// Generic over the three gateway traits so production uses the
/// `PostgreSQL` stores and tests use [`garden_db::MemoryStore`] for all
/// three parameters.
pub struct GardenKeeper<P, I, V> {
    pets: Arc<P>,
    inventories: Arc<I>,
    views: Arc<V>,
    config: LifecycleConfig,
}

impl<P, I, V> GardenKeeper<P, I, V>
where
    P: PetStore,
    I: InventoryStore,
    V: ViewStateStore,
{
    /// Create a keeper over gateway handles.
    pub const fn new(
        pets: Arc<P>,
        inventories: Arc<I>,
        views: Arc<V>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            pets,
            inventories,
            views,
            config,
        }
    }

    /// The lifecycle configuration in use.
    pub const fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    async fn load_required(&self, owner: OwnerId, name: &str) -> Result<PetSnapshot, KeeperError> {
        self.pets
            .load_pet(owner, name)
            .await?
            .ok_or_else(|| {
                KeeperError::Pet(PetError::PetNotFound {
                    owner,
                    name: name.to_owned(),
                })
            })
    }

    /// Consume one Chao egg from the owner's inventory.
    async fn consume_egg(&self, owner: OwnerId) -> Result<(), KeeperError> {
        let mut inv = self.inventories.load_inventory(owner).await?;
        inventory::take_item(&mut inv, Item::ChaoEgg, 1)?;
        self.inventories.save_inventory(owner, &inv).await?;
        Ok(())
    }

    /// Best-effort egg refund after a failed hatch save.
    async fn refund_egg(&self, owner: OwnerId) {
        let refund = async {
            let mut inv = self.inventories.load_inventory(owner).await?;
            inventory::add_item(&mut inv, Item::ChaoEgg, 1)?;
            self.inventories.save_inventory(owner, &inv).await?;
            Ok::<(), KeeperError>(())
        };
        if let Err(error) = refund.await {
            warn!(owner = %owner, %error, "Egg refund after failed hatch also failed");
        }
    }

    // -----------------------------------------------------------------------
    // Hatch
    // -----------------------------------------------------------------------

    /// Hatch a pet from a Chao egg.
    ///
    /// A brand-new name creates a fresh pet with rolled grades; a
    /// reincarnated egg under an existing name re-hatches it, keeping
    /// its grades and lifetime counters. Both paths consume one egg.
    pub async fn hatch(
        &self,
        owner: OwnerId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<PetSnapshot, KeeperError> {
        let existing = self.pets.load_pet(owner, name).await?;

        let pet = match existing {
            Some(pet) if pet.dead => {
                return Err(KeeperError::Pet(PetError::Dead {
                    name: pet.name,
                    date_of_death: pet.date_of_death,
                }));
            }
            Some(pet) if pet.hatched => {
                return Err(KeeperError::Pet(PetError::AlreadyHatched { name: pet.name }));
            }
            Some(mut egg) => {
                self.consume_egg(owner).await?;
                lifecycle::rehatch(&mut egg, now);
                egg
            }
            None => {
                self.consume_egg(owner).await?;
                let mut rng = rand::rng();
                lifecycle::hatch_new(name.to_owned(), now, &mut rng)
            }
        };

        if let Err(error) = self.pets.save_pet(owner, &pet).await {
            self.refund_egg(owner).await;
            return Err(error.into());
        }

        info!(owner = %owner, pet = %pet.name, reincarnations = pet.reincarnations, "Pet hatched");
        Ok(pet)
    }

    // -----------------------------------------------------------------------
    // Feed
    // -----------------------------------------------------------------------

    /// Feed a pet `qty` of a fruit.
    ///
    /// Validation happens before any mutation: the pet must exist and be
    /// interactive, and the owner must hold at least `qty` of the fruit
    /// (the feed never oversells). After the mutated snapshot persists,
    /// the post-condition ladder may put the pet into a cocoon, which is
    /// persisted as a second, self-consistent write.
    pub async fn feed(
        &self,
        owner: OwnerId,
        name: &str,
        fruit: Fruit,
        qty: u32,
        now: DateTime<Utc>,
    ) -> Result<FeedReport, KeeperError> {
        let mut pet = self.load_required(owner, name).await?;
        lifecycle::ensure_interactive(&pet, now)?;
        if qty == 0 {
            return Err(KeeperError::Pet(PetError::ZeroQuantity {
                name: name.to_owned(),
            }));
        }

        // Validate and consume the fruit before touching the pet.
        let item = Item::from(fruit);
        let mut inv = self.inventories.load_inventory(owner).await?;
        inventory::take_item(&mut inv, item, u64::from(qty))?;
        self.inventories.save_inventory(owner, &inv).await?;

        // Mutation, then resolution, then the persistence write.
        let mut report = lifecycle::apply_feed(&mut pet, fruit, qty, now, &self.config)?;
        self.pets.save_pet(owner, &pet).await?;

        // Post-condition check, strictly after the write.
        if let Some(kind) = lifecycle::check_post_conditions(&pet, &self.config)
            && lifecycle::enter_cocoon(&mut pet, kind, now, &self.config)
        {
            self.pets.save_pet(owner, &pet).await?;
            self.save_cocoon_view(owner, &pet, now).await;
            info!(owner = %owner, pet = %pet.name, kind = %kind, "Feed triggered a cocoon");
        }

        report.cocoon = pet.cocoon;
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Cocoons
    // -----------------------------------------------------------------------

    /// Persist the cocoon countdown as resumable view state.
    async fn save_cocoon_view(&self, owner: OwnerId, pet: &PetSnapshot, now: DateTime<Utc>) {
        let Some(cocoon) = pet.cocoon else { return };
        let key = ViewKey::Pet(pet.name.clone());
        let record = ViewStateRecord {
            payload: serde_json::json!({
                "step": "cocoon",
                "kind": cocoon.kind.as_str(),
                "ends_at": cocoon.ends_at.to_rfc3339(),
            }),
            updated_at: now,
        };
        if let Err(error) = self.views.save_view(owner, &key, &record).await {
            warn!(owner = %owner, pet = %pet.name, %error, "Failed to persist cocoon view state");
        }
    }

    /// Check a pet's cocoon, applying the transition if the countdown
    /// has elapsed.
    pub async fn poll_cocoon(
        &self,
        owner: OwnerId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<CocoonPoll, KeeperError> {
        let mut pet = self.load_required(owner, name).await?;
        let Some(cocoon) = pet.cocoon else {
            return Ok(CocoonPoll::Idle);
        };
        if !cocoon.is_due(now) {
            return Ok(CocoonPoll::Waiting {
                kind: cocoon.kind,
                remaining_secs: cocoon.remaining_secs(now),
            });
        }

        let Some(outcome) = lifecycle::complete_cocoon(&mut pet, now, &self.config) else {
            return Ok(CocoonPoll::Idle);
        };
        self.pets.save_pet(owner, &pet).await?;

        if outcome == CocoonOutcome::Reincarnated {
            let mut inv = self.inventories.load_inventory(owner).await?;
            inventory::add_item(&mut inv, Item::ChaoEgg, 1)?;
            self.inventories.save_inventory(owner, &inv).await?;
        }

        let key = ViewKey::Pet(pet.name.clone());
        if let Err(error) = self.views.clear_view(owner, &key).await {
            warn!(owner = %owner, pet = %pet.name, %error, "Failed to clear cocoon view state");
        }

        info!(owner = %owner, pet = %pet.name, ?outcome, "Cocoon opened");
        Ok(CocoonPoll::Opened(outcome))
    }

    /// Admin path: evaluate the same transition ladder a feed checks,
    /// without feeding.
    ///
    /// Uses the identical happiness boundary as the feed path, so the
    /// reincarnate/die fork cannot drift between call sites.
    pub async fn force_lifecycle_check(
        &self,
        owner: OwnerId,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CocoonKind>, KeeperError> {
        let mut pet = self.load_required(owner, name).await?;
        lifecycle::ensure_interactive(&pet, now)?;

        let kind = lifecycle::check_post_conditions(&pet, &self.config)
            .or_else(|| lifecycle::check_hp_exhaustion(&pet, &self.config));
        let Some(kind) = kind else {
            return Ok(None);
        };

        if lifecycle::enter_cocoon(&mut pet, kind, now, &self.config) {
            self.pets.save_pet(owner, &pet).await?;
            self.save_cocoon_view(owner, &pet, now).await;
        }
        Ok(Some(kind))
    }

    // -----------------------------------------------------------------------
    // Admin overrides
    // -----------------------------------------------------------------------

    /// Admin override: set the happiness gauge.
    pub async fn set_happiness(
        &self,
        owner: OwnerId,
        name: &str,
        ticks: u8,
        now: DateTime<Utc>,
    ) -> Result<(), KeeperError> {
        let mut pet = self.load_required(owner, name).await?;
        lifecycle::ensure_interactive(&pet, now)?;
        lifecycle::set_happiness(&mut pet, ticks);
        self.pets.save_pet(owner, &pet).await?;
        Ok(())
    }

    /// Admin override: set a stat's grade.
    pub async fn set_grade(
        &self,
        owner: OwnerId,
        name: &str,
        stat: TrainableStat,
        grade: Grade,
        now: DateTime<Utc>,
    ) -> Result<(), KeeperError> {
        let mut pet = self.load_required(owner, name).await?;
        lifecycle::ensure_interactive(&pet, now)?;
        lifecycle::set_grade(&mut pet, stat, grade);
        self.pets.save_pet(owner, &pet).await?;
        Ok(())
    }

    /// Admin override: set a stat's experience.
    pub async fn set_exp(
        &self,
        owner: OwnerId,
        name: &str,
        stat: TrainableStat,
        exp: u32,
        now: DateTime<Utc>,
    ) -> Result<(), KeeperError> {
        let mut pet = self.load_required(owner, name).await?;
        lifecycle::ensure_interactive(&pet, now)?;
        lifecycle::set_exp(&mut pet, stat, exp);
        self.pets.save_pet(owner, &pet).await?;
        Ok(())
    }

    /// Admin override: set a stat's level.
    ///
    /// Levels affect Form, so the resolver re-runs before the save.
    pub async fn set_level(
        &self,
        owner: OwnerId,
        name: &str,
        stat: TrainableStat,
        level: u8,
        now: DateTime<Utc>,
    ) -> Result<(), KeeperError> {
        let mut pet = self.load_required(owner, name).await?;
        lifecycle::ensure_interactive(&pet, now)?;
        lifecycle::set_level(&mut pet, stat, level, &self.config);
        self.pets.save_pet(owner, &pet).await?;
        Ok(())
    }

    /// Admin override: set the face sprite keys.
    pub async fn set_face(
        &self,
        owner: OwnerId,
        name: &str,
        eyes: Option<String>,
        mouth: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), KeeperError> {
        let mut pet = self.load_required(owner, name).await?;
        lifecycle::ensure_interactive(&pet, now)?;
        lifecycle::set_face(&mut pet, eyes, mouth);
        self.pets.save_pet(owner, &pet).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// Build the stat sheet payload for a pet. Allowed in any state;
    /// observation never mutates.
    pub async fn stat_sheet(&self, owner: OwnerId, name: &str) -> Result<StatSheetRequest, KeeperError> {
        let pet = self.load_required(owner, name).await?;
        Ok(garden_pet::present::stat_sheet_request(&pet))
    }

    /// Build the portrait payload for a pet. Allowed in any state.
    pub async fn portrait(
        &self,
        owner: OwnerId,
        name: &str,
        background: &str,
    ) -> Result<PortraitRequest, KeeperError> {
        let pet = self.load_required(owner, name).await?;
        Ok(garden_pet::present::portrait_request(&pet, background))
    }

    /// The owner's ring balance and item counts.
    pub async fn balance_and_items(&self, owner: OwnerId) -> Result<OwnerInventory, KeeperError> {
        Ok(self.inventories.load_inventory(owner).await?)
    }

    /// Apply a batch of signed item deltas to an owner's inventory
    /// (economy interface; rejects any batch that would oversell).
    pub async fn adjust_items(
        &self,
        owner: OwnerId,
        deltas: &BTreeMap<Item, i64>,
    ) -> Result<OwnerInventory, KeeperError> {
        let mut inv = self.inventories.load_inventory(owner).await?;
        inventory::adjust(&mut inv, deltas)?;
        self.inventories.save_inventory(owner, &inv).await?;
        Ok(inv)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use garden_db::MemoryStore;
    use garden_inventory::InventoryError;
    use garden_types::{Alignment, ChaoType, Form, Shape};

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
    }

    fn keeper() -> (Arc<MemoryStore>, GardenKeeper<MemoryStore, MemoryStore, MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let keeper = GardenKeeper::new(
            Arc::clone(&store),
            Arc::clone(&store),
            Arc::clone(&store),
            LifecycleConfig::default(),
        );
        (store, keeper)
    }

    async fn grant(store: &MemoryStore, owner: OwnerId, item: Item, qty: u64) {
        let mut inv = store.load_inventory(owner).await.unwrap_or_default();
        let _ = inventory::add_item(&mut inv, item, qty);
        assert!(store.save_inventory(owner, &inv).await.is_ok());
    }

    /// Seed a Form-3 run-lineage pet one tick-gain away from the
    /// evolving trigger.
    fn adolescent_runner() -> PetSnapshot {
        let mut pet = PetSnapshot::fresh(String::from("dash"), [Grade::D; 5], at(0));
        pet.chao_type = ChaoType {
            alignment: Alignment::Neutral,
            prefix: Shape::Normal,
            suffix: Shape::Run,
            form: Form::Third,
        };
        pet.run_power = -5;
        pet.run.level = 19;
        pet.run.ticks = 6;
        pet
    }

    #[tokio::test]
    async fn hatch_requires_an_egg() {
        let (_, keeper) = keeper();
        let owner = OwnerId::new(1);
        let result = keeper.hatch(owner, "cheese", at(0)).await;
        assert!(matches!(
            result,
            Err(KeeperError::Inventory(InventoryError::InsufficientItem {
                item: Item::ChaoEgg,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn hatch_consumes_the_egg_and_creates_the_pet() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(1);
        grant(&store, owner, Item::ChaoEgg, 1).await;

        let pet = keeper.hatch(owner, "cheese", at(0)).await;
        assert!(pet.is_ok_and(|p| p.hatched && p.form() == Form::First));

        let inv = store.load_inventory(owner).await.unwrap_or_default();
        assert_eq!(inv.count(Item::ChaoEgg), 0);

        // The snapshot is durably behind the gateway.
        let stored = store.load_pet(owner, "cheese").await.ok().flatten();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn hatch_rejects_a_living_duplicate() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(1);
        grant(&store, owner, Item::ChaoEgg, 2).await;
        assert!(keeper.hatch(owner, "cheese", at(0)).await.is_ok());
        let result = keeper.hatch(owner, "cheese", at(5)).await;
        assert!(matches!(
            result,
            Err(KeeperError::Pet(PetError::AlreadyHatched { .. }))
        ));
        // The second egg was not consumed.
        let inv = store.load_inventory(owner).await.unwrap_or_default();
        assert_eq!(inv.count(Item::ChaoEgg), 1);
    }

    #[tokio::test]
    async fn feed_rejects_unknown_pets_before_any_mutation() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(1);
        grant(&store, owner, Item::RunFruit, 5).await;
        let result = keeper.feed(owner, "ghost", Fruit::Run, 1, at(0)).await;
        assert!(matches!(
            result,
            Err(KeeperError::Pet(PetError::PetNotFound { .. }))
        ));
        let inv = store.load_inventory(owner).await.unwrap_or_default();
        assert_eq!(inv.count(Item::RunFruit), 5);
    }

    #[tokio::test]
    async fn feed_never_oversells_fruit() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(1);
        grant(&store, owner, Item::ChaoEgg, 1).await;
        grant(&store, owner, Item::RunFruit, 2).await;
        assert!(keeper.hatch(owner, "cheese", at(0)).await.is_ok());

        let result = keeper.feed(owner, "cheese", Fruit::Run, 3, at(10)).await;
        assert!(matches!(
            result,
            Err(KeeperError::Inventory(InventoryError::InsufficientItem {
                requested: 3,
                available: 2,
                ..
            }))
        ));

        // Neither the fruit nor the pet changed.
        let inv = store.load_inventory(owner).await.unwrap_or_default();
        assert_eq!(inv.count(Item::RunFruit), 2);
        let pet = store.load_pet(owner, "cheese").await.ok().flatten();
        assert_eq!(pet.map(|p| p.run.ticks), Some(0));
    }

    #[tokio::test]
    async fn feed_consumes_trains_and_persists() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(1);
        grant(&store, owner, Item::ChaoEgg, 1).await;
        grant(&store, owner, Item::PowerFruit, 5).await;
        assert!(keeper.hatch(owner, "cheese", at(0)).await.is_ok());

        let report = keeper.feed(owner, "cheese", Fruit::Power, 5, at(10)).await;
        let report = report.unwrap_or_default();
        // 5 power fruit = 20 ticks: exactly two level-ups.
        assert_eq!(report.levels_gained.get(&TrainableStat::Power).copied(), Some(2));
        assert!(report.cocoon.is_none());

        let inv = store.load_inventory(owner).await.unwrap_or_default();
        assert_eq!(inv.count(Item::PowerFruit), 0);

        let pet = store.load_pet(owner, "cheese").await.ok().flatten();
        let pet = pet.unwrap_or_else(|| adolescent_runner());
        assert!(pet.power.level >= 2);
        assert_eq!(pet.run_power, 5);
        assert_eq!(pet.last_fed_at, Some(at(10)));
    }

    #[tokio::test]
    async fn evolving_scenario_runs_end_to_end() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(2);
        assert!(store.save_pet(owner, &adolescent_runner()).await.is_ok());
        grant(&store, owner, Item::RunFruit, 2).await;

        // The feed pushes run 19 -> 20 and the pet enters the cocoon.
        let report = keeper.feed(owner, "dash", Fruit::Run, 1, at(100)).await;
        let report = report.unwrap_or_default();
        let entered = report.cocoon.map(|c| c.kind);
        assert_eq!(entered, Some(CocoonKind::Evolving));

        // Any feed during the window is rejected with remaining time.
        let rejected = keeper.feed(owner, "dash", Fruit::Run, 1, at(130)).await;
        let remaining = match rejected {
            Err(KeeperError::Pet(PetError::InCocoon { remaining_secs, .. })) => remaining_secs,
            _ => -1,
        };
        assert_eq!(remaining, 30);

        // Still waiting just before the end.
        let poll = keeper.poll_cocoon(owner, "dash", at(159)).await;
        assert!(matches!(poll, Ok(CocoonPoll::Waiting { .. })));

        // After sixty seconds the grade promotes exactly one step.
        let poll = keeper.poll_cocoon(owner, "dash", at(160)).await;
        assert!(matches!(
            poll,
            Ok(CocoonPoll::Opened(CocoonOutcome::Evolved {
                stat: TrainableStat::Run,
                grade: Grade::C,
            }))
        ));
        let pet = store.load_pet(owner, "dash").await.ok().flatten();
        let pet = pet.unwrap_or_else(adolescent_runner);
        assert!(pet.evolved);
        assert!(pet.cocoon.is_none());
        assert_eq!(pet.run.grade, Grade::C);
    }

    #[tokio::test]
    async fn reincarnation_scenario_credits_one_egg() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(3);
        let mut pet = PetSnapshot::fresh(String::from("phoenix"), [Grade::A; 5], at(0));
        pet.chao_type = ChaoType {
            alignment: Alignment::Hero,
            prefix: Shape::Run,
            suffix: Shape::Run,
            form: Form::Fourth,
        };
        pet.evolved = true;
        pet.run_power = -5;
        pet.stamina.level = 98;
        pet.stamina.ticks = 6;
        pet.happiness.ticks = 7;
        assert!(store.save_pet(owner, &pet).await.is_ok());
        grant(&store, owner, Item::TastyFruit, 2).await;

        // Two tasty fruit push stamina 98 -> 99: the happy finale.
        let report = keeper.feed(owner, "phoenix", Fruit::Tasty, 2, at(50)).await;
        let entered = report.unwrap_or_default().cocoon.map(|c| c.kind);
        assert_eq!(entered, Some(CocoonKind::Reincarnating));

        let poll = keeper.poll_cocoon(owner, "phoenix", at(110)).await;
        assert!(matches!(poll, Ok(CocoonPoll::Opened(CocoonOutcome::Reincarnated))));

        let reborn = store.load_pet(owner, "phoenix").await.ok().flatten();
        let reborn = reborn.unwrap_or_else(adolescent_runner);
        assert_eq!(reborn.reincarnations, 1);
        assert!(!reborn.hatched);
        assert_eq!(reborn.form(), Form::First);
        for stat in TrainableStat::ALL {
            assert_eq!(reborn.track(stat).level, 0);
        }
        // Grades survive the rebirth.
        assert_eq!(reborn.stamina.grade, Grade::A);

        let inv = store.load_inventory(owner).await.unwrap_or_default();
        assert_eq!(inv.count(Item::ChaoEgg), 1);

        // The credited egg re-hatches the same name.
        assert!(keeper.hatch(owner, "phoenix", at(200)).await.is_ok());
        let rehatched = store.load_pet(owner, "phoenix").await.ok().flatten();
        assert_eq!(rehatched.map(|p| p.hatched), Some(true));
    }

    #[tokio::test]
    async fn force_check_uses_the_same_happiness_boundary() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(4);
        let mut pet = PetSnapshot::fresh(String::from("edge"), [Grade::D; 5], at(0));
        pet.chao_type.form = Form::Fourth;
        pet.swim.level = 99;

        // Happiness exactly at the floor: the fork dies.
        pet.happiness.ticks = 5;
        assert!(store.save_pet(owner, &pet).await.is_ok());
        let kind = keeper.force_lifecycle_check(owner, "edge", at(10)).await;
        assert!(matches!(kind, Ok(Some(CocoonKind::Dying))));

        // One above the floor: the fork reincarnates.
        let mut happier = pet.clone();
        happier.name = String::from("edge2");
        happier.happiness.ticks = 6;
        assert!(store.save_pet(owner, &happier).await.is_ok());
        let kind = keeper.force_lifecycle_check(owner, "edge2", at(10)).await;
        assert!(matches!(kind, Ok(Some(CocoonKind::Reincarnating))));
    }

    #[tokio::test]
    async fn cocoon_view_state_is_written_and_cleared() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(5);
        assert!(store.save_pet(owner, &adolescent_runner()).await.is_ok());
        grant(&store, owner, Item::RunFruit, 1).await;

        let _ = keeper.feed(owner, "dash", Fruit::Run, 1, at(100)).await;
        let key = ViewKey::Pet(String::from("dash"));
        let view = store.load_view(owner, &key).await.ok().flatten();
        assert!(view.is_some(), "cocoon entry should persist a resumable view");

        let _ = keeper.poll_cocoon(owner, "dash", at(160)).await;
        let view = store.load_view(owner, &key).await.ok().flatten();
        assert!(view.is_none(), "cocoon completion should clear the view");
    }

    #[tokio::test]
    async fn admin_level_override_reresolves_the_form() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(6);
        grant(&store, owner, Item::ChaoEgg, 1).await;
        assert!(keeper.hatch(owner, "clay", at(0)).await.is_ok());

        assert!(keeper
            .set_level(owner, "clay", TrainableStat::Fly, 10, at(5))
            .await
            .is_ok());
        let pet = store.load_pet(owner, "clay").await.ok().flatten();
        assert_eq!(pet.map(|p| p.form()), Some(Form::Second));
    }

    #[tokio::test]
    async fn observation_is_allowed_inside_the_cocoon() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(7);
        assert!(store.save_pet(owner, &adolescent_runner()).await.is_ok());
        grant(&store, owner, Item::RunFruit, 1).await;
        let _ = keeper.feed(owner, "dash", Fruit::Run, 1, at(100)).await;

        let sheet = keeper.stat_sheet(owner, "dash").await;
        assert!(sheet.is_ok_and(|s| s.levels.len() == 5));
        let portrait = keeper.portrait(owner, "dash", "garden_day").await;
        assert!(portrait.is_ok_and(|p| p.body == "neutral_run_3"));
    }

    #[tokio::test]
    async fn adjust_items_is_atomic() {
        let (store, keeper) = keeper();
        let owner = OwnerId::new(8);
        grant(&store, owner, Item::RoundFruit, 2).await;

        let mut deltas = BTreeMap::new();
        deltas.insert(Item::RoundFruit, -3_i64);
        deltas.insert(Item::ChaoEgg, 1_i64);
        assert!(keeper.adjust_items(owner, &deltas).await.is_err());

        let inv = keeper.balance_and_items(owner).await.unwrap_or_default();
        assert_eq!(inv.count(Item::RoundFruit), 2);
        assert_eq!(inv.count(Item::ChaoEgg), 0);
    }
}
