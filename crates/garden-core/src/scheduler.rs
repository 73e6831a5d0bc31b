//! The decay scheduler: a recurring sweep over every stored pet.
//!
//! Runs on a fixed cadence (default once per minute). Each pass lists
//! all pets across all owners and, per pet: finalizes a due cocoon
//! (restart resumption), applies vital decay, and routes HP exhaustion
//! into the reincarnate/die fork. One pet's failure is logged and never
//! halts the pass; the loop yields between pets so a large garden
//! cannot monopolize the runtime.
//!
//! Shutdown is graceful: a stop request prevents new passes and cuts
//! the inter-pass sleep short, while an in-flight pass always finishes.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use garden_db::{InventoryStore, PetStore};
use garden_inventory as inventory;
use garden_pet::lifecycle::{self, CocoonOutcome};
use garden_pet::LifecycleConfig;
use garden_types::{CocoonKind, Item, OwnerId};
use tracing::{debug, info, warn};

use crate::control::SchedulerControl;
use crate::decay::{self, DecayConfig};
use crate::error::KeeperError;
use crate::notify::DecayNotifier;

/// Aggregate counts from one decay pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepSummary {
    /// Pets examined this pass.
    pub pets_processed: u32,
    /// Pets skipped because they are dead or unhatched eggs.
    pub pets_skipped: u32,
    /// Pets whose load or save failed (logged and skipped).
    pub pets_failed: u32,
    /// Cocoons finalized this pass.
    pub cocoons_opened: u32,
    /// Cocoons entered via HP exhaustion this pass.
    pub cocoons_entered: u32,
    /// HP threshold alerts delivered this pass.
    pub alerts_sent: u32,
}

/// What one pet's sweep did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PetSweep {
    skipped: bool,
    opened: Option<CocoonOutcome>,
    entered: Option<CocoonKind>,
    alerts: u32,
}

/// Result of a completed scheduler run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerResult {
    /// Total passes executed before the stop request.
    pub passes: u64,
}

/// Run the decay loop until a stop is requested.
///
/// The pass cadence comes from the control state and can be retuned at
/// runtime. Every pass re-lists the stored pets, so newly hatched pets
/// join the sweep without a restart.
pub async fn run_decay_loop<P, I, N>(
    pets: Arc<P>,
    inventories: Arc<I>,
    notifier: Arc<N>,
    control: Arc<SchedulerControl>,
    decay_config: DecayConfig,
    lifecycle_config: LifecycleConfig,
) -> SchedulerResult
where
    P: PetStore,
    I: InventoryStore,
    N: DecayNotifier,
{
    info!(
        pass_interval_secs = control.pass_interval_secs(),
        "Decay scheduler starting"
    );
    let mut passes: u64 = 0;

    loop {
        control.wait_if_paused().await;
        if control.is_stop_requested() {
            break;
        }

        let summary = decay_pass(
            pets.as_ref(),
            inventories.as_ref(),
            notifier.as_ref(),
            &decay_config,
            &lifecycle_config,
            Utc::now(),
        )
        .await;
        passes = passes.saturating_add(1);
        debug!(
            pass = passes,
            processed = summary.pets_processed,
            failed = summary.pets_failed,
            opened = summary.cocoons_opened,
            alerts = summary.alerts_sent,
            "Decay pass complete"
        );

        let sleep = Duration::from_secs(control.pass_interval_secs());
        tokio::select! {
            () = tokio::time::sleep(sleep) => {}
            () = control.stopped() => break,
        }
    }

    info!(passes, "Decay scheduler stopped");
    SchedulerResult { passes }
}

/// Run one decay pass over every stored pet.
///
/// A failure listing pets aborts only this pass; a failure on one pet
/// is logged and the pass continues with the next.
pub async fn decay_pass<P, I, N>(
    pets: &P,
    inventories: &I,
    notifier: &N,
    decay_config: &DecayConfig,
    lifecycle_config: &LifecycleConfig,
    now: DateTime<Utc>,
) -> SweepSummary
where
    P: PetStore,
    I: InventoryStore,
    N: DecayNotifier,
{
    let roster = match pets.list_pets().await {
        Ok(roster) => roster,
        Err(error) => {
            warn!(%error, "Could not list pets; skipping this decay pass");
            return SweepSummary::default();
        }
    };

    let mut summary = SweepSummary::default();
    for (owner, name) in roster {
        match sweep_pet(pets, inventories, notifier, owner, &name, decay_config, lifecycle_config, now)
            .await
        {
            Ok(sweep) => {
                summary.pets_processed = summary.pets_processed.saturating_add(1);
                if sweep.skipped {
                    summary.pets_skipped = summary.pets_skipped.saturating_add(1);
                }
                if sweep.opened.is_some() {
                    summary.cocoons_opened = summary.cocoons_opened.saturating_add(1);
                }
                if sweep.entered.is_some() {
                    summary.cocoons_entered = summary.cocoons_entered.saturating_add(1);
                }
                summary.alerts_sent = summary.alerts_sent.saturating_add(sweep.alerts);
            }
            Err(error) => {
                summary.pets_failed = summary.pets_failed.saturating_add(1);
                warn!(owner = %owner, pet = %name, %error, "Decay failed for pet; continuing");
            }
        }
        // Stay cooperative between pets.
        tokio::task::yield_now().await;
    }
    summary
}

/// Sweep a single pet: finalize a due cocoon, decay vitals, check HP
/// exhaustion, persist, notify.
#[allow(clippy::too_many_arguments)]
async fn sweep_pet<P, I, N>(
    pets: &P,
    inventories: &I,
    notifier: &N,
    owner: OwnerId,
    name: &str,
    decay_config: &DecayConfig,
    lifecycle_config: &LifecycleConfig,
    now: DateTime<Utc>,
) -> Result<PetSweep, KeeperError>
where
    P: PetStore,
    I: InventoryStore,
    N: DecayNotifier,
{
    let Some(mut pet) = pets.load_pet(owner, name).await? else {
        return Ok(PetSweep {
            skipped: true,
            ..PetSweep::default()
        });
    };

    // Dead pets are frozen; unhatched eggs are inert.
    if pet.dead || !pet.hatched {
        return Ok(PetSweep {
            skipped: true,
            ..PetSweep::default()
        });
    }

    // Finalize a due cocoon before anything else so countdowns survive
    // process restarts. A still-counting cocoon suspends decay for the
    // sliver of time it lasts.
    let mut opened = None;
    if pet.cocoon.is_some() {
        let Some(outcome) = lifecycle::complete_cocoon(&mut pet, now, lifecycle_config) else {
            return Ok(PetSweep::default());
        };
        pets.save_pet(owner, &pet).await?;
        if outcome == CocoonOutcome::Reincarnated {
            let mut inv = inventories.load_inventory(owner).await?;
            inventory::add_item(&mut inv, Item::ChaoEgg, 1)?;
            inventories.save_inventory(owner, &inv).await?;
        }
        opened = Some(outcome);
        // The cocoon may have left the pet dead or as an egg.
        if pet.dead || !pet.hatched {
            return Ok(PetSweep {
                opened,
                ..PetSweep::default()
            });
        }
    }

    let outcome = decay::decay_vitals(&mut pet, decay_config, now);

    // An emptied HP gauge heads into the reincarnate/die fork.
    let mut entered = None;
    if let Some(kind) = lifecycle::check_hp_exhaustion(&pet, lifecycle_config)
        && lifecycle::enter_cocoon(&mut pet, kind, now, lifecycle_config)
    {
        entered = Some(kind);
    }

    if outcome.dirty || entered.is_some() {
        pets.save_pet(owner, &pet).await?;
    }

    // Alerts go out only after the decayed state is safely persisted,
    // so a failed save re-crosses (and re-alerts) on the next pass
    // instead of alerting for state that never stuck.
    let mut alerts: u32 = 0;
    for threshold in &outcome.hp_crossings {
        notifier.hp_threshold_crossed(owner, name, *threshold, pet.hp.ticks);
        alerts = alerts.saturating_add(1);
    }

    Ok(PetSweep {
        skipped: false,
        opened,
        entered,
        alerts,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, TimeZone};
    use garden_db::MemoryStore;
    use garden_types::{Grade, PetSnapshot, VitalStat};

    use crate::notify::RecordingNotifier;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap_or_default()
    }

    fn minutes(m: i64) -> DateTime<Utc> {
        at(m.saturating_mul(60))
    }

    fn fresh(name: &str) -> PetSnapshot {
        let mut pet = PetSnapshot::fresh(name.to_owned(), [Grade::D; 5], at(0));
        for vital in VitalStat::ALL {
            pet.gauge_mut(vital).last_decay = Some(minutes(0));
        }
        pet
    }

    async fn seed(store: &MemoryStore, owner: u64, pet: &PetSnapshot) {
        assert!(store.save_pet(OwnerId::new(owner), pet).await.is_ok());
    }

    #[tokio::test]
    async fn empty_garden_is_a_no_op() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let summary = decay_pass(
            &store,
            &store,
            &notifier,
            &DecayConfig::default(),
            &LifecycleConfig::default(),
            minutes(500),
        )
        .await;
        assert_eq!(summary, SweepSummary::default());
    }

    #[tokio::test]
    async fn pass_decays_every_owners_pets() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        seed(&store, 1, &fresh("a")).await;
        seed(&store, 2, &fresh("b")).await;

        let summary = decay_pass(
            &store,
            &store,
            &notifier,
            &DecayConfig::default(),
            &LifecycleConfig::default(),
            minutes(400),
        )
        .await;
        assert_eq!(summary.pets_processed, 2);
        assert_eq!(summary.pets_failed, 0);

        // 400 minutes = 2 belly blocks of 180.
        let pet = store.load_pet(OwnerId::new(1), "a").await.ok().flatten();
        assert_eq!(pet.map(|p| p.belly.ticks), Some(8));
    }

    #[tokio::test]
    async fn one_bad_pet_does_not_halt_the_pass() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        seed(&store, 1, &fresh("glitch")).await;
        seed(&store, 1, &fresh("healthy")).await;
        store.poison(OwnerId::new(1), "glitch");

        let summary = decay_pass(
            &store,
            &store,
            &notifier,
            &DecayConfig::default(),
            &LifecycleConfig::default(),
            minutes(400),
        )
        .await;
        assert_eq!(summary.pets_failed, 1);

        let pet = store.load_pet(OwnerId::new(1), "healthy").await.ok().flatten();
        assert_eq!(pet.map(|p| p.belly.ticks), Some(8));
    }

    #[tokio::test]
    async fn dead_pets_are_left_frozen() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let mut corpse = fresh("ghost");
        corpse.dead = true;
        corpse.belly.ticks = 4;
        seed(&store, 1, &corpse).await;

        let summary = decay_pass(
            &store,
            &store,
            &notifier,
            &DecayConfig::default(),
            &LifecycleConfig::default(),
            minutes(10_000),
        )
        .await;
        assert_eq!(summary.pets_skipped, 1);
        let pet = store.load_pet(OwnerId::new(1), "ghost").await.ok().flatten();
        assert_eq!(pet.map(|p| p.belly.ticks), Some(4));
    }

    #[tokio::test]
    async fn hp_alert_fires_once_per_crossing() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let mut pet = fresh("wilty");
        pet.belly.ticks = 0;
        pet.hp.ticks = 4;
        seed(&store, 9, &pet).await;

        // One HP block: 4 -> 3 crosses the "3" threshold.
        let _ = decay_pass(
            &store,
            &store,
            &notifier,
            &DecayConfig::default(),
            &LifecycleConfig::default(),
            minutes(720),
        )
        .await;
        assert_eq!(
            notifier.alerts(),
            vec![(OwnerId::new(9), String::from("wilty"), 3, 3)]
        );

        // Re-running at the same instant must not re-alert.
        let _ = decay_pass(
            &store,
            &store,
            &notifier,
            &DecayConfig::default(),
            &LifecycleConfig::default(),
            minutes(720),
        )
        .await;
        assert_eq!(notifier.alerts().len(), 1);
    }

    #[tokio::test]
    async fn exhausted_hp_enters_the_fork_and_later_completes() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let config = LifecycleConfig::default();
        let mut pet = fresh("fading");
        pet.belly.ticks = 0;
        pet.hp.ticks = 1;
        pet.happiness.ticks = 2; // at or below the floor: the fork dies
        seed(&store, 3, &pet).await;

        let summary = decay_pass(
            &store,
            &store,
            &notifier,
            &DecayConfig::default(),
            &config,
            minutes(720),
        )
        .await;
        assert_eq!(summary.cocoons_entered, 1);
        let stored = store.load_pet(OwnerId::new(3), "fading").await.ok().flatten();
        let kind = stored.and_then(|p| p.cocoon).map(|c| c.kind);
        assert_eq!(kind, Some(CocoonKind::Dying));

        // Sixty seconds later the scheduler finalizes the death.
        let later = minutes(720)
            .checked_add_signed(ChronoDuration::seconds(60))
            .unwrap_or_else(|| minutes(721));
        let summary = decay_pass(
            &store,
            &store,
            &notifier,
            &DecayConfig::default(),
            &config,
            later,
        )
        .await;
        assert_eq!(summary.cocoons_opened, 1);
        let stored = store.load_pet(OwnerId::new(3), "fading").await.ok().flatten();
        assert_eq!(stored.map(|p| p.dead), Some(true));
    }

    #[tokio::test]
    async fn reincarnation_on_restart_credits_the_egg() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let config = LifecycleConfig::default();
        let mut pet = fresh("phoenix");
        pet.chao_type.form = garden_types::Form::Fourth;
        pet.stamina.level = 99;
        pet.happiness.ticks = 8;
        assert!(lifecycle::enter_cocoon(
            &mut pet,
            CocoonKind::Reincarnating,
            minutes(0),
            &config
        ));
        seed(&store, 5, &pet).await;

        // The process "restarted"; the next pass finds the due cocoon.
        let summary = decay_pass(
            &store,
            &store,
            &notifier,
            &DecayConfig::default(),
            &config,
            minutes(2),
        )
        .await;
        assert_eq!(summary.cocoons_opened, 1);

        let stored = store.load_pet(OwnerId::new(5), "phoenix").await.ok().flatten();
        let stored = stored.unwrap_or_else(|| fresh("missing"));
        assert_eq!(stored.reincarnations, 1);
        assert!(!stored.hatched);
        assert_eq!(stored.stamina.level, 0);

        let inv = store.load_inventory(OwnerId::new(5)).await.unwrap_or_default();
        assert_eq!(inv.count(Item::ChaoEgg), 1);
    }

    #[tokio::test]
    async fn cocoon_countdown_suspends_decay() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let config = LifecycleConfig::default();
        let mut pet = fresh("wrapped");
        // Thirty seconds into the countdown when the pass arrives.
        assert!(lifecycle::enter_cocoon(
            &mut pet,
            CocoonKind::Evolving,
            at(23_970),
            &config
        ));
        seed(&store, 6, &pet).await;

        let _ = decay_pass(
            &store,
            &store,
            &notifier,
            &DecayConfig::default(),
            &config,
            minutes(400),
        )
        .await;
        let stored = store.load_pet(OwnerId::new(6), "wrapped").await.ok().flatten();
        // Belly untouched while the countdown runs.
        assert_eq!(stored.map(|p| p.belly.ticks), Some(10));
    }

    #[tokio::test]
    async fn loop_stops_gracefully() {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let control = Arc::new(SchedulerControl::new(1));
        seed(&store, 1, &fresh("runner")).await;

        let handle = tokio::spawn(run_decay_loop(
            Arc::clone(&store),
            Arc::clone(&store),
            notifier,
            Arc::clone(&control),
            DecayConfig::default(),
            LifecycleConfig::default(),
        ));

        // Give the loop a moment to run at least one pass.
        tokio::time::sleep(Duration::from_millis(50)).await;
        control.request_stop();
        let result = handle.await.ok();
        assert!(result.is_some_and(|r| r.passes >= 1));
    }
}
