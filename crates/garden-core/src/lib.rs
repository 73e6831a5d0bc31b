//! Orchestration for the Chao Garden lifecycle engine.
//!
//! This crate ties the pure pet domain to the persistence gateway: the
//! [`keeper::GardenKeeper`] serves every user-facing operation (hatch,
//! feed, cocoon polling, admin overrides, observation) and the
//! [`scheduler`] advances time-based decay for every stored pet on a
//! fixed cadence, independent of user actions.
//!
//! # Modules
//!
//! - [`keeper`] -- User-facing operation orchestration
//! - [`decay`] -- Pure per-vital decay arithmetic
//! - [`scheduler`] -- The recurring decay sweep and its loop
//! - [`control`] -- Pause/resume/stop state for the scheduler
//! - [`notify`] -- Owner notification trait for decay alerts
//! - [`presenter`] -- Presentation Adapter trait and stub
//! - [`config`] -- YAML configuration loading
//! - [`error`] -- The keeper error taxonomy

pub mod config;
pub mod control;
pub mod decay;
pub mod error;
pub mod keeper;
pub mod notify;
pub mod presenter;
pub mod scheduler;

pub use config::{ConfigError, GardenConfig};
pub use control::SchedulerControl;
pub use decay::{DecayConfig, DecayRule};
pub use error::KeeperError;
pub use keeper::{CocoonPoll, GardenKeeper};
pub use notify::{DecayNotifier, RecordingNotifier, TracingNotifier};
pub use presenter::{ImageRef, PresentError, Presenter, StubPresenter};
pub use scheduler::{decay_pass, run_decay_loop, SchedulerResult, SweepSummary};
