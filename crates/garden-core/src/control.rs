//! Runtime control state for the decay scheduler.
//!
//! Shared atomic state between the scheduler loop and whatever drives
//! it (admin commands, the engine's shutdown handler). The scheduler
//! can be paused, resumed, retuned, and stopped without killing the
//! process; a stop lets the in-flight pass finish.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tokio::sync::Notify;

/// Shared control state for the decay scheduler.
///
/// Wrapped in an `Arc` and shared between the scheduler task and the
/// engine. Atomic fields keep the hot path lock-free.
#[derive(Debug)]
pub struct SchedulerControl {
    /// Whether the scheduler is currently paused.
    paused: AtomicBool,

    /// Notification used to wake the loop when resumed.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Notification used to cut the inter-pass sleep short on stop.
    stop_notify: Notify,

    /// Seconds between decay passes (runtime-adjustable).
    pass_interval_secs: AtomicU64,
}

impl SchedulerControl {
    /// Create control state with the given pass interval.
    pub const fn new(pass_interval_secs: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::const_new(),
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::const_new(),
            pass_interval_secs: AtomicU64::new(pass_interval_secs),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the scheduler is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the scheduler. The loop sleeps until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the scheduler and wake the loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the scheduler is no longer paused (or a stop is
    /// requested, which also ends the wait).
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop: no new passes start, the in-flight pass
    /// finishes.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_waiters();
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Wait until a stop is requested.
    pub async fn stopped(&self) {
        while !self.is_stop_requested() {
            self.stop_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Interval
    // -----------------------------------------------------------------------

    /// Current seconds between decay passes.
    pub fn pass_interval_secs(&self) -> u64 {
        self.pass_interval_secs.load(Ordering::Acquire)
    }

    /// Change the seconds between decay passes (takes effect after the
    /// current sleep).
    pub fn set_pass_interval_secs(&self, secs: u64) {
        self.pass_interval_secs.store(secs.max(1), Ordering::Release);
    }
}
