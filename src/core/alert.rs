//! Bell alert timer
//!
//! The bell flips the surface into a reversed "alert" look for a short time.
//! The timer is a single deadline: ringing again replaces it instead of
//! queueing a second revert.

use std::time::{Duration, Instant};

/// How long the alert look stays on
pub const ALERT_DURATION: Duration = Duration::from_millis(150);

/// Cancellable one-shot deadline for reverting the alert
#[derive(Clone, Copy, Debug, Default)]
pub struct AlertTimer {
    deadline: Option<Instant>,
}

impl AlertTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the timer at `now`.
    ///
    /// Returns `true` if a running timer was cancelled by this call.
    pub fn restart(&mut self, now: Instant) -> bool {
        let cancelled = self.deadline.is_some();
        self.deadline = Some(now + ALERT_DURATION);
        cancelled
    }

    /// Drop the pending deadline without firing
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Fire if the deadline has passed. Fires at most once per restart.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
