//! Cancellable one-shot deadlines for the single-threaded event loop.
//!
//! The event loop holds one slot per timer kind (advance, resize-debounce);
//! scheduling replaces any pending deadline, so at most one instance of
//! each kind is ever pending. Firing is edge-triggered: a due deadline is
//! consumed the first time it is observed. All checks take the current
//! `Instant` as an argument, so transitions are testable without a clock.

use std::time::{Duration, Instant};

/// A single pending deadline, or nothing.
#[derive(Debug, Default)]
pub struct OneShot {
    deadline: Option<Instant>,
}

impl OneShot {
    /// An empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm the timer to fire at `now + after`, replacing any pending deadline.
    pub fn schedule(&mut self, now: Instant, after: Duration) {
        self.deadline = Some(now + after);
    }

    /// Disarm the timer.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the deadline if it is due. Returns `true` at most once per
    /// `schedule`.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if now >= at => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// The two timer slots the shell drives.
#[derive(Debug, Default)]
pub struct Timers {
    /// Pending auto-advance.
    pub advance: OneShot,
    /// Pending resize-debounce redisplay.
    pub resize: OneShot,
}

impl Timers {
    /// Earliest pending deadline across all slots, for `WaitUntil`.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.advance.deadline(), self.resize.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
