//! Trailing-edge debounce for typed filter input.
//!
//! The manager never spawns a timer. It records a deadline in a
//! [`Debouncer`] and the host polls it (see
//! [`FilterManager::run_pending`](super::FilterManager::run_pending)) on its
//! own event-loop tick. Time comes from an injected [`Clock`], so tests can
//! step it explicitly with [`ManualClock`].

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Coalescing window used when none is configured.
pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// A monotonic time source.
pub trait Clock {
    /// Returns the time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one clone while the
/// manager owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Creates a clock stopped at its origin.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward.
    pub fn advance(&self, step: Duration) {
        self.now.set(self.now.get().saturating_add(step));
    }

    /// Moves the clock forward by a number of milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Holds at most one pending apply and its deadline.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Duration>,
}

/// Outcome of scheduling a debounced apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
    /// No apply was pending; a new one was scheduled.
    Fresh,
    /// A pending apply was cancelled and rescheduled.
    Superseded,
}

impl Debouncer {
    /// Creates a debouncer with the given coalescing window.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Returns the coalescing window.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns the deadline of the pending apply, if one is scheduled.
    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Returns true when an apply is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Schedules an apply one window after `now`, replacing any pending one.
    pub fn schedule(&mut self, now: Duration) -> Scheduled {
        let previous = self.deadline.replace(now.saturating_add(self.delay));
        if previous.is_some() {
            Scheduled::Superseded
        } else {
            Scheduled::Fresh
        }
    }

    /// Drops the pending apply, returning true if one existed.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Consumes the pending apply if its deadline has been reached.
    pub fn take_due(&mut self, now: Duration) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_DELAY)
    }
}
