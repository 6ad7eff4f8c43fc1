#![forbid(unsafe_code)]

//! Trailing-edge debouncer.
//!
//! The only scheduling primitive in the widget: rapid search keystrokes poke
//! the debouncer, and the filter runs once after input has quiesced for the
//! configured delay. A newer poke supersedes the pending run by pushing the
//! deadline out; there is no leading-edge mode.
//!
//! Time is injected by the caller rather than read ambiently, so the host
//! owns the event loop and tests drive the clock:
//!
//! ```
//! use droplist_core::Debouncer;
//! use web_time::{Duration, Instant};
//!
//! let debounce = Debouncer::new(Duration::from_millis(250));
//! let t0 = Instant::now();
//! debounce.poke(t0);
//! assert!(!debounce.fire_ready(t0 + Duration::from_millis(100)));
//! assert!(debounce.fire_ready(t0 + Duration::from_millis(250)));
//! ```

use std::cell::Cell;
use web_time::{Duration, Instant};

/// A single pending-run, trailing-edge debounce window.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Cell<Option<Instant>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiescence delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: Cell::new(None),
        }
    }

    /// The configured delay.
    #[inline]
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Record an input at `now`, arming (or pushing out) the deadline.
    pub fn poke(&self, now: Instant) {
        self.deadline.set(Some(now + self.delay));
    }

    /// Whether a run is pending.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.get().is_some()
    }

    /// Consume the pending run if the deadline has passed.
    ///
    /// Returns true at most once per armed window; the caller performs the
    /// debounced work when it does.
    #[must_use = "a ready debounce must trigger the pending work"]
    pub fn fire_ready(&self, now: Instant) -> bool {
        match self.deadline.get() {
            Some(deadline) if now >= deadline => {
                self.deadline.set(None);
                true
            }
            _ => false,
        }
    }

    /// Drop any pending run.
    pub fn cancel(&self) {
        self.deadline.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(250);

    #[test]
    fn does_not_fire_before_deadline() {
        let debounce = Debouncer::new(DELAY);
        let t0 = Instant::now();
        debounce.poke(t0);
        assert!(debounce.is_pending());
        assert!(!debounce.fire_ready(t0 + Duration::from_millis(249)));
        assert!(debounce.is_pending());
    }

    #[test]
    fn fires_exactly_once_after_quiescence() {
        let debounce = Debouncer::new(DELAY);
        let t0 = Instant::now();
        debounce.poke(t0);
        assert!(debounce.fire_ready(t0 + DELAY));
        // Consumed: no second fire without a new poke.
        assert!(!debounce.fire_ready(t0 + DELAY * 2));
        assert!(!debounce.is_pending());
    }

    #[test]
    fn newer_poke_supersedes_pending_run() {
        let debounce = Debouncer::new(DELAY);
        let t0 = Instant::now();
        debounce.poke(t0);
        // A keystroke halfway through the window pushes the deadline out.
        debounce.poke(t0 + Duration::from_millis(100));
        assert!(!debounce.fire_ready(t0 + Duration::from_millis(250)));
        assert!(debounce.fire_ready(t0 + Duration::from_millis(350)));
    }

    #[test]
    fn cancel_drops_pending_run() {
        let debounce = Debouncer::new(DELAY);
        let t0 = Instant::now();
        debounce.poke(t0);
        debounce.cancel();
        assert!(!debounce.is_pending());
        assert!(!debounce.fire_ready(t0 + DELAY));
    }

    #[test]
    fn idle_debouncer_never_fires() {
        let debounce = Debouncer::new(DELAY);
        assert!(!debounce.fire_ready(Instant::now()));
    }
}
