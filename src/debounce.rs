//! Quiet-period debouncing with an explicit clock
//!
//! Resize notifications arrive in bursts (mobile browsers show and hide their
//! toolbars while scrolling). Only the last value of a burst matters, and it
//! should take effect once the burst has been quiet for a while.
//!
//! Timestamps are milliseconds on any monotonic clock the caller chooses
//! (`performance.now()` in the browser, a virtual clock in simulations).

/// Holds the latest pending value until its quiet period has elapsed.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    quiet_ms: f64,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: f64,
}

impl<T> Debouncer<T> {
    pub fn new(quiet_ms: u32) -> Self {
        Self { quiet_ms: quiet_ms as f64, pending: None }
    }

    /// Record an event at `now`, replacing any pending value and restarting
    /// the quiet period.
    pub fn trigger(&mut self, value: T, now: f64) {
        self.pending = Some(Pending { value, deadline: now + self.quiet_ms });
    }

    /// Take the pending value if its quiet period has elapsed by `now`.
    pub fn poll(&mut self, now: f64) -> Option<T> {
        let due = self.pending.as_ref().is_some_and(|p| now >= p.deadline);
        if due {
            self.fire()
        } else {
            None
        }
    }

    /// Take the pending value regardless of time.
    ///
    /// For hosts that run their own timer and already know the quiet period
    /// has passed.
    pub fn fire(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop any pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<f64> {
        self.pending.as_ref().map(|p| p.deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event_fires_after_quiet_period() {
        let mut debouncer = Debouncer::new(100);
        debouncer.trigger("a", 0.0);
        assert_eq!(debouncer.poll(99.9), None);
        assert_eq!(debouncer.poll(100.0), Some("a"));
        assert_eq!(debouncer.poll(200.0), None);
    }

    #[test]
    fn test_burst_yields_only_last_value() {
        let mut debouncer = Debouncer::new(100);
        let mut applied = Vec::new();

        // 10 events 10ms apart, polled every millisecond
        for tick in 0..=400u32 {
            let now = tick as f64;
            if tick % 10 == 0 && tick < 100 {
                debouncer.trigger(tick, now);
            }
            if let Some(value) = debouncer.poll(now) {
                applied.push((value, now));
            }
        }

        assert_eq!(applied, vec![(90, 190.0)]);
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut debouncer = Debouncer::new(100);
        debouncer.trigger(1, 0.0);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(1000.0), None);
    }

    #[test]
    fn test_fire_ignores_clock() {
        let mut debouncer = Debouncer::new(100);
        debouncer.trigger(5, 0.0);
        assert_eq!(debouncer.deadline(), Some(100.0));
        assert_eq!(debouncer.fire(), Some(5));
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn test_zero_quiet_period_is_immediate() {
        let mut debouncer = Debouncer::new(0);
        debouncer.trigger('x', 42.0);
        assert_eq!(debouncer.poll(42.0), Some('x'));
    }
}
