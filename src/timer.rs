//! Cooperative timers driven by frame deltas.
//!
//! Nothing here reads a clock. Owners advance their timers with the frame
//! delta and then drain fires one at a time, so a component can stop
//! mid-frame (e.g. progress hits 100) without over-counting. A timer lives
//! in an `Option` slot: cancelling is `take()`, replacing is assignment, and
//! a slot can never hold two timers.

use std::time::Duration;

/// Fixed-period repeating timer
#[derive(Debug, Clone)]
pub struct Interval {
    period: Duration,
    pending: Duration,
}

impl Interval {
    /// Create an interval; the first fire happens one full period from now.
    ///
    /// A zero period is bumped to 1 ms so draining always terminates.
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            pending: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Accumulate elapsed time
    pub fn advance(&mut self, dt: Duration) {
        self.pending += dt;
    }

    /// Consume one period if one is due
    pub fn fire(&mut self) -> bool {
        if self.pending >= self.period {
            self.pending -= self.period;
            true
        } else {
            false
        }
    }

    /// Time accrued past the most recent fire
    pub fn since_fire(&self) -> Duration {
        self.pending
    }

    /// Fraction of the current period already elapsed (0..1)
    pub fn phase(&self) -> f32 {
        (self.pending.as_secs_f32() / self.period.as_secs_f32()).min(1.0)
    }
}

/// Advance the interval in `slot` (if any) and report whether it fired once.
///
/// Call in a `while` loop to drain every due fire.
pub fn fire_slot(slot: &mut Option<Interval>) -> bool {
    slot.as_mut().is_some_and(Interval::fire)
}

/// Advance whatever interval is in `slot`
pub fn advance_slot(slot: &mut Option<Interval>, dt: Duration) {
    if let Some(interval) = slot.as_mut() {
        interval.advance(dt);
    }
}

/// One-shot timer with progress reporting (used for fades and the flash)
#[derive(Debug, Clone)]
pub struct Timeout {
    duration: Duration,
    elapsed: Duration,
}

impl Timeout {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    /// Elapsed fraction in [0, 1]; a zero-length timeout is always complete
    pub fn fraction(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_interval_fires_once_per_period() {
        let mut interval = Interval::new(16 * MS);
        interval.advance(15 * MS);
        assert!(!interval.fire());
        interval.advance(MS);
        assert!(interval.fire());
        assert!(!interval.fire());
    }

    #[test]
    fn test_interval_catches_up_after_long_frame() {
        let mut interval = Interval::new(16 * MS);
        interval.advance(50 * MS);

        let mut fires = 0;
        while interval.fire() {
            fires += 1;
        }
        assert_eq!(fires, 3);
        // 2 ms carried into the next period
        assert_eq!(interval.since_fire(), 2 * MS);
        interval.advance(14 * MS);
        assert!(interval.fire());
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let mut interval = Interval::new(Duration::ZERO);
        interval.advance(3 * MS);
        let mut fires = 0;
        while interval.fire() {
            fires += 1;
        }
        assert_eq!(fires, 3);
    }

    #[test]
    fn test_empty_slot_never_fires() {
        let mut slot: Option<Interval> = None;
        advance_slot(&mut slot, Duration::from_secs(10));
        assert!(!fire_slot(&mut slot));
    }

    #[test]
    fn test_replacing_slot_discards_old_timer() {
        let mut slot = Some(Interval::new(16 * MS));
        advance_slot(&mut slot, 15 * MS);
        slot = Some(Interval::new(16 * MS));
        advance_slot(&mut slot, MS);
        assert!(!fire_slot(&mut slot));
    }

    #[test]
    fn test_timeout_fraction() {
        let mut timeout = Timeout::new(400 * MS);
        assert_eq!(timeout.fraction(), 0.0);
        timeout.advance(100 * MS);
        assert!((timeout.fraction() - 0.25).abs() < 1e-6);
        assert_eq!(timeout.remaining(), 300 * MS);
        timeout.advance(Duration::from_secs(5));
        assert!(timeout.is_done());
        assert_eq!(timeout.fraction(), 1.0);
        assert_eq!(timeout.remaining(), Duration::ZERO);
        assert!(Timeout::new(Duration::ZERO).is_done());
    }
}
