//! Press-and-hold fingerprint scanner.
//!
//! Holding the primary button fills a progress accumulator on a fixed tick;
//! releasing (or sliding off) starts a decay tick that drains it back to 0.
//! Reaching 100 fires the success cue and haptic pattern and yields
//! [`Authorized`] exactly once, after which the control is inert.

use std::time::Duration;

use crate::audio::Cue;
use crate::feedback::Feedback;
use crate::params::ScanTiming;
use crate::timer::{advance_slot, fire_slot, Interval};

/// Upper bound of scan progress (percent)
pub const FULL: f32 = 100.0;

/// Pointer button that initiated a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Secondary,
    Middle,
    Other,
}

/// Emitted once when progress reaches 100
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorized {
    /// Frame time left over after the completing tick
    pub since: Duration,
}

/// Scanner state and timers
pub struct ScanControl {
    timing: ScanTiming,
    progress: f32,
    pressing: bool,
    complete: bool,

    fill: Option<Interval>,
    decay: Option<Interval>,
    hum: Option<Interval>,

    /// Animation clock (seconds since mount)
    clock_s: f32,
    /// Time since the current press started
    held_for: Duration,
}

impl ScanControl {
    pub fn new(timing: ScanTiming) -> Self {
        Self {
            timing,
            progress: 0.0,
            pressing: false,
            complete: false,
            fill: None,
            decay: None,
            hum: None,
            clock_s: 0.0,
            held_for: Duration::ZERO,
        }
    }

    /// Pointer down on the scanner
    pub fn press(&mut self, button: Button, fx: &mut dyn Feedback) {
        if button != Button::Primary || self.complete || self.pressing {
            return;
        }

        self.pressing = true;
        self.progress = 0.0;
        self.held_for = Duration::ZERO;

        self.decay = None;
        self.fill = Some(Interval::new(self.timing.fill_period));
        self.hum = Some(Interval::new(self.timing.hum_period));

        fx.vibrate(&self.timing.press_pulse_ms);
        fx.cue(Cue::Ping);
        fx.cue(Cue::Hum);
    }

    /// Pointer up
    pub fn release(&mut self) {
        if !self.pressing {
            return;
        }
        self.pressing = false;
        self.fill = None;
        self.hum = None;

        if !self.complete && self.progress > 0.0 {
            self.decay = Some(Interval::new(self.timing.decay_period));
        }
    }

    /// Pointer left the scanner; identical to a release while pressed
    pub fn leave(&mut self) {
        self.release();
    }

    /// Advance timers by `dt`
    ///
    /// Returns `Some(Authorized)` on the tick progress first reaches 100.
    pub fn update(&mut self, dt: Duration, fx: &mut dyn Feedback) -> Option<Authorized> {
        self.clock_s += dt.as_secs_f32();
        if self.pressing {
            self.held_for += dt;
        }

        advance_slot(&mut self.hum, dt);
        while fire_slot(&mut self.hum) {
            fx.cue(Cue::Hum);
        }

        advance_slot(&mut self.decay, dt);
        while fire_slot(&mut self.decay) {
            self.progress = (self.progress - self.timing.decay_step).max(0.0);
            if self.progress <= 0.0 {
                self.decay = None;
            }
        }

        advance_slot(&mut self.fill, dt);
        while fire_slot(&mut self.fill) {
            let next = self.progress + self.timing.fill_step;
            if next >= FULL {
                return Some(self.complete(fx));
            }
            self.progress = next;
        }

        None
    }

    fn complete(&mut self, fx: &mut dyn Feedback) -> Authorized {
        let since = self
            .fill
            .as_ref()
            .map_or(Duration::ZERO, Interval::since_fire);
        self.progress = FULL;
        self.complete = true;
        self.fill = None;
        self.hum = None;
        self.decay = None;

        fx.cue(Cue::Success);
        fx.vibrate(&self.timing.success_pulse_ms);
        Authorized { since }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_pressing(&self) -> bool {
        self.pressing
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Number of live timers (fill, decay, hum)
    pub fn active_timers(&self) -> usize {
        [&self.fill, &self.decay, &self.hum]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    pub fn clock_s(&self) -> f32 {
        self.clock_s
    }

    pub fn held_for(&self) -> Duration {
        self.held_for
    }

    /// Percentage readout, e.g. `[042%]`
    pub fn progress_label(&self) -> String {
        format!("[{:03}%]", self.progress.floor() as u32)
    }

    /// Status caption under the scanner
    pub fn status_label(&self) -> &'static str {
        if self.pressing {
            "SCANNING DNA RIDGES"
        } else {
            "IDENTITY CHECK REQUIRED"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Recorder;

    const TICK: Duration = Duration::from_millis(16);

    fn hold(scan: &mut ScanControl, fx: &mut Recorder, ticks: u32) -> u32 {
        let mut fired = 0;
        for _ in 0..ticks {
            if scan.update(TICK, fx).is_some() {
                fired += 1;
            }
        }
        fired
    }

    #[test]
    fn test_progress_tracks_hold_duration() {
        let mut fx = Recorder::default();
        let mut scan = ScanControl::new(ScanTiming::default());
        scan.press(Button::Primary, &mut fx);

        for tick in 1..=83u32 {
            scan.update(TICK, &mut fx);
            let expected = (tick as f32 * 1.2).min(100.0);
            assert!(
                (scan.progress() - expected).abs() < 1e-3,
                "tick {tick}: {} != {expected}",
                scan.progress()
            );
        }
        assert!(!scan.is_complete());
    }

    #[test]
    fn test_authorizes_exactly_once_at_tick_84() {
        let mut fx = Recorder::default();
        let mut scan = ScanControl::new(ScanTiming::default());
        scan.press(Button::Primary, &mut fx);

        assert_eq!(hold(&mut scan, &mut fx, 83), 0);
        assert!(scan.update(TICK, &mut fx).is_some());
        assert_eq!(scan.progress(), FULL);

        // Keep holding long after completion
        assert_eq!(hold(&mut scan, &mut fx, 200), 0);
        assert_eq!(scan.progress(), FULL);
        assert_eq!(fx.count(Cue::Success), 1);
        assert_eq!(fx.pulses.last(), Some(&vec![100, 50, 200]));
        assert_eq!(scan.active_timers(), 0);
    }

    #[test]
    fn test_single_long_frame_stops_at_completion() {
        let mut fx = Recorder::default();
        let mut scan = ScanControl::new(ScanTiming::default());
        scan.press(Button::Primary, &mut fx);

        // 84 ticks of 16 ms complete the scan 3656 ms into the frame
        let authorized = scan.update(Duration::from_secs(5), &mut fx);
        assert_eq!(
            authorized,
            Some(Authorized {
                since: Duration::from_millis(3656)
            })
        );
        assert_eq!(scan.progress(), FULL);
        assert!(scan.update(Duration::from_secs(5), &mut fx).is_none());
    }

    #[test]
    fn test_release_decays_to_zero_monotonically() {
        let mut fx = Recorder::default();
        let mut scan = ScanControl::new(ScanTiming::default());
        scan.press(Button::Primary, &mut fx);
        hold(&mut scan, &mut fx, 50);
        scan.release();
        assert!(!scan.is_pressing());

        let mut last = scan.progress();
        for _ in 0..100 {
            scan.update(TICK, &mut fx);
            assert!(scan.progress() <= last);
            assert!(scan.progress() >= 0.0);
            last = scan.progress();
        }
        assert_eq!(scan.progress(), 0.0);
        assert_eq!(scan.active_timers(), 0);
    }

    #[test]
    fn test_repress_during_decay_restarts_from_zero() {
        let mut fx = Recorder::default();
        let mut scan = ScanControl::new(ScanTiming::default());
        scan.press(Button::Primary, &mut fx);
        hold(&mut scan, &mut fx, 60);
        scan.leave();
        hold(&mut scan, &mut fx, 2);
        assert!(scan.progress() > 0.0);

        scan.press(Button::Primary, &mut fx);
        assert_eq!(scan.progress(), 0.0);
        // fill + hum, the decay slot was cancelled
        assert_eq!(scan.active_timers(), 2);

        scan.update(TICK, &mut fx);
        assert!((scan.progress() - 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_rapid_cycles_do_not_stack_timers() {
        let mut fx = Recorder::default();
        let mut scan = ScanControl::new(ScanTiming::default());
        for _ in 0..50 {
            scan.press(Button::Primary, &mut fx);
            scan.update(TICK, &mut fx);
            scan.release();
            assert!(scan.active_timers() <= 1);
        }
        // One decay tick per frame, never several stacked ones
        let before = scan.progress();
        scan.update(TICK, &mut fx);
        assert!((before - scan.progress()) <= 6.0 + 1e-4);
    }

    #[test]
    fn test_non_primary_buttons_are_ignored() {
        let mut fx = Recorder::default();
        let mut scan = ScanControl::new(ScanTiming::default());
        for button in [Button::Secondary, Button::Middle, Button::Other] {
            scan.press(button, &mut fx);
        }
        assert!(!scan.is_pressing());
        assert_eq!(scan.active_timers(), 0);
        assert!(fx.cues.is_empty());
        assert!(fx.pulses.is_empty());
    }

    #[test]
    fn test_leave_without_press_is_noop() {
        let mut scan = ScanControl::new(ScanTiming::default());
        scan.leave();
        scan.release();
        assert_eq!(scan.active_timers(), 0);
        assert_eq!(scan.progress(), 0.0);
    }

    #[test]
    fn test_press_cues_and_periodic_hum() {
        let mut fx = Recorder::default();
        let mut scan = ScanControl::new(ScanTiming::default());
        scan.press(Button::Primary, &mut fx);
        assert_eq!(fx.count(Cue::Ping), 1);
        assert_eq!(fx.count(Cue::Hum), 1);
        assert_eq!(fx.pulses, vec![vec![20]]);

        // 800 ms held → two more hums (350, 700)
        hold(&mut scan, &mut fx, 50);
        assert_eq!(fx.count(Cue::Hum), 3);

        scan.release();
        hold(&mut scan, &mut fx, 50);
        assert_eq!(fx.count(Cue::Hum), 3);
    }

    #[test]
    fn test_inert_after_authorization() {
        let mut fx = Recorder::default();
        let mut scan = ScanControl::new(ScanTiming::default());
        scan.press(Button::Primary, &mut fx);
        hold(&mut scan, &mut fx, 84);
        scan.release();
        scan.press(Button::Primary, &mut fx);
        assert_eq!(scan.progress(), FULL);
        assert!(!scan.is_pressing());
        assert_eq!(scan.active_timers(), 0);
    }

    #[test]
    fn test_labels() {
        let mut fx = Recorder::default();
        let mut scan = ScanControl::new(ScanTiming::default());
        assert_eq!(scan.progress_label(), "[000%]");
        assert_eq!(scan.status_label(), "IDENTITY CHECK REQUIRED");

        scan.press(Button::Primary, &mut fx);
        hold(&mut scan, &mut fx, 36);
        assert_eq!(scan.progress_label(), "[043%]");
        assert_eq!(scan.status_label(), "SCANNING DNA RIDGES");
    }
}
