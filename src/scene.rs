//! Root composition: idle scanner → flash → terminal reveal.
//!
//! The particle field is always present. While idle the scanner receives
//! pointer input; the first authorization flips the view state (once, for
//! good), accelerates the particles and, after the optional flash, mounts
//! the reveal display in the scanner's place.

use std::time::Duration;

use crate::content::Content;
use crate::feedback::Feedback;
use crate::params::{ParticleParams, RevealTiming, ScanTiming, TransitionConfig};
use crate::particles::ParticleField;
use crate::reveal::RevealDisplay;
use crate::scan::{Button, ScanControl};
use crate::timer::Timeout;

/// Top-level view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Authorized,
}

/// Which foreground component is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Scanner,
    Reveal,
}

/// Everything the scene is built from
#[derive(Debug, Clone, Default)]
pub struct SceneConfig {
    pub scan: ScanTiming,
    pub reveal: RevealTiming,
    pub particles: ParticleParams,
    pub transition: TransitionConfig,
    pub content: Content,
    /// Seed for particle placement and scramble noise
    pub seed: u64,
}

pub struct Scene {
    config: SceneConfig,
    state: ViewState,
    scan: ScanControl,
    reveal: Option<RevealDisplay>,
    particles: ParticleField,
    flash: Option<Timeout>,
    intro_delay: Timeout,
    intro_fade: Timeout,
    /// Terminal viewport and line height (pixels) for bottom tracking
    terminal_metrics: (f32, f32),
    clock_s: f32,
}

impl Scene {
    pub fn new(config: SceneConfig, width: f32, height: f32) -> Self {
        let particles = ParticleField::new(config.particles.clone(), width, height, config.seed);
        Self {
            scan: ScanControl::new(config.scan.clone()),
            intro_delay: Timeout::new(config.transition.intro_delay),
            intro_fade: Timeout::new(config.transition.intro_fade),
            config,
            state: ViewState::Idle,
            reveal: None,
            particles,
            flash: None,
            terminal_metrics: (0.0, 0.0),
            clock_s: 0.0,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.particles.resize(width, height);
    }

    pub fn set_terminal_metrics(&mut self, viewport_px: f32, line_px: f32) {
        self.terminal_metrics = (viewport_px, line_px);
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.set_viewport(viewport_px, line_px);
        }
    }

    pub fn pointer_down(&mut self, button: Button, fx: &mut dyn Feedback) {
        if self.child() == Child::Scanner && self.state == ViewState::Idle {
            self.scan.press(button, fx);
        }
    }

    pub fn pointer_up(&mut self) {
        self.scan.release();
    }

    pub fn pointer_leave(&mut self) {
        self.scan.leave();
    }

    /// Advance every component by `dt`
    pub fn update(&mut self, dt: Duration, fx: &mut dyn Feedback) {
        self.clock_s += dt.as_secs_f32();

        if self.intro_delay.is_done() {
            self.intro_fade.advance(dt);
        } else {
            self.intro_delay.advance(dt);
        }

        self.particles.update(dt.as_secs_f32());

        // Components started during this frame only get the time after
        // their start, so existing ones advance first
        if let Some(reveal) = self.reveal.as_mut() {
            reveal.update(dt, fx);
        }

        self.advance_flash(dt, fx);

        if let Some(authorized) = self.scan.update(dt, fx) {
            self.authorize(authorized.since, fx);
        }
    }

    fn advance_flash(&mut self, dt: Duration, fx: &mut dyn Feedback) {
        let Some(flash) = self.flash.as_mut() else {
            return;
        };
        let leftover = dt.saturating_sub(flash.remaining());
        flash.advance(dt);
        if flash.is_done() {
            self.flash = None;
            self.mount_reveal(leftover, fx);
        }
    }

    fn authorize(&mut self, since: Duration, fx: &mut dyn Feedback) {
        if self.state == ViewState::Authorized {
            return;
        }
        log::info!("scan complete, access authorized");
        self.state = ViewState::Authorized;
        fx.vibrate(&self.config.transition.authorize_pulse_ms);
        self.particles.set_authorized(true);

        match self.config.transition.flash {
            Some(duration) => {
                self.flash = Some(Timeout::new(duration));
                self.advance_flash(since, fx);
            }
            None => self.mount_reveal(since, fx),
        }
    }

    /// Mount the terminal `elapsed` into the current frame
    fn mount_reveal(&mut self, elapsed: Duration, fx: &mut dyn Feedback) {
        let mut reveal = RevealDisplay::new(
            self.config.reveal.clone(),
            &self.config.content,
            self.config.seed,
        );
        let (viewport_px, line_px) = self.terminal_metrics;
        reveal.set_viewport(viewport_px, line_px);
        reveal.update(elapsed, fx);
        self.reveal = Some(reveal);
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn child(&self) -> Child {
        if self.reveal.is_some() {
            Child::Reveal
        } else {
            Child::Scanner
        }
    }

    pub fn scan(&self) -> &ScanControl {
        &self.scan
    }

    pub fn reveal(&self) -> Option<&RevealDisplay> {
        self.reveal.as_ref()
    }

    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    pub fn content(&self) -> &Content {
        &self.config.content
    }

    pub fn clock_s(&self) -> f32 {
        self.clock_s
    }

    /// Opacity of the flash overlay (0 when no flash is playing)
    pub fn flash_alpha(&self) -> f32 {
        self.flash
            .as_ref()
            .map(|flash| 1.0 - flash.fraction())
            .unwrap_or(0.0)
    }

    /// Scene fade-in opacity
    pub fn opacity(&self) -> f32 {
        if self.intro_delay.is_done() {
            self.intro_fade.fraction()
        } else {
            0.0
        }
    }
}
