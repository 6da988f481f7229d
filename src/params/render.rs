//! Window, overlay and transition configuration.

use std::time::Duration;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (logical pixels)
    pub window_width: u32,

    /// Window height (logical pixels)
    pub window_height: u32,

    /// Start in borderless fullscreen
    pub fullscreen: bool,

    /// Longest frame delta fed to the timers
    /// A stalled frame catches up at most this much
    pub max_frame_step: Duration,

    /// Terminal font size (logical pixels)
    pub terminal_font_px: f32,

    /// Terminal line height (logical pixels)
    pub terminal_line_px: f32,

    /// Terminal column width (logical pixels, max-w-lg)
    pub terminal_width_px: f32,

    /// Terminal height as a fraction of the window (h-[80vh])
    pub terminal_height_fraction: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 800,
            fullscreen: false,
            max_frame_step: Duration::from_millis(100),
            terminal_font_px: 14.0,
            terminal_line_px: 22.0,
            terminal_width_px: 512.0,
            terminal_height_fraction: 0.8,
        }
    }
}

/// Scene transitions
#[derive(Debug, Clone)]
pub struct TransitionConfig {
    /// Flash overlay shown between authorization and the terminal
    /// None = swap immediately
    pub flash: Option<Duration>,

    /// Delay before the scene starts fading in
    pub intro_delay: Duration,

    /// Fade-in duration
    pub intro_fade: Duration,

    /// Haptic pattern requested by the root on authorization
    pub authorize_pulse_ms: Vec<u32>,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            flash: Some(Duration::from_millis(400)),
            intro_delay: Duration::from_millis(500),
            intro_fade: Duration::from_millis(2000),
            authorize_pulse_ms: vec![100, 30, 200],
        }
    }
}

/// Cyan accent used throughout (#00f0ff)
pub const ACCENT: [f32; 3] = [0.0, 240.0 / 255.0, 1.0];
