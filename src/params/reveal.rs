//! Terminal reveal timing.

use std::time::Duration;

/// Character reveal, cursor and scramble timing
#[derive(Debug, Clone)]
pub struct RevealTiming {
    /// One character is appended per tick
    pub char_period: Duration,

    /// Cursor on/off half period
    pub cursor_period: Duration,

    /// Scramble lock tick (one character locks per tick)
    pub scramble_period: Duration,

    /// Scroll easing rate (fraction of the remaining distance per second)
    /// Higher = snappier follow
    pub scroll_follow_rate: f32,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            char_period: Duration::from_millis(20),
            cursor_period: Duration::from_millis(500),
            scramble_period: Duration::from_millis(25),
            scroll_follow_rate: 12.0,
        }
    }
}

/// Characters a scrambled token cycles through before it locks
pub const NOISE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789#%&@$*";
