//! Audio output configuration and constants.

/// Audio output configuration
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Skip every cue request
    pub muted: bool,

    /// Sample rate used when no device rate is known (cue export)
    pub fallback_sample_rate_hz: u32,

    /// Output hard limit (±)
    pub limiter: f32,

    /// Voices playing at once; the oldest is dropped beyond this
    pub max_voices: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            muted: false,
            fallback_sample_rate_hz: 44100,
            limiter: 0.5,
            max_voices: 48,
        }
    }
}

/// Audio constants
pub mod audio_constants {
    /// Floor used for exponential ramps (an exponential ramp cannot reach 0)
    pub const EXP_RAMP_FLOOR: f32 = 0.001;
}
