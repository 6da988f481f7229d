//! Side-effect seam between components and the outside world.
//!
//! Components never touch the audio device or a vibration motor directly;
//! they ask a `Feedback` implementation. Requests are fire-and-forget.

use log::debug;

use crate::audio::{AudioSystem, Cue};

/// Sink for audio cues and haptic pulses
pub trait Feedback {
    /// Request a sound cue
    fn cue(&mut self, cue: Cue);

    /// Request a vibration pattern (alternating on/off milliseconds)
    fn vibrate(&mut self, pattern_ms: &[u32]);
}

/// Desktop outputs: cues go to the shared audio system, haptics are unsupported
pub struct DesktopFeedback {
    audio: &'static AudioSystem,
}

impl DesktopFeedback {
    pub fn new(audio: &'static AudioSystem) -> Self {
        Self { audio }
    }
}

impl Feedback for DesktopFeedback {
    fn cue(&mut self, cue: Cue) {
        self.audio.play(cue);
    }

    fn vibrate(&mut self, pattern_ms: &[u32]) {
        // No vibration motor on desktop; feature-detect-and-skip
        debug!("haptic pattern {:?} skipped (unsupported)", pattern_ms);
    }
}

/// Captures every request, for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub cues: Vec<Cue>,
    pub pulses: Vec<Vec<u32>>,
}

#[cfg(test)]
impl Recorder {
    pub fn count(&self, cue: Cue) -> usize {
        self.cues.iter().filter(|&&c| c == cue).count()
    }
}

#[cfg(test)]
impl Feedback for Recorder {
    fn cue(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    fn vibrate(&mut self, pattern_ms: &[u32]) {
        self.pulses.push(pattern_ms.to_vec());
    }
}
