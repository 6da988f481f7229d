//! Procedural audio cues.
//!
//! Cues are synthesized on demand from oscillators, noise, filters and
//! parameter envelopes, then mixed into one lazily opened cpal stream.

mod cue;
mod export;
mod synth;
mod system;

pub use cue::Cue;
pub use export::export_cues;
pub use system::AudioSystem;
