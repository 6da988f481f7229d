//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (milliseconds, pixels, percent)
//! - Documented ranges and meanings
//! - Defaults matching the reference experience

mod audio;
mod particles;
mod render;
mod reveal;
mod scan;

// Re-export all types
pub use audio::{audio_constants, AudioConfig};
pub use particles::ParticleParams;
pub use render::{RenderConfig, TransitionConfig, ACCENT};
pub use reveal::{RevealTiming, NOISE_ALPHABET};
pub use scan::{ScanGeometry, ScanTiming};
