//! Omega Access - biometric scan splash with a terminal override reveal

pub mod audio;
pub mod cli;
pub mod content;
pub mod error;
pub mod feedback;
pub mod input;
pub mod params;
pub mod particles;
pub mod rendering;
pub mod reveal;
pub mod scan;
pub mod scene;
pub mod timer;
