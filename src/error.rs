//! Startup and export errors.
//!
//! Runtime feedback (audio, haptics) never surfaces errors. Setting up the
//! window, GPU and inputs can fail; a failed frame is skipped unless the
//! device is out of memory.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("surface creation: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter")]
    Adapter,

    #[error("device request: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("text preparation: {0}")]
    Text(#[from] glyphon::PrepareError),

    #[error("text rendering: {0}")]
    TextRender(#[from] glyphon::RenderError),

    #[error("failed to read message file {}: {source}", path.display())]
    Content {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cue export: {0}")]
    Io(#[from] std::io::Error),

    #[error("wav encoding: {0}")]
    Wav(#[from] hound::Error),
}

impl Error {
    /// Whether a render-time error should stop the app
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Frame(wgpu::SurfaceError::OutOfMemory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_out_of_memory_is_fatal_while_rendering() {
        assert!(Error::Frame(wgpu::SurfaceError::OutOfMemory).is_fatal());
        assert!(!Error::Frame(wgpu::SurfaceError::Timeout).is_fatal());
        assert!(!Error::Text(glyphon::PrepareError::AtlasFull).is_fatal());
        assert!(!Error::TextRender(glyphon::RenderError::RemovedFromAtlas).is_fatal());
    }
}
