//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::content::Content;
use crate::error::Error;
use crate::params::{AudioConfig, RenderConfig};
use crate::scene::SceneConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "omega-access")]
#[command(about = "Biometric scan splash and terminal override reveal", long_about = None)]
pub struct Args {
    /// Window width (logical pixels)
    #[arg(long, value_name = "PX", default_value = "1280")]
    pub width: u32,

    /// Window height (logical pixels)
    #[arg(long, value_name = "PX", default_value = "800")]
    pub height: u32,

    /// Start in borderless fullscreen
    #[arg(long)]
    pub fullscreen: bool,

    /// Disable all sound cues
    #[arg(long)]
    pub mute: bool,

    /// Swap straight to the terminal without the white flash
    #[arg(long)]
    pub no_flash: bool,

    /// Seed for particle placement and scramble noise
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Replace the override message with the contents of a text file
    #[arg(long, value_name = "FILE")]
    pub message: Option<PathBuf>,

    /// Render every sound cue to DIR/<cue>.wav and exit
    #[arg(long, value_name = "DIR")]
    pub export_cues: Option<PathBuf>,
}

impl Args {
    /// Seed to use, drawn at random when not given
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width,
            window_height: self.height,
            fullscreen: self.fullscreen,
            ..RenderConfig::default()
        }
    }

    pub fn audio_config(&self) -> AudioConfig {
        AudioConfig {
            muted: self.mute,
            ..AudioConfig::default()
        }
    }

    /// Scene configuration with message, flash and seed overrides applied
    pub fn scene_config(&self, seed: u64) -> Result<SceneConfig, Error> {
        let content = match &self.message {
            Some(path) => {
                println!("Message: {}", path.display());
                Content::with_message_file(path)?
            }
            None => Content::default(),
        };

        let mut config = SceneConfig {
            content,
            seed,
            ..SceneConfig::default()
        };
        if self.no_flash {
            config.transition.flash = None;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["omega-access"]);
        let render = args.render_config();
        assert_eq!((render.window_width, render.window_height), (1280, 800));
        assert!(!render.fullscreen);
        assert!(!args.audio_config().muted);

        let scene = args.scene_config(7).unwrap();
        assert_eq!(scene.seed, 7);
        assert!(scene.transition.flash.is_some());
        assert_eq!(scene.content.message, Content::default().message);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "omega-access",
            "--width",
            "640",
            "--height",
            "480",
            "--fullscreen",
            "--mute",
            "--no-flash",
            "--seed",
            "42",
        ]);
        assert_eq!(args.seed(), 42);
        assert_eq!(args.render_config().window_width, 640);
        assert!(args.render_config().fullscreen);
        assert!(args.audio_config().muted);
        assert!(args.scene_config(42).unwrap().transition.flash.is_none());
    }

    #[test]
    fn test_missing_message_file_is_an_error() {
        let args = Args::parse_from(["omega-access", "--message", "/nonexistent/omega.txt"]);
        assert!(matches!(args.scene_config(0), Err(Error::Content { .. })));
    }
}
