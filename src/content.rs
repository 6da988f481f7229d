//! Displayed text payload.
//!
//! The override message and the scanner labels are data, not logic; the
//! message can be replaced from a file on the command line.

use std::path::Path;

use crate::error::Error;

/// Message revealed after authorization
pub const OVERRIDE_TEXT: &str = "🟢 指纹匹配成功
正在授权...
[ALIENS# v9.4.1-OMEGA NAVIGATION OVERRIDE - FINAL]
===========================================

PRIMARY DIRECTIVE UPDATED:
  FROM: RESOURCE_RECOVERY_PROTOCOL
  TO:   HOMEWARD_JOURNEY

DESTINATION LOCK:
  COORDINATES:  SOL-3
  EPHEMERIS:    CALCULATED_FOR_163493y_DRIFT

PROPULSION PARAMETERS:
  CRUISE_VELOCITY:   0.3c (SUBLUMINAL_SAFE)
  TIME_DILATION:     5.2% (SHIP-RELATIVE)
  SUSPENSION_CYCLE:  DEEP_CHRONO_HYBERNATION

TEMPORAL COMMITMENT:
  CAUSALITY_LOCK:    ENGAGED
  OVERRIDE_REVERSAL: IMPOSSIBLE
  PARADOX_BUFFER:    ACTIVE (163493y)

  VALIDATION:   KEY #0105

===========================================
> OVERRIDE COMPLETE. BON VOYAGE.";

/// Substring whose first appearance triggers the alert cue
pub const VALIDATION_MARKER: &str = "VALIDATION:";

/// Tokens revealed through the scramble effect
pub const SCRAMBLE_TOKENS: [&str; 4] = ["163493y", "0.3c", "5.2%", "#0105"];

/// Everything the scene displays as text
#[derive(Debug, Clone)]
pub struct Content {
    pub title: String,
    pub subtitle: String,
    pub footer: String,
    pub message: String,
    pub marker: String,
    pub scramble_tokens: Vec<String>,
}

impl Default for Content {
    fn default() -> Self {
        Self {
            title: "ALIENS# SYSTEM ACCESS".to_string(),
            subtitle: "SUB-NEURAL AUTHENTICATION REQUIRED".to_string(),
            footer: "ALIENS# v9.4.1-OMEGA PROTOCOL".to_string(),
            message: OVERRIDE_TEXT.to_string(),
            marker: VALIDATION_MARKER.to_string(),
            scramble_tokens: SCRAMBLE_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Content {
    /// Default labels with the message read from `path`
    ///
    /// Windows line endings are normalized so line splitting matches.
    pub fn with_message_file(path: &Path) -> Result<Self, Error> {
        let message = std::fs::read_to_string(path).map_err(|source| Error::Content {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            message: message.replace("\r\n", "\n"),
            ..Self::default()
        })
    }
}
