use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::geometry::{AspectRatio, Rotation};

/// Which physical sensor the use cases are bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LensFacing {
    Front,
    Back,
}

impl LensFacing {
    pub fn toggled(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

/// Latency/quality trade-off for the still-capture use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    #[default]
    MinimizeLatency,
    MaximizeQuality,
}

/// Configuration for a camera session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Preferred initial sensor. The session falls back to probing back then
    /// front when the preference is absent or unavailable.
    pub preferred_facing: Option<LensFacing>,

    /// Latency/quality trade-off for still capture.
    pub capture_mode: CaptureMode,

    /// Directory where captured photos are written.
    pub output_directory: PathBuf,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.output_directory.as_os_str().is_empty() {
            return Err("output directory must not be empty".into());
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            preferred_facing: None,
            capture_mode: CaptureMode::default(),
            output_directory: PathBuf::from("."),
        }
    }
}

/// Target configuration shared by all three use cases of one bind.
///
/// The aspect ratio and rotation are derived from the display at bind time,
/// never configured directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseCaseConfig {
    pub aspect_ratio: AspectRatio,
    pub rotation: Rotation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_output_directory_rejected() {
        let config = SessionConfig {
            output_directory: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn toggling_lens_facing_round_trips() {
        assert_eq!(LensFacing::Front.toggled(), LensFacing::Back);
        assert_eq!(LensFacing::Back.toggled().toggled(), LensFacing::Back);
    }
}
