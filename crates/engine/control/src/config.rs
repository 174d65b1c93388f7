//! Controller configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file
//! at all) gives the stock controller behaviour.
//!
//! ```toml
//! [gamepad]
//! mode_button = 10
//! pan = { x = 0, y = 1, z = 3 }
//! rotate = { x = 1, y = 0, z = 2 }
//!
//! [gamepad.dead_zone]
//! enabled = false
//!
//! [gains]
//! pan = 0.05
//!
//! [appearance]
//! initial_filter = 3
//! ```

use crate::arbiter::Gains;
use crate::error::{Error, Result};
use devices::GamepadConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Startup appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Preset applied before the first object loads (0 for none)
    pub initial_filter: u8,
    /// Start with the wireframe overlay on
    pub transparency: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            initial_filter: 3,
            transparency: false,
        }
    }
}

/// Example models cycled by [`Command::NextExample`](crate::Command::NextExample)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamplesConfig {
    pub paths: Vec<String>,
}

impl Default for ExamplesConfig {
    fn default() -> Self {
        Self {
            paths: ["goethe", "macintosh", "stuhl", "mate"]
                .iter()
                .map(|name| format!("examples/{name}.glb"))
                .collect(),
        }
    }
}

/// Full controller configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub gamepad: GamepadConfig,
    pub gains: Gains,
    pub appearance: AppearanceConfig,
    pub examples: ExamplesConfig,
}

impl ControlConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!("Loaded controller config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.gains.rotate.is_finite() || !self.gains.pan.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "gains must be finite (rotate = {}, pan = {})",
                self.gains.rotate, self.gains.pan
            )));
        }

        if self.appearance.initial_filter > 6 {
            return Err(Error::InvalidConfig(format!(
                "initial_filter must be between 0 and 6, got {}",
                self.appearance.initial_filter
            )));
        }

        let dead_zone = &self.gamepad.dead_zone;
        for (name, value) in [
            ("left_stick", dead_zone.left_stick),
            ("right_stick", dead_zone.right_stick),
            ("trigger", dead_zone.trigger),
            ("spacemouse", dead_zone.spacemouse),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(Error::InvalidConfig(format!(
                    "dead_zone.{name} must be in [0, 1), got {value}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbiter::{PAN_GAIN, ROTATE_GAIN};
    use devices::{AxisMapping, InteractionMode};
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ControlConfig::from_toml_str("").unwrap();
        assert_eq!(config, ControlConfig::default());
        assert_eq!(config.gamepad.mode_button, 10);
        assert_eq!(config.gamepad.pan, AxisMapping::PAN);
        assert_eq!(config.gamepad.rotate, AxisMapping::ROTATE);
        assert!(!config.gamepad.dead_zone.enabled);
        assert_eq!(config.gains.rotate, ROTATE_GAIN);
        assert_eq!(config.gains.pan, PAN_GAIN);
        assert_eq!(config.appearance.initial_filter, 3);
        assert_eq!(config.examples.paths.len(), 4);
    }

    #[test]
    fn test_partial_overrides() {
        let config = ControlConfig::from_toml_str(
            r#"
            [gamepad]
            mode_button = 4
            rotate = { x = 2, y = 3, z = 0 }

            [gamepad.dead_zone]
            enabled = true

            [gains]
            pan = 0.1

            [examples]
            paths = ["a.glb"]
            "#,
        )
        .unwrap();

        assert_eq!(config.gamepad.mode_button, 4);
        assert_eq!(config.gamepad.rotate, AxisMapping { x: 2, y: 3, z: 0 });
        assert_eq!(config.gamepad.pan, AxisMapping::PAN);
        assert!(config.gamepad.dead_zone.enabled);
        assert_eq!(config.gains.pan, 0.1);
        assert_eq!(config.gains.rotate, ROTATE_GAIN);
        assert_eq!(config.examples.paths, vec!["a.glb".to_string()]);
        assert_eq!(InteractionMode::default(), InteractionMode::Pan);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(matches!(
            ControlConfig::from_toml_str("[appearance]\ninitial_filter = 9"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ControlConfig::from_toml_str("[gamepad.dead_zone]\nleft_stick = 1.5"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ControlConfig::from_toml_str("[gains]\npan = \"fast\""),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[appearance]\ninitial_filter = 5\ntransparency = true").unwrap();

        let config = ControlConfig::load(file.path()).unwrap();
        assert_eq!(config.appearance.initial_filter, 5);
        assert!(config.appearance.transparency);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            ControlConfig::load("/nonexistent/controller.toml"),
            Err(Error::Io(_))
        ));
    }
}
