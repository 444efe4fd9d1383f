//! Simulation settings
//!
//! Persisted as JSON next to the game's other configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_GRAVITY, MAX_SUBSTEPS, SIM_DT};

/// Ambient parameters every entity reads during its update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// Downward acceleration applied to entities without anti-gravity
    pub gravity: f32,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub world: WorldParams,
    /// Fixed simulation timestep in seconds
    pub fixed_dt: f32,
    /// Maximum fixed steps run per rendered frame
    pub max_substeps: u32,
    /// Draw collision shapes attached to sprites
    pub show_collision_shapes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            world: WorldParams::default(),
            fixed_dt: SIM_DT,
            max_substeps: MAX_SUBSTEPS,
            show_collision_shapes: false,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Replace a non-positive timestep or substep count with the default
    fn sanitize(&mut self) {
        if !(self.fixed_dt > 0.0) {
            log::warn!("fixed_dt {} is not positive; using {}", self.fixed_dt, SIM_DT);
            self.fixed_dt = SIM_DT;
        }
        if self.max_substeps == 0 {
            self.max_substeps = MAX_SUBSTEPS;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "world": { "gravity": 9.8 } }"#).unwrap();
        assert_eq!(settings.world.gravity, 9.8);
        assert_eq!(settings.fixed_dt, SIM_DT);
        assert!(!settings.show_collision_shapes);
    }

    #[test]
    fn test_bad_timestep_is_replaced() {
        let settings = Settings::from_json(r#"{ "fixed_dt": -1.0, "max_substeps": 0 }"#).unwrap();
        assert_eq!(settings.fixed_dt, SIM_DT);
        assert_eq!(settings.max_substeps, MAX_SUBSTEPS);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            show_collision_shapes: true,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default("/nonexistent/mashadeau/settings.json");
        assert_eq!(settings, Settings::default());
    }
}
