//! Configuration management for podium
//!
//! Provides configuration loading, saving, and defaults for session
//! behavior, timer defaults, and the scenario catalog offered on the
//! configuration screen.

use crate::errors::SessionError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodiumConfig {
    pub session: SessionConfig,
    pub timer: TimerConfig,
    pub scenarios: ScenarioConfig,
}

/// Capture session behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Request microphone audio alongside video
    pub with_audio: bool,
    /// Acquire the default device's stream as soon as a session opens
    pub auto_acquire: bool,
}

/// Countdown timer defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Duration loaded into the timer when a session opens; 0 leaves the
    /// timer unset until the user picks a duration
    pub default_duration_secs: u32,
}

/// Scenario catalog and routing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Scenarios offered on the configuration screen
    pub catalog: Vec<String>,
    /// View the router is asked to show on successful submission
    pub navigation_target: String,
}

impl Default for PodiumConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig {
                with_audio: true,
                auto_acquire: true,
            },
            timer: TimerConfig {
                default_duration_secs: 0,
            },
            scenarios: ScenarioConfig {
                catalog: vec![
                    "Introduction".to_string(),
                    "Product Demo".to_string(),
                    "Q&A Session".to_string(),
                    "Technical Deep Dive".to_string(),
                    "Customer Testimonial".to_string(),
                    "De-escalation".to_string(),
                    "Closing Remarks".to_string(),
                ],
                navigation_target: "main".to_string(),
            },
        }
    }
}

impl PodiumConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SessionError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            SessionError::Validation(format!("Failed to read config file: {}", e))
        })?;

        let config: PodiumConfig = toml::from_str(&contents).map_err(|e| {
            SessionError::Validation(format!("Failed to parse config file: {}", e))
        })?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SessionError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SessionError::Validation(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| {
            SessionError::Validation(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            SessionError::Validation(format!("Failed to write config file: {}", e))
        })?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let config = PodiumConfig::default();
        assert_eq!(config.scenarios.catalog.len(), 7);
        assert!(config
            .scenarios
            .catalog
            .contains(&"Q&A Session".to_string()));
        assert_eq!(config.scenarios.navigation_target, "main");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = PodiumConfig::load_from_file("/nonexistent/podium.toml").unwrap();
        assert!(config.session.with_audio);
        assert!(config.session.auto_acquire);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("podium.toml");

        let mut config = PodiumConfig::default();
        config.timer.default_duration_secs = 300;
        config.session.with_audio = false;
        config.save_to_file(&path).unwrap();

        let loaded = PodiumConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.timer.default_duration_secs, 300);
        assert!(!loaded.session.with_audio);
        assert_eq!(loaded.scenarios.catalog, config.scenarios.catalog);
    }

    #[test]
    fn test_malformed_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("podium.toml");
        std::fs::write(&path, "not valid toml [[[").unwrap();

        let result = PodiumConfig::load_from_file(&path);
        assert!(matches!(result, Err(SessionError::Validation(_))));
    }
}
