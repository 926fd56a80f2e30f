//! Gesture settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Missing sections or fields fall back to their defaults when loading.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gesture::ClassifierConfig;
use crate::provider::{ModelComplexity, ProviderOptions};
use crate::stabilizer::StabilizerConfig;

use super::AppPaths;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// A setting outside its allowed range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must lie in [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("invalid provider options: {0}")]
    Provider(String),
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Settings fixed for the lifetime of a
/// [`DetectionSession`](crate::pipeline::DetectionSession).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Gestures below this confidence are never reported (0.0 – 1.0).
    pub min_confidence: f32,
    /// Minimum milliseconds between two frames sent to the provider.
    pub debounce_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.7,
            debounce_ms: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// GestureConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use gesture_control::config::GestureConfig;
///
/// // Load (returns Default when file is missing)
/// let config = GestureConfig::load().unwrap();
/// config.validate().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Confidence threshold and debounce.
    pub session: SessionConfig,
    /// Options handed to the landmark provider.
    pub provider: ProviderOptions,
    /// Classification thresholds.
    pub classifier: ClassifierConfig,
    /// History, swipe heuristic and cooldown.
    pub stabilizer: StabilizerConfig,
}

impl GestureConfig {
    /// Reduced-cost profile for slow devices: lite model, fewer frames,
    /// lower acceptance threshold.
    pub fn low_end() -> Self {
        Self {
            session: SessionConfig {
                min_confidence: 0.5,
                debounce_ms: 200,
            },
            provider: ProviderOptions {
                model_complexity: ModelComplexity::Lite,
                ..ProviderOptions::default()
            },
            ..Self::default()
        }
    }

    /// Check every section's ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_range("session.min_confidence", self.session.min_confidence)?;
        self.provider.validate().map_err(ConfigError::Provider)?;

        if self.classifier.pinch_threshold <= 0.0 {
            return Err(ConfigError::Zero {
                field: "classifier.pinch_threshold",
            });
        }

        let s = &self.stabilizer;
        for (field, value) in [
            ("stabilizer.history_size", s.history_size),
            ("stabilizer.swipe_window", s.swipe_window),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        if s.swipe_min_distance <= 0.0 {
            return Err(ConfigError::Zero {
                field: "stabilizer.swipe_min_distance",
            });
        }
        Ok(())
    }

    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(GestureConfig::default())` when the file does not exist
    /// yet (first-run scenario) so callers never need to special-case a
    /// missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn unit_range(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
