//! Configuration management for verification parameters
//!
//! Runtime configuration is loaded from a JSON file so the dwell interval,
//! poll cadence and rating thresholds can be tuned without recompilation.
//! Missing or malformed files fall back to the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::calibration::orientation::DEFAULT_DWELL_MS;
use crate::calibration::RatingThresholds;
use crate::error::CalibrationError;

/// Default config location relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "assets/accel_verify.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub calibration: CalibrationConfig,
    pub evaluation: RatingThresholds,
    pub live: LiveConfig,
}

/// Verification session parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Minimum time a pose prompt is held before it may advance
    pub dwell_ms: u64,
    /// Pause between loop iterations; bounds cancel latency
    pub poll_interval_ms: u64,
    /// Drop NaN/infinite samples before they reach the extrema
    pub reject_non_finite: bool,
    /// Stop the session on its own after this long (unbounded when absent)
    pub max_duration_ms: Option<u64>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            dwell_ms: DEFAULT_DWELL_MS,
            poll_interval_ms: 50,
            reject_non_finite: true,
            max_duration_ms: None,
        }
    }
}

/// Live readout parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Pause between cancel polls
    pub poll_interval_ms: u64,
    /// Time between readout frames
    pub refresh_ms: u64,
    /// Toggle a heartbeat indicator on every frame
    pub heartbeat: bool,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 5,
            refresh_ms: 200,
            heartbeat: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or the defaults if the file is missing or
    /// the JSON is invalid
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }

    /// Check that every parameter is usable
    ///
    /// # Errors
    /// - `InvalidConfig` for a zero dwell, poll or refresh interval
    /// - `ThresholdsNotIncreasing` for unordered or non-finite thresholds
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.calibration.dwell_ms == 0 {
            return Err(CalibrationError::InvalidConfig {
                reason: "dwell_ms must be greater than zero".to_string(),
            });
        }
        if self.calibration.poll_interval_ms == 0 {
            return Err(CalibrationError::InvalidConfig {
                reason: "poll_interval_ms must be greater than zero".to_string(),
            });
        }
        if self.live.poll_interval_ms == 0 || self.live.refresh_ms == 0 {
            return Err(CalibrationError::InvalidConfig {
                reason: "live intervals must be greater than zero".to_string(),
            });
        }
        self.evaluation.validate()
    }
}
