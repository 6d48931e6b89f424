// ABOUTME: Grading configuration for every exercise grader and the shared gate
// ABOUTME: Orchestrates per-exercise thresholds, environment overrides, and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Grading Configuration Module
//!
//! Every numeric threshold a grader uses lives here. Defaults are
//! representative values; deployments override them through
//! `PTGRADE_<EXERCISE>_<FIELD>` environment variables or a JSON document.
//!
//! # Module Structure
//!
//! - `pushup`, `pullup`, `situp`, `plank` - per-exercise thresholds
//! - `gate` - visibility gate tolerance and grading-confidence tuning
//! - `error` - configuration error types

pub mod error;
pub mod gate;
pub mod plank;
pub mod pullup;
pub mod pushup;
pub mod situp;

pub use error::ConfigError;
pub use gate::{ConfidenceConfig, GateConfig};
pub use plank::PlankConfig;
pub use pullup::PullupConfig;
pub use pushup::PushupConfig;
pub use situp::SitupConfig;

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Global configuration singleton
static GRADING_CONFIG: OnceLock<GradingConfig> = OnceLock::new();

/// Main grading configuration container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Push-up thresholds
    pub pushup: PushupConfig,
    /// Pull-up thresholds
    pub pullup: PullupConfig,
    /// Sit-up thresholds
    pub situp: SitupConfig,
    /// Plank thresholds
    pub plank: PlankConfig,
    /// Visibility gate settings
    pub gate: GateConfig,
    /// Grading-confidence settings
    pub confidence: ConfidenceConfig,
}

impl GradingConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        GRADING_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load grading config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from defaults and environment
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Apply environment variable overrides
        config = config.apply_env_overrides()?;

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Load a full configuration document from a JSON file
    ///
    /// Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or fails validation
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for the first inconsistent threshold
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pushup.validate()?;
        self.pullup.validate()?;
        self.situp.validate()?;
        self.plank.validate()?;
        self.gate.validate()?;
        self.confidence.validate()
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Like [`Self::apply_env_var`] for optional settings; `none` clears the value
    fn apply_optional_env_var<T: FromStr>(
        env_var_name: &str,
        target: &mut Option<T>,
    ) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = if val.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(
                    val.parse()
                        .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?,
                )
            };
        }
        Ok(())
    }

    /// Apply environment variable overrides
    // Long function: one override per tunable threshold
    #[allow(clippy::too_many_lines)]
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Push-up overrides
        Self::apply_env_var("PTGRADE_PUSHUP_MIN_CONFIDENCE", &mut self.pushup.min_confidence)?;
        Self::apply_env_var("PTGRADE_PUSHUP_STABLE_FRAMES", &mut self.pushup.stable_frames)?;
        Self::apply_env_var(
            "PTGRADE_PUSHUP_ELBOW_EXTENDED_ANGLE",
            &mut self.pushup.elbow_extended_angle,
        )?;
        Self::apply_env_var(
            "PTGRADE_PUSHUP_ELBOW_FLEXED_ANGLE",
            &mut self.pushup.elbow_flexed_angle,
        )?;
        Self::apply_env_var(
            "PTGRADE_PUSHUP_HIP_SAG_TOLERANCE",
            &mut self.pushup.hip_sag_tolerance,
        )?;
        Self::apply_env_var(
            "PTGRADE_PUSHUP_HIP_PIKE_TOLERANCE",
            &mut self.pushup.hip_pike_tolerance,
        )?;
        Self::apply_env_var(
            "PTGRADE_PUSHUP_START_ALIGNMENT_TOLERANCE",
            &mut self.pushup.start_alignment_tolerance,
        )?;
        Self::apply_env_var("PTGRADE_PUSHUP_MIN_DESCENT", &mut self.pushup.min_descent)?;
        Self::apply_env_var(
            "PTGRADE_PUSHUP_SHOULDER_LEVEL_TOLERANCE",
            &mut self.pushup.shoulder_level_tolerance,
        )?;

        // Pull-up overrides
        Self::apply_env_var("PTGRADE_PULLUP_MIN_CONFIDENCE", &mut self.pullup.min_confidence)?;
        Self::apply_env_var("PTGRADE_PULLUP_STABLE_FRAMES", &mut self.pullup.stable_frames)?;
        Self::apply_env_var(
            "PTGRADE_PULLUP_ARM_EXTENDED_ANGLE",
            &mut self.pullup.arm_extended_angle,
        )?;
        Self::apply_env_var(
            "PTGRADE_PULLUP_ARM_FLEXED_ANGLE",
            &mut self.pullup.arm_flexed_angle,
        )?;
        Self::apply_env_var("PTGRADE_PULLUP_CHIN_CLEARANCE", &mut self.pullup.chin_clearance)?;
        Self::apply_env_var(
            "PTGRADE_PULLUP_CHIN_BELOW_MARGIN",
            &mut self.pullup.chin_below_margin,
        )?;
        Self::apply_optional_env_var("PTGRADE_PULLUP_BAR_HEIGHT", &mut self.pullup.bar_height)?;
        Self::apply_env_var(
            "PTGRADE_PULLUP_KIPPING_TOLERANCE",
            &mut self.pullup.kipping_tolerance,
        )?;
        Self::apply_env_var(
            "PTGRADE_PULLUP_MAX_HORIZONTAL_DRIFT",
            &mut self.pullup.max_horizontal_drift,
        )?;
        Self::apply_env_var(
            "PTGRADE_PULLUP_KNEE_STRAIGHT_ANGLE",
            &mut self.pullup.knee_straight_angle,
        )?;
        Self::apply_env_var(
            "PTGRADE_PULLUP_GROUND_CONTACT_RATIO",
            &mut self.pullup.ground_contact_ratio,
        )?;
        Self::apply_env_var(
            "PTGRADE_PULLUP_MIN_RISE_FOR_GROUND_CHECK",
            &mut self.pullup.min_rise_for_ground_check,
        )?;

        // Sit-up overrides
        Self::apply_env_var("PTGRADE_SITUP_MIN_CONFIDENCE", &mut self.situp.min_confidence)?;
        Self::apply_env_var("PTGRADE_SITUP_STABLE_FRAMES", &mut self.situp.stable_frames)?;
        Self::apply_env_var(
            "PTGRADE_SITUP_TORSO_HORIZONTAL_MAX",
            &mut self.situp.torso_horizontal_max,
        )?;
        Self::apply_env_var(
            "PTGRADE_SITUP_TORSO_VERTICAL_MIN",
            &mut self.situp.torso_vertical_min,
        )?;
        Self::apply_env_var("PTGRADE_SITUP_KNEE_ANGLE_MIN", &mut self.situp.knee_angle_min)?;
        Self::apply_env_var("PTGRADE_SITUP_KNEE_ANGLE_MAX", &mut self.situp.knee_angle_max)?;
        Self::apply_env_var(
            "PTGRADE_SITUP_ARMS_CROSSED_MAX_DISTANCE",
            &mut self.situp.arms_crossed_max_distance,
        )?;

        // Plank overrides
        Self::apply_env_var("PTGRADE_PLANK_MIN_CONFIDENCE", &mut self.plank.min_confidence)?;
        Self::apply_env_var(
            "PTGRADE_PLANK_HIP_SAG_TOLERANCE",
            &mut self.plank.hip_sag_tolerance,
        )?;
        Self::apply_env_var(
            "PTGRADE_PLANK_HIP_PIKE_TOLERANCE",
            &mut self.plank.hip_pike_tolerance,
        )?;
        Self::apply_env_var(
            "PTGRADE_PLANK_KNEE_STRAIGHT_ANGLE",
            &mut self.plank.knee_straight_angle,
        )?;
        Self::apply_env_var(
            "PTGRADE_PLANK_MAX_HIP_ASYMMETRY",
            &mut self.plank.max_hip_asymmetry,
        )?;
        Self::apply_env_var("PTGRADE_PLANK_MAX_ELBOW_OFFSET", &mut self.plank.max_elbow_offset)?;
        Self::apply_env_var(
            "PTGRADE_PLANK_BREAK_TOLERANCE_FRAMES",
            &mut self.plank.break_tolerance_frames,
        )?;
        Self::apply_env_var(
            "PTGRADE_PLANK_MAX_FRAME_GAP_SECS",
            &mut self.plank.max_frame_gap_secs,
        )?;

        // Gate and confidence overrides
        Self::apply_env_var(
            "PTGRADE_GATE_INVALID_FRAME_TOLERANCE",
            &mut self.gate.invalid_frame_tolerance,
        )?;
        Self::apply_env_var(
            "PTGRADE_CONFIDENCE_HISTORY_WINDOW",
            &mut self.confidence.history_window,
        )?;
        Self::apply_env_var(
            "PTGRADE_CONFIDENCE_VARIANCE_WEIGHT",
            &mut self.confidence.variance_weight,
        )?;

        Ok(self)
    }
}

fn check_confidence(value: f64, message: &'static str) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange(message))
    }
}

fn check_ratio(value: f64, message: &'static str) -> Result<(), ConfigError> {
    check_confidence(value, message)
}

fn check_angle(value: f64, message: &'static str) -> Result<(), ConfigError> {
    if (0.0..=180.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange(message))
    }
}

fn check_stable_frames(value: u32, message: &'static str) -> Result<(), ConfigError> {
    if value >= 1 {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GradingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_elbow_thresholds_rejected() {
        let mut config = GradingConfig::default();
        config.pushup.elbow_flexed_angle = 160.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange(_))));
    }

    #[test]
    fn test_confidence_outside_unit_interval_rejected() {
        let mut config = GradingConfig::default();
        config.plank.min_confidence = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange(_))
        ));
    }

    #[test]
    fn test_zero_stable_frames_rejected() {
        let mut config = GradingConfig::default();
        config.situp.stable_frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: GradingConfig =
            serde_json::from_str(r#"{"pushup": {"stable_frames": 5}}"#).unwrap();
        assert_eq!(config.pushup.stable_frames, 5);
        assert!(
            (config.pushup.elbow_extended_angle - PushupConfig::default().elbow_extended_angle).abs()
                < f64::EPSILON
        );
        assert_eq!(config.plank, PlankConfig::default());
    }
}
