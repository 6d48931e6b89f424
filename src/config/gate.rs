// ABOUTME: Visibility gate and grading-confidence tuning shared by every grader
// ABOUTME: Invalid-frame tolerance, confidence history window, and penalty weights
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

mod gate_defaults {
    pub const INVALID_FRAME_TOLERANCE: u32 = 3;
}

mod confidence_defaults {
    pub const HISTORY_WINDOW: usize = 10;
    pub const MIN_HISTORY: usize = 5;
    pub const VARIANCE_WEIGHT: f64 = 4.0;
    pub const MAX_ANGLE_PENALTY: f64 = 0.3;
    pub const DEFAULT_ANGLE_TOLERANCE: f64 = 15.0;
}

/// Visibility gate settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Consecutive failed frames before the reported phase becomes invalid
    pub invalid_frame_tolerance: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            invalid_frame_tolerance: gate_defaults::INVALID_FRAME_TOLERANCE,
        }
    }
}

/// Grading-confidence composition settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceConfig {
    /// Per-frame form scores kept for the stability factor
    pub history_window: usize,
    /// Samples required before stability is judged
    pub min_history: usize,
    /// Multiplier applied to form-score variance
    pub variance_weight: f64,
    /// Largest penalty a single out-of-band angle can cost
    pub max_angle_penalty: f64,
    /// Angle tolerance used when a calibration profile names none (degrees)
    pub default_angle_tolerance: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            history_window: confidence_defaults::HISTORY_WINDOW,
            min_history: confidence_defaults::MIN_HISTORY,
            variance_weight: confidence_defaults::VARIANCE_WEIGHT,
            max_angle_penalty: confidence_defaults::MAX_ANGLE_PENALTY,
            default_angle_tolerance: confidence_defaults::DEFAULT_ANGLE_TOLERANCE,
        }
    }
}

impl GateConfig {
    /// Check ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the tolerance is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        super::check_stable_frames(
            self.invalid_frame_tolerance,
            "gate.invalid_frame_tolerance must be >= 1",
        )
    }
}

impl ConfidenceConfig {
    /// Check ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first inconsistent setting
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_window == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "confidence.history_window must be >= 1",
            ));
        }
        if self.min_history > self.history_window {
            return Err(ConfigError::InvalidRange(
                "confidence.min_history must be <= confidence.history_window",
            ));
        }
        if !(self.variance_weight >= 0.0 && self.variance_weight.is_finite()) {
            return Err(ConfigError::ValueOutOfRange(
                "confidence.variance_weight must be non-negative",
            ));
        }
        super::check_ratio(
            self.max_angle_penalty,
            "confidence.max_angle_penalty must be in (0, 1]",
        )?;
        if !(self.default_angle_tolerance > 0.0 && self.default_angle_tolerance <= 180.0) {
            return Err(ConfigError::ValueOutOfRange(
                "confidence.default_angle_tolerance must be in (0, 180]",
            ));
        }
        Ok(())
    }
}
