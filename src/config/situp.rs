// ABOUTME: Sit-up grading thresholds with representative defaults
// ABOUTME: Torso inclination bounds, knee-angle band, and crossed-arms distance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

mod situp_defaults {
    pub const MIN_CONFIDENCE: f64 = 0.5;
    pub const STABLE_FRAMES: u32 = 3;
    pub const TORSO_HORIZONTAL_MAX: f64 = 20.0;
    pub const TORSO_VERTICAL_MIN: f64 = 75.0;
    pub const KNEE_ANGLE_MIN: f64 = 70.0;
    pub const KNEE_ANGLE_MAX: f64 = 110.0;
    pub const ARMS_CROSSED_MAX_DISTANCE: f64 = 0.15;
}

/// Sit-up grader thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitupConfig {
    /// Minimum confidence for every required joint
    pub min_confidence: f64,
    /// Consecutive frames a candidate phase must persist before it commits
    pub stable_frames: u32,
    /// Torso inclination at or below which the participant is lying down (degrees)
    pub torso_horizontal_max: f64,
    /// Torso inclination the top of the rep must reach (degrees)
    pub torso_vertical_min: f64,
    /// Lower edge of the knee-angle band (degrees)
    pub knee_angle_min: f64,
    /// Upper edge of the knee-angle band (degrees)
    pub knee_angle_max: f64,
    /// Largest wrist-to-opposite-shoulder distance for crossed arms
    pub arms_crossed_max_distance: f64,
}

impl Default for SitupConfig {
    fn default() -> Self {
        Self {
            min_confidence: situp_defaults::MIN_CONFIDENCE,
            stable_frames: situp_defaults::STABLE_FRAMES,
            torso_horizontal_max: situp_defaults::TORSO_HORIZONTAL_MAX,
            torso_vertical_min: situp_defaults::TORSO_VERTICAL_MIN,
            knee_angle_min: situp_defaults::KNEE_ANGLE_MIN,
            knee_angle_max: situp_defaults::KNEE_ANGLE_MAX,
            arms_crossed_max_distance: situp_defaults::ARMS_CROSSED_MAX_DISTANCE,
        }
    }
}

impl SitupConfig {
    /// Check threshold ordering and ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first inconsistent threshold
    pub fn validate(&self) -> Result<(), ConfigError> {
        super::check_confidence(self.min_confidence, "situp.min_confidence must be in (0, 1]")?;
        super::check_stable_frames(self.stable_frames, "situp.stable_frames must be >= 1")?;
        if !(0.0..=90.0).contains(&self.torso_horizontal_max)
            || !(0.0..=90.0).contains(&self.torso_vertical_min)
        {
            return Err(ConfigError::ValueOutOfRange(
                "situp torso thresholds must be in [0, 90]",
            ));
        }
        if self.torso_horizontal_max >= self.torso_vertical_min {
            return Err(ConfigError::InvalidRange(
                "situp.torso_horizontal_max must be < situp.torso_vertical_min",
            ));
        }
        super::check_angle(self.knee_angle_min, "situp.knee_angle_min must be in [0, 180]")?;
        super::check_angle(self.knee_angle_max, "situp.knee_angle_max must be in [0, 180]")?;
        if self.knee_angle_min >= self.knee_angle_max {
            return Err(ConfigError::InvalidRange(
                "situp.knee_angle_min must be < situp.knee_angle_max",
            ));
        }
        super::check_ratio(
            self.arms_crossed_max_distance,
            "situp.arms_crossed_max_distance must be in (0, 1]",
        )
    }
}
