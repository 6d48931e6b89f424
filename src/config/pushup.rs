// ABOUTME: Push-up grading thresholds with representative defaults
// ABOUTME: Elbow extension/flexion angles, body-line tolerances, and descent depth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

mod pushup_defaults {
    pub const MIN_CONFIDENCE: f64 = 0.5;
    pub const STABLE_FRAMES: u32 = 3;
    pub const ELBOW_EXTENDED_ANGLE: f64 = 150.0;
    pub const ELBOW_FLEXED_ANGLE: f64 = 100.0;
    pub const HIP_SAG_TOLERANCE: f64 = 0.10;
    pub const HIP_PIKE_TOLERANCE: f64 = 0.12;
    pub const START_ALIGNMENT_TOLERANCE: f64 = 0.15;
    pub const MIN_DESCENT: f64 = 0.015;
    pub const SHOULDER_LEVEL_TOLERANCE: f64 = 0.10;
}

/// Push-up grader thresholds
///
/// Alignment tolerances are offsets of the hip from the shoulder-ankle line,
/// divided by that line's length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushupConfig {
    /// Minimum confidence for every required joint
    pub min_confidence: f64,
    /// Consecutive frames a candidate phase must persist before it commits
    pub stable_frames: u32,
    /// Elbow angle at or above which the arms count as extended (degrees)
    pub elbow_extended_angle: f64,
    /// Elbow angle at or below which the bottom is reached (degrees)
    pub elbow_flexed_angle: f64,
    /// Largest allowed downward hip deviation
    pub hip_sag_tolerance: f64,
    /// Largest allowed upward hip deviation
    pub hip_pike_tolerance: f64,
    /// Largest hip deviation in either direction that still allows a start
    pub start_alignment_tolerance: f64,
    /// Minimum shoulder drop below the top position (normalized height)
    pub min_descent: f64,
    /// Largest allowed left/right shoulder height difference
    pub shoulder_level_tolerance: f64,
}

impl Default for PushupConfig {
    fn default() -> Self {
        Self {
            min_confidence: pushup_defaults::MIN_CONFIDENCE,
            stable_frames: pushup_defaults::STABLE_FRAMES,
            elbow_extended_angle: pushup_defaults::ELBOW_EXTENDED_ANGLE,
            elbow_flexed_angle: pushup_defaults::ELBOW_FLEXED_ANGLE,
            hip_sag_tolerance: pushup_defaults::HIP_SAG_TOLERANCE,
            hip_pike_tolerance: pushup_defaults::HIP_PIKE_TOLERANCE,
            start_alignment_tolerance: pushup_defaults::START_ALIGNMENT_TOLERANCE,
            min_descent: pushup_defaults::MIN_DESCENT,
            shoulder_level_tolerance: pushup_defaults::SHOULDER_LEVEL_TOLERANCE,
        }
    }
}

impl PushupConfig {
    /// Check threshold ordering and ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first inconsistent threshold
    pub fn validate(&self) -> Result<(), ConfigError> {
        super::check_confidence(self.min_confidence, "pushup.min_confidence must be in (0, 1]")?;
        super::check_stable_frames(self.stable_frames, "pushup.stable_frames must be >= 1")?;
        super::check_angle(self.elbow_extended_angle, "pushup.elbow_extended_angle must be in [0, 180]")?;
        super::check_angle(self.elbow_flexed_angle, "pushup.elbow_flexed_angle must be in [0, 180]")?;
        if self.elbow_flexed_angle >= self.elbow_extended_angle {
            return Err(ConfigError::InvalidRange(
                "pushup.elbow_flexed_angle must be < pushup.elbow_extended_angle",
            ));
        }
        super::check_ratio(self.hip_sag_tolerance, "pushup.hip_sag_tolerance must be in (0, 1]")?;
        super::check_ratio(self.hip_pike_tolerance, "pushup.hip_pike_tolerance must be in (0, 1]")?;
        super::check_ratio(
            self.start_alignment_tolerance,
            "pushup.start_alignment_tolerance must be in (0, 1]",
        )?;
        super::check_ratio(self.min_descent, "pushup.min_descent must be in (0, 1]")?;
        super::check_ratio(
            self.shoulder_level_tolerance,
            "pushup.shoulder_level_tolerance must be in (0, 1]",
        )
    }
}
