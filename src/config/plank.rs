// ABOUTME: Plank grading thresholds with representative defaults
// ABOUTME: Body-line tolerances, leg and symmetry limits, and hold-break tolerance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

mod plank_defaults {
    pub const MIN_CONFIDENCE: f64 = 0.6;
    pub const HIP_SAG_TOLERANCE: f64 = 0.08;
    pub const HIP_PIKE_TOLERANCE: f64 = 0.10;
    pub const KNEE_STRAIGHT_ANGLE: f64 = 160.0;
    pub const MAX_HIP_ASYMMETRY: f64 = 15.0;
    pub const MAX_ELBOW_OFFSET: f64 = 0.10;
    pub const BREAK_TOLERANCE_FRAMES: u32 = 10;
    pub const MAX_FRAME_GAP_SECS: f64 = 0.5;
}

/// Plank grader thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlankConfig {
    /// Minimum confidence for every required joint
    pub min_confidence: f64,
    /// Largest allowed downward hip deviation from the shoulder-ankle line
    pub hip_sag_tolerance: f64,
    /// Largest allowed upward hip deviation from the shoulder-ankle line
    pub hip_pike_tolerance: f64,
    /// Knee angle below which the legs count as bent (degrees)
    pub knee_straight_angle: f64,
    /// Largest left/right hip angle difference (degrees)
    pub max_hip_asymmetry: f64,
    /// Largest horizontal elbow-to-shoulder offset, as a fraction of body length
    pub max_elbow_offset: f64,
    /// Consecutive faulty frames tolerated before the hold is broken
    pub break_tolerance_frames: u32,
    /// Longest frame gap credited to the hold (seconds)
    pub max_frame_gap_secs: f64,
}

impl Default for PlankConfig {
    fn default() -> Self {
        Self {
            min_confidence: plank_defaults::MIN_CONFIDENCE,
            hip_sag_tolerance: plank_defaults::HIP_SAG_TOLERANCE,
            hip_pike_tolerance: plank_defaults::HIP_PIKE_TOLERANCE,
            knee_straight_angle: plank_defaults::KNEE_STRAIGHT_ANGLE,
            max_hip_asymmetry: plank_defaults::MAX_HIP_ASYMMETRY,
            max_elbow_offset: plank_defaults::MAX_ELBOW_OFFSET,
            break_tolerance_frames: plank_defaults::BREAK_TOLERANCE_FRAMES,
            max_frame_gap_secs: plank_defaults::MAX_FRAME_GAP_SECS,
        }
    }
}

impl PlankConfig {
    /// Check threshold ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first inconsistent threshold
    pub fn validate(&self) -> Result<(), ConfigError> {
        super::check_confidence(self.min_confidence, "plank.min_confidence must be in (0, 1]")?;
        super::check_ratio(self.hip_sag_tolerance, "plank.hip_sag_tolerance must be in (0, 1]")?;
        super::check_ratio(self.hip_pike_tolerance, "plank.hip_pike_tolerance must be in (0, 1]")?;
        super::check_angle(self.knee_straight_angle, "plank.knee_straight_angle must be in [0, 180]")?;
        super::check_angle(self.max_hip_asymmetry, "plank.max_hip_asymmetry must be in [0, 180]")?;
        super::check_ratio(self.max_elbow_offset, "plank.max_elbow_offset must be in (0, 1]")?;
        if !(self.max_frame_gap_secs > 0.0 && self.max_frame_gap_secs.is_finite()) {
            return Err(ConfigError::ValueOutOfRange(
                "plank.max_frame_gap_secs must be positive",
            ));
        }
        Ok(())
    }
}
