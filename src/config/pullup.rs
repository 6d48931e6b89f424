// ABOUTME: Pull-up grading thresholds with representative defaults
// ABOUTME: Arm angles, chin-over-bar margins, swing limits, and ground-contact checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

mod pullup_defaults {
    pub const MIN_CONFIDENCE: f64 = 0.6;
    pub const STABLE_FRAMES: u32 = 3;
    pub const ARM_EXTENDED_ANGLE: f64 = 160.0;
    pub const ARM_FLEXED_ANGLE: f64 = 90.0;
    pub const CHIN_CLEARANCE: f64 = 0.02;
    pub const CHIN_BELOW_MARGIN: f64 = 0.05;
    pub const KIPPING_TOLERANCE: f64 = 0.15;
    pub const MAX_HORIZONTAL_DRIFT: f64 = 0.10;
    pub const KNEE_STRAIGHT_ANGLE: f64 = 150.0;
    pub const GROUND_CONTACT_RATIO: f64 = 0.5;
    pub const MIN_RISE_FOR_GROUND_CHECK: f64 = 0.05;
}

/// Pull-up grader thresholds
///
/// The bar sits at the average wrist height unless `bar_height` is set.
/// The nose stands in for the chin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullupConfig {
    /// Minimum confidence for every required joint
    pub min_confidence: f64,
    /// Consecutive frames a candidate phase must persist before it commits
    pub stable_frames: u32,
    /// Elbow angle at or above which the arms count as extended (degrees)
    pub arm_extended_angle: f64,
    /// Elbow angle the top of the rep must reach or go below (degrees)
    pub arm_flexed_angle: f64,
    /// How far above the bar the chin must rise (normalized height)
    pub chin_clearance: f64,
    /// How far below the bar the chin must be to count as hanging
    pub chin_below_margin: f64,
    /// Fixed bar height; `None` uses the wrists
    pub bar_height: Option<f64>,
    /// Largest hip travel relative to the shoulders, as a fraction of torso length
    pub kipping_tolerance: f64,
    /// Largest horizontal shoulder travel during a rep (normalized width)
    pub max_horizontal_drift: f64,
    /// Knee angle below which the legs count as bent (degrees)
    pub knee_straight_angle: f64,
    /// Minimum ankle rise as a fraction of shoulder rise before feet count as lifted
    pub ground_contact_ratio: f64,
    /// Shoulder rise needed before ground contact is judged
    pub min_rise_for_ground_check: f64,
}

impl Default for PullupConfig {
    fn default() -> Self {
        Self {
            min_confidence: pullup_defaults::MIN_CONFIDENCE,
            stable_frames: pullup_defaults::STABLE_FRAMES,
            arm_extended_angle: pullup_defaults::ARM_EXTENDED_ANGLE,
            arm_flexed_angle: pullup_defaults::ARM_FLEXED_ANGLE,
            chin_clearance: pullup_defaults::CHIN_CLEARANCE,
            chin_below_margin: pullup_defaults::CHIN_BELOW_MARGIN,
            bar_height: None,
            kipping_tolerance: pullup_defaults::KIPPING_TOLERANCE,
            max_horizontal_drift: pullup_defaults::MAX_HORIZONTAL_DRIFT,
            knee_straight_angle: pullup_defaults::KNEE_STRAIGHT_ANGLE,
            ground_contact_ratio: pullup_defaults::GROUND_CONTACT_RATIO,
            min_rise_for_ground_check: pullup_defaults::MIN_RISE_FOR_GROUND_CHECK,
        }
    }
}

impl PullupConfig {
    /// Check threshold ordering and ranges
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first inconsistent threshold
    pub fn validate(&self) -> Result<(), ConfigError> {
        super::check_confidence(self.min_confidence, "pullup.min_confidence must be in (0, 1]")?;
        super::check_stable_frames(self.stable_frames, "pullup.stable_frames must be >= 1")?;
        super::check_angle(self.arm_extended_angle, "pullup.arm_extended_angle must be in [0, 180]")?;
        super::check_angle(self.arm_flexed_angle, "pullup.arm_flexed_angle must be in [0, 180]")?;
        if self.arm_flexed_angle >= self.arm_extended_angle {
            return Err(ConfigError::InvalidRange(
                "pullup.arm_flexed_angle must be < pullup.arm_extended_angle",
            ));
        }
        super::check_ratio(self.chin_clearance, "pullup.chin_clearance must be in (0, 1]")?;
        super::check_ratio(self.chin_below_margin, "pullup.chin_below_margin must be in (0, 1]")?;
        if let Some(bar) = self.bar_height {
            if !(0.0..=1.0).contains(&bar) {
                return Err(ConfigError::ValueOutOfRange("pullup.bar_height must be in [0, 1]"));
            }
        }
        super::check_ratio(self.kipping_tolerance, "pullup.kipping_tolerance must be in (0, 1]")?;
        super::check_ratio(
            self.max_horizontal_drift,
            "pullup.max_horizontal_drift must be in (0, 1]",
        )?;
        super::check_angle(self.knee_straight_angle, "pullup.knee_straight_angle must be in [0, 180]")?;
        super::check_ratio(
            self.ground_contact_ratio,
            "pullup.ground_contact_ratio must be in (0, 1]",
        )?;
        super::check_ratio(
            self.min_rise_for_ground_check,
            "pullup.min_rise_for_ground_check must be in (0, 1]",
        )
    }
}
