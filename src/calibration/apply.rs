// ABOUTME: Applies a calibration profile to grader thresholds as pure parameter substitution
// ABOUTME: Angle deltas, per-tier confidence thresholds, and positional tolerance overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use ptgrade_core::models::{ExerciseType, Joint, JointTier};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::CalibrationProfile;
use crate::config::{ConfigError, PlankConfig, PullupConfig, PushupConfig, SitupConfig};

/// Grader thresholds that a calibration profile can adjust
pub trait Calibrate: Clone {
    /// Exercise these thresholds belong to
    const EXERCISE: ExerciseType;

    /// Uncalibrated minimum joint confidence
    fn min_confidence(&self) -> f64;

    /// Substitute profile values into `self`
    fn apply_profile(&mut self, profile: &CalibrationProfile);

    /// Validate the substituted thresholds
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the thresholds are inconsistent
    fn check(&self) -> Result<(), ConfigError>;

    /// Thresholds with `profile` applied
    ///
    /// Falls back to `self` unchanged when the profile is absent, belongs to
    /// another exercise, or produces inconsistent thresholds.
    #[must_use]
    fn calibrated(&self, profile: Option<&CalibrationProfile>) -> Self {
        let Some(profile) = profile else {
            return self.clone();
        };
        if !profile.applies_to(Self::EXERCISE) {
            warn!(
                profile = %profile.exercise,
                grader = %Self::EXERCISE,
                "Ignoring calibration profile captured for another exercise"
            );
            return self.clone();
        }

        let mut adjusted = self.clone();
        adjusted.apply_profile(profile);
        match adjusted.check() {
            Ok(()) => {
                debug!(exercise = %Self::EXERCISE, quality = %profile.quality(), "Applied calibration");
                adjusted
            }
            Err(e) => {
                warn!(exercise = %Self::EXERCISE, "Calibrated thresholds invalid ({e}), using defaults");
                self.clone()
            }
        }
    }
}

/// Minimum confidence per joint tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    /// Shoulders, elbows, wrists, hips
    pub critical: f64,
    /// Knees and ankles
    pub support: f64,
    /// Nose and neck
    pub face: f64,
}

impl TierThresholds {
    /// Same threshold for every tier
    #[must_use]
    pub const fn uniform(min_confidence: f64) -> Self {
        Self {
            critical: min_confidence,
            support: min_confidence,
            face: min_confidence,
        }
    }

    /// Tier thresholds for `config`, replaced by the profile where it sets them
    #[must_use]
    pub fn for_config<C: Calibrate>(config: &C, profile: Option<&CalibrationProfile>) -> Self {
        let base = Self::uniform(config.min_confidence());
        let Some(profile) = profile.filter(|p| p.applies_to(C::EXERCISE)) else {
            return base;
        };
        let visibility = profile.visibility_thresholds;
        let fallback = visibility.minimum_confidence;
        Self {
            critical: visibility.critical_joints.or(fallback).unwrap_or(base.critical),
            support: visibility.support_joints.or(fallback).unwrap_or(base.support),
            face: visibility.face_joints.or(fallback).unwrap_or(base.face),
        }
    }

    /// Threshold for a tier
    #[must_use]
    pub const fn for_tier(&self, tier: JointTier) -> f64 {
        match tier {
            JointTier::Critical => self.critical,
            JointTier::Support => self.support,
            JointTier::Face => self.face,
        }
    }

    /// Threshold for a joint's default tier
    #[must_use]
    pub const fn for_joint(&self, joint: Joint) -> f64 {
        self.for_tier(joint.tier())
    }
}

fn replace_tolerance(profile: &CalibrationProfile, key: &str, target: &mut f64) {
    if let Some(value) = profile.position_tolerance(key) {
        *target = value;
    }
}

impl Calibrate for PushupConfig {
    const EXERCISE: ExerciseType = ExerciseType::Pushup;

    fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    fn apply_profile(&mut self, profile: &CalibrationProfile) {
        let adjustments = &profile.angle_adjustments;
        self.elbow_extended_angle += adjustments.pushup_elbow_up;
        self.elbow_flexed_angle += adjustments.pushup_elbow_down;
        replace_tolerance(profile, "hip_sag", &mut self.hip_sag_tolerance);
        replace_tolerance(profile, "hip_pike", &mut self.hip_pike_tolerance);
        replace_tolerance(profile, "min_descent", &mut self.min_descent);
        replace_tolerance(profile, "shoulder_level", &mut self.shoulder_level_tolerance);
    }

    fn check(&self) -> Result<(), ConfigError> {
        self.validate()
    }
}

impl Calibrate for PullupConfig {
    const EXERCISE: ExerciseType = ExerciseType::Pullup;

    fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    fn apply_profile(&mut self, profile: &CalibrationProfile) {
        let adjustments = &profile.angle_adjustments;
        self.arm_extended_angle += adjustments.pullup_arm_extended;
        self.arm_flexed_angle += adjustments.pullup_arm_flexed;
        replace_tolerance(profile, "kipping", &mut self.kipping_tolerance);
        replace_tolerance(profile, "horizontal_drift", &mut self.max_horizontal_drift);
        replace_tolerance(profile, "chin_clearance", &mut self.chin_clearance);
    }

    fn check(&self) -> Result<(), ConfigError> {
        self.validate()
    }
}

impl Calibrate for SitupConfig {
    const EXERCISE: ExerciseType = ExerciseType::Situp;

    fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    fn apply_profile(&mut self, profile: &CalibrationProfile) {
        let adjustments = &profile.angle_adjustments;
        self.torso_vertical_min += adjustments.situp_torso_up;
        self.torso_horizontal_max += adjustments.situp_torso_down;
        self.knee_angle_min += adjustments.situp_knee_angle;
        self.knee_angle_max += adjustments.situp_knee_angle;
        replace_tolerance(profile, "arms_crossed", &mut self.arms_crossed_max_distance);
    }

    fn check(&self) -> Result<(), ConfigError> {
        self.validate()
    }
}

impl Calibrate for PlankConfig {
    const EXERCISE: ExerciseType = ExerciseType::Plank;

    fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    fn apply_profile(&mut self, profile: &CalibrationProfile) {
        let adjustments = &profile.angle_adjustments;
        self.max_hip_asymmetry += adjustments.plank_hip;
        self.knee_straight_angle += adjustments.plank_knee;
        replace_tolerance(profile, "hip_sag", &mut self.hip_sag_tolerance);
        replace_tolerance(profile, "hip_pike", &mut self.hip_pike_tolerance);
        replace_tolerance(profile, "elbow_offset", &mut self.max_elbow_offset);
    }

    fn check(&self) -> Result<(), ConfigError> {
        self.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(exercise: &str, extra: &str) -> CalibrationProfile {
        CalibrationProfile::from_json(&format!(
            r#"{{ "exercise": "{exercise}", "calibration_score": 85.0, "confidence_level": 0.8 {extra} }}"#
        ))
        .unwrap()
    }

    #[test]
    fn test_absent_profile_keeps_defaults() {
        let config = PushupConfig::default();
        assert_eq!(config.calibrated(None), config);
    }

    #[test]
    fn test_angle_deltas_and_tolerances_substituted() {
        let profile = profile(
            "pushup",
            r#", "angle_adjustments": { "pushup_elbow_up": -10.0, "pushup_elbow_down": 5.0 },
                "validation_ranges": { "position_tolerances": { "hip_sag": 0.2 } }"#,
        );
        let calibrated = PushupConfig::default().calibrated(Some(&profile));
        assert!((calibrated.elbow_extended_angle - 140.0).abs() < 1e-9);
        assert!((calibrated.elbow_flexed_angle - 105.0).abs() < 1e-9);
        assert!((calibrated.hip_sag_tolerance - 0.2).abs() < 1e-9);
        assert_eq!(calibrated.stable_frames, PushupConfig::default().stable_frames);
    }

    #[test]
    fn test_profile_for_other_exercise_ignored() {
        let profile = profile("situp", r#", "angle_adjustments": { "pushup_elbow_up": -10.0 }"#);
        let config = PushupConfig::default();
        assert_eq!(config.calibrated(Some(&profile)), config);
        assert_eq!(
            TierThresholds::for_config(&config, Some(&profile)),
            TierThresholds::uniform(config.min_confidence)
        );
    }

    #[test]
    fn test_inconsistent_result_falls_back() {
        // Pushes the flexed angle above the extended angle
        let profile = profile("pushup", r#", "angle_adjustments": { "pushup_elbow_down": 60.0 }"#);
        let config = PushupConfig::default();
        assert_eq!(config.calibrated(Some(&profile)), config);
    }

    #[test]
    fn test_tier_thresholds_from_profile() {
        let profile = profile(
            "pullup",
            r#", "visibility_thresholds": { "minimum_confidence": 0.3, "face_joints": 0.7 }"#,
        );
        let tiers = TierThresholds::for_config(&PullupConfig::default(), Some(&profile));
        assert!((tiers.critical - 0.3).abs() < 1e-9);
        assert!((tiers.support - 0.3).abs() < 1e-9);
        assert!((tiers.for_joint(Joint::Nose) - 0.7).abs() < 1e-9);
    }
}
