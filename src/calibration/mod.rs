// ABOUTME: Per-user calibration profiles consumed by the graders
// ABOUTME: Profile schema, validation, quality classification, and file loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Calibration
//!
//! A calibration profile is produced elsewhere and only read here. Applying
//! one substitutes numeric thresholds; it never changes which phases a
//! grader has or how they connect. No profile means uncalibrated defaults.

mod apply;
mod confidence;

pub use apply::{Calibrate, TierThresholds};
pub use confidence::{AngleReading, ConfidenceTracker};

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ptgrade_core::errors::{AppError, ErrorCode};
use ptgrade_core::models::ExerciseType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Calibration profile loading and validation errors
#[derive(Debug, Error)]
pub enum CalibrationError {
    /// Profile document is not valid JSON for the schema
    #[error("Invalid calibration profile: {0}")]
    Parse(#[from] serde_json::Error),

    /// Profile file could not be read
    #[error("Failed to read calibration profile {}: {source}", .path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O failure
        source: io::Error,
    },

    /// A field holds a value outside its range
    #[error("Calibration field {field} out of range: {value}")]
    OutOfRange {
        /// Offending field
        field: String,
        /// Offending value
        value: f64,
    },
}

impl From<CalibrationError> for AppError {
    fn from(error: CalibrationError) -> Self {
        Self::new(ErrorCode::CalibrationInvalid, error.to_string()).with_source(error)
    }
}

/// Degree deltas added to grader angle thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleAdjustments {
    /// Push-up arms-extended angle
    pub pushup_elbow_up: f64,
    /// Push-up bottom angle
    pub pushup_elbow_down: f64,
    /// Sit-up vertical torso threshold
    pub situp_torso_up: f64,
    /// Sit-up lying-down torso threshold
    pub situp_torso_down: f64,
    /// Shifts both edges of the sit-up knee band
    pub situp_knee_angle: f64,
    /// Pull-up hanging angle
    pub pullup_arm_extended: f64,
    /// Pull-up top-of-rep angle
    pub pullup_arm_flexed: f64,
    /// Plank left/right hip angle allowance
    pub plank_hip: f64,
    /// Plank straight-knee angle
    pub plank_knee: f64,
}

/// Replacement confidence thresholds per joint tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityThresholds {
    /// Fallback for any tier without its own value
    pub minimum_confidence: Option<f64>,
    /// Shoulders, elbows, wrists, hips
    pub critical_joints: Option<f64>,
    /// Knees and ankles
    pub support_joints: Option<f64>,
    /// Nose and neck
    pub face_joints: Option<f64>,
}

/// Per-user tolerance bands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationRanges {
    /// Degrees a named angle may stray from its target
    pub angle_tolerances: HashMap<String, f64>,
    /// Replacement positional tolerances keyed by check name
    pub position_tolerances: HashMap<String, f64>,
}

/// Body-segment lengths measured during calibration (normalized units)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseNormalization {
    /// Shoulder width
    pub shoulder_width: f64,
    /// Hip width
    pub hip_width: f64,
    /// Arm length
    pub arm_length: f64,
    /// Leg length
    pub leg_length: f64,
}

/// Calibration profile for one exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProfile {
    /// Exercise the profile was captured for
    pub exercise: ExerciseType,
    /// Angle threshold deltas
    #[serde(default)]
    pub angle_adjustments: AngleAdjustments,
    /// Confidence thresholds
    #[serde(default)]
    pub visibility_thresholds: VisibilityThresholds,
    /// Tolerance bands
    #[serde(default)]
    pub validation_ranges: ValidationRanges,
    /// Segment lengths, if measured
    #[serde(default)]
    pub pose_normalization: Option<PoseNormalization>,
    /// Overall calibration score (0-100)
    pub calibration_score: f64,
    /// Confidence in the calibration (0-1)
    pub confidence_level: f64,
    /// Frames the calibration was computed from
    #[serde(default)]
    pub frame_count: u32,
}

/// Calibration quality buckets by score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationQuality {
    /// 90 and above
    Excellent,
    /// 80 to 89
    Good,
    /// 70 to 79
    Acceptable,
    /// 60 to 69
    Poor,
    /// Below 60
    Invalid,
}

impl CalibrationQuality {
    /// Bucket a calibration score
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::Excellent
        } else if score >= 80.0 {
            Self::Good
        } else if score >= 70.0 {
            Self::Acceptable
        } else if score >= 60.0 {
            Self::Poor
        } else {
            Self::Invalid
        }
    }
}

impl fmt::Display for CalibrationQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Acceptable => "acceptable",
            Self::Poor => "poor",
            Self::Invalid => "invalid",
        };
        f.write_str(label)
    }
}

/// How strongly a profile should adapt grading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationLevel {
    /// Score >= 90 and confidence >= 0.9
    High,
    /// Score >= 75 and confidence >= 0.7
    Medium,
    /// Score >= 60 and confidence >= 0.5
    Low,
    /// Anything weaker
    None,
}

impl CalibrationProfile {
    /// Parse and validate a profile document
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError`] for malformed JSON or out-of-range values
    pub fn from_json(json: &str) -> Result<Self, CalibrationError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Read, parse, and validate a profile file
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError`] if the file cannot be read or is invalid
    pub fn load(path: &Path) -> Result<Self, CalibrationError> {
        let raw = fs::read_to_string(path).map_err(|source| CalibrationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    /// Check every numeric field against its range
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::OutOfRange`] for the first bad field
    pub fn validate(&self) -> Result<(), CalibrationError> {
        check_range("calibration_score", self.calibration_score, 0.0, 100.0)?;
        check_range("confidence_level", self.confidence_level, 0.0, 1.0)?;

        let thresholds = &self.visibility_thresholds;
        for (field, value) in [
            ("visibility_thresholds.minimum_confidence", thresholds.minimum_confidence),
            ("visibility_thresholds.critical_joints", thresholds.critical_joints),
            ("visibility_thresholds.support_joints", thresholds.support_joints),
            ("visibility_thresholds.face_joints", thresholds.face_joints),
        ] {
            if let Some(value) = value {
                check_range(field, value, 0.0, 1.0)?;
            }
        }

        let adjustments = &self.angle_adjustments;
        for (field, value) in [
            ("angle_adjustments.pushup_elbow_up", adjustments.pushup_elbow_up),
            ("angle_adjustments.pushup_elbow_down", adjustments.pushup_elbow_down),
            ("angle_adjustments.situp_torso_up", adjustments.situp_torso_up),
            ("angle_adjustments.situp_torso_down", adjustments.situp_torso_down),
            ("angle_adjustments.situp_knee_angle", adjustments.situp_knee_angle),
            ("angle_adjustments.pullup_arm_extended", adjustments.pullup_arm_extended),
            ("angle_adjustments.pullup_arm_flexed", adjustments.pullup_arm_flexed),
            ("angle_adjustments.plank_hip", adjustments.plank_hip),
            ("angle_adjustments.plank_knee", adjustments.plank_knee),
        ] {
            check_range(field, value, -90.0, 90.0)?;
        }

        for (name, tolerance) in &self.validation_ranges.angle_tolerances {
            if !(*tolerance > 0.0 && *tolerance <= 180.0) {
                return Err(CalibrationError::OutOfRange {
                    field: format!("validation_ranges.angle_tolerances.{name}"),
                    value: *tolerance,
                });
            }
        }
        for (name, tolerance) in &self.validation_ranges.position_tolerances {
            if !(*tolerance > 0.0 && *tolerance <= 1.0) {
                return Err(CalibrationError::OutOfRange {
                    field: format!("validation_ranges.position_tolerances.{name}"),
                    value: *tolerance,
                });
            }
        }
        Ok(())
    }

    /// Quality bucket for the calibration score
    #[must_use]
    pub fn quality(&self) -> CalibrationQuality {
        CalibrationQuality::from_score(self.calibration_score)
    }

    /// Adaptation level from score and confidence together
    #[must_use]
    pub fn adaptation_level(&self) -> AdaptationLevel {
        let (score, confidence) = (self.calibration_score, self.confidence_level);
        if score >= 90.0 && confidence >= 0.9 {
            AdaptationLevel::High
        } else if score >= 75.0 && confidence >= 0.7 {
            AdaptationLevel::Medium
        } else if score >= 60.0 && confidence >= 0.5 {
            AdaptationLevel::Low
        } else {
            AdaptationLevel::None
        }
    }

    /// Whether the profile was captured for `exercise`
    #[must_use]
    pub fn applies_to(&self, exercise: ExerciseType) -> bool {
        self.exercise == exercise
    }

    /// Positional tolerance override for `key`
    #[must_use]
    pub fn position_tolerance(&self, key: &str) -> Option<f64> {
        self.validation_ranges.position_tolerances.get(key).copied()
    }

    /// Angle tolerance for a named reading
    #[must_use]
    pub fn angle_tolerance(&self, name: &str) -> Option<f64> {
        self.validation_ranges.angle_tolerances.get(name).copied()
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), CalibrationError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(CalibrationError::OutOfRange {
            field: field.to_owned(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"{
        "exercise": "pushup",
        "angle_adjustments": { "pushup_elbow_up": -5.0 },
        "visibility_thresholds": { "minimum_confidence": 0.4 },
        "validation_ranges": { "position_tolerances": { "hip_sag": 0.12 } },
        "calibration_score": 92.0,
        "confidence_level": 0.95,
        "frame_count": 90
    }"#;

    #[test]
    fn test_parse_profile() {
        let profile = CalibrationProfile::from_json(PROFILE).unwrap();
        assert!(profile.applies_to(ExerciseType::Pushup));
        assert!(!profile.applies_to(ExerciseType::Plank));
        assert_eq!(profile.position_tolerance("hip_sag"), Some(0.12));
        assert_eq!(profile.quality(), CalibrationQuality::Excellent);
        assert_eq!(profile.adaptation_level(), AdaptationLevel::High);
    }

    #[test]
    fn test_out_of_range_score_rejected() {
        let json = PROFILE.replace("92.0", "120.0");
        let error = CalibrationProfile::from_json(&json).unwrap_err();
        assert!(matches!(error, CalibrationError::OutOfRange { .. }));
        assert_eq!(AppError::from(error).code, ErrorCode::CalibrationInvalid);
    }

    #[test]
    fn test_quality_buckets() {
        assert_eq!(CalibrationQuality::from_score(85.0), CalibrationQuality::Good);
        assert_eq!(CalibrationQuality::from_score(70.0), CalibrationQuality::Acceptable);
        assert_eq!(CalibrationQuality::from_score(60.0), CalibrationQuality::Poor);
        assert_eq!(CalibrationQuality::from_score(10.0), CalibrationQuality::Invalid);
    }

    #[test]
    fn test_adaptation_needs_both_score_and_confidence() {
        let mut profile = CalibrationProfile::from_json(PROFILE).unwrap();
        profile.confidence_level = 0.6;
        assert_eq!(profile.adaptation_level(), AdaptationLevel::Low);
        profile.confidence_level = 0.3;
        assert_eq!(profile.adaptation_level(), AdaptationLevel::None);
    }
}
