// ABOUTME: Integration tests for calibration profiles applied to graders
// ABOUTME: Profile files, threshold offsets, visibility tiers, mismatches, and confidence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::fs;

use common::{grade_all, init_test_logging, pushup_rep, reps_in};
use ptgrade::calibration::{AdaptationLevel, CalibrationError, CalibrationProfile, CalibrationQuality};
use ptgrade::grading::{
    ExerciseGrader, FormIssue, GraderOptions, GradingResult, Phase, PushupGrader, PushupPhase,
};
use ptgrade_core::errors::{AppError, ErrorCode};
use tempfile::TempDir;

fn pushup_profile(body: &str) -> CalibrationProfile {
    CalibrationProfile::from_json(&format!(
        r#"{{"exercise": "pushup", "calibration_score": 92.0, "confidence_level": 0.95, {body}}}"#
    ))
    .unwrap()
}

fn calibrated(profile: CalibrationProfile) -> PushupGrader {
    init_test_logging();
    PushupGrader::new(&GraderOptions::default().with_calibration(profile))
}

#[test]
fn test_profile_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pushup.json");
    fs::write(
        &path,
        r#"{
            "exercise": "pushup",
            "angle_adjustments": {"pushup_elbow_down": -5.0},
            "visibility_thresholds": {"minimum_confidence": 0.6, "critical_joints": 0.7},
            "validation_ranges": {
                "angle_tolerances": {"elbow_extended": 12.0},
                "position_tolerances": {"hip_sag": 0.12}
            },
            "pose_normalization": {"shoulder_width": 0.2, "hip_width": 0.15, "arm_length": 0.3, "leg_length": 0.45},
            "calibration_score": 84.0,
            "confidence_level": 0.8,
            "frame_count": 90
        }"#,
    )
    .unwrap();

    let profile = CalibrationProfile::load(&path).unwrap();
    assert_eq!(profile.quality(), CalibrationQuality::Good);
    assert_eq!(profile.adaptation_level(), AdaptationLevel::Medium);
    assert_eq!(profile.position_tolerance("hip_sag"), Some(0.12));
    assert_eq!(profile.angle_tolerance("elbow_extended"), Some(12.0));
    assert_eq!(profile.frame_count, 90);

    let grader = calibrated(profile);
    assert!((grader.config().elbow_flexed_angle - 95.0).abs() < f64::EPSILON);
    assert!((grader.config().hip_sag_tolerance - 0.12).abs() < f64::EPSILON);
}

#[test]
fn test_tighter_depth_threshold_rejects_shallow_rep() {
    let mut grader = calibrated(pushup_profile(r#""angle_adjustments": {"pushup_elbow_down": -40.0}"#));
    let results = grade_all(&mut grader, &pushup_rep(0.0, 0.0));

    // The 66 degree bottom no longer counts as flexed
    assert_eq!(
        results[5],
        GradingResult::InProgress {
            phase: Phase::Pushup(PushupPhase::Descending)
        }
    );
    assert_eq!(reps_in(&results), 0);
    assert_eq!(
        grader.stats().rejections.last().unwrap().issue,
        FormIssue::IncompleteDescent
    );
}

#[test]
fn test_position_tolerance_replaces_default() {
    let mut grader = calibrated(pushup_profile(
        r#""validation_ranges": {"position_tolerances": {"hip_sag": 0.25}}"#,
    ));
    let results = grade_all(&mut grader, &pushup_rep(0.0, 0.09));
    assert_eq!(reps_in(&results), 1);
}

#[test]
fn test_profile_for_other_exercise_is_ignored() {
    init_test_logging();
    let profile = CalibrationProfile::from_json(
        r#"{"exercise": "situp", "angle_adjustments": {"pushup_elbow_down": -40.0},
            "calibration_score": 95.0, "confidence_level": 0.2}"#,
    )
    .unwrap();
    let mut grader = PushupGrader::new(&GraderOptions::default().with_calibration(profile));

    assert!((grader.config().elbow_flexed_angle - 100.0).abs() < f64::EPSILON);
    let results = grade_all(&mut grader, &pushup_rep(0.0, 0.0));
    assert_eq!(reps_in(&results), 1);
    // The situp profile's low confidence does not leak into push-up grading
    assert!(grader.grading_confidence() > 0.5);
}

#[test]
fn test_critical_visibility_threshold_gates_frames() {
    let mut grader = calibrated(pushup_profile(
        r#""visibility_thresholds": {"critical_joints": 0.95}"#,
    ));
    let results = grade_all(&mut grader, &pushup_rep(0.0, 0.0));
    assert!(results
        .iter()
        .all(|r| matches!(r, GradingResult::InvalidPose { .. })));
    assert_eq!(grader.phase(), Phase::Pushup(PushupPhase::Invalid));
}

#[test]
fn test_inconsistent_calibration_falls_back_to_defaults() {
    // Pushing the flexed threshold above the extended one would invert the bands
    let mut grader = calibrated(pushup_profile(r#""angle_adjustments": {"pushup_elbow_down": 60.0}"#));
    assert!((grader.config().elbow_flexed_angle - 100.0).abs() < f64::EPSILON);
    let results = grade_all(&mut grader, &pushup_rep(0.0, 0.0));
    assert_eq!(reps_in(&results), 1);
}

#[test]
fn test_profile_confidence_scales_grading_confidence() {
    let mut uncalibrated = PushupGrader::new(&GraderOptions::default());
    let mut low = calibrated(
        CalibrationProfile::from_json(
            r#"{"exercise": "pushup", "calibration_score": 65.0, "confidence_level": 0.5}"#,
        )
        .unwrap(),
    );
    let frames = pushup_rep(0.0, 0.0);
    grade_all(&mut uncalibrated, &frames);
    grade_all(&mut low, &frames);

    assert!(low.grading_confidence() <= 0.5 + f64::EPSILON);
    assert!(uncalibrated.grading_confidence() > low.grading_confidence());
    assert!((0.0..=1.0).contains(&uncalibrated.grading_confidence()));
}

#[test]
fn test_invalid_profiles_are_rejected() {
    let malformed = CalibrationProfile::from_json("{ not json").unwrap_err();
    assert!(matches!(malformed, CalibrationError::Parse(_)));

    let out_of_range = CalibrationProfile::from_json(
        r#"{"exercise": "plank", "calibration_score": 140.0, "confidence_level": 0.5}"#,
    )
    .unwrap_err();
    assert!(matches!(
        out_of_range,
        CalibrationError::OutOfRange { ref field, .. } if field == "calibration_score"
    ));

    let dir = TempDir::new().unwrap();
    let missing = CalibrationProfile::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(missing, CalibrationError::Io { .. }));
    assert_eq!(AppError::from(missing).code, ErrorCode::CalibrationInvalid);
}
