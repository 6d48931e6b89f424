// ABOUTME: Integration tests for the plank hold timer
// ABOUTME: Sustained-hold scoring, fault tolerance, broken holds, frame gaps, and occlusion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{grade_all, init_test_logging, occluded_frame, plank_frame};
use ptgrade::grading::{
    ExerciseGrader, FormIssue, GraderOptions, GradingResult, Phase, PlankGrader, PlankStatus,
};
use ptgrade_core::models::{Gender, Participant, PoseFrame};
use ptgrade_standards::{ScoreLookup, StandardsEngine};

const SAG: f64 = 0.08;

fn grader() -> PlankGrader {
    init_test_logging();
    PlankGrader::new(&GraderOptions::default())
}

fn clean_frames(from: u32, to: u32) -> Vec<PoseFrame> {
    (from..to).map(|i| plank_frame(f64::from(i) / 10.0, 0.0)).collect()
}

fn held(grader: &PlankGrader) -> f64 {
    grader.hold_seconds().unwrap()
}

#[test]
fn test_sustained_hold_scores_highest_threshold_met() {
    init_test_logging();
    let engine = StandardsEngine::init_global().unwrap();
    let options = GraderOptions::default().with_scoring(engine, Participant::new(30, Gender::Female));
    let mut grader = PlankGrader::new(&options);

    // 1301 frames at 10 fps span 130 seconds
    grade_all(&mut grader, &clean_frames(0, 1301));

    assert!((held(&grader) - 130.0).abs() < 1e-6);
    assert_eq!(grader.calculate_final_score(), Some(ScoreLookup::Scored(64)));
    assert_eq!(grader.phase(), Phase::Plank(PlankStatus::Holding));
    assert!((grader.form_quality_average() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_first_clean_frame_starts_hold() {
    let mut grader = grader();
    assert_eq!(grader.phase(), Phase::Plank(PlankStatus::Waiting));

    let sagging = grader.grade_pose(&plank_frame(0.0, SAG));
    assert_eq!(sagging, GradingResult::NoChange);
    assert_eq!(grader.phase(), Phase::Plank(PlankStatus::Waiting));

    let clean = grader.grade_pose(&plank_frame(0.1, 0.0));
    assert_eq!(
        clean,
        GradingResult::InProgress {
            phase: Phase::Plank(PlankStatus::Holding)
        }
    );
    assert!(held(&grader).abs() < f64::EPSILON);
}

#[test]
fn test_brief_faults_are_tolerated() {
    let mut grader = grader();
    grade_all(&mut grader, &clean_frames(0, 11));

    let faults: Vec<PoseFrame> = (11..16).map(|i| plank_frame(f64::from(i) / 10.0, SAG)).collect();
    let results = grade_all(&mut grader, &faults);
    assert!(results.iter().all(|r| *r
        == GradingResult::IncorrectForm {
            feedback: FormIssue::HipsSagging.message().to_owned()
        }));

    grade_all(&mut grader, &clean_frames(16, 21));
    assert_eq!(grader.status(), PlankStatus::Holding);
    assert!((held(&grader) - 2.0).abs() < 1e-9);
}

#[test]
fn test_sustained_fault_breaks_hold() {
    let mut grader = grader();
    grade_all(&mut grader, &clean_frames(0, 11));

    let faults: Vec<PoseFrame> = (11..22).map(|i| plank_frame(f64::from(i) / 10.0, SAG)).collect();
    let results = grade_all(&mut grader, &faults);

    let GradingResult::IncorrectForm { feedback } = results.last().unwrap() else {
        panic!("expected the hold to end with feedback");
    };
    assert!(feedback.starts_with("Hold ended"));
    assert_eq!(grader.status(), PlankStatus::Broken);
    let at_break = held(&grader);
    assert!((at_break - 2.0).abs() < 1e-9);

    // A broken hold never resumes
    let after = grade_all(&mut grader, &clean_frames(22, 40));
    assert!(after.iter().all(|r| *r == GradingResult::NoChange));
    assert!((held(&grader) - at_break).abs() < f64::EPSILON);
}

#[test]
fn test_frame_gaps_are_capped() {
    let mut grader = grader();
    grade_all(
        &mut grader,
        &[plank_frame(0.0, 0.0), plank_frame(10.0, 0.0), plank_frame(9.0, 0.0)],
    );
    let max_gap = grader.config().max_frame_gap_secs;
    assert!((held(&grader) - max_gap).abs() < 1e-9);
}

#[test]
fn test_occlusion_pauses_the_timer() {
    let mut grader = grader();
    grade_all(&mut grader, &[plank_frame(0.0, 0.0), plank_frame(0.1, 0.0)]);

    let results = grade_all(
        &mut grader,
        &[occluded_frame(0.2), occluded_frame(0.3), occluded_frame(0.4)],
    );
    assert!(results
        .iter()
        .all(|r| matches!(r, GradingResult::InvalidPose { .. })));
    assert_eq!(grader.phase(), Phase::Plank(PlankStatus::Invalid));
    assert_eq!(grader.status(), PlankStatus::Holding);

    grader.grade_pose(&plank_frame(5.0, 0.0));
    assert_eq!(grader.phase(), Phase::Plank(PlankStatus::Holding));
    assert!((held(&grader) - 0.1).abs() < 1e-9);
}

#[test]
fn test_single_occluded_frame_keeps_the_timer_running() {
    let mut steady = grader();
    grade_all(&mut steady, &clean_frames(0, 101));

    let mut flicker = grader();
    let frames: Vec<PoseFrame> = (0..101)
        .map(|i| {
            let timestamp = f64::from(i) / 10.0;
            if i == 50 {
                occluded_frame(timestamp)
            } else {
                plank_frame(timestamp, 0.0)
            }
        })
        .collect();
    let results = grade_all(&mut flicker, &frames);

    assert!(matches!(results[50], GradingResult::InvalidPose { .. }));
    assert_eq!(flicker.phase(), Phase::Plank(PlankStatus::Holding));
    assert!((held(&steady) - 10.0).abs() < 1e-6);
    assert!((held(&flicker) - held(&steady)).abs() < 1e-6);
}

#[test]
fn test_quality_averages_holding_frames() {
    let mut grader = grader();
    grade_all(&mut grader, &clean_frames(0, 4));
    grader.grade_pose(&plank_frame(0.4, SAG));

    // The sagging frame also bends the knees: two faults, half quality
    assert!((grader.form_quality_average() - 0.9).abs() < 1e-9);
}

#[test]
fn test_no_score_without_hold() {
    let engine = StandardsEngine::init_global().unwrap();
    let options = GraderOptions::default().with_scoring(engine, Participant::new(30, Gender::Male));
    let grader = PlankGrader::new(&options);
    assert_eq!(grader.calculate_final_score(), None);
    assert_eq!(grader.rep_count(), 0);
}

#[test]
fn test_reset_is_idempotent() {
    let mut grader = grader();
    grade_all(&mut grader, &clean_frames(0, 50));
    grader.reset_state();
    grader.reset_state();

    assert!(held(&grader).abs() < f64::EPSILON);
    assert_eq!(grader.phase(), Phase::Plank(PlankStatus::Waiting));
    assert!(grader.form_quality_average().abs() < f64::EPSILON);
    assert!(grader.problem_joints().is_empty());
}
