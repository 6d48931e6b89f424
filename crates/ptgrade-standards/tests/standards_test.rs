// ABOUTME: Integration tests for the standards scoring engine
// ABOUTME: Bracket boundaries, plank threshold scan, totals, and fatal load errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::fs;

use ptgrade_core::errors::{AppError, ErrorCode};
use ptgrade_core::models::{ExerciseType, Gender, Participant};
use ptgrade_standards::table::file_names;
use ptgrade_standards::{
    AgeBracket, PerformanceClass, PftPerformance, ScoreLookup, StandardsEngine, StandardsError,
    StandardsSources, UpperBodyEvent,
};
use tempfile::TempDir;

fn engine() -> StandardsEngine {
    StandardsEngine::bundled().expect("bundled standards must load")
}

#[test]
fn test_bundled_tables_load() {
    let engine = engine();
    assert_eq!(engine.metadata(ExerciseType::Pushup).exercise, "pushups");
    assert_eq!(engine.metadata(ExerciseType::Run).exercise, "run_3mile");
    assert!(!engine.plank_thresholds().is_empty());
}

#[test]
fn test_age_bracket_boundaries() {
    let engine = engine();
    let brackets = engine.age_brackets(ExerciseType::Pushup, Gender::Male);
    assert_eq!(brackets[0], AgeBracket::Closed { lo: 17, hi: 20 });
    assert_eq!(brackets[1], AgeBracket::Closed { lo: 21, hi: 25 });
    assert_eq!(brackets[7], AgeBracket::OpenEnded { min: 51 });

    // 60 push-ups score differently in every bracket
    let score = |age| engine.score(ExerciseType::Pushup, 60, age, Gender::Male);
    assert_eq!(score(20), 52);
    assert_eq!(score(21), 54);
    assert_eq!(score(51), 67);
    assert_eq!(score(80), 67);
}

#[test]
fn test_sit_up_table_uses_its_own_brackets() {
    let engine = engine();
    let brackets = engine.age_brackets(ExerciseType::Situp, Gender::Female);
    assert_eq!(brackets.first(), Some(&AgeBracket::Closed { lo: 17, hi: 21 }));
    assert_eq!(brackets.last(), Some(&AgeBracket::OpenEnded { min: 62 }));
    assert!(engine.age_brackets(ExerciseType::Plank, Gender::Male).is_empty());
}

#[test]
fn test_plank_uses_highest_threshold_met() {
    let engine = engine();
    let participant = Participant::new(30, Gender::Female);

    // 130 s falls between the 128 s and 133 s thresholds
    assert_eq!(
        engine.lookup(ExerciseType::Plank, 130, participant),
        ScoreLookup::Scored(64)
    );
    assert_eq!(engine.lookup(ExerciseType::Plank, 128, participant), ScoreLookup::Scored(64));
    assert_eq!(engine.lookup(ExerciseType::Plank, 225, participant), ScoreLookup::Scored(100));

    let (min_seconds, _) = engine.plank_time_range();
    assert_eq!(engine.score(ExerciseType::Plank, min_seconds - 1, 30, Gender::Male), 0);
}

#[test]
fn test_plank_ignores_age_and_gender() {
    let engine = engine();
    let a = engine.score(ExerciseType::Plank, 180, 18, Gender::Male);
    let b = engine.score(ExerciseType::Plank, 180, 60, Gender::Female);
    assert_eq!(a, b);
    assert!(a > 0);
}

#[test]
fn test_run_keys_are_minutes_and_seconds() {
    let engine = engine();
    assert_eq!(engine.score(ExerciseType::Run, 21 * 60, 22, Gender::Male), 81);
    assert!(engine.is_passing(ExerciseType::Run, 21 * 60, Participant::new(22, Gender::Male)));
    assert_eq!(
        engine.lookup(ExerciseType::Run, 50 * 60, Participant::new(22, Gender::Male)),
        ScoreLookup::KeyNotFound
    );
}

#[test]
fn test_full_test_breakdown() {
    let engine = engine();
    let performance = PftPerformance {
        upper_body: Some(UpperBodyEvent::Pullups(10)),
        plank_seconds: 130,
        run_seconds: 21 * 60,
    };
    let breakdown = engine.score_pft(&performance, Participant::new(22, Gender::Male));

    assert_eq!(breakdown.upper_body.map(|(_, lookup)| lookup), Some(ScoreLookup::Scored(59)));
    assert_eq!(breakdown.plank, ScoreLookup::Scored(64));
    assert_eq!(breakdown.run, ScoreLookup::Scored(81));
    assert_eq!(breakdown.total, 204);
    assert_eq!(breakdown.class, PerformanceClass::ThirdClass);
}

#[test]
fn test_load_from_directory() {
    let dir = TempDir::new().unwrap();
    let sources = StandardsSources::bundled();
    fs::write(dir.path().join(file_names::PUSHUPS), &sources.pushups).unwrap();
    fs::write(dir.path().join(file_names::PULLUPS), &sources.pullups).unwrap();
    fs::write(dir.path().join(file_names::SITUPS), &sources.situps).unwrap();
    fs::write(dir.path().join(file_names::RUN), &sources.run).unwrap();
    fs::write(dir.path().join(file_names::PLANK), &sources.plank).unwrap();

    let engine = StandardsEngine::from_dir(dir.path()).unwrap();
    assert_eq!(engine.score(ExerciseType::Pushup, 60, 20, Gender::Male), 52);
}

#[test]
fn test_missing_table_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let error = StandardsEngine::from_dir(dir.path()).unwrap_err();
    assert!(matches!(error, StandardsError::Io { .. }));

    let app_error = AppError::from(error);
    assert_eq!(app_error.code, ErrorCode::StandardsDataMissing);
    assert!(app_error.code.is_fatal());
}

#[test]
fn test_malformed_bracket_is_fatal() {
    let mut sources = StandardsSources::bundled();
    sources.pullups = sources.pullups.replacen("\"21-25\"", "\"twenty-one\"", 1);
    let error = StandardsEngine::from_sources(&sources).unwrap_err();
    assert!(matches!(error, StandardsError::InvalidBracket { .. }));
}

#[test]
fn test_overlapping_brackets_are_fatal() {
    let mut sources = StandardsSources::bundled();
    sources.pushups = sources.pushups.replacen("\"21-25\"", "\"20-25\"", 1);
    let error = StandardsEngine::from_sources(&sources).unwrap_err();
    assert!(matches!(error, StandardsError::BracketLayout { .. }));
}

#[test]
fn test_invalid_json_is_fatal() {
    let mut sources = StandardsSources::bundled();
    sources.plank = "{ not json".to_owned();
    let error = StandardsEngine::from_sources(&sources).unwrap_err();
    assert!(matches!(error, StandardsError::Parse { .. }));
    assert_eq!(AppError::from(error).code, ErrorCode::StandardsDataInvalid);
}
