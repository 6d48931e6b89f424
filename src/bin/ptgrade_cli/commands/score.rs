// ABOUTME: Score and total commands: standards-table lookups from the command line
// ABOUTME: Accepts reps, seconds, or M:SS times and prints JSON results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{bail, Context, Result};
use ptgrade_core::models::{ExerciseType, Gender, Participant};
use ptgrade_standards::{max_score, PftPerformance, StandardsEngine, UpperBodyEvent};
use serde_json::json;

/// Parse reps, whole seconds, or an `M:SS` time
fn parse_performance(exercise: ExerciseType, raw: &str) -> Result<u32> {
    let raw = raw.trim();
    match raw.split_once(':') {
        Some((minutes, seconds)) if exercise.is_timed() => {
            let minutes: u32 = minutes.parse().with_context(|| format!("Invalid time {raw}"))?;
            let seconds: u32 = seconds.parse().with_context(|| format!("Invalid time {raw}"))?;
            if seconds >= 60 {
                bail!("Invalid time {raw}: seconds must be below 60");
            }
            Ok(minutes * 60 + seconds)
        }
        Some(_) => bail!("{exercise} is scored by reps, not time"),
        None => raw
            .parse()
            .with_context(|| format!("Invalid performance {raw}")),
    }
}

/// Look up one event
pub fn score_event(exercise: ExerciseType, performance: &str, age: u8, gender: Gender) -> Result<()> {
    let engine = StandardsEngine::init_global()?;
    let value = parse_performance(exercise, performance)?;
    let participant = Participant::new(age, gender);
    let lookup = engine.lookup(exercise, value, participant);

    let report = json!({
        "exercise": exercise,
        "value": value,
        "lookup": lookup,
        "points": lookup.points(),
        "max_points": max_score(exercise),
        "passing": engine.is_passing(exercise, value, participant),
        "table_version": engine.metadata(exercise).version,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Score a full test
pub fn score_total(
    pushups: Option<u32>,
    pullups: Option<u32>,
    plank: &str,
    run: &str,
    age: u8,
    gender: Gender,
) -> Result<()> {
    let engine = StandardsEngine::init_global()?;
    let upper_body = match (pushups, pullups) {
        (Some(_), Some(_)) => bail!("Score either push-ups or pull-ups, not both"),
        (Some(reps), None) => Some(UpperBodyEvent::Pushups(reps)),
        (None, Some(reps)) => Some(UpperBodyEvent::Pullups(reps)),
        (None, None) => None,
    };
    let performance = PftPerformance {
        upper_body,
        plank_seconds: parse_performance(ExerciseType::Plank, plank)?,
        run_seconds: parse_performance(ExerciseType::Run, run)?,
    };
    let breakdown = engine.score_pft(&performance, Participant::new(age, gender));

    let report = json!({
        "performance": performance,
        "breakdown": breakdown,
        "class": breakdown.class.label(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
