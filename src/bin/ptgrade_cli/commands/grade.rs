// ABOUTME: Grade command: replays a JSON-lines pose recording through a workout session
// ABOUTME: Prints per-frame results when verbose and a JSON summary at the end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use ptgrade::calibration::CalibrationProfile;
use ptgrade::config::GradingConfig;
use ptgrade::grading::{GraderOptions, GradingResult};
use ptgrade::session::WorkoutSession;
use ptgrade_core::models::{ExerciseType, Gender, Participant, PoseFrame};
use ptgrade_standards::StandardsEngine;
use serde_json::json;
use tracing::info;

/// Inputs of one grading run
pub struct GradeRequest {
    /// Exercise performed
    pub exercise: ExerciseType,
    /// JSON-lines recording
    pub frames: PathBuf,
    /// Calibration profile path
    pub calibration: Option<PathBuf>,
    /// Configuration document path
    pub config: Option<PathBuf>,
    /// Participant age; scoring needs both age and gender
    pub age: Option<u8>,
    /// Participant gender
    pub gender: Option<Gender>,
    /// Print per-frame results
    pub verbose: bool,
}

fn grader_options(request: &GradeRequest) -> Result<GraderOptions> {
    let mut options = match &request.config {
        Some(path) => GraderOptions::default().with_config(GradingConfig::from_json_file(path)?),
        None => GraderOptions::from_global(),
    };
    if let Some(path) = &request.calibration {
        let profile = CalibrationProfile::load(path)?;
        info!(
            exercise = %profile.exercise,
            quality = %profile.quality(),
            "Loaded calibration profile"
        );
        options = options.with_calibration(profile);
    }
    if let (Some(age), Some(gender)) = (request.age, request.gender) {
        let engine = StandardsEngine::init_global()?;
        options = options.with_scoring(engine, Participant::new(age, gender));
    }
    Ok(options)
}

/// Grade every frame in the recording
pub fn run(request: &GradeRequest) -> Result<()> {
    let options = grader_options(request)?;
    let mut session = WorkoutSession::new(request.exercise, &options)?;

    let file = File::open(&request.frames)
        .with_context(|| format!("Failed to open {}", request.frames.display()))?;
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame: PoseFrame = serde_json::from_str(&line)
            .with_context(|| format!("Invalid pose frame on line {}", index + 1))?;
        let result = session.process(&frame);
        if request.verbose && !matches!(result, GradingResult::NoChange) {
            let grader = session.grader();
            println!(
                "{}",
                json!({
                    "line": index + 1,
                    "timestamp": frame.timestamp(),
                    "phase": grader.phase_description(),
                    "reps": grader.rep_count(),
                    "result": result,
                })
            );
        }
    }

    let summary = session.finish();
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
