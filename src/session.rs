// ABOUTME: Workout session wrapper around a single exercise grader
// ABOUTME: Session identity, wall-clock bounds, result counters, and the final summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use ptgrade_core::errors::AppResult;
use ptgrade_core::models::{ExerciseType, PoseFrame};
use ptgrade_standards::ScoreLookup;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::grading::{create_grader, ExerciseGrader, GraderOptions, GradingResult};
use crate::logging::SessionLogger;

/// Frames seen per grading result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCounts {
    /// `RepCompleted` results
    pub rep_completed: u64,
    /// `InProgress` results
    pub in_progress: u64,
    /// `InvalidPose` results
    pub invalid_pose: u64,
    /// `IncorrectForm` results
    pub incorrect_form: u64,
    /// `NoChange` results
    pub no_change: u64,
}

impl ResultCounts {
    /// Count one result
    pub fn record(&mut self, result: &GradingResult) {
        let counter = match result {
            GradingResult::RepCompleted { .. } => &mut self.rep_completed,
            GradingResult::InProgress { .. } => &mut self.in_progress,
            GradingResult::InvalidPose { .. } => &mut self.invalid_pose,
            GradingResult::IncorrectForm { .. } => &mut self.incorrect_form,
            GradingResult::NoChange => &mut self.no_change,
        };
        *counter += 1;
    }

    /// Frames graded
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.rep_completed + self.in_progress + self.invalid_pose + self.incorrect_form + self.no_change
    }
}

/// Outcome of a finished workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    /// Session id
    pub session_id: Uuid,
    /// Exercise graded
    pub exercise: ExerciseType,
    /// When the session was created
    pub started_at: DateTime<Utc>,
    /// When the session was finished
    pub ended_at: DateTime<Utc>,
    /// Results by kind
    pub results: ResultCounts,
    /// Counted reps
    pub reps: u32,
    /// Hold time for timed exercises
    pub hold_seconds: Option<f64>,
    /// Average form quality in [0, 1]
    pub form_quality_average: f64,
    /// Confidence in the grading decisions in [0, 1]
    pub grading_confidence: f64,
    /// Last feedback given
    pub last_form_issue: Option<String>,
    /// Rep attempts that were not counted
    pub rejected_attempts: usize,
    /// Standards lookup for the result, when scoring was enabled
    pub final_score: Option<ScoreLookup>,
}

/// One exercise graded from start to finish
#[derive(Debug)]
pub struct WorkoutSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    grader: Box<dyn ExerciseGrader>,
    results: ResultCounts,
}

impl WorkoutSession {
    /// Start a session for `exercise`
    ///
    /// # Errors
    ///
    /// Returns an error if `exercise` has no pose-frame grader
    pub fn new(exercise: ExerciseType, options: &GraderOptions) -> AppResult<Self> {
        let grader = create_grader(exercise, options)?;
        let id = Uuid::new_v4();
        let calibrated = options
            .calibration
            .as_ref()
            .is_some_and(|profile| profile.applies_to(exercise));
        SessionLogger::log_session_started(id, exercise, calibrated);
        Ok(Self {
            id,
            started_at: Utc::now(),
            grader,
            results: ResultCounts::default(),
        })
    }

    /// Session id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// When the session was created
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The underlying grader, for live state
    #[must_use]
    pub fn grader(&self) -> &dyn ExerciseGrader {
        self.grader.as_ref()
    }

    /// Results so far
    #[must_use]
    pub const fn results(&self) -> &ResultCounts {
        &self.results
    }

    /// Grade one frame
    pub fn process(&mut self, frame: &PoseFrame) -> GradingResult {
        let result = self.grader.grade_pose(frame);
        self.results.record(&result);
        result
    }

    /// Start over without creating a new session
    pub fn reset(&mut self) {
        self.grader.reset_state();
        self.results = ResultCounts::default();
    }

    /// End the session and summarize it
    #[must_use]
    pub fn finish(self) -> WorkoutSummary {
        let ended_at = Utc::now();
        let grader = self.grader.as_ref();
        let exercise = grader.exercise();
        let duration_secs = (ended_at - self.started_at).num_milliseconds() as f64 / 1000.0;
        SessionLogger::log_session_finished(
            self.id,
            exercise,
            grader.rep_count(),
            self.results.total(),
            duration_secs,
        );

        WorkoutSummary {
            session_id: self.id,
            exercise,
            started_at: self.started_at,
            ended_at,
            results: self.results,
            reps: grader.rep_count(),
            hold_seconds: grader.hold_seconds(),
            form_quality_average: grader.form_quality_average(),
            grading_confidence: grader.grading_confidence(),
            last_form_issue: grader.last_form_issue().map(str::to_owned),
            rejected_attempts: grader.stats().rejections.len(),
            final_score: grader.calculate_final_score(),
        }
    }
}
