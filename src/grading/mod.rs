// ABOUTME: Exercise grading contract, grading results, and grader construction
// ABOUTME: Shared gate, session, confidence, and scoring plumbing for the four graders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Graders
//!
//! One grader per workout session. Each call to
//! [`ExerciseGrader::grade_pose`] consumes one frame and returns a
//! [`GradingResult`]; session state is read through accessors. Frames must
//! arrive in time order and never concurrently for the same grader.
//!
//! Every grader runs the same pipeline: visibility gate, measurements,
//! form checks, candidate phase, hysteresis, rep-scoped tracking, and
//! completion checks on the rep-defining transition.

pub mod form;
pub mod hysteresis;
pub mod phase;
pub mod plank;
pub mod pullup;
pub mod pushup;
pub mod situp;
pub mod stats;
pub mod visibility;

pub use form::FormIssue;
pub use hysteresis::{PhaseStabilizer, PhaseTransition};
pub use phase::{Phase, PlankStatus, PullupPhase, PushupPhase, SitupPhase};
pub use plank::PlankGrader;
pub use pullup::{PullupGrader, PullupRepTracking};
pub use pushup::{PushupGrader, PushupRepTracking};
pub use situp::{SitupGrader, SitupRepTracking};
pub use stats::{RejectedRep, RejectionLog, SessionStats};
pub use visibility::{GateOutcome, InvalidFrameTracker, VisibilityGate};

use std::collections::BTreeSet;
use std::fmt;

use ptgrade_core::errors::{AppError, AppResult};
use ptgrade_core::models::{ExerciseType, Joint, Participant, PoseFrame};
use ptgrade_standards::{ScoreLookup, StandardsEngine};
use serde::{Deserialize, Serialize};

use crate::calibration::{AngleReading, CalibrationProfile, ConfidenceTracker};
use crate::config::{ConfidenceConfig, GateConfig, GradingConfig};

/// Outcome of grading one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GradingResult {
    /// A rep was counted
    RepCompleted {
        /// Form quality of the rep in [0, 1]
        form_quality: f64,
    },
    /// The committed phase changed
    InProgress {
        /// Phase just committed
        phase: Phase,
    },
    /// The frame failed the visibility gate and was ignored
    InvalidPose {
        /// Which joints could not be seen
        reason: String,
    },
    /// A form fault, or a rep attempt that was not counted
    IncorrectForm {
        /// Feedback for the participant
        feedback: String,
    },
    /// Nothing to report
    NoChange,
}

impl GradingResult {
    /// Whether this result counted a rep
    #[must_use]
    pub const fn is_rep(&self) -> bool {
        matches!(self, Self::RepCompleted { .. })
    }
}

/// Standards engine and the participant scores are computed for
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext {
    /// Process-wide standards tables
    pub engine: &'static StandardsEngine,
    /// Age and gender used for bracket lookup
    pub participant: Participant,
}

/// Everything a grader is parameterized by
#[derive(Debug, Clone, Default)]
pub struct GraderOptions {
    /// Thresholds for every exercise
    pub config: GradingConfig,
    /// Optional per-user calibration
    pub calibration: Option<CalibrationProfile>,
    /// Optional scoring context for final scores
    pub scoring: Option<ScoringContext>,
}

impl GraderOptions {
    /// Options using the process-wide configuration
    #[must_use]
    pub fn from_global() -> Self {
        Self {
            config: GradingConfig::global().clone(),
            ..Self::default()
        }
    }

    /// Use `config`
    #[must_use]
    pub fn with_config(mut self, config: GradingConfig) -> Self {
        self.config = config;
        self
    }

    /// Apply a calibration profile
    #[must_use]
    pub fn with_calibration(mut self, profile: CalibrationProfile) -> Self {
        self.calibration = Some(profile);
        self
    }

    /// Enable final scores for `participant`
    #[must_use]
    pub fn with_scoring(mut self, engine: &'static StandardsEngine, participant: Participant) -> Self {
        self.scoring = Some(ScoringContext {
            engine,
            participant,
        });
        self
    }
}

/// Common contract of the exercise graders
pub trait ExerciseGrader: Send + fmt::Debug {
    /// Exercise graded
    fn exercise(&self) -> ExerciseType;

    /// Clear reps, phase, tracking, issues, and problem joints
    ///
    /// Calling it twice is the same as calling it once.
    fn reset_state(&mut self);

    /// Grade one frame
    fn grade_pose(&mut self, frame: &PoseFrame) -> GradingResult;

    /// Points for the session so far
    ///
    /// `None` with zero reps or zero hold time, or when no scoring
    /// context was supplied.
    fn calculate_final_score(&self) -> Option<ScoreLookup>;

    /// Reported phase
    fn phase(&self) -> Phase;

    /// Reported phase as display text
    fn phase_description(&self) -> &'static str {
        self.phase().description()
    }

    /// Session state
    fn stats(&self) -> &SessionStats;

    /// Counted reps
    fn rep_count(&self) -> u32 {
        self.stats().rep_count
    }

    /// Running average form quality in [0, 1]
    fn form_quality_average(&self) -> f64 {
        self.stats().form_quality_average()
    }

    /// Most recent form feedback
    fn last_form_issue(&self) -> Option<&str> {
        self.stats().last_form_issue.as_deref()
    }

    /// Joints to highlight
    fn problem_joints(&self) -> &BTreeSet<Joint> {
        &self.stats().problem_joints
    }

    /// Hold time for timed exercises
    fn hold_seconds(&self) -> Option<f64> {
        None
    }

    /// Confidence in the grader's decisions, in [0, 1]
    fn grading_confidence(&self) -> f64;
}

/// Build the grader for `exercise`
///
/// # Errors
///
/// Returns an error for exercises that are not graded from pose frames
pub fn create_grader(
    exercise: ExerciseType,
    options: &GraderOptions,
) -> AppResult<Box<dyn ExerciseGrader>> {
    match exercise {
        ExerciseType::Pushup => Ok(Box::new(PushupGrader::new(options))),
        ExerciseType::Pullup => Ok(Box::new(PullupGrader::new(options))),
        ExerciseType::Situp => Ok(Box::new(SitupGrader::new(options))),
        ExerciseType::Plank => Ok(Box::new(PlankGrader::new(options))),
        ExerciseType::Run => Err(AppError::invalid_input(format!(
            "{} is not graded from pose frames",
            exercise.display_name()
        ))),
    }
}

/// Outcome of the gate stage
#[derive(Debug)]
enum Admission {
    Admitted,
    Rejected {
        reason: String,
        /// The tolerance was just reached or is still exceeded
        invalidate: bool,
    },
}

/// Plumbing shared by every grader
#[derive(Debug)]
struct GraderCore {
    exercise: ExerciseType,
    gate: VisibilityGate,
    invalid_frames: InvalidFrameTracker,
    stats: SessionStats,
    confidence: ConfidenceTracker,
    scoring: Option<ScoringContext>,
}

impl GraderCore {
    fn new(
        exercise: ExerciseType,
        gate: VisibilityGate,
        gate_config: &GateConfig,
        confidence_config: &ConfidenceConfig,
        options: &GraderOptions,
    ) -> Self {
        let profile = options
            .calibration
            .as_ref()
            .filter(|profile| profile.applies_to(exercise));
        let confidence =
            ConfidenceTracker::new(confidence_config.clone(), profile, gate.thresholds().critical);
        Self {
            exercise,
            gate,
            invalid_frames: InvalidFrameTracker::new(gate_config.invalid_frame_tolerance),
            stats: SessionStats::default(),
            confidence,
            scoring: options.scoring,
        }
    }

    fn admit(&mut self, frame: &PoseFrame) -> Admission {
        match self.gate.check(frame) {
            GateOutcome::Pass => {
                self.invalid_frames.record_pass();
                Admission::Admitted
            }
            GateOutcome::Fail { missing, reason } => {
                let invalidate = self.invalid_frames.record_failure();
                self.stats.problem_joints = missing.into_iter().collect();
                Admission::Rejected { reason, invalidate }
            }
        }
    }

    fn record_confidence(&mut self, frame: &PoseFrame, readings: &[AngleReading], issues: &[FormIssue]) {
        let mean = frame.mean_confidence(self.gate.required());
        self.confidence.record(mean, readings, form::frame_form_score(issues));
    }

    fn lookup(&self, value: u32) -> Option<ScoreLookup> {
        if value == 0 {
            return None;
        }
        let scoring = self.scoring?;
        Some(scoring.engine.lookup(self.exercise, value, scoring.participant))
    }

    fn reset(&mut self) {
        self.stats = SessionStats::default();
        self.invalid_frames.record_pass();
        self.confidence.reset();
    }
}

/// Fault list in salience order without duplicates
fn push_unique(faults: &mut Vec<FormIssue>, issue: FormIssue) {
    if !faults.contains(&issue) {
        faults.push(issue);
    }
}
