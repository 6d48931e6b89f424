// ABOUTME: Main library entry point for the ptgrade fitness test grading engine
// ABOUTME: Exercise graders, calibration, grading configuration, logging, and sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # ptgrade
//!
//! Real-time grading of fitness-test exercises from pose frames. A pose
//! detector supplies normalized joint positions with confidences; a grader
//! turns the frame stream into counted reps (push-ups, pull-ups, sit-ups)
//! or a timed hold (plank), with form feedback and problem joints for the
//! caller to display. Final results are converted to points through the
//! bundled standards tables.
//!
//! ## Architecture
//!
//! - **grading**: visibility gate, hysteresis, and one state machine per exercise
//! - **calibration**: per-user threshold offsets and grading confidence
//! - **config**: every grading threshold, with environment overrides
//! - **session**: one grader wrapped with an id, timestamps, and a summary
//! - **logging**: `tracing` subscriber setup for the binaries
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ptgrade::grading::{create_grader, GraderOptions, GradingResult};
//! use ptgrade_core::errors::AppResult;
//! use ptgrade_core::models::{ExerciseType, PoseFrame};
//!
//! fn count_reps(frames: &[PoseFrame]) -> AppResult<u32> {
//!     let mut grader = create_grader(ExerciseType::Pushup, &GraderOptions::from_global())?;
//!     for frame in frames {
//!         if let GradingResult::IncorrectForm { feedback } = grader.grade_pose(frame) {
//!             println!("{feedback}");
//!         }
//!     }
//!     Ok(grader.rep_count())
//! }
//! ```

/// Calibration profiles and grading confidence
pub mod calibration;

/// Grading thresholds and environment overrides
pub mod config;

/// Exercise graders and their building blocks
pub mod grading;

/// Logging configuration and structured session events
pub mod logging;

/// Workout session wrapper and summaries
pub mod session;

pub use calibration::CalibrationProfile;
pub use config::GradingConfig;
pub use grading::{create_grader, ExerciseGrader, GraderOptions, GradingResult};
pub use session::{WorkoutSession, WorkoutSummary};
