// ABOUTME: Core data models for pose frames, joints, and exercises
// ABOUTME: Re-exports the joint, pose-frame, and exercise types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Core data models consumed by graders and the standards engine.

mod exercise;
mod joint;
mod pose;

pub use exercise::{ExerciseType, Gender, Participant};
pub use joint::{pairs, Joint, JointTier};
pub use pose::{JointObservation, Point2D, PoseFrame, PoseFrameBuilder};
