// ABOUTME: Shared synthetic pose-frame fixtures for grader integration tests
// ABOUTME: Side-view push-up, sit-up, and plank bodies and a front-view pull-up body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::similar_names
)]
//! Shared fixtures for `ptgrade` integration tests.
//!
//! Coordinates are normalized with `y` growing downward. Side-view bodies
//! place the left and right joint of each pair at the same point.

use std::sync::Once;

use ptgrade::grading::{ExerciseGrader, GradingResult};
use ptgrade_core::geometry::lerp;
use ptgrade_core::models::{Joint, Point2D, PoseFrame, PoseFrameBuilder};

/// Confidence used for every fixture joint
pub const CONFIDENCE: f64 = 0.9;

/// Seconds between fixture frames
pub const FRAME_INTERVAL: f64 = 1.0 / 30.0;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

fn pair(builder: PoseFrameBuilder, joints: (Joint, Joint), point: Point2D) -> PoseFrameBuilder {
    builder
        .point(joints.0, point, CONFIDENCE)
        .point(joints.1, point, CONFIDENCE)
}

fn side_view(timestamp: f64, joints: &[((Joint, Joint), Point2D)]) -> PoseFrame {
    joints
        .iter()
        .fold(PoseFrame::builder(timestamp), |builder, (pair_joints, point)| {
            pair(builder, *pair_joints, *point)
        })
        .build()
}

const SHOULDERS: (Joint, Joint) = (Joint::LeftShoulder, Joint::RightShoulder);
const ELBOWS: (Joint, Joint) = (Joint::LeftElbow, Joint::RightElbow);
const WRISTS: (Joint, Joint) = (Joint::LeftWrist, Joint::RightWrist);
const HIPS: (Joint, Joint) = (Joint::LeftHip, Joint::RightHip);
const KNEES: (Joint, Joint) = (Joint::LeftKnee, Joint::RightKnee);
const ANKLES: (Joint, Joint) = (Joint::LeftAnkle, Joint::RightAnkle);

/// Push-up arm positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushupPose {
    /// Arms locked out, elbow at 180 degrees
    Top,
    /// Chest near the floor, elbow near 66 degrees
    Bottom,
}

/// Side-view push-up frame; `hip_drop` moves the hips below the body line
pub fn pushup_frame(timestamp: f64, pose: PushupPose, hip_drop: f64) -> PoseFrame {
    let wrist = Point2D::new(0.30, 0.60);
    let ankle = Point2D::new(0.85, 0.60);
    let (shoulder, elbow) = match pose {
        PushupPose::Top => (Point2D::new(0.30, 0.40), Point2D::new(0.30, 0.50)),
        PushupPose::Bottom => (Point2D::new(0.30, 0.52), Point2D::new(0.36, 0.57)),
    };
    let on_line = lerp(shoulder, ankle, 0.45);
    let hip = Point2D::new(on_line.x, on_line.y + hip_drop);
    side_view(
        timestamp,
        &[
            (SHOULDERS, shoulder),
            (ELBOWS, elbow),
            (WRISTS, wrist),
            (HIPS, hip),
            (ANKLES, ankle),
        ],
    )
}

/// One push-up: 3 top, 3 bottom, 3 top frames, hips dropped on bottom frames
pub fn pushup_rep(start: f64, hip_drop_at_bottom: f64) -> Vec<PoseFrame> {
    let poses = [
        (PushupPose::Top, 0.0),
        (PushupPose::Top, 0.0),
        (PushupPose::Top, 0.0),
        (PushupPose::Bottom, hip_drop_at_bottom),
        (PushupPose::Bottom, hip_drop_at_bottom),
        (PushupPose::Bottom, hip_drop_at_bottom),
        (PushupPose::Top, 0.0),
        (PushupPose::Top, 0.0),
        (PushupPose::Top, 0.0),
    ];
    poses
        .iter()
        .enumerate()
        .map(|(i, (pose, drop))| pushup_frame(start + i as f64 * FRAME_INTERVAL, *pose, *drop))
        .collect()
}

/// Front-view pull-up body
///
/// `rise` lifts the shoulders toward the bar (wrists at y = 0.10),
/// `elbow_out` bends the arms outward, `hip_shift` swings the lower body
/// sideways.
pub fn pullup_frame(timestamp: f64, rise: f64, elbow_out: f64, hip_shift: f64) -> PoseFrame {
    let wrist_y = 0.10;
    let shoulder_y = 0.30 - rise;
    let elbow_y = (shoulder_y + wrist_y) / 2.0;
    let hip_y = shoulder_y + 0.25;
    let (left_x, right_x) = (0.40, 0.60);
    let (left_leg_x, right_leg_x) = (0.45 + hip_shift, 0.55 + hip_shift);

    PoseFrame::builder(timestamp)
        .joint(Joint::Nose, 0.50, shoulder_y - 0.06, CONFIDENCE)
        .joint(Joint::LeftShoulder, left_x, shoulder_y, CONFIDENCE)
        .joint(Joint::RightShoulder, right_x, shoulder_y, CONFIDENCE)
        .joint(Joint::LeftElbow, left_x - elbow_out, elbow_y, CONFIDENCE)
        .joint(Joint::RightElbow, right_x + elbow_out, elbow_y, CONFIDENCE)
        .joint(Joint::LeftWrist, left_x, wrist_y, CONFIDENCE)
        .joint(Joint::RightWrist, right_x, wrist_y, CONFIDENCE)
        .joint(Joint::LeftHip, left_leg_x, hip_y, CONFIDENCE)
        .joint(Joint::RightHip, right_leg_x, hip_y, CONFIDENCE)
        .joint(Joint::LeftKnee, left_leg_x, hip_y + 0.17, CONFIDENCE)
        .joint(Joint::RightKnee, right_leg_x, hip_y + 0.17, CONFIDENCE)
        .joint(Joint::LeftAnkle, left_leg_x, hip_y + 0.35, CONFIDENCE)
        .joint(Joint::RightAnkle, right_leg_x, hip_y + 0.35, CONFIDENCE)
        .build()
}

/// Dead hang, arms straight
pub fn pullup_hang(timestamp: f64) -> PoseFrame {
    pullup_frame(timestamp, 0.0, 0.0, 0.0)
}

/// Half-way up, elbows near 95 degrees
pub fn pullup_mid(timestamp: f64, hip_shift: f64) -> PoseFrame {
    pullup_frame(timestamp, 0.09, 0.05, hip_shift)
}

/// Chin over the bar, elbows fully bent
pub fn pullup_top(timestamp: f64) -> PoseFrame {
    pullup_frame(timestamp, 0.18, 0.06, 0.0)
}

/// One pull-up: hang, mid, top, mid, hang (3 frames each)
pub fn pullup_rep(start: f64, hip_shift_on_way_up: f64) -> Vec<PoseFrame> {
    let at = |i: usize| start + i as f64 * FRAME_INTERVAL;
    let mut frames = Vec::with_capacity(15);
    frames.extend((0..3).map(|i| pullup_hang(at(i))));
    frames.extend((3..6).map(|i| pullup_mid(at(i), hip_shift_on_way_up)));
    frames.extend((6..9).map(|i| pullup_top(at(i))));
    frames.extend((9..12).map(|i| pullup_mid(at(i), 0.0)));
    frames.extend((12..15).map(|i| pullup_hang(at(i))));
    frames
}

/// Sit-up torso positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitupPose {
    /// Lying flat
    Down,
    /// Torso near 45 degrees
    Mid,
    /// Torso near 85 degrees
    Up,
}

/// Side-view sit-up frame with knees at 90 degrees and arms crossed
///
/// `wrist_offset` moves the wrists away from the opposite shoulder.
pub fn situp_frame(timestamp: f64, pose: SitupPose, wrist_offset: f64) -> PoseFrame {
    let shoulder = match pose {
        SitupPose::Down => Point2D::new(0.25, 0.70),
        SitupPose::Mid => Point2D::new(0.35, 0.55),
        SitupPose::Up => Point2D::new(0.52, 0.45),
    };
    let wrist = Point2D::new(shoulder.x + 0.03 + wrist_offset, shoulder.y + 0.03);
    side_view(
        timestamp,
        &[
            (SHOULDERS, shoulder),
            (WRISTS, wrist),
            (HIPS, Point2D::new(0.50, 0.70)),
            (KNEES, Point2D::new(0.62, 0.58)),
            (ANKLES, Point2D::new(0.74, 0.70)),
        ],
    )
}

/// One sit-up: down, mid, up, mid, down (3 frames each)
pub fn situp_rep(start: f64, wrist_offset_at_top: f64) -> Vec<PoseFrame> {
    let sequence = [
        (SitupPose::Down, 0.0),
        (SitupPose::Mid, 0.0),
        (SitupPose::Up, wrist_offset_at_top),
        (SitupPose::Mid, 0.0),
        (SitupPose::Down, 0.0),
    ];
    sequence
        .iter()
        .flat_map(|step| [*step; 3])
        .enumerate()
        .map(|(i, (pose, offset))| situp_frame(start + i as f64 * FRAME_INTERVAL, pose, offset))
        .collect()
}

/// Side-view forearm plank; `hip_drop` sags the hips below the body line
pub fn plank_frame(timestamp: f64, hip_drop: f64) -> PoseFrame {
    side_view(
        timestamp,
        &[
            (SHOULDERS, Point2D::new(0.30, 0.45)),
            (ELBOWS, Point2D::new(0.30, 0.60)),
            (HIPS, Point2D::new(0.55, 0.50 + hip_drop)),
            (KNEES, Point2D::new(0.70, 0.53)),
            (ANKLES, Point2D::new(0.85, 0.56)),
        ],
    )
}

/// A frame with only the face visible
pub fn occluded_frame(timestamp: f64) -> PoseFrame {
    PoseFrame::builder(timestamp)
        .joint(Joint::Nose, 0.5, 0.2, CONFIDENCE)
        .build()
}

/// Grade every frame, returning the results in order
pub fn grade_all(grader: &mut dyn ExerciseGrader, frames: &[PoseFrame]) -> Vec<GradingResult> {
    frames.iter().map(|frame| grader.grade_pose(frame)).collect()
}

/// Count rep completions in `results`
pub fn reps_in(results: &[GradingResult]) -> usize {
    results.iter().filter(|result| result.is_rep()).count()
}
