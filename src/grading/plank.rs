// ABOUTME: Plank grader: continuous hold timed while form stays within tolerance
// ABOUTME: Brief faults are tolerated for a run of frames before the hold is broken
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Forearm-plank grading. There is no rep cycle: the grader credits the
//! time between consecutive admitted frames (capped by the maximum frame
//! gap) while the participant holds, and the final score is the standards
//! lookup for the whole seconds held.

use ptgrade_core::constants::geometry::DEGENERATE_LENGTH;
use ptgrade_core::geometry::{angle, distance, line_deviation};
use ptgrade_core::models::{pairs, ExerciseType, Joint, PoseFrame};
use ptgrade_standards::ScoreLookup;
use tracing::{debug, info};

use super::{
    form, Admission, ExerciseGrader, FormIssue, GraderCore, GraderOptions, GradingResult, Phase,
    PlankStatus, SessionStats, VisibilityGate,
};
use crate::calibration::{AngleReading, Calibrate, TierThresholds};
use crate::config::PlankConfig;

const REQUIRED_JOINTS: [Joint; 10] = [
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftElbow,
    Joint::RightElbow,
    Joint::LeftHip,
    Joint::RightHip,
    Joint::LeftKnee,
    Joint::RightKnee,
    Joint::LeftAnkle,
    Joint::RightAnkle,
];

#[derive(Debug, Clone, Copy)]
struct PlankMetrics {
    deviation: f64,
    knee_angle: f64,
    hip_asymmetry: f64,
    elbow_offset: f64,
}

/// Plank hold timer
#[derive(Debug)]
pub struct PlankGrader {
    config: PlankConfig,
    core: GraderCore,
    status: PlankStatus,
    invalid: bool,
    hold_seconds: f64,
    last_timestamp: Option<f64>,
    fault_streak: u32,
    quality_sum: f64,
    quality_frames: u32,
}

impl PlankGrader {
    /// Build a grader from `options`, applying any plank calibration
    #[must_use]
    pub fn new(options: &GraderOptions) -> Self {
        let profile = options.calibration.as_ref();
        let config = options.config.plank.calibrated(profile);
        let gate = VisibilityGate::new(
            &REQUIRED_JOINTS,
            TierThresholds::for_config(&options.config.plank, profile),
        );
        Self {
            core: GraderCore::new(
                ExerciseType::Plank,
                gate,
                &options.config.gate,
                &options.config.confidence,
                options,
            ),
            config,
            status: PlankStatus::Waiting,
            invalid: false,
            hold_seconds: 0.0,
            last_timestamp: None,
            fault_streak: 0,
            quality_sum: 0.0,
            quality_frames: 0,
        }
    }

    /// Thresholds in effect after calibration
    #[must_use]
    pub const fn config(&self) -> &PlankConfig {
        &self.config
    }

    /// Hold status ignoring visibility
    #[must_use]
    pub const fn status(&self) -> PlankStatus {
        self.status
    }

    fn measure(frame: &PoseFrame) -> Option<PlankMetrics> {
        let shoulder_mid = frame.midpoint(pairs::SHOULDERS)?;
        let elbow_mid = frame.midpoint(pairs::ELBOWS)?;
        let hip_mid = frame.midpoint(pairs::HIPS)?;
        let ankle_mid = frame.midpoint(pairs::ANKLES)?;

        let (lh, rh) = (frame.point(Joint::LeftHip)?, frame.point(Joint::RightHip)?);
        let (lk, rk) = (frame.point(Joint::LeftKnee)?, frame.point(Joint::RightKnee)?);
        let left_knee = angle(lh, lk, frame.point(Joint::LeftAnkle)?);
        let right_knee = angle(rh, rk, frame.point(Joint::RightAnkle)?);
        let left_hip = angle(frame.point(Joint::LeftShoulder)?, lh, lk);
        let right_hip = angle(frame.point(Joint::RightShoulder)?, rh, rk);

        let body_length = distance(shoulder_mid, ankle_mid);
        let elbow_offset = if body_length < DEGENERATE_LENGTH {
            0.0
        } else {
            (elbow_mid.x - shoulder_mid.x).abs() / body_length
        };

        Some(PlankMetrics {
            deviation: line_deviation(shoulder_mid, ankle_mid, hip_mid),
            knee_angle: (left_knee + right_knee) / 2.0,
            hip_asymmetry: (left_hip - right_hip).abs(),
            elbow_offset,
        })
    }

    fn frame_issues(&self, metrics: &PlankMetrics) -> Vec<FormIssue> {
        let config = &self.config;
        let mut issues = Vec::new();
        if metrics.deviation > config.hip_sag_tolerance {
            issues.push(FormIssue::HipsSagging);
        } else if -metrics.deviation > config.hip_pike_tolerance {
            issues.push(FormIssue::HipsPiking);
        }
        if metrics.knee_angle < config.knee_straight_angle {
            issues.push(FormIssue::LegsBent);
        }
        if metrics.hip_asymmetry > config.max_hip_asymmetry {
            issues.push(FormIssue::Asymmetric);
        }
        if metrics.elbow_offset > config.max_elbow_offset {
            issues.push(FormIssue::ElbowsNotUnderShoulders);
        }
        issues
    }

    fn elapsed_since_last(&mut self, timestamp: f64) -> f64 {
        let elapsed = self.last_timestamp.map_or(0.0, |last| {
            (timestamp - last).clamp(0.0, self.config.max_frame_gap_secs)
        });
        self.last_timestamp = Some(timestamp);
        elapsed
    }

    fn credit(&mut self, elapsed: f64, issues: &[FormIssue]) {
        self.hold_seconds += elapsed;
        self.quality_sum += form::frame_form_score(issues);
        self.quality_frames += 1;
    }

    fn hold(&mut self, timestamp: f64, issues: &[FormIssue]) -> GradingResult {
        let elapsed = self.elapsed_since_last(timestamp);
        let Some(first) = issues.first() else {
            self.fault_streak = 0;
            self.credit(elapsed, issues);
            self.core.stats.clear_problem_joints();
            return GradingResult::NoChange;
        };

        self.fault_streak += 1;
        self.core.stats.flag(issues);
        if self.fault_streak > self.config.break_tolerance_frames {
            self.status = PlankStatus::Broken;
            info!(
                hold_seconds = self.hold_seconds,
                issue = ?first,
                "Plank hold broken"
            );
            return GradingResult::IncorrectForm {
                feedback: format!("Hold ended: {}", first.message()),
            };
        }
        self.credit(elapsed, issues);
        GradingResult::IncorrectForm {
            feedback: first.message().to_owned(),
        }
    }
}

impl ExerciseGrader for PlankGrader {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::Plank
    }

    fn reset_state(&mut self) {
        self.core.reset();
        self.status = PlankStatus::Waiting;
        self.invalid = false;
        self.hold_seconds = 0.0;
        self.last_timestamp = None;
        self.fault_streak = 0;
        self.quality_sum = 0.0;
        self.quality_frames = 0;
    }

    fn grade_pose(&mut self, frame: &PoseFrame) -> GradingResult {
        if let Admission::Rejected { reason, invalidate } = self.core.admit(frame) {
            // Time spent out of view past the tolerance is never credited
            if invalidate {
                self.last_timestamp = None;
                if !self.invalid {
                    self.invalid = true;
                    debug!(status = ?self.status, "Plank pose lost");
                }
            }
            return GradingResult::InvalidPose { reason };
        }
        self.invalid = false;
        let Some(metrics) = Self::measure(frame) else {
            return GradingResult::InvalidPose {
                reason: "Incomplete pose".to_owned(),
            };
        };

        let issues = self.frame_issues(&metrics);
        self.core.record_confidence(
            frame,
            &[AngleReading::new("knee_straight", metrics.knee_angle, 180.0)],
            &issues,
        );

        match self.status {
            PlankStatus::Waiting | PlankStatus::Invalid => {
                if issues.is_empty() {
                    self.status = PlankStatus::Holding;
                    self.last_timestamp = Some(frame.timestamp());
                    self.credit(0.0, &issues);
                    self.core.stats.clear_problem_joints();
                    debug!("Plank hold started");
                    GradingResult::InProgress {
                        phase: Phase::Plank(PlankStatus::Holding),
                    }
                } else {
                    self.core.stats.flag(&issues);
                    GradingResult::NoChange
                }
            }
            PlankStatus::Holding => self.hold(frame.timestamp(), &issues),
            PlankStatus::Broken => GradingResult::NoChange,
        }
    }

    fn calculate_final_score(&self) -> Option<ScoreLookup> {
        self.core.lookup(self.hold_seconds.floor() as u32)
    }

    fn phase(&self) -> Phase {
        if self.invalid {
            Phase::Plank(PlankStatus::Invalid)
        } else {
            Phase::Plank(self.status)
        }
    }

    fn stats(&self) -> &SessionStats {
        &self.core.stats
    }

    fn form_quality_average(&self) -> f64 {
        if self.quality_frames == 0 {
            return 0.0;
        }
        self.quality_sum / f64::from(self.quality_frames)
    }

    fn hold_seconds(&self) -> Option<f64> {
        Some(self.hold_seconds)
    }

    fn grading_confidence(&self) -> f64 {
        self.core.confidence.score()
    }
}
