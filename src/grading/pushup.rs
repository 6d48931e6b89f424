// ABOUTME: Push-up grader: Up, Descending, Ascending, Up cycle with body-line checks
// ABOUTME: Counts a rep on the stable Ascending-to-Up transition when every check held
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Side-view push-up grading.
//!
//! The elbow angle (shoulder, elbow, wrist; mean of both sides) places the
//! arms at the top, middle, or bottom. Body alignment is the hip's offset
//! from the shoulder-ankle line. Descent depth is measured from the
//! shoulder height of the last clean top position.

use ptgrade_core::geometry::{angle, line_deviation};
use ptgrade_core::models::{pairs, ExerciseType, Joint, PoseFrame};
use ptgrade_standards::ScoreLookup;
use tracing::{debug, info};

use super::{
    push_unique, Admission, ExerciseGrader, FormIssue, GraderCore, GraderOptions, GradingResult,
    Phase, PhaseStabilizer, PhaseTransition, PushupPhase, SessionStats, VisibilityGate,
};
use crate::calibration::{AngleReading, Calibrate, TierThresholds};
use crate::config::PushupConfig;

const REQUIRED_JOINTS: [Joint; 10] = [
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftElbow,
    Joint::RightElbow,
    Joint::LeftWrist,
    Joint::RightWrist,
    Joint::LeftHip,
    Joint::RightHip,
    Joint::LeftAnkle,
    Joint::RightAnkle,
];

/// Accumulators for the current push-up attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PushupRepTracking {
    /// Smallest elbow angle seen (degrees)
    pub min_elbow_angle: f64,
    /// Deepest shoulder drop below the top position
    pub max_descent: f64,
    /// Largest downward hip deviation
    pub max_sag: f64,
    /// Largest upward hip deviation
    pub max_pike: f64,
    /// Shoulders were uneven on some frame
    pub shoulders_uneven: bool,
}

impl Default for PushupRepTracking {
    fn default() -> Self {
        Self {
            min_elbow_angle: 180.0,
            max_descent: 0.0,
            max_sag: 0.0,
            max_pike: 0.0,
            shoulders_uneven: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PushupMetrics {
    elbow_angle: f64,
    shoulder_y: f64,
    deviation: f64,
    shoulder_tilt: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArmPosition {
    Top,
    Middle,
    Bottom,
}

/// Push-up state machine
#[derive(Debug)]
pub struct PushupGrader {
    config: PushupConfig,
    core: GraderCore,
    phase: PhaseStabilizer<PushupPhase>,
    tracking: PushupRepTracking,
    top_shoulder_y: Option<f64>,
}

impl PushupGrader {
    /// Build a grader from `options`, applying any push-up calibration
    #[must_use]
    pub fn new(options: &GraderOptions) -> Self {
        let profile = options.calibration.as_ref();
        let config = options.config.pushup.calibrated(profile);
        let gate = VisibilityGate::new(
            &REQUIRED_JOINTS,
            TierThresholds::for_config(&options.config.pushup, profile),
        );
        Self {
            core: GraderCore::new(
                ExerciseType::Pushup,
                gate,
                &options.config.gate,
                &options.config.confidence,
                options,
            ),
            phase: PhaseStabilizer::new(PushupPhase::Between, config.stable_frames),
            tracking: PushupRepTracking::default(),
            top_shoulder_y: None,
            config,
        }
    }

    /// Thresholds in effect after calibration
    #[must_use]
    pub const fn config(&self) -> &PushupConfig {
        &self.config
    }

    /// Accumulators for the attempt in progress
    #[must_use]
    pub const fn rep_tracking(&self) -> &PushupRepTracking {
        &self.tracking
    }

    fn measure(frame: &PoseFrame) -> Option<PushupMetrics> {
        let (ls, rs) = (frame.point(Joint::LeftShoulder)?, frame.point(Joint::RightShoulder)?);
        let left_elbow = angle(ls, frame.point(Joint::LeftElbow)?, frame.point(Joint::LeftWrist)?);
        let right_elbow = angle(rs, frame.point(Joint::RightElbow)?, frame.point(Joint::RightWrist)?);
        let shoulder_mid = ls.midpoint(rs);
        let hip_mid = frame.midpoint(pairs::HIPS)?;
        let ankle_mid = frame.midpoint(pairs::ANKLES)?;

        Some(PushupMetrics {
            elbow_angle: (left_elbow + right_elbow) / 2.0,
            shoulder_y: shoulder_mid.y,
            deviation: line_deviation(shoulder_mid, ankle_mid, hip_mid),
            shoulder_tilt: (ls.y - rs.y).abs(),
        })
    }

    fn arm_position(&self, elbow_angle: f64) -> ArmPosition {
        if elbow_angle >= self.config.elbow_extended_angle {
            ArmPosition::Top
        } else if elbow_angle <= self.config.elbow_flexed_angle {
            ArmPosition::Bottom
        } else {
            ArmPosition::Middle
        }
    }

    fn frame_issues(&self, metrics: &PushupMetrics) -> Vec<FormIssue> {
        let mut issues = Vec::new();
        if metrics.deviation > self.config.hip_sag_tolerance {
            issues.push(FormIssue::HipsSagging);
        }
        if -metrics.deviation > self.config.hip_pike_tolerance {
            issues.push(FormIssue::HipsPiking);
        }
        if metrics.shoulder_tilt > self.config.shoulder_level_tolerance {
            issues.push(FormIssue::ShouldersUneven);
        }
        issues
    }

    fn candidate(&self, committed: PushupPhase, position: ArmPosition, aligned: bool) -> PushupPhase {
        match (committed, position) {
            (PushupPhase::Between | PushupPhase::Invalid, ArmPosition::Top) if aligned => {
                PushupPhase::Up
            }
            (PushupPhase::Between | PushupPhase::Invalid, _) => committed,
            (PushupPhase::Up, ArmPosition::Middle) => PushupPhase::Descending,
            (PushupPhase::Up | PushupPhase::Descending, ArmPosition::Bottom) => {
                PushupPhase::Ascending
            }
            (PushupPhase::Descending | PushupPhase::Ascending, ArmPosition::Top) => {
                PushupPhase::Up
            }
            (phase, _) => phase,
        }
    }

    fn accumulate(&mut self, metrics: &PushupMetrics) {
        let tracking = &mut self.tracking;
        tracking.min_elbow_angle = tracking.min_elbow_angle.min(metrics.elbow_angle);
        if let Some(top) = self.top_shoulder_y {
            tracking.max_descent = tracking.max_descent.max(metrics.shoulder_y - top);
        }
        tracking.max_sag = tracking.max_sag.max(metrics.deviation);
        tracking.max_pike = tracking.max_pike.max(-metrics.deviation);
        tracking.shoulders_uneven |= metrics.shoulder_tilt > self.config.shoulder_level_tolerance;
    }

    fn start_attempt(&mut self, metrics: &PushupMetrics) {
        self.tracking = PushupRepTracking::default();
        self.top_shoulder_y = Some(metrics.shoulder_y);
    }

    fn rep_faults(&self, current: &[FormIssue]) -> Vec<FormIssue> {
        let tracking = &self.tracking;
        let mut faults = Vec::new();
        if tracking.max_sag > self.config.hip_sag_tolerance {
            faults.push(FormIssue::HipsSagging);
        }
        if tracking.max_pike > self.config.hip_pike_tolerance {
            faults.push(FormIssue::HipsPiking);
        }
        if tracking.min_elbow_angle > self.config.elbow_flexed_angle
            || tracking.max_descent < self.config.min_descent
        {
            faults.push(FormIssue::IncompleteDescent);
        }
        if tracking.shoulders_uneven {
            faults.push(FormIssue::ShouldersUneven);
        }
        for issue in current {
            push_unique(&mut faults, *issue);
        }
        faults
    }

    fn finish_attempt(&mut self, metrics: &PushupMetrics, current: &[FormIssue]) -> GradingResult {
        let faults = self.rep_faults(current);
        let result = if let Some(first) = faults.first().copied() {
            let measurements = vec![
                ("min_elbow_angle".to_owned(), self.tracking.min_elbow_angle),
                ("max_descent".to_owned(), self.tracking.max_descent),
                ("max_sag".to_owned(), self.tracking.max_sag),
                ("max_pike".to_owned(), self.tracking.max_pike),
            ];
            self.core.stats.record_rejection(first, measurements);
            self.core.stats.flag(&faults);
            debug!(issue = ?first, attempt = self.core.stats.attempts, "Push-up not counted");
            GradingResult::IncorrectForm {
                feedback: first.message().to_owned(),
            }
        } else {
            self.core.stats.record_rep(1.0);
            self.core.stats.clear_problem_joints();
            info!(reps = self.core.stats.rep_count, "Push-up counted");
            GradingResult::RepCompleted { form_quality: 1.0 }
        };
        self.start_attempt(metrics);
        result
    }

    fn on_transition(
        &mut self,
        transition: PhaseTransition<PushupPhase>,
        metrics: &PushupMetrics,
        current: &[FormIssue],
    ) -> GradingResult {
        debug!(from = ?transition.from, to = ?transition.to, "Push-up phase committed");
        match (transition.from, transition.to) {
            (PushupPhase::Ascending | PushupPhase::Descending, PushupPhase::Up) => {
                self.finish_attempt(metrics, current)
            }
            (_, PushupPhase::Up) => {
                self.start_attempt(metrics);
                GradingResult::InProgress {
                    phase: Phase::Pushup(PushupPhase::Up),
                }
            }
            (_, to) => GradingResult::InProgress {
                phase: Phase::Pushup(to),
            },
        }
    }

    fn readings(position: ArmPosition, elbow_angle: f64) -> Vec<AngleReading> {
        match position {
            ArmPosition::Top => vec![AngleReading::new("elbow_extended", elbow_angle, 180.0)],
            ArmPosition::Bottom => vec![AngleReading::new("elbow_flexed", elbow_angle, 90.0)],
            ArmPosition::Middle => Vec::new(),
        }
    }
}

impl ExerciseGrader for PushupGrader {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::Pushup
    }

    fn reset_state(&mut self) {
        self.core.reset();
        self.phase.reset();
        self.tracking = PushupRepTracking::default();
        self.top_shoulder_y = None;
    }

    fn grade_pose(&mut self, frame: &PoseFrame) -> GradingResult {
        if let Admission::Rejected { reason, invalidate } = self.core.admit(frame) {
            if invalidate && self.phase.committed() != PushupPhase::Invalid {
                self.phase.force(PushupPhase::Invalid);
                self.tracking = PushupRepTracking::default();
                debug!("Push-up pose lost, attempt abandoned");
            }
            return GradingResult::InvalidPose { reason };
        }
        let Some(metrics) = Self::measure(frame) else {
            return GradingResult::InvalidPose {
                reason: "Incomplete pose".to_owned(),
            };
        };

        let committed = self.phase.committed();
        let position = self.arm_position(metrics.elbow_angle);
        let issues = self.frame_issues(&metrics);
        let aligned = metrics.deviation.abs() <= self.config.start_alignment_tolerance;
        let candidate = self.candidate(committed, position, aligned);
        let resting = matches!(committed, PushupPhase::Between | PushupPhase::Invalid);

        if committed == PushupPhase::Up && candidate == PushupPhase::Up {
            self.start_attempt(&metrics);
        } else if !resting {
            self.accumulate(&metrics);
        }
        self.core
            .record_confidence(frame, &Self::readings(position, metrics.elbow_angle), &issues);

        if let Some(transition) = self.phase.observe(candidate, resting) {
            return self.on_transition(transition, &metrics, &issues);
        }

        match issues.first() {
            Some(first) if !resting => {
                self.core.stats.flag(&issues);
                GradingResult::IncorrectForm {
                    feedback: first.message().to_owned(),
                }
            }
            _ => {
                if issues.is_empty() {
                    self.core.stats.clear_problem_joints();
                }
                GradingResult::NoChange
            }
        }
    }

    fn calculate_final_score(&self) -> Option<ScoreLookup> {
        self.core.lookup(self.core.stats.rep_count)
    }

    fn phase(&self) -> Phase {
        Phase::Pushup(self.phase.committed())
    }

    fn stats(&self) -> &SessionStats {
        &self.core.stats
    }

    fn grading_confidence(&self) -> f64 {
        self.core.confidence.score()
    }
}
