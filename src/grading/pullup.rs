// ABOUTME: Pull-up grader: Down, Pulling, Lowering, Down cycle with chin-over-bar checks
// ABOUTME: Rejects kipping, sideways drift, shallow elbow flexion, bent knees, and ground contact
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Front-view pull-up grading.
//!
//! The bar is the configured height or the mean wrist height. The nose
//! stands in for the chin. Swing is measured as hip travel relative to the
//! shoulders, in torso lengths. Knee and ground-contact checks run only
//! when knees and ankles are confidently visible.

use ptgrade_core::constants::geometry::DEGENERATE_LENGTH;
use ptgrade_core::geometry::{angle, distance};
use ptgrade_core::models::{pairs, ExerciseType, Joint, PoseFrame};
use ptgrade_standards::ScoreLookup;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    Admission, ExerciseGrader, FormIssue, GraderCore, GraderOptions, GradingResult, Phase,
    PhaseStabilizer, PhaseTransition, PullupPhase, SessionStats, VisibilityGate,
};
use crate::calibration::{AngleReading, Calibrate, TierThresholds};
use crate::config::PullupConfig;

const REQUIRED_JOINTS: [Joint; 9] = [
    Joint::Nose,
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftElbow,
    Joint::RightElbow,
    Joint::LeftWrist,
    Joint::RightWrist,
    Joint::LeftHip,
    Joint::RightHip,
];

const SUPPORT_JOINTS: [Joint; 4] = [
    Joint::LeftKnee,
    Joint::RightKnee,
    Joint::LeftAnkle,
    Joint::RightAnkle,
];

/// Smallest and largest value observed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueSpan {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl ValueSpan {
    fn include(span: Option<Self>, value: f64) -> Option<Self> {
        Some(span.map_or(Self { min: value, max: value }, |s| Self {
            min: s.min.min(value),
            max: s.max.max(value),
        }))
    }

    /// Distance between the extremes
    #[must_use]
    pub fn extent(&self) -> f64 {
        self.max - self.min
    }
}

/// Accumulators for the current pull-up attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullupRepTracking {
    /// The chin cleared the bar on some frame
    pub chin_cleared: bool,
    /// Smallest elbow angle seen (degrees)
    pub min_elbow_angle: f64,
    /// Horizontal hip offset from the shoulders, in torso lengths
    pub hip_dx: Option<ValueSpan>,
    /// Vertical hip offset from the shoulders, in torso lengths
    pub hip_dy: Option<ValueSpan>,
    /// Horizontal shoulder position
    pub shoulder_x: Option<ValueSpan>,
    /// Smallest knee angle seen while knees were visible
    pub min_knee_angle: Option<f64>,
    /// Highest shoulder rise above the hang position
    pub peak_rise: f64,
    /// Ankle rise on the frame of peak shoulder rise
    pub ankle_rise_at_peak: Option<f64>,
}

impl Default for PullupRepTracking {
    fn default() -> Self {
        Self {
            chin_cleared: false,
            min_elbow_angle: 180.0,
            hip_dx: None,
            hip_dy: None,
            shoulder_x: None,
            min_knee_angle: None,
            peak_rise: 0.0,
            ankle_rise_at_peak: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PullupMetrics {
    elbow_angle: f64,
    chin_over: bool,
    chin_below: bool,
    shoulder_x: f64,
    shoulder_y: f64,
    hip_dx: f64,
    hip_dy: f64,
    knee_angle: Option<f64>,
    ankle_y: Option<f64>,
}

/// Hang position the rise of the next attempt is measured from
#[derive(Debug, Clone, Copy, PartialEq)]
struct HangReference {
    shoulder_y: f64,
    ankle_y: Option<f64>,
}

/// Pull-up state machine
#[derive(Debug)]
pub struct PullupGrader {
    config: PullupConfig,
    core: GraderCore,
    phase: PhaseStabilizer<PullupPhase>,
    tracking: PullupRepTracking,
    hang: Option<HangReference>,
}

impl PullupGrader {
    /// Build a grader from `options`, applying any pull-up calibration
    #[must_use]
    pub fn new(options: &GraderOptions) -> Self {
        let profile = options.calibration.as_ref();
        let config = options.config.pullup.calibrated(profile);
        let gate = VisibilityGate::new(
            &REQUIRED_JOINTS,
            TierThresholds::for_config(&options.config.pullup, profile),
        );
        Self {
            core: GraderCore::new(
                ExerciseType::Pullup,
                gate,
                &options.config.gate,
                &options.config.confidence,
                options,
            ),
            phase: PhaseStabilizer::new(PullupPhase::Starting, config.stable_frames),
            tracking: PullupRepTracking::default(),
            hang: None,
            config,
        }
    }

    /// Thresholds in effect after calibration
    #[must_use]
    pub const fn config(&self) -> &PullupConfig {
        &self.config
    }

    /// Accumulators for the attempt in progress
    #[must_use]
    pub const fn rep_tracking(&self) -> &PullupRepTracking {
        &self.tracking
    }

    fn measure(&self, frame: &PoseFrame) -> Option<PullupMetrics> {
        let (ls, rs) = (frame.point(Joint::LeftShoulder)?, frame.point(Joint::RightShoulder)?);
        let (lw, rw) = (frame.point(Joint::LeftWrist)?, frame.point(Joint::RightWrist)?);
        let left_elbow = angle(ls, frame.point(Joint::LeftElbow)?, lw);
        let right_elbow = angle(rs, frame.point(Joint::RightElbow)?, rw);
        let nose = frame.point(Joint::Nose)?;
        let shoulder_mid = ls.midpoint(rs);
        let hip_mid = frame.midpoint(pairs::HIPS)?;

        let bar_y = self.config.bar_height.unwrap_or_else(|| lw.midpoint(rw).y);
        let torso = distance(shoulder_mid, hip_mid);
        let (hip_dx, hip_dy) = if torso < DEGENERATE_LENGTH {
            (0.0, 0.0)
        } else {
            (
                (hip_mid.x - shoulder_mid.x) / torso,
                (hip_mid.y - shoulder_mid.y) / torso,
            )
        };

        let legs_visible = SUPPORT_JOINTS.iter().all(|joint| self.core.gate.sees(frame, *joint));
        let (knee_angle, ankle_y) = if legs_visible {
            let left = angle(
                frame.point(Joint::LeftHip)?,
                frame.point(Joint::LeftKnee)?,
                frame.point(Joint::LeftAnkle)?,
            );
            let right = angle(
                frame.point(Joint::RightHip)?,
                frame.point(Joint::RightKnee)?,
                frame.point(Joint::RightAnkle)?,
            );
            (
                Some((left + right) / 2.0),
                frame.midpoint(pairs::ANKLES).map(|p| p.y),
            )
        } else {
            (None, None)
        };

        Some(PullupMetrics {
            elbow_angle: (left_elbow + right_elbow) / 2.0,
            chin_over: nose.y <= bar_y - self.config.chin_clearance,
            chin_below: nose.y >= bar_y + self.config.chin_below_margin,
            shoulder_x: shoulder_mid.x,
            shoulder_y: shoulder_mid.y,
            hip_dx,
            hip_dy,
            knee_angle,
            ankle_y,
        })
    }

    fn frame_issues(&self, metrics: &PullupMetrics) -> Vec<FormIssue> {
        match metrics.knee_angle {
            Some(knee) if knee < self.config.knee_straight_angle => vec![FormIssue::KneesBent],
            _ => Vec::new(),
        }
    }

    fn candidate(&self, committed: PullupPhase, metrics: &PullupMetrics) -> PullupPhase {
        let extended = metrics.elbow_angle >= self.config.arm_extended_angle;
        let hanging = extended && metrics.chin_below;
        match committed {
            PullupPhase::Starting | PullupPhase::Invalid if hanging => PullupPhase::Down,
            PullupPhase::Down if !extended => PullupPhase::Pulling,
            PullupPhase::Pulling if metrics.chin_over => PullupPhase::Lowering,
            PullupPhase::Pulling | PullupPhase::Lowering if hanging => PullupPhase::Down,
            phase => phase,
        }
    }

    fn start_attempt(&mut self, metrics: &PullupMetrics) {
        self.tracking = PullupRepTracking::default();
        self.hang = Some(HangReference {
            shoulder_y: metrics.shoulder_y,
            ankle_y: metrics.ankle_y,
        });
    }

    fn accumulate(&mut self, metrics: &PullupMetrics) {
        let tracking = &mut self.tracking;
        tracking.chin_cleared |= metrics.chin_over;
        tracking.min_elbow_angle = tracking.min_elbow_angle.min(metrics.elbow_angle);
        tracking.hip_dx = ValueSpan::include(tracking.hip_dx, metrics.hip_dx);
        tracking.hip_dy = ValueSpan::include(tracking.hip_dy, metrics.hip_dy);
        tracking.shoulder_x = ValueSpan::include(tracking.shoulder_x, metrics.shoulder_x);
        if let Some(knee) = metrics.knee_angle {
            tracking.min_knee_angle = Some(tracking.min_knee_angle.map_or(knee, |m| m.min(knee)));
        }

        if let Some(hang) = self.hang {
            let rise = hang.shoulder_y - metrics.shoulder_y;
            if rise > tracking.peak_rise {
                tracking.peak_rise = rise;
                tracking.ankle_rise_at_peak = hang
                    .ankle_y
                    .zip(metrics.ankle_y)
                    .map(|(hang_ankle, ankle)| hang_ankle - ankle);
            }
        }
    }

    fn rep_faults(&self, current: &[FormIssue]) -> Vec<FormIssue> {
        let tracking = &self.tracking;
        let config = &self.config;
        let mut faults = Vec::new();
        if !tracking.chin_cleared {
            faults.push(FormIssue::ChinNotOverBar);
        }
        if tracking.min_elbow_angle > config.arm_flexed_angle {
            faults.push(FormIssue::InsufficientFlexion);
        }
        let swing = |span: Option<ValueSpan>| span.map_or(0.0, |s| s.extent());
        if swing(tracking.hip_dx) > config.kipping_tolerance
            || swing(tracking.hip_dy) > config.kipping_tolerance
        {
            faults.push(FormIssue::Kipping);
        }
        if swing(tracking.shoulder_x) > config.max_horizontal_drift {
            faults.push(FormIssue::HorizontalDrift);
        }
        if tracking
            .min_knee_angle
            .is_some_and(|knee| knee < config.knee_straight_angle)
            || current.contains(&FormIssue::KneesBent)
        {
            faults.push(FormIssue::KneesBent);
        }
        if tracking.peak_rise >= config.min_rise_for_ground_check
            && tracking
                .ankle_rise_at_peak
                .is_some_and(|ankle| ankle < config.ground_contact_ratio * tracking.peak_rise)
        {
            faults.push(FormIssue::GroundContact);
        }
        faults
    }

    fn finish_attempt(&mut self, metrics: &PullupMetrics, current: &[FormIssue]) -> GradingResult {
        let faults = self.rep_faults(current);
        let result = if let Some(first) = faults.first().copied() {
            let tracking = &self.tracking;
            let measurements = vec![
                ("min_elbow_angle".to_owned(), tracking.min_elbow_angle),
                ("hip_swing".to_owned(), tracking.hip_dx.map_or(0.0, |s| s.extent())),
                ("shoulder_drift".to_owned(), tracking.shoulder_x.map_or(0.0, |s| s.extent())),
                ("peak_rise".to_owned(), tracking.peak_rise),
            ];
            self.core.stats.record_rejection(first, measurements);
            self.core.stats.flag(&faults);
            debug!(issue = ?first, attempt = self.core.stats.attempts, "Pull-up not counted");
            GradingResult::IncorrectForm {
                feedback: first.message().to_owned(),
            }
        } else {
            self.core.stats.record_rep(1.0);
            self.core.stats.clear_problem_joints();
            info!(reps = self.core.stats.rep_count, "Pull-up counted");
            GradingResult::RepCompleted { form_quality: 1.0 }
        };
        self.start_attempt(metrics);
        result
    }

    fn on_transition(
        &mut self,
        transition: PhaseTransition<PullupPhase>,
        metrics: &PullupMetrics,
        current: &[FormIssue],
    ) -> GradingResult {
        debug!(from = ?transition.from, to = ?transition.to, "Pull-up phase committed");
        match (transition.from, transition.to) {
            (PullupPhase::Pulling | PullupPhase::Lowering, PullupPhase::Down) => {
                self.finish_attempt(metrics, current)
            }
            (_, PullupPhase::Down) => {
                self.start_attempt(metrics);
                GradingResult::InProgress {
                    phase: Phase::Pullup(PullupPhase::Down),
                }
            }
            (_, to) => GradingResult::InProgress {
                phase: Phase::Pullup(to),
            },
        }
    }
}

impl ExerciseGrader for PullupGrader {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::Pullup
    }

    fn reset_state(&mut self) {
        self.core.reset();
        self.phase.reset();
        self.tracking = PullupRepTracking::default();
        self.hang = None;
    }

    fn grade_pose(&mut self, frame: &PoseFrame) -> GradingResult {
        if let Admission::Rejected { reason, invalidate } = self.core.admit(frame) {
            if invalidate && self.phase.committed() != PullupPhase::Invalid {
                self.phase.force(PullupPhase::Invalid);
                self.tracking = PullupRepTracking::default();
                self.hang = None;
                debug!("Pull-up pose lost, attempt abandoned");
            }
            return GradingResult::InvalidPose { reason };
        }
        let Some(metrics) = self.measure(frame) else {
            return GradingResult::InvalidPose {
                reason: "Incomplete pose".to_owned(),
            };
        };

        let committed = self.phase.committed();
        let issues = self.frame_issues(&metrics);
        let candidate = self.candidate(committed, &metrics);
        let resting = matches!(committed, PullupPhase::Starting | PullupPhase::Invalid);

        if committed == PullupPhase::Down && candidate == PullupPhase::Down {
            self.start_attempt(&metrics);
        } else if !resting {
            self.accumulate(&metrics);
        }
        let readings = if metrics.elbow_angle >= self.config.arm_extended_angle {
            vec![AngleReading::new("arm_extended", metrics.elbow_angle, 180.0)]
        } else {
            Vec::new()
        };
        self.core.record_confidence(frame, &readings, &issues);

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
        Phase::Pullup(self.phase.committed())
    }

    fn stats(&self) -> &SessionStats {
        &self.core.stats
    }

    fn grading_confidence(&self) -> f64 {
        self.core.confidence.score()
    }
}
