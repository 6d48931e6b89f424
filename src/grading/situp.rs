// ABOUTME: Sit-up grader: Down, Rising, Lowering, Down cycle on torso inclination
// ABOUTME: Graduated form quality from peak torso angle; crossed-arms and knee-band checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Side-view sit-up grading. Torso inclination is the hip-to-shoulder
//! line's angle above horizontal.

use ptgrade_core::geometry::{angle, angle_from_horizontal, distance};
use ptgrade_core::models::{pairs, ExerciseType, Joint, PoseFrame};
use ptgrade_standards::ScoreLookup;
use tracing::{debug, info};

use super::{
    push_unique, Admission, ExerciseGrader, FormIssue, GraderCore, GraderOptions, GradingResult,
    Phase, PhaseStabilizer, PhaseTransition, SessionStats, SitupPhase, VisibilityGate,
};
use crate::calibration::{AngleReading, Calibrate, TierThresholds};
use crate::config::SitupConfig;

const REQUIRED_JOINTS: [Joint; 10] = [
    Joint::LeftShoulder,
    Joint::RightShoulder,
    Joint::LeftWrist,
    Joint::RightWrist,
    Joint::LeftHip,
    Joint::RightHip,
    Joint::LeftKnee,
    Joint::RightKnee,
    Joint::LeftAnkle,
    Joint::RightAnkle,
];

/// Form quality floor for a rep that just reached vertical
const BASE_QUALITY: f64 = 0.8;

/// Accumulators for the current sit-up attempt
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SitupRepTracking {
    /// Highest torso inclination seen (degrees)
    pub peak_torso_angle: f64,
    /// Arms left the chest on some frame
    pub arms_uncrossed: bool,
    /// Knee angle left the band on some frame
    pub knees_out_of_band: bool,
}

#[derive(Debug, Clone, Copy)]
struct SitupMetrics {
    torso_angle: f64,
    knee_angle: f64,
    arm_distance: f64,
}

/// Sit-up state machine
#[derive(Debug)]
pub struct SitupGrader {
    config: SitupConfig,
    core: GraderCore,
    phase: PhaseStabilizer<SitupPhase>,
    tracking: SitupRepTracking,
}

impl SitupGrader {
    /// Build a grader from `options`, applying any sit-up calibration
    #[must_use]
    pub fn new(options: &GraderOptions) -> Self {
        let profile = options.calibration.as_ref();
        let config = options.config.situp.calibrated(profile);
        let gate = VisibilityGate::new(
            &REQUIRED_JOINTS,
            TierThresholds::for_config(&options.config.situp, profile),
        );
        Self {
            core: GraderCore::new(
                ExerciseType::Situp,
                gate,
                &options.config.gate,
                &options.config.confidence,
                options,
            ),
            phase: PhaseStabilizer::new(SitupPhase::Starting, config.stable_frames),
            tracking: SitupRepTracking::default(),
            config,
        }
    }

    /// Thresholds in effect after calibration
    #[must_use]
    pub const fn config(&self) -> &SitupConfig {
        &self.config
    }

    /// Accumulators for the attempt in progress
    #[must_use]
    pub const fn rep_tracking(&self) -> &SitupRepTracking {
        &self.tracking
    }

    fn measure(frame: &PoseFrame) -> Option<SitupMetrics> {
        let (ls, rs) = (frame.point(Joint::LeftShoulder)?, frame.point(Joint::RightShoulder)?);
        let shoulder_mid = ls.midpoint(rs);
        let hip_mid = frame.midpoint(pairs::HIPS)?;
        let left_knee = angle(
            frame.point(Joint::LeftHip)?,
            frame.point(Joint::LeftKnee)?,
            frame.point(Joint::LeftAnkle)?,
        );
        let right_knee = angle(
            frame.point(Joint::RightHip)?,
            frame.point(Joint::RightKnee)?,
            frame.point(Joint::RightAnkle)?,
        );
        // Crossed arms put each wrist at the opposite shoulder
        let arm_distance = distance(frame.point(Joint::LeftWrist)?, rs)
            .max(distance(frame.point(Joint::RightWrist)?, ls));

        Some(SitupMetrics {
            torso_angle: angle_from_horizontal(hip_mid, shoulder_mid),
            knee_angle: (left_knee + right_knee) / 2.0,
            arm_distance,
        })
    }

    fn knees_in_band(&self, knee_angle: f64) -> bool {
        (self.config.knee_angle_min..=self.config.knee_angle_max).contains(&knee_angle)
    }

    fn frame_issues(&self, metrics: &SitupMetrics) -> Vec<FormIssue> {
        let mut issues = Vec::new();
        if metrics.arm_distance > self.config.arms_crossed_max_distance {
            issues.push(FormIssue::ArmsUncrossed);
        }
        if !self.knees_in_band(metrics.knee_angle) {
            issues.push(FormIssue::KneesOutOfBand);
        }
        issues
    }

    fn candidate(&self, committed: SitupPhase, metrics: &SitupMetrics) -> SitupPhase {
        let lying = metrics.torso_angle <= self.config.torso_horizontal_max;
        let upright = metrics.torso_angle >= self.config.torso_vertical_min;
        match committed {
            SitupPhase::Starting | SitupPhase::Invalid
                if lying && self.knees_in_band(metrics.knee_angle) =>
            {
                SitupPhase::Down
            }
            SitupPhase::Down if !lying => SitupPhase::Rising,
            SitupPhase::Rising if upright => SitupPhase::Lowering,
            SitupPhase::Rising | SitupPhase::Lowering if lying => SitupPhase::Down,
            phase => phase,
        }
    }

    fn accumulate(&mut self, metrics: &SitupMetrics) {
        let knees_out = !self.knees_in_band(metrics.knee_angle);
        let arms_out = metrics.arm_distance > self.config.arms_crossed_max_distance;
        let tracking = &mut self.tracking;
        tracking.peak_torso_angle = tracking.peak_torso_angle.max(metrics.torso_angle);
        tracking.arms_uncrossed |= arms_out;
        tracking.knees_out_of_band |= knees_out;
    }

    /// Quality rises from the floor to 1.0 as the peak goes from vertical threshold to 90 degrees
    fn form_quality(&self) -> f64 {
        let span = 90.0 - self.config.torso_vertical_min;
        let beyond = if span > 0.0 {
            ((self.tracking.peak_torso_angle - self.config.torso_vertical_min) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };
        (1.0 - BASE_QUALITY).mul_add(beyond, BASE_QUALITY)
    }

    fn finish_attempt(&mut self, current: &[FormIssue]) -> GradingResult {
        let tracking = self.tracking;
        let mut faults = Vec::new();
        if tracking.peak_torso_angle < self.config.torso_vertical_min {
            faults.push(FormIssue::TorsoNotVertical);
        }
        if tracking.arms_uncrossed {
            faults.push(FormIssue::ArmsUncrossed);
        }
        if tracking.knees_out_of_band {
            faults.push(FormIssue::KneesOutOfBand);
        }
        for issue in current {
            push_unique(&mut faults, *issue);
        }

        let result = if let Some(first) = faults.first().copied() {
            self.core.stats.record_rejection(
                first,
                vec![("peak_torso_angle".to_owned(), tracking.peak_torso_angle)],
            );
            self.core.stats.flag(&faults);
            debug!(issue = ?first, attempt = self.core.stats.attempts, "Sit-up not counted");
            GradingResult::IncorrectForm {
                feedback: first.message().to_owned(),
            }
        } else {
            let form_quality = self.form_quality();
            self.core.stats.record_rep(form_quality);
            self.core.stats.clear_problem_joints();
            info!(reps = self.core.stats.rep_count, form_quality, "Sit-up counted");
            GradingResult::RepCompleted { form_quality }
        };
        self.tracking = SitupRepTracking::default();
        result
    }

    fn on_transition(
        &mut self,
        transition: PhaseTransition<SitupPhase>,
        current: &[FormIssue],
    ) -> GradingResult {
        debug!(from = ?transition.from, to = ?transition.to, "Sit-up phase committed");
        match (transition.from, transition.to) {
            (SitupPhase::Rising | SitupPhase::Lowering, SitupPhase::Down) => {
                self.finish_attempt(current)
            }
            (_, to) => {
                if to == SitupPhase::Down {
                    self.tracking = SitupRepTracking::default();
                }
                GradingResult::InProgress {
                    phase: Phase::Situp(to),
                }
            }
        }
    }
}

impl ExerciseGrader for SitupGrader {
    fn exercise(&self) -> ExerciseType {
        ExerciseType::Situp
    }

    fn reset_state(&mut self) {
        self.core.reset();
        self.phase.reset();
        self.tracking = SitupRepTracking::default();
    }

    fn grade_pose(&mut self, frame: &PoseFrame) -> GradingResult {
        if let Admission::Rejected { reason, invalidate } = self.core.admit(frame) {
            if invalidate && self.phase.committed() != SitupPhase::Invalid {
                self.phase.force(SitupPhase::Invalid);
                self.tracking = SitupRepTracking::default();
                debug!("Sit-up pose lost, attempt abandoned");
            }
            return GradingResult::InvalidPose { reason };
        }
        let Some(metrics) = Self::measure(frame) else {
            return GradingResult::InvalidPose {
                reason: "Incomplete pose".to_owned(),
            };
        };

        let committed = self.phase.committed();
        let issues = self.frame_issues(&metrics);
        let candidate = self.candidate(committed, &metrics);
        let resting = matches!(committed, SitupPhase::Starting | SitupPhase::Invalid);

        if committed == SitupPhase::Down && candidate == SitupPhase::Down {
            self.tracking = SitupRepTracking::default();
        } else if !resting {
            self.accumulate(&metrics);
        }
        let readings = [AngleReading::new(
            "knee_angle",
            metrics.knee_angle,
            (self.config.knee_angle_min + self.config.knee_angle_max) / 2.0,
        )];
        self.core.record_confidence(frame, &readings, &issues);

        if let Some(transition) = self.phase.observe(candidate, resting) {
            return self.on_transition(transition, &issues);
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
        Phase::Situp(self.phase.committed())
    }

    fn stats(&self) -> &SessionStats {
        &self.core.stats
    }

    fn grading_confidence(&self) -> f64 {
        self.core.confidence.score()
    }
}
