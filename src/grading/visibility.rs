// ABOUTME: Visibility gate that a pose frame must pass before any grading happens
// ABOUTME: Required-joint confidence check and the consecutive-failure tolerance window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use ptgrade_core::models::{Joint, PoseFrame};

use crate::calibration::TierThresholds;

/// Result of gating one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Every required joint is present and confident
    Pass,
    /// At least one required joint is missing or below threshold
    Fail {
        /// Joints that failed, in required order
        missing: Vec<Joint>,
        /// Human-readable reason
        reason: String,
    },
}

/// Required joints and per-tier minimum confidence for one grader
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityGate {
    required: Vec<Joint>,
    thresholds: TierThresholds,
}

impl VisibilityGate {
    /// Gate requiring `required` at the thresholds of their tiers
    #[must_use]
    pub fn new(required: &[Joint], thresholds: TierThresholds) -> Self {
        Self {
            required: required.to_vec(),
            thresholds,
        }
    }

    /// Check a frame
    #[must_use]
    pub fn check(&self, frame: &PoseFrame) -> GateOutcome {
        let missing: Vec<Joint> = self
            .required
            .iter()
            .copied()
            .filter(|joint| frame.confident_point(*joint, self.thresholds.for_joint(*joint)).is_none())
            .collect();
        if missing.is_empty() {
            return GateOutcome::Pass;
        }

        let names: Vec<&str> = missing.iter().map(Joint::as_str).collect();
        let reason = format!("Cannot see clearly: {}", names.join(", "));
        GateOutcome::Fail { missing, reason }
    }

    /// Whether `joint` is confidently observed in `frame`
    #[must_use]
    pub fn sees(&self, frame: &PoseFrame, joint: Joint) -> bool {
        frame.confident_point(joint, self.thresholds.for_joint(joint)).is_some()
    }

    /// Joints this gate requires
    #[must_use]
    pub fn required(&self) -> &[Joint] {
        &self.required
    }

    /// Per-tier thresholds
    #[must_use]
    pub const fn thresholds(&self) -> TierThresholds {
        self.thresholds
    }
}

/// Counts consecutive gate failures
///
/// Failures below the tolerance leave the grader's phase untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidFrameTracker {
    consecutive: u32,
    tolerance: u32,
}

impl InvalidFrameTracker {
    /// Tracker that trips after `tolerance` consecutive failures
    #[must_use]
    pub fn new(tolerance: u32) -> Self {
        Self {
            consecutive: 0,
            tolerance: tolerance.max(1),
        }
    }

    /// Record a failed frame; true once the tolerance is reached
    pub fn record_failure(&mut self) -> bool {
        self.consecutive = self.consecutive.saturating_add(1);
        self.tripped()
    }

    /// Record a frame that passed the gate
    pub fn record_pass(&mut self) {
        self.consecutive = 0;
    }

    /// Whether the tolerance has been reached
    #[must_use]
    pub const fn tripped(&self) -> bool {
        self.consecutive >= self.tolerance
    }

    /// Current run of failures
    #[must_use]
    pub const fn consecutive(&self) -> u32 {
        self.consecutive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> VisibilityGate {
        VisibilityGate::new(
            &[Joint::LeftShoulder, Joint::LeftKnee, Joint::Nose],
            TierThresholds {
                critical: 0.5,
                support: 0.3,
                face: 0.8,
            },
        )
    }

    #[test]
    fn test_passes_with_confident_joints() {
        let frame = PoseFrame::builder(0.0)
            .joint(Joint::LeftShoulder, 0.4, 0.4, 0.6)
            .joint(Joint::LeftKnee, 0.4, 0.7, 0.35)
            .joint(Joint::Nose, 0.4, 0.2, 0.9)
            .build();
        assert_eq!(gate().check(&frame), GateOutcome::Pass);
    }

    #[test]
    fn test_fails_naming_missing_and_weak_joints() {
        let frame = PoseFrame::builder(0.0)
            .joint(Joint::LeftShoulder, 0.4, 0.4, 0.6)
            .joint(Joint::Nose, 0.4, 0.2, 0.7)
            .build();
        let GateOutcome::Fail { missing, reason } = gate().check(&frame) else {
            panic!("expected gate failure");
        };
        assert_eq!(missing, vec![Joint::LeftKnee, Joint::Nose]);
        assert!(reason.contains("left_knee"));
    }

    #[test]
    fn test_tolerance_window() {
        let mut tracker = InvalidFrameTracker::new(3);
        assert!(!tracker.record_failure());
        assert!(!tracker.record_failure());
        tracker.record_pass();
        assert!(!tracker.record_failure());
        assert!(!tracker.record_failure());
        assert!(tracker.record_failure());
    }
}
