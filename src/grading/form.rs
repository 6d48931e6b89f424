// ABOUTME: Form faults reported by the graders and the joints each one highlights
// ABOUTME: Fixed feedback text per fault, independent of exercise thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use ptgrade_core::models::Joint;
use serde::{Deserialize, Serialize};

/// A form fault detected in a frame or across a rep attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormIssue {
    /// Hips below the shoulder-ankle line
    HipsSagging,
    /// Hips above the shoulder-ankle line
    HipsPiking,
    /// One shoulder markedly higher than the other
    ShouldersUneven,
    /// Push-up bottom never reached
    IncompleteDescent,
    /// Chin never cleared the bar
    ChinNotOverBar,
    /// Hips swung relative to the shoulders
    Kipping,
    /// Whole body drifted sideways
    HorizontalDrift,
    /// Elbows never bent far enough at the top
    InsufficientFlexion,
    /// Knees bent while hanging
    KneesBent,
    /// Feet stayed on the ground while the body rose
    GroundContact,
    /// Torso never reached vertical
    TorsoNotVertical,
    /// Hands left the chest
    ArmsUncrossed,
    /// Knee angle left the allowed band
    KneesOutOfBand,
    /// Legs bent during a plank
    LegsBent,
    /// Left and right sides out of line
    Asymmetric,
    /// Elbows not below the shoulders
    ElbowsNotUnderShoulders,
}

impl FormIssue {
    /// Feedback shown to the participant
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::HipsSagging => "Keep your body straight: hips are sagging",
            Self::HipsPiking => "Keep your body straight: lower your hips",
            Self::ShouldersUneven => "Keep shoulders level",
            Self::IncompleteDescent => "Lower until your upper arms are parallel to the ground",
            Self::ChinNotOverBar => "Pull until your chin clears the bar",
            Self::Kipping => "Excessive swinging (kipping)",
            Self::HorizontalDrift => "Excessive swinging: keep your body still",
            Self::InsufficientFlexion => "Bend your elbows fully at the top",
            Self::KneesBent => "Keep legs straight",
            Self::GroundContact => "Keep feet off the ground",
            Self::TorsoNotVertical => "Sit up until your torso is vertical",
            Self::ArmsUncrossed => "Keep arms crossed over your chest",
            Self::KneesOutOfBand => "Keep knees bent at about 90 degrees",
            Self::LegsBent => "Keep your legs straight",
            Self::Asymmetric => "Keep shoulders and hips level",
            Self::ElbowsNotUnderShoulders => "Keep elbows under shoulders",
        }
    }

    /// Joints to highlight for this fault
    #[must_use]
    pub const fn joints(&self) -> &'static [Joint] {
        match self {
            Self::HipsSagging | Self::HipsPiking => &[Joint::LeftHip, Joint::RightHip],
            Self::ShouldersUneven => &[Joint::LeftShoulder, Joint::RightShoulder],
            Self::IncompleteDescent | Self::InsufficientFlexion => {
                &[Joint::LeftElbow, Joint::RightElbow]
            }
            Self::ChinNotOverBar => &[Joint::Nose],
            Self::Kipping => &[Joint::LeftHip, Joint::RightHip, Joint::LeftKnee, Joint::RightKnee],
            Self::HorizontalDrift => &[Joint::LeftShoulder, Joint::RightShoulder],
            Self::KneesBent | Self::LegsBent | Self::KneesOutOfBand => {
                &[Joint::LeftKnee, Joint::RightKnee]
            }
            Self::GroundContact => &[Joint::LeftAnkle, Joint::RightAnkle],
            Self::TorsoNotVertical => &[Joint::LeftShoulder, Joint::RightShoulder, Joint::LeftHip, Joint::RightHip],
            Self::ArmsUncrossed => &[Joint::LeftWrist, Joint::RightWrist],
            Self::Asymmetric => &[Joint::LeftShoulder, Joint::RightShoulder, Joint::LeftHip, Joint::RightHip],
            Self::ElbowsNotUnderShoulders => {
                &[Joint::LeftElbow, Joint::RightElbow, Joint::LeftShoulder, Joint::RightShoulder]
            }
        }
    }
}

impl fmt::Display for FormIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Per-frame form score: each simultaneous fault costs a quarter
#[must_use]
pub fn frame_form_score(issues: &[FormIssue]) -> f64 {
    (1.0 - 0.25 * issues.len() as f64).max(0.0)
}
