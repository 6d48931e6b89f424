// ABOUTME: Body joint identifiers produced by pose detection
// ABOUTME: Defines the Joint enum, joint tiers, and string parsing for wire names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Body joints the graders understand
///
/// Pose detectors often report more landmarks than these; unknown names are
/// dropped when frames are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    /// Nose, used as the chin proxy
    Nose,
    /// Neck base
    Neck,
    /// Left shoulder
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left elbow
    LeftElbow,
    /// Right elbow
    RightElbow,
    /// Left wrist
    LeftWrist,
    /// Right wrist
    RightWrist,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee
    LeftKnee,
    /// Right knee
    RightKnee,
    /// Left ankle
    LeftAnkle,
    /// Right ankle
    RightAnkle,
}

/// Visibility tier a joint belongs to for calibration thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointTier {
    /// Joints every exercise needs (shoulders, elbows, wrists, hips)
    Critical,
    /// Lower-body joints used by secondary checks
    Support,
    /// Head landmarks
    Face,
}

impl Joint {
    /// Every joint, in declaration order
    pub const ALL: [Self; 14] = [
        Self::Nose,
        Self::Neck,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Wire name used in pose input and calibration profiles
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::Neck => "neck",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Default visibility tier
    #[must_use]
    pub const fn tier(&self) -> JointTier {
        match self {
            Self::Nose | Self::Neck => JointTier::Face,
            Self::LeftShoulder
            | Self::RightShoulder
            | Self::LeftElbow
            | Self::RightElbow
            | Self::LeftWrist
            | Self::RightWrist
            | Self::LeftHip
            | Self::RightHip => JointTier::Critical,
            Self::LeftKnee | Self::RightKnee | Self::LeftAnkle | Self::RightAnkle => {
                JointTier::Support
            }
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Joint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .iter()
            .copied()
            .find(|joint| joint.as_str() == normalized)
            .ok_or_else(|| format!("unknown joint: {s}"))
    }
}

/// Left/right pairs used by midpoint and symmetry checks
pub mod pairs {
    use super::Joint;

    /// Shoulders
    pub const SHOULDERS: (Joint, Joint) = (Joint::LeftShoulder, Joint::RightShoulder);
    /// Elbows
    pub const ELBOWS: (Joint, Joint) = (Joint::LeftElbow, Joint::RightElbow);
    /// Wrists
    pub const WRISTS: (Joint, Joint) = (Joint::LeftWrist, Joint::RightWrist);
    /// Hips
    pub const HIPS: (Joint, Joint) = (Joint::LeftHip, Joint::RightHip);
    /// Knees
    pub const KNEES: (Joint, Joint) = (Joint::LeftKnee, Joint::RightKnee);
    /// Ankles
    pub const ANKLES: (Joint, Joint) = (Joint::LeftAnkle, Joint::RightAnkle);
}
