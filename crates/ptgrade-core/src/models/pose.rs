// ABOUTME: Pose frame model: normalized joint coordinates with per-joint confidence
// ABOUTME: Immutable once built; decodes detector output and drops unknown joints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::joint::Joint;
use crate::constants::confidence;

/// A point in normalized image coordinates (`y` grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// Horizontal position in [0, 1]
    pub x: f64,
    /// Vertical position in [0, 1], 0 at the top of the frame
    pub y: f64,
}

impl Point2D {
    /// Create a point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Both coordinates are finite numbers
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One joint as reported by the pose detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointObservation {
    /// Horizontal position in [0, 1]
    pub x: f64,
    /// Vertical position in [0, 1]
    pub y: f64,
    /// Detector confidence in [0, 1]
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

const fn default_confidence() -> f64 {
    confidence::DEFAULT_OBSERVED
}

impl JointObservation {
    /// Create an observation, clamping confidence into [0, 1]
    #[must_use]
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            confidence::MIN
        } else {
            confidence.clamp(confidence::MIN, confidence::MAX)
        };
        Self { x, y, confidence }
    }

    /// Position of the joint
    #[must_use]
    pub const fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Wire shape of a pose frame as produced by detectors
#[derive(Debug, Clone, Deserialize)]
struct PoseFrameRecord {
    #[serde(default, alias = "timestamp_secs")]
    timestamp: f64,
    #[serde(default)]
    joints: HashMap<String, JointObservation>,
}

impl From<PoseFrameRecord> for PoseFrame {
    fn from(record: PoseFrameRecord) -> Self {
        let mut builder = Self::builder(record.timestamp);
        for (name, observation) in record.joints {
            match name.parse::<Joint>() {
                Ok(joint) => {
                    builder = builder.joint(joint, observation.x, observation.y, observation.confidence);
                }
                Err(_) => trace!(joint = %name, "ignoring unrecognised joint"),
            }
        }
        builder.build()
    }
}

/// One frame of joint positions for a single tracked body
///
/// Joints with non-finite coordinates are treated as unobserved.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "PoseFrameRecord")]
pub struct PoseFrame {
    timestamp: f64,
    joints: BTreeMap<Joint, JointObservation>,
}

impl PoseFrame {
    /// Start building a frame captured at `timestamp` seconds
    #[must_use]
    pub fn builder(timestamp: f64) -> PoseFrameBuilder {
        PoseFrameBuilder {
            frame: Self {
                timestamp,
                joints: BTreeMap::new(),
            },
        }
    }

    /// Capture time in seconds
    #[must_use]
    pub const fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// Observation for `joint`, if present
    #[must_use]
    pub fn observation(&self, joint: Joint) -> Option<&JointObservation> {
        self.joints.get(&joint)
    }

    /// Position of `joint` regardless of confidence
    #[must_use]
    pub fn point(&self, joint: Joint) -> Option<Point2D> {
        self.observation(joint).map(JointObservation::position)
    }

    /// Position of `joint` only if its confidence reaches `min_confidence`
    #[must_use]
    pub fn confident_point(&self, joint: Joint, min_confidence: f64) -> Option<Point2D> {
        self.observation(joint)
            .filter(|obs| obs.confidence >= min_confidence)
            .map(JointObservation::position)
    }

    /// Confidence of `joint`, zero when absent
    #[must_use]
    pub fn confidence(&self, joint: Joint) -> f64 {
        self.observation(joint).map_or(confidence::MIN, |obs| obs.confidence)
    }

    /// Midpoint of a left/right pair
    #[must_use]
    pub fn midpoint(&self, pair: (Joint, Joint)) -> Option<Point2D> {
        Some(self.point(pair.0)?.midpoint(self.point(pair.1)?))
    }

    /// Mean confidence over `joints`, counting absent joints as zero
    #[must_use]
    pub fn mean_confidence(&self, joints: &[Joint]) -> f64 {
        if joints.is_empty() {
            return confidence::MIN;
        }
        joints.iter().map(|joint| self.confidence(*joint)).sum::<f64>() / joints.len() as f64
    }

    /// Iterate observed joints in declaration order
    pub fn joints(&self) -> impl Iterator<Item = (Joint, &JointObservation)> {
        self.joints.iter().map(|(joint, obs)| (*joint, obs))
    }

    /// Number of observed joints
    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    /// No joints observed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

/// Builder for [`PoseFrame`]
#[derive(Debug, Clone)]
pub struct PoseFrameBuilder {
    frame: PoseFrame,
}

impl PoseFrameBuilder {
    /// Record a joint; non-finite coordinates leave it unobserved
    #[must_use]
    pub fn joint(mut self, joint: Joint, x: f64, y: f64, confidence: f64) -> Self {
        if x.is_finite() && y.is_finite() {
            self.frame
                .joints
                .insert(joint, JointObservation::new(x, y, confidence));
        } else {
            self.frame.joints.remove(&joint);
        }
        self
    }

    /// Record a joint at `point`
    #[must_use]
    pub fn point(self, joint: Joint, point: Point2D, confidence: f64) -> Self {
        self.joint(joint, point.x, point.y, confidence)
    }

    /// Finish the frame
    #[must_use]
    pub fn build(self) -> PoseFrame {
        self.frame
    }
}
