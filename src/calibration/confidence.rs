// ABOUTME: Grading confidence from pose quality, angle accuracy, and form stability
// ABOUTME: Multiplicative composition of three factors in [0, 1] over a rolling window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::VecDeque;

use super::CalibrationProfile;
use crate::config::ConfidenceConfig;

/// A measured angle and the target it should sit near
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleReading {
    /// Tolerance key in the calibration profile
    pub name: &'static str,
    /// Measured angle (degrees)
    pub measured: f64,
    /// Target angle (degrees)
    pub target: f64,
}

impl AngleReading {
    /// Build a reading
    #[must_use]
    pub const fn new(name: &'static str, measured: f64, target: f64) -> Self {
        Self {
            name,
            measured,
            target,
        }
    }
}

/// Running confidence in the grader's decisions
#[derive(Debug, Clone)]
pub struct ConfidenceTracker {
    config: ConfidenceConfig,
    base: f64,
    visibility_threshold: f64,
    angle_tolerances: Vec<(String, f64)>,
    pose_quality: f64,
    angle_accuracy: f64,
    history: VecDeque<f64>,
}

impl ConfidenceTracker {
    /// Tracker for a grader whose gate uses `visibility_threshold`
    #[must_use]
    pub fn new(
        config: ConfidenceConfig,
        profile: Option<&CalibrationProfile>,
        visibility_threshold: f64,
    ) -> Self {
        let angle_tolerances = profile
            .map(|p| {
                p.validation_ranges
                    .angle_tolerances
                    .iter()
                    .map(|(name, tolerance)| (name.clone(), *tolerance))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            base: profile.map_or(1.0, |p| p.confidence_level),
            visibility_threshold,
            angle_tolerances,
            pose_quality: 1.0,
            angle_accuracy: 1.0,
            history: VecDeque::with_capacity(config.history_window),
            config,
        }
    }

    /// Record one graded frame
    ///
    /// `mean_confidence` is the mean over the gate's required joints;
    /// `form_score` is the frame's form score in [0, 1].
    pub fn record(&mut self, mean_confidence: f64, readings: &[AngleReading], form_score: f64) {
        self.pose_quality = if self.visibility_threshold > 0.0 {
            (mean_confidence / self.visibility_threshold).clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.angle_accuracy = self.accuracy(readings);

        if self.history.len() == self.config.history_window {
            self.history.pop_front();
        }
        self.history.push_back(form_score.clamp(0.0, 1.0));
    }

    /// Composite confidence in [0, 1]
    #[must_use]
    pub fn score(&self) -> f64 {
        (self.base * self.pose_quality * self.angle_accuracy * self.stability()).clamp(0.0, 1.0)
    }

    /// Pose-quality factor from the latest frame
    #[must_use]
    pub const fn pose_quality(&self) -> f64 {
        self.pose_quality
    }

    /// Angle-accuracy factor from the latest frame
    #[must_use]
    pub const fn angle_accuracy(&self) -> f64 {
        self.angle_accuracy
    }

    /// Stability factor over the rolling window
    #[must_use]
    pub fn stability(&self) -> f64 {
        if self.history.len() < self.config.min_history.max(1) {
            return 1.0;
        }
        let n = self.history.len() as f64;
        let mean = self.history.iter().sum::<f64>() / n;
        let variance = self.history.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        1.0 - (self.config.variance_weight * variance).min(1.0)
    }

    /// Forget frame history, keeping the calibration inputs
    pub fn reset(&mut self) {
        self.pose_quality = 1.0;
        self.angle_accuracy = 1.0;
        self.history.clear();
    }

    fn tolerance_for(&self, name: &str) -> f64 {
        self.angle_tolerances
            .iter()
            .find(|(key, _)| key == name)
            .map_or(self.config.default_angle_tolerance, |(_, tolerance)| *tolerance)
    }

    fn accuracy(&self, readings: &[AngleReading]) -> f64 {
        let penalty: f64 = readings
            .iter()
            .filter_map(|reading| {
                let tolerance = self.tolerance_for(reading.name);
                let deviation = (reading.measured - reading.target).abs();
                (deviation > tolerance)
                    .then(|| (deviation / (2.0 * tolerance)).min(self.config.max_angle_penalty))
            })
            .sum();
        (1.0 - penalty).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> ConfidenceTracker {
        ConfidenceTracker::new(ConfidenceConfig::default(), None, 0.5)
    }

    #[test]
    fn test_fresh_tracker_is_fully_confident() {
        assert!((tracker().score() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_joint_confidence_scales_down() {
        let mut tracker = tracker();
        tracker.record(0.25, &[], 1.0);
        assert!((tracker.pose_quality() - 0.5).abs() < 1e-9);
        assert!((tracker.score() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_angle_outside_band_is_penalized_and_capped() {
        let mut tracker = tracker();
        tracker.record(1.0, &[AngleReading::new("elbow_flexed", 120.0, 90.0)], 1.0);
        // deviation 30 with tolerance 15 is a full-size penalty, capped at 0.3
        assert!((tracker.angle_accuracy() - 0.7).abs() < 1e-9);

        tracker.record(1.0, &[AngleReading::new("elbow_flexed", 100.0, 90.0)], 1.0);
        assert!((tracker.angle_accuracy() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_stability_waits_for_history() {
        let mut tracker = tracker();
        for score in [1.0, 0.0, 1.0, 0.0] {
            tracker.record(1.0, &[], score);
        }
        assert!((tracker.stability() - 1.0).abs() < 1e-9);

        tracker.record(1.0, &[], 1.0);
        assert!(tracker.stability() < 1.0);
        assert!(tracker.score() >= 0.0);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut tracker = tracker();
        for _ in 0..10 {
            tracker.record(0.1, &[], 0.0);
        }
        tracker.reset();
        assert!((tracker.score() - 1.0).abs() < 1e-9);
    }
}
