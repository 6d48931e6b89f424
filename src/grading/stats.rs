// ABOUTME: Cumulative session state shared by every grader
// ABOUTME: Rep count, per-rep form quality, problem joints, and the rejected-attempt log
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::{BTreeSet, VecDeque};

use ptgrade_core::constants::history::REJECTION_LOG_CAPACITY;
use ptgrade_core::models::Joint;
use serde::{Deserialize, Serialize};

use super::form::FormIssue;

/// A rep attempt that was not counted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRep {
    /// 1-based attempt number within the session
    pub attempt: u32,
    /// Fault that disqualified the attempt
    pub issue: FormIssue,
    /// Key extrema at rejection time, e.g. `("min_elbow_angle", 112.0)`
    pub measurements: Vec<(String, f64)>,
}

/// Bounded log of rejected attempts, oldest dropped first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RejectionLog {
    entries: VecDeque<RejectedRep>,
}

impl RejectionLog {
    /// Append, evicting the oldest entry when full
    pub fn push(&mut self, entry: RejectedRep) {
        if self.entries.len() == REJECTION_LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &RejectedRep> {
        self.entries.iter()
    }

    /// Most recent entry
    #[must_use]
    pub fn last(&self) -> Option<&RejectedRep> {
        self.entries.back()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Session state owned by one grader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    /// Counted reps
    pub rep_count: u32,
    /// Attempts started, counted or not
    pub attempts: u32,
    /// Form quality of each counted rep, in order
    pub form_scores: Vec<f64>,
    /// Most recent form feedback
    pub last_form_issue: Option<String>,
    /// Joints implicated by current faults
    pub problem_joints: BTreeSet<Joint>,
    /// Rejected attempts
    pub rejections: RejectionLog,
}

impl SessionStats {
    /// Count a rep with its form quality
    pub fn record_rep(&mut self, form_quality: f64) {
        self.rep_count += 1;
        self.attempts += 1;
        self.form_scores.push(form_quality.clamp(0.0, 1.0));
    }

    /// Log a rejected attempt and surface its fault
    pub fn record_rejection(&mut self, issue: FormIssue, measurements: Vec<(String, f64)>) {
        self.attempts += 1;
        self.rejections.push(RejectedRep {
            attempt: self.attempts,
            issue,
            measurements,
        });
        self.flag(&[issue]);
    }

    /// Surface faults: last message and highlighted joints
    pub fn flag(&mut self, issues: &[FormIssue]) {
        self.problem_joints = issues.iter().flat_map(|issue| issue.joints().iter().copied()).collect();
        if let Some(first) = issues.first() {
            self.last_form_issue = Some(first.message().to_owned());
        }
    }

    /// Clear highlighted joints; the last message is kept
    pub fn clear_problem_joints(&mut self) {
        self.problem_joints.clear();
    }

    /// Mean form quality of counted reps; zero before the first rep
    #[must_use]
    pub fn form_quality_average(&self) -> f64 {
        if self.form_scores.is_empty() {
            return 0.0;
        }
        self.form_scores.iter().sum::<f64>() / self.form_scores.len() as f64
    }
}
