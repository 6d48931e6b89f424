// ABOUTME: Total fitness-test score aggregation and performance classification
// ABOUTME: Upper-body event (push-ups or pull-ups), plank, and run combine into a class
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use ptgrade_core::models::{ExerciseType, Participant};
use serde::{Deserialize, Serialize};

use crate::engine::{ScoreLookup, StandardsEngine};

/// The upper-body event a participant chose; exactly one counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "reps", rename_all = "snake_case")]
pub enum UpperBodyEvent {
    /// Push-up rep count
    Pushups(u32),
    /// Pull-up rep count
    Pullups(u32),
}

impl UpperBodyEvent {
    /// Exercise this event is scored against
    #[must_use]
    pub const fn exercise(&self) -> ExerciseType {
        match self {
            Self::Pushups(_) => ExerciseType::Pushup,
            Self::Pullups(_) => ExerciseType::Pullup,
        }
    }

    /// Reps performed
    #[must_use]
    pub const fn reps(&self) -> u32 {
        match self {
            Self::Pushups(reps) | Self::Pullups(reps) => *reps,
        }
    }
}

/// Raw results of a full fitness test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PftPerformance {
    /// Push-ups or pull-ups; `None` if the event was not attempted
    pub upper_body: Option<UpperBodyEvent>,
    /// Plank hold in whole seconds
    pub plank_seconds: u32,
    /// Run time in whole seconds
    pub run_seconds: u32,
}

/// Ordered performance classes, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceClass {
    /// 285-300 points
    FirstClass,
    /// 245-284 points
    SecondClass,
    /// 200-244 points
    ThirdClass,
    /// Below 200 points
    Fail,
}

impl PerformanceClass {
    /// Bucket a total score
    #[must_use]
    pub const fn from_total(total: u16) -> Self {
        match total {
            285.. => Self::FirstClass,
            245..=284 => Self::SecondClass,
            200..=244 => Self::ThirdClass,
            _ => Self::Fail,
        }
    }

    /// Label shown to users
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::FirstClass => "1st Class",
            Self::SecondClass => "2nd Class",
            Self::ThirdClass => "3rd Class",
            Self::Fail => "Fail",
        }
    }

    /// Whether the class is a pass
    #[must_use]
    pub const fn is_passing(&self) -> bool {
        !matches!(self, Self::Fail)
    }
}

impl fmt::Display for PerformanceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-event lookups, total, and class for one fitness test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Upper-body event and its lookup
    pub upper_body: Option<(UpperBodyEvent, ScoreLookup)>,
    /// Plank lookup
    pub plank: ScoreLookup,
    /// Run lookup
    pub run: ScoreLookup,
    /// Sum of points
    pub total: u16,
    /// Class for the total
    pub class: PerformanceClass,
}

/// Sum upper-body, plank, and run points
#[must_use]
pub fn total_score(upper_body: Option<u8>, plank: u8, run: u8) -> u16 {
    u16::from(upper_body.unwrap_or(0)) + u16::from(plank) + u16::from(run)
}

impl StandardsEngine {
    /// Score every event of a fitness test and classify the total
    #[must_use]
    pub fn score_pft(&self, performance: &PftPerformance, participant: Participant) -> ScoreBreakdown {
        let upper_body = performance
            .upper_body
            .map(|event| (event, self.lookup(event.exercise(), event.reps(), participant)));
        let plank = self.lookup(ExerciseType::Plank, performance.plank_seconds, participant);
        let run = self.lookup(ExerciseType::Run, performance.run_seconds, participant);

        let total = total_score(
            upper_body.map(|(_, lookup)| lookup.points()),
            plank.points(),
            run.points(),
        );
        ScoreBreakdown {
            upper_body,
            plank,
            run,
            total,
            class: PerformanceClass::from_total(total),
        }
    }
}
