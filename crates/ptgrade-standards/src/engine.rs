// ABOUTME: Standards scoring engine: performance + age + gender to fitness-test points
// ABOUTME: Process-wide read-only handle, explicit not-found results, and score limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Scoring Engine
//!
//! Lookups never fail. A lookup that lands on a `null` cell is
//! [`ScoreLookup::NoCredit`]; a key absent from the table is
//! [`ScoreLookup::KeyNotFound`]. Both score zero through [`StandardsEngine::score`],
//! and [`StandardsEngine::lookup`] keeps them apart.

use std::path::Path;
use std::sync::OnceLock;

use ptgrade_core::models::{ExerciseType, Gender, Participant};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::age_bracket::AgeBracket;
use crate::error::StandardsError;
use crate::table::{file_names, GenderedTable, KeyKind, PlankTable, StandardsSources, TableMetadata};

static GLOBAL_ENGINE: OnceLock<StandardsEngine> = OnceLock::new();

/// Outcome of a standards lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "points", rename_all = "snake_case")]
pub enum ScoreLookup {
    /// The table awards these points
    Scored(u8),
    /// The table has the row but awards no credit for this bracket
    NoCredit,
    /// The table has no row for this performance
    KeyNotFound,
}

impl ScoreLookup {
    /// Points awarded, zero unless scored
    #[must_use]
    pub const fn points(&self) -> u8 {
        match self {
            Self::Scored(points) => *points,
            Self::NoCredit | Self::KeyNotFound => 0,
        }
    }

    /// The table produced a score
    #[must_use]
    pub const fn is_scored(&self) -> bool {
        matches!(self, Self::Scored(_))
    }
}

/// Maximum points an exercise can earn
#[must_use]
pub const fn max_score(exercise: ExerciseType) -> u8 {
    match exercise {
        ExerciseType::Pushup => 70,
        ExerciseType::Pullup | ExerciseType::Situp | ExerciseType::Plank | ExerciseType::Run => 100,
    }
}

/// Minimum points that count as a pass
#[must_use]
pub const fn min_passing_score(exercise: ExerciseType) -> u8 {
    match exercise {
        ExerciseType::Situp => 60,
        ExerciseType::Pushup | ExerciseType::Pullup | ExerciseType::Plank | ExerciseType::Run => 40,
    }
}

/// Format seconds as the `M:SS` key used by time tables
#[must_use]
pub fn format_time_key(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Validated standards tables for every scored exercise
#[derive(Debug, Clone)]
pub struct StandardsEngine {
    pushups: GenderedTable,
    pullups: GenderedTable,
    situps: GenderedTable,
    run: GenderedTable,
    plank: PlankTable,
}

impl StandardsEngine {
    /// Parse and validate the tables compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns [`StandardsError`] if any bundled table is malformed.
    pub fn bundled() -> Result<Self, StandardsError> {
        Self::from_sources(&StandardsSources::bundled())
    }

    /// Parse and validate tables read from `dir`
    ///
    /// # Errors
    ///
    /// Returns [`StandardsError`] if a file is missing or malformed.
    pub fn from_dir(dir: &Path) -> Result<Self, StandardsError> {
        Self::from_sources(&StandardsSources::from_dir(dir)?)
    }

    /// Parse and validate tables from raw JSON documents
    ///
    /// # Errors
    ///
    /// Returns [`StandardsError`] describing the first invalid table.
    pub fn from_sources(sources: &StandardsSources) -> Result<Self, StandardsError> {
        let engine = Self {
            pushups: GenderedTable::parse(file_names::PUSHUPS, "pushups", KeyKind::Reps, &sources.pushups)?,
            pullups: GenderedTable::parse(file_names::PULLUPS, "pullups", KeyKind::Reps, &sources.pullups)?,
            situps: GenderedTable::parse(file_names::SITUPS, "situps", KeyKind::Reps, &sources.situps)?,
            run: GenderedTable::parse(file_names::RUN, "run_3mile", KeyKind::Time, &sources.run)?,
            plank: PlankTable::parse(file_names::PLANK, &sources.plank)?,
        };
        info!(
            pushups = %engine.pushups.metadata.version,
            pullups = %engine.pullups.metadata.version,
            situps = %engine.situps.metadata.version,
            run = %engine.run.metadata.version,
            plank = %engine.plank.metadata.version,
            "Loaded fitness standards tables"
        );
        Ok(engine)
    }

    /// Initialize the process-wide engine from bundled data
    ///
    /// Call once at startup and abort on error. Later calls return the
    /// already-loaded engine.
    ///
    /// # Errors
    ///
    /// Returns [`StandardsError`] if the bundled tables are malformed.
    pub fn init_global() -> Result<&'static Self, StandardsError> {
        if let Some(engine) = GLOBAL_ENGINE.get() {
            return Ok(engine);
        }
        let engine = Self::bundled()?;
        Ok(GLOBAL_ENGINE.get_or_init(|| engine))
    }

    /// The process-wide engine, if [`Self::init_global`] has succeeded
    #[must_use]
    pub fn global() -> Option<&'static Self> {
        GLOBAL_ENGINE.get()
    }

    /// Points for a performance, zero when the table has no credit or no row
    ///
    /// `value` is reps for rep exercises and elapsed seconds for plank and run.
    #[must_use]
    pub fn score(&self, exercise: ExerciseType, value: u32, age: u8, gender: Gender) -> u8 {
        self.lookup(exercise, value, Participant::new(age, gender)).points()
    }

    /// Look up a performance, keeping "no credit" and "missing row" distinct
    #[must_use]
    pub fn lookup(&self, exercise: ExerciseType, value: u32, participant: Participant) -> ScoreLookup {
        let table = match exercise {
            ExerciseType::Plank => return ScoreLookup::Scored(self.plank.points_for(value)),
            ExerciseType::Pushup => &self.pushups,
            ExerciseType::Pullup => &self.pullups,
            ExerciseType::Situp => &self.situps,
            ExerciseType::Run => &self.run,
        };

        let key = match table.kind {
            KeyKind::Reps => value.to_string(),
            KeyKind::Time => format_time_key(value),
        };
        let column = table.column(participant.gender);
        let index = column.bracket_index(participant.age);

        let Some(row) = column.row(&key) else {
            debug!(%exercise, key = %key, "no standards row for performance");
            return ScoreLookup::KeyNotFound;
        };
        match row.get(index).copied().flatten() {
            Some(points) => ScoreLookup::Scored(points),
            None => ScoreLookup::NoCredit,
        }
    }

    /// Whether a performance earns at least the minimum passing score
    #[must_use]
    pub fn is_passing(&self, exercise: ExerciseType, value: u32, participant: Participant) -> bool {
        self.lookup(exercise, value, participant).points() >= min_passing_score(exercise)
    }

    /// Age brackets used for `exercise` and `gender`; empty for plank
    #[must_use]
    pub fn age_brackets(&self, exercise: ExerciseType, gender: Gender) -> &[AgeBracket] {
        match self.gendered(exercise) {
            Some(table) => table.column(gender).brackets(),
            None => &[],
        }
    }

    /// Plank thresholds as `(seconds, points)`, highest first
    #[must_use]
    pub fn plank_thresholds(&self) -> &[(u32, u8)] {
        self.plank.thresholds()
    }

    /// Shortest and longest plank holds the table recognises, in seconds
    #[must_use]
    pub fn plank_time_range(&self) -> (u32, u32) {
        (self.plank.min_time_seconds, self.plank.max_time_seconds)
    }

    /// Points for a maximal plank hold
    #[must_use]
    pub fn plank_max_points(&self) -> u8 {
        self.plank.max_points
    }

    /// Version and provenance of the table used for `exercise`
    #[must_use]
    pub fn metadata(&self, exercise: ExerciseType) -> &TableMetadata {
        match exercise {
            ExerciseType::Plank => &self.plank.metadata,
            ExerciseType::Pushup => &self.pushups.metadata,
            ExerciseType::Pullup => &self.pullups.metadata,
            ExerciseType::Situp => &self.situps.metadata,
            ExerciseType::Run => &self.run.metadata,
        }
    }

    fn gendered(&self, exercise: ExerciseType) -> Option<&GenderedTable> {
        match exercise {
            ExerciseType::Pushup => Some(&self.pushups),
            ExerciseType::Pullup => Some(&self.pullups),
            ExerciseType::Situp => Some(&self.situps),
            ExerciseType::Run => Some(&self.run),
            ExerciseType::Plank => None,
        }
    }
}
