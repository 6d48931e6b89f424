// ABOUTME: Standards table schema, bundled data, and load-time validation
// ABOUTME: Parses gendered rep/time tables and the universal plank threshold table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Table Schema
//!
//! Gendered tables (push-ups, pull-ups, sit-ups, run):
//!
//! ```json
//! { "exercise": "pushups", "scoring_system": "...", "version": "...",
//!   "source": "...", "description": "...",
//!   "male":   { "age_brackets": ["17-20", "51+"], "scores": { "42": [40, null] } },
//!   "female": { ... } }
//! ```
//!
//! The plank table is gender and age independent and keyed by elapsed
//! seconds thresholds under `universal.scoring_table`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use ptgrade_core::models::Gender;
use serde::{Deserialize, Serialize};

use crate::age_bracket::{self, AgeBracket};
use crate::error::StandardsError;

/// Table documents compiled into the binary
pub mod bundled {
    /// Push-up table
    pub const PUSHUPS: &str = include_str!("../data/usmc_pushup_scoring.json");
    /// Pull-up table
    pub const PULLUPS: &str = include_str!("../data/usmc_pullup_scoring.json");
    /// Sit-up table
    pub const SITUPS: &str = include_str!("../data/apft_situp_scoring.json");
    /// 3-mile run table
    pub const RUN: &str = include_str!("../data/usmc_3mile_run_scoring.json");
    /// Plank table
    pub const PLANK: &str = include_str!("../data/usmc_plank_scoring.json");
}

/// File names looked up by [`StandardsSources::from_dir`]
pub mod file_names {
    /// Push-up table file
    pub const PUSHUPS: &str = "usmc_pushup_scoring.json";
    /// Pull-up table file
    pub const PULLUPS: &str = "usmc_pullup_scoring.json";
    /// Sit-up table file
    pub const SITUPS: &str = "apft_situp_scoring.json";
    /// Run table file
    pub const RUN: &str = "usmc_3mile_run_scoring.json";
    /// Plank table file
    pub const PLANK: &str = "usmc_plank_scoring.json";
}

/// Raw JSON for every table the engine needs
#[derive(Debug, Clone)]
pub struct StandardsSources {
    /// Push-up table document
    pub pushups: String,
    /// Pull-up table document
    pub pullups: String,
    /// Sit-up table document
    pub situps: String,
    /// Run table document
    pub run: String,
    /// Plank table document
    pub plank: String,
}

impl StandardsSources {
    /// Tables compiled into the binary
    #[must_use]
    pub fn bundled() -> Self {
        Self {
            pushups: bundled::PUSHUPS.to_owned(),
            pullups: bundled::PULLUPS.to_owned(),
            situps: bundled::SITUPS.to_owned(),
            run: bundled::RUN.to_owned(),
            plank: bundled::PLANK.to_owned(),
        }
    }

    /// Read every table from `dir` using the standard file names
    ///
    /// # Errors
    ///
    /// Returns [`StandardsError::Io`] for the first file that cannot be read.
    pub fn from_dir(dir: &Path) -> Result<Self, StandardsError> {
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| StandardsError::Io { path, source })
        };
        Ok(Self {
            pushups: read(file_names::PUSHUPS)?,
            pullups: read(file_names::PULLUPS)?,
            situps: read(file_names::SITUPS)?,
            run: read(file_names::RUN)?,
            plank: read(file_names::PLANK)?,
        })
    }
}

/// Descriptive fields common to every table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Exercise identifier in the data
    pub exercise: String,
    /// Scoring system name
    pub scoring_system: String,
    /// Data version
    pub version: String,
    /// Provenance
    pub source: String,
    /// Human-readable description
    pub description: String,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenderScoringDoc {
    age_brackets: Vec<String>,
    scores: HashMap<String, Vec<Option<u8>>>,
}

#[derive(Debug, Deserialize)]
struct GenderedTableDoc {
    #[serde(flatten)]
    metadata: TableMetadata,
    male: GenderScoringDoc,
    female: GenderScoringDoc,
}

#[derive(Debug, Deserialize)]
struct PlankScoringDoc {
    max_time_seconds: u32,
    min_time_seconds: u32,
    max_points: u8,
    min_points: u8,
    scoring_table: HashMap<String, u8>,
}

#[derive(Debug, Deserialize)]
struct PlankTableDoc {
    #[serde(flatten)]
    metadata: TableMetadata,
    universal: PlankScoringDoc,
}

/// How row keys are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyKind {
    /// Rep count, higher is better
    Reps,
    /// `M:SS` elapsed time, lower is better
    Time,
}

impl KeyKind {
    fn parse(self, key: &str) -> Option<u32> {
        match self {
            Self::Reps => key.trim().parse().ok(),
            Self::Time => parse_time_key(key),
        }
    }
}

/// Parse `M:SS` into seconds
pub(crate) fn parse_time_key(key: &str) -> Option<u32> {
    let (minutes, seconds) = key.trim().split_once(':')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    if seconds >= 60 || seconds_digits(key) != 2 {
        return None;
    }
    Some(minutes * 60 + seconds)
}

fn seconds_digits(key: &str) -> usize {
    key.trim().rsplit(':').next().map_or(0, str::len)
}

/// One gender's validated columns
#[derive(Debug, Clone)]
pub(crate) struct GenderColumn {
    brackets: Vec<AgeBracket>,
    rows: HashMap<String, Vec<Option<u8>>>,
}

impl GenderColumn {
    fn parse(table: &str, kind: KeyKind, doc: GenderScoringDoc) -> Result<Self, StandardsError> {
        let brackets = doc
            .age_brackets
            .iter()
            .map(|label| {
                label.parse::<AgeBracket>().map_err(|_| StandardsError::InvalidBracket {
                    table: table.to_owned(),
                    bracket: label.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        age_bracket::validate_layout(&brackets).map_err(|detail| StandardsError::layout(table, detail))?;

        if doc.scores.is_empty() {
            return Err(StandardsError::Empty {
                table: table.to_owned(),
            });
        }
        for (key, row) in &doc.scores {
            if kind.parse(key).is_none() {
                return Err(StandardsError::InvalidKey {
                    table: table.to_owned(),
                    key: key.clone(),
                });
            }
            if row.len() != brackets.len() {
                return Err(StandardsError::RowLength {
                    table: table.to_owned(),
                    key: key.clone(),
                    expected: brackets.len(),
                    actual: row.len(),
                });
            }
            if let Some(points) = row.iter().flatten().find(|points| **points > 100) {
                return Err(StandardsError::ScoreOutOfRange {
                    table: table.to_owned(),
                    key: key.clone(),
                    points: *points,
                });
            }
        }

        Ok(Self {
            brackets,
            rows: doc.scores,
        })
    }

    /// Column index for `age`
    pub(crate) fn bracket_index(&self, age: u8) -> usize {
        age_bracket::resolve_index(&self.brackets, age)
    }

    /// Age brackets in column order
    pub(crate) fn brackets(&self) -> &[AgeBracket] {
        &self.brackets
    }

    /// Row for an exact key; there is no interpolation or saturation
    pub(crate) fn row(&self, key: &str) -> Option<&[Option<u8>]> {
        self.rows.get(key).map(Vec::as_slice)
    }
}

/// A validated gendered table
#[derive(Debug, Clone)]
pub(crate) struct GenderedTable {
    pub(crate) metadata: TableMetadata,
    pub(crate) kind: KeyKind,
    male: GenderColumn,
    female: GenderColumn,
}

impl GenderedTable {
    pub(crate) fn parse(
        table: &str,
        expected_exercise: &'static str,
        kind: KeyKind,
        json: &str,
    ) -> Result<Self, StandardsError> {
        let doc: GenderedTableDoc =
            serde_json::from_str(json).map_err(|source| StandardsError::Parse {
                table: table.to_owned(),
                source,
            })?;
        check_exercise(table, expected_exercise, &doc.metadata)?;
        Ok(Self {
            male: GenderColumn::parse(table, kind, doc.male)?,
            female: GenderColumn::parse(table, kind, doc.female)?,
            metadata: doc.metadata,
            kind,
        })
    }

    pub(crate) const fn column(&self, gender: Gender) -> &GenderColumn {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}

/// A validated plank threshold table
#[derive(Debug, Clone)]
pub(crate) struct PlankTable {
    pub(crate) metadata: TableMetadata,
    /// `(seconds, points)` sorted by seconds, descending
    thresholds: Vec<(u32, u8)>,
    min_points: u8,
    pub(crate) max_time_seconds: u32,
    pub(crate) min_time_seconds: u32,
    pub(crate) max_points: u8,
}

impl PlankTable {
    pub(crate) fn parse(table: &str, json: &str) -> Result<Self, StandardsError> {
        let doc: PlankTableDoc = serde_json::from_str(json).map_err(|source| StandardsError::Parse {
            table: table.to_owned(),
            source,
        })?;
        check_exercise(table, "plank", &doc.metadata)?;

        let mut thresholds = doc
            .universal
            .scoring_table
            .iter()
            .map(|(key, points)| {
                let seconds = key.trim().parse::<u32>().map_err(|_| StandardsError::InvalidKey {
                    table: table.to_owned(),
                    key: key.clone(),
                })?;
                if *points > 100 {
                    return Err(StandardsError::ScoreOutOfRange {
                        table: table.to_owned(),
                        key: key.clone(),
                        points: *points,
                    });
                }
                Ok((seconds, *points))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if thresholds.is_empty() {
            return Err(StandardsError::Empty {
                table: table.to_owned(),
            });
        }
        thresholds.sort_unstable_by(|a, b| b.0.cmp(&a.0));

        Ok(Self {
            metadata: doc.metadata,
            thresholds,
            min_points: doc.universal.min_points,
            max_time_seconds: doc.universal.max_time_seconds,
            min_time_seconds: doc.universal.min_time_seconds,
            max_points: doc.universal.max_points,
        })
    }

    /// Points for the highest threshold `seconds` meets, else the minimum
    pub(crate) fn points_for(&self, seconds: u32) -> u8 {
        self.thresholds
            .iter()
            .find(|(threshold, _)| seconds >= *threshold)
            .map_or(self.min_points, |(_, points)| *points)
    }

    /// Thresholds, highest first
    pub(crate) fn thresholds(&self) -> &[(u32, u8)] {
        &self.thresholds
    }
}

fn check_exercise(
    table: &str,
    expected: &'static str,
    metadata: &TableMetadata,
) -> Result<(), StandardsError> {
    if metadata.exercise == expected {
        Ok(())
    } else {
        Err(StandardsError::ExerciseMismatch {
            table: table.to_owned(),
            expected,
            found: metadata.exercise.clone(),
        })
    }
}
