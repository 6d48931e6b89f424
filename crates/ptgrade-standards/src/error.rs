// ABOUTME: Error types for loading and validating standards tables
// ABOUTME: Every variant is fatal at startup; lookups themselves never fail
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io;
use std::path::PathBuf;

use ptgrade_core::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Standards data could not be loaded
#[derive(Debug, Error)]
pub enum StandardsError {
    /// Table JSON did not match the schema
    #[error("standards table {table} could not be parsed: {source}")]
    Parse {
        /// Table file name
        table: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// Table file could not be read
    #[error("standards table {} could not be read: {source}", .path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Table declares a different exercise than expected
    #[error("standards table {table} is for exercise {found}, expected {expected}")]
    ExerciseMismatch {
        /// Table file name
        table: String,
        /// Exercise the engine expected
        expected: &'static str,
        /// Exercise named in the data
        found: String,
    },

    /// An age bracket label is not `lo-hi` or `N+`
    #[error("standards table {table} has invalid age bracket {bracket:?}")]
    InvalidBracket {
        /// Table file name
        table: String,
        /// Offending label
        bracket: String,
    },

    /// Age brackets overlap, leave a gap, or the open bracket is not last
    #[error("standards table {table} has non-contiguous age brackets: {detail}")]
    BracketLayout {
        /// Table file name
        table: String,
        /// What is wrong with the layout
        detail: String,
    },

    /// A score row does not have one entry per age bracket
    #[error("standards table {table} row {key:?} has {actual} entries, expected {expected}")]
    RowLength {
        /// Table file name
        table: String,
        /// Row key
        key: String,
        /// Bracket count
        expected: usize,
        /// Entries present
        actual: usize,
    },

    /// A row key is not a rep count, `M:SS` time, or seconds threshold
    #[error("standards table {table} has invalid row key {key:?}")]
    InvalidKey {
        /// Table file name
        table: String,
        /// Offending key
        key: String,
    },

    /// A table or gender column has no rows
    #[error("standards table {table} is empty")]
    Empty {
        /// Table file name
        table: String,
    },

    /// A score exceeds 100 points
    #[error("standards table {table} row {key:?} has out-of-range score {points}")]
    ScoreOutOfRange {
        /// Table file name
        table: String,
        /// Row key
        key: String,
        /// Offending score
        points: u8,
    },
}

impl StandardsError {
    pub(crate) fn layout(table: &str, detail: impl Into<String>) -> Self {
        Self::BracketLayout {
            table: table.to_owned(),
            detail: detail.into(),
        }
    }
}

impl From<StandardsError> for AppError {
    fn from(error: StandardsError) -> Self {
        let code = match &error {
            StandardsError::Io { .. } => ErrorCode::StandardsDataMissing,
            _ => ErrorCode::StandardsDataInvalid,
        };
        Self::new(code, error.to_string()).with_source(error)
    }
}
