// ABOUTME: Standards scoring engine converting performances into fitness-test points
// ABOUTME: Bundled versioned tables, age-bracket lookup, totals, and performance classes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # ptgrade Standards
//!
//! Static lookup tables keyed by exercise, gender, and age bracket. Tables
//! are parsed and validated once at process start; a malformed table is a
//! startup failure, while a missing entry at lookup time is reported as
//! [`ScoreLookup::KeyNotFound`] and scores zero.
//!
//! ```text
//! performance ──► gender column ──► age bracket ──► row key ──► points
//! ```

/// Age bracket parsing and resolution
pub mod age_bracket;
/// Total-score aggregation and performance classes
pub mod aggregate;
/// Scoring engine and process-wide handle
pub mod engine;
/// Standards loading errors
pub mod error;
/// Table schema and load-time validation
pub mod table;

pub use age_bracket::AgeBracket;
pub use aggregate::{PerformanceClass, PftPerformance, ScoreBreakdown, UpperBodyEvent};
pub use engine::{format_time_key, max_score, min_passing_score, ScoreLookup, StandardsEngine};
pub use error::StandardsError;
pub use table::{StandardsSources, TableMetadata};
