// ABOUTME: Engine-wide constants organized by domain
// ABOUTME: Service identity, frame timing, confidence, and geometry tolerances
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Engine constants grouped by concern.
//!
//! Grader thresholds are not here: every tunable threshold lives in the
//! grading configuration so it can be overridden per deployment.

/// Service identity used in logs and summaries
pub mod service_names {
    /// Service name reported by logging
    pub const PTGRADE: &str = "ptgrade";
}

/// Joint confidence bounds
pub mod confidence {
    /// Lowest representable joint confidence
    pub const MIN: f64 = 0.0;
    /// Highest representable joint confidence
    pub const MAX: f64 = 1.0;
    /// Confidence assumed when an input omits it
    pub const DEFAULT_OBSERVED: f64 = 1.0;
}

/// Numeric tolerances for geometry
pub mod geometry {
    /// Vectors shorter than this are treated as zero-length
    pub const DEGENERATE_LENGTH: f64 = 1e-9;
    /// Angle returned for degenerate rays unless the caller supplies one
    pub const NEUTRAL_ANGLE_DEGREES: f64 = 0.0;
}

/// Rolling window sizes shared by graders
pub mod history {
    /// Rejected rep attempts retained for diagnostics
    pub const REJECTION_LOG_CAPACITY: usize = 50;
}
