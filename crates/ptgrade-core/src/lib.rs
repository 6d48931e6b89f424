// ABOUTME: Core types and geometry primitives for the ptgrade grading engine
// ABOUTME: Foundation crate with error handling, pose-frame model, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # ptgrade Core
//!
//! Foundation crate providing shared types for the ptgrade fitness grading
//! engine. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Engine-wide constants organized by domain
//! - **models**: Joints, pose frames, exercise and gender enums
//! - **geometry**: Pure angle, distance, and line-projection primitives

/// Unified error handling system with standard error codes
pub mod errors;

/// Engine constants organized by domain
pub mod constants;

/// Core data models (joints, pose frames, exercises)
pub mod models;

/// Geometry primitives over normalized 2D coordinates
pub mod geometry;
