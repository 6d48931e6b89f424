// ABOUTME: Re-exports command modules for ptgrade-cli
// ABOUTME: Provides access to grading, scoring, and configuration commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod config;
pub mod grade;
pub mod score;
