// ABOUTME: Config command: prints the effective grading configuration
// ABOUTME: Either environment-derived defaults or a validated configuration document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::Path;

use anyhow::Result;
use ptgrade::config::GradingConfig;

/// Print the configuration graders would use
pub fn print(file: Option<&Path>) -> Result<()> {
    let config = match file {
        Some(path) => GradingConfig::from_json_file(path)?,
        None => GradingConfig::load()?,
    };
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
