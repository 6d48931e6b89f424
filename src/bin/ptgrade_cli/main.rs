// ABOUTME: ptgrade CLI - grade recorded pose frames and look up fitness-test scores
// ABOUTME: Handles frame grading, single-event scoring, test totals, and config inspection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Grade a recorded push-up session (one JSON pose frame per line)
//! ptgrade-cli grade pushup frames.jsonl --age 24 --gender male
//!
//! # Grade with a calibration profile and per-frame output
//! ptgrade-cli grade situp frames.jsonl --calibration profile.json -v
//!
//! # Score a single event
//! ptgrade-cli score run 21:30 --age 30 --gender female
//!
//! # Score a full test
//! ptgrade-cli total --pullups 12 --plank 2:10 --run 22:05 --age 30 --gender male
//!
//! # Print the effective grading configuration
//! ptgrade-cli config
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use ptgrade::logging::LoggingConfig;
use ptgrade_core::models::{ExerciseType, Gender};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "ptgrade-cli",
    about = "Fitness test grading CLI",
    long_about = "Grade recorded pose frames and look up fitness-test scores from the bundled standards tables."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging and per-frame output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Grade a JSON-lines file of pose frames
    Grade {
        /// Exercise performed (pushup, pullup, situp, plank)
        exercise: ExerciseType,

        /// File with one pose frame per line
        frames: PathBuf,

        /// Calibration profile to apply
        #[arg(long)]
        calibration: Option<PathBuf>,

        /// Grading configuration document replacing the environment defaults
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        participant: ParticipantArgs,
    },

    /// Look up points for a single event
    Score {
        /// Exercise (pushup, pullup, situp, plank, run)
        exercise: ExerciseType,

        /// Reps, or time as seconds or M:SS for plank and run
        performance: String,

        #[command(flatten)]
        participant: RequiredParticipantArgs,
    },

    /// Score a full test and classify the total
    Total {
        /// Push-up reps
        #[arg(long, conflicts_with = "pullups")]
        pushups: Option<u32>,

        /// Pull-up reps
        #[arg(long)]
        pullups: Option<u32>,

        /// Plank hold as seconds or M:SS
        #[arg(long)]
        plank: String,

        /// Run time as seconds or M:SS
        #[arg(long)]
        run: String,

        #[command(flatten)]
        participant: RequiredParticipantArgs,
    },

    /// Print the effective grading configuration as JSON
    Config {
        /// Validate and print this configuration document instead
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Optional scoring identity; scores are only reported when both are given
#[derive(Args)]
struct ParticipantArgs {
    /// Participant age in years
    #[arg(long, requires = "gender")]
    age: Option<u8>,

    /// Participant gender (male, female)
    #[arg(long, requires = "age")]
    gender: Option<Gender>,
}

#[derive(Args)]
struct RequiredParticipantArgs {
    /// Participant age in years
    #[arg(long)]
    age: u8,

    /// Participant gender (male, female)
    #[arg(long)]
    gender: Gender,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::from_env().verbose(cli.verbose).init()?;
    debug!("ptgrade CLI");

    match cli.command {
        Command::Grade {
            exercise,
            frames,
            calibration,
            config,
            participant,
        } => commands::grade::run(&commands::grade::GradeRequest {
            exercise,
            frames,
            calibration,
            config,
            age: participant.age,
            gender: participant.gender,
            verbose: cli.verbose,
        }),
        Command::Score {
            exercise,
            performance,
            participant,
        } => commands::score::score_event(exercise, &performance, participant.age, participant.gender),
        Command::Total {
            pushups,
            pullups,
            plank,
            run,
            participant,
        } => commands::score::score_total(
            pushups,
            pullups,
            &plank,
            &run,
            participant.age,
            participant.gender,
        ),
        Command::Config { file } => commands::config::print(file.as_deref()),
    }
}
