// ABOUTME: Exercise, gender, and participant types shared by graders and scoring
// ABOUTME: Includes parsing from user-facing names and display implementations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Exercises the engine grades or scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
    /// Push-ups, counted by rep
    Pushup,
    /// Dead-hang pull-ups, counted by rep
    Pullup,
    /// Crossed-arm sit-ups, counted by rep
    Situp,
    /// Forearm plank, scored by hold time
    Plank,
    /// Timed run, scored by elapsed time (not graded from pose frames)
    Run,
}

impl ExerciseType {
    /// Exercises that have a pose-frame grader
    pub const GRADED: [Self; 4] = [Self::Pushup, Self::Pullup, Self::Situp, Self::Plank];

    /// Machine name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pushup => "pushup",
            Self::Pullup => "pullup",
            Self::Situp => "situp",
            Self::Plank => "plank",
            Self::Run => "run",
        }
    }

    /// Human-readable name
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Pushup => "Push-ups",
            Self::Pullup => "Pull-ups",
            Self::Situp => "Sit-ups",
            Self::Plank => "Plank",
            Self::Run => "Run",
        }
    }

    /// Performance is measured in seconds rather than reps
    #[must_use]
    pub const fn is_timed(&self) -> bool {
        matches!(self, Self::Plank | Self::Run)
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ExerciseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "pushup" | "pushups" => Ok(Self::Pushup),
            "pullup" | "pullups" => Ok(Self::Pullup),
            "situp" | "situps" => Ok(Self::Situp),
            "plank" => Ok(Self::Plank),
            "run" | "run3mile" | "3milerun" => Ok(Self::Run),
            _ => Err(format!("unknown exercise: {s}")),
        }
    }
}

/// Gender column used by the standards tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male scoring column
    Male,
    /// Female scoring column
    Female,
}

impl Gender {
    /// Machine name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(format!("unknown gender: {s}")),
        }
    }
}

/// Who is being scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Age in whole years
    pub age: u8,
    /// Scoring column
    pub gender: Gender,
}

impl Participant {
    /// Create a participant
    #[must_use]
    pub const fn new(age: u8, gender: Gender) -> Self {
        Self { age, gender }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exercise_parsing_is_lenient() {
        assert_eq!("Push-Ups".parse::<ExerciseType>(), Ok(ExerciseType::Pushup));
        assert_eq!("pull_up".parse::<ExerciseType>(), Ok(ExerciseType::Pullup));
        assert_eq!("3-mile run".parse::<ExerciseType>(), Ok(ExerciseType::Run));
        assert!("burpee".parse::<ExerciseType>().is_err());
    }

    #[test]
    fn test_timed_exercises() {
        assert!(ExerciseType::Plank.is_timed());
        assert!(ExerciseType::Run.is_timed());
        assert!(!ExerciseType::Situp.is_timed());
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("F".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!(Gender::Male.to_string(), "male");
    }
}
