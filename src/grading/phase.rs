// ABOUTME: Closed phase enums for each exercise state machine
// ABOUTME: Push-up, pull-up, sit-up phases and plank hold status with descriptions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use serde::{Deserialize, Serialize};

/// Push-up phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PushupPhase {
    /// Not yet in a valid starting position
    #[default]
    Between,
    /// Arms extended at the top
    Up,
    /// Lowering toward the bottom
    Descending,
    /// Bottom reached, rising next
    ///
    /// Committed once the elbow angle reaches the bottom threshold, before
    /// the shoulders have started to rise.
    Ascending,
    /// Required joints lost for too long
    Invalid,
}

impl PushupPhase {
    /// Text shown to the participant
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Between => "Get into push-up position",
            Self::Up => "Arms extended",
            Self::Descending => "Lowering",
            Self::Ascending => "Bottom reached, push up",
            Self::Invalid => "Body not fully visible",
        }
    }
}

/// Pull-up phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullupPhase {
    /// Waiting for a dead hang
    #[default]
    Starting,
    /// Dead hang, arms extended
    Down,
    /// Pulling toward the bar
    Pulling,
    /// Lowering after the chin cleared the bar
    Lowering,
    /// Required joints lost for too long
    Invalid,
}

impl PullupPhase {
    /// Text shown to the participant
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Starting => "Hang from the bar with arms extended",
            Self::Down => "Dead hang",
            Self::Pulling => "Pulling up",
            Self::Lowering => "Lowering",
            Self::Invalid => "Body not fully visible",
        }
    }
}

/// Sit-up phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SitupPhase {
    /// Waiting for the lying-down start position
    #[default]
    Starting,
    /// Lying down
    Down,
    /// Sitting up
    Rising,
    /// Returning to the ground after reaching vertical
    Lowering,
    /// Required joints lost for too long
    Invalid,
}

impl SitupPhase {
    /// Text shown to the participant
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Starting => "Lie down with knees bent and arms crossed",
            Self::Down => "Lying down",
            Self::Rising => "Sitting up",
            Self::Lowering => "Lowering",
            Self::Invalid => "Body not fully visible",
        }
    }
}

/// Plank hold status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlankStatus {
    /// Waiting for a correct plank position
    #[default]
    Waiting,
    /// Hold in progress
    Holding,
    /// Hold ended by sustained form faults
    Broken,
    /// Required joints lost for too long
    Invalid,
}

impl PlankStatus {
    /// Text shown to the participant
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Waiting => "Get into plank position",
            Self::Holding => "Holding",
            Self::Broken => "Hold ended",
            Self::Invalid => "Body not fully visible",
        }
    }
}

/// Phase of any grader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "exercise", content = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Push-up phase
    Pushup(PushupPhase),
    /// Pull-up phase
    Pullup(PullupPhase),
    /// Sit-up phase
    Situp(SitupPhase),
    /// Plank status
    Plank(PlankStatus),
}

impl Phase {
    /// Text shown to the participant
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Pushup(phase) => phase.description(),
            Self::Pullup(phase) => phase.description(),
            Self::Situp(phase) => phase.description(),
            Self::Plank(status) => status.description(),
        }
    }

    /// Whether the grader reports the body as not visible
    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        matches!(
            self,
            Self::Pushup(PushupPhase::Invalid)
                | Self::Pullup(PullupPhase::Invalid)
                | Self::Situp(SitupPhase::Invalid)
                | Self::Plank(PlankStatus::Invalid)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl From<PushupPhase> for Phase {
    fn from(phase: PushupPhase) -> Self {
        Self::Pushup(phase)
    }
}

impl From<PullupPhase> for Phase {
    fn from(phase: PullupPhase) -> Self {
        Self::Pullup(phase)
    }
}

impl From<SitupPhase> for Phase {
    fn from(phase: SitupPhase) -> Self {
        Self::Situp(phase)
    }
}

impl From<PlankStatus> for Phase {
    fn from(status: PlankStatus) -> Self {
        Self::Plank(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_describes_the_bottom_position() {
        let phase = Phase::from(PushupPhase::Ascending);
        assert_eq!(phase.description(), "Bottom reached, push up");
        assert_eq!(phase.to_string(), PushupPhase::Ascending.description());
        assert_ne!(
            PushupPhase::Ascending.description(),
            PushupPhase::Descending.description()
        );
    }
}
