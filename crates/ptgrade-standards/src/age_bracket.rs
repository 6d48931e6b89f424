// ABOUTME: Age bracket labels such as "17-20" and "51+" and bracket resolution
// ABOUTME: Parses labels, checks contiguity, and maps an age to its column index
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An inclusive age range, or an open-ended top bracket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgeBracket {
    /// `lo-hi`, both ends inclusive
    Closed {
        /// Youngest age in the bracket
        lo: u8,
        /// Oldest age in the bracket
        hi: u8,
    },
    /// `N+`, every age from `min` upward
    OpenEnded {
        /// Youngest age in the bracket
        min: u8,
    },
}

impl AgeBracket {
    /// Whether `age` falls in this bracket
    #[must_use]
    pub const fn contains(&self, age: u8) -> bool {
        match *self {
            Self::Closed { lo, hi } => age >= lo && age <= hi,
            Self::OpenEnded { min } => age >= min,
        }
    }

    /// Youngest age covered
    #[must_use]
    pub const fn lower(&self) -> u8 {
        match *self {
            Self::Closed { lo, .. } => lo,
            Self::OpenEnded { min } => min,
        }
    }

    /// Oldest age covered, `None` when open-ended
    #[must_use]
    pub const fn upper(&self) -> Option<u8> {
        match *self {
            Self::Closed { hi, .. } => Some(hi),
            Self::OpenEnded { .. } => None,
        }
    }
}

impl FromStr for AgeBracket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if let Some(min) = label.strip_suffix('+') {
            let min = min
                .trim()
                .parse()
                .map_err(|_| format!("invalid open-ended bracket: {s}"))?;
            return Ok(Self::OpenEnded { min });
        }

        let (lo, hi) = label
            .split_once('-')
            .ok_or_else(|| format!("invalid age bracket: {s}"))?;
        let lo: u8 = lo
            .trim()
            .parse()
            .map_err(|_| format!("invalid bracket lower bound: {s}"))?;
        let hi: u8 = hi
            .trim()
            .parse()
            .map_err(|_| format!("invalid bracket upper bound: {s}"))?;
        if lo > hi {
            return Err(format!("inverted age bracket: {s}"));
        }
        Ok(Self::Closed { lo, hi })
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed { lo, hi } => write!(f, "{lo}-{hi}"),
            Self::OpenEnded { min } => write!(f, "{min}+"),
        }
    }
}

/// Check brackets are ordered, contiguous, and only the last is open-ended
///
/// # Errors
///
/// Returns a description of the first layout problem found.
pub fn validate_layout(brackets: &[AgeBracket]) -> Result<(), String> {
    if brackets.is_empty() {
        return Err("no age brackets".to_owned());
    }
    for pair in brackets.windows(2) {
        let (current, next) = (pair[0], pair[1]);
        let Some(hi) = current.upper() else {
            return Err(format!("open-ended bracket {current} is not last"));
        };
        if u16::from(next.lower()) != u16::from(hi) + 1 {
            return Err(format!("bracket {next} does not follow {current}"));
        }
    }
    Ok(())
}

/// Column index for `age`
///
/// Ages below the first bracket use the first column; ages beyond a
/// closed last bracket use the last column.
#[must_use]
pub fn resolve_index(brackets: &[AgeBracket], age: u8) -> usize {
    if let Some(index) = brackets.iter().position(|bracket| bracket.contains(age)) {
        return index;
    }
    match brackets.last() {
        Some(last) if age > last.lower() => brackets.len() - 1,
        _ => 0,
    }
}
