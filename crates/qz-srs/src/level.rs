//! Adaptive level table.
//!
//! Each level scales how fast intervals grow and fixes the base interval a
//! question falls back to after a miss. Multipliers and base intervals are
//! strictly increasing with the level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Coarse mastery tier of a single question, ordered from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptiveLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl AdaptiveLevel {
    /// Every level, lowest first.
    pub const ALL: [Self; 4] = [
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    /// Interval growth factor for this level.
    ///
    /// * Beginner: 0.7
    /// * Intermediate: 1.0
    /// * Advanced: 1.3
    /// * Expert: 1.6
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Beginner => 0.7,
            Self::Intermediate => 1.0,
            Self::Advanced => 1.3,
            Self::Expert => 1.6,
        }
    }

    /// Base repetition interval in days.
    ///
    /// * Beginner: 1 day
    /// * Intermediate: 2 days
    /// * Advanced: 3 days
    /// * Expert: 5 days
    pub const fn base_interval_days(self) -> f64 {
        match self {
            Self::Beginner => 1.0,
            Self::Intermediate => 2.0,
            Self::Advanced => 3.0,
            Self::Expert => 5.0,
        }
    }

    /// The next level up, or `None` at Expert.
    pub const fn promoted(self) -> Option<Self> {
        match self {
            Self::Beginner => Some(Self::Intermediate),
            Self::Intermediate => Some(Self::Advanced),
            Self::Advanced => Some(Self::Expert),
            Self::Expert => None,
        }
    }

    /// The next level down, or `None` at Beginner.
    pub const fn demoted(self) -> Option<Self> {
        match self {
            Self::Beginner => None,
            Self::Intermediate => Some(Self::Beginner),
            Self::Advanced => Some(Self::Intermediate),
            Self::Expert => Some(Self::Advanced),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for AdaptiveLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdaptiveLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("unknown adaptive level '{s}'"))
    }
}

/// How a single answer moved a question's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelChange {
    Promoted,
    Demoted,
    Unchanged,
}

impl LevelChange {
    pub fn between(before: AdaptiveLevel, after: AdaptiveLevel) -> Self {
        match after.cmp(&before) {
            std::cmp::Ordering::Greater => Self::Promoted,
            std::cmp::Ordering::Less => Self::Demoted,
            std::cmp::Ordering::Equal => Self::Unchanged,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Promoted => "promoted",
            Self::Demoted => "demoted",
            Self::Unchanged => "unchanged",
        }
    }
}
