//! Difficulty levels

use crate::error::{EventError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recognized difficulty tiers, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Cupcake,
    Rookie,
    Pro,
    AllMadden,
    Diabolical,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Pro
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Cupcake,
        Difficulty::Rookie,
        Difficulty::Pro,
        Difficulty::AllMadden,
        Difficulty::Diabolical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Cupcake => "cupcake",
            Difficulty::Rookie => "rookie",
            Difficulty::Pro => "pro",
            Difficulty::AllMadden => "all-madden",
            Difficulty::Diabolical => "diabolical",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.label() == s)
            .ok_or_else(|| EventError::config(format!("unknown difficulty `{}`", s)))
    }
}

/// Per-difficulty acceptance probabilities, one slot per recognized tier
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DifficultyWeights([f64; 5]);

impl DifficultyWeights {
    pub fn new(weights: [f64; 5]) -> Self {
        Self(weights)
    }

    /// Same probability at every tier
    pub fn uniform(weight: f64) -> Self {
        Self([weight; 5])
    }

    #[inline]
    pub fn get(&self, difficulty: Difficulty) -> f64 {
        self.0[difficulty.index()]
    }

    pub fn set(&mut self, difficulty: Difficulty, weight: f64) {
        self.0[difficulty.index()] = weight;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, f64)> + '_ {
        Difficulty::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}
