use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::util::random_integer;

/// How long a target stays up before it retracts.
///
/// Parsing is case-insensitive ("EASY" behaves as "easy") both on the CLI
/// and when read back from a config file.
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    /// Milliseconds the next appearance stays visible.
    ///
    /// Easy and normal are fixed; hard redraws a fresh value in
    /// `[600, 1200]` for every appearance.
    pub fn delay_ms(&self) -> u64 {
        match self {
            Difficulty::Easy => 1500,
            Difficulty::Normal => 1000,
            Difficulty::Hard => random_integer(600, 1200) as u64,
        }
    }

    pub fn next(&self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Normal,
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }

    pub fn prev(&self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Hard,
            Difficulty::Normal => Difficulty::Easy,
            Difficulty::Hard => Difficulty::Normal,
        }
    }
}
