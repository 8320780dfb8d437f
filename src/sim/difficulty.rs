//! Difficulty progression
//!
//! Difficulty is recomputed from score every tick and never stored on its own,
//! so it can't drift from the score it was derived from.

use serde::{Deserialize, Serialize};

/// Score needed per difficulty step
pub const SCORE_STEP: u64 = 100;

/// Player-selected difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Normal => "Normal",
            DifficultyLevel::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyLevel::Easy),
            "normal" | "medium" => Some(DifficultyLevel::Normal),
            "hard" => Some(DifficultyLevel::Hard),
            _ => None,
        }
    }

    /// Difficulty at score 0
    pub fn base(&self) -> f32 {
        match self {
            DifficultyLevel::Easy => 0.8,
            DifficultyLevel::Normal => 1.0,
            DifficultyLevel::Hard => 1.3,
        }
    }

    /// Difficulty added per `SCORE_STEP` points
    pub fn increment(&self) -> f32 {
        match self {
            DifficultyLevel::Easy => 0.08,
            DifficultyLevel::Normal => 0.1,
            DifficultyLevel::Hard => 0.15,
        }
    }
}

/// `base(level) + floor(score / step) * increment(level)`
pub fn difficulty_for(score: u64, level: DifficultyLevel) -> f32 {
    let steps = (score / SCORE_STEP) as f32;
    level.base() + steps * level.increment()
}

/// Points for an obstacle passing the player, doubled under multiplier
#[inline]
pub fn scaled_award(points: u64, multiplier_active: bool) -> u64 {
    if multiplier_active { points * 2 } else { points }
}
