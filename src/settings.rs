//! Game settings and preferences
//!
//! Stored alongside the profile through a `ProfileStore`.

use serde::{Deserialize, Serialize};

use crate::cosmetics::Loadout;
use crate::sim::DifficultyLevel;

/// Which sound set the audio collaborator plays; no effect on the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SoundMode {
    Off,
    #[default]
    Retro,
    Soft,
}

impl SoundMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundMode::Off => "Off",
            SoundMode::Retro => "Retro",
            SoundMode::Soft => "Soft",
        }
    }

    pub fn is_muted(&self) -> bool {
        *self == SoundMode::Off
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty tier for the next run
    pub difficulty: DifficultyLevel,
    /// Car colour, spoiler and tires
    pub loadout: Loadout,
    pub sound: SoundMode,
}

impl Settings {
    /// Cycle to the next difficulty tier (settings menu helper)
    pub fn cycle_difficulty(&mut self) {
        self.difficulty = match self.difficulty {
            DifficultyLevel::Easy => DifficultyLevel::Normal,
            DifficultyLevel::Normal => DifficultyLevel::Hard,
            DifficultyLevel::Hard => DifficultyLevel::Easy,
        };
    }

    /// Cycle to the next sound mode
    pub fn cycle_sound(&mut self) {
        self.sound = match self.sound {
            SoundMode::Off => SoundMode::Retro,
            SoundMode::Retro => SoundMode::Soft,
            SoundMode::Soft => SoundMode::Off,
        };
    }
}
