//! In-memory profile store

use std::collections::BTreeSet;

use super::{Profile, ProfileStore, StoreError};
use crate::settings::Settings;

/// Keeps the profile in process; optionally rejects writes (for failure tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub profile: Profile,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            fail_writes: false,
        }
    }

    /// A store whose every write fails
    pub fn failing(profile: Profile) -> Self {
        Self {
            profile,
            fail_writes: true,
        }
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail_writes {
            Err(StoreError::Write("memory store is read-only".into()))
        } else {
            Ok(())
        }
    }
}

impl ProfileStore for MemoryStore {
    fn load_profile(&self) -> Result<Profile, StoreError> {
        Ok(self.profile.clone())
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.check()?;
        self.profile.high_score = score;
        Ok(())
    }

    fn save_coins(&mut self, coins: u64) -> Result<(), StoreError> {
        self.check()?;
        self.profile.coins = coins;
        Ok(())
    }

    fn save_unlocked(&mut self, unlocked: &BTreeSet<String>) -> Result<(), StoreError> {
        self.check()?;
        self.profile.unlocked = unlocked.clone();
        Ok(())
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.check()?;
        self.profile.settings = *settings;
        Ok(())
    }
}
