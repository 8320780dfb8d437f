//! Single-file JSON profile store
//!
//! Each save rewrites the whole profile: write to `<path>.tmp`, then rename
//! over the real file so a crash mid-write leaves the old profile intact.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::{Profile, ProfileStore, StoreError};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Last profile read or written; saves patch this and flush it
    cached: Profile,
}

impl JsonFileStore {
    /// Open (or prepare to create) the profile at `path`.
    /// A missing file is an empty profile, not an error.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let cached = if path.exists() {
            let json = std::fs::read_to_string(&path)?;
            serde_json::from_str(&json)?
        } else {
            log::info!("No profile at {}, starting fresh", path.display());
            Profile::default()
        };
        Ok(Self { path, cached })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.cached)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|e| StoreError::Write(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(())
    }
}

impl ProfileStore for JsonFileStore {
    fn load_profile(&self) -> Result<Profile, StoreError> {
        Ok(self.cached.clone())
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.cached.high_score = score;
        self.flush()
    }

    fn save_coins(&mut self, coins: u64) -> Result<(), StoreError> {
        self.cached.coins = coins;
        self.flush()
    }

    fn save_unlocked(&mut self, unlocked: &BTreeSet<String>) -> Result<(), StoreError> {
        self.cached.unlocked = unlocked.clone();
        self.flush()
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.cached.settings = *settings;
        self.flush()
    }
}
