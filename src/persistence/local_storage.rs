//! Browser LocalStorage profile store (wasm only)
//!
//! One key per value so a failed write only loses that value.

use std::collections::BTreeSet;

use serde::Serialize;
use serde::de::DeserializeOwned;
use web_sys::Storage;

use super::{Profile, ProfileStore, StoreError};
use crate::settings::Settings;

const HIGH_SCORE_KEY: &str = "lane_rush_high_score";
const COINS_KEY: &str = "lane_rush_coins";
const UNLOCKED_KEY: &str = "lane_rush_unlocked";
const SETTINGS_KEY: &str = "lane_rush_settings";

pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StoreError::Unavailable("LocalStorage not available".into()))?;
        Ok(Self { storage })
    }

    fn get<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.storage.get_item(key) {
            Ok(Some(json)) => Ok(serde_json::from_str(&json)?),
            Ok(None) => Ok(T::default()),
            Err(e) => Err(StoreError::Unavailable(format!("{e:?}"))),
        }
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.storage
            .set_item(key, &json)
            .map_err(|e| StoreError::Write(format!("{e:?}")))
    }
}

impl ProfileStore for LocalStorageStore {
    fn load_profile(&self) -> Result<Profile, StoreError> {
        let profile = Profile {
            high_score: self.get(HIGH_SCORE_KEY)?,
            coins: self.get(COINS_KEY)?,
            unlocked: self.get(UNLOCKED_KEY)?,
            settings: self.get(SETTINGS_KEY)?,
        };
        log::info!(
            "Loaded profile: high score {}, {} coins, {} unlocks",
            profile.high_score,
            profile.coins,
            profile.unlocked.len()
        );
        Ok(profile)
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.set(HIGH_SCORE_KEY, &score)
    }

    fn save_coins(&mut self, coins: u64) -> Result<(), StoreError> {
        self.set(COINS_KEY, &coins)
    }

    fn save_unlocked(&mut self, unlocked: &BTreeSet<String>) -> Result<(), StoreError> {
        self.set(UNLOCKED_KEY, unlocked)
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        self.set(SETTINGS_KEY, settings)
    }
}
