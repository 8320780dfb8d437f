//! Profile persistence
//!
//! The simulation never touches storage. At startup the host pulls a
//! `Profile` once; afterwards the simulation emits events and the host
//! forwards them to a `ProfileStore`. Write failures are logged and dropped.
//!
//! Backends:
//! - `MemoryStore`: in-process (tests, headless runs)
//! - `JsonFileStore`: single JSON file (native)
//! - `LocalStorageStore`: browser LocalStorage (wasm)

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod memory;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
pub use memory::MemoryStore;

/// Values that outlive a single run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub high_score: u64,
    /// Lifetime coins (never spent)
    pub coins: u64,
    /// Unlocked cosmetic ids
    pub unlocked: BTreeSet<String>,
    pub settings: Settings,
}

/// Storage failure
#[derive(Debug)]
pub enum StoreError {
    /// Backend can't be reached (no LocalStorage, unreadable file)
    Unavailable(String),
    /// Stored data could not be (de)serialized
    Serde(serde_json::Error),
    /// Backend refused the write
    Write(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            StoreError::Serde(e) => write!(f, "bad stored data: {e}"),
            StoreError::Write(msg) => write!(f, "write failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serde(e)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

/// Key-value persistence collaborator
pub trait ProfileStore {
    /// Read everything once at startup
    fn load_profile(&self) -> Result<Profile, StoreError>;

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError>;

    fn save_coins(&mut self, coins: u64) -> Result<(), StoreError>;

    fn save_unlocked(&mut self, unlocked: &BTreeSet<String>) -> Result<(), StoreError>;

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError>;
}

/// Lets hosts pick a backend at runtime
impl ProfileStore for Box<dyn ProfileStore> {
    fn load_profile(&self) -> Result<Profile, StoreError> {
        (**self).load_profile()
    }

    fn save_high_score(&mut self, score: u64) -> Result<(), StoreError> {
        (**self).save_high_score(score)
    }

    fn save_coins(&mut self, coins: u64) -> Result<(), StoreError> {
        (**self).save_coins(coins)
    }

    fn save_unlocked(&mut self, unlocked: &BTreeSet<String>) -> Result<(), StoreError> {
        (**self).save_unlocked(unlocked)
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), StoreError> {
        (**self).save_settings(settings)
    }
}
