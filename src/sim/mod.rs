//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Tick-counted timers only (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, storage or audio dependencies; those are reached via events

pub mod collision;
pub mod difficulty;
pub mod movement;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, overlaps, resolve_collisions};
pub use difficulty::{DifficultyLevel, difficulty_for};
pub use spawn::{SpawnKind, spawn_entities};
pub use state::{
    AudioCue, Collectible, CollectibleKind, GameEvent, GamePhase, GameState, Obstacle,
    ObstacleKind, Player, Snapshot, StatusTimers,
};
pub use tick::{TickInput, tick};
