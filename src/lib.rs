//! Lane Rush - A top-down lane-dodging arcade racer
//!
//! Core modules:
//! - `sim`: Per-tick simulation (spawning, hazards, collisions, timers, difficulty)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (difficulty level, cosmetics, sound mode)
//! - `cosmetics`: Car customisation and coin-milestone unlocks
//! - `persistence`: Profile storage collaborator (high score, coins, unlocks)
//! - `audio`: Audio collaborator fed by simulation cues
//! - `game`: Host facade that runs frames and dispatches events

pub mod audio;
pub mod cosmetics;
pub mod game;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use settings::{Settings, SoundMode};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame length the host paces ticks at (60 Hz)
    pub const TICK_MS: f32 = 1000.0 / 60.0;

    /// Track dimensions
    pub const TRACK_WIDTH: f32 = 400.0;
    pub const TRACK_HEIGHT: f32 = 600.0;

    /// Player car dimensions
    pub const CAR_WIDTH: f32 = 40.0;
    pub const CAR_HEIGHT: f32 = 70.0;
    /// Player y is fixed near the bottom edge
    pub const PLAYER_Y: f32 = TRACK_HEIGHT - CAR_HEIGHT - 20.0;

    /// Rightmost x the player (or any car-sized entity) may occupy
    pub const MAX_CAR_X: f32 = TRACK_WIDTH - CAR_WIDTH;

    /// Collectible size (square)
    pub const COLLECTIBLE_SIZE: f32 = 24.0;

    /// Hazard dimensions
    pub const BARRIER_WIDTH: f32 = 80.0;
    pub const BARRIER_HEIGHT: f32 = 20.0;
    pub const OIL_WIDTH: f32 = 60.0;
    pub const OIL_HEIGHT: f32 = 40.0;
    pub const LASER_HEIGHT: f32 = 12.0;
    pub const GRAVITY_FIELD_HEIGHT: f32 = 120.0;
    pub const PLATFORM_WIDTH: f32 = 120.0;
    pub const PLATFORM_HEIGHT: f32 = 30.0;
}

/// Clamp a left-edge x so an entity of `width` stays inside the track
#[inline]
pub fn clamp_to_track(x: f32, width: f32) -> f32 {
    x.clamp(0.0, (consts::TRACK_WIDTH - width).max(0.0))
}
