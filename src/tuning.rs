//! Data-driven game balance
//!
//! Every number that shapes pacing lives here so a run can be re-tuned from a
//! JSON file without touching simulation code. Missing fields fall back to the
//! built-in defaults.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sim::SpawnKind;

/// Tuning that could not be used
#[derive(Debug)]
pub enum TuningError {
    /// Not valid JSON for `Tuning`
    Parse(serde_json::Error),
    /// Parsed, but a value would break the simulation
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Parse(e) => write!(f, "bad tuning JSON: {e}"),
            TuningError::Invalid(msg) => write!(f, "invalid tuning: {msg}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// One entry of the spawn draw table
///
/// Entries are evaluated in table order; each available entry consumes
/// `weight` of the unit draw range. Whatever is left over becomes a
/// standard car.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeight {
    pub kind: SpawnKind,
    pub weight: f32,
    /// Kind only enters the draw once difficulty reaches this value
    pub min_difficulty: f32,
}

impl SpawnWeight {
    const fn new(kind: SpawnKind, weight: f32, min_difficulty: f32) -> Self {
        Self {
            kind,
            weight,
            min_difficulty,
        }
    }
}

/// Default draw table, in priority order: coin, power-ups, then obstacles
pub const DEFAULT_SPAWN_TABLE: [SpawnWeight; 10] = [
    SpawnWeight::new(SpawnKind::Coin, 0.15, 0.0),
    SpawnWeight::new(SpawnKind::Shield, 0.03, 0.0),
    SpawnWeight::new(SpawnKind::Boost, 0.03, 0.0),
    SpawnWeight::new(SpawnKind::Multiplier, 0.03, 0.0),
    SpawnWeight::new(SpawnKind::Barrier, 0.08, 1.2),
    SpawnWeight::new(SpawnKind::OilSlick, 0.07, 1.3),
    SpawnWeight::new(SpawnKind::LaserGrid, 0.06, 1.5),
    SpawnWeight::new(SpawnKind::GravityField, 0.05, 1.7),
    SpawnWeight::new(SpawnKind::FlickerPlatform, 0.05, 1.9),
    SpawnWeight::new(SpawnKind::Chaser, 0.06, 2.1),
];

/// Balance parameters for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawning ===
    /// Spawn interval at difficulty 1.0 (ms)
    pub base_spawn_interval_ms: f32,
    /// Difficulty above which a tick may spawn two entities
    pub multi_spawn_threshold: f32,
    /// Chance of a second entity once above the threshold
    pub multi_spawn_chance: f64,
    /// Extra gap between spawn centres on top of the car width
    pub spawn_margin: f32,
    /// Placement retries before an overlapping slot is accepted
    pub placement_attempts: u32,
    pub spawn_table: Vec<SpawnWeight>,

    // === Movement ===
    /// Downward speed at difficulty 1.0 (px/tick)
    pub base_speed: f32,
    /// Player and obstacle speed factor while boost is active
    pub boost_factor: f32,
    /// Moving-barrier horizontal speed (px/tick)
    pub barrier_speed: f32,
    /// Ticks between laser-grid toggles
    pub laser_period: u32,
    /// Ticks between flicker-platform toggles
    pub platform_period: u32,
    /// Nominal gravity-field pull (px/tick)
    pub gravity_pull: f32,
    /// Horizontal drift amplitude while sliding (px/tick)
    pub slide_amplitude: f32,
    /// Chaser horizontal speed per unit of difficulty (px/tick)
    pub chase_factor: f32,

    // === Status timers (ticks) ===
    pub shield_ticks: u32,
    pub boost_ticks: u32,
    pub multiplier_ticks: u32,
    pub slide_ticks: u32,

    // === Scoring ===
    /// Score for an obstacle that scrolls past
    pub pass_award: u64,
    /// Survival bonus cadence (ms of play)
    pub survival_reward_ms: f32,
    pub survival_reward_points: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_spawn_interval_ms: 1200.0,
            multi_spawn_threshold: 1.5,
            multi_spawn_chance: 0.5,
            spawn_margin: 20.0,
            placement_attempts: 10,
            spawn_table: DEFAULT_SPAWN_TABLE.to_vec(),

            base_speed: 3.0,
            boost_factor: 1.5,
            barrier_speed: 2.0,
            laser_period: 60,
            platform_period: 40,
            gravity_pull: 1.5,
            slide_amplitude: 4.0,
            chase_factor: 1.5,

            shield_ticks: 300,
            boost_ticks: 240,
            multiplier_ticks: 360,
            slide_ticks: 45,

            pass_award: 10,
            survival_reward_ms: 10_000.0,
            survival_reward_points: 5,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with (probabilities outside
    /// [0, 1], non-finite or negative rates, non-positive clocks)
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: String| Err(TuningError::Invalid(msg));

        if !(0.0..=1.0).contains(&self.multi_spawn_chance) {
            return invalid(format!(
                "multi_spawn_chance {} is outside [0, 1]",
                self.multi_spawn_chance
            ));
        }
        for (name, value) in [
            ("base_spawn_interval_ms", self.base_spawn_interval_ms),
            ("survival_reward_ms", self.survival_reward_ms),
        ] {
            if value.is_nan() || value <= 0.0 {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }
        for (name, value) in [
            ("multi_spawn_threshold", self.multi_spawn_threshold),
            ("spawn_margin", self.spawn_margin),
            ("base_speed", self.base_speed),
            ("boost_factor", self.boost_factor),
            ("barrier_speed", self.barrier_speed),
            ("gravity_pull", self.gravity_pull),
            ("slide_amplitude", self.slide_amplitude),
            ("chase_factor", self.chase_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be finite and >= 0, got {value}"));
            }
        }
        for entry in &self.spawn_table {
            if !entry.weight.is_finite() || entry.weight < 0.0 || entry.min_difficulty.is_nan() {
                return invalid(format!("bad spawn table entry {:?}", entry.kind));
            }
        }
        Ok(())
    }

    /// Load tuning from the file named by `LANE_RUSH_TUNING`.
    /// Falls back to defaults if the variable is unset or the file is unusable.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_env() -> Self {
        let Ok(path) = std::env::var("LANE_RUSH_TUNING") else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {path}");
                    tuning
                }
                Err(e) => {
                    log::warn!("Failed to load tuning {path}: {e}, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read tuning {path}: {e}, using defaults");
                Self::default()
            }
        }
    }
}
