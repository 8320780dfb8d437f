//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here, owned by `GameState`.

use std::collections::BTreeSet;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::difficulty::{DifficultyLevel, difficulty_for};
use crate::consts::*;
use crate::cosmetics::Loadout;
use crate::tuning::Tuning;

/// Top-level game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Start,
    /// Active run
    Playing,
    /// Run ended by a fatal collision
    GameOver,
    /// Settings menu open
    Settings,
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner; y never changes during a run
    pub pos: Vec2,
    pub size: Vec2,
    pub loadout: Loadout,
}

impl Player {
    pub fn new(loadout: Loadout) -> Self {
        Self {
            pos: Vec2::new((TRACK_WIDTH - CAR_WIDTH) / 2.0, PLAYER_Y),
            size: Vec2::new(CAR_WIDTH, CAR_HEIGHT),
            loadout,
        }
    }

    /// Move back to track centre
    pub fn reset(&mut self) {
        self.pos = Vec2::new((TRACK_WIDTH - CAR_WIDTH) / 2.0, PLAYER_Y);
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Centre x, used by chasers and player-relative spawns
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// Obstacle kinds with their per-kind transient state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Plain traffic
    Car,
    /// Slides sideways, bouncing off the track edges
    Barrier { velocity: f32, direction: f32 },
    /// Makes the player slide on contact
    OilSlick,
    /// Full-width beam, deadly only while `active`
    LaserGrid { active: bool, ticks: u32 },
    /// Full-width band that drags the player sideways
    GravityField { strength: f32, direction: f32 },
    /// Deadly only while NOT `active`
    FlickerPlatform { active: bool, ticks: u32 },
    /// Steers toward the player each tick
    Chaser,
}

impl ObstacleKind {
    /// Whether contact right now ends the run (absent a shield)
    pub fn is_fatal(&self) -> bool {
        match self {
            ObstacleKind::Car | ObstacleKind::Barrier { .. } | ObstacleKind::Chaser => true,
            ObstacleKind::LaserGrid { active, .. } => *active,
            ObstacleKind::FlickerPlatform { active, .. } => !*active,
            ObstacleKind::OilSlick | ObstacleKind::GravityField { .. } => false,
        }
    }

    /// Whether scrolling past the player is worth points
    pub fn awards_pass(&self) -> bool {
        !matches!(self, ObstacleKind::OilSlick | ObstacleKind::GravityField { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Car => "car",
            ObstacleKind::Barrier { .. } => "barrier",
            ObstacleKind::OilSlick => "oil",
            ObstacleKind::LaserGrid { .. } => "laser",
            ObstacleKind::GravityField { .. } => "gravity",
            ObstacleKind::FlickerPlatform { .. } => "platform",
            ObstacleKind::Chaser => "chaser",
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    /// Downward speed (px/tick) before boost
    pub speed: f32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Collectible kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Coin,
    Shield,
    Boost,
    Multiplier,
}

/// A collectible entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub kind: CollectibleKind,
}

impl Collectible {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Tick-counted status effects (0 = inactive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTimers {
    pub shield: u32,
    pub boost: u32,
    pub multiplier: u32,
    pub slide: u32,
}

impl StatusTimers {
    /// Count every active timer down by one tick
    pub fn decay(&mut self) {
        self.shield = self.shield.saturating_sub(1);
        self.boost = self.boost.saturating_sub(1);
        self.multiplier = self.multiplier.saturating_sub(1);
        self.slide = self.slide.saturating_sub(1);
    }

    pub fn shield_active(&self) -> bool {
        self.shield > 0
    }

    pub fn boost_active(&self) -> bool {
        self.boost > 0
    }

    pub fn multiplier_active(&self) -> bool {
        self.multiplier > 0
    }

    pub fn sliding(&self) -> bool {
        self.slide > 0
    }
}

/// Discrete triggers for the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    Collect,
    Crash,
    /// Start of a continuous steering span
    EngineMoving,
    ShieldBreak,
}

/// Events emitted by the simulation for host-side collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// New lifetime coin total
    CoinsChanged(u64),
    /// New best score
    HighScoreChanged(u64),
    /// Cosmetic id newly unlocked by coins
    Unlocked(String),
    PowerUpCollected(CollectibleKind),
    ShieldBroken,
    RunEnded { score: u64, new_high_score: bool },
    Audio(AudioCue),
}

/// Read-only per-tick view for rendering
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub player: &'a Player,
    pub obstacles: &'a [Obstacle],
    pub collectibles: &'a [Collectible],
    pub timers: StatusTimers,
    pub score: u64,
    pub coins: u64,
    pub high_score: u64,
    pub difficulty: f32,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed of the current run
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub level: DifficultyLevel,
    pub player: Player,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Active collectibles in spawn order
    pub collectibles: Vec<Collectible>,
    pub timers: StatusTimers,
    pub score: u64,
    /// Lifetime coins, carried across runs
    pub coins: u64,
    pub high_score: u64,
    pub unlocked: BTreeSet<String>,
    /// Derived from score every tick
    pub difficulty: f32,
    /// Ticks since the current run started
    pub time_ticks: u64,
    pub last_spawn_ms: f32,
    pub last_reward_ms: f32,
    /// Whether a steer intent was held last tick (engine cue edge detection)
    pub steering: bool,
    /// Pending events, drained by the host each frame
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh state on the start screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let level = DifficultyLevel::default();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Start,
            level,
            player: Player::new(Loadout::default()),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            timers: StatusTimers::default(),
            score: 0,
            coins: 0,
            high_score: 0,
            unlocked: crate::cosmetics::unlocked_at(0),
            difficulty: level.base(),
            time_ticks: 0,
            last_spawn_ms: 0.0,
            last_reward_ms: 0.0,
            steering: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Seed values that outlive a run (read once at startup)
    pub fn restore_profile(&mut self, high_score: u64, coins: u64, unlocked: BTreeSet<String>) {
        self.high_score = high_score;
        self.coins = coins;
        self.unlocked = unlocked;
        self.unlocked.extend(crate::cosmetics::unlocked_at(coins));
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulation clock in ms since run start
    pub fn now_ms(&self) -> f32 {
        self.time_ticks as f32 * TICK_MS
    }

    /// Reset everything run-scoped; lifetime values are kept
    pub fn reset_run(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.score = 0;
        self.difficulty = difficulty_for(0, self.level);
        self.obstacles.clear();
        self.collectibles.clear();
        self.timers = StatusTimers::default();
        self.player.reset();
        self.time_ticks = 0;
        self.last_spawn_ms = self.now_ms();
        self.last_reward_ms = self.now_ms();
        self.steering = false;
    }

    /// Add to score and refresh difficulty
    pub fn award(&mut self, points: u64) {
        self.score += points;
        self.difficulty = difficulty_for(self.score, self.level);
    }

    /// Credit one coin, reporting the new total and any unlocks it crosses
    pub fn add_coin(&mut self) {
        let old = self.coins;
        self.coins += 1;
        self.events.push(GameEvent::CoinsChanged(self.coins));
        for id in crate::cosmetics::unlocks_between(old, self.coins) {
            if self.unlocked.insert(id.to_string()) {
                log::info!("Unlocked {id} at {} coins", self.coins);
                self.events.push(GameEvent::Unlocked(id.to_string()));
            }
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            player: &self.player,
            obstacles: &self.obstacles,
            collectibles: &self.collectibles,
            timers: self.timers,
            score: self.score,
            coins: self.coins,
            high_score: self.high_score,
            difficulty: self.difficulty,
        }
    }
}
