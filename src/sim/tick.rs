//! Per-frame simulation tick
//!
//! Sequences one frame: input, spawn, hazards, collisions, timer decay,
//! difficulty. Also owns the phase transitions around a run.

use super::collision::resolve_collisions;
use super::difficulty::{DifficultyLevel, difficulty_for, scaled_award};
use super::movement::{advance_entities, apply_gravity_fields, move_player};
use super::spawn::spawn_entities;
use super::state::{AudioCue, GameEvent, GamePhase, GameState};
use crate::cosmetics::Loadout;

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub steer_left: bool,
    pub steer_right: bool,
}

impl TickInput {
    pub fn any(&self) -> bool {
        self.steer_left || self.steer_right
    }
}

/// Advance the game by one tick. Does nothing outside `Playing`.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    // Engine cue fires once per continuous steering span; steering is
    // ignored while sliding, so a slide ends the span
    let moving = input.any() && !state.timers.sliding();
    if moving && !state.steering {
        state.events.push(GameEvent::Audio(AudioCue::EngineMoving));
    }
    state.steering = moving;

    move_player(state, input.steer_left, input.steer_right);
    spawn_entities(state);
    apply_gravity_fields(state);
    advance_entities(state);

    if resolve_collisions(state) {
        game_over(state);
        return;
    }

    let now = state.now_ms();
    if now - state.last_reward_ms >= state.tuning.survival_reward_ms {
        state.last_reward_ms = now;
        let points = scaled_award(
            state.tuning.survival_reward_points,
            state.timers.multiplier_active(),
        );
        state.award(points);
    }

    state.timers.decay();
    state.difficulty = difficulty_for(state.score, state.level);
}

/// End the run after an unshielded fatal hit
fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.steering = false;

    let new_high_score = state.score > state.high_score;
    if new_high_score {
        state.high_score = state.score;
        state.events.push(GameEvent::HighScoreChanged(state.score));
    }
    state.events.push(GameEvent::Audio(AudioCue::Crash));
    state.events.push(GameEvent::RunEnded {
        score: state.score,
        new_high_score,
    });

    log::info!(
        "Game over: score={} difficulty={:.2} ticks={}{}",
        state.score,
        state.difficulty,
        state.time_ticks,
        if new_high_score { " (new high score)" } else { "" }
    );
}

/// Start (or restart) a run from the start or game-over screen
pub fn start_run(state: &mut GameState, seed: u64) -> bool {
    match state.phase {
        GamePhase::Start | GamePhase::GameOver => {
            state.reset_run(seed);
            state.phase = GamePhase::Playing;
            log::info!("Run started: seed={seed} level={}", state.level.as_str());
            true
        }
        phase => {
            log::warn!("Ignoring run start from {phase:?}");
            false
        }
    }
}

/// Open the settings menu from the start or game-over screen
pub fn open_settings(state: &mut GameState) -> bool {
    match state.phase {
        GamePhase::Start | GamePhase::GameOver => {
            state.phase = GamePhase::Settings;
            true
        }
        phase => {
            log::warn!("Ignoring settings request from {phase:?}");
            false
        }
    }
}

/// Leave settings (always back to the start screen)
pub fn close_settings(state: &mut GameState) -> bool {
    if state.phase == GamePhase::Settings {
        state.phase = GamePhase::Start;
        true
    } else {
        false
    }
}

/// Back to the title screen after a run
pub fn return_to_start(state: &mut GameState) -> bool {
    if state.phase == GamePhase::GameOver {
        state.phase = GamePhase::Start;
        true
    } else {
        false
    }
}

/// Apply the settings collaborator's choices.
///
/// Refused mid-run so difficulty stays a function of score alone. Locked
/// cosmetics fall back to their defaults.
pub fn configure(state: &mut GameState, level: DifficultyLevel, loadout: Loadout) -> bool {
    if state.phase == GamePhase::Playing {
        log::warn!("Ignoring settings change during a run");
        return false;
    }
    state.level = level;
    state.player.loadout = loadout.sanitized(&state.unlocked);
    state.difficulty = difficulty_for(0, level);
    true
}
