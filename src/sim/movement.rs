//! Movement and hazard behavior
//!
//! Player steering, slide drift, gravity-field pull, and the per-kind
//! update rules for everything scrolling down the track.

use super::state::{GameState, ObstacleKind};
use crate::clamp_to_track;

/// Player lateral speed (px/tick) from tire kind and boost
pub fn player_speed(state: &GameState) -> f32 {
    let base = state.player.loadout.tire.base_speed();
    if state.timers.boost_active() {
        base * state.tuning.boost_factor
    } else {
        base
    }
}

/// Horizontal drift while sliding (px/tick)
pub fn slide_offset(now_ms: f32, amplitude: f32) -> f32 {
    (now_ms / 100.0).sin() * amplitude
}

/// Gravity pull scale, oscillating between 0.4 and 1.2 of nominal
pub fn gravity_factor(now_ms: f32) -> f32 {
    0.8 + 0.4 * (now_ms / 300.0).sin()
}

/// Steer the player. Left is applied before right; while sliding the
/// intents are ignored and the car drifts instead.
pub fn move_player(state: &mut GameState, steer_left: bool, steer_right: bool) {
    let width = state.player.size.x;

    if state.timers.sliding() {
        let drift = slide_offset(state.now_ms(), state.tuning.slide_amplitude);
        state.player.pos.x = clamp_to_track(state.player.pos.x + drift, width);
        return;
    }

    let speed = player_speed(state);
    if steer_left {
        state.player.pos.x = clamp_to_track(state.player.pos.x - speed, width);
    }
    if steer_right {
        state.player.pos.x = clamp_to_track(state.player.pos.x + speed, width);
    }
}

/// Pull the player sideways for every gravity field sharing its rows.
/// Pulls accumulate and the result is clamped once.
pub fn apply_gravity_fields(state: &mut GameState) {
    let player = state.player.rect();
    let factor = gravity_factor(state.now_ms());

    let pull: f32 = state
        .obstacles
        .iter()
        .filter(|o| o.rect().overlaps_vertically(&player))
        .filter_map(|o| match o.kind {
            ObstacleKind::GravityField {
                strength,
                direction,
            } => Some(strength * direction * factor),
            _ => None,
        })
        .sum();

    if pull != 0.0 {
        let width = state.player.size.x;
        state.player.pos.x = clamp_to_track(state.player.pos.x + pull, width);
    }
}

/// Advance every obstacle and collectible by one tick
pub fn advance_entities(state: &mut GameState) {
    let boost = if state.timers.boost_active() {
        state.tuning.boost_factor
    } else {
        1.0
    };
    let chase_speed = state.tuning.chase_factor * state.difficulty;
    let target_x = state.player.pos.x;
    let laser_period = state.tuning.laser_period;
    let platform_period = state.tuning.platform_period;

    for obstacle in &mut state.obstacles {
        match &mut obstacle.kind {
            ObstacleKind::Barrier {
                velocity,
                direction,
            } => {
                let max_x = crate::consts::TRACK_WIDTH - obstacle.size.x;
                obstacle.pos.x += *velocity * *direction;
                if obstacle.pos.x <= 0.0 {
                    obstacle.pos.x = 0.0;
                    *direction = 1.0;
                } else if obstacle.pos.x >= max_x {
                    obstacle.pos.x = max_x;
                    *direction = -1.0;
                }
            }
            ObstacleKind::LaserGrid { active, ticks } => toggle(active, ticks, laser_period),
            ObstacleKind::FlickerPlatform { active, ticks } => {
                toggle(active, ticks, platform_period)
            }
            ObstacleKind::Chaser => {
                let dx = target_x - obstacle.pos.x;
                obstacle.pos.x += dx.clamp(-chase_speed, chase_speed);
            }
            ObstacleKind::Car | ObstacleKind::OilSlick | ObstacleKind::GravityField { .. } => {}
        }
        obstacle.pos.y += obstacle.speed * boost;
    }

    for item in &mut state.collectibles {
        item.pos.y += item.speed;
    }
}

fn toggle(active: &mut bool, ticks: &mut u32, period: u32) {
    *ticks += 1;
    if *ticks >= period {
        *ticks = 0;
        *active = !*active;
    }
}
