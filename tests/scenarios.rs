//! End-to-end scenarios for collision resolution and run flow.
//!
//! Each test builds a playing state with spawning disabled, places entities
//! by hand and drives whole ticks through the public API.

use glam::Vec2;

use lane_rush::Tuning;
use lane_rush::consts::*;
use lane_rush::sim::tick::start_run;
use lane_rush::sim::{
    AudioCue, DifficultyLevel, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, TickInput,
    resolve_collisions, tick,
};

fn quiet() -> GameState {
    let tuning = Tuning {
        base_spawn_interval_ms: f32::MAX,
        ..Tuning::default()
    };
    let mut state = GameState::new(7, tuning);
    assert!(start_run(&mut state, 7));
    state
}

/// Push an obstacle at `pos`; speed 0 keeps it parked there
fn park(state: &mut GameState, pos: Vec2, size: Vec2, kind: ObstacleKind) -> u32 {
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        pos,
        size,
        speed: 0.0,
        kind,
    });
    id
}

fn car_size() -> Vec2 {
    Vec2::new(CAR_WIDTH, CAR_HEIGHT)
}

fn idle(state: &mut GameState) {
    tick(state, &TickInput::default());
}

#[test]
fn scenario_a_normal_start_uses_base_difficulty() {
    let state = quiet();
    assert_eq!(state.level, DifficultyLevel::Normal);
    assert_eq!(state.score, 0);
    assert_eq!(state.difficulty, DifficultyLevel::Normal.base());
}

#[test]
fn scenario_b_passed_car_scores() {
    let mut state = quiet();
    park(
        &mut state,
        Vec2::new(0.0, TRACK_HEIGHT + 1.0),
        car_size(),
        ObstacleKind::Car,
    );
    idle(&mut state);
    assert!(state.obstacles.is_empty());
    assert_eq!(state.score, 10);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn scenario_b_passed_car_scores_double_under_multiplier() {
    let mut state = quiet();
    state.timers.multiplier = 100;
    park(
        &mut state,
        Vec2::new(0.0, TRACK_HEIGHT + 1.0),
        car_size(),
        ObstacleKind::Car,
    );
    idle(&mut state);
    assert!(state.obstacles.is_empty());
    assert_eq!(state.score, 20);
}

#[test]
fn scenario_b_hazards_without_pass_award() {
    let mut state = quiet();
    park(
        &mut state,
        Vec2::new(0.0, TRACK_HEIGHT + 1.0),
        Vec2::new(OIL_WIDTH, OIL_HEIGHT),
        ObstacleKind::OilSlick,
    );
    park(
        &mut state,
        Vec2::new(0.0, TRACK_HEIGHT + 1.0),
        Vec2::new(TRACK_WIDTH, GRAVITY_FIELD_HEIGHT),
        ObstacleKind::GravityField {
            strength: 1.5,
            direction: 1.0,
        },
    );
    idle(&mut state);
    assert!(state.obstacles.is_empty());
    assert_eq!(state.score, 0);
}

#[test]
fn scenario_c_oil_sets_slide_and_stays() {
    let mut state = quiet();
    let pos = state.player.pos;
    let id = park(
        &mut state,
        pos,
        Vec2::new(OIL_WIDTH, OIL_HEIGHT),
        ObstacleKind::OilSlick,
    );

    assert!(!resolve_collisions(&mut state));
    assert_eq!(state.timers.slide, state.tuning.slide_ticks);
    assert_eq!(state.obstacles.len(), 1);
    assert_eq!(state.obstacles[0].id, id);

    // Through a full tick: still on track, slide re-armed then decayed once
    idle(&mut state);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.obstacles.len(), 1);
    assert_eq!(state.timers.slide, state.tuning.slide_ticks - 1);
}

#[test]
fn scenario_d_shield_absorbs_car() {
    let mut state = quiet();
    state.timers.shield = 120;
    let pos = state.player.pos;
    park(&mut state, pos, car_size(), ObstacleKind::Car);

    idle(&mut state);
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.timers.shield, 0);
    assert!(state.obstacles.is_empty());

    let events = state.drain_events();
    assert!(events.contains(&GameEvent::ShieldBroken));
    assert!(events.contains(&GameEvent::Audio(AudioCue::ShieldBreak)));
}

#[test]
fn scenario_d_second_hit_in_same_tick_is_fatal() {
    let mut state = quiet();
    state.timers.shield = 120;
    let pos = state.player.pos;
    park(&mut state, pos, car_size(), ObstacleKind::Car);
    park(&mut state, pos, car_size(), ObstacleKind::Chaser);

    idle(&mut state);
    assert_eq!(state.timers.shield, 0);
    assert_eq!(state.phase, GamePhase::GameOver);
}

#[test]
fn scenario_e_unshielded_hit_ends_run_once() {
    let mut state = quiet();
    state.high_score = 50;
    state.award(70);
    let pos = state.player.pos;
    park(&mut state, pos, car_size(), ObstacleKind::Car);

    idle(&mut state);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.high_score, 70);

    for _ in 0..5 {
        idle(&mut state);
    }
    let events = state.drain_events();
    let ended = events
        .iter()
        .filter(|e| matches!(e, GameEvent::RunEnded { .. }))
        .count();
    assert_eq!(ended, 1);
    assert!(events.contains(&GameEvent::HighScoreChanged(70)));
    assert!(events.contains(&GameEvent::RunEnded {
        score: 70,
        new_high_score: true,
    }));
}

#[test]
fn scenario_e_lower_score_keeps_high_score() {
    let mut state = quiet();
    state.high_score = 500;
    state.award(30);
    let pos = state.player.pos;
    park(&mut state, pos, car_size(), ObstacleKind::Car);

    idle(&mut state);
    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.high_score, 500);
}

#[test]
fn scenario_f_laser_turns_fatal_after_its_period() {
    let mut state = quiet();
    let period = state.tuning.laser_period;
    park(
        &mut state,
        Vec2::new(0.0, PLAYER_Y + 20.0),
        Vec2::new(TRACK_WIDTH, LASER_HEIGHT),
        ObstacleKind::LaserGrid {
            active: false,
            ticks: 0,
        },
    );

    for _ in 1..period {
        idle(&mut state);
        assert_eq!(state.phase, GamePhase::Playing);
    }
    assert!(matches!(
        state.obstacles[0].kind,
        ObstacleKind::LaserGrid { active: false, .. }
    ));

    idle(&mut state);
    assert_eq!(state.phase, GamePhase::GameOver);
}

#[test]
fn scenario_f_active_laser_consumes_shield() {
    let mut state = quiet();
    let period = state.tuning.laser_period;
    state.timers.shield = 1000;
    park(
        &mut state,
        Vec2::new(0.0, PLAYER_Y + 20.0),
        Vec2::new(TRACK_WIDTH, LASER_HEIGHT),
        ObstacleKind::LaserGrid {
            active: false,
            ticks: 0,
        },
    );

    for _ in 0..period {
        idle(&mut state);
    }
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.timers.shield, 0);
    assert!(state.obstacles.is_empty());
}

#[test]
fn flicker_platform_is_safe_only_while_active() {
    let mut state = quiet();
    let period = state.tuning.platform_period;
    let player_x = state.player.pos.x;
    park(
        &mut state,
        Vec2::new(player_x - 40.0, PLAYER_Y + 20.0),
        Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
        ObstacleKind::FlickerPlatform {
            active: true,
            ticks: 0,
        },
    );

    for _ in 1..period {
        idle(&mut state);
    }
    assert_eq!(state.phase, GamePhase::Playing);
    idle(&mut state);
    assert_eq!(state.phase, GamePhase::GameOver);
}

#[test]
fn restart_resets_run_but_keeps_lifetime_values() {
    let mut state = quiet();
    state.coins = 12;
    state.award(250);
    state.timers.boost = 30;
    let pos = state.player.pos;
    park(&mut state, pos, car_size(), ObstacleKind::Car);
    idle(&mut state);
    assert_eq!(state.phase, GamePhase::GameOver);

    assert!(start_run(&mut state, 8));
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.difficulty, DifficultyLevel::Normal.base());
    assert!(state.obstacles.is_empty());
    assert_eq!(state.timers, Default::default());
    assert_eq!(state.player.pos.x, (TRACK_WIDTH - CAR_WIDTH) / 2.0);
    assert_eq!(state.coins, 12);
    assert_eq!(state.high_score, 250);
}
