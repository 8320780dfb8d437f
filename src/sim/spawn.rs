//! Spawn policy
//!
//! Decides what enters the track, where, and how often. Kind selection is a
//! single unit draw walked through the tuning table in priority order, with
//! difficulty gates deciding which entries take part.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Collectible, CollectibleKind, GameState, Obstacle, ObstacleKind, Player};
use crate::clamp_to_track;
use crate::consts::*;
use crate::tuning::SpawnWeight;

/// Everything the spawn table can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Coin,
    Shield,
    Boost,
    Multiplier,
    Car,
    Barrier,
    OilSlick,
    LaserGrid,
    GravityField,
    FlickerPlatform,
    Chaser,
}

impl SpawnKind {
    /// Power-ups may only come from the first slot of a tick
    pub fn is_power_up(&self) -> bool {
        matches!(self, SpawnKind::Shield | SpawnKind::Boost | SpawnKind::Multiplier)
    }

    /// Multiplier on `base_speed * difficulty`
    pub fn speed_factor(&self) -> f32 {
        match self {
            SpawnKind::Barrier => 0.9,
            SpawnKind::LaserGrid | SpawnKind::FlickerPlatform => 0.8,
            SpawnKind::GravityField => 0.7,
            SpawnKind::Chaser => 1.1,
            _ => 1.0,
        }
    }

    pub fn size(&self) -> Vec2 {
        match self {
            SpawnKind::Coin | SpawnKind::Shield | SpawnKind::Boost | SpawnKind::Multiplier => {
                Vec2::splat(COLLECTIBLE_SIZE)
            }
            SpawnKind::Car | SpawnKind::Chaser => Vec2::new(CAR_WIDTH, CAR_HEIGHT),
            SpawnKind::Barrier => Vec2::new(BARRIER_WIDTH, BARRIER_HEIGHT),
            SpawnKind::OilSlick => Vec2::new(OIL_WIDTH, OIL_HEIGHT),
            SpawnKind::LaserGrid => Vec2::new(TRACK_WIDTH, LASER_HEIGHT),
            SpawnKind::GravityField => Vec2::new(TRACK_WIDTH, GRAVITY_FIELD_HEIGHT),
            SpawnKind::FlickerPlatform => Vec2::new(PLATFORM_WIDTH, PLATFORM_HEIGHT),
        }
    }
}

/// Current spawn interval: shrinks with difficulty, halved under boost
pub fn spawn_interval_ms(state: &GameState) -> f32 {
    let interval = state.tuning.base_spawn_interval_ms / state.difficulty.max(f32::EPSILON);
    if state.timers.boost_active() {
        interval / 2.0
    } else {
        interval
    }
}

/// Spawn this tick's entities if the interval has elapsed.
/// Returns how many entities were created.
pub fn spawn_entities(state: &mut GameState) -> usize {
    let now = state.now_ms();
    if now - state.last_spawn_ms < spawn_interval_ms(state) {
        return 0;
    }
    state.last_spawn_ms = now;

    let count = if state.difficulty > state.tuning.multi_spawn_threshold
        && state.rng.random_bool(state.tuning.multi_spawn_chance)
    {
        2
    } else {
        1
    };

    let min_gap = CAR_WIDTH + state.tuning.spawn_margin;
    let mut centers: Vec<f32> = Vec::with_capacity(count);

    for slot in 0..count {
        let kind = pick_kind(
            &mut state.rng,
            &state.tuning.spawn_table,
            state.difficulty,
            slot == 0,
        );
        let size = kind.size();
        let x = place(
            &mut state.rng,
            &state.player,
            kind,
            &centers,
            min_gap,
            state.tuning.placement_attempts,
        );
        centers.push(x + size.x / 2.0);
        create(state, kind, x);
    }

    count
}

/// Walk the table with one roll in [0, 1); leftovers become a standard car
pub fn pick_kind(
    rng: &mut Pcg32,
    table: &[SpawnWeight],
    difficulty: f32,
    first_slot: bool,
) -> SpawnKind {
    let roll: f32 = rng.random();
    let mut ceiling = 0.0;
    for entry in table {
        if entry.kind.is_power_up() && !first_slot {
            continue;
        }
        if difficulty < entry.min_difficulty {
            continue;
        }
        ceiling += entry.weight;
        if roll < ceiling {
            return entry.kind;
        }
    }
    SpawnKind::Car
}

/// Choose a left-edge x, retrying until the centre clears earlier spawns.
/// When attempts run out the last candidate is used anyway.
pub fn place(
    rng: &mut Pcg32,
    player: &Player,
    kind: SpawnKind,
    centers: &[f32],
    min_gap: f32,
    attempts: u32,
) -> f32 {
    let width = kind.size().x;
    let mut x = candidate_x(rng, player, kind, width);
    for _ in 1..attempts.max(1) {
        let center = x + width / 2.0;
        if centers.iter().all(|c| (center - c).abs() >= min_gap) {
            break;
        }
        x = candidate_x(rng, player, kind, width);
    }
    x
}

fn candidate_x(rng: &mut Pcg32, player: &Player, kind: SpawnKind, width: f32) -> f32 {
    match kind {
        SpawnKind::LaserGrid | SpawnKind::GravityField => 0.0,
        SpawnKind::FlickerPlatform => clamp_to_track(player.center_x() - width / 2.0, width),
        SpawnKind::Chaser => {
            let offset = rng.random_range(-2.0 * CAR_WIDTH..=2.0 * CAR_WIDTH);
            clamp_to_track(player.center_x() - width / 2.0 + offset, width)
        }
        _ => rng.random_range(0.0..=(TRACK_WIDTH - width).max(0.0)),
    }
}

fn random_direction(rng: &mut Pcg32) -> f32 {
    if rng.random_bool(0.5) { 1.0 } else { -1.0 }
}

/// Build the entity just above the visible track
fn create(state: &mut GameState, kind: SpawnKind, x: f32) {
    let size = kind.size();
    let pos = Vec2::new(x, -size.y);
    let speed = state.tuning.base_speed * state.difficulty * kind.speed_factor();
    let id = state.next_entity_id();

    let collectible = match kind {
        SpawnKind::Coin => Some(CollectibleKind::Coin),
        SpawnKind::Shield => Some(CollectibleKind::Shield),
        SpawnKind::Boost => Some(CollectibleKind::Boost),
        SpawnKind::Multiplier => Some(CollectibleKind::Multiplier),
        _ => None,
    };
    if let Some(kind) = collectible {
        log::debug!("Spawned {kind:?} #{id} at x={x:.0}");
        state.collectibles.push(Collectible {
            id,
            pos,
            size,
            speed,
            kind,
        });
        return;
    }

    let kind = match kind {
        SpawnKind::Barrier => ObstacleKind::Barrier {
            velocity: state.tuning.barrier_speed,
            direction: random_direction(&mut state.rng),
        },
        SpawnKind::OilSlick => ObstacleKind::OilSlick,
        SpawnKind::LaserGrid => ObstacleKind::LaserGrid {
            active: false,
            ticks: 0,
        },
        SpawnKind::GravityField => ObstacleKind::GravityField {
            strength: state.tuning.gravity_pull,
            direction: random_direction(&mut state.rng),
        },
        SpawnKind::FlickerPlatform => ObstacleKind::FlickerPlatform {
            active: true,
            ticks: 0,
        },
        SpawnKind::Chaser => ObstacleKind::Chaser,
        _ => ObstacleKind::Car,
    };
    log::debug!("Spawned {} #{id} at x={x:.0}", kind.name());
    state.obstacles.push(Obstacle {
        id,
        pos,
        size,
        speed,
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmetics::Loadout;
    use crate::sim::GamePhase;
    use crate::tuning::{DEFAULT_SPAWN_TABLE, Tuning};
    use rand::SeedableRng;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.reset_run(seed);
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_no_spawn_before_interval() {
        let mut state = playing(1);
        state.time_ticks = 10;
        assert_eq!(spawn_entities(&mut state), 0);
        assert!(state.obstacles.is_empty() && state.collectibles.is_empty());
    }

    #[test]
    fn test_spawn_after_interval_resets_clock() {
        let mut state = playing(2);
        // 1200 ms at 60 Hz is just over 72 ticks
        state.time_ticks = 73;
        assert_eq!(spawn_entities(&mut state), 1);
        assert!((state.last_spawn_ms - state.now_ms()).abs() < f32::EPSILON);
        assert_eq!(state.obstacles.len() + state.collectibles.len(), 1);
        // Immediately again: nothing
        assert_eq!(spawn_entities(&mut state), 0);
    }

    #[test]
    fn test_spawned_entities_start_above_track() {
        let mut state = playing(3);
        for n in 1..50 {
            state.time_ticks = n * 100;
            spawn_entities(&mut state);
        }
        for o in &state.obstacles {
            assert!((o.pos.y + o.size.y).abs() < f32::EPSILON);
            assert!(o.pos.x >= 0.0 && o.pos.x + o.size.x <= TRACK_WIDTH);
            assert!((o.speed - 3.0).abs() < 1e-5);
        }
        for c in &state.collectibles {
            assert!((c.pos.y + c.size.y).abs() < f32::EPSILON);
        }
    }

    /// Spawn once per interval at a pinned difficulty; returns per-tick counts
    fn spawn_counts(state: &mut GameState, difficulty: f32, ticks: u64) -> Vec<usize> {
        state.difficulty = difficulty;
        state.last_spawn_ms = 0.0;
        (1..=ticks)
            .map(|n| {
                state.obstacles.clear();
                state.collectibles.clear();
                state.time_ticks = n * 100;
                spawn_entities(state)
            })
            .collect()
    }

    #[test]
    fn test_single_spawn_at_or_below_threshold() {
        let mut state = playing(10);
        let threshold = state.tuning.multi_spawn_threshold;
        assert!(spawn_counts(&mut state, threshold, 200).iter().all(|&n| n == 1));
        assert!(spawn_counts(&mut state, 1.0, 200).iter().all(|&n| n == 1));
    }

    #[test]
    fn test_double_spawn_above_threshold() {
        let mut state = playing(11);
        let counts = spawn_counts(&mut state, 2.0, 200);
        let doubles = counts.iter().filter(|&&n| n == 2).count();
        assert!(counts.iter().all(|&n| n == 1 || n == 2));
        // 50% chance per tick
        assert!((60..=140).contains(&doubles), "{doubles} double spawns");
    }

    #[test]
    fn test_double_spawn_keeps_centres_apart() {
        let tuning = Tuning {
            // Every slot becomes a uniformly placed car
            spawn_table: Vec::new(),
            placement_attempts: 200,
            ..Tuning::default()
        };
        let mut state = GameState::new(12, tuning);
        state.reset_run(12);
        state.phase = GamePhase::Playing;
        state.difficulty = 2.0;
        let min_gap = CAR_WIDTH + state.tuning.spawn_margin;

        let mut doubles = 0;
        for n in 1..=200 {
            state.obstacles.clear();
            state.time_ticks = n * 100;
            if spawn_entities(&mut state) != 2 {
                continue;
            }
            doubles += 1;
            let [a, b] = [&state.obstacles[0], &state.obstacles[1]]
                .map(|o| o.pos.x + o.size.x / 2.0);
            assert!((a - b).abs() >= min_gap, "centres {a} and {b} too close");
        }
        assert!(doubles > 0);
    }

    #[test]
    fn test_boost_halves_interval() {
        let mut state = playing(4);
        let normal = spawn_interval_ms(&state);
        state.timers.boost = 10;
        assert!((spawn_interval_ms(&state) - normal / 2.0).abs() < 1e-3);
        state.difficulty = 2.0;
        assert!((spawn_interval_ms(&state) - normal / 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_low_difficulty_only_basic_kinds() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..2000 {
            let kind = pick_kind(&mut rng, &DEFAULT_SPAWN_TABLE, 1.0, true);
            assert!(matches!(
                kind,
                SpawnKind::Coin
                    | SpawnKind::Car
                    | SpawnKind::Shield
                    | SpawnKind::Boost
                    | SpawnKind::Multiplier
            ));
        }
    }

    #[test]
    fn test_high_difficulty_unlocks_hazards() {
        let mut rng = Pcg32::seed_from_u64(6);
        let kinds: Vec<_> = (0..4000)
            .map(|_| pick_kind(&mut rng, &DEFAULT_SPAWN_TABLE, 3.0, true))
            .collect();
        for expected in [
            SpawnKind::Barrier,
            SpawnKind::OilSlick,
            SpawnKind::LaserGrid,
            SpawnKind::GravityField,
            SpawnKind::FlickerPlatform,
            SpawnKind::Chaser,
        ] {
            assert!(kinds.contains(&expected), "{expected:?} never drawn");
        }
    }

    #[test]
    fn test_second_slot_never_power_up() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..4000 {
            assert!(!pick_kind(&mut rng, &DEFAULT_SPAWN_TABLE, 3.0, false).is_power_up());
        }
    }

    #[test]
    fn test_placement_separates_centres() {
        let player = Player::new(Loadout::default());
        let min_gap = CAR_WIDTH + 20.0;
        let mut separated = 0;
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let x = place(&mut rng, &player, SpawnKind::Car, &[200.0], min_gap, 10);
            if (x + CAR_WIDTH / 2.0 - 200.0).abs() >= min_gap {
                separated += 1;
            }
        }
        assert!(separated >= 18);
    }

    #[test]
    fn test_placement_gives_up_without_failing() {
        let player = Player::new(Loadout::default());
        let mut rng = Pcg32::seed_from_u64(8);
        // Impossible gap: every candidate overlaps, last one is accepted
        let x = place(&mut rng, &player, SpawnKind::Car, &[200.0], 1000.0, 10);
        assert!((0.0..=MAX_CAR_X).contains(&x));
    }

    #[test]
    fn test_platform_spawns_under_player() {
        let mut player = Player::new(Loadout::default());
        player.pos.x = 0.0;
        let mut rng = Pcg32::seed_from_u64(9);
        let x = place(&mut rng, &player, SpawnKind::FlickerPlatform, &[], 60.0, 10);
        assert!(x.abs() < f32::EPSILON);
    }
}
