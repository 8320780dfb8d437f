//! Collision detection and resolution
//!
//! Everything on the track is an axis-aligned box, so detection is the
//! four-inequality overlap test. Resolution depends on what was hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::difficulty::scaled_award;
use super::state::{AudioCue, CollectibleKind, GameEvent, GameState, ObstacleKind};
use crate::consts::TRACK_HEIGHT;

/// Axis-aligned rectangle, `pos` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Vertical spans intersect (used by gravity fields)
    #[inline]
    pub fn overlaps_vertically(&self, other: &Rect) -> bool {
        self.pos.y < other.bottom() && self.bottom() > other.pos.y
    }
}

/// Strict overlap; touching edges do not count
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.pos.x < b.right() && a.right() > b.pos.x && a.pos.y < b.bottom() && a.bottom() > b.pos.y
}

/// Resolve every obstacle and collectible against the player for this tick.
///
/// Entities that left the track are removed here too. Returns `true` when an
/// unshielded fatal hit ended the run; nothing after that hit is processed.
pub fn resolve_collisions(state: &mut GameState) -> bool {
    let player = state.player.rect();

    let mut i = 0;
    while i < state.obstacles.len() {
        let obstacle = &state.obstacles[i];
        let kind = obstacle.kind;

        if obstacle.pos.y > TRACK_HEIGHT {
            state.obstacles.remove(i);
            if kind.awards_pass() {
                let points =
                    scaled_award(state.tuning.pass_award, state.timers.multiplier_active());
                state.award(points);
            }
            continue;
        }

        if !overlaps(&obstacle.rect(), &player) {
            i += 1;
            continue;
        }

        match kind {
            ObstacleKind::OilSlick => {
                // Stays on track, so overlap re-arms the slide every tick
                state.timers.slide = state.tuning.slide_ticks;
                i += 1;
            }
            kind if kind.is_fatal() => {
                if state.timers.shield_active() {
                    log::debug!("Shield absorbed {} #{}", kind.name(), state.obstacles[i].id);
                    state.timers.shield = 0;
                    state.obstacles.remove(i);
                    state.events.push(GameEvent::ShieldBroken);
                    state.events.push(GameEvent::Audio(AudioCue::ShieldBreak));
                } else {
                    log::debug!("Fatal hit by {} #{}", kind.name(), state.obstacles[i].id);
                    return true;
                }
            }
            _ => i += 1,
        }
    }

    let mut i = 0;
    while i < state.collectibles.len() {
        let item = &state.collectibles[i];

        if item.pos.y > TRACK_HEIGHT {
            state.collectibles.remove(i);
            continue;
        }

        if !overlaps(&item.rect(), &player) {
            i += 1;
            continue;
        }

        let kind = item.kind;
        state.collectibles.remove(i);
        match kind {
            CollectibleKind::Coin => state.add_coin(),
            CollectibleKind::Shield => state.timers.shield = state.tuning.shield_ticks,
            CollectibleKind::Boost => state.timers.boost = state.tuning.boost_ticks,
            CollectibleKind::Multiplier => {
                state.timers.multiplier = state.tuning.multiplier_ticks
            }
        }
        if kind != CollectibleKind::Coin {
            log::debug!("Picked up {kind:?}");
            state.events.push(GameEvent::PowerUpCollected(kind));
        }
        state.events.push(GameEvent::Audio(AudioCue::Collect));
    }

    false
}
