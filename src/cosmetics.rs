//! Car customisation
//!
//! Colour and spoiler are purely visual; tire kind sets the player's base
//! steering speed. Items unlock once the lifetime coin total reaches their
//! threshold. Coins are never spent, so unlocks are permanent.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A selectable cosmetic item
pub trait Cosmetic: Copy + Sized + 'static {
    /// Every variant, cheapest first
    const ALL: &'static [Self];

    /// Stable id used by persistence (e.g. "tire:sport")
    fn id(&self) -> &'static str;

    /// Lifetime coins required to unlock (0 = always available)
    fn unlock_coins(&self) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CarColor {
    #[default]
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

impl Cosmetic for CarColor {
    const ALL: &'static [Self] = &[
        CarColor::Red,
        CarColor::Blue,
        CarColor::Green,
        CarColor::Yellow,
        CarColor::Purple,
    ];

    fn id(&self) -> &'static str {
        match self {
            CarColor::Red => "color:red",
            CarColor::Blue => "color:blue",
            CarColor::Green => "color:green",
            CarColor::Yellow => "color:yellow",
            CarColor::Purple => "color:purple",
        }
    }

    fn unlock_coins(&self) -> u64 {
        match self {
            CarColor::Red | CarColor::Blue => 0,
            CarColor::Green => 25,
            CarColor::Yellow => 50,
            CarColor::Purple => 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpoilerKind {
    #[default]
    None,
    Low,
    High,
}

impl Cosmetic for SpoilerKind {
    const ALL: &'static [Self] = &[SpoilerKind::None, SpoilerKind::Low, SpoilerKind::High];

    fn id(&self) -> &'static str {
        match self {
            SpoilerKind::None => "spoiler:none",
            SpoilerKind::Low => "spoiler:low",
            SpoilerKind::High => "spoiler:high",
        }
    }

    fn unlock_coins(&self) -> u64 {
        match self {
            SpoilerKind::None => 0,
            SpoilerKind::Low => 40,
            SpoilerKind::High => 120,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TireKind {
    #[default]
    Standard,
    Sport,
    Offroad,
}

impl TireKind {
    /// Lateral speed in px/tick before boost
    pub fn base_speed(&self) -> f32 {
        match self {
            TireKind::Standard => 5.0,
            TireKind::Sport => 6.0,
            TireKind::Offroad => 4.5,
        }
    }
}

impl Cosmetic for TireKind {
    const ALL: &'static [Self] = &[TireKind::Standard, TireKind::Offroad, TireKind::Sport];

    fn id(&self) -> &'static str {
        match self {
            TireKind::Standard => "tire:standard",
            TireKind::Sport => "tire:sport",
            TireKind::Offroad => "tire:offroad",
        }
    }

    fn unlock_coins(&self) -> u64 {
        match self {
            TireKind::Standard => 0,
            TireKind::Offroad => 30,
            TireKind::Sport => 75,
        }
    }
}

/// The player's car setup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Loadout {
    pub color: CarColor,
    pub spoiler: SpoilerKind,
    pub tire: TireKind,
}

impl Loadout {
    /// Replace any locked selection with the default for that slot
    pub fn sanitized(self, unlocked: &BTreeSet<String>) -> Self {
        Self {
            color: pick_unlocked(self.color, unlocked),
            spoiler: pick_unlocked(self.spoiler, unlocked),
            tire: pick_unlocked(self.tire, unlocked),
        }
    }
}

fn pick_unlocked<C: Cosmetic + Default>(item: C, unlocked: &BTreeSet<String>) -> C {
    if is_unlocked(item, unlocked) {
        item
    } else {
        log::warn!("{} is locked, falling back to default", item.id());
        C::default()
    }
}

/// Free items are always unlocked, even if the stored set omits them
pub fn is_unlocked<C: Cosmetic>(item: C, unlocked: &BTreeSet<String>) -> bool {
    item.unlock_coins() == 0 || unlocked.contains(item.id())
}

fn all_items() -> impl Iterator<Item = (&'static str, u64)> {
    let colors = CarColor::ALL.iter().map(|c| (c.id(), c.unlock_coins()));
    let spoilers = SpoilerKind::ALL.iter().map(|s| (s.id(), s.unlock_coins()));
    let tires = TireKind::ALL.iter().map(|t| (t.id(), t.unlock_coins()));
    colors.chain(spoilers).chain(tires)
}

/// Ids unlocked by a lifetime coin total (free items included)
pub fn unlocked_at(coins: u64) -> BTreeSet<String> {
    all_items()
        .filter(|&(_, cost)| cost <= coins)
        .map(|(id, _)| id.to_string())
        .collect()
}

/// Ids whose threshold lies in `(old_coins, new_coins]`
pub fn unlocks_between(old_coins: u64, new_coins: u64) -> Vec<&'static str> {
    all_items()
        .filter(|&(_, cost)| cost > old_coins && cost <= new_coins)
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tire_speed_lookup() {
        assert!(TireKind::Sport.base_speed() > TireKind::Standard.base_speed());
        assert!(TireKind::Offroad.base_speed() < TireKind::Standard.base_speed());
    }

    #[test]
    fn test_unlocks_between_crosses_threshold_once() {
        assert_eq!(unlocks_between(24, 25), vec!["color:green"]);
        assert!(unlocks_between(25, 26).is_empty());
        assert!(unlocks_between(0, 0).is_empty());
    }

    #[test]
    fn test_unlocked_at_includes_free_items() {
        let set = unlocked_at(0);
        assert!(set.contains("color:red"));
        assert!(set.contains("tire:standard"));
        assert!(!set.contains("tire:sport"));
    }

    #[test]
    fn test_sanitized_replaces_locked_items() {
        let loadout = Loadout {
            color: CarColor::Purple,
            spoiler: SpoilerKind::Low,
            tire: TireKind::Offroad,
        };
        let unlocked = unlocked_at(40);
        let clean = loadout.sanitized(&unlocked);
        assert_eq!(clean.color, CarColor::Red);
        assert_eq!(clean.spoiler, SpoilerKind::Low);
        assert_eq!(clean.tire, TireKind::Offroad);
    }
}
