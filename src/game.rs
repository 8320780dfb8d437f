//! Host-facing game wrapper
//!
//! Owns the simulation plus its collaborators. Each frame runs one tick,
//! then forwards the tick's events to storage and audio. Collaborator
//! failures are logged and never reach the simulation.

use crate::audio::AudioSink;
use crate::persistence::{Profile, ProfileStore};
use crate::settings::Settings;
use crate::sim::tick::{close_settings, configure, open_settings, return_to_start, start_run};
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, TickInput, tick};
use crate::tuning::Tuning;

pub struct Game<S: ProfileStore, A: AudioSink> {
    state: GameState,
    settings: Settings,
    store: S,
    audio: A,
}

impl<S: ProfileStore, A: AudioSink> Game<S, A> {
    /// Pull the stored profile once and land on the start screen
    pub fn new(seed: u64, tuning: Tuning, store: S, audio: A) -> Self {
        let profile = store.load_profile().unwrap_or_else(|e| {
            log::warn!("Failed to load profile: {e}, starting fresh");
            Profile::default()
        });

        let mut state = GameState::new(seed, tuning);
        state.restore_profile(profile.high_score, profile.coins, profile.unlocked);

        let mut settings = profile.settings;
        configure(&mut state, settings.difficulty, settings.loadout);
        settings.loadout = state.player.loadout;

        log::info!(
            "Profile ready: high score {}, {} coins, level {}",
            state.high_score,
            state.coins,
            settings.difficulty.as_str()
        );

        Self {
            state,
            settings,
            store,
            audio,
        }
    }

    /// Run one tick and dispatch what it produced
    pub fn frame(&mut self, input: TickInput) -> Snapshot<'_> {
        tick(&mut self.state, &input);
        self.dispatch_events();
        self.state.snapshot()
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::CoinsChanged(total) => {
                    if let Err(e) = self.store.save_coins(total) {
                        log::warn!("Failed to save coins: {e}");
                    }
                }
                GameEvent::HighScoreChanged(score) => {
                    if let Err(e) = self.store.save_high_score(score) {
                        log::warn!("Failed to save high score: {e}");
                    }
                }
                GameEvent::Unlocked(_) => {
                    if let Err(e) = self.store.save_unlocked(&self.state.unlocked) {
                        log::warn!("Failed to save unlocks: {e}");
                    }
                }
                GameEvent::Audio(cue) => {
                    if let Err(e) = self.audio.play(cue, self.settings.sound) {
                        log::warn!("Failed to play {cue:?}: {e}");
                    }
                }
                GameEvent::PowerUpCollected(kind) => log::debug!("Power-up active: {kind:?}"),
                GameEvent::ShieldBroken => log::debug!("Shield broken"),
                GameEvent::RunEnded {
                    score,
                    new_high_score,
                } => log::debug!("Run ended at {score} (new high: {new_high_score})"),
            }
        }
    }

    pub fn start_run(&mut self, seed: u64) -> bool {
        start_run(&mut self.state, seed)
    }

    pub fn open_settings(&mut self) -> bool {
        open_settings(&mut self.state)
    }

    pub fn close_settings(&mut self) -> bool {
        close_settings(&mut self.state)
    }

    pub fn return_to_start(&mut self) -> bool {
        return_to_start(&mut self.state)
    }

    /// Apply and persist new settings (not allowed mid-run)
    pub fn apply_settings(&mut self, settings: Settings) -> bool {
        if !configure(&mut self.state, settings.difficulty, settings.loadout) {
            return false;
        }
        self.settings = Settings {
            loadout: self.state.player.loadout,
            ..settings
        };
        if let Err(e) = self.store.save_settings(&self.settings) {
            log::warn!("Failed to save settings: {e}");
        }
        true
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts that script scenarios
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::AudioError;
    use crate::consts::*;
    use crate::cosmetics::{Loadout, TireKind};
    use crate::persistence::MemoryStore;
    use crate::settings::SoundMode;
    use crate::sim::{
        AudioCue, Collectible, CollectibleKind, DifficultyLevel, Obstacle, ObstacleKind,
    };
    use glam::Vec2;

    #[derive(Default)]
    struct RecordingSink {
        played: Vec<AudioCue>,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, cue: AudioCue, _mode: SoundMode) -> Result<(), AudioError> {
            self.played.push(cue);
            Ok(())
        }
    }

    struct BrokenSink;

    impl AudioSink for BrokenSink {
        fn play(&mut self, _cue: AudioCue, _mode: SoundMode) -> Result<(), AudioError> {
            Err(AudioError::Unavailable)
        }
    }

    fn quiet_tuning() -> Tuning {
        Tuning {
            base_spawn_interval_ms: f32::MAX,
            ..Tuning::default()
        }
    }

    fn recording_game() -> Game<MemoryStore, RecordingSink> {
        Game::new(1, quiet_tuning(), MemoryStore::default(), RecordingSink::default())
    }

    fn drop_coin(state: &mut GameState) {
        let id = state.next_entity_id();
        state.collectibles.push(Collectible {
            id,
            pos: state.player.pos,
            size: Vec2::splat(COLLECTIBLE_SIZE),
            speed: 3.0,
            kind: CollectibleKind::Coin,
        });
    }

    fn drop_car(state: &mut GameState) {
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            pos: state.player.pos,
            size: Vec2::new(CAR_WIDTH, CAR_HEIGHT),
            speed: 3.0,
            kind: ObstacleKind::Car,
        });
    }

    #[test]
    fn test_profile_restored_at_startup() {
        let profile = Profile {
            high_score: 900,
            coins: 80,
            ..Default::default()
        };
        let game = Game::new(
            1,
            quiet_tuning(),
            MemoryStore::new(profile),
            RecordingSink::default(),
        );
        assert_eq!(game.state().high_score, 900);
        assert_eq!(game.state().coins, 80);
        // 80 coins covers offroad and sport tires
        assert!(game.state().unlocked.contains("tire:sport"));
        assert_eq!(game.phase(), GamePhase::Start);
    }

    #[test]
    fn test_coin_pickup_persisted_and_cued() {
        let mut game = recording_game();
        assert!(game.start_run(1));
        drop_coin(game.state_mut());
        let snapshot = game.frame(TickInput::default());
        assert_eq!(snapshot.coins, 1);
        assert_eq!(game.store().profile.coins, 1);
        assert_eq!(game.audio().played, vec![AudioCue::Collect]);
    }

    #[test]
    fn test_crash_persists_high_score() {
        let mut game = recording_game();
        game.start_run(1);
        game.state_mut().award(70);
        drop_car(game.state_mut());
        game.frame(TickInput::default());
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.store().profile.high_score, 70);
        assert!(game.audio().played.contains(&AudioCue::Crash));
    }

    #[test]
    fn test_collaborator_failures_do_not_stop_the_run() {
        let store = MemoryStore::failing(Profile::default());
        let mut game = Game::new(1, quiet_tuning(), store, BrokenSink);
        game.start_run(1);
        drop_coin(game.state_mut());
        let steer = TickInput {
            steer_left: true,
            ..Default::default()
        };
        for _ in 0..10 {
            game.frame(steer);
        }
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.state().coins, 1);
        assert_eq!(game.state().time_ticks, 10);
        assert_eq!(game.store().profile.coins, 0);
    }

    #[test]
    fn test_apply_settings_sanitizes_and_persists() {
        let mut game = recording_game();
        let wanted = Settings {
            difficulty: DifficultyLevel::Easy,
            loadout: Loadout {
                tire: TireKind::Sport,
                ..Default::default()
            },
            sound: SoundMode::Soft,
        };
        assert!(game.apply_settings(wanted));
        assert_eq!(game.settings().loadout.tire, TireKind::Standard);
        assert_eq!(game.store().profile.settings.sound, SoundMode::Soft);
        assert_eq!(game.store().profile.settings.difficulty, DifficultyLevel::Easy);

        game.start_run(2);
        assert!(!game.apply_settings(Settings::default()));
        assert_eq!(game.state().difficulty, DifficultyLevel::Easy.base());
    }
}
