//! Lane Rush entry point
//!
//! Web: wires keyboard input to the simulation and hands a JSON snapshot to
//! the page's renderer every animation frame.
//! Native: headless runs driven by a simple autopilot.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::KeyboardEvent;

    use lane_rush::audio::WebAudioSink;
    use lane_rush::persistence::{LocalStorageStore, MemoryStore, ProfileStore};
    use lane_rush::sim::{GamePhase, TickInput};
    use lane_rush::{Game, Tuning};

    // The page owns drawing and HUD; we only hand it the snapshot
    #[wasm_bindgen(inline_js = "
        export function render_snapshot(json) {
            if (typeof window.laneRushRender === 'function') {
                window.laneRushRender(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn render_snapshot(json: &str);
    }

    struct Host {
        game: Game<Box<dyn ProfileStore>, WebAudioSink>,
        input: TickInput,
    }

    fn seed() -> u64 {
        js_sys::Date::now() as u64
    }

    pub fn run() {
        let store: Box<dyn ProfileStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{e}, progress will not be saved");
                Box::new(MemoryStore::default())
            }
        };
        let game = Game::new(seed(), Tuning::default(), store, WebAudioSink::new());
        let host = Rc::new(RefCell::new(Host {
            game,
            input: TickInput::default(),
        }));

        setup_keyboard(host.clone());
        start_frame_loop(host);
        log::info!("Lane Rush started");
    }

    fn setup_keyboard(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut h = host.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => h.input.steer_left = true,
                    "ArrowRight" | "d" | "D" => h.input.steer_right = true,
                    "Enter" | " " => {
                        if matches!(h.game.phase(), GamePhase::Start | GamePhase::GameOver) {
                            h.game.start_run(seed());
                        }
                    }
                    "Escape" => match h.game.phase() {
                        GamePhase::Settings => {
                            h.game.close_settings();
                        }
                        GamePhase::GameOver => {
                            h.game.return_to_start();
                        }
                        _ => {}
                    },
                    "s" | "S" => {
                        h.game.open_settings();
                    }
                    "l" | "L" if h.game.phase() == GamePhase::Settings => {
                        let mut settings = *h.game.settings();
                        settings.cycle_difficulty();
                        h.game.apply_settings(settings);
                    }
                    "m" | "M" if h.game.phase() == GamePhase::Settings => {
                        let mut settings = *h.game.settings();
                        settings.cycle_sound();
                        h.game.apply_settings(settings);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut h = host.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => h.input.steer_left = false,
                    "ArrowRight" | "d" | "D" => h.input.steer_right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// One simulation tick per animation frame
    fn start_frame_loop(host: Rc<RefCell<Host>>) {
        let callback: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let next = callback.clone();

        *callback.borrow_mut() = Some(Closure::new(move || {
            {
                let mut h = host.borrow_mut();
                let input = h.input;
                let snapshot = h.game.frame(input);
                match serde_json::to_string(&snapshot) {
                    Ok(json) => render_snapshot(&json),
                    Err(e) => log::warn!("Failed to serialize snapshot: {e}"),
                }
            }
            if let (Some(window), Some(cb)) = (web_sys::window(), next.borrow().as_ref()) {
                let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }));

        if let (Some(window), Some(cb)) = (web_sys::window(), callback.borrow().as_ref()) {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_rush::audio::LogSink;
    use lane_rush::persistence::{JsonFileStore, MemoryStore, ProfileStore};
    use lane_rush::sim::DifficultyLevel;
    use lane_rush::{Game, Settings, Tuning};

    env_logger::init();
    log::info!("Lane Rush (native, headless) starting...");

    let mut args = std::env::args().skip(1);
    let ticks: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(3600);
    let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(1);
    let level = args.next().and_then(|a| {
        let level = DifficultyLevel::from_str(&a);
        if level.is_none() {
            log::warn!("Unknown difficulty {a:?}, keeping the saved one");
        }
        level
    });
    let tuning = Tuning::load_from_env();
    let profile_path =
        std::env::var("LANE_RUSH_PROFILE").unwrap_or_else(|_| "lane_rush_profile.json".into());

    let store: Box<dyn ProfileStore> = match JsonFileStore::open(&profile_path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("Failed to open profile {profile_path}: {e}, progress will not be saved");
            Box::new(MemoryStore::default())
        }
    };
    let mut game = Game::new(seed, tuning, store, LogSink);
    if let Some(level) = level {
        let settings = Settings {
            difficulty: level,
            ..*game.settings()
        };
        game.apply_settings(settings);
    }
    headless::run(game, ticks, seed);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use lane_rush::Game;
    use lane_rush::audio::AudioSink;
    use lane_rush::consts::*;
    use lane_rush::persistence::ProfileStore;
    use lane_rush::sim::{GamePhase, GameState, ObstacleKind, TickInput};

    /// Play `ticks` frames, restarting after every crash
    pub fn run<S: ProfileStore, A: AudioSink>(mut game: Game<S, A>, ticks: u64, seed: u64) {
        let mut runs = 1u64;
        let mut best = 0u64;
        game.start_run(seed);

        for _ in 0..ticks {
            let input = autopilot(game.state());
            game.frame(input);
            if game.phase() == GamePhase::GameOver {
                best = best.max(game.state().score);
                game.start_run(seed.wrapping_add(runs));
                runs += 1;
            }
        }
        best = best.max(game.state().score);

        let state = game.state();
        log::info!(
            "{ticks} ticks, {runs} runs, best score {best}, high score {}, coins {}",
            state.high_score,
            state.coins
        );
    }

    /// Dodge the closest dodgeable threat ahead; otherwise drift to centre
    fn autopilot(state: &GameState) -> TickInput {
        let player = state.player.rect();
        let look_ahead = player.pos.y - 4.0 * CAR_HEIGHT;

        let threat = state
            .obstacles
            .iter()
            .filter(|o| o.size.x < TRACK_WIDTH)
            .filter(|o| o.kind.is_fatal() || matches!(o.kind, ObstacleKind::OilSlick))
            .filter(|o| o.rect().bottom() > look_ahead && o.pos.y < player.bottom())
            .filter(|o| o.pos.x < player.right() + 8.0 && o.rect().right() > player.pos.x - 8.0)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let target_x = match threat {
            Some(o) => {
                let room_left = o.pos.x;
                let room_right = TRACK_WIDTH - o.rect().right();
                if room_left > room_right {
                    o.pos.x - CAR_WIDTH - 10.0
                } else {
                    o.rect().right() + 10.0
                }
            }
            None => state
                .collectibles
                .iter()
                .filter(|c| c.pos.y < player.pos.y)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map_or(MAX_CAR_X / 2.0, |c| c.pos.x),
        };

        let dx = target_x - player.pos.x;
        TickInput {
            steer_left: dx < -2.0,
            steer_right: dx > 2.0,
        }
    }
}
