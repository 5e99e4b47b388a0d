//! Sky Dodge entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use sky_dodge::audio::{AudioManager, SoundEffect};
    use sky_dodge::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
    use sky_dodge::persistence::{self, Storage};
    use sky_dodge::platform::{self, InputState, KeyboardBinding};
    use sky_dodge::renderer::RenderState;
    use sky_dodge::sim::{Difficulty, Engine, EngineConfig, Notifications, is_badge_level};
    use sky_dodge::{HighScores, Settings};

    /// Signals raised by engine callbacks, consumed after each update
    #[derive(Default)]
    struct Outcome {
        final_score: Cell<Option<u64>>,
        level: Cell<Option<u32>>,
    }

    /// Game instance holding all state
    struct Game {
        engine: Engine,
        render_state: Option<RenderState>,
        storage: Box<dyn Storage>,
        settings: Settings,
        high_scores: HighScores,
        audio: Rc<RefCell<AudioManager>>,
        outcome: Rc<Outcome>,
        /// Held movement keys of the current engine's binding
        keys: Option<Rc<RefCell<InputState>>>,
        playfield: (f32, f32),
    }

    impl Game {
        /// Run one frame of simulation and react to what happened
        fn update(&mut self, now: u64) {
            self.engine.update(now);

            if let Some(level) = self.outcome.level.take() {
                self.settings.current_level = level;
                self.settings.save_current_level(self.storage.as_mut());
                if is_badge_level(level) {
                    show_badge(level);
                }
            }

            if let Some(score) = self.outcome.final_score.take() {
                self.finish_run(score);
            }
        }

        fn finish_run(&mut self, score: u64) {
            self.audio.borrow_mut().stop_music();

            let new_best = self.high_scores.is_new_best(score);
            if let Some(rank) = self.high_scores.add_score(score, js_sys::Date::now()) {
                self.high_scores.save(self.storage.as_mut());
                log::info!("Score {} ranked #{}", score, rank);
            }

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.get_element_by_id("final-score") {
                el.set_text_content(Some(&score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("new-best") {
                let _ = el.set_attribute("class", if new_best { "" } else { "hidden" });
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = self.engine.render(self.settings.theme_blend);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn toggle_pause(&mut self, now: u64) {
            let paused = self.engine.toggle_pause(now);
            let mut audio = self.audio.borrow_mut();
            if paused {
                audio.pause_music();
            } else if !self.engine.is_game_over() {
                audio.play_music();
            }
        }

        /// Pause and drop held keys when the page loses focus
        fn pause_for_focus_loss(&mut self, now: u64) {
            if let Some(keys) = &self.keys {
                keys.borrow_mut().release_all();
            }
            if !self.engine.is_paused() && !self.engine.is_game_over() {
                self.engine.pause(now);
                self.audio.borrow_mut().pause_music();
            }
        }

        fn toggle_mute(&mut self) {
            let audio_settings = {
                let mut audio = self.audio.borrow_mut();
                audio.toggle_mute();
                audio.settings()
            };
            self.settings.audio = audio_settings;
            self.settings.save_audio(self.storage.as_mut());
        }

        fn set_difficulty(&mut self, difficulty: Difficulty) {
            self.settings.difficulty = difficulty;
            self.settings.save_difficulty(self.storage.as_mut());
            log::info!("Difficulty set to {}", difficulty.as_str());
        }

        /// Start a fresh run, releasing the old engine's listeners first
        fn restart(&mut self) {
            self.engine.cleanup();
            let (engine, keys) = new_engine(self.playfield, &self.settings, &self.audio, &self.outcome);
            self.engine = engine;
            self.keys = keys;

            self.settings.current_level = 1;
            self.settings.save_current_level(self.storage.as_mut());
            show_badge(1);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, now: u64) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.engine.score().to_string()));
            }
            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.engine.level().to_string()));
            }
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.high_scores.top_score().to_string()));
            }

            // Active effects with seconds remaining
            if let Some(el) = document.get_element_by_id("hud-effects") {
                let run_time = self.engine.run_time(now);
                let text: Vec<String> = self
                    .engine
                    .active_effects()
                    .iter()
                    .map(|e| {
                        let remaining = e.expires_at.saturating_sub(run_time) as f32 / 1000.0;
                        format!("{} {:.1}s", e.kind.as_str(), remaining)
                    })
                    .collect();
                el.set_text_content(Some(&text.join(" · ")));
            }

            if let Some(el) = document.get_element_by_id("pause-menu") {
                let _ = el.set_attribute("class", if self.engine.is_paused() { "" } else { "hidden" });
            }
            if let Some(el) = document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", if self.engine.is_game_over() { "" } else { "hidden" });
            }
        }
    }

    fn new_engine(
        playfield: (f32, f32),
        settings: &Settings,
        audio: &Rc<RefCell<AudioManager>>,
        outcome: &Rc<Outcome>,
    ) -> (Engine, Option<Rc<RefCell<InputState>>>) {
        let now = platform::now_ms();
        let config = EngineConfig {
            width: playfield.0,
            height: playfield.1,
            difficulty: settings.difficulty,
            seed: now,
        };

        let on_over = outcome.clone();
        let on_level = outcome.clone();
        let collision_audio = audio.clone();
        let power_up_audio = audio.clone();
        let milestone_audio = audio.clone();

        let mut engine = Engine::new(config, now, move |score| on_over.final_score.set(Some(score)))
            .with_notifications(Notifications {
                on_collision: Some(Box::new(move |_shielded| {
                    collision_audio.borrow().play(SoundEffect::Collision);
                })),
                on_power_up: Some(Box::new(move |_kind| {
                    power_up_audio.borrow().play(SoundEffect::PowerUp);
                })),
                on_milestone: Some(Box::new(move |_score| {
                    milestone_audio.borrow().play(SoundEffect::ScoreMilestone);
                })),
                on_level_change: Some(Box::new(move |level, _theme| on_level.level.set(Some(level)))),
            });

        let keys = match web_sys::window().map(|w| KeyboardBinding::attach(&w)) {
            Some(Ok(binding)) => {
                let keys = binding.state();
                engine.attach_input(Box::new(binding));
                Some(keys)
            }
            Some(Err(e)) => {
                log::error!("Failed to bind keyboard: {:?}", e);
                None
            }
            None => None,
        };

        audio.borrow_mut().play_music();
        (engine, keys)
    }

    fn show_badge(level: u32) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("level-badge") {
            el.set_text_content(Some(&format!("Level {}", level)));
            let _ = el.set_attribute("class", "badge show");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Sky Dodge starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };

        // Fit the playfield to the window, capped at the default size
        let inner = |v: Result<JsValue, JsValue>, fallback: f32| {
            v.ok().and_then(|v| v.as_f64()).map(|v| v as f32).unwrap_or(fallback)
        };
        let inner_w = inner(window.inner_width(), PLAYFIELD_WIDTH + 32.0);
        let inner_h = inner(window.inner_height(), PLAYFIELD_HEIGHT + 200.0);
        let playfield = (
            PLAYFIELD_WIDTH.min(inner_w - 32.0).max(1.0).floor(),
            PLAYFIELD_HEIGHT.min(inner_h - 200.0).max(1.0).floor(),
        );

        let dpr = window.device_pixel_ratio();
        let width = (playfield.0 as f64 * dpr) as u32;
        let height = (playfield.1 as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let _ = canvas.set_attribute(
            "style",
            &format!("width:{}px;height:{}px", playfield.0, playfield.1),
        );

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => surface,
            Err(e) => {
                log::error!("Failed to create surface: {}", e);
                return;
            }
        };

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(e) => {
                log::error!("Failed to get adapter: {}", e);
                return;
            }
        };

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = match RenderState::new(surface, &adapter, width, height, playfield).await {
            Ok(render_state) => Some(render_state),
            Err(e) => {
                log::error!("Failed to create device: {}", e);
                None
            }
        };

        let storage = persistence::default_storage();
        let settings = Settings::load(&*storage);
        let high_scores = HighScores::load(&*storage);
        let audio = Rc::new(RefCell::new(AudioManager::new(settings.audio)));
        let outcome = Rc::new(Outcome::default());

        let (engine, keys) = new_engine(playfield, &settings, &audio, &outcome);
        let game = Rc::new(RefCell::new(Game {
            engine,
            render_state,
            storage,
            settings,
            high_scores,
            audio,
            outcome,
            keys,
            playfield,
        }));
        show_badge(1);

        setup_control_keys(&window, game.clone());
        setup_restart_button(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Sky Dodge running!");
    }

    /// Pause, mute, restart and difficulty keys. Movement keys belong to
    /// the engine's own binding.
    fn setup_control_keys(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            let game_over = g.engine.is_game_over();
            match event.key().as_str() {
                "Escape" | "p" | "P" => g.toggle_pause(platform::now_ms()),
                "m" | "M" => g.toggle_mute(),
                "Enter" | " " if game_over => g.restart(),
                "1" if game_over => g.set_difficulty(Difficulty::Easy),
                "2" if game_over => g.set_difficulty(Difficulty::Medium),
                "3" if game_over => g.set_difficulty(Difficulty::Hard),
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_restart_button(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().pause_for_focus_loss(platform::now_ms());
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document
                .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().pause_for_focus_loss(platform::now_ms());
                log::info!("Auto-paused (window blur)");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            let now = platform::now_ms();
            g.update(now);
            g.render();
            g.update_hud(now);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run driven by a simple autopilot
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::cell::Cell;
    use std::rc::Rc;

    use sky_dodge::persistence::MemoryStorage;
    use sky_dodge::sim::{Difficulty, Engine, EngineConfig, Notifications, ThemeBlend, is_badge_level};
    use sky_dodge::HighScores;

    const FRAME_MS: u64 = 16;
    const MAX_RUN_MS: u64 = 180_000;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let difficulty = args
        .next()
        .and_then(|s| Difficulty::parse(&s))
        .unwrap_or_default();
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    log::info!("Sky Dodge (native) starting headless autopilot run...");
    log::info!("The playable version runs in the browser - build for wasm32");

    let final_score = Rc::new(Cell::new(None));
    let sink = final_score.clone();
    let mut engine = Engine::new(
        EngineConfig {
            difficulty,
            seed,
            ..Default::default()
        },
        0,
        move |score| sink.set(Some(score)),
    )
    .with_notifications(Notifications {
        on_power_up: Some(Box::new(|kind| log::info!("Collected {}", kind.as_str()))),
        on_level_change: Some(Box::new(|level, theme| {
            if is_badge_level(level) {
                log::info!("Level {} badge ({:?})", level, theme);
            }
        })),
        ..Default::default()
    });

    let mut now = 0;
    while !engine.is_game_over() && now < MAX_RUN_MS {
        let (left, right) = autopilot::steer(engine.state());
        engine.set_intent(left, right);
        engine.update(now);
        now += FRAME_MS;
    }

    let score = final_score.get().unwrap_or(engine.score());
    let mut storage = MemoryStorage::new();
    let mut high_scores = HighScores::load(&storage);
    high_scores.add_score(score, now as f64);
    high_scores.save(&mut storage);

    println!(
        "{} run (seed {}): score {}, level {}, {}",
        difficulty.as_str(),
        seed,
        score,
        engine.level(),
        if engine.is_game_over() { "crashed" } else { "survived" }
    );
    println!(
        "Last frame: {} vertices",
        engine.render(ThemeBlend::Step).len()
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use sky_dodge::sim::GameState;

    /// Look-ahead above the player for obstacles worth dodging
    const LOOKAHEAD: f32 = 220.0;
    const CLEARANCE: f32 = 12.0;

    /// Dodge the nearest obstacle in the player's column, otherwise drift
    /// toward the nearest power-up. Returns `(left, right)`.
    pub fn steer(state: &GameState) -> (bool, bool) {
        let player = state.player.bounds();
        let center = state.player.center().x;

        let threat = state
            .obstacles
            .iter()
            .filter(|o| o.pos.y + o.size.y > player.min.y - LOOKAHEAD && o.pos.y < player.max.y)
            .filter(|o| {
                o.pos.x < player.max.x + CLEARANCE && o.pos.x + o.size.x > player.min.x - CLEARANCE
            })
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        if let Some(o) = threat {
            let room_left = o.pos.x - CLEARANCE;
            let room_right = state.width - (o.pos.x + o.size.x) - CLEARANCE;
            let go_left = if center < o.pos.x + o.size.x * 0.5 {
                room_left >= player.width()
            } else {
                room_right < player.width()
            };
            return (go_left, !go_left);
        }

        let target = state
            .power_ups
            .iter()
            .filter(|p| !p.collected)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|p| p.pos.x + p.size.x * 0.5)
            .unwrap_or(state.width * 0.5);

        if (target - center).abs() < state.player.speed {
            (false, false)
        } else {
            (target < center, target > center)
        }
    }
}
