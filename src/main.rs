//! Stack Game entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, TouchEvent};

    use stack_game::audio::AudioManager;
    use stack_game::consts::SIM_DT;
    use stack_game::platform::{self, KvStore};
    use stack_game::renderer::RenderState;
    use stack_game::sim::{AutoPlayer, GameEvent, GamePhase};
    use stack_game::{Session, Settings, StoredHighScore, Tuning, share};

    // Farcaster Mini App SDK bridge (the host page exposes the SDK as `window.miniapp`)
    #[wasm_bindgen(inline_js = "
        function sdk() {
            return window.miniapp || null;
        }

        export function mini_app_ready() {
            const s = sdk();
            if (s && s.actions && s.actions.ready) {
                s.actions.ready();
            }
        }

        export function can_compose_cast() {
            const s = sdk();
            return !!(s && s.actions && s.actions.composeCast);
        }

        export function compose_cast(text) {
            const s = sdk();
            if (s && s.actions && s.actions.composeCast) {
                s.actions.composeCast({ text });
                return true;
            }
            return false;
        }
    ")]
    extern "C" {
        fn mini_app_ready();
        fn can_compose_cast() -> bool;
        fn compose_cast(text: &str) -> bool;
    }

    type Store = StoredHighScore<Box<dyn KvStore>>;

    /// Frames a perfect-stack flash lasts
    const FLASH_FRAMES: f32 = 20.0;

    /// Game instance holding all state
    struct Game {
        session: Session<Store>,
        render_state: Option<RenderState>,
        audio: AudioManager,
        settings: Settings,
        settings_store: Box<dyn KvStore>,
        last_time: f64,
        /// Remaining perfect-flash frames
        flash: f32,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_phase: GamePhase,
    }

    impl Game {
        fn new() -> Self {
            let settings_store = platform::default_store();
            let settings = Settings::load(settings_store.as_ref());
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);

            let mut session = Session::new(
                Tuning::default(),
                StoredHighScore::new(platform::default_store()),
            );
            if settings.demo_mode {
                session.set_autoplay(Some(AutoPlayer::new(js_sys::Date::now() as u64, 0.25)));
            }

            Self {
                session,
                render_state: None,
                audio,
                settings,
                settings_store,
                last_time: 0.0,
                flash: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Idle,
            }
        }

        /// Player tap: resume audio (needs a gesture) and latch the input
        fn tap(&mut self) {
            self.audio.resume();
            if self.session.autoplay_enabled() {
                // Any real input takes over from the demo
                self.set_demo(false);
                self.session.start();
                return;
            }
            self.session.tap();
        }

        fn set_demo(&mut self, enabled: bool) {
            let player = enabled.then(|| AutoPlayer::new(js_sys::Date::now() as u64, 0.25));
            self.session.set_autoplay(player);
            self.settings.demo_mode = enabled;
            self.save_settings();
            log::info!("Demo mode {}", if enabled { "on" } else { "off" });
        }

        fn save_settings(&mut self) {
            if let Err(e) = self.settings.save(self.settings_store.as_mut()) {
                log::warn!("Failed to save settings: {e}");
            }
        }

        /// Run simulation ticks and react to events
        fn update(&mut self, dt: f32, time: f64) {
            let events = self.session.update(dt);
            self.audio.play_events(&events);

            for event in &events {
                match event {
                    GameEvent::PerfectStack { .. } if self.settings.effective_flash() => {
                        self.flash = FLASH_FRAMES;
                    }
                    GameEvent::GameOver { final_score } => {
                        log::info!("Run finished with score {final_score}");
                    }
                    _ => {}
                }
            }
            self.flash = (self.flash - 1.0).max(0.0);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let snap = self.session.snapshot();
            let flash = self.flash / FLASH_FRAMES;
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&snap, flash) {
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

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = &self.session.state;

            let set_text = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            set_text("#hud-score .hud-value", &state.score.to_string());
            set_text("#hud-diamonds .hud-value", &state.diamonds.to_string());
            set_text("#hud-best .hud-value", &self.session.player_best().to_string());
            if self.settings.show_fps {
                set_text("#hud-fps .hud-value", &self.fps.to_string());
            }

            if state.phase == self.last_phase {
                return;
            }
            self.last_phase = state.phase;

            // Overlay only changes on phase transitions
            if let Some(el) = document.get_element_by_id("game-over") {
                if state.phase == GamePhase::Running {
                    let _ = el.set_attribute("class", "hidden");
                } else {
                    let _ = el.set_attribute("class", "");
                }
            }

            let played = state.phase == GamePhase::GameOver;
            set_text(
                "#overlay-title",
                if played { "Game Over" } else { "Stack Game" },
            );
            set_text("#final-score", &state.score.to_string());
            set_text("#final-best", &self.session.player_best().to_string());
            set_text("#final-diamonds", &state.diamonds.to_string());
            set_text(
                "#restart-btn",
                if played { "Play Again" } else { "Start Game" },
            );
            if let Some(record) = self.session.store().record() {
                if record.achieved_at > 0.0 {
                    set_text(
                        "#final-best-date",
                        &stack_game::highscores::format_date(record.achieved_at),
                    );
                }
            }

            if let Some(el) = document.get_element_by_id("share-btn") {
                let shareable = played && share::can_share(state.score) && can_compose_cast();
                let _ = el.set_attribute("class", if shareable { "" } else { "hidden" });
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Stack Game starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new()));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
                            Err(e) => log::error!("Failed to create device: {e}"),
                        }
                    }
                    Err(e) => log::error!("No graphics adapter: {e}"),
                }
            }
            Err(e) => log::error!("Failed to create surface: {e}"),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_overlay_buttons(game.clone());
        setup_mute_on_blur(game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        mini_app_ready();
        request_animation_frame(game);

        log::info!("Stack Game running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click - tap
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().tap();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - tap (suppress the synthetic mouse event)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().tap();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    " " | "Enter" => {
                        event.prevent_default();
                        g.tap();
                    }
                    "i" | "I" => {
                        let enabled = !g.session.autoplay_enabled();
                        g.set_demo(enabled);
                    }
                    "m" | "M" => {
                        g.settings.muted = !g.settings.muted;
                        let muted = g.settings.muted;
                        g.audio.set_muted(muted);
                        g.save_settings();
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_overlay_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        // Start / Play Again
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                game.borrow_mut().tap();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Share Score
        if let Some(btn) = document.get_element_by_id("share-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                event.stop_propagation();
                let score = game.borrow().session.state.score;
                if !compose_cast(&share::score_cast_text(score)) {
                    log::warn!("Mini App SDK not available, cannot share");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Share the app
        if let Some(btn) = document.get_element_by_id("invite-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                if !compose_cast(share::invite_cast_text()) {
                    log::warn!("Mini App SDK not available, cannot share");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_mute_on_blur(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                let muted = g.settings.muted;
                g.audio.set_muted(muted);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stack Game (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| stack_game::Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) => {
                log::error!("Bad tuning file {path}: {e}");
                std::process::exit(1);
            }
        },
        None => stack_game::Tuning::default(),
    };

    headless_demo(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Let the demo player run a few games and report how they went
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo(tuning: stack_game::Tuning) {
    use stack_game::sim::{AutoPlayer, GameEvent};
    use stack_game::{MemoryHighScore, Session};

    const GAMES: u32 = 5;
    const MAX_STEPS: u32 = 200_000;

    let seed = stack_game::platform::now_ms() as u64;
    let mut session = Session::new(tuning, MemoryHighScore::default());
    session.set_autoplay(Some(AutoPlayer::new(seed, 0.25)));

    let mut finished = 0;
    let mut steps = 0;
    while finished < GAMES && steps < MAX_STEPS {
        session.step();
        steps += 1;
        for event in session.collect_events() {
            match event {
                GameEvent::GameOver { final_score } => {
                    finished += 1;
                    println!(
                        "game {finished}: score {final_score}, perfect stacks {}, diamonds {}",
                        session.state.perfect_stack_count, session.state.diamonds
                    );
                }
                GameEvent::DiamondAwarded { diamonds } => {
                    log::debug!("diamond #{diamonds}");
                }
                _ => {}
            }
        }
    }

    println!(
        "best {} over {finished} games ({steps} ticks, seed {seed})",
        session.state.high_score
    );
}
