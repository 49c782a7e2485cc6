//! Rockfall entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use rockfall::audio::AudioManager;
    use rockfall::consts::*;
    use rockfall::platform::{KeyValueStore, StartupError, default_store};
    use rockfall::renderer::SdfRenderState;
    use rockfall::session::Session;
    use rockfall::settings::Settings;

    /// Game instance holding all state
    struct Game {
        session: Session<Box<dyn KeyValueStore>>,
        render_state: SdfRenderState,
        audio: AudioManager,
        settings: Settings,
        canvas: HtmlCanvasElement,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        // Track phase for DOM toggles
        was_dead: bool,
    }

    impl Game {
        /// Map a canvas-relative CSS x into world units
        fn pointer_to_world(&self, css_x: f32) -> f32 {
            let client_w = self.canvas.client_width().max(1) as f32;
            css_x * WIDTH / client_w
        }

        /// Run one frame: simulate, play cues, paint
        fn frame(&mut self, time: f64) {
            let report = self.session.frame(time);
            self.audio.play_frame(&report);

            match self.session.present(&mut self.render_state, time) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }

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

        /// Update HUD elements in DOM
        fn update_hud(&mut self, document: &Document) {
            let snapshot = self.session.snapshot();

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&snapshot.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    el.set_text_content(Some(&format!("{} fps", self.fps)));
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if snapshot.dead == self.was_dead {
                return;
            }
            self.was_dead = snapshot.dead;

            // Death screen toggles on the canvas container
            if let Some(parent) = self.canvas.parent_element() {
                let classes = parent.class_list();
                let _ = if snapshot.dead {
                    classes.add_1("dead")
                } else {
                    classes.remove_1("dead")
                };
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                if snapshot.dead {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&snapshot.score.to_string()));
                    }
                    if let Some(high_el) = document.get_element_by_id("high-score") {
                        high_el.set_text_content(Some(&snapshot.high_score.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        fn restart(&mut self) {
            self.session.new_game();
            self.audio.resume();
        }
    }

    pub async fn run() -> Result<(), StartupError> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            // Logger already installed (hot reload)
        }

        log::info!("Rockfall starting...");

        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoWindow)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(StartupError::NoCanvas)?
            .dyn_into()
            .map_err(|_| StartupError::NoCanvas)?;

        // Backing store at device resolution, world stays 480x640
        let dpr = window.device_pixel_ratio();
        let width = (WIDTH as f64 * dpr) as u32;
        let height = (HEIGHT as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let store = default_store();
        let settings = Settings::load_from(&store);
        let seed = js_sys::Date::now() as u64;
        let session = Session::new(seed, store);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StartupError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| StartupError::NoAdapter(e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        // Readiness gate: nothing ticks until the pipeline exists
        let mut render_state = SdfRenderState::new(surface, &adapter, width, height).await?;
        render_state.set_start_time(js_sys::Date::now());
        render_state.apply_settings(&settings);

        let mut audio = AudioManager::new();
        audio.set_volume(settings.effective_volume());

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state,
            audio,
            settings,
            canvas: canvas.clone(),
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
            was_dead: false,
        }));

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(&canvas, game.clone());
        setup_reset_button(&document, game.clone());
        setup_focus_handlers(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Rockfall running!");
        Ok(())
    }

    /// Put a fatal startup error where the player can see it
    pub fn show_startup_error(err: &StartupError) {
        log::error!("Startup failed: {}", err);
        let el = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("loading"));
        if let Some(el) = el {
            let _ = el.set_attribute("class", "error");
            el.set_text_content(Some(&format!("Cannot start: {}", err)));
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - absolute position
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let x = g.pointer_to_world(event.offset_x() as f32);
                g.session.set_pointer_x(Some(x));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move / start - first touch drives the player
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let rect = canvas_clone.get_bounding_client_rect();
                    let css_x = touch.client_x() as f32 - rect.left() as f32;
                    let x = g.pointer_to_world(css_x);
                    g.session.set_pointer_x(Some(x));
                }
            });
            let _ =
                canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard restart
        {
            let game = game.clone();
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if matches!(event.key().as_str(), "Enter" | "r" | "R") {
                    game.borrow_mut().restart();
                    log::info!("Game restarted from keyboard");
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_reset_button(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("reset") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
                log::info!("Game restarted");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_focus_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
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
            g.frame(time);
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        // Exactly one pending callback at a time
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        wasm_game::show_startup_error(&e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run at 60 fps with a simple dodging autopilot
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rockfall::Session;
    use rockfall::platform::default_store;

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5EED_u64);
    let max_minutes: f64 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5.0);

    log::info!("Rockfall (native) headless run, seed {}", seed);
    log::info!("Run with `trunk serve` for the web version");

    let mut session = Session::new(seed, default_store());
    let frame_ms = 1000.0 / 60.0;
    let frames = (max_minutes * 60_000.0 / frame_ms) as u64;
    let mut ts = 0.0;

    for _ in 0..frames {
        let x = autopilot::steer(&session.state);
        session.set_pointer_x(Some(x));
        if session.frame(ts).crashed() {
            break;
        }
        ts += frame_ms;
    }
    if !session.state.is_dead() {
        session.end_game();
    }

    println!(
        "final score: {}  high score: {}",
        session.state.display_score(),
        session.high_score().best
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use rockfall::consts::*;
    use rockfall::sim::{EntityKind, GameState};

    /// How far below the player row rocks are considered threats
    const LOOKAHEAD: f32 = 260.0;

    /// Pick the lane with the most clearance from upcoming rocks,
    /// nudged toward clocks
    pub fn steer(state: &GameState) -> f32 {
        let depth = state.depth;
        let current = state.player().map(|p| p.x).unwrap_or(WIDTH / 2.0);

        let lanes = (0..=((WIDTH - 2.0 * PLAYER_RADIUS) / 8.0) as i32)
            .map(|i| PLAYER_RADIUS + i as f32 * 8.0);

        let score = |x: f32| -> f32 {
            let mut clearance = f32::MAX;
            let mut bonus = 0.0;
            for e in &state.entities {
                let y = e.y(depth);
                if y < PLAYER_Y - e.radius || y > PLAYER_Y + LOOKAHEAD {
                    continue;
                }
                let dx = (e.x - x).abs() - e.radius - PLAYER_RADIUS;
                match e.kind {
                    EntityKind::Rock { .. } => clearance = clearance.min(dx),
                    EntityKind::Clock if dx < 0.0 => bonus += 20.0,
                    _ => {}
                }
            }
            // Prefer short moves when equally safe
            clearance.min(200.0) + bonus - (x - current).abs() * 0.05
        };

        lanes
            .max_by(|a, b| score(*a).total_cmp(&score(*b)))
            .unwrap_or(current)
    }
}
