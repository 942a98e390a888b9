//! Fruit Fall entry point
//!
//! Browser build: fixed-timestep loop over requestAnimationFrame, keyboard
//! and device-tilt input, DOM HUD. Native build: headless autopilot demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use fruit_fall::Settings;
    use fruit_fall::consts::*;
    use fruit_fall::renderer::CanvasRenderer;
    use fruit_fall::sim::{GamePhase, GameState, TickInput, tick};
    use fruit_fall::ui::Hud;

    /// Held arrow/letter keys, resolved to a direction each frame
    #[derive(Default)]
    struct KeyState {
        left: bool,
        right: bool,
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<CanvasRenderer>,
        hud: Hud,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        keys: KeyState,
        /// Latest tilt reading mapped to a direction
        tilt_direction: i8,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, hud: Hud, settings: Settings) -> Self {
            Self {
                state: GameState::new(seed),
                renderer: None,
                hud,
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                keys: KeyState::default(),
                tilt_direction: 0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Keyboard has priority over tilt
        fn resolve_direction(&self) -> i8 {
            if self.keys.left {
                -1
            } else if self.keys.right {
                1
            } else {
                self.tilt_direction
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;
            self.input.direction = self.resolve_direction();

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.start = false;
                self.input.reset = false;
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

        /// Render the current frame
        fn render(&mut self, dt: f32) {
            let trails = self.settings.trails;
            if let Some(ref mut renderer) = self.renderer {
                renderer.render(&self.state, dt, trails);
            }
        }

        fn update_hud(&self) {
            self.hud
                .update(&self.state, self.fps, self.settings.show_fps);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Fruit Fall starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        size_canvas(&canvas);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let hud = Hud::new(document.clone());
        let game = Rc::new(RefCell::new(Game::new(seed, hud, settings)));

        log::info!("Game initialized with seed: {}", seed);

        let renderer = CanvasRenderer::new(canvas.clone()).expect("2d context unavailable");
        game.borrow_mut().renderer = Some(renderer);

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_resize(canvas);

        // Start game loop
        request_animation_frame(game);

        log::info!("Fruit Fall running!");
    }

    /// Match the backing store to the client size and device pixel ratio
    fn size_canvas(canvas: &HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keyboard press
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.keys.left = true,
                    "ArrowRight" | "d" | "D" => g.keys.right = true,
                    " " | "Enter" => match g.state.phase {
                        GamePhase::Menu => g.input.start = true,
                        GamePhase::GameOver { .. } => g.input.reset = true,
                        GamePhase::Playing => {}
                    },
                    "i" | "I" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard release
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.keys.left = false,
                    "ArrowRight" | "d" | "D" => g.keys.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Device tilt (mobile steering)
        {
            let game = game.clone();
            let closure =
                Closure::<dyn FnMut(_)>::new(move |event: web_sys::DeviceOrientationEvent| {
                    let angle = web_sys::window()
                        .and_then(|w| w.screen().ok())
                        .and_then(|s| s.orientation().angle().ok())
                        .unwrap_or(0);

                    // In landscape the steering axis is beta; portrait falls
                    // back to gamma
                    let tilt = match angle {
                        90 => event.beta().unwrap_or(0.0),
                        270 => -event.beta().unwrap_or(0.0),
                        _ => event.gamma().unwrap_or(0.0),
                    };

                    let mut g = game.borrow_mut();
                    g.tilt_direction = g.settings.tilt_to_direction(tilt as f32);
                });
            let _ = window.add_event_listener_with_callback(
                "deviceorientation",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Start button on the menu screen
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.start = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Back-to-menu button on the game-over screen
        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.reset = true;
                log::info!("Returning to menu");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            size_canvas(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
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
            g.render(dt);
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use fruit_fall::consts::SIM_DT;
    use fruit_fall::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Fruit Fall (native) starting...");
    log::info!("No native window - running the headless autopilot demo");

    let mut state = GameState::new(0xF00D);
    tick(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
        SIM_DT,
    );

    // Let the autopilot play for up to two minutes of simulated time
    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let max_ticks = (120.0 / SIM_DT) as u32;
    for _ in 0..max_ticks {
        tick(&mut state, &input, SIM_DT);
        if let GamePhase::GameOver { won } = state.phase {
            log::info!("demo run finished: won = {won}");
            break;
        }
    }

    println!(
        "final score: {} after {:.1}s ({:?})",
        state.score,
        state.time_ticks as f32 * SIM_DT,
        state.phase
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
