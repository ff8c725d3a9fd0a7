//! Boshki Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use boshki_shooter::Tuning;
    use boshki_shooter::consts::*;
    use boshki_shooter::platform::{Command, InputState, command_for};
    use boshki_shooter::renderer::{self, canvas::CanvasSurface};
    use boshki_shooter::sim::{GamePhase, GameState, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        surface: CanvasSurface,
        input: InputState,
        accumulator: f32,
        last_time: f64,
        // Track phase for transition logging
        last_phase: GamePhase,
    }

    impl Game {
        fn new(state: GameState, surface: CanvasSurface) -> Self {
            Self {
                last_phase: state.phase,
                state,
                surface,
                input: InputState::default(),
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run simulation frames for `dt_ms` of wall-clock time
        fn update(&mut self, dt_ms: f32) {
            self.accumulator += dt_ms.min(MAX_FRAME_DELTA_MS);

            let mut substeps = 0;
            while self.accumulator >= FRAME_MS && substeps < MAX_SUBSTEPS {
                let input = self.input.tick_input();
                tick(&mut self.state, &input, FRAME_MS);
                self.accumulator -= FRAME_MS;
                substeps += 1;

                self.input.clear_one_shots();
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(FRAME_MS);
            }

            let current_phase = self.state.phase;
            if current_phase != self.last_phase {
                if current_phase == GamePhase::GameOver {
                    log::info!("Final score {} - press R or Enter to play again", self.state.score);
                }
                self.last_phase = current_phase;
            }
        }

        fn render(&mut self) {
            renderer::render(&mut self.surface, &self.state, self.input.pointer);
        }

        /// Reset game state for restart
        fn restart(&mut self, seed: u64) {
            self.state.reset(seed);
            self.last_phase = self.state.phase;
            self.accumulator = 0.0;
            self.input.release_all();
            self.input.clear_one_shots();
        }

        /// Request a pause unless one is already pending
        fn auto_pause(&mut self, reason: &str) {
            self.input.release_all();
            if self.state.phase == GamePhase::Playing && !self.input.pause {
                self.input.pause = true;
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("logger init failed: {}", e).into());
        }

        log::info!("Boshki Shooter starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no #gameCanvas element")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()?;

        let bounds = Vec2::new(canvas.width() as f32, canvas.height() as f32);
        let seed = js_sys::Date::now() as u64;
        let state = GameState::new(seed, bounds, Tuning::load());
        let game = Rc::new(RefCell::new(Game::new(state, CanvasSurface::new(ctx)?)));

        setup_input_handlers(&canvas, game.clone())?;
        setup_auto_pause(game.clone())?;

        request_animation_frame(game);

        log::info!("Boshki Shooter running!");
        Ok(())
    }

    fn canvas_origin(canvas: &HtmlCanvasElement) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(rect.left() as f32, rect.top() as f32)
    }

    fn client_pos(event: &MouseEvent) -> Vec2 {
        Vec2::new(event.client_x() as f32, event.client_y() as f32)
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Key down: movement keys are held, commands fire once
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                if g.input.set_key(&key, true) {
                    // Keep arrow keys from scrolling the page
                    event.prevent_default();
                    return;
                }
                if event.repeat() {
                    return;
                }
                match command_for(&key) {
                    Some(Command::TogglePause) => g.input.pause = true,
                    Some(Command::Restart) if g.state.is_over() => {
                        let seed = js_sys::Date::now() as u64;
                        g.restart(seed);
                        log::info!("Game restarted with seed: {}", seed);
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.set_key(&event.key(), false);
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse move - track the aim point in canvas coordinates
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let origin = canvas_origin(&canvas_clone);
                game.borrow_mut().input.set_pointer(client_pos(&event), origin);
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Click - fire toward the pointer
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let origin = canvas_origin(&canvas_clone);
                let mut g = game.borrow_mut();
                g.input.set_pointer(client_pos(&event), origin);
                let target = g.input.pointer;
                g.state.fire_at(target);
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            log::error!("no window, game loop stopped");
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::error!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                FRAME_MS
            };
            g.last_time = time;

            g.update(dt_ms);
            g.render();
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Boshki Shooter (native) starting...");
    log::info!("The playable build targets the browser - run with `trunk serve`");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1);
    let report = autopilot::run(seed, boshki_shooter::Tuning::load());
    println!(
        "seed {}: survived {} frames ({:.1} s), score {}, hits taken {}, final health {}",
        seed,
        report.frames,
        report.frames as f32 * boshki_shooter::consts::FRAME_MS / 1000.0,
        report.score,
        report.hits_taken,
        report.health
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless session driven by a simple bot, for balance checks
#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use boshki_shooter::consts::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, FRAME_MS};
    use boshki_shooter::sim::{Directions, GameState, TickInput, tick};
    use boshki_shooter::Tuning;
    use glam::Vec2;

    /// Give up after ten simulated minutes
    const MAX_FRAMES: u64 = 60 * 60 * 10;
    /// Frames between shots
    const FIRE_EVERY: u64 = 8;

    #[derive(Debug, PartialEq)]
    pub struct Report {
        pub frames: u64,
        pub score: u32,
        pub kills: u32,
        /// Enemies that reached the player
        pub hits_taken: u32,
        pub health: i32,
    }

    pub fn run(seed: u64, tuning: Tuning) -> Report {
        run_for(seed, tuning, MAX_FRAMES)
    }

    /// Play until the session ends or `max_frames` have been simulated
    pub fn run_for(seed: u64, tuning: Tuning, max_frames: u64) -> Report {
        let bounds = Vec2::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT);
        let mut state = GameState::new(seed, bounds, tuning);
        let mut hits_taken = 0;

        while !state.is_over() && state.frame < max_frames {
            let nearest = state
                .enemies
                .iter()
                .map(|e| e.pos)
                .min_by(|a, b| {
                    let center = state.player.center();
                    a.distance_squared(center).total_cmp(&b.distance_squared(center))
                });

            let mut keys = Directions::default();
            if let Some(threat) = nearest {
                if state.frame % FIRE_EVERY == 0 {
                    state.fire_at(threat);
                }
                // Back away from the closest enemy
                let away = state.player.center() - threat;
                keys.left = away.x < 0.0;
                keys.right = away.x > 0.0;
                keys.up = away.y < 0.0;
                keys.down = away.y > 0.0;
            }

            let report = tick(&mut state, &TickInput { keys, pause: false }, FRAME_MS);
            hits_taken += report.enemies_touched;

            if state.frame % 600 == 0 {
                log::debug!(
                    "frame {}: score {}, health {}, {} enemies",
                    state.frame,
                    state.score,
                    state.player.health,
                    state.enemies.len()
                );
            }
        }

        log::info!("Autopilot finished at frame {}", state.frame);
        Report {
            frames: state.frame,
            score: state.score,
            kills: state.kills,
            hits_taken,
            health: state.player.health,
        }
    }

}
