//! Rocket Lander entry point
//!
//! On the web this sets up the canvas, WebGPU and DOM input and runs the
//! animation-frame loop. Natively it flies a scripted autopilot headlessly.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use rocket_lander::Tuning;
    use rocket_lander::consts::*;
    use rocket_lander::platform::{Controls, Key};
    use rocket_lander::renderer::{RenderState, build_scene};
    use rocket_lander::sim::{GameState, tick};

    struct Game {
        state: GameState,
        controls: Controls,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        /// Set once a touch pointer is seen; on-screen buttons are drawn from then on
        touch_ui: bool,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed, Tuning::default()),
                controls: Controls::default(),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                touch_ui: false,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.controls.tick_input(!self.state.rocket.is_flying());
                tick(&mut self.state, &input, SIM_DT);
                self.controls.end_frame();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let layout = self.touch_ui.then_some(&self.controls.layout);
            let vertices = build_scene(&self.state, layout);
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

        /// Update status overlay and telemetry in the DOM
        fn update_hud(&self, document: &web_sys::Document) {
            if let Some(el) = document.get_element_by_id("status") {
                match self.state.status_text() {
                    Some(text) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            if let Some(el) = document.get_element_by_id("telemetry") {
                let t = self.state.telemetry();
                let mark = |safe: bool| if safe { "ok" } else { "!!" };
                el.set_text_content(Some(&format!(
                    "V {:6.1} {}  H {:6.1} {}  Tilt {:5.1}° {}",
                    t.vertical_speed,
                    mark(t.vertical_safe),
                    t.horizontal_drift,
                    mark(t.drift_safe),
                    t.tilt,
                    mark(t.tilt_safe),
                )));
            }
        }
    }

    /// Pointer position in playfield units
    fn playfield_pos(canvas: &HtmlCanvasElement, event: &PointerEvent) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let w = rect.width().max(1.0) as f32;
        let h = rect.height().max(1.0) as f32;
        let x = event.client_x() as f32 - rect.left() as f32;
        let y = event.client_y() as f32 - rect.top() as f32;
        Vec2::new(x / w * SCREEN_WIDTH, y / h * SCREEN_HEIGHT)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Rocket Lander starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(
            surface,
            &adapter,
            width,
            height,
            Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        )
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_keyboard(&window, game.clone())?;
        setup_pointer(&canvas, game.clone())?;
        setup_focus_loss(&window, game.clone())?;
        setup_resize(&window, &canvas, game.clone())?;

        request_animation_frame(game);

        log::info!("Rocket Lander running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_code(&event.code()) {
                    if key.is_flight_key() {
                        event.prevent_default();
                    }
                    game.borrow_mut().controls.key_down(key);
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(key) = Key::from_code(&event.code()) {
                game.borrow_mut().controls.key_up(key);
            }
        });
        window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Pointer down
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let pos = playfield_pos(&canvas_clone, &event);
                let mut g = game.borrow_mut();
                if event.pointer_type() == "touch" && !g.touch_ui {
                    g.touch_ui = true;
                    log::info!("Touch controls enabled");
                }
                g.controls.pointer_down(event.pointer_id(), pos);
            });
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let pos = playfield_pos(&canvas_clone, &event);
                game.borrow_mut().controls.pointer_move(event.pointer_id(), pos);
            });
            canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer up / cancel / leave all release the pointer
        for name in ["pointerup", "pointercancel", "pointerleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                game.borrow_mut().controls.pointer_up(event.pointer_id());
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_focus_loss(window: &web_sys::Window, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        // Key-up events are lost while unfocused
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().controls.clear();
            log::debug!("Controls cleared (window blur)");
        });
        window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_resize(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let width = (canvas.client_width() as f64 * dpr) as u32;
            let height = (canvas.client_height() as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(ref mut render_state) = game.borrow_mut().render_state {
                render_state.resize(width, height);
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
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

            g.update(dt);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use rocket_lander::consts::SIM_DT;
    use rocket_lander::sim::{GameState, TickInput, Touchdown, tick};

    /// Give up after two minutes of simulated flight
    const MAX_TICKS: u64 = 60 * 120;

    /// Steer toward the pad centre and brake the descent.
    ///
    /// Positive tilt points the thrust toward +x; the left pitch thruster
    /// raises tilt and the right one lowers it.
    pub fn autopilot(state: &GameState) -> TickInput {
        let rocket = &state.rocket;
        let tuning = &state.tuning;
        let (target, ground) = match &state.terrain.landing_pad {
            Some(pad) => (Vec2::new((pad.x_start + pad.x_end) / 2.0, pad.y), pad.y),
            None => (tuning.spawn, tuning.pad_y()),
        };
        let bottom = rocket.bottom_point();
        let altitude = ground - bottom.y;

        let wanted_drift = ((target.x - bottom.x) * 0.5).clamp(-30.0, 30.0);
        let wanted_tilt = if altitude < 30.0 {
            0.0
        } else {
            ((wanted_drift - rocket.vel.x) * 0.5).clamp(-12.0, 12.0)
        };
        let turn = (wanted_tilt - rocket.angle) * 2.0 - rocket.angular_vel;

        let wanted_sink = (altitude * 0.25).clamp(10.0, 80.0);
        let brake = rocket.vel.y > wanted_sink;

        TickInput {
            left: brake,
            right: brake,
            pitch_left: turn > 4.0,
            pitch_right: turn < -4.0,
            reset: false,
        }
    }

    /// Fly one level; `None` if the flight never ended
    pub fn fly(state: &mut GameState) -> Option<Touchdown> {
        while state.time_ticks < MAX_TICKS {
            let input = autopilot(state);
            if let Some(touchdown) = tick(state, &input, SIM_DT) {
                return Some(touchdown);
            }
            if state.time_ticks % 60 == 0 {
                let t = state.telemetry();
                log::debug!(
                    "t={}s pos=({:.0}, {:.0}) vy={:.1} vx={:.1} tilt={:.1}",
                    state.time_ticks / 60,
                    state.rocket.pos.x,
                    state.rocket.pos.y,
                    t.vertical_speed,
                    t.horizontal_drift,
                    t.tilt
                );
            }
        }
        None
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use rocket_lander::{ControlScheme, Tuning};
    use rocket_lander::sim::GameState;

    env_logger::init();
    log::info!("Rocket Lander (native) starting...");
    log::info!("Native mode flies a headless autopilot - build for wasm32 to play");

    // rocket-lander [--control <scheme>] [tuning.json] [seed]
    let mut control: Option<ControlScheme> = None;
    let mut positional = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--control" {
            let name = args.next().context("--control needs a scheme name")?;
            control = Some(
                name.parse()
                    .with_context(|| format!("invalid control scheme {name:?}"))?,
            );
        } else {
            positional.push(arg);
        }
    }
    let mut positional = positional.into_iter();

    let mut tuning = match positional.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading tuning file {path}"))?;
            Tuning::from_json(&json).with_context(|| format!("parsing tuning file {path}"))?
        }
        None => Tuning::default(),
    };
    if let Some(control) = control {
        tuning.control = control;
    }
    let seed = match positional.next() {
        Some(s) => s.parse().with_context(|| format!("invalid seed {s:?}"))?,
        None => 1,
    };
    log::info!("Control scheme: {}", tuning.control.as_str());

    let mut state = GameState::new(seed, tuning);
    match headless::fly(&mut state) {
        Some(touchdown) => {
            let t = state.telemetry();
            log::info!(
                "Flight over after {} ticks: {:?} (vy {:.1}, vx {:.1}, tilt {:.1})",
                state.time_ticks,
                touchdown,
                t.vertical_speed,
                t.horizontal_drift,
                t.tilt
            );
            println!("{}", state.status_text().unwrap_or("FLYING"));
        }
        None => {
            log::warn!("Autopilot still airborne after {} ticks", state.time_ticks);
        }
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
