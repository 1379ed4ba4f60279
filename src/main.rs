//! Tinyball entry point
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
    use web_sys::{HtmlCanvasElement, PointerEvent};

    use tinyball::audio::{AudioManager, SoundEffect};
    use tinyball::consts::{BASE_WIDTH, SIM_DT_MS};
    use tinyball::presence::PresenceClient;
    use tinyball::renderer::{Overlay, RenderState, SceneStyle, Viewport, scene};
    use tinyball::{Arena, GameConfig};

    /// Game instance holding all state
    struct Game {
        arena: Arena<Overlay>,
        render_state: Option<RenderState>,
        viewport: Viewport,
        style: SceneStyle,
        audio: AudioManager,
        presence: Option<PresenceClient>,
        canvas: HtmlCanvasElement,
        last_time: f64,
        /// Last (score, players) written to the HUD
        last_hud: Option<(u32, Option<usize>)>,
    }

    impl Game {
        fn update(&mut self, dt: f32) {
            self.arena.update(dt);

            for event in self.arena.drain_launch_events() {
                self.audio.play(SoundEffect::from(&event));
            }
            for event in self.arena.drain_contact_events() {
                self.audio.play(SoundEffect::from(&event));
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = {
                let launcher = self.arena.launcher();
                scene::build(self.arena.world(), launcher.canvas(), &self.style)
            };
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

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let players = self.presence.as_ref().map(|p| p.view().clients.len());
            let hud = (self.arena.score(), players);
            if self.last_hud == Some(hud) {
                return;
            }
            self.last_hud = Some(hud);

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.0.to_string()));
            }
            if let (Some(players), Some(el)) = (
                players,
                document.query_selector("#hud-players .hud-value").ok().flatten(),
            ) {
                el.set_text_content(Some(&players.to_string()));
            }
        }

        /// Scale the canvas element to the window
        fn on_viewport_resize(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
            let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);

            self.viewport.on_viewport_resize(width as f32, height as f32);
            let style = self.canvas.style();
            let _ = style.set_property("transform", &self.viewport.css_transform());
            let _ = style.set_property("transform-origin", "top left");
        }
    }

    /// Drags are measured in client pixels, whatever the canvas scale
    fn client_point(event: &PointerEvent) -> Vec2 {
        Vec2::new(event.client_x() as f32, event.client_y() as f32)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Tinyball starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let config = GameConfig::load(GameConfig::page_default());

        // Drawing buffer matches the playfield; CSS scaling handles the window
        let (width, height) = (config.world.playfield.0 as u32, config.world.playfield.1 as u32);
        canvas.set_width(width);
        canvas.set_height(height);

        let arena = Arena::new(&config, Overlay::new()).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let presence = config.presence_url.as_deref().and_then(|url| {
            PresenceClient::connect(url)
                .inspect_err(|e| log::warn!("Presence unavailable: {:?}", e))
                .ok()
        });

        let game = Rc::new(RefCell::new(Game {
            arena,
            render_state: None,
            viewport: Viewport::new(BASE_WIDTH),
            style: SceneStyle::default(),
            audio: AudioManager::new(config.audio.clone()),
            presence,
            canvas: canvas.clone(),
            last_time: 0.0,
            last_hud: None,
        }));
        game.borrow_mut().on_viewport_resize();

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let playfield = Vec2::new(config.world.playfield.0, config.world.playfield.1);
        match RenderState::new(surface, &adapter, width, height, playfield).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_input_handlers(&canvas, game.clone())?;

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Tinyball running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Drag starts on the canvas only
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.arena.pointer_down(client_point(&event));
            });
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Move and release are tracked document-wide so a drag can leave the canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                game.borrow_mut().arena.pointer_move(client_point(&event));
            });
            document.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                game.borrow_mut().arena.pointer_up(client_point(&event));
            });
            document.add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().on_viewport_resize();
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
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
                SIM_DT_MS / 1000.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
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
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Tinyball (native) starting...");
    log::info!("The game runs in the browser - build with `trunk serve` for the web version");

    println!("\nRunning launch self-check...");
    self_check();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Fling the ball off the right edge and confirm it comes back
#[cfg(not(target_arch = "wasm32"))]
fn self_check() {
    use glam::Vec2;
    use tinyball::launch::ForecastStep;
    use tinyball::{Arena, GameConfig, LaunchEvent};

    let mut arena = match Arena::new(&GameConfig::page_default(), Vec::<ForecastStep>::new()) {
        Ok(arena) => arena,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            return;
        }
    };

    arena.pointer_down(Vec2::new(0.0, 300.0));
    arena.pointer_move(Vec2::new(900.0, 280.0));
    arena.update(0.02);
    let dots = arena.launcher().canvas().len();
    let force = arena.pointer_up(Vec2::new(900.0, 280.0));

    let mut respawned = false;
    for _ in 0..300 {
        arena.update(1.0 / 60.0);
        respawned |= arena
            .drain_launch_events()
            .iter()
            .any(|e| matches!(e, LaunchEvent::Respawned { .. }));
        if respawned {
            break;
        }
    }

    println!("  forecast dots while aiming: {}", dots);
    println!("  launch force: {:?}", force);
    println!("  respawned after leaving the playfield: {}", respawned);
    if force.is_some() && respawned {
        println!("✓ Launch self-check passed!");
    } else {
        println!("✗ Launch self-check failed");
    }
}
