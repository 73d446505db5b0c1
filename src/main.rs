//! Skyline Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use skyline_runner::assets::{ResourceManifest, Resources};
    use skyline_runner::hud::{HudSurface, TextAlign};
    use skyline_runner::platform::FrameClock;
    use skyline_runner::renderer::{Palette, RenderState, WebRenderer};
    use skyline_runner::sim::SeedPolicy;
    use skyline_runner::{DebugConfig, DeviceClass, Game, GameError, Tuning};

    /// HUD drawn on a 2D canvas layered over the WebGPU one
    struct CanvasHud {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl CanvasHud {
        fn new(canvas: HtmlCanvasElement) -> Result<Self, GameError> {
            let ctx = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
                .ok_or_else(|| GameError::AssetLoad("no 2d context for the HUD".to_string()))?;
            Ok(Self { canvas, ctx })
        }
    }

    impl HudSurface for CanvasHud {
        fn clear(&mut self) {
            let w = self.canvas.width() as f64;
            let h = self.canvas.height() as f64;
            self.ctx.clear_rect(0.0, 0.0, w, h);
        }

        fn draw_text(&mut self, x: f32, y: f32, text: &str, align: TextAlign) {
            let align = match align {
                TextAlign::Left => "left",
                TextAlign::Center => "center",
                TextAlign::Right => "right",
            };
            let size = (self.canvas.height() as f64 / 18.0).max(14.0);
            self.ctx.set_font(&format!("{size:.0}px sans-serif"));
            self.ctx.set_fill_style_str("black");
            self.ctx.set_text_align(align);
            self.ctx.set_text_baseline("top");
            if let Err(e) = self.ctx.fill_text(text, x as f64, y as f64) {
                log::warn!("HUD text failed: {e:?}");
            }
        }
    }

    type WebGame = Game<WebRenderer, CanvasHud>;

    const FPS_LOG_INTERVAL: u64 = 300;

    struct App {
        game: WebGame,
        clock: FrameClock,
    }

    async fn fetch_text(url: &str) -> Result<String, GameError> {
        let window = web_sys::window().ok_or_else(|| GameError::AssetLoad("no window".into()))?;
        let response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| GameError::AssetLoad(format!("fetch {url}: {e:?}")))?;
        let response: web_sys::Response = response
            .dyn_into()
            .map_err(|_| GameError::AssetLoad(format!("fetch {url}: not a response")))?;
        if !response.ok() {
            return Err(GameError::AssetLoad(format!(
                "fetch {url}: HTTP {}",
                response.status()
            )));
        }
        let text = response
            .text()
            .map_err(|e| GameError::AssetLoad(format!("read {url}: {e:?}")))?;
        JsFuture::from(text)
            .await
            .map_err(|e| GameError::AssetLoad(format!("read {url}: {e:?}")))?
            .as_string()
            .ok_or_else(|| GameError::AssetLoad(format!("read {url}: not text")))
    }

    async fn load_resources() -> Result<Resources, GameError> {
        let mut manifest = ResourceManifest::from_json(&fetch_text("images.json").await?)?;
        match fetch_text("animations.json").await {
            Ok(json) => manifest = manifest.with_animations(&json)?,
            Err(e) => log::warn!("No animations manifest ({e})"),
        }
        Resources::load(&manifest)
    }

    fn canvas_by_id(document: &web_sys::Document, id: &str) -> Option<HtmlCanvasElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    /// Match the backing store to the CSS size
    fn fit_canvas(canvas: &HtmlCanvasElement, dpr: f64) -> (u32, u32) {
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width.max(1));
        canvas.set_height(height.max(1));
        (width.max(1), height.max(1))
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Skyline Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas = canvas_by_id(&document, "canvas").expect("no canvas");
        let hud_canvas = canvas_by_id(&document, "hud").expect("no hud canvas");

        let dpr = window.device_pixel_ratio();
        let (width, height) = fit_canvas(&canvas, dpr);
        fit_canvas(&hud_canvas, dpr);

        let user_agent = window.navigator().user_agent().unwrap_or_default();
        let device = DeviceClass::from_user_agent(&user_agent);
        let tuning = match fetch_text("tuning.json").await {
            Ok(json) => Tuning::from_json(&json, device),
            Err(e) => {
                log::info!("No tuning overrides ({e})");
                Tuning::for_device(device)
            }
        };
        let search = window.location().search().unwrap_or_default();
        let debug = DebugConfig::from_query(&search);
        log::info!("Device: {}, debug: {}", device.as_str(), debug.any());

        let resources = match load_resources().await {
            Ok(resources) => resources,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = match RenderState::new(surface, &adapter, width, height).await {
            Ok(state) => state,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };
        let renderer = WebRenderer::new(render_state, Palette::from_resources(&resources));

        let hud = match CanvasHud::new(hud_canvas.clone()) {
            Ok(hud) => hud,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };

        let mut game = match Game::new(tuning, debug, SeedPolicy::Entropy, renderer, hud) {
            Ok(game) => game,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };
        game.resize(width, height);
        if let Err(e) = game.start(resources) {
            log::error!("{e}");
            return;
        }

        let app = Rc::new(RefCell::new(App {
            game,
            clock: FrameClock::new(),
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_resize(canvas, hud_canvas, app.clone());
        setup_focus_handlers(app.clone());

        request_animation_frame(app);

        log::info!("Skyline Runner running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                }
                app.borrow_mut().game.key_down(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.touch_start();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for name in ["touchend", "touchcancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.touch_end();
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, hud_canvas: HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
            let (width, height) = fit_canvas(&canvas, dpr);
            fit_canvas(&hud_canvas, dpr);
            app.borrow_mut().game.resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_focus_handlers(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut app = app.borrow_mut();
                    app.game.focus_lost();
                    app.clock.reset();
                    log::info!("Tab hidden, input cleared");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.focus_lost();
                log::info!("Window blurred, input cleared");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut app = app.borrow_mut();
            let dt = app.clock.tick(time);
            if app.clock.frame_count % FPS_LOG_INTERVAL == 0 {
                log::debug!("{:.1} fps", app.clock.smoothed_fps);
            }
            if let Err(e) = app.game.frame(dt) {
                log::error!("{e}");
                if app.game.is_halted() {
                    // Stop scheduling frames
                    return;
                }
            }
        }

        request_animation_frame(app);
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
    log::info!("Skyline Runner (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    if let Err(e) = demo::run(3) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Headless runs with a bot that jumps at building edges
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use skyline_runner::assets::{ResourceManifest, Resources};
    use skyline_runner::hud::RecordingSurface;
    use skyline_runner::scene::HeadlessScene;
    use skyline_runner::sim::{GamePhase, SeedPolicy};
    use skyline_runner::{DebugConfig, Game, GameError, Tuning};

    const DT: f32 = 1.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 5;

    const MANIFEST: &str = r#"{
        "CITY": { "url": "city.png" },
        "BUILDING": { "url": "building.png" },
        "HALFBUILDING": { "url": "halfbuilding.png" },
        "CRATE": null
    }"#;

    pub fn run(runs: u32) -> Result<(), GameError> {
        let resources = Resources::load(&ResourceManifest::from_json(MANIFEST)?)?;
        let mut game = Game::new(
            Tuning::default(),
            DebugConfig::default(),
            SeedPolicy::Fixed(666),
            HeadlessScene::new(),
            RecordingSurface::default(),
        )?;
        game.start(resources)?;

        let mut finished = 0;
        let mut jumping = false;
        let mut was_running = false;
        for frame in 0..MAX_FRAMES {
            let phase = game.session().phase;
            // Jump when the roof ends within reach
            let near_edge = {
                let session = game.session();
                session
                    .player
                    .grounded
                    .and_then(|i| session.world.platforms().get(i))
                    .is_some_and(|p| p.right_edge() < 1.0)
            };

            if phase == GamePhase::AwaitingRestart {
                finished += 1;
                if finished == runs {
                    break;
                }
                game.touch_start();
            }

            if near_edge && !jumping {
                game.key_down("Space");
                jumping = true;
            } else if jumping {
                game.key_up("Space");
                jumping = false;
            }

            let report = game.frame(DT)?;
            if let Some(index) = report.landed {
                log::debug!("frame {frame}: on platform {index}");
            }
            let running = game.session().phase.is_running();
            if was_running && game.session().phase.is_game_over() {
                log::info!("Run ended with score {}", game.session().score);
            }
            was_running = running;
        }

        let session = game.session();
        println!(
            "Finished {finished} run(s), {} replay(s), last score {}",
            session.replays, session.score
        );
        Ok(())
    }
}
