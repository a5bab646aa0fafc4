//! Bounce Lab entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_demo {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PageTransitionEvent, PointerEvent};

    use bounce_lab::platform::FrameLoop;
    use bounce_lab::platform::web::{AnimationFrames, EventListeners, now_ms};
    use bounce_lab::renderer::{RenderError, RenderState, scene_vertices};
    use bounce_lab::sim::Bounds;
    use bounce_lab::{Session, Settings};

    /// Demo instance holding all state
    struct Demo {
        session: Session,
        settings: Settings,
        render_state: Option<RenderState>,
        frames: FrameLoop<AnimationFrames>,
        listeners: EventListeners,
        canvas: HtmlCanvasElement,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Demo {
        /// Container bounds in CSS pixels, read fresh every frame
        fn bounds(&self) -> Bounds {
            Bounds::new(
                self.canvas.client_width() as f32,
                self.canvas.client_height() as f32,
            )
        }

        /// Keep the backing store in step with the element size
        fn sync_canvas_size(&mut self) -> Bounds {
            let bounds = self.bounds();
            let dpr = web_sys::window()
                .map(|w| w.device_pixel_ratio())
                .unwrap_or(1.0);
            let width = (bounds.width as f64 * dpr) as u32;
            let height = (bounds.height as f64 * dpr) as u32;
            if self.canvas.width() != width || self.canvas.height() != height {
                self.canvas.set_width(width);
                self.canvas.set_height(height);
            }
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height, bounds);
            }
            bounds
        }

        /// Run one simulation frame
        fn update(&mut self, time: f64) {
            let bounds = self.sync_canvas_size();
            self.session.frame(time, bounds);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
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
            let segments = self.settings.quality.circle_segments();
            if let Some(ref mut render_state) = self.render_state {
                let vertices = scene_vertices(self.session.bodies(), segments);
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(RenderError::Surface(
                        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
                    )) => {
                        render_state.reconfigure();
                    }
                    Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-fps") {
                let class = if self.settings.show_fps {
                    "hud-item"
                } else {
                    "hud-item hidden"
                };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Bounce Lab starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let dpr = window.device_pixel_ratio();
        let bounds = Bounds::new(canvas.client_width() as f32, canvas.client_height() as f32);
        let width = (bounds.width as f64 * dpr) as u32;
        let height = (bounds.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let scene = match settings.build_scene() {
            Ok(scene) => scene,
            Err(e) => {
                log::warn!("Invalid scene settings ({}), using defaults", e);
                Settings::default()
                    .build_scene()
                    .map_err(|e| JsValue::from_str(&e.to_string()))?
            }
        };

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
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, bounds)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let frames = AnimationFrames::new(window.clone());
        let callback = frames.callback();

        let demo = Rc::new(RefCell::new(Demo {
            session: Session::new(scene),
            settings,
            render_state: Some(render_state),
            frames: FrameLoop::new(frames),
            listeners: EventListeners::new(),
            canvas: canvas.clone(),
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        // Frame callback: run a frame, then ask for the next one
        {
            let demo = demo.clone();
            *callback.borrow_mut() = Some(Closure::new(move |time: f64| {
                let mut d = demo.borrow_mut();
                if !d.frames.begin_frame() {
                    return;
                }
                d.update(time);
                d.render();
                d.update_hud();
                d.frames.schedule_next();
            }));
        }

        let listeners = input_listeners(&canvas, &window, &demo);
        {
            let mut d = demo.borrow_mut();
            d.listeners = listeners;
            d.listeners.attach();
        }
        setup_lifecycle(&window, demo.clone());

        demo.borrow_mut().frames.start();

        log::info!("Bounce Lab running!");
        Ok(())
    }

    fn pointer_position(event: &PointerEvent) -> Vec2 {
        Vec2::new(event.offset_x() as f32, event.offset_y() as f32)
    }

    /// Pointer and keyboard listeners, detached as a group on unmount
    fn input_listeners(
        canvas: &HtmlCanvasElement,
        window: &web_sys::Window,
        demo: &Rc<RefCell<Demo>>,
    ) -> EventListeners {
        let mut listeners = EventListeners::new();
        let drag = demo.borrow().session.drag_handle();
        let dragging = Rc::new(Cell::new(false));

        // Press: hit test against the current body positions
        {
            let demo = demo.clone();
            let drag = drag.clone();
            let dragging = dragging.clone();
            let canvas_clone = canvas.clone();
            listeners.add(canvas, "pointerdown", move |event: PointerEvent| {
                let position = pointer_position(&event);
                let hit = demo.borrow().session.body_at(position);
                if let Some(body) = hit {
                    event.prevent_default();
                    let _ = canvas_clone.set_pointer_capture(event.pointer_id());
                    dragging.set(true);
                    drag.press(body, position);
                }
            });
        }

        // Move
        {
            let drag = drag.clone();
            let dragging = dragging.clone();
            listeners.add(canvas, "pointermove", move |event: PointerEvent| {
                if dragging.get() {
                    drag.move_to(pointer_position(&event));
                }
            });
        }

        // Release (up and cancel both end the drag)
        for event_name in ["pointerup", "pointercancel"] {
            let drag = drag.clone();
            let dragging = dragging.clone();
            listeners.add(canvas, event_name, move |_event: PointerEvent| {
                if dragging.replace(false) {
                    drag.release();
                }
            });
        }

        {
            let demo = demo.clone();
            listeners.add(window, "keydown", move |event: KeyboardEvent| {
                let mut d = demo.borrow_mut();
                match event.key().as_str() {
                    "r" | "R" => d.session.reset(),
                    "s" | "S" => d.session.scatter(now_ms() as u64),
                    "f" | "F" => {
                        d.settings.show_fps = !d.settings.show_fps;
                        d.settings.save();
                    }
                    _ => {}
                }
            });
        }

        listeners
    }

    /// Unmount on `pagehide`: cancel the pending frame and detach input.
    /// A page restored from the back/forward cache mounts again on `pageshow`.
    fn setup_lifecycle(window: &web_sys::Window, demo: Rc<RefCell<Demo>>) {
        {
            let demo = demo.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PageTransitionEvent| {
                let mut d = demo.borrow_mut();
                d.frames.stop();
                d.listeners.detach();
                d.session.suspend();
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: PageTransitionEvent| {
            if !event.persisted() {
                return;
            }
            let mut d = demo.borrow_mut();
            d.session.resume();
            d.listeners.attach();
            d.frames.resume();
        });
        let _ = window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_demo::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bounce Lab (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    if let Err(e) = run_headless() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulate a few seconds at 60 Hz with a scripted drag, logging once per second
#[cfg(not(target_arch = "wasm32"))]
fn run_headless() -> Result<(), bounce_lab::SettingsError> {
    use bounce_lab::sim::Bounds;
    use bounce_lab::{Session, Settings};
    use glam::Vec2;

    let settings = Settings::load();
    let mut session = Session::new(settings.build_scene()?);
    let drag = session.drag_handle();
    let bounds = Bounds::new(640.0, 480.0);

    let frame_ms = 1000.0 / 60.0;
    let mut wall_hits = 0;
    let mut contacts = 0;

    for frame in 0..600u32 {
        let t = frame as f64 * frame_ms;
        match frame {
            120 => drag.press(0, Vec2::new(320.0, 240.0)),
            121..=179 => drag.move_to(Vec2::new(320.0 + (frame - 120) as f32 * 2.0, 200.0)),
            180 => drag.release(),
            360 => session.scatter(7),
            _ => {}
        }

        session.frame(t, bounds);
        let events = session.last_events();
        wall_hits += events.wall_hits;
        contacts += events.contacts;

        if frame % 60 == 0 {
            for (i, body) in session.bodies().iter().enumerate() {
                log::info!(
                    "t={:.1}s body {} at ({:.1}, {:.1}) v=({:.1}, {:.1}){}",
                    t / 1000.0,
                    i,
                    body.center.x,
                    body.center.y,
                    body.velocity.x,
                    body.velocity.y,
                    if body.held { " [held]" } else { "" }
                );
            }
        }
    }

    println!(
        "Ran {} frames: {} wall bounces, {} disc collisions",
        session.frame_count(),
        wall_hits,
        contacts
    );
    Ok(())
}
