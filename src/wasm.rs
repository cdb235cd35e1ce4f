//! WASM API module for browser/JS interop
//!
//! Attaches a particle field to a `<canvas>` element:
//!
//! ```js
//! import init, { ParticleCanvas } from "particle_field";
//! await init();
//! const backdrop = ParticleCanvas.attach("particles");
//! // ...
//! backdrop.stop();
//! ```
//!
//! The canvas is sized to the window. Pointer moves are read from the window
//! (not just the canvas) through a passive listener, and window resizes are
//! debounced before the canvas is resized.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use image::Rgba;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Event, HtmlCanvasElement, MouseEvent, Window};

use crate::color::css_rgba;
use crate::config::{parse_config, FieldConfig};
use crate::controller::FieldController;
use crate::models::{Point, SurfaceDimensions};
use crate::surface::Surface;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Why a canvas could not be attached. All of these are fatal.
#[derive(Debug, Error)]
pub enum AttachError {
    #[error("no window object")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("canvas '{0}' not found")]
    CanvasNotFound(String),
    #[error("element '{0}' is not a canvas")]
    NotACanvas(String),
    #[error("2d drawing context unavailable")]
    ContextUnavailable,
    #[error("invalid config: {0}")]
    Config(String),
}

impl From<AttachError> for JsValue {
    fn from(e: AttachError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

/// [`Surface`] over a canvas 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, AttachError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(AttachError::ContextUnavailable)?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn dimensions(&self) -> SurfaceDimensions {
        SurfaceDimensions::new(self.canvas.width(), self.canvas.height())
    }

    fn resize(&mut self, dims: SurfaceDimensions) {
        self.canvas.set_width(dims.width);
        self.canvas.set_height(dims.height);
    }

    fn clear(&mut self) {
        let dims = self.dimensions();
        self.ctx.clear_rect(0.0, 0.0, dims.width as f64, dims.height as f64);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba<u8>, opacity: f64) {
        self.ctx.begin_path();
        // arc only fails for a negative radius, which spawn never produces
        self.ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU).ok();
        self.ctx.set_fill_style_str(&css_rgba(color, opacity));
        self.ctx.fill();
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba<u8>, opacity: f64, width: f64) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style_str(&css_rgba(color, opacity));
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }
}

/// Everything the listener and frame closures share.
struct Runtime {
    controller: FieldController<StdRng>,
    surface: CanvasSurface,
    debounce_ms: u32,
    frame: Option<AnimationFrame>,
    resize_timer: Option<Timeout>,
}

/// A running particle backdrop bound to one canvas.
///
/// Dropping the handle tears the backdrop down like [`ParticleCanvas::stop`].
#[wasm_bindgen]
pub struct ParticleCanvas {
    runtime: Rc<RefCell<Runtime>>,
    listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl ParticleCanvas {
    /// Attach the stock backdrop to the canvas with id `canvas_id` and start it.
    pub fn attach(canvas_id: &str) -> Result<ParticleCanvas, JsValue> {
        Ok(Self::attach_config(canvas_id, FieldConfig::default())?)
    }

    /// Attach with settings from `particles.toml` text.
    #[wasm_bindgen(js_name = attachWithConfig)]
    pub fn attach_with_config(canvas_id: &str, config_toml: &str) -> Result<ParticleCanvas, JsValue> {
        let config = parse_config(config_toml).map_err(|e| AttachError::Config(e.to_string()))?;
        Ok(Self::attach_config(canvas_id, config)?)
    }

    /// Stop the animation loop, cancel any pending resize and remove the
    /// listeners. Safe to call more than once.
    pub fn stop(&mut self) {
        self.listeners.clear();
        let mut rt = self.runtime.borrow_mut();
        rt.controller.stop();
        rt.frame = None;
        rt.resize_timer = None;
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.runtime.borrow().controller.is_running()
    }

    /// Frames drawn so far.
    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> f64 {
        self.runtime.borrow().controller.frames() as f64
    }
}

impl ParticleCanvas {
    fn attach_config(canvas_id: &str, config: FieldConfig) -> Result<ParticleCanvas, AttachError> {
        let window = web_sys::window().ok_or(AttachError::NoWindow)?;
        let document = window.document().ok_or(AttachError::NoDocument)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| AttachError::CanvasNotFound(canvas_id.to_string()))?
            .dyn_into()
            .map_err(|_| AttachError::NotACanvas(canvas_id.to_string()))?;

        let mut surface = CanvasSurface::new(canvas)?;
        let dims = viewport(&window);
        surface.resize(dims);

        let settings = config.settings().map_err(|e| AttachError::Config(e.to_string()))?;
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let controller =
            FieldController::new(settings, dims, StdRng::seed_from_u64(seed), config.resize.debounce_ms);

        let runtime = Rc::new(RefCell::new(Runtime {
            controller,
            surface,
            debounce_ms: config.resize.debounce_ms,
            frame: None,
            resize_timer: None,
        }));

        let listeners = vec![pointer_listener(&window, &runtime), resize_listener(&window, &runtime)];

        let start = runtime.borrow_mut().controller.start();
        if start {
            request_frame(&runtime, true);
        }
        log::info!("Particle backdrop attached to #{} ({})", canvas_id, dims);

        Ok(ParticleCanvas { runtime, listeners })
    }
}

impl Drop for ParticleCanvas {
    fn drop(&mut self) {
        self.stop();
    }
}

fn viewport(window: &Window) -> SurfaceDimensions {
    let size = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0).max(0.0) as u32;
    SurfaceDimensions::new(size(window.inner_width()), size(window.inner_height()))
}

fn now_ms() -> f64 {
    web_sys::window().and_then(|w| w.performance()).map(|p| p.now()).unwrap_or(0.0)
}

/// Passive listeners never block scrolling.
fn passive() -> EventListenerOptions {
    EventListenerOptions { phase: EventListenerPhase::Bubble, passive: true }
}

fn pointer_listener(window: &Window, runtime: &Rc<RefCell<Runtime>>) -> EventListener {
    let runtime = Rc::clone(runtime);
    EventListener::new_with_options(window, "mousemove", passive(), move |event: &Event| {
        let Some(event) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        runtime
            .borrow_mut()
            .controller
            .pointer_moved(event.client_x() as f64, event.client_y() as f64);
    })
}

fn resize_listener(window: &Window, runtime: &Rc<RefCell<Runtime>>) -> EventListener {
    let runtime = Rc::clone(runtime);
    let window_for_size = window.clone();
    EventListener::new_with_options(window, "resize", passive(), move |_event: &Event| {
        let dims = viewport(&window_for_size);
        let mut rt = runtime.borrow_mut();
        rt.controller.resize_requested(dims, now_ms());

        // Replacing the handle clears the previous timeout
        let fired = Rc::clone(&runtime);
        rt.resize_timer = Some(Timeout::new(rt.debounce_ms, move || {
            let mut rt = fired.borrow_mut();
            if let Some(dims) = rt.controller.flush_resize() {
                rt.surface.resize(dims);
            }
        }));
    })
}

/// Request the next animation frame if the loop allows one.
///
/// `claimed` is true when the caller already holds the continuation slot.
fn request_frame(runtime: &Rc<RefCell<Runtime>>, claimed: bool) {
    let mut rt = runtime.borrow_mut();
    if !claimed && !rt.controller.reschedule() {
        return;
    }
    let next = Rc::clone(runtime);
    rt.frame = Some(request_animation_frame(move |_timestamp| {
        let ran = {
            let mut rt = next.borrow_mut();
            let Runtime { controller, surface, .. } = &mut *rt;
            controller.frame(surface).is_some()
        };
        if ran {
            request_frame(&next, false);
        }
    }));
}
