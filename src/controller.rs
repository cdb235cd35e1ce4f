//! Event entry points and lifecycle for a particle field
//!
//! [`FieldController`] is the one owner of everything the backdrop mutates:
//! the field (particles, pointer, surface size), the pending resize and the
//! frame loop. Hosts forward events to it and call [`FieldController::frame`]
//! once per display refresh.

use rand::Rng;

use crate::debounce::Debouncer;
use crate::field::{FieldSettings, FrameStats, ParticleField};
use crate::frame_loop::{FrameLoop, LoopState};
use crate::models::SurfaceDimensions;
use crate::surface::Surface;

#[derive(Debug)]
pub struct FieldController<R> {
    field: ParticleField<R>,
    resize: Debouncer<SurfaceDimensions>,
    frame_loop: FrameLoop,
}

impl<R: Rng> FieldController<R> {
    pub fn new(settings: FieldSettings, dims: SurfaceDimensions, rng: R, debounce_ms: u32) -> Self {
        Self::from_field(ParticleField::new(settings, dims, rng), debounce_ms)
    }

    pub fn from_field(field: ParticleField<R>, debounce_ms: u32) -> Self {
        Self { field, resize: Debouncer::new(debounce_ms), frame_loop: FrameLoop::new() }
    }

    pub fn field(&self) -> &ParticleField<R> {
        &self.field
    }

    pub fn loop_state(&self) -> LoopState {
        self.frame_loop.state()
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }

    /// Start (or restart) the loop. Returns `true` when the host should
    /// request the first frame.
    pub fn start(&mut self) -> bool {
        self.frame_loop.start()
    }

    /// Ask whether the host should request another frame.
    pub fn reschedule(&mut self) -> bool {
        self.frame_loop.schedule()
    }

    /// Pointer moved. Applied immediately; the next frame sees it.
    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.field.set_pointer(x, y);
    }

    /// Viewport resized at `now`. Takes effect after the quiet period.
    pub fn resize_requested(&mut self, dims: SurfaceDimensions, now: f64) {
        self.resize.trigger(dims, now);
    }

    /// Apply the pending resize if its quiet period has elapsed.
    pub fn poll_resize(&mut self, now: f64) -> Option<SurfaceDimensions> {
        let dims = self.resize.poll(now)?;
        self.apply_resize(dims);
        Some(dims)
    }

    /// Apply the pending resize now (the host's debounce timer expired).
    pub fn flush_resize(&mut self) -> Option<SurfaceDimensions> {
        let dims = self.resize.fire()?;
        self.apply_resize(dims);
        Some(dims)
    }

    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// When the pending resize becomes due, if any.
    pub fn resize_deadline(&self) -> Option<f64> {
        self.resize.deadline()
    }

    fn apply_resize(&mut self, dims: SurfaceDimensions) {
        log::debug!("Applying resize {} -> {}", self.field.dimensions(), dims);
        self.field.resize(dims);
    }

    /// Run one delivered frame.
    ///
    /// Returns `None` without touching the surface when the loop is not
    /// running (stopped before the frame arrived).
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Option<FrameStats> {
        if !self.frame_loop.begin_frame() {
            return None;
        }
        let dims = self.field.dimensions();
        if surface.dimensions() != dims {
            surface.resize(dims);
        }
        Some(self.field.frame(surface))
    }

    /// Tear down: stop the loop and drop any pending resize.
    pub fn stop(&mut self) {
        self.frame_loop.stop();
        self.resize.cancel();
    }
}
