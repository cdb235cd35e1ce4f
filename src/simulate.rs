//! Headless field driver with a virtual clock
//!
//! Runs a [`FieldController`] the way a browser would, minus the browser:
//! frames arrive every 1000/60 ms of virtual time, scripted pointer and
//! resize events are delivered just before the first frame at or after their
//! timestamp, and the debounced resize is polled before each frame.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::controller::FieldController;
use crate::field::{FieldSettings, FrameStats};
use crate::models::SurfaceDimensions;
use crate::surface::Surface;

/// Virtual time between frames, matching a 60 Hz display
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Input delivered to the controller during a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    PointerMove { x: f64, y: f64 },
    Resize { width: u32, height: u32 },
}

/// A [`SimEvent`] at a virtual timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TimedEvent {
    pub at_ms: f64,
    #[serde(flatten)]
    pub event: SimEvent,
}

/// Per-frame record produced by [`Simulation::run`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time_ms: f64,
    pub width: u32,
    pub height: u32,
    #[serde(flatten)]
    pub stats: FrameStats,
}

/// Parse a JSON event script: an array of [`TimedEvent`]s.
///
/// ```json
/// [{"at_ms": 0, "type": "pointer_move", "x": 400, "y": 300},
///  {"at_ms": 250, "type": "resize", "width": 640, "height": 480}]
/// ```
pub fn parse_events(json: &str) -> Result<Vec<TimedEvent>, serde_json::Error> {
    serde_json::from_str(json)
}

pub struct Simulation {
    controller: FieldController<StdRng>,
    events: Vec<TimedEvent>,
    next_event: usize,
    clock_ms: f64,
}

impl Simulation {
    /// Build a seeded simulation.
    pub fn new(settings: FieldSettings, dims: SurfaceDimensions, seed: u64, debounce_ms: u32) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        Self {
            controller: FieldController::new(settings, dims, rng, debounce_ms),
            events: Vec::new(),
            next_event: 0,
            clock_ms: 0.0,
        }
    }

    pub fn controller(&self) -> &FieldController<StdRng> {
        &self.controller
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Queue an event. Events are delivered in timestamp order; ties keep
    /// insertion order.
    pub fn schedule(&mut self, at_ms: f64, event: SimEvent) {
        self.events.push(TimedEvent { at_ms, event });
        let pending = &mut self.events[self.next_event..];
        pending.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    }

    /// Deliver every queued event due by `now`.
    fn deliver_until(&mut self, now: f64) {
        while let Some(timed) = self.events.get(self.next_event).copied() {
            if timed.at_ms > now {
                break;
            }
            self.next_event += 1;
            match timed.event {
                SimEvent::PointerMove { x, y } => self.controller.pointer_moved(x, y),
                SimEvent::Resize { width, height } => self
                    .controller
                    .resize_requested(SurfaceDimensions::new(width, height), timed.at_ms),
            }
        }
    }

    /// Run `frames` frames against `surface`, calling `observe` after each.
    pub fn run<S, F>(&mut self, surface: &mut S, frames: u64, mut observe: F) -> Vec<FrameRecord>
    where
        S: Surface + ?Sized,
        F: FnMut(&FrameRecord, &S),
    {
        let mut records = Vec::with_capacity(frames as usize);
        self.controller.start();

        for _ in 0..frames {
            let now = self.clock_ms;
            self.deliver_until(now);
            self.controller.poll_resize(now);

            let Some(stats) = self.controller.frame(surface) else {
                break;
            };
            let dims = self.controller.field().dimensions();
            let record = FrameRecord {
                frame: self.controller.frames(),
                time_ms: now,
                width: dims.width,
                height: dims.height,
                stats,
            };
            observe(&record, &*surface);
            records.push(record);

            self.controller.reschedule();
            self.clock_ms += FRAME_INTERVAL_MS;
        }

        records
    }

    /// Stop the controller, as a page teardown would.
    pub fn stop(&mut self) {
        self.controller.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    fn sim(seed: u64) -> Simulation {
        Simulation::new(FieldSettings::default(), SurfaceDimensions::new(800, 600), seed, 100)
    }

    #[test]
    fn test_run_produces_one_record_per_frame() {
        let mut s = sim(1);
        let mut surface = RecordingSurface::new(SurfaceDimensions::new(800, 600));
        let records = s.run(&mut surface, 5, |_, _| {});

        assert_eq!(records.len(), 5);
        assert_eq!(records[0].frame, 1);
        assert_eq!(records[4].frame, 5);
        assert!(records.iter().all(|r| r.stats.particles == 110));
        assert!((s.clock_ms() - 5.0 * FRAME_INTERVAL_MS).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut a = sim(42);
        let mut b = sim(42);
        let mut sa = RecordingSurface::new(SurfaceDimensions::new(800, 600));
        let mut sb = RecordingSurface::new(SurfaceDimensions::new(800, 600));
        let ra = a.run(&mut sa, 10, |_, _| {});
        let rb = b.run(&mut sb, 10, |_, _| {});
        assert_eq!(ra, rb);
        assert_eq!(a.controller().field().particles(), b.controller().field().particles());
    }

    #[test]
    fn test_pointer_event_delivered_before_frame() {
        let mut s = sim(3);
        s.schedule(0.0, SimEvent::PointerMove { x: 400.0, y: 300.0 });
        let mut surface = RecordingSurface::new(SurfaceDimensions::new(800, 600));
        s.run(&mut surface, 1, |_, _| {});
        assert!(s.controller().field().pointer().is_present());
    }

    #[test]
    fn test_resize_burst_applies_after_quiet_period() {
        let mut s = sim(4);
        for k in 0..10 {
            s.schedule(k as f64 * 10.0, SimEvent::Resize { width: 400, height: 300 });
        }
        let mut surface = RecordingSurface::new(SurfaceDimensions::new(800, 600));
        let records = s.run(&mut surface, 20, |_, _| {});

        // Last event at 90ms; due at 190ms; first frame at or after is 200ms
        let first_resized = records.iter().position(|r| r.width == 400).unwrap();
        assert!(records[first_resized].time_ms >= 190.0);
        assert!(records[first_resized - 1].time_ms < 190.0);
        assert_eq!(surface.dimensions(), SurfaceDimensions::new(400, 300));
    }

    #[test]
    fn test_run_restarts_after_stop() {
        let mut s = sim(5);
        s.stop();
        let mut surface = RecordingSurface::new(SurfaceDimensions::new(800, 600));
        let records = s.run(&mut surface, 2, |_, _| {});
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_events_deserialize() {
        let json = r#"[{"at_ms": 0, "type": "pointer_move", "x": 1.0, "y": 2.0},
                      {"at_ms": 50, "type": "resize", "width": 10, "height": 20}]"#;
        let events = parse_events(json).unwrap();
        assert_eq!(events[0].event, SimEvent::PointerMove { x: 1.0, y: 2.0 });
        assert_eq!(events[1].event, SimEvent::Resize { width: 10, height: 20 });
        assert_eq!(events[1].at_ms, 50.0);
    }

    #[test]
    fn test_unknown_event_type_rejected() {
        assert!(parse_events(r#"[{"at_ms": 0, "type": "scroll", "dy": 3}]"#).is_err());
        assert!(parse_events(r#"{"at_ms": 0}"#).is_err());
    }
}
