//! Cancellable per-frame loop state
//!
//! The host (browser animation frames, a simulation clock) owns the actual
//! scheduling. [`FrameLoop`] only decides whether a continuation may be
//! requested and whether a delivered frame should run, so that:
//! - at most one continuation is in flight at a time
//! - nothing runs after [`FrameLoop::stop`]

/// Lifecycle of a frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Built but never started
    #[default]
    Idle,
    /// Frames run and reschedule themselves
    Running,
    /// Torn down; frames are ignored until restarted
    Stopped,
}

#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    state: LoopState,
    in_flight: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Frames run since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Enter the running state.
    ///
    /// Returns `true` when the caller should request the first frame.
    pub fn start(&mut self) -> bool {
        if self.state != LoopState::Running {
            log::debug!("Frame loop starting after {} frames", self.frames);
            self.state = LoopState::Running;
        }
        self.schedule()
    }

    /// Claim the single continuation slot.
    ///
    /// Returns `true` when the caller should request a frame now; `false`
    /// when stopped or when a frame is already pending.
    pub fn schedule(&mut self) -> bool {
        if self.state != LoopState::Running || self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// A requested frame was delivered. Returns whether it should run.
    pub fn begin_frame(&mut self) -> bool {
        self.in_flight = false;
        if self.state != LoopState::Running {
            return false;
        }
        self.frames += 1;
        true
    }

    /// Stop the loop. Any in-flight continuation becomes a no-op.
    pub fn stop(&mut self) {
        if self.state == LoopState::Running {
            log::debug!("Frame loop stopped after {} frames", self.frames);
        }
        self.state = LoopState::Stopped;
        self.in_flight = false;
    }
}
