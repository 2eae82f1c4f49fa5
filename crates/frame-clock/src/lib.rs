//! Recreplay Frame Clock
//!
//! Turns the host's irregular per-paint callback into a steady callback at a
//! configured frame rate. Every paint re-arms the next one; a
//! [`FramePacer`] filters paints down to the target rate and corrects for
//! drift, so jitter is bounded by one paint interval rather than by the
//! frame rate.

use std::cell::RefCell;
use std::rc::Rc;

use recreplay_common::clock::{FramePacer, Millis};
use recreplay_host_core::{AnimationFrames, FrameRequestId};

struct ClockState {
    pacer: FramePacer,
    pending: Option<FrameRequestId>,
    /// Bumped on every start/stop so callbacks from an earlier run are inert.
    generation: u64,
    running: bool,
    ticks: u64,
}

/// Invokes a callback `rate` times per second while started.
pub struct FrameClock {
    rate: u32,
    frames: Rc<dyn AnimationFrames>,
    callback: Rc<dyn Fn()>,
    state: Rc<RefCell<ClockState>>,
}

impl FrameClock {
    /// Create a stopped clock. `rate` is in frames per second.
    pub fn new(rate: u32, frames: Rc<dyn AnimationFrames>, callback: impl Fn() + 'static) -> Self {
        let now = frames.now_ms();
        Self {
            rate,
            frames,
            callback: Rc::new(callback),
            state: Rc::new(RefCell::new(ClockState {
                pacer: FramePacer::new(rate, now),
                pending: None,
                generation: 0,
                running: false,
                ticks: 0,
            })),
        }
    }

    /// Begin firing. Starting a running clock restarts it.
    pub fn start(&self) {
        if self.is_running() {
            self.stop();
        }

        let generation = {
            let mut state = self.state.borrow_mut();
            state.pacer.reset(self.frames.now_ms());
            state.running = true;
            state.generation += 1;
            state.generation
        };

        tracing::debug!(rate = self.rate, "Frame clock started");
        arm(&self.state, &self.frames, &self.callback, generation);
    }

    /// Cancel the pending paint registration. Safe to call at any time.
    pub fn stop(&self) {
        let pending = {
            let mut state = self.state.borrow_mut();
            if state.running {
                tracing::debug!(rate = self.rate, ticks = state.ticks, "Frame clock stopped");
            }
            state.running = false;
            state.generation += 1;
            state.pending.take()
        };
        if let Some(id) = pending {
            self.frames.cancel_frame(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    /// Number of callbacks fired since creation.
    pub fn ticks(&self) -> u64 {
        self.state.borrow().ticks
    }
}

impl Drop for FrameClock {
    fn drop(&mut self) {
        self.stop();
    }
}

fn arm(
    state: &Rc<RefCell<ClockState>>,
    frames: &Rc<dyn AnimationFrames>,
    callback: &Rc<dyn Fn()>,
    generation: u64,
) {
    let paint_state = state.clone();
    let paint_frames = frames.clone();
    let paint_callback = callback.clone();
    let id = frames.request_frame(Box::new(move |now| {
        on_paint(&paint_state, &paint_frames, &paint_callback, generation, now)
    }));
    state.borrow_mut().pending = Some(id);
}

fn on_paint(
    state: &Rc<RefCell<ClockState>>,
    frames: &Rc<dyn AnimationFrames>,
    callback: &Rc<dyn Fn()>,
    generation: u64,
    now: Millis,
) {
    {
        let state = state.borrow();
        if !state.running || state.generation != generation {
            return;
        }
    }

    // Re-arm before firing so the callback can stop the clock.
    arm(state, frames, callback, generation);

    let due = {
        let mut state = state.borrow_mut();
        let due = state.pacer.poll(now);
        if due {
            state.ticks += 1;
        }
        due
    };
    if due {
        callback();
    }
}
