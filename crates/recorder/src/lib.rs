//! Recreplay Recorder
//!
//! Subscribes to raw interaction events on a surface (and key events on its
//! document), accumulates the latest value of each enabled event class, and
//! on every frame clock tick appends one immutable [`Frame`] to the
//! recording.
//!
//! Listeners stay attached for the recorder's whole lifetime; `pause` and
//! `stop` only halt snapshotting. Dropping the recorder detaches them.

pub mod capture;

use std::cell::RefCell;
use std::rc::Rc;

use recreplay_common::error::RecreplayResult;
use recreplay_frame_clock::FrameClock;
use recreplay_host_core::{AnimationFrames, EventTarget, Surface};
use recreplay_recording_model::event_class::{EventClass, EventSet};
use recreplay_recording_model::frame::Frame;
use recreplay_recording_model::recording::Recording;

use capture::{Accumulator, CaptureContext, SubscribedOn, Subscription};

/// What to capture and how often.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderConfig {
    pub events: EventSet,
    pub fps: u32,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            events: EventSet::all(),
            fps: recreplay_common::config::DEFAULT_FPS,
        }
    }
}

/// Observer hooks for a recording run.
#[derive(Clone, Default)]
pub struct RecordHooks {
    on_recording: Option<Rc<dyn Fn()>>,
}

impl RecordHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every appended frame.
    pub fn on_recording(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_recording = Some(Rc::new(hook));
        self
    }
}

/// Frames appended so far plus the recording flag.
struct Take {
    recording: Recording,
    active: bool,
    hooks: RecordHooks,
    frames_in_take: usize,
}

/// Captures interactions on a surface into a [`Recording`].
pub struct Recorder {
    events: EventSet,
    fps: u32,
    surface: Rc<dyn Surface>,
    document: Rc<dyn EventTarget>,
    accumulator: Rc<RefCell<Accumulator>>,
    take: Rc<RefCell<Take>>,
    subscriptions: Vec<Subscription>,
    clock: FrameClock,
}

impl Recorder {
    /// Attach one set of listeners per enabled event class.
    pub fn new(
        surface: Rc<dyn Surface>,
        document: Rc<dyn EventTarget>,
        frames: Rc<dyn AnimationFrames>,
        config: RecorderConfig,
    ) -> Self {
        let accumulator = Rc::new(RefCell::new(Accumulator::default()));
        let take = Rc::new(RefCell::new(Take {
            recording: Recording::new(config.fps),
            active: false,
            hooks: RecordHooks::default(),
            frames_in_take: 0,
        }));

        let ctx = CaptureContext {
            surface: &surface,
            document: &document,
            accumulator: &accumulator,
        };
        let subscriptions: Vec<Subscription> = config
            .events
            .iter()
            .flat_map(|class| capture::descriptor(class).subscribe(&ctx))
            .collect();

        let clock = {
            let accumulator = accumulator.clone();
            let take = take.clone();
            let events = config.events;
            FrameClock::new(config.fps, frames, move || {
                append_frame(&accumulator, &take, events)
            })
        };

        tracing::debug!(
            events = ?config.events.names(),
            fps = config.fps,
            listeners = subscriptions.len(),
            "Recorder attached"
        );

        Self {
            events: config.events,
            fps: config.fps,
            surface,
            document,
            accumulator,
            take,
            subscriptions,
            clock,
        }
    }

    /// Start (or resume) appending frames at the configured rate.
    pub fn record(&self, hooks: RecordHooks) {
        {
            let mut take = self.take.borrow_mut();
            take.hooks = hooks;
            take.active = true;
        }
        tracing::info!(fps = self.fps, events = ?self.events.names(), "Recording started");
        self.clock.start();
    }

    /// Stop appending frames. Listeners keep accumulating.
    pub fn pause(&self) {
        self.clock.stop();
        let mut take = self.take.borrow_mut();
        if take.active {
            tracing::info!(frames = take.recording.frames.len(), "Recording paused");
        }
        take.active = false;
    }

    /// Pause and reset the per-take frame counter. Recorded frames are kept.
    pub fn stop(&self) {
        self.pause();
        let mut take = self.take.borrow_mut();
        if take.frames_in_take > 0 {
            tracing::info!(
                frames_in_take = take.frames_in_take,
                total = take.recording.frames.len(),
                "Recording stopped"
            );
        }
        take.frames_in_take = 0;
    }

    pub fn is_recording(&self) -> bool {
        self.take.borrow().active
    }

    /// Snapshot of everything recorded so far, including mid-recording.
    pub fn get_data(&self) -> Recording {
        self.take.borrow().recording.clone()
    }

    /// The recording in its textual form.
    pub fn get_data_string(&self) -> RecreplayResult<String> {
        self.take.borrow().recording.to_json()
    }

    /// Frames appended since the last `stop`.
    pub fn frames_in_take(&self) -> usize {
        self.take.borrow().frames_in_take
    }

    /// Total frames recorded.
    pub fn frame_count(&self) -> usize {
        self.take.borrow().recording.frames.len()
    }

    /// Current raw state waiting for the next frame.
    pub fn pending(&self) -> Accumulator {
        self.accumulator.borrow().clone()
    }

    pub fn events(&self) -> EventSet {
        self.events
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Listeners attached for `class`.
    pub fn subscriptions_for(&self, class: EventClass) -> Vec<Subscription> {
        self.subscriptions
            .iter()
            .filter(|subscription| subscription.class == class)
            .copied()
            .collect()
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.clock.stop();
        for subscription in self.subscriptions.drain(..) {
            match subscription.on {
                SubscribedOn::Surface => self.surface.remove_listener(subscription.id),
                SubscribedOn::Document => self.document.remove_listener(subscription.id),
            }
        }
    }
}

/// Snapshot accumulated state into a new frame. Runs once per clock tick,
/// whether or not anything happened since the previous one.
fn append_frame(accumulator: &RefCell<Accumulator>, take: &RefCell<Take>, events: EventSet) {
    let mut frame = Frame::default();
    {
        let mut accumulator = accumulator.borrow_mut();
        for class in events.iter() {
            capture::descriptor(class).consume(&mut accumulator, &mut frame);
        }
    }

    let hook = {
        let mut take = take.borrow_mut();
        take.recording.frames.push(frame);
        take.frames_in_take += 1;
        tracing::debug!(index = take.recording.frames.len() - 1, "Frame appended");
        take.hooks.on_recording.clone()
    };

    if let Some(hook) = hook {
        hook();
    }
}
