//! Recreplay Player
//!
//! Replays a [`Recording`] against a surface at the recording's own frame
//! rate. A cursor walks the frame list one frame per clock tick; each frame's
//! populated fields are turned back into pointer marker moves, clicks, focus
//! changes, scrolling and typing. Reaching the end of the list halts playback
//! and fires `on_end` exactly once.

pub mod markers;
pub mod replay;

use std::cell::RefCell;
use std::rc::Rc;

use recreplay_common::config::MarkerConfig;
use recreplay_frame_clock::FrameClock;
use recreplay_host_core::{AnimationFrames, ElementRef, Surface, Timers};
use recreplay_recording_model::frame::{Frame, ScrollOffset};
use recreplay_recording_model::recording::Recording;

use replay::ReplayContext;

/// Observer hooks for a playback run.
#[derive(Clone, Default)]
pub struct PlaybackHooks {
    on_playing: Option<Rc<dyn Fn()>>,
    on_end: Option<Rc<dyn Fn()>>,
}

impl PlaybackHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every rendered frame.
    pub fn on_playing(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_playing = Some(Rc::new(hook));
        self
    }

    /// Called once when the cursor runs past the last frame.
    pub fn on_end(mut self, hook: impl Fn() + 'static) -> Self {
        self.on_end = Some(Rc::new(hook));
        self
    }
}

/// What a clock tick did, with the hook to run once the state is released.
enum Tick {
    Idle,
    Rendered(Option<Rc<dyn Fn()>>),
    Ended(Option<Rc<dyn Fn()>>),
}

struct PlayerState {
    surface: Rc<dyn Surface>,
    timers: Rc<dyn Timers>,
    markers: MarkerConfig,
    data: Option<Rc<Recording>>,
    /// Next frame to render; equals `frames.len()` once finished.
    frame_index: usize,
    playing: bool,
    clock: Option<FrameClock>,
    hooks: PlaybackHooks,
    focused: Option<ElementRef>,
}

impl PlayerState {
    fn frame_count(&self) -> usize {
        self.data.as_ref().map_or(0, |data| data.frames.len())
    }

    fn halt(&mut self) {
        if let Some(clock) = &self.clock {
            clock.stop();
        }
        self.playing = false;
    }

    fn tick(&mut self) -> Tick {
        let Some(data) = self.data.clone() else {
            return Tick::Idle;
        };

        if self.frame_index >= data.frames.len() {
            self.halt();
            tracing::info!(frames = data.frames.len(), "Playback finished");
            return Tick::Ended(self.hooks.on_end.clone());
        }

        self.render(&data, self.frame_index);
        self.frame_index += 1;
        Tick::Rendered(self.hooks.on_playing.clone())
    }

    /// Apply frame `index` to the surface without moving the cursor.
    fn render(&mut self, data: &Recording, index: usize) {
        if index == 0 {
            self.surface.set_scroll_offset(ScrollOffset::default());
            markers::remove_pointer(self.surface.as_ref(), &self.markers);
        }

        let Some(frame) = data.frames.get(index) else {
            return;
        };
        tracing::debug!(index, "Rendering frame");

        let mut ctx = ReplayContext {
            surface: &self.surface,
            timers: &self.timers,
            markers: &self.markers,
            focused: &mut self.focused,
        };
        replay::replay_frame(&mut ctx, frame);
    }
}

/// Drives playback of recordings on one surface.
pub struct Player {
    frames: Rc<dyn AnimationFrames>,
    state: Rc<RefCell<PlayerState>>,
}

impl Player {
    pub fn new(
        surface: Rc<dyn Surface>,
        frames: Rc<dyn AnimationFrames>,
        timers: Rc<dyn Timers>,
        markers: MarkerConfig,
    ) -> Self {
        Self {
            frames,
            state: Rc::new(RefCell::new(PlayerState {
                surface,
                timers,
                markers,
                data: None,
                frame_index: 0,
                playing: false,
                clock: None,
                hooks: PlaybackHooks::default(),
                focused: None,
            })),
        }
    }

    /// Play `data` from its first frame. Any playback already in progress is
    /// stopped first.
    pub fn play(&self, data: impl Into<Rc<Recording>>, hooks: PlaybackHooks) {
        let data = data.into();

        let weak = Rc::downgrade(&self.state);
        let clock = FrameClock::new(data.fps, self.frames.clone(), move || {
            if let Some(state) = weak.upgrade() {
                on_tick(&state);
            }
        });

        let previous = {
            let mut state = self.state.borrow_mut();
            tracing::info!(fps = data.fps, frames = data.frames.len(), "Playback started");
            state.halt();
            state.data = Some(data);
            state.frame_index = 0;
            state.focused = None;
            state.hooks = hooks;
            state.playing = true;
            state.clock.replace(clock)
        };
        drop(previous);

        if let Some(clock) = &self.state.borrow().clock {
            clock.start();
        }
    }

    /// Continue from the current cursor after a `pause`. A finished run
    /// stays finished; use `play` to start over.
    pub fn resume(&self) {
        let mut state = self.state.borrow_mut();
        if state.playing || state.data.is_none() {
            return;
        }
        if state.frame_index >= state.frame_count() {
            tracing::debug!(frame = state.frame_index, "Nothing left to resume");
            return;
        }

        state.playing = true;
        tracing::info!(frame = state.frame_index, "Playback resumed");
        if let Some(clock) = &state.clock {
            clock.start();
        }
    }

    /// Halt playback, keeping the cursor where it is.
    pub fn pause(&self) {
        let mut state = self.state.borrow_mut();
        if state.playing {
            tracing::info!(frame = state.frame_index, "Playback paused");
        }
        state.halt();
    }

    /// Halt playback, rewind to frame 0 and show frame 0 on the surface.
    pub fn stop(&self) {
        let mut state = self.state.borrow_mut();
        state.halt();
        state.frame_index = 0;
        if let Some(data) = state.data.clone() {
            if !data.frames.is_empty() {
                state.render(&data, 0);
            }
        }
    }

    /// Move the cursor for scrubbing. Indices outside the recording are
    /// logged and ignored; returns whether the cursor moved.
    pub fn set_frame_index(&self, index: usize) -> bool {
        let mut state = self.state.borrow_mut();
        let count = state.frame_count();
        if index < count {
            state.frame_index = index;
            true
        } else {
            tracing::warn!(index, frames = count, "Can't set frame index past the recording");
            false
        }
    }

    /// The frame the cursor points at; `None` before play or once finished.
    pub fn current_frame(&self) -> Option<Frame> {
        let state = self.state.borrow();
        state
            .data
            .as_ref()
            .and_then(|data| data.frames.get(state.frame_index).cloned())
    }

    pub fn current_frame_index(&self) -> usize {
        self.state.borrow().frame_index
    }

    pub fn is_playing(&self) -> bool {
        self.state.borrow().playing
    }
}

fn on_tick(state: &Rc<RefCell<PlayerState>>) {
    // Hooks run after the borrow ends so they may call back into the player.
    let tick = state.borrow_mut().tick();
    match tick {
        Tick::Idle => {}
        Tick::Rendered(hook) | Tick::Ended(hook) => {
            if let Some(hook) = hook {
                hook();
            }
        }
    }
}
