//! Recreplay
//!
//! Deterministic capture and replay of user interactions on a scrollable
//! surface. A [`Session`] resolves configuration once and builds a
//! [`Recorder`] and a [`Player`] over the same host handles, so a take can be
//! recorded and then replayed on the surface it came from.
//!
//! ```ignore
//! let session = Session::new(&SessionConfig::default(), MarkerConfig::default(), host);
//! session.recorder().record(RecordHooks::new());
//! // ... user interacts ...
//! session.replay_take(PlaybackHooks::new().on_end(|| println!("done")));
//! ```

use std::rc::Rc;

pub use recreplay_common::config::{AppConfig, LoggingConfig, MarkerConfig, SessionConfig};
pub use recreplay_common::error::{RecreplayError, RecreplayResult};
pub use recreplay_frame_clock::FrameClock;
pub use recreplay_host_core as host;
pub use recreplay_player::{PlaybackHooks, Player};
pub use recreplay_recorder::{RecordHooks, Recorder, RecorderConfig};
pub use recreplay_recording_model::event_class::{EventClass, EventSet};
pub use recreplay_recording_model::frame::{Frame, Point, ScrollOffset};
pub use recreplay_recording_model::recording::Recording;

use recreplay_host_core::{AnimationFrames, EventTarget, Surface, Timers};

/// Host capabilities shared by the recorder and the player.
#[derive(Clone)]
pub struct HostHandles {
    pub surface: Rc<dyn Surface>,
    /// Receives key events; usually the document owning the surface.
    pub document: Rc<dyn EventTarget>,
    pub frames: Rc<dyn AnimationFrames>,
    pub timers: Rc<dyn Timers>,
}

/// One recorder and one player bound to a surface.
pub struct Session {
    events: EventSet,
    fps: u32,
    recorder: Recorder,
    player: Player,
}

impl Session {
    /// Build a session. Unknown event names are logged and left out; an fps
    /// of zero falls back to the default rate.
    pub fn new(config: &SessionConfig, markers: MarkerConfig, host: HostHandles) -> Self {
        let events = EventSet::from_names(&config.events);
        let fps = config.effective_fps();

        if events.is_empty() {
            tracing::warn!("No known event classes configured, recordings will be empty frames");
        }

        let recorder = Recorder::new(
            host.surface.clone(),
            host.document,
            host.frames.clone(),
            RecorderConfig { events, fps },
        );
        let player = Player::new(host.surface, host.frames, host.timers, markers);

        tracing::info!(events = ?events.names(), fps, "Session ready");

        Self {
            events,
            fps,
            recorder,
            player,
        }
    }

    /// Session with every event class at the default rate.
    pub fn with_defaults(host: HostHandles) -> Self {
        Self::new(&SessionConfig::default(), MarkerConfig::default(), host)
    }

    /// Session configured from an [`AppConfig`].
    pub fn from_app_config(config: &AppConfig, host: HostHandles) -> Self {
        Self::new(&config.session, config.markers.clone(), host)
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Event classes being captured.
    pub fn events(&self) -> EventSet {
        self.events
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Stop recording and play back what was captured so far. Returns the
    /// recording handed to the player.
    pub fn replay_take(&self, hooks: PlaybackHooks) -> Rc<Recording> {
        self.recorder.stop();
        let recording = Rc::new(self.recorder.get_data());
        self.player.play(recording.clone(), hooks);
        recording
    }
}
