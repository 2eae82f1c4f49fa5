//! Recreplay host contracts.
//!
//! The recorder and player never talk to a concrete UI toolkit. Everything
//! they need from the environment is expressed here as a small set of
//! single-threaded capabilities:
//!
//! - [`EventTarget`]: scoped subscription to raw interaction events
//! - [`Surface`]: the scrollable element being recorded or replayed against
//! - [`Element`]: hit-test results that can be focused, clicked and typed into
//! - [`AnimationFrames`]: the host's per-paint callback
//! - [`Timers`]: single-shot delayed callbacks
//!
//! [`headless`] provides an in-memory implementation used by tests and the
//! CLI.

pub mod event;
pub mod headless;

use std::rc::Rc;

use recreplay_common::clock::Millis;
use recreplay_recording_model::frame::{Point, ScrollOffset};

pub use event::{RawEvent, RawEventKind};

/// Identifies a registered listener for later removal.
pub type ListenerId = u64;

/// Callback invoked with each matching raw event.
pub type Listener = Rc<dyn Fn(&RawEvent)>;

/// Identifies a pending paint callback.
pub type FrameRequestId = u64;

/// Identifies a marker element inserted into a surface.
pub type MarkerHandle = u64;

/// Shared handle to a hit-test result.
pub type ElementRef = Rc<dyn Element>;

/// Something raw interaction events can be subscribed on.
pub trait EventTarget {
    /// Register `listener` for events of `kind`.
    fn add_listener(&self, kind: RawEventKind, listener: Listener) -> ListenerId;

    /// Remove a listener. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId);
}

/// The scrollable element interactions are recorded on and replayed into.
///
/// Points passed to [`Surface::element_from_point`] and marker positions are
/// in content coordinates: surface-local coordinates plus the current scroll
/// offset.
pub trait Surface: EventTarget {
    /// On-screen offset of the surface's origin, used to turn event client
    /// coordinates into surface-local ones.
    fn bounding_offset(&self) -> Point;

    fn scroll_offset(&self) -> ScrollOffset;

    fn set_scroll_offset(&self, offset: ScrollOffset);

    /// Topmost element at `point`, if any.
    fn element_from_point(&self, point: Point) -> Option<ElementRef>;

    /// Add a marker element to the surface's content.
    fn insert_marker(&self, marker: Marker) -> MarkerHandle;

    /// Find a marker by its unique id.
    fn marker_by_id(&self, id: &str) -> Option<MarkerHandle>;

    fn move_marker(&self, handle: MarkerHandle, position: Point);

    /// Remove a marker. Already-removed handles are ignored.
    fn remove_marker(&self, handle: MarkerHandle);
}

/// An element returned by hit-testing.
pub trait Element {
    fn tag_name(&self) -> String;

    fn focus(&self);

    fn blur(&self);

    /// Fire a synthetic click.
    fn click(&self);

    /// Current text value; empty for elements without one.
    fn value(&self) -> String;

    fn set_value(&self, value: &str);

    /// Whether replayed keystrokes should be typed into this element.
    fn is_text_input(&self) -> bool {
        let tag = self.tag_name();
        tag.eq_ignore_ascii_case("input") || tag.eq_ignore_ascii_case("textarea")
    }
}

/// The host's per-paint callback source.
pub trait AnimationFrames {
    /// Current time on the host's monotonic clock.
    fn now_ms(&self) -> Millis;

    /// Run `callback` once on the next paint, passing the paint timestamp.
    fn request_frame(&self, callback: Box<dyn FnOnce(Millis)>) -> FrameRequestId;

    /// Drop a pending paint callback. Unknown or already-run ids are ignored.
    fn cancel_frame(&self, id: FrameRequestId);
}

/// Single-shot delayed callbacks.
pub trait Timers {
    fn set_timeout(&self, delay_ms: u64, callback: Box<dyn FnOnce()>);
}

/// How a marker is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerAppearance {
    /// The synthetic arrow cursor.
    Pointer,
    /// A round indicator filled with a CSS color.
    Dot { color: String },
}

/// A visual marker placed on a surface during replay.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Unique id; at most one marker per id is expected.
    pub id: Option<String>,
    pub class_name: Option<String>,
    pub appearance: MarkerAppearance,
    /// Top-left corner in content coordinates.
    pub position: Point,
    pub width: u32,
    pub height: u32,
    pub z_index: i32,
    pub opacity: f64,
}
