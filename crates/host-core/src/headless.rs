//! In-memory host.
//!
//! Implements every host capability without a display: raw events are
//! injected with [`HeadlessSurface::dispatch`], time only moves when
//! [`HeadlessScheduler::advance`] is called, and paints happen on
//! [`HeadlessScheduler::paint`]. State is inspectable so tests can assert on
//! listeners, markers, scroll offsets and element interactions.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use recreplay_common::clock::Millis;
use recreplay_recording_model::frame::{Point, ScrollOffset};

use crate::{
    AnimationFrames, Element, ElementRef, EventTarget, FrameRequestId, Listener, ListenerId,
    Marker, MarkerHandle, RawEvent, RawEventKind, Surface, Timers,
};

/// Listener registry shared by the headless surface and document.
#[derive(Default)]
struct ListenerTable {
    next_id: ListenerId,
    entries: Vec<(ListenerId, RawEventKind, Listener)>,
}

impl ListenerTable {
    fn add(&mut self, kind: RawEventKind, listener: Listener) -> ListenerId {
        self.next_id += 1;
        self.entries.push((self.next_id, kind, listener));
        self.next_id
    }

    fn remove(&mut self, id: ListenerId) {
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
    }

    fn matching(&self, kind: RawEventKind) -> Vec<Listener> {
        self.entries
            .iter()
            .filter(|(_, entry_kind, _)| *entry_kind == kind)
            .map(|(_, _, listener)| listener.clone())
            .collect()
    }

    fn count(&self, kind: RawEventKind) -> usize {
        self.entries
            .iter()
            .filter(|(_, entry_kind, _)| *entry_kind == kind)
            .count()
    }
}

/// Axis-aligned rectangle in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x < self.x + self.width
            && point.y >= self.y
            && point.y < self.y + self.height
    }
}

/// An element on a headless surface that records what was done to it.
#[derive(Debug)]
pub struct HeadlessElement {
    tag: String,
    value: RefCell<String>,
    focused: Cell<bool>,
    clicks: Cell<u32>,
}

impl HeadlessElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: RefCell::new(String::new()),
            focused: Cell::new(false),
            clicks: Cell::new(0),
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    pub fn click_count(&self) -> u32 {
        self.clicks.get()
    }
}

impl Element for HeadlessElement {
    fn tag_name(&self) -> String {
        self.tag.clone()
    }

    fn focus(&self) {
        self.focused.set(true);
    }

    fn blur(&self) {
        self.focused.set(false);
    }

    fn click(&self) {
        self.clicks.set(self.clicks.get() + 1);
    }

    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.borrow_mut() = value.to_string();
    }
}

#[derive(Default)]
struct SurfaceState {
    offset: Point,
    scroll: ScrollOffset,
    listeners: ListenerTable,
    elements: Vec<(Rect, Rc<HeadlessElement>)>,
    markers: BTreeMap<MarkerHandle, Marker>,
    next_marker: MarkerHandle,
    hit_tests: Vec<Point>,
}

/// A scrollable surface living entirely in memory.
#[derive(Default)]
pub struct HeadlessSurface {
    state: RefCell<SurfaceState>,
}

impl HeadlessSurface {
    /// A surface whose origin sits at the top-left of the viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose origin is offset within the viewport.
    pub fn with_offset(offset: Point) -> Self {
        let surface = Self::default();
        surface.state.borrow_mut().offset = offset;
        surface
    }

    /// Deliver `event` to every listener subscribed to its kind.
    pub fn dispatch(&self, event: RawEvent) {
        // Listeners may query the surface, so the borrow ends before they run.
        let listeners = self.state.borrow().listeners.matching(event.kind());
        for listener in listeners {
            listener(&event);
        }
    }

    /// Scroll as a user would: move the offset, then notify listeners.
    pub fn scroll_to(&self, offset: ScrollOffset) {
        self.state.borrow_mut().scroll = offset;
        self.dispatch(RawEvent::Scroll);
    }

    /// Place an element on the surface. Later elements sit on top.
    pub fn add_element(&self, tag: &str, bounds: Rect) -> Rc<HeadlessElement> {
        let element = Rc::new(HeadlessElement::new(tag));
        self.state
            .borrow_mut()
            .elements
            .push((bounds, element.clone()));
        element
    }

    pub fn listener_count(&self, kind: RawEventKind) -> usize {
        self.state.borrow().listeners.count(kind)
    }

    /// All markers currently on the surface, in insertion order.
    pub fn markers(&self) -> Vec<Marker> {
        self.state.borrow().markers.values().cloned().collect()
    }

    pub fn marker(&self, id: &str) -> Option<Marker> {
        self.state
            .borrow()
            .markers
            .values()
            .find(|marker| marker.id.as_deref() == Some(id))
            .cloned()
    }

    pub fn markers_with_class(&self, class_name: &str) -> Vec<Marker> {
        self.state
            .borrow()
            .markers
            .values()
            .filter(|marker| marker.class_name.as_deref() == Some(class_name))
            .cloned()
            .collect()
    }

    /// Every point passed to hit-testing, in order.
    pub fn hit_tests(&self) -> Vec<Point> {
        self.state.borrow().hit_tests.clone()
    }
}

impl EventTarget for HeadlessSurface {
    fn add_listener(&self, kind: RawEventKind, listener: Listener) -> ListenerId {
        self.state.borrow_mut().listeners.add(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.state.borrow_mut().listeners.remove(id);
    }
}

impl Surface for HeadlessSurface {
    fn bounding_offset(&self) -> Point {
        self.state.borrow().offset
    }

    fn scroll_offset(&self) -> ScrollOffset {
        self.state.borrow().scroll
    }

    fn set_scroll_offset(&self, offset: ScrollOffset) {
        self.state.borrow_mut().scroll = offset;
    }

    fn element_from_point(&self, point: Point) -> Option<ElementRef> {
        let mut state = self.state.borrow_mut();
        state.hit_tests.push(point);
        state
            .elements
            .iter()
            .rev()
            .find(|(bounds, _)| bounds.contains(point))
            .map(|(_, element)| element.clone() as ElementRef)
    }

    fn insert_marker(&self, marker: Marker) -> MarkerHandle {
        let mut state = self.state.borrow_mut();
        state.next_marker += 1;
        let handle = state.next_marker;
        state.markers.insert(handle, marker);
        handle
    }

    fn marker_by_id(&self, id: &str) -> Option<MarkerHandle> {
        self.state
            .borrow()
            .markers
            .iter()
            .find(|(_, marker)| marker.id.as_deref() == Some(id))
            .map(|(handle, _)| *handle)
    }

    fn move_marker(&self, handle: MarkerHandle, position: Point) {
        if let Some(marker) = self.state.borrow_mut().markers.get_mut(&handle) {
            marker.position = position;
        }
    }

    fn remove_marker(&self, handle: MarkerHandle) {
        self.state.borrow_mut().markers.remove(&handle);
    }
}

/// Document-level event target for key events.
#[derive(Default)]
pub struct HeadlessDocument {
    listeners: RefCell<ListenerTable>,
}

impl HeadlessDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&self, event: RawEvent) {
        let listeners = self.listeners.borrow().matching(event.kind());
        for listener in listeners {
            listener(&event);
        }
    }

    /// A keystroke as a browser reports it: keydown, then keypress for
    /// character-producing keys. Backspace produces no keypress.
    pub fn type_key(&self, key_code: u32) {
        self.dispatch(RawEvent::KeyDown { key_code });
        if key_code != recreplay_recording_model::frame::BACKSPACE {
            self.dispatch(RawEvent::KeyPress { key_code });
        }
    }

    pub fn listener_count(&self, kind: RawEventKind) -> usize {
        self.listeners.borrow().count(kind)
    }
}

impl EventTarget for HeadlessDocument {
    fn add_listener(&self, kind: RawEventKind, listener: Listener) -> ListenerId {
        self.listeners.borrow_mut().add(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(id);
    }
}

struct PendingTimer {
    due_ms: Millis,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct SchedulerState {
    now_ms: Millis,
    next_frame: FrameRequestId,
    frames: Vec<(FrameRequestId, Box<dyn FnOnce(Millis)>)>,
    next_timer: u64,
    timers: Vec<PendingTimer>,
}

/// Virtual-time paint and timer source.
#[derive(Default)]
pub struct HeadlessScheduler {
    state: RefCell<SchedulerState>,
}

impl HeadlessScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move virtual time forward, firing timers that come due in order.
    pub fn advance(&self, delta_ms: Millis) {
        let target = self.state.borrow().now_ms + delta_ms.max(0.0);
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.due_ms <= target)
                    .min_by(|(_, a), (_, b)| {
                        a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq))
                    })
                    .map(|(index, _)| index);
                match due {
                    Some(index) => {
                        let timer = state.timers.remove(index);
                        state.now_ms = state.now_ms.max(timer.due_ms);
                        Some(timer.callback)
                    }
                    None => None,
                }
            };
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.state.borrow_mut().now_ms = target;
    }

    /// Run every paint callback registered before this call. Callbacks
    /// registered while painting wait for the next paint.
    pub fn paint(&self) -> usize {
        let (now, frames) = {
            let mut state = self.state.borrow_mut();
            (state.now_ms, std::mem::take(&mut state.frames))
        };
        let count = frames.len();
        for (_, callback) in frames {
            callback(now);
        }
        count
    }

    /// Alternate `advance(refresh_ms)` and `paint()` `count` times.
    pub fn run_paints(&self, count: usize, refresh_ms: Millis) {
        for _ in 0..count {
            self.advance(refresh_ms);
            self.paint();
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.state.borrow().timers.len()
    }
}

impl AnimationFrames for HeadlessScheduler {
    fn now_ms(&self) -> Millis {
        self.state.borrow().now_ms
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(Millis)>) -> FrameRequestId {
        let mut state = self.state.borrow_mut();
        state.next_frame += 1;
        let id = state.next_frame;
        state.frames.push((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        self.state
            .borrow_mut()
            .frames
            .retain(|(frame_id, _)| *frame_id != id);
    }
}

impl Timers for HeadlessScheduler {
    fn set_timeout(&self, delay_ms: u64, callback: Box<dyn FnOnce()>) {
        let mut state = self.state.borrow_mut();
        state.next_timer += 1;
        let timer = PendingTimer {
            due_ms: state.now_ms + delay_ms as Millis,
            seq: state.next_timer,
            callback,
        };
        state.timers.push(timer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_reaches_matching_listeners_only() {
        let surface = HeadlessSurface::new();
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let id = surface.add_listener(
            RawEventKind::Click,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );

        surface.dispatch(RawEvent::Click {
            client: Point::new(1, 1),
        });
        surface.dispatch(RawEvent::MouseMove {
            client: Point::new(1, 1),
        });
        assert_eq!(clicks.get(), 1);

        surface.remove_listener(id);
        surface.dispatch(RawEvent::Click {
            client: Point::new(1, 1),
        });
        assert_eq!(clicks.get(), 1);
        assert_eq!(surface.listener_count(RawEventKind::Click), 0);
    }

    #[test]
    fn test_listener_can_query_surface() {
        let surface = Rc::new(HeadlessSurface::new());
        let seen = Rc::new(Cell::new(ScrollOffset::default()));
        let weak = Rc::downgrade(&surface);
        let sink = seen.clone();
        surface.add_listener(
            RawEventKind::Scroll,
            Rc::new(move |_| {
                if let Some(surface) = weak.upgrade() {
                    sink.set(surface.scroll_offset());
                }
            }),
        );
        surface.scroll_to(ScrollOffset::new(0, 120));
        assert_eq!(seen.get(), ScrollOffset::new(0, 120));
    }

    #[test]
    fn test_hit_test_returns_topmost() {
        let surface = HeadlessSurface::new();
        let below = surface.add_element("div", Rect::new(0, 0, 100, 100));
        let above = surface.add_element("input", Rect::new(10, 10, 20, 20));

        let hit = surface.element_from_point(Point::new(15, 15)).unwrap();
        assert_eq!(hit.tag_name(), "input");
        assert!(hit.is_text_input());
        hit.click();
        assert_eq!(above.click_count(), 1);
        assert_eq!(below.click_count(), 0);

        assert!(surface.element_from_point(Point::new(500, 500)).is_none());
        assert_eq!(surface.hit_tests().len(), 2);
    }

    #[test]
    fn test_markers_lookup_move_remove() {
        let surface = HeadlessSurface::new();
        let handle = surface.insert_marker(Marker {
            id: Some("pointer".to_string()),
            class_name: None,
            appearance: crate::MarkerAppearance::Pointer,
            position: Point::new(0, 0),
            width: 14,
            height: 21,
            z_index: 999,
            opacity: 1.0,
        });
        assert_eq!(surface.marker_by_id("pointer"), Some(handle));

        surface.move_marker(handle, Point::new(5, 7));
        assert_eq!(surface.marker("pointer").unwrap().position, Point::new(5, 7));

        surface.remove_marker(handle);
        surface.remove_marker(handle);
        assert!(surface.markers().is_empty());
    }

    #[test]
    fn test_paint_runs_only_previously_requested_frames() {
        let scheduler = Rc::new(HeadlessScheduler::new());
        let runs = Rc::new(Cell::new(0));

        let inner_scheduler = scheduler.clone();
        let inner_runs = runs.clone();
        scheduler.request_frame(Box::new(move |_| {
            inner_runs.set(inner_runs.get() + 1);
            let again = inner_runs.clone();
            inner_scheduler.request_frame(Box::new(move |_| again.set(again.get() + 1)));
        }));

        assert_eq!(scheduler.paint(), 1);
        assert_eq!(runs.get(), 1);
        assert_eq!(scheduler.pending_frames(), 1);
        assert_eq!(scheduler.paint(), 1);
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn test_cancel_frame() {
        let scheduler = HeadlessScheduler::new();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let id = scheduler.request_frame(Box::new(move |_| flag.set(true)));
        scheduler.cancel_frame(id);
        scheduler.cancel_frame(id);
        scheduler.paint();
        assert!(!ran.get());
    }

    #[test]
    fn test_timers_fire_in_due_order() {
        let scheduler = HeadlessScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(300, "late"), (100, "early"), (100, "early-second")] {
            let order = order.clone();
            scheduler.set_timeout(delay, Box::new(move || order.borrow_mut().push(label)));
        }

        scheduler.advance(99.0);
        assert!(order.borrow().is_empty());
        scheduler.advance(1.0);
        assert_eq!(*order.borrow(), vec!["early", "early-second"]);
        scheduler.advance(500.0);
        assert_eq!(*order.borrow(), vec!["early", "early-second", "late"]);
        assert_eq!(scheduler.pending_timers(), 0);
        assert!((scheduler.now_ms() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_type_key_skips_keypress_for_backspace() {
        let document = HeadlessDocument::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for kind in [RawEventKind::KeyDown, RawEventKind::KeyPress] {
            let seen = seen.clone();
            document.add_listener(kind, Rc::new(move |event| seen.borrow_mut().push(*event)));
        }

        document.type_key(65);
        document.type_key(8);
        assert_eq!(
            *seen.borrow(),
            vec![
                RawEvent::KeyDown { key_code: 65 },
                RawEvent::KeyPress { key_code: 65 },
                RawEvent::KeyDown { key_code: 8 },
            ]
        );
    }
}
