//! Per-class capture descriptors.
//!
//! Each enabled [`EventClass`] contributes listeners that write into the
//! shared [`Accumulator`], and a consume step that copies accumulated state
//! into the next [`Frame`]. The recorder iterates the descriptors instead of
//! branching on every class at construction and append time.

use std::cell::RefCell;
use std::rc::Rc;

use recreplay_host_core::event::to_surface_local;
use recreplay_host_core::{EventTarget, Listener, ListenerId, RawEvent, RawEventKind, Surface};
use recreplay_recording_model::event_class::EventClass;
use recreplay_recording_model::frame::{Frame, Point, ScrollOffset, BACKSPACE};

/// Raw state written by listeners between ticks.
///
/// Edge-triggered fields (`click`, `context`, `keypress`) are taken by the
/// next frame, so each discrete event lands in exactly one frame and a later
/// event in the same tick replaces an earlier one. Level-triggered fields
/// (`mouse`, `scroll`) are copied and keep their value until overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    pub click: Option<Point>,
    pub context: Option<Point>,
    pub mouse: Option<Point>,
    pub scroll: Option<ScrollOffset>,
    pub keypress: Option<u32>,
}

/// Where a listener was attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribedOn {
    Surface,
    Document,
}

/// A listener attached on behalf of one event class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription {
    pub class: EventClass,
    pub on: SubscribedOn,
    pub id: ListenerId,
}

/// Handles a descriptor needs to attach its listeners.
pub struct CaptureContext<'a> {
    pub surface: &'a Rc<dyn Surface>,
    pub document: &'a Rc<dyn EventTarget>,
    pub accumulator: &'a Rc<RefCell<Accumulator>>,
}

/// Capture behavior of one event class.
pub struct CaptureDescriptor {
    pub class: EventClass,
    subscribe: fn(&CaptureContext<'_>) -> Vec<Subscription>,
    consume: fn(&mut Accumulator, &mut Frame),
}

impl CaptureDescriptor {
    /// Attach this class's listeners.
    pub fn subscribe(&self, ctx: &CaptureContext<'_>) -> Vec<Subscription> {
        (self.subscribe)(ctx)
    }

    /// Move accumulated state into `frame`, clearing edge-triggered fields.
    pub fn consume(&self, accumulator: &mut Accumulator, frame: &mut Frame) {
        (self.consume)(accumulator, frame)
    }
}

static DESCRIPTORS: [CaptureDescriptor; 5] = [
    CaptureDescriptor {
        class: EventClass::Click,
        subscribe: subscribe_click,
        consume: consume_click,
    },
    CaptureDescriptor {
        class: EventClass::ContextMenu,
        subscribe: subscribe_context_menu,
        consume: consume_context_menu,
    },
    CaptureDescriptor {
        class: EventClass::MouseMove,
        subscribe: subscribe_mouse_move,
        consume: consume_mouse_move,
    },
    CaptureDescriptor {
        class: EventClass::Scroll,
        subscribe: subscribe_scroll,
        consume: consume_scroll,
    },
    CaptureDescriptor {
        class: EventClass::KeyPress,
        subscribe: subscribe_keypress,
        consume: consume_keypress,
    },
];

/// Descriptors in frame-append order.
pub fn descriptors() -> &'static [CaptureDescriptor] {
    &DESCRIPTORS
}

/// The descriptor for `class`.
pub fn descriptor(class: EventClass) -> &'static CaptureDescriptor {
    let index = match class {
        EventClass::Click => 0,
        EventClass::ContextMenu => 1,
        EventClass::MouseMove => 2,
        EventClass::Scroll => 3,
        EventClass::KeyPress => 4,
    };
    &DESCRIPTORS[index]
}

/// Listener recording a pointer position relative to the surface origin.
fn pointer_listener(ctx: &CaptureContext<'_>, write: fn(&mut Accumulator, Point)) -> Listener {
    let surface = Rc::downgrade(ctx.surface);
    let accumulator = ctx.accumulator.clone();
    Rc::new(move |event: &RawEvent| {
        let (Some(client), Some(surface)) = (event.client_point(), surface.upgrade()) else {
            return;
        };
        match to_surface_local(client, surface.bounding_offset()) {
            Some(local) => write(&mut accumulator.borrow_mut(), local),
            None => tracing::warn!(
                x = client.x,
                y = client.y,
                "Dropping pointer event outside the surface coordinate range"
            ),
        }
    })
}

fn on_surface(
    ctx: &CaptureContext<'_>,
    class: EventClass,
    kind: RawEventKind,
    listener: Listener,
) -> Subscription {
    Subscription {
        class,
        on: SubscribedOn::Surface,
        id: ctx.surface.add_listener(kind, listener),
    }
}

fn on_document(
    ctx: &CaptureContext<'_>,
    class: EventClass,
    kind: RawEventKind,
    listener: Listener,
) -> Subscription {
    Subscription {
        class,
        on: SubscribedOn::Document,
        id: ctx.document.add_listener(kind, listener),
    }
}

fn subscribe_click(ctx: &CaptureContext<'_>) -> Vec<Subscription> {
    let listener = pointer_listener(ctx, |acc, point| acc.click = Some(point));
    vec![on_surface(ctx, EventClass::Click, RawEventKind::Click, listener)]
}

fn subscribe_context_menu(ctx: &CaptureContext<'_>) -> Vec<Subscription> {
    let listener = pointer_listener(ctx, |acc, point| acc.context = Some(point));
    vec![on_surface(
        ctx,
        EventClass::ContextMenu,
        RawEventKind::ContextMenu,
        listener,
    )]
}

fn subscribe_mouse_move(ctx: &CaptureContext<'_>) -> Vec<Subscription> {
    let listener = pointer_listener(ctx, |acc, point| acc.mouse = Some(point));
    vec![on_surface(
        ctx,
        EventClass::MouseMove,
        RawEventKind::MouseMove,
        listener,
    )]
}

fn subscribe_scroll(ctx: &CaptureContext<'_>) -> Vec<Subscription> {
    let surface = Rc::downgrade(ctx.surface);
    let accumulator = ctx.accumulator.clone();
    let listener: Listener = Rc::new(move |_: &RawEvent| {
        if let Some(surface) = surface.upgrade() {
            accumulator.borrow_mut().scroll = Some(surface.scroll_offset());
        }
    });
    vec![on_surface(ctx, EventClass::Scroll, RawEventKind::Scroll, listener)]
}

fn subscribe_keypress(ctx: &CaptureContext<'_>) -> Vec<Subscription> {
    let accumulator = ctx.accumulator.clone();
    let keypress: Listener = Rc::new(move |event: &RawEvent| {
        if let Some(code) = event.key_code() {
            accumulator.borrow_mut().keypress = Some(code);
        }
    });

    // Backspace does not produce a keypress on every host.
    let accumulator = ctx.accumulator.clone();
    let keydown: Listener = Rc::new(move |event: &RawEvent| {
        if event.key_code() == Some(BACKSPACE) {
            accumulator.borrow_mut().keypress = Some(BACKSPACE);
        }
    });

    vec![
        on_document(ctx, EventClass::KeyPress, RawEventKind::KeyPress, keypress),
        on_document(ctx, EventClass::KeyPress, RawEventKind::KeyDown, keydown),
    ]
}

fn consume_click(acc: &mut Accumulator, frame: &mut Frame) {
    let click = acc.click.take();
    frame.click_x = Some(click.map(|p| p.x));
    frame.click_y = Some(click.map(|p| p.y));
}

fn consume_context_menu(acc: &mut Accumulator, frame: &mut Frame) {
    let context = acc.context.take();
    frame.context_x = Some(context.map(|p| p.x));
    frame.context_y = Some(context.map(|p| p.y));
}

fn consume_mouse_move(acc: &mut Accumulator, frame: &mut Frame) {
    frame.mouse_x = Some(acc.mouse.map(|p| p.x));
    frame.mouse_y = Some(acc.mouse.map(|p| p.y));
}

fn consume_scroll(acc: &mut Accumulator, frame: &mut Frame) {
    frame.scroll_x = Some(acc.scroll.map(|s| s.left));
    frame.scroll_y = Some(acc.scroll.map(|s| s.top));
}

fn consume_keypress(acc: &mut Accumulator, frame: &mut Frame) {
    frame.keypress = Some(acc.keypress.take());
}
