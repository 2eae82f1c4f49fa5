//! Per-class replay descriptors.
//!
//! The mirror image of the recorder's capture descriptors: each event class
//! knows how to turn its frame fields back into surface interactions. They
//! run in [`descriptors`] order, which puts pointer movement before clicks
//! so the pointer marker already sits on the click position.

use std::rc::Rc;

use recreplay_common::config::MarkerConfig;
use recreplay_host_core::event::to_content;
use recreplay_host_core::{ElementRef, Surface, Timers};
use recreplay_recording_model::event_class::EventClass;
use recreplay_recording_model::frame::{Frame, Point, BACKSPACE};

use crate::markers::{self, DotKind};

/// Vertical distance above the recorded point at which clicks hit-test, so
/// the pointer marker drawn at that point is not the element found.
pub const HIT_TEST_OFFSET_Y: i32 = 1;

/// Host handles and replay-scoped state available to a descriptor.
pub struct ReplayContext<'a> {
    pub surface: &'a Rc<dyn Surface>,
    pub timers: &'a Rc<dyn Timers>,
    pub markers: &'a MarkerConfig,
    /// Text input that replayed keystrokes are typed into.
    pub focused: &'a mut Option<ElementRef>,
}

impl ReplayContext<'_> {
    /// Surface-local point to content coordinates at the current scroll.
    /// Points that land outside the coordinate range are logged and dropped.
    fn content_point(&self, class: EventClass, local: Point) -> Option<Point> {
        let content = to_content(local, self.surface.scroll_offset());
        if content.is_none() {
            tracing::warn!(
                event = %class,
                x = local.x,
                y = local.y,
                "Skipping recorded point outside the coordinate range"
            );
        }
        content
    }
}

/// Replay behavior of one event class.
pub struct ReplayDescriptor {
    pub class: EventClass,
    replay: fn(&mut ReplayContext<'_>, &Frame),
}

impl ReplayDescriptor {
    pub fn replay(&self, ctx: &mut ReplayContext<'_>, frame: &Frame) {
        (self.replay)(ctx, frame)
    }
}

static DESCRIPTORS: [ReplayDescriptor; 5] = [
    ReplayDescriptor {
        class: EventClass::MouseMove,
        replay: replay_mouse_move,
    },
    ReplayDescriptor {
        class: EventClass::Click,
        replay: replay_click,
    },
    ReplayDescriptor {
        class: EventClass::ContextMenu,
        replay: replay_context_menu,
    },
    ReplayDescriptor {
        class: EventClass::Scroll,
        replay: replay_scroll,
    },
    ReplayDescriptor {
        class: EventClass::KeyPress,
        replay: replay_keypress,
    },
];

/// Descriptors in replay order.
pub fn descriptors() -> &'static [ReplayDescriptor] {
    &DESCRIPTORS
}

/// Apply every populated field of `frame` to the surface.
pub fn replay_frame(ctx: &mut ReplayContext<'_>, frame: &Frame) {
    for descriptor in descriptors() {
        descriptor.replay(ctx, frame);
    }
}

fn replay_mouse_move(ctx: &mut ReplayContext<'_>, frame: &Frame) {
    let Some(point) = frame.mouse() else {
        return;
    };
    let Some(position) = ctx.content_point(EventClass::MouseMove, point) else {
        return;
    };
    markers::place_pointer(ctx.surface.as_ref(), ctx.markers, position);
}

fn replay_click(ctx: &mut ReplayContext<'_>, frame: &Frame) {
    let Some(point) = frame.click() else {
        return;
    };
    let Some(position) = ctx.content_point(EventClass::Click, point) else {
        return;
    };
    let Some(probe_y) = position.y.checked_sub(HIT_TEST_OFFSET_Y) else {
        tracing::warn!(x = position.x, y = position.y, "Skipping click with no point above it");
        return;
    };
    let probe = Point::new(position.x, probe_y);

    match ctx.surface.element_from_point(probe) {
        Some(element) if element.is_text_input() => {
            element.focus();
            *ctx.focused = Some(element);
        }
        Some(element) => {
            element.click();
            if let Some(previous) = ctx.focused.take() {
                previous.blur();
            }
        }
        None => {
            tracing::warn!(x = probe.x, y = probe.y, "No element under replayed click");
        }
    }

    markers::add_dot(
        ctx.surface,
        ctx.timers.as_ref(),
        ctx.markers,
        DotKind::Click,
        position,
    );
}

fn replay_context_menu(ctx: &mut ReplayContext<'_>, frame: &Frame) {
    let Some(point) = frame.context_menu() else {
        return;
    };
    let Some(position) = ctx.content_point(EventClass::ContextMenu, point) else {
        return;
    };
    markers::add_dot(
        ctx.surface,
        ctx.timers.as_ref(),
        ctx.markers,
        DotKind::ContextMenu,
        position,
    );
}

fn replay_scroll(ctx: &mut ReplayContext<'_>, frame: &Frame) {
    let (left, top) = (frame.scroll_left(), frame.scroll_top());
    if left.is_none() && top.is_none() {
        return;
    }
    let mut offset = ctx.surface.scroll_offset();
    if let Some(left) = left {
        offset.left = left;
    }
    if let Some(top) = top {
        offset.top = top;
    }
    ctx.surface.set_scroll_offset(offset);
}

fn replay_keypress(ctx: &mut ReplayContext<'_>, frame: &Frame) {
    let Some(code) = frame.key_code() else {
        return;
    };
    let Some(element) = ctx.focused.as_ref() else {
        tracing::trace!(code, "Keypress with no focused input");
        return;
    };

    let mut value = element.value();
    if code == BACKSPACE {
        value.pop();
    } else {
        match char::from_u32(code) {
            Some(ch) => value.push(ch),
            None => {
                tracing::warn!(code, "Skipping keypress that is not a character");
                return;
            }
        }
    }
    element.set_value(&value);
}
