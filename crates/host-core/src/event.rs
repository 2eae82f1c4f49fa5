//! Raw interaction events delivered by the host.

use recreplay_recording_model::frame::{Point, ScrollOffset};

/// Kinds of raw events a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawEventKind {
    Click,
    ContextMenu,
    MouseMove,
    Scroll,
    KeyPress,
    KeyDown,
}

/// A raw event as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    /// Primary button click at viewport coordinates.
    Click { client: Point },
    ContextMenu { client: Point },
    MouseMove { client: Point },
    /// The surface scrolled; listeners read the new offset from the surface.
    Scroll,
    /// A character-producing keystroke.
    KeyPress { key_code: u32 },
    KeyDown { key_code: u32 },
}

impl RawEvent {
    pub fn kind(&self) -> RawEventKind {
        match self {
            RawEvent::Click { .. } => RawEventKind::Click,
            RawEvent::ContextMenu { .. } => RawEventKind::ContextMenu,
            RawEvent::MouseMove { .. } => RawEventKind::MouseMove,
            RawEvent::Scroll => RawEventKind::Scroll,
            RawEvent::KeyPress { .. } => RawEventKind::KeyPress,
            RawEvent::KeyDown { .. } => RawEventKind::KeyDown,
        }
    }

    /// Viewport coordinates for pointer events.
    pub fn client_point(&self) -> Option<Point> {
        match self {
            RawEvent::Click { client }
            | RawEvent::ContextMenu { client }
            | RawEvent::MouseMove { client } => Some(*client),
            _ => None,
        }
    }

    pub fn key_code(&self) -> Option<u32> {
        match self {
            RawEvent::KeyPress { key_code } | RawEvent::KeyDown { key_code } => Some(*key_code),
            _ => None,
        }
    }
}

/// Convert viewport coordinates to surface-local ones. `None` when the
/// result does not fit in an `i32`.
pub fn to_surface_local(client: Point, surface_offset: Point) -> Option<Point> {
    Some(Point::new(
        client.x.checked_sub(surface_offset.x)?,
        client.y.checked_sub(surface_offset.y)?,
    ))
}

/// Convert a surface-local point to content coordinates. `None` when the
/// result does not fit in an `i32`.
pub fn to_content(local: Point, scroll: ScrollOffset) -> Option<Point> {
    Some(Point::new(
        local.x.checked_add(scroll.left)?,
        local.y.checked_add(scroll.top)?,
    ))
}
