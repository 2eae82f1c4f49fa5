//! Per-tick interaction snapshots.

use serde::{Deserialize, Deserializer, Serialize};

use crate::event_class::EventClass;

/// A frame field.
///
/// - `None`: the owning event class was not enabled; the key is omitted
///   from the serialized frame.
/// - `Some(None)`: the class was enabled but nothing was recorded (`null`).
/// - `Some(Some(v))`: a recorded value.
pub type Recorded<T> = Option<Option<T>>;

/// Integer point in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Scroll position of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub left: i32,
    pub top: i32,
}

impl ScrollOffset {
    pub const fn new(left: i32, top: i32) -> Self {
        Self { left, top }
    }
}

/// Key code that erases the last character of the focused input.
pub const BACKSPACE: u32 = 8;

/// Interaction state captured on one clock tick.
///
/// Click, context-menu and keypress fields are edge-triggered: they hold at
/// most one event since the previous tick. Pointer and scroll fields are
/// level-triggered and repeat until the value changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub click_x: Recorded<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub click_y: Recorded<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub context_x: Recorded<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub context_y: Recorded<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub mouse_x: Recorded<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub mouse_y: Recorded<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub scroll_x: Recorded<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub scroll_y: Recorded<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub keypress: Recorded<u32>,
}

/// A key that is present deserializes to `Some`, even when its value is null.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn pair(x: Recorded<i32>, y: Recorded<i32>) -> Option<Point> {
    match (x.flatten(), y.flatten()) {
        (Some(x), Some(y)) => Some(Point::new(x, y)),
        _ => None,
    }
}

impl Frame {
    /// Click position, when both coordinates were recorded.
    pub fn click(&self) -> Option<Point> {
        pair(self.click_x, self.click_y)
    }

    /// Context-menu position, when both coordinates were recorded.
    pub fn context_menu(&self) -> Option<Point> {
        pair(self.context_x, self.context_y)
    }

    /// Pointer position, when both coordinates were recorded.
    pub fn mouse(&self) -> Option<Point> {
        pair(self.mouse_x, self.mouse_y)
    }

    pub fn scroll_left(&self) -> Option<i32> {
        self.scroll_x.flatten()
    }

    pub fn scroll_top(&self) -> Option<i32> {
        self.scroll_y.flatten()
    }

    pub fn key_code(&self) -> Option<u32> {
        self.keypress.flatten()
    }

    /// Whether this frame carries a recorded value for `class`.
    pub fn has_value(&self, class: EventClass) -> bool {
        match class {
            EventClass::Click => self.click().is_some(),
            EventClass::ContextMenu => self.context_menu().is_some(),
            EventClass::MouseMove => self.mouse().is_some(),
            EventClass::Scroll => self.scroll_left().is_some() || self.scroll_top().is_some(),
            EventClass::KeyPress => self.key_code().is_some(),
        }
    }

    /// Whether the fields of `class` appear in this frame at all (possibly
    /// as nulls).
    pub fn carries(&self, class: EventClass) -> bool {
        match class {
            EventClass::Click => self.click_x.is_some() || self.click_y.is_some(),
            EventClass::ContextMenu => self.context_x.is_some() || self.context_y.is_some(),
            EventClass::MouseMove => self.mouse_x.is_some() || self.mouse_y.is_some(),
            EventClass::Scroll => self.scroll_x.is_some() || self.scroll_y.is_some(),
            EventClass::KeyPress => self.keypress.is_some(),
        }
    }

    /// True when nothing was recorded on this tick.
    pub fn is_idle(&self) -> bool {
        EventClass::ALL.into_iter().all(|class| !self.has_value(class))
    }

    pub fn with_click(mut self, x: i32, y: i32) -> Self {
        self.click_x = Some(Some(x));
        self.click_y = Some(Some(y));
        self
    }

    pub fn with_context_menu(mut self, x: i32, y: i32) -> Self {
        self.context_x = Some(Some(x));
        self.context_y = Some(Some(y));
        self
    }

    pub fn with_mouse(mut self, x: i32, y: i32) -> Self {
        self.mouse_x = Some(Some(x));
        self.mouse_y = Some(Some(y));
        self
    }

    pub fn with_scroll(mut self, left: i32, top: i32) -> Self {
        self.scroll_x = Some(Some(left));
        self.scroll_y = Some(Some(top));
        self
    }

    pub fn with_scroll_top(mut self, top: i32) -> Self {
        self.scroll_y = Some(Some(top));
        self
    }

    pub fn with_keypress(mut self, code: u32) -> Self {
        self.keypress = Some(Some(code));
        self
    }
}
