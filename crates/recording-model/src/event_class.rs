//! The interaction kinds a recorder can capture.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the five capturable interaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventClass {
    Scroll,
    #[serde(rename = "mousemove")]
    MouseMove,
    #[serde(rename = "keypress")]
    KeyPress,
    Click,
    #[serde(rename = "contextmenu")]
    ContextMenu,
}

impl EventClass {
    /// Every class, in the default configuration order.
    pub const ALL: [EventClass; 5] = [
        EventClass::Scroll,
        EventClass::MouseMove,
        EventClass::KeyPress,
        EventClass::Click,
        EventClass::ContextMenu,
    ];

    /// The configuration name of this class.
    pub fn name(self) -> &'static str {
        match self {
            EventClass::Scroll => "scroll",
            EventClass::MouseMove => "mousemove",
            EventClass::KeyPress => "keypress",
            EventClass::Click => "click",
            EventClass::ContextMenu => "contextmenu",
        }
    }

    /// Edge-triggered classes record a discrete event and are cleared after
    /// every frame. The others hold the latest value until it changes.
    pub fn is_edge_triggered(self) -> bool {
        matches!(
            self,
            EventClass::Click | EventClass::ContextMenu | EventClass::KeyPress
        )
    }

    fn bit(self) -> u8 {
        match self {
            EventClass::Scroll => 1 << 0,
            EventClass::MouseMove => 1 << 1,
            EventClass::KeyPress => 1 << 2,
            EventClass::Click => 1 << 3,
            EventClass::ContextMenu => 1 << 4,
        }
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a name does not match any [`EventClass`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEventClass(pub String);

impl fmt::Display for UnknownEventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown event '{}'", self.0)
    }
}

impl std::error::Error for UnknownEventClass {}

impl FromStr for EventClass {
    type Err = UnknownEventClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventClass::ALL
            .into_iter()
            .find(|class| class.name() == s)
            .ok_or_else(|| UnknownEventClass(s.to_string()))
    }
}

/// A set of enabled event classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventSet(u8);

impl EventSet {
    /// No classes enabled.
    pub fn empty() -> Self {
        Self(0)
    }

    /// All five classes enabled.
    pub fn all() -> Self {
        EventClass::ALL.into_iter().collect()
    }

    /// Resolve configured names. Unknown names are logged and skipped.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        let mut set = Self::empty();
        for name in names {
            match name.as_ref().parse::<EventClass>() {
                Ok(class) => set.insert(class),
                Err(e) => tracing::warn!("{e}"),
            }
        }
        set
    }

    pub fn insert(&mut self, class: EventClass) {
        self.0 |= class.bit();
    }

    pub fn contains(&self, class: EventClass) -> bool {
        self.0 & class.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Enabled classes, in [`EventClass::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = EventClass> + '_ {
        EventClass::ALL
            .into_iter()
            .filter(move |class| self.contains(*class))
    }

    /// Configuration names of the enabled classes.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(EventClass::name).collect()
    }
}

impl FromIterator<EventClass> for EventSet {
    fn from_iter<I: IntoIterator<Item = EventClass>>(iter: I) -> Self {
        let mut set = Self::empty();
        for class in iter {
            set.insert(class);
        }
        set
    }
}
