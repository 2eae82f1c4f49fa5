//! Recreplay Recording Model
//!
//! Defines the data contracts shared by the recorder and the player:
//! - **Event classes:** the five interaction kinds that can be captured
//! - **Frames:** one snapshot of interaction state per clock tick
//! - **Recording:** `{ fps, frames }`, the only persisted format
//!
//! Coordinates are integers relative to the recorded surface's origin so a
//! recording can be replayed against a surface sitting elsewhere on screen.

pub mod event_class;
pub mod frame;
pub mod recording;

pub use event_class::*;
pub use frame::*;
pub use recording::*;
