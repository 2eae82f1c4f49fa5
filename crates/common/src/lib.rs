//! Recreplay Common Utilities
//!
//! Shared infrastructure for all Recreplay crates:
//! - Error types and result aliases
//! - Frame pacing math used by the frame clock
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
