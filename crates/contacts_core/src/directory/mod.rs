//! Device contact directory boundary.
//!
//! # Responsibility
//! - Define the callback-based contact source contract of the device.
//! - Bridge that callback pair into one awaitable load result.
//!
//! # Invariants
//! - One `load()` call invokes the source exactly once.
//! - A load result is observed at most once, whichever callback fires first.

pub mod adapter;
pub mod source;
