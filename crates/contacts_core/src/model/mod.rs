//! Domain model for contacts flowing from the device directory to the screens.
//!
//! # Responsibility
//! - Define the immutable `Contact` record shared by store and screens.
//! - Define the raw device tuple shape consumed at the directory boundary.
//!
//! # Invariants
//! - A `Contact` is never mutated after the directory adapter builds it.
//! - Contact-method sequences keep the order the device reported.

pub mod contact;
pub mod raw;
