//! Static route table.
//!
//! # Responsibility
//! - Map opaque route tokens to `(controller, action)` pairs.
//!
//! # Invariants
//! - Routes are registered only while the table is drawn; the built router is
//!   immutable.
//! - Tokens carry no parameters; per-dispatch data travels in options.

pub mod router;
