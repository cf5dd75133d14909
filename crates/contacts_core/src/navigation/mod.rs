//! Screen navigation: view stack, presentations and the contacts controller.
//!
//! # Responsibility
//! - Keep exactly one of the list/detail screens active.
//! - Keep the displayed record in sync with the detail screen.
//! - Translate controller actions into view stack transitions.
//!
//! # Invariants
//! - The active record is written only by the `show` action.
//! - Controllers never call the directory adapter.

pub mod controller;
pub mod presentation;
pub mod view_stack;
