//! In-memory record store.
//!
//! # Responsibility
//! - Hold the loaded contact set sorted by family name.
//! - Resolve contacts by id and by list position.
//!
//! # Invariants
//! - Contents are replaced wholesale by each successful load.
//! - A failed load leaves the previous contents untouched.
//! - At most one load is outstanding per store.

pub mod contact_store;
