//! # Workflows Module
//!
//! High-level entry points that wire the engine stages together into complete
//! runs.

pub mod minimize;
