//! # Engine Module
//!
//! The optimization machinery built on top of the force field: the FIRE
//! minimizer, the pre-optimization clash relaxer, run configuration and
//! progress reporting.

pub mod clash;
pub mod config;
pub mod error;
pub mod fire;
pub mod progress;
