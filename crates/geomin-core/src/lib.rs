//! # Geomin Core Library
//!
//! A library that predicts 3-D molecular geometry from bond topology by minimizing a
//! classical potential-energy function, using explicit VSEPR electron-domain repulsion
//! as the geometry driver and FIRE (Fast Inertial Relaxation Engine) as the optimizer.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`Molecule`, topology
//!   index tuples), pure mathematical representations of the forcefield (`potentials`,
//!   per-term evaluators, the aggregating `EnergyModel`), and geometric utilities.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer runs the optimization: the
//!   pre-optimization `ClashRelaxer`, the `FireOptimizer` state machine, engine
//!   configuration, and progress reporting.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing layer.
//!   It ties the `engine` and `core` together to execute the complete minimization
//!   pipeline from raw topology and coordinates to relaxed geometry plus diagnostics.

pub mod core;
pub mod engine;
pub mod workflows;
