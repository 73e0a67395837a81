//! # Core Module
//!
//! This module provides the fundamental building blocks for molecular geometry
//! prediction in Geomin, serving as the computational core of the library.
//!
//! ## Architecture
//!
//! The module is organized into specialized submodules that handle different aspects
//! of the energy model:
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds, derived angle/torsion
//!   topology, and the immutable `Molecule` aggregate
//! - **Energy Calculations** ([`forcefield`]) - Potential functions, per-term energy
//!   evaluators with analytic gradients, parameter assignment, and the energy model
//! - **Utilities** ([`utils`]) - Flat-buffer geometric primitives and per-element
//!   property tables

pub mod forcefield;
pub mod models;
pub mod utils;
