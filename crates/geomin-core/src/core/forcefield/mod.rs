//! # Force Field Module
//!
//! This module provides the energy model of Geomin: a multi-term classical
//! potential (bond, angle, torsion, nonbonded, VSEPR electron-domain repulsion)
//! with analytic gradients, evaluated over an extended coordinate vector that
//! carries one unit direction per lone pair in addition to the atom positions.
//!
//! ## Key Components
//!
//! - [`dof`] - The degree-of-freedom vector splitting atom positions from
//!   lone-pair directions
//! - [`potentials`] - Pure closed-form potential functions and their derivatives
//! - [`terms`] - Per-term evaluators implementing [`terms::EnergyTerm`]
//! - [`params`] - Per-term parameter structures and nonbonded options
//! - [`parameterization`] - Assignment of parameters from topology and element tables
//! - [`model`] - The [`model::EnergyModel`] aggregator with its fixed term order

pub mod dof;
pub mod model;
pub mod parameterization;
pub mod params;
pub(crate) mod potentials;
pub mod terms;
