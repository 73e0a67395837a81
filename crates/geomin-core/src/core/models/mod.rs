//! # Molecular Models Module
//!
//! Data structures describing the immutable input topology of one optimization run:
//! atoms with lone-pair counts, bonds with order, and the angle/torsion index tuples
//! derived from the bond graph.

pub mod atom;
pub mod molecule;
pub mod topology;
