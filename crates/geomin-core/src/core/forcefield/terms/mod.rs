//! Per-term energy evaluators.
//!
//! Each term implements [`EnergyTerm`]: given the extended coordinate vector it
//! returns its energy contribution and, when the context carries a gradient
//! buffer, accumulates `dE/dx` into it. The gradient convention is the
//! derivative of the energy, not the force; the optimizer negates it.

use super::dof::DofVector;
use nalgebra::Vector3;

pub mod angle;
pub mod bond;
pub mod nonbonded;
pub mod torsion;
pub mod vsepr;

/// Identity of an energy term, used for the per-term energy breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    Bond,
    Angle,
    Nonbonded,
    Vsepr,
    Torsion,
}

/// Evaluation context handed to each term: the coordinates to evaluate at and
/// an optional gradient accumulator shared by all terms of one pass.
pub struct EnergyContext<'a> {
    pub coords: &'a DofVector,
    pub gradient: Option<&'a mut DofVector>,
}

impl<'a> EnergyContext<'a> {
    pub fn energy_only(coords: &'a DofVector) -> Self {
        Self {
            coords,
            gradient: None,
        }
    }

    pub fn with_gradient(coords: &'a DofVector, gradient: &'a mut DofVector) -> Self {
        Self {
            coords,
            gradient: Some(gradient),
        }
    }

    /// Whether the caller asked for derivatives; terms skip gradient work when
    /// this is false.
    pub fn wants_gradient(&self) -> bool {
        self.gradient.is_some()
    }

    pub fn add_position_gradient(&mut self, atom: usize, contribution: Vector3<f64>) {
        if let Some(gradient) = self.gradient.as_deref_mut() {
            gradient.add_position(atom, contribution);
        }
    }

    pub fn add_lp_gradient(&mut self, lone_pair: usize, contribution: Vector3<f64>) {
        if let Some(gradient) = self.gradient.as_deref_mut() {
            gradient.add_lp_direction(lone_pair, contribution);
        }
    }
}

/// One additive contribution to the total potential energy.
pub trait EnergyTerm {
    fn kind(&self) -> TermKind;

    /// Evaluates the term at `context.coords`, accumulating `dE/dx` into the
    /// context's gradient buffer when one is present.
    fn evaluate(&self, context: &mut EnergyContext) -> f64;

    /// Seeds any auxiliary degrees of freedom the term owns. Called once
    /// before optimization; most terms own none and do nothing.
    fn initialize(&self, _coords: &mut DofVector) {}

    /// Restores the term's coordinate invariants after an optimizer step
    /// (the VSEPR term renormalizes its lone-pair directions here).
    fn constrain(&self, _coords: &mut DofVector) {}
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Central-difference gradient of a term over every degree of freedom.
    pub fn numeric_gradient(term: &dyn EnergyTerm, coords: &DofVector) -> DofVector {
        let h = 1e-6;
        let mut numeric = coords.zeros_like();
        let mut probe = coords.clone();

        let dof_count = coords.len();
        for index in 0..dof_count {
            let original = read_dof(coords, index);

            write_dof(&mut probe, index, original + h);
            let plus = term.evaluate(&mut EnergyContext::energy_only(&probe));
            write_dof(&mut probe, index, original - h);
            let minus = term.evaluate(&mut EnergyContext::energy_only(&probe));
            write_dof(&mut probe, index, original);

            write_dof(&mut numeric, index, (plus - minus) / (2.0 * h));
        }

        numeric
    }

    /// Asserts that the term's analytic gradient matches finite differences to
    /// within `tolerance`, and that evaluation with and without a gradient
    /// buffer yields the same energy.
    pub fn assert_gradient_matches_fd(term: &dyn EnergyTerm, coords: &DofVector, tolerance: f64) {
        let mut analytic = coords.zeros_like();
        let energy_grad = term.evaluate(&mut EnergyContext::with_gradient(coords, &mut analytic));
        let energy_plain = term.evaluate(&mut EnergyContext::energy_only(coords));
        assert_eq!(energy_grad, energy_plain);

        let numeric = numeric_gradient(term, coords);
        for index in 0..coords.len() {
            let a = read_dof(&analytic, index);
            let n = read_dof(&numeric, index);
            assert!(
                (a - n).abs() <= tolerance * (1.0 + n.abs()),
                "gradient mismatch at dof {index}: analytic {a}, numeric {n}"
            );
        }
    }

    fn read_dof(dof: &DofVector, index: usize) -> f64 {
        if index < dof.positions.len() {
            dof.positions[index]
        } else {
            dof.lp_directions[index - dof.positions.len()]
        }
    }

    fn write_dof(dof: &mut DofVector, index: usize, value: f64) {
        if index < dof.positions.len() {
            dof.positions[index] = value;
        } else {
            dof.lp_directions[index - dof.positions.len()] = value;
        }
    }
}
