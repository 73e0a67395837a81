use super::{EnergyContext, EnergyTerm, TermKind};
use crate::core::forcefield::params::BondParams;
use crate::core::forcefield::potentials;
use crate::core::models::topology::Bond;

/// Harmonic bond stretching over the bond list.
pub struct BondTerm {
    bonds: Vec<Bond>,
    params: Vec<BondParams>,
}

impl BondTerm {
    pub fn new(bonds: Vec<Bond>, params: Vec<BondParams>) -> Self {
        debug_assert_eq!(bonds.len(), params.len());
        Self { bonds, params }
    }
}

impl EnergyTerm for BondTerm {
    fn kind(&self) -> TermKind {
        TermKind::Bond
    }

    fn evaluate(&self, context: &mut EnergyContext) -> f64 {
        let mut energy = 0.0;

        for (bond, params) in self.bonds.iter().zip(&self.params) {
            let (i, j) = (bond.i as usize, bond.j as usize);
            let separation = context.coords.position(j) - context.coords.position(i);
            let r = separation.norm();
            if r < 1e-10 {
                // Coincident atoms: no defined direction, skip this instance.
                tracing::debug!(bond.i, bond.j, "skipping zero-length bond");
                continue;
            }

            let (e, de_dr) = potentials::harmonic_stretch(r, params.r0, params.k);
            energy += e;

            if context.wants_gradient() {
                let along = separation * (de_dr / r);
                context.add_position_gradient(j, along);
                context.add_position_gradient(i, -along);
            }
        }

        energy
    }
}
