use super::{EnergyContext, EnergyTerm, TermKind};
use crate::core::forcefield::params::{NonbondedOptions, NonbondedPair};
use crate::core::forcefield::potentials;

/// Pairwise nonbonded interaction over the precomputed pair list, either as
/// full Lennard-Jones 12-6 or (the default) its purely repulsive WCA
/// truncation, which is what geometry prediction wants: keep atoms apart
/// without introducing spurious dispersion minima.
pub struct NonbondedTerm {
    pairs: Vec<NonbondedPair>,
    options: NonbondedOptions,
}

impl NonbondedTerm {
    pub fn new(pairs: Vec<NonbondedPair>, options: NonbondedOptions) -> Self {
        Self { pairs, options }
    }
}

impl EnergyTerm for NonbondedTerm {
    fn kind(&self) -> TermKind {
        TermKind::Nonbonded
    }

    fn evaluate(&self, context: &mut EnergyContext) -> f64 {
        let mut energy = 0.0;

        for pair in &self.pairs {
            if pair.scale < 1e-6 {
                continue;
            }
            let (i, j) = (pair.i as usize, pair.j as usize);
            let separation = context.coords.position(j) - context.coords.position(i);
            let r = separation.norm();
            if r < 1e-10 {
                tracing::debug!(pair.i, pair.j, "skipping coincident nonbonded pair");
                continue;
            }

            // Clamping the evaluation distance bounds the 1/r^12 blowup for
            // overlapping atoms; the gradient keeps the clamped magnitude so
            // such atoms are still pushed apart.
            let r_eval = r.max(self.options.r_min);
            if let Some(cutoff) = self.options.cutoff
                && r_eval > cutoff
            {
                continue;
            }

            let (e, de_dr) = if self.options.repulsion_only {
                potentials::wca(r_eval, pair.sigma, pair.epsilon)
            } else {
                potentials::lennard_jones_12_6(r_eval, pair.sigma, pair.epsilon)
            };
            energy += pair.scale * e;

            if context.wants_gradient() {
                let along = separation * (pair.scale * de_dr / r);
                context.add_position_gradient(j, along);
                context.add_position_gradient(i, -along);
            }
        }

        energy
    }
}
