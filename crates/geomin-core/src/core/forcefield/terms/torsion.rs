use super::{EnergyContext, EnergyTerm, TermKind};
use crate::core::forcefield::params::TorsionParams;
use crate::core::forcefield::potentials;
use crate::core::models::topology::Torsion;

/// Periodic dihedral potential over the derived torsion list.
///
/// Gradients follow the Blondel-Karplus formulation, which is well conditioned
/// away from collinear `i-j-k` / `j-k-l` arrangements and sums to zero over
/// the four atoms by construction.
pub struct TorsionTerm {
    torsions: Vec<Torsion>,
    params: Vec<TorsionParams>,
}

impl TorsionTerm {
    pub fn new(torsions: Vec<Torsion>, params: Vec<TorsionParams>) -> Self {
        debug_assert_eq!(torsions.len(), params.len());
        Self { torsions, params }
    }
}

impl EnergyTerm for TorsionTerm {
    fn kind(&self) -> TermKind {
        TermKind::Torsion
    }

    fn evaluate(&self, context: &mut EnergyContext) -> f64 {
        let mut energy = 0.0;

        for (torsion, params) in self.torsions.iter().zip(&self.params) {
            let (i, j, k, l) = (
                torsion.i as usize,
                torsion.j as usize,
                torsion.k as usize,
                torsion.l as usize,
            );
            let b1 = context.coords.position(j) - context.coords.position(i);
            let b2 = context.coords.position(k) - context.coords.position(j);
            let b3 = context.coords.position(l) - context.coords.position(k);

            let n1 = b1.cross(&b2);
            let n2 = b2.cross(&b3);
            let n1_sq = n1.norm_squared();
            let n2_sq = n2.norm_squared();
            let b2_norm = b2.norm();
            if n1_sq < 1e-10 || n2_sq < 1e-10 || b2_norm < 1e-10 {
                tracing::debug!(
                    torsion.i,
                    torsion.j,
                    torsion.k,
                    torsion.l,
                    "skipping collinear torsion"
                );
                continue;
            }

            let cos_phi = n1.dot(&n2) / (n1_sq * n2_sq).sqrt();
            let sin_phi = (b2 / b2_norm).dot(&n1.cross(&n2)) / (n1_sq * n2_sq).sqrt();
            let phi = sin_phi.atan2(cos_phi.clamp(-1.0, 1.0));

            let barrier = params.barrier / params.multiplicity as f64;
            let (e, de_dphi) = potentials::periodic_torsion(phi, params.n, barrier, params.phase);
            energy += e;

            if context.wants_gradient() {
                let g_i = n1 * (-b2_norm / n1_sq) * de_dphi;
                let g_l = n2 * (b2_norm / n2_sq) * de_dphi;
                let c1 = -b1.dot(&b2) / b2.norm_squared();
                let c3 = -b3.dot(&b2) / b2.norm_squared();
                let g_j = g_i * (c1 - 1.0) - g_l * c3;
                let g_k = g_l * (c3 - 1.0) - g_i * c1;

                context.add_position_gradient(i, g_i);
                context.add_position_gradient(j, g_j);
                context.add_position_gradient(k, g_k);
                context.add_position_gradient(l, g_l);
            }
        }

        energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::dof::DofVector;
    use crate::core::forcefield::terms::testing::assert_gradient_matches_fd;
    use std::f64::consts::PI;

    fn gauche_chain() -> DofVector {
        DofVector::from_positions(vec![
            1.0, 0.3, -0.2, //
            0.0, 0.0, 0.0, //
            0.0, 0.1, 1.5, //
            0.4, 1.1, 1.9,
        ])
    }

    fn threefold() -> TorsionTerm {
        TorsionTerm::new(
            vec![Torsion {
                i: 0,
                j: 1,
                k: 2,
                l: 3,
            }],
            vec![TorsionParams {
                n: 3,
                barrier: 2.9,
                phase: 0.0,
                multiplicity: 1,
            }],
        )
    }

    #[test]
    fn eclipsed_chain_sits_at_the_barrier_top() {
        let term = threefold();
        let coords = DofVector::from_positions(vec![
            1.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, //
            1.0, 1.0, 1.0,
        ]);
        let energy = term.evaluate(&mut EnergyContext::energy_only(&coords));
        assert!((energy - 2.9).abs() < 1e-9);
    }

    #[test]
    fn gradient_matches_finite_difference() {
        let term = threefold();
        assert_gradient_matches_fd(&term, &gauche_chain(), 1e-5);
    }

    #[test]
    fn twofold_phase_pi_gradient_matches_finite_difference() {
        let term = TorsionTerm::new(
            vec![Torsion {
                i: 0,
                j: 1,
                k: 2,
                l: 3,
            }],
            vec![TorsionParams {
                n: 2,
                barrier: 10.0,
                phase: PI,
                multiplicity: 4,
            }],
        );
        assert_gradient_matches_fd(&term, &gauche_chain(), 1e-5);
    }

    #[test]
    fn gradient_sums_to_zero_over_the_quadruple() {
        let term = threefold();
        let coords = gauche_chain();
        let mut gradient = coords.zeros_like();
        term.evaluate(&mut EnergyContext::with_gradient(&coords, &mut gradient));
        for axis in 0..3 {
            let sum: f64 = (0..4).map(|atom| gradient.positions[3 * atom + axis]).sum();
            assert!(sum.abs() < 1e-10);
        }
    }

    #[test]
    fn multiplicity_divides_the_barrier() {
        let coords = gauche_chain();
        let full = threefold().evaluate(&mut EnergyContext::energy_only(&coords));
        let shared = TorsionTerm::new(
            vec![Torsion {
                i: 0,
                j: 1,
                k: 2,
                l: 3,
            }],
            vec![TorsionParams {
                n: 3,
                barrier: 2.9,
                phase: 0.0,
                multiplicity: 9,
            }],
        )
        .evaluate(&mut EnergyContext::energy_only(&coords));
        assert!((shared - full / 9.0).abs() < 1e-12);
    }

    #[test]
    fn collinear_chain_is_skipped_without_nan() {
        let term = threefold();
        let coords = DofVector::from_positions(vec![
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            2.0, 0.0, 0.0, //
            3.0, 1.0, 0.0,
        ]);
        let mut gradient = coords.zeros_like();
        let energy = term.evaluate(&mut EnergyContext::with_gradient(&coords, &mut gradient));
        assert_eq!(energy, 0.0);
        assert!(gradient.is_finite());
    }
}
