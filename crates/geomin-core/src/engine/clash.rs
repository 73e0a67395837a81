use super::error::EngineError;
use crate::core::models::atom::Atom;
use crate::core::models::topology::Bond;
use crate::core::utils::{elements, geometry};
use nalgebra::Vector3;
use serde::Deserialize;
use std::collections::HashSet;

/// Parameters of the pre-optimization clash relaxer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClashParams {
    /// Fraction of the summed van der Waals radii below which two nonbonded
    /// atoms count as clashing.
    pub overlap_threshold: f64,
    /// Fraction of the remaining overlap resolved per sweep.
    pub push_strength: f64,
    pub max_iterations: usize,
    /// Sweep converges when no atom moved further than this, in Angstroms.
    pub convergence_tol: f64,
}

impl Default for ClashParams {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.7,
            push_strength: 0.3,
            max_iterations: 50,
            convergence_tol: 1e-4,
        }
    }
}

/// Geometric push-apart of severely overlapping atoms.
///
/// This is not an energy minimization: it only separates nonbonded atom pairs
/// whose distance falls below a fraction of their summed van der Waals radii,
/// so that the subsequent FIRE run does not start inside the 1/r¹² wall of the
/// nonbonded term. The result is always accepted as-is; running out of sweeps
/// is not an error.
pub struct ClashRelaxer {
    params: ClashParams,
}

impl ClashRelaxer {
    pub fn new(params: ClashParams) -> Self {
        Self { params }
    }

    /// Relaxes clashes in place, returning the number of sweeps performed.
    pub fn relax(
        &self,
        positions: &mut [f64],
        atoms: &[Atom],
        bonds: &[Bond],
    ) -> Result<usize, EngineError> {
        if positions.len() != 3 * atoms.len() {
            return Err(EngineError::CoordinateMismatch {
                expected: 3 * atoms.len(),
                actual: positions.len(),
            });
        }

        let bonded: HashSet<(u32, u32)> = bonds
            .iter()
            .map(|b| (b.i.min(b.j), b.i.max(b.j)))
            .collect();
        let radii: Vec<f64> = atoms
            .iter()
            .map(|a| elements::vdw_radius(a.atomic_number))
            .collect();

        for sweep in 1..=self.params.max_iterations {
            let mut max_displacement = 0.0f64;

            for i in 0..atoms.len() {
                for j in (i + 1)..atoms.len() {
                    if bonded.contains(&(i as u32, j as u32)) {
                        continue;
                    }
                    let clash_distance = self.params.overlap_threshold * (radii[i] + radii[j]);
                    let separation = geometry::vector(positions, i, j);
                    let d = separation.norm();
                    if d >= clash_distance {
                        continue;
                    }

                    // Coincident atoms get an arbitrary but deterministic
                    // push axis.
                    let direction = if d < 1e-10 {
                        Vector3::z()
                    } else {
                        separation / d
                    };
                    let shift = 0.5 * self.params.push_strength * (clash_distance - d);
                    for axis in 0..3 {
                        positions[3 * i + axis] -= shift * direction[axis];
                        positions[3 * j + axis] += shift * direction[axis];
                    }
                    max_displacement = max_displacement.max(shift);
                }
            }

            if max_displacement < self.params.convergence_tol {
                tracing::debug!(sweep, "clash relaxation converged");
                return Ok(sweep);
            }
        }

        tracing::debug!(
            sweeps = self.params.max_iterations,
            "clash relaxation stopped at the sweep limit"
        );
        Ok(self.params.max_iterations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_pair_is_pushed_toward_the_clash_distance() {
        let params = ClashParams::default();
        let relaxer = ClashRelaxer::new(params.clone());
        let atoms = vec![Atom::new(6), Atom::new(6)];
        let mut positions = vec![0.0, 0.0, 0.0, 0.4, 0.0, 0.0];

        let sweeps = relaxer.relax(&mut positions, &atoms, &[]).unwrap();

        let clash_distance =
            params.overlap_threshold * 2.0 * elements::vdw_radius(6);
        let d = geometry::distance(&positions, 0, 1);
        // The push converges onto the clash distance from below; allow the
        // asymptotic approach a little slack.
        assert!(d >= 0.995 * clash_distance || sweeps == params.max_iterations);
        assert!(d > 0.4);
    }

    #[test]
    fn bonded_pair_is_left_alone() {
        let relaxer = ClashRelaxer::new(ClashParams::default());
        let atoms = vec![Atom::new(6), Atom::new(1)];
        let bonds = vec![Bond::single(0, 1)];
        let mut positions = vec![0.0, 0.0, 0.0, 1.09, 0.0, 0.0];
        let before = positions.clone();

        relaxer.relax(&mut positions, &atoms, &bonds).unwrap();

        assert_eq!(positions, before);
    }

    #[test]
    fn coincident_atoms_are_separated() {
        let relaxer = ClashRelaxer::new(ClashParams::default());
        let atoms = vec![Atom::new(6), Atom::new(6)];
        let mut positions = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0];

        relaxer.relax(&mut positions, &atoms, &[]).unwrap();

        assert!(geometry::distance(&positions, 0, 1) > 0.1);
    }

    #[test]
    fn well_separated_atoms_converge_in_one_sweep() {
        let relaxer = ClashRelaxer::new(ClashParams::default());
        let atoms = vec![Atom::new(6), Atom::new(6)];
        let mut positions = vec![0.0, 0.0, 0.0, 5.0, 0.0, 0.0];

        let sweeps = relaxer.relax(&mut positions, &atoms, &[]).unwrap();
        assert_eq!(sweeps, 1);
    }

    #[test]
    fn wrong_buffer_length_is_rejected() {
        let relaxer = ClashRelaxer::new(ClashParams::default());
        let atoms = vec![Atom::new(6), Atom::new(6)];
        let mut positions = vec![0.0; 3];
        let result = relaxer.relax(&mut positions, &atoms, &[]);
        assert!(matches!(
            result,
            Err(EngineError::CoordinateMismatch {
                expected: 6,
                actual: 3
            })
        ));
    }
}
