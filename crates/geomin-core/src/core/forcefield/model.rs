use super::dof::DofVector;
use super::parameterization;
use super::params::{NonbondedOptions, VseprParams};
use super::terms::angle::AngleTerm;
use super::terms::bond::BondTerm;
use super::terms::nonbonded::NonbondedTerm;
use super::terms::torsion::TorsionTerm;
use super::terms::vsepr::VseprTerm;
use super::terms::{EnergyContext, EnergyTerm, TermKind};
use crate::core::models::molecule::Molecule;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Coordinate vector holds {actual} position values but the model expects {expected}")]
    PositionLength { expected: usize, actual: usize },

    #[error("Coordinate vector holds {actual} lone-pair values but the model expects {expected}")]
    LonePairLength { expected: usize, actual: usize },
}

/// Which terms the model evaluates and their global parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    pub bond_enabled: bool,
    pub angle_enabled: bool,
    pub nonbonded_enabled: bool,
    pub vsepr_enabled: bool,
    pub torsion_enabled: bool,
    /// Harmonic force constant of a single bond, in kcal/mol/Å²; scaled by
    /// bond order at assignment.
    pub bond_force_constant: f64,
    /// Global damping of the harmonic angle term. Kept small so the VSEPR
    /// domain repulsion, not the harmonic targets, decides the geometry.
    pub angle_scale: f64,
    pub nonbonded: NonbondedOptions,
    pub vsepr: VseprParams,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            bond_enabled: true,
            angle_enabled: true,
            nonbonded_enabled: true,
            vsepr_enabled: true,
            torsion_enabled: true,
            bond_force_constant: 300.0,
            angle_scale: 0.1,
            nonbonded: NonbondedOptions::default(),
            vsepr: VseprParams::default(),
        }
    }
}

/// Per-term energy breakdown of one evaluation, in kcal/mol.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyResult {
    pub bond: f64,
    pub angle: f64,
    pub nonbonded: f64,
    pub vsepr: f64,
    pub torsion: f64,
    pub total: f64,
}

impl EnergyResult {
    fn record(&mut self, kind: TermKind, energy: f64) {
        match kind {
            TermKind::Bond => self.bond += energy,
            TermKind::Angle => self.angle += energy,
            TermKind::Nonbonded => self.nonbonded += energy,
            TermKind::Vsepr => self.vsepr += energy,
            TermKind::Torsion => self.torsion += energy,
        }
        self.total += energy;
    }
}

/// The assembled multi-term potential of one molecule.
///
/// Construction parameterizes every enabled term from the topology and the
/// element tables; evaluation then only reads coordinates. Terms always run in
/// the fixed order bond, angle, nonbonded, VSEPR, torsion, so repeated
/// evaluation at identical coordinates is bitwise reproducible.
pub struct EnergyModel {
    atom_count: usize,
    lone_pair_count: usize,
    terms: Vec<Box<dyn EnergyTerm>>,
}

impl EnergyModel {
    pub fn new(molecule: &Molecule, options: &ModelOptions) -> Self {
        let mut terms: Vec<Box<dyn EnergyTerm>> = Vec::new();
        let mut lone_pair_count = 0;

        if options.bond_enabled {
            let params = parameterization::assign_bond_parameters(
                &molecule.bonds,
                &molecule.atoms,
                options.bond_force_constant,
            );
            terms.push(Box::new(BondTerm::new(molecule.bonds.clone(), params)));
        }
        if options.angle_enabled {
            let params = parameterization::assign_angle_parameters(
                &molecule.angles,
                &molecule.atoms,
                &molecule.bonds,
                options.angle_scale,
            );
            terms.push(Box::new(AngleTerm::new(molecule.angles.clone(), params)));
        }
        if options.nonbonded_enabled {
            let pairs = parameterization::build_nonbonded_pairs(
                &molecule.atoms,
                &molecule.bonds,
                &options.nonbonded,
            );
            terms.push(Box::new(NonbondedTerm::new(pairs, options.nonbonded.clone())));
        }
        if options.vsepr_enabled {
            let vsepr = VseprTerm::new(&molecule.atoms, &molecule.bonds, options.vsepr.clone());
            lone_pair_count = vsepr.lone_pair_count();
            terms.push(Box::new(vsepr));
        }
        if options.torsion_enabled {
            let params = parameterization::assign_torsion_parameters(
                &molecule.torsions,
                &molecule.atoms,
                &molecule.bonds,
            );
            terms.push(Box::new(TorsionTerm::new(molecule.torsions.clone(), params)));
        }

        Self {
            atom_count: molecule.atom_count(),
            lone_pair_count,
            terms,
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    /// Number of lone-pair virtual sites the model's coordinate vector must
    /// carry; zero when the VSEPR term is disabled.
    pub fn lone_pair_count(&self) -> usize {
        self.lone_pair_count
    }

    /// Builds the extended coordinate vector for this model from bare atom
    /// positions, seeding the lone-pair directions.
    pub fn extend_coordinates(&self, positions: Vec<f64>) -> Result<DofVector, ModelError> {
        let mut coords = DofVector::from_positions(positions);
        if coords.positions.len() != 3 * self.atom_count {
            return Err(ModelError::PositionLength {
                expected: 3 * self.atom_count,
                actual: coords.positions.len(),
            });
        }
        coords.resize_lone_pairs(self.lone_pair_count);
        for term in &self.terms {
            term.initialize(&mut coords);
        }
        Ok(coords)
    }

    /// Checks that a coordinate vector has exactly the shape this model
    /// evaluates over. Evaluation fails fast on a mismatch rather than
    /// silently reading a truncated buffer.
    pub fn validate(&self, coords: &DofVector) -> Result<(), ModelError> {
        if coords.positions.len() != 3 * self.atom_count {
            return Err(ModelError::PositionLength {
                expected: 3 * self.atom_count,
                actual: coords.positions.len(),
            });
        }
        if coords.lp_directions.len() != 3 * self.lone_pair_count {
            return Err(ModelError::LonePairLength {
                expected: 3 * self.lone_pair_count,
                actual: coords.lp_directions.len(),
            });
        }
        Ok(())
    }

    pub fn evaluate_energy(&self, coords: &DofVector) -> Result<f64, ModelError> {
        self.validate(coords)?;
        let mut context = EnergyContext::energy_only(coords);
        Ok(self.terms.iter().map(|t| t.evaluate(&mut context)).sum())
    }

    /// Total energy and its gradient. The gradient buffer is reshaped and
    /// zeroed before accumulation.
    pub fn evaluate_gradient(
        &self,
        coords: &DofVector,
        gradient: &mut DofVector,
    ) -> Result<f64, ModelError> {
        self.validate(coords)?;
        *gradient = coords.zeros_like();
        let mut context = EnergyContext::with_gradient(coords, gradient);
        Ok(self.terms.iter().map(|t| t.evaluate(&mut context)).sum())
    }

    /// Energy with its per-term breakdown.
    pub fn evaluate_detailed(&self, coords: &DofVector) -> Result<EnergyResult, ModelError> {
        self.validate(coords)?;
        let mut result = EnergyResult::default();
        let mut context = EnergyContext::energy_only(coords);
        for term in &self.terms {
            result.record(term.kind(), term.evaluate(&mut context));
        }
        Ok(result)
    }

    /// Restores per-term coordinate invariants (unit lone-pair directions).
    /// Called unconditionally after every optimizer step.
    pub fn constrain(&self, coords: &mut DofVector) {
        for term in &self.terms {
            term.constrain(coords);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::topology::Bond;

    fn water_model() -> (EnergyModel, DofVector) {
        let molecule = Molecule::from_bonds(
            vec![Atom::with_lone_pairs(8, 2), Atom::new(1), Atom::new(1)],
            vec![Bond::single(0, 1), Bond::single(0, 2)],
        )
        .unwrap();
        let model = EnergyModel::new(&molecule, &ModelOptions::default());
        let coords = model
            .extend_coordinates(vec![0.0, 0.0, 0.0, 0.96, 0.0, 0.0, 0.0, 0.96, 0.0])
            .unwrap();
        (model, coords)
    }

    #[test]
    fn extend_coordinates_carries_one_slot_per_lone_pair() {
        let (model, coords) = water_model();
        assert_eq!(model.lone_pair_count(), 2);
        assert_eq!(coords.lone_pair_count(), 2);
        for slot in 0..2 {
            assert!((coords.lp_direction(slot).norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn evaluation_is_bitwise_reproducible() {
        let (model, coords) = water_model();
        let first = model.evaluate_detailed(&coords).unwrap();
        let second = model.evaluate_detailed(&coords).unwrap();
        assert_eq!(first.total.to_bits(), second.total.to_bits());
        assert_eq!(first.vsepr.to_bits(), second.vsepr.to_bits());
    }

    #[test]
    fn breakdown_sums_to_total() {
        let (model, coords) = water_model();
        let detailed = model.evaluate_detailed(&coords).unwrap();
        let recomputed =
            detailed.bond + detailed.angle + detailed.nonbonded + detailed.vsepr + detailed.torsion;
        assert!((detailed.total - recomputed).abs() < 1e-12);
        let plain = model.evaluate_energy(&coords).unwrap();
        assert_eq!(plain.to_bits(), detailed.total.to_bits());
    }

    #[test]
    fn short_position_buffer_is_rejected() {
        let (model, _) = water_model();
        let coords = DofVector::from_positions(vec![0.0; 6]);
        assert_eq!(
            model.evaluate_energy(&coords).unwrap_err(),
            ModelError::PositionLength {
                expected: 9,
                actual: 6
            }
        );
    }

    #[test]
    fn missing_lone_pair_slots_are_rejected() {
        let (model, coords) = water_model();
        let mut stripped = coords.clone();
        stripped.resize_lone_pairs(0);
        assert_eq!(
            model.evaluate_energy(&stripped).unwrap_err(),
            ModelError::LonePairLength {
                expected: 6,
                actual: 0
            }
        );
    }

    #[test]
    fn aggregate_gradient_matches_finite_difference() {
        let (model, coords) = water_model();
        let mut analytic = coords.zeros_like();
        let energy = model.evaluate_gradient(&coords, &mut analytic).unwrap();
        assert_eq!(energy, model.evaluate_energy(&coords).unwrap());

        let h = 1e-6;
        let mut probe = coords.clone();
        for index in 0..coords.len() {
            let (array_len, positions) = (coords.positions.len(), index < coords.positions.len());
            let read = |dof: &DofVector| {
                if positions {
                    dof.positions[index]
                } else {
                    dof.lp_directions[index - array_len]
                }
            };
            let write = |dof: &mut DofVector, value: f64| {
                if positions {
                    dof.positions[index] = value;
                } else {
                    dof.lp_directions[index - array_len] = value;
                }
            };

            let original = read(&coords);
            write(&mut probe, original + h);
            let plus = model.evaluate_energy(&probe).unwrap();
            write(&mut probe, original - h);
            let minus = model.evaluate_energy(&probe).unwrap();
            write(&mut probe, original);

            let numeric = (plus - minus) / (2.0 * h);
            let a = read(&analytic);
            assert!(
                (a - numeric).abs() <= 1e-4 * (1.0 + numeric.abs()),
                "dof {index}: analytic {a}, numeric {numeric}"
            );
        }
    }

    #[test]
    fn constrain_renormalizes_lone_pairs() {
        let (model, mut coords) = water_model();
        let drifted = coords.lp_direction(0) * 1.7;
        coords.set_lp_direction(0, drifted);
        model.constrain(&mut coords);
        assert!((coords.lp_direction(0).norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn disabled_vsepr_needs_no_lone_pair_slots() {
        let molecule = Molecule::from_bonds(
            vec![Atom::with_lone_pairs(8, 2), Atom::new(1), Atom::new(1)],
            vec![Bond::single(0, 1), Bond::single(0, 2)],
        )
        .unwrap();
        let options = ModelOptions {
            vsepr_enabled: false,
            ..ModelOptions::default()
        };
        let model = EnergyModel::new(&molecule, &options);
        assert_eq!(model.lone_pair_count(), 0);
        let coords = model
            .extend_coordinates(vec![0.0, 0.0, 0.0, 0.96, 0.0, 0.0, 0.0, 0.96, 0.0])
            .unwrap();
        let detailed = model.evaluate_detailed(&coords).unwrap();
        assert_eq!(detailed.vsepr, 0.0);
    }

    #[test]
    fn model_options_deserialize_from_partial_toml() {
        let options: ModelOptions =
            toml::from_str("torsion_enabled = false\n[nonbonded]\nscale_14 = 0.5").unwrap();
        assert!(!options.torsion_enabled);
        assert_eq!(options.nonbonded.scale_14, 0.5);
        assert_eq!(options.angle_scale, ModelOptions::default().angle_scale);
    }
}
