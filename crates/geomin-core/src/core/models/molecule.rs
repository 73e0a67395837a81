use super::atom::Atom;
use super::topology::{self, Angle, Bond, Torsion};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Bond references atom index {index} but the molecule has {atom_count} atoms")]
    AtomIndexOutOfRange { index: u32, atom_count: usize },

    #[error("Bond connects atom {0} to itself")]
    SelfBond(u32),

    #[error("Bond order {order} on bond {i}-{j} is outside 1..=3")]
    InvalidBondOrder { i: u32, j: u32, order: u8 },
}

/// The immutable topology of one optimization run.
///
/// A `Molecule` owns the atom list, the bond list, and the angle/torsion index
/// tuples derived from the bonds. It is constructed once by an upstream builder
/// and is read-only input to the energy model and the optimizer; coordinates
/// live in a separate buffer and are never stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub angles: Vec<Angle>,
    pub torsions: Vec<Torsion>,
}

impl Molecule {
    /// Builds a molecule from atoms and bonds, deriving angle and torsion lists
    /// from the bond graph.
    pub fn from_bonds(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Result<Self, TopologyError> {
        Self::validate_bonds(&atoms, &bonds)?;
        let angles = topology::derive_angles(atoms.len(), &bonds);
        let torsions = topology::derive_torsions(atoms.len(), &bonds);
        Ok(Self {
            atoms,
            bonds,
            angles,
            torsions,
        })
    }

    /// Builds a molecule from pre-generated topology lists, for callers whose
    /// upstream builder already derived angles and torsions.
    pub fn with_topology(
        atoms: Vec<Atom>,
        bonds: Vec<Bond>,
        angles: Vec<Angle>,
        torsions: Vec<Torsion>,
    ) -> Result<Self, TopologyError> {
        Self::validate_bonds(&atoms, &bonds)?;
        Ok(Self {
            atoms,
            bonds,
            angles,
            torsions,
        })
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Total number of lone pairs over all atoms; each contributes one virtual
    /// site (3 extended coordinates) when the VSEPR term is active.
    pub fn total_lone_pairs(&self) -> usize {
        self.atoms.iter().map(|a| a.lone_pairs as usize).sum()
    }

    fn validate_bonds(atoms: &[Atom], bonds: &[Bond]) -> Result<(), TopologyError> {
        for bond in bonds {
            for index in [bond.i, bond.j] {
                if index as usize >= atoms.len() {
                    return Err(TopologyError::AtomIndexOutOfRange {
                        index,
                        atom_count: atoms.len(),
                    });
                }
            }
            if bond.i == bond.j {
                return Err(TopologyError::SelfBond(bond.i));
            }
            if !(1..=3).contains(&bond.order) {
                return Err(TopologyError::InvalidBondOrder {
                    i: bond.i,
                    j: bond.j,
                    order: bond.order,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Molecule {
        Molecule::from_bonds(
            vec![Atom::with_lone_pairs(8, 2), Atom::new(1), Atom::new(1)],
            vec![Bond::single(0, 1), Bond::single(0, 2)],
        )
        .unwrap()
    }

    #[test]
    fn from_bonds_derives_angles_and_torsions() {
        let mol = water();
        assert_eq!(mol.angles.len(), 1);
        assert!(mol.torsions.is_empty());
    }

    #[test]
    fn total_lone_pairs_sums_over_atoms() {
        assert_eq!(water().total_lone_pairs(), 2);
    }

    #[test]
    fn from_bonds_rejects_out_of_range_index() {
        let result = Molecule::from_bonds(vec![Atom::new(1)], vec![Bond::single(0, 3)]);
        assert_eq!(
            result.unwrap_err(),
            TopologyError::AtomIndexOutOfRange {
                index: 3,
                atom_count: 1
            }
        );
    }

    #[test]
    fn from_bonds_rejects_self_bond() {
        let result = Molecule::from_bonds(vec![Atom::new(6)], vec![Bond::single(0, 0)]);
        assert_eq!(result.unwrap_err(), TopologyError::SelfBond(0));
    }

    #[test]
    fn from_bonds_rejects_invalid_bond_order() {
        let result = Molecule::from_bonds(
            vec![Atom::new(6), Atom::new(6)],
            vec![Bond::new(0, 1, 4)],
        );
        assert!(matches!(
            result.unwrap_err(),
            TopologyError::InvalidBondOrder { order: 4, .. }
        ));
    }

    #[test]
    fn with_topology_keeps_caller_supplied_lists() {
        let mol = Molecule::with_topology(
            vec![Atom::new(6), Atom::new(6)],
            vec![Bond::single(0, 1)],
            Vec::new(),
            Vec::new(),
        )
        .unwrap();
        assert!(mol.angles.is_empty());
        assert!(mol.torsions.is_empty());
    }
}
