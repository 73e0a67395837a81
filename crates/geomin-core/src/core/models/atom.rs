/// Represents an atom in a molecular topology.
///
/// This struct carries the two properties the energy model needs from an atom:
/// its element (for parameter lookups in the per-element tables) and the number
/// of lone pairs assigned by the upstream topology builder (each lone pair
/// becomes a virtual electron domain in the VSEPR term). Atoms are owned by a
/// [`Molecule`](super::molecule::Molecule) and are read-only to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Atom {
    /// The atomic number (Z) of the element.
    pub atomic_number: u8,
    /// Number of lone pairs on this atom, as assigned by the topology builder.
    pub lone_pairs: u8,
}

impl Atom {
    /// Creates an atom with no lone pairs.
    pub fn new(atomic_number: u8) -> Self {
        Self {
            atomic_number,
            lone_pairs: 0,
        }
    }

    /// Creates an atom carrying `lone_pairs` virtual electron domains.
    pub fn with_lone_pairs(atomic_number: u8, lone_pairs: u8) -> Self {
        Self {
            atomic_number,
            lone_pairs,
        }
    }
}
