/// A covalent bond between two atoms, identified by their indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub i: u32,
    pub j: u32,
    /// Formal bond order (1, 2 or 3).
    pub order: u8,
}

impl Bond {
    pub fn new(i: u32, j: u32, order: u8) -> Self {
        Self { i, j, order }
    }

    pub fn single(i: u32, j: u32) -> Self {
        Self::new(i, j, 1)
    }
}

/// An angle `i-j-k` with vertex atom `j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Angle {
    pub i: u32,
    pub j: u32,
    pub k: u32,
}

/// A proper torsion `i-j-k-l` around the central bond `j-k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Torsion {
    pub i: u32,
    pub j: u32,
    pub k: u32,
    pub l: u32,
}

/// Builds the neighbor lists of the bond graph.
pub fn adjacency(atom_count: usize, bonds: &[Bond]) -> Vec<Vec<u32>> {
    let mut neighbors = vec![Vec::new(); atom_count];
    for bond in bonds {
        neighbors[bond.i as usize].push(bond.j);
        neighbors[bond.j as usize].push(bond.i);
    }
    neighbors
}

/// Derives all `i-j-k` angles from the bond graph: one per unordered pair of
/// neighbors around each vertex atom.
pub fn derive_angles(atom_count: usize, bonds: &[Bond]) -> Vec<Angle> {
    let neighbors = adjacency(atom_count, bonds);
    let mut angles = Vec::new();

    for (j, around) in neighbors.iter().enumerate() {
        for a in 0..around.len() {
            for b in (a + 1)..around.len() {
                angles.push(Angle {
                    i: around[a],
                    j: j as u32,
                    k: around[b],
                });
            }
        }
    }

    angles
}

/// Derives all proper torsions `i-j-k-l` from the bond graph: for every bond
/// `j-k`, one torsion per combination of a neighbor of `j` (other than `k`)
/// with a neighbor of `k` (other than `j` and `i`).
pub fn derive_torsions(atom_count: usize, bonds: &[Bond]) -> Vec<Torsion> {
    let neighbors = adjacency(atom_count, bonds);
    let mut torsions = Vec::new();

    for bond in bonds {
        let (j, k) = (bond.i, bond.j);
        for &i in &neighbors[j as usize] {
            if i == k {
                continue;
            }
            for &l in &neighbors[k as usize] {
                if l == j || l == i {
                    continue;
                }
                torsions.push(Torsion { i, j, k, l });
            }
        }
    }

    torsions
}
