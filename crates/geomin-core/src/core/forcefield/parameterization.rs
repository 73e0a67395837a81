use super::params::{AngleParams, BondParams, NonbondedOptions, NonbondedPair, TorsionParams};
use crate::core::models::atom::Atom;
use crate::core::models::topology::{self, Angle, Bond, Torsion};
use crate::core::utils::elements;
use std::collections::VecDeque;
use std::f64::consts::PI;

/// Shortening of the equilibrium length with increasing bond order.
fn bond_order_scale(order: u8) -> f64 {
    match order {
        2 => 0.87,
        3 => 0.78,
        _ => 1.0,
    }
}

/// Assigns harmonic bond parameters from covalent radii, scaling the force
/// constant with bond order (stronger bonds are stiffer).
pub fn assign_bond_parameters(bonds: &[Bond], atoms: &[Atom], default_k: f64) -> Vec<BondParams> {
    bonds
        .iter()
        .map(|bond| {
            let r_i = elements::covalent_radius(atoms[bond.i as usize].atomic_number);
            let r_j = elements::covalent_radius(atoms[bond.j as usize].atomic_number);
            BondParams {
                r0: (r_i + r_j) * bond_order_scale(bond.order),
                k: default_k * bond.order as f64,
            }
        })
        .collect()
}

/// Ideal angle in radians for a central atom with the given steric number
/// (bonded neighbors + lone pairs) and lone-pair count, following VSEPR
/// electron-domain geometry.
pub fn vsepr_ideal_angle(steric_number: usize, lone_pairs: usize) -> f64 {
    match steric_number {
        0..=2 => PI,
        3 => 120.0_f64.to_radians(),
        4 => match lone_pairs {
            0 => 109.5_f64.to_radians(),
            1 => 107.0_f64.to_radians(),
            _ => 104.5_f64.to_radians(),
        },
        _ => 90.0_f64.to_radians(),
    }
}

/// Angle bending stiffness estimate by central element, in kcal/mol.
fn angle_force_constant(atomic_number: u8) -> f64 {
    match atomic_number {
        1 => 30.0,
        2 => 50.0,
        6 => 70.0,
        7 => 80.0,
        8 => 100.0,
        3..=10 => 60.0,
        11..=18 => 50.0,
        _ => 40.0,
    }
}

/// Assigns angle parameters from VSEPR geometry of the vertex atom. The force
/// constants are multiplied by `scale` so the harmonic term acts as a weak
/// stabilizer that does not fight the explicit domain repulsion.
pub fn assign_angle_parameters(
    angles: &[Angle],
    atoms: &[Atom],
    bonds: &[Bond],
    scale: f64,
) -> Vec<AngleParams> {
    let mut neighbor_count = vec![0usize; atoms.len()];
    for bond in bonds {
        neighbor_count[bond.i as usize] += 1;
        neighbor_count[bond.j as usize] += 1;
    }

    angles
        .iter()
        .map(|angle| {
            let central = &atoms[angle.j as usize];
            let lone_pairs = central.lone_pairs as usize;
            let steric = neighbor_count[angle.j as usize] + lone_pairs;
            AngleParams {
                theta0: vsepr_ideal_angle(steric, lone_pairs),
                k: angle_force_constant(central.atomic_number) * scale,
            }
        })
        .collect()
}

/// Assigns periodic torsion parameters from a hybridization heuristic on the
/// central `j-k` bond, dividing the bond's barrier over all redundant torsions
/// that share it.
pub fn assign_torsion_parameters(
    torsions: &[Torsion],
    atoms: &[Atom],
    bonds: &[Bond],
) -> Vec<TorsionParams> {
    let mut neighbor_count = vec![0usize; atoms.len()];
    for bond in bonds {
        neighbor_count[bond.i as usize] += 1;
        neighbor_count[bond.j as usize] += 1;
    }

    let central_bond_order = |j: u32, k: u32| {
        bonds
            .iter()
            .find(|b| (b.i == j && b.j == k) || (b.i == k && b.j == j))
            .map(|b| b.order)
            .unwrap_or(1)
    };

    torsions
        .iter()
        .map(|torsion| {
            let nj = neighbor_count[torsion.j as usize];
            let nk = neighbor_count[torsion.k as usize];
            let multiplicity = ((nj.saturating_sub(1)) * (nk.saturating_sub(1))).max(1) as u32;

            // Formal double/triple bonds stay rigid regardless of the
            // neighbor-count heuristic.
            if central_bond_order(torsion.j, torsion.k) >= 2 {
                return TorsionParams {
                    n: 2,
                    barrier: 25.0,
                    phase: PI,
                    multiplicity,
                };
            }

            let terminal_hydrogen = atoms[torsion.i as usize].atomic_number == 1
                || atoms[torsion.l as usize].atomic_number == 1;
            if terminal_hydrogen {
                // sp3-sp3 barrier, e.g. H-C-C-H in ethane (2.9 kcal/mol).
                return TorsionParams {
                    n: 3,
                    barrier: 2.9,
                    phase: 0.0,
                    multiplicity,
                };
            }

            let mut params = TorsionParams {
                n: 3,
                barrier: 2.9,
                phase: 0.0,
                multiplicity,
            };
            if nj == 3 && nk == 3 {
                // sp2-sp2: planar preference.
                params.n = 2;
                params.barrier = 10.0;
                params.phase = PI;
            }
            if nj == 2 || nk == 2 {
                // sp-like center: weak, nearly free rotation.
                params.n = 1;
                params.barrier = 0.5;
                params.phase = 0.0;
            }
            params
        })
        .collect()
}

/// Bonded-graph distances from `start` up to `max_hops`, by breadth-first
/// traversal; unreachable atoms (or atoms further away) get `u8::MAX`.
fn graph_distances(start: u32, neighbors: &[Vec<u32>], max_hops: u8) -> Vec<u8> {
    let mut dist = vec![u8::MAX; neighbors.len()];
    dist[start as usize] = 0;
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        let d = dist[current as usize];
        if d >= max_hops {
            continue;
        }
        for &next in &neighbors[current as usize] {
            if dist[next as usize] == u8::MAX {
                dist[next as usize] = d + 1;
                queue.push_back(next);
            }
        }
    }

    dist
}

/// Builds the nonbonded pair list with topological exclusion and scaling:
/// 1-2 pairs are excluded entirely, 1-3 and 1-4 pairs are damped by the
/// configured factors, 1-5 and further pairs interact at full strength.
/// Sigma and epsilon are mixed from the per-element tables once, here.
pub fn build_nonbonded_pairs(
    atoms: &[Atom],
    bonds: &[Bond],
    options: &NonbondedOptions,
) -> Vec<NonbondedPair> {
    let neighbors = topology::adjacency(atoms.len(), bonds);
    let mut pairs = Vec::new();

    for i in 0..atoms.len() {
        let dist = graph_distances(i as u32, &neighbors, 3);
        for j in (i + 1)..atoms.len() {
            let scale = match dist[j] {
                1 => continue, // 1-2: excluded entirely
                2 => options.scale_13,
                3 => options.scale_14,
                _ => 1.0,
            };
            if scale <= 0.0 {
                continue;
            }

            let z_i = atoms[i].atomic_number;
            let z_j = atoms[j].atomic_number;
            let sigma_i = 2.0 * elements::vdw_radius(z_i);
            let sigma_j = 2.0 * elements::vdw_radius(z_j);
            pairs.push(NonbondedPair {
                i: i as u32,
                j: j as u32,
                sigma: options.mixing_rule.mix_sigma(sigma_i, sigma_j) * options.sigma_scale,
                epsilon: options
                    .mixing_rule
                    .mix_epsilon(elements::lj_well_depth(z_i), elements::lj_well_depth(z_j)),
                scale,
            });
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethane() -> (Vec<Atom>, Vec<Bond>) {
        let mut atoms = vec![Atom::new(6), Atom::new(6)];
        atoms.extend(std::iter::repeat_n(Atom::new(1), 6));
        let mut bonds = vec![Bond::single(0, 1)];
        bonds.extend((2..=4).map(|h| Bond::single(0, h)));
        bonds.extend((5..=7).map(|h| Bond::single(1, h)));
        (atoms, bonds)
    }

    #[test]
    fn bond_parameters_come_from_covalent_radii() {
        let atoms = vec![Atom::with_lone_pairs(8, 2), Atom::new(1)];
        let bonds = vec![Bond::single(0, 1)];
        let params = assign_bond_parameters(&bonds, &atoms, 300.0);
        assert!((params[0].r0 - 0.97).abs() < 1e-12);
        assert_eq!(params[0].k, 300.0);
    }

    #[test]
    fn double_bond_is_shorter_and_stiffer() {
        let atoms = vec![Atom::new(6), Atom::new(8)];
        let single = assign_bond_parameters(&[Bond::new(0, 1, 1)], &atoms, 300.0);
        let double = assign_bond_parameters(&[Bond::new(0, 1, 2)], &atoms, 300.0);
        assert!(double[0].r0 < single[0].r0);
        assert_eq!(double[0].k, 600.0);
    }

    #[test]
    fn ideal_angle_covers_common_geometries() {
        assert!((vsepr_ideal_angle(2, 0) - PI).abs() < 1e-12);
        assert!((vsepr_ideal_angle(4, 0).to_degrees() - 109.5).abs() < 1e-9);
        assert!((vsepr_ideal_angle(4, 1).to_degrees() - 107.0).abs() < 1e-9);
        assert!((vsepr_ideal_angle(4, 2).to_degrees() - 104.5).abs() < 1e-9);
        assert!((vsepr_ideal_angle(6, 0).to_degrees() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn water_angle_targets_bent_geometry() {
        let atoms = vec![Atom::with_lone_pairs(8, 2), Atom::new(1), Atom::new(1)];
        let bonds = vec![Bond::single(0, 1), Bond::single(0, 2)];
        let angles = vec![Angle { i: 1, j: 0, k: 2 }];
        let params = assign_angle_parameters(&angles, &atoms, &bonds, 0.1);
        assert!((params[0].theta0.to_degrees() - 104.5).abs() < 1e-9);
        assert!((params[0].k - 10.0).abs() < 1e-12);
    }

    #[test]
    fn ethane_torsions_share_the_barrier_over_nine_instances() {
        let (atoms, bonds) = ethane();
        let torsions = topology::derive_torsions(atoms.len(), &bonds);
        let params = assign_torsion_parameters(&torsions, &atoms, &bonds);
        assert_eq!(params.len(), 9);
        for p in &params {
            assert_eq!(p.n, 3);
            assert_eq!(p.multiplicity, 9);
            assert!((p.barrier - 2.9).abs() < 1e-12);
        }
    }

    #[test]
    fn double_bond_torsion_is_rigid_and_planar() {
        // H2C=CH2 skeleton
        let atoms = vec![
            Atom::new(6),
            Atom::new(6),
            Atom::new(1),
            Atom::new(1),
            Atom::new(1),
            Atom::new(1),
        ];
        let bonds = vec![
            Bond::new(0, 1, 2),
            Bond::single(0, 2),
            Bond::single(0, 3),
            Bond::single(1, 4),
            Bond::single(1, 5),
        ];
        let torsions = topology::derive_torsions(atoms.len(), &bonds);
        let params = assign_torsion_parameters(&torsions, &atoms, &bonds);
        assert!(params.iter().all(|p| p.n == 2 && p.barrier >= 25.0));
        assert!(params.iter().all(|p| (p.phase - PI).abs() < 1e-12));
    }

    #[test]
    fn nonbonded_pairs_exclude_bonded_and_scale_by_separation() {
        let (atoms, bonds) = ethane();
        let options = NonbondedOptions::default();
        let pairs = build_nonbonded_pairs(&atoms, &bonds, &options);

        // Directly bonded pairs never appear.
        assert!(!pairs.iter().any(|p| (p.i, p.j) == (0, 1)));
        // H(2)-H(3) share carbon 0: 1-3.
        let h_h_geminal = pairs.iter().find(|p| (p.i, p.j) == (2, 3)).unwrap();
        assert_eq!(h_h_geminal.scale, options.scale_13);
        // H(2)-H(5) sit across the C-C bond: 1-4.
        let h_h_vicinal = pairs.iter().find(|p| (p.i, p.j) == (2, 5)).unwrap();
        assert_eq!(h_h_vicinal.scale, options.scale_14);
    }

    #[test]
    fn distant_pairs_interact_at_full_strength() {
        // Pentane-like C5 chain: C0 and C4 are 4 bonds apart.
        let atoms = vec![Atom::new(6); 5];
        let bonds: Vec<Bond> = (0..4).map(|i| Bond::single(i, i + 1)).collect();
        let pairs = build_nonbonded_pairs(&atoms, &bonds, &NonbondedOptions::default());
        let far = pairs.iter().find(|p| (p.i, p.j) == (0, 4)).unwrap();
        assert_eq!(far.scale, 1.0);
    }

    #[test]
    fn pair_sigma_uses_mixed_vdw_diameters() {
        let atoms = vec![Atom::new(1), Atom::new(6), Atom::new(1)];
        let bonds = vec![Bond::single(0, 1), Bond::single(1, 2)];
        let pairs = build_nonbonded_pairs(&atoms, &bonds, &NonbondedOptions::default());
        let h_h = pairs.iter().find(|p| (p.i, p.j) == (0, 2)).unwrap();
        assert!((h_h.sigma - 2.4).abs() < 1e-12);
    }
}
