use super::{EnergyContext, EnergyTerm, TermKind};
use crate::core::forcefield::dof::DofVector;
use crate::core::forcefield::params::VseprParams;
use crate::core::forcefield::potentials;
use crate::core::models::atom::Atom;
use crate::core::models::topology::{self, Bond};
use nalgebra::Vector3;
use std::f64::consts::PI;

/// One electron domain around a central atom: either a bonding pair pointing
/// at a neighbor, or a lone pair carried as a virtual unit-direction site in
/// the extended coordinate vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Domain {
    BondPair { partner: u32 },
    LonePair { slot: u32 },
}

impl Domain {
    fn is_lone_pair(&self) -> bool {
        matches!(self, Domain::LonePair { .. })
    }
}

/// A central atom together with its electron domains. Atoms with fewer than
/// two domains have no pair interactions and are not kept.
#[derive(Debug, Clone)]
struct DomainCenter {
    atom: u32,
    domains: Vec<Domain>,
}

/// VSEPR electron-domain repulsion.
///
/// Every pair of domains around the same central atom repels with
/// `E = k·w / (ε + (1 − cosθ))^p`, weighted by the pair kind (lone pairs repel
/// hardest). This is the term that turns lone-pair count into molecular shape:
/// it bends water below tetrahedral and pushes ammonia's hydrogens under the
/// lone pair, without any per-molecule angle targets.
pub struct VseprTerm {
    centers: Vec<DomainCenter>,
    params: VseprParams,
    lone_pair_count: usize,
}

impl VseprTerm {
    /// Builds the domain list. Lone-pair slots are assigned in atom order, so
    /// the slot layout is a pure function of the topology.
    pub fn new(atoms: &[Atom], bonds: &[Bond], params: VseprParams) -> Self {
        let neighbors = topology::adjacency(atoms.len(), bonds);
        let mut centers = Vec::new();
        let mut next_slot = 0u32;

        for (index, atom) in atoms.iter().enumerate() {
            let mut domains: Vec<Domain> = neighbors[index]
                .iter()
                .map(|&partner| Domain::BondPair { partner })
                .collect();
            for _ in 0..atom.lone_pairs {
                domains.push(Domain::LonePair { slot: next_slot });
                next_slot += 1;
            }
            if domains.len() >= 2 {
                centers.push(DomainCenter {
                    atom: index as u32,
                    domains,
                });
            }
        }

        Self {
            centers,
            params,
            lone_pair_count: next_slot as usize,
        }
    }

    pub fn lone_pair_count(&self) -> usize {
        self.lone_pair_count
    }

    /// Unit direction of a domain as seen from its center, with the reciprocal
    /// length that converts the projected cosine gradient back to raw
    /// coordinates. Returns `None` for degenerate (zero-length) directions.
    fn direction(
        &self,
        center: u32,
        domain: Domain,
        coords: &DofVector,
    ) -> Option<(Vector3<f64>, f64)> {
        let raw = match domain {
            Domain::BondPair { partner } => {
                coords.position(partner as usize) - coords.position(center as usize)
            }
            Domain::LonePair { slot } => coords.lp_direction(slot as usize),
        };
        let norm = raw.norm();
        if norm < 1e-10 {
            return None;
        }
        Some((raw / norm, 1.0 / norm))
    }

    /// Routes a cosine-space gradient contribution on a domain's direction to
    /// the raw degrees of freedom it derives from.
    fn route_gradient(
        &self,
        center: u32,
        domain: Domain,
        contribution: Vector3<f64>,
        context: &mut EnergyContext,
    ) {
        match domain {
            Domain::BondPair { partner } => {
                context.add_position_gradient(partner as usize, contribution);
                context.add_position_gradient(center as usize, -contribution);
            }
            Domain::LonePair { slot } => {
                context.add_lp_gradient(slot as usize, contribution);
            }
        }
    }

    /// Seeds lone-pair directions from the topology: opposite the mean bond
    /// direction of the atom, fanned out deterministically when one atom
    /// carries several lone pairs.
    pub fn initialize_directions(&self, coords: &mut DofVector) {
        for center in &self.centers {
            let lone_pairs: Vec<u32> = center
                .domains
                .iter()
                .filter_map(|d| match d {
                    Domain::LonePair { slot } => Some(*slot),
                    Domain::BondPair { .. } => None,
                })
                .collect();
            if lone_pairs.is_empty() {
                continue;
            }

            let mut bond_sum = Vector3::zeros();
            for domain in &center.domains {
                if let Domain::BondPair { .. } = domain
                    && let Some((dir, _)) = self.direction(center.atom, *domain, coords)
                {
                    bond_sum += dir;
                }
            }
            let base = if bond_sum.norm() > 1e-8 {
                -bond_sum.normalize()
            } else {
                Vector3::z()
            };

            if lone_pairs.len() == 1 {
                coords.set_lp_direction(lone_pairs[0] as usize, base);
            } else {
                for (k, &slot) in lone_pairs.iter().enumerate() {
                    coords.set_lp_direction(
                        slot as usize,
                        fan_direction(base, k, lone_pairs.len()),
                    );
                }
            }
        }
    }

    /// Renormalizes every lone-pair direction to unit length, replacing
    /// collapsed (near-zero) directions with a deterministic unit vector so
    /// the invariant `|u| = 1` holds after every optimizer step.
    pub fn normalize_directions(&self, coords: &mut DofVector) {
        let total = coords.lone_pair_count();
        for slot in 0..total {
            let u = coords.lp_direction(slot);
            let norm = u.norm();
            if norm > 1e-8 {
                coords.set_lp_direction(slot, u / norm);
            } else {
                coords.set_lp_direction(slot, sphere_point(slot, total));
            }
        }
    }
}

/// Deterministic spread of `count` unit vectors around `base`, used to seed
/// several lone pairs on one atom with distinct directions.
fn fan_direction(base: Vector3<f64>, k: usize, count: usize) -> Vector3<f64> {
    let (e1, e2) = orthonormal_frame(base);
    let tilt = (k as f64 + 0.5) * PI / (count as f64 + 1.0);
    let azimuth = k as f64 * 2.0 * PI / (count as f64 + 1.0);
    base * tilt.cos() + (e1 * azimuth.cos() + e2 * azimuth.sin()) * tilt.sin()
}

/// Deterministic unit vector for slot `k` of `count`, spread over the sphere.
fn sphere_point(k: usize, count: usize) -> Vector3<f64> {
    let theta = (k as f64 + 0.5) * PI / (count as f64 + 1.0);
    let phi = k as f64 * 2.0 * PI / (count as f64 + 1.0);
    Vector3::new(
        theta.sin() * phi.cos(),
        theta.sin() * phi.sin(),
        theta.cos(),
    )
}

fn orthonormal_frame(base: Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let helper = if base.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    let e1 = base.cross(&helper).normalize();
    let e2 = base.cross(&e1);
    (e1, e2)
}

impl EnergyTerm for VseprTerm {
    fn kind(&self) -> TermKind {
        TermKind::Vsepr
    }

    fn initialize(&self, coords: &mut DofVector) {
        self.initialize_directions(coords);
    }

    fn constrain(&self, coords: &mut DofVector) {
        self.normalize_directions(coords);
    }

    fn evaluate(&self, context: &mut EnergyContext) -> f64 {
        let mut energy = 0.0;

        for center in &self.centers {
            for a in 0..center.domains.len() {
                for b in (a + 1)..center.domains.len() {
                    let dom_a = center.domains[a];
                    let dom_b = center.domains[b];
                    let Some((dir_a, inv_len_a)) =
                        self.direction(center.atom, dom_a, context.coords)
                    else {
                        tracing::debug!(atom = center.atom, "skipping degenerate domain");
                        continue;
                    };
                    let Some((dir_b, inv_len_b)) =
                        self.direction(center.atom, dom_b, context.coords)
                    else {
                        tracing::debug!(atom = center.atom, "skipping degenerate domain");
                        continue;
                    };

                    let cos_theta = dir_a.dot(&dir_b).clamp(-1.0, 1.0);
                    let weight = self
                        .params
                        .weight(dom_a.is_lone_pair(), dom_b.is_lone_pair());
                    let (e, de_dcos) = potentials::domain_repulsion(
                        cos_theta,
                        weight,
                        self.params.k_vsepr,
                        self.params.epsilon,
                        self.params.p,
                    );
                    energy += e;

                    if context.wants_gradient() {
                        // Projected cosine gradient: exact for the normalized
                        // directions, scaled back by the raw vector length.
                        let g_a = (dir_b - dir_a * cos_theta) * (de_dcos * inv_len_a);
                        let g_b = (dir_a - dir_b * cos_theta) * (de_dcos * inv_len_b);
                        self.route_gradient(center.atom, dom_a, g_a, context);
                        self.route_gradient(center.atom, dom_b, g_b, context);
                    }
                }
            }
        }

        energy
    }
}
