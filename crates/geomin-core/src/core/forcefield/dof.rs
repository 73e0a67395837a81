use nalgebra::{Point3, Vector3};

/// The working state vector of one optimization run.
///
/// Atom positions and lone-pair directions are kept as two explicit,
/// separately-sized arrays instead of one opaque flat buffer: callers never
/// need to know where the split occurs, and the per-step unit-length
/// renormalization of lone pairs is trivially scoped to the second array.
/// The optimizer treats the concatenation of both arrays as its
/// degree-of-freedom vector; the same type is reused for gradients, forces,
/// velocities and displacements, which all share this shape.
#[derive(Debug, Clone, PartialEq)]
pub struct DofVector {
    /// Atom positions, 3 doubles per atom (x, y, z contiguous).
    pub positions: Vec<f64>,
    /// Lone-pair unit direction vectors, 3 doubles per lone pair.
    pub lp_directions: Vec<f64>,
}

impl DofVector {
    pub fn from_positions(positions: Vec<f64>) -> Self {
        Self {
            positions,
            lp_directions: Vec::new(),
        }
    }

    /// Appends (or shrinks to) `lone_pairs` zeroed direction slots.
    pub fn resize_lone_pairs(&mut self, lone_pairs: usize) {
        self.lp_directions.resize(3 * lone_pairs, 0.0);
    }

    pub fn zeros_like(&self) -> Self {
        Self {
            positions: vec![0.0; self.positions.len()],
            lp_directions: vec![0.0; self.lp_directions.len()],
        }
    }

    pub fn atom_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn lone_pair_count(&self) -> usize {
        self.lp_directions.len() / 3
    }

    /// Total number of scalar degrees of freedom.
    pub fn len(&self) -> usize {
        self.positions.len() + self.lp_directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn position(&self, atom: usize) -> Point3<f64> {
        Point3::new(
            self.positions[3 * atom],
            self.positions[3 * atom + 1],
            self.positions[3 * atom + 2],
        )
    }

    pub fn set_position(&mut self, atom: usize, p: Point3<f64>) {
        self.positions[3 * atom] = p.x;
        self.positions[3 * atom + 1] = p.y;
        self.positions[3 * atom + 2] = p.z;
    }

    pub fn add_position(&mut self, atom: usize, v: Vector3<f64>) {
        self.positions[3 * atom] += v.x;
        self.positions[3 * atom + 1] += v.y;
        self.positions[3 * atom + 2] += v.z;
    }

    pub fn lp_direction(&self, lone_pair: usize) -> Vector3<f64> {
        Vector3::new(
            self.lp_directions[3 * lone_pair],
            self.lp_directions[3 * lone_pair + 1],
            self.lp_directions[3 * lone_pair + 2],
        )
    }

    pub fn set_lp_direction(&mut self, lone_pair: usize, u: Vector3<f64>) {
        self.lp_directions[3 * lone_pair] = u.x;
        self.lp_directions[3 * lone_pair + 1] = u.y;
        self.lp_directions[3 * lone_pair + 2] = u.z;
    }

    pub fn add_lp_direction(&mut self, lone_pair: usize, v: Vector3<f64>) {
        self.lp_directions[3 * lone_pair] += v.x;
        self.lp_directions[3 * lone_pair + 1] += v.y;
        self.lp_directions[3 * lone_pair + 2] += v.z;
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.positions
            .iter()
            .chain(self.lp_directions.iter())
            .copied()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut f64> {
        self.positions
            .iter_mut()
            .chain(self.lp_directions.iter_mut())
    }

    pub fn fill(&mut self, value: f64) {
        for v in self.values_mut() {
            *v = value;
        }
    }

    pub fn dot(&self, other: &Self) -> f64 {
        debug_assert_eq!(self.len(), other.len());
        self.values().zip(other.values()).map(|(a, b)| a * b).sum()
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn rms(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        (self.dot(self) / self.len() as f64).sqrt()
    }

    pub fn max_abs(&self) -> f64 {
        self.values().fold(0.0, |acc, v| acc.max(v.abs()))
    }

    /// `self += scale * other`, elementwise.
    pub fn add_scaled(&mut self, scale: f64, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (v, o) in self.values_mut().zip(other.values()) {
            *v += scale * o;
        }
    }

    /// `self = scale * other`, elementwise.
    pub fn assign_scaled(&mut self, scale: f64, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (v, o) in self.values_mut().zip(other.values()) {
            *v = scale * o;
        }
    }

    /// `self = keep * self + scale * other`, the FIRE velocity-mixing update.
    pub fn mix(&mut self, keep: f64, scale: f64, other: &Self) {
        debug_assert_eq!(self.len(), other.len());
        for (v, o) in self.values_mut().zip(other.values()) {
            *v = keep * *v + scale * o;
        }
    }

    /// Clamps each elementwise value into `[-limit, limit]`.
    pub fn clamp_values(&mut self, limit: f64) {
        for v in self.values_mut() {
            *v = v.clamp(-limit, limit);
        }
    }

    /// Rescales every per-site 3-vector (atom displacement or lone-pair
    /// displacement) whose norm exceeds `max_norm` down to that norm.
    pub fn clamp_triples(&mut self, max_norm: f64) {
        for chunk in self
            .positions
            .chunks_exact_mut(3)
            .chain(self.lp_directions.chunks_exact_mut(3))
        {
            let norm = (chunk[0] * chunk[0] + chunk[1] * chunk[1] + chunk[2] * chunk[2]).sqrt();
            if norm > max_norm {
                let scale = max_norm / norm;
                for v in chunk {
                    *v *= scale;
                }
            }
        }
    }

    pub fn is_finite(&self) -> bool {
        self.values().all(f64::is_finite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DofVector {
        let mut dof = DofVector::from_positions(vec![1.0, 2.0, 3.0, -1.0, 0.0, 0.5]);
        dof.resize_lone_pairs(1);
        dof.set_lp_direction(0, Vector3::new(0.0, 0.0, 1.0));
        dof
    }

    #[test]
    fn len_counts_positions_and_lone_pairs() {
        let dof = sample();
        assert_eq!(dof.atom_count(), 2);
        assert_eq!(dof.lone_pair_count(), 1);
        assert_eq!(dof.len(), 9);
    }

    #[test]
    fn dot_spans_both_arrays() {
        let dof = sample();
        let ones = {
            let mut v = dof.zeros_like();
            v.fill(1.0);
            v
        };
        assert_eq!(dof.dot(&ones), 1.0 + 2.0 + 3.0 - 1.0 + 0.5 + 1.0);
    }

    #[test]
    fn add_scaled_updates_lone_pair_slots() {
        let mut dof = sample();
        let mut step = dof.zeros_like();
        step.set_lp_direction(0, Vector3::new(0.5, 0.0, 0.0));
        dof.add_scaled(2.0, &step);
        assert_eq!(dof.lp_direction(0), Vector3::new(1.0, 0.0, 1.0));
    }

    #[test]
    fn clamp_triples_rescales_long_displacements_only() {
        let mut step = DofVector::from_positions(vec![3.0, 4.0, 0.0, 0.1, 0.0, 0.0]);
        step.clamp_triples(1.0);
        assert!((step.position(0).coords.norm() - 1.0).abs() < 1e-12);
        assert_eq!(step.position(1), Point3::new(0.1, 0.0, 0.0));
    }

    #[test]
    fn rms_of_uniform_vector_is_its_magnitude() {
        let mut dof = DofVector::from_positions(vec![0.0; 6]);
        dof.fill(2.0);
        assert!((dof.rms() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn is_finite_detects_nan_in_lone_pair_slot() {
        let mut dof = sample();
        assert!(dof.is_finite());
        dof.lp_directions[1] = f64::NAN;
        assert!(!dof.is_finite());
    }
}
