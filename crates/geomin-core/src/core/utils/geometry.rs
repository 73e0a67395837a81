use nalgebra::{Point3, Vector3};

// Primitives over the flat coordinate buffer (3 doubles per atom, x/y/z contiguous).
// They return the mathematically defined value without degeneracy guarding; energy
// terms are responsible for skipping near-singular inputs before calling these.

pub fn point(coords: &[f64], atom: usize) -> Point3<f64> {
    Point3::new(coords[3 * atom], coords[3 * atom + 1], coords[3 * atom + 2])
}

pub fn vector(coords: &[f64], from: usize, to: usize) -> Vector3<f64> {
    point(coords, to) - point(coords, from)
}

pub fn distance(coords: &[f64], i: usize, j: usize) -> f64 {
    vector(coords, i, j).norm()
}

/// Bond angle at vertex `j`, in radians within `[0, π]`.
pub fn angle(coords: &[f64], i: usize, j: usize, k: usize) -> f64 {
    let u = vector(coords, j, i);
    let v = vector(coords, j, k);
    let cos_theta = (u.dot(&v) / (u.norm() * v.norm())).clamp(-1.0, 1.0);
    cos_theta.acos()
}

/// Signed dihedral angle of the `i-j-k-l` chain, in radians within `(−π, π]`,
/// via the standard normal-cross-product construction.
pub fn torsion(coords: &[f64], i: usize, j: usize, k: usize, l: usize) -> f64 {
    let b1 = vector(coords, i, j);
    let b2 = vector(coords, j, k);
    let b3 = vector(coords, k, l);

    let n1 = b1.cross(&b2);
    let n2 = b2.cross(&b3);

    let norms = n1.norm() * n2.norm();
    let cos_phi = n1.dot(&n2) / norms;
    let sin_phi = b2.normalize().dot(&n1.cross(&n2)) / norms;

    sin_phi.atan2(cos_phi.clamp(-1.0, 1.0))
}
