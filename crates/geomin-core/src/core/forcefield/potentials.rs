//! Closed-form potential functions and their first derivatives.
//!
//! Every function returns `(energy, derivative)` where the derivative is taken
//! with respect to the function's scalar argument (distance, cosine, or
//! dihedral angle). Degenerate-input guarding is the calling term's job; these
//! stay pure.

/// WCA truncation radius as a multiple of sigma: 2^(1/6).
pub const WCA_CUTOFF_FACTOR: f64 = 1.122_462_048_309_373;

/// Harmonic stretch `E = 0.5·k·(r − r0)²`; derivative w.r.t. `r`.
#[inline]
pub fn harmonic_stretch(r: f64, r0: f64, k: f64) -> (f64, f64) {
    let delta = r - r0;
    (0.5 * k * delta * delta, k * delta)
}

/// Harmonic bend in cosine space `E = 0.5·k·(cosθ − cosθ0)²`; derivative
/// w.r.t. `cosθ`. Formulated in cosine space to avoid `acos` and stay smooth
/// as θ approaches 180°.
#[inline]
pub fn cosine_harmonic_bend(cos_theta: f64, cos_theta0: f64, k: f64) -> (f64, f64) {
    let delta = cos_theta - cos_theta0;
    (0.5 * k * delta * delta, k * delta)
}

/// Periodic torsion `E = V/2·[1 + cos(nφ − δ)]`; derivative w.r.t. `φ`.
#[inline]
pub fn periodic_torsion(phi: f64, n: u8, barrier: f64, phase: f64) -> (f64, f64) {
    let arg = n as f64 * phi - phase;
    (
        0.5 * barrier * (1.0 + arg.cos()),
        -0.5 * barrier * n as f64 * arg.sin(),
    )
}

/// Lennard-Jones 12-6 `E = 4ε[(σ/r)¹² − (σ/r)⁶]`; derivative w.r.t. `r`.
#[inline]
pub fn lennard_jones_12_6(r: f64, sigma: f64, epsilon: f64) -> (f64, f64) {
    let x = sigma / r;
    let x6 = x.powi(6);
    let x12 = x6 * x6;
    (
        4.0 * epsilon * (x12 - x6),
        4.0 * epsilon * (-12.0 * x12 + 6.0 * x6) / r,
    )
}

/// Weeks-Chandler-Andersen potential: the Lennard-Jones repulsive branch
/// shifted up by ε and truncated to zero at its minimum `2^(1/6)·σ`, so the
/// pair interaction is purely repulsive.
#[inline]
pub fn wca(r: f64, sigma: f64, epsilon: f64) -> (f64, f64) {
    if r >= WCA_CUTOFF_FACTOR * sigma {
        return (0.0, 0.0);
    }
    let (lj, dlj) = lennard_jones_12_6(r, sigma, epsilon);
    (lj + epsilon, dlj)
}

/// VSEPR electron-domain pair repulsion `E = k·w / (ε + (1 − cosθ))^p`;
/// derivative w.r.t. `cosθ`. The repulsion steepens as the two domains crowd
/// (cosθ → 1); `ε` regularizes the pole at θ = 0.
#[inline]
pub fn domain_repulsion(cos_theta: f64, weight: f64, k: f64, epsilon: f64, p: f64) -> (f64, f64) {
    let denom = epsilon + (1.0 - cos_theta);
    (
        k * weight / denom.powf(p),
        k * weight * p / denom.powf(p + 1.0),
    )
}
