use super::{EnergyContext, EnergyTerm, TermKind};
use crate::core::forcefield::params::AngleParams;
use crate::core::forcefield::potentials;
use crate::core::models::topology::Angle;

/// Harmonic angle bending in cosine space over the derived angle list.
///
/// Working in `cosθ` instead of `θ` keeps the energy and gradient smooth as an
/// angle passes through 180°, where `dθ/dcosθ` diverges.
pub struct AngleTerm {
    angles: Vec<Angle>,
    params: Vec<AngleParams>,
}

impl AngleTerm {
    pub fn new(angles: Vec<Angle>, params: Vec<AngleParams>) -> Self {
        debug_assert_eq!(angles.len(), params.len());
        Self { angles, params }
    }
}

impl EnergyTerm for AngleTerm {
    fn kind(&self) -> TermKind {
        TermKind::Angle
    }

    fn evaluate(&self, context: &mut EnergyContext) -> f64 {
        let mut energy = 0.0;

        for (angle, params) in self.angles.iter().zip(&self.params) {
            let (i, j, k) = (angle.i as usize, angle.j as usize, angle.k as usize);
            let u = context.coords.position(i) - context.coords.position(j);
            let v = context.coords.position(k) - context.coords.position(j);
            let a = u.norm();
            let b = v.norm();
            if a < 1e-10 || b < 1e-10 {
                tracing::debug!(angle.i, angle.j, angle.k, "skipping degenerate angle");
                continue;
            }

            let cos_theta = (u.dot(&v) / (a * b)).clamp(-1.0, 1.0);
            let (e, de_dcos) =
                potentials::cosine_harmonic_bend(cos_theta, params.theta0.cos(), params.k);
            energy += e;

            if context.wants_gradient() {
                let dcos_du = (v / b - u * (cos_theta / a)) / a;
                let dcos_dv = (u / a - v * (cos_theta / b)) / b;
                let g_i = dcos_du * de_dcos;
                let g_k = dcos_dv * de_dcos;
                context.add_position_gradient(i, g_i);
                context.add_position_gradient(k, g_k);
                context.add_position_gradient(j, -(g_i + g_k));
            }
        }

        energy
    }
}
