use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::forcefield::dof::DofVector;
use crate::core::forcefield::model::{EnergyModel, EnergyResult};
use serde::Deserialize;

/// Tuning parameters of the FIRE minimizer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FireSettings {
    /// Converged when the RMS force drops below this, in kcal/mol/Å.
    pub tol_rms_force: f64,
    /// ... and the largest single force component below this.
    pub tol_max_force: f64,
    pub max_iterations: usize,
    pub dt_init: f64,
    pub dt_max: f64,
    /// Runs terminate when repeated quenching shrinks the timestep below
    /// this, instead of crawling forever.
    pub dt_min: f64,
    pub alpha_init: f64,
    pub f_alpha: f64,
    pub f_inc: f64,
    pub f_dec: f64,
    /// Number of consecutive downhill steps before acceleration kicks in.
    pub n_min: usize,
    /// Largest per-site displacement in one step, in Angstroms.
    pub max_step: f64,
    /// Clamp each force component into `[-max_force_clamp, max_force_clamp]`
    /// before integrating; off by default.
    pub clamp_forces: bool,
    pub max_force_clamp: f64,
}

impl Default for FireSettings {
    fn default() -> Self {
        Self {
            tol_rms_force: 1e-4,
            tol_max_force: 1e-3,
            max_iterations: 5000,
            dt_init: 0.05,
            dt_max: 0.5,
            dt_min: 1e-6,
            alpha_init: 0.1,
            f_alpha: 0.99,
            f_inc: 1.1,
            f_dec: 0.5,
            n_min: 5,
            max_step: 0.2,
            clamp_forces: false,
            max_force_clamp: 100.0,
        }
    }
}

/// The two regimes of a FIRE run, decided each step by the power `P = F·v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePhase {
    /// Moving downhill: inertia builds, the timestep grows.
    Accelerating,
    /// Moved uphill: velocity is zeroed and the timestep shrinks.
    Quenched,
}

impl FirePhase {
    pub fn from_power(power: f64) -> Self {
        if power > 0.0 {
            FirePhase::Accelerating
        } else {
            FirePhase::Quenched
        }
    }
}

/// Why a minimization run stopped. Non-convergence is an outcome, not an
/// error: the caller always gets the best coordinates reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    Converged,
    MaxIterations,
    TimestepUnderflow,
    NumericalFailure,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TerminationReason::Converged => "converged",
            TerminationReason::MaxIterations => "maximum iterations reached",
            TerminationReason::TimestepUnderflow => "timestep underflow",
            TerminationReason::NumericalFailure => {
                "numerical failure, restored last finite coordinates"
            }
        };
        f.write_str(text)
    }
}

/// Outcome of one minimization run.
#[derive(Debug, Clone)]
pub struct OptimizeResult {
    pub coords: DofVector,
    pub converged: bool,
    pub iterations: usize,
    pub energy: f64,
    pub rms_force: f64,
    pub max_force: f64,
    pub breakdown: EnergyResult,
    pub reason: TerminationReason,
}

/// Fast Inertial Relaxation Engine.
///
/// Semi-implicit Euler integration of a fictitious damped dynamics: while the
/// system moves downhill (`F·v > 0`) velocity accumulates and the timestep
/// grows; one uphill step zeroes the velocity and shrinks the timestep. The
/// velocity is additionally steered toward the force direction by the mixing
/// parameter `alpha`. Lone-pair directions ride along as ordinary degrees of
/// freedom and are renormalized through the model after every step.
pub struct FireOptimizer {
    settings: FireSettings,
}

impl FireOptimizer {
    pub fn new(settings: FireSettings) -> Self {
        Self { settings }
    }

    pub fn minimize(
        &self,
        model: &EnergyModel,
        mut coords: DofVector,
        reporter: &ProgressReporter,
    ) -> Result<OptimizeResult, EngineError> {
        let s = &self.settings;
        model.validate(&coords)?;
        model.constrain(&mut coords);

        let mut velocity = coords.zeros_like();
        let mut gradient = coords.zeros_like();
        let mut forces = coords.zeros_like();
        let mut step = coords.zeros_like();
        let mut last_good = coords.clone();

        let mut dt = s.dt_init;
        let mut alpha = s.alpha_init;
        let mut n_positive = 0usize;

        let mut iterations = 0;
        let mut rms_force = f64::INFINITY;
        let mut max_force = f64::INFINITY;
        let mut reason = TerminationReason::MaxIterations;

        for iteration in 1..=s.max_iterations {
            iterations = iteration;

            let energy = model.evaluate_gradient(&coords, &mut gradient)?;
            forces.assign_scaled(-1.0, &gradient);
            if s.clamp_forces {
                forces.clamp_values(s.max_force_clamp);
            }
            if !energy.is_finite() || !forces.is_finite() {
                tracing::debug!(iteration, "non-finite energy or forces, aborting run");
                coords = last_good;
                reason = TerminationReason::NumericalFailure;
                break;
            }
            last_good.clone_from(&coords);

            rms_force = forces.rms();
            max_force = forces.max_abs();
            reporter.report(Progress::FireStep {
                iteration,
                energy,
                rms_force,
            });
            if rms_force < s.tol_rms_force && max_force < s.tol_max_force {
                reason = TerminationReason::Converged;
                break;
            }

            match FirePhase::from_power(forces.dot(&velocity)) {
                FirePhase::Accelerating => {
                    n_positive += 1;
                    if n_positive > s.n_min {
                        dt = (dt * s.f_inc).min(s.dt_max);
                        alpha *= s.f_alpha;
                    }
                }
                FirePhase::Quenched => {
                    n_positive = 0;
                    velocity.fill(0.0);
                    dt *= s.f_dec;
                    alpha = s.alpha_init;
                    if dt < s.dt_min {
                        reason = TerminationReason::TimestepUnderflow;
                        break;
                    }
                }
            }

            let force_norm = forces.norm();
            if force_norm > 1e-12 {
                let speed = velocity.norm();
                velocity.mix(1.0 - alpha, alpha * speed / force_norm, &forces);
            }

            velocity.add_scaled(dt, &forces);
            step.assign_scaled(dt, &velocity);
            step.clamp_triples(s.max_step);
            coords.add_scaled(1.0, &step);
            model.constrain(&mut coords);

            if !coords.is_finite() {
                tracing::debug!(iteration, "step produced non-finite coordinates");
                coords = last_good;
                reason = TerminationReason::NumericalFailure;
                break;
            }
            last_good.clone_from(&coords);
        }

        let converged = reason == TerminationReason::Converged;
        let breakdown = model.evaluate_detailed(&coords)?;
        tracing::info!(
            iterations,
            energy = breakdown.total,
            rms_force,
            %reason,
            "minimization finished"
        );

        Ok(OptimizeResult {
            coords,
            converged,
            iterations,
            energy: breakdown.total,
            rms_force,
            max_force,
            breakdown,
            reason,
        })
    }
}
