use crate::core::forcefield::model::{EnergyModel, EnergyResult};
use crate::core::models::molecule::Molecule;
use crate::engine::clash::ClashRelaxer;
use crate::engine::config::MinimizeConfig;
use crate::engine::error::EngineError;
use crate::engine::fire::{FireOptimizer, TerminationReason};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::instrument;

/// Outcome of a full geometry prediction run. Positions are the plain
/// per-atom coordinates; the lone-pair virtual sites used internally are
/// stripped off.
#[derive(Debug, Clone)]
pub struct MinimizeReport {
    pub positions: Vec<f64>,
    pub converged: bool,
    pub iterations: usize,
    /// Sweeps the clash relaxer ran, or `None` when it was disabled.
    pub clash_sweeps: Option<usize>,
    pub energy: f64,
    pub rms_force: f64,
    pub max_force: f64,
    pub breakdown: EnergyResult,
    pub reason: TerminationReason,
}

/// Runs the full pipeline on one molecule: optional clash relaxation, model
/// assembly, lone-pair seeding and FIRE minimization.
///
/// `positions` is the flat starting geometry, 3 values per atom. The run
/// always yields a report; a geometry that failed to converge comes back with
/// `converged == false` and the best coordinates reached.
#[instrument(skip_all, fields(atoms = molecule.atom_count()))]
pub fn run(
    molecule: &Molecule,
    positions: &[f64],
    config: &MinimizeConfig,
    reporter: &ProgressReporter,
) -> Result<MinimizeReport, EngineError> {
    if positions.len() != 3 * molecule.atom_count() {
        return Err(EngineError::CoordinateMismatch {
            expected: 3 * molecule.atom_count(),
            actual: positions.len(),
        });
    }
    let mut positions = positions.to_vec();

    let clash_sweeps = if config.clash_relaxation {
        reporter.report(Progress::PhaseStart {
            name: "clash-relaxation",
        });
        let relaxer = ClashRelaxer::new(config.clash.clone());
        let sweeps = relaxer.relax(&mut positions, &molecule.atoms, &molecule.bonds)?;
        tracing::debug!(sweeps, "clash relaxation done");
        reporter.report(Progress::ClashRelaxation { iterations: sweeps });
        reporter.report(Progress::PhaseFinish);
        Some(sweeps)
    } else {
        None
    };

    let model = EnergyModel::new(molecule, &config.model);
    let coords = model.extend_coordinates(positions)?;

    reporter.report(Progress::PhaseStart { name: "fire" });
    let optimizer = FireOptimizer::new(config.fire.clone());
    let result = optimizer.minimize(&model, coords, reporter)?;
    reporter.report(Progress::PhaseFinish);

    tracing::info!(
        converged = result.converged,
        iterations = result.iterations,
        energy = result.energy,
        "geometry prediction finished"
    );

    Ok(MinimizeReport {
        positions: result.coords.positions,
        converged: result.converged,
        iterations: result.iterations,
        clash_sweeps,
        energy: result.energy,
        rms_force: result.rms_force,
        max_force: result.max_force,
        breakdown: result.breakdown,
        reason: result.reason,
    })
}
