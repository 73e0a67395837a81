use serde::Deserialize;

/// Harmonic bond parameters for one bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondParams {
    /// Equilibrium length in Angstroms.
    pub r0: f64,
    /// Force constant in kcal/mol/Å².
    pub k: f64,
}

/// Cosine-space harmonic angle parameters for one angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleParams {
    /// Equilibrium angle in radians.
    pub theta0: f64,
    /// Force constant in kcal/mol.
    pub k: f64,
}

/// Periodic torsion parameters for one dihedral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorsionParams {
    /// Periodicity of the cosine potential.
    pub n: u8,
    /// Barrier height in kcal/mol.
    pub barrier: f64,
    /// Phase offset in radians.
    pub phase: f64,
    /// Number of redundant torsions sharing the central bond's barrier;
    /// each instance contributes `1/multiplicity` of the full potential.
    pub multiplicity: u32,
}

/// One precomputed nonbonded pair with its mixed Lennard-Jones parameters and
/// topological scale factor (1-3 and 1-4 pairs are damped, 1-2 pairs never
/// appear in the list).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NonbondedPair {
    pub i: u32,
    pub j: u32,
    /// Mixed collision diameter in Angstroms.
    pub sigma: f64,
    /// Mixed well depth in kcal/mol.
    pub epsilon: f64,
    /// Topological scaling factor in `[0, 1]`.
    pub scale: f64,
}

/// Rule for combining per-element Lennard-Jones parameters into pair values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MixingRule {
    /// Arithmetic mean for sigma, geometric mean for epsilon.
    #[default]
    LorentzBerthelot,
    /// Geometric mean for both sigma and epsilon.
    Geometric,
}

impl MixingRule {
    pub fn mix_sigma(&self, sigma_i: f64, sigma_j: f64) -> f64 {
        match self {
            MixingRule::LorentzBerthelot => 0.5 * (sigma_i + sigma_j),
            MixingRule::Geometric => (sigma_i * sigma_j).sqrt(),
        }
    }

    pub fn mix_epsilon(&self, eps_i: f64, eps_j: f64) -> f64 {
        (eps_i * eps_j).sqrt()
    }
}

/// Options controlling nonbonded pair generation and evaluation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NonbondedOptions {
    /// Scale for 1-3 pairs (two bonds apart). Kept low in geometry mode so
    /// the nonbonded term does not fight the domain term.
    pub scale_13: f64,
    /// Scale for 1-4 pairs (three bonds apart).
    pub scale_14: f64,
    /// Use the purely repulsive WCA truncation instead of full Lennard-Jones.
    pub repulsion_only: bool,
    pub mixing_rule: MixingRule,
    /// Multiplier applied to the mixed sigma.
    pub sigma_scale: f64,
    /// Minimum distance clamp to avoid the r → 0 singularity, in Angstroms.
    pub r_min: f64,
    /// Hard cutoff distance in Angstroms; `None` disables the cutoff.
    pub cutoff: Option<f64>,
}

impl Default for NonbondedOptions {
    fn default() -> Self {
        Self {
            scale_13: 0.25,
            scale_14: 0.6,
            repulsion_only: true,
            mixing_rule: MixingRule::default(),
            sigma_scale: 1.0,
            r_min: 0.5,
            cutoff: None,
        }
    }
}

/// Parameters of the VSEPR electron-domain repulsion term.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VseprParams {
    /// Lone pair / lone pair repulsion weight (strongest).
    pub w_lp_lp: f64,
    /// Lone pair / bond pair repulsion weight.
    pub w_lp_bp: f64,
    /// Bond pair / bond pair repulsion weight (weakest).
    pub w_bp_bp: f64,
    /// Stiffness exponent of the repulsion.
    pub p: f64,
    /// Regularizer preventing the θ = 0 singularity.
    pub epsilon: f64,
    /// Overall strength in kcal/mol.
    pub k_vsepr: f64,
}

impl Default for VseprParams {
    fn default() -> Self {
        Self {
            w_lp_lp: 2.0,
            w_lp_bp: 1.5,
            w_bp_bp: 1.0,
            p: 1.5,
            epsilon: 0.01,
            k_vsepr: 50.0,
        }
    }
}

impl VseprParams {
    /// Repulsion weight for a domain pair by kind.
    pub fn weight(&self, a_is_lone_pair: bool, b_is_lone_pair: bool) -> f64 {
        match (a_is_lone_pair, b_is_lone_pair) {
            (true, true) => self.w_lp_lp,
            (true, false) | (false, true) => self.w_lp_bp,
            (false, false) => self.w_bp_bp,
        }
    }
}
