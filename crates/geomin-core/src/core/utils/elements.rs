use phf::{Map, phf_map};

// Covalent radii in Angstroms (Cordero et al., single-bond values), H through Xe.
static COVALENT_RADII: Map<u8, f64> = phf_map! {
    1u8 => 0.31, 2u8 => 0.28, 3u8 => 1.28, 4u8 => 0.96, 5u8 => 0.84,
    6u8 => 0.76, 7u8 => 0.71, 8u8 => 0.66, 9u8 => 0.57, 10u8 => 0.58,
    11u8 => 1.66, 12u8 => 1.41, 13u8 => 1.21, 14u8 => 1.11, 15u8 => 1.07,
    16u8 => 1.05, 17u8 => 1.02, 18u8 => 1.06, 19u8 => 2.03, 20u8 => 1.76,
    21u8 => 1.70, 22u8 => 1.60, 23u8 => 1.53, 24u8 => 1.39, 25u8 => 1.39,
    26u8 => 1.32, 27u8 => 1.26, 28u8 => 1.24, 29u8 => 1.32, 30u8 => 1.22,
    31u8 => 1.22, 32u8 => 1.20, 33u8 => 1.19, 34u8 => 1.20, 35u8 => 1.20,
    36u8 => 1.16, 37u8 => 2.20, 38u8 => 1.95, 39u8 => 1.90, 40u8 => 1.75,
    41u8 => 1.64, 42u8 => 1.54, 43u8 => 1.47, 44u8 => 1.46, 45u8 => 1.42,
    46u8 => 1.39, 47u8 => 1.45, 48u8 => 1.44, 49u8 => 1.42, 50u8 => 1.39,
    51u8 => 1.39, 52u8 => 1.38, 53u8 => 1.39, 54u8 => 1.40,
};

// Van der Waals radii in Angstroms (Bondi), H through Ca.
static VDW_RADII: Map<u8, f64> = phf_map! {
    1u8 => 1.20, 2u8 => 1.40, 3u8 => 1.82, 4u8 => 1.53, 5u8 => 1.92,
    6u8 => 1.70, 7u8 => 1.55, 8u8 => 1.52, 9u8 => 1.47, 10u8 => 1.54,
    11u8 => 2.27, 12u8 => 1.73, 13u8 => 1.84, 14u8 => 2.10, 15u8 => 1.80,
    16u8 => 1.80, 17u8 => 1.75, 18u8 => 1.88, 19u8 => 2.75, 20u8 => 2.31,
};

// Lennard-Jones well depths in kcal/mol (UFF nonbond parameters).
static LJ_WELL_DEPTHS: Map<u8, f64> = phf_map! {
    1u8 => 0.044, 2u8 => 0.056, 3u8 => 0.025, 4u8 => 0.085, 5u8 => 0.180,
    6u8 => 0.105, 7u8 => 0.069, 8u8 => 0.060, 9u8 => 0.050, 10u8 => 0.042,
    11u8 => 0.030, 12u8 => 0.111, 13u8 => 0.505, 14u8 => 0.402, 15u8 => 0.305,
    16u8 => 0.274, 17u8 => 0.227, 18u8 => 0.185, 19u8 => 0.035, 20u8 => 0.238,
    35u8 => 0.251, 53u8 => 0.339,
};

const FALLBACK_COVALENT_RADIUS: f64 = 1.5;
const FALLBACK_VDW_RADIUS: f64 = 2.0;
const FALLBACK_WELL_DEPTH: f64 = 0.1;

pub fn covalent_radius(atomic_number: u8) -> f64 {
    *COVALENT_RADII
        .get(&atomic_number)
        .unwrap_or(&FALLBACK_COVALENT_RADIUS)
}

pub fn vdw_radius(atomic_number: u8) -> f64 {
    *VDW_RADII
        .get(&atomic_number)
        .unwrap_or(&FALLBACK_VDW_RADIUS)
}

pub fn lj_well_depth(atomic_number: u8) -> f64 {
    *LJ_WELL_DEPTHS
        .get(&atomic_number)
        .unwrap_or(&FALLBACK_WELL_DEPTH)
}
