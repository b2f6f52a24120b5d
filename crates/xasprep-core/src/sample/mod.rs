//! Powder sample preparation: how much analyte to mix into a fixed pellet mass.

pub mod edge_step;
pub mod geometry;
pub mod mix;

pub use edge_step::{
    ABSORPTION_TOLERANCE, EdgeStepSearchInput, MAX_BISECTION_ITERATIONS, SuggestedMix,
    compute_suggested_target_edge_step, suggest_sample_mix,
};
pub use geometry::{areal_density_g_cm2, pellet_area_cm2};
pub use mix::{MassMixInput, MassMixResult, compute_sample_weight_mix};
