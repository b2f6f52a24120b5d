//! Planning logic for XAS sample preparation and ion-chamber fill gases.
//!
//! Physics inputs (edge-steps, mass-absorption coefficients, self-absorption
//! ratios) arrive as plain numbers; this crate only decides what to do with them.

pub mod common;
pub mod domain;
pub mod gas;
pub mod numerics;
pub mod range;
pub mod sample;
pub mod suitability;

pub use gas::{GasComponent, GasMixError, GasMixture};
pub use range::{ScanRangeError, validate_scan_range};
pub use sample::{
    EdgeStepSearchInput, MassMixInput, MassMixResult, compute_sample_weight_mix,
    compute_suggested_target_edge_step, pellet_area_cm2,
};
pub use suitability::{
    MeasurementMode, SuitabilityVerdict, classify_fluorescence, classify_transmission,
    summarize_suitability,
};
