use serde::{Deserialize, Serialize};

const MG_PER_G: f64 = 1000.0;
/// Relative overshoot of the total mass treated as rounding, not infeasibility.
const MASS_ROUNDING_SLACK: f64 = 1e-12;

/// Inputs for splitting a fixed powder mass between analyte and diluent.
///
/// Edge-steps are per unit areal mass density (cm²/g): a layer holding
/// `m` grams spread over `area_cm2` contributes `edge_step * m / area_cm2`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MassMixInput {
    pub sample_edge_step: f64,
    pub diluent_edge_step: f64,
    pub total_mass_mg: f64,
    pub area_cm2: f64,
    pub target_edge_step: f64,
}

impl MassMixInput {
    pub fn new(
        sample_edge_step: f64,
        diluent_edge_step: f64,
        total_mass_mg: f64,
        area_cm2: f64,
        target_edge_step: f64,
    ) -> Self {
        Self {
            sample_edge_step,
            diluent_edge_step,
            total_mass_mg,
            area_cm2,
            target_edge_step,
        }
    }

    pub fn total_mass_g(&self) -> f64 {
        self.total_mass_mg / MG_PER_G
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MassMixResult {
    pub sample_mass_mg: f64,
    pub diluent_mass_mg: f64,
}

impl MassMixResult {
    pub fn sample_mass_g(&self) -> f64 {
        self.sample_mass_mg / MG_PER_G
    }

    pub fn diluent_mass_g(&self) -> f64 {
        self.diluent_mass_mg / MG_PER_G
    }

    pub fn total_mass_mg(&self) -> f64 {
        self.sample_mass_mg + self.diluent_mass_mg
    }

    /// Total absorption above the edge, `mu_s * m_s + mu_d * m_d` with masses in grams.
    pub fn total_absorption(&self, sample_mu_above: f64, diluent_mu_above: f64) -> f64 {
        sample_mu_above * self.sample_mass_g() + diluent_mu_above * self.diluent_mass_g()
    }
}

/// Split `total_mass_mg` so the mixture reaches `target_edge_step`.
///
/// Solves
///
/// ```text
/// target = (s * m_s + d * m_d) / area
/// m_s + m_d = total
/// ```
///
/// Returns `None` when the two edge-steps are equal, the geometry or target is
/// non-positive, any input is non-finite, or the solution needs a negative mass.
pub fn compute_sample_weight_mix(input: MassMixInput) -> Option<MassMixResult> {
    if !input.target_edge_step.is_finite() || input.target_edge_step <= 0.0 {
        return None;
    }
    solve_mass_split(&input)
}

pub(crate) fn solve_mass_split(input: &MassMixInput) -> Option<MassMixResult> {
    let inputs = [
        input.sample_edge_step,
        input.diluent_edge_step,
        input.total_mass_mg,
        input.area_cm2,
        input.target_edge_step,
    ];
    if !crate::numerics::all_finite(&inputs) {
        return None;
    }
    if input.total_mass_mg <= 0.0 || input.area_cm2 <= 0.0 {
        return None;
    }

    let contrast = input.sample_edge_step - input.diluent_edge_step;
    if contrast == 0.0 {
        tracing::trace!(
            edge_step = input.sample_edge_step,
            "sample and diluent edge-steps are identical"
        );
        return None;
    }

    let total_g = input.total_mass_g();
    let sample_g =
        (input.target_edge_step * input.area_cm2 - input.diluent_edge_step * total_g) / contrast;
    let sample_mass_mg = snap_to_bounds(sample_g * MG_PER_G, input.total_mass_mg);
    let diluent_mass_mg = input.total_mass_mg - sample_mass_mg;

    if !sample_mass_mg.is_finite() || sample_mass_mg < 0.0 || diluent_mass_mg < 0.0 {
        tracing::trace!(
            sample_mass_mg,
            diluent_mass_mg,
            "mass split requires a negative component"
        );
        return None;
    }

    Some(MassMixResult {
        sample_mass_mg,
        diluent_mass_mg,
    })
}

/// Pull a sample mass that overshoots `0` or `total_mass_mg` by rounding
/// alone back onto that bound, so pure-sample and pure-diluent targets stay feasible.
fn snap_to_bounds(sample_mass_mg: f64, total_mass_mg: f64) -> f64 {
    let slack = total_mass_mg * MASS_ROUNDING_SLACK;
    if sample_mass_mg < 0.0 && sample_mass_mg >= -slack {
        0.0
    } else if sample_mass_mg > total_mass_mg && sample_mass_mg <= total_mass_mg + slack {
        total_mass_mg
    } else {
        sample_mass_mg
    }
}
