use super::mix::{MassMixInput, MassMixResult, compute_sample_weight_mix};
use serde::{Deserialize, Serialize};

pub const MAX_BISECTION_ITERATIONS: usize = 200;
/// Largest round-trip miss accepted for a reported edge-step.
pub const ABSORPTION_TOLERANCE: f64 = 1e-4;
const SEARCH_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStepSearchInput {
    pub sample_edge_step: f64,
    pub diluent_edge_step: f64,
    pub sample_mu_above: f64,
    pub diluent_mu_above: f64,
    pub total_mass_mg: f64,
    pub area_cm2: f64,
    pub target_absorption: f64,
}

impl EdgeStepSearchInput {
    pub fn mix_input(&self, target_edge_step: f64) -> MassMixInput {
        MassMixInput {
            sample_edge_step: self.sample_edge_step,
            diluent_edge_step: self.diluent_edge_step,
            total_mass_mg: self.total_mass_mg,
            area_cm2: self.area_cm2,
            target_edge_step,
        }
    }

    fn is_well_posed(&self) -> bool {
        let values = [
            self.sample_edge_step,
            self.diluent_edge_step,
            self.sample_mu_above,
            self.diluent_mu_above,
            self.total_mass_mg,
            self.area_cm2,
            self.target_absorption,
        ];
        crate::numerics::all_finite(&values)
            && self.total_mass_mg > 0.0
            && self.area_cm2 > 0.0
            && self.target_absorption > 0.0
            && self.sample_edge_step != self.diluent_edge_step
    }

    /// Edge-steps reachable with both masses non-negative, lower end clipped at zero.
    fn feasible_bracket(&self) -> Option<(f64, f64)> {
        let total_g = self.total_mass_mg / 1000.0;
        let pure_diluent = self.diluent_edge_step * total_g / self.area_cm2;
        let pure_sample = self.sample_edge_step * total_g / self.area_cm2;
        let lower = pure_diluent.min(pure_sample).max(0.0);
        let upper = pure_diluent.max(pure_sample);
        (upper > lower).then_some((lower, upper))
    }

    /// Absorption along the mixing line with the sample mass held inside `[0, total]`.
    fn absorption_along_bracket(&self, edge_step: f64) -> f64 {
        let total_g = self.total_mass_mg / 1000.0;
        let sample_g = ((edge_step * self.area_cm2 - self.diluent_edge_step * total_g)
            / (self.sample_edge_step - self.diluent_edge_step))
            .clamp(0.0, total_g);
        self.sample_mu_above * sample_g + self.diluent_mu_above * (total_g - sample_g)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedMix {
    pub edge_step: f64,
    pub mix: MassMixResult,
    pub absorption: f64,
}

/// Search the feasible edge-step bracket for the value whose mass split gives
/// `target_absorption`.
///
/// Absorption is linear in the sample mass, which is linear in the edge-step,
/// so bisection over the bracket converges monotonically. `None` means the
/// achievable absorption range never reaches the target.
pub fn compute_suggested_target_edge_step(input: EdgeStepSearchInput) -> Option<f64> {
    suggest_sample_mix(input).map(|suggestion| suggestion.edge_step)
}

/// Same search as [`compute_suggested_target_edge_step`], also returning the
/// mass split and the absorption it reproduces.
pub fn suggest_sample_mix(input: EdgeStepSearchInput) -> Option<SuggestedMix> {
    if !input.is_well_posed() {
        return None;
    }
    let (lower, upper) = input.feasible_bracket()?;
    let target_absorption = input.target_absorption;
    let residual =
        |edge_step: f64| input.absorption_along_bracket(edge_step) - target_absorption;

    let residual_lower = residual(lower);
    let residual_upper = residual(upper);
    tracing::debug!(
        lower,
        upper,
        residual_lower,
        residual_upper,
        "edge-step search bracket"
    );

    let candidate = if residual_upper.abs() <= SEARCH_TOLERANCE {
        upper
    } else if residual_lower.abs() <= SEARCH_TOLERANCE && lower > 0.0 {
        lower
    } else if residual_lower * residual_upper > 0.0 {
        tracing::debug!(
            target_absorption,
            "target absorption lies outside the achievable range"
        );
        return None;
    } else {
        bisect(lower, upper, residual_upper, residual)
    };

    let mix = compute_sample_weight_mix(input.mix_input(candidate))?;
    let absorption = mix.total_absorption(input.sample_mu_above, input.diluent_mu_above);
    if (absorption - target_absorption).abs() > ABSORPTION_TOLERANCE {
        tracing::debug!(
            candidate,
            absorption,
            target_absorption,
            "round trip missed target absorption"
        );
        return None;
    }

    Some(SuggestedMix {
        edge_step: candidate,
        mix,
        absorption,
    })
}

fn bisect(
    mut lower: f64,
    mut upper: f64,
    residual_upper: f64,
    residual: impl Fn(f64) -> f64,
) -> f64 {
    let upper_is_negative = residual_upper < 0.0;
    let mut midpoint = 0.5 * (lower + upper);

    for iteration in 0..MAX_BISECTION_ITERATIONS {
        midpoint = 0.5 * (lower + upper);
        let value = residual(midpoint);
        if value.abs() <= SEARCH_TOLERANCE
            || upper - lower <= f64::EPSILON * upper.abs().max(1.0)
        {
            tracing::trace!(iteration, midpoint, value, "bisection converged");
            break;
        }
        if (value < 0.0) == upper_is_negative {
            upper = midpoint;
        } else {
            lower = midpoint;
        }
    }

    midpoint
}
