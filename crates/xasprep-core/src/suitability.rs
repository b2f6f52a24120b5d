//! Pass/fail verdicts for transmission and fluorescence measurements.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Transmission needs total absorption strictly below this μt.
pub const TRANSMISSION_MU_T_LIMIT: f64 = 4.0;
/// Fluorescence needs at least this self-absorption ratio, in percent.
pub const FLUORESCENCE_R_PERCENT_MIN: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementMode {
    Transmission,
    Fluorescence,
}

impl MeasurementMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transmission => "Transmission",
            Self::Fluorescence => "Fluorescence",
        }
    }
}

impl Display for MeasurementMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct SuitabilityVerdict {
    pub mode: MeasurementMode,
    pub value: f64,
    pub suitable: bool,
}

impl SuitabilityVerdict {
    pub fn label(&self) -> &'static str {
        verdict_label(self.suitable)
    }
}

pub fn classify_transmission(mu_t: f64) -> SuitabilityVerdict {
    SuitabilityVerdict {
        mode: MeasurementMode::Transmission,
        value: mu_t,
        suitable: mu_t < TRANSMISSION_MU_T_LIMIT,
    }
}

pub fn classify_fluorescence(r_percent: f64) -> SuitabilityVerdict {
    SuitabilityVerdict {
        mode: MeasurementMode::Fluorescence,
        value: r_percent,
        suitable: r_percent >= FLUORESCENCE_R_PERCENT_MIN,
    }
}

pub fn summarize_suitability(transmission_ok: bool, fluorescence_ok: bool) -> String {
    format!(
        "{} {} / {} {}",
        MeasurementMode::Transmission,
        verdict_label(transmission_ok),
        MeasurementMode::Fluorescence,
        verdict_label(fluorescence_ok)
    )
}

fn verdict_label(suitable: bool) -> &'static str {
    if suitable { "suitable" } else { "not suitable" }
}
