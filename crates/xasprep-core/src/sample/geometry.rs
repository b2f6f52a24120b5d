//! Pellet geometry helpers for callers that know the die size rather than the area.

use std::f64::consts::PI;

/// Face area in cm² of a round pellet pressed in a die of `diameter_mm`.
pub fn pellet_area_cm2(diameter_mm: f64) -> Option<f64> {
    if !diameter_mm.is_finite() || diameter_mm <= 0.0 {
        return None;
    }
    let radius_cm = diameter_mm / 20.0;
    Some(PI * radius_cm * radius_cm)
}

/// Areal mass density in g/cm² of `mass_mg` spread over `area_cm2`.
pub fn areal_density_g_cm2(mass_mg: f64, area_cm2: f64) -> Option<f64> {
    if !mass_mg.is_finite() || !area_cm2.is_finite() || mass_mg < 0.0 || area_cm2 <= 0.0 {
        return None;
    }
    Some(mass_mg / 1000.0 / area_cm2)
}
