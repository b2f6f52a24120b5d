//! Planner defaults that a lab may want to override from a JSON file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TARGET_ABSORPTION: f64 = 4.0;
pub const DEFAULT_MAX_SCAN_POINTS: usize = 5000;
pub const DEFAULT_DISPLAY_DECIMALS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlannerConfig {
    pub target_absorption: f64,
    pub max_scan_points: usize,
    pub display_decimals: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            target_absorption: DEFAULT_TARGET_ABSORPTION,
            max_scan_points: DEFAULT_MAX_SCAN_POINTS,
            display_decimals: DEFAULT_DISPLAY_DECIMALS,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !self.target_absorption.is_finite() || self.target_absorption <= 0.0 {
            return Err(format!(
                "targetAbsorption must be finite and > 0, got {}",
                self.target_absorption
            ));
        }
        if self.max_scan_points == 0 {
            return Err("maxScanPoints must be at least 1".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlannerConfigError {
    #[error("failed to read planner config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse planner config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid planner config '{}': {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

pub fn load_planner_config(
    config_path: impl AsRef<Path>,
) -> Result<PlannerConfig, PlannerConfigError> {
    let config_path = config_path.as_ref();
    let source = fs::read_to_string(config_path).map_err(|source| PlannerConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    let config: PlannerConfig =
        serde_json::from_str(&source).map_err(|source| PlannerConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;
    config
        .validate()
        .map_err(|reason| PlannerConfigError::Invalid {
            path: config_path.to_path_buf(),
            reason,
        })?;
    tracing::debug!(path = %config_path.display(), ?config, "loaded planner config");
    Ok(config)
}
