pub mod errors;

pub use errors::{XasPrepError, XasPrepErrorCategory};

use crate::gas::GasMixError;
use crate::range::ScanRangeError;

impl From<GasMixError> for XasPrepError {
    fn from(error: GasMixError) -> Self {
        let code = match error {
            GasMixError::EmptyMixture => "INPUT.GAS_EMPTY",
            GasMixError::BlankName { .. } | GasMixError::DuplicateName { .. } => "INPUT.GAS_NAME",
            GasMixError::FractionOutOfRange { .. } => "INPUT.GAS_FRACTION",
            GasMixError::UnbalancedSum { .. } => "INPUT.GAS_SUM",
            GasMixError::IndexOutOfRange { .. } => "INPUT.GAS_INDEX",
            GasMixError::LastComponent | GasMixError::SoleComponent { .. } => {
                "INPUT.GAS_SOLE_COMPONENT"
            }
            GasMixError::DegenerateFractions => "RUN.GAS_DEGENERATE",
        };
        if matches!(error, GasMixError::DegenerateFractions) {
            Self::computation(code, error.to_string())
        } else {
            Self::input_validation(code, error.to_string())
        }
    }
}

impl From<ScanRangeError> for XasPrepError {
    fn from(error: ScanRangeError) -> Self {
        Self::input_validation("INPUT.SCAN_RANGE", error.to_string())
    }
}
