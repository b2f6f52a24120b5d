//! Energy-scan range checks run before any grid is built.

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ScanRangeError {
    #[error("Range values must be finite")]
    NonFinite,
    #[error("End must be greater than start")]
    EndNotAfterStart,
    #[error("Step must be greater than zero")]
    NonPositiveStep,
    #[error("Too many points ({point_count}); maximum is {max_points}")]
    TooManyPoints {
        point_count: usize,
        max_points: usize,
    },
}

impl ScanRangeError {
    /// Point count the rejected range would have produced, when it is known.
    pub fn point_count(&self) -> Option<usize> {
        match self {
            Self::TooManyPoints { point_count, .. } => Some(*point_count),
            _ => None,
        }
    }
}

// Absorbs rounding in (end - start) / step so an exact multiple keeps its endpoint.
const STEP_ROUNDING_SLACK: f64 = 1e-9;

/// Number of grid points in `[start, end]` at `step`, endpoints included.
pub fn validate_scan_range(
    start: f64,
    end: f64,
    step: f64,
    max_points: usize,
) -> Result<usize, ScanRangeError> {
    if !start.is_finite() || !end.is_finite() || !step.is_finite() {
        return Err(ScanRangeError::NonFinite);
    }
    if end <= start {
        return Err(ScanRangeError::EndNotAfterStart);
    }
    if step <= 0.0 {
        return Err(ScanRangeError::NonPositiveStep);
    }

    let intervals = ((end - start) / step + STEP_ROUNDING_SLACK).floor();
    if intervals >= usize::MAX as f64 {
        return Err(ScanRangeError::TooManyPoints {
            point_count: usize::MAX,
            max_points,
        });
    }
    let point_count = intervals as usize + 1;
    if point_count > max_points {
        return Err(ScanRangeError::TooManyPoints {
            point_count,
            max_points,
        });
    }
    Ok(point_count)
}

#[cfg(test)]
mod tests {
    use super::{ScanRangeError, validate_scan_range};

    #[test]
    fn counts_points_including_both_ends() {
        assert_eq!(validate_scan_range(8900.0, 9100.0, 0.5, 5000), Ok(401));
        assert_eq!(validate_scan_range(0.0, 1.0, 0.1, 100), Ok(11));
        assert_eq!(validate_scan_range(0.0, 1.0, 0.3, 100), Ok(4));
    }

    #[test]
    fn reports_errors_in_check_order() {
        assert_eq!(
            validate_scan_range(10.0, 5.0, -1.0, 100),
            Err(ScanRangeError::EndNotAfterStart)
        );
        assert_eq!(
            validate_scan_range(10.0, 10.0, 1.0, 100),
            Err(ScanRangeError::EndNotAfterStart)
        );
        assert_eq!(
            validate_scan_range(5.0, 10.0, 0.0, 100),
            Err(ScanRangeError::NonPositiveStep)
        );
        assert_eq!(
            validate_scan_range(f64::NAN, 10.0, 1.0, 100),
            Err(ScanRangeError::NonFinite)
        );
    }

    #[test]
    fn dense_range_message_includes_point_count() {
        let error = validate_scan_range(0.0, 1000.0, 0.1, 5000).expect_err("too dense");
        assert_eq!(error.point_count(), Some(10001));
        assert_eq!(error.to_string(), "Too many points (10001); maximum is 5000");
    }

    #[test]
    fn error_messages_match_form_labels() {
        assert_eq!(
            ScanRangeError::EndNotAfterStart.to_string(),
            "End must be greater than start"
        );
        assert_eq!(
            ScanRangeError::NonPositiveStep.to_string(),
            "Step must be greater than zero"
        );
    }
}
