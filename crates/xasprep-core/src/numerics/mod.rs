//! Small floating-point helpers shared by the solvers and the gas balancer.

fn kahan_add(sum: &mut f64, correction: &mut f64, value: f64) {
    let corrected = value - *correction;
    let next = *sum + corrected;
    *correction = (next - *sum) - corrected;
    *sum = next;
}

/// Compensated sum; fraction totals stay within tolerance after repeated rescaling.
pub fn stable_sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut sum = 0.0;
    let mut correction = 0.0;

    for value in values {
        kahan_add(&mut sum, &mut correction, value);
    }

    sum
}

pub fn approx_eq(lhs: f64, rhs: f64, abs_tol: f64) -> bool {
    (lhs - rhs).abs() <= abs_tol
}

pub fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{all_finite, approx_eq, stable_sum};

    #[test]
    fn stable_sum_recovers_tenths() {
        let total = stable_sum(std::iter::repeat_n(0.1, 10));
        assert!(approx_eq(total, 1.0, 1e-15));
    }

    #[test]
    fn stable_sum_of_nothing_is_zero() {
        assert_eq!(stable_sum(std::iter::empty()), 0.0);
    }

    #[test]
    fn finiteness_check_rejects_nan_and_infinity() {
        assert!(all_finite(&[1.0, -2.0, 0.0]));
        assert!(!all_finite(&[1.0, f64::NAN]));
        assert!(!all_finite(&[f64::INFINITY]));
    }
}
