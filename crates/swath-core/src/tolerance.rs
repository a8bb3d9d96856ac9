//! Approximate floating-point comparison for timestamps.
//!
//! Sample times are compared with the same combined absolute/relative
//! tolerance everywhere in the workspace, so that interval boundaries
//! computed on different code paths agree.

/// Relative tolerance applied to the magnitude of the reference value.
pub const RTOL: f64 = 1.0e-5;

/// Absolute tolerance floor.
pub const ATOL: f64 = 1.0e-8;

/// Returns `true` if `a` and `b` are equal within tolerance.
///
/// The test is `|a - b| <= ATOL + RTOL * |b|`, which is asymmetric in
/// `b` for large relative differences. Two infinities of the same sign
/// compare equal; NaN never compares equal to anything.
pub fn isclose(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= ATOL + RTOL * b.abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_values_are_close() {
        assert!(isclose(0.0, 0.0));
        assert!(isclose(1234.5, 1234.5));
        assert!(isclose(f64::INFINITY, f64::INFINITY));
    }

    #[test]
    fn tiny_differences_are_close() {
        assert!(isclose(1.0, 1.0 + 1.0e-9));
        assert!(isclose(1.0e6, 1.0e6 + 1.0));
        assert!(isclose(0.0, 5.0e-9));
    }

    #[test]
    fn distinct_values_are_not_close() {
        assert!(!isclose(1.0, 1.001));
        assert!(!isclose(0.0, 1.0e-6));
        assert!(!isclose(f64::NAN, f64::NAN));
        assert!(!isclose(f64::INFINITY, f64::NEG_INFINITY));
    }

    proptest! {
        #[test]
        fn finite_values_are_close_to_themselves(a in -1.0e12f64..1.0e12) {
            prop_assert!(isclose(a, a));
        }

        #[test]
        fn relative_perturbation_is_close(a in -1.0e9f64..1.0e9) {
            prop_assert!(isclose(a, a * (1.0 + 1.0e-7)));
        }
    }
}
