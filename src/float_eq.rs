//! Utilities to compare floating-point numbers.

use float_cmp::ApproxEq;

use crate::tolerance::DEFAULT_EPSILON;

/// Checks whether two floating-point numbers are approximately equal,
/// within the absolute tolerance used for path geometry.
///
/// Two numbers are "close enough to equal" if their absolute difference is
/// smaller than [`DEFAULT_EPSILON`].  For very large values, where that
/// epsilon is smaller than the spacing between adjacent doubles, we also
/// allow a difference of 1 unit-in-the-last-place (ULP).
///
/// This is implemented for `f64` and for [`crate::Point`], which compares
/// both coordinates.
pub trait ApproxEqPath: ApproxEq {
    fn approx_eq_path(self, other: Self) -> bool;
}

impl ApproxEqPath for f64 {
    fn approx_eq_path(self, other: f64) -> bool {
        self.approx_eq(other, (DEFAULT_EPSILON, 1))
    }
}

// Macro for usage in unit tests
#[doc(hidden)]
#[macro_export]
macro_rules! assert_approx_eq_path {
    ($left:expr, $right:expr) => {{
        match ($left, $right) {
            (l, r) => {
                if !l.approx_eq_path(r) {
                    panic!(
                        r#"assertion failed: `(left == right)`
  left: `{:?}`,
 right: `{:?}`"#,
                        l, r
                    )
                }
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_approx_equal() {
        assert!(!0.0_f64.approx_eq_path(1e-9_f64));
        assert!(!1.0_f64.approx_eq_path(1.000000001_f64));

        assert!(0.0_f64.approx_eq_path(1e-11_f64));
        assert!(0.0_f64.approx_eq_path(-1e-11_f64));
        assert!(1.0_f64.approx_eq_path(1.00000000001_f64));

        // 2^53 and the next double are 1 ULP apart; 2^53 + 4 is 2 ULPs away.
        assert!(9_007_199_254_740_992.0.approx_eq_path(9_007_199_254_740_994.0));
        assert!(!9_007_199_254_740_992.0.approx_eq_path(9_007_199_254_740_996.0));
    }

    #[test]
    fn assert_approx_eq_path_should_not_panic() {
        assert_approx_eq_path!(42_f64, 42_f64);
    }

    #[test]
    #[should_panic]
    fn assert_approx_eq_path_should_panic() {
        assert_approx_eq_path!(3_f64, 42_f64);
    }
}
