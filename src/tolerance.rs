//! Numeric tolerances for geometric algorithms.
//!
//! Nothing in this crate consults global state to decide how close two numbers
//! must be to count as equal, or how finely to flatten a curve.  Operations that
//! care take a [`Tolerance`]; the short-named variants use
//! [`Tolerance::default()`].

/// Coordinate equality tolerance used when detecting degenerate geometry.
pub const DEFAULT_EPSILON: f64 = 1e-10;

/// Maximum deviation allowed when curves are flattened or offset.
pub const DEFAULT_FLATNESS: f64 = 0.01;

/// Tolerances for comparisons and curve approximation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerance {
    /// Two coordinates closer than this are considered equal.
    pub epsilon: f64,

    /// Maximum distance between a curve and its polyline or offset approximation.
    pub flatness: f64,
}

impl Tolerance {
    /// Creates a tolerance.
    ///
    /// # Panics
    ///
    /// Panics if either value is not strictly positive and finite.
    pub fn new(epsilon: f64, flatness: f64) -> Tolerance {
        assert!(
            epsilon.is_finite() && epsilon > 0.0,
            "epsilon must be positive, got {epsilon}"
        );
        assert!(
            flatness.is_finite() && flatness > 0.0,
            "flatness must be positive, got {flatness}"
        );

        Tolerance { epsilon, flatness }
    }
}

impl Default for Tolerance {
    fn default() -> Tolerance {
        Tolerance {
            epsilon: DEFAULT_EPSILON,
            flatness: DEFAULT_FLATNESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let t = Tolerance::default();
        assert_eq!(t.epsilon, 1e-10);
        assert_eq!(t.flatness, 0.01);
    }

    #[test]
    #[should_panic]
    fn rejects_zero_flatness() {
        let _ = Tolerance::new(1e-10, 0.0);
    }
}
