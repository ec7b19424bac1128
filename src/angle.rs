//! Angles normalized to a full turn.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use float_cmp::approx_eq;

use crate::point::Point;

/// An angle in radians, always in `[0, 2π)`.
///
/// Angles grow from the +x axis towards the +y axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Angle(f64);

impl Angle {
    pub fn new(rad: f64) -> Angle {
        Angle(Angle::normalize(rad))
    }

    pub fn from_degrees(deg: f64) -> Angle {
        Angle::new(deg.to_radians())
    }

    /// Direction of the vector `(vx, vy)`; zero for the null vector.
    pub fn from_vector(vx: f64, vy: f64) -> Angle {
        let rad = vy.atan2(vx);

        if rad.is_nan() {
            Angle(0.0)
        } else {
            Angle::new(rad)
        }
    }

    pub fn from_direction(v: Point) -> Angle {
        Angle::from_vector(v.x, v.y)
    }

    pub fn radians(self) -> f64 {
        self.0
    }

    pub fn degrees(self) -> f64 {
        self.0.to_degrees()
    }

    /// The angle halfway between `self` and `other`, going the shorter way around.
    ///
    /// This is the direction of a path at a vertex where it arrives going in the
    /// direction `self` and leaves going in the direction `other`.
    pub fn bisect(self, other: Angle) -> Angle {
        let half_delta = (other.0 - self.0) * 0.5;

        if half_delta.abs() > FRAC_PI_2 {
            Angle::new(self.0 + half_delta - PI)
        } else {
            Angle::new(self.0 + half_delta)
        }
    }

    /// The opposite direction.
    pub fn flip(self) -> Angle {
        Angle::new(self.0 + PI)
    }

    fn normalize(rad: f64) -> f64 {
        let res = rad.rem_euclid(TAU);

        // rem_euclid can round up to a full turn for tiny negative angles
        if approx_eq!(f64, res, 0.0) || approx_eq!(f64, res, TAU) {
            0.0
        } else {
            res
        }
    }
}
