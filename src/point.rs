//! Points and vectors in the plane.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use float_cmp::{ApproxEq, F64Margin};

use crate::float_eq::ApproxEqPath;

/// A point, or a vector from the origin, in user coordinates.
///
/// The same type is used for positions and for directions; which one a value
/// means is clear from context.  Rotations follow the mathematical convention
/// (positive angles turn from the +x axis towards the +y axis).
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// The z component of the 3D cross product; positive if `other` is
    /// counter-clockwise from `self`.
    #[inline]
    pub fn cross(self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Returns a unit vector in the same direction, or the zero vector if
    /// this one has no length.
    pub fn normalize(self) -> Point {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            Point::ZERO
        } else {
            self / len
        }
    }

    /// Rotates by 90 degrees in the positive direction.
    #[inline]
    pub fn rot90(self) -> Point {
        Point::new(-self.y, self.x)
    }

    /// Rotates by 90 degrees in the negative direction.
    #[inline]
    pub fn rot_neg90(self) -> Point {
        Point::new(self.y, -self.x)
    }

    pub fn rotate(self, radians: f64) -> Point {
        let (sin, cos) = radians.sin_cos();
        Point::new(cos * self.x - sin * self.y, sin * self.x + cos * self.y)
    }

    /// Angle of this vector with respect to the +x axis, in (-π, π].
    #[inline]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }

    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    /// Whether both coordinates differ by at most `epsilon`.
    #[inline]
    pub fn near(self, other: Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Point {
        Point::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    #[inline]
    fn from(p: Point) -> (f64, f64) {
        (p.x, p.y)
    }
}

impl ApproxEq for Point {
    type Margin = F64Margin;

    fn approx_eq<M: Into<Self::Margin>>(self, other: Self, margin: M) -> bool {
        let margin = margin.into();
        self.x.approx_eq(other.x, margin) && self.y.approx_eq(other.y, margin)
    }
}

impl ApproxEqPath for Point {
    fn approx_eq_path(self, other: Point) -> bool {
        self.x.approx_eq_path(other.x) && self.y.approx_eq_path(other.y)
    }
}

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, rhs: Point) {
        *self = *self + rhs;
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, rhs: Point) {
        *self = *self - rhs;
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;

    #[inline]
    fn div(self, rhs: f64) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Point {
    type Output = Point;

    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use std::f64::consts::*;

    #[test]
    fn vector_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, -1.0);

        assert_eq!(a + b, Point::new(4.0, 1.0));
        assert_eq!(a - b, Point::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Point::new(2.0, 4.0));
        assert_eq!(-a, Point::new(-1.0, -2.0));
        assert_eq!(a.dot(b), 1.0);
        assert_eq!(a.cross(b), -7.0);
    }

    #[test]
    fn rotations_turn_counter_clockwise() {
        let x = Point::new(1.0, 0.0);
        assert_eq!(x.rot90(), Point::new(0.0, 1.0));
        assert_eq!(x.rot_neg90(), Point::new(0.0, -1.0));
        assert!(x.rotate(FRAC_PI_2).approx_eq_path(Point::new(0.0, 1.0)));
        assert!(x.cross(x.rot90()) > 0.0);
    }

    #[test]
    fn normalize_handles_zero() {
        assert_eq!(Point::ZERO.normalize(), Point::ZERO);
        assert!(approx_eq!(f64, Point::new(3.0, 4.0).normalize().length(), 1.0));
    }

    #[test]
    fn near_uses_absolute_tolerance() {
        let a = Point::new(1.0, 1.0);
        assert!(a.near(Point::new(1.05, 0.95), 0.1));
        assert!(!a.near(Point::new(1.2, 1.0), 0.1));
    }
}
