//! Affine transforms and their application to paths.
//!
//! [`Transform`] is a plain 2×3 matrix.  Applying one to a [`Path`] maps every
//! point; elliptical arcs need more care, since the image of an ellipse under an
//! affine map is another ellipse whose axes do not simply follow the matrix's
//! rotation.  See [`Transform::transform_ellipse`].

use nalgebra::Matrix2;

use crate::angle::Angle;
use crate::path_builder::{Path, PathBuilder, PathCommand};
use crate::pathkit_log;
use crate::point::Point;

/// A 2D transformation matrix.
///
/// A point `(x, y)` maps to `(xx * x + xy * y + x0, yx * x + yy * y + y0)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub xx: f64,
    pub yx: f64,
    pub xy: f64,
    pub yy: f64,
    pub x0: f64,
    pub y0: f64,
}

impl Transform {
    #[inline]
    pub fn new_unchecked(xx: f64, yx: f64, xy: f64, yy: f64, x0: f64, y0: f64) -> Self {
        Self {
            xx,
            yx,
            xy,
            yy,
            x0,
            y0,
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new_unchecked(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    #[inline]
    pub fn new_translate(tx: f64, ty: f64) -> Self {
        Self::new_unchecked(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[inline]
    pub fn new_scale(sx: f64, sy: f64) -> Self {
        Self::new_unchecked(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation about the origin; positive angles turn the +x axis towards +y.
    #[inline]
    pub fn new_rotate(a: Angle) -> Self {
        let (s, c) = a.radians().sin_cos();
        Self::new_unchecked(c, s, -s, c, 0.0, 0.0)
    }

    #[inline]
    pub fn new_skew(ax: Angle, ay: Angle) -> Self {
        Self::new_unchecked(1.0, ay.radians().tan(), ax.radians().tan(), 1.0, 0.0, 0.0)
    }

    /// The transform that applies `t1` first and then `t2`.
    #[must_use]
    pub fn multiply(t1: &Transform, t2: &Transform) -> Self {
        #[allow(clippy::suspicious_operation_groupings)]
        Transform {
            xx: t1.xx * t2.xx + t1.yx * t2.xy,
            yx: t1.xx * t2.yx + t1.yx * t2.yy,
            xy: t1.xy * t2.xx + t1.yy * t2.xy,
            yy: t1.xy * t2.yx + t1.yy * t2.yy,
            x0: t1.x0 * t2.xx + t1.y0 * t2.xy + t2.x0,
            y0: t1.x0 * t2.yx + t1.y0 * t2.yy + t2.y0,
        }
    }

    /// Applies `t` before this transform.
    #[inline]
    pub fn pre_transform(&self, t: &Transform) -> Self {
        Self::multiply(t, self)
    }

    /// Applies `t` after this transform.
    #[inline]
    pub fn post_transform(&self, t: &Transform) -> Self {
        Self::multiply(self, t)
    }

    #[inline]
    pub fn pre_translate(&self, x: f64, y: f64) -> Self {
        self.pre_transform(&Transform::new_translate(x, y))
    }

    #[inline]
    pub fn pre_scale(&self, sx: f64, sy: f64) -> Self {
        self.pre_transform(&Transform::new_scale(sx, sy))
    }

    #[inline]
    pub fn pre_rotate(&self, angle: Angle) -> Self {
        self.pre_transform(&Transform::new_rotate(angle))
    }

    #[inline]
    pub fn post_translate(&self, x: f64, y: f64) -> Self {
        self.post_transform(&Transform::new_translate(x, y))
    }

    #[inline]
    pub fn post_scale(&self, sx: f64, sy: f64) -> Self {
        self.post_transform(&Transform::new_scale(sx, sy))
    }

    #[inline]
    pub fn post_rotate(&self, angle: Angle) -> Self {
        self.post_transform(&Transform::new_rotate(angle))
    }

    /// Determinant of the linear part; negative for transforms that mirror.
    #[inline]
    pub fn determinant(&self) -> f64 {
        self.xx * self.yy - self.xy * self.yx
    }

    #[inline]
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();

        det != 0.0 && det.is_finite()
    }

    #[must_use]
    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();

        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let inv_det = 1.0 / det;

        Some(Transform::new_unchecked(
            inv_det * self.yy,
            inv_det * (-self.yx),
            inv_det * (-self.xy),
            inv_det * self.xx,
            inv_det * (self.xy * self.y0 - self.yy * self.x0),
            inv_det * (self.yx * self.x0 - self.xx * self.y0),
        ))
    }

    /// Maps a vector; the translation is not applied.
    #[inline]
    pub fn transform_distance(&self, d: Point) -> Point {
        Point::new(d.x * self.xx + d.y * self.xy, d.x * self.yx + d.y * self.yy)
    }

    #[inline]
    pub fn transform_point(&self, p: Point) -> Point {
        self.transform_distance(p) + Point::new(self.x0, self.y0)
    }

    /// Radii and x-axis rotation (in degrees) of the image of an ellipse.
    ///
    /// The ellipse is given by its radii and the rotation of its x axis in
    /// degrees.  The image of the unit circle under `A = L·R(φ)·diag(rx, ry)`,
    /// with `L` the linear part of this transform, has the conic matrix `A·Aᵀ`;
    /// its eigenvalues are the squared radii of the image and the eigenvector of
    /// the larger one gives the new x axis.  The result has `rx >= ry` and a
    /// rotation in `[0, 180)`.  A singular transform yields `ry == 0`.
    pub fn transform_ellipse(&self, rx: f64, ry: f64, x_axis_rotation: f64) -> (f64, f64, f64) {
        let (sin_phi, cos_phi) = x_axis_rotation.to_radians().sin_cos();

        let linear = Matrix2::new(self.xx, self.xy, self.yx, self.yy);
        let ellipse = Matrix2::new(cos_phi * rx, -sin_phi * ry, sin_phi * rx, cos_phi * ry);
        let a = linear * ellipse;

        let eigen = (a * a.transpose()).symmetric_eigen();
        let (major, minor) = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] {
            (0, 1)
        } else {
            (1, 0)
        };

        let new_rx = eigen.eigenvalues[major].max(0.0).sqrt();
        let new_ry = eigen.eigenvalues[minor].max(0.0).sqrt();

        let axis = eigen.eigenvectors.column(major);
        let phi = axis[1].atan2(axis[0]).to_degrees().rem_euclid(180.0);

        (new_rx, new_ry, phi)
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Transform {
        Transform::identity()
    }
}

impl Path {
    /// Applies an affine transform to every point of the path.
    ///
    /// Arcs get new radii and rotation from [`Transform::transform_ellipse`], and
    /// a mirroring transform reverses their sweep.  Under a singular transform an
    /// arc degenerates into a line.
    pub fn transform(&self, t: &Transform) -> Path {
        let mirrors = t.determinant() < 0.0;
        let singular = !t.is_invertible();

        let mut builder = PathBuilder::default();

        for cmd in self.iter() {
            match cmd {
                PathCommand::MoveTo(p) => {
                    let p = t.transform_point(p);
                    builder.move_to(p.x, p.y);
                }

                PathCommand::LineTo(p) => {
                    let p = t.transform_point(p);
                    builder.line_to(p.x, p.y);
                }

                PathCommand::QuadTo(q) => {
                    let c = t.transform_point(q.pt1);
                    let p = t.transform_point(q.to);
                    builder.quad_to(c.x, c.y, p.x, p.y);
                }

                PathCommand::CurveTo(c) => {
                    let c1 = t.transform_point(c.pt1);
                    let c2 = t.transform_point(c.pt2);
                    let p = t.transform_point(c.to);
                    builder.curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
                }

                PathCommand::Arc(a) => {
                    if singular {
                        pathkit_log!("arc flattened to a line by a singular transform");
                    }

                    let (rx, ry, phi) = t.transform_ellipse(a.r.0, a.r.1, a.x_axis_rotation);
                    let sweep = if mirrors { a.sweep.flip() } else { a.sweep };
                    let p = t.transform_point(a.to);
                    builder.arc_to(rx, ry, phi, a.large_arc, sweep, p.x, p.y);
                }

                PathCommand::ClosePath => {
                    builder.close_path();
                }
            }
        }

        builder.into_path()
    }

    /// Shorthand for a translation.
    pub fn translate(&self, x: f64, y: f64) -> Path {
        self.transform(&Transform::new_translate(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::ApproxEq;

    fn assert_transform_eq(t1: &Transform, t2: &Transform) {
        let epsilon = 8.0 * f64::EPSILON; // kind of arbitrary, but allow for some sloppiness

        assert!(t1.xx.approx_eq(t2.xx, (epsilon, 1)));
        assert!(t1.yx.approx_eq(t2.yx, (epsilon, 1)));
        assert!(t1.xy.approx_eq(t2.xy, (epsilon, 1)));
        assert!(t1.yy.approx_eq(t2.yy, (epsilon, 1)));
        assert!(t1.x0.approx_eq(t2.x0, (epsilon, 1)));
        assert!(t1.y0.approx_eq(t2.y0, (epsilon, 1)));
    }

    fn transformed(s: &str, t: Transform) -> String {
        Path::parse(s).unwrap().transform(&t).to_string()
    }

    #[test]
    fn test_multiply() {
        let t1 = Transform::identity();
        let t2 = Transform::new_unchecked(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert_transform_eq(&Transform::multiply(&t1, &t2), &t2);
        assert_transform_eq(&Transform::multiply(&t2, &t1), &t2);

        let t1 = Transform::new_unchecked(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let t2 = Transform::new_unchecked(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        let r = Transform::new_unchecked(0.0, 0.0, 0.0, 0.0, 5.0, 6.0);
        assert_transform_eq(&Transform::multiply(&t1, &t2), &t2);
        assert_transform_eq(&Transform::multiply(&t2, &t1), &r);

        let t1 = Transform::new_unchecked(0.5, 0.0, 0.0, 0.5, 10.0, 10.0);
        let t2 = Transform::new_unchecked(1.0, 0.0, 0.0, 1.0, -10.0, -10.0);
        let r1 = Transform::new_unchecked(0.5, 0.0, 0.0, 0.5, 0.0, 0.0);
        let r2 = Transform::new_unchecked(0.5, 0.0, 0.0, 0.5, 5.0, 5.0);
        assert_transform_eq(&Transform::multiply(&t1, &t2), &r1);
        assert_transform_eq(&Transform::multiply(&t2, &t1), &r2);
    }

    #[test]
    fn test_invert() {
        let t = Transform::new_unchecked(2.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(!t.is_invertible());
        assert!(t.invert().is_none());

        let t = Transform::identity();
        assert!(t.is_invertible());
        let i = t.invert().unwrap();
        assert_transform_eq(&i, &Transform::identity());

        let t = Transform::new_unchecked(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        assert!(t.is_invertible());
        let i = t.invert().unwrap();
        assert_transform_eq(&t.pre_transform(&i), &Transform::identity());
        assert_transform_eq(&t.post_transform(&i), &Transform::identity());
    }

    #[test]
    fn test_transform_point() {
        let t = Transform::new_translate(10.0, 10.0);
        assert_eq!(Point::new(11.0, 11.0), t.transform_point(Point::new(1.0, 1.0)));
    }

    #[test]
    fn skew_shears_along_x() {
        let t = Transform::new_skew(Angle::from_degrees(45.0), Angle::new(0.0));
        let p = t.transform_point(Point::new(0.0, 2.0));
        assert!(p.near(Point::new(2.0, 2.0), 1e-12));

        let moved_first = t.pre_translate(0.0, 1.0).transform_point(Point::new(0.0, 1.0));
        assert!(moved_first.near(Point::new(2.0, 2.0), 1e-12));
    }

    #[test]
    fn test_transform_distance() {
        let t = Transform::new_translate(10.0, 10.0).pre_scale(2.0, 1.0);
        assert_eq!(Point::new(2.0, 1.0), t.transform_distance(Point::new(1.0, 1.0)));
    }

    #[test]
    fn ellipse_under_rotation_keeps_radii() {
        let t = Transform::new_rotate(Angle::from_degrees(30.0));
        let (rx, ry, phi) = t.transform_ellipse(10.0, 5.0, 20.0);
        assert!((rx - 10.0).abs() < 1e-9);
        assert!((ry - 5.0).abs() < 1e-9);
        assert!((phi - 50.0).abs() < 1e-9);
    }

    #[test]
    fn ellipse_under_singular_transform_is_flat() {
        let t = Transform::new_scale(1.0, 0.0);
        let (rx, ry, phi) = t.transform_ellipse(10.0, 10.0, 0.0);
        assert!((rx - 10.0).abs() < 1e-9);
        assert!(ry.abs() < 1e-9);
        assert!(phi.abs() < 1e-9 || (phi - 180.0).abs() < 1e-9);
    }

    #[test]
    fn transforms_lines_and_curves() {
        assert_eq!(
            transformed(
                "M0 0L10 0Q15 10 20 0C23 10 27 10 30 0z",
                Transform::new_translate(0.0, 100.0)
            ),
            "M0 100L10 100Q15 110 20 100C23 110 27 110 30 100z"
        );
    }

    #[test]
    fn transforms_arcs() {
        assert_eq!(
            transformed("A10 10 0 0 0 20 0", Transform::new_translate(0.0, 10.0)),
            "M0 10A10 10 0 0 0 20 10"
        );

        // mirroring reverses the sweep
        assert_eq!(
            transformed("A10 10 0 0 0 20 0", Transform::new_scale(1.0, -1.0)),
            "A10 10 0 0 1 20 0"
        );

        assert_eq!(
            transformed(
                "A10 5 0 0 0 20 0",
                Transform::new_rotate(Angle::from_degrees(270.0))
            ),
            "A10 5 90 0 0 0 -20"
        );

        let t = Transform::identity()
            .pre_rotate(Angle::from_degrees(120.0))
            .pre_scale(1.0, -2.0);
        assert_eq!(
            transformed("A10 10 0 0 0 20 0", t),
            "A20 10 30 0 1 -10 17.320508"
        );
    }

    #[test]
    fn singular_transform_turns_arcs_into_lines() {
        assert_eq!(
            transformed("A10 10 0 0 0 20 0", Transform::new_scale(1.0, 0.0)),
            "L20 0"
        );
    }
}
