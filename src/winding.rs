//! Orientation, winding numbers and fill rules.
//!
//! Curves are flattened to polygons first, using the `flatness` of a
//! [`Tolerance`].  Every subpath counts as closed for these computations, the
//! same way a renderer closes open subpaths when filling them.

use crate::path_builder::{Path, SubPath};
use crate::point::Point;
use crate::tolerance::Tolerance;

/// Rule to decide which points are inside a path from their winding number.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// Inside where the winding number is not zero.
    #[default]
    NonZero,
    /// Inside where the winding number is odd.
    EvenOdd,
}

impl FillRule {
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::NonZero => winding != 0,
            FillRule::EvenOdd => winding % 2 != 0,
        }
    }
}

/// A subpath flattened to the vertices of a closed polygon.
struct Polygon(Vec<Point>);

impl Polygon {
    fn new(subpath: &SubPath<'_>, flatness: f64) -> Polygon {
        let mut points = vec![subpath.origin()];
        for segment in subpath.segments() {
            segment.flatten(flatness, &mut points);
        }
        Polygon(points)
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.0.len();
        (0..n).map(move |i| (self.0[i], self.0[(i + 1) % n]))
    }

    /// Twice the signed area; positive for counter-clockwise polygons.
    fn signed_area2(&self) -> f64 {
        self.edges().map(|(a, b)| a.cross(b)).sum()
    }

    /// Winding number of the polygon around `p`.
    fn winding(&self, p: Point) -> i32 {
        self.edges()
            .map(|(a, b)| {
                let side = (b - a).cross(p - a);

                if a.y <= p.y && b.y > p.y && side > 0.0 {
                    1
                } else if b.y <= p.y && a.y > p.y && side < 0.0 {
                    -1
                } else {
                    0
                }
            })
            .sum()
    }

    /// Distance along the ray from `origin` in direction `dir` (a unit vector)
    /// to the first edge it meets, if any.
    fn ray_hit(&self, origin: Point, dir: Point, min_distance: f64) -> Option<f64> {
        self.edges()
            .filter_map(|(a, b)| {
                let e = b - a;
                let denom = dir.cross(e);
                if denom == 0.0 {
                    return None;
                }

                let w = a - origin;
                let s = w.cross(e) / denom;
                let u = w.cross(dir) / denom;

                if s > min_distance && (0.0..=1.0).contains(&u) {
                    Some(s)
                } else {
                    None
                }
            })
            .reduce(f64::min)
    }

    /// A point just inside the polygon, next to the middle of its first edge.
    ///
    /// The point is stepped away from the edge towards the polygon's interior,
    /// half way to the next boundary of any of `all` polygons.
    fn inner_point(&self, all: &[Polygon], epsilon: f64) -> Option<Point> {
        let (a, b) = self.edges().find(|(a, b)| !a.near(*b, epsilon))?;

        let dir = (b - a).normalize();
        let inward = if self.signed_area2() >= 0.0 {
            dir.rot90()
        } else {
            dir.rot_neg90()
        };

        let mid = a.midpoint(b);
        let hit = all
            .iter()
            .filter_map(|poly| poly.ray_hit(mid, inward, epsilon))
            .reduce(f64::min)
            .unwrap_or_else(|| a.distance(b));

        Some(mid + inward * (hit / 2.0))
    }
}

impl Path {
    fn polygons(&self, flatness: f64) -> Vec<(Polygon, bool)> {
        self.iter_subpath()
            .map(|sp| (Polygon::new(&sp, flatness), sp.has_drawing()))
            .collect()
    }

    /// Whether the first subpath runs counter-clockwise, using the default
    /// tolerance.
    pub fn ccw(&self) -> bool {
        self.ccw_with_tolerance(&Tolerance::default())
    }

    /// Whether the first subpath runs counter-clockwise, that is, whether its
    /// signed area is not negative.  A path without subpaths counts as
    /// counter-clockwise.
    pub fn ccw_with_tolerance(&self, tolerance: &Tolerance) -> bool {
        match self.iter_subpath().next() {
            Some(subpath) => Polygon::new(&subpath, tolerance.flatness).signed_area2() >= 0.0,
            None => true,
        }
    }

    /// The winding number of the path around a point.
    pub fn winding(&self, x: f64, y: f64) -> i32 {
        self.winding_with_tolerance(x, y, &Tolerance::default())
    }

    pub fn winding_with_tolerance(&self, x: f64, y: f64, tolerance: &Tolerance) -> i32 {
        let p = Point::new(x, y);

        self.polygons(tolerance.flatness)
            .iter()
            .map(|(poly, _)| poly.winding(p))
            .sum()
    }

    /// Whether a point is inside the path under the given fill rule.
    pub fn interior(&self, x: f64, y: f64, fill_rule: FillRule) -> bool {
        self.interior_with_tolerance(x, y, fill_rule, &Tolerance::default())
    }

    pub fn interior_with_tolerance(
        &self,
        x: f64,
        y: f64,
        fill_rule: FillRule,
        tolerance: &Tolerance,
    ) -> bool {
        fill_rule.is_inside(self.winding_with_tolerance(x, y, tolerance))
    }

    /// For each subpath that draws something, whether the area it encloses is
    /// filled when the whole path is filled with `fill_rule`.
    pub fn filling(&self, fill_rule: FillRule) -> Vec<bool> {
        self.filling_with_tolerance(fill_rule, &Tolerance::default())
    }

    /// Like [`Path::filling`].
    ///
    /// Each subpath is tested at a point just inside its first edge, against the
    /// winding number of the whole path.
    pub fn filling_with_tolerance(&self, fill_rule: FillRule, tolerance: &Tolerance) -> Vec<bool> {
        let polygons = self.polygons(tolerance.flatness);
        let all: Vec<Polygon> = polygons.iter().map(|(p, _)| Polygon(p.0.clone())).collect();

        polygons
            .iter()
            .filter(|(_, drawing)| *drawing)
            .map(|(poly, _)| match poly.inner_point(&all, tolerance.epsilon) {
                Some(p) => {
                    let winding: i32 = all.iter().map(|other| other.winding(p)).sum();
                    fill_rule.is_inside(winding)
                }
                None => false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    const SAME_ORIENTATION: &str = "L10 0L10 10L0 10zM2 2L8 2L8 8L2 8z";
    const OPPOSITE_ORIENTATION: &str = "L10 0L10 10L0 10zM2 2L2 8L8 8L8 2z";

    #[test]
    fn orientation() {
        assert!(path("L10 0L10 10z").ccw());
        assert!(!path("L10 0L10 -10z").ccw());
        assert!(path("L10 0").ccw());
        assert!(path("M10 0").ccw());
        assert!(Path::default().ccw());

        // a counter-clockwise circle, then a clockwise one
        assert!(path("M10 0A10 10 0 0 1 -10 0A10 10 0 0 1 10 0z").ccw());
        assert!(!path("M10 0A10 10 0 0 0 -10 0A10 10 0 0 0 10 0z").ccw());
    }

    #[test]
    fn winding_numbers() {
        let p = path(SAME_ORIENTATION);
        assert_eq!(p.winding(1.0, 1.0), 1);
        assert_eq!(p.winding(5.0, 5.0), 2);
        assert_eq!(p.winding(20.0, 5.0), 0);

        let p = path(OPPOSITE_ORIENTATION);
        assert_eq!(p.winding(5.0, 5.0), 0);
    }

    #[test]
    fn filling_nonzero() {
        assert!(path("M0 0").filling(FillRule::NonZero).is_empty());

        assert_eq!(
            path(SAME_ORIENTATION).filling(FillRule::NonZero),
            vec![true, true]
        );
        assert_eq!(
            path(OPPOSITE_ORIENTATION).filling(FillRule::NonZero),
            vec![true, false]
        );
    }

    #[test]
    fn filling_even_odd() {
        assert_eq!(
            path(SAME_ORIENTATION).filling(FillRule::EvenOdd),
            vec![true, false]
        );
        assert_eq!(
            path(OPPOSITE_ORIENTATION).filling(FillRule::EvenOdd),
            vec![true, false]
        );
    }

    #[test]
    fn filling_skips_subpaths_without_drawing() {
        assert_eq!(
            path("M50 50zL10 0L10 10L0 10z").filling(FillRule::NonZero),
            vec![true]
        );
    }

    #[test]
    fn interior_points() {
        assert!(path(SAME_ORIENTATION).interior(1.0, 1.0, FillRule::NonZero));
        assert!(path(SAME_ORIENTATION).interior(3.0, 3.0, FillRule::NonZero));
        assert!(path(OPPOSITE_ORIENTATION).interior(1.0, 1.0, FillRule::NonZero));
        assert!(!path(OPPOSITE_ORIENTATION).interior(3.0, 3.0, FillRule::NonZero));

        assert!(path(SAME_ORIENTATION).interior(1.0, 1.0, FillRule::EvenOdd));
        assert!(!path(SAME_ORIENTATION).interior(3.0, 3.0, FillRule::EvenOdd));
        assert!(path(OPPOSITE_ORIENTATION).interior(1.0, 1.0, FillRule::EvenOdd));
        assert!(!path(OPPOSITE_ORIENTATION).interior(3.0, 3.0, FillRule::EvenOdd));
    }

    #[test]
    fn open_subpaths_fill_as_if_closed() {
        assert!(path("L10 0L10 10L0 10").interior(5.0, 5.0, FillRule::NonZero));
    }

    #[test]
    fn curved_boundaries() {
        let circle = path("M10 0A10 10 0 0 1 -10 0A10 10 0 0 1 10 0z");
        assert!(circle.interior(0.0, 9.9, FillRule::NonZero));
        assert!(!circle.interior(7.5, 7.5, FillRule::NonZero));
    }
}
