//! Measuring paths: length, bounds, and cutting paths by distance.

use std::cmp::Ordering;
use std::f64::consts::PI;
use std::mem;

use crate::path_builder::{Path, PathBuilder, PathCommand, SubPath};
use crate::pathkit_log;
use crate::point::Point;
use crate::polynomial::{
    eval_polynomial, fit_antiderivative, fit_cubic, gauss_legendre5_nodes, Chebyshev,
};
use crate::rect::Rect;
use crate::segment::Segment;
use crate::tolerance::DEFAULT_EPSILON;

/// Below this ratio of slowest to fastest speed, a cubic fit of the inverse
/// length function is not good enough.
const UNIFORM_SPEED_RATIO: f64 = 0.95;

/// Degree of the series for the inverse speed of each stretch.
const CHEBYSHEV_DEGREE: usize = 10;

/// Number of stretches, equal in the segment parameter, that get their own
/// series.
const STRETCHES: usize = 4;

/// Samples per stretch are taken at this many Chebyshev-Lobatto intervals.
const STRETCH_SAMPLES: usize = 32;

/// Weight of the sampled lengths against the sampled speeds in a fit.
const VALUE_WEIGHT: f64 = 4.0;

#[derive(Debug, Clone)]
enum Inverse {
    /// Length is proportional to `t`.
    Linear,
    /// `t` as a cubic polynomial of the normalized length.
    Polynomial([f64; 4]),
    /// `t` piecewise, each piece the integral of a Chebyshev series of the
    /// inverse speed.
    Chebyshev(Vec<Stretch>),
}

/// The part of a segment between two parameters, with the lengths from the
/// segment start to either end.
#[derive(Debug, Clone)]
struct Stretch {
    s0: f64,
    s1: f64,
    t0: f64,
    t1: f64,
    /// Fraction of the parameter range by fraction of the length.
    tau: Chebyshev,
}

impl Stretch {
    fn fit(segment: &Segment, (s0, s1): (f64, f64), (t0, t1): (f64, f64)) -> Stretch {
        let len = s1 - s0;
        let dt = t1 - t0;

        let mut values = Vec::with_capacity(STRETCH_SAMPLES + 1);
        let mut slopes = Vec::with_capacity(STRETCH_SAMPLES + 1);

        for j in 0..=STRETCH_SAMPLES {
            let tau = 0.5 * (1.0 - (PI * j as f64 / STRETCH_SAMPLES as f64).cos());
            let t = t0 + dt * tau;
            let u = ((segment.length_to(t) - s0) / len).clamp(0.0, 1.0);

            // the speed in normalized units is the inverse of dtau/du
            let speed = segment.speed(t) * dt / len;

            values.push((u, VALUE_WEIGHT, VALUE_WEIGHT * tau));
            slopes.push((u, speed, 1.0));
        }

        let tau = fit_antiderivative(&values, &slopes, 0.0, 1.0, CHEBYSHEV_DEGREE)
            .unwrap_or_else(|| {
                pathkit_log!("no inverse length fit for {:?}; using a linear one", segment);
                Chebyshev::from_coeffs(vec![1.0, 0.5], 0.0, 1.0)
            });

        Stretch {
            s0,
            s1,
            t0,
            t1,
            tau,
        }
    }

    fn t_at(&self, s: f64) -> f64 {
        let u = (s - self.s0) / (self.s1 - self.s0);
        self.t0 + (self.t1 - self.t0) * self.tau.eval(u).clamp(0.0, 1.0)
    }
}

/// Maps arc length along a segment back to the segment's parameter.
#[derive(Debug, Clone)]
pub struct LengthMap {
    segment: Segment,
    total: f64,
    inverse: Inverse,
}

impl LengthMap {
    pub fn new(segment: &Segment) -> LengthMap {
        let total = segment.length();

        let inverse = match *segment {
            Segment::Line { .. } => Inverse::Linear,
            Segment::Arc(ref a) if a.is_circular() => Inverse::Linear,
            _ if total <= 0.0 => Inverse::Linear,
            _ => Self::approximate(segment, total),
        };

        LengthMap {
            segment: *segment,
            total,
            inverse,
        }
    }

    fn approximate(segment: &Segment, total: f64) -> Inverse {
        let (min, max) = gauss_legendre5_nodes(0.0, 1.0)
            .map(|t| segment.speed(t))
            .fold((f64::INFINITY, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if max > 0.0 && min / max >= UNIFORM_SPEED_RATIO {
            let ts = [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0];
            let us = ts.map(|t| segment.length_to(t) / total);

            if let Some(coeffs) = fit_cubic(us, ts) {
                return Inverse::Polynomial(coeffs);
            }
        }

        let mut stretches = Vec::with_capacity(STRETCHES);
        let mut s0 = 0.0;

        for i in 0..STRETCHES {
            let t0 = i as f64 / STRETCHES as f64;
            let t1 = (i + 1) as f64 / STRETCHES as f64;
            let s1 = if i + 1 == STRETCHES {
                total
            } else {
                segment.length_to(t1)
            };

            if s1 > s0 {
                stretches.push(Stretch::fit(segment, (s0, s1), (t0, t1)));
            }
            s0 = s1;
        }

        Inverse::Chebyshev(stretches)
    }

    /// Length of the whole segment.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// The parameter at which the arc length from the segment start is `s`.
    ///
    /// Lengths outside `[0, total]` map to the segment's endpoints.
    pub fn t_at(&self, s: f64) -> f64 {
        if s <= 0.0 || self.total <= 0.0 {
            return 0.0;
        }
        if s >= self.total {
            return 1.0;
        }

        let u = s / self.total;

        match self.inverse {
            Inverse::Linear => u,
            Inverse::Polynomial(ref c) => eval_polynomial(c, u).clamp(0.0, 1.0),
            Inverse::Chebyshev(ref stretches) => stretches
                .iter()
                .find(|stretch| s <= stretch.s1)
                .or_else(|| stretches.last())
                .map_or(u, |stretch| stretch.t_at(s)),
        }
    }
}

/// The segments of a subpath with the distance at which each one starts.
pub(crate) struct MeasuredSubPath {
    segments: Vec<(Segment, LengthMap, f64)>,
    pub origin: Point,
    pub total: f64,
}

impl MeasuredSubPath {
    pub fn new(subpath: &SubPath<'_>) -> MeasuredSubPath {
        let mut offset = 0.0;

        let segments = subpath
            .segments()
            .into_iter()
            .map(|segment| {
                let map = LengthMap::new(&segment);
                let start = offset;
                offset += map.total();
                (segment, map, start)
            })
            .collect();

        MeasuredSubPath {
            segments,
            origin: subpath.origin(),
            total: offset,
        }
    }

    /// The point at distance `d` from the subpath's origin, clamped to its ends.
    pub fn point_at(&self, d: f64) -> Point {
        let found = self
            .segments
            .iter()
            .find(|(_, map, start)| map.total() > 0.0 && d <= start + map.total());

        match found {
            Some((segment, map, start)) => segment.eval(map.t_at(d - start)),
            None => self
                .segments
                .last()
                .map_or(self.origin, |(segment, _, _)| segment.end()),
        }
    }

    /// Adds the part of the subpath between distances `a <= b` to `builder`,
    /// whose current point must be the point at distance `a`.
    pub fn append_range(&self, a: f64, b: f64, builder: &mut PathBuilder) {
        for (segment, map, start) in &self.segments {
            let len = map.total();
            let end = start + len;

            if len <= 0.0 || end <= a || *start >= b {
                continue;
            }

            let t0 = if a > *start { map.t_at(a - start) } else { 0.0 };
            let t1 = if b < end { map.t_at(b - start) } else { 1.0 };

            segment.subsegment(t0, t1).push_to(builder);
        }
    }
}

impl Path {
    /// Total arc length of all the drawing commands, closing lines included.
    pub fn length(&self) -> f64 {
        self.iter_subpath()
            .flat_map(|sp| sp.segments())
            .map(|s| s.length())
            .sum()
    }

    /// Tight bounding box of the drawing commands.
    ///
    /// A path that draws nothing has an all-zero rectangle.
    pub fn bounds(&self) -> Rect {
        self.iter_subpath()
            .flat_map(|sp| sp.segments())
            .map(|s| s.bounds())
            .reduce(|acc, r| acc.union(&r))
            .unwrap_or_default()
    }

    /// Splits the path into one path per subpath.
    pub fn split(&self) -> Vec<Path> {
        self.iter_subpath().map(|sp| sp.to_path()).collect()
    }

    /// Cuts the path at the given distances along it.
    ///
    /// Distances are clamped to the path's length, sorted, and those closer than
    /// the default epsilon are merged.  `n` cuts give `n + 1` pieces, each of
    /// which starts with a MoveTo at its cut point.  A cut at 0 gives an empty
    /// leading piece and a cut at the total length gives an empty trailing piece.
    /// A closed subpath keeps its ClosePath unless a cut falls inside it.
    pub fn split_at(&self, distances: &[f64]) -> Vec<Path> {
        if self.has_no_commands() {
            return vec![self.clone()];
        }

        let total = self.length();

        let mut cuts: Vec<f64> = distances
            .iter()
            .filter(|d| !d.is_nan())
            .map(|d| d.clamp(0.0, total))
            .collect();
        cuts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        cuts.dedup_by(|a, b| (*a - *b).abs() <= DEFAULT_EPSILON);

        if cuts.is_empty() {
            return vec![self.clone()];
        }

        let mut pieces = Vec::with_capacity(cuts.len() + 1);
        let mut builder = PathBuilder::default();
        let mut remaining = cuts.as_slice();
        let mut offset = 0.0;

        let num_subpaths = self.num_subpaths();

        for (i, subpath) in self.iter_subpath().enumerate() {
            let measured = MeasuredSubPath::new(&subpath);
            let end = offset + measured.total;
            let is_last = i + 1 == num_subpaths;

            let n = remaining
                .iter()
                .take_while(|&&c| c < end || (is_last && c <= end + DEFAULT_EPSILON))
                .count();
            let (mut local, rest) = remaining.split_at(n);
            remaining = rest;

            if let Some(&first) = local.first() {
                if first - offset <= DEFAULT_EPSILON {
                    local = &local[1..];

                    if builder.is_empty() {
                        builder.move_to(measured.origin.x, measured.origin.y);
                    }
                    pieces.push(mem::take(&mut builder).into_path());
                }
            }

            if local.is_empty() {
                builder.append(&subpath.to_path());
            } else {
                builder.move_to(measured.origin.x, measured.origin.y);

                let mut pos = 0.0;
                for &cut in local {
                    let d = cut - offset;
                    measured.append_range(pos, d, &mut builder);
                    pieces.push(mem::take(&mut builder).into_path());

                    let p = measured.point_at(d);
                    builder.move_to(p.x, p.y);
                    pos = d;
                }
                measured.append_range(pos, measured.total, &mut builder);
            }

            offset = end;
        }

        pieces.push(builder.into_path());
        pieces
    }

    /// The end points of every command except ClosePath, in order.
    pub fn coords(&self) -> Vec<Point> {
        self.iter()
            .filter_map(|cmd| match cmd {
                PathCommand::ClosePath => None,
                _ => cmd.end_point(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use std::f64::consts::PI;

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    fn strings(paths: &[Path]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn lengths() {
        assert_eq!(path("L10 0").length(), 10.0);
        assert_eq!(path("L4 3L8 0z").length(), 18.0);
        assert_eq!(path("M5 5").length(), 0.0);
        assert!(approx_eq!(
            f64,
            path("A5 5 0 0 1 10 0A5 5 0 0 1 0 0").length(),
            10.0 * PI,
            epsilon = 1e-9
        ));

        let quad = path("Q50 100 100 0").length();
        assert!((quad - 147.89).abs() / 147.89 < 0.01);
    }

    #[test]
    fn bounds() {
        assert_eq!(path("L10 0").bounds(), Rect::new(0.0, 0.0, 10.0, 0.0));
        assert_eq!(Path::default().bounds(), Rect::default());
        assert!(path("Q50 100 100 0")
            .bounds()
            .approx_eq(&Rect::new(0.0, 0.0, 100.0, 50.0), 1e-9));
        assert!(path("M10 10C10 110 110 110 110 10M-5 0L0 0")
            .bounds()
            .approx_eq(&Rect::new(-5.0, 0.0, 110.0, 85.0), 1e-9));
    }

    #[test]
    fn split_by_subpaths() {
        let pieces = path("M0 0L10 0M20 0L30 0L30 10z").split();
        assert_eq!(strings(&pieces), vec!["L10 0", "M20 0L30 0L30 10z"]);

        let total: f64 = pieces.iter().map(|p| p.length()).sum();
        assert_eq!(total, path("M0 0L10 0M20 0L30 0L30 10z").length());
    }

    #[test]
    fn split_at_distances() {
        let pieces = path("L4 3L8 0z").split_at(&[2.5, 7.5, 14.0]);
        assert_eq!(
            strings(&pieces),
            vec!["L2 1.5", "M2 1.5L4 3L6 1.5", "M6 1.5L8 0L4 0", "M4 0L0 0"]
        );
    }

    #[test]
    fn split_at_sorts_and_dedupes() {
        let a = path("L4 3L8 0z").split_at(&[7.5, 2.5, 2.5, 100.0]);
        let b = path("L4 3L8 0z").split_at(&[2.5, 7.5, 18.0]);
        assert_eq!(strings(&a), strings(&b));
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn split_at_ends_gives_empty_pieces() {
        let pieces = path("L10 0").split_at(&[0.0, 10.0]);
        assert_eq!(pieces.len(), 3);

        assert!(pieces[0].is_empty());
        assert_eq!(pieces[0].num_commands(), 1);
        assert_eq!(pieces[0].start_point(), Point::new(0.0, 0.0));

        assert_eq!(pieces[1].to_string(), "L10 0");

        assert!(pieces[2].is_empty());
        assert_eq!(pieces[2].to_string(), "M10 0");
    }

    #[test]
    fn split_at_subpath_boundary() {
        let pieces = path("L10 0M20 0L30 0").split_at(&[10.0]);
        assert_eq!(strings(&pieces), vec!["L10 0", "M20 0L30 0"]);
    }

    #[test]
    fn split_at_keeps_uncut_closed_subpaths() {
        let pieces = path("L10 0M20 0L30 0L30 10z").split_at(&[5.0]);
        assert_eq!(strings(&pieces), vec!["L5 0", "M5 0L10 0M20 0L30 0L30 10z"]);
    }

    #[test]
    fn split_at_curves_preserves_length() {
        let p = path("C0 10 10 10 10 0A5 5 0 0 0 20 0Q25 10 30 0");
        let pieces = p.split_at(&[3.0, 12.0, 20.0]);
        assert_eq!(pieces.len(), 4);

        let sum: f64 = pieces.iter().map(|p| p.length()).sum();
        assert!((sum - p.length()).abs() / p.length() < 0.01);

        assert_eq!(pieces[0].start_point(), p.start_point());
        assert!(pieces[3].current_point().near(Point::new(30.0, 0.0), 1e-9));
    }

    #[test]
    fn length_map_inverts_length() {
        for s in &["C0 0 0 0 10 0", "C0 10 10 10 10 0", "Q5 10 10 0", "A10 2 30 0 1 10 0", "L3 4"] {
            let p = path(s);
            let segment = p.iter_subpath().next().unwrap().segments()[0];
            let map = LengthMap::new(&segment);

            for i in 0..=10 {
                let target = map.total() * i as f64 / 10.0;
                let t = map.t_at(target);
                let err = (segment.length_to(t) - target).abs();
                assert!(err <= 0.01 * map.total(), "{} at {}", s, i);
            }
        }
    }

    #[test]
    fn length_map_fits_are_accurate() {
        // nearly uniform speed takes the cubic fit, the others the piecewise
        // series; both are evaluated directly
        let cases = [
            ("Q5 1 10 0", true),
            ("C3.3 0.5 6.7 0.5 10 0", true),
            ("C0 10 10 10 10 0", false),
            ("C10 10 0 10 10 0", false),
            ("C20 10 0 10 20 0", false),
            ("A20 5 0 0 1 10 10", false),
        ];

        for (s, uniform) in cases {
            let p = path(s);
            let segment = p.iter_subpath().next().unwrap().segments()[0];
            let map = LengthMap::new(&segment);

            match map.inverse {
                Inverse::Polynomial(_) => assert!(uniform, "{}", s),
                Inverse::Chebyshev(ref stretches) => {
                    assert!(!uniform, "{}", s);
                    assert!(!stretches.is_empty());
                }
                Inverse::Linear => panic!("{} has no approximation", s),
            }

            for i in 0..=100 {
                let target = map.total() * i as f64 / 100.0;
                let t = map.t_at(target);
                assert!((0.0..=1.0).contains(&t));
                let err = (segment.length_to(t) - target).abs();
                assert!(err <= 0.01 * map.total(), "{} at {}: {}", s, i, err);
            }
        }
    }

    #[test]
    fn cutting_a_half_circle_at_its_top() {
        let p = path("A10 10 0 0 1 -20 0");
        let pieces = p.split_at(&[5.0 * PI]);
        assert!(pieces[0].current_point().near(Point::new(-10.0, 10.0), 1e-9));
        assert!(pieces[1].start_point().near(Point::new(-10.0, 10.0), 1e-9));
        assert!(pieces[1].to_string().starts_with("M-10 10"));

        // a little short of the top stays left of it
        let pieces = p.split_at(&[15.707963]);
        assert!(pieces[0].current_point().x > -10.0);
        assert!(pieces[0].current_point().near(Point::new(-10.0, 10.0), 1e-6));
    }

    #[test]
    fn coords() {
        assert_eq!(
            path("L10 0Q15 10 20 0z").coords(),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 0.0)]
        );
    }
}
