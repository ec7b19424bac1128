//! Turning strokes into fillable outlines.
//!
//! A subpath is stroked by offsetting each of its segments to both sides by half
//! the stroke width.  The offset segments are connected by a [`Joiner`] on the
//! outer side of each turn, and for open subpaths the two sides are connected at
//! the ends by a [`Capper`].  The outline is meant to be filled with the
//! non-zero rule.
//!
//! Lines and circular arcs have exact offsets.  Other curves are approximated
//! by cubic curves whose handles are scaled by the local curvature, subdividing
//! until they stay within the tolerance's flatness.
//!
//! Where a curve bends tighter than half the stroke width, or stops and turns
//! back at a cusp, its offset on the inner side would fold back over itself.
//! Those stretches are stroked as a polyline instead, with round joins between
//! the chords, so every point within half the width of the curve stays covered.

use crate::path_builder::{LargeArc, Path, PathBuilder, Sweep};
use crate::pathkit_log;
use crate::point::Point;
use crate::polynomial::invert_increasing;
use crate::segment::Segment;
use crate::tolerance::Tolerance;

/// Draws the end of an open subpath.
pub trait Capper {
    /// Adds a cap around `pivot` to `builder`, whose current point is
    /// `pivot + n`.  The cap ends at `pivot - n`.
    ///
    /// `n` is perpendicular to the path and as long as half the stroke width;
    /// the cap extends towards `n` rotated by 90 degrees in the positive
    /// direction.
    fn cap(&self, builder: &mut PathBuilder, half_width: f64, pivot: Point, n: Point);
}

/// Draws the outer corner where two segments meet.
pub trait Joiner {
    /// Adds a join around `pivot` to `builder`, whose current point is
    /// `pivot + n0`.  The join ends at `pivot + n1`.
    ///
    /// `n0` and `n1` are the offsets of the incoming and outgoing segments on the
    /// outer side of the turn; both are as long as half the stroke width.
    fn join(&self, builder: &mut PathBuilder, pivot: Point, n0: Point, n1: Point);
}

/// Ends the stroke flush with the end point.
#[derive(Debug, Default, Copy, Clone)]
pub struct ButtCapper;

impl Capper for ButtCapper {
    fn cap(&self, builder: &mut PathBuilder, _half_width: f64, pivot: Point, n: Point) {
        let end = pivot - n;
        builder.line_to(end.x, end.y);
    }
}

/// Ends the stroke with a half circle.
#[derive(Debug, Default, Copy, Clone)]
pub struct RoundCapper;

impl Capper for RoundCapper {
    fn cap(&self, builder: &mut PathBuilder, half_width: f64, pivot: Point, n: Point) {
        let end = pivot - n;
        builder.arc_to(
            half_width,
            half_width,
            0.0,
            LargeArc(false),
            Sweep::Positive,
            end.x,
            end.y,
        );
    }
}

/// Extends the stroke past the end point by half the stroke width.
#[derive(Debug, Default, Copy, Clone)]
pub struct SquareCapper;

impl Capper for SquareCapper {
    fn cap(&self, builder: &mut PathBuilder, _half_width: f64, pivot: Point, n: Point) {
        let e = n.rot90();
        let corner1 = pivot + n + e;
        let corner2 = pivot - n + e;
        let end = pivot - n;

        builder
            .line_to(corner1.x, corner1.y)
            .line_to(corner2.x, corner2.y)
            .line_to(end.x, end.y);
    }
}

/// Cuts the corner off with a straight line.
#[derive(Debug, Default, Copy, Clone)]
pub struct BevelJoiner;

impl Joiner for BevelJoiner {
    fn join(&self, builder: &mut PathBuilder, pivot: Point, _n0: Point, n1: Point) {
        let end = pivot + n1;
        builder.line_to(end.x, end.y);
    }
}

/// Rounds the corner off with a circular arc.
#[derive(Debug, Default, Copy, Clone)]
pub struct RoundJoiner;

impl Joiner for RoundJoiner {
    fn join(&self, builder: &mut PathBuilder, pivot: Point, n0: Point, n1: Point) {
        let r = n0.length();
        let end = pivot + n1;
        let sweep = Sweep::from_flag(n0.cross(n1) > 0.0);

        builder.arc_to(r, r, 0.0, LargeArc(false), sweep, end.x, end.y);
    }
}

/// Extends the outer edges until they meet.
///
/// When the miter would be longer than `limit` times half the stroke width, the
/// corner is drawn with the gap joiner instead.
#[derive(Debug, Copy, Clone)]
pub struct MiterJoiner<J = BevelJoiner> {
    gap_joiner: J,
    limit: f64,
}

impl MiterJoiner<BevelJoiner> {
    /// Creates a miter joiner that bevels corners over the limit.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is smaller than 1.
    pub fn new(limit: f64) -> MiterJoiner<BevelJoiner> {
        MiterJoiner::with_gap_joiner(BevelJoiner, limit)
    }
}

impl Default for MiterJoiner<BevelJoiner> {
    fn default() -> Self {
        MiterJoiner::new(4.0)
    }
}

impl<J: Joiner> MiterJoiner<J> {
    /// Creates a miter joiner that falls back to `gap_joiner` for corners over
    /// the limit.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is smaller than 1.
    pub fn with_gap_joiner(gap_joiner: J, limit: f64) -> MiterJoiner<J> {
        assert!(limit >= 1.0, "miter limit must be at least 1, got {limit}");
        MiterJoiner { gap_joiner, limit }
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }
}

impl<J: Joiner> Joiner for MiterJoiner<J> {
    fn join(&self, builder: &mut PathBuilder, pivot: Point, n0: Point, n1: Point) {
        let half_width = n0.length();
        let sum = n0 + n1;
        let sum_len2 = sum.length_squared();

        // ratio of the miter length to half the stroke width, or to the stroke
        // width for the whole miter; both give 1 / cos(theta / 2)
        let ratio = if sum_len2 > 0.0 {
            2.0 * half_width / sum_len2.sqrt()
        } else {
            f64::INFINITY
        };

        if ratio > self.limit {
            pathkit_log!(
                "miter at ({}, {}) exceeds the limit {}; using the gap joiner",
                pivot.x,
                pivot.y,
                self.limit
            );
            self.gap_joiner.join(builder, pivot, n0, n1);
            return;
        }

        let tip = pivot + sum * (2.0 * half_width * half_width / sum_len2);
        let end = pivot + n1;
        builder.line_to(tip.x, tip.y).line_to(end.x, end.y);
    }
}

/// How the side of a contour on the inside of a turn is connected.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum InnerJoin {
    /// Through the vertex itself, which is always covered by a stroke.
    Pivot,
    /// Through the point where both offset edges cross.
    Clip,
}

/// Part of a subpath that is offset as a unit.
#[derive(Debug, Copy, Clone)]
struct Piece {
    segment: Segment,
    /// Whether the piece continues a curve rather than starting at a vertex of
    /// the path.
    smooth: bool,
}

impl Piece {
    fn vertex(segment: Segment) -> Piece {
        Piece {
            segment,
            smooth: false,
        }
    }
}

/// Offsets the segments of one subpath to one side.
struct Contour<'a> {
    builder: PathBuilder,
    joiner: &'a dyn Joiner,
    /// Offset along the left normal of the path.
    d: f64,
    inner: InnerJoin,
    tolerance: Tolerance,
    /// End of the last offset line, held back until the next join may trim it.
    pending: Option<Point>,
}

fn left_normal(tangent: Point) -> Point {
    tangent.rot90()
}

/// Crossing point of the lines through `p0` along `d0` and through `p1` along
/// `d1`.
fn intersect_lines(p0: Point, d0: Point, p1: Point, d1: Point) -> Option<Point> {
    let denom = d0.cross(d1);
    if denom.abs() < 1e-12 {
        return None;
    }

    let s = (p1 - p0).cross(d1) / denom;
    Some(p0 + d0 * s)
}

/// Signed curvature of a segment at `t`; positive when it turns left.
fn curvature(segment: &Segment, t: f64) -> Option<f64> {
    let d1 = segment.deriv(t);
    let speed = d1.length();

    if speed < 1e-12 {
        None
    } else {
        Some(d1.cross(segment.deriv2(t)) / speed.powi(3))
    }
}

impl<'a> Contour<'a> {
    fn new(d: f64, joiner: &'a dyn Joiner, inner: InnerJoin, tolerance: Tolerance) -> Contour<'a> {
        Contour {
            builder: PathBuilder::default(),
            joiner,
            d,
            inner,
            tolerance,
            pending: None,
        }
    }

    fn build(mut self, pieces: &[Piece], closed: bool) -> Path {
        let (Some(first), Some(last)) = (pieces.first(), pieces.last()) else {
            return Path::default();
        };

        let start = match self.clip_point(&last.segment, &first.segment) {
            Some(x) if closed => x,
            _ => first.segment.start() + left_normal(first.segment.start_tangent()) * self.d,
        };
        self.builder.move_to(start.x, start.y);

        for (i, piece) in pieces.iter().enumerate() {
            if i > 0 {
                let prev = &pieces[i - 1].segment;
                if piece.smooth {
                    self.smooth_join(prev, &piece.segment);
                } else {
                    self.join(prev, &piece.segment);
                }
            }
            self.offset_segment(&piece.segment);
        }

        if closed {
            self.join(&last.segment, &first.segment);
            self.flush();
            self.builder.close_path();
        } else {
            self.flush();
        }

        self.builder.into_path()
    }

    fn flush(&mut self) {
        if let Some(p) = self.pending.take() {
            self.builder.line_to(p.x, p.y);
        }
    }

    fn line_to(&mut self, p: Point) {
        self.flush();
        self.builder.line_to(p.x, p.y);
    }

    /// Whether the corner between two segments is on the inside of the turn for
    /// this side, and whether the offsets of both segments are on the same side
    /// of it.
    fn turn(&self, prev: &Segment, next: &Segment) -> (bool, bool) {
        let t0 = prev.end_tangent();
        let t1 = next.start_tangent();
        let cross = t0.cross(t1);
        let epsilon = self.tolerance.epsilon;

        if cross.abs() <= epsilon {
            (false, t0.dot(t1) > 0.0)
        } else {
            // a left turn has its outer side on the right
            (cross * self.d > 0.0, false)
        }
    }

    /// Where the offsets of two lines meet on the inside of a turn, when this
    /// contour trims them there.
    fn clip_point(&self, prev: &Segment, next: &Segment) -> Option<Point> {
        match (self.inner, prev, next) {
            (InnerJoin::Clip, Segment::Line { .. }, Segment::Line { .. }) => {
                if !self.turn(prev, next).0 {
                    return None;
                }

                let pivot = next.start();
                let t0 = prev.end_tangent();
                let t1 = next.start_tangent();
                intersect_lines(
                    pivot + left_normal(t0) * self.d,
                    t0,
                    pivot + left_normal(t1) * self.d,
                    t1,
                )
            }

            _ => None,
        }
    }

    fn join(&mut self, prev: &Segment, next: &Segment) {
        let pivot = next.start();
        let n0 = left_normal(prev.end_tangent()) * self.d;
        let n1 = left_normal(next.start_tangent()) * self.d;

        let (inner, straight) = self.turn(prev, next);

        if straight {
            self.line_to(pivot + n1);
        } else if !inner {
            self.flush();
            self.joiner.join(&mut self.builder, pivot, n0, n1);
            self.line_to(pivot + n1);
        } else if let Some(x) = self.clip_point(prev, next) {
            self.pending = Some(x);
        } else {
            self.line_to(pivot);
            self.line_to(pivot + n1);
        }
    }

    /// Connects two pieces of the same curve with a round join on the outer
    /// side, or through the curve itself on the inner side.
    fn smooth_join(&mut self, prev: &Segment, next: &Segment) {
        let pivot = next.start();
        let t0 = prev.end_tangent();
        let t1 = next.start_tangent();
        let end = pivot + left_normal(t1) * self.d;
        let cross = t0.cross(t1);

        if cross.abs() <= self.tolerance.epsilon && t0.dot(t1) > 0.0 {
            self.line_to(end);
        } else if cross * self.d > 0.0 {
            self.line_to(pivot);
            self.line_to(end);
        } else {
            // a cusp turns by half a circle, which goes around the front of
            // the pivot on both sides
            let r = self.d.abs();
            self.flush();
            self.builder.arc_to(
                r,
                r,
                0.0,
                LargeArc(false),
                Sweep::from_flag(self.d < 0.0),
                end.x,
                end.y,
            );
        }
    }

    fn offset_segment(&mut self, segment: &Segment) {
        match *segment {
            Segment::Line { from, to } => {
                let n = left_normal((to - from).normalize()) * self.d;
                self.flush();
                self.pending = Some(to + n);
            }

            Segment::Arc(ref a) if a.is_circular() => {
                self.flush();
                let to = segment.end() + left_normal(segment.end_tangent()) * self.d;

                // the left side of an arc drawn in the positive direction is its inside
                let r = if a.delta_theta > 0.0 {
                    a.radii.0 - self.d
                } else {
                    a.radii.0 + self.d
                };

                if r <= self.tolerance.epsilon {
                    self.line_to(to);
                } else {
                    self.builder.arc_to(
                        r,
                        r,
                        a.arc.x_axis_rotation,
                        a.arc.large_arc,
                        a.arc.sweep,
                        to.x,
                        to.y,
                    );
                }
            }

            _ => {
                for cubic in segment.to_cubics() {
                    self.offset_cubic(&cubic, 0);
                }
            }
        }
    }

    fn offset_cubic(&mut self, cubic: &Segment, depth: u32) {
        const MAX_DEPTH: u32 = 6;

        let Segment::Cubic {
            from,
            ctrl1,
            ctrl2,
            to,
        } = *cubic
        else {
            self.offset_segment(cubic);
            return;
        };

        let Some((t0, t1)) = cubic.directionalities() else {
            return;
        };

        let d = self.d;
        let q0 = from + left_normal(t0) * d;
        let q3 = to + left_normal(t1) * d;

        let s0 = curvature(cubic, 0.0).map_or(1.0, |k| 1.0 - d * k);
        let s1 = curvature(cubic, 1.0).map_or(1.0, |k| 1.0 - d * k);

        let approx = Segment::Cubic {
            from: q0,
            ctrl1: q0 + (ctrl1 - from) * s0,
            ctrl2: q3 + (ctrl2 - to) * s1,
            to: q3,
        };

        let close_enough = s0 >= 0.0
            && s1 >= 0.0
            && [0.25, 0.5, 0.75].iter().all(|&t| {
                let n = left_normal(cubic.deriv(t).normalize());
                let exact = cubic.eval(t) + n * d;
                approx.eval(t).distance(exact) <= self.tolerance.flatness
            });

        self.flush();

        if close_enough {
            approx.push_to(&mut self.builder);
        } else if depth < MAX_DEPTH {
            let (head, tail) = cubic.split(0.5);
            self.offset_cubic(&head, depth + 1);
            self.offset_cubic(&tail, depth + 1);
        } else {
            const STEPS: usize = 8;

            for i in 1..=STEPS {
                let t = i as f64 / STEPS as f64;
                let tangent = if i == STEPS {
                    t1
                } else {
                    cubic.deriv(t).normalize()
                };
                self.line_to(cubic.eval(t) + left_normal(tangent) * d);
            }
        }
    }
}

/// Whether the stroke of `cubic` folds over at `t`: the curve turns on a
/// radius smaller than `hw` there, or it stops inside the curve.
fn is_tight(cubic: &Segment, t: f64, hw: f64, epsilon: f64) -> bool {
    let d1 = cubic.deriv(t);
    let speed = d1.length();

    if speed <= epsilon {
        return t > 0.0 && t < 1.0;
    }

    d1.cross(cubic.deriv2(t)).abs() * hw >= speed * speed * speed
}

/// Parameters inside a cubic where its speed has a local minimum; cusps are
/// among them.
fn speed_minima(cubic: &Segment, cells: usize, epsilon: f64) -> Vec<f64> {
    let Segment::Cubic {
        from,
        ctrl1,
        ctrl2,
        to,
    } = *cubic
    else {
        return Vec::new();
    };

    let jerk = (to - from + (ctrl1 - ctrl2) * 3.0) * 6.0;

    // half the derivative of the squared speed, and its derivative
    let f = |t: f64| cubic.deriv(t).dot(cubic.deriv2(t));
    let df = |t: f64| {
        let d2 = cubic.deriv2(t);
        d2.dot(d2) + cubic.deriv(t).dot(jerk)
    };

    (0..cells)
        .filter_map(|i| {
            let a = i as f64 / cells as f64;
            let b = (i + 1) as f64 / cells as f64;

            if f(a) < 0.0 && f(b) >= 0.0 {
                Some(invert_increasing(&f, &df, 0.0, (a, b), 0.5 * (a + b), 0.0))
            } else {
                None
            }
        })
        .filter(|&t| t > epsilon && t < 1.0 - epsilon)
        .collect()
}

/// Appends `cubic` to `pieces`, flattening the stretches where its stroke
/// would fold over.
fn split_cubic(cubic: &Segment, hw: f64, tolerance: &Tolerance, pieces: &mut Vec<Piece>) {
    const CELLS: usize = 32;

    let mut push = |segment: Segment| {
        if segment.directionalities().is_some() {
            pieces.push(Piece {
                segment,
                smooth: true,
            });
            true
        } else {
            false
        }
    };

    let mut ts: Vec<f64> = (0..=CELLS).map(|i| i as f64 / CELLS as f64).collect();
    ts.extend(speed_minima(cubic, CELLS, tolerance.epsilon));
    ts.sort_by(f64::total_cmp);
    ts.dedup_by(|a, b| (*a - *b).abs() <= tolerance.epsilon);

    let tight: Vec<bool> = ts
        .iter()
        .map(|&t| is_tight(cubic, t, hw, tolerance.epsilon))
        .collect();

    // start of the stretch that is offset as a curve
    let mut start = 0.0;

    for i in 1..ts.len() {
        if !(tight[i - 1] || tight[i]) {
            continue;
        }

        let (a, b) = (ts[i - 1], ts[i]);
        if a > start {
            push(cubic.subsegment(start, a));
        }

        let part = cubic.subsegment(a, b);
        let mut points = Vec::new();
        part.flatten(tolerance.flatness, &mut points);

        let mut from = part.start();
        for to in points {
            if push(Segment::Line { from, to }) {
                from = to;
            }
        }

        start = b;
    }

    if start < 1.0 {
        push(cubic.subsegment(start, 1.0));
    }
}

/// Splits the segments of a subpath into the pieces its stroke is built from.
fn stroke_pieces(segments: &[Segment], hw: f64, tolerance: &Tolerance) -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(segments.len());

    for segment in segments {
        let first = pieces.len();

        match *segment {
            Segment::Line { .. } => pieces.push(Piece::vertex(*segment)),

            Segment::Arc(ref a) if a.is_circular() && a.radii.0 > hw => {
                pieces.push(Piece::vertex(*segment))
            }

            _ => {
                for cubic in segment.to_cubics() {
                    split_cubic(&cubic, hw, tolerance, &mut pieces);
                }
            }
        }

        if let Some(piece) = pieces.get_mut(first) {
            piece.smooth = false;
        }
    }

    pieces
}

/// Segments of a subpath that have a direction.
fn drawn_segments(subpath: &crate::path_builder::SubPath<'_>) -> Vec<Segment> {
    subpath
        .segments()
        .into_iter()
        .filter(|s| s.directionalities().is_some())
        .collect()
}

impl Path {
    /// Returns the outline of the path stroked with the given width, using the
    /// default tolerance.
    pub fn stroke(&self, width: f64, capper: &dyn Capper, joiner: &dyn Joiner) -> Path {
        self.stroke_with_tolerance(width, capper, joiner, &Tolerance::default())
    }

    /// Returns the outline of the path stroked with the given width.
    ///
    /// Open subpaths become a single closed outline with caps at both ends.
    /// Closed subpaths become two contours running in opposite directions, so
    /// that the area inside the inner one is not filled.  A subpath without
    /// length gets just its two caps, facing along the x axis; with round caps
    /// this is a dot.
    ///
    /// A zero width gives an empty path.
    ///
    /// # Panics
    ///
    /// Panics if `width` is negative or not finite.
    pub fn stroke_with_tolerance(
        &self,
        width: f64,
        capper: &dyn Capper,
        joiner: &dyn Joiner,
        tolerance: &Tolerance,
    ) -> Path {
        assert!(
            width.is_finite() && width >= 0.0,
            "stroke width must be non-negative, got {width}"
        );

        if width == 0.0 {
            pathkit_log!("stroke width is zero; the outline is empty");
            return Path::default();
        }

        let hw = width / 2.0;
        let mut builder = PathBuilder::default();

        for subpath in self.iter_subpath() {
            let segments = drawn_segments(&subpath);

            if segments.is_empty() {
                stroke_dot(&mut builder, subpath.origin(), hw, capper, tolerance);
                continue;
            }

            let pieces = stroke_pieces(&segments, hw, tolerance);
            if pieces.is_empty() {
                stroke_dot(&mut builder, subpath.origin(), hw, capper, tolerance);
                continue;
            }

            let rhs = Contour::new(-hw, joiner, InnerJoin::Pivot, *tolerance)
                .build(&pieces, subpath.is_closed());
            let lhs = Contour::new(hw, joiner, InnerJoin::Pivot, *tolerance)
                .build(&pieces, subpath.is_closed());

            if subpath.is_closed() {
                builder.append(&rhs);
                builder.append(&lhs.reverse());
            } else {
                // invariant: pieces is not empty
                let first = pieces[0].segment;
                let last = pieces[pieces.len() - 1].segment;

                builder.append(&rhs);
                capper.cap(
                    &mut builder,
                    hw,
                    last.end(),
                    left_normal(last.end_tangent()) * -hw,
                );
                builder.join(&lhs.reverse());
                capper.cap(
                    &mut builder,
                    hw,
                    first.start(),
                    left_normal(first.start_tangent()) * hw,
                );
                builder.close_path();
            }
        }

        builder.into_path()
    }

    /// Grows closed subpaths outwards by `distance`, or shrinks them for a
    /// negative distance, using `joiner` for the corners that move outwards.
    /// Open subpaths are kept as they are.
    pub fn offset(&self, distance: f64, joiner: &dyn Joiner) -> Path {
        self.offset_with_tolerance(distance, joiner, &Tolerance::default())
    }

    pub fn offset_with_tolerance(
        &self,
        distance: f64,
        joiner: &dyn Joiner,
        tolerance: &Tolerance,
    ) -> Path {
        let mut builder = PathBuilder::default();

        for subpath in self.iter_subpath() {
            let segments = drawn_segments(&subpath);

            if !subpath.is_closed() || segments.is_empty() || distance == 0.0 {
                builder.append(&subpath.to_path());
                continue;
            }

            // the outside of a counter-clockwise contour is on its right
            let ccw = subpath.to_path().ccw_with_tolerance(tolerance);
            let d = if ccw { -distance } else { distance };

            let pieces: Vec<Piece> = segments.into_iter().map(Piece::vertex).collect();
            let contour =
                Contour::new(d, joiner, InnerJoin::Clip, *tolerance).build(&pieces, true);
            builder.append(&contour);
        }

        builder.into_path()
    }
}

/// Caps a subpath that has no length, as if it ran along the x axis.
fn stroke_dot(
    builder: &mut PathBuilder,
    pivot: Point,
    hw: f64,
    capper: &dyn Capper,
    tolerance: &Tolerance,
) {
    let n = Point::new(0.0, -hw);
    let start = pivot + n;

    let mut dot = PathBuilder::default();
    dot.move_to(start.x, start.y);
    capper.cap(&mut dot, hw, pivot, n);
    capper.cap(&mut dot, hw, pivot, -n);
    dot.close_path();

    let dot = dot.into_path();
    let bounds = dot.bounds();

    // butt caps enclose nothing
    if bounds.width() > tolerance.epsilon && bounds.height() > tolerance.epsilon {
        builder.append(&dot);
    }
}
