//! Representation of paths made of lines, Bézier curves and elliptical arcs.
//!
//! Paths can consume a significant amount of memory when they are large, or when
//! many derived paths are kept around.  This module deals with this as follows:
//!
//! * The path parser and all derived operations push commands into a [`PathBuilder`].
//! This is a mutable, temporary storage for path data.
//!
//! * Then, the [`PathBuilder`] gets turned into a long-term, immutable [`Path`] that has
//! a more compact representation.
//!
//! The code tries to reduce work in the allocator, by using a [`TinyVec`] with space for at
//! least 32 commands on the stack for `PathBuilder`; most paths have fewer than 32
//! commands, and larger ones will spill to the heap.
//!
//! The builder normalizes degenerate geometry as it goes, so that every `Path`
//! holds a canonical command stream:
//!
//! * every subpath starts with a MoveTo; drawing without one starts at the
//! current point (the origin for a new builder);
//!
//! * lines to the current point are dropped, and so are arcs;
//!
//! * Bézier curves whose control points coincide with their endpoints become lines;
//!
//! * arcs have non-negative radii with `rx >= ry`, an x-axis rotation in `[0, 180)`
//! degrees, and radii large enough to span their chord.

use tinyvec::TinyVec;

use std::f64;
use std::f64::consts::*;
use std::slice;
use std::str::FromStr;

use crate::error::ParseError;
use crate::float_eq::ApproxEqPath;
use crate::path_parser::PathParser;
use crate::point::Point;

/// Whether an arc's sweep should be >= 180 degrees, or smaller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LargeArc(pub bool);

/// Angular direction in which an arc is drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sweep {
    Negative,
    Positive,
}

impl Sweep {
    pub fn from_flag(positive: bool) -> Sweep {
        if positive {
            Sweep::Positive
        } else {
            Sweep::Negative
        }
    }

    pub fn flip(self) -> Sweep {
        match self {
            Sweep::Negative => Sweep::Positive,
            Sweep::Positive => Sweep::Negative,
        }
    }
}

/// "q" command for paths; describes a quadratic Bézier segment.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct QuadraticBezierCurve {
    /// The control point.
    pub pt1: Point,
    /// The end point of this path segment.
    pub to: Point,
}

impl QuadraticBezierCurve {
    fn unpack(coords: &mut slice::Iter<'_, f64>) -> QuadraticBezierCurve {
        QuadraticBezierCurve {
            pt1: take_two(coords),
            to: take_two(coords),
        }
    }

    /// The equivalent cubic curve, given the start point of this one.
    pub fn to_cubic(&self, from: Point) -> CubicBezierCurve {
        CubicBezierCurve {
            pt1: from + (self.pt1 - from) * (2.0 / 3.0),
            pt2: self.to + (self.pt1 - self.to) * (2.0 / 3.0),
            to: self.to,
        }
    }
}

/// "c" command for paths; describes a cubic Bézier segment.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct CubicBezierCurve {
    /// The first control point.
    pub pt1: Point,
    /// The second control point.
    pub pt2: Point,
    /// The end point of this path segment.
    pub to: Point,
}

impl CubicBezierCurve {
    fn unpack(coords: &mut slice::Iter<'_, f64>) -> CubicBezierCurve {
        CubicBezierCurve {
            pt1: take_two(coords),
            pt2: take_two(coords),
            to: take_two(coords),
        }
    }
}

/// An elliptical arc described by its center instead of its end points.
///
/// Arcs whose radii are too small to divide by become lines; arcs that
/// cannot be solved at all are dropped.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ArcParameterization {
    /// Center parameterization of the arc.
    CenterParameters {
        /// Center of the ellipse.
        center: Point,
        /// Radii of the ellipse (corrected).
        radii: (f64, f64),
        /// Angle of the start point.
        theta1: f64,
        /// Delta angle to the end point.
        delta_theta: f64,
    },
    /// Treat the arc as a line to the end point.
    LineTo,
    /// Omit the arc.
    Omit,
}

/// "a" command for paths; describes an elliptical arc in terms of its endpoints.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EllipticalArc {
    /// The (x-axis, y-axis) radii for the ellipse.
    pub r: (f64, f64),
    /// The rotation angle in degrees for the ellipse's x-axis
    /// relative to the x-axis of the user coordinate system.
    pub x_axis_rotation: f64,
    /// Flag indicating whether the arc sweep should be
    /// greater than or equal to 180 degrees, or smaller than 180 degrees.
    pub large_arc: LargeArc,
    /// Flag indicating the angular direction in which the arc is drawn.
    pub sweep: Sweep,
    /// The start point of this path segment.
    pub from: Point,
    /// The end point of this path segment.
    pub to: Point,
}

impl EllipticalArc {
    /// Calculates a center parameterization from the endpoint parameterization.
    ///
    /// Radii may be adjusted if there is no solution.
    ///
    /// See section [B.2.4. Conversion from endpoint to center
    /// parameterization](https://www.w3.org/TR/SVG2/implnote.html#ArcConversionEndpointToCenter)
    pub fn center_parameterization(&self) -> ArcParameterization {
        let (rx, ry) = (self.r.0.abs(), self.r.1.abs());
        if rx * rx < f64::EPSILON || ry * ry < f64::EPSILON {
            return ArcParameterization::LineTo;
        }

        let (sin_phi, cos_phi) = self.x_axis_rotation.to_radians().sin_cos();

        // Half the chord, in a frame aligned with the ellipse's axes and
        // centered on the chord's midpoint.
        let h = (self.from - self.to) * 0.5;
        let p = Point::new(cos_phi * h.x + sin_phi * h.y, cos_phi * h.y - sin_phi * h.x);

        let lambda = (p.x / rx).powi(2) + (p.y / ry).powi(2);
        let (rx, ry) = if lambda > 1.0 {
            (rx * lambda.sqrt(), ry * lambda.sqrt())
        } else {
            (rx, ry)
        };

        let denom = (rx * p.y).powi(2) + (ry * p.x).powi(2);
        if denom == 0.0 {
            return ArcParameterization::Omit;
        }

        let mut k = ((rx * ry).powi(2) / denom - 1.0).abs().sqrt();
        if self.large_arc.0 == (self.sweep == Sweep::Positive) {
            k = -k;
        }
        let c = Point::new(k * rx * p.y / ry, -k * ry * p.x / rx);

        let mid = self.from.midpoint(self.to);
        let center = Point::new(
            mid.x + cos_phi * c.x - sin_phi * c.y,
            mid.y + sin_phi * c.x + cos_phi * c.y,
        );

        // Both end points as seen from the center, on the unit circle.
        let u = Point::new((p.x - c.x) / rx, (p.y - c.y) / ry);
        let v = Point::new((-p.x - c.x) / rx, (-p.y - c.y) / ry);
        let (u_len, v_len) = (u.length(), v.length());
        if u_len == 0.0 || v_len == 0.0 {
            return ArcParameterization::Omit;
        }

        let theta1 = {
            let a = (u.x / u_len).clamp(-1.0, 1.0).acos();
            if u.y < 0.0 {
                -a
            } else {
                a
            }
        };

        let mut delta_theta = (u.dot(v) / (u_len * v_len)).clamp(-1.0, 1.0).acos();
        if u.cross(v) < 0.0 {
            delta_theta = -delta_theta;
        }
        match self.sweep {
            Sweep::Positive if delta_theta < 0.0 => delta_theta += TAU,
            Sweep::Negative if delta_theta > 0.0 => delta_theta -= TAU,
            _ => (),
        }

        ArcParameterization::CenterParameters {
            center,
            radii: (rx, ry),
            theta1,
            delta_theta,
        }
    }

    /// Approximates the arc with cubic Bézier curves, one for each quarter turn or less.
    ///
    /// The last curve ends exactly at the arc's end point.
    pub fn to_curves(&self) -> Vec<CubicBezierCurve> {
        match self.center_parameterization() {
            ArcParameterization::CenterParameters {
                center,
                radii,
                theta1,
                delta_theta,
            } => {
                let n_segs = (delta_theta.abs() / (PI * 0.5 + 0.001)).ceil().max(1.0) as u32;
                let d_theta = delta_theta / f64::from(n_segs);

                let mut curves: Vec<CubicBezierCurve> = (0..n_segs)
                    .map(|i| {
                        let th = theta1 + f64::from(i) * d_theta;
                        arc_segment(center, radii, self.x_axis_rotation, th, th + d_theta)
                    })
                    .collect();

                if let Some(last) = curves.last_mut() {
                    last.to = self.to;
                }

                curves
            }

            ArcParameterization::LineTo => vec![CubicBezierCurve {
                pt1: self.from,
                pt2: self.to,
                to: self.to,
            }],

            ArcParameterization::Omit => Vec::new(),
        }
    }

    /// The same arc traversed from its end point to its start point.
    pub fn reversed(&self) -> EllipticalArc {
        EllipticalArc {
            sweep: self.sweep.flip(),
            from: self.to,
            to: self.from,
            ..*self
        }
    }

    fn unpack(large_arc: LargeArc, sweep: Sweep, coords: &mut slice::Iter<'_, f64>) -> EllipticalArc {
        EllipticalArc {
            r: take_two(coords).into(),
            x_axis_rotation: take_one(coords),
            large_arc,
            sweep,
            from: take_two(coords),
            to: take_two(coords),
        }
    }
}

/// The cubic that approximates the part of an ellipse between angles `th0`
/// and `th1`.  The ellipse has center `c`, radii `r` and its x axis rotated by
/// `x_axis_rotation` degrees.
pub(crate) fn arc_segment(
    c: Point,
    r: (f64, f64),
    x_axis_rotation: f64,
    th0: f64,
    th1: f64,
) -> CubicBezierCurve {
    let (rx, ry) = r;
    let phi = x_axis_rotation.to_radians();

    // Control arm length for a unit circle spanning th0..th1.
    let half = 0.5 * (th1 - th0);
    let arm = (8.0 / 3.0) * (half * 0.5).sin().powi(2) / half.sin();

    let on_ellipse = |x: f64, y: f64| c + Point::new(rx * x, ry * y).rotate(phi);

    let (sin0, cos0) = th0.sin_cos();
    let (sin1, cos1) = th1.sin_cos();

    CubicBezierCurve {
        pt1: on_ellipse(cos0 - arm * sin0, sin0 + arm * cos0),
        pt2: on_ellipse(cos1 + arm * sin1, sin1 - arm * cos1),
        to: on_ellipse(cos1, sin1),
    }
}

/// Long-form version of a single path command.
///
/// This is returned from iterators on paths and subpaths.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo(QuadraticBezierCurve),
    CurveTo(CubicBezierCurve),
    Arc(EllipticalArc),
    ClosePath,
}

// This is just so we can use TinyVec, whose type parameter requires T: Default.
// There is no meaningful default path command; this is just an implementation detail.
impl Default for PathCommand {
    fn default() -> PathCommand {
        PathCommand::ClosePath
    }
}

impl PathCommand {
    /// Returns the number of coordinate values that this command will generate in a `Path`.
    fn num_coordinates(&self) -> usize {
        match *self {
            PathCommand::MoveTo(..) => 2,
            PathCommand::LineTo(..) => 2,
            PathCommand::QuadTo(_) => 4,
            PathCommand::CurveTo(_) => 6,
            PathCommand::Arc(_) => 7,
            PathCommand::ClosePath => 0,
        }
    }

    /// The point where this command leaves the pen, or `None` for ClosePath,
    /// whose end point is the start of its subpath.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(p),
            PathCommand::QuadTo(ref q) => Some(q.to),
            PathCommand::CurveTo(ref c) => Some(c.to),
            PathCommand::Arc(ref a) => Some(a.to),
            PathCommand::ClosePath => None,
        }
    }

    /// Appends the command's coordinates to `coords` and returns its packed tag.
    fn to_packed(&self, coords: &mut Vec<f64>) -> PackedCommand {
        match *self {
            PathCommand::MoveTo(p) => {
                coords.extend_from_slice(&[p.x, p.y]);
                PackedCommand::MoveTo
            }
            PathCommand::LineTo(p) => {
                coords.extend_from_slice(&[p.x, p.y]);
                PackedCommand::LineTo
            }
            PathCommand::QuadTo(ref q) => {
                coords.extend_from_slice(&[q.pt1.x, q.pt1.y, q.to.x, q.to.y]);
                PackedCommand::QuadTo
            }
            PathCommand::CurveTo(ref c) => {
                coords.extend_from_slice(&[c.pt1.x, c.pt1.y, c.pt2.x, c.pt2.y, c.to.x, c.to.y]);
                PackedCommand::CurveTo
            }
            PathCommand::Arc(ref a) => {
                coords.extend_from_slice(&[
                    a.r.0,
                    a.r.1,
                    a.x_axis_rotation,
                    a.from.x,
                    a.from.y,
                    a.to.x,
                    a.to.y,
                ]);
                PackedCommand::from_arc_flags(a.large_arc, a.sweep)
            }
            PathCommand::ClosePath => PackedCommand::ClosePath,
        }
    }

    /// Rebuilds a command from its packed tag, taking its coordinates from `coords`.
    fn from_packed(packed: PackedCommand, coords: &mut slice::Iter<'_, f64>) -> PathCommand {
        match packed {
            PackedCommand::MoveTo => PathCommand::MoveTo(take_two(coords)),
            PackedCommand::LineTo => PathCommand::LineTo(take_two(coords)),
            PackedCommand::QuadTo => PathCommand::QuadTo(QuadraticBezierCurve::unpack(coords)),
            PackedCommand::CurveTo => PathCommand::CurveTo(CubicBezierCurve::unpack(coords)),
            PackedCommand::ClosePath => PathCommand::ClosePath,
            arc => {
                let (large_arc, sweep) = arc.arc_flags();
                PathCommand::Arc(EllipticalArc::unpack(large_arc, sweep, coords))
            }
        }
    }
}

/// Constructs a path out of commands.
///
/// Create this with `PathBuilder::default`; you can then add commands to it or call the
/// `parse` method.  When you are finished constructing a path builder, turn it into a
/// `Path` with `into_path`.  You can then iterate on that `Path`'s commands with its
/// methods.
///
/// All the command methods return `&mut Self` so that calls can be chained.
#[derive(Default, Clone)]
pub struct PathBuilder {
    path_commands: TinyVec<[PathCommand; 32]>,

    /// Start point of the current subpath; ClosePath returns here.
    start: Point,

    /// Where the pen is after the last command.
    current: Point,
}

/// An immutable path with a compact representation.
///
/// This is constructed from a `PathBuilder` once it is finished.  You
/// can get an iterator for the path's commands with the `iter`
/// method, or an iterator for its subpaths (subsequences of commands that
/// start with a MoveTo) with the `iter_subpath` method.
///
/// The variants in `PathCommand` have different sizes, so a simple array of `PathCommand`
/// would have a lot of slack space.  We reduce this to a minimum by separating the
/// commands from their coordinates.  Then, we can have two dense arrays: one with a compact
/// representation of commands, and another with a linear list of the coordinates for each
/// command.
///
/// Both `PathCommand` and `PackedCommand` know how many coordinates they ought to
/// produce, with their `num_coordinates` methods.
///
/// All operations on a `Path` return new values; a `Path` never changes after it is
/// built.  Two paths compare equal when their canonical text forms are identical.
///
/// This struct implements `Default`, and it yields an empty path.
#[derive(Default, Clone)]
pub struct Path {
    commands: Box<[PackedCommand]>,
    coords: Box<[f64]>,

    /// Indices into `commands` of the MoveTo that starts each subpath.
    subpath_starts: Box<[usize]>,
}

/// Packed version of a `PathCommand`, used in `Path`.
///
/// MoveTo/LineTo/QuadTo/CurveTo have only pairs of coordinates, while ClosePath has no
/// coordinates, and EllipticalArc has a bunch of coordinates plus two flags.  Here we
/// represent the flags as four variants.
///
/// This is `repr(u8)` to keep it as small as possible.
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
enum PackedCommand {
    MoveTo,
    LineTo,
    QuadTo,
    CurveTo,
    ArcSmallNegative,
    ArcSmallPositive,
    ArcLargeNegative,
    ArcLargePositive,
    ClosePath,
}

impl PackedCommand {
    fn num_coordinates(&self) -> usize {
        match *self {
            PackedCommand::MoveTo | PackedCommand::LineTo => 2,
            PackedCommand::QuadTo => 4,
            PackedCommand::CurveTo => 6,
            PackedCommand::ClosePath => 0,
            _ => 7,
        }
    }

    fn from_arc_flags(large_arc: LargeArc, sweep: Sweep) -> PackedCommand {
        match (large_arc.0, sweep) {
            (false, Sweep::Negative) => PackedCommand::ArcSmallNegative,
            (false, Sweep::Positive) => PackedCommand::ArcSmallPositive,
            (true, Sweep::Negative) => PackedCommand::ArcLargeNegative,
            (true, Sweep::Positive) => PackedCommand::ArcLargePositive,
        }
    }

    /// Flags of an arc tag; other tags read as a small negative arc.
    fn arc_flags(self) -> (LargeArc, Sweep) {
        match self {
            PackedCommand::ArcSmallPositive => (LargeArc(false), Sweep::Positive),
            PackedCommand::ArcLargeNegative => (LargeArc(true), Sweep::Negative),
            PackedCommand::ArcLargePositive => (LargeArc(true), Sweep::Positive),
            _ => (LargeArc(false), Sweep::Negative),
        }
    }
}

impl PathBuilder {
    pub fn parse(&mut self, path_str: &str) -> Result<(), ParseError> {
        let mut parser = PathParser::new(self, path_str);
        parser.parse()
    }

    /// Consumes the `PathBuilder` and returns a compact, immutable representation as a `Path`.
    pub fn into_path(self) -> Path {
        let num_coords = self
            .path_commands
            .iter()
            .map(PathCommand::num_coordinates)
            .sum();

        let mut coords = Vec::with_capacity(num_coords);
        let packed_commands: Vec<_> = self
            .path_commands
            .iter()
            .map(|cmd| cmd.to_packed(&mut coords))
            .collect();

        let subpath_starts: Vec<usize> = packed_commands
            .iter()
            .enumerate()
            .filter(|(_, cmd)| matches!(cmd, PackedCommand::MoveTo))
            .map(|(i, _)| i)
            .collect();

        Path {
            commands: packed_commands.into_boxed_slice(),
            coords: coords.into_boxed_slice(),
            subpath_starts: subpath_starts.into_boxed_slice(),
        }
    }

    /// Whether no commands have been added yet.
    pub fn is_empty(&self) -> bool {
        self.path_commands.is_empty()
    }

    /// The pen position after the last command.
    pub fn current_point(&self) -> Point {
        self.current
    }

    /// Starts a new subpath unless the last command leaves one open.
    fn ensure_subpath(&mut self) {
        match self.path_commands.last() {
            None | Some(PathCommand::ClosePath) => {
                let p = self.current;
                self.move_to(p.x, p.y);
            }
            _ => (),
        }
    }

    /// Adds a MoveTo command to the path.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        let p = Point::new(x, y);
        self.path_commands.push(PathCommand::MoveTo(p));
        self.start = p;
        self.current = p;
        self
    }

    /// Adds a LineTo command to the path.
    ///
    /// A line to the current point is dropped.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.ensure_subpath();

        let to = Point::new(x, y);
        if to.approx_eq_path(self.current) {
            return self;
        }

        self.path_commands.push(PathCommand::LineTo(to));
        self.current = to;
        self
    }

    /// Adds a quadratic Bézier curve to the path.
    ///
    /// If the control point coincides with either end point, this adds a line instead.
    pub fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) -> &mut Self {
        self.ensure_subpath();

        let pt1 = Point::new(x1, y1);
        let to = Point::new(x, y);
        if pt1.approx_eq_path(self.current) || pt1.approx_eq_path(to) {
            return self.line_to(x, y);
        }

        self.path_commands
            .push(PathCommand::QuadTo(QuadraticBezierCurve { pt1, to }));
        self.current = to;
        self
    }

    /// Adds a CurveTo command to the path.
    ///
    /// If the first control point coincides with the start point and the second one
    /// with the end point, this adds a line instead.
    pub fn curve_to(&mut self, x2: f64, y2: f64, x3: f64, y3: f64, x4: f64, y4: f64) -> &mut Self {
        self.ensure_subpath();

        let curve = CubicBezierCurve {
            pt1: Point::new(x2, y2),
            pt2: Point::new(x3, y3),
            to: Point::new(x4, y4),
        };

        if curve.pt1.approx_eq_path(self.current) && curve.pt2.approx_eq_path(curve.to) {
            return self.line_to(x4, y4);
        }

        self.path_commands.push(PathCommand::CurveTo(curve));
        self.current = curve.to;
        self
    }

    /// Adds an EllipticalArc command to the path, from the current point to `(x, y)`.
    ///
    /// The radii and rotation are normalized; see the module documentation.  An arc to
    /// the current point is dropped, and an arc with a zero radius becomes a line.
    #[allow(clippy::too_many_arguments)]
    pub fn arc_to(
        &mut self,
        rx: f64,
        ry: f64,
        x_axis_rotation: f64,
        large_arc: LargeArc,
        sweep: Sweep,
        x: f64,
        y: f64,
    ) -> &mut Self {
        self.ensure_subpath();

        let from = self.current;
        let to = Point::new(x, y);
        if from.approx_eq_path(to) {
            return self;
        }

        let (mut rx, mut ry) = (rx.abs(), ry.abs());
        if rx.approx_eq_path(0.0) || ry.approx_eq_path(0.0) {
            return self.line_to(x, y);
        }

        let mut phi = x_axis_rotation;
        if rx < ry {
            std::mem::swap(&mut rx, &mut ry);
            phi += 90.0;
        }

        phi = phi.rem_euclid(180.0);
        if phi.approx_eq_path(180.0) || (rx - ry).abs() <= rx * 1e-10 {
            phi = 0.0;
        }

        let lambda = radii_scale(from, to, rx, ry, phi);
        if lambda > 1.0 {
            let s = lambda.sqrt();
            rx *= s;
            ry *= s;
        }

        self.path_commands.push(PathCommand::Arc(EllipticalArc {
            r: (rx, ry),
            x_axis_rotation: phi,
            large_arc,
            sweep,
            from,
            to,
        }));
        self.current = to;
        self
    }

    /// Adds an elliptical arc given by angles, starting at the current point.
    ///
    /// `theta0` and `theta1` are the start and end angles on the ellipse, in degrees,
    /// and `rot` is the rotation of the ellipse's x axis.  The arc is drawn in the
    /// positive direction if `theta1 > theta0`.  Sweeps of a full turn or more are
    /// split into several arcs.
    pub fn arc(&mut self, rx: f64, ry: f64, rot: f64, theta0: f64, theta1: f64) -> &mut Self {
        let phi = rot.to_radians();
        let (t0, t1) = (theta0.to_radians(), theta1.to_radians());
        let dtheta = (t1 - t0).abs();

        let sweep = Sweep::from_flag(t1 > t0);
        let large_arc = LargeArc(dtheta % (2.0 * PI) > PI);

        self.ensure_subpath();
        let start = self.current;
        let center = start - ellipse_point(rx, ry, phi, t0);

        if dtheta >= 2.0 * PI {
            let opposite = center - ellipse_point(rx, ry, phi, t0);
            self.arc_to(rx, ry, rot, large_arc, sweep, opposite.x, opposite.y);
            self.arc_to(rx, ry, rot, large_arc, sweep, start.x, start.y);

            if (dtheta % (2.0 * PI)).approx_eq_path(0.0) {
                return self;
            }
        }

        let end = center + ellipse_point(rx, ry, phi, t1);
        self.arc_to(rx, ry, rot, large_arc, sweep, end.x, end.y)
    }

    /// Adds a ClosePath command to the path.
    ///
    /// A ClosePath right after another one is ignored.
    pub fn close_path(&mut self) -> &mut Self {
        if let Some(PathCommand::ClosePath) = self.path_commands.last() {
            return self;
        }

        self.ensure_subpath();
        self.path_commands.push(PathCommand::ClosePath);
        self.current = self.start;
        self
    }

    /// Adds a command, applying the same normalization as the individual methods.
    ///
    /// For arcs, the `from` field is ignored and the current point is used instead.
    pub fn push_command(&mut self, cmd: PathCommand) -> &mut Self {
        match cmd {
            PathCommand::MoveTo(p) => self.move_to(p.x, p.y),
            PathCommand::LineTo(p) => self.line_to(p.x, p.y),
            PathCommand::QuadTo(q) => self.quad_to(q.pt1.x, q.pt1.y, q.to.x, q.to.y),
            PathCommand::CurveTo(c) => {
                self.curve_to(c.pt1.x, c.pt1.y, c.pt2.x, c.pt2.y, c.to.x, c.to.y)
            }
            PathCommand::Arc(a) => self.arc_to(
                a.r.0,
                a.r.1,
                a.x_axis_rotation,
                a.large_arc,
                a.sweep,
                a.to.x,
                a.to.y,
            ),
            PathCommand::ClosePath => self.close_path(),
        }
    }

    /// Adds an already normalized command, only tracking the pen position.
    fn push_verbatim(&mut self, cmd: PathCommand) {
        match cmd {
            PathCommand::MoveTo(p) => {
                self.start = p;
                self.current = p;
            }
            PathCommand::ClosePath => self.current = self.start,
            _ => {
                if let Some(p) = cmd.end_point() {
                    self.current = p;
                }
            }
        }

        self.path_commands.push(cmd);
    }

    /// Adds the subpaths of `other` after the ones in this builder.
    ///
    /// The first subpath of `other` always starts a new subpath here.
    pub fn append(&mut self, other: &Path) -> &mut Self {
        for cmd in other.iter() {
            self.push_verbatim(cmd);
        }
        self
    }

    /// Continues the current subpath with the commands of `other`.
    ///
    /// The leading MoveTo of `other` is dropped, so its first drawing command starts
    /// at this builder's current point.  Any later subpaths of `other` stay separate.
    /// Joining a path without drawing commands does nothing, and joining onto an
    /// empty builder is the same as appending.
    pub fn join(&mut self, other: &Path) -> &mut Self {
        if other.is_empty() {
            return self;
        }

        if self.path_commands.is_empty() {
            return self.append(other);
        }

        let mut commands = other.iter().peekable();
        if let Some(PathCommand::MoveTo(_)) = commands.peek() {
            commands.next();
        }

        for cmd in commands {
            self.push_command(cmd);
        }

        self
    }
}

impl From<&Path> for PathBuilder {
    fn from(path: &Path) -> PathBuilder {
        let mut builder = PathBuilder::default();
        builder.append(path);
        builder
    }
}

/// Point at angle `theta` on an ellipse centered at the origin.
fn ellipse_point(rx: f64, ry: f64, phi: f64, theta: f64) -> Point {
    Point::new(rx * theta.cos(), ry * theta.sin()).rotate(phi)
}

/// How much the radii of an arc fall short of spanning its chord; values above 1
/// mean the radii must be scaled up by the square root of this.
fn radii_scale(from: Point, to: Point, rx: f64, ry: f64, x_axis_rotation: f64) -> f64 {
    let (sin_phi, cos_phi) = x_axis_rotation.to_radians().sin_cos();
    let mid = (from - to) / 2.0;
    let x1_ = cos_phi * mid.x + sin_phi * mid.y;
    let y1_ = -sin_phi * mid.x + cos_phi * mid.y;

    (x1_ / rx).powi(2) + (y1_ / ry).powi(2)
}

/// An iterator over the subpaths of a `Path`.
pub struct SubPathIter<'a> {
    path: &'a Path,
    index: usize,
    coords_start: usize,
}

/// A slice of commands and coordinates with a single `MoveTo` at the beginning.
pub struct SubPath<'a> {
    commands: &'a [PackedCommand],
    coords: &'a [f64],
}

/// An iterator over the commands/coordinates of a subpath.
pub struct SubPathCommandsIter<'a> {
    commands_iter: slice::Iter<'a, PackedCommand>,
    coords_iter: slice::Iter<'a, f64>,
}

impl<'a> SubPath<'a> {
    /// Returns an iterator over the subpath's commands.
    pub fn iter_commands(&self) -> SubPathCommandsIter<'_> {
        SubPathCommandsIter {
            commands_iter: self.commands.iter(),
            coords_iter: self.coords.iter(),
        }
    }

    /// The point of the MoveTo that starts the subpath.
    pub fn origin(&self) -> Point {
        Point::new(self.coords[0], self.coords[1])
    }

    /// Whether the subpath ends with a ClosePath.
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PackedCommand::ClosePath))
    }

    /// Whether the subpath has any command besides its MoveTo and ClosePath.
    pub fn has_drawing(&self) -> bool {
        self.commands
            .iter()
            .any(|c| !matches!(c, PackedCommand::MoveTo | PackedCommand::ClosePath))
    }

    /// Where the pen is after the last drawing command of the subpath.
    pub fn end_point(&self) -> Point {
        self.iter_commands()
            .filter_map(|cmd| cmd.end_point())
            .last()
            .unwrap_or_else(|| self.origin())
    }

    /// Copies this subpath into a path of its own.
    pub fn to_path(&self) -> Path {
        Path {
            commands: self.commands.into(),
            coords: self.coords.into(),
            subpath_starts: Box::new([0]),
        }
    }
}

impl<'a> Iterator for SubPathIter<'a> {
    type Item = SubPath<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let starts = &self.path.subpath_starts;
        let start = *starts.get(self.index)?;
        let end = starts
            .get(self.index + 1)
            .copied()
            .unwrap_or(self.path.commands.len());
        self.index += 1;

        let commands = &self.path.commands[start..end];
        let num_coords: usize = commands.iter().map(PackedCommand::num_coordinates).sum();
        let coords = &self.path.coords[self.coords_start..self.coords_start + num_coords];
        self.coords_start += num_coords;

        Some(SubPath { commands, coords })
    }
}

impl<'a> Iterator for SubPathCommandsIter<'a> {
    type Item = PathCommand;

    fn next(&mut self) -> Option<Self::Item> {
        self.commands_iter
            .next()
            .map(|packed| PathCommand::from_packed(*packed, &mut self.coords_iter))
    }
}

impl Path {
    /// Parses path data in SVG syntax.
    ///
    /// No partial path is returned when the data has an error.
    pub fn parse(path_str: &str) -> Result<Path, ParseError> {
        let mut builder = PathBuilder::default();
        builder.parse(path_str)?;
        Ok(builder.into_path())
    }

    /// Get an iterator over a path `Subpath`s.
    pub fn iter_subpath(&self) -> SubPathIter<'_> {
        SubPathIter {
            path: self,
            index: 0,
            coords_start: 0,
        }
    }

    /// Get an iterator over a path's commands.
    pub fn iter(&self) -> impl Iterator<Item = PathCommand> + '_ {
        let commands = self.commands.iter();
        let mut coords = self.coords.iter();

        commands.map(move |cmd| PathCommand::from_packed(*cmd, &mut coords))
    }

    /// Returns whether the path draws nothing: it has no commands other than
    /// MoveTo and ClosePath.
    pub fn is_empty(&self) -> bool {
        self.commands
            .iter()
            .all(|c| matches!(c, PackedCommand::MoveTo | PackedCommand::ClosePath))
    }

    /// Returns whether there are no commands at all in the path.
    pub fn has_no_commands(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether the last subpath ends with a ClosePath.
    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PackedCommand::ClosePath))
    }

    pub fn num_commands(&self) -> usize {
        self.commands.len()
    }

    pub fn num_subpaths(&self) -> usize {
        self.subpath_starts.len()
    }

    /// The start point of the first subpath, or the origin for an empty path.
    pub fn start_point(&self) -> Point {
        self.iter_subpath()
            .next()
            .map(|s| s.origin())
            .unwrap_or(Point::ZERO)
    }

    /// The pen position after the last command, or the origin for an empty path.
    pub fn current_point(&self) -> Point {
        match self.iter_subpath().last() {
            Some(subpath) if subpath.is_closed() => subpath.origin(),
            Some(subpath) => subpath.end_point(),
            None => Point::ZERO,
        }
    }
}

impl FromStr for Path {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Path, ParseError> {
        Path::parse(s)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Path) -> bool {
        self.to_string() == other.to_string()
    }
}

fn take_one(iter: &mut slice::Iter<'_, f64>) -> f64 {
    *iter.next().unwrap()
}

fn take_two(iter: &mut slice::Iter<'_, f64>) -> Point {
    Point::new(take_one(iter), take_one(iter))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn empty_builder() {
        let builder = PathBuilder::default();
        let path = builder.into_path();
        assert!(path.is_empty());
        assert!(path.has_no_commands());
        assert_eq!(path.iter().count(), 0);
    }

    #[test]
    fn empty_path() {
        let path = Path::default();
        assert!(path.is_empty());
        assert!(!path.is_closed());
        assert_eq!(path.iter().count(), 0);
        assert_eq!(path.num_subpaths(), 0);
    }

    #[test]
    fn all_commands() {
        let mut builder = PathBuilder::default();
        builder
            .move_to(42.0, 43.0)
            .line_to(44.0, 43.0)
            .quad_to(45.0, 44.0, 46.0, 43.0)
            .curve_to(42.0, 43.0, 44.0, 45.0, 46.0, 47.0)
            .arc_to(
                44.0,
                45.0,
                46.0,
                LargeArc(true),
                Sweep::Positive,
                47.0,
                48.0,
            )
            .close_path();
        let path = builder.into_path();

        let commands: Vec<PathCommand> = path.iter().collect();
        assert_eq!(commands.len(), 6);
        assert_eq!(commands[0], PathCommand::MoveTo(p(42.0, 43.0)));
        assert_eq!(commands[1], PathCommand::LineTo(p(44.0, 43.0)));
        assert_eq!(
            commands[2],
            PathCommand::QuadTo(QuadraticBezierCurve {
                pt1: p(45.0, 44.0),
                to: p(46.0, 43.0),
            })
        );
        assert_eq!(
            commands[3],
            PathCommand::CurveTo(CubicBezierCurve {
                pt1: p(42.0, 43.0),
                pt2: p(44.0, 45.0),
                to: p(46.0, 47.0),
            })
        );

        // rx < ry gets swapped, with 90 degrees added to the rotation
        match commands[4] {
            PathCommand::Arc(arc) => {
                assert_eq!(arc.r, (45.0, 44.0));
                assert!(arc.x_axis_rotation.approx_eq_path(136.0));
                assert_eq!(arc.from, p(46.0, 47.0));
                assert_eq!(arc.to, p(47.0, 48.0));
                assert_eq!(arc.large_arc, LargeArc(true));
                assert_eq!(arc.sweep, Sweep::Positive);
            }
            _ => panic!("expected an arc"),
        }

        assert_eq!(commands[5], PathCommand::ClosePath);
        assert!(path.is_closed());
    }

    #[test]
    fn drawing_without_move_to_starts_at_origin() {
        let mut builder = PathBuilder::default();
        builder.line_to(10.0, 0.0);
        let path = builder.into_path();

        assert!(path.iter().eq(vec![
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::LineTo(p(10.0, 0.0)),
        ]));
    }

    #[test]
    fn drawing_after_close_starts_at_subpath_start() {
        let mut builder = PathBuilder::default();
        builder
            .move_to(5.0, 5.0)
            .line_to(10.0, 5.0)
            .close_path()
            .line_to(20.0, 20.0);
        let path = builder.into_path();

        assert_eq!(path.num_subpaths(), 2);
        assert!(path.iter().eq(vec![
            PathCommand::MoveTo(p(5.0, 5.0)),
            PathCommand::LineTo(p(10.0, 5.0)),
            PathCommand::ClosePath,
            PathCommand::MoveTo(p(5.0, 5.0)),
            PathCommand::LineTo(p(20.0, 20.0)),
        ]));
        assert_eq!(path.current_point(), p(20.0, 20.0));
    }

    #[test]
    fn degenerate_commands_are_normalized() {
        let mut builder = PathBuilder::default();
        builder
            .move_to(0.0, 0.0)
            .line_to(0.0, 0.0)
            .quad_to(0.0, 0.0, 10.0, 0.0)
            .quad_to(20.0, 0.0, 20.0, 0.0)
            .curve_to(20.0, 0.0, 30.0, 0.0, 30.0, 0.0)
            .arc_to(5.0, 5.0, 0.0, LargeArc(false), Sweep::Positive, 30.0, 0.0)
            .arc_to(0.0, 5.0, 0.0, LargeArc(false), Sweep::Positive, 40.0, 0.0)
            .close_path()
            .close_path();
        let path = builder.into_path();

        assert!(path.iter().eq(vec![
            PathCommand::MoveTo(p(0.0, 0.0)),
            PathCommand::LineTo(p(10.0, 0.0)),
            PathCommand::LineTo(p(20.0, 0.0)),
            PathCommand::LineTo(p(30.0, 0.0)),
            PathCommand::LineTo(p(40.0, 0.0)),
            PathCommand::ClosePath,
        ]));
    }

    #[test]
    fn arc_radii_are_canonicalized() {
        let mut builder = PathBuilder::default();
        builder.arc_to(-1.0, 2.0, 0.0, LargeArc(true), Sweep::Positive, 4.0, 0.0);
        let path = builder.into_path();

        match path.iter().nth(1) {
            Some(PathCommand::Arc(arc)) => {
                assert!(arc.r.0.approx_eq_path(4.0));
                assert!(arc.r.1.approx_eq_path(2.0));
                assert!(arc.x_axis_rotation.approx_eq_path(90.0));
            }
            _ => panic!("expected an arc"),
        };
    }

    #[test]
    fn close_on_empty_builder() {
        let mut builder = PathBuilder::default();
        builder.close_path();
        let path = builder.into_path();

        assert!(path
            .iter()
            .eq(vec![PathCommand::MoveTo(p(0.0, 0.0)), PathCommand::ClosePath]));
        assert!(path.is_empty());
        assert!(path.is_closed());
    }

    #[test]
    fn subpath_iter() {
        let mut builder = PathBuilder::default();
        builder.move_to(42.0, 43.0);
        builder.line_to(44.0, 43.0);
        builder.close_path();

        builder.move_to(22.0, 22.0);
        builder.curve_to(22.0, 22.0, 44.0, 45.0, 46.0, 47.0);

        builder.move_to(69.0, 69.0);
        builder.line_to(42.0, 43.0);
        let path = builder.into_path();

        let subpaths = path
            .iter_subpath()
            .map(|subpath| {
                (
                    subpath.origin(),
                    subpath.iter_commands().collect::<Vec<PathCommand>>(),
                )
            })
            .collect::<Vec<(Point, Vec<PathCommand>)>>();

        assert_eq!(
            subpaths,
            vec![
                (
                    p(42.0, 43.0),
                    vec![
                        PathCommand::MoveTo(p(42.0, 43.0)),
                        PathCommand::LineTo(p(44.0, 43.0)),
                        PathCommand::ClosePath
                    ]
                ),
                (
                    p(22.0, 22.0),
                    vec![
                        PathCommand::MoveTo(p(22.0, 22.0)),
                        PathCommand::CurveTo(CubicBezierCurve {
                            pt1: p(22.0, 22.0),
                            pt2: p(44.0, 45.0),
                            to: p(46.0, 47.0)
                        })
                    ]
                ),
                (
                    p(69.0, 69.0),
                    vec![
                        PathCommand::MoveTo(p(69.0, 69.0)),
                        PathCommand::LineTo(p(42.0, 43.0))
                    ]
                )
            ]
        );
    }

    #[test]
    fn append_starts_new_subpath() {
        let mut builder = PathBuilder::default();
        builder.line_to(10.0, 0.0);
        builder.append(&Path::parse("L20 0").unwrap());
        let path = builder.into_path();

        assert_eq!(path.num_subpaths(), 2);
        assert_eq!(path.to_string(), "L10 0M0 0L20 0");
    }

    #[test]
    fn join_continues_current_subpath() {
        let mut builder = PathBuilder::default();
        builder.move_to(0.0, 0.0).line_to(10.0, 0.0);
        builder.join(&Path::parse("M50 50L10 10M3 3L4 4").unwrap());
        let path = builder.into_path();

        assert_eq!(path.to_string(), "L10 0L10 10M3 3L4 4");
    }

    #[test]
    fn join_with_empty_paths() {
        let mut builder = PathBuilder::default();
        builder.line_to(10.0, 0.0);
        builder.join(&Path::default());
        builder.join(&Path::parse("M5 5z").unwrap());
        assert_eq!(builder.clone().into_path().to_string(), "L10 0");

        let mut empty = PathBuilder::default();
        empty.join(&Path::parse("M5 5L6 6").unwrap());
        assert_eq!(empty.into_path().to_string(), "M5 5L6 6");
    }

    #[test]
    fn arc_by_angles() {
        let mut a = PathBuilder::default();
        a.arc(2.0, 1.0, 0.0, 180.0, 0.0);
        let mut b = PathBuilder::default();
        b.arc_to(2.0, 1.0, 0.0, LargeArc(false), Sweep::Negative, 4.0, 0.0);
        assert_eq!(a.into_path(), b.into_path());

        let mut full = PathBuilder::default();
        full.arc(2.0, 1.0, 0.0, 180.0, -180.0);
        assert_eq!(full.into_path().num_commands(), 3);

        let mut more = PathBuilder::default();
        more.arc(2.0, 1.0, 0.0, 540.0, 0.0);
        assert_eq!(more.into_path().num_commands(), 4);
    }

    #[test]
    fn arc_to_curves_ends_at_end_point() {
        let arc = EllipticalArc {
            r: (5.0, 5.0),
            x_axis_rotation: 0.0,
            large_arc: LargeArc(false),
            sweep: Sweep::Positive,
            from: p(0.0, 0.0),
            to: p(10.0, 0.0),
        };

        let curves = arc.to_curves();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[1].to, p(10.0, 0.0));
        assert!(curves[0].to.x.approx_eq_path(5.0));
        assert!((curves[0].to.y.abs() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn path_from_str_and_equality() {
        let a: Path = "M0 0L10 0".parse().unwrap();
        let b = Path::parse("L10 0").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, Path::parse("L10 1").unwrap());
    }
}
