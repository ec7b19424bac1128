//! Rewriting the segments of a path.
//!
//! [`Path::replace`] hands each segment to a callback and splices the returned
//! path in its place.  Curve flattening and arc removal are built on the same
//! walk over the commands.

use crate::float_eq::ApproxEqPath;
use crate::path_builder::{CubicBezierCurve, EllipticalArc, Path, PathBuilder, PathCommand};
use crate::point::Point;
use crate::segment::Segment;
use crate::tolerance::Tolerance;

/// Replacement for a line from the first point to the second.
pub type LineReplacer<'a> = &'a dyn Fn(Point, Point) -> Path;

/// Replacement for a cubic curve starting at the given point.  Quadratic curves
/// are passed in as their equivalent cubic.
pub type BezierReplacer<'a> = &'a dyn Fn(Point, &CubicBezierCurve) -> Path;

/// Replacement for an elliptical arc.
pub type ArcReplacer<'a> = &'a dyn Fn(&EllipticalArc) -> Path;

/// Adds `replacement` at the current point of `builder`.
///
/// A leading MoveTo to the current point is dropped so that the replacement
/// continues the subpath; a MoveTo elsewhere starts a new subpath.
fn splice(builder: &mut PathBuilder, replacement: &Path) {
    let mut commands = replacement.iter().peekable();

    if let Some(PathCommand::MoveTo(p)) = commands.peek() {
        if !builder.is_empty() && p.approx_eq_path(builder.current_point()) {
            commands.next();
        }
    }

    for cmd in commands {
        builder.push_command(cmd);
    }
}

impl Path {
    /// Replaces lines, Bézier curves and arcs by the paths returned from the
    /// given callbacks.
    ///
    /// Each callback receives its segment starting at the end of what has been
    /// built so far, which differs from the original start point when an
    /// earlier replacement moved the pen.  The closing line of a closed
    /// subpath counts as a line; the ClosePath itself is kept.  Segment kinds
    /// without a callback are copied unchanged.
    pub fn replace(
        &self,
        line: Option<LineReplacer<'_>>,
        bezier: Option<BezierReplacer<'_>>,
        arc: Option<ArcReplacer<'_>>,
    ) -> Path {
        let mut builder = PathBuilder::default();

        // start and pen position in the original path
        let mut start = Point::ZERO;
        let mut current = Point::ZERO;

        for cmd in self.iter() {
            let from = builder.current_point();

            match cmd {
                PathCommand::MoveTo(p) => {
                    builder.move_to(p.x, p.y);
                    start = p;
                }

                PathCommand::LineTo(p) => match line {
                    Some(f) => splice(&mut builder, &f(from, p)),
                    None => {
                        builder.line_to(p.x, p.y);
                    }
                },

                PathCommand::QuadTo(q) => match bezier {
                    Some(f) => splice(&mut builder, &f(from, &q.to_cubic(from))),
                    None => {
                        builder.quad_to(q.pt1.x, q.pt1.y, q.to.x, q.to.y);
                    }
                },

                PathCommand::CurveTo(c) => match bezier {
                    Some(f) => splice(&mut builder, &f(from, &c)),
                    None => {
                        builder.curve_to(c.pt1.x, c.pt1.y, c.pt2.x, c.pt2.y, c.to.x, c.to.y);
                    }
                },

                PathCommand::Arc(a) => match arc {
                    Some(f) => splice(&mut builder, &f(&EllipticalArc { from, ..a })),
                    None => {
                        builder.push_command(cmd);
                    }
                },

                PathCommand::ClosePath => {
                    if let Some(f) = line {
                        if !current.approx_eq_path(start) {
                            splice(&mut builder, &f(from, start));
                        }
                    }
                    builder.close_path();
                }
            }

            current = match cmd {
                PathCommand::ClosePath => start,
                _ => cmd.end_point().unwrap_or(current),
            };
        }

        builder.into_path()
    }

    /// Replaces curves and arcs by polylines within the default flatness.
    pub fn flatten(&self) -> Path {
        self.flatten_with_tolerance(&Tolerance::default())
    }

    /// Replaces curves and arcs by polylines that stay within
    /// `tolerance.flatness` of them.
    pub fn flatten_with_tolerance(&self, tolerance: &Tolerance) -> Path {
        let mut builder = PathBuilder::default();
        let mut points = Vec::new();

        for cmd in self.iter() {
            let from = builder.current_point();

            let segment = match cmd {
                PathCommand::QuadTo(q) => Some(Segment::Quad {
                    from,
                    ctrl: q.pt1,
                    to: q.to,
                }),

                PathCommand::CurveTo(c) => Some(Segment::Cubic {
                    from,
                    ctrl1: c.pt1,
                    ctrl2: c.pt2,
                    to: c.to,
                }),

                PathCommand::Arc(a) => Segment::from_arc(&EllipticalArc { from, ..a }),

                _ => None,
            };

            match segment {
                Some(segment) => {
                    points.clear();
                    segment.flatten(tolerance.flatness, &mut points);
                    for p in &points {
                        builder.line_to(p.x, p.y);
                    }
                }

                None => {
                    builder.push_command(cmd);
                }
            }
        }

        builder.into_path()
    }

    /// Replaces arcs by cubic Bézier curves.
    pub fn replace_arcs(&self) -> Path {
        let to_curves = |a: &EllipticalArc| {
            let mut builder = PathBuilder::default();
            builder.move_to(a.from.x, a.from.y);
            for c in a.to_curves() {
                builder.curve_to(c.pt1.x, c.pt1.y, c.pt2.x, c.pt2.y, c.to.x, c.to.y);
            }
            builder.into_path()
        };

        self.replace(None, None, Some(&to_curves))
    }
}
