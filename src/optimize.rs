//! Removing redundant commands from paths.

use crate::path_builder::{
    CubicBezierCurve, Path, PathBuilder, PathCommand, QuadraticBezierCurve,
};
use crate::point::Point;
use crate::tolerance::Tolerance;

/// Distance of `p` from the line through `a` and `b`.
fn distance_to_line(p: Point, a: Point, b: Point) -> f64 {
    let d = b - a;
    let len = d.length();

    if len == 0.0 {
        p.distance(a)
    } else {
        d.cross(p - a).abs() / len
    }
}

/// Whether `p` lies on the segment from `a` to `b`, within `epsilon`.
fn on_segment(p: Point, a: Point, b: Point, epsilon: f64) -> bool {
    let d = b - a;
    let len2 = d.length_squared();

    if len2 == 0.0 {
        return p.near(a, epsilon);
    }

    let t = (p - a).dot(d) / len2;
    distance_to_line(p, a, b) <= epsilon && t >= -epsilon && t <= 1.0 + epsilon
}

/// Whether going from `a` to `b` and then on to `c` is a straight run without
/// turning back.
fn continues_straight(a: Point, b: Point, c: Point, epsilon: f64) -> bool {
    distance_to_line(b, a, c) <= epsilon && (b - a).dot(c - b) > 0.0
}

/// A drawing command with the point where it starts.
#[derive(Debug, Copy, Clone)]
struct Step {
    from: Point,
    cmd: PathCommand,
}

impl Step {
    fn to(&self) -> Point {
        self.cmd.end_point().unwrap_or(self.from)
    }

    fn is_line(&self) -> bool {
        matches!(self.cmd, PathCommand::LineTo(_))
    }
}

/// Simplifies a single drawing command; `None` if it draws nothing.
fn simplify(from: Point, cmd: PathCommand, epsilon: f64) -> Option<PathCommand> {
    match cmd {
        PathCommand::LineTo(to) if to.near(from, epsilon) => None,

        PathCommand::QuadTo(QuadraticBezierCurve { pt1, to }) => {
            if to.near(from, epsilon) && pt1.near(from, epsilon) {
                None
            } else if on_segment(pt1, from, to, epsilon) {
                Some(PathCommand::LineTo(to))
            } else {
                Some(cmd)
            }
        }

        PathCommand::CurveTo(CubicBezierCurve { pt1, pt2, to }) => {
            if to.near(from, epsilon) && pt1.near(from, epsilon) && pt2.near(from, epsilon) {
                None
            } else if on_segment(pt1, from, to, epsilon) && on_segment(pt2, from, to, epsilon) {
                Some(PathCommand::LineTo(to))
            } else {
                Some(cmd)
            }
        }

        PathCommand::Arc(arc) if arc.to.near(from, epsilon) => None,

        _ => Some(cmd),
    }
}

impl Path {
    /// Removes commands that do not change the shape of the path, using the
    /// default tolerance.
    pub fn optimize(&self) -> Path {
        self.optimize_with_tolerance(&Tolerance::default())
    }

    /// Removes commands that do not change the shape of the path.
    ///
    /// This drops subpaths that draw nothing and segments of zero length, turns
    /// curves whose control points lie on their chord into lines, and merges
    /// consecutive lines running in the same direction.  In a closed subpath,
    /// trailing lines that end at the start point or run along the closing line
    /// are left to the ClosePath.
    pub fn optimize_with_tolerance(&self, tolerance: &Tolerance) -> Path {
        let epsilon = tolerance.epsilon;
        let mut builder = PathBuilder::default();

        for subpath in self.iter_subpath() {
            if !subpath.has_drawing() {
                continue;
            }

            let origin = subpath.origin();
            let mut steps: Vec<Step> = Vec::new();
            let mut current = origin;

            for cmd in subpath.iter_commands() {
                if matches!(cmd, PathCommand::MoveTo(_) | PathCommand::ClosePath) {
                    continue;
                }

                let Some(cmd) = simplify(current, cmd, epsilon) else {
                    continue;
                };

                let step = Step { from: current, cmd };
                current = step.to();

                match steps.last_mut() {
                    Some(prev)
                        if prev.is_line()
                            && step.is_line()
                            && continues_straight(prev.from, prev.to(), current, epsilon) =>
                    {
                        prev.cmd = PathCommand::LineTo(current);
                    }

                    _ => steps.push(step),
                }
            }

            if subpath.is_closed() {
                while let Some(last) = steps.last() {
                    let redundant = last.is_line()
                        && (last.to().near(origin, epsilon)
                            || continues_straight(last.from, last.to(), origin, epsilon));

                    if redundant {
                        steps.pop();
                    } else {
                        break;
                    }
                }
            }

            if steps.is_empty() {
                continue;
            }

            builder.move_to(origin.x, origin.y);
            for step in &steps {
                builder.push_command(step.cmd);
            }
            if subpath.is_closed() {
                builder.close_path();
            }
        }

        builder.into_path()
    }
}
