//! Geometry of single path segments.
//!
//! A [`Segment`] is a drawing command together with the point where it starts, so
//! that it can be evaluated on its own.  Each segment is parameterized by `t` in
//! `[0, 1]`; for arcs, `t` is linear in the ellipse angle.

use std::f64::consts::*;

use crate::float_eq::ApproxEqPath;
use crate::path_builder::{
    ArcParameterization, EllipticalArc, LargeArc, PathBuilder, PathCommand, SubPath,
};
use crate::point::Point;
use crate::polynomial::{integrate, solve_quadratic};
use crate::rect::Rect;

/// An elliptical arc with both of its parameterizations.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ArcSegment {
    /// The arc in endpoint form, as it appears in a path.
    pub arc: EllipticalArc,
    pub center: Point,
    /// Radii after scaling them up to span the chord.
    pub radii: (f64, f64),
    /// Rotation of the ellipse's x axis, in radians.
    pub phi: f64,
    /// Ellipse angle of the start point.
    pub theta1: f64,
    /// Signed angle swept from the start point to the end point.
    pub delta_theta: f64,
}

impl ArcSegment {
    /// Point on the ellipse at the given angle.
    pub fn point_at_angle(&self, theta: f64) -> Point {
        let (rx, ry) = self.radii;
        self.center + Point::new(rx * theta.cos(), ry * theta.sin()).rotate(self.phi)
    }

    fn angle_at(&self, t: f64) -> f64 {
        self.theta1 + t * self.delta_theta
    }

    /// Whether the angle is swept over by the arc.
    fn contains_angle(&self, theta: f64) -> bool {
        let d = if self.delta_theta >= 0.0 {
            (theta - self.theta1).rem_euclid(2.0 * PI)
        } else {
            (self.theta1 - theta).rem_euclid(2.0 * PI)
        };

        d <= self.delta_theta.abs()
    }

    /// The part of the arc between two parameters.
    fn sub_arc(&self, t0: f64, t1: f64) -> ArcSegment {
        let theta1 = self.angle_at(t0);
        let delta_theta = (t1 - t0) * self.delta_theta;

        let from = if t0 <= 0.0 {
            self.arc.from
        } else {
            self.point_at_angle(theta1)
        };

        let to = if t1 >= 1.0 {
            self.arc.to
        } else {
            self.point_at_angle(theta1 + delta_theta)
        };

        ArcSegment {
            arc: EllipticalArc {
                r: self.radii,
                large_arc: LargeArc(delta_theta.abs() > PI),
                from,
                to,
                ..self.arc
            },
            theta1,
            delta_theta,
            ..*self
        }
    }

    /// Whether the arc is part of a circle.
    pub fn is_circular(&self) -> bool {
        (self.radii.0 - self.radii.1).abs() <= self.radii.0 * 1e-10
    }
}

/// A path segment with its start point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Segment {
    Line {
        from: Point,
        to: Point,
    },
    Quad {
        from: Point,
        ctrl: Point,
        to: Point,
    },
    Cubic {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Arc(ArcSegment),
}

impl Segment {
    /// Converts an arc to a segment.
    ///
    /// An arc that cannot be drawn as an ellipse becomes a line, or nothing at all
    /// when its endpoints coincide.
    pub fn from_arc(arc: &EllipticalArc) -> Option<Segment> {
        match arc.center_parameterization() {
            ArcParameterization::CenterParameters {
                center,
                radii,
                theta1,
                delta_theta,
            } => Some(Segment::Arc(ArcSegment {
                arc: *arc,
                center,
                radii,
                phi: arc.x_axis_rotation.to_radians(),
                theta1,
                delta_theta,
            })),

            ArcParameterization::LineTo => Some(Segment::Line {
                from: arc.from,
                to: arc.to,
            }),

            ArcParameterization::Omit => None,
        }
    }

    pub fn start(&self) -> Point {
        match *self {
            Segment::Line { from, .. }
            | Segment::Quad { from, .. }
            | Segment::Cubic { from, .. } => from,
            Segment::Arc(ref a) => a.arc.from,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Segment::Line { to, .. } | Segment::Quad { to, .. } | Segment::Cubic { to, .. } => to,
            Segment::Arc(ref a) => a.arc.to,
        }
    }

    /// The point at parameter `t`.
    pub fn eval(&self, t: f64) -> Point {
        if t <= 0.0 {
            return self.start();
        }
        if t >= 1.0 {
            return self.end();
        }

        let mt = 1.0 - t;

        match *self {
            Segment::Line { from, to } => from.lerp(to, t),

            Segment::Quad { from, ctrl, to } => from * (mt * mt) + ctrl * (2.0 * mt * t) + to * (t * t),

            Segment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                from * (mt * mt * mt)
                    + ctrl1 * (3.0 * mt * mt * t)
                    + ctrl2 * (3.0 * mt * t * t)
                    + to * (t * t * t)
            }

            Segment::Arc(ref a) => a.point_at_angle(a.angle_at(t)),
        }
    }

    /// The derivative of the position with respect to `t`.
    pub fn deriv(&self, t: f64) -> Point {
        let mt = 1.0 - t;

        match *self {
            Segment::Line { from, to } => to - from,

            Segment::Quad { from, ctrl, to } => (ctrl - from) * (2.0 * mt) + (to - ctrl) * (2.0 * t),

            Segment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                (ctrl1 - from) * (3.0 * mt * mt)
                    + (ctrl2 - ctrl1) * (6.0 * mt * t)
                    + (to - ctrl2) * (3.0 * t * t)
            }

            Segment::Arc(ref a) => {
                let theta = a.angle_at(t);
                let (rx, ry) = a.radii;
                Point::new(-rx * theta.sin(), ry * theta.cos()).rotate(a.phi) * a.delta_theta
            }
        }
    }

    /// Second derivative with respect to `t`.
    pub fn deriv2(&self, t: f64) -> Point {
        match *self {
            Segment::Line { .. } => Point::ZERO,

            Segment::Quad { from, ctrl, to } => (from - ctrl * 2.0 + to) * 2.0,

            Segment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                (ctrl2 - ctrl1 * 2.0 + from) * (6.0 * (1.0 - t))
                    + (to - ctrl2 * 2.0 + ctrl1) * (6.0 * t)
            }

            Segment::Arc(ref a) => {
                let theta = a.angle_at(t);
                let (rx, ry) = a.radii;
                Point::new(-rx * theta.cos(), -ry * theta.sin()).rotate(a.phi)
                    * (a.delta_theta * a.delta_theta)
            }
        }
    }

    /// Unit tangents at the start and at the end of the segment, or `None` if
    /// the segment has no direction at all.
    ///
    /// Control points that coincide with an endpoint are skipped over, so that a
    /// curve whose first control point sits on its start point still gets the
    /// direction in which it leaves that point.
    pub fn directionalities(&self) -> Option<(Point, Point)> {
        match *self {
            Segment::Line { from, to } => {
                if from.approx_eq_path(to) {
                    None
                } else {
                    let d = (to - from).normalize();
                    Some((d, d))
                }
            }

            Segment::Quad { from, ctrl, to } => {
                Segment::Cubic {
                    from,
                    ctrl1: ctrl,
                    ctrl2: ctrl,
                    to,
                }
                .directionalities()
            }

            Segment::Cubic {
                from: p1,
                ctrl1: p2,
                ctrl2: p3,
                to: p4,
            } => {
                let coincide_1_and_2 = p1.approx_eq_path(p2);
                let coincide_1_and_3 = p1.approx_eq_path(p3);
                let coincide_1_and_4 = p1.approx_eq_path(p4);
                let coincide_2_and_3 = p2.approx_eq_path(p3);
                let coincide_2_and_4 = p2.approx_eq_path(p4);
                let coincide_3_and_4 = p3.approx_eq_path(p4);

                let (v1, v2) = if coincide_1_and_2 && coincide_1_and_3 && coincide_1_and_4 {
                    return None;
                } else if coincide_1_and_2 && coincide_1_and_3 {
                    (p4 - p1, p4 - p3)
                } else if coincide_1_and_2 && coincide_3_and_4 {
                    (p4 - p1, p4 - p1)
                } else if coincide_2_and_3 && coincide_2_and_4 {
                    (p2 - p1, p4 - p1)
                } else if coincide_1_and_2 {
                    (p3 - p1, p4 - p3)
                } else if coincide_3_and_4 {
                    (p2 - p1, p4 - p2)
                } else {
                    (p2 - p1, p4 - p3)
                };

                Some((v1.normalize(), v2.normalize()))
            }

            Segment::Arc(_) => Some((self.deriv(0.0).normalize(), self.deriv(1.0).normalize())),
        }
    }

    /// Unit tangent where the segment starts.
    pub fn start_tangent(&self) -> Point {
        self.directionalities()
            .map(|(v, _)| v)
            .unwrap_or(Point::ZERO)
    }

    /// Unit tangent where the segment ends.
    pub fn end_tangent(&self) -> Point {
        self.directionalities()
            .map(|(_, v)| v)
            .unwrap_or(Point::ZERO)
    }

    fn quadrature_panels(&self) -> usize {
        match *self {
            Segment::Line { .. } => 1,
            Segment::Quad { .. } => 4,
            Segment::Cubic { .. } => 8,
            Segment::Arc(ref a) => ((a.delta_theta.abs() / FRAC_PI_4).ceil() as usize).max(2),
        }
    }

    /// Speed of the parameterization at `t`.
    pub fn speed(&self, t: f64) -> f64 {
        self.deriv(t).length()
    }

    /// Arc length of the whole segment.
    pub fn length(&self) -> f64 {
        self.length_to(1.0)
    }

    /// Arc length from the start of the segment to parameter `t`.
    pub fn length_to(&self, t: f64) -> f64 {
        match *self {
            Segment::Line { from, to } => from.distance(to) * t,
            Segment::Arc(ref a) if a.is_circular() => a.radii.0 * (a.delta_theta * t).abs(),
            _ => integrate(|s| self.speed(s), 0.0, t, self.quadrature_panels()),
        }
    }

    /// Tight axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        let (start, end) = (self.start(), self.end());
        let mut r = Rect::from_point(start.x, start.y).include(end.x, end.y);

        let include_t = |r: &mut Rect, t: f64| {
            if t > 0.0 && t < 1.0 {
                let p = self.eval(t);
                *r = r.include(p.x, p.y);
            }
        };

        match *self {
            Segment::Line { .. } => (),

            Segment::Quad { from, ctrl, to } => {
                let d = from - ctrl * 2.0 + to;
                if d.x != 0.0 {
                    include_t(&mut r, (from.x - ctrl.x) / d.x);
                }
                if d.y != 0.0 {
                    include_t(&mut r, (from.y - ctrl.y) / d.y);
                }
            }

            Segment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                let a = -from + ctrl1 * 3.0 - ctrl2 * 3.0 + to;
                let b = (from - ctrl1 * 2.0 + ctrl2) * 2.0;
                let c = ctrl1 - from;

                for t in solve_quadratic(a.x, b.x, c.x) {
                    include_t(&mut r, t);
                }
                for t in solve_quadratic(a.y, b.y, c.y) {
                    include_t(&mut r, t);
                }
            }

            Segment::Arc(ref arc) => {
                let (rx, ry) = arc.radii;
                let (sin_phi, cos_phi) = arc.phi.sin_cos();

                let theta_x = (-ry * sin_phi).atan2(rx * cos_phi);
                let theta_y = (ry * cos_phi).atan2(rx * sin_phi);

                for theta in [theta_x, theta_x + PI, theta_y, theta_y + PI] {
                    if arc.contains_angle(theta) {
                        let p = arc.point_at_angle(theta);
                        r = r.include(p.x, p.y);
                    }
                }
            }
        }

        r
    }

    /// Splits the segment in two at parameter `t`.
    pub fn split(&self, t: f64) -> (Segment, Segment) {
        (self.subsegment(0.0, t), self.subsegment(t, 1.0))
    }

    /// The part of the segment between parameters `t0 <= t1`.
    pub fn subsegment(&self, t0: f64, t1: f64) -> Segment {
        let t0 = t0.clamp(0.0, 1.0);
        let t1 = t1.clamp(t0, 1.0);

        match *self {
            Segment::Line { .. } => Segment::Line {
                from: self.eval(t0),
                to: self.eval(t1),
            },

            Segment::Quad { .. } | Segment::Cubic { .. } => {
                let head = if t1 < 1.0 {
                    self.split_bezier(t1).0
                } else {
                    *self
                };

                if t0 <= 0.0 {
                    head
                } else if t1 > 0.0 {
                    head.split_bezier(t0 / t1).1
                } else {
                    let p = self.start();
                    Segment::Line { from: p, to: p }
                }
            }

            Segment::Arc(ref a) => Segment::Arc(a.sub_arc(t0, t1)),
        }
    }

    /// De Casteljau subdivision of a Bézier curve.
    fn split_bezier(&self, t: f64) -> (Segment, Segment) {
        match *self {
            Segment::Quad { from, ctrl, to } => {
                let a = from.lerp(ctrl, t);
                let b = ctrl.lerp(to, t);
                let m = a.lerp(b, t);

                (
                    Segment::Quad {
                        from,
                        ctrl: a,
                        to: m,
                    },
                    Segment::Quad {
                        from: m,
                        ctrl: b,
                        to,
                    },
                )
            }

            Segment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                let a = from.lerp(ctrl1, t);
                let b = ctrl1.lerp(ctrl2, t);
                let c = ctrl2.lerp(to, t);
                let ab = a.lerp(b, t);
                let bc = b.lerp(c, t);
                let m = ab.lerp(bc, t);

                (
                    Segment::Cubic {
                        from,
                        ctrl1: a,
                        ctrl2: ab,
                        to: m,
                    },
                    Segment::Cubic {
                        from: m,
                        ctrl1: bc,
                        ctrl2: c,
                        to,
                    },
                )
            }

            _ => self.split(t),
        }
    }

    /// The same segment traversed in the opposite direction.
    pub fn reverse(&self) -> Segment {
        match *self {
            Segment::Line { from, to } => Segment::Line { from: to, to: from },

            Segment::Quad { from, ctrl, to } => Segment::Quad {
                from: to,
                ctrl,
                to: from,
            },

            Segment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => Segment::Cubic {
                from: to,
                ctrl1: ctrl2,
                ctrl2: ctrl1,
                to: from,
            },

            Segment::Arc(ref a) => Segment::Arc(ArcSegment {
                arc: a.arc.reversed(),
                theta1: a.theta1 + a.delta_theta,
                delta_theta: -a.delta_theta,
                ..*a
            }),
        }
    }

    /// Converts the segment to cubic curves; lines stay lines.
    pub fn to_cubics(&self) -> Vec<Segment> {
        match *self {
            Segment::Line { .. } | Segment::Cubic { .. } => vec![*self],

            Segment::Quad { from, ctrl, to } => vec![Segment::Cubic {
                from,
                ctrl1: from + (ctrl - from) * (2.0 / 3.0),
                ctrl2: to + (ctrl - to) * (2.0 / 3.0),
                to,
            }],

            Segment::Arc(ref a) => {
                let mut from = a.arc.from;
                a.arc
                    .to_curves()
                    .into_iter()
                    .map(|c| {
                        let seg = Segment::Cubic {
                            from,
                            ctrl1: c.pt1,
                            ctrl2: c.pt2,
                            to: c.to,
                        };
                        from = c.to;
                        seg
                    })
                    .collect()
            }
        }
    }

    /// Appends points along the segment to `out`, so that a polyline through the
    /// start point and those points stays within `flatness` of the segment.
    ///
    /// The start point is not pushed; the end point always is.
    pub fn flatten(&self, flatness: f64, out: &mut Vec<Point>) {
        const MAX_STEPS: f64 = 1000.0;

        let n = match *self {
            Segment::Line { .. } => 1.0,

            Segment::Quad { from, ctrl, to } => {
                let m = ((from - ctrl * 2.0 + to) * 2.0).length();
                (m / (8.0 * flatness)).sqrt().ceil()
            }

            Segment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                let m = 6.0
                    * (from - ctrl1 * 2.0 + ctrl2)
                        .length()
                        .max((ctrl1 - ctrl2 * 2.0 + to).length());
                (m / (8.0 * flatness)).sqrt().ceil()
            }

            Segment::Arc(ref a) => {
                let r = a.radii.0.max(a.radii.1);
                let step = if flatness >= r {
                    FRAC_PI_2
                } else {
                    2.0 * (1.0 - flatness / r).acos()
                };
                (a.delta_theta.abs() / step).ceil()
            }
        };

        let n = n.clamp(1.0, MAX_STEPS) as usize;

        for i in 1..n {
            out.push(self.eval(i as f64 / n as f64));
        }
        out.push(self.end());
    }

    /// Adds the segment to a builder whose current point is the segment's start.
    pub fn push_to(&self, builder: &mut PathBuilder) {
        match *self {
            Segment::Line { to, .. } => {
                builder.line_to(to.x, to.y);
            }

            Segment::Quad { ctrl, to, .. } => {
                builder.quad_to(ctrl.x, ctrl.y, to.x, to.y);
            }

            Segment::Cubic {
                ctrl1, ctrl2, to, ..
            } => {
                builder.curve_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y);
            }

            Segment::Arc(ref a) => {
                builder.push_command(PathCommand::Arc(a.arc));
            }
        }
    }
}

impl SubPath<'_> {
    /// The drawing segments of the subpath, in order.
    ///
    /// A closed subpath whose last point is away from its origin gets a final
    /// line back to the origin.
    pub fn segments(&self) -> Vec<Segment> {
        let origin = self.origin();
        let mut current = origin;
        let mut segments = Vec::new();

        for cmd in self.iter_commands() {
            let segment = match cmd {
                PathCommand::MoveTo(_) => None,

                PathCommand::LineTo(to) => Some(Segment::Line { from: current, to }),

                PathCommand::QuadTo(q) => Some(Segment::Quad {
                    from: current,
                    ctrl: q.pt1,
                    to: q.to,
                }),

                PathCommand::CurveTo(c) => Some(Segment::Cubic {
                    from: current,
                    ctrl1: c.pt1,
                    ctrl2: c.pt2,
                    to: c.to,
                }),

                PathCommand::Arc(a) => Segment::from_arc(&EllipticalArc { from: current, ..a }),

                PathCommand::ClosePath => {
                    if current.approx_eq_path(origin) {
                        None
                    } else {
                        Some(Segment::Line {
                            from: current,
                            to: origin,
                        })
                    }
                }
            };

            current = cmd.end_point().unwrap_or(origin);

            if let Some(s) = segment {
                segments.push(s);
            }
        }

        segments
    }
}
