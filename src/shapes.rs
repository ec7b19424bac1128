//! Paths for common shapes.
//!
//! All shapes are placed around the origin and run counter-clockwise, that is,
//! in the positive angular direction.  Transform them to move them elsewhere.

use std::f64::consts::PI;

use crate::path_builder::{LargeArc, Path, PathBuilder, Sweep};

/// A rectangle with one corner at the origin and the opposite one at `(w, h)`.
///
/// Returns an empty path if either side is not positive.
pub fn rectangle(w: f64, h: f64) -> Path {
    let mut builder = PathBuilder::default();

    if w <= 0.0 || h <= 0.0 {
        return builder.into_path();
    }

    builder
        .move_to(0.0, 0.0)
        .line_to(w, 0.0)
        .line_to(w, h)
        .line_to(0.0, h)
        .close_path();

    builder.into_path()
}

/// A rectangle like [`rectangle`] with its corners rounded off by circular arcs
/// of radius `r`.
///
/// The radius is reduced to half of the shorter side if it is larger than that.
pub fn rounded_rectangle(w: f64, h: f64, r: f64) -> Path {
    if w <= 0.0 || h <= 0.0 {
        return Path::default();
    }

    let r = r.min(w / 2.0).min(h / 2.0);
    if r <= 0.0 {
        return rectangle(w, h);
    }

    let mut builder = PathBuilder::default();

    builder.move_to(r, 0.0).line_to(w - r, 0.0);
    corner(&mut builder, r, w, r);
    builder.line_to(w, h - r);
    corner(&mut builder, r, w - r, h);
    builder.line_to(r, h);
    corner(&mut builder, r, 0.0, h - r);
    builder.line_to(0.0, r);
    corner(&mut builder, r, r, 0.0);
    builder.close_path();

    builder.into_path()
}

fn corner(builder: &mut PathBuilder, r: f64, x: f64, y: f64) {
    builder.arc_to(r, r, 0.0, LargeArc(false), Sweep::Positive, x, y);
}

/// An ellipse centered on the origin with radii `rx` along the x axis and `ry`
/// along the y axis.
///
/// Returns an empty path if either radius is not positive.
pub fn ellipse(rx: f64, ry: f64) -> Path {
    let mut builder = PathBuilder::default();

    if rx <= 0.0 || ry <= 0.0 {
        return builder.into_path();
    }

    builder
        .move_to(rx, 0.0)
        .arc_to(rx, ry, 0.0, LargeArc(false), Sweep::Positive, -rx, 0.0)
        .arc_to(rx, ry, 0.0, LargeArc(false), Sweep::Positive, rx, 0.0)
        .close_path();

    builder.into_path()
}

/// A circle of radius `r` centered on the origin.
pub fn circle(r: f64) -> Path {
    ellipse(r, r)
}

/// A regular polygon with `n` vertices on a circle of radius `r` around the
/// origin.
///
/// With `up`, one vertex points straight up along the y axis; otherwise the
/// polygon is turned by half a step so that an edge lies across the top.
/// Returns an empty path for fewer than three vertices or a radius that is not
/// positive.
pub fn regular_polygon(n: usize, r: f64, up: bool) -> Path {
    let mut builder = PathBuilder::default();

    if n < 3 || r <= 0.0 {
        return builder.into_path();
    }

    let step = 2.0 * PI / n as f64;
    let first = if up { PI / 2.0 } else { PI / 2.0 + step / 2.0 };

    for i in 0..n {
        let theta = first + step * i as f64;
        let (x, y) = (r * theta.cos(), r * theta.sin());

        if i == 0 {
            builder.move_to(x, y);
        } else {
            builder.line_to(x, y);
        }
    }

    builder.close_path();
    builder.into_path()
}
