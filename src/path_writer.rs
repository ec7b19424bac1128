//! Text output for paths: the canonical form, minimal SVG path data, PostScript and PDF.

use std::fmt::{self, Write};

use crate::path_builder::{ArcParameterization, Path, PathCommand, Sweep};
use crate::point::Point;

/// Most significant digits written for a coordinate.
const SIGNIFICANT_DIGITS: i32 = 8;

/// Most digits written after the decimal point.
const MAX_DECIMALS: i32 = 10;

/// Formats a number with at most 8 significant digits and no trailing zeros.
///
/// The result never uses exponent notation, and negative zero is written as `0`.
pub fn fmt_number(v: f64) -> String {
    if !v.is_finite() {
        return format!("{}", v);
    }

    if v == 0.0 {
        return String::from("0");
    }

    let magnitude = v.abs().log10().floor() as i32;

    if magnitude >= SIGNIFICANT_DIGITS {
        // round the integer part and write the dropped digits as zeros
        let zeros = magnitude + 1 - SIGNIFICANT_DIGITS;
        let digits = (v.abs() / 10f64.powi(zeros)).round();
        let sign = if v < 0.0 { "-" } else { "" };
        return format!("{}{:.0}{}", sign, digits, "0".repeat(zeros as usize));
    }

    let precision = (SIGNIFICANT_DIGITS - 1 - magnitude).clamp(0, MAX_DECIMALS) as usize;

    let mut s = format!("{:.*}", precision, v);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }

    if s == "-0" {
        s.remove(0);
    }

    s
}

/// Displays a number with [`fmt_number`].
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fmt_number(self.0))
    }
}

fn flag(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

fn is_origin(p: Point) -> bool {
    fmt_number(p.x) == "0" && fmt_number(p.y) == "0"
}

/// The canonical text form of a path.
///
/// Every command keeps its letter and all coordinates are absolute.  A leading
/// `M0 0` is left out unless another MoveTo follows it directly, since drawing
/// without a MoveTo starts at the origin anyway.  Parsing this text gives back
/// the same path.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let skip_origin = match self.iter().next() {
            Some(PathCommand::MoveTo(p)) => {
                is_origin(p) && !matches!(self.iter().nth(1), Some(PathCommand::MoveTo(_)))
            }
            _ => false,
        };

        for (i, cmd) in self.iter().enumerate() {
            if i == 0 && skip_origin {
                continue;
            }

            match cmd {
                PathCommand::MoveTo(p) => write!(f, "M{} {}", Num(p.x), Num(p.y))?,
                PathCommand::LineTo(p) => write!(f, "L{} {}", Num(p.x), Num(p.y))?,
                PathCommand::QuadTo(q) => write!(
                    f,
                    "Q{} {} {} {}",
                    Num(q.pt1.x),
                    Num(q.pt1.y),
                    Num(q.to.x),
                    Num(q.to.y)
                )?,
                PathCommand::CurveTo(c) => write!(
                    f,
                    "C{} {} {} {} {} {}",
                    Num(c.pt1.x),
                    Num(c.pt1.y),
                    Num(c.pt2.x),
                    Num(c.pt2.y),
                    Num(c.to.x),
                    Num(c.to.y)
                )?,
                PathCommand::Arc(a) => write!(
                    f,
                    "A{} {} {} {} {} {} {}",
                    Num(a.r.0),
                    Num(a.r.1),
                    Num(a.x_axis_rotation),
                    flag(a.large_arc.0),
                    flag(a.sweep == Sweep::Positive),
                    Num(a.to.x),
                    Num(a.to.y)
                )?,
                PathCommand::ClosePath => f.write_str("z")?,
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path({:?})", self.to_string())
    }
}

/// Accumulates SVG path data, leaving out command letters that repeat.
struct SvgWriter {
    out: String,
    last: Option<char>,
}

impl SvgWriter {
    fn command(&mut self, letter: char, args: &[f64]) {
        let repeated = self.last == Some(letter) && letter != 'M' && letter != 'z';

        if !repeated {
            self.out.push(letter);
        }

        for (i, v) in args.iter().enumerate() {
            if i > 0 || repeated {
                self.out.push(' ');
            }
            self.out.push_str(&fmt_number(*v));
        }

        self.last = Some(letter);
    }
}

impl Path {
    /// Minimal SVG path data.
    ///
    /// Unlike the canonical form, this always starts with an explicit `M`, writes
    /// horizontal and vertical lines as `H` and `V`, and leaves out repeated command
    /// letters.
    pub fn to_svg(&self) -> String {
        let mut w = SvgWriter {
            out: String::new(),
            last: None,
        };

        let mut start = Point::ZERO;
        let mut current = Point::ZERO;

        for cmd in self.iter() {
            match cmd {
                PathCommand::MoveTo(p) => {
                    w.command('M', &[p.x, p.y]);
                    start = p;
                }

                PathCommand::LineTo(p) => {
                    if fmt_number(p.y) == fmt_number(current.y) {
                        w.command('H', &[p.x]);
                    } else if fmt_number(p.x) == fmt_number(current.x) {
                        w.command('V', &[p.y]);
                    } else {
                        w.command('L', &[p.x, p.y]);
                    }
                }

                PathCommand::QuadTo(q) => w.command('Q', &[q.pt1.x, q.pt1.y, q.to.x, q.to.y]),

                PathCommand::CurveTo(c) => {
                    w.command('C', &[c.pt1.x, c.pt1.y, c.pt2.x, c.pt2.y, c.to.x, c.to.y])
                }

                PathCommand::Arc(a) => {
                    let (rx, ry, phi) = if fmt_number(a.x_axis_rotation) == "90" {
                        (a.r.1, a.r.0, 0.0)
                    } else {
                        (a.r.0, a.r.1, a.x_axis_rotation)
                    };

                    let large = if a.large_arc.0 { 1.0 } else { 0.0 };
                    let sweep = if a.sweep == Sweep::Positive { 1.0 } else { 0.0 };

                    w.command('A', &[rx, ry, phi, large, sweep, a.to.x, a.to.y]);
                }

                PathCommand::ClosePath => w.command('z', &[]),
            }

            current = cmd.end_point().unwrap_or(start);
        }

        w.out
    }

    /// PostScript path construction operators.
    ///
    /// Quadratic curves are written as cubic `curveto`, and arcs use the
    /// `ellipse` operator for the positive direction and `ellipsen` for the
    /// negative one, with arguments `cx cy rx ry theta1 theta2 phi` in degrees.
    pub fn to_postscript(&self) -> String {
        let mut ops: Vec<String> = Vec::new();
        let mut current = Point::ZERO;
        let mut start = Point::ZERO;

        for cmd in self.iter() {
            match cmd {
                PathCommand::MoveTo(p) => {
                    ops.push(format!("{} {} moveto", Num(p.x), Num(p.y)));
                    start = p;
                }

                PathCommand::LineTo(p) => ops.push(format!("{} {} lineto", Num(p.x), Num(p.y))),

                PathCommand::QuadTo(q) => {
                    let c = q.to_cubic(current);
                    ops.push(curveto(c.pt1, c.pt2, c.to));
                }

                PathCommand::CurveTo(c) => ops.push(curveto(c.pt1, c.pt2, c.to)),

                PathCommand::Arc(a) => match a.center_parameterization() {
                    ArcParameterization::CenterParameters {
                        center,
                        radii,
                        theta1,
                        delta_theta,
                    } => {
                        let theta2 = theta1 + delta_theta;
                        let op = match a.sweep {
                            Sweep::Positive => "ellipse",
                            Sweep::Negative => "ellipsen",
                        };

                        ops.push(format!(
                            "{} {} {} {} {} {} {} {}",
                            Num(center.x),
                            Num(center.y),
                            Num(radii.0),
                            Num(radii.1),
                            Num(theta1.to_degrees()),
                            Num(theta2.to_degrees()),
                            Num(a.x_axis_rotation),
                            op
                        ));
                    }

                    ArcParameterization::LineTo => {
                        ops.push(format!("{} {} lineto", Num(a.to.x), Num(a.to.y)))
                    }

                    ArcParameterization::Omit => (),
                },

                PathCommand::ClosePath => ops.push(String::from("closepath")),
            }

            current = cmd.end_point().unwrap_or(start);
        }

        ops.join(" ")
    }

    /// PDF content stream path operators (`m`, `l`, `c`, `h`).
    ///
    /// PDF has no arcs or quadratic curves, so arcs are replaced by cubic curves
    /// first and quadratic curves are elevated.
    pub fn to_pdf(&self) -> String {
        let path = self.replace_arcs();

        let mut out = String::new();
        let mut current = Point::ZERO;
        let mut start = Point::ZERO;

        for cmd in path.iter() {
            if !out.is_empty() {
                out.push(' ');
            }

            // Writing to a String cannot fail.
            let _ = match cmd {
                PathCommand::MoveTo(p) => {
                    start = p;
                    write!(out, "{} {} m", Num(p.x), Num(p.y))
                }
                PathCommand::LineTo(p) => write!(out, "{} {} l", Num(p.x), Num(p.y)),
                PathCommand::QuadTo(q) => {
                    let c = q.to_cubic(current);
                    write!(out, "{} c", coords(&[c.pt1, c.pt2, c.to]))
                }
                PathCommand::CurveTo(c) => write!(out, "{} c", coords(&[c.pt1, c.pt2, c.to])),
                PathCommand::Arc(a) => write!(out, "{} {} l", Num(a.to.x), Num(a.to.y)),
                PathCommand::ClosePath => write!(out, "h"),
            };

            current = cmd.end_point().unwrap_or(start);
        }

        out
    }
}

fn coords(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{} {}", Num(p.x), Num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn curveto(pt1: Point, pt2: Point, to: Point) -> String {
    format!("{} curveto", coords(&[pt1, pt2, to]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Path {
        Path::parse(s).unwrap()
    }

    #[test]
    fn formats_numbers() {
        assert_eq!(fmt_number(0.0), "0");
        assert_eq!(fmt_number(-0.0), "0");
        assert_eq!(fmt_number(10.0), "10");
        assert_eq!(fmt_number(-2.5), "-2.5");
        assert_eq!(fmt_number(13.333333333333), "13.333333");
        assert_eq!(fmt_number(6.666666666666), "6.6666667");
        assert_eq!(fmt_number(0.000012345678912), "0.0000123457");
        assert_eq!(fmt_number(12345678.9), "12345679");
        assert_eq!(fmt_number(123456789.123), "123456790");
        assert_eq!(fmt_number(-987654321.0), "-987654320");
        assert_eq!(fmt_number(1e308), format!("1{}", "0".repeat(308)));
        assert_eq!(fmt_number(-1e-12), "0");
        assert_eq!(fmt_number(9.999999999), "10");
    }

    #[test]
    fn canonical_form_keeps_all_letters() {
        let p = path("M10 0L20 0H30V10C40 10 50 10 50 0Q55 10 60 0A5 5 0 0 0 70 0Z");
        assert_eq!(
            p.to_string(),
            "M10 0L20 0L30 0L30 10C40 10 50 10 50 0Q55 10 60 0A5 5 0 0 0 70 0z"
        );
    }

    #[test]
    fn canonical_form_leaves_out_leading_origin() {
        assert_eq!(path("M0 0L10 0").to_string(), "L10 0");
        assert_eq!(path("M0 0M10 0L20 0").to_string(), "M0 0M10 0L20 0");
        assert_eq!(path("z").to_string(), "z");
        assert_eq!(path("M1 0L10 0").to_string(), "M1 0L10 0");
    }

    #[test]
    fn canonical_form_round_trips() {
        for s in &[
            "M10 0L20 0L30 0L30 10C40 10 50 10 50 0Q55 10 60 0A5 5 0 0 0 70 0z",
            "L10 0M0 0L20 0",
            "M0 0M5 5L6 6z",
            "L-0.5 0.25A10 5 30 1 0 3 4",
        ] {
            let p = path(s);
            assert_eq!(path(&p.to_string()).to_string(), p.to_string());
        }
    }

    #[test]
    fn svg_output() {
        let p = path("L10 0Q15 10 20 0M20 10C20 20 30 20 30 10z");
        assert_eq!(p.to_svg(), "M0 0H10Q15 10 20 0M20 10C20 20 30 20 30 10z");

        assert_eq!(path("M0 0L0 10L5 10L10 20L20 30").to_svg(), "M0 0V10H5L10 20 20 30");
        assert_eq!(path("A10 5 90 0 0 10 0").to_svg(), "M0 0A5 10 0 0 0 10 0");
    }

    #[test]
    fn postscript_output() {
        let p = path("L10 0Q15 10 20 0M20 10C20 20 30 20 30 10z");
        assert_eq!(
            p.to_postscript(),
            "0 0 moveto 10 0 lineto 13.333333 6.6666667 16.666667 6.6666667 20 0 curveto \
             20 10 moveto 20 20 30 20 30 10 curveto closepath"
        );

        assert_eq!(
            path("A5 5 0 0 1 10 0").to_postscript(),
            "0 0 moveto 5 0 5 5 180 360 0 ellipse"
        );
        assert_eq!(
            path("A10 5 90 0 0 10 0").to_postscript(),
            "0 0 moveto 5 0 10 5 90 -90 90 ellipsen"
        );
    }

    #[test]
    fn pdf_output() {
        let p = path("L10 0Q15 10 20 0M20 10C20 20 30 20 30 10z");
        assert_eq!(
            p.to_pdf(),
            "0 0 m 10 0 l 13.333333 6.6666667 16.666667 6.6666667 20 0 c \
             20 10 m 20 20 30 20 30 10 c h"
        );

        let arc = path("A5 5 0 0 1 10 0").to_pdf();
        assert!(arc.starts_with("0 0 m "));
        assert!(arc.ends_with(" 10 0 c"));
        assert!(!arc.contains('A'));
    }

    #[test]
    fn empty_path_output() {
        let p = Path::default();
        assert_eq!(p.to_string(), "");
        assert_eq!(p.to_svg(), "");
        assert_eq!(p.to_postscript(), "");
        assert_eq!(p.to_pdf(), "");
    }
}
