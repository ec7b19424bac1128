//! Geometry kernel for 2D vector paths.
//!
//! This crate represents paths made of lines, quadratic and cubic Bézier curves
//! and elliptical arcs, split into any number of open or closed subpaths, and
//! implements the geometric operations that a drawing backend needs before it
//! hands a path to a rasterizer or writes it out as SVG, PostScript or PDF.
//!
//! # Building paths
//!
//! A [`Path`] is immutable.  You can get one by parsing SVG path data, or by
//! appending commands to a [`PathBuilder`]:
//!
//! ```
//! use pathkit::{Path, PathBuilder};
//!
//! let parsed = Path::parse("M10 0L20 0H30V10z").unwrap();
//!
//! let mut builder = PathBuilder::default();
//! builder.move_to(10.0, 0.0).line_to(20.0, 0.0).line_to(30.0, 0.0);
//! builder.line_to(30.0, 10.0).close_path();
//!
//! assert_eq!(builder.into_path(), parsed);
//! ```
//!
//! Two paths compare equal when their canonical text, as produced by their
//! [`Display`](std::fmt::Display) implementation, is the same.
//!
//! # Operations
//!
//! All operations return new paths and leave the original alone:
//!
//! * Measuring: [`Path::length`], [`Path::bounds`], [`Path::split`],
//!   [`Path::split_at`], [`Path::coords`].
//! * Rewriting: [`Path::transform`], [`Path::reverse`], [`Path::optimize`],
//!   [`Path::replace`], [`Path::flatten`], [`Path::replace_arcs`].
//! * Outlines: [`Path::stroke`], [`Path::dash`], [`Path::offset`].
//! * Topology: [`Path::ccw`], [`Path::winding`], [`Path::interior`],
//!   [`Path::filling`].
//! * Decoration: [`Path::markers`], and the [`shapes`] module.
//! * Output: [`Path::to_svg`], [`Path::to_postscript`], [`Path::to_pdf`].
//!
//! ```
//! use pathkit::{ButtCapper, MiterJoiner, Path, Rect};
//!
//! let line = Path::parse("L10 0").unwrap();
//! let outline = line.stroke(2.0, &ButtCapper, &MiterJoiner::default());
//!
//! assert!(outline.bounds().approx_eq(&Rect::new(0.0, -1.0, 10.0, 1.0), 1e-9));
//! ```
//!
//! Coordinates follow the usual mathematical convention: angles grow
//! counter-clockwise, and a path with positive signed area runs
//! counter-clockwise.
//!
//! # Logging
//!
//! Set the `PATHKIT_LOG` environment variable to have the library print
//! messages to stderr when it takes a degenerate branch, for example when a dash
//! pattern draws nothing or a miter join goes over its limit.

#![allow(rustdoc::private_intra_doc_links)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![warn(nonstandard_style, rust_2018_idioms, unused)]
// Some lints no longer exist
#![warn(renamed_and_removed_lints)]
// Standalone lints
#![warn(trivial_casts, trivial_numeric_casts)]

pub use crate::angle::Angle;
pub use crate::error::{ErrorKind, ParseError};
pub use crate::path_builder::{
    ArcParameterization, CubicBezierCurve, EllipticalArc, LargeArc, Path, PathBuilder,
    PathCommand, QuadraticBezierCurve, SubPath, SubPathCommandsIter, SubPathIter, Sweep,
};
pub use crate::point::Point;
pub use crate::rect::Rect;
pub use crate::replace::{ArcReplacer, BezierReplacer, LineReplacer};
pub use crate::segment::{ArcSegment, Segment};
pub use crate::stroke::{
    BevelJoiner, ButtCapper, Capper, Joiner, MiterJoiner, RoundCapper, RoundJoiner, SquareCapper,
};
pub use crate::tolerance::{Tolerance, DEFAULT_EPSILON, DEFAULT_FLATNESS};
pub use crate::transform::Transform;
pub use crate::winding::FillRule;

mod angle;
mod dash;
mod error;
mod float_eq;
mod marker;
mod measure;
mod optimize;
mod path_builder;
mod path_parser;
mod path_writer;
mod point;
mod polynomial;
mod rect;
mod replace;
mod reverse;
mod segment;
mod stroke;
mod tolerance;
mod transform;
mod winding;

#[doc(hidden)]
pub mod log;

pub mod shapes;

#[doc(hidden)]
pub mod test_utils {
    pub use crate::float_eq::ApproxEqPath;
}

#[doc(hidden)]
pub mod bench_only {
    pub use crate::measure::LengthMap;
    pub use crate::path_parser::Lexer;
    pub use crate::path_writer::fmt_number;
}
