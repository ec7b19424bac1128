//! Dashing paths.

use crate::measure::MeasuredSubPath;
use crate::path_builder::{Path, PathBuilder};
use crate::pathkit_log;

/// An "on" stretch of a dash pattern laid over a subpath, in distances from its
/// origin.
#[derive(Debug, Copy, Clone)]
struct Run {
    start: f64,
    end: f64,
    /// The dash would go on past the end of the subpath.
    cut_short: bool,
}

/// Lays the pattern over a subpath of length `total`, starting `phase` into it.
fn runs(pattern: &[f64], phase: f64, total: f64) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut d = -phase;

    for (i, len) in pattern.iter().enumerate().cycle() {
        if d > total {
            break;
        }

        let next = d + len;

        if i % 2 == 0 {
            let start = d.max(0.0);
            let end = next.min(total);

            // zero-length dashes are kept as dots
            if end > start || (*len == 0.0 && d >= 0.0) {
                runs.push(Run {
                    start,
                    end,
                    cut_short: next > total,
                });
            }
        }

        d = next;
    }

    runs
}

impl Path {
    /// Cuts the path into dashes.
    ///
    /// `pattern` alternates lengths of dashes and gaps; a pattern with an odd
    /// number of entries is repeated once to make it even.  `offset` is how far
    /// into the pattern the first subpath starts, and can be negative or longer
    /// than the pattern.  Every subpath starts the pattern afresh.
    ///
    /// When a dash of a closed subpath runs over the start point, the piece before
    /// and the piece after the start point are joined into a single dash.
    ///
    /// An empty pattern, or one whose lengths are all zero, leaves the path as it
    /// is.
    ///
    /// # Panics
    ///
    /// Panics if any length in `pattern` is negative or not finite.
    pub fn dash(&self, offset: f64, pattern: &[f64]) -> Path {
        assert!(
            pattern.iter().all(|l| l.is_finite() && *l >= 0.0),
            "dash lengths must be non-negative, got {:?}",
            pattern
        );

        let pattern: Vec<f64> = if pattern.len() % 2 == 1 {
            pattern.iter().chain(pattern.iter()).copied().collect()
        } else {
            pattern.to_vec()
        };

        let period: f64 = pattern.iter().sum();
        if period <= 0.0 {
            pathkit_log!("dash pattern {:?} draws nothing; leaving the path undashed", pattern);
            return self.clone();
        }

        let phase = offset.rem_euclid(period);
        let mut builder = PathBuilder::default();

        for subpath in self.iter_subpath() {
            let measured = MeasuredSubPath::new(&subpath);
            if measured.total <= 0.0 {
                continue;
            }

            let mut runs = runs(&pattern, phase, measured.total);

            if subpath.is_closed() {
                if let (Some(first), Some(last)) = (runs.first(), runs.last()) {
                    let whole = runs.len() == 1 && first.start == 0.0 && last.cut_short;

                    if whole {
                        builder.append(&subpath.to_path());
                        continue;
                    }

                    if last.cut_short && first.start == 0.0 && first.end > 0.0 {
                        let (first, last) = (*first, *last);
                        runs.pop();
                        runs.remove(0);

                        let p = measured.point_at(last.start);
                        builder.move_to(p.x, p.y);
                        measured.append_range(last.start, last.end, &mut builder);
                        measured.append_range(first.start, first.end, &mut builder);
                    }
                }
            }

            for run in runs {
                let p = measured.point_at(run.start);
                builder.move_to(p.x, p.y);
                measured.append_range(run.start, run.end, &mut builder);
            }
        }

        builder.into_path()
    }
}
