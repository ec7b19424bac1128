//! Small numerical tools: root finding, quadrature and polynomial approximation.

use nalgebra::{DMatrix, DVector, Matrix4, Vector4};
use tinyvec::ArrayVec;

/// Abscissae and weights of 5-point Gauss-Legendre quadrature on [-1, 1].
const GAUSS_LEGENDRE_5: [(f64, f64); 5] = [
    (0.0, 0.568_888_888_888_888_9),
    (-0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (0.538_469_310_105_683_1, 0.478_628_670_499_366_5),
    (-0.906_179_845_938_664, 0.236_926_885_056_189_1),
    (0.906_179_845_938_664, 0.236_926_885_056_189_1),
];

/// Real roots of `a*x^2 + b*x + c = 0`.
///
/// Degenerates to the linear equation when `a` is zero.  A double root is
/// reported once.
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> ArrayVec<[f64; 2]> {
    let mut roots = ArrayVec::new();

    if a == 0.0 || (a.abs() < 1e-12 * (b.abs() + c.abs())) {
        if b != 0.0 {
            roots.push(-c / b);
        }
        return roots;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return roots;
    }

    if discriminant == 0.0 {
        roots.push(-b / (2.0 * a));
        return roots;
    }

    // avoid cancellation between -b and the square root
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    let (x0, x1) = if q == 0.0 {
        (0.0, 0.0)
    } else {
        (q / a, c / q)
    };

    roots.push(x0.min(x1));
    if x1 != x0 {
        roots.push(x0.max(x1));
    }
    roots
}

/// Integrates `f` over `[a, b]` with 5-point Gauss-Legendre quadrature.
pub fn gauss_legendre5<F: Fn(f64) -> f64>(f: F, a: f64, b: f64) -> f64 {
    let half = 0.5 * (b - a);
    let mid = 0.5 * (a + b);

    half * GAUSS_LEGENDRE_5
        .iter()
        .map(|&(x, w)| w * f(mid + half * x))
        .sum::<f64>()
}

/// Composite Gauss-Legendre quadrature over `panels` equal subintervals.
pub fn integrate<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, panels: usize) -> f64 {
    let panels = panels.max(1);
    let h = (b - a) / panels as f64;

    (0..panels)
        .map(|i| {
            let lo = a + h * i as f64;
            gauss_legendre5(&f, lo, lo + h)
        })
        .sum()
}

/// The points where `gauss_legendre5` samples its integrand over `[a, b]`.
pub fn gauss_legendre5_nodes(a: f64, b: f64) -> impl Iterator<Item = f64> {
    let half = 0.5 * (b - a);
    let mid = 0.5 * (a + b);

    GAUSS_LEGENDRE_5.iter().map(move |&(x, _)| mid + half * x)
}

/// Coefficients `[c0, c1, c2, c3]` of the cubic through four points.
///
/// Returns `None` when two of the abscissae coincide.
pub fn fit_cubic(xs: [f64; 4], ys: [f64; 4]) -> Option<[f64; 4]> {
    let row = |x: f64| [1.0, x, x * x, x * x * x];
    let [r0, r1, r2, r3] = [row(xs[0]), row(xs[1]), row(xs[2]), row(xs[3])];

    #[rustfmt::skip]
    let m = Matrix4::new(
        r0[0], r0[1], r0[2], r0[3],
        r1[0], r1[1], r1[2], r1[3],
        r2[0], r2[1], r2[2], r2[3],
        r3[0], r3[1], r3[2], r3[3],
    );

    let c = m.lu().solve(&Vector4::new(ys[0], ys[1], ys[2], ys[3]))?;

    if c.iter().all(|v| v.is_finite()) {
        Some([c[0], c[1], c[2], c[3]])
    } else {
        None
    }
}

/// Evaluates a polynomial given by its coefficients in increasing degree.
pub fn eval_polynomial(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// A Chebyshev series approximating a function on an interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Chebyshev {
    coeffs: Vec<f64>,
    lo: f64,
    hi: f64,
}

impl Chebyshev {
    /// A series on `[lo, hi]` with the given coefficients.  The first one
    /// counts half, as in the usual Chebyshev expansion.
    pub fn from_coeffs(coeffs: Vec<f64>, lo: f64, hi: f64) -> Chebyshev {
        Chebyshev { coeffs, lo, hi }
    }

    /// The series of the antiderivative that is zero at `lo`.
    ///
    /// The result has one more term than `self`.
    pub fn integral(&self) -> Chebyshev {
        let n = self.coeffs.len();
        let con = 0.25 * (self.hi - self.lo);
        let c = |j: usize| self.coeffs.get(j).copied().unwrap_or(0.0);

        let mut cint = vec![0.0; n + 1];
        for (j, v) in cint.iter_mut().enumerate().skip(1) {
            *v = con * (c(j - 1) - c(j + 1)) / j as f64;
        }

        // T_j(-1) is (-1)^j
        cint[0] = 2.0
            * cint
                .iter()
                .enumerate()
                .skip(1)
                .map(|(j, v)| if j % 2 == 1 { *v } else { -*v })
                .sum::<f64>();

        Chebyshev {
            coeffs: cint,
            lo: self.lo,
            hi: self.hi,
        }
    }

    /// Evaluates the series with Clenshaw's recurrence.
    pub fn eval(&self, x: f64) -> f64 {
        let u = if self.hi > self.lo {
            (2.0 * x - self.lo - self.hi) / (self.hi - self.lo)
        } else {
            0.0
        };

        let (mut b1, mut b2) = (0.0, 0.0);
        for c in self.coeffs.iter().skip(1).rev() {
            let b0 = 2.0 * u * b1 - b2 + c;
            b2 = b1;
            b1 = b0;
        }

        let c0 = self.coeffs.first().copied().unwrap_or(0.0);
        u * b1 - b2 + 0.5 * c0
    }
}

/// Least-squares fit of a Chebyshev series `d` of the given degree on
/// `[lo, hi]` to samples of `d` itself and of its integral from `lo`.
///
/// Each sample `(x, w, y)` in `slopes` asks for `w * d(x) = y`; those in
/// `values` ask the same of the integral.  Returns the integral, or `None`
/// when the samples do not determine it.
pub fn fit_antiderivative(
    values: &[(f64, f64, f64)],
    slopes: &[(f64, f64, f64)],
    lo: f64,
    hi: f64,
    degree: usize,
) -> Option<Chebyshev> {
    let n = degree + 1;
    let rows = values.len() + slopes.len();
    if rows < n {
        return None;
    }

    let basis: Vec<(Chebyshev, Chebyshev)> = (0..n)
        .map(|k| {
            let mut coeffs = vec![0.0; n];
            coeffs[k] = 1.0;
            let d = Chebyshev::from_coeffs(coeffs, lo, hi);
            let integral = d.integral();
            (d, integral)
        })
        .collect();

    let mut a = DMatrix::<f64>::zeros(rows, n);
    let mut b = DVector::<f64>::zeros(rows);

    for (r, &(x, w, y)) in values.iter().enumerate() {
        for (k, (_, integral)) in basis.iter().enumerate() {
            a[(r, k)] = w * integral.eval(x);
        }
        b[r] = y;
    }

    for (r, &(x, w, y)) in slopes.iter().enumerate() {
        let r = r + values.len();
        for (k, (d, _)) in basis.iter().enumerate() {
            a[(r, k)] = w * d.eval(x);
        }
        b[r] = y;
    }

    let coeffs = a.svd(true, true).solve(&b, 1e-12).ok()?;
    if !coeffs.iter().all(|c| c.is_finite()) {
        return None;
    }

    Some(Chebyshev::from_coeffs(coeffs.iter().copied().collect(), lo, hi).integral())
}

/// Finds `x` in `[lo, hi]` with `f(x) = target` for an increasing `f`.
///
/// Starting from `guess`, Newton steps are used while they stay inside the
/// bracket, bisection otherwise.  The number of iterations is bounded.
pub fn invert_increasing<F, D>(
    f: F,
    df: D,
    target: f64,
    (lo, hi): (f64, f64),
    guess: f64,
    tolerance: f64,
) -> f64
where
    F: Fn(f64) -> f64,
    D: Fn(f64) -> f64,
{
    const MAX_ITERATIONS: usize = 50;

    let (mut a, mut b) = (lo, hi);
    let mut x = guess.clamp(lo, hi);

    for _ in 0..MAX_ITERATIONS {
        let fx = f(x) - target;
        if fx.abs() <= tolerance {
            break;
        }

        if fx < 0.0 {
            a = x;
        } else {
            b = x;
        }

        let d = df(x);
        let newton = x - fx / d;
        x = if d > 0.0 && newton > a && newton < b {
            newton
        } else {
            0.5 * (a + b)
        };

        if b - a <= f64::EPSILON * (1.0 + b.abs()) {
            break;
        }
    }

    x.clamp(lo, hi)
}
