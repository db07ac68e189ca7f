//! Curve interpolation: sparse landmarks to dense integer samples.
//!
//! Fits a smooth curve through an ordered set of control points and
//! samples it once per integer x across the full span. Three kernels are
//! available: piecewise linear, a sliding three-point quadratic, and a
//! natural cubic spline. The spline is implemented from scratch (a small
//! tridiagonal solve) since no crate in the dependency tree provides one.
//!
//! This is the first stage of every feature pass, between landmark
//! extraction and region rasterization.

use crate::types::{Curve, MakeupError, Point};

/// Interpolation kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Piecewise linear between bracketing control points.
    Linear,
    /// Lagrange parabola through a three-point window centred on the
    /// bracketing segment. Exact parabola when given exactly 3 points.
    Quadratic,
    /// Natural cubic spline (zero second derivative at the endpoints).
    Cubic,
}

impl Kind {
    /// Minimum number of control points the kernel requires.
    #[must_use]
    pub const fn min_points(self) -> usize {
        match self {
            Self::Linear => 2,
            Self::Quadratic => 3,
            Self::Cubic => 4,
        }
    }
}

/// Walk direction for the output samples.
///
/// Affects only the order in which samples appear in the returned
/// [`Curve`], not the interpolation math. Callers pick the direction that
/// matches how they traverse the boundary (top-to-bottom vs bottom-to-top).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Samples ordered from the smallest x to the largest.
    Ascending,
    /// Samples ordered from the largest x to the smallest.
    Descending,
}

/// Interpolate a dense curve through sparse control points.
///
/// Produces one sample per integer x in `[min_x, max_x]`, both endpoints
/// inclusive, so the sample count equals the integer span plus one and
/// there are no gaps. Interpolated y values are truncated (not rounded)
/// to integers — a deliberate, reproducible quantization.
///
/// Control point x coordinates must be strictly monotonic in input order
/// (either direction); interpolation never extrapolates beyond the span.
///
/// # Errors
///
/// Returns [`MakeupError::InsufficientPoints`] if fewer points than the
/// kernel minimum are supplied, and [`MakeupError::NonMonotonicX`] if the
/// x coordinates repeat or change direction.
pub fn interpolate(
    points: &[Point],
    kind: Kind,
    direction: Direction,
) -> Result<Curve, MakeupError> {
    let needed = kind.min_points();
    if points.len() < needed {
        return Err(MakeupError::InsufficientPoints {
            needed,
            got: points.len(),
        });
    }

    check_monotonic_x(points)?;

    // Normalize to ascending x for evaluation; input order only encodes
    // traversal direction, which the caller re-imposes via `direction`.
    let mut ordered: Vec<Point> = points.to_vec();
    if ordered[0].x > ordered[ordered.len() - 1].x {
        ordered.reverse();
    }

    let xs: Vec<f64> = ordered.iter().map(|p| f64::from(p.x)).collect();
    let ys: Vec<f64> = ordered.iter().map(|p| f64::from(p.y)).collect();

    let min_x = ordered[0].x;
    let max_x = ordered[ordered.len() - 1].x;

    let evaluator = Evaluator::build(kind, &xs, &ys);

    let mut samples = Vec::with_capacity((max_x - min_x + 1) as usize);
    for x in min_x..=max_x {
        let y = evaluator.eval(&xs, &ys, f64::from(x));
        // Truncation toward zero, not rounding.
        samples.push(Point::new(x, y as i32));
    }

    if direction == Direction::Descending {
        samples.reverse();
    }

    Ok(Curve::new(samples))
}

/// Verify that control point x coordinates are strictly monotonic in
/// input order, reporting the first offending index.
fn check_monotonic_x(points: &[Point]) -> Result<(), MakeupError> {
    let ascending = points[1].x > points[0].x;
    for (i, pair) in points.windows(2).enumerate() {
        let ok = if ascending {
            pair[1].x > pair[0].x
        } else {
            pair[1].x < pair[0].x
        };
        if !ok {
            return Err(MakeupError::NonMonotonicX { index: i + 1 });
        }
    }
    Ok(())
}

/// Prepared per-kernel evaluation state.
enum Evaluator {
    Linear,
    Quadratic,
    /// Natural cubic spline second derivatives at each knot.
    Cubic(Vec<f64>),
}

impl Evaluator {
    fn build(kind: Kind, xs: &[f64], ys: &[f64]) -> Self {
        match kind {
            Kind::Linear => Self::Linear,
            Kind::Quadratic => Self::Quadratic,
            Kind::Cubic => Self::Cubic(natural_spline_moments(xs, ys)),
        }
    }

    fn eval(&self, xs: &[f64], ys: &[f64], x: f64) -> f64 {
        let seg = bracketing_segment(xs, x);
        match self {
            Self::Linear => {
                let t = (x - xs[seg]) / (xs[seg + 1] - xs[seg]);
                t.mul_add(ys[seg + 1] - ys[seg], ys[seg])
            }
            Self::Quadratic => {
                // Three-point window centred on the bracketing segment,
                // clamped away from the ends.
                let c = seg.clamp(1, xs.len() - 2);
                lagrange3(
                    (xs[c - 1], ys[c - 1]),
                    (xs[c], ys[c]),
                    (xs[c + 1], ys[c + 1]),
                    x,
                )
            }
            Self::Cubic(moments) => {
                let h = xs[seg + 1] - xs[seg];
                let a = xs[seg + 1] - x;
                let b = x - xs[seg];
                (moments[seg] * a * a * a + moments[seg + 1] * b * b * b) / (6.0 * h)
                    + (ys[seg] / h - moments[seg] * h / 6.0) * a
                    + (ys[seg + 1] / h - moments[seg + 1] * h / 6.0) * b
            }
        }
    }
}

/// Index `i` such that `xs[i] <= x <= xs[i + 1]`, clamped to valid segments.
fn bracketing_segment(xs: &[f64], x: f64) -> usize {
    let mut seg = 0;
    while seg + 2 < xs.len() && x > xs[seg + 1] {
        seg += 1;
    }
    seg
}

/// Quadratic Lagrange interpolation through three points.
fn lagrange3(p0: (f64, f64), p1: (f64, f64), p2: (f64, f64), x: f64) -> f64 {
    let l0 = (x - p1.0) * (x - p2.0) / ((p0.0 - p1.0) * (p0.0 - p2.0));
    let l1 = (x - p0.0) * (x - p2.0) / ((p1.0 - p0.0) * (p1.0 - p2.0));
    let l2 = (x - p0.0) * (x - p1.0) / ((p2.0 - p0.0) * (p2.0 - p1.0));
    p2.1.mul_add(l2, p0.1.mul_add(l0, p1.1 * l1))
}

/// Second derivatives ("moments") of the natural cubic spline at each
/// knot, via the Thomas algorithm on the standard tridiagonal system.
/// Natural boundary: zero curvature at both endpoints.
fn natural_spline_moments(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut moments = vec![0.0; n];
    if n < 3 {
        return moments;
    }

    // Interior equations: a*m[i-1] + b*m[i] + c*m[i+1] = d.
    let m = n - 2;
    let mut diag = vec![0.0; m];
    let mut upper = vec![0.0; m];
    let mut rhs = vec![0.0; m];

    for i in 0..m {
        let h0 = xs[i + 1] - xs[i];
        let h1 = xs[i + 2] - xs[i + 1];
        diag[i] = 2.0 * (h0 + h1);
        upper[i] = h1;
        rhs[i] = 6.0 * ((ys[i + 2] - ys[i + 1]) / h1 - (ys[i + 1] - ys[i]) / h0);
    }

    // Forward elimination. The lower diagonal entry for row i is
    // h[i] = xs[i+1] - xs[i].
    for i in 1..m {
        let lower = xs[i + 1] - xs[i];
        let factor = lower / diag[i - 1];
        diag[i] -= factor * upper[i - 1];
        rhs[i] -= factor * rhs[i - 1];
    }

    // Back substitution.
    moments[m] = rhs[m - 1] / diag[m - 1];
    for i in (1..m).rev() {
        moments[i] = (rhs[i - 1] - upper[i - 1] * moments[i + 1]) / diag[i - 1];
    }

    moments
}
