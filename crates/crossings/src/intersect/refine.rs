//! Bisection refinement of a straddle bracket.

use crate::error::Result;

/// Outcome of refining one bracket.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Refined {
    pub x: f64,
    /// Difference evaluations spent.
    pub iterations: usize,
    pub converged: bool,
}

/// Bisect `[lo, hi]` where `diff(lo) = d_lo` and `diff(hi)` have opposite signs.
///
/// Stops when the bracket is narrower than `tol`, when `|diff(mid)| < eps`,
/// or after `max_iter` evaluations; the returned `x` is the final midpoint.
pub(crate) fn bisect<F>(
    diff: F,
    mut lo: f64,
    mut hi: f64,
    mut d_lo: f64,
    tol: f64,
    max_iter: usize,
    eps: f64,
) -> Result<Refined>
where
    F: Fn(f64) -> Result<f64>,
{
    let mut iterations = 0;
    while hi - lo >= tol && iterations < max_iter {
        let mid = lo + 0.5 * (hi - lo);
        let d_mid = diff(mid)?;
        iterations += 1;
        if d_mid == 0.0 || d_mid.abs() < eps {
            return Ok(Refined {
                x: mid,
                iterations,
                converged: true,
            });
        }
        if (d_mid < 0.0) == (d_lo < 0.0) {
            lo = mid;
            d_lo = d_mid;
        } else {
            hi = mid;
        }
    }
    Ok(Refined {
        x: lo + 0.5 * (hi - lo),
        iterations,
        converged: hi - lo < tol,
    })
}
