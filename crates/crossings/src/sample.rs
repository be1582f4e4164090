//! Uniform sampling of curves over a closed domain.
//!
//! A sequence of `n` samples starts at `lo`, ends exactly at `hi`, and is
//! spaced `(hi − lo) / (n − 1)` apart. Interior abscissae are clamped to the
//! domain so rounding never produces an out-of-domain query.

use crate::cfg::check_resolution;
use crate::curve::{CurveModel, Domain, SamplePoint};
use crate::error::Result;

/// Abscissae of an `n`-point uniform grid over `domain`.
pub fn grid(domain: Domain, resolution: usize) -> Result<Vec<f64>> {
    check_resolution(resolution)?;
    let (lo, hi) = (domain.lo(), domain.hi());
    let last = (resolution - 1) as f64;
    let mut xs: Vec<f64> = (0..resolution)
        .map(|i| (lo + domain.width() * (i as f64 / last)).min(hi))
        .collect();
    xs[resolution - 1] = hi;
    Ok(xs)
}

/// Evaluate `curve` at each abscissa; the first failure aborts.
pub fn evaluate_at(curve: &CurveModel, xs: &[f64]) -> Result<Vec<f64>> {
    xs.iter().map(|&x| curve.evaluate(x)).collect()
}

/// Sample `curve` over its own domain.
pub fn sample(curve: &CurveModel, resolution: usize) -> Result<Vec<SamplePoint>> {
    sample_over(curve, curve.domain(), resolution)
}

/// Sample `curve` over `domain`, which must lie inside the curve's domain.
pub fn sample_over(
    curve: &CurveModel,
    domain: Domain,
    resolution: usize,
) -> Result<Vec<SamplePoint>> {
    let xs = grid(domain, resolution)?;
    let ys = evaluate_at(curve, &xs)?;
    Ok(xs
        .into_iter()
        .zip(ys)
        .map(|(x, y)| SamplePoint::new(x, y))
        .collect())
}
