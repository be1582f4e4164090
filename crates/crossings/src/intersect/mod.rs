//! Intersection search between two primary curves.
//!
//! Purpose
//! - Locate every x in the overlap of both domains where `A(x) − B(x) = 0`,
//!   treating the difference as continuous and the curves as opaque.
//!
//! Algorithm
//! - Sample both curves on one uniform grid over the overlap (the two
//!   samplings fan out on a scoped thread when `parallel` is set).
//! - ε is `zero_eps` scaled by the largest sampled magnitude (at least 1),
//!   so rounding noise on large values does not read as sign changes.
//! - If every difference is zero within ε the curves are `Coincident`; stop.
//! - Scan for exact zeros and sign changes (`bracket.rs`), refine sign
//!   changes by bisection (`refine.rs`), then sort, drop roots closer than
//!   `min_separation` to the previously kept one, and index the rest.
//!
//! Any evaluation failure aborts the search; there are no partial results.
//!
//! Code cross-refs: `sample::{grid,evaluate_at}`, `cfg::ResolvedCfg`, `report::compare`.

mod bracket;
mod refine;

use serde::{Deserialize, Serialize};

use crate::cfg::{CompareCfg, ResolvedCfg};
use crate::curve::{CurveModel, CurveRole, Domain};
use crate::error::{EngineError, Result};
use crate::sample::{evaluate_at, grid};
use bracket::{all_zero, scan, Bracket};
use refine::bisect;

/// One reported crossing of the two primary curves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IntersectionPoint {
    /// Rank by ascending x among all crossings of the pair.
    pub index: usize,
    pub x: f64,
    /// Mean of both curves at `x`.
    pub y: f64,
    /// `|A(x) − B(x)|`.
    pub residual: f64,
}

/// Outcome of an intersection search.
#[derive(Clone, Debug, PartialEq)]
pub enum Intersections {
    /// The domains share no interval.
    NoOverlap,
    /// The curves agree on the whole overlap; crossings are not enumerable.
    Coincident { overlap: Domain },
    /// Finitely many crossings (possibly none), ascending by x.
    Crossings {
        overlap: Domain,
        points: Vec<IntersectionPoint>,
    },
}

impl Intersections {
    pub fn overlap(&self) -> Option<Domain> {
        match self {
            Intersections::NoOverlap => None,
            Intersections::Coincident { overlap } | Intersections::Crossings { overlap, .. } => {
                Some(*overlap)
            }
        }
    }

    /// Enumerated crossings; empty for `NoOverlap` and `Coincident`.
    pub fn points(&self) -> &[IntersectionPoint] {
        match self {
            Intersections::Crossings { points, .. } => points,
            _ => &[],
        }
    }
}

/// Find all crossings of the primary curves `a` and `b` within their overlap.
pub fn find_intersections(
    a: &CurveModel,
    b: &CurveModel,
    cfg: &CompareCfg,
) -> Result<Intersections> {
    cfg.validate()?;
    for (name, c) in [("a", a), ("b", b)] {
        if c.role() == CurveRole::Control {
            return Err(EngineError::invalid_curve(format!(
                "curve {name} is a control curve; only primary curves are searched"
            )));
        }
    }
    let Some(overlap) = a.domain().overlap(&b.domain()) else {
        tracing::debug!(a = %a.domain(), b = %b.domain(), "domains do not overlap");
        return Ok(Intersections::NoOverlap);
    };
    let rc = cfg.resolve(overlap)?;
    tracing::debug!(
        overlap = %overlap,
        resolution = rc.resolution,
        root_tolerance = rc.root_tolerance,
        min_separation = rc.min_separation,
        "searching overlap"
    );

    let xs = grid(overlap, rc.resolution)?;
    let (ya, yb) = evaluate_pair(a, b, &xs, rc.parallel)?;
    let d: Vec<f64> = ya.iter().zip(&yb).map(|(p, q)| p - q).collect();
    let eps = scaled_eps(rc.zero_eps, &ya, &yb);
    tracing::trace!(eps, "zero threshold");

    if all_zero(&d, eps) {
        tracing::debug!(overlap = %overlap, "curves coincide on overlap");
        return Ok(Intersections::Coincident { overlap });
    }

    let mut roots = Vec::new();
    for br in scan(&d, eps) {
        tracing::trace!(bracket = ?br, "bracket");
        let root = match br {
            Bracket::Exact(i) => IntersectionPoint {
                index: 0,
                x: xs[i],
                y: 0.5 * (ya[i] + yb[i]),
                residual: d[i].abs(),
            },
            Bracket::Straddle(i) => refine_straddle(a, b, &xs, &d, i, &rc, eps)?,
        };
        roots.push(root);
    }

    let points = dedup_and_index(roots, rc.min_separation);
    tracing::debug!(count = points.len(), "intersections found");
    Ok(Intersections::Crossings { overlap, points })
}

fn refine_straddle(
    a: &CurveModel,
    b: &CurveModel,
    xs: &[f64],
    d: &[f64],
    i: usize,
    rc: &ResolvedCfg,
    eps: f64,
) -> Result<IntersectionPoint> {
    let diff = |x: f64| -> Result<f64> { Ok(a.evaluate(x)? - b.evaluate(x)?) };
    let r = bisect(
        diff,
        xs[i],
        xs[i + 1],
        d[i],
        rc.root_tolerance,
        rc.max_iterations,
        eps,
    )?;
    if !r.converged {
        tracing::warn!(
            x = r.x,
            iterations = r.iterations,
            lo = xs[i],
            hi = xs[i + 1],
            "bisection hit the iteration cap before reaching root_tolerance"
        );
    }
    let (ya, yb) = (a.evaluate(r.x)?, b.evaluate(r.x)?);
    Ok(IntersectionPoint {
        index: 0,
        x: r.x,
        y: 0.5 * (ya + yb),
        residual: (ya - yb).abs(),
    })
}

/// `zero_eps · max(1, max |A|, max |B|)` over the sampled values.
fn scaled_eps(zero_eps: f64, ya: &[f64], yb: &[f64]) -> f64 {
    let mag = ya.iter().chain(yb).fold(1.0_f64, |m, v| m.max(v.abs()));
    zero_eps * mag
}

/// Sample `a` and `b` at `xs`. When `parallel`, `b` runs on a scoped worker.
/// An error from `a` is reported ahead of one from `b` either way.
fn evaluate_pair(
    a: &CurveModel,
    b: &CurveModel,
    xs: &[f64],
    parallel: bool,
) -> Result<(Vec<f64>, Vec<f64>)> {
    if !parallel {
        let ya = evaluate_at(a, xs)?;
        let yb = evaluate_at(b, xs)?;
        return Ok((ya, yb));
    }
    std::thread::scope(|s| -> Result<(Vec<f64>, Vec<f64>)> {
        let worker = s.spawn(|| evaluate_at(b, xs));
        let ya = evaluate_at(a, xs);
        let yb = match worker.join() {
            Ok(res) => res,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        Ok((ya?, yb?))
    })
}

/// Sort ascending, keep a root only if it is at least `min_sep` above the last
/// kept one, then number the survivors.
fn dedup_and_index(mut roots: Vec<IntersectionPoint>, min_sep: f64) -> Vec<IntersectionPoint> {
    roots.sort_by(|p, q| p.x.total_cmp(&q.x));
    let mut kept: Vec<IntersectionPoint> = Vec::with_capacity(roots.len());
    for r in roots {
        if kept.last().is_some_and(|last| r.x - last.x < min_sep) {
            tracing::trace!(x = r.x, "dropping near-duplicate root");
            continue;
        }
        kept.push(r);
    }
    for (index, p) in kept.iter_mut().enumerate() {
        p.index = index;
    }
    kept
}

#[cfg(test)]
mod tests;
