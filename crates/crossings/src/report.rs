//! One-shot analysis report for a two-curve comparison.
//!
//! `compare` is the engine's entry point: it validates options, samples every
//! curve (primary and control) over its own domain for rendering and summary
//! statistics, runs the intersection search on the two primaries, and packs
//! everything into an immutable `AnalysisReport`. Either the whole report is
//! produced or the first error is returned.

use serde::{Deserialize, Serialize};

use crate::cfg::CompareCfg;
use crate::curve::{CurveInput, CurveModel, CurveRole, Domain, SamplePoint};
use crate::error::Result;
use crate::intersect::{find_intersections, IntersectionPoint, Intersections};
use crate::sample::sample;

/// Outcome class of a comparison. None of these is an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    NoOverlap,
    Coincident,
}

/// Which of the two inputs a trace belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// Per-curve summary for the analysis table and axis scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CurveSummary {
    pub domain: Domain,
    pub sample_count: usize,
    pub y_min: f64,
    pub y_max: f64,
}

/// Sampled polyline for the renderer (primary line or control overlay).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurveTrace {
    pub side: Side,
    pub role: CurveRole,
    pub points: Vec<SamplePoint>,
}

/// Immutable result of one comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub status: Status,
    pub curve_a: CurveSummary,
    pub curve_b: CurveSummary,
    pub overlap: Option<Domain>,
    /// Ascending by x; empty unless `status == Ok`.
    pub intersections: Vec<IntersectionPoint>,
    pub count: usize,
    pub resolution: usize,
    /// Effective tolerances; `None` without an overlap.
    pub root_tolerance: Option<f64>,
    pub min_separation: Option<f64>,
    /// A primary, A control, B primary, B control (controls only if present).
    pub traces: Vec<CurveTrace>,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.intersections.is_empty()
    }

    pub fn traces_for(&self, side: Side) -> impl Iterator<Item = &CurveTrace> {
        self.traces.iter().filter(move |t| t.side == side)
    }
}

/// Compare two curve inputs and build the analysis report.
pub fn compare(a: &CurveInput, b: &CurveInput, cfg: &CompareCfg) -> Result<AnalysisReport> {
    cfg.validate()?;
    tracing::debug!(
        a = a.primary().kind(),
        b = b.primary().kind(),
        resolution = cfg.resolution,
        "compare"
    );

    let mut traces = Vec::with_capacity(4);
    let curve_a = trace_input(Side::A, a, cfg.resolution, &mut traces)?;
    let curve_b = trace_input(Side::B, b, cfg.resolution, &mut traces)?;

    let found = find_intersections(a.primary(), b.primary(), cfg)?;
    let overlap = found.overlap();
    let resolved = overlap.map(|o| cfg.resolve(o)).transpose()?;
    let (status, intersections) = match found {
        Intersections::NoOverlap => (Status::NoOverlap, Vec::new()),
        Intersections::Coincident { .. } => (Status::Coincident, Vec::new()),
        Intersections::Crossings { points, .. } => (Status::Ok, points),
    };
    tracing::debug!(status = ?status, count = intersections.len(), "compare done");

    Ok(AnalysisReport {
        status,
        curve_a,
        curve_b,
        overlap,
        count: intersections.len(),
        intersections,
        resolution: cfg.resolution,
        root_tolerance: resolved.map(|r| r.root_tolerance),
        min_separation: resolved.map(|r| r.min_separation),
        traces,
    })
}

/// Sample the primary (and control, if any) of one input; summarize the primary.
fn trace_input(
    side: Side,
    input: &CurveInput,
    resolution: usize,
    traces: &mut Vec<CurveTrace>,
) -> Result<CurveSummary> {
    let primary = trace(side, input.primary(), resolution)?;
    let summary = summarize(input.primary().domain(), &primary.points);
    traces.push(primary);
    if let Some(control) = input.control() {
        traces.push(trace(side, control, resolution)?);
    }
    Ok(summary)
}

fn trace(side: Side, curve: &CurveModel, resolution: usize) -> Result<CurveTrace> {
    Ok(CurveTrace {
        side,
        role: curve.role(),
        points: sample(curve, resolution)?,
    })
}

fn summarize(domain: Domain, points: &[SamplePoint]) -> CurveSummary {
    let (y_min, y_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    CurveSummary {
        domain,
        sample_count: points.len(),
        y_min,
        y_max,
    }
}
