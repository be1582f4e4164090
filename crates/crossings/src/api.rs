//! Curated surface for callers that parse, compare and render.
//!
//! Parsing collaborators produce `CurveDef`/`CurveInputDef`; renderers consume
//! `AnalysisReport` and its `CurveTrace`s. Everything else stays internal to
//! the pipeline modules.

// Curve definitions and models
pub use crate::curve::{
    CurveDef, CurveInput, CurveInputDef, CurveModel, CurveRole, Domain, SamplePoint,
};
// Options
pub use crate::cfg::{
    CompareCfg, ResolvedCfg, DEFAULT_MAX_ITERATIONS, DEFAULT_RESOLUTION, DEFAULT_ZERO_EPS,
};
// Stages
pub use crate::intersect::{find_intersections, IntersectionPoint, Intersections};
pub use crate::sample::{grid, sample, sample_over};
// Output
pub use crate::report::{compare, AnalysisReport, CurveSummary, CurveTrace, Side, Status};
pub use crate::error::{EngineError, Result};
