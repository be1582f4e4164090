//! Curve comparison and intersection analysis.
//!
//! Two curves (each a primary plus an optional control overlay) are sampled
//! on a shared grid; the engine reports every crossing of the two primaries
//! inside their common x-range and the summary data a renderer needs.
//!
//! Pipeline
//! - `curve`: immutable, bounded-domain, evaluable curve models.
//! - `sample`: uniform, deterministic sample sequences.
//! - `intersect`: sign-change bracketing, bisection, dedup and ordering.
//! - `report`: the one-shot `compare` entry point and `AnalysisReport`.
//!
//! Every stage is a pure function of its inputs; comparisons are re-entrant
//! and may run concurrently without coordination.

pub mod api;
pub mod cfg;
pub mod curve;
pub mod error;
pub mod intersect;
pub mod report;
pub mod sample;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::CompareCfg;
pub use curve::{CurveInput, CurveModel, Domain};
pub use error::{EngineError, Result};
pub use report::{compare, AnalysisReport, Status};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::CompareCfg;
    pub use crate::curve::{CurveInput, CurveModel, CurveRole, Domain, SamplePoint};
    pub use crate::error::EngineError;
    pub use crate::intersect::{find_intersections, IntersectionPoint, Intersections};
    pub use crate::report::{compare, AnalysisReport, Status};
}
