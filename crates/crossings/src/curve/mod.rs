//! Curve models: immutable, bounded-domain, evaluable functions `y = f(x)`.
//!
//! Purpose
//! - Give every stage downstream (sampler, finder, report) one opaque
//!   `evaluate(x)` contract regardless of how the curve was defined.
//! - Enforce the domain contract: queries outside `[lo, hi]` fail with
//!   `EngineError::Domain`, non-finite values with `EngineError::Evaluation`.
//!
//! Representations
//! - Breakpoints (polyline or natural cubic spline), polynomial coefficients,
//!   or a caller-supplied closure. See `shape.rs`.
//! - `CurveDef` is the serde form used by file-based callers.
//!
//! Code cross-refs: `sample::{grid,sample}`, `intersect::find_intersections`,
//! `report::compare`.

mod shape;
mod types;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use shape::{Breakpoints, CubicSpline, Shape};

pub use types::{CurveRole, Domain, SamplePoint};

/// One input curve. Clones share the underlying representation.
#[derive(Clone, Debug)]
pub struct CurveModel {
    domain: Domain,
    role: CurveRole,
    shape: Arc<Shape>,
}

impl CurveModel {
    /// Piecewise-linear curve through `points` (x strictly increasing).
    pub fn polyline(points: &[SamplePoint]) -> Result<Self> {
        let bp = Breakpoints::new(points)?;
        let domain = Domain::new(bp.first_x(), bp.last_x())?;
        Ok(Self::with_shape(domain, Shape::Polyline(bp)))
    }

    /// Natural cubic spline through `points`. Two points give a straight line.
    pub fn spline(points: &[SamplePoint]) -> Result<Self> {
        let bp = Breakpoints::new(points)?;
        let domain = Domain::new(bp.first_x(), bp.last_x())?;
        let spline = CubicSpline::new(&bp)?;
        Ok(Self::with_shape(domain, Shape::Spline(spline)))
    }

    /// Polynomial `Σ c_k x^k` over `domain`; `coefficients = [c_0, c_1, ..]`.
    pub fn polynomial(domain: Domain, coefficients: Vec<f64>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(EngineError::invalid_curve("polynomial needs at least one coefficient"));
        }
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(EngineError::invalid_curve("polynomial coefficients must be finite"));
        }
        Ok(Self::with_shape(domain, Shape::Polynomial(coefficients)))
    }

    /// Opaque closure over `domain`. Finiteness is checked per evaluation.
    pub fn from_fn<F>(domain: Domain, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self::with_shape(domain, Shape::Function(Arc::new(f)))
    }

    fn with_shape(domain: Domain, shape: Shape) -> Self {
        Self {
            domain,
            role: CurveRole::Primary,
            shape: Arc::new(shape),
        }
    }

    /// Same curve with a different role.
    pub fn with_role(mut self, role: CurveRole) -> Self {
        self.role = role;
        self
    }

    #[inline]
    pub fn domain(&self) -> Domain {
        self.domain
    }
    #[inline]
    pub fn role(&self) -> CurveRole {
        self.role
    }
    /// Short name of the representation (`polyline`, `spline`, ...).
    pub fn kind(&self) -> &'static str {
        self.shape.kind()
    }

    /// `y` at `x`. Fails outside the domain or on a non-finite result.
    pub fn evaluate(&self, x: f64) -> Result<f64> {
        if !self.domain.contains(x) {
            return Err(EngineError::Domain {
                x,
                domain: self.domain,
            });
        }
        let y = self.shape.eval(x);
        if !y.is_finite() {
            return Err(EngineError::Evaluation { x, value: y });
        }
        Ok(y)
    }
}

/// A primary curve plus its optional control overlay (one uploaded file).
#[derive(Clone, Debug)]
pub struct CurveInput {
    primary: CurveModel,
    control: Option<CurveModel>,
}

impl CurveInput {
    pub fn new(primary: CurveModel) -> Self {
        Self {
            primary: primary.with_role(CurveRole::Primary),
            control: None,
        }
    }

    pub fn with_control(mut self, control: CurveModel) -> Self {
        self.control = Some(control.with_role(CurveRole::Control));
        self
    }

    #[inline]
    pub fn primary(&self) -> &CurveModel {
        &self.primary
    }
    #[inline]
    pub fn control(&self) -> Option<&CurveModel> {
        self.control.as_ref()
    }
}

impl From<CurveModel> for CurveInput {
    fn from(primary: CurveModel) -> Self {
        Self::new(primary)
    }
}

/// Serializable curve definition, as produced by an upstream parser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveDef {
    Polyline { points: Vec<[f64; 2]> },
    Spline { points: Vec<[f64; 2]> },
    Polynomial { domain: Domain, coefficients: Vec<f64> },
}

impl CurveDef {
    pub fn build(&self) -> Result<CurveModel> {
        match self {
            CurveDef::Polyline { points } => CurveModel::polyline(&to_samples(points)),
            CurveDef::Spline { points } => CurveModel::spline(&to_samples(points)),
            CurveDef::Polynomial {
                domain,
                coefficients,
            } => CurveModel::polynomial(*domain, coefficients.clone()),
        }
    }
}

fn to_samples(points: &[[f64; 2]]) -> Vec<SamplePoint> {
    points.iter().map(|&[x, y]| SamplePoint::new(x, y)).collect()
}

/// Serializable `CurveInput`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurveInputDef {
    pub primary: CurveDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<CurveDef>,
}

impl CurveInputDef {
    pub fn build(&self) -> Result<CurveInput> {
        let input = CurveInput::new(self.primary.build()?);
        match &self.control {
            Some(def) => Ok(input.with_control(def.build()?)),
            None => Ok(input),
        }
    }
}
