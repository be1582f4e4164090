//! Curve representations behind `CurveModel`.
//!
//! - `Polyline`: linear interpolation between breakpoints.
//! - `Spline`: natural cubic spline through breakpoints (moments via LU).
//! - `Polynomial`: ascending-power coefficients, Horner evaluation.
//! - `Function`: opaque closure supplied by the caller.
//!
//! All variants assume `x` already lies in the owning model's domain.

use std::fmt;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use super::types::SamplePoint;
use crate::error::{EngineError, Result};

pub(crate) type CurveFn = dyn Fn(f64) -> f64 + Send + Sync;

#[derive(Clone)]
pub(crate) enum Shape {
    Polyline(Breakpoints),
    Spline(CubicSpline),
    Polynomial(Vec<f64>),
    Function(Arc<CurveFn>),
}

impl Shape {
    pub(crate) fn eval(&self, x: f64) -> f64 {
        match self {
            Shape::Polyline(bp) => bp.lerp(x),
            Shape::Spline(s) => s.eval(x),
            Shape::Polynomial(c) => horner(c, x),
            Shape::Function(f) => f(x),
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Shape::Polyline(_) => "polyline",
            Shape::Spline(_) => "spline",
            Shape::Polynomial(_) => "polynomial",
            Shape::Function(_) => "function",
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Polyline(bp) => f.debug_tuple("Polyline").field(&bp.xs.len()).finish(),
            Shape::Spline(s) => f.debug_tuple("Spline").field(&s.xs.len()).finish(),
            Shape::Polynomial(c) => f.debug_tuple("Polynomial").field(c).finish(),
            Shape::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// `Σ c_k x^k` with `coefs = [c_0, c_1, ..]`.
#[inline]
pub(crate) fn horner(coefs: &[f64], x: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, &c| acc.mul_add(x, c))
}

/// Validated breakpoints: strictly increasing finite x, finite y, at least two.
#[derive(Clone, Debug)]
pub(crate) struct Breakpoints {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Breakpoints {
    pub(crate) fn new(points: &[SamplePoint]) -> Result<Self> {
        if points.len() < 2 {
            return Err(EngineError::invalid_curve(format!(
                "need at least 2 breakpoints, got {}",
                points.len()
            )));
        }
        for (i, p) in points.iter().enumerate() {
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(EngineError::invalid_curve(format!(
                    "breakpoint {i} is not finite: ({}, {})",
                    p.x, p.y
                )));
            }
        }
        if let Some(i) = points.windows(2).position(|w| w[1].x <= w[0].x) {
            return Err(EngineError::invalid_curve(format!(
                "breakpoint x must be strictly increasing (index {})",
                i + 1
            )));
        }
        Ok(Self {
            xs: points.iter().map(|p| p.x).collect(),
            ys: points.iter().map(|p| p.y).collect(),
        })
    }

    #[inline]
    pub(crate) fn first_x(&self) -> f64 {
        self.xs[0]
    }
    #[inline]
    pub(crate) fn last_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    /// Index of the segment `[x_i, x_{i+1}]` holding `x` (clamped to the ends).
    #[inline]
    fn segment(&self, x: f64) -> usize {
        let n = self.xs.len();
        self.xs
            .partition_point(|&p| p <= x)
            .saturating_sub(1)
            .min(n - 2)
    }

    fn lerp(&self, x: f64) -> f64 {
        let i = self.segment(x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let t = (x - x0) / (x1 - x0);
        y0 + t * (y1 - y0)
    }
}

/// Natural cubic spline; per segment `S_i(t) = a + b t + c t² + d t³`,
/// `t = x − x_i`, stored in Horner order `[d, c, b, a]`.
#[derive(Clone, Debug)]
pub(crate) struct CubicSpline {
    xs: Vec<f64>,
    segments: Vec<[f64; 4]>,
}

impl CubicSpline {
    pub(crate) fn new(bp: &Breakpoints) -> Result<Self> {
        let n = bp.xs.len();
        let h: Vec<f64> = bp.xs.windows(2).map(|w| w[1] - w[0]).collect();
        let moments = natural_moments(bp, &h)?;
        debug_assert_eq!(moments.len(), n);
        let segments = (0..n - 1)
            .map(|i| {
                let d = (moments[i + 1] - moments[i]) / (6.0 * h[i]);
                let c = moments[i] / 2.0;
                let b = (bp.ys[i + 1] - bp.ys[i]) / h[i]
                    - h[i] * (2.0 * moments[i] + moments[i + 1]) / 6.0;
                [d, c, b, bp.ys[i]]
            })
            .collect();
        Ok(Self {
            xs: bp.xs.clone(),
            segments,
        })
    }

    fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = self
            .xs
            .partition_point(|&p| p <= x)
            .saturating_sub(1)
            .min(n - 2);
        let t = x - self.xs[i];
        let [d, c, b, a] = self.segments[i];
        d.mul_add(t, c).mul_add(t, b).mul_add(t, a)
    }
}

/// Second derivatives at the breakpoints with `M_0 = M_{n-1} = 0`.
fn natural_moments(bp: &Breakpoints, h: &[f64]) -> Result<Vec<f64>> {
    let n = bp.xs.len();
    let mut moments = vec![0.0; n];
    if n < 3 {
        return Ok(moments);
    }
    let m = n - 2;
    let mut a = DMatrix::<f64>::zeros(m, m);
    let mut rhs = DVector::<f64>::zeros(m);
    for r in 0..m {
        let i = r + 1;
        a[(r, r)] = 2.0 * (h[i - 1] + h[i]);
        if r > 0 {
            a[(r, r - 1)] = h[i - 1];
        }
        if r + 1 < m {
            a[(r, r + 1)] = h[i];
        }
        rhs[r] = 6.0
            * ((bp.ys[i + 1] - bp.ys[i]) / h[i] - (bp.ys[i] - bp.ys[i - 1]) / h[i - 1]);
    }
    let sol = a
        .lu()
        .solve(&rhs)
        .ok_or_else(|| EngineError::invalid_curve("spline moment system is singular"))?;
    moments[1..n - 1].copy_from_slice(sol.as_slice());
    if moments.iter().any(|v| !v.is_finite()) {
        return Err(EngineError::invalid_curve("spline moments are not finite"));
    }
    Ok(moments)
}
