//! Comparison options and their defaults.
//!
//! Policy
//! - `CompareCfg` is what callers pass (and what config files deserialize
//!   into); missing fields take the defaults below.
//! - Tolerances that depend on the overlap domain are left `None` and filled
//!   in by `resolve` once the overlap is known.

use serde::{Deserialize, Serialize};

use crate::curve::Domain;
use crate::error::{EngineError, Result};

/// Default number of samples per sequence.
pub const DEFAULT_RESOLUTION: usize = 512;
/// Default bisection iteration cap per bracket.
pub const DEFAULT_MAX_ITERATIONS: usize = 50;
/// Default `|A − B|` below which a difference counts as zero.
pub const DEFAULT_ZERO_EPS: f64 = 1e-12;
/// Divisor applied to the per-sample width for the default root tolerance.
const ROOT_TOLERANCE_DIVISOR: f64 = 1000.0;

/// Options for one comparison.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareCfg {
    /// Samples per sequence (≥ 2).
    pub resolution: usize,
    /// Bisection stops once the bracket is narrower than this.
    /// Default `(hi − lo) / resolution / 1000`.
    pub root_tolerance: Option<f64>,
    /// Roots closer than this collapse to the lowest one.
    /// Default one sample spacing `(hi − lo) / (resolution − 1)`.
    pub min_separation: Option<f64>,
    pub max_iterations: usize,
    /// ε for zero differences and the coincidence check, relative to the
    /// largest sampled magnitude (never below the absolute value).
    pub zero_eps: f64,
    /// Sample the two curves on separate threads.
    pub parallel: bool,
}

impl Default for CompareCfg {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            root_tolerance: None,
            min_separation: None,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            zero_eps: DEFAULT_ZERO_EPS,
            parallel: true,
        }
    }
}

/// Tolerances made concrete for a given overlap domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedCfg {
    pub resolution: usize,
    pub spacing: f64,
    pub root_tolerance: f64,
    pub min_separation: f64,
    pub max_iterations: usize,
    pub zero_eps: f64,
    pub parallel: bool,
}

impl CompareCfg {
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }

    /// Check every option. Resolution is checked first.
    pub fn validate(&self) -> Result<()> {
        check_resolution(self.resolution)?;
        if let Some(t) = self.root_tolerance {
            check_positive("root_tolerance", t)?;
        }
        if let Some(s) = self.min_separation {
            check_positive("min_separation", s)?;
        }
        if self.max_iterations == 0 {
            return Err(EngineError::invalid_option(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if !(self.zero_eps.is_finite() && self.zero_eps >= 0.0) {
            return Err(EngineError::invalid_option(
                "zero_eps",
                format!("must be finite and >= 0, got {}", self.zero_eps),
            ));
        }
        Ok(())
    }

    /// Fill in the domain-dependent defaults for `overlap`.
    pub fn resolve(&self, overlap: Domain) -> Result<ResolvedCfg> {
        self.validate()?;
        let n = self.resolution as f64;
        let spacing = overlap.width() / (n - 1.0);
        Ok(ResolvedCfg {
            resolution: self.resolution,
            spacing,
            root_tolerance: self
                .root_tolerance
                .unwrap_or(overlap.width() / n / ROOT_TOLERANCE_DIVISOR),
            min_separation: self.min_separation.unwrap_or(spacing),
            max_iterations: self.max_iterations,
            zero_eps: self.zero_eps,
            parallel: self.parallel,
        })
    }
}

pub(crate) fn check_resolution(resolution: usize) -> Result<()> {
    if resolution < 2 {
        return Err(EngineError::InvalidResolution { resolution });
    }
    Ok(())
}

fn check_positive(name: &'static str, v: f64) -> Result<()> {
    if !(v.is_finite() && v > 0.0) {
        return Err(EngineError::invalid_option(
            name,
            format!("must be finite and > 0, got {v}"),
        ));
    }
    Ok(())
}
