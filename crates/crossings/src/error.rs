//! Error taxonomy shared by every stage of a comparison.
//!
//! Statuses such as `NoOverlap` or `Coincident` are analysis outcomes and live
//! in `report::Status`; only genuine failures are represented here.

use thiserror::Error;

use crate::curve::Domain;

/// Errors surfaced by curve construction, sampling and intersection search.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EngineError {
    /// `resolution < 2`; rejected before any sampling.
    #[error("invalid resolution {resolution}: at least 2 samples are required")]
    InvalidResolution { resolution: usize },
    /// A curve was queried outside its declared domain (integration bug).
    #[error("x = {x} lies outside the curve domain {domain}")]
    Domain { x: f64, domain: Domain },
    /// A curve produced a non-finite value inside its domain.
    #[error("curve evaluated to {value} at x = {x}")]
    Evaluation { x: f64, value: f64 },
    /// Malformed curve definition (breakpoints, coefficients, bounds, role).
    #[error("invalid curve: {reason}")]
    InvalidCurve { reason: String },
    /// A comparison option other than the resolution is out of range.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: &'static str, reason: String },
}

impl EngineError {
    pub(crate) fn invalid_curve(reason: impl Into<String>) -> Self {
        Self::InvalidCurve {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_option(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
