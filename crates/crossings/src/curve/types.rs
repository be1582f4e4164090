//! Basic curve types: closed x-intervals, roles and sample points.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Closed interval `[lo, hi]` with finite bounds, `lo < hi` and a finite width.
///
/// Serialized as a two-element array `[lo, hi]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    lo: f64,
    hi: f64,
}

impl Domain {
    pub fn new(lo: f64, hi: f64) -> Result<Self> {
        if !(lo.is_finite() && hi.is_finite()) {
            return Err(EngineError::invalid_curve(format!(
                "domain bounds must be finite, got [{lo}, {hi}]"
            )));
        }
        if lo >= hi {
            return Err(EngineError::invalid_curve(format!(
                "domain needs lo < hi, got [{lo}, {hi}]"
            )));
        }
        if !(hi - lo).is_finite() {
            return Err(EngineError::invalid_curve(format!(
                "domain width overflows, got [{lo}, {hi}]"
            )));
        }
        Ok(Self { lo, hi })
    }

    #[inline]
    pub fn lo(&self) -> f64 {
        self.lo
    }
    #[inline]
    pub fn hi(&self) -> f64 {
        self.hi
    }
    #[inline]
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }
    #[inline]
    pub fn contains(&self, x: f64) -> bool {
        self.lo <= x && x <= self.hi
    }

    /// Common part of two domains; `None` when it is empty or a single point.
    pub fn overlap(&self, other: &Domain) -> Option<Domain> {
        let lo = self.lo.max(other.lo);
        let hi = self.hi.min(other.hi);
        (lo < hi).then_some(Domain { lo, hi })
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lo, self.hi)
    }
}

impl Serialize for Domain {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        [self.lo, self.hi].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Domain {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let [lo, hi] = <[f64; 2]>::deserialize(deserializer)?;
        Domain::new(lo, hi).map_err(serde::de::Error::custom)
    }
}

/// Visual/analytical role of a curve. Control curves are drawn as an overlay
/// and never take part in intersection search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveRole {
    #[default]
    Primary,
    Control,
}

/// One `(x, y)` sample of a curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

impl SamplePoint {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
