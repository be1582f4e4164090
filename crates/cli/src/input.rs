//! Curve files → engine inputs.
//!
//! - `.json`: a `CurveInputDef` (`{"primary": .., "control": ..}`) or a bare
//!   `CurveDef` (`{"kind": "polyline", ..}`).
//! - `.csv`: header with `x` and `y` columns, read through polars; becomes a
//!   polyline (or spline with `Interp::Spline`).

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use crossings::api::{CurveDef, CurveInput, CurveInputDef, CurveModel, SamplePoint};
use polars::prelude::*;
use serde::Deserialize;

/// How CSV breakpoints are joined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Interp {
    #[default]
    Linear,
    Spline,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FileDef {
    Input(CurveInputDef),
    Curve(CurveDef),
}

/// Load a primary curve (plus the file's own control curve, if it has one).
pub fn load_input(path: &Path, interp: Interp) -> Result<CurveInput> {
    match extension(path)?.as_str() {
        "csv" => Ok(CurveInput::new(load_csv(path, interp)?)),
        "json" => {
            let def = read_json(path)?;
            let input = match def {
                FileDef::Input(d) => d.build(),
                FileDef::Curve(d) => d.build().map(CurveInput::new),
            };
            input.with_context(|| format!("building curve from {}", path.display()))
        }
        other => bail!("unsupported curve file extension `.{other}` ({})", path.display()),
    }
}

/// Load a single curve; for a JSON input definition this is its primary.
pub fn load_curve(path: &Path, interp: Interp) -> Result<CurveModel> {
    Ok(load_input(path, interp)?.primary().clone())
}

fn extension(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| anyhow!("curve file {} has no extension", path.display()))
}

fn read_json(path: &Path) -> Result<FileDef> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("parsing curve definition {}", path.display()))
}

fn load_csv(path: &Path, interp: Interp) -> Result<CurveModel> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .select([
            col("x").cast(DataType::Float64),
            col("y").cast(DataType::Float64),
        ])
        .collect()
        .with_context(|| format!("reading x,y columns from {}", path.display()))?;
    tracing::debug!(rows = df.height(), path = %path.display(), "csv_breakpoints");

    let xs = df.column("x")?.f64()?;
    let ys = df.column("y")?.f64()?;
    let points = xs
        .into_iter()
        .zip(ys)
        .enumerate()
        .map(|(row, xy)| match xy {
            (Some(x), Some(y)) => Ok(SamplePoint::new(x, y)),
            _ => Err(anyhow!("{}: row {} is missing x or y", path.display(), row + 1)),
        })
        .collect::<Result<Vec<_>>>()?;
    let curve = match interp {
        Interp::Linear => CurveModel::polyline(&points),
        Interp::Spline => CurveModel::spline(&points),
    };
    curve.with_context(|| format!("building curve from {}", path.display()))
}
