use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossings::api::{compare, sample, CompareCfg, Status, DEFAULT_RESOLUTION};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod input;
mod provenance;

use input::Interp;

#[derive(Parser)]
#[command(name = "crossings")]
#[command(about = "Compare two curves and report where they cross")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Compare two curve files and write the analysis report as JSON
    Compare {
        #[arg(long)]
        a: PathBuf,
        #[arg(long)]
        b: PathBuf,
        /// Control overlay for curve A (replaces one defined in A's file)
        #[arg(long)]
        control_a: Option<PathBuf>,
        #[arg(long)]
        control_b: Option<PathBuf>,
        /// How CSV breakpoints are joined
        #[arg(long, value_enum, default_value_t = Interp::Linear)]
        interp: Interp,
        #[command(flatten)]
        opts: CfgArgs,
        /// Report path; stdout when absent. A provenance sidecar is written next to it.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the sampled points of one curve as JSON
    Sample {
        #[arg(long)]
        curve: PathBuf,
        #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
        resolution: usize,
        #[arg(long, value_enum, default_value_t = Interp::Linear)]
        interp: Interp,
    },
    /// Print a small provenance JSON block
    Report,
}

/// Comparison options: an optional TOML/JSON file, then flag overrides.
#[derive(Args, Debug, Default)]
struct CfgArgs {
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    resolution: Option<usize>,
    #[arg(long)]
    root_tolerance: Option<f64>,
    #[arg(long)]
    min_separation: Option<f64>,
    #[arg(long)]
    max_iterations: Option<usize>,
    /// Sample both curves on the calling thread
    #[arg(long)]
    sequential: bool,
}

impl CfgArgs {
    fn to_cfg(&self) -> Result<CompareCfg> {
        let mut cfg = match &self.config {
            Some(path) => read_cfg(path)?,
            None => CompareCfg::default(),
        };
        if let Some(r) = self.resolution {
            cfg.resolution = r;
        }
        if self.root_tolerance.is_some() {
            cfg.root_tolerance = self.root_tolerance;
        }
        if self.min_separation.is_some() {
            cfg.min_separation = self.min_separation;
        }
        if let Some(m) = self.max_iterations {
            cfg.max_iterations = m;
        }
        if self.sequential {
            cfg.parallel = false;
        }
        Ok(cfg)
    }
}

fn read_cfg(path: &Path) -> Result<CompareCfg> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
    } else {
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
    };
    Ok(cfg)
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Compare {
            a,
            b,
            control_a,
            control_b,
            interp,
            opts,
            out,
        } => run_compare(
            CurvePaths {
                a,
                b,
                control_a,
                control_b,
            },
            interp,
            &opts,
            out,
        ),
        Action::Sample {
            curve,
            resolution,
            interp,
        } => run_sample(&curve, resolution, interp),
        Action::Report => report(),
    }
}

struct CurvePaths {
    a: PathBuf,
    b: PathBuf,
    control_a: Option<PathBuf>,
    control_b: Option<PathBuf>,
}

impl CurvePaths {
    fn all(&self) -> Vec<String> {
        [
            Some(&self.a),
            Some(&self.b),
            self.control_a.as_ref(),
            self.control_b.as_ref(),
        ]
        .into_iter()
        .flatten()
        .map(|p| p.display().to_string())
        .collect()
    }
}

fn run_compare(
    paths: CurvePaths,
    interp: Interp,
    opts: &CfgArgs,
    out: Option<PathBuf>,
) -> Result<()> {
    let cfg = opts.to_cfg()?;
    tracing::info!(
        a = %paths.a.display(),
        b = %paths.b.display(),
        resolution = cfg.resolution,
        "compare"
    );

    let mut a = input::load_input(&paths.a, interp)?;
    if let Some(p) = &paths.control_a {
        a = a.with_control(input::load_curve(p, interp)?);
    }
    let mut b = input::load_input(&paths.b, interp)?;
    if let Some(p) = &paths.control_b {
        b = b.with_control(input::load_curve(p, interp)?);
    }

    let report = compare(&a, &b, &cfg).context("comparison failed")?;
    match report.status {
        Status::Ok => tracing::info!(count = report.count, "intersections found"),
        Status::NoOverlap => tracing::warn!("curve domains do not overlap"),
        Status::Coincident => tracing::warn!("curves coincide on their overlap"),
    }

    let json = serde_json::to_string_pretty(&report)?;
    let Some(out) = out else {
        println!("{json}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&out, &json).with_context(|| format!("writing {}", out.display()))?;
    let sidecar = provenance::write_sidecar(
        &out,
        provenance::Payload {
            inputs: paths.all(),
            params: serde_json::to_value(cfg)?,
        },
    )?;
    tracing::info!(out = %out.display(), provenance = %sidecar.display(), "report written");
    Ok(())
}

fn run_sample(path: &Path, resolution: usize, interp: Interp) -> Result<()> {
    println!("{}", sample_json(path, resolution, interp)?);
    Ok(())
}

fn sample_json(path: &Path, resolution: usize, interp: Interp) -> Result<String> {
    let curve = input::load_curve(path, interp)?;
    let points = sample(&curve, resolution)?;
    tracing::info!(curve = %path.display(), samples = points.len(), "sample");
    Ok(serde_json::to_string_pretty(&points)?)
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "engine_version": crossings::VERSION,
        "defaults": CompareCfg::default(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
