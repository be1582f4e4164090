use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What went into a report: the curve files and the effective options.
pub struct Payload {
    pub inputs: Vec<String>,
    pub params: Value,
}

/// Write `<report stem>.provenance.json` next to `report`.
pub fn write_sidecar<P: AsRef<Path>>(report: P, payload: Payload) -> Result<PathBuf> {
    let report = report.as_ref();
    let path = sidecar_path(report);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    let doc = json!({
        "code_rev": current_git_rev(),
        "engine_version": crossings::VERSION,
        "inputs": payload.inputs,
        "params": payload.params,
        "outputs": [report.to_string_lossy()]
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(report: &Path) -> PathBuf {
    let mut name = report
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("report"));
    name.push(".provenance.json");
    report.with_file_name(name)
}

pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|r| !r.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
