use std::path::{Path, PathBuf};

use aitherworks_bootstrap::presenter::remediation_steps;
use aitherworks_bootstrap::BootstrapConfig;
use chrono::{DateTime, Local};

use crate::project::ProjectContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactStatus {
    Found { size: u64, modified: Option<String> },
    Missing,
}

#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub url: String,
    pub path: PathBuf,
    pub status: ArtifactStatus,
}

impl ArtifactReport {
    pub fn is_missing(&self) -> bool {
        self.status == ArtifactStatus::Missing
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    Found { path: PathBuf },
    NotFound,
}

/// Maps every artifact URL the page requests onto the static output directory.
pub fn inspect(out_dir: &Path, config: &BootstrapConfig) -> Vec<ArtifactReport> {
    config
        .artifact_paths()
        .into_iter()
        .map(|url| {
            let path = out_dir.join(url.trim_start_matches('/'));
            let status = match std::fs::metadata(&path) {
                Ok(meta) if meta.is_file() => ArtifactStatus::Found {
                    size: meta.len(),
                    modified: meta.modified().ok().map(|t| {
                        DateTime::<Local>::from(t)
                            .format("%Y-%m-%d %H:%M")
                            .to_string()
                    }),
                },
                _ => ArtifactStatus::Missing,
            };
            ArtifactReport { url, path, status }
        })
        .collect()
}

pub fn godot_status() -> ToolStatus {
    match which::which("godot") {
        Ok(path) => ToolStatus::Found { path },
        Err(_) => ToolStatus::NotFound,
    }
}

pub fn run(out: PathBuf, ctx: ProjectContext) -> anyhow::Result<()> {
    let out_dir = ctx.project_root.join(out);
    println!("Checking web export in {}", out_dir.display());

    let reports = inspect(&out_dir, &ctx.config);
    for report in &reports {
        match &report.status {
            ArtifactStatus::Found { size, modified } => println!(
                "  ok       {:<32} {:>10} bytes  {}",
                report.url,
                size,
                modified.as_deref().unwrap_or("-")
            ),
            ArtifactStatus::Missing => {
                println!("  missing  {:<32} ({})", report.url, report.path.display())
            }
        }
    }

    match godot_status() {
        ToolStatus::Found { path } => println!("  godot    {}", path.display()),
        ToolStatus::NotFound => println!("  godot    not found on PATH"),
    }

    let missing = reports.iter().filter(|r| r.is_missing()).count();
    if missing > 0 {
        println!("\nSteps to fix:");
        for (i, step) in remediation_steps(&ctx.config.export_command).iter().enumerate() {
            println!("  {}. {step}", i + 1);
        }
        anyhow::bail!("{missing} of {} artifacts missing", reports.len());
    }
    println!("All artifacts present.");
    Ok(())
}
