use std::path::{Path, PathBuf};

use aitherworks_bootstrap::BootstrapConfig;

pub const CONFIG_FILE: &str = "aitherworks.toml";
pub const EXPORT_SCRIPT: &str = "scripts/export_web.sh";

/// How the project root was recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectKind {
    /// Has an aitherworks.toml overriding the export layout
    Configured,
    /// Only the export script; default layout applies
    ExportScript,
}

/// The resolved project context.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub project_root: PathBuf,
    pub kind: ProjectKind,
    pub config: BootstrapConfig,
}

/// Detect project context from the current directory, walking up.
pub fn detect_project_context() -> anyhow::Result<ProjectContext> {
    detect_project_context_from(&std::env::current_dir()?)
}

/// Detect project context starting from a specific directory, walking up.
pub fn detect_project_context_from(start: &Path) -> anyhow::Result<ProjectContext> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config = BootstrapConfig::from_toml_str(&content)?;
            log::debug!("Using {}", config_path.display());
            return Ok(ProjectContext {
                project_root: dir,
                kind: ProjectKind::Configured,
                config,
            });
        }
        if dir.join(EXPORT_SCRIPT).exists() {
            return Ok(ProjectContext {
                project_root: dir,
                kind: ProjectKind::ExportScript,
                config: BootstrapConfig::default(),
            });
        }
        if !dir.pop() {
            anyhow::bail!(
                "Could not find an AItherworks project.\n\
                 Run `awcli` from a directory containing {CONFIG_FILE} or {EXPORT_SCRIPT}."
            );
        }
    }
}
