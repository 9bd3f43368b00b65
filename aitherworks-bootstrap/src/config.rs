use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_SCRIPT_URL: &str = "/godot/aitherworks.js";
pub const DEFAULT_EXECUTABLE: &str = "/godot/aitherworks";
pub const DEFAULT_MAIN_PACK: &str = "/godot/aitherworks.pck";
pub const DEFAULT_EXPORT_COMMAND: &str = "./scripts/export_web.sh";
// Gives a freshly executed script time to register its global export.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 100;

/// Locations of the exported engine artifacts and bootstrap tunables.
///
/// Read from `aitherworks.toml`; every field falls back to the layout the
/// web export script produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    pub script_url: String,
    pub executable: String,
    pub main_pack: String,
    /// Check that the bootstrap script is reachable before injecting it.
    pub probe: bool,
    pub settle_delay_ms: u64,
    /// Shown in remediation text when the export is missing.
    pub export_command: String,
    pub print_prefix: String,
    pub error_prefix: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            executable: DEFAULT_EXECUTABLE.to_string(),
            main_pack: DEFAULT_MAIN_PACK.to_string(),
            probe: true,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            export_command: DEFAULT_EXPORT_COMMAND.to_string(),
            print_prefix: "[Godot]".to_string(),
            error_prefix: "[Godot Error]".to_string(),
        }
    }
}

/// Start configuration handed opaquely to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    pub executable: String,
    pub main_pack: String,
}

impl BootstrapConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: BootstrapConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("script_url", &self.script_url),
            ("executable", &self.executable),
            ("main_pack", &self.main_pack),
            ("export_command", &self.export_command),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyField(name));
            }
        }
        Ok(())
    }

    pub fn launch(&self) -> LaunchConfig {
        LaunchConfig {
            executable: self.executable.clone(),
            main_pack: self.main_pack.clone(),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// URL paths a complete export must serve, bootstrap script first.
    pub fn artifact_paths(&self) -> Vec<String> {
        let mut paths = vec![self.script_url.clone()];
        paths.extend(self.launch().artifact_paths());
        paths
    }
}

impl LaunchConfig {
    /// The executable's wasm image and the main data pack.
    pub fn artifact_paths(&self) -> Vec<String> {
        vec![format!("{}.wasm", self.executable), self.main_pack.clone()]
    }
}
