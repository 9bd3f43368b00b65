use thiserror::Error;

/// Why the bootstrap sequence stopped. Every kind is terminal for the page.
///
/// The `Display` text is the error detail shown in the status overlay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BootstrapError {
    /// The existence check for the bootstrap script failed: the export step
    /// was never run.
    #[error("Game files not found. Please run: {export_command}")]
    ArtifactMissing { url: String, export_command: String },

    /// The browser could not fetch or execute the bootstrap script.
    #[error("Failed to load game engine: {0}")]
    ScriptLoad(String),

    /// The script loaded but never registered the engine constructor.
    #[error("Godot Engine not initialized. Make sure you ran: {export_command}")]
    EngineNotInitialized { export_command: String },

    /// The engine rejected its start operation; carries the engine's own text.
    #[error("{0}")]
    StartFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    ArtifactMissing,
    ScriptLoadError,
    EngineNotInitialized,
    StartFailed,
}

impl FailureKind {
    /// Whether the overlay should list the export/refresh steps.
    pub fn has_remediation(&self) -> bool {
        matches!(self, Self::ArtifactMissing | Self::EngineNotInitialized)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ArtifactMissing => "artifact missing",
            Self::ScriptLoadError => "script load error",
            Self::EngineNotInitialized => "engine not initialized",
            Self::StartFailed => "start failed",
        }
    }
}

impl BootstrapError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ArtifactMissing { .. } => FailureKind::ArtifactMissing,
            Self::ScriptLoad(_) => FailureKind::ScriptLoadError,
            Self::EngineNotInitialized { .. } => FailureKind::EngineNotInitialized,
            Self::StartFailed(_) => FailureKind::StartFailed,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid bootstrap config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("bootstrap config field `{0}` must not be empty")]
    EmptyField(&'static str),
}
