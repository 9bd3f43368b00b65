//! Pure projection of [`BootstrapState`] onto the status overlay.

use crate::config::BootstrapConfig;
use crate::state::{BootstrapState, Phase, WARNING_MARK};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Bar filled to the given percentage.
    Determinate(u8),
    /// Animated placeholder while no completion fraction is known.
    Indeterminate,
}

/// What the overlay should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Game running: only the canvas is visible.
    Hidden,
    Loading {
        indicator: Indicator,
        notice: String,
    },
    Failure {
        headline: String,
        detail: String,
        /// Steps to fix, empty when the failure is not remediable by exporting.
        remediation: Vec<String>,
    },
}

impl Overlay {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

pub fn present(state: &BootstrapState, config: &BootstrapConfig) -> Overlay {
    match state.phase {
        Phase::Running => Overlay::Hidden,
        Phase::Failed => {
            let remediable = state
                .error
                .as_ref()
                .is_some_and(|e| e.kind().has_remediation());
            Overlay::Failure {
                headline: warning_headline(&state.message),
                detail: state.error_detail().unwrap_or_default(),
                remediation: if remediable {
                    remediation_steps(&config.export_command)
                } else {
                    Vec::new()
                },
            }
        }
        _ => Overlay::Loading {
            indicator: if state.progress_percent > 0 {
                Indicator::Determinate(state.progress_percent)
            } else {
                Indicator::Indeterminate
            },
            notice: state.message.clone(),
        },
    }
}

fn warning_headline(message: &str) -> String {
    if message.starts_with(WARNING_MARK) {
        message.to_string()
    } else {
        format!("{WARNING_MARK} {message}")
    }
}

pub fn remediation_steps(export_command: &str) -> Vec<String> {
    vec![
        "Open a terminal in the project root".to_string(),
        format!("Run: {export_command}"),
        "Wait for export to complete".to_string(),
        "Refresh this page".to_string(),
    ]
}
