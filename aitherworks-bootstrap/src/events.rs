use std::rc::Rc;

use crate::state::StateCell;

/// Something the engine reported while loading or running.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Progress { current: f64, total: f64 },
    Print(String),
    PrintError(String),
}

struct Prefixes {
    print: String,
    error: String,
}

/// Delivery end of the engine event channel.
///
/// Handed to the host when the engine is constructed; events land in the
/// controller's state and the diagnostic log.
#[derive(Clone)]
pub struct EventSink {
    state: StateCell,
    prefixes: Rc<Prefixes>,
}

impl EventSink {
    pub(crate) fn new(state: StateCell, print_prefix: &str, error_prefix: &str) -> Self {
        Self {
            state,
            prefixes: Rc::new(Prefixes {
                print: print_prefix.to_string(),
                error: error_prefix.to_string(),
            }),
        }
    }

    pub fn send(&self, event: EngineEvent) {
        match event {
            EngineEvent::Progress { current, total } => {
                self.state.update(|s| s.apply_progress(current, total));
            }
            EngineEvent::Print(text) => {
                log::info!(target: "engine", "{} {}", self.prefixes.print, text);
            }
            EngineEvent::PrintError(text) => {
                log::error!(target: "engine", "{} {}", self.prefixes.error, text);
            }
        }
    }

    pub fn progress(&self, current: f64, total: f64) {
        self.send(EngineEvent::Progress { current, total });
    }
}
