use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{BootstrapError, FailureKind};
use crate::progress;

pub const WARNING_MARK: &str = "⚠️";
const WARNING_EXPORT_MISSING: &str = "⚠️ Game not exported yet";

/// Where the bootstrap sequence currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Probing,
    LoadingScript,
    Initializing,
    Starting,
    Running,
    Failed,
}

impl Phase {
    /// The single forward successor, `None` for terminal phases.
    pub fn next(&self) -> Option<Phase> {
        match self {
            Self::Probing => Some(Self::LoadingScript),
            Self::LoadingScript => Some(Self::Initializing),
            Self::Initializing => Some(Self::Starting),
            Self::Starting => Some(Self::Running),
            Self::Running | Self::Failed => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Running | Self::Failed)
    }

    pub fn can_advance_to(&self, next: Phase) -> bool {
        match next {
            Phase::Failed => !self.is_terminal(),
            _ => self.next() == Some(next),
        }
    }

    /// Phases during which engine progress is meaningful.
    pub fn accepts_progress(&self) -> bool {
        matches!(self, Self::LoadingScript | Self::Initializing | Self::Starting)
    }

    pub fn status_message(&self) -> &'static str {
        match self {
            Self::Probing => "Checking for game files...",
            Self::LoadingScript => "Loading game engine...",
            Self::Initializing => "Initializing engine...",
            Self::Starting => "Starting game...",
            Self::Running => "",
            Self::Failed => "Failed to load game",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Probing => "probing",
            Self::LoadingScript => "loading-script",
            Self::Initializing => "initializing",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Everything the status overlay needs to know. Mutated only by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapState {
    pub phase: Phase,
    pub progress_percent: u8,
    pub message: String,
    pub error: Option<BootstrapError>,
}

/// The UI-facing projection of [`BootstrapState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSnapshot {
    pub status: String,
    pub progress: u8,
    pub loading: bool,
    pub error: Option<String>,
}

impl BootstrapState {
    pub fn new(initial: Phase) -> Self {
        Self {
            phase: initial,
            progress_percent: 0,
            message: initial.status_message().to_string(),
            error: None,
        }
    }

    /// Moves to `next` if it is the forward successor. Returns whether it moved.
    pub fn advance(&mut self, next: Phase) -> bool {
        if next == Phase::Failed || !self.phase.can_advance_to(next) {
            log::warn!("Ignoring bootstrap transition {} -> {}", self.phase, next);
            return false;
        }
        self.phase = next;
        // Keep the "Loading... N%" text once the engine has reported progress.
        if self.progress_percent == 0 || next == Phase::Running {
            self.message = next.status_message().to_string();
        }
        true
    }

    /// Records a terminal failure. No-op once the sequence has terminated.
    pub fn fail(&mut self, error: BootstrapError) -> bool {
        if self.phase.is_terminal() {
            log::warn!("Ignoring failure after terminal phase {}: {error}", self.phase);
            return false;
        }
        self.phase = Phase::Failed;
        self.message = match error.kind() {
            FailureKind::ArtifactMissing => WARNING_EXPORT_MISSING.to_string(),
            _ => Phase::Failed.status_message().to_string(),
        };
        self.error = Some(error);
        true
    }

    /// Applies an engine progress report. Returns whether the state changed.
    pub fn apply_progress(&mut self, current: f64, total: f64) -> bool {
        if !self.phase.accepts_progress() {
            return false;
        }
        let Some(pct) = progress::percent(current, total) else {
            return false;
        };
        let pct = pct.max(self.progress_percent);
        let message = format!("Loading... {pct}%");
        if pct == self.progress_percent && message == self.message {
            return false;
        }
        self.progress_percent = pct;
        self.message = message;
        true
    }

    pub fn error_detail(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }

    pub fn snapshot(&self) -> UiSnapshot {
        UiSnapshot {
            status: self.message.clone(),
            progress: self.progress_percent,
            loading: self.phase != Phase::Running,
            error: self.error_detail(),
        }
    }
}

type Observer = Box<dyn Fn(&BootstrapState)>;

/// Shared single-threaded owner of the bootstrap state.
///
/// Observers run synchronously after every change and must not mutate the
/// cell or subscribe from inside the callback.
#[derive(Clone)]
pub struct StateCell {
    state: Rc<RefCell<BootstrapState>>,
    observers: Rc<RefCell<Vec<Observer>>>,
}

impl StateCell {
    pub fn new(initial: Phase) -> Self {
        Self {
            state: Rc::new(RefCell::new(BootstrapState::new(initial))),
            observers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn get(&self) -> BootstrapState {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.borrow().phase
    }

    pub fn snapshot(&self) -> UiSnapshot {
        self.state.borrow().snapshot()
    }

    /// Registers an observer and immediately shows it the current state.
    pub fn subscribe(&self, observer: impl Fn(&BootstrapState) + 'static) {
        observer(&*self.state.borrow());
        self.observers.borrow_mut().push(Box::new(observer));
    }

    /// Runs `f` against the state; observers are notified when it reports a change.
    pub fn update(&self, f: impl FnOnce(&mut BootstrapState) -> bool) -> bool {
        let changed = f(&mut *self.state.borrow_mut());
        if changed {
            let state = self.state.borrow();
            for observer in self.observers.borrow().iter() {
                observer(&*state);
            }
        }
        changed
    }
}

impl fmt::Debug for StateCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCell")
            .field("state", &self.state.borrow())
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}
