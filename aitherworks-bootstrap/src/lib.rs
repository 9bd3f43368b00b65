//! AItherworks engine bootstrap.
//!
//! Takes the game page from "nothing loaded" to "game running" (or a reported
//! failure): probes for the exported engine artifacts, loads the engine's
//! bootstrap script, constructs the engine against a canvas and starts it.
//! The browser side is injected through the [`Host`] trait so the whole
//! sequence runs against fakes in tests.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod host;
pub mod presenter;
pub mod progress;
pub mod state;

pub use config::{BootstrapConfig, LaunchConfig};
pub use controller::Bootstrap;
pub use error::{BootstrapError, ConfigError, FailureKind};
pub use events::{EngineEvent, EventSink};
pub use host::{Engine, EngineSlot, Host};
pub use presenter::{present, Indicator, Overlay};
pub use state::{BootstrapState, Phase, StateCell, UiSnapshot};
