//! Capabilities the bootstrap sequence needs from its environment.
//!
//! The browser implements these with `fetch`, script tags and the engine's
//! global constructor; tests implement them with fakes. Futures are not
//! `Send`: the page runs on a single event loop.
#![allow(async_fn_in_trait)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::config::LaunchConfig;
use crate::events::EventSink;

/// A constructed engine instance.
pub trait Engine {
    /// Starts the game; resolves once it is running, or with the engine's error text.
    async fn start(&self, launch: &LaunchConfig) -> Result<(), String>;

    /// Best-effort shutdown request.
    fn request_quit(&self);
}

pub trait Host {
    type Engine: Engine;

    /// Network existence check for an artifact URL.
    async fn probe(&self, url: &str) -> Result<(), String>;

    /// Fetches and executes a script in the page's global scope.
    async fn load_script(&self, url: &str) -> Result<(), String>;

    async fn sleep(&self, duration: Duration);

    /// Constructs the engine against the host's canvas. `None` when the
    /// bootstrap script did not register a constructor.
    fn construct_engine(&self, events: EventSink) -> Option<Self::Engine>;
}

/// Holds the engine handle for the lifetime of the mounted page.
pub struct EngineSlot<E> {
    inner: Rc<RefCell<Option<Rc<E>>>>,
}

impl<E> Clone for EngineSlot<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E> Default for EngineSlot<E> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(None)),
        }
    }
}

impl<E: Engine> EngineSlot<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn install(&self, engine: Rc<E>) {
        *self.inner.borrow_mut() = Some(engine);
    }

    pub fn is_occupied(&self) -> bool {
        self.inner.borrow().is_some()
    }

    /// Asks the engine to quit and drops the handle. Returns whether a
    /// request was issued; later calls are no-ops.
    pub fn release(&self) -> bool {
        let engine = self.inner.borrow_mut().take();
        match engine {
            Some(engine) => {
                log::info!("Requesting engine quit");
                engine.request_quit();
                true
            }
            None => false,
        }
    }
}
