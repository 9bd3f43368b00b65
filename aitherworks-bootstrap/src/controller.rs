use std::cell::Cell;
use std::rc::Rc;

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;
use crate::events::EventSink;
use crate::host::{Engine, EngineSlot, Host};
use crate::state::{Phase, StateCell};

/// Drives one page load from probing to a running game or a reported failure.
///
/// The sequence runs at most once per instance: later calls to
/// [`Bootstrap::run`] leave the script, engine and state untouched.
pub struct Bootstrap<H: Host> {
    host: H,
    config: BootstrapConfig,
    state: StateCell,
    engine: EngineSlot<H::Engine>,
    started: Cell<bool>,
}

impl<H: Host> Bootstrap<H> {
    pub fn new(host: H, config: BootstrapConfig) -> Self {
        let initial = if config.probe {
            Phase::Probing
        } else {
            Phase::LoadingScript
        };
        Self {
            host,
            config,
            state: StateCell::new(initial),
            engine: EngineSlot::new(),
            started: Cell::new(false),
        }
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    pub fn state(&self) -> StateCell {
        self.state.clone()
    }

    pub fn engine_slot(&self) -> EngineSlot<H::Engine> {
        self.engine.clone()
    }

    /// Runs the whole sequence. Failures end up in the state, never in the
    /// return value; the final phase is returned for convenience.
    pub async fn run(&self) -> Phase {
        if self.started.replace(true) {
            log::warn!("Bootstrap already started; ignoring repeated run");
            return self.state.phase();
        }
        if let Err(err) = self.drive().await {
            log::error!("Failed to start game ({}): {err}", err.kind().label());
            self.state.update(|s| s.fail(err));
        }
        self.state.phase()
    }

    /// Releases the engine on page teardown. Returns whether a quit was requested.
    pub fn unmount(&self) -> bool {
        self.engine.release()
    }

    async fn drive(&self) -> Result<(), BootstrapError> {
        let config = &self.config;

        if self.state.phase() == Phase::Probing {
            log::info!("Probing for {}", config.script_url);
            if let Err(reason) = self.host.probe(&config.script_url).await {
                log::warn!("Probe for {} failed: {reason}", config.script_url);
                return Err(BootstrapError::ArtifactMissing {
                    url: config.script_url.clone(),
                    export_command: config.export_command.clone(),
                });
            }
            self.enter(Phase::LoadingScript);
        }

        self.host
            .load_script(&config.script_url)
            .await
            .map_err(BootstrapError::ScriptLoad)?;
        self.host.sleep(config.settle_delay()).await;
        self.enter(Phase::Initializing);

        let events = EventSink::new(
            self.state.clone(),
            &config.print_prefix,
            &config.error_prefix,
        );
        let engine = self.host.construct_engine(events).map(Rc::new).ok_or_else(|| {
            BootstrapError::EngineNotInitialized {
                export_command: config.export_command.clone(),
            }
        })?;
        self.engine.install(engine.clone());
        self.enter(Phase::Starting);

        engine
            .start(&config.launch())
            .await
            .map_err(BootstrapError::StartFailed)?;
        self.enter(Phase::Running);
        Ok(())
    }

    fn enter(&self, next: Phase) {
        if self.state.update(|s| s.advance(next)) {
            log::info!("Bootstrap phase: {next}");
        }
    }
}
