use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::{pin, Pin};
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use aitherworks_bootstrap::{
    present, Bootstrap, BootstrapConfig, Engine, EventSink, FailureKind, Host, Indicator,
    LaunchConfig, Overlay, Phase,
};

#[derive(Clone)]
enum StartBehavior {
    Resolve,
    Reject(String),
    Hang,
}

struct FakeEngine {
    events: EventSink,
    progress: Vec<(f64, f64)>,
    behavior: StartBehavior,
    launches: Rc<RefCell<Vec<LaunchConfig>>>,
    quits: Rc<Cell<u32>>,
}

impl Engine for FakeEngine {
    async fn start(&self, launch: &LaunchConfig) -> Result<(), String> {
        self.launches.borrow_mut().push(launch.clone());
        for &(current, total) in &self.progress {
            self.events.progress(current, total);
        }
        match &self.behavior {
            StartBehavior::Resolve => Ok(()),
            StartBehavior::Reject(msg) => Err(msg.clone()),
            StartBehavior::Hang => std::future::pending().await,
        }
    }

    fn request_quit(&self) {
        self.quits.set(self.quits.get() + 1);
    }
}

struct FakeHost {
    probe: Result<(), String>,
    script: Result<(), String>,
    export_present: bool,
    behavior: StartBehavior,
    progress: Vec<(f64, f64)>,
    calls: Rc<RefCell<Vec<String>>>,
    sleeps: Rc<RefCell<Vec<Duration>>>,
    launches: Rc<RefCell<Vec<LaunchConfig>>>,
    quits: Rc<Cell<u32>>,
}

impl FakeHost {
    fn healthy() -> Self {
        Self {
            probe: Ok(()),
            script: Ok(()),
            export_present: true,
            behavior: StartBehavior::Resolve,
            progress: Vec::new(),
            calls: Rc::default(),
            sleeps: Rc::default(),
            launches: Rc::default(),
            quits: Rc::default(),
        }
    }

    fn calls(&self) -> Rc<RefCell<Vec<String>>> {
        self.calls.clone()
    }
}

impl Host for FakeHost {
    type Engine = FakeEngine;

    async fn probe(&self, url: &str) -> Result<(), String> {
        self.calls.borrow_mut().push(format!("probe {url}"));
        self.probe.clone()
    }

    async fn load_script(&self, url: &str) -> Result<(), String> {
        self.calls.borrow_mut().push(format!("load {url}"));
        self.script.clone()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
    }

    fn construct_engine(&self, events: EventSink) -> Option<FakeEngine> {
        self.calls.borrow_mut().push("construct".to_string());
        self.export_present.then(|| FakeEngine {
            events,
            progress: self.progress.clone(),
            behavior: self.behavior.clone(),
            launches: self.launches.clone(),
            quits: self.quits.clone(),
        })
    }
}

fn poll_once<F: Future>(fut: Pin<&mut F>) -> Poll<F::Output> {
    let mut cx = Context::from_waker(Waker::noop());
    fut.poll(&mut cx)
}

#[test]
fn test_progress_report_shows_determinate_bar() {
    let host = FakeHost {
        behavior: StartBehavior::Hang,
        progress: vec![(50.0, 100.0)],
        ..FakeHost::healthy()
    };
    let bootstrap = Bootstrap::new(host, BootstrapConfig::default());
    let state = bootstrap.state();

    let mut run = pin!(bootstrap.run());
    assert!(poll_once(run.as_mut()).is_pending());

    let current = state.get();
    assert_eq!(current.phase, Phase::Starting);
    assert_eq!(current.progress_percent, 50);
    assert_eq!(
        present(&current, bootstrap.config()),
        Overlay::Loading {
            indicator: Indicator::Determinate(50),
            notice: "Loading... 50%".into(),
        }
    );
}

#[test]
fn test_missing_artifact_shows_export_steps_and_skips_script() {
    let host = FakeHost {
        probe: Err("404 Not Found".into()),
        ..FakeHost::healthy()
    };
    let calls = host.calls();
    let bootstrap = Bootstrap::new(host, BootstrapConfig::default());

    let phase = pollster::block_on(bootstrap.run());
    assert_eq!(phase, Phase::Failed);

    let state = bootstrap.state().get();
    assert_eq!(
        state.error.as_ref().map(|e| e.kind()),
        Some(FailureKind::ArtifactMissing)
    );
    assert_eq!(*calls.borrow(), vec!["probe /godot/aitherworks.js".to_string()]);

    let Overlay::Failure {
        headline,
        remediation,
        ..
    } = present(&state, bootstrap.config())
    else {
        panic!("expected failure overlay");
    };
    assert_eq!(headline, "⚠️ Game not exported yet");
    assert_eq!(
        remediation,
        vec![
            "Open a terminal in the project root",
            "Run: ./scripts/export_web.sh",
            "Wait for export to complete",
            "Refresh this page",
        ]
    );
    assert!(!bootstrap.unmount());
}

#[test]
fn test_start_rejection_carries_engine_text() {
    let host = FakeHost {
        behavior: StartBehavior::Reject("bad pack".into()),
        ..FakeHost::healthy()
    };
    let bootstrap = Bootstrap::new(host, BootstrapConfig::default());

    assert_eq!(pollster::block_on(bootstrap.run()), Phase::Failed);
    let state = bootstrap.state().get();
    assert_eq!(
        state.error.as_ref().map(|e| e.kind()),
        Some(FailureKind::StartFailed)
    );
    assert_eq!(state.error_detail().as_deref(), Some("bad pack"));
    assert_eq!(state.message, "Failed to load game");
}

#[test]
fn test_started_game_hides_overlay() {
    let host = FakeHost {
        progress: vec![(0.0, 0.0), (10.0, 40.0), (40.0, 40.0)],
        ..FakeHost::healthy()
    };
    let launches = host.launches.clone();
    let sleeps = host.sleeps.clone();
    let bootstrap = Bootstrap::new(host, BootstrapConfig::default());

    assert_eq!(pollster::block_on(bootstrap.run()), Phase::Running);
    let state = bootstrap.state().get();
    assert_eq!(present(&state, bootstrap.config()), Overlay::Hidden);
    assert!(!state.snapshot().loading);
    assert_eq!(state.snapshot().status, "");
    assert_eq!(*sleeps.borrow(), vec![Duration::from_millis(100)]);
    assert_eq!(
        *launches.borrow(),
        vec![LaunchConfig {
            executable: "/godot/aitherworks".into(),
            main_pack: "/godot/aitherworks.pck".into(),
        }]
    );
}

#[test]
fn test_missing_export_is_distinct_from_script_failure() {
    let absent = FakeHost {
        export_present: false,
        ..FakeHost::healthy()
    };
    let absent = Bootstrap::new(absent, BootstrapConfig::default());
    pollster::block_on(absent.run());
    let absent = absent.state().get();

    let broken = FakeHost {
        script: Err("net::ERR_CONNECTION_RESET".into()),
        ..FakeHost::healthy()
    };
    let calls = broken.calls();
    let broken = Bootstrap::new(broken, BootstrapConfig::default());
    pollster::block_on(broken.run());
    let broken_state = broken.state().get();

    assert_eq!(
        absent.error.as_ref().map(|e| e.kind()),
        Some(FailureKind::EngineNotInitialized)
    );
    assert_eq!(
        broken_state.error.as_ref().map(|e| e.kind()),
        Some(FailureKind::ScriptLoadError)
    );
    assert_ne!(absent.error_detail(), broken_state.error_detail());
    assert!(!calls.borrow().contains(&"construct".to_string()));

    let Overlay::Failure { detail, remediation, .. } = present(&broken_state, broken.config())
    else {
        panic!("expected failure overlay");
    };
    assert!(detail.contains("net::ERR_CONNECTION_RESET"));
    assert!(remediation.is_empty());
}

#[test]
fn test_without_probe_starts_at_script_load() {
    let config = BootstrapConfig {
        probe: false,
        ..BootstrapConfig::default()
    };
    let host = FakeHost {
        probe: Err("must not be called".into()),
        export_present: false,
        ..FakeHost::healthy()
    };
    let calls = host.calls();
    let bootstrap = Bootstrap::new(host, config);
    assert_eq!(bootstrap.state().phase(), Phase::LoadingScript);

    pollster::block_on(bootstrap.run());
    assert_eq!(
        *calls.borrow(),
        vec!["load /godot/aitherworks.js".to_string(), "construct".to_string()]
    );
    let state = bootstrap.state().get();
    assert_eq!(
        state.error.map(|e| e.kind()),
        Some(FailureKind::EngineNotInitialized)
    );
}

#[test]
fn test_phases_only_move_forward() {
    let host = FakeHost {
        behavior: StartBehavior::Reject("boom".into()),
        progress: vec![(30.0, 100.0), (10.0, 100.0), (90.0, 100.0)],
        ..FakeHost::healthy()
    };
    let bootstrap = Bootstrap::new(host, BootstrapConfig::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let record = seen.clone();
    bootstrap
        .state()
        .subscribe(move |s| record.borrow_mut().push((s.phase, s.progress_percent)));

    pollster::block_on(bootstrap.run());

    let seen = seen.borrow();
    let phases: Vec<Phase> = seen.iter().map(|(p, _)| *p).collect();
    let mut deduped = phases.clone();
    deduped.dedup();
    assert_eq!(
        deduped,
        vec![
            Phase::Probing,
            Phase::LoadingScript,
            Phase::Initializing,
            Phase::Starting,
            Phase::Failed,
        ]
    );
    let progress: Vec<u8> = seen.iter().map(|(_, p)| *p).collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(progress.last(), Some(&90));
}

#[test]
fn test_unmount_while_starting_quits_once() {
    let host = FakeHost {
        behavior: StartBehavior::Hang,
        ..FakeHost::healthy()
    };
    let quits = host.quits.clone();
    let bootstrap = Bootstrap::new(host, BootstrapConfig::default());

    let mut run = pin!(bootstrap.run());
    assert!(poll_once(run.as_mut()).is_pending());
    assert_eq!(bootstrap.state().phase(), Phase::Starting);

    assert!(bootstrap.engine_slot().is_occupied());
    assert!(bootstrap.unmount());
    assert!(!bootstrap.unmount());
    assert_eq!(quits.get(), 1);
}

#[test]
fn test_unmount_after_running_quits_once() {
    let host = FakeHost::healthy();
    let quits = host.quits.clone();
    let bootstrap = Bootstrap::new(host, BootstrapConfig::default());
    pollster::block_on(bootstrap.run());

    let slot = bootstrap.engine_slot();
    assert!(slot.release());
    assert!(!bootstrap.unmount());
    assert_eq!(quits.get(), 1);
}

#[test]
fn test_failure_is_not_retried() {
    let host = FakeHost {
        probe: Err("offline".into()),
        ..FakeHost::healthy()
    };
    let calls = host.calls();
    let bootstrap = Bootstrap::new(host, BootstrapConfig::default());
    pollster::block_on(bootstrap.run());
    let state = bootstrap.state();
    let before = state.get();

    assert!(!state.update(|s| s.advance(Phase::LoadingScript)));
    assert!(!state.update(|s| s.apply_progress(50.0, 100.0)));
    assert_eq!(state.get(), before);
    assert_eq!(calls.borrow().len(), 1);
}

#[test]
fn test_second_run_after_failure_does_nothing() {
    let host = FakeHost {
        probe: Err("404 Not Found".into()),
        ..FakeHost::healthy()
    };
    let calls = host.calls();
    let launches = host.launches.clone();
    let bootstrap = Bootstrap::new(host, BootstrapConfig::default());

    assert_eq!(pollster::block_on(bootstrap.run()), Phase::Failed);
    assert_eq!(pollster::block_on(bootstrap.run()), Phase::Failed);

    assert_eq!(*calls.borrow(), vec!["probe /godot/aitherworks.js".to_string()]);
    assert!(launches.borrow().is_empty());
    assert!(!bootstrap.engine_slot().is_occupied());
}

#[test]
fn test_second_run_after_start_keeps_single_engine() {
    let host = FakeHost::healthy();
    let calls = host.calls();
    let launches = host.launches.clone();
    let quits = host.quits.clone();
    let bootstrap = Bootstrap::new(host, BootstrapConfig::default());

    assert_eq!(pollster::block_on(bootstrap.run()), Phase::Running);
    assert_eq!(pollster::block_on(bootstrap.run()), Phase::Running);

    let loads = calls.borrow().iter().filter(|c| c.starts_with("load ")).count();
    let constructs = calls.borrow().iter().filter(|c| *c == "construct").count();
    assert_eq!((loads, constructs), (1, 1));
    assert_eq!(launches.borrow().len(), 1);

    assert!(bootstrap.unmount());
    assert_eq!(quits.get(), 1);
}
