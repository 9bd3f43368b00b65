//! AItherworks WASM page runtime
//!
//! Runs the engine bootstrap sequence in the browser: probes for the Godot
//! export, injects its bootstrap script, constructs the engine against the
//! page canvas and mirrors progress and failures into the `#status` overlay.

#[cfg(target_arch = "wasm32")]
mod engine;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod layout;
#[cfg(target_arch = "wasm32")]
mod overlay;

#[cfg(target_arch = "wasm32")]
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use aitherworks_bootstrap::{present, Bootstrap, BootstrapConfig};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

/// Entry point — called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("AItherworks page runtime initialized");
}

/// The mounted game page. Dropping it (or `unmount`) asks the engine to quit.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct Page {
    bootstrap: Rc<Bootstrap<host::BrowserHost>>,
    on_pagehide: Closure<dyn FnMut()>,
}

/// Start the bootstrap sequence against the canvas with id `canvas_id`.
///
/// `config_toml` overrides the default artifact locations; pass `undefined`
/// for the standard export layout.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn boot(canvas_id: String, config_toml: Option<String>) -> Result<Page, JsValue> {
    let config = match config_toml {
        Some(text) => BootstrapConfig::from_toml_str(&text)
            .map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => BootstrapConfig::default(),
    };

    let host = host::BrowserHost::new(&canvas_id)?;
    let overlay = overlay::DomOverlay::new(host.window())?;
    let window = host.window().clone();
    let bootstrap = Rc::new(Bootstrap::new(host, config));

    let presenter_config = bootstrap.config().clone();
    bootstrap
        .state()
        .subscribe(move |state| overlay.render(&present(state, &presenter_config)));

    let slot = bootstrap.engine_slot();
    let on_pagehide = Closure::<dyn FnMut()>::new(move || {
        slot.release();
    });
    window.add_event_listener_with_callback("pagehide", on_pagehide.as_ref().unchecked_ref())?;

    let runner = bootstrap.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let phase = runner.run().await;
        log::info!("Bootstrap finished in phase {phase}");
    });

    Ok(Page {
        bootstrap,
        on_pagehide,
    })
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl Page {
    /// Request the engine to quit. Returns false if no engine was ever constructed
    /// or it was already released.
    pub fn unmount(&self) -> bool {
        self.bootstrap.unmount()
    }

    pub fn phase(&self) -> String {
        self.bootstrap.state().phase().to_string()
    }

    /// Current UI state as `{ status, progress, loading, error }`.
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snap = self.bootstrap.state().snapshot();
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"status".into(), &snap.status.into())?;
        js_sys::Reflect::set(&obj, &"progress".into(), &snap.progress.into())?;
        js_sys::Reflect::set(&obj, &"loading".into(), &snap.loading.into())?;
        let error = snap.error.map(JsValue::from).unwrap_or(JsValue::NULL);
        js_sys::Reflect::set(&obj, &"error".into(), &error)?;
        Ok(obj.into())
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for Page {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback(
                "pagehide",
                self.on_pagehide.as_ref().unchecked_ref(),
            );
        }
        self.bootstrap.unmount();
    }
}
