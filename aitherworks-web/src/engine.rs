use aitherworks_bootstrap::{Engine, EngineEvent, EventSink, LaunchConfig};
use js_sys::{Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// JS callbacks passed to the engine constructor. They forward into the
/// bootstrap event channel and must outlive the engine instance.
pub struct EngineCallbacks {
    pub on_progress: Closure<dyn FnMut(f64, f64)>,
    pub on_print: Closure<dyn FnMut(JsValue)>,
    pub on_print_error: Closure<dyn FnMut(JsValue)>,
    sink: EventSink,
}

impl EngineCallbacks {
    pub fn new(sink: EventSink) -> Self {
        let progress = sink.clone();
        let print = sink.clone();
        let print_error = sink.clone();
        Self {
            on_progress: Closure::new(move |current: f64, total: f64| {
                progress.progress(current, total);
            }),
            on_print: Closure::new(move |text: JsValue| {
                print.send(EngineEvent::Print(js_text(text)));
            }),
            on_print_error: Closure::new(move |text: JsValue| {
                print_error.send(EngineEvent::PrintError(js_text(text)));
            }),
            sink,
        }
    }

    pub fn sink(&self) -> &EventSink {
        &self.sink
    }
}

/// An engine instance created by the exported bootstrap script.
pub struct JsEngine {
    instance: JsValue,
    _callbacks: EngineCallbacks,
}

impl JsEngine {
    pub fn new(instance: JsValue, callbacks: EngineCallbacks) -> Self {
        Self {
            instance,
            _callbacks: callbacks,
        }
    }

    fn method(&self, name: &str) -> Result<Function, String> {
        Reflect::get(&self.instance, &JsValue::from_str(name))
            .map_err(js_error_text)?
            .dyn_into::<Function>()
            .map_err(|_| format!("engine has no {name}()"))
    }
}

impl Engine for JsEngine {
    async fn start(&self, launch: &LaunchConfig) -> Result<(), String> {
        let start_game = self.method("startGame")?;
        let options = Object::new();
        Reflect::set(&options, &"executable".into(), &launch.executable.as_str().into())
            .map_err(js_error_text)?;
        Reflect::set(&options, &"mainPack".into(), &launch.main_pack.as_str().into())
            .map_err(js_error_text)?;

        let result = start_game
            .call1(&self.instance, &options)
            .map_err(js_error_text)?;
        match result.dyn_into::<Promise>() {
            Ok(promise) => JsFuture::from(promise).await.map(|_| ()).map_err(js_error_text),
            // A synchronous return means the engine is already running.
            Err(_) => Ok(()),
        }
    }

    fn request_quit(&self) {
        let quit = self
            .method("requestQuit")
            .and_then(|f| f.call0(&self.instance).map_err(js_error_text));
        if let Err(err) = quit {
            log::warn!("Engine quit request failed: {err}");
        }
    }
}

/// Human-readable text of a thrown JS value or rejection reason.
pub fn js_error_text(value: JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    js_text(value)
}

fn js_text(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
