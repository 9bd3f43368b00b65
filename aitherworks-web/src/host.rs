use std::time::Duration;

use aitherworks_bootstrap::{EngineEvent, EventSink, Host};
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, HtmlScriptElement, Response, Window};

use crate::engine::{js_error_text, EngineCallbacks, JsEngine};

/// Global slot the bootstrap script registers the engine constructor in.
const ENGINE_EXPORT: &str = "Engine";

/// The browser page: `fetch`, script injection, timers and the engine export.
pub struct BrowserHost {
    window: Window,
    canvas: HtmlCanvasElement,
}

impl BrowserHost {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("Canvas not found")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| "Element is not a canvas")?;
        Ok(Self { window, canvas })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl Host for BrowserHost {
    type Engine = JsEngine;

    async fn probe(&self, url: &str) -> Result<(), String> {
        let response = JsFuture::from(self.window.fetch_with_str(url))
            .await
            .map_err(js_error_text)?
            .dyn_into::<Response>()
            .map_err(|_| "fetch did not return a Response".to_string())?;
        if response.ok() {
            Ok(())
        } else {
            Err(format!("{} {}", response.status(), response.status_text()))
        }
    }

    async fn load_script(&self, url: &str) -> Result<(), String> {
        let document = self.window.document().ok_or("No document")?;
        let body = document.body().ok_or("No document body")?;
        let script = document
            .create_element("script")
            .map_err(js_error_text)?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| "Element is not a script".to_string())?;
        script.set_src(url);
        script.set_async(true);

        let mut on_error: Option<Closure<dyn FnMut()>> = None;
        let loaded = Promise::new(&mut |resolve: Function, reject: Function| {
            script.set_onload(Some(&resolve));
            let src = url.to_string();
            let handler = Closure::once(move || {
                let reason = JsValue::from_str(&format!("could not load {src}"));
                let _ = reject.call1(&JsValue::NULL, &reason);
            });
            script.set_onerror(Some(handler.as_ref().unchecked_ref()));
            on_error = Some(handler);
        });

        body.append_child(&script).map_err(js_error_text)?;
        let outcome = JsFuture::from(loaded).await;

        // Detach both handlers before the error closure is freed.
        script.set_onload(None);
        script.set_onerror(None);
        drop(on_error);
        outcome.map(|_| ()).map_err(js_error_text)
    }

    async fn sleep(&self, duration: Duration) {
        let ms = duration.as_millis().min(i32::MAX as u128) as i32;
        let window = &self.window;
        let timer = Promise::new(&mut |resolve: Function, _reject: Function| {
            if let Err(err) =
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            {
                log::warn!("setTimeout failed: {}", js_error_text(err));
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        let _ = JsFuture::from(timer).await;
    }

    fn construct_engine(&self, events: EventSink) -> Option<JsEngine> {
        let export = Reflect::get(&self.window, &JsValue::from_str(ENGINE_EXPORT)).ok()?;
        let Ok(constructor) = export.dyn_into::<Function>() else {
            log::error!("window.{ENGINE_EXPORT} is missing or not a constructor");
            return None;
        };

        let callbacks = EngineCallbacks::new(events);
        let options = Object::new();
        set(&options, "canvas", &self.canvas)?;
        set(&options, "onProgress", callbacks.on_progress.as_ref())?;
        set(&options, "onPrint", callbacks.on_print.as_ref())?;
        set(&options, "onPrintError", callbacks.on_print_error.as_ref())?;

        match Reflect::construct(&constructor, &Array::of1(&options)) {
            Ok(instance) if !instance.is_null() && !instance.is_undefined() => {
                Some(JsEngine::new(instance, callbacks))
            }
            Ok(_) => {
                log::error!("new {ENGINE_EXPORT}() returned nothing");
                None
            }
            Err(err) => {
                callbacks
                    .sink()
                    .send(EngineEvent::PrintError(js_error_text(err)));
                None
            }
        }
    }
}

fn set(target: &Object, key: &str, value: &JsValue) -> Option<()> {
    match Reflect::set(target, &JsValue::from_str(key), value) {
        Ok(_) => Some(()),
        Err(err) => {
            log::error!("Could not set engine option {key}: {}", js_error_text(err));
            None
        }
    }
}
