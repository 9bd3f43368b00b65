use aitherworks_bootstrap::{Indicator, Overlay};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::layout::{
    self, FAILURE_ID, INDETERMINATE_ID, NOTICE_ID, PROGRESS_ID, PROGRESS_INNER_ID, STATUS_ID,
};

/// Renders [`Overlay`] into the page's `#status` block.
pub struct DomOverlay {
    document: Document,
    root: HtmlElement,
}

impl DomOverlay {
    pub fn new(window: &Window) -> Result<Self, JsValue> {
        let document = window.document().ok_or("No document")?;
        let root = document
            .get_element_by_id(STATUS_ID)
            .ok_or("Status overlay not found")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "Status overlay is not an HTML element")?;
        Ok(Self { document, root })
    }

    pub fn render(&self, overlay: &Overlay) {
        if let Err(err) = self.try_render(overlay) {
            log::warn!("Could not render status overlay: {err:?}");
        }
    }

    fn try_render(&self, overlay: &Overlay) -> Result<(), JsValue> {
        show(&self.root, STATUS_ID, overlay.is_visible())?;
        match overlay {
            Overlay::Hidden => {}
            Overlay::Loading { indicator, notice } => {
                self.clear_failure();
                let percent = match indicator {
                    Indicator::Determinate(p) => Some(*p),
                    Indicator::Indeterminate => None,
                };
                if let Some(bar) = self.element(PROGRESS_ID) {
                    show(&bar, PROGRESS_ID, percent.is_some())?;
                }
                if let (Some(inner), Some(p)) = (self.element(PROGRESS_INNER_ID), percent) {
                    inner.style().set_property("width", &format!("{p}%"))?;
                }
                if let Some(spinner) = self.element(INDETERMINATE_ID) {
                    show(&spinner, INDETERMINATE_ID, percent.is_none())?;
                }
                if let Some(el) = self.element(NOTICE_ID) {
                    el.set_text_content(Some(notice.as_str()));
                }
            }
            Overlay::Failure {
                headline,
                detail,
                remediation,
            } => {
                for id in [PROGRESS_ID, INDETERMINATE_ID, NOTICE_ID] {
                    if let Some(el) = self.element(id) {
                        show(&el, id, false)?;
                    }
                }
                self.clear_failure();
                let block = self.failure_block(headline, detail, remediation)?;
                self.root.append_child(&block)?;
            }
        }
        Ok(())
    }

    fn failure_block(
        &self,
        headline: &str,
        detail: &str,
        remediation: &[String],
    ) -> Result<HtmlElement, JsValue> {
        let block = self.create("div")?;
        block.set_id(FAILURE_ID);
        block.set_class_name("status-failure");

        let title = self.create("div")?;
        title.set_class_name("status-failure-headline");
        title.set_text_content(Some(headline));
        block.append_child(&title)?;

        let text = self.create("div")?;
        text.set_class_name("status-failure-detail");
        text.set_text_content(Some(detail));
        block.append_child(&text)?;

        if !remediation.is_empty() {
            let steps = self.create("div")?;
            steps.set_class_name("status-failure-steps");
            let label = self.create("strong")?;
            label.set_text_content(Some("Steps to fix:"));
            steps.append_child(&label)?;

            let list = self.create("ol")?;
            for step in remediation {
                let item = self.create("li")?;
                match step.strip_prefix("Run: ") {
                    Some(command) => {
                        item.set_text_content(Some("Run: "));
                        let code = self.create("code")?;
                        code.set_text_content(Some(command));
                        item.append_child(&code)?;
                    }
                    None => item.set_text_content(Some(step.as_str())),
                }
                list.append_child(&item)?;
            }
            steps.append_child(&list)?;
            block.append_child(&steps)?;
        }
        Ok(block)
    }

    fn clear_failure(&self) {
        if let Some(old) = self.document.get_element_by_id(FAILURE_ID) {
            old.remove();
        }
    }

    fn element(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn create(&self, tag: &str) -> Result<HtmlElement, JsValue> {
        self.document
            .create_element(tag)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str("created element is not an HTML element"))
    }
}

fn show(el: &HtmlElement, id: &str, visible: bool) -> Result<(), JsValue> {
    el.style()
        .set_property("display", layout::display(id, visible))
}
