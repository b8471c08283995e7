//! Floating results panel in the page

use std::cell::RefCell;

use secspell_harness::report::{PanelContent, CLOSE_BUTTON_ID, CONTENT_ID};
use secspell_harness::{HarnessError, HarnessResult, Reporter, TestRunSummary, Theme};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::dom::js_message;

fn render_error(value: wasm_bindgen::JsValue) -> HarnessError {
    HarnessError::Render(js_message(&value))
}

/// Reporter that mirrors [`PanelContent`] into a panel element.
///
/// A panel left over from an earlier run is replaced when the next run
/// starts.
pub struct DomReporter {
    document: Document,
    panel_id: String,
    content: PanelContent,
    panel: RefCell<Option<Element>>,
}

impl DomReporter {
    pub fn new(document: Document, panel_id: impl Into<String>) -> Self {
        Self {
            document,
            panel_id: panel_id.into(),
            content: PanelContent::new(),
            panel: RefCell::new(None),
        }
    }

    fn create_panel(&self) -> HarnessResult<Element> {
        if let Some(stale) = self.document.get_element_by_id(&self.panel_id) {
            stale.remove();
        }

        let renderer = self.content.renderer();
        let panel = self.document.create_element("div").map_err(render_error)?;
        panel.set_id(&self.panel_id);
        panel
            .set_attribute("style", &renderer.panel_style())
            .map_err(render_error)?;
        panel.set_inner_html(&renderer.frame_html());

        let body = self
            .document
            .body()
            .ok_or_else(|| HarnessError::Render("document has no body".to_string()))?;
        body.append_child(&panel).map_err(render_error)?;

        if let Some(button) = self.document.get_element_by_id(CLOSE_BUTTON_ID) {
            let target = panel.clone();
            let on_close = Closure::<dyn FnMut()>::new(move || target.remove());
            button
                .add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref())
                .map_err(render_error)?;
            // Lives as long as the panel element.
            on_close.forget();
        }
        Ok(panel)
    }

    /// Copy the rendered content into the panel's content area.
    fn sync(&self) -> HarnessResult<()> {
        let panel = self.panel.borrow();
        let Some(panel) = panel.as_ref() else {
            return Err(HarnessError::Render("results panel not created".to_string()));
        };
        let area = panel
            .query_selector(&format!("#{}", CONTENT_ID))
            .map_err(render_error)?
            .ok_or_else(|| HarnessError::ElementNotFound("Results content area".to_string()))?;
        area.set_inner_html(&self.content.content());
        Ok(())
    }
}

impl Reporter for DomReporter {
    fn run_started(&self, theme: Theme) -> HarnessResult<()> {
        self.content.run_started(theme)?;
        let panel = self.create_panel()?;
        *self.panel.borrow_mut() = Some(panel);
        self.sync()
    }

    fn scenario_started(&self, name: &str, index: usize, total: usize) -> HarnessResult<()> {
        self.content.scenario_started(name, index, total)?;
        self.sync()
    }

    fn run_completed(&self, summary: &TestRunSummary) -> HarnessResult<()> {
        self.content.run_completed(summary)?;
        self.sync()
    }

    fn run_failed(&self, message: &str) {
        self.content.run_failed(message);
        if let Err(e) = self.sync() {
            warn!("could not show run error in panel: {}", e);
        }
    }
}
