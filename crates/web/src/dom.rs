//! DOM-backed interaction and observation adapters

use secspell_harness::adapter::{apply_word_edit, join_word_list, parse_word_list};
use secspell_harness::config::SelectorConfig;
use secspell_harness::{
    EditorInteraction, EditorObservation, HarnessError, HarnessResult, IgnoredWordEdit,
};
use tracing::trace;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventInit, HtmlElement, HtmlInputElement, HtmlTextAreaElement,
};

const IGNORED_CONTROL: &str = "Ignored words textarea";

/// Readable message for a value thrown by a DOM call.
pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn dom_error(value: JsValue) -> HarnessError {
    HarnessError::Dom(js_message(&value))
}

/// The application's editor as found in `document`
pub struct DomEditor {
    document: Document,
    selectors: SelectorConfig,
}

impl DomEditor {
    pub fn new(document: Document, selectors: SelectorConfig) -> Self {
        Self {
            document,
            selectors,
        }
    }

    fn editor(&self) -> Option<Element> {
        self.document
            .get_element_by_id(&self.selectors.editor_id)
            .or_else(|| {
                self.document
                    .query_selector(&self.selectors.editor_fallback)
                    .ok()
                    .flatten()
            })
    }

    fn require_editor(&self) -> HarnessResult<Element> {
        self.editor().ok_or(HarnessError::EditorNotFound)
    }

    fn ignored_control(&self) -> HarnessResult<HtmlTextAreaElement> {
        self.document
            .get_element_by_id(&self.selectors.ignored_words_id)
            .and_then(|element| element.dyn_into::<HtmlTextAreaElement>().ok())
            .ok_or_else(|| HarnessError::ElementNotFound(IGNORED_CONTROL.to_string()))
    }

    fn dispatch(&self, target: &Element, kind: &str) -> HarnessResult<()> {
        let init = EventInit::new();
        init.set_bubbles(true);
        let event = Event::new_with_event_init_dict(kind, &init).map_err(dom_error)?;
        target.dispatch_event(&event).map_err(dom_error)?;
        Ok(())
    }

    /// Move focus off `element`, or fire a synthetic blur when it is not
    /// focused.
    fn blur(&self, element: &Element) -> HarnessResult<()> {
        let focused = self
            .document
            .active_element()
            .is_some_and(|active| &active == element);
        match element.dyn_ref::<HtmlElement>() {
            Some(html) if focused => html.blur().map_err(dom_error),
            _ => self.dispatch(element, "blur"),
        }
    }

    fn write_content(element: &Element, text: &str) {
        if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(text);
        } else if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            input.set_value(text);
        } else {
            element.set_text_content(Some(text));
        }
    }

    fn annotated_words(&self, class: &str) -> Vec<String> {
        let Ok(nodes) = self.document.query_selector_all(&format!(".{}", class)) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter_map(|element| element.get_attribute(&self.selectors.word_attribute))
            .filter(|word| !word.is_empty())
            .collect()
    }
}

impl EditorInteraction for DomEditor {
    fn editor_present(&self) -> bool {
        self.editor().is_some()
    }

    fn set_editor_text(&self, text: &str) -> HarnessResult<()> {
        let editor = self.require_editor()?;
        Self::write_content(&editor, text);
        trace!(len = text.len(), "editor text set");
        self.dispatch(&editor, "input")
    }

    fn trigger_commit(&self) -> HarnessResult<()> {
        let editor = self.require_editor()?;
        self.blur(&editor)
    }

    fn clear_editor_text(&self) -> HarnessResult<()> {
        self.set_editor_text("")
    }

    fn set_ignored_words(&self, edit: &IgnoredWordEdit) -> HarnessResult<Vec<String>> {
        let control = self.ignored_control()?;
        let words = apply_word_edit(parse_word_list(&control.value()), edit);
        control.set_value(&join_word_list(&words));
        self.dispatch(&control, "blur")?;
        Ok(words)
    }
}

impl EditorObservation for DomEditor {
    fn error_words(&self) -> Vec<String> {
        self.annotated_words(&self.selectors.error_class)
    }

    fn ignored_words(&self) -> Vec<String> {
        self.annotated_words(&self.selectors.ignored_class)
    }

    fn editor_text(&self) -> HarnessResult<String> {
        let editor = self.require_editor()?;
        if let Some(area) = editor.dyn_ref::<HtmlTextAreaElement>() {
            return Ok(area.value());
        }
        if let Some(input) = editor.dyn_ref::<HtmlInputElement>() {
            return Ok(input.value());
        }
        let inner = editor
            .dyn_ref::<HtmlElement>()
            .map(HtmlElement::inner_text)
            .unwrap_or_default();
        if inner.is_empty() {
            Ok(editor.text_content().unwrap_or_default())
        } else {
            Ok(inner)
        }
    }

    fn ignored_word_list(&self) -> HarnessResult<Vec<String>> {
        Ok(parse_word_list(&self.ignored_control()?.value()))
    }
}
