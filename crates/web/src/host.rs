//! Host facilities looked up on `window`

use std::time::Duration;

use js_sys::{Array, Function, Reflect, JSON};
use secspell_harness::{Capabilities, HarnessConfig, HarnessError, HarnessResult, Theme};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Window};

use crate::dom::js_message;
use crate::CONFIG_GLOBAL;

fn global_function(window: &Window, name: &str) -> Option<Function> {
    Reflect::get(window, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
}

fn entry_point_error(name: &str, value: JsValue) -> HarnessError {
    HarnessError::EntryPoint(format!("{}: {}", name, js_message(&value)))
}

/// Harness configuration from `window.secspellHarnessConfig`. Absent means
/// defaults; an unreadable value is logged and also yields defaults.
pub fn resolve_config(window: &Window) -> HarnessConfig {
    let value = match Reflect::get(window, &JsValue::from_str(CONFIG_GLOBAL)) {
        Ok(value) if !value.is_undefined() && !value.is_null() => value,
        _ => return HarnessConfig::default(),
    };
    let json = match JSON::stringify(&value) {
        Ok(json) => String::from(json),
        Err(e) => {
            warn!("{} is not serializable: {}", CONFIG_GLOBAL, js_message(&e));
            return HarnessConfig::default();
        }
    };
    match HarnessConfig::from_json(&json) {
        Ok(config) => {
            debug!("using harness config from {}", CONFIG_GLOBAL);
            config
        }
        Err(e) => {
            warn!("ignoring invalid {}: {}", CONFIG_GLOBAL, e);
            HarnessConfig::default()
        }
    }
}

fn resolve_theme(document: &Document, attribute: &str) -> Theme {
    let value = document
        .document_element()
        .and_then(|root| root.get_attribute(attribute));
    Theme::from_attribute(value.as_deref())
}

/// Inspect the page once for the optional facilities a run may use.
pub fn resolve_capabilities(
    window: &Window,
    document: &Document,
    config: &HarnessConfig,
) -> Capabilities {
    let mut capabilities = Capabilities::default()
        .with_theme(resolve_theme(document, &config.selectors.theme_attribute));

    if let Some(show_toast) = global_function(window, "showToast") {
        capabilities = capabilities.with_notify(move |message, duration: Duration| {
            let millis = JsValue::from_f64(duration.as_millis() as f64);
            if let Err(e) = show_toast.call2(&JsValue::NULL, &JsValue::from_str(message), &millis) {
                warn!("showToast failed: {}", js_message(&e));
            }
        });
    }

    let alert_window = window.clone();
    capabilities = capabilities.with_alert(move |message| {
        if let Err(e) = alert_window.alert_with_message(message) {
            warn!("alert failed: {}", js_message(&e));
        }
    });

    if let Some(check_word) = global_function(window, "checkWord") {
        capabilities = capabilities.with_direct_check(move |word| {
            let value = check_word
                .call1(&JsValue::NULL, &JsValue::from_str(word))
                .map_err(|e| entry_point_error("checkWord", e))?;
            value.as_bool().ok_or_else(|| {
                HarnessError::EntryPoint(format!("checkWord returned {:?}", value))
            })
        });
    }

    if let Some(get_suggestions) = global_function(window, "getSuggestions") {
        capabilities = capabilities.with_direct_suggest(move |word, limit| {
            let value = get_suggestions
                .call2(
                    &JsValue::NULL,
                    &JsValue::from_str(word),
                    &JsValue::from_f64(limit as f64),
                )
                .map_err(|e| entry_point_error("getSuggestions", e))?;
            suggestions_from(value)
        });
    }

    debug!(?capabilities, "resolved host capabilities");
    capabilities
}

fn suggestions_from(value: JsValue) -> HarnessResult<Vec<String>> {
    if !Array::is_array(&value) {
        return Err(HarnessError::EntryPoint(format!(
            "getSuggestions returned {:?}",
            value
        )));
    }
    Array::from(&value)
        .iter()
        .map(|item| {
            item.as_string().ok_or_else(|| {
                HarnessError::EntryPoint(format!("getSuggestions returned non-string {:?}", item))
            })
        })
        .collect()
}
