//! Module start hook and the `runIntegrationTests` global

use std::cell::Cell;

use js_sys::{Promise, Reflect, JSON};
use secspell_harness::{default_scenarios, RunOutcome, TestRunSummary, TestRunner};
use serde_json::Value;
use tracing::{error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::clock::BrowserClock;
use crate::dom::{js_message, DomEditor};
use crate::host::{resolve_capabilities, resolve_config};
use crate::panel::DomReporter;
use crate::{logging, ENTRY_GLOBAL};

thread_local! {
    static RUNNING: Cell<bool> = const { Cell::new(false) };
}

/// Clears the in-flight flag when a run ends, however it ends.
struct RunGuard;

impl RunGuard {
    fn acquire() -> Option<Self> {
        RUNNING.with(|running| (!running.replace(true)).then_some(RunGuard))
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        RUNNING.with(|running| running.set(false));
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    logging::init(LevelFilter::INFO);

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let entry = Closure::<dyn Fn() -> Promise>::new(|| future_to_promise(run_integration_tests()));
    Reflect::set(&window, &JsValue::from_str(ENTRY_GLOBAL), entry.as_ref())?;
    entry.forget();

    info!("Integration test runner loaded. Run window.{}() to start.", ENTRY_GLOBAL);
    Ok(())
}

/// Run the scenario library against the page's editor.
///
/// Resolves to the run summary, or to `null` when the page was not ready.
/// An error that escaped the scenarios is carried in the summary's `error`
/// field. Rejects only when a run is already in progress.
#[wasm_bindgen(js_name = runIntegrationTests)]
pub async fn run_integration_tests() -> Result<JsValue, JsValue> {
    let Some(_guard) = RunGuard::acquire() else {
        warn!("integration tests already running");
        return Err(JsValue::from_str("Integration tests already running"));
    };

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let config = resolve_config(&window);
    let capabilities = resolve_capabilities(&window, &document, &config);
    let editor = DomEditor::new(document.clone(), config.selectors.clone());
    let reporter = DomReporter::new(document, config.selectors.panel_id.clone());
    let clock = BrowserClock::new();

    let scenarios = default_scenarios();
    let mut runner = TestRunner::new(&editor, &editor, &clock, &reporter)
        .with_capabilities(capabilities)
        .with_config(config);

    match runner.run(&scenarios).await {
        RunOutcome::NotReady => Ok(JsValue::NULL),
        RunOutcome::Finished { summary, run_error } => {
            if let Some(message) = &run_error {
                error!("integration run finished with an error: {}", message);
            }
            summary_value(&summary, run_error.as_deref())
        }
    }
}

/// The summary as a plain JS object, with `error` set when the run failed.
fn summary_value(summary: &TestRunSummary, run_error: Option<&str>) -> Result<JsValue, JsValue> {
    let mut value = serde_json::to_value(summary).map_err(|e| JsValue::from_str(&e.to_string()))?;
    if let (Some(message), Value::Object(fields)) = (run_error, &mut value) {
        fields.insert("error".to_string(), Value::String(message.to_string()));
    }
    JSON::parse(&value.to_string()).map_err(|e| JsValue::from_str(&js_message(&e)))
}
