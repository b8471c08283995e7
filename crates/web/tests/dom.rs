#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Object, Reflect};
use secspell_harness::config::SelectorConfig;
use secspell_harness::{
    EditorInteraction, EditorObservation, HarnessConfig, HarnessError, IgnoredWordEdit, Reporter,
    TestRunSummary, Theme,
};
use secspell_harness_web::{
    resolve_capabilities, resolve_config, BrowserClock, DomEditor, DomReporter, CONFIG_GLOBAL,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, Element, Event, HtmlElement, HtmlTextAreaElement, Window};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window()
        .and_then(|window| window.document())
        .expect("test page has a document")
}

/// Fresh fixture: editable div, ignored-words textarea and two annotations.
fn fixture(id: &str) -> Document {
    let document = document();
    let body = document.body().expect("body");
    body.set_inner_html(&format!(
        "<div id=\"{id}\" contenteditable=\"true\">hello wrld</div>\
         <textarea id=\"ignoredWordsTextarea\"></textarea>\
         <span class=\"spell-error\" data-word=\"wrld\">wrld</span>\
         <span class=\"spell-ignored\" data-word=\"zork\">zork</span>\
         <span class=\"spell-error\" data-word=\"\"></span>"
    ));
    document
}

fn editor(document: &Document) -> DomEditor {
    DomEditor::new(document.clone(), SelectorConfig::default())
}

fn window() -> Window {
    web_sys::window().expect("test page has a window")
}

/// `(event type, bubbles, trusted)` for every `kind` event reaching `target`
type Seen = Rc<RefCell<Vec<(String, bool, bool)>>>;

fn record_events(target: &Element, kind: &str) -> Seen {
    let seen: Seen = Rc::default();
    let sink = seen.clone();
    let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        sink.borrow_mut()
            .push((event.type_(), event.bubbles(), event.is_trusted()));
    });
    target
        .add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())
        .expect("listener attached");
    listener.forget();
    seen
}

fn set_global(name: &str, value: &JsValue) {
    Reflect::set(&window(), &JsValue::from_str(name), value).expect("global set");
}

fn clear_global(name: &str) {
    let window = window();
    let target: &Object = window.as_ref();
    Reflect::delete_property(target, &JsValue::from_str(name)).expect("global removed");
}

#[wasm_bindgen_test]
fn finds_editor_by_id_and_reads_annotations() {
    let document = fixture("text-area");
    let editor = editor(&document);

    assert!(editor.editor_present());
    assert_eq!(editor.error_words(), vec!["wrld".to_string()]);
    assert_eq!(editor.ignored_words(), vec!["zork".to_string()]);
    assert!(editor.is_word_errored("WRLD"));
}

#[wasm_bindgen_test]
fn falls_back_to_contenteditable() {
    let document = fixture("other-editor");
    let editor = editor(&document);

    assert!(editor.editor_present());
    editor.set_editor_text("helo").expect("set text");
    assert_eq!(editor.editor_text().expect("text"), "helo");
}

#[wasm_bindgen_test]
fn missing_editor_is_reported() {
    let document = document();
    document.body().expect("body").set_inner_html("<p>nothing here</p>");
    let editor = editor(&document);

    assert!(!editor.editor_present());
    assert!(matches!(
        editor.trigger_commit(),
        Err(HarnessError::EditorNotFound)
    ));
    assert!(matches!(
        editor.ignored_word_list(),
        Err(HarnessError::ElementNotFound(_))
    ));
}

#[wasm_bindgen_test]
fn ignored_word_edits_round_trip_through_textarea() {
    let document = fixture("text-area");
    let editor = editor(&document);

    let words = editor
        .set_ignored_words(&IgnoredWordEdit::Add("customtestword1".into()))
        .expect("add");
    assert_eq!(words, vec!["customtestword1".to_string()]);

    let area: HtmlTextAreaElement = document
        .get_element_by_id("ignoredWordsTextarea")
        .expect("textarea")
        .dyn_into()
        .expect("is a textarea");
    assert_eq!(area.value(), "customtestword1");

    editor
        .set_ignored_words(&IgnoredWordEdit::Remove("customtestword1".into()))
        .expect("remove");
    assert!(editor.ignored_word_list().expect("list").is_empty());
}

#[wasm_bindgen_test]
fn reporter_builds_and_fills_panel() {
    let document = fixture("text-area");
    let reporter = DomReporter::new(document.clone(), "testResultsPanel");

    reporter.run_started(Theme::Dark).expect("panel created");
    reporter.run_completed(&TestRunSummary::new()).expect("rendered");

    let panel = document
        .get_element_by_id("testResultsPanel")
        .expect("panel in page");
    assert!(panel.inner_html().contains("Success Rate: 0%"));

    reporter.run_started(Theme::Light).expect("panel replaced");
    let panels = document
        .query_selector_all("#testResultsPanel")
        .expect("query");
    assert_eq!(panels.length(), 1);
}

#[wasm_bindgen_test]
async fn browser_clock_sleeps() {
    use secspell_harness::Clock;
    use std::time::Duration;

    let clock = BrowserClock::new();
    clock.sleep(Duration::from_millis(20)).await;
    assert!(clock.elapsed() >= Duration::from_millis(15));
}

#[wasm_bindgen_test]
fn input_notification_bubbles_to_the_page() {
    let document = fixture("text-area");
    let body: Element = document.body().expect("body").into();
    let seen = record_events(&body, "input");

    editor(&document).set_editor_text("helo wrld").expect("set text");

    assert_eq!(*seen.borrow(), vec![("input".to_string(), true, false)]);
}

#[wasm_bindgen_test]
fn unfocused_commit_fires_synthetic_bubbling_blur() {
    let document = fixture("text-area");
    let body: Element = document.body().expect("body").into();
    let seen = record_events(&body, "blur");

    editor(&document).trigger_commit().expect("commit");

    assert_eq!(*seen.borrow(), vec![("blur".to_string(), true, false)]);
}

#[wasm_bindgen_test]
fn focused_commit_moves_focus_off_the_editor() {
    let document = document();
    document
        .body()
        .expect("body")
        .set_inner_html("<textarea id=\"text-area\"></textarea>");
    let surface: HtmlElement = document
        .get_element_by_id("text-area")
        .expect("surface")
        .dyn_into()
        .expect("is an html element");
    surface.focus().expect("focus");
    let active = |document: &Document| document.active_element().map(|e| e.id());
    assert_eq!(active(&document).as_deref(), Some("text-area"));

    editor(&document).trigger_commit().expect("commit");

    assert_ne!(active(&document).as_deref(), Some("text-area"));
}

#[wasm_bindgen_test]
fn ignored_word_edit_commits_the_control() {
    let document = fixture("text-area");
    let control = document
        .get_element_by_id("ignoredWordsTextarea")
        .expect("textarea");
    let seen = record_events(&control, "blur");

    editor(&document)
        .set_ignored_words(&IgnoredWordEdit::Add("customtestword7".into()))
        .expect("add");

    assert_eq!(seen.borrow().len(), 1);
    assert!(seen.borrow()[0].1, "commit notification bubbles");
}

#[wasm_bindgen_test]
fn config_global_overrides_defaults() {
    clear_global(CONFIG_GLOBAL);
    assert_eq!(resolve_config(&window()).suggestion_limit, 5);

    let value = js_sys::JSON::parse(r#"{"suggestion_limit": 3, "ignored_token_prefix": "tok"}"#)
        .expect("literal parses");
    set_global(CONFIG_GLOBAL, &value);
    let config = resolve_config(&window());
    assert_eq!(config.suggestion_limit, 3);
    assert_eq!(config.ignored_token_prefix, "tok");
    assert_eq!(config.selectors, HarnessConfig::default().selectors);

    let value = js_sys::JSON::parse(r#"{"suggestion_limit": "many"}"#).expect("literal parses");
    set_global(CONFIG_GLOBAL, &value);
    assert_eq!(resolve_config(&window()).suggestion_limit, 5);

    clear_global(CONFIG_GLOBAL);
}

#[wasm_bindgen_test]
fn theme_follows_root_attribute() {
    let document = fixture("text-area");
    let root = document.document_element().expect("root element");
    let config = HarnessConfig::default();

    root.set_attribute("data-theme", "dark").expect("attribute set");
    assert_eq!(resolve_capabilities(&window(), &document, &config).theme, Theme::Dark);

    root.remove_attribute("data-theme").expect("attribute removed");
    assert_eq!(resolve_capabilities(&window(), &document, &config).theme, Theme::Light);
}

#[wasm_bindgen_test]
fn missing_entry_points_are_not_offered() {
    let document = fixture("text-area");
    clear_global("checkWord");
    clear_global("getSuggestions");

    let capabilities = resolve_capabilities(&window(), &document, &HarnessConfig::default());

    assert!(capabilities.direct_check.is_none());
    assert!(capabilities.direct_suggest.is_none());
    assert!(capabilities.alert.is_some());
}

#[wasm_bindgen_test]
fn entry_points_are_called_and_validated() {
    let document = fixture("text-area");
    set_global(
        "checkWord",
        &Function::new_with_args("w", "return w === 'hello'"),
    );
    set_global(
        "getSuggestions",
        &Function::new_with_args("w, n", "return ['hello', 'help'].slice(0, n)"),
    );

    let capabilities = resolve_capabilities(&window(), &document, &HarnessConfig::default());
    let check = capabilities.direct_check.as_ref().expect("checkWord found");
    let suggest = capabilities.direct_suggest.as_ref().expect("getSuggestions found");

    assert!(check("hello").expect("boolean"));
    assert!(!check("helo").expect("boolean"));
    assert_eq!(suggest("helo", 1).expect("array"), vec!["hello".to_string()]);

    clear_global("checkWord");
    clear_global("getSuggestions");
}

#[wasm_bindgen_test]
fn misbehaving_entry_points_are_adapter_errors() {
    let document = fixture("text-area");
    set_global("checkWord", &Function::new_with_args("w", "return 42"));
    set_global("getSuggestions", &Function::new_with_args("w, n", "return 'hello'"));

    let capabilities = resolve_capabilities(&window(), &document, &HarnessConfig::default());
    let check = capabilities.direct_check.as_ref().expect("checkWord found");
    let suggest = capabilities.direct_suggest.as_ref().expect("getSuggestions found");

    assert!(matches!(check("helo"), Err(HarnessError::EntryPoint(_))));
    assert!(matches!(suggest("helo", 5), Err(HarnessError::EntryPoint(_))));

    set_global("checkWord", &Function::new_with_args("w", "throw new Error('boom')"));
    let capabilities = resolve_capabilities(&window(), &document, &HarnessConfig::default());
    let check = capabilities.direct_check.as_ref().expect("checkWord found");
    match check("helo") {
        Err(HarnessError::EntryPoint(message)) => assert_eq!(message, "checkWord: boom"),
        other => panic!("expected entry point error, got {:?}", other),
    }

    clear_global("checkWord");
    clear_global("getSuggestions");
}

#[wasm_bindgen_test]
fn browser_clock_elapsed_never_goes_backwards() {
    use secspell_harness::Clock;

    let clock = BrowserClock::new();
    let mut last = clock.elapsed();
    for _ in 0..100 {
        let now = clock.elapsed();
        assert!(now >= last, "{:?} < {:?}", now, last);
        last = now;
    }
    assert!(clock.wall_millis() > 1_600_000_000_000);
}
