//! Individual scenarios driven through a hand-built context

use std::rc::Rc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use secspell_harness::scenarios::{
    CorrectWords, ErrorHighlighting, IgnoredWords, MisspelledWords, MixedText, Suggestions,
    WordChecking,
};
use secspell_harness::{
    Capabilities, Clock, EditorInteraction, EditorObservation, HarnessConfig, HarnessResult,
    IgnoredWordEdit, Scenario, ScenarioContext, SimulatedEditor, TestResult, VirtualClock,
};
use secspell_harness::adapter::apply_word_edit;

/// Observation that flags every word in the editor, whatever the
/// application decided.
struct FlagsEverything<'a>(&'a SimulatedEditor);

impl EditorObservation for FlagsEverything<'_> {
    fn error_words(&self) -> Vec<String> {
        self.0
            .editor_text()
            .map(|text| text.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn ignored_words(&self) -> Vec<String> {
        Vec::new()
    }

    fn editor_text(&self) -> HarnessResult<String> {
        self.0.editor_text()
    }

    fn ignored_word_list(&self) -> HarnessResult<Vec<String>> {
        self.0.ignored_word_list()
    }
}

/// Interaction whose ignored-word removals report success without ever
/// reaching the control.
struct KeepsIgnoredWords<'a>(&'a SimulatedEditor);

impl EditorInteraction for KeepsIgnoredWords<'_> {
    fn editor_present(&self) -> bool {
        self.0.editor_present()
    }

    fn set_editor_text(&self, text: &str) -> HarnessResult<()> {
        self.0.set_editor_text(text)
    }

    fn trigger_commit(&self) -> HarnessResult<()> {
        self.0.trigger_commit()
    }

    fn clear_editor_text(&self) -> HarnessResult<()> {
        self.0.clear_editor_text()
    }

    fn set_ignored_words(&self, edit: &IgnoredWordEdit) -> HarnessResult<Vec<String>> {
        match edit {
            IgnoredWordEdit::Remove(_) => Ok(apply_word_edit(self.0.ignored_word_list()?, edit)),
            IgnoredWordEdit::Add(_) => self.0.set_ignored_words(edit),
        }
    }
}

async fn run_one(
    scenario: &dyn Scenario,
    interaction: &dyn EditorInteraction,
    observation: &dyn EditorObservation,
    clock: &dyn Clock,
    capabilities: &Capabilities,
) -> Vec<TestResult> {
    let config = HarnessConfig::default();
    let ctx = ScenarioContext {
        interaction,
        observation,
        clock,
        capabilities,
        config: &config,
    };
    scenario.run(&ctx).await.expect("scenario contains its failures")
}

fn editor() -> (Rc<VirtualClock>, SimulatedEditor) {
    let clock = Rc::new(VirtualClock::starting_at(42));
    let editor = SimulatedEditor::new(clock.clone());
    (clock, editor)
}

#[tokio::test]
async fn misspelled_words_match_recapitalized_annotations() {
    let (clock, editor) = editor();
    let editor = editor.with_sentence_case();
    let caps = Capabilities::default();

    let results = run_one(&MisspelledWords, &editor, &editor, clock.as_ref(), &caps).await;

    assert_eq!(results, vec![TestResult::passed("Misspelled words highlighted")]);
    assert_eq!(editor.error_words(), vec!["Helo", "wrld"]);
}

#[tokio::test]
async fn misspelled_words_commit_after_input() {
    let (clock, editor) = editor();
    editor.set_focused(true);
    let caps = Capabilities::default();

    run_one(&MisspelledWords, &editor, &editor, clock.as_ref(), &caps).await;

    assert_eq!(editor.input_events(), 1);
    assert_eq!(editor.commit_events(), 1);
    assert!(!editor.is_focused());
    // commit delay + settle
    assert_eq!(clock.elapsed(), Duration::from_millis(150 + 2200));
}

#[tokio::test]
async fn correct_words_fail_when_dictionary_lacks_them() {
    let (clock, editor) = editor();
    let editor = editor.with_dictionary(["hello"]);
    let caps = Capabilities::default();

    let results = run_one(&CorrectWords, &editor, &editor, clock.as_ref(), &caps).await;

    assert_eq!(
        results,
        vec![TestResult::failed(
            "Correct words not highlighted",
            "Correct words should not be highlighted"
        )]
    );
}

#[tokio::test]
async fn mixed_text_rejects_flagged_correct_word() {
    let (clock, editor) = editor();
    let editor = editor.with_dictionary(["hello"]);
    let caps = Capabilities::default();

    let results = run_one(&MixedText, &editor, &editor, clock.as_ref(), &caps).await;

    assert_eq!(
        results[0].error.as_deref(),
        Some("Should not highlight correct word \"world\"")
    );
}

#[tokio::test]
async fn mixed_text_fails_when_every_word_is_flagged() {
    let (clock, editor) = editor();
    let observation = FlagsEverything(&editor);
    let caps = Capabilities::default();

    let results = run_one(&MixedText, &editor, &observation, clock.as_ref(), &caps).await;

    assert!(!results[0].pass);
    assert_eq!(
        results[0].error.as_deref(),
        Some("Should not highlight correct word \"hello\"")
    );
}

#[tokio::test]
async fn word_checking_falls_back_to_editor() {
    let (clock, editor) = editor();
    let caps = Capabilities::default();

    let results = run_one(&WordChecking, &editor, &editor, clock.as_ref(), &caps).await;

    assert_eq!(results, vec![TestResult::passed("Word checking via DOM")]);
    assert_eq!(editor.commit_events(), 3);
}

#[tokio::test]
async fn word_checking_uses_entry_point_without_touching_editor() {
    let (clock, editor) = editor();
    let caps = Capabilities::default().with_direct_check(editor.checker());

    let results = run_one(&WordChecking, &editor, &editor, clock.as_ref(), &caps).await;

    assert_eq!(results, vec![TestResult::passed("Word checking via entry point")]);
    assert_eq!(editor.input_events(), 0);
}

#[tokio::test]
async fn error_highlighting_polls_until_flagged() {
    let (clock, editor) = editor();
    let editor = editor.with_latency(Duration::from_millis(1200));
    let caps = Capabilities::default();

    let results = run_one(&ErrorHighlighting, &editor, &editor, clock.as_ref(), &caps).await;

    assert_eq!(results, vec![TestResult::passed("Error highlighting")]);
    // "test": commit + settle; target word: commit + three 500ms polls
    assert_eq!(
        clock.elapsed(),
        Duration::from_millis(150 + 2200 + 150 + 3 * 500)
    );
}

#[tokio::test]
async fn ignored_word_is_removed_even_when_check_fails() {
    let (clock, editor) = editor();
    let editor = editor.with_ignored(&["existing"]);
    let observation = FlagsEverything(&editor);
    let caps = Capabilities::default();

    let results = run_one(&IgnoredWords, &editor, &observation, clock.as_ref(), &caps).await;

    assert_eq!(
        results,
        vec![TestResult::failed(
            "Ignored words functionality",
            "Ignored word should not be highlighted"
        )]
    );
    assert_eq!(editor.persisted_ignored(), vec!["existing"]);
    assert_eq!(editor.settings_commits(), 2);
}

#[tokio::test]
async fn ignored_word_token_is_marked_ignored_then_removed() {
    let (clock, editor) = editor();
    let caps = Capabilities::default();

    let results = run_one(&IgnoredWords, &editor, &editor, clock.as_ref(), &caps).await;

    assert!(results[0].pass, "{:?}", results);
    assert!(editor.ignored_word_list().unwrap().is_empty());
    assert_eq!(editor.ignored_words(), vec!["customtestword42"]);
}

#[tokio::test]
async fn ignored_word_left_in_control_fails_clean_up() {
    let (clock, editor) = editor();
    let interaction = KeepsIgnoredWords(&editor);
    let caps = Capabilities::default();

    let results = run_one(&IgnoredWords, &interaction, &editor, clock.as_ref(), &caps).await;

    assert_eq!(
        results,
        vec![TestResult::failed(
            "Ignored words functionality",
            "Ignored word list still contains \"customtestword42\""
        )]
    );
    assert_eq!(editor.ignored_word_list().unwrap(), vec!["customtestword42"]);
}

#[tokio::test]
async fn suggestions_skip_without_entry_point() {
    let (clock, editor) = editor();
    let caps = Capabilities::default();

    let results = run_one(&Suggestions, &editor, &editor, clock.as_ref(), &caps).await;

    assert!(results.is_empty());
}

#[tokio::test]
async fn suggestions_respect_limit() {
    let (clock, editor) = editor();
    let caps = Capabilities::default()
        .with_direct_suggest(|_, limit| Ok(vec!["hello".to_string(); limit + 1]));

    let results = run_one(&Suggestions, &editor, &editor, clock.as_ref(), &caps).await;

    assert_eq!(
        results[0].error.as_deref(),
        Some("Expected at most 5 suggestions, got 6")
    );
}
