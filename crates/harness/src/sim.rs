//! In-memory spell-checking editor
//!
//! Behaves like the application as seen through the adapters: input
//! replaces the content and drops rendered annotations, a commit schedules
//! a spell check that becomes visible only after `latency` has elapsed on
//! the shared [`Clock`], and the ignored-word list takes effect when its
//! control is committed.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::adapter::{
    apply_word_edit, contains_ignore_case, EditorInteraction, EditorObservation, IgnoredWordEdit,
};
use crate::clock::Clock;
use crate::error::{HarnessError, HarnessResult};

const DEFAULT_WORDS: &[&str] = &[
    "a", "and", "brown", "dog", "fox", "hello", "help", "held", "hell", "is", "jumps", "lazy",
    "over", "quick", "test", "text", "the", "this", "word", "words", "world",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Error,
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub word: String,
    pub kind: AnnotationKind,
}

#[derive(Debug)]
struct PendingCheck {
    ready_at: Duration,
    annotations: Vec<Annotation>,
}

#[derive(Debug, Default)]
struct EditorState {
    text: String,
    focused: bool,
    /// Current value of the settings control
    ignored_control: Vec<String>,
    /// List the checker uses; updated when the control is committed
    ignored_persisted: Vec<String>,
    annotations: Vec<Annotation>,
    pending: Option<PendingCheck>,
    input_events: usize,
    commit_events: usize,
    settings_commits: usize,
}

pub struct SimulatedEditor {
    clock: Rc<dyn Clock>,
    dictionary: Rc<HashSet<String>>,
    latency: Duration,
    editor_present: bool,
    settings_present: bool,
    sentence_case: bool,
    state: RefCell<EditorState>,
}

impl SimulatedEditor {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            dictionary: Rc::new(DEFAULT_WORDS.iter().map(|w| w.to_string()).collect()),
            latency: Duration::from_millis(800),
            editor_present: true,
            settings_present: true,
            sentence_case: false,
            state: RefCell::new(EditorState::default()),
        }
    }

    /// Replace the dictionary; entries are matched case-insensitively.
    pub fn with_dictionary<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.dictionary = Rc::new(
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        );
        self
    }

    /// Delay between a commit and its annotations becoming visible.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.state.borrow_mut().text = text.to_string();
        self
    }

    pub fn with_ignored(self, words: &[&str]) -> Self {
        {
            let mut state = self.state.borrow_mut();
            state.ignored_control = words.iter().map(|w| w.to_string()).collect();
            state.ignored_persisted = state.ignored_control.clone();
        }
        self
    }

    /// Render the first word of the content capitalized, as editors that
    /// apply sentence case do.
    pub fn with_sentence_case(mut self) -> Self {
        self.sentence_case = true;
        self
    }

    /// Page without an editable surface.
    pub fn without_editor(mut self) -> Self {
        self.editor_present = false;
        self
    }

    /// Page without the ignored-words settings control.
    pub fn without_settings_control(mut self) -> Self {
        self.settings_present = false;
        self
    }

    pub fn set_focused(&self, focused: bool) {
        self.state.borrow_mut().focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.state.borrow().focused
    }

    pub fn input_events(&self) -> usize {
        self.state.borrow().input_events
    }

    pub fn commit_events(&self) -> usize {
        self.state.borrow().commit_events
    }

    pub fn settings_commits(&self) -> usize {
        self.state.borrow().settings_commits
    }

    /// Ignored words the checker currently honours.
    pub fn persisted_ignored(&self) -> Vec<String> {
        self.state.borrow().ignored_persisted.clone()
    }

    /// Word-correctness entry point backed by this editor's dictionary.
    pub fn checker(&self) -> impl Fn(&str) -> HarnessResult<bool> + 'static {
        let dictionary = Rc::clone(&self.dictionary);
        move |word: &str| Ok(dictionary.contains(&clean_word(word).to_lowercase()))
    }

    /// Suggestion entry point: dictionary words within two edits, closest first.
    pub fn suggester(&self) -> impl Fn(&str, usize) -> HarnessResult<Vec<String>> + 'static {
        let dictionary = Rc::clone(&self.dictionary);
        move |word: &str, limit: usize| {
            let needle = clean_word(word).to_lowercase();
            let mut ranked: Vec<(usize, &String)> = dictionary
                .iter()
                .map(|candidate| (edit_distance(&needle, candidate), candidate))
                .filter(|(distance, _)| *distance > 0 && *distance <= 2)
                .collect();
            ranked.sort();
            Ok(ranked
                .into_iter()
                .take(limit)
                .map(|(_, candidate)| candidate.clone())
                .collect())
        }
    }

    fn require_editor(&self) -> HarnessResult<()> {
        if self.editor_present {
            Ok(())
        } else {
            Err(HarnessError::EditorNotFound)
        }
    }

    fn input(&self, text: &str) -> HarnessResult<()> {
        self.require_editor()?;
        let mut state = self.state.borrow_mut();
        state.text = text.to_string();
        state.annotations.clear();
        state.pending = None;
        state.input_events += 1;
        Ok(())
    }

    fn evaluate(&self, text: &str, ignored: &[String]) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        for (index, token) in text.split_whitespace().enumerate() {
            let word = clean_word(token);
            if word.is_empty() || word.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if self.dictionary.contains(&word.to_lowercase()) {
                continue;
            }
            let kind = if contains_ignore_case(ignored, word) {
                AnnotationKind::Ignored
            } else {
                AnnotationKind::Error
            };
            let rendered = if self.sentence_case && index == 0 {
                capitalize(word)
            } else {
                word.to_string()
            };
            annotations.push(Annotation {
                word: rendered,
                kind,
            });
        }
        annotations
    }

    /// Apply a pending check once its latency has elapsed.
    fn converge(&self) {
        let now = self.clock.elapsed();
        let mut state = self.state.borrow_mut();
        if state.pending.as_ref().is_some_and(|p| p.ready_at <= now) {
            if let Some(pending) = state.pending.take() {
                trace!(count = pending.annotations.len(), "spell check converged");
                state.annotations = pending.annotations;
            }
        }
    }

    fn annotated(&self, kind: AnnotationKind) -> Vec<String> {
        self.converge();
        self.state
            .borrow()
            .annotations
            .iter()
            .filter(|a| a.kind == kind)
            .map(|a| a.word.clone())
            .collect()
    }
}

impl EditorInteraction for SimulatedEditor {
    fn editor_present(&self) -> bool {
        self.editor_present
    }

    fn set_editor_text(&self, text: &str) -> HarnessResult<()> {
        self.input(text)
    }

    fn trigger_commit(&self) -> HarnessResult<()> {
        self.require_editor()?;
        let (text, ignored) = {
            let mut state = self.state.borrow_mut();
            state.focused = false;
            state.commit_events += 1;
            (state.text.clone(), state.ignored_persisted.clone())
        };
        let annotations = self.evaluate(&text, &ignored);
        let ready_at = self.clock.elapsed() + self.latency;
        self.state.borrow_mut().pending = Some(PendingCheck {
            ready_at,
            annotations,
        });
        Ok(())
    }

    fn clear_editor_text(&self) -> HarnessResult<()> {
        self.input("")
    }

    fn set_ignored_words(&self, edit: &IgnoredWordEdit) -> HarnessResult<Vec<String>> {
        if !self.settings_present {
            return Err(HarnessError::ElementNotFound(
                "Ignored words textarea".to_string(),
            ));
        }
        let mut state = self.state.borrow_mut();
        let words = apply_word_edit(std::mem::take(&mut state.ignored_control), edit);
        state.ignored_control = words.clone();
        state.ignored_persisted = words.clone();
        state.settings_commits += 1;
        Ok(words)
    }
}

impl EditorObservation for SimulatedEditor {
    fn error_words(&self) -> Vec<String> {
        self.annotated(AnnotationKind::Error)
    }

    fn ignored_words(&self) -> Vec<String> {
        self.annotated(AnnotationKind::Ignored)
    }

    fn editor_text(&self) -> HarnessResult<String> {
        self.require_editor()?;
        Ok(self.state.borrow().text.clone())
    }

    fn ignored_word_list(&self) -> HarnessResult<Vec<String>> {
        if !self.settings_present {
            return Err(HarnessError::ElementNotFound(
                "Ignored words textarea".to_string(),
            ));
        }
        Ok(self.state.borrow().ignored_control.clone())
    }
}

fn clean_word(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            row[j + 1] = substitution.min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::VirtualClock;

    fn editor() -> (Rc<VirtualClock>, SimulatedEditor) {
        let clock = Rc::new(VirtualClock::new());
        let editor = SimulatedEditor::new(clock.clone()).with_latency(Duration::from_millis(100));
        (clock, editor)
    }

    #[test]
    fn test_annotations_appear_after_latency() {
        let (clock, editor) = editor();
        editor.set_editor_text("hello helo").unwrap();
        editor.trigger_commit().unwrap();
        assert!(editor.error_words().is_empty());

        clock.advance(Duration::from_millis(100));
        assert_eq!(editor.error_words(), vec!["helo"]);
    }

    #[test]
    fn test_input_drops_annotations() {
        let (clock, editor) = editor();
        editor.set_editor_text("wrld").unwrap();
        editor.trigger_commit().unwrap();
        clock.advance(Duration::from_secs(1));
        assert!(editor.is_word_errored("wrld"));

        editor.clear_editor_text().unwrap();
        assert!(editor.error_words().is_empty());
        assert_eq!(editor.input_events(), 2);
    }

    #[test]
    fn test_ignored_words_are_marked_ignored() {
        let (clock, editor) = editor();
        editor
            .set_ignored_words(&IgnoredWordEdit::Add("zork".into()))
            .unwrap();
        editor.set_editor_text("zork").unwrap();
        editor.trigger_commit().unwrap();
        clock.advance(Duration::from_secs(1));

        assert!(!editor.is_word_errored("zork"));
        assert!(editor.is_word_ignored("ZORK"));
        assert_eq!(editor.settings_commits(), 1);
    }

    #[test]
    fn test_sentence_case_recapitalizes_first_word() {
        let clock = Rc::new(VirtualClock::new());
        let editor = SimulatedEditor::new(clock.clone())
            .with_latency(Duration::ZERO)
            .with_sentence_case();
        editor.set_editor_text("helo wrld").unwrap();
        editor.trigger_commit().unwrap();

        assert_eq!(editor.error_words(), vec!["Helo", "wrld"]);
        assert!(editor.is_word_errored("helo"));
        assert!(editor.is_word_errored("HELO"));
    }

    #[test]
    fn test_missing_controls() {
        let clock = Rc::new(VirtualClock::new());
        let editor = SimulatedEditor::new(clock)
            .without_editor()
            .without_settings_control();
        assert!(!editor.editor_present());
        assert!(matches!(
            editor.set_editor_text("x"),
            Err(HarnessError::EditorNotFound)
        ));
        assert!(matches!(
            editor.set_ignored_words(&IgnoredWordEdit::Add("x".into())),
            Err(HarnessError::ElementNotFound(_))
        ));
    }

    #[test]
    fn test_entry_points() {
        let (_clock, editor) = editor();
        let check = editor.checker();
        assert!(check("Hello").unwrap());
        assert!(!check("helo").unwrap());

        let suggest = editor.suggester();
        let suggestions = suggest("helo", 3).unwrap();
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions.contains(&"hello".to_string()));
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("helo", "hello"), 1);
        assert_eq!(edit_distance("wrld", "world"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
    }
}
