//! Seams between the harness and the application under test
//!
//! [`EditorInteraction`] and [`EditorObservation`] are the only parts of the
//! harness that touch the live page. Scenarios and the runner are written
//! against these traits, so a DOM binding and the in-memory
//! [`SimulatedEditor`](crate::sim::SimulatedEditor) are interchangeable.

use std::fmt;
use std::time::Duration;

use crate::error::HarnessResult;

/// Synthetic user actions the spell-check pipeline reacts to.
pub trait EditorInteraction {
    /// Whether the editable surface can be located.
    fn editor_present(&self) -> bool;

    /// Replace the surface content with `text` and fire an input notification.
    fn set_editor_text(&self, text: &str) -> HarnessResult<()>;

    /// Fire a focus-loss notification on the surface, synthesizing it when
    /// the surface does not currently hold focus.
    fn trigger_commit(&self) -> HarnessResult<()>;

    /// Empty the surface and fire an input notification, without committing.
    fn clear_editor_text(&self) -> HarnessResult<()>;

    /// Edit the newline-delimited ignored-word list and commit the control.
    /// Returns the list as written back.
    fn set_ignored_words(&self, edit: &IgnoredWordEdit) -> HarnessResult<Vec<String>>;
}

/// Read-only view of the rendered annotations. Nothing is cached: every call
/// re-reads current state.
pub trait EditorObservation {
    /// Words currently annotated as errors, in document order.
    fn error_words(&self) -> Vec<String>;

    /// Words currently annotated as ignored, in document order.
    fn ignored_words(&self) -> Vec<String>;

    /// Plain-text content of the editable surface.
    fn editor_text(&self) -> HarnessResult<String>;

    /// Entries of the ignored-word settings control.
    fn ignored_word_list(&self) -> HarnessResult<Vec<String>>;

    fn is_word_errored(&self, word: &str) -> bool {
        contains_ignore_case(&self.error_words(), word)
    }

    fn is_word_ignored(&self, word: &str) -> bool {
        contains_ignore_case(&self.ignored_words(), word)
    }
}

/// Case-insensitive membership; the application may re-capitalize a token
/// without changing its spelling status.
pub fn contains_ignore_case(words: &[String], word: &str) -> bool {
    let needle = word.to_lowercase();
    words.iter().any(|w| w.to_lowercase() == needle)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoredWordEdit {
    Add(String),
    Remove(String),
}

impl IgnoredWordEdit {
    pub fn word(&self) -> &str {
        match self {
            IgnoredWordEdit::Add(word) | IgnoredWordEdit::Remove(word) => word,
        }
    }
}

/// Split a settings-control value into entries. An empty value is an empty
/// list; otherwise every line is kept, blank ones included.
pub fn parse_word_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split('\n').map(str::to_string).collect()
}

pub fn join_word_list(words: &[String]) -> String {
    words.join("\n")
}

/// Apply `edit` to a parsed list. Removal drops every exact match.
pub fn apply_word_edit(mut words: Vec<String>, edit: &IgnoredWordEdit) -> Vec<String> {
    match edit {
        IgnoredWordEdit::Add(word) => words.push(word.clone()),
        IgnoredWordEdit::Remove(word) => words.retain(|w| w != word),
    }
    words
}

/// Host presentation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Interpret the document's theme attribute; only `dark` selects dark mode.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

pub type NotifyFn = Box<dyn Fn(&str, Duration)>;
pub type AlertFn = Box<dyn Fn(&str)>;
pub type DirectCheckFn = Box<dyn Fn(&str) -> HarnessResult<bool>>;
pub type DirectSuggestFn = Box<dyn Fn(&str, usize) -> HarnessResult<Vec<String>>>;

/// Optional host facilities, resolved once when a run starts.
#[derive(Default)]
pub struct Capabilities {
    pub theme: Theme,
    /// Ephemeral toast channel
    pub notify: Option<NotifyFn>,
    /// Blocking fallback used only when no toast channel exists
    pub alert: Option<AlertFn>,
    /// Application-exposed word check
    pub direct_check: Option<DirectCheckFn>,
    /// Application-exposed suggestion generator
    pub direct_suggest: Option<DirectSuggestFn>,
}

impl Capabilities {
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_notify(mut self, notify: impl Fn(&str, Duration) + 'static) -> Self {
        self.notify = Some(Box::new(notify));
        self
    }

    pub fn with_alert(mut self, alert: impl Fn(&str) + 'static) -> Self {
        self.alert = Some(Box::new(alert));
        self
    }

    pub fn with_direct_check(mut self, check: impl Fn(&str) -> HarnessResult<bool> + 'static) -> Self {
        self.direct_check = Some(Box::new(check));
        self
    }

    pub fn with_direct_suggest(
        mut self,
        suggest: impl Fn(&str, usize) -> HarnessResult<Vec<String>> + 'static,
    ) -> Self {
        self.direct_suggest = Some(Box::new(suggest));
        self
    }

    /// Deliver `message` through the best available channel. Returns `false`
    /// when the host offers neither a toast nor an alert.
    pub fn announce(&self, message: &str, duration: Duration) -> bool {
        if let Some(notify) = &self.notify {
            notify(message, duration);
            true
        } else if let Some(alert) = &self.alert {
            alert(message);
            true
        } else {
            false
        }
    }

    /// Toast-only notification; absence of the channel is not an error.
    pub fn notify(&self, message: &str, duration: Duration) -> bool {
        match &self.notify {
            Some(notify) => {
                notify(message, duration);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("theme", &self.theme)
            .field("notify", &self.notify.is_some())
            .field("alert", &self.alert.is_some())
            .field("direct_check", &self.direct_check.is_some())
            .field("direct_suggest", &self.direct_suggest.is_some())
            .finish()
    }
}
