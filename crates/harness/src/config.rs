//! Harness configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::HarnessResult;

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Where the application's controls and annotations live
    pub selectors: SelectorConfig,

    /// Delays and polling budgets
    pub timing: TimingConfig,

    /// Prefix of the generated token injected into the ignored-word list
    pub ignored_token_prefix: String,

    /// Limit passed to the application's suggestion entry point
    pub suggestion_limit: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            selectors: SelectorConfig::default(),
            timing: TimingConfig::default(),
            ignored_token_prefix: "customtestword".to_string(),
            suggestion_limit: 5,
        }
    }
}

impl HarnessConfig {
    /// Parse configuration from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> HarnessResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// DOM identifiers consumed from the application under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Element id of the editable surface
    pub editor_id: String,

    /// Selector tried when no element carries `editor_id`
    pub editor_fallback: String,

    /// Element id of the ignored-words settings textarea
    pub ignored_words_id: String,

    /// Class marking misspelled word spans
    pub error_class: String,

    /// Class marking ignored word spans
    pub ignored_class: String,

    /// Attribute holding the word an annotation covers
    pub word_attribute: String,

    /// Attribute on the document element carrying the theme
    pub theme_attribute: String,

    /// Element id of the injected results panel
    pub panel_id: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            editor_id: "text-area".to_string(),
            editor_fallback: "[contenteditable=\"true\"]".to_string(),
            ignored_words_id: "ignoredWordsTextarea".to_string(),
            error_class: "spell-error".to_string(),
            ignored_class: "spell-ignored".to_string(),
            word_attribute: "data-word".to_string(),
            theme_attribute: "data-theme".to_string(),
            panel_id: "testResultsPanel".to_string(),
        }
    }
}

/// Timing budgets, all in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Pause before the first scenario so dictionaries can finish loading
    pub warmup_ms: u64,

    /// Gap between the input notification and the commit (blur)
    pub commit_delay_ms: u64,

    /// Wait for spell-check results after a commit
    pub settle_ms: u64,

    /// Wait for the ignored-word list to persist
    pub ignored_save_ms: u64,

    /// Pause between scenarios so progress can repaint
    pub between_scenarios_ms: u64,

    /// Spacing of bounded polls
    pub poll_interval_ms: u64,

    /// Number of bounded polls before giving up
    pub poll_attempts: u32,

    /// Lifetime of the summary toast
    pub toast_ms: u64,

    /// Upper bound on any single suspension
    pub max_wait_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            warmup_ms: 300,
            commit_delay_ms: 150,
            settle_ms: 2200,
            ignored_save_ms: 500,
            between_scenarios_ms: 100,
            poll_interval_ms: 500,
            poll_attempts: 5,
            toast_ms: 3000,
            max_wait_ms: 10_000,
        }
    }
}

impl TimingConfig {
    pub fn warmup(&self) -> Duration {
        Duration::from_millis(self.warmup_ms)
    }

    pub fn commit_delay(&self) -> Duration {
        Duration::from_millis(self.commit_delay_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn ignored_save(&self) -> Duration {
        Duration::from_millis(self.ignored_save_ms)
    }

    pub fn between_scenarios(&self) -> Duration {
        Duration::from_millis(self.between_scenarios_ms)
    }

    pub fn toast(&self) -> Duration {
        Duration::from_millis(self.toast_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }
}
