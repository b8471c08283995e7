//! Built-in scenario library
//!
//! Each scenario drives the editor the way a user would, waits for the
//! spell check to converge and asserts on the annotations it renders.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::adapter::{contains_ignore_case, DirectSuggestFn, IgnoredWordEdit};
use crate::assertions::{ensure_false, ensure_true};
use crate::error::{HarnessError, HarnessResult};
use crate::result::TestResult;
use crate::scenario::{Scenario, ScenarioContext};

const MISSPELLED: [&str; 2] = ["helo", "wrld"];
const CORRECT: [&str; 2] = ["hello", "world"];

/// The full library in execution order.
pub fn default_scenarios() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(CorrectWords),
        Box::new(MisspelledWords),
        Box::new(MixedText),
        Box::new(WordChecking),
        Box::new(ErrorHighlighting),
        Box::new(IgnoredWords),
        Box::new(Suggestions),
    ]
}

/// Correct words leave no error annotations behind.
pub struct CorrectWords;

impl CorrectWords {
    async fn check(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<()> {
        ctx.commit_and_settle("hello world").await?;
        let errors = ctx.observation.error_words();
        ensure_true(errors.is_empty(), Some("Correct words should not be highlighted"))
    }
}

#[async_trait(?Send)]
impl Scenario for CorrectWords {
    fn name(&self) -> &str {
        "Correct Words"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<Vec<TestResult>> {
        Ok(vec![TestResult::from_outcome(
            "Correct words not highlighted",
            self.check(ctx).await,
        )])
    }
}

/// Non-dictionary tokens are annotated as errors.
pub struct MisspelledWords;

impl MisspelledWords {
    async fn check(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<()> {
        ctx.commit_and_settle(&MISSPELLED.join(" ")).await?;
        let errors = ctx.observation.error_words();
        ensure_true(errors.len() >= 2, Some("Should find at least 2 errors"))?;
        for word in MISSPELLED {
            ensure_true(
                contains_ignore_case(&errors, word),
                Some(&format!("Should highlight \"{}\"", word)),
            )?;
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl Scenario for MisspelledWords {
    fn name(&self) -> &str {
        "Misspelled Words"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<Vec<TestResult>> {
        Ok(vec![TestResult::from_outcome(
            "Misspelled words highlighted",
            self.check(ctx).await,
        )])
    }
}

/// Only the incorrect half of a mixed sentence is annotated.
pub struct MixedText;

impl MixedText {
    async fn check(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<()> {
        ctx.commit_and_settle("hello helo world wrld").await?;
        let errors = ctx.observation.error_words();
        ensure_true(errors.len() >= 2, Some("Should find misspelled words"))?;
        for word in CORRECT {
            ensure_false(
                contains_ignore_case(&errors, word),
                Some(&format!("Should not highlight correct word \"{}\"", word)),
            )?;
        }
        for word in MISSPELLED {
            ensure_true(
                contains_ignore_case(&errors, word),
                Some(&format!("Should highlight \"{}\"", word)),
            )?;
        }
        let misspelled: Vec<String> = MISSPELLED.iter().map(|w| w.to_string()).collect();
        match errors.iter().find(|e| !contains_ignore_case(&misspelled, e)) {
            Some(stray) => Err(HarnessError::Assertion(format!(
                "Unexpected error annotation \"{}\"",
                stray
            ))),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl Scenario for MixedText {
    fn name(&self) -> &str {
        "Mixed Text"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<Vec<TestResult>> {
        Ok(vec![TestResult::from_outcome(
            "Mixed text (correct and incorrect)",
            self.check(ctx).await,
        )])
    }
}

/// Single-word checks, through the application's entry point when exposed
/// and through the editor otherwise.
pub struct WordChecking;

impl WordChecking {
    async fn check(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<()> {
        for word in CORRECT {
            let correct = ctx.word_is_correct(word).await?;
            ensure_true(correct, Some(&format!("Word \"{}\" should be correct", word)))?;
        }
        let correct = ctx.word_is_correct(MISSPELLED[0]).await?;
        ensure_false(
            correct,
            Some(&format!("Word \"{}\" should be highlighted as error", MISSPELLED[0])),
        )
    }
}

#[async_trait(?Send)]
impl Scenario for WordChecking {
    fn name(&self) -> &str {
        "Word Checking"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<Vec<TestResult>> {
        let name = if ctx.capabilities.direct_check.is_some() {
            "Word checking via entry point"
        } else {
            "Word checking via DOM"
        };
        Ok(vec![TestResult::from_outcome(name, self.check(ctx).await)])
    }
}

/// Highlighting with bounded polling, since a single fixed wait flakes.
pub struct ErrorHighlighting;

impl ErrorHighlighting {
    const TARGET: &'static str = "xyzqwerty";

    async fn check(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<()> {
        ctx.interaction.clear_editor_text()?;
        ctx.commit_and_settle("test").await?;
        ensure_false(
            ctx.observation.is_word_errored("test"),
            Some("Correct word should not be highlighted"),
        )?;

        ctx.interaction.clear_editor_text()?;
        ctx.commit_text(Self::TARGET).await?;
        let outcome = ctx
            .poll_until(|observation| observation.is_word_errored(Self::TARGET))
            .await;
        let attempts = outcome.into_result(
            &format!("Misspelled word \"{}\" not highlighted", Self::TARGET),
            ctx.poll_policy(),
        )?;
        debug!(attempts, "target word highlighted");
        Ok(())
    }
}

#[async_trait(?Send)]
impl Scenario for ErrorHighlighting {
    fn name(&self) -> &str {
        "Error Highlighting"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<Vec<TestResult>> {
        Ok(vec![TestResult::from_outcome(
            "Error highlighting",
            self.check(ctx).await,
        )])
    }
}

/// A word added to the ignored list is not flagged. The injected token is
/// always removed again so persisted settings stay clean.
pub struct IgnoredWords;

impl IgnoredWords {
    async fn check(&self, ctx: &ScenarioContext<'_>, token: &str) -> HarnessResult<()> {
        ctx.wait(ctx.config.timing.ignored_save()).await;
        ctx.commit_and_settle(token).await?;
        ensure_false(
            ctx.observation.is_word_errored(token),
            Some("Ignored word should not be highlighted"),
        )
    }

    fn clean_up(&self, ctx: &ScenarioContext<'_>, token: &str) -> HarnessResult<()> {
        ctx.interaction
            .set_ignored_words(&IgnoredWordEdit::Remove(token.to_string()))?;
        let remaining = ctx.observation.ignored_word_list()?;
        ensure_false(
            remaining.iter().any(|w| w == token),
            Some(&format!("Ignored word list still contains \"{}\"", token)),
        )
    }

    async fn exercise(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<()> {
        let token = ctx.unique_token();
        ctx.interaction
            .set_ignored_words(&IgnoredWordEdit::Add(token.clone()))?;

        let outcome = self.check(ctx, &token).await;
        let cleanup = self.clean_up(ctx, &token);
        match (outcome, cleanup) {
            (Err(e), Err(cleanup_err)) => {
                warn!(token = %token, error = %cleanup_err, "failed to remove injected ignored word");
                Err(e)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), cleanup) => cleanup,
        }
    }
}

#[async_trait(?Send)]
impl Scenario for IgnoredWords {
    fn name(&self) -> &str {
        "Ignored Words"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<Vec<TestResult>> {
        Ok(vec![TestResult::from_outcome(
            "Ignored words functionality",
            self.exercise(ctx).await,
        )])
    }
}

/// Suggestion generation; only runs when the application exposes it.
pub struct Suggestions;

impl Suggestions {
    fn check(&self, ctx: &ScenarioContext<'_>, suggest: &DirectSuggestFn) -> HarnessResult<()> {
        let limit = ctx.config.suggestion_limit;
        let suggestions = suggest(MISSPELLED[0], limit)?;
        ensure_true(
            !suggestions.is_empty(),
            Some(&format!("Expected suggestions for \"{}\"", MISSPELLED[0])),
        )?;
        ensure_true(
            suggestions.len() <= limit,
            Some(&format!("Expected at most {} suggestions, got {}", limit, suggestions.len())),
        )?;
        ensure_false(
            suggestions.iter().any(|s| s.trim().is_empty()),
            Some("Suggestions should not contain empty entries"),
        )
    }
}

#[async_trait(?Send)]
impl Scenario for Suggestions {
    fn name(&self) -> &str {
        "Suggestions"
    }

    async fn run(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<Vec<TestResult>> {
        let Some(suggest) = &ctx.capabilities.direct_suggest else {
            debug!("application exposes no suggestion entry point, skipping");
            return Ok(Vec::new());
        };
        Ok(vec![TestResult::from_outcome(
            "Suggestions for misspelled word",
            self.check(ctx, suggest),
        )])
    }
}
