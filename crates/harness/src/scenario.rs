//! Scenario contract and the helpers scenarios share

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::adapter::{Capabilities, EditorInteraction, EditorObservation};
use crate::clock::{self, await_until, Clock, PollOutcome, PollPolicy};
use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use crate::result::TestResult;

/// One independent end-to-end check.
///
/// Implementations convert their own assertion and adapter failures into
/// failing [`TestResult`]s. An `Err` returned from [`run`](Self::run) is an
/// escape from that containment; the runner still records it against the
/// scenario but logs it as unexpected.
#[async_trait(?Send)]
pub trait Scenario {
    fn name(&self) -> &str;

    async fn run(&self, ctx: &ScenarioContext<'_>) -> HarnessResult<Vec<TestResult>>;
}

/// Everything a scenario may touch while it runs
pub struct ScenarioContext<'a> {
    pub interaction: &'a dyn EditorInteraction,
    pub observation: &'a dyn EditorObservation,
    pub clock: &'a dyn Clock,
    pub capabilities: &'a Capabilities,
    pub config: &'a HarnessConfig,
}

impl<'a> ScenarioContext<'a> {
    /// Sleep, bounded by the per-wait timeout.
    pub async fn wait(&self, duration: Duration) {
        clock::wait(self.clock, duration, self.config.timing.max_wait()).await;
    }

    /// Write `text`, then commit it after the input notification had a
    /// chance to be handled.
    pub async fn commit_text(&self, text: &str) -> HarnessResult<()> {
        self.interaction.set_editor_text(text)?;
        self.wait(self.config.timing.commit_delay()).await;
        self.interaction.trigger_commit()
    }

    /// Fixed wait for the debounced spell check after a commit.
    pub async fn settle(&self) {
        self.wait(self.config.timing.settle()).await;
    }

    pub async fn commit_and_settle(&self, text: &str) -> HarnessResult<()> {
        self.commit_text(text).await?;
        self.settle().await;
        Ok(())
    }

    pub fn poll_policy(&self) -> PollPolicy {
        let timing = &self.config.timing;
        PollPolicy::new(
            Duration::from_millis(timing.poll_interval_ms).min(timing.max_wait()),
            timing.poll_attempts,
        )
    }

    /// Poll the observation adapter until `predicate` holds or the budget
    /// runs out.
    pub async fn poll_until<F>(&self, predicate: F) -> PollOutcome
    where
        F: FnMut(&dyn EditorObservation) -> bool,
    {
        let mut predicate = predicate;
        let observation = self.observation;
        await_until(self.clock, self.poll_policy(), || predicate(observation)).await
    }

    /// Whether the application accepts `word`, asking its exposed entry
    /// point when there is one and falling back to committing the word and
    /// reading the annotations.
    pub async fn word_is_correct(&self, word: &str) -> HarnessResult<bool> {
        if let Some(check) = &self.capabilities.direct_check {
            debug!(word, "checking word through application entry point");
            return check(word);
        }
        debug!(word, "checking word through the editor");
        self.commit_and_settle(word).await?;
        Ok(!self.observation.is_word_errored(word))
    }

    /// Unique token for this run, e.g. `customtestword1718000000000`.
    pub fn unique_token(&self) -> String {
        format!("{}{}", self.config.ignored_token_prefix, self.clock.wall_millis())
    }
}
