//! Main test runner that sequences scenarios and reports their results

use std::fmt;

use tracing::{debug, error, info, warn};

use crate::adapter::{Capabilities, EditorInteraction, EditorObservation};
use crate::clock::{self, Clock};
use crate::config::HarnessConfig;
use crate::error::{ErrorClass, HarnessError, HarnessResult};
use crate::report::Reporter;
use crate::result::{TestResult, TestRunSummary};
use crate::scenario::{Scenario, ScenarioContext};

/// Runner lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    PreconditionCheck,
    Running { index: usize, total: usize },
    Aggregating,
    Rendered,
    /// The editor was missing; nothing ran.
    Halted,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunPhase::Idle => write!(f, "idle"),
            RunPhase::PreconditionCheck => write!(f, "precondition-check"),
            RunPhase::Running { index, total } => write!(f, "running {}/{}", index + 1, total),
            RunPhase::Aggregating => write!(f, "aggregating"),
            RunPhase::Rendered => write!(f, "rendered"),
            RunPhase::Halted => write!(f, "halted"),
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Precondition failed; no scenario executed.
    NotReady,
    /// Every scenario executed. `run_error` holds the first diagnostic that
    /// escaped scenario containment (a precondition or run-level error from a
    /// scenario, restoration or rendering), if any.
    Finished {
        summary: TestRunSummary,
        run_error: Option<String>,
    },
}

impl RunOutcome {
    pub fn summary(&self) -> Option<&TestRunSummary> {
        match self {
            RunOutcome::NotReady => None,
            RunOutcome::Finished { summary, .. } => Some(summary),
        }
    }
}

/// Snapshot of the editor text, restored when the guard goes out of scope
/// even if a scenario unwinds past it.
pub struct EditorSnapshot<'a> {
    interaction: &'a dyn EditorInteraction,
    original: String,
    restored: bool,
}

impl<'a> EditorSnapshot<'a> {
    pub fn capture(
        interaction: &'a dyn EditorInteraction,
        observation: &dyn EditorObservation,
    ) -> HarnessResult<Self> {
        let original = observation.editor_text()?;
        debug!(chars = original.chars().count(), "captured editor text");
        Ok(Self {
            interaction,
            original,
            restored: false,
        })
    }

    /// Put the captured text back and commit it so annotations match.
    pub fn restore(mut self) -> HarnessResult<()> {
        self.restored = true;
        Self::write_back(self.interaction, &self.original)
    }

    fn write_back(interaction: &dyn EditorInteraction, original: &str) -> HarnessResult<()> {
        interaction.clear_editor_text()?;
        if !original.is_empty() {
            interaction.set_editor_text(original)?;
            interaction.trigger_commit()?;
        }
        Ok(())
    }
}

impl Drop for EditorSnapshot<'_> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = Self::write_back(self.interaction, &self.original) {
            error!("Failed to restore editor text: {}", e);
        }
    }
}

/// Sequential scenario runner
pub struct TestRunner<'a> {
    interaction: &'a dyn EditorInteraction,
    observation: &'a dyn EditorObservation,
    clock: &'a dyn Clock,
    reporter: &'a dyn Reporter,
    capabilities: Capabilities,
    config: HarnessConfig,
    phase: RunPhase,
}

impl<'a> TestRunner<'a> {
    pub fn new(
        interaction: &'a dyn EditorInteraction,
        observation: &'a dyn EditorObservation,
        clock: &'a dyn Clock,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            interaction,
            observation,
            clock,
            reporter,
            capabilities: Capabilities::default(),
            config: HarnessConfig::default(),
            phase: RunPhase::Idle,
        }
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn transition(&mut self, next: RunPhase) {
        debug!("runner phase: {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Run `scenarios` strictly in order and report the aggregate.
    pub async fn run(&mut self, scenarios: &[Box<dyn Scenario>]) -> RunOutcome {
        self.transition(RunPhase::PreconditionCheck);
        if !self.interaction.editor_present() {
            let message = HarnessError::EditorNotFound.to_string();
            warn!("{}", message);
            if !self.capabilities.announce(&message, self.config.timing.toast()) {
                warn!("No notification channel available for the not-ready notice");
            }
            self.transition(RunPhase::Halted);
            return RunOutcome::NotReady;
        }

        clock::wait(self.clock, self.config.timing.warmup(), self.config.timing.max_wait()).await;

        if let Err(e) = self.reporter.run_started(self.capabilities.theme) {
            warn!("Could not show run progress: {}", e);
        }

        let mut summary = TestRunSummary::new();
        let mut run_error = None;

        match EditorSnapshot::capture(self.interaction, self.observation) {
            Ok(snapshot) => {
                info!("Running {} scenario(s)...", scenarios.len());
                for (index, scenario) in scenarios.iter().enumerate() {
                    self.transition(RunPhase::Running {
                        index,
                        total: scenarios.len(),
                    });
                    let (results, escaped) =
                        self.run_scenario(scenario.as_ref(), index, scenarios.len()).await;
                    summary.extend(results);
                    if let Some(message) = escaped {
                        run_error.get_or_insert(message);
                    }
                }
                if let Err(e) = snapshot.restore() {
                    error!("Failed to restore editor text: {}", e);
                    run_error = Some(e.to_string());
                }
            }
            Err(e) => {
                error!("Could not capture editor text: {}", e);
                run_error = Some(e.to_string());
            }
        }

        self.transition(RunPhase::Aggregating);
        info!(
            "Test Results: {} passed, {} failed, {} total ({}%)",
            summary.passed(),
            summary.failed(),
            summary.total(),
            summary.success_rate()
        );

        if let Err(e) = self.reporter.run_completed(&summary) {
            error!("Test error: {}", e);
            run_error.get_or_insert_with(|| e.to_string());
        }
        if let Some(message) = &run_error {
            self.reporter.run_failed(message);
        }

        self.capabilities.notify(
            &format!(
                "Integration tests: {}/{} passed",
                summary.passed(),
                summary.total()
            ),
            self.config.timing.toast(),
        );

        self.transition(RunPhase::Rendered);
        self.transition(RunPhase::Idle);
        RunOutcome::Finished { summary, run_error }
    }

    /// Results of one scenario, plus the message of an escaped error that
    /// concerns the whole run rather than this scenario alone.
    async fn run_scenario(
        &self,
        scenario: &dyn Scenario,
        index: usize,
        total: usize,
    ) -> (Vec<TestResult>, Option<String>) {
        if let Err(e) = self.reporter.scenario_started(scenario.name(), index, total) {
            warn!("Could not show scenario progress: {}", e);
        }
        clock::wait(
            self.clock,
            self.config.timing.between_scenarios(),
            self.config.timing.max_wait(),
        )
        .await;

        let ctx = ScenarioContext {
            interaction: self.interaction,
            observation: self.observation,
            clock: self.clock,
            capabilities: &self.capabilities,
            config: &self.config,
        };

        match scenario.run(&ctx).await {
            Ok(results) => {
                for result in &results {
                    if result.pass {
                        info!("✓ {}", result.name);
                    } else {
                        error!(
                            "✗ {} - {}",
                            result.name,
                            result.error.as_deref().unwrap_or("unknown error")
                        );
                    }
                }
                (results, None)
            }
            Err(e) => {
                let failed = vec![TestResult::failed(scenario.name(), e.to_string())];
                match e.class() {
                    ErrorClass::Assertion | ErrorClass::Adapter => {
                        error!("✗ {} - unhandled scenario error: {}", scenario.name(), e);
                        (failed, None)
                    }
                    ErrorClass::Precondition | ErrorClass::Run => {
                        error!("Test error in {}: {}", scenario.name(), e);
                        (failed, Some(e.to_string()))
                    }
                }
            }
        }
    }
}
