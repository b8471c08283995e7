//! One harness run against the simulated editor

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use secspell_harness::report::LogReporter;
use secspell_harness::{
    default_scenarios, Capabilities, Clock, HarnessConfig, RunOutcome, SimulatedEditor,
    TestRunSummary, TestRunner, Theme, TokioClock, VirtualClock,
};
use tracing::{debug, info, warn};

/// How the simulated application is set up for a run
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub dictionary: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub latency: Duration,
    pub real_time: bool,
    pub sentence_case: bool,
    pub expose_check: bool,
    pub expose_suggest: bool,
    pub no_settings_control: bool,
    pub dark: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            dictionary: None,
            config: None,
            latency: Duration::from_millis(800),
            real_time: false,
            sentence_case: false,
            expose_check: false,
            expose_suggest: false,
            no_settings_control: false,
            dark: false,
        }
    }
}

/// Load a TOML harness configuration; missing keys keep their defaults.
pub fn load_config(path: &Path) -> Result<HarnessConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: HarnessConfig = toml::from_str(&raw)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    debug!(?config, "loaded harness config");
    Ok(config)
}

/// Load a word list, one entry per line. Blank lines and `#` comments are
/// skipped.
pub fn load_dictionary(path: &Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dictionary {}", path.display()))?;
    let words: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    if words.is_empty() {
        bail!("Dictionary {} contains no words", path.display());
    }
    info!("Loaded {} dictionary words from {}", words.len(), path.display());
    Ok(words)
}

/// Run the full scenario library and return the summary.
///
/// Fails when the run could not start or when an error escaped the
/// scenarios; assertion failures are part of the summary.
pub async fn run_session(options: &SessionOptions) -> Result<TestRunSummary> {
    let config = match &options.config {
        Some(path) => load_config(path)?,
        None => HarnessConfig::default(),
    };

    let clock: Rc<dyn Clock> = if options.real_time {
        Rc::new(TokioClock::new())
    } else {
        let epoch = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();
        Rc::new(VirtualClock::starting_at(epoch))
    };

    let mut editor = SimulatedEditor::new(Rc::clone(&clock)).with_latency(options.latency);
    if let Some(path) = &options.dictionary {
        editor = editor.with_dictionary(load_dictionary(path)?);
    }
    if options.sentence_case {
        editor = editor.with_sentence_case();
    }
    if options.no_settings_control {
        editor = editor.without_settings_control();
    }

    let theme = if options.dark { Theme::Dark } else { Theme::Light };
    let mut capabilities = Capabilities::default()
        .with_theme(theme)
        .with_notify(|message, duration| {
            info!("[toast {}ms] {}", duration.as_millis(), message);
        })
        .with_alert(|message| warn!("[alert] {}", message));
    if options.expose_check {
        capabilities = capabilities.with_direct_check(editor.checker());
    }
    if options.expose_suggest {
        capabilities = capabilities.with_direct_suggest(editor.suggester());
    }

    let reporter = LogReporter;
    let scenarios = default_scenarios();
    let mut runner = TestRunner::new(&editor, &editor, clock.as_ref(), &reporter)
        .with_capabilities(capabilities)
        .with_config(config);

    match runner.run(&scenarios).await {
        RunOutcome::NotReady => bail!("Application not ready for testing"),
        RunOutcome::Finished {
            run_error: Some(message),
            ..
        } => bail!("Run failed: {}", message),
        RunOutcome::Finished { summary, .. } => {
            debug!(
                elapsed_ms = clock.elapsed().as_millis() as u64,
                "simulated run finished"
            );
            Ok(summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_default_session_passes() {
        let summary = run_session(&SessionOptions::default()).await.unwrap();
        assert_eq!(summary.total(), 6);
        assert!(summary.all_passed());
    }

    #[tokio::test]
    async fn test_entry_points_add_suggestions() {
        let options = SessionOptions {
            expose_check: true,
            expose_suggest: true,
            ..Default::default()
        };
        let summary = run_session(&options).await.unwrap();
        assert_eq!(summary.total(), 7);
        assert!(summary.all_passed());
    }

    #[tokio::test]
    async fn test_missing_settings_control_fails_one_scenario() {
        let options = SessionOptions {
            no_settings_control: true,
            ..Default::default()
        };
        let summary = run_session(&options).await.unwrap();
        assert_eq!(summary.failed(), 1);
    }

    #[test]
    fn test_load_dictionary_skips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# en_US subset\nhello\n\n  world  \ntest").unwrap();

        let words = load_dictionary(file.path()).unwrap();
        assert_eq!(words, vec!["hello", "world", "test"]);
    }

    #[test]
    fn test_empty_dictionary_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing").unwrap();
        assert!(load_dictionary(file.path()).is_err());
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "suggestion_limit = 3\n\n[timing]\nsettle_ms = 50").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.suggestion_limit, 3);
        assert_eq!(config.timing.settle_ms, 50);
        assert_eq!(config.timing.poll_attempts, 5);
        assert_eq!(config.selectors.editor_id, "text-area");
    }
}
