//! SecSpell harness - developer entry point
//!
//! Runs the integration scenario library against the simulated spell-checking
//! editor so harness changes can be validated without a browser.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod output;
mod session;

use output::OutputFormat;
use session::SessionOptions;

/// SecSpell integration test harness
#[derive(Parser, Debug)]
#[command(name = "secspell-harness")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Word list for the simulated editor, one word per line
    #[arg(long, value_name = "FILE")]
    dictionary: Option<PathBuf>,

    /// Harness configuration (TOML)
    #[arg(long, value_name = "FILE", env = "SECSPELL_HARNESS_CONFIG")]
    config: Option<PathBuf>,

    /// Delay before a committed spell check becomes visible
    #[arg(long, default_value_t = 800)]
    latency_ms: u64,

    /// Sleep in real time instead of advancing a virtual clock
    #[arg(long)]
    real_time: bool,

    /// Render the first word of the content capitalized
    #[arg(long)]
    sentence_case: bool,

    /// Expose the word-check entry point to the harness
    #[arg(long)]
    expose_check: bool,

    /// Expose the suggestion entry point to the harness
    #[arg(long)]
    expose_suggest: bool,

    /// Simulate a page without the ignored-words settings control
    #[arg(long)]
    no_settings_control: bool,

    /// Use the dark presentation mode
    #[arg(long)]
    dark: bool,

    /// Directory to write test-results.json into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn session_options(&self) -> SessionOptions {
        SessionOptions {
            dictionary: self.dictionary.clone(),
            config: self.config.clone(),
            latency: Duration::from_millis(self.latency_ms),
            real_time: self.real_time,
            sentence_case: self.sentence_case,
            expose_check: self.expose_check,
            expose_suggest: self.expose_suggest,
            no_settings_control: self.no_settings_control,
            dark: self.dark,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let summary = match session::run_session(&cli.session_options()).await {
        Ok(summary) => summary,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            std::process::exit(2);
        }
    };

    output::print_summary(&summary, cli.format);

    if let Some(dir) = &cli.output {
        output::write_results(dir, &summary)?;
    }

    if !summary.all_passed() {
        std::process::exit(1);
    }
    if matches!(cli.format, OutputFormat::Table) {
        output::print_success("All integration tests passed");
    }
    Ok(())
}
