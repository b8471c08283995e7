//! Error types for the integration harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Application not ready for testing (editor surface not found)")]
    EditorNotFound,

    /// Carries the diagnostic verbatim so the report shows it unprefixed.
    #[error("{0}")]
    Assertion(String),

    #[error("{0} not found")]
    ElementNotFound(String),

    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Application entry point failed: {0}")]
    EntryPoint(String),

    #[error("{what} after {attempts} attempts at {interval_ms}ms intervals")]
    ConvergenceTimeout {
        what: String,
        attempts: u32,
        interval_ms: u64,
    },

    #[error("Report rendering failed: {0}")]
    Render(String),

    #[error("Invalid harness configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Where an error sits in the harness taxonomy, which decides how far it
/// propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Halts the run before any scenario executes.
    Precondition,
    /// Recorded as a failing result, run continues.
    Assertion,
    /// A required control or entry point misbehaved; fails one scenario.
    Adapter,
    /// Escaped scenario containment; appended to the report as a diagnostic.
    Run,
}

impl HarnessError {
    pub fn class(&self) -> ErrorClass {
        match self {
            HarnessError::EditorNotFound => ErrorClass::Precondition,
            HarnessError::Assertion(_) | HarnessError::ConvergenceTimeout { .. } => {
                ErrorClass::Assertion
            }
            HarnessError::ElementNotFound(_)
            | HarnessError::Dom(_)
            | HarnessError::EntryPoint(_) => ErrorClass::Adapter,
            HarnessError::Render(_) | HarnessError::Config(_) => ErrorClass::Run,
        }
    }
}

pub type HarnessResult<T> = Result<T, HarnessError>;
