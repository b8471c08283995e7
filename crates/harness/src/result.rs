//! Test outcomes and the run-level accumulator

use serde::{Deserialize, Serialize};

use crate::error::HarnessResult;

/// Outcome of one check within a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub pass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestResult {
    pub fn passed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pass: true,
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pass: false,
            error: Some(error.into()),
        }
    }

    /// Convert a check body's outcome into data; the error becomes the
    /// diagnostic of a failing result.
    pub fn from_outcome(name: impl Into<String>, outcome: HarnessResult<()>) -> Self {
        match outcome {
            Ok(()) => Self::passed(name),
            Err(e) => Self::failed(name, e.to_string()),
        }
    }
}

/// Aggregate of a whole run. Counts only move through [`record`](Self::record),
/// which keeps `total == passed + failed`. Deserializing rebuilds the counts
/// from `details`; serialized counts are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordedDetails")]
pub struct TestRunSummary {
    total: usize,
    passed: usize,
    failed: usize,
    details: Vec<TestResult>,
}

/// Wire form read back from a results file
#[derive(Deserialize)]
struct RecordedDetails {
    #[serde(default)]
    details: Vec<TestResult>,
}

impl From<RecordedDetails> for TestRunSummary {
    fn from(recorded: RecordedDetails) -> Self {
        let mut summary = TestRunSummary::new();
        summary.extend(recorded.details);
        summary
    }
}

impl TestRunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: TestResult) {
        self.total += 1;
        if result.pass {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.details.push(result);
    }

    pub fn extend(&mut self, results: impl IntoIterator<Item = TestResult>) {
        for result in results {
            self.record(result);
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn details(&self) -> &[TestResult] {
        &self.details
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Pass percentage with one decimal place, or `"0"` for an empty run.
    /// Ties round up, e.g. 1 of 16 is `"6.3"`.
    pub fn success_rate(&self) -> String {
        if self.total == 0 {
            return "0".to_string();
        }
        // tenths of a percent, rounded half up
        let tenths = (self.passed * 2000 + self.total) / (self.total * 2);
        format!("{}.{}", tenths / 10, tenths % 10)
    }
}
