//! SecSpell Integration Test Harness
//!
//! Drives the live spell-checking editor through synthetic user actions and
//! asserts on the annotations it renders:
//! - Interaction and observation adapters isolate every page access
//! - Scenarios commit text, wait for the spell check to converge and assert
//! - The runner sequences scenarios, restores the editor and aggregates results
//! - The report module renders the floating results panel
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TestRunner                              │
//! │    ├── precondition: editor_present()                        │
//! │    ├── EditorSnapshot (restored on drop)                     │
//! │    ├── for scenario in scenarios (strictly sequential)       │
//! │    │     └── Scenario::run(ScenarioContext) -> [TestResult]  │
//! │    └── Reporter::run_completed(TestRunSummary)               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ScenarioContext                                             │
//! │    ├── EditorInteraction  (set text, commit, ignored list)   │
//! │    ├── EditorObservation  (error / ignored annotations)      │
//! │    ├── Clock              (wait, await_until)                │
//! │    └── Capabilities       (theme, toast, direct entry points)│
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod adapter;
pub mod assertions;
pub mod clock;
pub mod config;
pub mod error;
pub mod report;
pub mod result;
pub mod runner;
pub mod scenario;
pub mod scenarios;
pub mod sim;

pub use adapter::{Capabilities, EditorInteraction, EditorObservation, IgnoredWordEdit, Theme};
pub use clock::{await_until, Clock, PollOutcome, PollPolicy, VirtualClock};
#[cfg(not(target_arch = "wasm32"))]
pub use clock::TokioClock;
pub use config::HarnessConfig;
pub use error::{ErrorClass, HarnessError, HarnessResult};
pub use report::{PanelContent, PanelRenderer, Reporter};
pub use result::{TestResult, TestRunSummary};
pub use runner::{RunOutcome, RunPhase, TestRunner};
pub use scenario::{Scenario, ScenarioContext};
pub use scenarios::default_scenarios;
pub use sim::SimulatedEditor;
