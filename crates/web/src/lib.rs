//! Browser binding for the SecSpell integration harness
//!
//! Loaded next to the application page. On start it installs console
//! logging and registers `window.runIntegrationTests`, which runs the
//! scenario library against the live editor and resolves to the results.
//!
//! Everything here is DOM glue; scenario logic lives in `secspell-harness`.
//! The crate is empty on native targets.

#![forbid(unsafe_code)]

#[cfg(target_arch = "wasm32")]
mod clock;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod entry;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod panel;

#[cfg(target_arch = "wasm32")]
pub use clock::BrowserClock;
#[cfg(target_arch = "wasm32")]
pub use dom::DomEditor;
#[cfg(target_arch = "wasm32")]
pub use entry::run_integration_tests;
#[cfg(target_arch = "wasm32")]
pub use host::{resolve_capabilities, resolve_config};
#[cfg(target_arch = "wasm32")]
pub use panel::DomReporter;

/// Global the page reads optional harness configuration from.
pub const CONFIG_GLOBAL: &str = "secspellHarnessConfig";

/// Global the runner registers itself under.
pub const ENTRY_GLOBAL: &str = "runIntegrationTests";
