//! Results panel rendering
//!
//! The panel is built as HTML fragments so its content can be asserted on
//! without a browser; the web binding only injects the markup.

use std::cell::{Cell, RefCell};

use tracing::{error, info};

use crate::adapter::Theme;
use crate::error::HarnessResult;
use crate::result::TestRunSummary;

pub const CLOSE_BUTTON_ID: &str = "closeTestPanel";
pub const CONTENT_ID: &str = "testResultsContent";

/// Receives run progress from the [`TestRunner`](crate::runner::TestRunner).
pub trait Reporter {
    fn run_started(&self, theme: Theme) -> HarnessResult<()>;

    fn scenario_started(&self, name: &str, index: usize, total: usize) -> HarnessResult<()>;

    fn run_completed(&self, summary: &TestRunSummary) -> HarnessResult<()>;

    /// Append a terminal diagnostic for an error that escaped the scenarios.
    fn run_failed(&self, message: &str);
}

/// Panel colors for one presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub border: &'static str,
    pub running: &'static str,
    pub progress: &'static str,
    pub pass_background: &'static str,
    pub pass_text: &'static str,
    pub fail_background: &'static str,
    pub fail_text: &'static str,
    pub divider: &'static str,
    pub diagnostic: &'static str,
    pub run_error: &'static str,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: "white",
        text: "#333",
        border: "#2196F3",
        running: "#1976d2",
        progress: "#666",
        pass_background: "#d4edda",
        pass_text: "#155724",
        fail_background: "#f8d7da",
        fail_text: "#721c24",
        divider: "#e0e0e0",
        diagnostic: "#999",
        run_error: "#721c24",
    };

    pub const DARK: Palette = Palette {
        background: "#2d2d2d",
        text: "#e0e0e0",
        border: "#4a9eff",
        running: "#4a9eff",
        progress: "#999",
        pass_background: "#1e4620",
        pass_text: "#81c784",
        fail_background: "#4a1e1e",
        fail_text: "#e57373",
        divider: "#444",
        diagnostic: "#aaa",
        run_error: "#e57373",
    };

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self::LIGHT,
            Theme::Dark => Self::DARK,
        }
    }
}

pub fn escape_html(raw: &str) -> String {
    v_htmlescape::escape(raw).to_string()
}

/// Markup for the floating results panel
#[derive(Debug, Clone, Copy)]
pub struct PanelRenderer {
    palette: Palette,
}

impl PanelRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            palette: Palette::for_theme(theme),
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Inline style of the panel container.
    pub fn panel_style(&self) -> String {
        format!(
            "position: fixed; top: 20px; right: 20px; background: {}; border: 2px solid {}; \
             border-radius: 8px; padding: 16px; max-width: 400px; max-height: 80vh; \
             overflow-y: auto; z-index: 10000; box-shadow: 0 4px 16px rgba(0,0,0,0.3); color: {};",
            self.palette.background, self.palette.border, self.palette.text
        )
    }

    /// Title bar with the close action, followed by the empty content area.
    pub fn frame_html(&self) -> String {
        let text = self.palette.text;
        format!(
            "<div style=\"display: flex; justify-content: space-between; align-items: center; margin-bottom: 12px;\">\
             <h3 style=\"margin: 0; color: {text};\">🧪 Integration Tests</h3>\
             <button id=\"{CLOSE_BUTTON_ID}\" style=\"background: none; border: none; font-size: 20px; cursor: pointer; padding: 0 8px; color: {text};\">×</button>\
             </div>\
             <div id=\"{CONTENT_ID}\" style=\"font-size: 13px;\"></div>"
        )
    }

    pub fn running_html(&self) -> String {
        format!("<div style=\"color: {};\">Running tests...</div>", self.palette.running)
    }

    pub fn progress_html(&self, name: &str) -> String {
        format!(
            "<div style=\"margin: 8px 0; color: {};\">Running: {}...</div>",
            self.palette.progress,
            escape_html(name)
        )
    }

    pub fn summary_html(&self, summary: &TestRunSummary) -> String {
        let p = &self.palette;
        let (background, text) = if summary.all_passed() {
            (p.pass_background, p.pass_text)
        } else {
            (p.fail_background, p.fail_text)
        };
        let fail_mark = if summary.failed() > 0 { " ✗" } else { "" };

        let mut html = format!(
            "<div style=\"background: {background}; color: {text}; padding: 12px; border-radius: 4px; margin-bottom: 12px;\">\
             <strong>Tests Complete</strong><br>\
             Total: {} | Passed: {} ✓ | Failed: {}{fail_mark}<br>\
             Success Rate: {}%\
             </div>",
            summary.total(),
            summary.passed(),
            summary.failed(),
            summary.success_rate()
        );

        for detail in summary.details() {
            let (color, mark) = if detail.pass {
                (p.pass_text, "✓")
            } else {
                (p.fail_text, "✗")
            };
            html.push_str(&format!(
                "<div style=\"color: {color}; padding: 4px 0; border-bottom: 1px solid {};\">{mark} {}",
                p.divider,
                escape_html(&detail.name)
            ));
            if let (false, Some(error)) = (detail.pass, &detail.error) {
                html.push_str(&format!(
                    "<div style=\"font-size: 11px; color: {}; margin-top: 2px;\">{}</div>",
                    p.diagnostic,
                    escape_html(error)
                ));
            }
            html.push_str("</div>");
        }
        html
    }

    pub fn run_error_html(&self, message: &str) -> String {
        format!(
            "<div style=\"color: {}; margin-top: 12px;\">Error: {}</div>",
            self.palette.run_error,
            escape_html(message)
        )
    }
}

/// Reporter that keeps the panel's content markup in memory. The web
/// binding mirrors [`content`](Self::content) into the page after each call.
#[derive(Debug, Default)]
pub struct PanelContent {
    theme: Cell<Theme>,
    html: RefCell<String>,
}

impl PanelContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn renderer(&self) -> PanelRenderer {
        PanelRenderer::new(self.theme.get())
    }

    pub fn content(&self) -> String {
        self.html.borrow().clone()
    }
}

impl Reporter for PanelContent {
    fn run_started(&self, theme: Theme) -> HarnessResult<()> {
        self.theme.set(theme);
        *self.html.borrow_mut() = self.renderer().running_html();
        Ok(())
    }

    fn scenario_started(&self, name: &str, _index: usize, _total: usize) -> HarnessResult<()> {
        let line = self.renderer().progress_html(name);
        self.html.borrow_mut().push_str(&line);
        Ok(())
    }

    fn run_completed(&self, summary: &TestRunSummary) -> HarnessResult<()> {
        *self.html.borrow_mut() = self.renderer().summary_html(summary);
        Ok(())
    }

    fn run_failed(&self, message: &str) {
        let line = self.renderer().run_error_html(message);
        self.html.borrow_mut().push_str(&line);
    }
}

/// Reporter that only writes to the log.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn run_started(&self, _theme: Theme) -> HarnessResult<()> {
        info!("Running tests...");
        Ok(())
    }

    fn scenario_started(&self, name: &str, index: usize, total: usize) -> HarnessResult<()> {
        info!("[{}/{}] Running: {}...", index + 1, total, name);
        Ok(())
    }

    fn run_completed(&self, summary: &TestRunSummary) -> HarnessResult<()> {
        info!(
            "Tests Complete. Total: {} | Passed: {} | Failed: {} | Success Rate: {}%",
            summary.total(),
            summary.passed(),
            summary.failed(),
            summary.success_rate()
        );
        Ok(())
    }

    fn run_failed(&self, message: &str) {
        error!("Error: {}", message);
    }
}
