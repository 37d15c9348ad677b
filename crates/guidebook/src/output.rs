//! Terminal reporting for `serve` and `check`.
//!
//! Everything goes to stderr.

use std::fmt::Display;

use console::{Style, Term};
use gb_config::Config;
use gb_site::GuideIssue;

/// Styled stderr reporter.
pub(crate) struct Console {
    term: Term,
    label: Style,
    url: Style,
    ok: Style,
    warn: Style,
    fail: Style,
}

impl Console {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().dim(),
            url: Style::new().cyan().bold(),
            ok: Style::new().green(),
            warn: Style::new().yellow(),
            fail: Style::new().red().bold(),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn field(&self, label: &str, value: impl Display) {
        self.line(&format!("  {} {value}", self.label.apply_to(format!("{label}:"))));
    }

    /// Address and directories the server is about to use.
    pub(crate) fn serving(&self, config: &Config) {
        let url = format!("http://{}:{}", config.server.host, config.server.port);
        self.line(&format!("Serving guides at {}", self.url.apply_to(url)));
        self.field("guides", config.content_resolved.guides_dir.display());
        self.field("static", config.content_resolved.static_dir.display());
        if let Some(path) = &config.config_path {
            self.field("config", path.display());
        }
    }

    /// Non-fatal problem with the setup.
    pub(crate) fn caution(&self, message: &str) {
        self.line(&format!("{} {message}", self.warn.apply_to("warning:")));
    }

    /// Result of `check`.
    pub(crate) fn check_report(&self, guide_count: usize, issues: &[GuideIssue]) {
        let summary = summary_line(guide_count, issues.len());
        if issues.is_empty() {
            self.line(&self.ok.apply_to(summary).to_string());
            return;
        }

        self.line(&self.warn.apply_to(summary).to_string());
        for issue in issues {
            self.line(&issue_line(issue));
        }
    }

    /// Command failure.
    pub(crate) fn failure(&self, err: impl Display) {
        self.line(&format!("{} {err}", self.fail.apply_to("error:")));
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// One-line summary of a check run.
fn summary_line(guide_count: usize, issue_count: usize) -> String {
    let guides = plural(guide_count, "guide");
    match issue_count {
        0 => format!("{guides} checked, no issues found"),
        n => format!("{guides} checked, {} found", plural(n, "issue")),
    }
}

fn issue_line(issue: &GuideIssue) -> String {
    format!("  - {issue}")
}
