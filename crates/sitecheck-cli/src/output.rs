//! Output formatting and progress reporting

use console::{style, Style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use sitecheck::{Outcome, OutcomeStatus, SuiteReport};

/// Progress reporter for scenario execution
#[derive(Debug)]
pub struct ProgressReporter {
    term: Term,
    progress_bar: Option<ProgressBar>,
    /// Whether to use colors
    pub use_color: bool,
    /// Quiet mode
    pub quiet: bool,
    /// Print scenario notes
    pub show_notes: bool,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

impl ProgressReporter {
    /// Create a new progress reporter
    #[must_use]
    pub fn new(use_color: bool, quiet: bool) -> Self {
        Self {
            term: Term::stderr(),
            progress_bar: None,
            use_color,
            quiet,
            show_notes: false,
        }
    }

    /// Print scenario notes after each outcome
    #[must_use]
    pub const fn with_notes(mut self, show_notes: bool) -> Self {
        self.show_notes = show_notes;
        self
    }

    /// Start a progress bar over `total` scenarios
    pub fn start_progress(&mut self, total: u64, message: &str) {
        if self.quiet || !self.term.is_term() {
            return;
        }

        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.set_message(message.to_string());
        self.progress_bar = Some(pb);
    }

    /// Finish progress bar
    pub fn finish(&self) {
        if let Some(ref pb) = self.progress_bar {
            pb.finish_and_clear();
        }
    }

    /// Report one finished scenario and advance the bar
    pub fn outcome(&self, outcome: &Outcome) {
        let line = format_outcome(outcome);
        self.println(|| match outcome.status {
            OutcomeStatus::Passed => self.success(&line),
            OutcomeStatus::Failed => self.failure(&line),
        });
        if self.show_notes && !self.quiet {
            for note in &outcome.notes {
                let text = format!("    step {}: {}", note.step_index + 1, note.message);
                self.println(|| self.info(&text));
            }
        }
        if let Some(ref pb) = self.progress_bar {
            pb.inc(1);
        }
    }

    /// Write through the progress bar so lines are not overdrawn
    fn println(&self, write: impl FnOnce()) {
        match self.progress_bar {
            Some(ref pb) => pb.suspend(write),
            None => write(),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("✓").green().bold().to_string()
        } else {
            "PASS".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a failure message
    pub fn failure(&self, message: &str) {
        // Always print failures, even in quiet mode
        let prefix = if self.use_color {
            style("✗").red().bold().to_string()
        } else {
            "FAIL".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("⚠").yellow().bold().to_string()
        } else {
            "WARN".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.quiet {
            return;
        }

        let prefix = if self.use_color {
            style("ℹ").blue().bold().to_string()
        } else {
            "INFO".to_string()
        };

        let _ = self.term.write_line(&format!("{prefix} {message}"));
    }

    /// Print the suite summary
    pub fn summary(&self, report: &SuiteReport) {
        let passed = report.passed_count();
        let failed = report.failed_count();
        let skipped = report.skipped.len();
        if self.quiet && failed == 0 {
            return;
        }

        for name in &report.skipped {
            self.warning(&format!("{name} (skipped)"));
        }

        let _ = self.term.write_line("");
        let line = summary_line(
            passed,
            failed,
            skipped,
            Duration::from_millis(report.duration_ms),
        );

        if self.use_color {
            let status = if failed > 0 {
                Style::new().red().bold().apply_to("FAILED")
            } else {
                Style::new().green().bold().apply_to("PASSED")
            };
            let _ = self.term.write_line(&format!("{status} {line}"));
        } else {
            let status = if failed > 0 { "FAILED" } else { "PASSED" };
            let _ = self.term.write_line(&format!("{status} {line}"));
        }
    }
}

/// One-line description of an outcome
#[must_use]
pub fn format_outcome(outcome: &Outcome) -> String {
    let elapsed = outcome.duration_ms as f64 / 1000.0;
    match outcome.failure {
        Some(ref failure) => {
            let at = failure
                .step_index
                .map_or_else(|| "setup".to_string(), |i| format!("step {}", i + 1));
            format!(
                "{} ({elapsed:.2}s)\n    at {at}: {}\n    {}",
                outcome.scenario, failure.step, failure.message
            )
        }
        None => format!(
            "{} ({} steps, {elapsed:.2}s)",
            outcome.scenario, outcome.steps_total
        ),
    }
}

/// Summary counts without the status word
#[must_use]
pub fn summary_line(passed: usize, failed: usize, skipped: usize, duration: Duration) -> String {
    let total = passed + failed + skipped;
    format!(
        "{total} scenarios in {:.2}s ({passed} passed, {failed} failed, {skipped} skipped)",
        duration.as_secs_f64()
    )
}
