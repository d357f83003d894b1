//! Scenario outcomes and suite reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::result::{HarnessError, HarnessResult};

/// Final status of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Every step passed
    Passed,
    /// A step failed and the rest were skipped
    Failed,
}

/// The step that ended a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFailure {
    /// Index of the failing step (top-level, 0-based); `None` for setup
    pub step_index: Option<usize>,
    /// Description of the failing step
    pub step: String,
    /// Error kind, e.g. `TimeoutExceeded`
    pub kind: String,
    /// Error message
    pub message: String,
}

impl StepFailure {
    /// Build from a harness error
    #[must_use]
    pub fn new(step_index: Option<usize>, step: impl Into<String>, error: &HarnessError) -> Self {
        Self {
            step_index,
            step: step.into(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for StepFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.step_index {
            Some(i) => write!(f, "step {} ({}): {}", i + 1, self.step, self.message),
            None => write!(f, "{}: {}", self.step, self.message),
        }
    }
}

/// A soft observation recorded during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Index of the step that produced it
    pub step_index: usize,
    /// Message
    pub message: String,
}

/// Result of running one scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Scenario name
    pub scenario: String,
    /// Final status
    pub status: OutcomeStatus,
    /// Number of top-level steps that completed
    pub steps_run: usize,
    /// Total number of top-level steps
    pub steps_total: usize,
    /// Failure details when status is `Failed`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<StepFailure>,
    /// Soft notes in the order they were recorded
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl Outcome {
    /// Passing outcome
    #[must_use]
    pub fn passed(scenario: impl Into<String>, steps: usize, notes: Vec<Note>, duration: Duration) -> Self {
        Self {
            scenario: scenario.into(),
            status: OutcomeStatus::Passed,
            steps_run: steps,
            steps_total: steps,
            failure: None,
            notes,
            duration_ms: millis(duration),
        }
    }

    /// Failing outcome
    #[must_use]
    pub fn failed(
        scenario: impl Into<String>,
        steps_run: usize,
        steps_total: usize,
        failure: StepFailure,
        notes: Vec<Note>,
        duration: Duration,
    ) -> Self {
        Self {
            scenario: scenario.into(),
            status: OutcomeStatus::Failed,
            steps_run,
            steps_total,
            failure: Some(failure),
            notes,
            duration_ms: millis(duration),
        }
    }

    /// Whether the scenario passed
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.status == OutcomeStatus::Passed
    }
}

/// Results of a suite run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Outcomes in execution order
    pub outcomes: Vec<Outcome>,
    /// Scenarios skipped after a fail-fast stop
    #[serde(default)]
    pub skipped: Vec<String>,
    /// Total duration in milliseconds
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Empty report starting now
    #[must_use]
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            outcomes: Vec::new(),
            skipped: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Record an outcome
    pub fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    /// Set the total duration
    pub fn finish(&mut self, duration: Duration) {
        self.duration_ms = millis(duration);
    }

    /// Whether all scenarios passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_passed)
    }

    /// Count passed scenarios
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_passed()).count()
    }

    /// Count failed scenarios
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.passed_count()
    }

    /// Total scenarios run
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Failed outcomes
    #[must_use]
    pub fn failures(&self) -> Vec<&Outcome> {
        self.outcomes.iter().filter(|o| !o.is_passed()).collect()
    }

    /// Pretty JSON
    pub fn to_json(&self) -> HarnessResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> StepFailure {
        StepFailure::new(
            Some(2),
            "expect #cfw-side-cart to be visible",
            &HarnessError::TimeoutExceeded {
                selector: "#cfw-side-cart".into(),
                condition: "be visible".into(),
                elapsed_ms: 20_000,
            },
        )
    }

    #[test]
    fn test_failure_display_is_one_based() {
        let text = failure().to_string();
        assert!(text.starts_with("step 3 (expect #cfw-side-cart to be visible)"));
        assert_eq!(failure().kind, "TimeoutExceeded");
    }

    #[test]
    fn test_suite_counts() {
        let mut report = SuiteReport::start();
        report.push(Outcome::passed("hero", 1, Vec::new(), Duration::from_millis(5)));
        report.push(Outcome::failed(
            "side cart",
            2,
            7,
            failure(),
            Vec::new(),
            Duration::from_millis(20),
        ));
        assert_eq!(report.total(), 2);
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.all_passed());
        assert_eq!(report.failures()[0].scenario, "side cart");
    }

    #[test]
    fn test_empty_suite_passes() {
        assert!(SuiteReport::start().all_passed());
    }

    #[test]
    fn test_json_shape() {
        let mut report = SuiteReport::start();
        report.push(Outcome::passed(
            "captcha",
            3,
            vec![Note {
                step_index: 1,
                message: "reCAPTCHA site key: KEY".into(),
            }],
            Duration::from_millis(12),
        ));
        report.finish(Duration::from_millis(15));
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["outcomes"][0]["status"], "passed");
        assert_eq!(json["outcomes"][0]["notes"][0]["step_index"], 1);
        assert_eq!(json["duration_ms"], 15);
        assert!(json["outcomes"][0].get("failure").is_none());
    }
}
