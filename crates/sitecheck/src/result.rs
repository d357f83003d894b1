//! Result and error types for Sitecheck.

use thiserror::Error;

/// Result type for Sitecheck operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that can occur while running scenarios
///
/// Every variant is scenario-local: the runner records it in the scenario's
/// [`Outcome`](crate::Outcome) and moves on to the next scenario.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// No element matched the locator
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that matched nothing
        selector: String,
    },

    /// More than one element matched a strict locator
    #[error("Element ambiguous: {selector} matched {count} elements")]
    ElementAmbiguous {
        /// Selector that matched several elements
        selector: String,
        /// Number of matches observed
        count: usize,
    },

    /// Polling gave up before the condition held
    #[error("Timed out after {elapsed_ms}ms waiting for {selector} to {condition}")]
    TimeoutExceeded {
        /// Selector being polled
        selector: String,
        /// Human-readable condition
        condition: String,
        /// Time spent polling in milliseconds
        elapsed_ms: u64,
    },

    /// A step's assertion did not hold
    #[error("Assertion failed at {step}: expected {expected}, got {actual}")]
    AssertionFailed {
        /// Description of the failing step
        step: String,
        /// Expected value
        expected: String,
        /// Observed value
        actual: String,
    },

    /// Navigation could not complete
    #[error("Navigation to {url} failed: {message}")]
    NavigationFailed {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// The page raised a script error that is not on the allow-list
    #[error("Uncaught page error: {message}")]
    PageScriptError {
        /// Error message reported by the page
        message: String,
    },

    /// The browser driver failed
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// A different scenario was registered under an existing name
    #[error("Duplicate scenario name with different steps: {name}")]
    DuplicateScenario {
        /// Scenario name
        name: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl HarnessError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an assertion failure
    #[must_use]
    pub fn assertion(
        step: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Short machine-friendly kind name, used in reports
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ElementNotFound { .. } => "ElementNotFound",
            Self::ElementAmbiguous { .. } => "ElementAmbiguous",
            Self::TimeoutExceeded { .. } => "TimeoutExceeded",
            Self::AssertionFailed { .. } => "AssertionFailed",
            Self::NavigationFailed { .. } => "NavigationFailed",
            Self::PageScriptError { .. } => "PageScriptError",
            Self::Driver { .. } => "Driver",
            Self::DuplicateScenario { .. } => "DuplicateScenario",
            Self::Config { .. } => "Config",
            Self::Io(_) => "Io",
            Self::Json(_) => "Json",
            Self::Yaml(_) => "Yaml",
        }
    }
}
