//! Uncaught page-error filtering.
//!
//! The storefront throws a handful of harmless script errors from third-party
//! widgets. An [`ErrorFilter`] names the ones a run tolerates; anything else
//! fails the scenario with [`HarnessError::PageScriptError`].

use serde::{Deserialize, Serialize};

use crate::result::HarnessError;

/// Substrings of page errors tolerated by default
pub const DEFAULT_IGNORED_ERRORS: &[&str] = &[
    "Cannot read properties of undefined",
    "Cannot read properties of null",
    "reading 'style'",
    "reading 'use'",
    "cross origin",
    "Invalid regular expression",
];

/// Allow-list of page-error substrings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorFilter {
    /// Substrings that mark an error as ignorable
    pub patterns: Vec<String>,
    /// Ignore every error
    #[serde(default)]
    pub ignore_all: bool,
}

impl Default for ErrorFilter {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_IGNORED_ERRORS.iter().map(|s| (*s).to_string()).collect(),
            ignore_all: false,
        }
    }
}

impl ErrorFilter {
    /// Filter that tolerates nothing
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            patterns: Vec::new(),
            ignore_all: false,
        }
    }

    /// Filter that tolerates everything
    #[must_use]
    pub const fn ignore_all() -> Self {
        Self {
            patterns: Vec::new(),
            ignore_all: true,
        }
    }

    /// Add a tolerated substring
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Whether an error message is tolerated
    #[must_use]
    pub fn is_ignored(&self, message: &str) -> bool {
        self.ignore_all || self.patterns.iter().any(|p| message.contains(p.as_str()))
    }

    /// The first fatal error as a [`HarnessError`], if any
    #[must_use]
    pub fn first_fatal(&self, errors: &[String]) -> Option<HarnessError> {
        errors
            .iter()
            .find(|e| !self.is_ignored(e))
            .map(|message| HarnessError::PageScriptError {
                message: message.clone(),
            })
    }
}
