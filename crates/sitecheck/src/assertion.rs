//! Text and location matchers used by assertion steps.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::result::{HarnessError, HarnessResult};
use crate::toggle::{labels_match, normalize_label};

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// How an observed string is compared against an expectation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatch {
    /// Trimmed text equals the value exactly
    Equals(String),
    /// Text contains the value
    Contains(String),
    /// Normalized text equals the normalized value
    Normalized(String),
    /// Normalized text contains any of the normalized values
    ContainsAny(Vec<String>),
}

impl TextMatch {
    /// Exact (trimmed) equality
    #[must_use]
    pub fn equals(value: impl Into<String>) -> Self {
        Self::Equals(value.into())
    }

    /// Substring match
    #[must_use]
    pub fn contains(value: impl Into<String>) -> Self {
        Self::Contains(value.into())
    }

    /// Whitespace- and case-insensitive equality
    #[must_use]
    pub fn normalized(value: impl Into<String>) -> Self {
        Self::Normalized(value.into())
    }

    /// Whether the observed text satisfies this matcher
    #[must_use]
    pub fn matches(&self, actual: &str) -> bool {
        match self {
            Self::Equals(expected) => actual.trim() == expected,
            Self::Contains(expected) => actual.contains(expected.as_str()),
            Self::Normalized(expected) => labels_match(actual, expected),
            Self::ContainsAny(options) => {
                let actual = normalize_label(actual);
                options
                    .iter()
                    .any(|o| actual.contains(normalize_label(o).as_str()))
            }
        }
    }
}

impl std::fmt::Display for TextMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "equal {v:?}"),
            Self::Contains(v) => write!(f, "contain {v:?}"),
            Self::Normalized(v) => write!(f, "read {v:?}"),
            Self::ContainsAny(v) => write!(f, "contain any of {v:?}"),
        }
    }
}

/// Expectation on the current page location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMatch {
    /// Everything after the host (path, query, fragment) contains the value
    PathIncludes(String),
    /// The pathname matches a regular expression
    PathMatches(String),
}

impl LocationMatch {
    /// Check a full URL against this expectation
    pub fn check(&self, url: &str) -> HarnessResult<AssertionResult> {
        let result = match self {
            Self::PathIncludes(fragment) => {
                if url_tail(url).contains(fragment.as_str()) {
                    AssertionResult::pass()
                } else {
                    AssertionResult::fail(format!("expected {url} to include {fragment:?}"))
                }
            }
            Self::PathMatches(pattern) => {
                let re = Regex::new(pattern).map_err(|e| HarnessError::Config {
                    message: format!("invalid location pattern {pattern:?}: {e}"),
                })?;
                let path = url_path(url);
                if re.is_match(path) {
                    AssertionResult::pass()
                } else {
                    AssertionResult::fail(format!("expected path {path:?} to match {pattern}"))
                }
            }
        };
        Ok(result)
    }
}

impl std::fmt::Display for LocationMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathIncludes(v) => write!(f, "location includes {v:?}"),
            Self::PathMatches(v) => write!(f, "path matches /{v}/"),
        }
    }
}

/// The part of a URL after `scheme://host[:port]`
///
/// URLs without a scheme are returned unchanged.
#[must_use]
pub fn url_tail(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| {
        rest.find('/').map_or("/", |idx| &rest[idx..])
    })
}

/// The pathname of a URL, without query or fragment
#[must_use]
pub fn url_path(url: &str) -> &str {
    let tail = url_tail(url);
    let end = tail.find(['?', '#']).unwrap_or(tail.len());
    &tail[..end]
}
