//! Polling resolution of locators against conditions.
//!
//! Every element-level step goes through [`resolve`]: query the driver,
//! apply the locator's match policy, test the condition, and retry at the
//! poll interval until it holds or the timeout runs out.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

use crate::assertion::{LocationMatch, TextMatch};
use crate::config::HarnessConfig;
use crate::driver::{ElementSnapshot, PageDriver};
use crate::locator::{Locator, MatchPolicy};
use crate::result::{HarnessError, HarnessResult};

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout used when the locator has none
    pub timeout: Duration,
    /// Delay between polls
    pub poll_interval: Duration,
}

impl WaitOptions {
    /// Create wait options
    #[must_use]
    pub const fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Wait options derived from the harness config
    #[must_use]
    pub const fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.command_timeout(), config.poll_interval())
    }
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self::from_config(&HarnessConfig::default())
    }
}

/// A condition an element (or match set) must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// At least the selected element exists
    Exists,
    /// The selected element is visible
    Visible,
    /// The element's text contains a string
    ContainsText(String),
    /// The element's text satisfies a matcher
    TextMatches(TextMatch),
    /// The element has an attribute, optionally with an exact value
    HasAttribute {
        /// Attribute name
        name: String,
        /// Required value, if any
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// The element's attribute satisfies a matcher
    AttributeMatches {
        /// Attribute name
        name: String,
        /// Value matcher
        matcher: TextMatch,
    },
    /// Exactly this many elements match
    Count(usize),
    /// The element is checked
    Checked,
}

impl Condition {
    /// Attribute presence/equality condition
    #[must_use]
    pub fn attribute(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::HasAttribute {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Whether the condition is about a single element
    #[must_use]
    pub const fn needs_single(&self) -> bool {
        !matches!(self, Self::Count(_))
    }

    /// Test a single element
    #[must_use]
    pub fn holds_for(&self, element: &ElementSnapshot) -> bool {
        match self {
            Self::Exists => true,
            Self::Visible => element.visible,
            Self::ContainsText(text) => element.text.contains(text.as_str()),
            Self::TextMatches(matcher) => matcher.matches(&element.text),
            Self::HasAttribute { name, value } => match (element.attribute(name), value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            },
            Self::AttributeMatches { name, matcher } => element
                .attribute(name)
                .is_some_and(|actual| matcher.matches(actual)),
            Self::Checked => element.checked,
            Self::Count(_) => false,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exists => write!(f, "exist"),
            Self::Visible => write!(f, "be visible"),
            Self::ContainsText(t) => write!(f, "contain text {t:?}"),
            Self::TextMatches(m) => write!(f, "have text that would {m}"),
            Self::HasAttribute { name, value: None } => write!(f, "have attribute {name}"),
            Self::HasAttribute {
                name,
                value: Some(v),
            } => write!(f, "have attribute {name}={v:?}"),
            Self::AttributeMatches { name, matcher } => {
                write!(f, "have attribute {name} that would {matcher}")
            }
            Self::Count(n) => write!(f, "match {n} element(s)"),
            Self::Checked => write!(f, "be checked"),
        }
    }
}

/// A successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Index of the selected element among the matches
    pub index: usize,
    /// The selected element, absent for count conditions
    pub element: Option<ElementSnapshot>,
    /// Number of matches observed
    pub count: usize,
    /// Time spent polling
    pub elapsed: Duration,
}

impl Resolved {
    /// Text of the selected element, or empty
    #[must_use]
    pub fn text(&self) -> &str {
        self.element.as_ref().map_or("", |e| e.text.as_str())
    }
}

/// Pick the element a locator refers to from a match list
///
/// Returns `Ok(None)` when nothing matches yet.
pub fn select(
    locator: &Locator,
    condition: &Condition,
    elements: &[ElementSnapshot],
) -> HarnessResult<Option<usize>> {
    if elements.is_empty() {
        return Ok(None);
    }
    match locator.policy {
        MatchPolicy::Strict if elements.len() > 1 && condition.needs_single() => {
            Err(HarnessError::ElementAmbiguous {
                selector: locator.selector().to_string(),
                count: elements.len(),
            })
        }
        MatchPolicy::Strict | MatchPolicy::First => Ok(Some(0)),
        MatchPolicy::FirstVisible => Ok(Some(
            elements.iter().position(|e| e.visible).unwrap_or(0),
        )),
    }
}

/// Resolve a locator, polling until the condition holds
///
/// The timeout is the locator's own when set, else `options.timeout`.
/// Ambiguous strict matches fail immediately; everything else is retried.
pub async fn resolve<D: PageDriver + ?Sized>(
    driver: &mut D,
    locator: &Locator,
    condition: &Condition,
    options: &WaitOptions,
) -> HarnessResult<Resolved> {
    let timeout = locator.timeout_or(options.timeout);
    let start = Instant::now();

    loop {
        let elements = driver.query(locator.selector()).await?;
        let elapsed = start.elapsed();

        if let Condition::Count(expected) = condition {
            if elements.len() == *expected {
                return Ok(Resolved {
                    index: 0,
                    element: None,
                    count: elements.len(),
                    elapsed,
                });
            }
        } else if let Some(index) = select(locator, condition, &elements)? {
            if condition.holds_for(&elements[index]) {
                return Ok(Resolved {
                    index,
                    count: elements.len(),
                    element: elements.into_iter().nth(index),
                    elapsed,
                });
            }
        }

        if elapsed >= timeout {
            return Err(HarnessError::TimeoutExceeded {
                selector: locator.selector().to_string(),
                condition: condition.to_string(),
                elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            });
        }
        trace!(locator = %locator, %condition, matches = elements.len(), "retrying");
        tokio::time::sleep(options.poll_interval.min(timeout - elapsed)).await;
    }
}

/// Poll the current URL until it satisfies the matcher
pub async fn wait_for_location<D: PageDriver + ?Sized>(
    driver: &mut D,
    matcher: &LocationMatch,
    timeout: Duration,
    poll_interval: Duration,
) -> HarnessResult<String> {
    let start = Instant::now();
    loop {
        let url = driver.current_url().await?;
        if matcher.check(&url)?.passed {
            return Ok(url);
        }
        let elapsed = start.elapsed();
        if elapsed >= timeout {
            return Err(HarnessError::TimeoutExceeded {
                selector: url,
                condition: matcher.to_string(),
                elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            });
        }
        tokio::time::sleep(poll_interval.min(timeout - elapsed)).await;
    }
}
