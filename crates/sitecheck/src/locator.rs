//! Locator abstraction for element selection.
//!
//! A [`Locator`] is a selector plus the options that govern how it is
//! resolved: an optional per-call timeout and a [`MatchPolicy`]. Locators
//! carry no element identity; they are re-resolved against the live page on
//! every step.
//!
//! - **Strict by default**: more than one match is reported as ambiguous
//! - **Explicit first-match**: `.first()` opts into taking the first match
//! - **Text filters**: `Locator::new("a").with_text("LOG IN")`

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// CSS selector (e.g., `#btn-view-all-content`)
    Css(String),
    /// CSS selector narrowed to elements whose text contains a string
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content to match
        text: String,
        /// Compare case-insensitively
        #[serde(default)]
        ignore_case: bool,
    },
    /// `XPath` selector
    #[serde(rename = "xpath")]
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// The underlying selector expression without any text filter
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
            Self::CssWithText { css, .. } => css,
        }
    }

    /// Text filter, if any
    #[must_use]
    pub fn text_filter(&self) -> Option<&str> {
        match self {
            Self::CssWithText { text, .. } => Some(text),
            Self::Css(_) | Self::XPath(_) => None,
        }
    }

    /// Whether an element's text passes this selector's text filter
    #[must_use]
    pub fn text_passes(&self, element_text: &str) -> bool {
        match self {
            Self::CssWithText {
                text,
                ignore_case: false,
                ..
            } => element_text.contains(text.as_str()),
            Self::CssWithText {
                text,
                ignore_case: true,
                ..
            } => element_text
                .to_lowercase()
                .contains(text.to_lowercase().as_str()),
            Self::Css(_) | Self::XPath(_) => true,
        }
    }

    /// JavaScript expression evaluating to an array of all matching elements
    #[must_use]
    pub fn to_query_all(&self) -> String {
        match self {
            Self::Css(s) => format!("Array.from(document.querySelectorAll({s:?}))"),
            Self::CssWithText {
                css,
                text,
                ignore_case: false,
            } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter(el => (el.textContent || '').includes({text:?}))"
            ),
            Self::CssWithText {
                css,
                text,
                ignore_case: true,
            } => format!(
                "Array.from(document.querySelectorAll({css:?})).filter(el => (el.textContent || '').toLowerCase().includes({:?}))",
                text.to_lowercase()
            ),
            Self::XPath(s) => format!(
                "(() => {{ const r = document.evaluate({s:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null); \
                 const out = []; for (let i = 0; i < r.snapshotLength; i++) {{ out.push(r.snapshotItem(i)); }} return out; }})()"
            ),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::CssWithText {
                css,
                text,
                ignore_case,
            } => {
                write!(f, "{css} >> text={text:?}")?;
                if *ignore_case {
                    write!(f, "i")?;
                }
                Ok(())
            }
            Self::XPath(s) => write!(f, "xpath={s}"),
        }
    }
}

/// How a locator treats multiple matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Exactly one element must match
    #[default]
    Strict,
    /// Take the first match in document order
    First,
    /// Take the first visible match in document order
    FirstVisible,
}

/// A locator for finding elements on the current page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    /// The selector for finding elements
    pub selector: Selector,
    /// Per-call timeout in milliseconds (None = harness default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Multiple-match policy
    #[serde(default)]
    pub policy: MatchPolicy,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            timeout_ms: None,
            policy: MatchPolicy::Strict,
        }
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::from_selector(Selector::xpath(expr))
    }

    /// Filter by text content
    ///
    /// `Locator::new("a").with_text("Blog")` matches anchors whose text
    /// contains "Blog". XPath locators are left unchanged.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.text_filter(text.into(), false)
    }

    /// Filter by text content, ignoring case
    #[must_use]
    pub fn with_text_ignore_case(self, text: impl Into<String>) -> Self {
        self.text_filter(text.into(), true)
    }

    fn text_filter(self, text: String, ignore_case: bool) -> Self {
        let selector = match self.selector {
            Selector::Css(css) | Selector::CssWithText { css, .. } => Selector::CssWithText {
                css,
                text,
                ignore_case,
            },
            other @ Selector::XPath(_) => other,
        };
        Self { selector, ..self }
    }

    /// Set a custom timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Select the first match instead of requiring a unique one
    #[must_use]
    pub const fn first(mut self) -> Self {
        self.policy = MatchPolicy::First;
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Effective timeout, falling back to the supplied default
    #[must_use]
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout_ms.map_or(default, Duration::from_millis)
    }

    /// Select the first visible match
    #[must_use]
    pub const fn first_visible(mut self) -> Self {
        self.policy = MatchPolicy::FirstVisible;
        self
    }

    /// Whether multiple matches are acceptable
    #[must_use]
    pub const fn allows_multiple(&self) -> bool {
        !matches!(self.policy, MatchPolicy::Strict)
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.selector)?;
        match self.policy {
            MatchPolicy::Strict => Ok(()),
            MatchPolicy::First => write!(f, " (first)"),
            MatchPolicy::FirstVisible => write!(f, " (first visible)"),
        }
    }
}

impl From<&str> for Locator {
    fn from(selector: &str) -> Self {
        Self::new(selector)
    }
}
