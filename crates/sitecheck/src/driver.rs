//! Browser driver abstraction.
//!
//! [`PageDriver`] is the seam between the harness and a browser. The runner
//! only ever talks to this trait; the CDP implementation lives in
//! [`crate::cdp`] (feature `browser`) and an in-memory page model lives in
//! [`crate::mock_driver`].
//!
//! Elements are addressed by `(selector, index)` where `index` is the
//! position in the match list returned by [`PageDriver::query`]. Nothing is
//! cached between calls.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::Viewport;
use crate::locator::Selector;
use crate::result::HarnessResult;

/// Point-in-time view of one matched element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Lowercase tag name
    pub tag: String,
    /// Text content
    pub text: String,
    /// Rendered and not hidden by CSS
    pub visible: bool,
    /// Attributes present on the element
    pub attributes: BTreeMap<String, String>,
    /// Checked state for checkboxes and radios
    pub checked: bool,
}

impl ElementSnapshot {
    /// Create a visible snapshot with text
    #[must_use]
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
            visible: true,
            ..Self::default()
        }
    }

    /// Get an attribute value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text with surrounding whitespace removed
    #[must_use]
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }
}

/// Result of a top-level navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationResponse {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status of the main document, when the driver can observe it
    pub status: Option<u16>,
}

impl NavigationResponse {
    /// Whether the status is a client or server error
    #[must_use]
    pub fn is_error_status(&self) -> bool {
        self.status.is_some_and(|s| !(200..400).contains(&s))
    }
}

/// Browser driver used by the scenario runner
#[async_trait]
pub trait PageDriver: Send {
    /// Load a URL and wait for the document to finish loading
    async fn navigate(&mut self, url: &str, timeout: Duration) -> HarnessResult<NavigationResponse>;

    /// Snapshot every element matching the selector, in document order
    async fn query(&mut self, selector: &Selector) -> HarnessResult<Vec<ElementSnapshot>>;

    /// Scroll the element into view and click it
    async fn click(&mut self, selector: &Selector, index: usize) -> HarnessResult<()>;

    /// Focus the element and type text into it
    async fn type_text(&mut self, selector: &Selector, index: usize, text: &str)
        -> HarnessResult<()>;

    /// Clear an input's value
    async fn clear(&mut self, selector: &Selector, index: usize) -> HarnessResult<()>;

    /// Check a checkbox
    async fn check(&mut self, selector: &Selector, index: usize) -> HarnessResult<()>;

    /// Overwrite an element's inline style
    async fn set_style(&mut self, selector: &Selector, index: usize, style: &str)
        -> HarnessResult<()>;

    /// Current page URL
    async fn current_url(&mut self) -> HarnessResult<String>;

    /// Go back one history entry
    async fn go_back(&mut self) -> HarnessResult<()>;

    /// Resize the viewport
    async fn set_viewport(&mut self, viewport: Viewport) -> HarnessResult<()>;

    /// Hide elements by id; returns how many were found
    async fn hide_elements(&mut self, ids: &[String]) -> HarnessResult<usize>;

    /// Drain uncaught page errors observed since the last call
    async fn take_page_errors(&mut self) -> HarnessResult<Vec<String>>;

    /// Close the browser session
    async fn close(&mut self) -> HarnessResult<()>;
}
