//! In-memory page model implementing [`PageDriver`].
//!
//! A [`MockDriver`] holds a set of [`MockPage`]s keyed by URL. Navigating
//! loads a fresh copy of the page, so repeated visits see the same initial
//! state. Elements are matched by exact selector string (plus the selector's
//! text filter), and clicks apply the element's scripted [`ClickEffect`]s.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::config::Viewport;
use crate::driver::{ElementSnapshot, NavigationResponse, PageDriver};
use crate::locator::Selector;
use crate::result::{HarnessError, HarnessResult};

/// Scripted reaction to a click
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickEffect {
    /// Navigate to a URL (absolute, or a path on the current origin)
    Navigate(String),
    /// Swap the clicked element's text between two labels
    ToggleText(String, String),
    /// Make every element with this selector visible
    Show(String),
    /// Hide every element with this selector
    Hide(String),
    /// Set an attribute on every element with this selector
    SetAttribute {
        /// Target selector
        selector: String,
        /// Attribute name
        name: String,
        /// Attribute value
        value: String,
    },
    /// Raise an uncaught page error
    RaiseError(String),
}

/// One element in a mock page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    /// Selector string this element answers to
    pub selector: String,
    /// Tag name
    pub tag: String,
    /// Text content
    pub text: String,
    /// Visibility
    pub visible: bool,
    /// Attributes
    pub attributes: BTreeMap<String, String>,
    /// Checked state
    pub checked: bool,
    /// Number of queries for which the element is still absent
    pub absent_for_polls: u32,
    /// Effects applied when clicked
    pub on_click: Vec<ClickEffect>,
}

impl MockElement {
    /// Create a visible element
    #[must_use]
    pub fn new(selector: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            tag: "div".to_string(),
            text: text.into(),
            visible: true,
            attributes: BTreeMap::new(),
            checked: false,
            absent_for_polls: 0,
            on_click: Vec::new(),
        }
    }

    /// Set the tag name
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Start hidden
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Add an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Only appear after this many queries
    #[must_use]
    pub const fn appears_after(mut self, polls: u32) -> Self {
        self.absent_for_polls = polls;
        self
    }

    /// Add a click effect
    #[must_use]
    pub fn on_click(mut self, effect: ClickEffect) -> Self {
        self.on_click.push(effect);
        self
    }

    fn matches(&self, selector: &Selector) -> bool {
        self.absent_for_polls == 0
            && self.selector == selector.expression()
            && selector.text_passes(&self.text)
    }

    fn snapshot(&self) -> ElementSnapshot {
        ElementSnapshot {
            tag: self.tag.clone(),
            text: self.text.clone(),
            visible: self.visible,
            attributes: self.attributes.clone(),
            checked: self.checked,
        }
    }
}

/// A page served by the mock driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPage {
    /// Page URL
    pub url: String,
    /// HTTP status returned on navigation
    pub status: u16,
    /// Elements in document order
    pub elements: Vec<MockElement>,
    /// Errors raised while loading
    pub load_errors: Vec<String>,
}

impl MockPage {
    /// Create an empty page with status 200
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: 200,
            elements: Vec::new(),
            load_errors: Vec::new(),
        }
    }

    /// Set the HTTP status
    #[must_use]
    pub const fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Add an element
    #[must_use]
    pub fn element(mut self, element: MockElement) -> Self {
        self.elements.push(element);
        self
    }

    /// Raise a page error while loading
    #[must_use]
    pub fn load_error(mut self, message: impl Into<String>) -> Self {
        self.load_errors.push(message.into());
        self
    }

    fn for_each_with_selector(&mut self, selector: &str, mut f: impl FnMut(&mut MockElement)) {
        self.elements
            .iter_mut()
            .filter(|e| e.selector == selector)
            .for_each(&mut f);
    }
}

/// Scriptable in-memory driver
#[derive(Debug, Default)]
pub struct MockDriver {
    pages: HashMap<String, MockPage>,
    current: Option<MockPage>,
    history: Vec<String>,
    page_errors: Vec<String>,
    /// Viewport most recently applied
    pub viewport: Option<Viewport>,
    /// Timeout passed to the most recent navigation
    pub navigation_timeout: Option<Duration>,
    /// Record of driver calls, oldest first
    pub call_history: Vec<String>,
}

impl MockDriver {
    /// Create a driver with no pages
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page; later registrations replace earlier ones
    pub fn add_page(&mut self, page: MockPage) {
        self.pages.insert(normalize_url(&page.url), page);
    }

    /// Builder form of [`Self::add_page`]
    #[must_use]
    pub fn with_page(mut self, page: MockPage) -> Self {
        self.add_page(page);
        self
    }

    /// Queue an uncaught page error
    pub fn push_page_error(&mut self, message: impl Into<String>) {
        self.page_errors.push(message.into());
    }

    /// The live state of the current page
    #[must_use]
    pub const fn current_page(&self) -> Option<&MockPage> {
        self.current.as_ref()
    }

    /// Value typed into the first element with this selector
    #[must_use]
    pub fn value_of(&self, selector: &str) -> Option<&str> {
        self.current
            .as_ref()?
            .elements
            .iter()
            .find(|e| e.selector == selector)?
            .attributes
            .get("value")
            .map(String::as_str)
    }

    fn load(&mut self, url: &str) -> NavigationResponse {
        let resolved = self.resolve_url(url);
        let page = self
            .pages
            .get(&normalize_url(&resolved))
            .cloned()
            .unwrap_or_else(|| MockPage::new(resolved.clone()).status(404));
        self.page_errors.extend(page.load_errors.iter().cloned());
        let status = page.status;
        self.current = Some(MockPage {
            url: resolved.clone(),
            ..page
        });
        NavigationResponse {
            url: resolved,
            status: Some(status),
        }
    }

    fn resolve_url(&self, url: &str) -> String {
        if url.contains("://") {
            return url.to_string();
        }
        let origin = self
            .current
            .as_ref()
            .map(|p| origin_of(&p.url).to_string())
            .unwrap_or_default();
        if url.starts_with('/') {
            format!("{origin}{url}")
        } else {
            format!("{origin}/{url}")
        }
    }

    fn page_mut(&mut self) -> HarnessResult<&mut MockPage> {
        self.current
            .as_mut()
            .ok_or_else(|| HarnessError::driver("no page loaded"))
    }

    fn element_mut(&mut self, selector: &Selector, index: usize) -> HarnessResult<&mut MockElement> {
        let page = self.page_mut()?;
        page.elements
            .iter_mut()
            .filter(|e| e.matches(selector))
            .nth(index)
            .ok_or_else(|| HarnessError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    fn apply(&mut self, effect: ClickEffect) -> HarnessResult<()> {
        match effect {
            ClickEffect::Navigate(url) => {
                if let Some(page) = &self.current {
                    self.history.push(page.url.clone());
                }
                self.load(&url);
            }
            ClickEffect::Show(selector) => {
                self.page_mut()?
                    .for_each_with_selector(&selector, |e| e.visible = true);
            }
            ClickEffect::Hide(selector) => {
                self.page_mut()?
                    .for_each_with_selector(&selector, |e| e.visible = false);
            }
            ClickEffect::SetAttribute {
                selector,
                name,
                value,
            } => {
                self.page_mut()?.for_each_with_selector(&selector, |e| {
                    e.attributes.insert(name.clone(), value.clone());
                });
            }
            ClickEffect::RaiseError(message) => self.page_errors.push(message),
            ClickEffect::ToggleText(..) => {}
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> HarnessResult<NavigationResponse> {
        self.call_history.push(format!("navigate:{url}"));
        self.navigation_timeout = Some(timeout);
        if let Some(page) = &self.current {
            self.history.push(page.url.clone());
        }
        Ok(self.load(url))
    }

    async fn query(&mut self, selector: &Selector) -> HarnessResult<Vec<ElementSnapshot>> {
        let page = self.page_mut()?;
        let mut found = Vec::new();
        for element in &mut page.elements {
            if element.selector != selector.expression() {
                continue;
            }
            if element.absent_for_polls > 0 {
                element.absent_for_polls -= 1;
                continue;
            }
            if selector.text_passes(&element.text) {
                found.push(element.snapshot());
            }
        }
        Ok(found)
    }

    async fn click(&mut self, selector: &Selector, index: usize) -> HarnessResult<()> {
        self.call_history.push(format!("click:{selector}"));
        let element = self.element_mut(selector, index)?;
        let effects = element.on_click.clone();
        for effect in effects {
            if let ClickEffect::ToggleText(first, second) = &effect {
                let element = self.element_mut(selector, index)?;
                element.text = if element.text.trim() == first.trim() {
                    second.clone()
                } else {
                    first.clone()
                };
                continue;
            }
            self.apply(effect)?;
        }
        Ok(())
    }

    async fn type_text(&mut self, selector: &Selector, index: usize, text: &str) -> HarnessResult<()> {
        self.call_history.push(format!("type:{selector}:{text}"));
        let element = self.element_mut(selector, index)?;
        element
            .attributes
            .entry("value".to_string())
            .or_default()
            .push_str(text);
        Ok(())
    }

    async fn clear(&mut self, selector: &Selector, index: usize) -> HarnessResult<()> {
        self.call_history.push(format!("clear:{selector}"));
        let element = self.element_mut(selector, index)?;
        element.attributes.insert("value".to_string(), String::new());
        Ok(())
    }

    async fn check(&mut self, selector: &Selector, index: usize) -> HarnessResult<()> {
        self.call_history.push(format!("check:{selector}"));
        self.element_mut(selector, index)?.checked = true;
        Ok(())
    }

    async fn set_style(&mut self, selector: &Selector, index: usize, style: &str) -> HarnessResult<()> {
        self.call_history.push(format!("style:{selector}:{style}"));
        let element = self.element_mut(selector, index)?;
        element.visible = !style.replace(' ', "").contains("display:none");
        element.attributes.insert("style".to_string(), style.to_string());
        Ok(())
    }

    async fn current_url(&mut self) -> HarnessResult<String> {
        Ok(self.page_mut()?.url.clone())
    }

    async fn go_back(&mut self) -> HarnessResult<()> {
        self.call_history.push("go_back".to_string());
        match self.history.pop() {
            Some(url) => {
                self.load(&url);
                Ok(())
            }
            None => Err(HarnessError::driver("no history entry to go back to")),
        }
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> HarnessResult<()> {
        self.call_history.push(format!("viewport:{viewport}"));
        self.viewport = Some(viewport);
        Ok(())
    }

    async fn hide_elements(&mut self, ids: &[String]) -> HarnessResult<usize> {
        let Some(page) = self.current.as_mut() else {
            return Ok(0);
        };
        let mut hidden = 0;
        for id in ids {
            let selector = format!("#{id}");
            let mut found = false;
            page.for_each_with_selector(&selector, |e| {
                e.visible = false;
                found = true;
            });
            if found {
                hidden += 1;
            }
        }
        Ok(hidden)
    }

    async fn take_page_errors(&mut self) -> HarnessResult<Vec<String>> {
        Ok(std::mem::take(&mut self.page_errors))
    }

    async fn close(&mut self) -> HarnessResult<()> {
        self.call_history.push("close".to_string());
        self.current = None;
        Ok(())
    }
}

fn origin_of(url: &str) -> &str {
    let Some(scheme_end) = url.find("://") else {
        return "";
    };
    let host_start = scheme_end + 3;
    url[host_start..]
        .find('/')
        .map_or(url, |idx| &url[..host_start + idx])
}

fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> MockPage {
        MockPage::new("https://encer.store/")
            .element(MockElement::new("h2", "Reclaim Your Energy with Encer Treatment").tag("h2"))
            .element(
                MockElement::new("a", "Blog")
                    .tag("a")
                    .attr("href", "/blog/")
                    .on_click(ClickEffect::Navigate("/blog/".into())),
            )
            .element(MockElement::new("a", "Privacy Policy").tag("a"))
            .element(
                MockElement::new("#btn-view-all-content", "VIEW ALL")
                    .on_click(ClickEffect::ToggleText("VIEW ALL".into(), "Hide".into())),
            )
    }

    mod navigation_tests {
        use super::*;
        use crate::locator::Locator;

        #[tokio::test]
        async fn test_navigate_known_page() {
            let mut driver = MockDriver::new().with_page(home());
            let response = driver
                .navigate("https://encer.store", Duration::from_secs(1))
                .await
                .unwrap();
            assert_eq!(response.status, Some(200));
            assert_eq!(driver.current_url().await.unwrap(), "https://encer.store");
            assert_eq!(driver.navigation_timeout, Some(Duration::from_secs(1)));
        }

        #[tokio::test]
        async fn test_unknown_page_is_404() {
            let mut driver = MockDriver::new();
            let response = driver
                .navigate("https://encer.store/missing/", Duration::from_secs(1))
                .await
                .unwrap();
            assert_eq!(response.status, Some(404));
            assert!(response.is_error_status());
        }

        #[tokio::test]
        async fn test_click_navigates_relative_and_back() {
            let mut driver = MockDriver::new()
                .with_page(home())
                .with_page(MockPage::new("https://encer.store/blog/"));
            driver
                .navigate("https://encer.store/", Duration::from_secs(1))
                .await
                .unwrap();
            let blog = Locator::new("a").with_text("Blog");
            driver.click(blog.selector(), 0).await.unwrap();
            assert_eq!(
                driver.current_url().await.unwrap(),
                "https://encer.store/blog/"
            );
            driver.go_back().await.unwrap();
            assert_eq!(driver.current_url().await.unwrap(), "https://encer.store/");
        }

        #[tokio::test]
        async fn test_go_back_without_history_fails() {
            let mut driver = MockDriver::new().with_page(home());
            driver
                .navigate("https://encer.store/", Duration::from_secs(1))
                .await
                .unwrap();
            assert!(driver.go_back().await.is_err());
        }

        #[test]
        fn test_origin_of() {
            assert_eq!(origin_of("https://encer.store/about/"), "https://encer.store");
            assert_eq!(origin_of("https://encer.store"), "https://encer.store");
            assert_eq!(origin_of("/about/"), "");
        }
    }

    mod element_tests {
        use super::*;

        async fn loaded() -> MockDriver {
            let mut driver = MockDriver::new().with_page(
                home()
                    .element(MockElement::new("#username", "").tag("input"))
                    .element(MockElement::new("#late", "ready").appears_after(2)),
            );
            driver
                .navigate("https://encer.store/", Duration::from_secs(1))
                .await
                .unwrap();
            driver
        }

        #[tokio::test]
        async fn test_query_matches_selector_and_text() {
            let mut driver = loaded().await;
            let all_links = driver.query(&Selector::css("a")).await.unwrap();
            assert_eq!(all_links.len(), 2);
            let filtered = driver
                .query(&Selector::CssWithText {
                    css: "a".into(),
                    text: "privacy".into(),
                    ignore_case: true,
                })
                .await
                .unwrap();
            assert_eq!(filtered.len(), 1);
            assert_eq!(filtered[0].text, "Privacy Policy");
        }

        #[tokio::test]
        async fn test_element_appears_after_polls() {
            let mut driver = loaded().await;
            let late = Selector::css("#late");
            assert!(driver.query(&late).await.unwrap().is_empty());
            assert!(driver.query(&late).await.unwrap().is_empty());
            assert_eq!(driver.query(&late).await.unwrap().len(), 1);
        }

        #[tokio::test]
        async fn test_toggle_text_effect() {
            let mut driver = loaded().await;
            let toggle = Selector::css("#btn-view-all-content");
            driver.click(&toggle, 0).await.unwrap();
            assert_eq!(driver.query(&toggle).await.unwrap()[0].text, "Hide");
            driver.click(&toggle, 0).await.unwrap();
            assert_eq!(driver.query(&toggle).await.unwrap()[0].text, "VIEW ALL");
        }

        #[tokio::test]
        async fn test_type_and_clear() {
            let mut driver = loaded().await;
            let username = Selector::css("#username");
            driver.type_text(&username, 0, "qa@").await.unwrap();
            driver.type_text(&username, 0, "example.com").await.unwrap();
            assert_eq!(driver.value_of("#username"), Some("qa@example.com"));
            driver.clear(&username, 0).await.unwrap();
            assert_eq!(driver.value_of("#username"), Some(""));
        }

        #[tokio::test]
        async fn test_click_missing_index_is_not_found() {
            let mut driver = loaded().await;
            let result = driver.click(&Selector::css("a"), 5).await;
            assert!(matches!(result, Err(HarnessError::ElementNotFound { .. })));
        }

        #[tokio::test]
        async fn test_detached_element_is_not_found() {
            let mut driver = loaded().await;
            let username = Selector::css("#username");
            assert_eq!(driver.query(&username).await.unwrap().len(), 1);
            driver
                .navigate("https://encer.store/about/", Duration::from_secs(1))
                .await
                .unwrap();
            let typed = driver.type_text(&username, 0, "qa@example.com").await;
            assert!(matches!(
                typed,
                Err(HarnessError::ElementNotFound { ref selector }) if selector.contains("#username")
            ));
            assert!(matches!(
                driver.check(&username, 0).await,
                Err(HarnessError::ElementNotFound { .. })
            ));
        }

        #[tokio::test]
        async fn test_set_style_controls_visibility() {
            let mut driver = MockDriver::new().with_page(
                MockPage::new("https://encer.store/")
                    .element(MockElement::new("#forminator-module-14845", "").hidden()),
            );
            driver
                .navigate("https://encer.store/", Duration::from_secs(1))
                .await
                .unwrap();
            let form = Selector::css("#forminator-module-14845");
            driver.set_style(&form, 0, "display: block;").await.unwrap();
            assert!(driver.query(&form).await.unwrap()[0].visible);
            driver.set_style(&form, 0, "display: none").await.unwrap();
            assert!(!driver.query(&form).await.unwrap()[0].visible);
        }

        #[tokio::test]
        async fn test_hide_elements_counts_found_ids() {
            let mut driver = MockDriver::new().with_page(
                MockPage::new("https://encer.store/")
                    .element(MockElement::new("#zsiq_maintitle", "Chat with us")),
            );
            driver
                .navigate("https://encer.store/", Duration::from_secs(1))
                .await
                .unwrap();
            let hidden = driver
                .hide_elements(&["zsiq_maintitle".to_string(), "titlediv".to_string()])
                .await
                .unwrap();
            assert_eq!(hidden, 1);
            let chat = driver.query(&Selector::css("#zsiq_maintitle")).await.unwrap();
            assert!(!chat[0].visible);
        }
    }

    mod error_tests {
        use super::*;

        #[tokio::test]
        async fn test_load_errors_are_drained_once() {
            let mut driver = MockDriver::new().with_page(
                MockPage::new("https://encer.store/").load_error("Cannot read properties of null"),
            );
            driver
                .navigate("https://encer.store/", Duration::from_secs(1))
                .await
                .unwrap();
            assert_eq!(driver.take_page_errors().await.unwrap().len(), 1);
            assert!(driver.take_page_errors().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_query_without_page_is_driver_error() {
            let mut driver = MockDriver::new();
            let result = driver.query(&Selector::css("h1")).await;
            assert!(matches!(result, Err(HarnessError::Driver { .. })));
        }

        #[tokio::test]
        async fn test_visits_start_fresh() {
            let mut driver = MockDriver::new().with_page(home());
            driver
                .navigate("https://encer.store/", Duration::from_secs(1))
                .await
                .unwrap();
            let toggle = Selector::css("#btn-view-all-content");
            driver.click(&toggle, 0).await.unwrap();
            driver
                .navigate("https://encer.store/", Duration::from_secs(1))
                .await
                .unwrap();
            assert_eq!(driver.query(&toggle).await.unwrap()[0].text, "VIEW ALL");
        }
    }
}
