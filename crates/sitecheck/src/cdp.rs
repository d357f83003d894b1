//! Chrome DevTools Protocol driver (feature `browser`).
//!
//! Drives a real chromium through chromiumoxide. Element access is done by
//! evaluating the selector's query expression in the page and addressing the
//! result by index, so every call sees the live DOM.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::input::InsertTextParams;
use chromiumoxide::cdp::js_protocol::runtime::EventExceptionThrown;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{HarnessConfig, Viewport};
use crate::driver::{ElementSnapshot, NavigationResponse, PageDriver};
use crate::locator::Selector;
use crate::result::{HarnessError, HarnessResult};

/// Snapshot of one element, evaluated in the page
const SNAPSHOT_FN: &str = "el => { \
    const s = window.getComputedStyle(el); \
    const r = el.getBoundingClientRect(); \
    return { \
        tag: el.tagName.toLowerCase(), \
        text: el.textContent || '', \
        visible: s.display !== 'none' && s.visibility !== 'hidden' && s.opacity !== '0' && (r.width > 0 || r.height > 0), \
        attributes: Object.fromEntries(Array.from(el.attributes).map(a => [a.name, a.value])), \
        checked: !!el.checked \
    }; \
}";

/// Real browser session
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    listener: JoinHandle<()>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl std::fmt::Debug for ChromiumDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumDriver").finish_non_exhaustive()
    }
}

fn cdp_error(e: impl std::fmt::Display) -> HarnessError {
    HarnessError::driver(e.to_string())
}

impl ChromiumDriver {
    /// Launch chromium and open a blank page
    pub async fn launch(config: &HarnessConfig) -> HarnessResult<Self> {
        let timeouts = config.session_timeouts();
        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport.width, config.viewport.height)
            .request_timeout(timeouts.request);
        if !config.headless {
            builder = builder.with_head();
        }
        if config.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder.build().map_err(cdp_error)?;

        let (browser, mut handler) = Browser::launch(cdp_config).await.map_err(cdp_error)?;
        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(cdp_error)?;
        let errors = Arc::new(Mutex::new(Vec::new()));
        let mut exceptions = page
            .event_listener::<EventExceptionThrown>()
            .await
            .map_err(cdp_error)?;
        let sink = Arc::clone(&errors);
        let listener = tokio::spawn(async move {
            while let Some(event) = exceptions.next().await {
                let details = &event.exception_details;
                let message = details
                    .exception
                    .as_ref()
                    .and_then(|e| e.description.clone())
                    .unwrap_or_else(|| details.text.clone());
                sink.lock().await.push(message);
            }
        });

        debug!(headless = config.headless, viewport = %config.viewport, "chromium launched");
        Ok(Self {
            browser,
            page,
            handler,
            listener,
            errors,
        })
    }

    async fn eval<T: DeserializeOwned>(&self, expr: String) -> HarnessResult<T> {
        self.page
            .evaluate(expr)
            .await
            .map_err(cdp_error)?
            .into_value()
            .map_err(cdp_error)
    }

    /// Run `body` against the indexed element; `body` sees it as `el`
    async fn with_element(&self, selector: &Selector, index: usize, body: &str) -> HarnessResult<()> {
        let expr = format!(
            "(() => {{ const el = ({})[{index}]; if (!el) {{ return false; }} {body}; return true; }})()",
            selector.to_query_all()
        );
        if self.eval::<bool>(expr).await? {
            Ok(())
        } else {
            Err(HarnessError::ElementNotFound {
                selector: selector.to_string(),
            })
        }
    }
}

#[async_trait]
impl PageDriver for ChromiumDriver {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> HarnessResult<NavigationResponse> {
        tokio::time::timeout(timeout, self.page.goto(url))
            .await
            .map_err(|_| HarnessError::NavigationFailed {
                url: url.to_string(),
                message: format!("page load exceeded {}ms", timeout.as_millis()),
            })?
            .map_err(|e| HarnessError::NavigationFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        let status: Option<u16> = self
            .eval(
                "(() => { const n = performance.getEntriesByType('navigation')[0]; \
                 return n && n.responseStatus ? n.responseStatus : null; })()"
                    .to_string(),
            )
            .await?;
        let current = self.current_url().await?;
        Ok(NavigationResponse {
            url: current,
            status,
        })
    }

    async fn query(&mut self, selector: &Selector) -> HarnessResult<Vec<ElementSnapshot>> {
        let expr = format!("({}).map({SNAPSHOT_FN})", selector.to_query_all());
        self.eval(expr).await
    }

    async fn click(&mut self, selector: &Selector, index: usize) -> HarnessResult<()> {
        self.with_element(
            selector,
            index,
            "el.scrollIntoView({ block: 'center' }); el.click()",
        )
        .await
    }

    async fn type_text(&mut self, selector: &Selector, index: usize, text: &str) -> HarnessResult<()> {
        self.with_element(selector, index, "el.scrollIntoView({ block: 'center' }); el.focus()")
            .await?;
        self.page
            .execute(InsertTextParams::new(text))
            .await
            .map_err(cdp_error)?;
        Ok(())
    }

    async fn clear(&mut self, selector: &Selector, index: usize) -> HarnessResult<()> {
        self.with_element(
            selector,
            index,
            "el.value = ''; el.dispatchEvent(new Event('input', { bubbles: true }))",
        )
        .await
    }

    async fn check(&mut self, selector: &Selector, index: usize) -> HarnessResult<()> {
        self.with_element(selector, index, "if (!el.checked) { el.click(); }")
            .await
    }

    async fn set_style(&mut self, selector: &Selector, index: usize, style: &str) -> HarnessResult<()> {
        self.with_element(selector, index, &format!("el.setAttribute('style', {style:?})"))
            .await
    }

    async fn current_url(&mut self) -> HarnessResult<String> {
        self.page
            .url()
            .await
            .map_err(cdp_error)?
            .ok_or_else(|| HarnessError::driver("page has no URL"))
    }

    async fn go_back(&mut self) -> HarnessResult<()> {
        self.eval::<bool>("(() => { history.back(); return true; })()".to_string())
            .await?;
        if let Err(e) = self.page.wait_for_navigation().await {
            warn!(error = %e, "no navigation after history.back()");
        }
        Ok(())
    }

    async fn set_viewport(&mut self, viewport: Viewport) -> HarnessResult<()> {
        let params = SetDeviceMetricsOverrideParams::new(
            i64::from(viewport.width),
            i64::from(viewport.height),
            1.0,
            false,
        );
        self.page.execute(params).await.map_err(cdp_error)?;
        Ok(())
    }

    async fn hide_elements(&mut self, ids: &[String]) -> HarnessResult<usize> {
        let ids = serde_json::to_string(ids)?;
        let expr = format!(
            "({ids}).filter(id => {{ const el = document.getElementById(id); \
             if (el) {{ el.style.display = 'none'; return true; }} return false; }}).length"
        );
        self.eval(expr).await
    }

    async fn take_page_errors(&mut self) -> HarnessResult<Vec<String>> {
        Ok(std::mem::take(&mut *self.errors.lock().await))
    }

    async fn close(&mut self) -> HarnessResult<()> {
        self.listener.abort();
        let result = self.browser.close().await.map_err(cdp_error);
        self.handler.abort();
        result.map(drop)
    }
}
