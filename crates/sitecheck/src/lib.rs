//! Sitecheck: declarative page-assertion harness for storefront checks
//!
//! Scenarios are ordered lists of steps (navigate, locate, assert, act)
//! executed against a browser through the [`PageDriver`] seam. Locators are
//! re-resolved on every step with bounded polling, so the harness tolerates
//! pages that render late without ever caching element handles.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────┐   ┌──────────────┐
//! │ Scenario     │   │ ScenarioRunner │   │ PageDriver   │
//! │ Registry     │──►│ + wait::resolve│──►│ (CDP / mock) │
//! └──────────────┘   └────────────────┘   └──────────────┘
//!                            │
//!                            ▼
//!                       SuiteReport
//! ```
//!
//! # Example
//!
//! ```no_run
//! use sitecheck::{catalog, ErrorFilter, HarnessConfig, MockDriver, ScenarioRunner};
//!
//! # async fn demo() -> sitecheck::HarnessResult<()> {
//! let registry = catalog::storefront(catalog::DEFAULT_BASE_URL)?;
//! let mut runner = ScenarioRunner::new(MockDriver::new(), HarnessConfig::default(), ErrorFilter::default());
//! let report = runner.run_all(&registry, Some("footer"), false).await;
//! println!("{}/{} passed", report.passed_count(), report.total());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;
mod config;
mod driver;
mod filter;
mod form;
mod locator;
mod mock_driver;
mod report;
mod result;
mod runner;
mod scenario;
mod step;
mod toggle;

/// Storefront fixture tables and scenario builders
#[allow(clippy::missing_errors_doc, clippy::too_many_lines)]
pub mod catalog;

/// Polling resolution of locators against conditions
#[allow(clippy::missing_errors_doc)]
pub mod wait;

/// Chrome DevTools Protocol driver
#[cfg(feature = "browser")]
#[allow(clippy::missing_errors_doc)]
pub mod cdp;

pub use assertion::{url_path, url_tail, AssertionResult, LocationMatch, TextMatch};
#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;
pub use config::{
    HarnessConfig, SessionTimeouts, Viewport, DEFAULT_COMMAND_TIMEOUT_MS,
    DEFAULT_PAGE_LOAD_TIMEOUT_MS, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RESPONSE_TIMEOUT_MS,
};
pub use driver::{ElementSnapshot, NavigationResponse, PageDriver};
pub use filter::{ErrorFilter, DEFAULT_IGNORED_ERRORS};
pub use form::{
    extract_site_key, FieldKind, FormField, FormSubmission, RECAPTCHA_FRAME, RECAPTCHA_TIMEOUT_MS,
};
pub use locator::{Locator, MatchPolicy, Selector};
pub use mock_driver::{ClickEffect, MockDriver, MockElement, MockPage};
pub use report::{Note, Outcome, OutcomeStatus, StepFailure, SuiteReport};
pub use result::{HarnessError, HarnessResult};
pub use runner::ScenarioRunner;
pub use scenario::{Registered, Scenario, ScenarioFile, ScenarioRegistry};
pub use step::Step;
pub use toggle::{labels_match, normalize_label, ToggleCheck, ToggleState};
pub use wait::{resolve, wait_for_location, Condition, Resolved, WaitOptions};

/// Prelude for scenario authors
pub mod prelude {
    pub use super::{
        Condition, ErrorFilter, FormField, FormSubmission, HarnessConfig, HarnessError,
        HarnessResult, LocationMatch, Locator, PageDriver, Scenario, ScenarioRegistry,
        ScenarioRunner, Step, TextMatch, ToggleCheck, Viewport,
    };
}
