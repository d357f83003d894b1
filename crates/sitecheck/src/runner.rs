//! Scenario runner.
//!
//! Executes scenarios one at a time against a [`PageDriver`]. Each scenario
//! gets the viewport applied, a fresh navigation to its URL, and then its
//! steps in order. The first failing step ends the scenario; the next one
//! starts from a clean navigation regardless.

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::assertion::TextMatch;
use crate::config::HarnessConfig;
use crate::driver::{ElementSnapshot, PageDriver};
use crate::filter::ErrorFilter;
use crate::form::extract_site_key;
use crate::locator::Locator;
use crate::report::{Note, Outcome, StepFailure, SuiteReport};
use crate::result::{HarnessError, HarnessResult};
use crate::scenario::{Scenario, ScenarioRegistry};
use crate::step::Step;
use crate::wait::{resolve, select, wait_for_location, Condition, Resolved, WaitOptions};

/// Style applied by [`Step::Reveal`]
const REVEAL_STYLE: &str = "display: block;";

/// Runs scenarios against a driver
pub struct ScenarioRunner<D: PageDriver> {
    driver: D,
    config: HarnessConfig,
    filter: ErrorFilter,
}

impl<D: PageDriver> std::fmt::Debug for ScenarioRunner<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioRunner")
            .field("config", &self.config)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// Per-scenario mutable state
struct RunState {
    filter: ErrorFilter,
    notes: Vec<Note>,
    step_index: usize,
}

impl RunState {
    fn note(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(step = self.step_index + 1, "{message}");
        self.notes.push(Note {
            step_index: self.step_index,
            message,
        });
    }
}

impl<D: PageDriver> ScenarioRunner<D> {
    /// Create a runner
    pub const fn new(driver: D, config: HarnessConfig, filter: ErrorFilter) -> Self {
        Self {
            driver,
            config,
            filter,
        }
    }

    /// The harness configuration
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// The driver
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// The driver, mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give back the driver
    pub fn into_driver(self) -> D {
        self.driver
    }

    fn wait_options(&self) -> WaitOptions {
        WaitOptions::from_config(&self.config)
    }

    /// Run one scenario
    pub async fn run(&mut self, scenario: &Scenario) -> Outcome {
        let start = Instant::now();
        let total = scenario.steps.len();
        let mut state = RunState {
            filter: if scenario.ignore_page_errors {
                ErrorFilter::ignore_all()
            } else {
                self.filter.clone()
            },
            notes: Vec::new(),
            step_index: 0,
        };

        info!(scenario = %scenario.name, url = %scenario.url, steps = total, "starting scenario");

        if let Err(error) = self.setup(scenario, &state).await {
            warn!(scenario = %scenario.name, %error, "setup failed");
            let failure = StepFailure::new(None, format!("navigate to {}", scenario.url), &error);
            return Outcome::failed(&scenario.name, 0, total, failure, state.notes, start.elapsed());
        }

        for (index, step) in scenario.steps.iter().enumerate() {
            state.step_index = index;
            if let Err((description, error)) = self.run_step(step, &mut state).await {
                warn!(scenario = %scenario.name, step = index + 1, %error, "step failed");
                let failure = StepFailure::new(Some(index), description, &error);
                return Outcome::failed(
                    &scenario.name,
                    index,
                    total,
                    failure,
                    state.notes,
                    start.elapsed(),
                );
            }
        }

        info!(scenario = %scenario.name, elapsed_ms = start.elapsed().as_millis(), "scenario passed");
        Outcome::passed(&scenario.name, total, state.notes, start.elapsed())
    }

    /// Run every scenario in the registry whose name or tags match `pattern`
    pub async fn run_all(
        &mut self,
        registry: &ScenarioRegistry,
        pattern: Option<&str>,
        fail_fast: bool,
    ) -> SuiteReport {
        let selected: Vec<&Scenario> = match pattern {
            Some(p) => registry.filter(p).collect(),
            None => registry.iter().collect(),
        };
        self.run_suite(selected, fail_fast, |_, _| {}).await
    }

    /// Run scenarios in order, reporting each outcome to `on_outcome`
    pub async fn run_suite<'a, I, F>(
        &mut self,
        scenarios: I,
        fail_fast: bool,
        mut on_outcome: F,
    ) -> SuiteReport
    where
        I: IntoIterator<Item = &'a Scenario>,
        F: FnMut(&Scenario, &Outcome),
    {
        let start = Instant::now();
        let mut report = SuiteReport::start();
        let mut stopped = false;
        for scenario in scenarios {
            if stopped {
                report.skipped.push(scenario.name.clone());
                continue;
            }
            let outcome = self.run(scenario).await;
            on_outcome(scenario, &outcome);
            stopped = fail_fast && !outcome.is_passed();
            report.push(outcome);
        }
        report.finish(start.elapsed());
        info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped.len(),
            "suite finished"
        );
        report
    }

    async fn setup(&mut self, scenario: &Scenario, state: &RunState) -> HarnessResult<()> {
        let viewport = scenario.viewport.unwrap_or(self.config.viewport);
        self.driver.set_viewport(viewport).await?;
        let stale = self.driver.take_page_errors().await?;
        if !stale.is_empty() {
            debug!(count = stale.len(), "discarding page errors from previous scenario");
        }
        self.navigate(&scenario.url).await?;
        self.check_page_errors(&state.filter).await
    }

    async fn navigate(&mut self, url: &str) -> HarnessResult<()> {
        let response = self
            .driver
            .navigate(url, self.config.session_timeouts().navigation)
            .await
            .map_err(|e| match e {
                HarnessError::NavigationFailed { .. } => e,
                other => HarnessError::NavigationFailed {
                    url: url.to_string(),
                    message: other.to_string(),
                },
            })?;
        if response.is_error_status() {
            let status = response.status.unwrap_or_default();
            if self.config.fail_on_status_code {
                return Err(HarnessError::NavigationFailed {
                    url: url.to_string(),
                    message: format!("HTTP status {status}"),
                });
            }
            warn!(url, status, "page returned an error status; continuing");
        }
        debug!(url = %response.url, status = ?response.status, "navigated");
        Ok(())
    }

    async fn check_page_errors(&mut self, filter: &ErrorFilter) -> HarnessResult<()> {
        let errors = self.driver.take_page_errors().await?;
        if errors.is_empty() {
            return Ok(());
        }
        for message in errors.iter().filter(|e| filter.is_ignored(e)) {
            debug!(%message, "ignored page error");
        }
        filter.first_fatal(&errors).map_or(Ok(()), Err)
    }

    /// Run a top-level step, expanding composites; errors carry the
    /// description of the primitive that failed
    async fn run_step(&mut self, step: &Step, state: &mut RunState) -> Result<(), (String, HarnessError)> {
        debug!(step = state.step_index + 1, "{step}");
        match step.expand() {
            Some(primitives) => {
                for primitive in &primitives {
                    debug!(step = state.step_index + 1, "  {primitive}");
                    self.execute_checked(primitive, state)
                        .await
                        .map_err(|e| (format!("{step} › {primitive}"), e))?;
                }
                Ok(())
            }
            None => self
                .execute_checked(step, state)
                .await
                .map_err(|e| (step.to_string(), e)),
        }
    }

    /// Execute one primitive, then fail on any unfiltered page error.
    /// Driver errors from soft steps become notes.
    async fn execute_checked(&mut self, step: &Step, state: &mut RunState) -> HarnessResult<()> {
        if let Err(error) = self.execute(step, state).await {
            if !step.is_soft() {
                return Err(error);
            }
            state.note(format!("{step}: {error}"));
        }
        let filter = state.filter.clone();
        self.check_page_errors(&filter).await
    }

    async fn execute(&mut self, step: &Step, state: &mut RunState) -> HarnessResult<()> {
        let options = self.wait_options();
        match step {
            Step::Navigate { url } => self.navigate(url).await,
            Step::Locate { locator } => self.locate(locator, &Condition::Exists).await.map(drop),
            Step::AssertVisible { locator } => self.assert_condition(step, locator, Condition::Visible).await,
            Step::AssertText { locator, matcher } => {
                self.assert_condition(step, locator, Condition::TextMatches(matcher.clone()))
                    .await
            }
            Step::AssertAttribute {
                locator,
                name,
                matcher,
            } => {
                let condition = Condition::AttributeMatches {
                    name: name.clone(),
                    matcher: matcher.clone(),
                };
                self.assert_condition(step, locator, condition).await
            }
            Step::AssertLabel { locator, label } => {
                let condition = Condition::TextMatches(TextMatch::normalized(label.clone()));
                self.assert_condition(step, locator, condition).await
            }
            Step::AssertCount { locator, count } => {
                self.assert_condition(step, locator, Condition::Count(*count)).await
            }
            Step::AssertLocation {
                matcher,
                timeout_ms,
            } => {
                let timeout = timeout_ms.map_or(options.timeout, Duration::from_millis);
                match wait_for_location(&mut self.driver, matcher, timeout, options.poll_interval)
                    .await
                {
                    Ok(url) => {
                        debug!(%url, "location matched");
                        Ok(())
                    }
                    Err(HarnessError::TimeoutExceeded { selector, .. }) => Err(
                        HarnessError::assertion(step.to_string(), matcher.to_string(), selector),
                    ),
                    Err(e) => Err(e),
                }
            }
            Step::Click { locator } => {
                let resolved = self.locate(locator, &Condition::Exists).await?;
                self.driver.click(locator.selector(), resolved.index).await
            }
            Step::ClickIfVisible { locator } => self.click_if_visible(locator, state).await,
            Step::TypeText { locator, text } => {
                let resolved = self.locate(locator, &Condition::Exists).await?;
                self.driver
                    .type_text(locator.selector(), resolved.index, text)
                    .await
            }
            Step::Clear { locator } => {
                let resolved = self.locate(locator, &Condition::Exists).await?;
                self.driver.clear(locator.selector(), resolved.index).await
            }
            Step::Check { locator } => {
                let resolved = self.locate(locator, &Condition::Exists).await?;
                self.driver.check(locator.selector(), resolved.index).await?;
                self.assert_condition(step, locator, Condition::Checked).await
            }
            Step::Reveal { locator } => {
                let resolved = self.locate(locator, &Condition::Exists).await?;
                self.driver
                    .set_style(locator.selector(), resolved.index, REVEAL_STYLE)
                    .await
            }
            Step::GoBack => self.driver.go_back().await,
            Step::WaitFixed { ms } => {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
                Ok(())
            }
            Step::WaitForCondition { locator, condition } => {
                self.locate(locator, condition).await.map(drop)
            }
            Step::LogText { locator, label } => {
                match self.locate(locator, &Condition::Visible).await {
                    Ok(resolved) => state.note(format!("{label}: {}", resolved.text().trim())),
                    Err(error) => {
                        debug!(%error, "log target not visible");
                        state.note(format!("{label}: no visible element for {locator}"));
                    }
                }
                Ok(())
            }
            Step::DetectCaptcha { locator } => self.detect_captcha(locator, state).await,
            Step::HideElements { ids } => {
                let hidden = self.driver.hide_elements(ids).await?;
                debug!(hidden, requested = ids.len(), "hid overlay elements");
                Ok(())
            }
            Step::Toggle(_) | Step::SubmitForm(_) => Err(HarnessError::Config {
                message: format!("composite step cannot be nested: {step}"),
            }),
        }
    }

    async fn locate(&mut self, locator: &Locator, condition: &Condition) -> HarnessResult<Resolved> {
        let options = self.wait_options();
        resolve(&mut self.driver, locator, condition, &options).await
    }

    /// Resolve for an assertion; a timeout on an element that exists is
    /// reported as an assertion failure with the observed value
    async fn assert_condition(&mut self, step: &Step, locator: &Locator, condition: Condition) -> HarnessResult<()> {
        match self.locate(locator, &condition).await {
            Ok(_) => Ok(()),
            Err(timeout @ HarnessError::TimeoutExceeded { .. }) => {
                let elements = self.driver.query(locator.selector()).await?;
                if matches!(condition, Condition::Count(_)) {
                    return Err(HarnessError::assertion(
                        step.to_string(),
                        condition.to_string(),
                        format!("{} match(es)", elements.len()),
                    ));
                }
                match select(locator, &condition, &elements) {
                    Ok(Some(index)) => Err(HarnessError::assertion(
                        step.to_string(),
                        condition.to_string(),
                        observed(&elements[index], &condition),
                    )),
                    Ok(None) => Err(timeout),
                    Err(ambiguous) => Err(ambiguous),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn click_if_visible(&mut self, locator: &Locator, state: &mut RunState) -> HarnessResult<()> {
        let elements = self.driver.query(locator.selector()).await?;
        let Some(index) = elements.iter().position(|e| e.visible) else {
            debug!(%locator, "not visible; skipping click");
            return Ok(());
        };
        self.driver.click(locator.selector(), index).await?;
        state.note(format!("dismissed {locator}"));
        Ok(())
    }

    async fn detect_captcha(&mut self, locator: &Locator, state: &mut RunState) -> HarnessResult<()> {
        let frames = self.driver.query(locator.selector()).await?;
        if frames.is_empty() {
            state.note("No reCAPTCHA iframe found, continuing without solving");
            return Ok(());
        }
        match self.locate(locator, &Condition::Visible).await {
            Ok(resolved) => {
                let key = resolved
                    .element
                    .as_ref()
                    .and_then(|frame| frame.attribute("src"))
                    .and_then(extract_site_key);
                match key {
                    Some(key) => state.note(format!("reCAPTCHA site key: {key}")),
                    None => state.note("reCAPTCHA frame found without a site key"),
                }
            }
            Err(error) => state.note(format!("reCAPTCHA frame present but not visible: {error}")),
        }
        Ok(())
    }
}

/// The observed value relevant to a failed condition
fn observed(element: &ElementSnapshot, condition: &Condition) -> String {
    match condition {
        Condition::Visible => "hidden".to_string(),
        Condition::Checked => "unchecked".to_string(),
        Condition::HasAttribute { name, .. } | Condition::AttributeMatches { name, .. } => element
            .attribute(name)
            .map_or_else(|| format!("no {name} attribute"), |v| format!("{name}={v:?}")),
        Condition::Exists
        | Condition::ContainsText(_)
        | Condition::TextMatches(_)
        | Condition::Count(_) => format!("{:?}", element.trimmed_text()),
    }
}
