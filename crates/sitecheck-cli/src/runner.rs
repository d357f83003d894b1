//! Scenario selection and suite execution

use std::path::Path;
use tracing::{debug, info};

use sitecheck::catalog::{self, Credentials};
use sitecheck::{ErrorFilter, HarnessConfig, PageDriver, Scenario, ScenarioRegistry, ScenarioRunner, SuiteReport};

use crate::commands::SourceArgs;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;

/// Build the registry named by the source flags
pub fn load_registry(source: &SourceArgs) -> CliResult<ScenarioRegistry> {
    if let Some(ref path) = source.scenarios {
        debug!(path = %path.display(), "loading scenario file");
        return Ok(ScenarioRegistry::from_yaml_file(path)?);
    }
    let mut credentials = Credentials::default();
    if let Some(ref user) = source.login_user {
        credentials.user = user.clone();
    }
    if let Some(ref password) = source.login_password {
        credentials.password = password.clone();
    }
    Ok(catalog::storefront_with_login(&source.base_url, &credentials)?)
}

/// Scenarios matching `pattern`, in registration order
pub fn select<'a>(registry: &'a ScenarioRegistry, pattern: Option<&str>) -> CliResult<Vec<&'a Scenario>> {
    let selected: Vec<&Scenario> = match pattern {
        Some(p) => registry.iter().filter(|s| s.matches_filter(p)).collect(),
        None => registry.iter().collect(),
    };
    if selected.is_empty() {
        return Err(CliError::invalid_argument(match pattern {
            Some(p) => format!("no scenarios match '{p}'"),
            None => "no scenarios registered".to_string(),
        }));
    }
    Ok(selected)
}

/// Runs a selection through one driver session
#[derive(Debug)]
pub struct SuiteRunner {
    config: HarnessConfig,
    filter: ErrorFilter,
    fail_fast: bool,
}

impl SuiteRunner {
    /// Create a suite runner
    #[must_use]
    pub const fn new(config: HarnessConfig, filter: ErrorFilter, fail_fast: bool) -> Self {
        Self {
            config,
            filter,
            fail_fast,
        }
    }

    /// Run `scenarios` on `driver`, then close it
    pub async fn run_with<D: PageDriver>(
        &self,
        driver: D,
        scenarios: &[&Scenario],
        reporter: &mut ProgressReporter,
    ) -> SuiteReport {
        let mut runner = ScenarioRunner::new(driver, self.config.clone(), self.filter.clone());
        reporter.start_progress(scenarios.len() as u64, "scenarios");
        let report = runner
            .run_suite(scenarios.iter().copied(), self.fail_fast, |_, outcome| {
                reporter.outcome(outcome);
            })
            .await;
        reporter.finish();
        if let Err(e) = runner.driver_mut().close().await {
            debug!(error = %e, "driver close failed");
        }
        report
    }

    /// Launch chromium and run `scenarios`
    #[cfg(feature = "browser")]
    pub async fn run(&self, scenarios: &[&Scenario], reporter: &mut ProgressReporter) -> CliResult<SuiteReport> {
        info!(
            scenarios = scenarios.len(),
            headless = self.config.headless,
            "launching chromium"
        );
        let driver = sitecheck::ChromiumDriver::launch(&self.config).await?;
        Ok(self.run_with(driver, scenarios, reporter).await)
    }

    /// Without the `browser` feature there is no driver to launch
    #[cfg(not(feature = "browser"))]
    pub async fn run(&self, _scenarios: &[&Scenario], _reporter: &mut ProgressReporter) -> CliResult<SuiteReport> {
        Err(CliError::config(
            "browser support not compiled in. Rebuild with --features browser",
        ))
    }
}

/// Write the JSON report to `path`
pub fn write_report(report: &SuiteReport, path: &Path) -> CliResult<()> {
    let json = report
        .to_json()
        .map_err(|e| CliError::report_generation(e.to_string()))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, json)?;
    info!(path = %path.display(), "report written");
    Ok(())
}

/// Map a finished suite to the command result
pub fn check_report(report: &SuiteReport) -> CliResult<()> {
    if report.all_passed() && report.skipped.is_empty() {
        return Ok(());
    }
    Err(CliError::scenario_failures(format!(
        "{} of {} scenarios failed, {} skipped",
        report.failed_count(),
        report.total() + report.skipped.len(),
        report.skipped.len()
    )))
}
