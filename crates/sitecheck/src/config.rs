//! Harness configuration.
//!
//! A single [`HarnessConfig`] is built once (defaults, then an optional YAML
//! file, then CLI overrides) and handed to the runner. It is read-only for
//! the lifetime of a run.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::result::{HarnessError, HarnessResult};

/// Default page-load timeout (120 seconds)
pub const DEFAULT_PAGE_LOAD_TIMEOUT_MS: u64 = 120_000;

/// Default per-command timeout used when a locator has none (10 seconds)
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 10_000;

/// Default response timeout (30 seconds)
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 30_000;

/// Default polling interval for locator resolution (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Timeouts a driver session is opened with
///
/// `request` bounds each protocol round trip; `navigation` bounds a whole
/// page load. They come from separate settings and are never interchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    /// Per-request response timeout
    pub request: Duration,
    /// Page-load timeout
    pub navigation: Duration,
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Desktop layout used by the storefront checks
    pub const DESKTOP: Self = Self::new(1280, 800);

    /// Wider desktop layout used by the logged-out CTA checks
    pub const WIDE_DESKTOP: Self = Self::new(1440, 900);
}

impl Default for Viewport {
    fn default() -> Self {
        Self::DESKTOP
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Process-wide harness configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Page-load timeout in milliseconds
    pub page_load_timeout_ms: u64,
    /// Default per-command timeout in milliseconds
    pub command_timeout_ms: u64,
    /// Response timeout in milliseconds
    pub response_timeout_ms: u64,
    /// Polling interval for locator resolution in milliseconds
    pub poll_interval_ms: u64,
    /// Viewport applied before each scenario
    pub viewport: Viewport,
    /// Fail navigation on HTTP error status codes
    pub fail_on_status_code: bool,
    /// Run the browser headless
    pub headless: bool,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Disable the chromium sandbox (containers/CI)
    pub no_sandbox: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            page_load_timeout_ms: DEFAULT_PAGE_LOAD_TIMEOUT_MS,
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            response_timeout_ms: DEFAULT_RESPONSE_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            viewport: Viewport::DESKTOP,
            fail_on_status_code: false,
            headless: true,
            chromium_path: None,
            no_sandbox: false,
        }
    }
}

impl HarnessConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from YAML; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> HarnessResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> HarnessResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> HarnessResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Set page-load timeout
    #[must_use]
    pub const fn with_page_load_timeout(mut self, ms: u64) -> Self {
        self.page_load_timeout_ms = ms;
        self
    }

    /// Set default command timeout
    #[must_use]
    pub const fn with_command_timeout(mut self, ms: u64) -> Self {
        self.command_timeout_ms = ms;
        self
    }

    /// Set response timeout
    #[must_use]
    pub const fn with_response_timeout(mut self, ms: u64) -> Self {
        self.response_timeout_ms = ms;
        self
    }

    /// Set polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    /// Fail navigation on HTTP error status codes
    #[must_use]
    pub const fn with_fail_on_status_code(mut self, fail: bool) -> Self {
        self.fail_on_status_code = fail;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.no_sandbox = true;
        self
    }

    /// Page-load timeout as Duration
    #[must_use]
    pub const fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }

    /// Command timeout as Duration
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Response timeout as Duration
    #[must_use]
    pub const fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }

    /// Timeouts for opening a driver session and navigating in it
    #[must_use]
    pub const fn session_timeouts(&self) -> SessionTimeouts {
        SessionTimeouts {
            request: self.response_timeout(),
            navigation: self.page_load_timeout(),
        }
    }

    /// Poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check the configuration for values the runner cannot work with
    pub fn validate(&self) -> HarnessResult<()> {
        if self.page_load_timeout_ms == 0
            || self.command_timeout_ms == 0
            || self.response_timeout_ms == 0
        {
            return Err(HarnessError::Config {
                message: "timeouts must be greater than zero".to_string(),
            });
        }
        if self.poll_interval_ms == 0 || self.poll_interval_ms > self.command_timeout_ms {
            return Err(HarnessError::Config {
                message: format!(
                    "poll interval {}ms must be within 1..={}ms",
                    self.poll_interval_ms, self.command_timeout_ms
                ),
            });
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(HarnessError::Config {
                message: format!("invalid viewport {}", self.viewport),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod defaults_tests {
        use super::*;

        #[test]
        fn test_default_timeouts() {
            let config = HarnessConfig::default();
            assert_eq!(config.page_load_timeout(), Duration::from_secs(120));
            assert_eq!(config.command_timeout(), Duration::from_secs(10));
            assert_eq!(config.response_timeout(), Duration::from_secs(30));
            assert_eq!(config.poll_interval(), Duration::from_millis(50));
        }

        #[test]
        fn test_session_timeouts_keep_response_and_page_load_apart() {
            let timeouts = HarnessConfig::new()
                .with_page_load_timeout(90_000)
                .with_response_timeout(15_000)
                .session_timeouts();
            assert_eq!(timeouts.request, Duration::from_secs(15));
            assert_eq!(timeouts.navigation, Duration::from_secs(90));
        }

        #[test]
        fn test_default_viewport_is_desktop() {
            let config = HarnessConfig::default();
            assert_eq!(config.viewport, Viewport::new(1280, 800));
            assert_eq!(config.viewport.to_string(), "1280x800");
        }

        #[test]
        fn test_tolerates_status_codes_by_default() {
            assert!(!HarnessConfig::default().fail_on_status_code);
        }

        #[test]
        fn test_default_validates() {
            assert!(HarnessConfig::default().validate().is_ok());
        }
    }

    mod builder_tests {
        use super::*;

        #[test]
        fn test_builder_chain() {
            let config = HarnessConfig::new()
                .with_command_timeout(2_000)
                .with_poll_interval(10)
                .with_viewport(1440, 900)
                .with_headless(false)
                .with_no_sandbox()
                .with_chromium_path("/usr/bin/chromium");

            assert_eq!(config.command_timeout_ms, 2_000);
            assert_eq!(config.poll_interval_ms, 10);
            assert_eq!(config.viewport, Viewport::WIDE_DESKTOP);
            assert!(!config.headless);
            assert!(config.no_sandbox);
            assert_eq!(config.chromium_path.as_deref(), Some("/usr/bin/chromium"));
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_zero_timeout_rejected() {
            let config = HarnessConfig::new().with_command_timeout(0);
            assert!(matches!(
                config.validate(),
                Err(HarnessError::Config { .. })
            ));
        }

        #[test]
        fn test_poll_longer_than_timeout_rejected() {
            let config = HarnessConfig::new()
                .with_command_timeout(100)
                .with_poll_interval(500);
            assert!(config.validate().is_err());
        }

        #[test]
        fn test_zero_viewport_rejected() {
            let config = HarnessConfig::new().with_viewport(0, 800);
            assert!(config.validate().is_err());
        }
    }

    mod yaml_tests {
        use super::*;

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let config = HarnessConfig::from_yaml_str(
                "command_timeout_ms: 4000\nviewport:\n  width: 1440\n  height: 900\n",
            )
            .unwrap();
            assert_eq!(config.command_timeout_ms, 4_000);
            assert_eq!(config.viewport, Viewport::WIDE_DESKTOP);
            assert_eq!(config.page_load_timeout_ms, DEFAULT_PAGE_LOAD_TIMEOUT_MS);
        }

        #[test]
        fn test_invalid_yaml_values_rejected() {
            let result = HarnessConfig::from_yaml_str("poll_interval_ms: 0\n");
            assert!(matches!(result, Err(HarnessError::Config { .. })));
        }

        #[test]
        fn test_yaml_file_round_trip() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("sitecheck.yaml");
            let config = HarnessConfig::new().with_fail_on_status_code(true);
            std::fs::write(&path, config.to_yaml().unwrap()).unwrap();

            let loaded = HarnessConfig::from_yaml_file(&path).unwrap();
            assert_eq!(loaded, config);
        }
    }
}
