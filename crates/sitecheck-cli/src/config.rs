//! CLI configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use sitecheck::{ErrorFilter, HarnessConfig};

use crate::commands::RunArgs;
use crate::error::{CliError, CliResult};

/// CLI verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Verbosity {
    /// Quiet - failures only
    Quiet,
    /// Normal - default output
    #[default]
    Normal,
    /// Verbose - scenario notes and info logs
    Verbose,
    /// Debug - maximum output
    Debug,
}

impl Verbosity {
    /// Check if quiet mode
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet)
    }

    /// Check if verbose or higher
    #[must_use]
    pub const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose | Self::Debug)
    }

    /// Default tracing directive when `RUST_LOG` is unset
    #[must_use]
    pub const fn log_directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "sitecheck=info,sitecheck_cli=info",
            Self::Debug => "sitecheck=debug,sitecheck_cli=debug",
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    /// Always use colors
    Always,
    /// Use colors when output is a terminal
    #[default]
    Auto,
    /// Never use colors
    Never,
}

impl ColorChoice {
    /// Should use colors based on output detection
    #[must_use]
    pub fn should_color(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Verbosity level
    pub verbosity: Verbosity,
    /// Color output choice
    pub color: ColorChoice,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl CliConfig {
    /// Create new default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity
    #[must_use]
    pub const fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set color choice
    #[must_use]
    pub const fn with_color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Set JSON logging
    #[must_use]
    pub const fn with_log_json(mut self, log_json: bool) -> Self {
        self.log_json = log_json;
        self
    }
}

/// Load the harness config from `path`, or the defaults when absent
pub fn load_harness_config(path: Option<&Path>) -> CliResult<HarnessConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Ok(HarnessConfig::from_yaml_file(path)?)
        }
        None => Ok(HarnessConfig::default()),
    }
}

/// Apply `run` flags on top of a loaded config
pub fn apply_run_overrides(mut config: HarnessConfig, args: &RunArgs) -> CliResult<HarnessConfig> {
    if args.headed {
        config = config.with_headless(false);
    }
    if args.no_sandbox {
        config = config.with_no_sandbox();
    }
    if let Some(ref path) = args.chromium_path {
        config = config.with_chromium_path(path.clone());
    }
    if let Some(ms) = args.timeout {
        config = config.with_command_timeout(ms);
    }
    if args.fail_on_status_code {
        config = config.with_fail_on_status_code(true);
    }
    config.validate()?;
    Ok(config)
}

/// Error filter for a run
#[must_use]
pub fn error_filter(args: &RunArgs) -> ErrorFilter {
    if args.ignore_all_errors {
        return ErrorFilter::ignore_all();
    }
    args.ignore_error
        .iter()
        .fold(ErrorFilter::default(), |filter, pattern| filter.with_pattern(pattern.clone()))
}
