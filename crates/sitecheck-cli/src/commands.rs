//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sitecheck: run declarative storefront scenarios against a live browser
#[derive(Parser, Debug)]
#[command(name = "sitecheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (failures only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run scenarios against the storefront
    Run(RunArgs),

    /// List registered scenarios
    List(ListArgs),

    /// Show the effective harness configuration
    Config(ConfigArgs),
}

/// Where scenarios come from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Load scenarios from a YAML file instead of the built-in storefront set
    #[arg(short, long, value_name = "FILE")]
    pub scenarios: Option<PathBuf>,

    /// Storefront base URL for the built-in set
    #[arg(long, env = "SITECHECK_BASE_URL", default_value = sitecheck::catalog::DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Account used by the login scenario
    #[arg(long, env = "SITECHECK_LOGIN_USER")]
    pub login_user: Option<String>,

    /// Password used by the login scenario
    #[arg(long, env = "SITECHECK_LOGIN_PASSWORD", hide_env_values = true)]
    pub login_password: Option<String>,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct RunArgs {
    /// Only run scenarios whose name or tags contain this pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Harness config file (YAML)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Scenario source
    #[command(flatten)]
    pub source: SourceArgs,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Disable the chromium sandbox (containers/CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Path to the chromium binary
    #[arg(long, env = "SITECHECK_CHROMIUM")]
    pub chromium_path: Option<String>,

    /// Per-command timeout in milliseconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Fail navigation on HTTP error status codes
    #[arg(long)]
    pub fail_on_status_code: bool,

    /// Stop after the first failing scenario
    #[arg(long)]
    pub fail_fast: bool,

    /// Tolerate every uncaught page error
    #[arg(long)]
    pub ignore_all_errors: bool,

    /// Extra page-error substring to tolerate (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub ignore_error: Vec<String>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: FormatArg,

    /// Write the JSON report to a file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Only list scenarios whose name or tags contain this pattern
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Scenario source
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the selected scenarios as YAML
    #[arg(long)]
    pub yaml: bool,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Harness config file (YAML) to merge over the defaults
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write a default config file to this path
    #[arg(long, value_name = "FILE")]
    pub init: Option<PathBuf>,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable progress and summary
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

/// Color argument for CLI
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
