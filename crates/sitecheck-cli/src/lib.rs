//! Sitecheck CLI library
//!
//! Argument parsing, configuration merging and progress output for the
//! `sitecheck` binary. The binary itself is a thin dispatcher over these
//! pieces.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)] // Error types are self-documenting

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, ConfigArgs, FormatArg, ListArgs, RunArgs, SourceArgs};
pub use config::{
    apply_run_overrides, error_filter, load_harness_config, CliConfig, ColorChoice, Verbosity,
};
pub use error::{CliError, CliResult};
pub use output::{format_outcome, summary_line, ProgressReporter};
pub use runner::{check_report, load_registry, select, write_report, SuiteRunner};
