//! Sitecheck CLI: storefront scenario runner
//!
//! ## Usage
//!
//! ```bash
//! sitecheck run                          # Run the built-in storefront set
//! sitecheck run --filter footer          # Only footer link scenarios
//! sitecheck run --scenarios smoke.yaml   # Scenarios from a file
//! sitecheck list --yaml                  # Dump scenarios as YAML
//! sitecheck config --init sitecheck.yaml # Write a default config
//! ```

use clap::Parser;
use sitecheck::{ScenarioRegistry, SuiteReport};
use sitecheck_cli::{
    apply_run_overrides, check_report, error_filter, load_harness_config, load_registry, logging,
    select, write_report, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, ConfigArgs,
    FormatArg, ListArgs, ProgressReporter, RunArgs, SuiteRunner, Verbosity,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Build configuration from CLI args
    let config = build_config(&cli);
    logging::init(&config);

    match cli.command {
        Commands::Run(args) => run_scenarios(&config, &args),
        Commands::List(args) => run_list(&args),
        Commands::Config(args) => run_config(&args),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.clone().into();

    CliConfig::new()
        .with_verbosity(verbosity)
        .with_color(color)
        .with_log_json(cli.log_json)
}

fn run_scenarios(config: &CliConfig, args: &RunArgs) -> CliResult<()> {
    let harness = apply_run_overrides(load_harness_config(args.config.as_deref())?, args)?;
    let registry = load_registry(&args.source)?;
    let selected = select(&registry, args.filter.as_deref())?;
    let json = args.format == FormatArg::Json;

    let mut reporter = ProgressReporter::new(
        config.color.should_color(),
        config.verbosity.is_quiet() || json,
    )
    .with_notes(config.verbosity.is_verbose());

    let suite = SuiteRunner::new(harness, error_filter(args), args.fail_fast);
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::config(format!("Failed to create runtime: {e}")))?;
    let report: SuiteReport = rt.block_on(suite.run(&selected, &mut reporter))?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        reporter.summary(&report);
    }
    if let Some(ref path) = args.output {
        write_report(&report, path)?;
    }
    check_report(&report)
}

fn run_list(args: &ListArgs) -> CliResult<()> {
    let registry = load_registry(&args.source)?;
    let selected = select(&registry, args.filter.as_deref())?;

    if args.yaml {
        let mut subset = ScenarioRegistry::new();
        subset.register_all(selected.into_iter().cloned())?;
        print!("{}", subset.to_yaml()?);
        return Ok(());
    }

    for scenario in selected {
        let tags = if scenario.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", scenario.tags.join(", "))
        };
        println!(
            "{}{tags} ({} steps) {}",
            scenario.name,
            scenario.steps.len(),
            scenario.url
        );
    }
    Ok(())
}

fn run_config(args: &ConfigArgs) -> CliResult<()> {
    if let Some(ref path) = args.init {
        if path.exists() {
            return Err(CliError::invalid_argument(format!(
                "{} already exists",
                path.display()
            )));
        }
        std::fs::write(path, sitecheck::HarnessConfig::default().to_yaml()?)?;
        eprintln!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let harness = load_harness_config(args.config.as_deref())?;
    print!("{}", harness.to_yaml()?);
    Ok(())
}
