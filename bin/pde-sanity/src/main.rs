//! ---
//! pds_section: "05-external-interfaces"
//! pds_subsection: "binary"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Sweep CLI entrypoint."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use pde_sanity_common::config::DEFAULT_CONFIG_FILE;
use pde_sanity_common::logging::init_tracing;
use pde_sanity_common::{
    Domain, Flux, HarnessConfig, LoadedHarnessConfig, SolverMethod, SweepStrategy,
};
use pde_sanity_harness::{HarnessError, SweepHarness};
use tracing::{debug, info};

mod plan;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Run the PDE solver across every domain/flux/method combination",
    long_about = None
)]
struct Cli {
    /// Path to the harness configuration file.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: SweepOverrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Generate artifacts and run the sweep (default)")]
    Run,
    #[command(about = "List the grid points without invoking the solver")]
    Plan(plan::PlanArgs),
}

/// Command-line overrides applied on top of the configuration file.
#[derive(Debug, Default, Args)]
struct SweepOverrides {
    /// Grid walk and condition-file naming (flat or paired).
    #[arg(long, value_name = "STRATEGY", global = true)]
    strategy: Option<SweepStrategy>,

    /// Print the elapsed time after every run.
    #[arg(long, action = ArgAction::SetTrue, overrides_with = "no_timed", global = true)]
    timed: bool,

    /// Suppress elapsed times even when the configuration enables them.
    #[arg(long, action = ArgAction::SetTrue, overrides_with = "timed", global = true)]
    no_timed: bool,

    /// Solver executable, relative to the working directory.
    #[arg(long, value_name = "PATH", global = true)]
    solver: Option<PathBuf>,

    /// Directory holding the generated artifacts.
    #[arg(long, value_name = "DIR", global = true)]
    artifact_dir: Option<PathBuf>,

    /// Restrict the sweep to these domains (repeatable).
    #[arg(long = "domain", value_name = "DOMAIN", global = true)]
    domains: Vec<Domain>,

    /// Restrict the sweep to these fluxes (repeatable).
    #[arg(long = "flux", value_name = "FLUX", global = true)]
    fluxes: Vec<Flux>,

    /// Restrict the sweep to these solver methods (repeatable).
    #[arg(long = "method", value_name = "METHOD", global = true)]
    methods: Vec<SolverMethod>,
}

impl SweepOverrides {
    fn apply(self, config: &mut HarnessConfig) {
        if let Some(strategy) = self.strategy {
            config.sweep.strategy = strategy;
        }
        if self.timed {
            config.report.timed = true;
        }
        if self.no_timed {
            config.report.timed = false;
        }
        if let Some(solver) = self.solver {
            config.solver.executable = solver;
        }
        if let Some(dir) = self.artifact_dir {
            config.sweep.artifact_dir = dir;
        }
        if !self.domains.is_empty() {
            config.sweep.domains = self.domains;
        }
        if !self.fluxes.is_empty() {
            config.sweep.fluxes = self.fluxes;
        }
        if !self.methods.is_empty() {
            config.sweep.methods = self.methods;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<HarnessError>() {
            // The preflight message has already been printed on stdout.
            Some(HarnessError::Preflight(_)) => ExitCode::FAILURE,
            Some(harness_err) => {
                eprintln!("error: {}", harness_err);
                ExitCode::from(harness_err.exit_code())
            }
            None => {
                eprintln!("error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let LoadedHarnessConfig { mut config, source } = load_config(cli.config)?;
    cli.overrides.apply(&mut config);
    config
        .validate()
        .context("invalid command-line overrides")?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let working_dir =
                std::env::current_dir().context("unable to determine working directory")?;
            let mut harness = SweepHarness::from_config(&config);
            // Nothing, the log directory included, is created before the guard passes.
            harness.preflight(&working_dir)?;
            start_logging(&config, source.as_deref())?;
            let summary = harness.run(&working_dir)?;
            info!(
                runs = summary.runs,
                solver_invocations = summary.solver_invocations,
                elapsed_secs = summary.elapsed.as_secs_f64(),
                "sanity sweep passed"
            );
        }
        Commands::Plan(args) => {
            start_logging(&config, source.as_deref())?;
            plan::run(&config, args)?;
        }
    }
    Ok(())
}

fn start_logging(config: &HarnessConfig, source: Option<&Path>) -> Result<()> {
    init_tracing("pde-sanity", &config.logging)?;
    match source {
        Some(path) => debug!(config_path = %path.display(), "configuration loaded"),
        None => debug!("no configuration file found, using defaults"),
    }
    Ok(())
}

/// The environment override wins, then `--config`, then `sanity.toml`.
fn load_config(explicit: Option<PathBuf>) -> Result<LoadedHarnessConfig> {
    let env_override = std::env::var(HarnessConfig::ENV_CONFIG_PATH)
        .map(|value| !value.trim().is_empty())
        .unwrap_or(false);
    match explicit {
        Some(path) if !env_override => Ok(LoadedHarnessConfig {
            config: HarnessConfig::from_path(&path)?,
            source: Some(path),
        }),
        _ => HarnessConfig::load_with_source(&[DEFAULT_CONFIG_FILE]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn zero_arguments_mean_run_with_defaults() {
        let cli = Cli::try_parse_from(["pde-sanity"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        let mut config = HarnessConfig::default();
        cli.overrides.apply(&mut config);
        assert_eq!(config.sweep.strategy, SweepStrategy::Flat);
        assert!(!config.report.timed);
        assert_eq!(config.sweep.domains, Domain::all());
    }

    #[test]
    fn overrides_replace_configured_values() {
        let cli = Cli::try_parse_from([
            "pde-sanity",
            "--strategy",
            "paired",
            "--timed",
            "--domain",
            "mixed",
            "--domain",
            "real",
            "--method",
            "leapfrog",
            "--solver",
            "build/solver",
        ])
        .unwrap();
        let mut config = HarnessConfig::default();
        cli.overrides.apply(&mut config);
        assert_eq!(config.sweep.strategy, SweepStrategy::Paired);
        assert!(config.report.timed);
        assert_eq!(config.sweep.domains, vec![Domain::Mixed, Domain::Real]);
        assert_eq!(config.sweep.fluxes, Flux::all());
        assert_eq!(config.sweep.methods, vec![SolverMethod::Leapfrog]);
        assert_eq!(config.solver.executable, PathBuf::from("build/solver"));
    }

    #[test]
    fn no_timed_overrides_configured_timing() {
        let mut config = HarnessConfig::default();
        config.report.timed = true;
        let cli = Cli::try_parse_from(["pde-sanity", "--no-timed"]).unwrap();
        cli.overrides.apply(&mut config);
        assert!(!config.report.timed);
    }

    #[test]
    fn last_timing_flag_wins() {
        let cli = Cli::try_parse_from(["pde-sanity", "--timed", "--no-timed"]).unwrap();
        assert!(!cli.overrides.timed);
        assert!(cli.overrides.no_timed);

        let cli = Cli::try_parse_from(["pde-sanity", "--no-timed", "--timed"]).unwrap();
        assert!(cli.overrides.timed);
        assert!(!cli.overrides.no_timed);
    }

    #[test]
    fn unknown_dimension_is_rejected_by_parser() {
        assert!(Cli::try_parse_from(["pde-sanity", "--flux", "euler"]).is_err());
    }

    #[test]
    fn overrides_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["pde-sanity", "plan", "--json", "--flux", "lwr"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Plan(_))));
        assert_eq!(cli.overrides.fluxes, vec![Flux::Lwr]);
    }
}
