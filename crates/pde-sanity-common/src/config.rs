//! ---
//! pds_section: "01-core-functionality"
//! pds_subsection: "module"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Harness configuration loading and validation."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
use std::collections::HashSet;
use std::fmt::Display;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dimensions::{Domain, Flux, SolverMethod, SweepStrategy};
use crate::logging::LogFormat;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "sanity.toml";

/// Largest supported number of decimals for elapsed-time output.
pub const MAX_PRECISION: usize = 9;

fn default_marker() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

fn default_executable() -> PathBuf {
    PathBuf::from("out/PDEapprox")
}

fn default_write_defaults_flag() -> String {
    "-w".to_owned()
}

fn default_config_flag() -> String {
    "-c".to_owned()
}

fn default_conditions_flag() -> String {
    "-s".to_owned()
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("simulations")
}

fn default_precision() -> usize {
    3
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

/// Primary configuration object for a sanity sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub guard: GuardConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where a [`HarnessConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedHarnessConfig {
    pub config: HarnessConfig,
    /// `None` when no file was found and built-in defaults apply.
    pub source: Option<PathBuf>,
}

impl HarnessConfig {
    pub const ENV_CONFIG_PATH: &'static str = "PDE_SANITY_CONFIG";

    /// Load configuration together with the effective source path.
    ///
    /// The environment override and every candidate are tried in order. A
    /// candidate that does not exist is skipped; an explicit environment path
    /// that does not exist is an error. Defaults apply when nothing matched.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedHarnessConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedHarnessConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedHarnessConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!("no configuration file found, using defaults");
        Ok(LoadedHarnessConfig {
            config: Self::default(),
            source: None,
        })
    }

    /// Read and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<HarnessConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.guard.validate()?;
        self.solver.validate()?;
        self.sweep.validate()?;
        self.report.validate()?;
        Ok(())
    }
}

impl std::str::FromStr for HarnessConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: HarnessConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// File that must exist in the working directory.
    #[serde(default = "default_marker")]
    pub marker: PathBuf,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
        }
    }
}

impl GuardConfig {
    pub fn validate(&self) -> Result<()> {
        if self.marker.as_os_str().is_empty() {
            return Err(anyhow!("guard.marker cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Solver executable, relative to the working directory.
    #[serde(default = "default_executable")]
    pub executable: PathBuf,
    #[serde(default = "default_write_defaults_flag")]
    pub write_defaults_flag: String,
    #[serde(default = "default_config_flag")]
    pub config_flag: String,
    #[serde(default = "default_conditions_flag")]
    pub conditions_flag: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            write_defaults_flag: default_write_defaults_flag(),
            config_flag: default_config_flag(),
            conditions_flag: default_conditions_flag(),
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.executable.as_os_str().is_empty() {
            return Err(anyhow!("solver.executable cannot be empty"));
        }
        for (name, flag) in [
            ("write_defaults_flag", &self.write_defaults_flag),
            ("config_flag", &self.config_flag),
            ("conditions_flag", &self.conditions_flag),
        ] {
            if flag.trim().is_empty() {
                return Err(anyhow!("solver.{} cannot be empty", name));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(default)]
    pub strategy: SweepStrategy,
    /// Directory holding the generated config and condition files.
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
    #[serde(default = "Domain::all")]
    pub domains: Vec<Domain>,
    #[serde(default = "Flux::all")]
    pub fluxes: Vec<Flux>,
    #[serde(default = "SolverMethod::all")]
    pub methods: Vec<SolverMethod>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            strategy: SweepStrategy::default(),
            artifact_dir: default_artifact_dir(),
            domains: Domain::all(),
            fluxes: Flux::all(),
            methods: SolverMethod::all(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        validate_axis("sweep.domains", &self.domains)?;
        validate_axis("sweep.fluxes", &self.fluxes)?;
        validate_axis("sweep.methods", &self.methods)?;
        Ok(())
    }
}

fn validate_axis<T: Copy + Eq + Hash + Display>(name: &str, values: &[T]) -> Result<()> {
    if values.is_empty() {
        return Err(anyhow!("{} must list at least one value", name));
    }
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(*value) {
            return Err(anyhow!("{} lists '{}' more than once", name, value));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Print the elapsed wall-clock time after every run.
    #[serde(default)]
    pub timed: bool,
    /// Decimal places used for elapsed seconds.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timed: false,
            precision: default_precision(),
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(anyhow!(
                "report.precision must be at most {} (got {})",
                MAX_PRECISION,
                self.precision
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    /// Enables a daily rolling JSON log file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            directory: None,
            file_prefix: None,
        }
    }
}
