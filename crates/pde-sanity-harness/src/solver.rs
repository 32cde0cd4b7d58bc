//! ---
//! pds_section: "11-sweep"
//! pds_subsection: "01-harness"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Solver collaborator seam and its process-backed implementation."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use pde_sanity_common::SolverConfig;
use tracing::debug;

use crate::error::SolverError;

/// The external solver as seen by the sweep.
///
/// Both calls block until the solver has finished.
pub trait Solver {
    /// Ask the solver to (re)write its default config and condition files.
    fn generate_defaults(&mut self) -> Result<(), SolverError>;

    /// Run one simulation from a config file and a conditions file.
    fn run(&mut self, config: &Path, conditions: &Path) -> Result<(), SolverError>;
}

impl<S: Solver + ?Sized> Solver for &mut S {
    fn generate_defaults(&mut self) -> Result<(), SolverError> {
        (**self).generate_defaults()
    }

    fn run(&mut self, config: &Path, conditions: &Path) -> Result<(), SolverError> {
        (**self).run(config, conditions)
    }
}

/// Spawns the solver executable once per call, inheriting stdio.
#[derive(Debug, Clone)]
pub struct ProcessSolver {
    executable: PathBuf,
    working_dir: Option<PathBuf>,
    write_defaults_flag: String,
    config_flag: String,
    conditions_flag: String,
}

impl ProcessSolver {
    pub fn from_config(config: &SolverConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            working_dir: None,
            write_defaults_flag: config.write_defaults_flag.clone(),
            config_flag: config.config_flag.clone(),
            conditions_flag: config.conditions_flag.clone(),
        }
    }

    /// Run the solver from `dir` instead of the current directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Path handed to the OS. Relative executables are anchored to the working
    /// directory so they are never looked up on `PATH`.
    fn program(&self) -> PathBuf {
        if self.executable.is_absolute() {
            return self.executable.clone();
        }
        match &self.working_dir {
            Some(dir) => dir.join(&self.executable),
            None => Path::new(".").join(&self.executable),
        }
    }

    fn invoke<I, A>(&self, args: I) -> Result<(), SolverError>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        let program = self.program();
        let mut command = Command::new(&program);
        command.args(args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        debug!(command = ?command, "invoking solver");
        let status = command.status().map_err(|source| SolverError::Spawn {
            executable: self.executable.clone(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(SolverError::from_status(status))
        }
    }
}

impl Solver for ProcessSolver {
    fn generate_defaults(&mut self) -> Result<(), SolverError> {
        self.invoke([self.write_defaults_flag.as_str()])
    }

    fn run(&mut self, config: &Path, conditions: &Path) -> Result<(), SolverError> {
        self.invoke([
            OsStr::new(&self.config_flag),
            config.as_os_str(),
            OsStr::new(&self.conditions_flag),
            conditions.as_os_str(),
        ])
    }
}
