//! ---
//! pds_section: "11-sweep"
//! pds_subsection: "01-harness"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Working directory and solver presence checks."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};

use pde_sanity_common::HarnessConfig;
use tracing::debug;

use crate::error::PreflightError;

/// Checks that must pass before the solver is invoked at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightGuard {
    marker: PathBuf,
    executable: PathBuf,
}

impl PreflightGuard {
    pub fn new(marker: impl Into<PathBuf>, executable: impl Into<PathBuf>) -> Self {
        Self {
            marker: marker.into(),
            executable: executable.into(),
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(&config.guard.marker, &config.solver.executable)
    }

    /// Verify `working_dir` holds the marker file and the solver executable.
    /// The marker is checked first.
    pub fn check(&self, working_dir: &Path) -> Result<(), PreflightError> {
        let marker = working_dir.join(&self.marker);
        if !marker.is_file() {
            return Err(PreflightError::MarkerMissing {
                marker: self.marker.clone(),
            });
        }
        let executable = working_dir.join(&self.executable);
        if !executable.is_file() {
            return Err(PreflightError::SolverMissing {
                executable: self.executable.clone(),
            });
        }
        debug!(
            working_dir = %working_dir.display(),
            executable = %executable.display(),
            "preflight checks passed"
        );
        Ok(())
    }
}
