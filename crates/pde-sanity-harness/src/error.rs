//! ---
//! pds_section: "11-sweep"
//! pds_subsection: "01-harness"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Error taxonomy for the sweep harness."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::grid::GridPoint;

pub type Result<T> = std::result::Result<T, HarnessError>;

/// Environment problems detected before the solver is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreflightError {
    #[error("Error: This harness must be run from the directory containing '{}'.", .marker.display())]
    MarkerMissing { marker: PathBuf },
    #[error("Error: The executable '{}' was not found. Please build the project first.", .executable.display())]
    SolverMissing { executable: PathBuf },
}

/// A single solver invocation that did not succeed.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("unable to launch solver {}: {source}", .executable.display())]
    Spawn {
        executable: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("solver {}", describe_exit(.code, .signal))]
    Failed {
        code: Option<i32>,
        signal: Option<i32>,
    },
}

fn describe_exit(code: &Option<i32>, signal: &Option<i32>) -> String {
    match (*code, *signal) {
        (Some(code), _) => format!("exited with status {}", code),
        (None, Some(signal)) => format!("was terminated by signal {}", signal),
        (None, None) => "exited abnormally".to_owned(),
    }
}

impl SolverError {
    /// Build a failure from a non-successful exit status.
    pub fn from_status(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;
        SolverError::Failed {
            code: status.code(),
            signal,
        }
    }

    /// Process exit status the harness should terminate with.
    pub fn exit_code(&self) -> u8 {
        match self {
            SolverError::Failed {
                code: Some(code), ..
            } if (1..=255).contains(code) => *code as u8,
            SolverError::Failed {
                code: None,
                signal: Some(signal),
            } if (1..=127).contains(signal) => 128 + *signal as u8,
            _ => 1,
        }
    }
}

/// Every way a sweep can abort.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Preflight(#[from] PreflightError),
    #[error("writing default artifacts failed: {source}")]
    Generation {
        #[source]
        source: SolverError,
    },
    #[error("run {index} ({point}) failed: {source}")]
    Run {
        index: usize,
        point: GridPoint,
        #[source]
        source: SolverError,
    },
    #[error("unable to write progress report: {0}")]
    Report(#[from] io::Error),
}

impl HarnessError {
    /// Process exit status derived from the first failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            HarnessError::Generation { source } | HarnessError::Run { source, .. } => {
                source.exit_code()
            }
            HarnessError::Preflight(_) | HarnessError::Report(_) => 1,
        }
    }
}
