//! ---
//! pds_section: "11-sweep"
//! pds_subsection: "01-harness"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Sanity sweep harness orchestration and shared exports."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
//! The sweep harness drives an external PDE solver across the full
//! domain × flux × method grid: preflight checks, one "write defaults" call,
//! then one blocking run per grid point, aborting on the first failure.

pub mod error;
pub mod grid;
pub mod preflight;
pub mod reporter;
pub mod solver;
pub mod sweep;

pub use error::{HarnessError, PreflightError, SolverError};
pub use grid::{GridPoint, GridPoints, PathTemplate, SweepGrid};
pub use preflight::PreflightGuard;
pub use reporter::Reporter;
pub use solver::{ProcessSolver, Solver};
pub use sweep::{HarnessState, RunRecord, SweepHarness, SweepSummary};
