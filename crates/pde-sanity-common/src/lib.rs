//! ---
//! pds_section: "01-core-functionality"
//! pds_subsection: "module"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Shared primitives and utilities for the sweep harness."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
//! Core shared primitives for the pde-sanity workspace.
//! This crate exposes the sweep dimension types, configuration loading,
//! logging initialisation and timing helpers consumed across the workspace.

pub mod config;
pub mod dimensions;
pub mod logging;
pub mod time;

pub use config::{
    GuardConfig, HarnessConfig, LoadedHarnessConfig, LoggingConfig, ReportConfig, SolverConfig,
    SweepConfig,
};
pub use dimensions::{Domain, Flux, SolverMethod, SweepStrategy};
pub use logging::{init_tracing, LogFormat};
