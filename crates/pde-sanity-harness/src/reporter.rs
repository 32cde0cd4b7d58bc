//! ---
//! pds_section: "11-sweep"
//! pds_subsection: "01-harness"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Progress and timing output for sweep runs."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
//! Every unit written by the [`Reporter`] is flushed before the solver is
//! invoked again; the solver writes to the same stdout.

use std::io::{self, Stdout, Write};

use pde_sanity_common::time::format_seconds;
use pde_sanity_common::ReportConfig;

use crate::error::PreflightError;
use crate::grid::GridPoint;
use crate::sweep::{RunRecord, SweepSummary};

#[derive(Debug)]
pub struct Reporter<W: Write> {
    out: W,
    timed: bool,
    precision: usize,
}

impl Reporter<Stdout> {
    pub fn stdout(config: &ReportConfig) -> Self {
        Self::new(io::stdout(), config)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, config: &ReportConfig) -> Self {
        Self {
            out,
            timed: config.timed,
            precision: config.precision,
        }
    }

    /// Progress line printed before the solver is invoked for `point`.
    pub fn run_started(&mut self, point: &GridPoint) -> io::Result<()> {
        writeln!(self.out, "Running test: {}", point)?;
        self.out.flush()
    }

    /// Elapsed time in timed mode, a blank separator line otherwise.
    pub fn run_finished(&mut self, record: &RunRecord) -> io::Result<()> {
        if self.timed {
            writeln!(
                self.out,
                "Elapsed: {}s",
                format_seconds(record.elapsed, self.precision)
            )?;
        } else {
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    pub fn sweep_finished(&mut self, summary: &SweepSummary) -> io::Result<()> {
        if self.timed {
            writeln!(
                self.out,
                "Completed {} runs in {}s",
                summary.runs,
                format_seconds(summary.elapsed, self.precision)
            )?;
            self.out.flush()?;
        }
        Ok(())
    }

    pub fn preflight_failed(&mut self, error: &PreflightError) -> io::Result<()> {
        writeln!(self.out, "{}", error)?;
        self.out.flush()
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
