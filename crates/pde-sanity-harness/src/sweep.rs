//! ---
//! pds_section: "11-sweep"
//! pds_subsection: "01-harness"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Sweep driver: guard, generation, fail-fast run loop."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
use std::io::{Stdout, Write};
use std::path::Path;
use std::time::Duration;

use pde_sanity_common::time::{monotonic_now, timed};
use pde_sanity_common::HarnessConfig;
use pde_sanity_logging::{
    log_sweep_event, sweep_debug, sweep_info, SweepContext, SweepEventOutcome,
};

use crate::error::{HarnessError, Result};
use crate::grid::{GridPoint, SweepGrid};
use crate::preflight::PreflightGuard;
use crate::reporter::Reporter;
use crate::solver::{ProcessSolver, Solver};

/// Lifecycle of one harness invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    Init,
    GuardChecked,
    ArtifactsGenerated,
    Running { completed: usize },
    Done,
    Aborted,
}

impl HarnessState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, HarnessState::Done | HarnessState::Aborted)
    }
}

/// Outcome of one successful grid point. Handed to the reporter and dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRecord {
    /// One-based position in the sweep.
    pub index: usize,
    pub point: GridPoint,
    pub elapsed: Duration,
}

/// Totals for a sweep that reached [`HarnessState::Done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub runs: usize,
    /// Generation call plus one call per run.
    pub solver_invocations: usize,
    pub elapsed: Duration,
}

/// Drives one sanity sweep against a [`Solver`].
pub struct SweepHarness<S, W: Write> {
    guard: PreflightGuard,
    grid: SweepGrid,
    solver: S,
    reporter: Reporter<W>,
    state: HarnessState,
}

impl SweepHarness<ProcessSolver, Stdout> {
    /// Harness wired to the real solver executable and stdout.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(
            PreflightGuard::from_config(config),
            SweepGrid::from_config(&config.sweep),
            ProcessSolver::from_config(&config.solver),
            Reporter::stdout(&config.report),
        )
    }
}

impl<S: Solver, W: Write> SweepHarness<S, W> {
    pub fn new(guard: PreflightGuard, grid: SweepGrid, solver: S, reporter: Reporter<W>) -> Self {
        Self {
            guard,
            grid,
            solver,
            reporter,
            state: HarnessState::Init,
        }
    }

    pub fn state(&self) -> HarnessState {
        self.state
    }

    pub fn into_parts(self) -> (S, Reporter<W>) {
        (self.solver, self.reporter)
    }

    /// Check the working directory before anything else touches it.
    ///
    /// A failure is printed through the reporter and aborts the harness.
    pub fn preflight(&mut self, working_dir: &Path) -> Result<()> {
        let result = check_guard(&self.guard, &mut self.reporter, working_dir);
        match &result {
            Ok(()) => transition(&mut self.state, HarnessState::GuardChecked),
            Err(err) => self.abort(err),
        }
        result
    }

    /// Run the whole sweep from `working_dir`.
    ///
    /// The guard runs first unless [`SweepHarness::preflight`] already
    /// passed. Stops at the first failure; no grid point after a failed one
    /// is attempted.
    pub fn run(&mut self, working_dir: &Path) -> Result<SweepSummary> {
        if self.state != HarnessState::GuardChecked {
            self.preflight(working_dir)?;
        }
        let result = self.drive();
        match &result {
            Ok(summary) => {
                transition(&mut self.state, HarnessState::Done);
                log_sweep_event(
                    None,
                    "sweep.done",
                    &format!(
                        "{} runs, {} solver invocations",
                        summary.runs, summary.solver_invocations
                    ),
                    SweepEventOutcome::Success,
                );
            }
            Err(err) => self.abort(err),
        }
        result
    }

    fn abort(&mut self, err: &HarnessError) {
        transition(&mut self.state, HarnessState::Aborted);
        log_sweep_event(
            None,
            "sweep.aborted",
            &err.to_string(),
            SweepEventOutcome::Fault,
        );
    }

    fn drive(&mut self) -> Result<SweepSummary> {
        let Self {
            grid,
            solver,
            reporter,
            state,
            ..
        } = self;

        let started = monotonic_now();
        solver
            .generate_defaults()
            .map_err(|source| HarnessError::Generation { source })?;
        transition(state, HarnessState::ArtifactsGenerated);

        let total = grid.len();
        let mut runs = 0;
        for (offset, point) in grid.points().enumerate() {
            let record = execute_point(solver, reporter, offset + 1, total, point)?;
            runs = record.index;
            transition(state, HarnessState::Running { completed: runs });
        }

        let summary = SweepSummary {
            runs,
            solver_invocations: runs + 1,
            elapsed: started.elapsed(),
        };
        reporter.sweep_finished(&summary)?;
        Ok(summary)
    }
}

fn check_guard<W: Write>(
    guard: &PreflightGuard,
    reporter: &mut Reporter<W>,
    working_dir: &Path,
) -> Result<()> {
    if let Err(err) = guard.check(working_dir) {
        reporter.preflight_failed(&err)?;
        return Err(err.into());
    }
    Ok(())
}

/// Report, invoke and time a single grid point.
fn execute_point<S: Solver, W: Write>(
    solver: &mut S,
    reporter: &mut Reporter<W>,
    index: usize,
    total: usize,
    point: GridPoint,
) -> Result<RunRecord> {
    let ctx = SweepContext::new()
        .with_domain(point.domain)
        .with_flux(point.flux)
        .with_method(point.method)
        .with_run(index);

    reporter.run_started(&point)?;
    let (outcome, elapsed) = timed(|| solver.run(&point.config, &point.conditions));
    if let Err(source) = outcome {
        log_sweep_event(
            Some(&ctx),
            "sweep.run",
            &format!("run {}/{} failed: {}", index, total, source),
            SweepEventOutcome::Fault,
        );
        return Err(HarnessError::Run {
            index,
            point,
            source,
        });
    }

    sweep_info!(
        context = ctx,
        "run {}/{} finished in {:.3}s",
        index,
        total,
        elapsed.as_secs_f64()
    );
    let record = RunRecord {
        index,
        point,
        elapsed,
    };
    reporter.run_finished(&record)?;
    Ok(record)
}

fn transition(state: &mut HarnessState, next: HarnessState) {
    sweep_debug!("harness state {:?} -> {:?}", state, next);
    *state = next;
}
