//! ---
//! pds_section: "11-sweep"
//! pds_subsection: "integration-tests"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "End-to-end sweep scenarios against an in-process fake solver."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use pde_sanity_common::{Domain, Flux, ReportConfig, SolverMethod, SweepStrategy};
use pde_sanity_harness::{
    HarnessError, HarnessState, PathTemplate, PreflightGuard, Reporter, Solver, SolverError,
    SweepGrid, SweepHarness,
};
use tempfile::{tempdir, TempDir};

/// Fake solver that writes artifacts on generation and fails runs whose
/// artifacts are missing, like the real executable would.
struct ArtifactSolver {
    root: PathBuf,
    strategy: SweepStrategy,
    skip: Vec<PathBuf>,
    run_delay: Duration,
    invocations: Vec<String>,
}

impl ArtifactSolver {
    fn new(root: &Path, strategy: SweepStrategy) -> Self {
        Self {
            root: root.to_path_buf(),
            strategy,
            skip: Vec::new(),
            run_delay: Duration::ZERO,
            invocations: Vec::new(),
        }
    }

    fn skipping(mut self, relative: &str) -> Self {
        self.skip.push(PathBuf::from(relative));
        self
    }

    fn write(&self, relative: PathBuf) {
        if self.skip.contains(&relative) {
            return;
        }
        fs::write(self.root.join(relative), "{}").unwrap();
    }
}

impl Solver for ArtifactSolver {
    fn generate_defaults(&mut self) -> Result<(), SolverError> {
        self.invocations.push("-w".to_owned());
        fs::create_dir_all(self.root.join("simulations")).unwrap();
        let template = PathTemplate::new("simulations");
        for domain in Domain::all() {
            for flux in Flux::all() {
                self.write(template.conditions_path(self.strategy, domain, flux));
                for method in SolverMethod::all() {
                    self.write(template.config_path(domain, flux, method));
                }
            }
        }
        Ok(())
    }

    fn run(&mut self, config: &Path, conditions: &Path) -> Result<(), SolverError> {
        self.invocations.push(format!(
            "-c {} -s {}",
            config.display(),
            conditions.display()
        ));
        std::thread::sleep(self.run_delay);
        if self.root.join(config).is_file() && self.root.join(conditions).is_file() {
            Ok(())
        } else {
            Err(SolverError::Failed {
                code: Some(1),
                signal: None,
            })
        }
    }
}

fn project_dir() -> TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("sanity.toml"), "").unwrap();
    fs::create_dir_all(dir.path().join("out")).unwrap();
    fs::write(dir.path().join("out/PDEapprox"), "").unwrap();
    dir
}

fn harness(
    solver: ArtifactSolver,
    strategy: SweepStrategy,
    report: ReportConfig,
) -> SweepHarness<ArtifactSolver, Vec<u8>> {
    SweepHarness::new(
        PreflightGuard::new("sanity.toml", "out/PDEapprox"),
        SweepGrid::full(strategy, PathTemplate::new("simulations")),
        solver,
        Reporter::new(Vec::new(), &report),
    )
}

#[test]
fn full_sweep_makes_thirty_three_invocations() {
    let dir = project_dir();
    let solver = ArtifactSolver::new(dir.path(), SweepStrategy::Flat);
    let mut harness = harness(solver, SweepStrategy::Flat, ReportConfig::default());

    let summary = harness.run(dir.path()).expect("sweep succeeds");
    assert_eq!(summary.runs, 32);
    assert_eq!(summary.solver_invocations, 33);
    assert_eq!(harness.state(), HarnessState::Done);

    let (solver, reporter) = harness.into_parts();
    assert_eq!(solver.invocations.len(), 33);
    assert_eq!(solver.invocations[0], "-w");
    assert_eq!(
        solver.invocations[1],
        "-c simulations/real_cubic_lax_friedrichs_config.json -s simulations/real_conds.json"
    );
    assert_eq!(
        solver.invocations[32],
        "-c simulations/mixed_buckley_leverett_leapfrog_config.json -s simulations/mixed_conds.json"
    );

    let output = String::from_utf8(reporter.into_inner()).unwrap();
    let progress: Vec<&str> = output
        .lines()
        .filter(|line| line.starts_with("Running test:"))
        .collect();
    assert_eq!(progress.len(), 32);
    assert_eq!(
        progress[0],
        "Running test: Domain=real, Flux=cubic, Solver=lax_friedrichs"
    );
    assert_eq!(
        progress[31],
        "Running test: Domain=mixed, Flux=buckley_leverett, Solver=leapfrog"
    );
}

#[test]
fn missing_third_domain_conditions_stop_before_fourth_domain() {
    let dir = project_dir();
    let solver = ArtifactSolver::new(dir.path(), SweepStrategy::Flat)
        .skipping("simulations/affine_conds.json");
    let mut harness = harness(solver, SweepStrategy::Flat, ReportConfig::default());

    let err = harness.run(dir.path()).unwrap_err();
    match &err {
        HarnessError::Run { index, point, .. } => {
            assert_eq!(*index, 17);
            assert_eq!(point.domain, Domain::Affine);
            assert_eq!(point.flux, Flux::Cubic);
            assert_eq!(point.method, SolverMethod::LaxFriedrichs);
        }
        other => panic!("expected run failure, got {other:?}"),
    }
    assert_ne!(err.exit_code(), 0);
    assert_eq!(harness.state(), HarnessState::Aborted);

    let (solver, _) = harness.into_parts();
    // generation + 16 good runs + the failing one
    assert_eq!(solver.invocations.len(), 18);
    assert!(solver
        .invocations
        .iter()
        .all(|call| !call.contains("mixed")));
}

#[test]
fn paired_sweep_uses_flux_keyed_conditions() {
    let dir = project_dir();
    let solver = ArtifactSolver::new(dir.path(), SweepStrategy::Paired);
    let mut harness = harness(solver, SweepStrategy::Paired, ReportConfig::default());

    let summary = harness.run(dir.path()).expect("paired sweep succeeds");
    assert_eq!(summary.runs, 32);

    let (solver, _) = harness.into_parts();
    assert_eq!(
        solver.invocations[3],
        "-c simulations/real_burgers_lax_friedrichs_config.json -s simulations/burgers_real_conds.json"
    );
}

#[test]
fn paired_sweep_fails_when_flat_artifacts_were_generated() {
    let dir = project_dir();
    let solver = ArtifactSolver::new(dir.path(), SweepStrategy::Flat);
    let mut harness = harness(solver, SweepStrategy::Paired, ReportConfig::default());

    let err = harness.run(dir.path()).unwrap_err();
    assert!(matches!(err, HarnessError::Run { index: 1, .. }));
    let (solver, _) = harness.into_parts();
    assert_eq!(solver.invocations.len(), 2);
}

#[test]
fn timed_report_captures_each_run() {
    let dir = project_dir();
    let mut solver = ArtifactSolver::new(dir.path(), SweepStrategy::Flat);
    solver.run_delay = Duration::from_millis(2);
    let grid = SweepGrid::new(
        SweepStrategy::Flat,
        PathTemplate::new("simulations"),
        vec![Domain::Real],
        vec![Flux::Lwr],
        SolverMethod::all(),
    );
    let report = ReportConfig {
        timed: true,
        precision: 4,
    };
    let mut harness = SweepHarness::new(
        PreflightGuard::new("sanity.toml", "out/PDEapprox"),
        grid,
        solver,
        Reporter::new(Vec::new(), &report),
    );

    let summary = harness.run(dir.path()).expect("sweep succeeds");
    assert_eq!(summary.runs, 2);

    let (_, reporter) = harness.into_parts();
    let output = String::from_utf8(reporter.into_inner()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Running test: Domain=real, Flux=lwr, Solver=lax_friedrichs");
    assert_eq!(lines[2], "Running test: Domain=real, Flux=lwr, Solver=leapfrog");
    for elapsed_line in [lines[1], lines[3]] {
        let seconds: f64 = elapsed_line
            .strip_prefix("Elapsed: ")
            .and_then(|rest| rest.strip_suffix('s'))
            .expect("elapsed line format")
            .parse()
            .expect("elapsed seconds");
        assert!(seconds >= 0.002, "run elapsed {seconds} shorter than the solver delay");
        let decimals = elapsed_line.split('.').nth(1).unwrap().trim_end_matches('s');
        assert_eq!(decimals.len(), 4);
    }
    assert!(lines[4].starts_with("Completed 2 runs in "));
}

#[test]
fn missing_solver_is_reported_without_invocation() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("sanity.toml"), "").unwrap();
    let solver = ArtifactSolver::new(dir.path(), SweepStrategy::Flat);
    let mut harness = harness(solver, SweepStrategy::Flat, ReportConfig::default());

    let err = harness.run(dir.path()).unwrap_err();
    assert!(matches!(err, HarnessError::Preflight(_)));
    let (solver, reporter) = harness.into_parts();
    assert!(solver.invocations.is_empty());
    assert_eq!(
        String::from_utf8(reporter.into_inner()).unwrap(),
        "Error: The executable 'out/PDEapprox' was not found. Please build the project first.\n"
    );
}
