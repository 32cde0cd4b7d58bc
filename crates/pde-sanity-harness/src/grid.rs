//! ---
//! pds_section: "11-sweep"
//! pds_subsection: "01-harness"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Grid enumeration and artifact path derivation."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
//! The sweep grid is the Cartesian product of three ordered axes. Points are
//! produced lazily, domain outermost and solver method innermost, and each one
//! carries the artifact paths the solver will be pointed at.

use std::fmt;
use std::iter::FusedIterator;
use std::path::PathBuf;

use pde_sanity_common::config::SweepConfig;
use pde_sanity_common::{Domain, Flux, SolverMethod, SweepStrategy};
use serde::Serialize;

/// One (domain, flux, method) combination and its resolved artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridPoint {
    pub domain: Domain,
    pub flux: Flux,
    pub method: SolverMethod,
    pub config: PathBuf,
    pub conditions: PathBuf,
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Domain={}, Flux={}, Solver={}",
            self.domain, self.flux, self.method
        )
    }
}

/// Naming scheme for generated artifacts below a single directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    root: PathBuf,
}

impl PathTemplate {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `<root>/<domain>_<flux>_<method>_config.json`
    pub fn config_path(&self, domain: Domain, flux: Flux, method: SolverMethod) -> PathBuf {
        self.root
            .join(format!("{}_{}_{}_config.json", domain, flux, method))
    }

    /// `<root>/<domain>_conds.json` for flat sweeps,
    /// `<root>/<flux>_<domain>_conds.json` for paired ones.
    pub fn conditions_path(&self, strategy: SweepStrategy, domain: Domain, flux: Flux) -> PathBuf {
        match strategy {
            SweepStrategy::Flat => self.root.join(format!("{}_conds.json", domain)),
            SweepStrategy::Paired => self.root.join(format!("{}_{}_conds.json", flux, domain)),
        }
    }
}

/// The ordered axes of one sweep plus the naming used for its artifacts.
#[derive(Debug, Clone)]
pub struct SweepGrid {
    strategy: SweepStrategy,
    template: PathTemplate,
    domains: Vec<Domain>,
    fluxes: Vec<Flux>,
    methods: Vec<SolverMethod>,
}

impl SweepGrid {
    pub fn new(
        strategy: SweepStrategy,
        template: PathTemplate,
        domains: Vec<Domain>,
        fluxes: Vec<Flux>,
        methods: Vec<SolverMethod>,
    ) -> Self {
        Self {
            strategy,
            template,
            domains,
            fluxes,
            methods,
        }
    }

    /// Full default grid: every value of every axis in declaration order.
    pub fn full(strategy: SweepStrategy, template: PathTemplate) -> Self {
        Self::new(
            strategy,
            template,
            Domain::all(),
            Flux::all(),
            SolverMethod::all(),
        )
    }

    pub fn from_config(config: &SweepConfig) -> Self {
        Self::new(
            config.strategy,
            PathTemplate::new(&config.artifact_dir),
            config.domains.clone(),
            config.fluxes.clone(),
            config.methods.clone(),
        )
    }

    /// Number of grid points, `|domains| × |fluxes| × |methods|`.
    pub fn len(&self) -> usize {
        self.domains.len() * self.fluxes.len() * self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a single combination into a grid point.
    pub fn point(&self, domain: Domain, flux: Flux, method: SolverMethod) -> GridPoint {
        GridPoint {
            domain,
            flux,
            method,
            config: self.template.config_path(domain, flux, method),
            conditions: self.template.conditions_path(self.strategy, domain, flux),
        }
    }

    /// Lazily walk every combination in nesting order.
    pub fn points(&self) -> GridPoints<'_> {
        GridPoints {
            grid: self,
            next: 0,
            len: self.len(),
        }
    }
}

impl<'a> IntoIterator for &'a SweepGrid {
    type Item = GridPoint;
    type IntoIter = GridPoints<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.points()
    }
}

/// Iterator over a [`SweepGrid`].
///
/// Position `n` decodes as a mixed-radix number: the method index is the
/// fastest digit, then the flux, then the domain. For the paired strategy the
/// upper two digits form the (domain, flux) pair index.
#[derive(Debug, Clone)]
pub struct GridPoints<'a> {
    grid: &'a SweepGrid,
    next: usize,
    len: usize,
}

impl Iterator for GridPoints<'_> {
    type Item = GridPoint;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len {
            return None;
        }
        let grid = self.grid;
        let methods = grid.methods.len();
        let fluxes = grid.fluxes.len();
        let pair = self.next / methods;
        let method = grid.methods[self.next % methods];
        let flux = grid.fluxes[pair % fluxes];
        let domain = grid.domains[pair / fluxes];
        self.next += 1;
        Some(grid.point(domain, flux, method))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridPoints<'_> {}

impl FusedIterator for GridPoints<'_> {}
