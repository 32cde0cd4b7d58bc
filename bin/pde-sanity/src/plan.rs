//! ---
//! pds_section: "05-external-interfaces"
//! pds_subsection: "binary"
//! pds_type: "source"
//! pds_scope: "code"
//! pds_description: "Dry-run listing of the sweep grid."
//! pds_version: "v0.1.0"
//! pds_owner: "tbd"
//! ---
use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use pde_sanity_common::HarnessConfig;
use pde_sanity_harness::{GridPoint, SweepGrid};

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// Emit the plan as a JSON array.
    #[arg(long)]
    pub json: bool,
}

/// Print every grid point in sweep order. Never touches the solver.
pub fn run(config: &HarnessConfig, args: PlanArgs) -> Result<()> {
    let grid = SweepGrid::from_config(&config.sweep);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_plan(&grid, args.json, &mut out)?;
    out.flush()?;
    Ok(())
}

fn write_plan<W: Write>(grid: &SweepGrid, json: bool, out: &mut W) -> Result<()> {
    if json {
        let points: Vec<GridPoint> = grid.points().collect();
        serde_json::to_writer_pretty(&mut *out, &points)?;
        writeln!(out)?;
        return Ok(());
    }
    for point in grid {
        writeln!(
            out,
            "{} {} {} {} {}",
            point.domain,
            point.flux,
            point.method,
            point.config.display(),
            point.conditions.display()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pde_sanity_common::{Domain, Flux, SolverMethod, SweepStrategy};
    use pde_sanity_harness::PathTemplate;

    fn grid(strategy: SweepStrategy) -> SweepGrid {
        SweepGrid::new(
            strategy,
            PathTemplate::new("simulations"),
            vec![Domain::Interval],
            vec![Flux::BuckleyLeverett],
            SolverMethod::all(),
        )
    }

    #[test]
    fn text_plan_lists_one_line_per_point() {
        let mut out = Vec::new();
        write_plan(&grid(SweepStrategy::Flat), false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "interval buckley_leverett lax_friedrichs \
             simulations/interval_buckley_leverett_lax_friedrichs_config.json \
             simulations/interval_conds.json\n\
             interval buckley_leverett leapfrog \
             simulations/interval_buckley_leverett_leapfrog_config.json \
             simulations/interval_conds.json\n"
        );
    }

    #[test]
    fn json_plan_is_an_array_of_points() {
        let mut out = Vec::new();
        write_plan(&grid(SweepStrategy::Paired), true, &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let points = value.as_array().expect("array");
        assert_eq!(points.len(), 2);
        assert_eq!(points[1]["method"], "leapfrog");
        assert_eq!(
            points[0]["conditions"],
            "simulations/buckley_leverett_interval_conds.json"
        );
    }
}
