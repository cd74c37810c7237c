use crate::algorithms::common::Algorithm;
use crate::controller::{RunController, RunObserver};
use crate::grid::{Grid, Position};
use crate::report::RunReport;
use anyhow::{Context, Result};
use pathfinding::prelude::astar;

/// Hop count of the shortest Start-to-End route ignoring weights, computed
/// with A* from the `pathfinding` crate. `None` when End is unreachable.
pub fn optimal_hops(grid: &Grid) -> Option<usize> {
    let goal = grid.end();
    astar(
        &grid.start(),
        |p: &Position| {
            grid.neighbors(p)
                .into_iter()
                .filter(|n| grid.is_walkable(*n))
                .map(|n| (n, 1usize))
                .collect::<Vec<_>>()
        },
        |p| p.manhattan(&goal),
        |p| *p == goal,
    )
    .map(|(_, cost)| cost)
}

/// Runs every algorithm on its own copy of `grid`.
pub fn run_all_algorithms(
    controller: &RunController,
    grid: &Grid,
    mut observer_for: impl FnMut(Algorithm) -> Box<dyn RunObserver>,
) -> Result<Vec<RunReport>> {
    let mut reports = Vec::with_capacity(Algorithm::ALL.len());
    for (i, algorithm) in Algorithm::ALL.into_iter().enumerate() {
        log::info!("running algorithm {} of {}: {}", i + 1, Algorithm::ALL.len(), algorithm);
        let mut run_grid = grid.clone();
        let mut observer = observer_for(algorithm);
        let report = controller
            .run(&mut run_grid, algorithm, observer.as_mut())
            .with_context(|| format!("{} could not start: a run is already active", algorithm))?;
        reports.push(report);
    }
    Ok(reports)
}

/// Comparison table of a set of runs.
pub fn comparison_table(reports: &[RunReport], optimal: Option<usize>) -> String {
    let mut out = String::new();
    out.push_str("=== ALGORITHM COMPARISON RESULTS ===\n");
    match optimal {
        Some(hops) => out.push_str(&format!("Optimal hop count (A*): {}\n", hops)),
        None => out.push_str("Optimal hop count (A*): unreachable\n"),
    }
    out.push_str(&format!(
        "{:<16} {:<10} {:<9} {:<8} {:<8} {:<10}\n",
        "Algorithm", "Status", "Visited", "Hops", "Cost", "Time"
    ));
    out.push_str(&format!("{}\n", "-".repeat(66)));

    for report in reports {
        let cost = report.cost.map_or_else(|| "-".to_string(), |c| c.to_string());
        let hops = if report.path.is_empty() {
            "-".to_string()
        } else {
            report.hops().to_string()
        };
        out.push_str(&format!(
            "{:<16} {:<10} {:<9} {:<8} {:<8} {:<10}\n",
            report.algorithm.id(),
            report.status.to_string(),
            report.visited_count,
            hops,
            cost,
            format!("{}ms", report.elapsed.as_millis())
        ));
    }

    let successful: Vec<_> = reports.iter().filter(|r| r.is_success()).collect();
    if let Some(fewest) = successful.iter().min_by_key(|r| r.visited_count) {
        out.push_str(&format!(
            "\nFewest nodes visited: {} ({})\n",
            fewest.algorithm, fewest.visited_count
        ));
    }
    if let Some(cheapest) = successful.iter().filter(|r| r.cost.is_some()).min_by_key(|r| r.cost) {
        out.push_str(&format!(
            "Cheapest path: {} (cost {})\n",
            cheapest.algorithm,
            cheapest.cost.unwrap_or_default()
        ));
    }
    if successful.is_empty() {
        out.push_str("\nNo algorithm reached the end.\n");
    }
    out
}
