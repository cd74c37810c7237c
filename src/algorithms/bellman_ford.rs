use crate::algorithms::common::{validate_endpoints, PathfindingAlgorithm, RunResult, StepPacing, StepSink};
use crate::algorithms::path::reconstruct;
use crate::grid::{CellKind, Edge, Grid, Position};
use anyhow::{Context, Result};

/// Bellman-Ford over the grid's edge list with raw signed weights, so
/// negative cells genuinely shorten routes.
///
/// Any negative cell next to a normal one forms a negative cycle (-2 in,
/// +1 back out). There is no cycle detection; instead a relaxation that
/// would put a cell on its own predecessor chain is skipped, which keeps the
/// predecessors a tree rooted at Start and every reconstructed path simple.
#[derive(Default)]
pub struct BellmanFord;

impl BellmanFord {
    pub fn new() -> Self {
        BellmanFord
    }

    /// Whether `target` lies on the predecessor chain leading to `from`
    /// (including `from` itself).
    fn is_ancestor(grid: &Grid, from: Position, target: Position) -> bool {
        let mut current = Some(from);
        let mut hops = 0;
        while let Some(pos) = current {
            if pos == target {
                return true;
            }
            hops += 1;
            if hops > grid.len() {
                return true;
            }
            current = grid.cell(pos).and_then(|c| c.predecessor);
        }
        false
    }

    /// One pass over every edge. Returns whether any distance changed.
    fn relax_all(grid: &mut Grid, edges: &[Edge]) -> bool {
        let mut updated = false;
        for edge in edges {
            let Some(from_distance) = grid.cell(edge.from).and_then(|c| c.distance) else {
                continue;
            };
            let candidate = from_distance + edge.weight;
            let improves = grid
                .cell(edge.to)
                .is_some_and(|c| c.distance.map_or(true, |d| candidate < d));
            if !improves || Self::is_ancestor(grid, edge.from, edge.to) {
                continue;
            }
            if let Some(to) = grid.cell_mut(edge.to) {
                to.distance = Some(candidate);
                to.predecessor = Some(edge.from);
                updated = true;
            }
        }
        updated
    }
}

impl PathfindingAlgorithm for BellmanFord {
    fn name(&self) -> &'static str {
        "bellman-ford"
    }

    fn find_path(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        sink: &mut dyn StepSink,
    ) -> Result<RunResult> {
        validate_endpoints(grid, start, end)?;

        let edges = grid.edges();
        for cell in grid.cells_mut() {
            cell.distance = None;
        }
        grid.cell_mut(start).context("start outside the grid")?.distance = Some(0);

        let max_passes = grid.len().saturating_sub(1);
        let mut visited_count = 0;
        let mut passes = 0;

        while passes < max_passes {
            if !Self::relax_all(grid, &edges) {
                break;
            }
            passes += 1;

            for cell in grid.cells_mut() {
                if cell.distance.is_some() && cell.kind != CellKind::Wall && !cell.visited {
                    cell.visited = true;
                    visited_count += 1;
                }
            }

            sink.step(grid, visited_count, StepPacing::Slow);
            if sink.is_cancelled() {
                return Ok(RunResult::unfinished(visited_count));
            }
        }
        log::debug!("bellman-ford settled after {} of at most {} passes", passes, max_passes);

        let cost = grid.cell(end).and_then(|c| c.distance);
        let path = match cost {
            Some(_) => reconstruct(grid, end)?,
            None => Vec::new(),
        };
        Ok(RunResult {
            path,
            visited_count,
            cost,
        })
    }
}
