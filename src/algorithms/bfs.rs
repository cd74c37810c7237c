use crate::algorithms::common::{validate_endpoints, PathfindingAlgorithm, RunResult, StepPacing, StepSink};
use crate::algorithms::path::reconstruct;
use crate::grid::{CellKind, Grid, Position};
use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Breadth-first search over unit steps; weights are ignored.
#[derive(Default)]
pub struct Bfs;

impl Bfs {
    pub fn new() -> Self {
        Bfs
    }
}

impl PathfindingAlgorithm for Bfs {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn find_path(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        sink: &mut dyn StepSink,
    ) -> Result<RunResult> {
        validate_endpoints(grid, start, end)?;

        let mut queue = VecDeque::from([start]);
        let mut queued = FxHashSet::from_iter([start]);
        let mut visited_count = 0;
        grid.cell_mut(start).context("start vanished")?.distance = Some(0);

        while let Some(current) = queue.pop_front() {
            let cell = grid.cell_mut(current).context("queued cell outside the grid")?;
            if cell.visited {
                continue;
            }
            cell.visited = true;
            let distance = cell.distance.unwrap_or(0);
            visited_count += 1;

            sink.step(grid, visited_count, StepPacing::Normal);
            if sink.is_cancelled() {
                return Ok(RunResult::unfinished(visited_count));
            }
            if current == end {
                return Ok(RunResult {
                    path: reconstruct(grid, end)?,
                    visited_count,
                    cost: Some(distance),
                });
            }

            for neighbor in grid.neighbors(&current) {
                let Some(next) = grid.cell_mut(neighbor) else {
                    continue;
                };
                if next.visited || next.kind == CellKind::Wall {
                    continue;
                }
                next.distance = Some(distance + 1);
                next.predecessor = Some(current);
                if queued.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        Ok(RunResult::unfinished(visited_count))
    }
}
