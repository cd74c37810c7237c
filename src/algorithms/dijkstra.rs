use crate::algorithms::common::{validate_endpoints, PathfindingAlgorithm, RunResult, StepPacing, StepSink};
use crate::algorithms::path::reconstruct;
use crate::grid::{CellKind, Grid, Position};
use anyhow::{Context, Result};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Dijkstra's algorithm. Negative cells are entered at the absolute value
/// of their weight, so they are passable but never shorten a route.
#[derive(Default)]
pub struct Dijkstra;

impl Dijkstra {
    pub fn new() -> Self {
        Dijkstra
    }
}

impl PathfindingAlgorithm for Dijkstra {
    fn name(&self) -> &'static str {
        "dijkstra"
    }

    fn find_path(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        sink: &mut dyn StepSink,
    ) -> Result<RunResult> {
        validate_endpoints(grid, start, end)?;

        let start_index = grid.index(start).context("start outside the grid")?;
        grid.cells_mut()[start_index].distance = Some(0);

        // Min-heap on (distance, row-major index); stale entries are skipped
        // on pop. Only finite distances are ever pushed, so an empty heap
        // means the remaining cells are unreachable.
        let mut open = BinaryHeap::from([Reverse((0i64, start_index))]);
        let mut visited_count = 0;

        while let Some(Reverse((distance, index))) = open.pop() {
            let cell = &mut grid.cells_mut()[index];
            if cell.visited || cell.distance != Some(distance) {
                continue;
            }
            cell.visited = true;
            let current = cell.position;
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
                let Some(next_index) = grid.index(neighbor) else {
                    continue;
                };
                let next = &mut grid.cells_mut()[next_index];
                if next.visited || next.kind == CellKind::Wall {
                    continue;
                }
                let alt = distance + next.weight.abs();
                if next.distance.map_or(true, |d| alt < d) {
                    next.distance = Some(alt);
                    next.predecessor = Some(current);
                    open.push(Reverse((alt, next_index)));
                }
            }
        }

        Ok(RunResult::unfinished(visited_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::common::testing::{assert_valid_path, run, RecordingSink};
    use crate::algorithms::common::Algorithm;

    #[test]
    fn unit_grid_matches_bfs_length() {
        let mut grid = Grid::default();
        let (result, sink) = run(Algorithm::Dijkstra, &mut grid);

        assert_eq!(result.path.len(), 20);
        assert_eq!(result.cost, Some(19));
        assert_eq!(sink.steps.last().map(|(count, _)| *count), Some(result.visited_count));
        assert_valid_path(&grid, &result.path);
    }

    #[test]
    fn negative_cells_cost_their_absolute_weight() {
        let mut grid = Grid::default();
        grid.toggle_negative_weight(Position::new(15, 10)).unwrap();
        let (result, _) = run(Algorithm::Dijkstra, &mut grid);

        // Straight through costs 18 + 2, a detour 21.
        assert_eq!(result.cost, Some(20));
        assert_eq!(result.path.len(), 20);
        assert!(result.path.contains(&Position::new(15, 10)));
    }

    #[test]
    fn records_distances_on_visited_cells() {
        let mut grid = Grid::new(6, 1).unwrap();
        // S(1,0) . . . E(4,0)
        grid.toggle_negative_weight(Position::new(2, 0)).unwrap();
        let (result, _) = run(Algorithm::Dijkstra, &mut grid);

        assert_eq!(result.cost, Some(4));
        assert_eq!(grid.cell(Position::new(2, 0)).unwrap().distance, Some(2));
        assert_eq!(grid.cell(Position::new(3, 0)).unwrap().distance, Some(3));
    }

    #[test]
    fn stops_when_remaining_cells_are_unreachable() {
        let mut grid = Grid::default();
        for y in 0..grid.height() {
            grid.toggle_wall(Position::new(15, y)).unwrap();
        }
        let (result, _) = run(Algorithm::Dijkstra, &mut grid);
        assert!(result.path.is_empty());
        assert_eq!(result.visited_count, 15 * 20);
    }

    #[test]
    fn cancellation_leaves_later_cells_untouched() {
        let mut grid = Grid::default();
        let mut sink = RecordingSink::cancelling_after(1);
        let (start, end) = (grid.start(), grid.end());
        let result = Dijkstra::new().find_path(&mut grid, start, end, &mut sink).unwrap();

        assert_eq!(result.visited_count, 1);
        assert!(result.path.is_empty());
        assert!(grid.cells().iter().all(|c| c.predecessor.is_none()));
    }
}
