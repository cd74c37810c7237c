use crate::algorithms::common::{validate_endpoints, PathfindingAlgorithm, RunResult, StepPacing, StepSink};
use crate::grid::{CellKind, Grid, Position};
use anyhow::{bail, Context, Result};

/// Largest number of passable cells the all-pairs tables are built for.
pub const FLOYD_WARSHALL_CELL_LIMIT: usize = 2500;

/// Longest path the greedy walk will produce before giving up.
pub const GREEDY_WALK_LIMIT: usize = 100;

const INFINITE: i64 = i64::MAX;
const NO_VIA: u32 = u32::MAX;

/// All-pairs distance and via tables over the passable cells of a grid.
#[derive(Debug, Clone)]
pub struct AllPairs {
    cells: Vec<Position>,
    /// Grid storage index -> table index, `None` for walls.
    lookup: Vec<Option<usize>>,
    width: usize,
    dist: Vec<i64>,
    via: Vec<u32>,
}

impl AllPairs {
    fn new(grid: &Grid) -> Result<Self> {
        let cells: Vec<Position> = grid
            .cells()
            .iter()
            .filter(|c| c.kind != CellKind::Wall)
            .map(|c| c.position)
            .collect();
        let n = cells.len();
        if n > FLOYD_WARSHALL_CELL_LIMIT {
            bail!(
                "floyd-warshall is limited to {} passable cells, this grid has {}",
                FLOYD_WARSHALL_CELL_LIMIT,
                n
            );
        }

        let mut lookup = vec![None; grid.len()];
        for (i, pos) in cells.iter().enumerate() {
            let index = grid.index(*pos).context("passable cell outside the grid")?;
            lookup[index] = Some(i);
        }

        let mut tables = AllPairs {
            cells,
            lookup,
            width: grid.width(),
            dist: vec![INFINITE; n * n],
            via: vec![NO_VIA; n * n],
        };
        for i in 0..n {
            tables.dist[i * n + i] = 0;
        }
        for edge in grid.edges() {
            if let (Some(i), Some(j)) = (tables.slot(edge.from), tables.slot(edge.to)) {
                tables.dist[i * n + j] = edge.weight;
            }
        }
        Ok(tables)
    }

    fn slot(&self, pos: Position) -> Option<usize> {
        if pos.x >= self.width {
            return None;
        }
        self.lookup.get(pos.y * self.width + pos.x).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Shortest known distance, `None` when unreachable or either side is a wall.
    pub fn distance(&self, from: Position, to: Position) -> Option<i64> {
        let (i, j) = (self.slot(from)?, self.slot(to)?);
        let d = self.dist[i * self.len() + j];
        (d != INFINITE).then_some(d)
    }

    /// The intermediate cell recorded for `from -> to`, `None` for direct
    /// neighbors and unreachable pairs.
    pub fn via(&self, from: Position, to: Position) -> Option<Position> {
        let (i, j) = (self.slot(from)?, self.slot(to)?);
        match self.via[i * self.len() + j] {
            NO_VIA => None,
            k => self.cells.get(k as usize).copied(),
        }
    }

    /// Relaxes every pair through pivot `k`.
    fn relax_through(&mut self, k: usize) {
        let n = self.len();
        let row_k = self.dist[k * n..(k + 1) * n].to_vec();
        for i in 0..n {
            let d_ik = self.dist[i * n + k];
            if d_ik == INFINITE {
                continue;
            }
            let hop = match self.via[i * n + k] {
                NO_VIA => k as u32,
                v => v,
            };
            let row_i = &mut self.dist[i * n..(i + 1) * n];
            let via_i = &mut self.via[i * n..(i + 1) * n];
            for (j, &d_kj) in row_k.iter().enumerate() {
                if d_kj == INFINITE {
                    continue;
                }
                let candidate = d_ik.saturating_add(d_kj);
                if candidate < row_i[j] {
                    row_i[j] = candidate;
                    via_i[j] = hop;
                }
            }
        }
    }
}

/// Floyd-Warshall with a greedy start-to-end walk over the finished
/// distance table instead of a via-table reconstruction.
#[derive(Default)]
pub struct FloydWarshall {
    tables: Option<AllPairs>,
}

impl FloydWarshall {
    pub fn new() -> Self {
        FloydWarshall { tables: None }
    }

    /// Tables of the last run, complete unless that run was cancelled.
    pub fn tables(&self) -> Option<&AllPairs> {
        self.tables.as_ref()
    }

    /// From `start`, repeatedly step to the neighbor whose distance to `end`
    /// is smallest and strictly below the current cell's.
    fn greedy_walk(grid: &Grid, tables: &AllPairs, start: Position, end: Position) -> Vec<Position> {
        let mut path = vec![start];
        let mut current = start;

        while current != end {
            let mut best = None;
            let mut best_distance = tables.distance(current, end).unwrap_or(INFINITE);
            for neighbor in grid.neighbors(&current) {
                if let Some(d) = tables.distance(neighbor, end) {
                    if d < best_distance {
                        best_distance = d;
                        best = Some(neighbor);
                    }
                }
            }

            let Some(next) = best else {
                break;
            };
            current = next;
            path.push(current);

            if path.len() > GREEDY_WALK_LIMIT {
                break;
            }
        }

        if current != end {
            log::warn!(
                "floyd-warshall greedy walk stalled at {} after {} cells",
                current,
                path.len()
            );
            return Vec::new();
        }
        path
    }
}

impl PathfindingAlgorithm for FloydWarshall {
    fn name(&self) -> &'static str {
        "floyd-warshall"
    }

    fn find_path(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        sink: &mut dyn StepSink,
    ) -> Result<RunResult> {
        validate_endpoints(grid, start, end)?;

        self.tables = None;
        let mut tables = AllPairs::new(grid)?;
        let mut visited_count = 0;

        for k in 0..tables.len() {
            let pivot = tables.cells[k];
            grid.cell_mut(pivot).context("pivot outside the grid")?.visited = true;
            visited_count += 1;

            tables.relax_through(k);

            sink.step(grid, visited_count, StepPacing::Slow);
            if sink.is_cancelled() {
                self.tables = Some(tables);
                return Ok(RunResult::unfinished(visited_count));
            }
        }

        let result = match tables.distance(start, end) {
            Some(cost) => {
                let path = Self::greedy_walk(grid, &tables, start, end);
                let cost = (!path.is_empty()).then_some(cost);
                RunResult {
                    path,
                    visited_count,
                    cost,
                }
            }
            None => RunResult::unfinished(visited_count),
        };
        self.tables = Some(tables);
        Ok(result)
    }
}
