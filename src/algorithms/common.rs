use crate::algorithms::bellman_ford::BellmanFord;
use crate::algorithms::bfs::Bfs;
use crate::algorithms::dijkstra::Dijkstra;
use crate::algorithms::floyd_warshall::FloydWarshall;
use crate::grid::{Grid, Position};
use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How long the presentation side should linger on a step, relative to its
/// base delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPacing {
    /// One visited cell (BFS, Dijkstra).
    Normal,
    /// A whole relaxation pass or pivot (Bellman-Ford, Floyd-Warshall).
    Slow,
}

impl StepPacing {
    pub fn delay(self, base: Duration) -> Duration {
        match self {
            StepPacing::Normal => base,
            StepPacing::Slow => base * 2,
        }
    }
}

/// Receives the visitation trace of a running search.
pub trait StepSink {
    /// Called once per visitation step with the running visited count.
    fn step(&mut self, grid: &Grid, visited_count: usize, pacing: StepPacing);

    /// Polled by the engine right after every step.
    fn is_cancelled(&self) -> bool;
}

/// Outcome of a single search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunResult {
    /// Start to End inclusive, or empty when no path was produced.
    pub path: Vec<Position>,
    pub visited_count: usize,
    /// End's distance in the engine's own metric, `None` if End was not reached.
    pub cost: Option<i64>,
}

impl RunResult {
    /// Result of a search that stopped before producing a path.
    pub fn unfinished(visited_count: usize) -> Self {
        RunResult {
            path: Vec::new(),
            visited_count,
            cost: None,
        }
    }
}

pub trait PathfindingAlgorithm {
    fn name(&self) -> &'static str;

    /// Searches from `start` to `end`, recording visitation state on `grid`
    /// and reporting every step to `sink`.
    fn find_path(
        &mut self,
        grid: &mut Grid,
        start: Position,
        end: Position,
        sink: &mut dyn StepSink,
    ) -> Result<RunResult>;
}

/// Shared precondition of all engines.
pub fn validate_endpoints(grid: &Grid, start: Position, end: Position) -> Result<()> {
    for (name, pos) in [("start", start), ("end", end)] {
        if !grid.contains(pos) {
            bail!("{} {} is outside the {}x{} grid", name, pos, grid.width(), grid.height());
        }
        if !grid.is_walkable(pos) {
            bail!("{} {} is a wall", name, pos);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Bfs,
    Dijkstra,
    BellmanFord,
    FloydWarshall,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dijkstra,
        Algorithm::BellmanFord,
        Algorithm::FloydWarshall,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::BellmanFord => "bellman-ford",
            Algorithm::FloydWarshall => "floyd-warshall",
        }
    }

    pub fn create(self) -> Box<dyn PathfindingAlgorithm> {
        match self {
            Algorithm::Bfs => Box::new(Bfs::new()),
            Algorithm::Dijkstra => Box::new(Dijkstra::new()),
            Algorithm::BellmanFord => Box::new(BellmanFord::new()),
            Algorithm::FloydWarshall => Box::new(FloydWarshall::new()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Algorithm::ALL
            .into_iter()
            .find(|a| a.id() == normalized)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown algorithm `{}`; select 'bfs', 'dijkstra', 'bellman-ford', 'floyd-warshall', or 'all'",
                    s
                )
            })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_algorithm_ids() {
        assert_eq!("bfs".parse::<Algorithm>().unwrap(), Algorithm::Bfs);
        assert_eq!("Bellman_Ford".parse::<Algorithm>().unwrap(), Algorithm::BellmanFord);
        assert_eq!("floyd-warshall".parse::<Algorithm>().unwrap(), Algorithm::FloydWarshall);
        assert!("a_star".parse::<Algorithm>().is_err());
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.id().parse::<Algorithm>().unwrap(), algorithm);
            assert_eq!(algorithm.create().name(), algorithm.id());
        }
    }

    #[test]
    fn slow_steps_take_twice_as_long() {
        let base = Duration::from_millis(40);
        assert_eq!(StepPacing::Normal.delay(base), base);
        assert_eq!(StepPacing::Slow.delay(base), Duration::from_millis(80));
    }

    #[test]
    fn endpoints_must_be_walkable_and_in_bounds() {
        let mut grid = Grid::default();
        let (start, end) = (grid.start(), grid.end());
        assert!(validate_endpoints(&grid, start, end).is_ok());
        assert!(validate_endpoints(&grid, start, Position::new(40, 0)).is_err());

        let wall = Position::new(0, 0);
        grid.toggle_wall(wall).unwrap();
        assert!(validate_endpoints(&grid, wall, end).is_err());
    }
}
