use crate::config::Config;
use crate::grid::{CellKind, Grid, Position};
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// What to scatter onto a fresh grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSetup {
    pub width: usize,
    pub height: usize,
    pub start: Option<Position>,
    pub end: Option<Position>,
    pub num_walls: usize,
    pub num_negative: usize,
    pub wall_column: Option<usize>,
    pub seed: u64,
}

impl LayoutSetup {
    /// Takes the layout options from the command line, drawing a seed when
    /// none was given so the run can be reproduced.
    pub fn from_config(config: &Config) -> Self {
        LayoutSetup {
            width: config.width,
            height: config.height,
            start: config.start,
            end: config.end,
            num_walls: config.num_walls,
            num_negative: config.num_negative,
            wall_column: config.wall_column,
            seed: config.seed.unwrap_or_else(rand::random),
        }
    }

    /// Builds the grid. The same setup always yields the same grid.
    pub fn generate(&self) -> Result<Grid> {
        let start = self.start.unwrap_or_else(|| Grid::default_start(self.width, self.height));
        let end = self.end.unwrap_or_else(|| Grid::default_end(self.width, self.height));
        let mut grid = Grid::with_endpoints(self.width, self.height, start, end)?;

        if let Some(x) = self.wall_column {
            if x >= self.width {
                bail!("wall column {} is outside the {}-wide grid", x, self.width);
            }
            for y in 0..self.height {
                grid.set_kind(Position::new(x, y), CellKind::Wall)?;
            }
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let walls = scatter(&mut grid, &mut rng, self.num_walls, CellKind::Wall)?;
        let negatives = scatter(&mut grid, &mut rng, self.num_negative, CellKind::NegativeWeight)?;
        if walls < self.num_walls || negatives < self.num_negative {
            log::warn!(
                "layout is crowded: placed {}/{} walls and {}/{} negative cells",
                walls,
                self.num_walls,
                negatives,
                self.num_negative
            );
        }

        log::debug!(
            "generated {}x{} layout (seed {}): start {}, end {}, {} walls, {} negative cells",
            self.width,
            self.height,
            self.seed,
            grid.start(),
            grid.end(),
            grid.count_kind(CellKind::Wall),
            grid.count_kind(CellKind::NegativeWeight)
        );
        Ok(grid)
    }
}

/// Turns up to `count` random empty cells into `kind`, giving up after a
/// bounded number of attempts. Returns how many were placed.
fn scatter(grid: &mut Grid, rng: &mut StdRng, count: usize, kind: CellKind) -> Result<usize> {
    let mut placed = 0;
    let mut attempts = 0;
    while placed < count && attempts < count * 3 {
        let pos = Position::new(rng.gen_range(0..grid.width()), rng.gen_range(0..grid.height()));
        if grid.kind(pos) == Some(CellKind::Empty) && grid.set_kind(pos, kind)? {
            placed += 1;
        }
        attempts += 1;
    }
    Ok(placed)
}
