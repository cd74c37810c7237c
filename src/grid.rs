use anyhow::{bail, Context, Result};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_WIDTH: usize = 30;
pub const DEFAULT_HEIGHT: usize = 20;

/// Weight of every passable cell except negative-weight ones.
pub const NORMAL_WEIGHT: i64 = 1;
pub const NEGATIVE_WEIGHT: i64 = -2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    pub fn manhattan(&self, other: &Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;

    /// Parses `"x,y"`.
    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = s
            .split_once(',')
            .with_context(|| format!("expected `x,y`, got `{}`", s))?;
        let x = x.trim().parse().with_context(|| format!("invalid x in `{}`", s))?;
        let y = y.trim().parse().with_context(|| format!("invalid y in `{}`", s))?;
        Ok(Position { x, y })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Empty,
    Wall,
    Start,
    End,
    NegativeWeight,
}

impl CellKind {
    pub fn weight(self) -> i64 {
        match self {
            CellKind::NegativeWeight => NEGATIVE_WEIGHT,
            _ => NORMAL_WEIGHT,
        }
    }

    fn is_endpoint(self) -> bool {
        matches!(self, CellKind::Start | CellKind::End)
    }
}

/// One grid position with its classification and per-run search state.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub position: Position,
    pub kind: CellKind,
    pub weight: i64,
    pub visited: bool,
    /// `None` stands for an infinite distance.
    pub distance: Option<i64>,
    pub predecessor: Option<Position>,
}

impl Cell {
    fn new(position: Position) -> Self {
        Cell {
            position,
            kind: CellKind::Empty,
            weight: NORMAL_WEIGHT,
            visited: false,
            distance: None,
            predecessor: None,
        }
    }

    fn set_kind(&mut self, kind: CellKind) {
        self.kind = kind;
        self.weight = kind.weight();
    }

    fn clear_search_state(&mut self) {
        self.visited = false;
        self.distance = None;
        self.predecessor = None;
    }
}

/// A directed move between two 4-adjacent passable cells, costing the
/// weight of the cell being entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: Position,
    pub to: Position,
    pub weight: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Position,
    end: Position,
    home_start: Position,
    home_end: Position,
}

impl Default for Grid {
    fn default() -> Self {
        Grid::build(
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            Grid::default_start(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            Grid::default_end(DEFAULT_WIDTH, DEFAULT_HEIGHT),
        )
    }
}

impl Grid {
    /// Creates a grid with the default Start/End placement for its size.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::with_endpoints(
            width,
            height,
            Self::default_start(width, height),
            Self::default_end(width, height),
        )
    }

    /// Creates a grid whose Start/End (and the positions restored by
    /// [`Grid::full_reset`]) are the given ones.
    pub fn with_endpoints(width: usize, height: usize, start: Position, end: Position) -> Result<Self> {
        if width.checked_mul(height).map_or(true, |cells| cells < 2) {
            bail!("grid must hold at least two cells, got {}x{}", width, height);
        }
        for (name, pos) in [("start", start), ("end", end)] {
            if pos.x >= width || pos.y >= height {
                bail!("{} {} is outside the {}x{} grid", name, pos, width, height);
            }
        }
        if start == end {
            bail!("start and end must differ, both are {}", start);
        }
        Ok(Self::build(width, height, start, end))
    }

    fn build(width: usize, height: usize, start: Position, end: Position) -> Self {
        let mut grid = Grid {
            width,
            height,
            cells: Vec::with_capacity(width * height),
            start,
            end,
            home_start: start,
            home_end: end,
        };
        grid.full_reset();
        grid
    }

    pub fn default_start(width: usize, height: usize) -> Position {
        Position::new(width / 6, height / 2)
    }

    pub fn default_end(width: usize, height: usize) -> Position {
        let start = Self::default_start(width, height);
        let end = Position::new(width.saturating_sub(1 + width / 6), height / 2);
        match (end == start, start == Position::new(0, 0)) {
            // Degenerate narrow grids: fall back to a corner.
            (true, false) => Position::new(0, 0),
            (true, true) => Position::new(width.saturating_sub(1), height.saturating_sub(1)),
            (false, _) => end,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Row-major storage index of an in-bounds position.
    pub fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.y * self.width + pos.x)
    }

    pub fn position(&self, index: usize) -> Position {
        Position::new(index % self.width, index / self.width)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.index(pos).map(move |i| &mut self.cells[i])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn kind(&self, pos: Position) -> Option<CellKind> {
        self.cell(pos).map(|c| c.kind)
    }

    pub fn is_walkable(&self, pos: Position) -> bool {
        self.cell(pos).is_some_and(|c| c.kind != CellKind::Wall)
    }

    /// In-bounds neighbors of `pos` in up, right, down, left order. Walls are
    /// included; callers filter with [`Grid::is_walkable`].
    pub fn neighbors(&self, pos: &Position) -> Vec<Position> {
        let mut neighbors = Vec::with_capacity(4);
        let (x, y) = (pos.x as isize, pos.y as isize);

        for (dx, dy) in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
            let nx = x + dx;
            let ny = y + dy;

            if nx >= 0 && nx < self.width as isize && ny >= 0 && ny < self.height as isize {
                neighbors.push(Position { x: nx as usize, y: ny as usize });
            }
        }
        neighbors
    }

    /// Every directed edge between adjacent passable cells, row-major by
    /// source cell.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for cell in self.cells.iter().filter(|c| c.kind != CellKind::Wall) {
            for to in self.neighbors(&cell.position) {
                if let Some(target) = self.cell(to).filter(|t| t.kind != CellKind::Wall) {
                    edges.push(Edge {
                        from: cell.position,
                        to,
                        weight: target.weight,
                    });
                }
            }
        }
        edges
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.kind != CellKind::Wall).count()
    }

    pub fn count_kind(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    fn checked_cell(&mut self, pos: Position) -> Result<&mut Cell> {
        let (width, height) = (self.width, self.height);
        self.cell_mut(pos)
            .with_context(|| format!("{} is outside the {}x{} grid", pos, width, height))
    }

    /// Applies `kind` to a single cell. Endpoint kinds relocate Start/End;
    /// endpoints themselves are never overwritten. Returns whether the grid
    /// changed.
    pub fn set_kind(&mut self, pos: Position, kind: CellKind) -> Result<bool> {
        match kind {
            CellKind::Start => self.set_start(pos),
            CellKind::End => self.set_end(pos),
            _ => {
                let cell = self.checked_cell(pos)?;
                if cell.kind.is_endpoint() || cell.kind == kind {
                    return Ok(false);
                }
                cell.set_kind(kind);
                Ok(true)
            }
        }
    }

    pub fn set_start(&mut self, pos: Position) -> Result<bool> {
        let target = self.checked_cell(pos)?.kind;
        if target == CellKind::End || pos == self.start {
            return Ok(false);
        }
        let previous = self.start;
        self.checked_cell(previous)?.set_kind(CellKind::Empty);
        self.checked_cell(pos)?.set_kind(CellKind::Start);
        self.start = pos;
        Ok(true)
    }

    pub fn set_end(&mut self, pos: Position) -> Result<bool> {
        let target = self.checked_cell(pos)?.kind;
        if target == CellKind::Start || pos == self.end {
            return Ok(false);
        }
        let previous = self.end;
        self.checked_cell(previous)?.set_kind(CellKind::Empty);
        self.checked_cell(pos)?.set_kind(CellKind::End);
        self.end = pos;
        Ok(true)
    }

    /// Empty and negative cells become walls, walls become empty.
    pub fn toggle_wall(&mut self, pos: Position) -> Result<bool> {
        let cell = self.checked_cell(pos)?;
        let next = match cell.kind {
            CellKind::Empty | CellKind::NegativeWeight => CellKind::Wall,
            CellKind::Wall => CellKind::Empty,
            CellKind::Start | CellKind::End => return Ok(false),
        };
        cell.set_kind(next);
        Ok(true)
    }

    pub fn toggle_negative_weight(&mut self, pos: Position) -> Result<bool> {
        let cell = self.checked_cell(pos)?;
        let next = match cell.kind {
            CellKind::Empty => CellKind::NegativeWeight,
            CellKind::NegativeWeight => CellKind::Empty,
            _ => return Ok(false),
        };
        cell.set_kind(next);
        Ok(true)
    }

    /// Drag painting: with `draw` set only empty cells turn into walls,
    /// otherwise only walls are erased.
    pub fn paint_wall(&mut self, pos: Position, draw: bool) -> Result<bool> {
        let cell = self.checked_cell(pos)?;
        match (draw, cell.kind) {
            (true, CellKind::Empty) => cell.set_kind(CellKind::Wall),
            (false, CellKind::Wall) => cell.set_kind(CellKind::Empty),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Clears visitation, distance and predecessor on every cell, leaving the
    /// wall and weight layout untouched.
    pub fn snapshot_reset(&mut self) {
        for cell in &mut self.cells {
            cell.clear_search_state();
        }
    }

    /// Reinitializes every cell to empty and restores the home Start/End.
    pub fn full_reset(&mut self) {
        let width = self.width;
        self.cells.clear();
        self.cells
            .extend((0..width * self.height).map(|i| Cell::new(Position::new(i % width, i / width))));

        self.start = self.home_start;
        self.end = self.home_end;
        let (start, end) = (self.start.y * width + self.start.x, self.end.y * width + self.end.x);
        self.cells[start].set_kind(CellKind::Start);
        self.cells[end].set_kind(CellKind::End);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_matches_home_layout() {
        let grid = Grid::default();
        assert_eq!((grid.width(), grid.height()), (30, 20));
        assert_eq!(grid.start(), Position::new(5, 10));
        assert_eq!(grid.end(), Position::new(24, 10));
        assert_eq!(grid.count_kind(CellKind::Start), 1);
        assert_eq!(grid.count_kind(CellKind::End), 1);
        assert_eq!(grid.walkable_count(), 600);
    }

    #[test]
    fn rejects_bad_dimensions_and_endpoints() {
        assert!(Grid::new(1, 1).is_err());
        assert!(Grid::new(0, 5).is_err());
        assert!(Grid::new(5, 0).is_err());
        assert!(Grid::new(usize::MAX, 2).is_err());
        assert!(Grid::with_endpoints(4, 4, Position::new(4, 0), Position::new(0, 0)).is_err());
        assert!(Grid::with_endpoints(4, 4, Position::new(1, 1), Position::new(1, 1)).is_err());
        assert!(Grid::new(2, 1).is_ok());
    }

    #[test]
    fn neighbors_follow_up_right_down_left() {
        let grid = Grid::default();
        assert_eq!(
            grid.neighbors(&Position::new(3, 3)),
            vec![
                Position::new(3, 2),
                Position::new(4, 3),
                Position::new(3, 4),
                Position::new(2, 3)
            ]
        );
        assert_eq!(
            grid.neighbors(&Position::new(0, 0)),
            vec![Position::new(1, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn endpoints_cannot_become_walls_or_negative() {
        let mut grid = Grid::default();
        let start = grid.start();
        assert!(!grid.toggle_wall(start).unwrap());
        assert!(!grid.toggle_negative_weight(grid.end()).unwrap());
        assert!(!grid.set_kind(start, CellKind::Empty).unwrap());
        assert_eq!(grid.kind(start), Some(CellKind::Start));
    }

    #[test]
    fn moving_start_clears_previous_location() {
        let mut grid = Grid::default();
        let old = grid.start();
        let new = Position::new(1, 1);
        grid.toggle_wall(new).unwrap();
        assert!(grid.set_start(new).unwrap());
        assert_eq!(grid.kind(old), Some(CellKind::Empty));
        assert_eq!(grid.kind(new), Some(CellKind::Start));
        assert_eq!(grid.cell(new).unwrap().weight, NORMAL_WEIGHT);
        assert_eq!(grid.count_kind(CellKind::Start), 1);

        // Start may not land on End.
        assert!(!grid.set_start(grid.end()).unwrap());
        assert_eq!(grid.start(), new);
    }

    #[test]
    fn toggles_keep_weight_in_sync() {
        let mut grid = Grid::default();
        let pos = Position::new(10, 3);
        assert!(grid.toggle_negative_weight(pos).unwrap());
        assert_eq!(grid.cell(pos).unwrap().weight, NEGATIVE_WEIGHT);

        // A negative cell turned into a wall loses its weight.
        assert!(grid.toggle_wall(pos).unwrap());
        assert_eq!(grid.cell(pos).unwrap().weight, NORMAL_WEIGHT);
        assert!(!grid.toggle_negative_weight(pos).unwrap());

        assert!(grid.toggle_wall(pos).unwrap());
        assert_eq!(grid.kind(pos), Some(CellKind::Empty));
    }

    #[test]
    fn paint_wall_only_touches_matching_cells() {
        let mut grid = Grid::default();
        let negative = Position::new(2, 2);
        grid.toggle_negative_weight(negative).unwrap();

        assert!(grid.paint_wall(Position::new(1, 2), true).unwrap());
        assert!(!grid.paint_wall(negative, true).unwrap());
        assert!(!grid.paint_wall(Position::new(3, 2), false).unwrap());
        assert!(grid.paint_wall(Position::new(1, 2), false).unwrap());
    }

    #[test]
    fn out_of_bounds_edits_are_errors() {
        let mut grid = Grid::default();
        assert!(grid.toggle_wall(Position::new(30, 0)).is_err());
        assert!(grid.set_end(Position::new(0, 20)).is_err());
    }

    #[test]
    fn edges_skip_walls_and_carry_target_weight() {
        let mut grid = Grid::new(3, 1).unwrap();
        // S . E -> S N E
        grid.toggle_negative_weight(Position::new(1, 0)).unwrap();
        let edges = grid.edges();
        assert_eq!(edges.len(), 4);
        assert!(edges.contains(&Edge {
            from: Position::new(0, 0),
            to: Position::new(1, 0),
            weight: NEGATIVE_WEIGHT
        }));

        grid.toggle_wall(Position::new(1, 0)).unwrap();
        assert!(grid.edges().is_empty());
    }

    #[test]
    fn snapshot_reset_is_idempotent_and_keeps_layout() {
        let mut grid = Grid::default();
        grid.toggle_wall(Position::new(7, 7)).unwrap();
        grid.toggle_negative_weight(Position::new(8, 8)).unwrap();
        for cell in grid.cells_mut() {
            cell.visited = true;
            cell.distance = Some(3);
        }
        grid.cells_mut()[0].predecessor = Some(Position::new(1, 0));

        grid.snapshot_reset();
        let once = grid.clone();
        grid.snapshot_reset();
        assert_eq!(grid, once);
        assert!(grid.cells().iter().all(|c| !c.visited && c.distance.is_none() && c.predecessor.is_none()));
        assert_eq!(grid.kind(Position::new(7, 7)), Some(CellKind::Wall));
        assert_eq!(grid.cell(Position::new(8, 8)).unwrap().weight, NEGATIVE_WEIGHT);
    }

    #[test]
    fn full_reset_restores_home_endpoints() {
        let mut grid = Grid::default();
        grid.set_start(Position::new(0, 0)).unwrap();
        grid.set_end(Position::new(29, 19)).unwrap();
        grid.toggle_wall(Position::new(7, 7)).unwrap();

        grid.full_reset();
        assert_eq!(grid, Grid::default());
    }

    #[test]
    fn parses_positions() {
        assert_eq!("4, 7".parse::<Position>().unwrap(), Position::new(4, 7));
        assert!("4".parse::<Position>().is_err());
        assert!("a,1".parse::<Position>().is_err());
    }
}
