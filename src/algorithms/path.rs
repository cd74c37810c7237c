use crate::grid::{Grid, Position};
use anyhow::{bail, Context, Result};
use rustc_hash::FxHashSet;

/// Walks predecessor links back from `end` and returns the path in
/// Start-to-End order.
pub fn reconstruct(grid: &Grid, end: Position) -> Result<Vec<Position>> {
    let mut path = Vec::new();
    let mut seen = FxHashSet::default();
    let mut current = Some(end);

    while let Some(pos) = current {
        if !seen.insert(pos) {
            bail!("predecessor cycle through {} while reconstructing the path to {}", pos, end);
        }
        path.push(pos);
        current = grid
            .cell(pos)
            .with_context(|| format!("predecessor {} is outside the grid", pos))?
            .predecessor;
    }

    path.reverse();
    Ok(path)
}
