use crate::algorithms::common::{Algorithm, StepPacing};
use crate::config::Config;
use crate::controller::{CancelToken, RunObserver};
use crate::grid::{CellKind, Grid, Position};
use crate::report::RunReport;
use rustc_hash::FxHashSet;
use std::fmt::Write;
use std::thread;
use std::time::Duration;

/// Pause between two cells of the path replay.
pub const PATH_REPLAY_DELAY: Duration = Duration::from_millis(30);

/// Text rendering of a grid: `S` start, `E` end, `#` wall, `-` negative
/// weight, `o` visited, `*` path, `.` empty.
pub fn render_grid(grid: &Grid, path: &[Position]) -> String {
    let on_path: FxHashSet<Position> = path.iter().copied().collect();
    let mut out = String::new();

    // Column numbers header
    out.push_str("   ");
    for x in 0..grid.width() {
        let _ = write!(out, "{:2}", x % 10);
    }
    out.push('\n');

    for y in 0..grid.height() {
        let _ = write!(out, "{:2} ", y);
        for x in 0..grid.width() {
            let pos = Position { x, y };
            let symbol = match grid.cell(pos) {
                Some(cell) => match cell.kind {
                    CellKind::Start => 'S',
                    CellKind::End => 'E',
                    CellKind::Wall => '#',
                    _ if on_path.contains(&pos) => '*',
                    _ if cell.visited => 'o',
                    CellKind::NegativeWeight => '-',
                    CellKind::Empty => '.',
                },
                None => '?',
            };
            out.push(' ');
            out.push(symbol);
        }
        out.push('\n');
    }
    out
}

/// Draws runs in the terminal, pacing them with sleeps.
pub struct TerminalVisualizer {
    algorithm: Algorithm,
    delay: Duration,
    visualize: bool,
    quiet: bool,
    cancel_after: Option<usize>,
    cancel: Option<CancelToken>,
    steps: usize,
}

impl TerminalVisualizer {
    pub fn new(config: &Config, algorithm: Algorithm) -> Self {
        TerminalVisualizer {
            algorithm,
            delay: Duration::from_millis(config.delay_ms),
            visualize: !config.no_visualization && !config.quiet,
            quiet: config.quiet,
            cancel_after: config.cancel_after,
            cancel: None,
            steps: 0,
        }
    }

    /// Lets the visualizer cancel the run once `cancel_after` steps were shown.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn steps_shown(&self) -> usize {
        self.steps
    }

    fn draw(&self, grid: &Grid, path: &[Position], headline: &str) {
        // Clear the terminal screen
        print!("\x1B[2J\x1B[1;1H");
        println!("=== PATHFINDING VISUALIZER ===");
        println!("Algorithm: {} | {}", self.algorithm, headline);
        println!("Legend: S=Start, E=End, #=Wall, -=Negative, o=Visited, *=Path, .=Empty");
        print!("{}", render_grid(grid, path));
    }
}

impl RunObserver for TerminalVisualizer {
    fn on_step(&mut self, grid: &Grid, visited_count: usize, pacing: StepPacing) {
        self.steps += 1;
        if self.visualize {
            self.draw(grid, &[], &format!("Step: {} | Nodes visited: {}", self.steps, visited_count));
            thread::sleep(pacing.delay(self.delay));
        }

        if let (Some(limit), Some(token)) = (self.cancel_after, &self.cancel) {
            if self.steps >= limit && !token.is_cancelled() {
                log::info!("cancelling {} after {} steps", self.algorithm, self.steps);
                token.cancel();
            }
        }
    }

    fn on_path(&mut self, grid: &Grid, path: &[Position]) {
        if !self.visualize {
            return;
        }
        for shown in 1..=path.len() {
            self.draw(grid, &path[..shown], &format!("Path: {}/{}", shown, path.len()));
            thread::sleep(PATH_REPLAY_DELAY);
        }
    }

    fn on_finished(&mut self, report: &RunReport) {
        if self.quiet {
            println!(
                "{}: {} | visited {} | path {} | {}ms",
                report.algorithm,
                report.status,
                report.visited_count,
                report.path.len(),
                report.elapsed.as_millis()
            );
            return;
        }
        println!("\n=== FINAL RESULTS ===");
        print!("{}", report);
    }
}

/// Observer for runs nobody watches.
#[derive(Debug, Default)]
pub struct SilentObserver;

impl RunObserver for SilentObserver {
    fn on_step(&mut self, _grid: &Grid, _visited_count: usize, _pacing: StepPacing) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::RunController;
    use crate::report::RunStatus;

    #[test]
    fn renders_every_cell_kind() {
        let mut grid = Grid::new(4, 2).unwrap();
        // S at (0,1), E at (3,1)
        grid.toggle_wall(Position::new(1, 0)).unwrap();
        grid.toggle_negative_weight(Position::new(2, 0)).unwrap();
        grid.cell_mut(Position::new(3, 0)).unwrap().visited = true;
        let path = [Position::new(0, 1), Position::new(1, 1), Position::new(2, 1), Position::new(3, 1)];

        let text = render_grid(&grid, &path);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[0], "    0 1 2 3");
        assert_eq!(rows[1], " 0  . # - o");
        assert_eq!(rows[2], " 1  S * * E");
    }

    #[test]
    fn cancels_after_the_configured_number_of_steps() {
        let config = Config {
            no_visualization: true,
            quiet: true,
            cancel_after: Some(4),
            ..Config::default()
        };
        let controller = RunController::new();
        let mut visualizer =
            TerminalVisualizer::new(&config, Algorithm::Bfs).with_cancel_token(controller.cancel_token());

        let report = controller.run(&mut Grid::default(), Algorithm::Bfs, &mut visualizer).unwrap();
        assert_eq!(report.status, RunStatus::Cancelled);
        assert_eq!(report.visited_count, 4);
        assert_eq!(visualizer.steps_shown(), 4);
    }
}
