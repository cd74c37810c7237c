use crate::grid::{Position, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: usize,

    /// Start cell as `x,y`; defaults to the grid's home start
    #[arg(long)]
    pub start: Option<Position>,

    /// End cell as `x,y`; defaults to the grid's home end
    #[arg(long)]
    pub end: Option<Position>,

    /// bfs, dijkstra, bellman-ford, floyd-warshall, or all
    #[arg(long, default_value = "bfs")]
    pub algorithm: String,

    #[arg(long, default_value_t = 0)]
    pub num_walls: usize,

    #[arg(long, default_value_t = 0)]
    pub num_negative: usize,

    /// Turn every cell of this column into a wall
    #[arg(long)]
    pub wall_column: Option<usize>,

    /// Seed for the random layout, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Request cancellation once this many steps were shown
    #[arg(long)]
    pub cancel_after: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            start: None,
            end: None,
            algorithm: "bfs".to_string(),
            num_walls: 0,
            num_negative: 0,
            wall_column: None,
            seed: None,
            delay_ms: 50,
            cancel_after: None,
            no_visualization: false,
            quiet: false,
        }
    }
}
