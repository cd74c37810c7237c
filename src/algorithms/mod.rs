pub mod bellman_ford;
pub mod bfs;
pub mod common;
pub mod dijkstra;
pub mod floyd_warshall;
pub mod path;

pub use common::{Algorithm, PathfindingAlgorithm, RunResult, StepPacing, StepSink};
