use crate::algorithms::common::Algorithm;
use crate::grid::Position;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// A non-empty path was found.
    Complete,
    /// The search was exhausted without reaching End.
    NoPath,
    /// Cancellation was observed before the search finished.
    Cancelled,
    /// The engine failed or panicked.
    Error,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunStatus::Complete => "Complete",
            RunStatus::NoPath => "No Path",
            RunStatus::Cancelled => "Cancelled",
            RunStatus::Error => "Error",
        })
    }
}

/// Final statistics of one run, handed to the presentation side.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub status: RunStatus,
    pub path: Vec<Position>,
    pub visited_count: usize,
    pub cost: Option<i64>,
    /// Wall-clock time of the whole run, path replay included.
    pub elapsed: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Complete
    }

    /// Number of moves along the path.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Algorithm: {}", self.algorithm)?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f, "Nodes visited: {}", self.visited_count)?;
        writeln!(f, "Path length: {}", self.path.len())?;
        match self.cost {
            Some(cost) => writeln!(f, "Path cost: {}", cost)?,
            None => writeln!(f, "Path cost: -")?,
        }
        writeln!(f, "Time taken: {}ms", self.elapsed.as_millis())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_the_stats() {
        let report = RunReport {
            algorithm: Algorithm::Dijkstra,
            status: RunStatus::NoPath,
            path: Vec::new(),
            visited_count: 42,
            cost: None,
            elapsed: Duration::from_millis(7),
        };
        let text = report.to_string();

        assert!(text.contains("Algorithm: dijkstra"));
        assert!(text.contains("Status: No Path"));
        assert!(text.contains("Nodes visited: 42"));
        assert!(text.contains("Path cost: -"));
        assert!(text.contains("Time taken: 7ms"));
        assert!(!report.is_success());
        assert_eq!(report.hops(), 0);
    }
}
