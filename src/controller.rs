use crate::algorithms::common::{Algorithm, RunResult, StepPacing, StepSink};
use crate::grid::{Grid, Position};
use crate::report::{RunReport, RunStatus};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Presentation side of a run: renders steps, replays the path and shows the
/// final statistics.
pub trait RunObserver {
    fn on_step(&mut self, grid: &Grid, visited_count: usize, pacing: StepPacing);

    fn on_path(&mut self, _grid: &Grid, _path: &[Position]) {}

    fn on_finished(&mut self, _report: &RunReport) {}
}

/// Handle for requesting cancellation of the active run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Owns the run lifecycle. Clones share the same state, so a clone held by
/// an observer sees the run in progress.
#[derive(Debug, Clone, Default)]
pub struct RunController {
    running: Arc<AtomicBool>,
    cancel: CancelToken,
}

/// Puts the controller back to idle however the run ends.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Bridges engine steps to the observer and the cancel flag.
struct ObserverSink<'a> {
    observer: &'a mut dyn RunObserver,
    cancel: &'a CancelToken,
}

impl StepSink for ObserverSink<'_> {
    fn step(&mut self, grid: &Grid, visited_count: usize, pacing: StepPacing) {
        self.observer.on_step(grid, visited_count, pacing);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        if self.running.load(Ordering::SeqCst) {
            RunState::Running
        } else {
            RunState::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn request_cancel(&self) {
        if self.is_running() {
            log::debug!("cancellation requested");
        }
        self.cancel.cancel();
    }

    /// Runs `algorithm` between the grid's Start and End. Returns `None`
    /// without touching the grid when a run is already in progress.
    pub fn run(&self, grid: &mut Grid, algorithm: Algorithm, observer: &mut dyn RunObserver) -> Option<RunReport> {
        if self.running.swap(true, Ordering::SeqCst) {
            log::debug!("ignoring {} run request: a run is already active", algorithm);
            return None;
        }
        let _guard = RunningGuard(&self.running);
        self.cancel.clear();

        grid.snapshot_reset();
        let (start, end) = (grid.start(), grid.end());
        log::debug!("{} run from {} to {}", algorithm, start, end);
        let started = Instant::now();

        let mut engine = algorithm.create();
        let outcome = {
            let mut sink = ObserverSink {
                observer: &mut *observer,
                cancel: &self.cancel,
            };
            panic::catch_unwind(AssertUnwindSafe(|| engine.find_path(grid, start, end, &mut sink)))
        };

        let (status, result) = match outcome {
            Ok(Ok(result)) if self.cancel.is_cancelled() => (RunStatus::Cancelled, result),
            Ok(Ok(result)) if result.path.is_empty() => (RunStatus::NoPath, result),
            Ok(Ok(result)) => {
                match panic::catch_unwind(AssertUnwindSafe(|| observer.on_path(grid, &result.path))) {
                    Ok(()) => (RunStatus::Complete, result),
                    Err(payload) => {
                        log::error!("{} path replay panicked: {}", algorithm, panic_message(payload.as_ref()));
                        (RunStatus::Error, RunResult::unfinished(result.visited_count))
                    }
                }
            }
            Ok(Err(err)) => {
                log::error!("{} failed: {:#}", algorithm, err);
                (RunStatus::Error, RunResult::default())
            }
            Err(payload) => {
                log::error!("{} panicked: {}", algorithm, panic_message(payload.as_ref()));
                (RunStatus::Error, RunResult::default())
            }
        };

        let report = build_report(algorithm, status, result, started.elapsed());
        log::info!(
            "{} finished: {} ({} visited, {} path cells)",
            algorithm,
            report.status,
            report.visited_count,
            report.path.len()
        );
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| observer.on_finished(&report))) {
            log::error!("{} report delivery panicked: {}", algorithm, panic_message(payload.as_ref()));
        }
        Some(report)
    }
}

fn build_report(algorithm: Algorithm, status: RunStatus, result: RunResult, elapsed: Duration) -> RunReport {
    let cancelled = status == RunStatus::Cancelled;
    RunReport {
        algorithm,
        status,
        // A cancelled run keeps its partial trace but never a path.
        path: if cancelled { Vec::new() } else { result.path },
        visited_count: result.visited_count,
        cost: if cancelled { None } else { result.cost },
        elapsed,
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
