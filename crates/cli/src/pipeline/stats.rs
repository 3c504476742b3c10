//! Replay statistics.

use std::time::Duration;

use contracts::RobotState;
use dispatcher::DispatchSummary;

/// Statistics from a replay run
#[derive(Debug, Clone)]
pub struct ReplayStats {
    /// Wall-clock duration of the replay
    pub duration: Duration,

    /// Estimator state after the last record
    pub final_state: RobotState,

    /// Dispatcher counters
    pub summary: DispatchSummary,
}

impl ReplayStats {
    /// Lines processed per second of wall-clock time
    pub fn lines_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.summary.lines_read as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("{}", self.final_state);
        self.summary.print_summary();
        println!(
            "Duration: {:.3}s ({:.0} lines/s)",
            self.duration.as_secs_f64(),
            self.lines_per_sec()
        );
        println!();
    }
}
