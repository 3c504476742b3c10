//! Run summary for observability

use ingestion::MetricsSnapshot as ParserSnapshot;
use observability::MetricsSummary;

/// Summary of one dispatch run (for reporting)
#[derive(Debug, Clone, Default)]
pub struct DispatchSummary {
    /// Lines consumed from the log
    pub lines_read: usize,
    /// Parser counters
    pub parser: ParserSnapshot,
    /// Dispatch counters and propagation dt statistics
    pub dispatch: MetricsSummary,
}

impl DispatchSummary {
    /// Lines dropped because they failed to parse
    pub fn skipped(&self) -> u64 {
        self.dispatch.skipped
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Replay Summary ===\n");
        println!("Lines read: {}", self.lines_read);
        println!(
            "Records: IMU {} / CONTACT {} / KINEMATIC {} / unknown {}",
            self.parser.imu_records,
            self.parser.contact_records,
            self.parser.kinematic_records,
            self.parser.unknown_records
        );
        println!();
        print!("{}", self.dispatch);
        println!();
    }
}
