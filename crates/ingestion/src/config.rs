//! Parser metrics

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::RecordKind;

/// Ingestion metrics
#[derive(Debug, Default)]
pub struct IngestionMetrics {
    /// IMU records parsed
    pub imu_records: AtomicU64,

    /// CONTACT records parsed
    pub contact_records: AtomicU64,

    /// KINEMATIC records parsed
    pub kinematic_records: AtomicU64,

    /// Unrecognized tags and blank lines
    pub unknown_records: AtomicU64,

    /// Parse error count
    pub parse_errors: AtomicU64,
}

impl IngestionMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully parsed record
    pub fn record_parsed(&self, kind: RecordKind) {
        let counter = match kind {
            RecordKind::Imu => &self.imu_records,
            RecordKind::Contact => &self.contact_records,
            RecordKind::Kinematic => &self.kinematic_records,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Record unknown record
    pub fn record_unknown(&self) {
        self.unknown_records.fetch_add(1, Ordering::Relaxed);
    }

    /// Record parse error
    pub fn record_parse_error(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            imu_records: self.imu_records.load(Ordering::Relaxed),
            contact_records: self.contact_records.load(Ordering::Relaxed),
            kinematic_records: self.kinematic_records.load(Ordering::Relaxed),
            unknown_records: self.unknown_records.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub imu_records: u64,
    pub contact_records: u64,
    pub kinematic_records: u64,
    pub unknown_records: u64,
    pub parse_errors: u64,
}

impl MetricsSnapshot {
    /// Records of a known kind
    pub fn parsed_total(&self) -> u64 {
        self.imu_records + self.contact_records + self.kinematic_records
    }
}
