//! # Ingestion
//!
//! Measurement log ingestion module.
//!
//! Responsibilities:
//! - Read the log line by line (`LineSource`)
//! - Parse each line into a typed `Record` (`RecordParser`)
//! - Rebuild kinematic poses and covariances (`kinematics`)
//! - Report arity and numeric violations as per-line `IngestionError`s
//!
//! ## Usage Example
//!
//! ```no_run
//! use ingestion::{LineSource, RecordParser};
//! use std::path::Path;
//!
//! let parser = RecordParser::new();
//! for (line_no, line) in LineSource::open(Path::new("measurements.txt")).unwrap() {
//!     match parser.parse(&line.unwrap()) {
//!         Ok(record) => println!("{line_no}: {:?}", record.kind()),
//!         Err(e) => eprintln!("{line_no}: {e}"),
//!     }
//! }
//! ```

mod adapter;
pub mod adapters;
mod config;
mod error;
pub mod kinematics;
mod parser;
mod source;

// Re-exports
pub use adapter::RecordAdapter;
pub use adapters::{
    ContactAdapter, ImuAdapter, KinematicAdapter, CONTACT_PAIR_LEN, IMU_PAYLOAD_LEN,
    KINEMATIC_ENTRY_LEN,
};
pub use config::{IngestionMetrics, MetricsSnapshot};
pub use contracts::Record;
pub use error::{IngestionError, Result};
pub use parser::{parse_line, RecordParser};
pub use source::LineSource;
