//! Record parser
//!
//! Splits one log line on whitespace, picks the adapter from token 0,
//! checks the payload arity, then builds the typed record.

use contracts::{Record, RecordKind};
use tracing::trace;

use crate::adapters::adapter_for;
use crate::adapters::common::parse_f64;
use crate::config::{IngestionMetrics, MetricsSnapshot};
use crate::error::{IngestionError, Result};

/// Tag and timestamp precede the payload
const HEADER_LEN: usize = 2;

/// Parse one log line into a record
///
/// Pure: no logging, no counters. Unrecognized tags and blank lines yield
/// `Record::Unknown`.
pub fn parse_line(line: &str) -> Result<Record> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let Some(&tag) = tokens.first() else {
        return Ok(Record::Unknown { tag: String::new() });
    };
    let Some(kind) = RecordKind::from_tag(tag) else {
        return Ok(Record::Unknown {
            tag: tag.to_string(),
        });
    };
    if tokens.len() < HEADER_LEN {
        return Err(IngestionError::malformed(kind, 0, "a timestamp token"));
    }

    let adapter = adapter_for(kind);
    let payload = &tokens[HEADER_LEN..];
    if !adapter.accepts(payload.len()) {
        return Err(IngestionError::malformed(
            kind,
            payload.len(),
            adapter.arity(),
        ));
    }

    let timestamp = parse_f64(kind, "timestamp", tokens[1])?;
    adapter.build(timestamp, payload)
}

/// Record parser with counters
#[derive(Debug, Default)]
pub struct RecordParser {
    metrics: IngestionMetrics,
}

impl RecordParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one line, updating counters
    pub fn parse(&self, line: &str) -> Result<Record> {
        let result = parse_line(line);

        match &result {
            Ok(Record::Unknown { tag }) => {
                self.metrics.record_unknown();
                trace!(tag = %tag, "unrecognized record");
            }
            Ok(record) => {
                if let Some(kind) = record.kind() {
                    self.metrics.record_parsed(kind);
                    metrics::counter!("legged_replay_records_parsed_total", "kind" => kind.as_tag())
                        .increment(1);
                }
            }
            Err(e) => {
                self.metrics.record_parse_error();
                metrics::counter!(
                    "legged_replay_records_rejected_total",
                    "kind" => e.kind().map_or("unknown", |k| k.as_tag()),
                    "reason" => e.reason()
                )
                .increment(1);
            }
        }

        result
    }

    /// Counter snapshot
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
