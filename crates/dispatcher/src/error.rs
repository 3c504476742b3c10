//! Dispatcher error types

use ingestion::IngestionError;
use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// A log line could not be read or parsed
    #[error("line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: IngestionError,
    },

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DispatcherError {
    /// Create a per-line error
    pub fn record(line: usize, source: IngestionError) -> Self {
        Self::Record { line, source }
    }

    /// Line number of a per-line error
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Record { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
