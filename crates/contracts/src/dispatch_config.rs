//! Dispatch configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

/// Temporal gate thresholds (seconds)
///
/// Propagation is admitted iff `dt_min < dt < dt_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Lower exclusive bound; rejects repeated and out-of-order samples
    pub dt_min: f64,
    /// Upper exclusive bound; rejects logging gaps
    pub dt_max: f64,
}

impl GateConfig {
    pub const DEFAULT_DT_MIN: f64 = 1e-6;
    pub const DEFAULT_DT_MAX: f64 = 1.0;
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            dt_min: Self::DEFAULT_DT_MIN,
            dt_max: Self::DEFAULT_DT_MAX,
        }
    }
}

/// Dispatcher configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Abort on the first malformed line instead of skipping it
    #[serde(default)]
    pub strict: bool,

    /// Temporal gate thresholds
    #[serde(default)]
    pub gate: GateConfig,
}

impl DispatchConfig {
    pub fn strict(gate: GateConfig) -> Self {
        Self { strict: true, gate }
    }
}
