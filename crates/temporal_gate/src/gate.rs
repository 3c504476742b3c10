//! Admission rule for state propagation.

use std::fmt;

use tracing::trace;

use crate::GateConfig;

/// Outcome of a gate evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// `dt_min < dt < dt_max`
    Admit,
    /// `dt <= dt_min`: repeated or out-of-order timestamp
    TooShort,
    /// `dt >= dt_max`: gap in the log
    TooLong,
    /// `dt` is NaN
    NotFinite,
}

impl GateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit)
    }

    /// Short label for logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admit => "admit",
            Self::TooShort => "too_short",
            Self::TooLong => "too_long",
            Self::NotFinite => "not_finite",
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Temporal gate with configurable thresholds
#[derive(Debug, Clone, Copy, Default)]
pub struct TemporalGate {
    config: GateConfig,
}

impl TemporalGate {
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    /// Classify `dt` (seconds)
    pub fn evaluate(&self, dt: f64) -> GateDecision {
        let decision = if dt.is_nan() {
            GateDecision::NotFinite
        } else if dt <= self.config.dt_min {
            GateDecision::TooShort
        } else if dt >= self.config.dt_max {
            GateDecision::TooLong
        } else {
            GateDecision::Admit
        };

        trace!(dt, decision = %decision, "temporal gate");
        decision
    }

    /// Whether propagation over `dt` is admitted
    pub fn admits(&self, dt: f64) -> bool {
        self.evaluate(dt).is_admitted()
    }

    /// Gate the interval between two timestamps
    pub fn evaluate_between(&self, previous: f64, current: f64) -> (f64, GateDecision) {
        let dt = current - previous;
        (dt, self.evaluate(dt))
    }
}
