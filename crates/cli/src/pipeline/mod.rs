//! Replay orchestration module.

mod orchestrator;
mod stats;

pub use orchestrator::{Replay, ReplayConfig};
pub use stats::ReplayStats;
