//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Every record carries the log timestamp (seconds, f64) as its only clock
//! - Records are consumed in file order; nothing here reorders them

mod blueprint;
mod dispatch_config;
mod error;
mod estimator;
mod record;
mod state;

pub use blueprint::*;
pub use dispatch_config::*;
pub use error::*;
pub use estimator::StateEstimator;
pub use record::*;
pub use state::*;
