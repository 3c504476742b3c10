//! # Temporal Gate
//!
//! 惯性传播的时间门限。
//!
//! 负责：
//! - 根据相邻两条记录的时间差 `dt` 判断是否允许传播
//! - 拒绝重复/乱序时间戳 (`dt <= dt_min`)
//! - 拒绝异常大的时间间隔 (`dt >= dt_max`)
//!
//! 拒绝不是错误：调用方静默跳过传播即可。
//!
//! ## 使用示例
//!
//! ```
//! use temporal_gate::{GateConfig, TemporalGate};
//!
//! let gate = TemporalGate::new(GateConfig::default());
//! assert!(gate.admits(0.1));
//! assert!(!gate.admits(0.0));
//! assert!(!gate.admits(1.0));
//! ```

mod gate;

// Re-exports
pub use contracts::GateConfig;
pub use gate::{GateDecision, TemporalGate};
