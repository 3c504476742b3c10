//! # Dispatcher
//!
//! 测量分发模块。
//!
//! 负责：
//! - 逐行读取测量日志并解析
//! - 时间门限控制 IMU 传播 (延迟一步使用上一帧 IMU)
//! - 接触集整体替换转发
//! - 运动学观测校正
//! - 按 strict 配置决定坏行是跳过还是终止

pub mod contact;
pub mod dispatcher;
pub mod error;
pub mod estimators;
pub mod metrics;

pub use contracts::{DispatchConfig, StateEstimator};
pub use contact::ContactTracker;
pub use dispatcher::{create_dispatcher, DispatchOutcome, Dispatcher};
pub use error::DispatcherError;
pub use estimators::{EstimatorCall, LogEstimator, RecordingEstimator};
pub use metrics::DispatchSummary;
