//! 回放指标收集模块
//!
//! 调度器每处理一条记录调用一次：既写入 `metrics` 门面，也写入内存聚合器。

use std::collections::BTreeMap;

use contracts::RecordKind;
use metrics::{counter, histogram};

/// 记录一次传播门限判定
///
/// `decision` 为门限标签 (`admit` / `too_short` / `too_long` / `not_finite`)。
pub fn record_propagation(decision: &'static str, dt: f64) {
    counter!("legged_replay_propagations_total", "decision" => decision).increment(1);
    if decision == "admit" {
        histogram!("legged_replay_propagation_dt_seconds").record(dt);
    }
}

/// 记录接触集转发
pub fn record_contacts_forwarded(count: usize) {
    counter!("legged_replay_contact_updates_total").increment(1);
    histogram!("legged_replay_contacts_per_update").record(count as f64);
}

/// 记录运动学校正
pub fn record_kinematic_correction(count: usize) {
    counter!("legged_replay_kinematic_corrections_total").increment(1);
    histogram!("legged_replay_bodies_per_correction").record(count as f64);
}

/// 记录被跳过的行
pub fn record_line_skipped(kind: Option<RecordKind>, reason: &'static str) {
    counter!(
        "legged_replay_lines_skipped_total",
        "kind" => kind.map_or("unknown", |k| k.as_tag()),
        "reason" => reason
    )
    .increment(1);
}

/// 回放指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct DispatchMetricsAggregator {
    /// 处理的行数
    pub lines: u64,

    /// 允许的传播次数
    pub propagations: u64,

    /// 各原因的门限拒绝次数
    pub gate_rejections: BTreeMap<&'static str, u64>,

    /// 接触集转发次数
    pub contact_updates: u64,

    /// 运动学校正次数
    pub kinematic_corrections: u64,

    /// 校正中的观测体总数
    pub kinematic_bodies: u64,

    /// 忽略的记录 (未知类型/空行)
    pub ignored: u64,

    /// 各原因跳过的行数
    pub skipped: BTreeMap<&'static str, u64>,

    /// 允许传播的 dt 统计 (秒)
    pub dt_stats: RunningStats,
}

impl DispatchMetricsAggregator {
    /// 创建新的聚合器
    pub fn new() -> Self {
        Self::default()
    }

    /// 传播门限判定
    pub fn record_propagation(&mut self, decision: &'static str, dt: f64) {
        self.lines += 1;
        if decision == "admit" {
            self.propagations += 1;
            self.dt_stats.push(dt);
        } else {
            *self.gate_rejections.entry(decision).or_insert(0) += 1;
        }
    }

    /// 接触集转发
    pub fn record_contacts(&mut self) {
        self.lines += 1;
        self.contact_updates += 1;
    }

    /// 运动学校正
    pub fn record_kinematics(&mut self, bodies: usize) {
        self.lines += 1;
        self.kinematic_corrections += 1;
        self.kinematic_bodies += bodies as u64;
    }

    /// 忽略的记录
    pub fn record_ignored(&mut self) {
        self.lines += 1;
        self.ignored += 1;
    }

    /// 跳过的行
    pub fn record_skipped(&mut self, reason: &'static str) {
        self.lines += 1;
        *self.skipped.entry(reason).or_insert(0) += 1;
    }

    /// 生成摘要报告
    pub fn summary(&self) -> MetricsSummary {
        let rejected: u64 = self.gate_rejections.values().sum();
        let imu_total = self.propagations + rejected;
        MetricsSummary {
            lines: self.lines,
            propagations: self.propagations,
            gate_rejected: rejected,
            rejection_rate: if imu_total > 0 {
                rejected as f64 / imu_total as f64 * 100.0
            } else {
                0.0
            },
            gate_rejections: self.gate_rejections.clone(),
            contact_updates: self.contact_updates,
            kinematic_corrections: self.kinematic_corrections,
            kinematic_bodies: self.kinematic_bodies,
            ignored: self.ignored,
            skipped: self.skipped.values().sum(),
            skipped_by_reason: self.skipped.clone(),
            dt_ms: StatsSummary::from(&self.dt_stats).scaled(1000.0),
        }
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub lines: u64,
    pub propagations: u64,
    pub gate_rejected: u64,
    pub rejection_rate: f64,
    pub gate_rejections: BTreeMap<&'static str, u64>,
    pub contact_updates: u64,
    pub kinematic_corrections: u64,
    pub kinematic_bodies: u64,
    pub ignored: u64,
    pub skipped: u64,
    pub skipped_by_reason: BTreeMap<&'static str, u64>,
    pub dt_ms: StatsSummary,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Replay Metrics Summary ===")?;
        writeln!(f, "Lines: {}", self.lines)?;
        writeln!(f, "Propagations: {}", self.propagations)?;
        writeln!(
            f,
            "Gate rejections: {} ({:.2}%)",
            self.gate_rejected, self.rejection_rate
        )?;
        for (reason, count) in &self.gate_rejections {
            writeln!(f, "  {}: {}", reason, count)?;
        }
        writeln!(f, "Contact updates: {}", self.contact_updates)?;
        writeln!(
            f,
            "Kinematic corrections: {} ({} bodies)",
            self.kinematic_corrections, self.kinematic_bodies
        )?;
        writeln!(f, "Ignored records: {}", self.ignored)?;
        writeln!(f, "Skipped lines: {}", self.skipped)?;
        for (reason, count) in &self.skipped_by_reason {
            writeln!(f, "  {}: {}", reason, count)?;
        }
        writeln!(f, "Propagation dt (ms): {}", self.dt_ms)?;

        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl StatsSummary {
    /// 单位换算 (如 秒 -> 毫秒)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            count: self.count,
            min: self.min * factor,
            max: self.max * factor,
            mean: self.mean * factor,
            std_dev: self.std_dev * factor,
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计计算器 (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// 添加新值
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// 样本数量
    pub fn count(&self) -> u64 {
        self.count
    }

    /// 均值
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// 方差
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    /// 标准差
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// 最小值
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 最大值
    pub fn max(&self) -> f64 {
        self.max
    }
}
