//! 记录适配器 trait

use contracts::Record;

use crate::error::Result;

/// 记录适配器 trait
///
/// 为每类记录实现此 trait，负责：
/// 1. 校验载荷字段数
/// 2. 解析数值字段
/// 3. 封装为 `Record`
pub trait RecordAdapter: Send + Sync {
    /// 字段数规则的描述 (用于错误信息)
    fn arity(&self) -> &'static str;

    /// 载荷字段数是否合法
    fn accepts(&self, payload_len: usize) -> bool;

    /// 从已通过字段数校验的载荷构建记录
    ///
    /// # Arguments
    /// * `timestamp` - 已解析的记录时间戳
    /// * `payload` - tag 与时间戳之后的 token
    fn build(&self, timestamp: f64, payload: &[&str]) -> Result<Record>;
}
