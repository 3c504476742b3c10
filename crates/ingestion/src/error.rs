//! Ingestion 错误类型

use contracts::RecordKind;
use thiserror::Error;

/// Ingestion 错误
///
/// 全部是单行级别的错误：由调度器决定跳过该行还是终止回放。
#[derive(Debug, Error)]
pub enum IngestionError {
    /// 字段数量与记录类型要求不符
    #[error("malformed {kind} record: expected {expected}, found {found} payload tokens")]
    MalformedRecord {
        /// 记录类型
        kind: RecordKind,
        /// 实际载荷 token 数 (不含 tag 与时间戳)
        found: usize,
        /// 期望的字段数规则
        expected: &'static str,
    },

    /// 数值字段无法解析
    #[error("{kind} record field '{field}' is not numeric: '{token}'")]
    NumericParse {
        /// 记录类型
        kind: RecordKind,
        /// 字段名
        field: &'static str,
        /// 原始 token
        token: String,
    },

    /// 四元数范数为零或非有限值，无法归一化
    #[error("KINEMATIC body {body_id} quaternion cannot be normalized")]
    DegenerateQuaternion {
        /// 观测体 ID
        body_id: i32,
    },

    /// 该行不是合法 UTF-8 (单行错误，可跳过)
    #[error("line is not valid UTF-8 ({len} bytes)")]
    InvalidEncoding {
        /// 原始字节数
        len: usize,
    },

    /// 读取日志失败
    #[error("failed to read measurement log: {0}")]
    Read(#[from] std::io::Error),
}

impl IngestionError {
    /// 创建字段数错误
    pub fn malformed(kind: RecordKind, found: usize, expected: &'static str) -> Self {
        Self::MalformedRecord {
            kind,
            found,
            expected,
        }
    }

    /// 创建数值解析错误
    pub fn numeric(kind: RecordKind, field: &'static str, token: impl Into<String>) -> Self {
        Self::NumericParse {
            kind,
            field,
            token: token.into(),
        }
    }

    /// 短标签，用于日志与指标
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MalformedRecord { .. } => "malformed",
            Self::NumericParse { .. } => "numeric",
            Self::DegenerateQuaternion { .. } => "degenerate_quaternion",
            Self::InvalidEncoding { .. } => "encoding",
            Self::Read(_) => "read",
        }
    }

    /// 出错的记录类型 (编码与读取错误没有)
    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            Self::MalformedRecord { kind, .. } | Self::NumericParse { kind, .. } => Some(*kind),
            Self::DegenerateQuaternion { .. } => Some(RecordKind::Kinematic),
            Self::InvalidEncoding { .. } | Self::Read(_) => None,
        }
    }

    /// 是否为输入流本身的故障 (无论 strict 与否都终止回放)
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

/// Ingestion Result 类型别名
pub type Result<T> = std::result::Result<T, IngestionError>;
