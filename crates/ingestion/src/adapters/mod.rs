//! 记录适配器模块
//!
//! 每个适配器负责将一种记录类型的 token 转换为 `Record`。

pub mod common;
mod contact;
mod imu;
mod kinematic;

pub use contact::{ContactAdapter, CONTACT_PAIR_LEN};
pub use imu::{ImuAdapter, IMU_PAYLOAD_LEN};
pub use kinematic::{KinematicAdapter, KINEMATIC_ENTRY_LEN};

use contracts::RecordKind;

use crate::adapter::RecordAdapter;

/// 按记录类型选择适配器
pub fn adapter_for(kind: RecordKind) -> &'static dyn RecordAdapter {
    match kind {
        RecordKind::Imu => &ImuAdapter,
        RecordKind::Contact => &ContactAdapter,
        RecordKind::Kinematic => &KinematicAdapter,
    }
}
