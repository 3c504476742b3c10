//! IMU 记录适配器

use contracts::{ImuSample, Record, RecordKind};
use nalgebra::Vector3;

use super::common::parse_array;
use crate::adapter::RecordAdapter;
use crate::error::Result;

/// IMU 载荷字段数：角速度 3 + 线加速度 3
pub const IMU_PAYLOAD_LEN: usize = 6;

const FIELDS: [&str; IMU_PAYLOAD_LEN] = ["wx", "wy", "wz", "ax", "ay", "az"];

/// IMU 记录适配器
pub struct ImuAdapter;

impl RecordAdapter for ImuAdapter {
    fn arity(&self) -> &'static str {
        "exactly 6"
    }

    fn accepts(&self, payload_len: usize) -> bool {
        payload_len == IMU_PAYLOAD_LEN
    }

    fn build(&self, timestamp: f64, payload: &[&str]) -> Result<Record> {
        let v = parse_array(RecordKind::Imu, &FIELDS, payload)?;

        Ok(Record::Imu(ImuSample {
            timestamp,
            angular_velocity: Vector3::new(v[0], v[1], v[2]),
            linear_acceleration: Vector3::new(v[3], v[4], v[5]),
        }))
    }
}
