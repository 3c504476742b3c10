//! KINEMATIC 记录适配器

use contracts::{KinematicObservation, Record};

use crate::adapter::RecordAdapter;
use crate::error::Result;
use crate::kinematics::build_measurement;

/// 每个观测体的字段数：id 1 + 四元数 4 + 位置 3 + 协方差 36
pub const KINEMATIC_ENTRY_LEN: usize = 44;

/// KINEMATIC 记录适配器
pub struct KinematicAdapter;

impl RecordAdapter for KinematicAdapter {
    fn arity(&self) -> &'static str {
        "a multiple of 44"
    }

    fn accepts(&self, payload_len: usize) -> bool {
        payload_len % KINEMATIC_ENTRY_LEN == 0
    }

    fn build(&self, timestamp: f64, payload: &[&str]) -> Result<Record> {
        let measurements = payload
            .chunks_exact(KINEMATIC_ENTRY_LEN)
            .map(build_measurement)
            .collect::<Result<Vec<_>>>()?;

        Ok(Record::Kinematic(KinematicObservation {
            timestamp,
            measurements,
        }))
    }
}
