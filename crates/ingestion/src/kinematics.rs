//! Kinematic observation builder
//!
//! Rebuilds one observed body from its 44-token entry:
//!
//! | offset | tokens | content                         |
//! |--------|--------|---------------------------------|
//! | 0      | 1      | body id                         |
//! | 1      | 4      | quaternion `w x y z`            |
//! | 5      | 3      | position `x y z`                |
//! | 8      | 36     | covariance, row-major 6x6       |

use contracts::{KinematicMeasurement, RecordKind};
use nalgebra::{Isometry3, Matrix4, Matrix6, Quaternion, Translation3, UnitQuaternion, Vector3};

use crate::adapters::common::{parse_array, parse_id};
use crate::error::{IngestionError, Result};

const QUATERNION_OFFSET: usize = 1;
const POSITION_OFFSET: usize = 5;
const COVARIANCE_OFFSET: usize = 8;
const COVARIANCE_LEN: usize = 36;

const QUATERNION_FIELDS: [&str; 4] = ["qw", "qx", "qy", "qz"];
const POSITION_FIELDS: [&str; 3] = ["px", "py", "pz"];
const COVARIANCE_FIELDS: [&str; COVARIANCE_LEN] = ["covariance"; COVARIANCE_LEN];

/// Build one measurement from a 44-token entry
pub fn build_measurement(entry: &[&str]) -> Result<KinematicMeasurement> {
    let kind = RecordKind::Kinematic;
    let body_id = parse_id(kind, "body_id", entry[0])?;

    let [w, x, y, z] = parse_array(kind, &QUATERNION_FIELDS, &entry[QUATERNION_OFFSET..])?;
    let position = Vector3::from(parse_array(kind, &POSITION_FIELDS, &entry[POSITION_OFFSET..])?);
    let covariance = parse_array(kind, &COVARIANCE_FIELDS, &entry[COVARIANCE_OFFSET..])?;

    let rotation = normalize_quaternion(Quaternion::new(w, x, y, z))
        .ok_or(IngestionError::DegenerateQuaternion { body_id })?;

    Ok(KinematicMeasurement {
        body_id,
        pose: homogeneous_pose(&rotation, &position),
        covariance: covariance_from_row_major(&covariance),
    })
}

/// Normalize to unit length, `None` when the norm is zero or not finite
///
/// Scaled by the largest component first so tiny and huge inputs neither
/// underflow nor overflow.
pub fn normalize_quaternion(q: Quaternion<f64>) -> Option<UnitQuaternion<f64>> {
    if q.coords.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let largest = q.coords.amax();
    if largest == 0.0 {
        return None;
    }
    let scaled = q.coords / largest;
    let norm = scaled.norm();
    Some(UnitQuaternion::new_unchecked(Quaternion::from(scaled / norm)))
}

/// Rotation in the top-left 3x3 block, translation in the top-right column,
/// `[0 0 0 1]` bottom row.
pub fn homogeneous_pose(rotation: &UnitQuaternion<f64>, position: &Vector3<f64>) -> Matrix4<f64> {
    Isometry3::from_parts(Translation3::from(*position), *rotation).to_homogeneous()
}

/// Value `j * 6 + k` lands at row `j`, column `k`
pub fn covariance_from_row_major(values: &[f64; COVARIANCE_LEN]) -> Matrix6<f64> {
    Matrix6::from_row_slice(values)
}
