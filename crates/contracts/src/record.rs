//! Measurement records - Ingestion output
//!
//! Typed form of one log line. Every record is transient: built, dispatched, dropped.

use std::fmt;

use nalgebra::{Matrix3, Matrix4, Matrix6, Vector3};
use serde::{Deserialize, Serialize};

/// Record type tag (token 0 of a log line)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    Imu,
    Contact,
    Kinematic,
}

impl RecordKind {
    /// All known record kinds, in tag order
    pub const ALL: [RecordKind; 3] = [RecordKind::Imu, RecordKind::Contact, RecordKind::Kinematic];

    /// Resolve a tag token, `None` for anything unrecognized
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "IMU" => Some(Self::Imu),
            "CONTACT" => Some(Self::Contact),
            "KINEMATIC" => Some(Self::Kinematic),
            _ => None,
        }
    }

    /// Tag as written in the log
    pub fn as_tag(&self) -> &'static str {
        match self {
            Self::Imu => "IMU",
            Self::Contact => "CONTACT",
            Self::Kinematic => "KINEMATIC",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// Inertial sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImuSample {
    /// Log timestamp (seconds)
    pub timestamp: f64,

    /// Gyroscope reading (rad/s)
    pub angular_velocity: Vector3<f64>,

    /// Accelerometer reading (m/s²)
    pub linear_acceleration: Vector3<f64>,
}

impl ImuSample {
    /// Sample with both vectors zeroed
    pub fn zero(timestamp: f64) -> Self {
        Self {
            timestamp,
            angular_velocity: Vector3::zeros(),
            linear_acceleration: Vector3::zeros(),
        }
    }
}

impl Default for ImuSample {
    fn default() -> Self {
        Self::zero(0.0)
    }
}

/// Contact indicator for one leg
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactPair {
    pub leg_id: i32,
    pub in_contact: bool,
}

impl ContactPair {
    pub fn new(leg_id: i32, in_contact: bool) -> Self {
        Self { leg_id, in_contact }
    }
}

/// Full contact indicator set reported at one timestamp
///
/// Replaces, never merges with, any previously reported set.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactSet {
    pub timestamp: f64,
    pub contacts: Vec<ContactPair>,
}

/// One observed body inside a kinematic record
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicMeasurement {
    /// Observed body (end-effector) id
    pub body_id: i32,

    /// Homogeneous rigid transform, rotation from a unit quaternion
    pub pose: Matrix4<f64>,

    /// 6x6 covariance, filled row-major from the log
    pub covariance: Matrix6<f64>,
}

impl KinematicMeasurement {
    /// Rotation block of the pose
    pub fn rotation(&self) -> Matrix3<f64> {
        self.pose.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Translation block of the pose
    pub fn translation(&self) -> Vector3<f64> {
        self.pose.fixed_view::<3, 1>(0, 3).into_owned()
    }
}

/// Kinematic observation: every body reported on one log line, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicObservation {
    pub timestamp: f64,
    pub measurements: Vec<KinematicMeasurement>,
}

/// Parsed log line
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Imu(ImuSample),
    Contact(ContactSet),
    Kinematic(KinematicObservation),
    /// Tag matched none of the known kinds (blank lines carry an empty tag)
    Unknown { tag: String },
}

impl Record {
    /// Kind of the record, `None` for unknown
    pub fn kind(&self) -> Option<RecordKind> {
        match self {
            Self::Imu(_) => Some(RecordKind::Imu),
            Self::Contact(_) => Some(RecordKind::Contact),
            Self::Kinematic(_) => Some(RecordKind::Kinematic),
            Self::Unknown { .. } => None,
        }
    }

    /// Timestamp of the record, `None` for unknown
    pub fn timestamp(&self) -> Option<f64> {
        match self {
            Self::Imu(sample) => Some(sample.timestamp),
            Self::Contact(set) => Some(set.timestamp),
            Self::Kinematic(obs) => Some(obs.timestamp),
            Self::Unknown { .. } => None,
        }
    }
}
