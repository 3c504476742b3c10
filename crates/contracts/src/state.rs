//! Estimator state and noise parameters
//!
//! Only the reporting surface lives here; how an estimator evolves these
//! values is its own business.

use std::fmt;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// Robot state mean as exposed by an estimator
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState {
    /// Body orientation in the world frame
    pub rotation: Matrix3<f64>,
    /// Body velocity in the world frame (m/s)
    pub velocity: Vector3<f64>,
    /// Body position in the world frame (m)
    pub position: Vector3<f64>,
    /// Gyroscope bias (rad/s)
    pub gyroscope_bias: Vector3<f64>,
    /// Accelerometer bias (m/s²)
    pub accelerometer_bias: Vector3<f64>,
}

impl Default for RobotState {
    fn default() -> Self {
        Self {
            rotation: Matrix3::identity(),
            velocity: Vector3::zeros(),
            position: Vector3::zeros(),
            gyroscope_bias: Vector3::zeros(),
            accelerometer_bias: Vector3::zeros(),
        }
    }
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--------- Robot State -------------")?;
        write!(f, "Rotation:{}", self.rotation)?;
        writeln!(f, "Velocity: {}", fmt_vector(&self.velocity))?;
        writeln!(f, "Position: {}", fmt_vector(&self.position))?;
        writeln!(f, "Gyroscope Bias: {}", fmt_vector(&self.gyroscope_bias))?;
        writeln!(
            f,
            "Accelerometer Bias: {}",
            fmt_vector(&self.accelerometer_bias)
        )?;
        write!(f, "-----------------------------------")
    }
}

/// Sensor noise standard deviations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Gyroscope white noise (rad/s)
    pub gyroscope: f64,
    /// Accelerometer white noise (m/s²)
    pub accelerometer: f64,
    /// Gyroscope bias random walk
    pub gyroscope_bias: f64,
    /// Accelerometer bias random walk
    pub accelerometer_bias: f64,
    /// Foot contact velocity noise (m/s)
    pub contact: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            gyroscope: 0.01,
            accelerometer: 0.1,
            gyroscope_bias: 0.00001,
            accelerometer_bias: 0.0001,
            contact: 0.01,
        }
    }
}

impl NoiseParams {
    pub fn gyroscope_cov(&self) -> Matrix3<f64> {
        isotropic(self.gyroscope)
    }

    pub fn accelerometer_cov(&self) -> Matrix3<f64> {
        isotropic(self.accelerometer)
    }

    pub fn gyroscope_bias_cov(&self) -> Matrix3<f64> {
        isotropic(self.gyroscope_bias)
    }

    pub fn accelerometer_bias_cov(&self) -> Matrix3<f64> {
        isotropic(self.accelerometer_bias)
    }

    pub fn contact_cov(&self) -> Matrix3<f64> {
        isotropic(self.contact)
    }

    /// All values paired with their config field names
    pub fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("gyroscope", self.gyroscope),
            ("accelerometer", self.accelerometer),
            ("gyroscope_bias", self.gyroscope_bias),
            ("accelerometer_bias", self.accelerometer_bias),
            ("contact", self.contact),
        ]
    }
}

impl fmt::Display for NoiseParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--------- Noise Params -------------")?;
        writeln!(f, "Gyroscope Covariance:{}", self.gyroscope_cov())?;
        writeln!(f, "Accelerometer Covariance:{}", self.accelerometer_cov())?;
        writeln!(f, "Gyroscope Bias Covariance:{}", self.gyroscope_bias_cov())?;
        writeln!(
            f,
            "Accelerometer Bias Covariance:{}",
            self.accelerometer_bias_cov()
        )?;
        writeln!(f, "Contact Covariance:{}", self.contact_cov())?;
        write!(f, "-----------------------------------")
    }
}

/// σ² I₃
fn isotropic(std_dev: f64) -> Matrix3<f64> {
    Matrix3::identity() * (std_dev * std_dev)
}

fn fmt_vector(v: &Vector3<f64>) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}
