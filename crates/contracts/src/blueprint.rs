//! ReplayBlueprint - Config Loader 输出
//!
//! 描述一次回放的完整配置：输入日志、分发策略、初始状态、噪声参数。

use std::path::PathBuf;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{DispatchConfig, NoiseParams, RobotState};

/// 配置版本
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// 完整的回放配置蓝图
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayBlueprint {
    /// 配置版本
    #[serde(default)]
    pub version: ConfigVersion,

    /// 输入日志
    pub input: InputConfig,

    /// 分发策略 (strict 模式 + 时间门限)
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// 初始状态均值
    #[serde(default)]
    pub initial_state: InitialStateConfig,

    /// 噪声标准差
    #[serde(default)]
    pub noise: NoiseParams,
}

/// 输入日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// 测量日志路径 (每行一条记录)
    pub path: PathBuf,
}

/// 初始状态配置 (行优先的普通数组，便于 TOML/JSON 书写)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialStateConfig {
    /// 初始姿态 (行优先 3x3)
    #[serde(default = "default_rotation")]
    pub rotation: [[f64; 3]; 3],

    /// 初始速度
    #[serde(default)]
    pub velocity: [f64; 3],

    /// 初始位置
    #[serde(default)]
    pub position: [f64; 3],

    /// 陀螺仪零偏
    #[serde(default)]
    pub gyroscope_bias: [f64; 3],

    /// 加速度计零偏
    #[serde(default)]
    pub accelerometer_bias: [f64; 3],
}

/// IMU 坐标系绕 x 轴旋转 90 度
fn default_rotation() -> [[f64; 3]; 3] {
    [[1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]]
}

impl Default for InitialStateConfig {
    fn default() -> Self {
        Self {
            rotation: default_rotation(),
            velocity: [0.0; 3],
            position: [0.0; 3],
            gyroscope_bias: [0.0; 3],
            accelerometer_bias: [0.0; 3],
        }
    }
}

impl InitialStateConfig {
    /// 姿态矩阵
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        let r = &self.rotation;
        Matrix3::new(
            r[0][0], r[0][1], r[0][2], //
            r[1][0], r[1][1], r[1][2], //
            r[2][0], r[2][1], r[2][2],
        )
    }

    /// 所有向量字段 (字段名, 值)
    pub fn vectors(&self) -> [(&'static str, [f64; 3]); 4] {
        [
            ("velocity", self.velocity),
            ("position", self.position),
            ("gyroscope_bias", self.gyroscope_bias),
            ("accelerometer_bias", self.accelerometer_bias),
        ]
    }
}

impl From<&InitialStateConfig> for RobotState {
    fn from(config: &InitialStateConfig) -> Self {
        Self {
            rotation: config.rotation_matrix(),
            velocity: Vector3::from(config.velocity),
            position: Vector3::from(config.position),
            gyroscope_bias: Vector3::from(config.gyroscope_bias),
            accelerometer_bias: Vector3::from(config.accelerometer_bias),
        }
    }
}

impl ReplayBlueprint {
    /// 根据配置构造初始状态
    pub fn initial_robot_state(&self) -> RobotState {
        RobotState::from(&self.initial_state)
    }
}
