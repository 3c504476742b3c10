//! 配置校验模块
//!
//! 校验规则：
//! - input.path 非空
//! - 时间门限有限且 0 <= dt_min < dt_max
//! - 噪声标准差有限且 >= 0
//! - 初始状态有限，姿态矩阵为旋转矩阵 (正交且 det = +1)

use contracts::{ContractError, ReplayBlueprint};

/// 旋转矩阵校验容差
const ROTATION_TOLERANCE: f64 = 1e-6;

/// 校验 ReplayBlueprint 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(blueprint: &ReplayBlueprint) -> Result<(), ContractError> {
    validate_input(blueprint)?;
    validate_gate(blueprint)?;
    validate_noise(blueprint)?;
    validate_initial_state(blueprint)?;
    Ok(())
}

/// 校验输入路径
fn validate_input(blueprint: &ReplayBlueprint) -> Result<(), ContractError> {
    if blueprint.input.path.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "input.path",
            "input path cannot be empty",
        ));
    }
    Ok(())
}

/// 校验时间门限
fn validate_gate(blueprint: &ReplayBlueprint) -> Result<(), ContractError> {
    let gate = &blueprint.dispatch.gate;

    for (field, value) in [
        ("dispatch.gate.dt_min", gate.dt_min),
        ("dispatch.gate.dt_max", gate.dt_max),
    ] {
        if !value.is_finite() {
            return Err(ContractError::config_validation(
                field,
                format!("must be finite, got {value}"),
            ));
        }
    }

    if gate.dt_min < 0.0 {
        return Err(ContractError::config_validation(
            "dispatch.gate.dt_min",
            format!("dt_min must be >= 0, got {}", gate.dt_min),
        ));
    }

    if gate.dt_min >= gate.dt_max {
        return Err(ContractError::config_validation(
            "dispatch.gate.dt_min / dispatch.gate.dt_max",
            format!(
                "dt_min ({}) must be < dt_max ({})",
                gate.dt_min, gate.dt_max
            ),
        ));
    }

    Ok(())
}

/// 校验噪声参数
fn validate_noise(blueprint: &ReplayBlueprint) -> Result<(), ContractError> {
    for (name, value) in blueprint.noise.named() {
        if !value.is_finite() || value < 0.0 {
            return Err(ContractError::config_validation(
                format!("noise.{name}"),
                format!("standard deviation must be finite and >= 0, got {value}"),
            ));
        }
    }
    Ok(())
}

/// 校验初始状态
fn validate_initial_state(blueprint: &ReplayBlueprint) -> Result<(), ContractError> {
    let initial = &blueprint.initial_state;

    for (name, vector) in initial.vectors() {
        if vector.iter().any(|v| !v.is_finite()) {
            return Err(ContractError::config_validation(
                format!("initial_state.{name}"),
                format!("entries must be finite, got {vector:?}"),
            ));
        }
    }

    let rotation = initial.rotation_matrix();
    if rotation.iter().any(|v| !v.is_finite()) {
        return Err(ContractError::config_validation(
            "initial_state.rotation",
            "entries must be finite",
        ));
    }

    let orthogonality = (rotation.transpose() * rotation - nalgebra::Matrix3::identity()).amax();
    if orthogonality > ROTATION_TOLERANCE {
        return Err(ContractError::config_validation(
            "initial_state.rotation",
            format!("matrix is not orthonormal (max |RᵀR - I| = {orthogonality:e})"),
        ));
    }

    let det = rotation.determinant();
    if (det - 1.0).abs() > ROTATION_TOLERANCE {
        return Err(ContractError::config_validation(
            "initial_state.rotation",
            format!("determinant must be +1, got {det}"),
        ));
    }

    Ok(())
}
