//! # Core Module / 核心模块
//!
//! This module contains the core functionality of rv2-matrix: the matrix axes,
//! configuration enumeration and filtering, runner settings, command planning
//! and action execution.
//!
//! 此模块包含 rv2-matrix 的核心功能：矩阵轴、配置的枚举与过滤、
//! 运行器设置、命令规划和动作执行。

pub mod axis;
pub mod config;
pub mod execution;
pub mod matrix;
pub mod models;
pub mod planner;

// Re-exports
pub use config::RunnerConfig;
pub use matrix::{Configuration, Selection};
pub use planner::{plan_execution, Action};
