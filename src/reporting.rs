//! # Reporting Module / 报告模块
//!
//! This module handles test report conversion and console output. It turns the
//! validation report printed by the firmware into JUnit XML and prints the
//! configuration matrix and run summaries to the console.
//!
//! 此模块处理测试报告转换和控制台输出。它将固件打印的验证报告转换为 JUnit XML，
//! 并将配置矩阵和运行摘要打印到控制台。

pub mod console;
pub mod report;

// Re-export common reporting functions
pub use console::{print_matrix, print_summary};
pub use report::{ReportError, ValidationReport};
