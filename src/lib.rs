//! # rv2-matrix Library / rv2-matrix 库
//!
//! This library provides the core functionality for the rv2-matrix tool,
//! which builds the CMSIS-RTOS2 validation suite for every supported
//! device, RTOS and compiler combination and runs the images on virtual
//! hardware models.
//!
//! 此库为 rv2-matrix 工具提供核心功能。该工具为每个受支持的
//! 设备、RTOS 和编译器组合构建 CMSIS-RTOS2 验证套件，并在虚拟硬件模型上运行镜像。
//!
//! ## Modules / 模块
//!
//! - `core` - Matrix axes, filtering, command planning and action execution
//! - `infra` - Infrastructure services like command execution and file system operations
//! - `reporting` - Validation report conversion and console summaries
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 矩阵轴、过滤、命令规划和动作执行
//! - `infra` - 基础设施服务，如命令执行和文件系统操作
//! - `reporting` - 验证报告转换和控制台摘要
//! - `cli` - 命令行接口和命令

pub mod cli;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use self::core::{axis, config, matrix};

/// Picks the UI language from the system locale.
///
/// The full locale (e.g., "zh-CN") is tried first, then just the language
/// code (e.g., "en"), and finally the default language ("en").
pub fn detect_language() -> String {
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    resolve_language(&locale)
}

/// Maps a requested locale onto one of the bundled translations.
pub fn resolve_language(locale: &str) -> String {
    let available_locales = rust_i18n::available_locales!();

    if available_locales.contains(&locale) {
        return locale.to_string();
    }
    locale
        .split(['-', '_'])
        .next()
        .filter(|lang_code| available_locales.contains(lang_code))
        .unwrap_or("en")
        .to_string()
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
