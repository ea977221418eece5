//! # Console Reporting Module / 控制台报告模块
//!
//! This module prints the configuration matrix and the final summary of an
//! invocation to the console, with colors and localized messages.
//!
//! 此模块将配置矩阵以及本次调用的最终摘要打印到控制台，支持颜色和本地化消息。

use anyhow::Result;
use colored::*;
use serde::Serialize;

use crate::core::{
    axis::Axis,
    matrix::{Configuration, Layout},
    models::{ActionOutcome, ActionStatus},
    planner::ExecutionPlan,
};
use crate::infra::t;

/// Serializable view of one configuration and its derived names.
#[derive(Debug, Serialize)]
pub struct ConfigurationView {
    pub device: &'static str,
    pub rtos: &'static str,
    pub compiler: &'static str,
    pub project: String,
    pub output_dir: String,
    pub model_config: String,
}

impl ConfigurationView {
    pub fn new(config: &Configuration, layout: &Layout) -> Self {
        Self {
            device: config.device.name(),
            rtos: config.rtos.name(),
            compiler: config.compiler.name(),
            project: layout.project_name(config),
            output_dir: layout.output_dir(config),
            model_config: layout.model_config(config),
        }
    }
}

/// Prints the planned configurations, either as a table or as JSON.
///
/// # Output Format / 输出格式
/// ```text
/// --- Configuration Matrix ---
///   - CM3        | RTX5       | AC6    | Validation.RTX5+CM3_AC6
/// 41 configuration(s), 13 filtered out
/// ```
pub fn print_matrix(plan: &ExecutionPlan, layout: &Layout, json: bool) -> Result<()> {
    if json {
        let views: Vec<_> = plan
            .configurations
            .iter()
            .map(|c| ConfigurationView::new(c, layout))
            .collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    println!("\n{}", t!("summary.matrix_banner").bold());
    for config in &plan.configurations {
        println!(
            "  - {:<10} | {:<10} | {:<6} | {}",
            config.device.name(),
            config.rtos.name(),
            config.compiler.name(),
            layout.project_name(config).dimmed()
        );
    }
    println!(
        "{}",
        t!(
            "summary.matrix_count",
            count = plan.configurations.len(),
            filtered = plan.filtered_count
        )
        .cyan()
    );
    Ok(())
}

/// Prints one line per executed action and the overall verdict.
///
/// # Returns
/// `true` if any action failed or was cancelled.
///
/// 为每个已执行的动作打印一行，并打印总体结论。
/// 如果有任何动作失败或被取消，则返回 `true`。
pub fn print_summary(outcomes: &[ActionOutcome]) -> bool {
    println!("\n{}", t!("summary.banner").bold());

    for outcome in outcomes {
        let status = match outcome.status {
            ActionStatus::Succeeded => t!("summary.status_succeeded").green(),
            ActionStatus::Failed => t!("summary.status_failed").red(),
            ActionStatus::Cancelled => t!("summary.status_cancelled").dimmed(),
        };
        println!(
            "  - {:<10} | {:<8} | {:<24} | {:>8.2?}",
            status,
            outcome.action.as_str(),
            outcome.configuration.to_string(),
            outcome.duration
        );
    }

    let failed = outcomes
        .iter()
        .filter(|o| o.status == ActionStatus::Failed)
        .count();
    let cancelled = outcomes
        .iter()
        .filter(|o| o.status == ActionStatus::Cancelled)
        .count();

    println!();
    if failed > 0 {
        println!(
            "{}",
            t!("summary.overall_failure", failed = failed, total = outcomes.len())
                .red()
                .bold()
        );
        true
    } else if cancelled > 0 {
        println!(
            "{}",
            t!("summary.overall_cancelled", cancelled = cancelled).yellow().bold()
        );
        true
    } else {
        println!(
            "{}",
            t!("summary.overall_success", total = outcomes.len()).green().bold()
        );
        false
    }
}
