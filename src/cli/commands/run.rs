//! # Run Command Module / 运行命令模块
//!
//! This module implements the default command of the CLI, which runs the
//! requested actions for every configuration of the filtered matrix.
//!
//! 此模块实现 CLI 的默认命令，为过滤后矩阵中的每个配置运行所请求的动作。

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    cli::Options,
    core::{
        config::RunnerConfig,
        execution::Executor,
        matrix::{Selection, FILTERS},
        models::ActionOutcome,
        planner::{self, CommandFactory, ExecutionPlan},
    },
    infra::t,
    reporting::console::print_summary,
};

/// Loads the configuration, resolves the project directory and plans the matrix.
/// Shared by the list and run commands.
///
/// 加载配置、解析工程目录并规划矩阵。由 list 和 run 命令共享。
pub fn prepare(options: &Options) -> Result<(RunnerConfig, PathBuf, ExecutionPlan)> {
    let project_root = fs::canonicalize(&options.project_dir).with_context(|| {
        t!("run.project_dir_not_found", path = options.project_dir.display()).to_string()
    })?;

    let (config, config_path) = RunnerConfig::load(options.config.as_deref(), &project_root)?;
    // `--lang` beats the settings file.
    if let (None, Some(language)) = (&options.lang, &config.language) {
        rust_i18n::set_locale(&crate::resolve_language(language));
    }
    if let Some(path) = &config_path {
        tracing::info!("{}", t!("run.config_loaded", path = path.display()));
    }

    let selection =
        Selection::from_patterns(&options.devices, &options.rtoses, &options.compilers)?;
    let plan = planner::plan_execution(&selection, FILTERS, options.actions.clone())?;
    Ok((config, project_root, plan))
}

/// Executes the requested actions.
///
/// # Returns
/// An error if any action failed, so that the process exits non-zero.
pub async fn execute(options: &Options) -> Result<()> {
    let (config, project_root, plan) = prepare(options)?;

    println!(
        "{}",
        t!("run.project_root", path = project_root.display())
    );
    if plan.filtered_count > 0 {
        println!(
            "{}",
            t!(
                "run.filtered_configurations",
                filtered = plan.filtered_count,
                total = plan.candidate_count
            )
            .cyan()
        );
    }
    if options.dry_run {
        println!("{}", t!("run.dry_run").yellow().bold());
    }

    if plan.configurations.is_empty() {
        println!("{}", t!("run.no_configurations").green());
        return Ok(());
    }

    let stop_token = setup_signal_handler();
    let executor = Executor::new(
        CommandFactory::new(&config),
        project_root,
        options.dry_run,
        stop_token,
    );

    let outcomes = run_matrix(&executor, &plan).await;
    if print_summary(&outcomes) {
        anyhow::bail!("{}", t!("run.matrix_failed"));
    }
    Ok(())
}

/// Runs every action for every configuration, one after another.
/// A failed action does not stop the remaining work.
///
/// 依次为每个配置运行每个动作。失败的动作不会停止剩余的工作。
pub async fn run_matrix(executor: &Executor, plan: &ExecutionPlan) -> Vec<ActionOutcome> {
    let mut outcomes = Vec::with_capacity(plan.configurations.len() * plan.actions.len());
    for config in &plan.configurations {
        for &action in &plan.actions {
            outcomes.push(executor.execute(config, action).await);
        }
    }
    outcomes
}

fn setup_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("run.shutdown_signal").yellow());
            token_clone.cancel();
        }
    });

    token
}
