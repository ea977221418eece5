//! # Action Execution Module / 动作执行模块
//!
//! This module runs the clean, build, extract and run actions for a single
//! configuration. Commands run one after another in the project directory;
//! nothing is shared between configurations except the archives that a build
//! leaves behind for a later extract.
//!
//! 此模块为单个配置运行 clean、build、extract 和 run 动作。
//! 命令在工程目录中依次运行；除了构建留下供后续解压的归档之外，配置之间不共享任何状态。

use anyhow::Result;
use chrono::Local;
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        axis::Axis,
        matrix::Configuration,
        models::{ActionOutcome, ActionStatus, RunResult},
        planner::{latest_archive, Action, CommandFactory, CommandSpec},
    },
    infra::{command, fs, t},
};

/// Executes actions for configurations.
/// 为配置执行动作。
#[derive(Debug)]
pub struct Executor {
    factory: CommandFactory,
    project_root: PathBuf,
    dry_run: bool,
    stop_token: CancellationToken,
}

impl Executor {
    pub fn new(
        factory: CommandFactory,
        project_root: PathBuf,
        dry_run: bool,
        stop_token: CancellationToken,
    ) -> Self {
        Self {
            factory,
            project_root,
            dry_run,
            stop_token,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Runs one action for one configuration and reports its outcome.
    ///
    /// # Arguments
    /// * `config` - The configuration to act on
    /// * `action` - The action to run
    ///
    /// # Returns
    /// An `ActionOutcome`; failures of the external tools are part of the
    /// outcome, not errors.
    pub async fn execute(&self, config: &Configuration, action: Action) -> ActionOutcome {
        if self.stop_token.is_cancelled() {
            return ActionOutcome::cancelled(*config, action);
        }

        println!(
            "{}",
            t!("run.action_started", action = action, config = config).blue()
        );
        let start = Instant::now();

        let result = match action {
            Action::Clean => self.clean(config).await,
            Action::Build => self.build(config).await,
            Action::Extract => self.extract(config).await,
            Action::Run => self.run(config).await,
        };

        let status = match result {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("{action} {config}: {e:#}");
                ActionStatus::Failed
            }
        };

        let duration = start.elapsed();
        let seconds = format!("{:.2}", duration.as_secs_f64());
        match status {
            ActionStatus::Succeeded => println!(
                "{}",
                t!("run.action_succeeded", action = action, config = config, duration = seconds)
                    .green()
            ),
            ActionStatus::Failed => println!(
                "{}",
                t!("run.action_failed", action = action, config = config, duration = seconds).red()
            ),
            ActionStatus::Cancelled => println!(
                "{}",
                t!("run.action_cancelled", action = action, config = config).yellow()
            ),
        }

        ActionOutcome::new(*config, action, status, duration)
    }

    async fn clean(&self, config: &Configuration) -> Result<ActionStatus> {
        let results = self.run_commands(self.factory.clean(config)).await;
        Ok(status_of(&results))
    }

    /// Builds the configuration and, if every command succeeded, archives the
    /// project directory into `<prefix>-<suffix>-<timestamp>.zip`.
    async fn build(&self, config: &Configuration) -> Result<ActionStatus> {
        let results = self.run_commands(self.factory.build(config)).await;
        let status = status_of(&results);
        if !status.is_success() {
            return Ok(status);
        }

        let layout = self.factory.layout();
        let archive = layout.archive_name(config, &Local::now().naive_local());
        println!("{}", t!("run.archiving", file = &archive).cyan());
        if self.dry_run {
            return Ok(ActionStatus::Succeeded);
        }

        let count = fs::archive_directory(
            &self.project_root,
            &layout.project_name(config),
            &self.project_root.join(&archive),
        )?;
        tracing::info!("archived {count} file(s) into {archive}");
        Ok(ActionStatus::Succeeded)
    }

    /// Unpacks the most recent archive built for the configuration.
    async fn extract(&self, config: &Configuration) -> Result<ActionStatus> {
        let pattern = self.factory.layout().archive_pattern(config);
        let archives = fs::find_archives(&self.project_root, &pattern)?;
        let Some(archive) = latest_archive(archives) else {
            anyhow::bail!("{}", t!("run.no_archive", pattern = &pattern));
        };

        let archive = archive
            .file_name()
            .map(PathBuf::from)
            .unwrap_or(archive);
        let results = self.run_commands(self.factory.extract(&archive)).await;
        Ok(status_of(&results))
    }

    /// Runs the image on the device's model and converts the report it prints
    /// into `<prefix>-<suffix>-<timestamp>.junit`.
    ///
    /// A missing or malformed report is a warning. Neither it nor a failure to
    /// write the JUnit file changes the action's status.
    ///
    /// 在设备模型上运行镜像，并将其打印的报告转换为 JUnit 文件。
    /// 缺失或格式错误的报告仅是警告；它和写入 JUnit 文件失败都不会改变动作的状态。
    async fn run(&self, config: &Configuration) -> Result<ActionStatus> {
        println!("{}", t!("run.running_model", device = config.device.name()).blue());
        let results = self.run_commands(self.factory.run(config)).await;
        if self.dry_run || results.iter().any(|r| r.cancelled) {
            return Ok(status_of(&results));
        }

        let junit = self
            .factory
            .layout()
            .junit_name(config, &Local::now().naive_local());
        for result in results.iter().filter(|r| r.command.captures_report) {
            self.write_report(config, result, &junit);
        }

        Ok(status_of(&results))
    }

    fn write_report(&self, config: &Configuration, result: &RunResult, junit: &str) {
        let report = match result.test_report() {
            Ok(report) => report,
            Err(e) if e.is_missing_report() => {
                tracing::warn!("{}", t!("report.no_valid_report"));
                tracing::debug!("{e}");
                return;
            }
            Err(e) => {
                tracing::error!("{e:?}");
                return;
            }
        };

        let suite_name = format!(
            "{}.{}.{}.{}",
            config.rtos,
            config.device,
            config.compiler,
            report.test.title.trim()
        );
        let path = self.project_root.join(junit);
        match report.write_junit(&path, &suite_name) {
            Ok(()) => println!("{}", t!("report.written", file = junit).cyan()),
            Err(e) => tracing::error!("{:?}", anyhow::Error::new(e)),
        }
    }

    /// Runs commands in order. A dry run only prints them.
    async fn run_commands(&self, specs: Vec<CommandSpec>) -> Vec<RunResult> {
        let mut results = Vec::with_capacity(specs.len());
        for spec in specs {
            println!("{} {}", t!("run.command_prefix").blue(), spec);
            if self.dry_run {
                results.push(RunResult::new(spec, true, String::new(), Default::default()));
                continue;
            }
            if self.stop_token.is_cancelled() {
                let skipped = RunResult::new(spec, false, String::new(), Default::default());
                results.push(skipped.interrupted());
                break;
            }

            let start = Instant::now();
            let cmd = command::build_command(&spec, &self.project_root);
            let captured = command::spawn_and_capture(cmd, &self.stop_token).await;
            let duration = start.elapsed();

            let success = captured.success();
            let mut output = captured.output;
            if let Err(e) = &captured.status {
                let message = t!("run.spawn_failed", program = &spec.program, error = e);
                output.push_str(&message);
                output.push('\n');
            }
            if !output.trim().is_empty() {
                println!("{}", output.trim_end());
            }
            tracing::debug!(
                "{} finished in {:.2}s (success: {success})",
                spec.program,
                duration.as_secs_f64()
            );

            let result = RunResult::new(spec, success, output, duration);
            if captured.cancelled {
                results.push(result.interrupted());
                break;
            }
            results.push(result);
        }
        results
    }
}

/// Cancelled if a command was interrupted, otherwise succeeded only if every command did.
pub fn status_of(results: &[RunResult]) -> ActionStatus {
    if results.iter().any(|r| r.cancelled) {
        ActionStatus::Cancelled
    } else if results.iter().all(|r| r.success) {
        ActionStatus::Succeeded
    } else {
        ActionStatus::Failed
    }
}
