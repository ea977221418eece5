//! # Data Models Module / 数据模型模块
//!
//! This module defines the data structures produced while executing actions:
//! the result of one external command and the outcome of one action for one
//! configuration.
//!
//! 此模块定义了执行动作时产生的数据结构：
//! 单个外部命令的结果，以及单个配置上单个动作的结果。

use once_cell::unsync::OnceCell;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::core::matrix::Configuration;
use crate::core::planner::{Action, CommandSpec};
use crate::reporting::report::{ReportError, ValidationReport};

/// Outcome of one external command.
///
/// The test report is parsed from the output on first access only.
///
/// 单个外部命令的结果。测试报告仅在首次访问时从输出中解析。
#[derive(Debug)]
pub struct RunResult {
    /// The command that was executed.
    pub command: CommandSpec,
    /// `true` if the command exited successfully.
    pub success: bool,
    /// Combined stdout and stderr.
    pub output: String,
    pub duration: Duration,
    /// `true` if Ctrl-C stopped the command or kept it from starting.
    pub cancelled: bool,
    report: OnceCell<Result<ValidationReport, ReportError>>,
}

impl RunResult {
    pub fn new(command: CommandSpec, success: bool, output: String, duration: Duration) -> Self {
        Self {
            command,
            success,
            output,
            duration,
            cancelled: false,
            report: OnceCell::new(),
        }
    }

    /// Marks the command as interrupted by cancellation.
    pub fn interrupted(mut self) -> Self {
        self.cancelled = true;
        self.success = false;
        self
    }

    /// The validation report embedded in the output.
    /// 嵌入在输出中的验证报告。
    pub fn test_report(&self) -> Result<&ValidationReport, &ReportError> {
        self.report
            .get_or_init(|| ValidationReport::from_output(&self.output))
            .as_ref()
    }
}

/// Final status of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionStatus {
    Succeeded,
    Failed,
    /// Interrupted by Ctrl-C, or never started because of it.
    Cancelled,
}

impl ActionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionStatus::Succeeded)
    }
}

/// Outcome of one action for one configuration.
/// 单个配置上单个动作的结果。
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub configuration: Configuration,
    pub action: Action,
    pub status: ActionStatus,
    pub duration: Duration,
}

impl ActionOutcome {
    pub fn new(
        configuration: Configuration,
        action: Action,
        status: ActionStatus,
        duration: Duration,
    ) -> Self {
        Self {
            configuration,
            action,
            status,
            duration,
        }
    }

    pub fn cancelled(configuration: Configuration, action: Action) -> Self {
        Self::new(configuration, action, ActionStatus::Cancelled, Duration::ZERO)
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.configuration)
    }
}
