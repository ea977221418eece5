//! # Execution Planner Module / 执行计划模块
//!
//! This module turns the command line selection into an execution plan and
//! derives, for every configuration, the external commands each action runs.
//! Command derivation is pure: it reads only the configuration and the
//! runner settings.
//!
//! 此模块将命令行选择转换为执行计划，并为每个配置派生每个动作要运行的外部命令。
//! 命令派生是纯函数：它只读取配置和运行器设置。

use anyhow::{bail, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::config::RunnerConfig;
use crate::core::matrix::{apply_filters, Configuration, Filter, Layout, Selection};
use crate::infra::t;

/// The actions that can be requested for each configuration.
/// 可以为每个配置请求的动作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Clean,
    Build,
    Extract,
    Run,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Clean, Action::Build, Action::Extract, Action::Run];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Clean => "clean",
            Action::Build => "build",
            Action::Extract => "extract",
            Action::Run => "run",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("{}", t!("plan.unknown_action", action = s)))
    }
}

/// One external command derived for a configuration.
/// 为某个配置派生出的一个外部命令。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Whether the command's output carries a validation report.
    pub captures_report: bool,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            captures_report: false,
        }
    }

    pub fn with_report(mut self) -> Self {
        self.captures_report = true;
        self
    }

    /// Shell-quoted command line for logs and dry runs.
    pub fn command_line(&self) -> String {
        let words = std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str));
        shlex::try_join(words).unwrap_or_else(|_| {
            std::iter::once(self.program.clone())
                .chain(self.args.iter().cloned())
                .collect::<Vec<_>>()
                .join(" ")
        })
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Derives the external commands for each action.
/// 为每个动作派生外部命令。
#[derive(Debug, Clone)]
pub struct CommandFactory {
    layout: Layout,
    cbuild: String,
    unzip: String,
    simlimit: u32,
}

impl CommandFactory {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            layout: config.layout(),
            cbuild: config.tools.cbuild.clone(),
            unzip: config.tools.unzip.clone(),
            simlimit: config.model.simlimit,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn clean(&self, config: &Configuration) -> Vec<CommandSpec> {
        vec![CommandSpec::new(
            &self.cbuild,
            ["-c".to_string(), self.layout.project_file(config)],
        )]
    }

    pub fn build(&self, config: &Configuration) -> Vec<CommandSpec> {
        vec![CommandSpec::new(
            &self.cbuild,
            [
                self.layout.solution_file(),
                "--packs".to_string(),
                "--update-rte".to_string(),
                "--toolchain".to_string(),
                config.compiler.toolchain().to_string(),
                "--context".to_string(),
                self.layout.context(config),
            ],
        )]
    }

    pub fn extract(&self, archive: &Path) -> Vec<CommandSpec> {
        vec![CommandSpec::new(
            &self.unzip,
            [archive.display().to_string()],
        )]
    }

    pub fn run(&self, config: &Configuration) -> Vec<CommandSpec> {
        let model = config.device.model();
        let mut args = vec![
            "-q".to_string(),
            "--simlimit".to_string(),
            self.simlimit.to_string(),
            "-f".to_string(),
            self.layout.model_config(config),
        ];
        args.extend(model.args.iter().map(|a| a.to_string()));
        args.push("-a".to_string());
        args.push(self.layout.image_path(config));
        vec![CommandSpec::new(model.executable, args).with_report()]
    }
}

/// Picks the most recent archive: the greatest file name in descending
/// lexicographic order. Timestamps sort chronologically by construction.
///
/// 选择最新的归档：按字典序降序排列后最大的文件名。时间戳的格式保证其按时间顺序排序。
pub fn latest_archive(mut archives: Vec<PathBuf>) -> Option<PathBuf> {
    archives.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
    archives.into_iter().next()
}

/// Represents a complete execution plan for the requested matrix.
/// 表示所请求矩阵的完整执行计划。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// Configurations that survived filtering, in matrix order.
    pub configurations: Vec<Configuration>,
    /// Actions to run for each configuration, in command line order.
    pub actions: Vec<Action>,
    /// Size of the Cartesian product before filtering.
    pub candidate_count: usize,
    /// The number of candidates removed by filters.
    pub filtered_count: usize,
}

/// Creates an execution plan: the Cartesian product of the selection, minus
/// everything the filters exclude.
pub fn plan_execution(
    selection: &Selection,
    filters: &[Filter],
    actions: Vec<Action>,
) -> Result<ExecutionPlan> {
    let candidates = selection.cartesian();
    let candidate_count = candidates.len();
    if candidate_count == 0 {
        bail!("{}", t!("plan.empty_selection"));
    }

    let configurations = apply_filters(candidates, filters);
    let filtered_count = candidate_count - configurations.len();

    Ok(ExecutionPlan {
        configurations,
        actions,
        candidate_count,
        filtered_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_archive_sorts_descending() {
        let archives = vec![
            PathBuf::from("Foo-RTX5-CM3-AC6-20230101_000000.zip"),
            PathBuf::from("Foo-RTX5-CM3-AC6-20230102_000000.zip"),
        ];
        assert_eq!(
            latest_archive(archives),
            Some(PathBuf::from("Foo-RTX5-CM3-AC6-20230102_000000.zip"))
        );
        assert_eq!(latest_archive(vec![]), None);
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("Build".parse::<Action>().unwrap(), Action::Build);
        assert!("deploy".parse::<Action>().is_err());
    }
}
