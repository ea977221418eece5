//! # Configuration Matrix Module / 配置矩阵模块
//!
//! This module builds the Cartesian product of the device, RTOS and compiler
//! axes, removes the combinations excluded by filter predicates and derives
//! every name and path that depends on a single configuration.
//!
//! 此模块构建设备、RTOS 和编译器三个轴的笛卡尔积，
//! 移除被过滤谓词排除的组合，并派生出依赖于单个配置的所有名称和路径。

use anyhow::{bail, Result};
use chrono::NaiveDateTime;
use std::fmt;

use crate::core::axis::{Axis, Compiler, Device, Rtos};
use crate::infra::t;

/// Format of the timestamp appended to archive and report names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One complete combination, one variant per axis.
/// 一个完整的组合，每个轴取一个变体。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Configuration {
    pub device: Device,
    pub rtos: Rtos,
    pub compiler: Compiler,
}

impl Configuration {
    pub fn new(device: Device, rtos: Rtos, compiler: Compiler) -> Self {
        Self {
            device,
            rtos,
            compiler,
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.rtos,
            self.device.short_name(),
            self.compiler
        )
    }
}

/// The variants selected on each axis.
/// 每个轴上被选中的变体。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub devices: Vec<Device>,
    pub rtoses: Vec<Rtos>,
    pub compilers: Vec<Compiler>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            devices: Device::all().to_vec(),
            rtoses: Rtos::all().to_vec(),
            compilers: Compiler::all().to_vec(),
        }
    }
}

impl Selection {
    /// Builds a selection from per-axis glob patterns.
    ///
    /// An axis without patterns, or with the pattern `all`, keeps every variant.
    /// A pattern that matches no variant of its axis is an error.
    ///
    /// 根据每个轴的 glob 模式构建选择。
    /// 没有模式（或模式为 `all`）的轴保留所有变体。
    /// 不匹配其轴上任何变体的模式会导致错误。
    pub fn from_patterns(
        devices: &[String],
        rtoses: &[String],
        compilers: &[String],
    ) -> Result<Self> {
        Ok(Self {
            devices: select_axis(devices)?,
            rtoses: select_axis(rtoses)?,
            compilers: select_axis(compilers)?,
        })
    }

    /// Full Cartesian product, device-major, each axis in declaration order.
    pub fn cartesian(&self) -> Vec<Configuration> {
        let mut configurations =
            Vec::with_capacity(self.devices.len() * self.rtoses.len() * self.compilers.len());
        for &device in &self.devices {
            for &rtos in &self.rtoses {
                for &compiler in &self.compilers {
                    configurations.push(Configuration::new(device, rtos, compiler));
                }
            }
        }
        configurations
    }
}

fn select_axis<A: Axis>(patterns: &[String]) -> Result<Vec<A>> {
    if patterns.is_empty() || patterns.iter().any(|p| p.eq_ignore_ascii_case("all")) {
        return Ok(A::all().to_vec());
    }

    for pattern in patterns {
        if !A::all().iter().any(|v| v.matches_ignore_case(pattern)) {
            let choices = A::all()
                .iter()
                .map(|v| v.name())
                .collect::<Vec<_>>()
                .join(", ");
            bail!(
                "{}",
                t!(
                    "matrix.unknown_variant",
                    axis = A::NAME,
                    pattern = pattern,
                    choices = choices
                )
            );
        }
    }

    Ok(A::all()
        .iter()
        .copied()
        .filter(|v| patterns.iter().any(|p| v.matches_ignore_case(p)))
        .collect())
}

/// A named exclusion rule. The predicate returns `true` when the
/// configuration must be removed from the matrix.
///
/// 一个命名的排除规则。当配置必须从矩阵中移除时，谓词返回 `true`。
#[derive(Clone, Copy)]
pub struct Filter {
    pub name: &'static str,
    pub description: &'static str,
    pub predicate: fn(&Configuration) -> bool,
}

impl Filter {
    pub fn excludes(&self, configuration: &Configuration) -> bool {
        (self.predicate)(configuration)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Filters applied by the validation matrix.
pub const FILTERS: &[Filter] = &[Filter {
    name: "filter_unsupported",
    description: "Remove unsupported configurations.",
    predicate: filter_unsupported,
}];

/// Known hardware and toolchain incompatibilities.
///
/// - Clang has no support for the v8-M and v8.1-M devices (`CM[2358][35]*`).
/// - GCC is not supported on CM55.
/// - CM85 builds only with AC6 and has no FreeRTOS port.
pub fn filter_unsupported(config: &Configuration) -> bool {
    if config.device.matches("CM[2358][35]*") && config.compiler == Compiler::Clang {
        true
    } else if config.device == Device::CM55 && config.compiler == Compiler::Gcc {
        true
    } else {
        config.device == Device::CM85
            && (config.compiler == Compiler::Gcc || config.rtos == Rtos::FreeRtos)
    }
}

/// Keeps only the configurations that no filter excludes.
/// 仅保留未被任何过滤器排除的配置。
pub fn apply_filters(
    mut configurations: Vec<Configuration>,
    filters: &[Filter],
) -> Vec<Configuration> {
    configurations.retain(|c| !filters.iter().any(|f| f.excludes(c)));
    configurations
}

/// Formats a timestamp the way archive and report names expect it.
pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Derives project, directory and artifact names from a configuration.
///
/// Everything except [`Layout::archive_name`] and [`Layout::junit_name`] is
/// independent of the wall clock.
///
/// 从配置派生项目、目录和产物名称。
/// 除了 [`Layout::archive_name`] 和 [`Layout::junit_name`] 之外，其余都与时钟无关。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    prefix: String,
    model_config_root: String,
}

impl Layout {
    pub fn new(prefix: impl Into<String>, model_config_root: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            model_config_root: model_config_root.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// `<rtos>-<device>-<compiler>`, optionally followed by `-<timestamp>`.
    pub fn suffix(&self, config: &Configuration, at: Option<&NaiveDateTime>) -> String {
        match at {
            Some(at) => format!("{}-{}", config, format_timestamp(at)),
            None => config.to_string(),
        }
    }

    /// Build context passed to the build tool, e.g. `.RTX5+CM3`.
    pub fn context(&self, config: &Configuration) -> String {
        format!(".{}+{}", config.rtos, config.device.short_name())
    }

    pub fn project_name(&self, config: &Configuration) -> String {
        format!(
            "{}{}_{}",
            self.prefix,
            self.context(config),
            config.compiler.toolchain()
        )
    }

    pub fn output_dir(&self, config: &Configuration) -> String {
        format!("{}{}_OutDir", self.prefix, self.context(config))
    }

    pub fn project_file(&self, config: &Configuration) -> String {
        let project = self.project_name(config);
        format!("{project}/{project}.cprj")
    }

    pub fn solution_file(&self) -> String {
        format!("{}.csolution.yml", self.prefix)
    }

    /// Plain-text configuration file handed to the device's model.
    pub fn model_config(&self, config: &Configuration) -> String {
        format!(
            "{}/{}_VHT/vht_config.txt",
            self.model_config_root.trim_end_matches('/'),
            config.device.short_name()
        )
    }

    /// Path of the linked image inside the project directory.
    pub fn image_path(&self, config: &Configuration) -> String {
        format!(
            "{}/{}/{}.{}",
            self.project_name(config),
            self.output_dir(config),
            self.prefix,
            config.compiler.image_ext()
        )
    }

    pub fn archive_name(&self, config: &Configuration, at: &NaiveDateTime) -> String {
        format!("{}-{}.zip", self.prefix, self.suffix(config, Some(at)))
    }

    /// Glob matching every archive ever produced for `config`.
    pub fn archive_pattern(&self, config: &Configuration) -> String {
        format!(
            "{}-{}-*.zip",
            glob::Pattern::escape(&self.prefix),
            glob::Pattern::escape(&self.suffix(config, None))
        )
    }

    pub fn junit_name(&self, config: &Configuration, at: &NaiveDateTime) -> String {
        format!("{}-{}.junit", self.prefix, self.suffix(config, Some(at)))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new("Validation", "../Layer/Target")
    }
}
