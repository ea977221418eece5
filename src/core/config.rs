//! # Runner Configuration Module / 运行器配置模块
//!
//! Settings loaded from an optional TOML file. Every field has a default that
//! reproduces the stock validation project layout, so the file is only needed
//! to point at non-standard tool locations or a different project prefix.
//!
//! 从可选的 TOML 文件加载的设置。每个字段都有一个与标准验证工程布局一致的默认值，
//! 因此只有在需要指定非标准工具位置或不同的工程前缀时才需要该文件。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::matrix::Layout;
use crate::infra::t;

/// File looked up in the project directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "rv2-matrix.toml";

/// External tool locations.
/// 外部工具的位置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// The CMSIS build tool.
    pub cbuild: String,
    /// Tool used to unpack build archives.
    pub unzip: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            cbuild: "cbuild".to_string(),
            unzip: "unzip".to_string(),
        }
    }
}

/// Settings for the virtual hardware models.
/// 虚拟硬件模型的设置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Value passed to the model's `--simlimit` option, in seconds.
    pub simlimit: u32,
    /// Directory holding the per-device `<device>_VHT/vht_config.txt` files,
    /// relative to the project directory.
    pub config_root: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            simlimit: 100,
            config_root: "../Layer/Target".to_string(),
        }
    }
}

/// The complete runner configuration.
/// 完整的运行器配置。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// `--lang` takes precedence; without either the system locale is used.
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    pub language: Option<String>,
    /// Prefix of the solution, projects, archives and reports.
    pub prefix: String,
    pub tools: ToolsConfig,
    pub model: ModelConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            language: None,
            prefix: "Validation".to_string(),
            tools: ToolsConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Parses a configuration from TOML text and expands `~` and environment
    /// variables in the tool paths.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: RunnerConfig =
            toml::from_str(content).with_context(|| t!("config.parse_failed").to_string())?;
        config.tools.cbuild = expand(&config.tools.cbuild)?;
        config.tools.unzip = expand(&config.tools.unzip)?;
        Ok(config)
    }

    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one, `rv2-matrix.toml` in
    /// `project_dir` is used when present and the defaults otherwise.
    ///
    /// 加载配置。显式给出的 `path` 必须存在。
    /// 未给出时，如果 `project_dir` 中存在 `rv2-matrix.toml` 则使用它，否则使用默认值。
    pub fn load(path: Option<&Path>, project_dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = project_dir.join(DEFAULT_CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok((Self::default(), None));
                }
                candidate
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
        let config = Self::from_toml(&content)?;
        Ok((config, Some(path)))
    }

    pub fn layout(&self) -> Layout {
        Layout::new(&self.prefix, &self.model.config_root)
    }
}

fn expand(value: &str) -> Result<String> {
    Ok(shellexpand::full(value)
        .with_context(|| t!("config.expand_failed", value = value).to_string())?
        .into_owned())
}
