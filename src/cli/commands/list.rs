//! # List Command Module / 列表命令模块
//!
//! Prints the filtered configuration matrix without running anything.
//!
//! 打印过滤后的配置矩阵，不运行任何内容。

use anyhow::Result;

use crate::{cli::Options, cli::commands::run::prepare, reporting::console::print_matrix};

pub fn execute(options: &Options) -> Result<()> {
    let (config, _, plan) = prepare(options)?;
    print_matrix(&plan, &config.layout(), options.json)
}
