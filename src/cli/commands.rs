//! Implementations of the command line entry points.
//! 命令行入口点的实现。

pub mod list;
pub mod run;
