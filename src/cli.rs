//! # Command Line Module / 命令行模块
//!
//! Builds the clap command line, initializes localization and logging, and
//! dispatches to the list or run command.
//!
//! 构建 clap 命令行，初始化本地化和日志，并分派到 list 或 run 命令。

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::{env, path::PathBuf};
use tracing_subscriber::EnvFilter;

use crate::core::{
    axis::{Axis, Compiler, Device, Rtos},
    planner::Action,
};
use crate::infra::t;

pub mod commands;

/// Options shared by every command.
/// 所有命令共享的选项。
#[derive(Debug, Clone)]
pub struct Options {
    pub devices: Vec<String>,
    pub rtoses: Vec<String>,
    pub compilers: Vec<String>,
    pub actions: Vec<Action>,
    pub config: Option<PathBuf>,
    pub project_dir: PathBuf,
    pub dry_run: bool,
    pub list: bool,
    pub json: bool,
    /// Language given with `--lang`, if any.
    pub lang: Option<String>,
}

/// Pre-parses the command line arguments to find the language setting.
/// This allows i18n to be initialized before the full CLI is built.
/// It looks for a `--lang <VALUE>` argument.
fn pre_parse_language() -> Option<String> {
    let args: Vec<String> = env::args().collect();
    args.iter()
        .position(|arg| arg == "--lang")
        .and_then(|pos| args.get(pos + 1).cloned())
        .or_else(|| {
            args.iter()
                .find_map(|arg| arg.strip_prefix("--lang=").map(str::to_string))
        })
}

fn axis_arg<A: Axis>(help: String) -> Arg {
    Arg::new(A::NAME)
        .short(A::SHORT)
        .long(A::NAME)
        .help(help)
        .value_name("PATTERN")
        .action(ArgAction::Append)
}

/// Builds the command line definition with help texts in the current locale.
pub fn build_cli() -> Command {
    let action_names: Vec<&'static str> = Action::ALL.iter().map(Action::as_str).collect();

    Command::new("rv2-matrix")
        .version(env!("CARGO_PKG_VERSION"))
        .about(t!("cli.about").to_string())
        .arg(
            Arg::new("actions")
                .help(t!("cli.actions").to_string())
                .value_name("ACTION")
                .value_parser(clap::builder::PossibleValuesParser::new(action_names))
                .num_args(1..)
                .action(ArgAction::Append)
                .required_unless_present("list"),
        )
        .arg(axis_arg::<Device>(t!("cli.device").to_string()))
        .arg(axis_arg::<Rtos>(t!("cli.rtos").to_string()))
        .arg(axis_arg::<Compiler>(t!("cli.compiler").to_string()))
        .arg(
            Arg::new("config")
                .long("config")
                .help(t!("cli.config").to_string())
                .value_name("CONFIG")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("project-dir")
                .long("project-dir")
                .help(t!("cli.project_dir").to_string())
                .value_name("PROJECT_DIR")
                .default_value(".")
                .value_parser(clap::value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help(t!("cli.dry_run").to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help(t!("cli.list").to_string())
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help(t!("cli.json").to_string())
                .requires("list")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help(t!("cli.verbose").to_string())
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("lang")
                .long("lang")
                .help(t!("cli.lang").to_string())
                .value_name("LANGUAGE")
                .action(ArgAction::Set),
        )
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// Extracts [`Options`] from parsed arguments.
pub fn options_from_matches(matches: &ArgMatches) -> Result<Options> {
    let actions = strings(matches, "actions")
        .iter()
        .map(|a| a.parse())
        .collect::<Result<Vec<Action>>>()?;

    Ok(Options {
        devices: strings(matches, Device::NAME),
        rtoses: strings(matches, Rtos::NAME),
        compilers: strings(matches, Compiler::NAME),
        actions,
        config: matches.get_one::<PathBuf>("config").cloned(),
        project_dir: matches
            .get_one::<PathBuf>("project-dir")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(".")),
        dry_run: matches.get_flag("dry-run"),
        list: matches.get_flag("list"),
        json: matches.get_flag("json"),
        lang: matches.get_one::<String>("lang").cloned(),
    })
}

/// Installs the tracing subscriber. `RUST_LOG` wins over `-v`.
/// 安装 tracing 订阅器。`RUST_LOG` 优先于 `-v`。
pub fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rv2_matrix={default_level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

pub async fn run() -> Result<()> {
    // Pre-parse language and initialize i18n first.
    let language = pre_parse_language()
        .map(|lang| crate::resolve_language(&lang))
        .unwrap_or_else(crate::detect_language);
    rust_i18n::set_locale(&language);

    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        // Help and version are not errors; usage errors exit with 1 like every other failure.
        Err(e) if e.exit_code() == 0 => {
            e.print()?;
            return Ok(());
        }
        Err(e) => {
            e.print()?;
            anyhow::bail!("{}", t!("cli.invalid_arguments"));
        }
    };
    init_logging(matches.get_count("verbose"));

    let options = options_from_matches(&matches)?;
    if options.list {
        commands::list::execute(&options)
    } else {
        commands::run::execute(&options).await
    }
}
