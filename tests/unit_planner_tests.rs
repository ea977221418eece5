//! # Planner Module Unit Tests / Planner 模块单元测试
//!
//! This module tests the execution plan and the external commands derived
//! for each action.
//!
//! 此模块测试执行计划以及为每个动作派生的外部命令。

use rv2_matrix::axis::{Compiler, Device, Rtos};
use rv2_matrix::config::RunnerConfig;
use rv2_matrix::core::planner::{
    latest_archive, plan_execution, Action, CommandFactory, CommandSpec,
};
use rv2_matrix::matrix::{Configuration, Selection, FILTERS};
use std::path::{Path, PathBuf};

fn factory() -> CommandFactory {
    CommandFactory::new(&RunnerConfig::default())
}

fn cm3() -> Configuration {
    Configuration::new(Device::CM3, Rtos::Rtx5, Compiler::Ac6)
}

#[cfg(test)]
mod command_tests {
    use super::*;

    #[test]
    fn test_clean_command() {
        let commands = factory().clean(&cm3());
        assert_eq!(commands.len(), 1);
        assert_eq!(
            commands[0].command_line(),
            "cbuild -c Validation.RTX5+CM3_AC6/Validation.RTX5+CM3_AC6.cprj"
        );
        assert!(!commands[0].captures_report);
    }

    #[test]
    fn test_build_command() {
        let config = Configuration::new(Device::CM55, Rtos::FreeRtos, Compiler::Ac6);
        let commands = factory().build(&config);
        assert_eq!(
            commands[0].args,
            vec![
                "Validation.csolution.yml",
                "--packs",
                "--update-rte",
                "--toolchain",
                "AC6",
                "--context",
                ".FreeRTOS+CM55",
            ]
        );
    }

    #[test]
    fn test_extract_command() {
        let commands = factory().extract(Path::new("Validation-RTX5-CM3-AC6-20230102_000000.zip"));
        assert_eq!(
            commands[0].command_line(),
            "unzip Validation-RTX5-CM3-AC6-20230102_000000.zip"
        );
    }

    #[test]
    fn test_run_command() {
        let commands = factory().run(&cm3());
        assert_eq!(commands.len(), 1);
        let run = &commands[0];
        assert_eq!(run.program, "VHT_MPS2_Cortex-M3");
        assert_eq!(
            run.args,
            vec![
                "-q",
                "--simlimit",
                "100",
                "-f",
                "../Layer/Target/CM3_VHT/vht_config.txt",
                "-a",
                "Validation.RTX5+CM3_AC6/Validation.RTX5+CM3_OutDir/Validation.axf",
            ]
        );
        assert!(run.captures_report);
    }

    #[test]
    fn test_run_uses_device_model() {
        let config = Configuration::new(Device::CM85, Rtos::Rtx5, Compiler::Ac6);
        assert_eq!(factory().run(&config)[0].program, "VHT_Corstone_SSE-310");
        let config = Configuration::new(Device::CM7SP, Rtos::Rtx5, Compiler::Gcc);
        assert_eq!(factory().run(&config)[0].program, "VHT_MPS2_Cortex-M7");
    }

    #[test]
    fn test_settings_flow_into_commands() {
        let config = RunnerConfig::from_toml(
            r#"
            prefix = "Foo"
            [tools]
            cbuild = "/opt/cmsis/bin/cbuild"
            [model]
            simlimit = 5
            "#,
        )
        .unwrap();
        let factory = CommandFactory::new(&config);

        let build = &factory.build(&cm3())[0];
        assert_eq!(build.program, "/opt/cmsis/bin/cbuild");
        assert_eq!(build.args[0], "Foo.csolution.yml");

        let run = &factory.run(&cm3())[0];
        assert_eq!(run.args[2], "5");
        assert!(run.args.contains(&"Foo.RTX5+CM3_AC6/Foo.RTX5+CM3_OutDir/Foo.axf".to_string()));
    }

    #[test]
    fn test_command_line_quotes_arguments() {
        let spec = CommandSpec::new("unzip", ["my archive.zip"]);
        assert_eq!(spec.command_line(), "unzip 'my archive.zip'");
        assert_eq!(spec.to_string(), spec.command_line());
    }
}

#[cfg(test)]
mod archive_selection_tests {
    use super::*;

    #[test]
    fn test_latest_archive_is_second_of_two() {
        let archives = vec![
            PathBuf::from("Foo-RTX5-CM3-AC6-20230101_000000.zip"),
            PathBuf::from("Foo-RTX5-CM3-AC6-20230102_000000.zip"),
        ];
        assert_eq!(
            latest_archive(archives),
            Some(PathBuf::from("Foo-RTX5-CM3-AC6-20230102_000000.zip"))
        );
    }

    #[test]
    fn test_latest_archive_ignores_directory() {
        let archives = vec![
            PathBuf::from("z/Foo-RTX5-CM3-AC6-20230101_000000.zip"),
            PathBuf::from("a/Foo-RTX5-CM3-AC6-20240101_000000.zip"),
        ];
        assert_eq!(
            latest_archive(archives),
            Some(PathBuf::from("a/Foo-RTX5-CM3-AC6-20240101_000000.zip"))
        );
    }

    #[test]
    fn test_no_archives() {
        assert_eq!(latest_archive(Vec::new()), None);
    }
}

#[cfg(test)]
mod plan_tests {
    use super::*;

    #[test]
    fn test_plan_counts() {
        let plan = plan_execution(&Selection::default(), FILTERS, vec![Action::Build]).unwrap();
        assert_eq!(plan.candidate_count, 54);
        assert_eq!(plan.configurations.len(), 41);
        assert_eq!(plan.filtered_count, 13);
        assert_eq!(plan.actions, vec![Action::Build]);
    }

    #[test]
    fn test_plan_without_filters_keeps_everything() {
        let plan = plan_execution(&Selection::default(), &[], vec![]).unwrap();
        assert_eq!(plan.configurations.len(), 54);
        assert_eq!(plan.filtered_count, 0);
    }

    #[test]
    fn test_fully_filtered_selection() {
        let selection = Selection {
            devices: vec![Device::CM85],
            rtoses: vec![Rtos::FreeRtos],
            compilers: vec![Compiler::Ac6, Compiler::Gcc, Compiler::Clang],
        };
        let plan = plan_execution(&selection, FILTERS, vec![Action::Run]).unwrap();
        assert!(plan.configurations.is_empty());
        assert_eq!(plan.filtered_count, 3);
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let selection = Selection {
            devices: vec![],
            ..Selection::default()
        };
        assert!(plan_execution(&selection, FILTERS, vec![Action::Clean]).is_err());
    }

    #[test]
    fn test_action_parsing() {
        let parsed: Vec<Action> = ["clean", "BUILD", "extract", "run"]
            .iter()
            .map(|a| a.parse().unwrap())
            .collect();
        assert_eq!(parsed, Action::ALL.to_vec());
        assert!("deploy".parse::<Action>().is_err());
    }
}
