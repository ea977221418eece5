//! # Models Module Unit Tests / Models 模块单元测试
//!
//! This module tests the command results and action outcomes produced while
//! executing the matrix.
//!
//! 此模块测试执行矩阵时产生的命令结果和动作结果。

use rv2_matrix::axis::{Compiler, Device, Rtos};
use rv2_matrix::core::execution::status_of;
use rv2_matrix::core::models::{ActionOutcome, ActionStatus, RunResult};
use rv2_matrix::core::planner::{Action, CommandSpec};
use rv2_matrix::matrix::Configuration;
use std::time::Duration;

fn model_command() -> CommandSpec {
    CommandSpec::new("VHT_MPS2_Cortex-M3", ["-q"]).with_report()
}

const REPORT: &str = "<?xml version=\"1.0\"?>\n<report><test><title>Suite</title>\
<test_cases><tc><no>1</no><func>TC_A</func><dbgi></dbgi><res>PASSED</res></tc></test_cases>\
<summary><tcnt>1</tcnt><exec>1</exec><pass>1</pass><fail>0</fail><warn>0</warn><tres>PASSED</tres></summary>\
</test></report>\n";

#[cfg(test)]
mod run_result_tests {
    use super::*;

    #[test]
    fn test_report_is_parsed_from_output() {
        let output = format!("boot banner\n{REPORT}Simulation finished\n");
        let result = RunResult::new(model_command(), true, output, Duration::from_secs(1));

        let report = result.test_report().unwrap();
        assert_eq!(report.test.title, "Suite");
        assert_eq!(report.test.test_cases.cases.len(), 1);
    }

    #[test]
    fn test_report_is_parsed_once() {
        let result = RunResult::new(model_command(), true, REPORT.to_string(), Duration::ZERO);
        let first = result.test_report().unwrap() as *const _;
        let second = result.test_report().unwrap() as *const _;
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_without_report() {
        let result = RunResult::new(
            model_command(),
            false,
            "Error: image not found\n".to_string(),
            Duration::ZERO,
        );
        let err = result.test_report().unwrap_err();
        assert!(err.is_missing_report());
    }
}

#[cfg(test)]
mod action_outcome_tests {
    use super::*;

    fn config() -> Configuration {
        Configuration::new(Device::CM3, Rtos::Rtx5, Compiler::Ac6)
    }

    #[test]
    fn test_cancelled_outcome() {
        let outcome = ActionOutcome::cancelled(config(), Action::Run);
        assert_eq!(outcome.status, ActionStatus::Cancelled);
        assert_eq!(outcome.duration, Duration::ZERO);
        assert!(!outcome.status.is_success());
    }

    #[test]
    fn test_outcome_display() {
        let outcome = ActionOutcome::new(
            config(),
            Action::Build,
            ActionStatus::Succeeded,
            Duration::from_millis(1500),
        );
        assert_eq!(outcome.to_string(), "build RTX5-CM3-AC6");
        assert!(outcome.status.is_success());
    }
}

#[cfg(test)]
mod status_tests {
    use super::*;

    fn finished(success: bool) -> RunResult {
        RunResult::new(model_command(), success, String::new(), Duration::from_secs(1))
    }

    #[test]
    fn test_interrupted_result_is_cancelled_and_failed() {
        let result = finished(true).interrupted();
        assert!(result.cancelled);
        assert!(!result.success);
    }

    /// An action whose commands all finished keeps its real status even if
    /// a stop is requested afterwards.
    ///
    /// 所有命令都已完成的动作保留其真实状态，即使随后请求了停止。
    #[test]
    fn test_finished_commands_keep_their_status() {
        assert_eq!(status_of(&[finished(true), finished(true)]), ActionStatus::Succeeded);
        assert_eq!(status_of(&[finished(true), finished(false)]), ActionStatus::Failed);
        assert_eq!(status_of(&[]), ActionStatus::Succeeded);
    }

    #[test]
    fn test_interrupted_command_cancels_the_action() {
        let results = [finished(false), finished(true).interrupted()];
        assert_eq!(status_of(&results), ActionStatus::Cancelled);
    }
}
