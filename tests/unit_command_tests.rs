//! # Command Module Unit Tests / Command 模块单元测试
//!
//! This module tests spawning external tools and capturing their output.
//! The tests rely on a POSIX shell and only run on unix.
//!
//! 此模块测试派生外部工具并捕获其输出。这些测试依赖 POSIX shell，仅在 unix 上运行。

#![cfg(unix)]

use rv2_matrix::core::models::RunResult;
use rv2_matrix::core::planner::CommandSpec;
use rv2_matrix::infra::command::{build_command, spawn_and_capture};
use std::time::{Duration, Instant};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("sh", ["-c", script])
}

#[cfg(test)]
mod spawn_and_capture_tests {
    use super::*;

    #[tokio::test]
    async fn test_captures_stdout_and_stderr() {
        let dir = tempdir().unwrap();
        let cmd = build_command(&sh("echo out; echo err >&2"), dir.path());

        let captured = spawn_and_capture(cmd, &CancellationToken::new()).await;

        assert!(captured.success());
        assert!(captured.output.contains("out\n"));
        assert!(captured.output.contains("err\n"));
        assert!(!captured.cancelled);
    }

    #[tokio::test]
    async fn test_runs_in_working_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "here").unwrap();
        let cmd = build_command(&sh("cat marker.txt"), dir.path());

        let captured = spawn_and_capture(cmd, &CancellationToken::new()).await;

        assert!(captured.success());
        assert_eq!(captured.output, "here\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let dir = tempdir().unwrap();
        let cmd = build_command(&sh("echo boom; exit 3"), dir.path());

        let captured = spawn_and_capture(cmd, &CancellationToken::new()).await;

        assert!(!captured.success());
        assert_eq!(captured.status.as_ref().unwrap().code(), Some(3));
        assert!(captured.output.contains("boom"));
    }

    #[tokio::test]
    async fn test_missing_program_reports_spawn_error() {
        let dir = tempdir().unwrap();
        let spec = CommandSpec::new("rv2-matrix-no-such-tool", Vec::<String>::new());
        let cmd = build_command(&spec, dir.path());

        let captured = spawn_and_capture(cmd, &CancellationToken::new()).await;

        assert!(captured.status.is_err());
        assert!(!captured.success());
        assert!(captured.output.is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_kills_child() {
        let dir = tempdir().unwrap();
        let cmd = build_command(&sh("exec sleep 30"), dir.path());
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            canceller.cancel();
        });

        let start = Instant::now();
        let captured = spawn_and_capture(cmd, &token).await;

        assert!(captured.cancelled);
        assert!(!captured.success());
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_invalid_utf8_does_not_truncate_output() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("report.xml"),
            "<?xml version=\"1.0\"?>\n<report><test><title>Suite</title>\
             <test_cases><tc><no>1</no><func>TC_A</func><dbgi></dbgi><res>PASSED</res></tc>\
             </test_cases><summary><tcnt>1</tcnt><exec>1</exec><pass>1</pass><fail>0</fail>\
             <warn>0</warn><tres>PASSED</tres></summary></test></report>\n",
        )
        .unwrap();
        let spec = sh("printf 'boot \\377\\n'; cat report.xml; printf 'done'");
        let cmd = build_command(&spec, dir.path());

        let captured = spawn_and_capture(cmd, &CancellationToken::new()).await;

        assert!(captured.success());
        assert!(captured.output.starts_with("boot \u{FFFD}\n"));
        assert!(captured.output.ends_with("</report>\ndone\n"));

        let result = RunResult::new(spec, true, captured.output, Duration::ZERO);
        assert_eq!(result.test_report().unwrap().test.title, "Suite");
    }
}
