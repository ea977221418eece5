//! # Command Execution Module / 命令执行模块
//!
//! Spawns external tools and captures their combined output.
//!
//! 派生外部工具并捕获它们的合并输出。

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::core::planner::CommandSpec;

/// Result of a captured process.
#[derive(Debug)]
pub struct Captured {
    /// Exit status, or the error that prevented the process from running.
    pub status: std::io::Result<ExitStatus>,
    /// Combined stdout and stderr, in arrival order.
    pub output: String,
    /// `true` if the process was killed because `stop_token` fired.
    pub cancelled: bool,
}

impl Captured {
    pub fn success(&self) -> bool {
        !self.cancelled && matches!(&self.status, Ok(status) if status.success())
    }
}

/// Builds a tokio command for `spec`, running in `working_dir`.
pub fn build_command(spec: &CommandSpec, working_dir: &Path) -> Command {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    cmd
}

/// Spawns a command, captures its stdout and stderr.
/// The output streams are read concurrently and combined into a single string.
/// If `stop_token` is cancelled first, the child is killed.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。
/// 如果 `stop_token` 先被取消，子进程将被终止。
pub async fn spawn_and_capture(mut cmd: Command, stop_token: &CancellationToken) -> Captured {
    let mut child = match cmd
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            return Captured {
                status: Err(e),
                output: String::new(),
                cancelled: false,
            };
        }
    };

    // Use an Arc<Mutex<String>> to allow concurrent writes from stdout and stderr tasks.
    // 使用 Arc<Mutex<String>> 来允许多个任务（stdout 和 stderr）并发写入。
    let output = Arc::new(Mutex::new(String::new()));
    let stdout_handle = child
        .stdout
        .take()
        .map(|stdout| tokio::spawn(collect_lines(stdout, Arc::clone(&output))));
    let stderr_handle = child
        .stderr
        .take()
        .map(|stderr| tokio::spawn(collect_lines(stderr, Arc::clone(&output))));

    let (status, cancelled) = tokio::select! {
        status = child.wait() => (status, false),
        _ = stop_token.cancelled() => {
            if let Err(e) = child.kill().await {
                tracing::warn!("failed to kill child process: {e}");
            }
            (child.wait().await, true)
        }
    };

    // Wait for the readers so that all output is captured.
    // 等待读取任务完成，以确保所有输出都被捕获。
    for handle in [stdout_handle, stderr_handle].into_iter().flatten() {
        if let Err(e) = handle.await {
            tracing::warn!("failed to join output reader: {e}");
        }
    }

    let output = output.lock().await.clone();
    Captured {
        status,
        output,
        cancelled,
    }
}

/// Appends every line from `reader` to `output` until EOF.
/// Target consoles may print invalid UTF-8; such bytes are replaced, not dropped.
async fn collect_lines<R>(reader: R, output: Arc<Mutex<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let mut output = output.lock().await;
                output.push_str(&String::from_utf8_lossy(&buf));
                if !buf.ends_with(b"\n") {
                    output.push('\n');
                }
            }
            Err(e) => {
                tracing::warn!("failed to read child output: {e}");
                break;
            }
        }
    }
}
