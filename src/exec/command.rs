// src/exec/command.rs

//! Shell command executor used for tasks defined in a config file.

use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::exec::executor::{TaskExecutor, TaskFuture};
use crate::outcome::{Outcomes, TaskPanic};
use crate::types::TaskKey;

/// Value of a command that exited successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Everything the command wrote to stdout.
    pub stdout: String,
}

/// Reason a command task was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandFailure {
    #[error("exited with status {code}")]
    ExitStatus { code: i32 },

    #[error("terminated without an exit code")]
    Terminated,

    #[error("could not spawn process: {0}")]
    Spawn(String),

    #[error("{0}")]
    Panicked(String),
}

impl From<TaskPanic> for CommandFailure {
    fn from(panic: TaskPanic) -> Self {
        CommandFailure::Panicked(panic.to_string())
    }
}

/// Runs `cmd` through the platform shell (`sh -c`, or `cmd /C` on Windows).
///
/// Outcomes of tasks finished before this one started are exported to the
/// child as `TASKING_STATUS_<KEY>=fulfilled|rejected`.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    task: TaskKey,
    cmd: String,
}

impl ShellCommand {
    pub fn new(task: impl Into<TaskKey>, cmd: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            cmd: cmd.into(),
        }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }
}

impl TaskExecutor<CommandOutput, CommandFailure> for ShellCommand {
    fn execute(
        &self,
        outcomes: Outcomes<CommandOutput, CommandFailure>,
    ) -> TaskFuture<CommandOutput, CommandFailure> {
        let task = self.task.clone();
        let cmd = self.cmd.clone();
        Box::pin(async move { run_command(&task, &cmd, &outcomes).await })
    }
}

/// Environment variable name carrying the outcome of task `key`.
pub fn status_env_var(key: &str) -> String {
    let suffix: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("TASKING_STATUS_{suffix}")
}

async fn run_command(
    task: &str,
    cmd_line: &str,
    outcomes: &Outcomes<CommandOutput, CommandFailure>,
) -> Result<CommandOutput, CommandFailure> {
    info!(task = %task, cmd = %cmd_line, "starting task process");

    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_line);
        c
    };

    for (key, outcome) in outcomes {
        cmd.env(status_env_var(key), outcome.kind().to_string());
    }

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|e| CommandFailure::Spawn(e.to_string()))?;

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let task_name = task.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(task = %task_name, "stderr: {}", line);
            }
        });
    }

    let output = child
        .wait_with_output()
        .await
        .map_err(|e| CommandFailure::Spawn(e.to_string()))?;

    let code = output.status.code();
    info!(
        task = %task,
        exit_code = code.unwrap_or(-1),
        success = output.status.success(),
        "task process exited"
    );

    match code {
        Some(0) => Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        }),
        Some(code) => Err(CommandFailure::ExitStatus { code }),
        None => Err(CommandFailure::Terminated),
    }
}
