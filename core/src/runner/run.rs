use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

use crate::error::RunnerError;

use super::exit::normalize_exit;
use super::types::{ToolInvocation, ToolOutput};

fn build_command(inv: &ToolInvocation) -> Command {
    let mut cmd = Command::new(&inv.cmd);
    cmd.args(&inv.args)
        .envs(&inv.envs)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

fn spawn(inv: &ToolInvocation, kill_on_drop: bool) -> Result<tokio::process::Child, RunnerError> {
    build_command(inv)
        .kill_on_drop(kill_on_drop)
        .spawn()
        .map_err(|source| RunnerError::Spawn {
            program: inv.cmd.clone(),
            source,
        })
}

fn collect(inv: &ToolInvocation, out: std::process::Output) -> ToolOutput {
    let output = ToolOutput {
        exit_code: normalize_exit(out.status),
        stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
    };
    tracing::debug!(
        target: "skullstrip.runner",
        cmd = %inv.cmd,
        exit_code = output.exit_code,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "process exited"
    );
    output
}

/// Runs `inv` to completion. There is no timeout; the caller is blocked
/// until the child exits.
pub async fn run_tool(inv: &ToolInvocation) -> Result<ToolOutput, RunnerError> {
    tracing::info!(target: "skullstrip.runner", command = %inv.command_line(), "running external tool");

    let child = spawn(inv, false)?;
    let out = child
        .wait_with_output()
        .await
        .map_err(|source| RunnerError::Io {
            program: inv.cmd.clone(),
            source,
        })?;
    Ok(collect(inv, out))
}

/// Like [`run_tool`] but gives up after `timeout`, killing the child.
pub async fn query_output(inv: &ToolInvocation, timeout: Duration) -> Result<ToolOutput, RunnerError> {
    tracing::debug!(target: "skullstrip.runner", command = %inv.command_line(), ?timeout, "querying tool");

    let child = spawn(inv, true)?;
    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(out)) => Ok(collect(inv, out)),
        Ok(Err(source)) => Err(RunnerError::Io {
            program: inv.cmd.clone(),
            source,
        }),
        Err(_) => Err(RunnerError::Timeout {
            program: inv.cmd.clone(),
            timeout,
        }),
    }
}
