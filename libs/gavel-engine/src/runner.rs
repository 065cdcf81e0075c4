//! Deadline-bounded process execution with stdin wiring.
//!
//! The child is untrusted: the deadline is a hard external timer around the
//! wait, and `kill_on_drop` delivers SIGKILL the moment the wait future is
//! dropped at expiry - never a cooperative check the child could ignore.

use crate::result::{ExecutionResult, ExecutionStatus, StdinSource};
use std::io::ErrorKind;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Run `command` to completion under `budget`, feeding stdin from `stdin`
/// and capturing both output streams. Every failure mode is folded into the
/// status taxonomy - this function never returns a raw error.
pub async fn run(mut command: Command, stdin: StdinSource, budget: Duration) -> ExecutionResult {
    command
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match &stdin {
        StdinSource::Bytes(_) => {
            command.stdin(Stdio::piped());
        }
        StdinSource::File(path) => {
            let file = match std::fs::File::open(path) {
                Ok(file) => file,
                Err(e) => {
                    return ExecutionResult::failure(
                        ExecutionStatus::InternalError,
                        format!("failed to open input file {}: {}", path.display(), e),
                    )
                }
            };
            command.stdin(Stdio::from(file));
        }
    }

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return ExecutionResult::failure(
                ExecutionStatus::InternalError,
                "Executable or interpreter not found. Is it installed and on PATH?",
            )
        }
        Err(e) => {
            return ExecutionResult::failure(
                ExecutionStatus::InternalError,
                format!("failed to start process: {}", e),
            )
        }
    };

    if let StdinSource::Bytes(bytes) = stdin {
        if let Some(mut handle) = child.stdin.take() {
            // Written from a separate task so a child that never reads
            // stdin cannot wedge us before the deadline starts.
            tokio::spawn(async move {
                if let Err(e) = handle.write_all(&bytes).await {
                    debug!(error = %e, "stdin buffer not fully consumed");
                }
            });
        }
    }

    let started = Instant::now();
    let collected = match timeout(budget, child.wait_with_output()).await {
        Err(_) => {
            return ExecutionResult::failure(
                ExecutionStatus::TimeoutError,
                format!("Execution timed out after {} ms.", budget.as_millis()),
            )
        }
        Ok(Err(e)) => {
            return ExecutionResult::failure(
                ExecutionStatus::InternalError,
                format!("failed to collect process output: {}", e),
            )
        }
        Ok(Ok(output)) => output,
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;

    // Invalid byte sequences are replaced, never fatal: an execution result
    // must not fail solely because the program printed non-UTF-8 bytes.
    let stdout = String::from_utf8_lossy(&collected.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&collected.stderr).into_owned();

    if !stderr.is_empty() {
        ExecutionResult::failure(ExecutionStatus::RuntimeError, stderr)
    } else if !collected.status.success() {
        ExecutionResult::failure(
            ExecutionStatus::RuntimeError,
            silent_failure_details(collected.status.code()),
        )
    } else {
        ExecutionResult::success(stdout, elapsed_ms)
    }
}

/// Diagnostic for a nonzero exit that produced no stderr at all.
fn silent_failure_details(exit_code: Option<i32>) -> String {
    let status = match exit_code {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    };
    format!(
        "Process failed ({}) without diagnostics. Likely causes: reading input that was \
         never provided on stdin, infinite recursion, or producing an excessive volume of data.",
        status
    )
}
