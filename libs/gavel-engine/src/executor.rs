//! Per-language execution orchestration.
//!
//! Owns the pipeline: workspace setup -> (compile) -> (heuristic check) ->
//! run -> workspace teardown. Teardown is bound to the call via a drop
//! guard, so it runs exactly once on every path, including propagated
//! errors that the catch-all converts into `internal_error`.

use crate::compiler::{self, CompileOutcome};
use crate::heuristic;
use crate::result::{ExecutionResult, ExecutionStatus, StdinSource};
use crate::runner;
use crate::workspace::{ReleaseGuard, Workspace};
use anyhow::{Context, Result};
use gavel_common::types::Language;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// Interpreter used for `py` submissions.
pub const PYTHON_INTERPRETER: &str = "python3";

/// Execute one request end to end. Never returns a raw error: anything the
/// pipeline throws is folded into an `internal_error` result after the
/// workspace guard has cleaned up.
pub async fn execute(
    scratch_root: &Path,
    code: &str,
    language: Language,
    stdin: StdinSource,
    budget: Duration,
) -> ExecutionResult {
    match run_pipeline(scratch_root, code, language, stdin, budget).await {
        Ok(result) => result,
        Err(e) => ExecutionResult::failure(
            ExecutionStatus::InternalError,
            format!("An unexpected server error occurred: {:#}", e),
        ),
    }
}

async fn run_pipeline(
    scratch_root: &Path,
    code: &str,
    language: Language,
    stdin: StdinSource,
    budget: Duration,
) -> Result<ExecutionResult> {
    let workspace = Workspace::acquire(scratch_root, language)?;
    let _cleanup = ReleaseGuard(&workspace);
    workspace.write_source(code)?;

    debug!(%language, source = %workspace.source_path.display(), "executing request");

    match language {
        Language::C => compile_and_run(&workspace, "gcc", code, stdin, budget).await,
        Language::Cpp => compile_and_run(&workspace, "g++", code, stdin, budget).await,
        Language::Py => {
            let mut command = Command::new(PYTHON_INTERPRETER);
            command.arg(&workspace.source_path);
            Ok(runner::run(command, stdin, budget).await)
        }
    }
}

async fn compile_and_run(
    workspace: &Workspace,
    toolchain: &str,
    code: &str,
    stdin: StdinSource,
    budget: Duration,
) -> Result<ExecutionResult> {
    let executable = workspace
        .executable_path
        .as_deref()
        .context("compiled-language workspace is missing an executable path")?;

    let outcome = compiler::compile(&workspace.source_path, executable, toolchain, budget).await?;

    match outcome {
        CompileOutcome::ToolchainNotFound => Ok(ExecutionResult::failure(
            ExecutionStatus::InternalError,
            format!("{} not found. Is it installed and on PATH?", toolchain),
        )),
        CompileOutcome::Timeout => Ok(ExecutionResult::failure(
            ExecutionStatus::CompilationError,
            format!("Compilation timed out after {} ms.", budget.as_millis()),
        )),
        CompileOutcome::Failed(diagnostics) => Ok(ExecutionResult::failure(
            ExecutionStatus::CompilationError,
            diagnostics,
        )),
        CompileOutcome::Ok => {
            // A program that reads cin with nothing on stdin would block
            // until the deadline; fail fast with a pointed message instead.
            if stdin.is_empty_bytes() && heuristic::uses_interactive_read(code) {
                return Ok(ExecutionResult::failure(
                    ExecutionStatus::RuntimeError,
                    "The program reads from stdin but no input was provided. \
                     Did you forget to supply input before running?",
                ));
            }

            Ok(runner::run(Command::new(executable), stdin, budget).await)
        }
    }
}
