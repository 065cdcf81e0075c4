//! Toolchain invocation for compiled languages.

use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Outcome of one compile attempt. `Failed` carries the toolchain's stderr
/// verbatim - that text is the user-facing compilation diagnostic.
#[derive(Debug)]
pub enum CompileOutcome {
    Ok,
    /// Toolchain binary missing from the environment - an operator problem,
    /// not a user one.
    ToolchainNotFound,
    Timeout,
    Failed(String),
}

/// Compile `source` into `output` as `<toolchain> <source> -o <output>`,
/// bounded by `budget`. On expiry the compiler is killed via kill_on_drop
/// when the wait future is dropped.
pub async fn compile(
    source: &Path,
    output: &Path,
    toolchain: &str,
    budget: Duration,
) -> Result<CompileOutcome> {
    debug!(toolchain, source = %source.display(), "compiling");

    let spawned = Command::new(toolchain)
        .arg(source)
        .arg("-o")
        .arg(output)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let child = match spawned {
        Ok(child) => child,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Ok(CompileOutcome::ToolchainNotFound)
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to spawn toolchain '{}'", toolchain))
        }
    };

    let collected = match timeout(budget, child.wait_with_output()).await {
        Err(_) => return Ok(CompileOutcome::Timeout),
        Ok(result) => result
            .with_context(|| format!("failed to collect '{}' diagnostics", toolchain))?,
    };

    if collected.status.success() {
        Ok(CompileOutcome::Ok)
    } else {
        Ok(CompileOutcome::Failed(
            String::from_utf8_lossy(&collected.stderr).into_owned(),
        ))
    }
}
