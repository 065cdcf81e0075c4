// CLI commands for running submissions locally
use anyhow::{bail, Context, Result};
use gavel_common::config::Config;
use gavel_common::types::Language;
use gavel_engine::{ExecutionStatus, StdinSource};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Execute one local source file and print the outcome. Exits nonzero (via
/// the returned error) for every non-success status so the command composes
/// in scripts.
pub async fn run_file(
    file: &Path,
    language_tag: Option<&str>,
    input: Option<PathBuf>,
    stdin_text: Option<String>,
    time_limit_ms: Option<u64>,
    json: bool,
) -> Result<()> {
    let code = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read source file {}", file.display()))?;

    let language = match language_tag {
        Some(tag) => Language::from_tag(tag)
            .with_context(|| format!("unsupported language '{}'; valid tags: c, cpp, py", tag))?,
        None => infer_language(file)?,
    };

    let config = Config::from_env();
    let budget = time_limit_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.time_limit(language));

    let stdin = match (input, stdin_text) {
        (Some(path), _) => StdinSource::File(path),
        (None, Some(text)) => StdinSource::Bytes(text.into_bytes()),
        (None, None) => StdinSource::Bytes(Vec::new()),
    };

    if !json {
        println!("→ Running {} as {}", file.display(), language);
        println!("  Time limit: {}ms", budget.as_millis());
        println!();
    }

    let result = gavel_engine::execute(&config.scratch_dir, &code, language, stdin, budget).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        if result.status != ExecutionStatus::Success {
            bail!("execution finished with status {}", status_label(result.status));
        }
        return Ok(());
    }

    match result.status {
        ExecutionStatus::Success => {
            println!("✓ Finished in {}ms", result.elapsed_ms.unwrap_or(0));
            println!();
            print!("{}", result.output.unwrap_or_default());
            Ok(())
        }
        status => {
            println!("✗ {}", status_label(status));
            if let Some(details) = &result.details {
                println!();
                println!("{}", details);
            }
            bail!("execution finished with status {}", status_label(status));
        }
    }
}

fn infer_language(path: &Path) -> Result<Language> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    match extension {
        "c" => Ok(Language::C),
        "cpp" | "cc" | "cxx" => Ok(Language::Cpp),
        "py" => Ok(Language::Py),
        _ => bail!(
            "cannot infer language from '{}'; pass --language",
            path.display()
        ),
    }
}

fn status_label(status: ExecutionStatus) -> &'static str {
    match status {
        ExecutionStatus::Success => "success",
        ExecutionStatus::CompilationError => "compilation error",
        ExecutionStatus::RuntimeError => "runtime error",
        ExecutionStatus::TimeoutError => "time limit exceeded",
        ExecutionStatus::InvalidLanguage => "invalid language",
        ExecutionStatus::InternalError => "internal error",
    }
}
