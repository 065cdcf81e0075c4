//! Full judge pipeline: execute against the problem's test-case files,
//! compare normalized outputs, persist the submission record.

use crate::AppState;
use anyhow::{Context, Result};
use axum::http::StatusCode;
use chrono::Utc;
use gavel_common::store;
use gavel_common::types::{Language, SubmissionRecord, Verdict};
use gavel_engine::verdict;
use gavel_engine::{ExecutionStatus, StdinSource};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

pub struct JudgeOutcome {
    pub verdict_label: String,
    pub details: String,
    pub http_status: StatusCode,
}

/// Judge one submission. Returns `Err` only for operator-facing failures
/// (store unreachable, expected-output file unreadable, engine internal
/// error); those surface as 500 and never create a submission record.
pub async fn judge(
    state: &AppState,
    user_id: u64,
    problem_id: u64,
    code: &str,
    language: Language,
) -> Result<JudgeOutcome> {
    let mut conn = state.redis.clone();

    let Some(problem) = store::get_problem(&mut conn, problem_id).await? else {
        return Ok(JudgeOutcome {
            verdict_label: "Invalid request.".to_string(),
            details: "Problem not found.".to_string(),
            http_status: StatusCode::NOT_FOUND,
        });
    };

    let budget = state.config.time_limit(language);
    let input_path = PathBuf::from(&problem.test_case.input_path);

    let result = gavel_engine::execute(
        &state.config.scratch_dir,
        code,
        language,
        StdinSource::File(input_path),
        budget,
    )
    .await;

    if result.status == ExecutionStatus::InternalError {
        anyhow::bail!(
            "execution failed: {}",
            result
                .details
                .unwrap_or_else(|| "no diagnostics available".to_string())
        );
    }

    // The expected answer is only consulted when the program actually ran
    // to completion; a missing answer file must not mask a compile error.
    let expected = if result.status == ExecutionStatus::Success {
        tokio::fs::read_to_string(&problem.test_case.output_path)
            .await
            .with_context(|| {
                format!(
                    "failed to read expected output {}",
                    problem.test_case.output_path
                )
            })?
    } else {
        String::new()
    };

    let Some(verdict) = verdict::verdict_for(&result, &expected) else {
        anyhow::bail!("execution produced no verdict");
    };

    let time_taken_ms = time_taken_for(&result, budget);

    if verdict.is_recorded() {
        let record = SubmissionRecord {
            id: Uuid::new_v4(),
            user_id,
            problem_id,
            problem_name: problem.name.clone(),
            language,
            code: code.to_string(),
            verdict,
            time_taken_ms,
            created_at: Utc::now(),
        };
        if let Err(e) = store::record_submission(&mut conn, &record).await {
            // A persistence hiccup must not flip an already-judged verdict
            // into a server error.
            warn!(user_id, problem_id, error = %e, "failed to persist submission record");
        }
    }

    let details = match verdict {
        Verdict::Accepted => "All test cases passed.".to_string(),
        Verdict::WrongAnswer => "Test cases failed. Please check your code.".to_string(),
        _ => result.details.clone().unwrap_or_default(),
    };

    info!(user_id, problem_id, %language, %verdict, time_taken_ms, "submission judged");

    Ok(JudgeOutcome {
        verdict_label: verdict.to_string(),
        details,
        http_status: http_status_for(verdict),
    })
}

/// Persisted duration: measured on success, the configured budget on
/// timeout (the conventional per-language value), zero otherwise.
fn time_taken_for(result: &gavel_engine::ExecutionResult, budget: Duration) -> u64 {
    match result.status {
        ExecutionStatus::Success => result.elapsed_ms.unwrap_or(0),
        ExecutionStatus::TimeoutError => budget.as_millis() as u64,
        _ => 0,
    }
}

fn http_status_for(verdict: Verdict) -> StatusCode {
    match verdict {
        // A completed run is 200 whether or not the answer matched.
        Verdict::Accepted | Verdict::WrongAnswer => StatusCode::OK,
        Verdict::TimeLimitExceeded => StatusCode::REQUEST_TIMEOUT,
        Verdict::CompilationError
        | Verdict::RuntimeError
        | Verdict::InvalidLanguage
        | Verdict::MemoryLimitExceeded => StatusCode::BAD_REQUEST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_engine::ExecutionResult;

    #[test]
    fn test_time_taken_measured_on_success() {
        let result = ExecutionResult::success("out".to_string(), 123);
        assert_eq!(time_taken_for(&result, Duration::from_millis(2000)), 123);
    }

    #[test]
    fn test_time_taken_is_budget_on_timeout() {
        let result = ExecutionResult::failure(ExecutionStatus::TimeoutError, "too slow");
        assert_eq!(time_taken_for(&result, Duration::from_millis(7000)), 7000);
    }

    #[test]
    fn test_time_taken_zero_elsewhere() {
        for status in [
            ExecutionStatus::CompilationError,
            ExecutionStatus::RuntimeError,
            ExecutionStatus::InvalidLanguage,
        ] {
            let result = ExecutionResult::failure(status, "details");
            assert_eq!(time_taken_for(&result, Duration::from_millis(2000)), 0);
        }
    }

    #[test]
    fn test_http_status_per_verdict() {
        assert_eq!(http_status_for(Verdict::Accepted), StatusCode::OK);
        assert_eq!(http_status_for(Verdict::WrongAnswer), StatusCode::OK);
        assert_eq!(
            http_status_for(Verdict::TimeLimitExceeded),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            http_status_for(Verdict::CompilationError),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            http_status_for(Verdict::RuntimeError),
            StatusCode::BAD_REQUEST
        );
    }
}
