// HTTP route handlers for the Gavel API

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use gavel_common::store;
use gavel_common::types::{
    CodeSaveRecord, Difficulty, Language, Problem, TestCaseFiles, Verdict,
};
use gavel_engine::{ExecutionResult, ExecutionStatus, StdinSource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::review::ReviewType;
use crate::{judge, review, AppState};

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub code: String,
    pub language: String,
    #[serde(default)]
    pub user_input: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub user_id: u64,
    pub problem_id: u64,
    pub code: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub verdict: String,
    pub details: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveCodeQuery {
    pub user_id: u64,
    pub problem_id: u64,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveCodeRequest {
    pub user_id: u64,
    pub problem_id: u64,
    pub language: String,
    #[serde(default)]
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub code: String,
    #[serde(rename = "reviewType")]
    pub review_type: ReviewType,
    pub problem_name: String,
    pub problem_statement: String,
    pub problem_constraints: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProblemRequest {
    pub name: String,
    pub statement: String,
    pub constraints: String,
    pub difficulty: Difficulty,
    pub test_case: TestCaseFiles,
}

/// HTTP mapping for the execution status taxonomy. Exhaustive on purpose:
/// a new status cannot ship without deciding its transport class.
fn status_code_for(status: ExecutionStatus) -> StatusCode {
    match status {
        ExecutionStatus::Success => StatusCode::OK,
        ExecutionStatus::CompilationError
        | ExecutionStatus::RuntimeError
        | ExecutionStatus::InvalidLanguage => StatusCode::BAD_REQUEST,
        ExecutionStatus::TimeoutError => StatusCode::REQUEST_TIMEOUT,
        ExecutionStatus::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /status - Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// POST /execute/run - Ad hoc run against user-supplied input.
/// Nothing is persisted and nothing is compared to an expected answer.
pub async fn run_custom_test(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RunRequest>,
) -> (StatusCode, Json<ExecutionResult>) {
    let Some(language) = Language::from_tag(&payload.language) else {
        let result = ExecutionResult::failure(
            ExecutionStatus::InvalidLanguage,
            format!("Language '{}' is not supported.", payload.language),
        );
        return (status_code_for(result.status), Json(result));
    };

    let budget = state.config.time_limit(language);
    let result = gavel_engine::execute(
        &state.config.scratch_dir,
        &payload.code,
        language,
        StdinSource::Bytes(payload.user_input.into_bytes()),
        budget,
    )
    .await;

    info!(%language, status = ?result.status, "custom run finished");
    (status_code_for(result.status), Json(result))
}

/// POST /execute/submit - Full judge pipeline.
pub async fn submit_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitRequest>,
) -> Response {
    if payload.code.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(SubmitResponse {
                verdict: "Invalid request.".to_string(),
                details: "All fields are required.".to_string(),
            }),
        )
            .into_response();
    }

    let Some(language) = Language::from_tag(&payload.language) else {
        // Rejected before any execution: no record, no process spawned.
        return (
            StatusCode::BAD_REQUEST,
            Json(SubmitResponse {
                verdict: Verdict::InvalidLanguage.to_string(),
                details: "Only 'c', 'cpp' and 'py' languages are supported.".to_string(),
            }),
        )
            .into_response();
    };

    match judge::judge(&state, payload.user_id, payload.problem_id, &payload.code, language).await
    {
        Ok(outcome) => (
            outcome.http_status,
            Json(SubmitResponse {
                verdict: outcome.verdict_label,
                details: outcome.details,
            }),
        )
            .into_response(),
        Err(e) => {
            error!(user_id = payload.user_id, problem_id = payload.problem_id, error = %e, "judge pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubmitResponse {
                    verdict: "Internal Server Error".to_string(),
                    details: format!("{:#}", e),
                }),
            )
                .into_response()
        }
    }
}

/// GET /save-code - Fetch the parked draft for (user, problem, language).
pub async fn get_saved_code(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SaveCodeQuery>,
) -> Response {
    let Some(language) = Language::from_tag(&query.language) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut conn = state.redis.clone();
    match store::get_saved_code(&mut conn, query.user_id, query.problem_id, language).await {
        Ok(Some(record)) => {
            (StatusCode::OK, Json(serde_json::json!({ "code": record.code }))).into_response()
        }
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!(error = %e, "failed to load saved code");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// POST /save-code - Upsert the draft for (user, problem, language).
pub async fn save_code(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveCodeRequest>,
) -> Response {
    let Some(language) = Language::from_tag(&payload.language) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let record = CodeSaveRecord {
        user_id: payload.user_id,
        problem_id: payload.problem_id,
        language,
        code: payload.code,
        updated_at: Utc::now(),
    };

    let mut conn = state.redis.clone();
    match store::save_code(&mut conn, &record).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => {
            error!(error = %e, "failed to save code");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// POST /ai-review - Delegate to the text-completion collaborator.
pub async fn ai_review(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ReviewRequest>,
) -> Response {
    let Some(client) = state.review.as_ref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "AI review is not configured" })),
        )
            .into_response();
    };

    let prompt = review::build_prompt(
        payload.review_type,
        &payload.code,
        &payload.problem_name,
        &payload.problem_statement,
        &payload.problem_constraints,
        &payload.language,
    );

    match client.generate(&prompt).await {
        Ok(text) => {
            (StatusCode::OK, Json(serde_json::json!({ "review": text }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "AI review failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// GET /submissions/{user_id} - Full history, newest first.
pub async fn user_submissions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
) -> Response {
    let mut conn = state.redis.clone();
    match store::list_submissions(&mut conn, user_id).await {
        Ok(submissions) => (
            StatusCode::OK,
            Json(serde_json::json!({ "submissions": submissions })),
        )
            .into_response(),
        Err(e) => {
            error!(user_id, error = %e, "failed to list submissions");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// GET /submissions/{user_id}/{problem_name} - History filtered to one
/// problem, newest first.
pub async fn user_problem_submissions(
    State(state): State<Arc<AppState>>,
    Path((user_id, problem_name)): Path<(u64, String)>,
) -> Response {
    let mut conn = state.redis.clone();

    let problem_id = match store::find_problem_id(&mut conn, &problem_name).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "Problem not found" })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to resolve problem name");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    match store::list_submissions(&mut conn, user_id).await {
        Ok(submissions) => {
            let filtered: Vec<_> = submissions
                .into_iter()
                .filter(|record| record.problem_id == problem_id)
                .collect();
            (
                StatusCode::OK,
                Json(serde_json::json!({ "submissions": filtered })),
            )
                .into_response()
        }
        Err(e) => {
            error!(user_id, error = %e, "failed to list submissions");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// POST /problems - Register a problem with its test-case file pair.
pub async fn create_problem(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateProblemRequest>,
) -> Response {
    let mut conn = state.redis.clone();

    let problem_id = match store::next_problem_id(&mut conn).await {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "failed to allocate problem id");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    let problem = Problem {
        id: problem_id,
        name: payload.name,
        statement: payload.statement,
        constraints: payload.constraints,
        difficulty: payload.difficulty,
        test_case: payload.test_case,
    };

    match store::put_problem(&mut conn, &problem).await {
        Ok(()) => {
            info!(problem_id, name = %problem.name, "problem registered");
            (StatusCode::CREATED, Json(problem)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to store problem");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// GET /problems/{problem_id}
pub async fn get_problem(
    State(state): State<Arc<AppState>>,
    Path(problem_id): Path<u64>,
) -> Response {
    let mut conn = state.redis.clone();
    match store::get_problem(&mut conn, problem_id).await {
        Ok(Some(problem)) => (StatusCode::OK, Json(problem)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Problem not found" })),
        )
            .into_response(),
        Err(e) => {
            error!(problem_id, error = %e, "failed to load problem");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_to_transport_mapping() {
        assert_eq!(status_code_for(ExecutionStatus::Success), StatusCode::OK);
        assert_eq!(
            status_code_for(ExecutionStatus::CompilationError),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_code_for(ExecutionStatus::RuntimeError),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_code_for(ExecutionStatus::InvalidLanguage),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_code_for(ExecutionStatus::TimeoutError),
            StatusCode::REQUEST_TIMEOUT
        );
        assert_eq!(
            status_code_for(ExecutionStatus::InternalError),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_run_request_defaults_empty_input() {
        let payload: RunRequest =
            serde_json::from_str(r#"{"code": "print(1)", "language": "py"}"#).unwrap();
        assert_eq!(payload.user_input, "");
    }

    #[test]
    fn test_review_request_uses_camel_case_tag() {
        let payload: ReviewRequest = serde_json::from_str(
            r#"{
                "reviewType": "bugFix",
                "problem_name": "Two Sum",
                "problem_statement": "...",
                "problem_constraints": "..."
            }"#,
        )
        .unwrap();
        assert_eq!(payload.review_type, ReviewType::BugFix);
        assert_eq!(payload.code, "");
        assert_eq!(payload.language, "");
    }
}
