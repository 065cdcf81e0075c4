use crate::handlers;
use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(handlers::health_check))
        .route("/execute/run", post(handlers::run_custom_test))
        .route("/execute/submit", post(handlers::submit_code))
        .route(
            "/save-code",
            get(handlers::get_saved_code).post(handlers::save_code),
        )
        .route("/ai-review", post(handlers::ai_review))
        .route("/submissions/:user_id", get(handlers::user_submissions))
        .route(
            "/submissions/:user_id/:problem_name",
            get(handlers::user_problem_submissions),
        )
        .route("/problems", post(handlers::create_problem))
        .route("/problems/:problem_id", get(handlers::get_problem))
}
