pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use crate::api::handlers::{analyze_payload, health, score_features};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/score", post(score_features))
        .route("/analyze", post(analyze_payload))
}
