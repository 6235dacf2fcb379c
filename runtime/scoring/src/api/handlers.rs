use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use tracing::debug;

use crate::models::{AnalyzeRequest, ScoreRequest};
use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.health(&state.config.model.path))
}

pub async fn score_features(
    State(state): State<AppState>,
    Json(payload): Json<ScoreRequest>,
) -> impl IntoResponse {
    match state.engine.score(&payload.features) {
        Ok(scored) => {
            debug!(risk = scored.risk, is_anomaly = scored.is_anomaly, "Scored feature vector");
            (StatusCode::OK, Json(scored)).into_response()
        }
        Err(e) => {
            tracing::error!("Scoring failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

pub async fn analyze_payload(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    match state.engine.analyze(&payload.payload) {
        Ok(report) => {
            debug!(risk = report.risk, verdict = ?report.verdict, "Analyzed payload");
            (StatusCode::OK, Json(report)).into_response()
        }
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::routes;
    use crate::config::{Config, VerdictConfig};
    use crate::engine::tests::trained_artifact;
    use crate::engine::ScoringEngine;
    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use detector::extract_features;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(engine: ScoringEngine) -> Router {
        routes().with_state(AppState {
            engine: Arc::new(engine),
            config: Config::default(),
        })
    }

    fn degraded_app() -> Router {
        app(ScoringEngine::new(None, VerdictConfig::default()))
    }

    fn trained_app() -> Router {
        app(ScoringEngine::new(
            Some(trained_artifact()),
            VerdictConfig::default(),
        ))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_score_without_model_returns_fallback() {
        let (status, body) = post_json(
            degraded_app(),
            "/score",
            json!({"features": [11, 0.36, 2, 0, 0, 2.66]}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"risk": 0.5, "is_anomaly": false, "message": "Model not loaded"})
        );
    }

    #[tokio::test]
    async fn test_score_flags_known_attack() {
        let features = extract_features("<script>alert(1)</script>").to_array();
        let (status, body) =
            post_json(trained_app(), "/score", json!({ "features": features })).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_anomaly"], json!(true));
        let risk = body["risk"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&risk));
        assert!(body["score"].as_f64().unwrap() < 0.0);
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn test_score_wrong_dimension_is_server_error() {
        let (status, body) =
            post_json(trained_app(), "/score", json!({"features": [1, 2, 3]})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("expected 6 features"));
    }

    #[tokio::test]
    async fn test_analyze_reports_features_and_verdict() {
        let (status, body) = post_json(
            trained_app(),
            "/analyze",
            json!({"payload": "<script>alert(1)</script>"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["features"]["xss_keywords"], json!(2.0));
        assert_eq!(body["is_anomaly"], json!(true));
        let verdict = body["verdict"].as_str().unwrap();
        assert_eq!(verdict, "Blocked");
        assert_eq!(body["threat_type"], json!("XSS"));
    }

    #[tokio::test]
    async fn test_health_reports_model_state() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = degraded_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["model_loaded"], json!(false));
        assert_eq!(body["model_path"], json!(detector::DEFAULT_MODEL_PATH));
        assert!(body.get("trained_at").is_none());
    }
}
