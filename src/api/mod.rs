//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Timer commands
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/resume", post(resume_handler))
        .route("/toggle", post(toggle_handler))
        .route("/stop", post(stop_handler))
        .route("/restart-phase", post(restart_phase_handler))
        .route("/skip", post(skip_handler))
        .route("/add-time", post(add_time_handler))
        .route("/mute", post(mute_handler))
        // Host lifecycle
        .route("/background", post(background_handler))
        .route("/foreground", post(foreground_handler))
        .route("/resync", post(resync_handler))
        // Read-only views
        .route("/status", get(status_handler))
        .route("/presets", get(presets_handler))
        .route("/notifications", get(notifications_handler))
        .route("/history", get(history_handler).delete(clear_history_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{services::ChannelTicker, timer::CueSettings};

    fn router() -> (Router, Arc<AppState>) {
        let (ticker, _rx) = ChannelTicker::new();
        let state = Arc::new(AppState::new(
            20554,
            "127.0.0.1".to_string(),
            CueSettings::default(),
            Arc::new(ticker),
        ));
        (create_router(Arc::clone(&state)), state)
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn start_from_preset() {
        let (router, _) = router();
        let (status, body) = send(&router, Method::POST, "/start", Some(json!({"preset": "boxing standard"}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["timer"]["phase"], "prepare");
        assert_eq!(body["timer"]["time_remaining"], 10);
        assert_eq!(body["timer"]["total_rounds"], 12);
    }

    #[tokio::test]
    async fn start_from_explicit_schedule_without_prepare() {
        let (router, _) = router();
        let schedule = json!({"name": "Sparring", "round_seconds": 120, "rest_seconds": 0, "rounds": 4});
        let (status, body) = send(&router, Method::POST, "/start", Some(json!({"schedule": schedule}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["phase"], "round");
        assert_eq!(body["timer"]["current_round"], 1);
        assert_eq!(body["timer"]["preset_name"], "Sparring");
    }

    #[tokio::test]
    async fn start_rejects_bad_input() {
        let (router, _) = router();

        let (status, body) = send(&router, Method::POST, "/start", Some(json!({"preset": "karate"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "unknown preset 'karate'");

        let (status, _) = send(&router, Method::POST, "/start", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let zero_rounds = json!({"schedule": {"round_seconds": 60, "rounds": 0}});
        let (status, _) = send(&router, Method::POST, "/start", Some(zero_rounds)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn command_flow() {
        let (router, state) = router();
        send(&router, Method::POST, "/start", Some(json!({"preset": "quick training"}))).await;

        let (_, body) = send(&router, Method::POST, "/pause", None).await;
        assert_eq!(body["status"], "stopped");
        assert_eq!(body["timer"]["is_running"], false);

        let (_, body) = send(&router, Method::POST, "/toggle", None).await;
        assert_eq!(body["timer"]["is_running"], true);

        let (_, body) = send(&router, Method::POST, "/skip", None).await;
        assert_eq!(body["timer"]["phase"], "round");
        assert_eq!(body["timer"]["time_remaining"], 120);

        let (_, body) = send(&router, Method::POST, "/add-time", Some(json!({"seconds": -20}))).await;
        assert_eq!(body["timer"]["time_remaining"], 100);

        let (_, body) = send(&router, Method::POST, "/restart-phase", None).await;
        assert_eq!(body["timer"]["time_remaining"], 120);

        let (_, body) = send(&router, Method::POST, "/mute", Some(json!({"muted": true}))).await;
        assert_eq!(body["timer"]["muted"], true);

        let (_, body) = send(&router, Method::POST, "/stop", None).await;
        assert_eq!(body["timer"]["phase"], "idle");
        assert_eq!(body["timer"]["current_round"], 1);

        assert_eq!(state.history.records().unwrap().len(), 1);
        assert_eq!(state.get_last_action().0.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn background_round_trip_never_duplicates() {
        let (router, _) = router();
        send(&router, Method::POST, "/start", Some(json!({"preset": "mma style"}))).await;

        send(&router, Method::POST, "/background", None).await;
        send(&router, Method::POST, "/background", None).await;
        let (_, pending) = send(&router, Method::GET, "/notifications", None).await;
        // Round 1, four rest/round pairs, finished.
        assert_eq!(pending.as_array().unwrap().len(), 10);

        let (_, body) = send(&router, Method::POST, "/foreground", None).await;
        assert_eq!(body["timer"]["in_background"], false);
        let (_, pending) = send(&router, Method::GET, "/notifications", None).await;
        assert!(pending.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn status_presets_and_health() {
        let (router, _) = router();

        let (status, body) = send(&router, Method::GET, "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["phase"], "idle");
        assert_eq!(body["timer"]["phase_display_name"], "Ready");
        assert_eq!(body["settings"]["warning_threshold"], 10);
        assert_eq!(body["port"], 20554);

        let (_, presets) = send(&router, Method::GET, "/presets", None).await;
        assert_eq!(presets.as_array().unwrap().len(), 5);
        assert_eq!(presets[0]["name"], "Boxing Standard");

        let (_, health) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(health["status"], "ok");
    }

    #[tokio::test]
    async fn history_lists_and_clears() {
        let (router, _) = router();
        send(&router, Method::POST, "/start", Some(json!({"preset": "bjj rolling"}))).await;
        send(&router, Method::POST, "/stop", None).await;

        let (_, body) = send(&router, Method::GET, "/history", None).await;
        assert_eq!(body["stats"]["total_workouts"], 1);
        assert_eq!(body["records"][0]["preset_name"], "BJJ Rolling");
        assert_eq!(body["formatted_total_time"], "0m");

        let (status, _) = send(&router, Method::DELETE, "/history", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, body) = send(&router, Method::GET, "/history", None).await;
        assert!(body["records"].as_array().unwrap().is_empty());
    }
}
