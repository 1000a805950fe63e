//! FanZone REST API
//!
//! HTTP API layer for the FanZone RSVP service, built with Axum.
//!
//! # Endpoints
//!
//! ## RSVPs
//! - `POST /api/v1/rsvps` - Submit the RSVP form (201 / 422 / 502)
//! - `GET /api/v1/rsvps/count` - Attendees so far
//! - `GET /api/v1/rsvps/window` - Attendee window currently on display
//!
//! ## Matchday
//! - `GET /api/v1/countries/qualified` - Champion picker options
//! - `GET /api/v1/countries/all` - Home country picker options
//! - `POST /api/v1/bracket` - Predict the champion
//! - `GET /api/v1/countdown` - Time left until kickoff
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /api/v1/ws` and `GET /ws` - Attendee window and notice stream
//!
//! Unknown paths answer 404 with the standard error body.
//!
//! # Example
//!
//! ```rust,ignore
//! use fanzone::api::{serve, AppState};
//! use fanzone::config::ApiConfig;
//! use fanzone::matchday::{Countdown, CountryCatalog};
//! use fanzone::roster::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::default();
//!     let state = AppState::new(
//!         Arc::new(MemoryStore::default()),
//!         CountryCatalog::bundled_qualified(),
//!         CountryCatalog::bundled_all(),
//!         Countdown::default(),
//!         config.clone(),
//!     );
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let api_routes = Router::new()
        // RSVP routes
        .route("/rsvps", post(routes::rsvp::submit_rsvp))
        .route("/rsvps/count", get(routes::rsvp::count_rsvps))
        .route("/rsvps/window", get(routes::rsvp::current_window))
        // Matchday routes
        .route("/countries/qualified", get(routes::countries::qualified_countries))
        .route("/countries/all", get(routes::countries::all_countries))
        .route("/bracket", post(routes::bracket::predict))
        .route("/countdown", get(routes::countdown::countdown))
        // WebSocket route
        .route("/ws", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .route("/ws", get(websocket_handler))
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let announcer = state.clone();
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("FanZone API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            announcer.announce("FanZone is closing, see you at kickoff!");
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("FanZone API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchday::{Countdown, CountryCatalog};
    use crate::presenter::{CycleConfig, CyclePresenter};
    use crate::roster::{
        Attendance, AttendanceStore, MemoryStore, NewAttendance, RosterError, RosterResult,
        Snapshot, Subscription,
    };
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tokio::sync::broadcast;
    use tower::util::ServiceExt;

    struct OfflineStore;

    #[async_trait]
    impl AttendanceStore for OfflineStore {
        async fn submit(&self, _entry: NewAttendance) -> RosterResult<Attendance> {
            Err(RosterError::Unavailable("permission denied".to_string()))
        }

        async fn subscribe(&self) -> Subscription {
            let (_tx, rx) = broadcast::channel(1);
            Subscription::new(Arc::from(Vec::new()), rx)
        }

        async fn snapshot(&self) -> Snapshot {
            Arc::from(Vec::new())
        }
    }

    fn test_state(store: Arc<dyn AttendanceStore>) -> AppState {
        AppState::new(
            store,
            CountryCatalog::bundled_qualified(),
            CountryCatalog::bundled_all(),
            Countdown::default(),
            ApiConfig::default(),
        )
    }

    fn create_test_app() -> Router {
        build_router(test_state(Arc::new(MemoryStore::default())))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let response = create_test_app().oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let response = create_test_app().oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_full() {
        let response = create_test_app().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["presenter"], "detached");
        assert_eq!(body["attendees"], 0);
    }

    #[tokio::test]
    async fn test_health_reports_presenter_lifecycle() {
        let store = Arc::new(MemoryStore::default());
        let state = test_state(store.clone());
        let presenter = CyclePresenter::new(CycleConfig::default(), Arc::new(state.window_sinks()));
        let view = presenter.view();
        let app = build_router(state.with_presenter(view.clone()));
        let display = presenter.spawn(store.subscribe().await);
        while !view.is_running() {
            tokio::task::yield_now().await;
        }

        let body = json_body(app.clone().oneshot(get("/health")).await.unwrap()).await;
        assert_eq!(body["presenter"], "running");
        assert_eq!(body["status"], "healthy");

        // The display task is gone but the view is still attached
        display.abort();
        let _ = display.await;

        let body = json_body(app.oneshot(get("/health")).await.unwrap()).await;
        assert_eq!(body["presenter"], "stopped");
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn test_submit_rsvp_created() {
        let store = Arc::new(MemoryStore::default());
        let app = build_router(test_state(store.clone()));

        let response = app
            .oneshot(post_json(
                "/api/v1/rsvps",
                r#"{"name": "Lionel", "email": "lionel@example.com", "country_code": "ar"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "accepted");
        assert_eq!(body["record"]["country_name"], "Argentina");
        assert!(body["record"].get("email").is_none());
        assert_eq!(body["form"]["name"], "");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_submit_rsvp_invalid() {
        let response = create_test_app()
            .oneshot(post_json(
                "/api/v1/rsvps",
                r#"{"name": "L", "email": "lionel@example.com", "country_code": "ar"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["status"], "invalid");
        assert_eq!(body["errors"][0]["field"], "name");
        assert_eq!(body["form"]["email"], "lionel@example.com");
    }

    #[tokio::test]
    async fn test_submit_rsvp_store_failure() {
        let app = build_router(test_state(Arc::new(OfflineStore)));

        let response = app
            .oneshot(post_json(
                "/api/v1/rsvps",
                r#"{"name": "Lionel", "email": "lionel@example.com", "country_code": "ar"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["status"], "failed");
        assert_eq!(body["form"]["name"], "Lionel");
    }

    #[tokio::test]
    async fn test_submit_invalid_json() {
        let response = create_test_app()
            .oneshot(post_json("/api/v1/rsvps", "not json"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());

        let response = create_test_app()
            .oneshot(post_json("/api/v1/bracket", r#"{"country_code": 7}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_path_not_found() {
        let response = create_test_app()
            .oneshot(get("/api/v1/scoreboard"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(body["error"]["message"], "Not found: /api/v1/scoreboard");
    }

    #[tokio::test]
    async fn test_accepted_rsvp_announced_on_system_topic() {
        let state = test_state(Arc::new(MemoryStore::default()));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let id = state.ws_hub.register(tx).unwrap();
        state
            .ws_hub
            .subscribe(&id, vec![crate::websocket::SYSTEM_TOPIC.to_string()])
            .unwrap();
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/rsvps",
                r#"{"name": "Lionel", "email": "lionel@example.com", "country_code": "ar"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        match rx.try_recv() {
            Ok(crate::websocket::ServerMessage::Notice { message }) => {
                assert_eq!(message, "Lionel from Argentina is joining the fun!")
            }
            other => panic!("Expected Notice, got {:?}", other),
        }

        // Rejected forms stay quiet
        app.oneshot(post_json(
            "/api/v1/rsvps",
            r#"{"name": "L", "email": "lionel@example.com", "country_code": "ar"}"#,
        ))
        .await
        .unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_count_and_window_empty() {
        let app = create_test_app();

        let response = app.clone().oneshot(get("/api/v1/rsvps/count")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["count"], 0);

        let response = app.oneshot(get("/api/v1/rsvps/window")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["frame"]["state"], "empty");
        assert!(body.get("next_cursor").is_none());
    }

    #[tokio::test]
    async fn test_countries() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(get("/api/v1/countries/qualified"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let qualified = json_body(response).await;

        let response = app.oneshot(get("/api/v1/countries/all")).await.unwrap();
        let all = json_body(response).await;

        assert!(qualified["count"].as_u64().unwrap() > 0);
        assert!(all["count"].as_u64().unwrap() > qualified["count"].as_u64().unwrap());
    }

    #[tokio::test]
    async fn test_bracket() {
        let app = create_test_app();

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/bracket", r#"{"country_code": "br"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["title"], "Brazil");
        assert_eq!(body["flag"], "img/flags/br.png");

        let response = app
            .clone()
            .oneshot(post_json("/api/v1/bracket", r#"{"country_code": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "NO_SELECTION");

        let response = app
            .oneshot(post_json("/api/v1/bracket", r#"{"country_code": "zz"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "UNKNOWN_COUNTRY");
    }

    #[tokio::test]
    async fn test_countdown() {
        let response = create_test_app().oneshot(get("/api/v1/countdown")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["kickoff"], "2026-06-11T00:00:00Z");
        assert!(body["display"].as_str().unwrap().ends_with('s'));
    }

    #[test]
    fn test_cors_layer_with_origins() {
        let _ = cors_layer(&["https://fanzone.example".to_string(), "bad\norigin".to_string()]);
    }
}
