use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use grax_api::config::ServerConfig;
use grax_api::router::build_app_router;
use grax_api::scripting::environment::GraphEngineFactory;
use grax_api::scripting::gateway::ScriptGateway;
use grax_api::state::AppState;
use grax_core::scripting::lifecycle::EngineLifecycleManager;
use grax_core::scripting::policy::CountingPolicy;
use grax_db::GraphStore;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        engine_max_executions: 500,
    }
}

/// Build the full application router over the given store.
///
/// This mirrors the wiring in `main.rs` so integration tests exercise the
/// same middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app(store: GraphStore) -> Router {
    let config = test_config();

    let manager = EngineLifecycleManager::new(
        Box::new(GraphEngineFactory),
        Box::new(CountingPolicy::new(config.engine_max_executions)),
    );
    let gateway = Arc::new(ScriptGateway::new(store.clone(), manager));

    let state = AppState {
        store,
        config: Arc::new(config.clone()),
        gateway,
    };

    build_app_router(state, &config)
}

/// Send a GET request to the app and return the response.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("build request"),
    )
    .await
    .expect("send request")
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("build request"),
    )
    .await
    .expect("send request")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
