pub mod health;
pub mod script;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /script        execute a script (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/script", script::router())
}
