//! Route definitions for the script execution endpoint.

use axum::routing::post;
use axum::Router;

use crate::handlers::script;
use crate::state::AppState;

/// Routes mounted at `/script`.
///
/// ```text
/// POST /    -> execute_script
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(script::execute_script))
}
