//! Handler for the script execution endpoint.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for script execution.
#[derive(Debug, Deserialize)]
pub struct ExecuteScriptRequest {
    /// The script source. An empty script evaluates to a null datum.
    pub script: String,
    /// Optional named parameters overlaid onto the base bindings.
    #[serde(default)]
    pub params: Option<Map<String, Value>>,
}

/// POST /script
///
/// Execute a script against the graph store with `g`, `pipe`, and `gdb`
/// bound, plus any caller parameters (caller entries win on name
/// clashes).
///
/// A script failure returns 200 with the failure message as a string
/// datum; by shape it is indistinguishable from a script that returned
/// that string, and callers must rely on message content. Infrastructure
/// faults (engine creation, unsupported result shapes) return error
/// statuses instead.
pub async fn execute_script(
    State(state): State<AppState>,
    Json(input): Json<ExecuteScriptRequest>,
) -> AppResult<Json<DataResponse<Value>>> {
    let data = state
        .gateway
        .execute(&input.script, input.params.as_ref())
        .await?;

    Ok(Json(DataResponse { data }))
}
