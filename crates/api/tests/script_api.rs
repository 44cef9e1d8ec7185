//! Integration tests for the script execution endpoint.
//!
//! Tests cover arithmetic evaluation, caller parameters, base-binding
//! overrides, failure reporting, graph mutation through the bound
//! handles, and result shape handling.

mod common;

use axum::http::StatusCode;
use common::{body_json, post_json};
use grax_db::GraphStore;
use serde_json::json;

// ---------------------------------------------------------------------------
// Test 1: Plain arithmetic evaluates and serializes
// ---------------------------------------------------------------------------

/// A script with no parameters returns its value as the response datum.
#[tokio::test]
async fn execute_arithmetic_script() {
    let app = common::build_test_app(GraphStore::new());

    let body = json!({ "script": "1+1" });
    let response = post_json(app, "/api/v1/script", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!(2));
}

// ---------------------------------------------------------------------------
// Test 2: Caller parameters are visible inside the execution
// ---------------------------------------------------------------------------

/// Parameters are bound as variables; `x` has no base-binding conflict.
#[tokio::test]
async fn caller_params_are_bound() {
    let app = common::build_test_app(GraphStore::new());

    let body = json!({ "script": "x+1", "params": { "x": 5 } });
    let response = post_json(app, "/api/v1/script", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!(6));
}

// ---------------------------------------------------------------------------
// Test 3: Caller parameters win over base bindings
// ---------------------------------------------------------------------------

/// A param named like a base binding replaces it for that execution.
#[tokio::test]
async fn caller_params_override_base_bindings() {
    let app = common::build_test_app(GraphStore::new());

    let body = json!({ "script": "g + 1", "params": { "g": 41 } });
    let response = post_json(app, "/api/v1/script", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!(42));
}

// ---------------------------------------------------------------------------
// Test 4: Script failures come back as string data, not errors
// ---------------------------------------------------------------------------

/// A failing script still returns 200; the datum is the failure message.
#[tokio::test]
async fn script_failure_is_a_string_datum() {
    let app = common::build_test_app(GraphStore::new());

    let body = json!({ "script": "undefinedVariable.foo" });
    let response = post_json(app, "/api/v1/script", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let message = json["data"]
        .as_str()
        .expect("failure datum should be a string");
    assert!(
        message.contains("undefinedVariable"),
        "message should name the missing variable, got: {message}"
    );
}

// ---------------------------------------------------------------------------
// Test 5: Scripts mutate the store through the bound handles
// ---------------------------------------------------------------------------

/// Nodes and edges created by a script persist in the shared store, and
/// the traversal pipeline sees them within the same execution.
#[tokio::test]
async fn scripts_mutate_the_graph() {
    let store = GraphStore::new();
    let app = common::build_test_app(store.clone());

    let script = r#"
        let a = g.add_node(#{name: "alice"});
        let b = g.add_node(#{name: "bob"});
        g.add_edge(a.id, b.id, "KNOWS");
        pipe.start(a.id).out("KNOWS").count()
    "#;
    let response = post_json(app, "/api/v1/script", json!({ "script": script })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!(1));

    // The mutation is visible outside the execution.
    assert_eq!(store.node_count(), 2);
    assert_eq!(store.edge_count(), 1);
}

// ---------------------------------------------------------------------------
// Test 6: The raw store handle is bound as gdb
// ---------------------------------------------------------------------------

/// `gdb` wraps the same store handle on every execution.
#[tokio::test]
async fn raw_store_handle_is_bound() {
    let store = GraphStore::new();
    store.create_node(grax_db::models::Properties::new());

    let app = common::build_test_app(store);
    let response = post_json(app, "/api/v1/script", json!({ "script": "gdb.node_count()" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"], json!(1));
}

// ---------------------------------------------------------------------------
// Test 7: Node results serialize with id and properties
// ---------------------------------------------------------------------------

/// A script returning a graph element gets its serde representation.
#[tokio::test]
async fn node_result_is_serialized() {
    let app = common::build_test_app(GraphStore::new());

    let body = json!({ "script": r#"g.add_node(#{name: "carol"})"# });
    let response = post_json(app, "/api/v1/script", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["id"].is_i64());
    assert_eq!(json["data"]["properties"]["name"], json!("carol"));
}

// ---------------------------------------------------------------------------
// Test 8: Unsupported result shapes are 422, not masked
// ---------------------------------------------------------------------------

/// Returning a bound handle itself cannot be represented.
#[tokio::test]
async fn unsupported_result_shape_returns_422() {
    let app = common::build_test_app(GraphStore::new());

    let response = post_json(app, "/api/v1/script", json!({ "script": "g" })).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], json!("UNSUPPORTED_RESULT"));
}

// ---------------------------------------------------------------------------
// Test 9: The script field is required
// ---------------------------------------------------------------------------

/// A body without `script` is rejected at deserialization.
#[tokio::test]
async fn missing_script_field_is_rejected() {
    let app = common::build_test_app(GraphStore::new());

    let response = post_json(app, "/api/v1/script", json!({ "params": {} })).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ---------------------------------------------------------------------------
// Test 10: An empty script evaluates to a null datum
// ---------------------------------------------------------------------------

/// Empty scripts are not an error; they simply produce no value.
#[tokio::test]
async fn empty_script_returns_null() {
    let app = common::build_test_app(GraphStore::new());

    let response = post_json(app, "/api/v1/script", json!({ "script": "" })).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"].is_null());
}
