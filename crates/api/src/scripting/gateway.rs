//! Central script execution gateway.
//!
//! Coordinates the replacement policy, binding construction, engine
//! acquisition, evaluation, and result conversion. Held in
//! [`AppState`](crate::state::AppState) as an `Arc<ScriptGateway>`.

use grax_core::scripting::bindings::ContextBinder;
use grax_core::scripting::lifecycle::EngineLifecycleManager;
use grax_db::GraphStore;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};
use crate::scripting::environment::GraphEnvironment;
use crate::scripting::representation;

/// Executes scripts against the graph store.
///
/// Per execution:
/// 1. Notify the replacement policy (`observe`).
/// 2. Build the binding set (fresh graph wrappers plus caller params).
/// 3. Acquire the current engine (may trigger a replacement).
/// 4. Evaluate, then convert the result.
///
/// Script failures are folded into string-shaped results; only
/// infrastructure faults (engine creation, unsupported result shapes)
/// surface as request-level errors.
pub struct ScriptGateway {
    binder: ContextBinder<GraphEnvironment>,
    manager: EngineLifecycleManager,
}

impl ScriptGateway {
    /// Create a gateway over the given store and lifecycle manager.
    pub fn new(store: GraphStore, manager: EngineLifecycleManager) -> Self {
        Self {
            binder: ContextBinder::new(GraphEnvironment::new(store)),
            manager,
        }
    }

    /// The lifecycle manager owning the current engine instance.
    pub fn manager(&self) -> &EngineLifecycleManager {
        &self.manager
    }

    /// Execute `script` with optional caller parameters.
    ///
    /// A script-level failure returns `Ok` with the failure message as a
    /// string datum; by shape alone it cannot be told apart from a script
    /// that legitimately returned that string, so callers must rely on
    /// message content.
    pub async fn execute(
        &self,
        script: &str,
        params: Option<&Map<String, Value>>,
    ) -> AppResult<Value> {
        self.manager.observe(script);

        let bindings = self.binder.build(params)?;
        let engine = self.manager.current_engine()?;

        let script = script.to_string();
        let result = tokio::task::spawn_blocking(move || engine.evaluate(&script, bindings))
            .await
            .map_err(|err| AppError::InternalError(format!("Script task failed: {err}")))?;

        match result {
            Ok(value) => Ok(representation::convert(value)?),
            Err(err) => {
                tracing::debug!(error = %err, "Script execution failed");
                Ok(Value::String(err.message().to_string()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use grax_core::scripting::policy::CountingPolicy;
    use serde_json::json;

    use super::*;
    use crate::scripting::environment::GraphEngineFactory;

    fn gateway(threshold: u64) -> ScriptGateway {
        let store = GraphStore::new();
        let manager = EngineLifecycleManager::new(
            Box::new(GraphEngineFactory),
            Box::new(CountingPolicy::new(threshold)),
        );
        ScriptGateway::new(store, manager)
    }

    #[tokio::test]
    async fn arithmetic_result_is_converted() {
        let gateway = gateway(500);
        let value = gateway.execute("1+1", None).await.unwrap();
        assert_eq!(value, json!(2));
    }

    #[tokio::test]
    async fn caller_params_are_visible() {
        let gateway = gateway(500);
        let params = json!({"x": 5}).as_object().cloned().unwrap();
        let value = gateway.execute("x+1", Some(&params)).await.unwrap();
        assert_eq!(value, json!(6));
    }

    #[tokio::test]
    async fn failure_becomes_a_string_datum() {
        let gateway = gateway(500);
        let value = gateway.execute("undefinedVariable.foo", None).await.unwrap();
        let message = value.as_str().expect("failure should be a string datum");
        assert!(message.contains("undefinedVariable"));
    }

    #[tokio::test]
    async fn replacement_cadence_spans_executions() {
        let gateway = gateway(3);

        gateway.execute("1+1", None).await.unwrap();
        let first = gateway.manager().current_engine().unwrap();

        gateway.execute("2+2", None).await.unwrap();
        let second = gateway.manager().current_engine().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // Third execution fills the window and swaps in a fresh engine.
        gateway.execute("3+3", None).await.unwrap();
        let third = gateway.manager().current_engine().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));

        // The fourth execution stays on the replacement.
        gateway.execute("4+4", None).await.unwrap();
        let fourth = gateway.manager().current_engine().unwrap();
        assert!(Arc::ptr_eq(&third, &fourth));
    }

    #[tokio::test]
    async fn failure_does_not_poison_the_engine() {
        let gateway = gateway(500);

        gateway.execute("nope.nope", None).await.unwrap();
        let before = gateway.manager().current_engine().unwrap();

        let value = gateway.execute("40+2", None).await.unwrap();
        assert_eq!(value, json!(42));
        let after = gateway.manager().current_engine().unwrap();
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn unsupported_result_shapes_propagate() {
        let gateway = gateway(500);
        let err = gateway.execute("g", None).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Core(grax_core::error::CoreError::UnsupportedResult(_))
        ));
    }
}
