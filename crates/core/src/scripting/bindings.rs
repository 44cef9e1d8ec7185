//! Per-execution variable bindings.
//!
//! A [`BindingSet`] is the name → value mapping visible to a script during
//! one execution. It is built fresh for every execution by the
//! [`ContextBinder`] and never shared or reused across executions.

use indexmap::IndexMap;
use rhai::Dynamic;
use serde_json::Value;

use crate::error::CoreError;

/// The name → value mapping visible to a script during one execution.
///
/// Insertion order is kept but carries no meaning; keys are unique by
/// last-write-wins.
pub type BindingSet = IndexMap<String, Dynamic>;

/// Supplies the fixed, host-provided portion of a binding set.
///
/// The wrappers the host hands out (graph handle, traversal pipeline) are
/// constructed fresh on every call, even though the underlying store
/// handle they wrap is the same object each time. Construction is
/// side-effect-free and cannot fail; an invalid store surfaces later,
/// during execution.
pub trait BindingEnvironment: Send + Sync {
    fn base_bindings(&self) -> BindingSet;
}

/// Builds the binding set for one execution.
pub struct ContextBinder<E> {
    environment: E,
}

impl<E: BindingEnvironment> ContextBinder<E> {
    pub fn new(environment: E) -> Self {
        Self { environment }
    }

    /// Merge caller parameters over the host's base bindings.
    ///
    /// Caller entries always win over base entries with the same name. A
    /// parameter value the engine cannot represent is a validation error.
    pub fn build(
        &self,
        params: Option<&serde_json::Map<String, Value>>,
    ) -> Result<BindingSet, CoreError> {
        let mut bindings = self.environment.base_bindings();

        if let Some(params) = params {
            for (name, value) in params {
                let dynamic = rhai::serde::to_dynamic(value).map_err(|err| {
                    CoreError::Validation(format!("Parameter '{name}' is not bindable: {err}"))
                })?;
                bindings.insert(name.clone(), dynamic);
            }
        }

        Ok(bindings)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
