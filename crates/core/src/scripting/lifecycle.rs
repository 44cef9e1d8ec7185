//! Engine lifecycle management.
//!
//! Owns the single current [`ScriptEngine`] instance and replaces it on
//! the replacement policy's cadence. Initialization is lazy (first use);
//! there is no explicit teardown: a retired instance is dropped once the
//! last in-flight execution releases its `Arc`.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::CoreError;
use crate::scripting::engine::{EngineFactory, ScriptEngine};
use crate::scripting::policy::ReplacementPolicy;

/// Holds the current [`ScriptEngine`] and lazily (re)creates it.
///
/// Exactly one instance is current at any time. Replacement is a
/// create-then-swap under the slot lock, so readers observe either the
/// old or the new engine, never an intermediate state. In-flight
/// executions keep their own `Arc` and continue unaffected on a retired
/// instance.
pub struct EngineLifecycleManager {
    factory: Box<dyn EngineFactory>,
    policy: Box<dyn ReplacementPolicy>,
    current: Mutex<Option<Arc<ScriptEngine>>>,
}

impl EngineLifecycleManager {
    pub fn new(factory: Box<dyn EngineFactory>, policy: Box<dyn ReplacementPolicy>) -> Self {
        Self {
            factory,
            policy,
            current: Mutex::new(None),
        }
    }

    /// Record an imminent execution with the replacement policy.
    ///
    /// Called once per execution attempt, before [`current_engine`]
    /// consults the policy for the same attempt.
    ///
    /// [`current_engine`]: EngineLifecycleManager::current_engine
    pub fn observe(&self, script: &str) {
        self.policy.observe(script);
    }

    /// Get the current engine, creating or replacing it first if needed.
    ///
    /// Creation failure propagates and leaves the previously current
    /// engine (if any) untouched.
    pub fn current_engine(&self) -> Result<Arc<ScriptEngine>, CoreError> {
        let mut slot = self.slot();

        if let Some(current) = slot.as_ref() {
            if !self.policy.should_replace() {
                return Ok(Arc::clone(current));
            }
            tracing::debug!("Replacing script engine at policy cadence");
        }

        let engine = Arc::new(self.factory.create()?);
        *slot = Some(Arc::clone(&engine));
        Ok(engine)
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<ScriptEngine>>> {
        // A poisoned lock still holds a valid engine slot.
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
