//! The script engine wrapper and its creation capability.
//!
//! Defines [`ScriptEngine`], the reusable evaluation resource owned by the
//! lifecycle manager, [`ScriptError`] for user-script faults, and
//! [`EngineFactory`], the capability hosts implement to build configured
//! engine instances.

use std::fmt;

use rhai::{Dynamic, Engine, EvalAltResult, Scope};

use crate::error::CoreError;
use crate::scripting::bindings::BindingSet;

/// Errors surfaced by evaluating a script.
///
/// These are user-script faults, recovered locally at the execution
/// gateway and reported as string-shaped results. They are distinct from
/// [`CoreError::EngineCreation`], which is an infrastructure fault.
#[derive(Debug)]
pub enum ScriptError {
    /// The script failed to parse.
    Parse(String),
    /// The script raised an error at runtime.
    Runtime(String),
}

impl ScriptError {
    /// The human-readable failure message returned to the caller.
    pub fn message(&self) -> &str {
        match self {
            Self::Parse(msg) | Self::Runtime(msg) => msg,
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "Script parse error: {msg}"),
            Self::Runtime(msg) => write!(f, "Script runtime error: {msg}"),
        }
    }
}

impl std::error::Error for ScriptError {}

/// A reusable, stateful script execution engine.
///
/// Wraps a configured [`rhai::Engine`]. Instances are expensive to create
/// (the factory registers the host's whole binding API on construction)
/// and cheap to reuse; the lifecycle manager retires them on the
/// replacement policy's cadence. Evaluation takes `&self`, so a single
/// instance may serve concurrent executions.
pub struct ScriptEngine {
    engine: Engine,
}

impl std::fmt::Debug for ScriptEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptEngine").finish_non_exhaustive()
    }
}

impl ScriptEngine {
    /// Wrap a configured engine.
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    /// Evaluate `script` with the given bindings in scope.
    ///
    /// The binding set is consumed into a fresh [`Scope`] that lives only
    /// for this evaluation; nothing leaks into the engine between runs
    /// through the scope itself.
    pub fn evaluate(&self, script: &str, bindings: BindingSet) -> Result<Dynamic, ScriptError> {
        let mut scope = Scope::new();
        for (name, value) in bindings {
            scope.push_dynamic(name, value);
        }

        self.engine
            .eval_with_scope::<Dynamic>(&mut scope, script)
            .map_err(|err| match *err {
                EvalAltResult::ErrorParsing(..) => ScriptError::Parse(err.to_string()),
                _ => ScriptError::Runtime(err.to_string()),
            })
    }
}

/// Creates fresh engine instances for the lifecycle manager.
///
/// A factory instantiates an empty engine bound to no script-specific
/// state; per-execution variables arrive through the binding set, never
/// pre-bound here. A failed creation must leave no partial state behind.
pub trait EngineFactory: Send + Sync {
    /// Build a fresh engine.
    fn create(&self) -> Result<ScriptEngine, CoreError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
