//! Script execution machinery.
//!
//! The pieces a host assembles into a scripting endpoint: a
//! [`policy::ReplacementPolicy`] deciding when the engine has lived long
//! enough, the [`lifecycle::EngineLifecycleManager`] owning the single
//! current [`engine::ScriptEngine`], and the [`bindings::ContextBinder`]
//! building the per-execution variable set. Hosts plug in through
//! [`engine::EngineFactory`] and [`bindings::BindingEnvironment`].

pub mod bindings;
pub mod engine;
pub mod lifecycle;
pub mod policy;
