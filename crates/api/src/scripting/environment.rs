//! The Rhai graph environment: engine factory and binding wrappers.
//!
//! Scripts see the store through three fixed variables: `g` (graph
//! handle), `pipe` (traversal pipeline), and `gdb` (the raw store
//! handle). The `g` and `pipe` wrappers are constructed fresh for every
//! execution; only the store handle inside them is the same object each
//! time. The engine factory registers the whole API below on every fresh
//! engine instance, which is what makes engine creation the expensive
//! step of the lifecycle.

use std::collections::HashSet;

use grax_core::error::CoreError;
use grax_core::scripting::bindings::{BindingEnvironment, BindingSet};
use grax_core::scripting::engine::{EngineFactory, ScriptEngine};
use grax_core::types::ElementId;
use grax_db::models::{Edge, Node, Properties};
use grax_db::{Direction, GraphStore, StoreError};
use rhai::{Dynamic, Engine, EvalAltResult, Position};
use serde_json::Value;

/// Variable name the graph handle is bound under.
pub const GRAPH_VAR: &str = "g";
/// Variable name the traversal pipeline is bound under.
pub const PIPE_VAR: &str = "pipe";
/// Variable name the raw store handle is bound under.
pub const STORE_VAR: &str = "gdb";

/// Script-facing wrapper over the graph store.
///
/// Constructed fresh per execution. All mutation a script performs goes
/// through here (or through `gdb`); that is the point of the endpoint,
/// not an error condition.
#[derive(Clone)]
pub struct GraphHandle {
    store: GraphStore,
}

impl GraphHandle {
    pub fn new(store: GraphStore) -> Self {
        Self { store }
    }

    fn add_node(&mut self) -> Node {
        self.store.create_node(Properties::new())
    }

    fn add_node_with(&mut self, props: rhai::Map) -> Result<Node, Box<EvalAltResult>> {
        Ok(self.store.create_node(to_properties(props)?))
    }

    fn node(&mut self, id: ElementId) -> Result<Node, Box<EvalAltResult>> {
        self.store
            .node(id)
            .ok_or_else(|| store_error(StoreError::NodeNotFound(id)))
    }

    fn add_edge(
        &mut self,
        from: ElementId,
        to: ElementId,
        label: &str,
    ) -> Result<Edge, Box<EvalAltResult>> {
        self.store
            .create_edge(from, to, label, Properties::new())
            .map_err(store_error)
    }

    fn add_edge_with(
        &mut self,
        from: ElementId,
        to: ElementId,
        label: &str,
        props: rhai::Map,
    ) -> Result<Edge, Box<EvalAltResult>> {
        self.store
            .create_edge(from, to, label, to_properties(props)?)
            .map_err(store_error)
    }

    fn edge(&mut self, id: ElementId) -> Result<Edge, Box<EvalAltResult>> {
        self.store
            .edge(id)
            .ok_or_else(|| store_error(StoreError::EdgeNotFound(id)))
    }

    fn set_property(
        &mut self,
        id: ElementId,
        key: &str,
        value: Dynamic,
    ) -> Result<Node, Box<EvalAltResult>> {
        let json = rhai::serde::from_dynamic::<Value>(&value).map_err(|err| {
            runtime_error(format!("Property '{key}' is not storable: {err}"))
        })?;
        self.store
            .set_node_property(id, key, json)
            .map_err(store_error)
    }

    fn delete_node(&mut self, id: ElementId) -> bool {
        self.store.delete_node(id)
    }

    fn delete_edge(&mut self, id: ElementId) -> bool {
        self.store.delete_edge(id)
    }

    fn node_count(&mut self) -> i64 {
        self.store.node_count() as i64
    }

    fn edge_count(&mut self) -> i64 {
        self.store.edge_count() as i64
    }

    fn nodes(&mut self) -> rhai::Array {
        self.store
            .node_ids()
            .into_iter()
            .filter_map(|id| self.store.node(id))
            .map(Dynamic::from)
            .collect()
    }
}

/// Script-facing traversal pipeline.
///
/// Bound empty (`pipe`) and seeded with `start`; every step returns a new
/// pipeline value, so traversals chain:
/// `pipe.start(a.id).out("KNOWS").nodes()`.
#[derive(Clone)]
pub struct TraversalPipeline {
    store: GraphStore,
    frontier: Vec<ElementId>,
}

impl TraversalPipeline {
    pub fn new(store: GraphStore) -> Self {
        Self {
            store,
            frontier: Vec::new(),
        }
    }

    fn start(&mut self, id: ElementId) -> TraversalPipeline {
        let frontier = if self.store.node(id).is_some() {
            vec![id]
        } else {
            Vec::new()
        };
        TraversalPipeline {
            store: self.store.clone(),
            frontier,
        }
    }

    fn step(&self, direction: Direction, label: Option<&str>) -> TraversalPipeline {
        let mut seen = HashSet::new();
        let mut frontier = Vec::new();
        for id in &self.frontier {
            for node in self.store.neighbors(*id, direction, label) {
                if seen.insert(node.id) {
                    frontier.push(node.id);
                }
            }
        }
        TraversalPipeline {
            store: self.store.clone(),
            frontier,
        }
    }

    fn out_any(&mut self) -> TraversalPipeline {
        self.step(Direction::Out, None)
    }

    fn out_label(&mut self, label: &str) -> TraversalPipeline {
        self.step(Direction::Out, Some(label))
    }

    fn in_any(&mut self) -> TraversalPipeline {
        self.step(Direction::In, None)
    }

    fn in_label(&mut self, label: &str) -> TraversalPipeline {
        self.step(Direction::In, Some(label))
    }

    fn both_any(&mut self) -> TraversalPipeline {
        self.step(Direction::Both, None)
    }

    fn both_label(&mut self, label: &str) -> TraversalPipeline {
        self.step(Direction::Both, Some(label))
    }

    fn ids(&mut self) -> rhai::Array {
        self.frontier.iter().copied().map(Dynamic::from).collect()
    }

    fn nodes(&mut self) -> rhai::Array {
        self.frontier
            .iter()
            .filter_map(|id| self.store.node(*id))
            .map(Dynamic::from)
            .collect()
    }

    fn count(&mut self) -> i64 {
        self.frontier.len() as i64
    }
}

/// Supplies the three fixed base bindings over a shared store.
pub struct GraphEnvironment {
    store: GraphStore,
}

impl GraphEnvironment {
    pub fn new(store: GraphStore) -> Self {
        Self { store }
    }
}

impl BindingEnvironment for GraphEnvironment {
    fn base_bindings(&self) -> BindingSet {
        let mut bindings = BindingSet::new();
        bindings.insert(
            GRAPH_VAR.to_string(),
            Dynamic::from(GraphHandle::new(self.store.clone())),
        );
        bindings.insert(
            PIPE_VAR.to_string(),
            Dynamic::from(TraversalPipeline::new(self.store.clone())),
        );
        bindings.insert(STORE_VAR.to_string(), Dynamic::from(self.store.clone()));
        bindings
    }
}

/// Builds fresh engines with the graph API registered.
pub struct GraphEngineFactory;

impl EngineFactory for GraphEngineFactory {
    fn create(&self) -> Result<ScriptEngine, CoreError> {
        let mut engine = Engine::new();
        register_graph_api(&mut engine);
        Ok(ScriptEngine::new(engine))
    }
}

/// Register the graph element types, the graph handle, the traversal
/// pipeline, and the raw store handle on a fresh engine.
fn register_graph_api(engine: &mut Engine) {
    engine
        .register_type_with_name::<Node>("Node")
        .register_get("id", |n: &mut Node| n.id)
        .register_get("properties", |n: &mut Node| properties_to_map(&n.properties))
        .register_fn("prop", |n: &mut Node, key: &str| {
            prop_value(&n.properties, key)
        })
        .register_fn("to_string", |n: &mut Node| format!("Node({})", n.id));

    engine
        .register_type_with_name::<Edge>("Edge")
        .register_get("id", |e: &mut Edge| e.id)
        .register_get("from", |e: &mut Edge| e.from)
        .register_get("to", |e: &mut Edge| e.to)
        .register_get("label", |e: &mut Edge| e.label.clone())
        .register_fn("prop", |e: &mut Edge, key: &str| {
            prop_value(&e.properties, key)
        })
        .register_fn("to_string", |e: &mut Edge| format!("Edge({})", e.id));

    engine
        .register_type_with_name::<GraphHandle>("Graph")
        .register_fn("add_node", GraphHandle::add_node)
        .register_fn("add_node", GraphHandle::add_node_with)
        .register_fn("node", GraphHandle::node)
        .register_fn("add_edge", GraphHandle::add_edge)
        .register_fn("add_edge", GraphHandle::add_edge_with)
        .register_fn("edge", GraphHandle::edge)
        .register_fn("set_property", GraphHandle::set_property)
        .register_fn("delete_node", GraphHandle::delete_node)
        .register_fn("delete_edge", GraphHandle::delete_edge)
        .register_fn("node_count", GraphHandle::node_count)
        .register_fn("edge_count", GraphHandle::edge_count)
        .register_fn("nodes", GraphHandle::nodes);

    engine
        .register_type_with_name::<TraversalPipeline>("Pipeline")
        .register_fn("start", TraversalPipeline::start)
        .register_fn("out", TraversalPipeline::out_any)
        .register_fn("out", TraversalPipeline::out_label)
        .register_fn("into", TraversalPipeline::in_any)
        .register_fn("into", TraversalPipeline::in_label)
        .register_fn("both", TraversalPipeline::both_any)
        .register_fn("both", TraversalPipeline::both_label)
        .register_fn("ids", TraversalPipeline::ids)
        .register_fn("nodes", TraversalPipeline::nodes)
        .register_fn("count", TraversalPipeline::count);

    engine
        .register_type_with_name::<GraphStore>("GraphStore")
        .register_fn("node_count", |s: &mut GraphStore| s.node_count() as i64)
        .register_fn("edge_count", |s: &mut GraphStore| s.edge_count() as i64);
}

fn to_properties(map: rhai::Map) -> Result<Properties, Box<EvalAltResult>> {
    let mut props = Properties::new();
    for (key, value) in map {
        let json = rhai::serde::from_dynamic::<Value>(&value).map_err(|err| {
            runtime_error(format!("Property '{key}' is not storable: {err}"))
        })?;
        props.insert(key.to_string(), json);
    }
    Ok(props)
}

fn properties_to_map(props: &Properties) -> Result<rhai::Map, Box<EvalAltResult>> {
    let dynamic = rhai::serde::to_dynamic(props)
        .map_err(|err| runtime_error(format!("Properties are not representable: {err}")))?;
    Ok(dynamic.cast::<rhai::Map>())
}

fn prop_value(props: &Properties, key: &str) -> Result<Dynamic, Box<EvalAltResult>> {
    match props.get(key) {
        Some(value) => rhai::serde::to_dynamic(value).map_err(|err| {
            runtime_error(format!("Property '{key}' is not representable: {err}"))
        }),
        None => Ok(Dynamic::UNIT),
    }
}

fn store_error(err: StoreError) -> Box<EvalAltResult> {
    runtime_error(err.to_string())
}

fn runtime_error(msg: impl Into<String>) -> Box<EvalAltResult> {
    Box::new(EvalAltResult::ErrorRuntime(
        Dynamic::from(msg.into()),
        Position::NONE,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
