//! The shared graph store handle.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use grax_core::types::ElementId;
use serde_json::Value;

use crate::models::{Edge, Node, Properties};

/// Store-level failures: operations referencing missing elements.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Node {0} not found")]
    NodeNotFound(ElementId),

    #[error("Edge {0} not found")]
    EdgeNotFound(ElementId),
}

/// Traversal direction along directed edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Out,
    In,
    Both,
}

#[derive(Debug, Default)]
struct GraphData {
    nodes: HashMap<ElementId, Node>,
    edges: HashMap<ElementId, Edge>,
    next_id: ElementId,
}

impl GraphData {
    fn next_id(&mut self) -> ElementId {
        self.next_id += 1;
        self.next_id
    }
}

/// Shared handle to the process-wide property graph.
///
/// Cloning is cheap and every clone refers to the same underlying data,
/// like a connection pool handle. All operations are synchronous so they
/// can be called from inside a script evaluation; reads and writes are
/// serialized through an interior `RwLock`.
#[derive(Clone, Default)]
pub struct GraphStore {
    inner: Arc<RwLock<GraphData>>,
}

impl GraphStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether two handles refer to the same underlying store.
    pub fn same_store(&self, other: &GraphStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether the store is reachable. Always true for the embedded
    /// store; kept for the health endpoint contract.
    pub fn health_check(&self) -> bool {
        !self.inner.is_poisoned()
    }

    /// Insert a node with the given properties.
    pub fn create_node(&self, properties: Properties) -> Node {
        let mut data = self.write();
        let node = Node {
            id: data.next_id(),
            properties,
        };
        data.nodes.insert(node.id, node.clone());
        node
    }

    /// Fetch a node by id.
    pub fn node(&self, id: ElementId) -> Option<Node> {
        self.read().nodes.get(&id).cloned()
    }

    /// Insert a directed, labelled edge. Both endpoints must exist.
    pub fn create_edge(
        &self,
        from: ElementId,
        to: ElementId,
        label: &str,
        properties: Properties,
    ) -> Result<Edge, StoreError> {
        let mut data = self.write();
        if !data.nodes.contains_key(&from) {
            return Err(StoreError::NodeNotFound(from));
        }
        if !data.nodes.contains_key(&to) {
            return Err(StoreError::NodeNotFound(to));
        }
        let edge = Edge {
            id: data.next_id(),
            from,
            to,
            label: label.to_string(),
            properties,
        };
        data.edges.insert(edge.id, edge.clone());
        Ok(edge)
    }

    /// Fetch an edge by id.
    pub fn edge(&self, id: ElementId) -> Option<Edge> {
        self.read().edges.get(&id).cloned()
    }

    /// Set a single property on a node, returning the updated node.
    pub fn set_node_property(
        &self,
        id: ElementId,
        key: &str,
        value: Value,
    ) -> Result<Node, StoreError> {
        let mut data = self.write();
        let node = data
            .nodes
            .get_mut(&id)
            .ok_or(StoreError::NodeNotFound(id))?;
        node.properties.insert(key.to_string(), value);
        Ok(node.clone())
    }

    /// Remove a node and every edge incident to it. Returns whether the
    /// node existed.
    pub fn delete_node(&self, id: ElementId) -> bool {
        let mut data = self.write();
        if data.nodes.remove(&id).is_none() {
            return false;
        }
        data.edges.retain(|_, e| e.from != id && e.to != id);
        true
    }

    /// Remove an edge. Returns whether it existed.
    pub fn delete_edge(&self, id: ElementId) -> bool {
        self.write().edges.remove(&id).is_some()
    }

    pub fn node_count(&self) -> usize {
        self.read().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.read().edges.len()
    }

    /// Ids of all nodes, in ascending order.
    pub fn node_ids(&self) -> Vec<ElementId> {
        let mut ids: Vec<_> = self.read().nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Nodes adjacent to `id` along `direction`, optionally restricted to
    /// edges with the given label. Each neighbour appears once, in
    /// ascending id order.
    pub fn neighbors(
        &self,
        id: ElementId,
        direction: Direction,
        label: Option<&str>,
    ) -> Vec<Node> {
        let data = self.read();
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        for edge in data.edges.values() {
            if let Some(label) = label {
                if edge.label != label {
                    continue;
                }
            }
            let neighbor = match direction {
                Direction::Out if edge.from == id => edge.to,
                Direction::In if edge.to == id => edge.from,
                Direction::Both if edge.from == id => edge.to,
                Direction::Both if edge.to == id => edge.from,
                _ => continue,
            };
            if seen.insert(neighbor) {
                ids.push(neighbor);
            }
        }

        ids.sort_unstable();
        ids.iter()
            .filter_map(|id| data.nodes.get(id).cloned())
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, GraphData> {
        // A poisoned lock still holds consistent graph data.
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, GraphData> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
