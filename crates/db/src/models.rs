//! Graph element models.

use grax_core::types::ElementId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Property container shared by nodes and edges.
pub type Properties = Map<String, Value>;

/// A node in the property graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: ElementId,
    pub properties: Properties,
}

/// A directed, labelled edge between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: ElementId,
    pub from: ElementId,
    pub to: ElementId,
    pub label: String,
    pub properties: Properties,
}
