//! Core types for workflow graphs
//!
//! Defines port type tags, port schemas, and the node/edge/graph data
//! model shared by the store, the registry, and the execution engine.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// The data type of a port
///
/// Tags serialize to their UI string form, so `StringList` round-trips
/// as `"string[]"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortType {
    /// Plain text string
    #[serde(rename = "string")]
    String,
    /// Numeric value
    #[serde(rename = "number")]
    Number,
    /// Boolean value
    #[serde(rename = "boolean")]
    Boolean,
    /// PDF document reference
    #[serde(rename = "pdf")]
    Pdf,
    /// Array of strings
    #[serde(rename = "string[]")]
    StringList,
}

impl PortType {
    /// Check if an output of this type can connect to an input of `other`
    ///
    /// Types are compatible iff the tags are exactly equal. There is no
    /// wildcard type and no widening (`string` never connects to
    /// `string[]`). This is the sole gate for edge creation.
    pub fn is_compatible_with(&self, other: &PortType) -> bool {
        self == other
    }

    /// The wire/UI string form of this tag
    pub fn tag(&self) -> &'static str {
        match self {
            PortType::String => "string",
            PortType::Number => "number",
            PortType::Boolean => "boolean",
            PortType::Pdf => "pdf",
            PortType::StringList => "string[]",
        }
    }
}

/// Named, typed ports declared on a block type or node
///
/// Port names are unique within a node; declaration order is irrelevant.
pub type PortSchema = HashMap<String, PortType>;

/// Dynamic values flowing between blocks during a run, keyed by port name
pub type BlockValues = HashMap<String, serde_json::Value>;

/// Position on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Per-node payload: label, block type reference, and port schema snapshots
///
/// `inputs`/`outputs` are copied from the block type at creation time and
/// immutable afterwards; `config` is an opaque bag for future per-node
/// parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Display label
    pub label: String,
    /// Block type this node instantiates (reference, not ownership)
    pub block_type_id: String,
    /// Input port schema snapshot
    pub inputs: PortSchema,
    /// Output port schema snapshot
    pub outputs: PortSchema,
    /// Opaque per-node configuration
    #[serde(default)]
    pub config: HashMap<String, serde_json::Value>,
}

/// A node instance in a workflow graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique instance ID
    pub id: NodeId,
    /// Position on canvas
    pub position: Position,
    /// Canvas selection state (transient; ignored by execution)
    #[serde(default)]
    pub selected: bool,
    /// Node payload
    pub data: NodeData,
}

/// An edge connecting one node's output port to another node's input port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Unique edge ID, derived from all four endpoint fields
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Target node ID
    pub target: NodeId,
    /// Output port name on the source node
    pub source_handle: String,
    /// Input port name on the target node
    pub target_handle: String,
}

/// A connection attempt from the canvas
///
/// Handles may be absent when the gesture never touched a port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
}

impl Connection {
    /// Create a fully-specified connection attempt
    pub fn new(
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
        target_handle: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: Some(source_handle.into()),
            target_handle: Some(target_handle.into()),
        }
    }
}

/// The canonical node and edge collections
///
/// Also the shape of a history snapshot: cloning a `WorkflowGraph` is a
/// full structural copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl WorkflowGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Check if a node with this ID exists
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// Get all edges that feed into a specific node
    pub fn incoming_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Get all edges that come out of a specific node
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }
}

/// Positional/selection deltas emitted by drag interaction
///
/// Applied in batches via the store's transient entry point; a continuous
/// drag emits many of these per second.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeChange {
    /// Move a node
    #[serde(rename_all = "camelCase")]
    Position { id: NodeId, position: Position },
    /// Change a node's selection state
    #[serde(rename_all = "camelCase")]
    Select { id: NodeId, selected: bool },
}

/// A static example workflow template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Block-type creation record produced by the node-creation dialog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomBlockSpec {
    pub label: String,
    pub inputs: PortSchema,
    pub outputs: PortSchema,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_type_compatibility_exact_match_only() {
        assert!(PortType::String.is_compatible_with(&PortType::String));
        assert!(PortType::Pdf.is_compatible_with(&PortType::Pdf));
        assert!(!PortType::String.is_compatible_with(&PortType::StringList));
        assert!(!PortType::StringList.is_compatible_with(&PortType::String));
        assert!(!PortType::Number.is_compatible_with(&PortType::Boolean));
    }

    #[test]
    fn test_port_type_serde_tags() {
        assert_eq!(serde_json::to_string(&PortType::String).unwrap(), "\"string\"");
        assert_eq!(serde_json::to_string(&PortType::StringList).unwrap(), "\"string[]\"");

        let parsed: PortType = serde_json::from_str("\"string[]\"").unwrap();
        assert_eq!(parsed, PortType::StringList);
    }

    #[test]
    fn test_graph_lookups() {
        let mut graph = WorkflowGraph::new();
        graph.nodes.push(GraphNode {
            id: "a".to_string(),
            position: Position::default(),
            selected: false,
            data: NodeData {
                label: "A".to_string(),
                block_type_id: "source".to_string(),
                inputs: PortSchema::new(),
                outputs: PortSchema::from([("text".to_string(), PortType::String)]),
                config: HashMap::new(),
            },
        });
        graph.edges.push(GraphEdge {
            id: "e1".to_string(),
            source: "a".to_string(),
            target: "b".to_string(),
            source_handle: "text".to_string(),
            target_handle: "text".to_string(),
        });

        assert!(graph.contains_node("a"));
        assert!(!graph.contains_node("b"));
        assert_eq!(graph.outgoing_edges("a").count(), 1);
        assert_eq!(graph.incoming_edges("b").count(), 1);
        assert_eq!(graph.incoming_edges("a").count(), 0);
    }

    #[test]
    fn test_node_serde_shape() {
        let node = GraphNode {
            id: "summarizer-1".to_string(),
            position: Position::new(400.0, 100.0),
            selected: false,
            data: NodeData {
                label: "Text Summarizer".to_string(),
                block_type_id: "summarizer".to_string(),
                inputs: PortSchema::from([("text".to_string(), PortType::String)]),
                outputs: PortSchema::from([("summary".to_string(), PortType::String)]),
                config: HashMap::new(),
            },
        };

        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["data"]["blockTypeId"], "summarizer");
        assert_eq!(json["data"]["inputs"]["text"], "string");

        let restored: GraphNode = serde_json::from_value(json).unwrap();
        assert_eq!(restored, node);
    }
}
