//! Workflow store: canonical graph state and its mutation surface
//!
//! The store owns the live node/edge collections, the undo/redo history,
//! and the block registry. All mutations flow through it: committing
//! operations snapshot the pre-mutation state into history, while the
//! transient batch entry point (`apply_node_changes`) deliberately does
//! not, so continuous drags don't flood the stack.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::history::History;
use crate::registry::{BlockCategory, BlockRegistry, BlockType};
use crate::types::{
    Connection, CustomBlockSpec, GraphEdge, GraphNode, NodeChange, NodeData, NodeId, Position,
    Template, WorkflowGraph,
};

/// Where a node created through the custom-block dialog lands
const CUSTOM_NODE_POSITION: Position = Position { x: 100.0, y: 100.0 };

/// Owned workflow state: graph, history, registry, template catalog
pub struct WorkflowStore {
    graph: WorkflowGraph,
    history: History,
    registry: BlockRegistry,
    templates: Vec<Template>,
}

impl WorkflowStore {
    /// Create a store with empty collections
    pub fn new(registry: BlockRegistry, templates: Vec<Template>) -> Self {
        Self {
            graph: WorkflowGraph::new(),
            history: History::new(),
            registry,
            templates,
        }
    }

    /// The current graph, for rendering and execution
    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    /// The current node collection
    pub fn nodes(&self) -> &[GraphNode] {
        &self.graph.nodes
    }

    /// The current edge collection
    pub fn edges(&self) -> &[GraphEdge] {
        &self.graph.edges
    }

    /// The block registry (built-ins plus customs registered so far)
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// The static template catalog
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Number of undoable states (drives the undo control)
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Number of redoable states (drives the redo control)
    pub fn future_len(&self) -> usize {
        self.history.future_len()
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Create a node from a block type at the given position
    ///
    /// The node snapshots the block type's port schemas and references it
    /// by id. Returns the generated node id.
    pub fn add_node(&mut self, block_type: &BlockType, position: Position) -> Result<NodeId> {
        self.history.record(&self.graph)?;

        let id = self.generate_node_id(&block_type.id);
        self.graph.nodes.push(GraphNode {
            id: id.clone(),
            position,
            selected: false,
            data: NodeData {
                label: block_type.label.clone(),
                block_type_id: block_type.id.clone(),
                inputs: block_type.inputs.clone(),
                outputs: block_type.outputs.clone(),
                config: HashMap::new(),
            },
        });
        Ok(id)
    }

    /// Register a user-defined block type and place one node instantiating it
    ///
    /// The type gets a freshly generated id and the `Custom` category; the
    /// node lands at a fixed default position. One history entry covers
    /// both effects. Returns the new type id.
    pub fn add_custom_block_type(&mut self, spec: CustomBlockSpec) -> Result<String> {
        self.history.record(&self.graph)?;

        let type_id = self.generate_custom_type_id();
        self.registry.register_custom(BlockType::new(
            &type_id,
            &spec.label,
            BlockCategory::Custom,
            spec.inputs.clone(),
            spec.outputs.clone(),
        ));

        let node_id = self.generate_node_id(&type_id);
        self.graph.nodes.push(GraphNode {
            id: node_id,
            position: CUSTOM_NODE_POSITION,
            selected: false,
            data: NodeData {
                label: spec.label,
                block_type_id: type_id.clone(),
                inputs: spec.inputs,
                outputs: spec.outputs,
                config: HashMap::new(),
            },
        });
        Ok(type_id)
    }

    /// Move a node to a new position, recording history
    ///
    /// A missing id is a silent no-op without history churn; returns
    /// whether a node was moved.
    pub fn update_node_position(&mut self, id: &str, position: Position) -> Result<bool> {
        if !self.graph.contains_node(id) {
            return Ok(false);
        }
        self.history.record(&self.graph)?;
        if let Some(node) = self.graph.find_node_mut(id) {
            node.position = position;
        }
        Ok(true)
    }

    /// Apply a batch of drag-interaction deltas without recording history
    ///
    /// Deltas referencing unknown nodes are ignored.
    pub fn apply_node_changes(&mut self, changes: &[NodeChange]) {
        for change in changes {
            match change {
                NodeChange::Position { id, position } => {
                    if let Some(node) = self.graph.find_node_mut(id) {
                        node.position = *position;
                    }
                }
                NodeChange::Select { id, selected } => {
                    if let Some(node) = self.graph.find_node_mut(id) {
                        node.selected = *selected;
                    }
                }
            }
        }
    }

    /// Check whether a connection attempt could become an edge
    ///
    /// Requires resolvable source and target nodes, present non-empty
    /// handles declared in the respective schemas, and exactly matching
    /// port types. Never panics.
    pub fn is_valid_connection(&self, connection: &Connection) -> bool {
        let (Some(source_handle), Some(target_handle)) = (
            connection.source_handle.as_deref(),
            connection.target_handle.as_deref(),
        ) else {
            return false;
        };
        if source_handle.is_empty() || target_handle.is_empty() {
            return false;
        }

        let Some(source) = self.graph.find_node(&connection.source) else {
            return false;
        };
        let Some(target) = self.graph.find_node(&connection.target) else {
            return false;
        };

        let Some(output_type) = source.data.outputs.get(source_handle) else {
            return false;
        };
        let Some(input_type) = target.data.inputs.get(target_handle) else {
            return false;
        };

        output_type.is_compatible_with(input_type)
    }

    /// Create an edge from a connection attempt
    ///
    /// Invalid attempts are silently rejected (no edge, no history entry).
    /// Edge identity is derived from all four endpoint fields, so
    /// re-connecting an already-connected port pair is also a no-op.
    /// Returns whether an edge was added.
    pub fn add_edge(&mut self, connection: &Connection) -> Result<bool> {
        if !self.is_valid_connection(connection) {
            return Ok(false);
        }
        let (Some(source_handle), Some(target_handle)) = (
            connection.source_handle.as_deref(),
            connection.target_handle.as_deref(),
        ) else {
            return Ok(false);
        };

        let id = edge_id(&connection.source, source_handle, &connection.target, target_handle);
        if self.graph.edges.iter().any(|e| e.id == id) {
            return Ok(false);
        }

        self.history.record(&self.graph)?;
        self.graph.edges.push(GraphEdge {
            id,
            source: connection.source.clone(),
            target: connection.target.clone(),
            source_handle: source_handle.to_string(),
            target_handle: target_handle.to_string(),
        });
        Ok(true)
    }

    /// Remove a node and every edge incident to it
    ///
    /// A missing id is a silent no-op without history churn.
    pub fn remove_node(&mut self, id: &str) -> Result<bool> {
        if !self.graph.contains_node(id) {
            return Ok(false);
        }
        self.history.record(&self.graph)?;
        self.graph.nodes.retain(|n| n.id != id);
        self.graph.edges.retain(|e| e.source != id && e.target != id);
        Ok(true)
    }

    /// Remove a single edge by id
    ///
    /// A missing id is a silent no-op without history churn.
    pub fn remove_edge(&mut self, id: &str) -> Result<bool> {
        if !self.graph.edges.iter().any(|e| e.id == id) {
            return Ok(false);
        }
        self.history.record(&self.graph)?;
        self.graph.edges.retain(|e| e.id != id);
        Ok(true)
    }

    /// Replace the graph with a template's node and edge lists
    ///
    /// The load is undoable: the pre-load state is snapshotted first. An
    /// unknown template id is a no-op. Returns whether a template loaded.
    pub fn load_template(&mut self, template_id: &str) -> Result<bool> {
        let Some(template) = self.templates.iter().find(|t| t.id == template_id) else {
            return Ok(false);
        };
        let nodes = template.nodes.clone();
        let edges = template.edges.clone();

        self.history.record(&self.graph)?;
        self.graph.nodes = nodes;
        self.graph.edges = edges;
        log::debug!("loaded template '{}'", template_id);
        Ok(true)
    }

    /// Restore the most recent past state
    ///
    /// Returns `Ok(false)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        match self.history.undo(&self.graph) {
            Some(Ok(graph)) => {
                self.graph = graph;
                Ok(true)
            }
            Some(Err(e)) => Err(e),
            None => Ok(false),
        }
    }

    /// Restore the most recently undone state
    ///
    /// Returns `Ok(false)` when there is nothing to redo.
    pub fn redo(&mut self) -> Result<bool> {
        match self.history.redo(&self.graph) {
            Some(Ok(graph)) => {
                self.graph = graph;
                Ok(true)
            }
            Some(Err(e)) => Err(e),
            None => Ok(false),
        }
    }

    /// Generate a node id as `<type>-<unix-millis>`, suffixed on collision
    fn generate_node_id(&self, type_id: &str) -> NodeId {
        let base = format!("{}-{}", type_id, unix_millis());
        if !self.graph.contains_node(&base) {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.graph.contains_node(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Generate a custom block type id, unique within the registry
    fn generate_custom_type_id(&self) -> String {
        let base = format!("custom-{}", unix_millis());
        if !self.registry.contains(&base) {
            return base;
        }
        let mut n = 1u32;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.registry.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn edge_id(source: &str, source_handle: &str, target: &str, target_handle: &str) -> String {
    format!("e{source}.{source_handle}-{target}.{target_handle}")
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
