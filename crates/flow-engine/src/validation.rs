//! Structural graph validation
//!
//! Walks the whole graph and reports every finding rather than stopping
//! at the first. Purely advisory: the execution engine runs what it can
//! regardless, but hosts can surface these to the user — in particular
//! `CycleDetected`, which names the nodes a run would skip.

use std::collections::HashSet;

use crate::engine::execution_order;
use crate::registry::BlockRegistry;
use crate::types::{NodeId, PortType, WorkflowGraph};

/// Validation finding with location context
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// One or more cycles: these nodes can never execute
    CycleDetected { node_ids: Vec<NodeId> },
    /// An edge references a non-existent node
    UnknownNode { edge_id: String, node_id: String },
    /// An edge references a port name missing from a node's schema
    UnknownHandle {
        edge_id: String,
        node_id: String,
        handle: String,
    },
    /// An edge connects ports with different type tags
    TypeMismatch {
        edge_id: String,
        source_type: PortType,
        target_type: PortType,
    },
    /// A node references a block type missing from the registry
    UnknownBlockType {
        node_id: String,
        block_type_id: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycleDetected { node_ids } => {
                write!(f, "Cycle detected; unreachable nodes: {}", node_ids.join(", "))
            }
            Self::UnknownNode { edge_id, node_id } => {
                write!(f, "Edge '{}' references unknown node '{}'", edge_id, node_id)
            }
            Self::UnknownHandle {
                edge_id,
                node_id,
                handle,
            } => {
                write!(
                    f,
                    "Edge '{}' references undeclared port '{}' on node '{}'",
                    edge_id, handle, node_id
                )
            }
            Self::TypeMismatch {
                edge_id,
                source_type,
                target_type,
            } => {
                write!(
                    f,
                    "Edge '{}' connects incompatible types: {} -> {}",
                    edge_id,
                    source_type.tag(),
                    target_type.tag()
                )
            }
            Self::UnknownBlockType {
                node_id,
                block_type_id,
            } => {
                write!(
                    f,
                    "Node '{}' references unknown block type '{}'",
                    node_id, block_type_id
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a workflow graph
///
/// Returns all findings (not just the first). Pass a registry to also
/// check block type references.
pub fn validate_graph(
    graph: &WorkflowGraph,
    registry: Option<&BlockRegistry>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    validate_edges(graph, &mut errors);
    detect_cycles(graph, &mut errors);

    if let Some(reg) = registry {
        validate_block_types(graph, reg, &mut errors);
    }

    errors
}

/// Check edge endpoints: node existence, handle declarations, type match
fn validate_edges(graph: &WorkflowGraph, errors: &mut Vec<ValidationError>) {
    for edge in &graph.edges {
        let source = graph.find_node(&edge.source);
        let target = graph.find_node(&edge.target);

        if source.is_none() {
            errors.push(ValidationError::UnknownNode {
                edge_id: edge.id.clone(),
                node_id: edge.source.clone(),
            });
        }
        if target.is_none() {
            errors.push(ValidationError::UnknownNode {
                edge_id: edge.id.clone(),
                node_id: edge.target.clone(),
            });
        }

        let (Some(source), Some(target)) = (source, target) else {
            continue;
        };

        let output_type = source.data.outputs.get(&edge.source_handle);
        let input_type = target.data.inputs.get(&edge.target_handle);

        if output_type.is_none() {
            errors.push(ValidationError::UnknownHandle {
                edge_id: edge.id.clone(),
                node_id: source.id.clone(),
                handle: edge.source_handle.clone(),
            });
        }
        if input_type.is_none() {
            errors.push(ValidationError::UnknownHandle {
                edge_id: edge.id.clone(),
                node_id: target.id.clone(),
                handle: edge.target_handle.clone(),
            });
        }

        if let (Some(output_type), Some(input_type)) = (output_type, input_type) {
            if !output_type.is_compatible_with(input_type) {
                errors.push(ValidationError::TypeMismatch {
                    edge_id: edge.id.clone(),
                    source_type: *output_type,
                    target_type: *input_type,
                });
            }
        }
    }
}

/// Report the nodes Kahn's algorithm would never schedule
fn detect_cycles(graph: &WorkflowGraph, errors: &mut Vec<ValidationError>) {
    let ordered: HashSet<NodeId> = execution_order(graph).into_iter().collect();
    let unreachable: Vec<NodeId> = graph
        .nodes
        .iter()
        .filter(|n| !ordered.contains(&n.id))
        .map(|n| n.id.clone())
        .collect();

    if !unreachable.is_empty() {
        errors.push(ValidationError::CycleDetected {
            node_ids: unreachable,
        });
    }
}

/// Check that every node's block type resolves in the registry
fn validate_block_types(
    graph: &WorkflowGraph,
    registry: &BlockRegistry,
    errors: &mut Vec<ValidationError>,
) {
    for node in &graph.nodes {
        if !registry.contains(&node.data.block_type_id) {
            errors.push(ValidationError::UnknownBlockType {
                node_id: node.id.clone(),
                block_type_id: node.data.block_type_id.clone(),
            });
        }
    }
}
