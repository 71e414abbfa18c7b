//! Flow Engine - workflow graph engine
//!
//! This crate provides the core of a visual block-workflow tool: the
//! node/edge/port data model, connection-validity rules, snapshot-based
//! undo/redo, a block type registry, and a sequential execution engine.
//!
//! # Architecture
//!
//! - [`WorkflowStore`]: owned graph state with committing (history-recorded)
//!   and transient mutation entry points
//! - [`History`]: two-stack undo/redo over compressed structural snapshots
//! - [`BlockRegistry`]: built-in and user-defined block types with their
//!   port schemas and handlers
//! - [`ExecutionEngine`]: topological ordering, per-node input gathering,
//!   status/result tracking
//! - [`validation`]: advisory structural diagnostics, including cycle
//!   membership
//!
//! Execution is strictly sequential on one logical timeline; handlers may
//! suspend internally but are awaited to completion one at a time.

pub mod engine;
pub mod error;
pub mod history;
pub mod registry;
pub mod store;
pub mod types;
pub mod validation;

// Re-export key types
pub use engine::{execution_order, ExecutionEngine, ExecutionStatus};
pub use error::{EngineError, Result};
pub use history::History;
pub use registry::{BlockCategory, BlockHandler, BlockRegistry, BlockType, FnHandler};
pub use store::WorkflowStore;
pub use types::{
    BlockValues, Connection, CustomBlockSpec, EdgeId, GraphEdge, GraphNode, NodeChange, NodeData,
    NodeId, PortSchema, PortType, Position, Template, WorkflowGraph,
};
pub use validation::{validate_graph, ValidationError};
