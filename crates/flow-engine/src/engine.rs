//! Workflow execution engine
//!
//! Computes a topological execution order over the current graph, gathers
//! each node's inputs from upstream outputs, invokes the registered block
//! handler, and tracks per-node status and results. Execution is strictly
//! sequential; one node's failure never aborts the run.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::registry::BlockRegistry;
use crate::types::{BlockValues, NodeId, WorkflowGraph};

/// Per-node execution state, reset at the start of each run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// Not yet attempted (also the final state of nodes excluded by a cycle)
    Idle,
    /// Handler currently running
    Processing,
    /// Handler completed and outputs were recorded
    Success,
    /// Handler failed or no handler was registered
    Error,
}

/// Executes workflows and records per-node status and results
#[derive(Default)]
pub struct ExecutionEngine {
    status: HashMap<NodeId, ExecutionStatus>,
    results: HashMap<NodeId, BlockValues>,
}

impl ExecutionEngine {
    /// Create an engine with empty status/result maps
    pub fn new() -> Self {
        Self::default()
    }

    /// Execution status per node, for UI feedback
    pub fn status(&self) -> &HashMap<NodeId, ExecutionStatus> {
        &self.status
    }

    /// Recorded outputs per node
    pub fn results(&self) -> &HashMap<NodeId, BlockValues> {
        &self.results
    }

    /// Status of a single node
    pub fn node_status(&self, id: &str) -> Option<ExecutionStatus> {
        self.status.get(id).copied()
    }

    /// Outputs of a single node, if it succeeded
    pub fn node_results(&self, id: &str) -> Option<&BlockValues> {
        self.results.get(id)
    }

    /// Execute the graph front to back
    ///
    /// Nodes run sequentially in topological order; each handler is
    /// awaited to completion before the next node starts. Nodes caught in
    /// a cycle are never attempted and stay `Idle`. A node whose block
    /// type is unresolved or has no handler, or whose handler fails, is
    /// marked `Error` and the run continues; its dependents simply
    /// receive no binding for that input.
    pub async fn run_workflow(&mut self, graph: &WorkflowGraph, registry: &BlockRegistry) {
        self.results.clear();
        self.status = graph
            .nodes
            .iter()
            .map(|n| (n.id.clone(), ExecutionStatus::Idle))
            .collect();

        for node_id in execution_order(graph) {
            let Some(node) = graph.find_node(&node_id) else {
                continue;
            };
            self.status.insert(node_id.clone(), ExecutionStatus::Processing);

            let inputs = gather_inputs(graph, &node_id, &self.results);

            let handler = registry
                .resolve(&node.data.block_type_id)
                .and_then(|block| block.handler.clone());
            let Some(handler) = handler else {
                let err = crate::error::EngineError::HandlerMissing(node.data.block_type_id.clone());
                log::warn!("node '{}': {}", node_id, err);
                self.status.insert(node_id, ExecutionStatus::Error);
                continue;
            };

            match handler.run(inputs).await {
                Ok(outputs) => {
                    self.results.insert(node_id.clone(), outputs);
                    self.status.insert(node_id, ExecutionStatus::Success);
                }
                Err(e) => {
                    log::error!("node '{}' failed: {}", node_id, e);
                    self.status.insert(node_id, ExecutionStatus::Error);
                }
            }
        }
    }
}

/// Topological execution order via Kahn's algorithm
///
/// Zero-in-degree seeding and tie-breaking follow node insertion order;
/// adjacency follows edge insertion order. Nodes that never reach zero
/// in-degree (cycle members and their dependents) are excluded.
pub fn execution_order(graph: &WorkflowGraph) -> Vec<NodeId> {
    let mut in_degree: HashMap<&str, usize> =
        graph.nodes.iter().map(|n| (n.id.as_str(), 0)).collect();
    let mut adjacency: HashMap<&str, Vec<&str>> = graph
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), Vec::new()))
        .collect();

    for edge in &graph.edges {
        if let Some(adj) = adjacency.get_mut(edge.source.as_str()) {
            adj.push(edge.target.as_str());
        }
        if let Some(degree) = in_degree.get_mut(edge.target.as_str()) {
            *degree += 1;
        }
    }

    let mut queue: VecDeque<&str> = graph
        .nodes
        .iter()
        .filter(|n| in_degree.get(n.id.as_str()).copied() == Some(0))
        .map(|n| n.id.as_str())
        .collect();

    let mut order = Vec::new();
    while let Some(node_id) = queue.pop_front() {
        order.push(node_id.to_string());

        if let Some(neighbors) = adjacency.get(node_id) {
            for &target in neighbors {
                if let Some(degree) = in_degree.get_mut(target) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(target);
                    }
                }
            }
        }
    }

    order
}

/// Bind upstream outputs to a node's input ports
///
/// For every edge targeting the node (in edge insertion order), the source
/// node's recorded output named by the edge's source handle, if any, is
/// bound to the target handle. Inputs with no feeding edge stay absent;
/// when several edges feed the same input the last-iterated edge wins.
fn gather_inputs(
    graph: &WorkflowGraph,
    node_id: &str,
    results: &HashMap<NodeId, BlockValues>,
) -> BlockValues {
    let mut inputs = BlockValues::new();
    for edge in graph.incoming_edges(node_id) {
        if let Some(source_outputs) = results.get(&edge.source) {
            if let Some(value) = source_outputs.get(&edge.source_handle) {
                inputs.insert(edge.target_handle.clone(), value.clone());
            }
        }
    }
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BlockCategory, BlockRegistry, BlockType, FnHandler};
    use crate::types::{GraphEdge, GraphNode, NodeData, PortSchema, PortType, Position};
    use serde_json::json;

    fn node(id: &str, block_type_id: &str) -> GraphNode {
        GraphNode {
            id: id.to_string(),
            position: Position::default(),
            selected: false,
            data: NodeData {
                label: id.to_string(),
                block_type_id: block_type_id.to_string(),
                inputs: PortSchema::from([("text".to_string(), PortType::String)]),
                outputs: PortSchema::from([("text".to_string(), PortType::String)]),
                config: Default::default(),
            },
        }
    }

    fn edge(source: &str, source_handle: &str, target: &str, target_handle: &str) -> GraphEdge {
        GraphEdge {
            id: format!("e{source}.{source_handle}-{target}.{target_handle}"),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: source_handle.to_string(),
            target_handle: target_handle.to_string(),
        }
    }

    fn graph(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> WorkflowGraph {
        WorkflowGraph { nodes, edges }
    }

    /// Registry with a "producer" type emitting a constant `text` output
    /// and an "upper" type uppercasing its `text` input.
    fn test_registry() -> BlockRegistry {
        let producer = BlockType::new(
            "producer",
            "Producer",
            BlockCategory::TextProcessing,
            PortSchema::new(),
            PortSchema::from([("text".to_string(), PortType::String)]),
        )
        .with_handler(FnHandler::shared(|_inputs| async {
            Ok(BlockValues::from([("text".to_string(), json!("hello world"))]))
        }));

        let upper = BlockType::new(
            "upper",
            "Uppercase",
            BlockCategory::TextProcessing,
            PortSchema::from([("text".to_string(), PortType::String)]),
            PortSchema::from([("text".to_string(), PortType::String)]),
        )
        .with_handler(FnHandler::shared(|inputs: BlockValues| async move {
            let text = inputs
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_uppercase();
            Ok(BlockValues::from([("text".to_string(), json!(text))]))
        }));

        let broken = BlockType::new(
            "broken",
            "Broken",
            BlockCategory::TextProcessing,
            PortSchema::from([("text".to_string(), PortType::String)]),
            PortSchema::from([("text".to_string(), PortType::String)]),
        )
        .with_handler(FnHandler::shared(|_inputs| async {
            Err(crate::error::EngineError::failed("simulated failure"))
        }));

        let bare = BlockType::new(
            "bare",
            "Bare",
            BlockCategory::TextProcessing,
            PortSchema::new(),
            PortSchema::new(),
        );

        BlockRegistry::new(vec![producer, upper, broken, bare])
    }

    #[test]
    fn test_execution_order_respects_edges() {
        let g = graph(
            vec![node("c", "upper"), node("a", "producer"), node("b", "upper")],
            vec![edge("a", "text", "b", "text"), edge("b", "text", "c", "text")],
        );

        let order = execution_order(&g);
        let pos = |id: &str| order.iter().position(|n| n == id).unwrap();
        assert_eq!(order.len(), 3);
        assert!(pos("a") < pos("b"));
        assert!(pos("b") < pos("c"));
    }

    #[test]
    fn test_execution_order_ties_follow_insertion_order() {
        let g = graph(
            vec![node("second", "producer"), node("first", "producer")],
            vec![],
        );

        assert_eq!(execution_order(&g), vec!["second", "first"]);
    }

    #[test]
    fn test_execution_order_excludes_cycle_members() {
        let g = graph(
            vec![node("a", "upper"), node("b", "upper"), node("c", "producer")],
            vec![edge("a", "text", "b", "text"), edge("b", "text", "a", "text")],
        );

        assert_eq!(execution_order(&g), vec!["c"]);
    }

    #[tokio::test]
    async fn test_run_linear_workflow() {
        let g = graph(
            vec![node("a", "producer"), node("b", "upper")],
            vec![edge("a", "text", "b", "text")],
        );
        let registry = test_registry();
        let mut engine = ExecutionEngine::new();

        engine.run_workflow(&g, &registry).await;

        assert_eq!(engine.node_status("a"), Some(ExecutionStatus::Success));
        assert_eq!(engine.node_status("b"), Some(ExecutionStatus::Success));
        assert_eq!(
            engine.node_results("b").unwrap().get("text").unwrap(),
            &json!("HELLO WORLD")
        );
    }

    #[tokio::test]
    async fn test_run_resets_previous_state() {
        let g = graph(vec![node("a", "producer")], vec![]);
        let registry = test_registry();
        let mut engine = ExecutionEngine::new();

        engine.run_workflow(&g, &registry).await;
        assert_eq!(engine.results().len(), 1);

        let empty = WorkflowGraph::new();
        engine.run_workflow(&empty, &registry).await;
        assert!(engine.results().is_empty());
        assert!(engine.status().is_empty());
    }

    #[tokio::test]
    async fn test_cycle_members_stay_idle() {
        let g = graph(
            vec![node("a", "upper"), node("b", "upper")],
            vec![edge("a", "text", "b", "text"), edge("b", "text", "a", "text")],
        );
        let registry = test_registry();
        let mut engine = ExecutionEngine::new();

        engine.run_workflow(&g, &registry).await;

        assert_eq!(engine.node_status("a"), Some(ExecutionStatus::Idle));
        assert_eq!(engine.node_status("b"), Some(ExecutionStatus::Idle));
        assert!(engine.results().is_empty());
    }

    #[tokio::test]
    async fn test_missing_handler_marks_error_and_continues() {
        let g = graph(
            vec![node("c", "bare"), node("a", "producer")],
            vec![],
        );
        let registry = test_registry();
        let mut engine = ExecutionEngine::new();

        engine.run_workflow(&g, &registry).await;

        assert_eq!(engine.node_status("c"), Some(ExecutionStatus::Error));
        assert!(engine.node_results("c").is_none());
        // The rest of the run still happened
        assert_eq!(engine.node_status("a"), Some(ExecutionStatus::Success));
    }

    #[tokio::test]
    async fn test_unknown_block_type_marks_error() {
        let g = graph(vec![node("x", "never-registered")], vec![]);
        let registry = test_registry();
        let mut engine = ExecutionEngine::new();

        engine.run_workflow(&g, &registry).await;

        assert_eq!(engine.node_status("x"), Some(ExecutionStatus::Error));
    }

    #[tokio::test]
    async fn test_failed_upstream_leaves_input_unbound() {
        // broken -> upper: upper still runs, with no `text` binding
        let g = graph(
            vec![node("bad", "broken"), node("b", "upper")],
            vec![edge("bad", "text", "b", "text")],
        );
        let registry = test_registry();
        let mut engine = ExecutionEngine::new();

        engine.run_workflow(&g, &registry).await;

        assert_eq!(engine.node_status("bad"), Some(ExecutionStatus::Error));
        assert!(engine.node_results("bad").is_none());
        assert_eq!(engine.node_status("b"), Some(ExecutionStatus::Success));
        // Uppercase of the absent input's default
        assert_eq!(
            engine.node_results("b").unwrap().get("text").unwrap(),
            &json!("")
        );
    }

    #[tokio::test]
    async fn test_fan_in_last_edge_wins() {
        let first = BlockType::new(
            "first",
            "First",
            BlockCategory::TextProcessing,
            PortSchema::new(),
            PortSchema::from([("text".to_string(), PortType::String)]),
        )
        .with_handler(FnHandler::shared(|_| async {
            Ok(BlockValues::from([("text".to_string(), json!("first"))]))
        }));
        let second = BlockType::new(
            "second",
            "Second",
            BlockCategory::TextProcessing,
            PortSchema::new(),
            PortSchema::from([("text".to_string(), PortType::String)]),
        )
        .with_handler(FnHandler::shared(|_| async {
            Ok(BlockValues::from([("text".to_string(), json!("second"))]))
        }));
        let echo = BlockType::new(
            "echo",
            "Echo",
            BlockCategory::TextProcessing,
            PortSchema::from([("text".to_string(), PortType::String)]),
            PortSchema::from([("text".to_string(), PortType::String)]),
        )
        .with_handler(FnHandler::shared(|inputs: BlockValues| async move {
            Ok(inputs)
        }));
        let registry = BlockRegistry::new(vec![first, second, echo]);

        let g = graph(
            vec![node("f", "first"), node("s", "second"), node("e", "echo")],
            vec![edge("f", "text", "e", "text"), edge("s", "text", "e", "text")],
        );
        let mut engine = ExecutionEngine::new();

        engine.run_workflow(&g, &registry).await;

        // Both upstream edges bind the same input; the later edge wins
        assert_eq!(
            engine.node_results("e").unwrap().get("text").unwrap(),
            &json!("second")
        );
    }
}
