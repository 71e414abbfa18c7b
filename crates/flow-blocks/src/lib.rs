//! Flow Blocks
//!
//! Built-in block types and example templates for the flow engine. The
//! catalog supplies each block's port schemas and a simulated handler;
//! the templates are the literal example graphs offered by the UI.

pub mod catalog;
pub mod templates;

pub use catalog::{builtin_blocks, builtin_registry};
pub use templates::templates;

#[cfg(test)]
mod tests {
    use flow_engine::{ExecutionEngine, ExecutionStatus, WorkflowStore};

    use crate::catalog::builtin_registry;
    use crate::templates::templates;

    /// Load every template into a store and run it end to end.
    #[tokio::test]
    async fn test_templates_load_and_run() {
        for template in templates() {
            let template_id = template.id.clone();
            let mut store = WorkflowStore::new(builtin_registry(), templates());

            assert!(store.load_template(&template_id).unwrap());
            assert_eq!(store.nodes().len(), template.nodes.len());
            assert_eq!(store.edges().len(), template.edges.len());

            let mut engine = ExecutionEngine::new();
            engine.run_workflow(store.graph(), store.registry()).await;

            for node in store.nodes() {
                assert_eq!(
                    engine.node_status(&node.id),
                    Some(ExecutionStatus::Success),
                    "template '{}' node '{}' did not succeed",
                    template_id,
                    node.id
                );
            }
        }
    }

    /// The pdf-to-summary chain threads real values: parser text reaches
    /// the summarizer, and the summary feeds the keyword extractor.
    #[tokio::test]
    async fn test_pdf_to_summary_data_flow() {
        let mut store = WorkflowStore::new(builtin_registry(), templates());
        store.load_template("pdf-to-summary").unwrap();

        let mut engine = ExecutionEngine::new();
        engine.run_workflow(store.graph(), store.registry()).await;

        let summary = engine
            .node_results("summarizer-1")
            .and_then(|r| r.get("summary"))
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        assert!(summary.contains("Quarterly report"));

        let keywords = engine
            .node_results("keyword-extractor-1")
            .and_then(|r| r.get("keywords"))
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        assert!(!keywords.is_empty());
    }
}
