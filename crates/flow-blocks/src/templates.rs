//! Example workflow templates
//!
//! Static in-process records; loading one replaces the store's node and
//! edge collections with these literal lists. Node ids, positions, and
//! port schemas are part of the record and survive the load untouched.

use std::collections::HashMap;

use flow_engine::{
    GraphEdge, GraphNode, NodeData, PortSchema, PortType, Position, Template,
};

/// All example templates, in catalog order
pub fn templates() -> Vec<Template> {
    vec![
        pdf_to_summary(),
        document_processing_workflow(),
        ai_multi_step(),
        advanced_document_processing(),
    ]
}

fn schema(ports: &[(&str, PortType)]) -> PortSchema {
    ports.iter().map(|(name, ty)| (name.to_string(), *ty)).collect()
}

fn template_node(
    id: &str,
    label: &str,
    block_type_id: &str,
    x: f64,
    y: f64,
    inputs: &[(&str, PortType)],
    outputs: &[(&str, PortType)],
) -> GraphNode {
    GraphNode {
        id: id.to_string(),
        position: Position::new(x, y),
        selected: false,
        data: NodeData {
            label: label.to_string(),
            block_type_id: block_type_id.to_string(),
            inputs: schema(inputs),
            outputs: schema(outputs),
            config: HashMap::new(),
        },
    }
}

fn template_edge(id: &str, source: &str, sh: &str, target: &str, th: &str) -> GraphEdge {
    GraphEdge {
        id: id.to_string(),
        source: source.to_string(),
        target: target.to_string(),
        source_handle: sh.to_string(),
        target_handle: th.to_string(),
    }
}

fn pdf_to_summary() -> Template {
    Template {
        id: "pdf-to-summary".to_string(),
        name: "PDF to Summary".to_string(),
        description: "Extract text from PDF, analyze content, and generate a summary".to_string(),
        nodes: vec![
            template_node(
                "pdf-parser-1",
                "PDF Parser",
                "pdf-parser",
                100.0,
                100.0,
                &[("file", PortType::Pdf)],
                &[("text", PortType::String)],
            ),
            template_node(
                "language-detector-1",
                "Language Detector",
                "language-detector",
                400.0,
                -100.0,
                &[("text", PortType::String)],
                &[("language", PortType::String)],
            ),
            template_node(
                "sentiment-analyzer-1",
                "Sentiment Analyzer",
                "sentiment-analyzer",
                400.0,
                300.0,
                &[("text", PortType::String)],
                &[("sentiment", PortType::String)],
            ),
            template_node(
                "summarizer-1",
                "Text Summarizer",
                "summarizer",
                400.0,
                100.0,
                &[("text", PortType::String)],
                &[("summary", PortType::String)],
            ),
            template_node(
                "keyword-extractor-1",
                "Keyword Extractor",
                "keyword-extractor",
                700.0,
                100.0,
                &[("text", PortType::String)],
                &[("keywords", PortType::StringList)],
            ),
        ],
        edges: vec![
            template_edge("e1-2", "pdf-parser-1", "text", "language-detector-1", "text"),
            template_edge("e1-3", "pdf-parser-1", "text", "sentiment-analyzer-1", "text"),
            template_edge("e1-4", "pdf-parser-1", "text", "summarizer-1", "text"),
            template_edge("e4-5", "summarizer-1", "summary", "keyword-extractor-1", "text"),
        ],
    }
}

fn document_processing_workflow() -> Template {
    Template {
        id: "document-processing-workflow".to_string(),
        name: "Document Processing Workflow".to_string(),
        description: "Processes a document, extracts text, splits words, and summarizes"
            .to_string(),
        nodes: vec![
            template_node(
                "api-call",
                "API Call",
                "api-call-tool",
                0.0,
                0.0,
                &[("TEXT", PortType::String)],
                &[("FILE", PortType::Pdf)],
            ),
            template_node(
                "pdf-parser",
                "PDF Parser",
                "pdf-parser",
                300.0,
                0.0,
                &[("FILE", PortType::Pdf)],
                &[("TEXT", PortType::String)],
            ),
            template_node(
                "text-to-words-1",
                "Text to Array of Words",
                "text-to-words",
                600.0,
                -200.0,
                &[("TEXT", PortType::String)],
                &[("WORDS", PortType::StringList)],
            ),
            template_node(
                "text-to-words-2",
                "Text to Array of Words",
                "text-to-words",
                900.0,
                0.0,
                &[("TEXT", PortType::String)],
                &[("WORDS", PortType::StringList)],
            ),
            template_node(
                "text-summarizer",
                "Text Summarizer",
                "summarizer",
                600.0,
                200.0,
                &[("TEXT", PortType::String)],
                &[("SUMMARY", PortType::String)],
            ),
        ],
        edges: vec![
            template_edge("e1-2", "api-call", "FILE", "pdf-parser", "FILE"),
            template_edge("e2-3", "pdf-parser", "TEXT", "text-to-words-1", "TEXT"),
            template_edge("e2-5", "pdf-parser", "TEXT", "text-summarizer", "TEXT"),
            template_edge("e3-4", "text-summarizer", "SUMMARY", "text-to-words-2", "TEXT"),
        ],
    }
}

fn ai_multi_step() -> Template {
    Template {
        id: "ai-multi-step".to_string(),
        name: "AI Multi-Step Workflow".to_string(),
        description:
            "Extracts text, splits it, sends to multiple AI models, and generates insights"
                .to_string(),
        nodes: vec![
            template_node(
                "pdf-parser-ai",
                "PDF Parser",
                "pdf-parser",
                100.0,
                100.0,
                &[("file", PortType::Pdf)],
                &[("text", PortType::String)],
            ),
            template_node(
                "text-to-words-ai",
                "Text to Array of Words",
                "text-to-words",
                400.0,
                100.0,
                &[("text", PortType::String)],
                &[("words", PortType::StringList)],
            ),
            template_node(
                "api-call-ai-1",
                "AI Analysis Model 1",
                "api-call-tool",
                700.0,
                -100.0,
                &[("text", PortType::String)],
                &[("insights", PortType::String)],
            ),
            template_node(
                "api-call-ai-2",
                "AI Analysis Model 2",
                "api-call-tool",
                700.0,
                300.0,
                &[("text", PortType::String)],
                &[("insights", PortType::String)],
            ),
            template_node(
                "summarizer-ai",
                "Text Summarizer",
                "summarizer",
                1000.0,
                125.0,
                &[("text", PortType::String)],
                &[("summary", PortType::String)],
            ),
        ],
        edges: vec![
            template_edge("e1-2", "pdf-parser-ai", "text", "text-to-words-ai", "text"),
            template_edge("e2-3", "text-to-words-ai", "words", "api-call-ai-1", "text"),
            template_edge("e2-4", "text-to-words-ai", "words", "api-call-ai-2", "text"),
            template_edge("e3-5", "api-call-ai-1", "insights", "summarizer-ai", "text"),
            template_edge("e4-5", "api-call-ai-2", "insights", "summarizer-ai", "text"),
        ],
    }
}

fn advanced_document_processing() -> Template {
    Template {
        id: "advanced-document-processing".to_string(),
        name: "Advanced Document Processing".to_string(),
        description: "Processes documents, extracts text, detects language, performs sentiment \
                      analysis, summarizes, and extracts keywords."
            .to_string(),
        nodes: vec![
            template_node(
                "api-call",
                "API Call",
                "api-call-tool",
                0.0,
                0.0,
                &[("TEXT", PortType::String)],
                &[("FILE", PortType::Pdf)],
            ),
            template_node(
                "pdf-parser",
                "PDF Parser",
                "pdf-parser",
                300.0,
                0.0,
                &[("FILE", PortType::Pdf)],
                &[("TEXT", PortType::String)],
            ),
            template_node(
                "ocr-processor",
                "OCR Processor",
                "ocr-processor",
                600.0,
                -150.0,
                &[("TEXT", PortType::String)],
                &[("TEXT", PortType::String)],
            ),
            template_node(
                "language-detector",
                "Language Detector",
                "language-detector",
                600.0,
                150.0,
                &[("TEXT", PortType::String)],
                &[("LANGUAGE", PortType::String)],
            ),
            template_node(
                "sentiment-analysis",
                "Sentiment Analysis",
                "sentiment-analyzer",
                900.0,
                -300.0,
                &[("TEXT", PortType::String)],
                &[("SENTIMENT", PortType::String)],
            ),
            template_node(
                "text-summarizer",
                "Text Summarizer",
                "summarizer",
                900.0,
                0.0,
                &[("TEXT", PortType::String)],
                &[("SUMMARY", PortType::String)],
            ),
            template_node(
                "keyword-extractor",
                "Keyword Extractor",
                "keyword-extractor",
                1200.0,
                -100.0,
                &[("TEXT", PortType::String)],
                &[("KEYWORDS", PortType::StringList)],
            ),
            template_node(
                "text-to-words",
                "Text to Array of Words",
                "text-to-words",
                1200.0,
                100.0,
                &[("TEXT", PortType::String)],
                &[("WORDS", PortType::StringList)],
            ),
        ],
        edges: vec![
            template_edge("e1-2", "api-call", "FILE", "pdf-parser", "FILE"),
            template_edge("e2-3", "pdf-parser", "TEXT", "ocr-processor", "TEXT"),
            template_edge("e2-4", "pdf-parser", "TEXT", "language-detector", "TEXT"),
            template_edge("e3-5", "ocr-processor", "TEXT", "sentiment-analysis", "TEXT"),
            template_edge("e3-6", "ocr-processor", "TEXT", "text-summarizer", "TEXT"),
            template_edge("e6-7", "text-summarizer", "SUMMARY", "keyword-extractor", "TEXT"),
            template_edge("e6-8", "text-summarizer", "SUMMARY", "text-to-words", "TEXT"),
        ],
    }
}
