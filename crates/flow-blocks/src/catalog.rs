//! Built-in block catalog
//!
//! Each built-in block type carries a simulated handler: a deterministic,
//! pure transform standing in for the real processing logic. Handlers
//! tolerate absent inputs (an unconnected port simply has no binding) so
//! a partially wired graph still runs end to end.

use flow_engine::{
    BlockCategory, BlockRegistry, BlockType, BlockValues, FnHandler, PortSchema, PortType,
};
use serde_json::json;

/// All built-in block types, in palette order
pub fn builtin_blocks() -> Vec<BlockType> {
    vec![
        pdf_parser(),
        text_to_words(),
        summarizer(),
        api_call_tool(),
        language_detector(),
        sentiment_analyzer(),
        keyword_extractor(),
        ocr_processor(),
    ]
}

/// A registry preloaded with the built-in catalog
pub fn builtin_registry() -> BlockRegistry {
    BlockRegistry::new(builtin_blocks())
}

fn schema(ports: &[(&str, PortType)]) -> PortSchema {
    ports.iter().map(|(name, ty)| (name.to_string(), *ty)).collect()
}

/// Fetch a string input, defaulting to empty when unbound
fn text_input(inputs: &BlockValues, port: &str) -> String {
    inputs
        .get(port)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

const SAMPLE_DOCUMENT_TEXT: &str =
    "Quarterly report: revenue grew across all regions while operating costs held flat. \
     The team credits the new onboarding flow and faster support turnaround.";

/// PDF Parser: extracts text from a document reference
fn pdf_parser() -> BlockType {
    BlockType::new(
        "pdf-parser",
        "PDF Parser",
        BlockCategory::FileProcessing,
        schema(&[("file", PortType::Pdf)]),
        schema(&[("text", PortType::String)]),
    )
    .with_handler(FnHandler::shared(|inputs: BlockValues| async move {
        let name = inputs
            .get("file")
            .and_then(|v| v.get("name"))
            .and_then(|v| v.as_str())
            .unwrap_or("document.pdf")
            .to_string();
        log::debug!("pdf-parser: extracting text from '{}'", name);
        Ok(BlockValues::from([(
            "text".to_string(),
            json!(SAMPLE_DOCUMENT_TEXT),
        )]))
    }))
}

/// Text to Array of Words: whitespace split
fn text_to_words() -> BlockType {
    BlockType::new(
        "text-to-words",
        "Text to Array of Words",
        BlockCategory::TextProcessing,
        schema(&[("text", PortType::String)]),
        schema(&[("words", PortType::StringList)]),
    )
    .with_handler(FnHandler::shared(|inputs: BlockValues| async move {
        let words: Vec<String> = text_input(&inputs, "text")
            .split_whitespace()
            .map(|w| w.to_string())
            .collect();
        Ok(BlockValues::from([("words".to_string(), json!(words))]))
    }))
}

/// Text Summarizer: truncates to the first sentence
fn summarizer() -> BlockType {
    BlockType::new(
        "summarizer",
        "Text Summarizer",
        BlockCategory::AiProcessing,
        schema(&[("text", PortType::String)]),
        schema(&[("summary", PortType::String)]),
    )
    .with_handler(FnHandler::shared(|inputs: BlockValues| async move {
        let text = text_input(&inputs, "text");
        let summary = match text.find('.') {
            Some(end) => text[..=end].to_string(),
            None => text,
        };
        Ok(BlockValues::from([("summary".to_string(), json!(summary))]))
    }))
}

/// API Call: turns text into a generated document reference
fn api_call_tool() -> BlockType {
    BlockType::new(
        "api-call-tool",
        "API Call",
        BlockCategory::AiProcessing,
        schema(&[("text", PortType::String)]),
        schema(&[("file", PortType::Pdf)]),
    )
    .with_handler(FnHandler::shared(|inputs: BlockValues| async move {
        let text = text_input(&inputs, "text");
        Ok(BlockValues::from([(
            "file".to_string(),
            json!({ "name": "generated.pdf", "bytes": text.len() }),
        )]))
    }))
}

/// Language Detector: simulated detection
fn language_detector() -> BlockType {
    BlockType::new(
        "language-detector",
        "Language Detector",
        BlockCategory::AiProcessing,
        schema(&[("text", PortType::String)]),
        schema(&[("language", PortType::String)]),
    )
    .with_handler(FnHandler::shared(|inputs: BlockValues| async move {
        let text = text_input(&inputs, "text");
        let language = if text.trim().is_empty() { "unknown" } else { "en" };
        Ok(BlockValues::from([(
            "language".to_string(),
            json!(language),
        )]))
    }))
}

/// Sentiment Analyzer: keyword-count stand-in
fn sentiment_analyzer() -> BlockType {
    const POSITIVE: &[&str] = &["good", "great", "grew", "faster", "better"];
    const NEGATIVE: &[&str] = &["bad", "poor", "worse", "slow", "loss"];

    BlockType::new(
        "sentiment-analyzer",
        "Sentiment Analyzer",
        BlockCategory::AiProcessing,
        schema(&[("text", PortType::String)]),
        schema(&[("sentiment", PortType::String)]),
    )
    .with_handler(FnHandler::shared(|inputs: BlockValues| async move {
        let text = text_input(&inputs, "text").to_lowercase();
        let score: i64 = text
            .split_whitespace()
            .map(|w| {
                if POSITIVE.contains(&w) {
                    1
                } else if NEGATIVE.contains(&w) {
                    -1
                } else {
                    0
                }
            })
            .sum();
        let sentiment = match score.cmp(&0) {
            std::cmp::Ordering::Greater => "positive",
            std::cmp::Ordering::Less => "negative",
            std::cmp::Ordering::Equal => "neutral",
        };
        Ok(BlockValues::from([(
            "sentiment".to_string(),
            json!(sentiment),
        )]))
    }))
}

/// Keyword Extractor: picks the first distinct long words
fn keyword_extractor() -> BlockType {
    BlockType::new(
        "keyword-extractor",
        "Keyword Extractor",
        BlockCategory::AiProcessing,
        schema(&[("text", PortType::String)]),
        schema(&[("keywords", PortType::StringList)]),
    )
    .with_handler(FnHandler::shared(|inputs: BlockValues| async move {
        let text = text_input(&inputs, "text").to_lowercase();
        let mut keywords: Vec<String> = Vec::new();
        for word in text.split_whitespace() {
            let word: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            if word.len() > 5 && !keywords.contains(&word) {
                keywords.push(word);
            }
            if keywords.len() == 5 {
                break;
            }
        }
        Ok(BlockValues::from([(
            "keywords".to_string(),
            json!(keywords),
        )]))
    }))
}

/// OCR Processor: cleanup passthrough
fn ocr_processor() -> BlockType {
    BlockType::new(
        "ocr-processor",
        "OCR Processor",
        BlockCategory::FileProcessing,
        schema(&[("text", PortType::String)]),
        schema(&[("text", PortType::String)]),
    )
    .with_handler(FnHandler::shared(|inputs: BlockValues| async move {
        let text = text_input(&inputs, "text").trim().to_string();
        Ok(BlockValues::from([("text".to_string(), json!(text))]))
    }))
}
