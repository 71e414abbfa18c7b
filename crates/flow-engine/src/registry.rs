//! Block type registry
//!
//! Maps block type identifiers to their port schemas and executable
//! handlers. Built-in block types are fixed at construction; custom block
//! types created at runtime live in a separate append-only collection and
//! are unioned with the built-ins for lookup.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{BlockValues, PortSchema};

/// Category for organizing block types in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    /// File and document handling blocks
    FileProcessing,
    /// Plain text transformation blocks
    TextProcessing,
    /// Model-backed analysis blocks
    AiProcessing,
    /// User-defined block types
    Custom,
}

/// Pluggable execution logic for one block type
///
/// The engine invokes the handler with the gathered input mapping and
/// awaits the output mapping. Handlers may suspend internally; the engine
/// is agnostic to what they do.
#[async_trait]
pub trait BlockHandler: Send + Sync {
    /// Compute outputs from inputs
    async fn run(&self, inputs: BlockValues) -> Result<BlockValues>;
}

/// `BlockHandler` wrapping an async closure
///
/// Lets the catalog and tests register handlers without a named type per
/// block.
pub struct FnHandler {
    f: Box<
        dyn Fn(BlockValues) -> Pin<Box<dyn std::future::Future<Output = Result<BlockValues>> + Send>>
            + Send
            + Sync,
    >,
}

impl FnHandler {
    /// Wrap an async closure as a handler
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(BlockValues) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<BlockValues>> + Send + 'static,
    {
        Self {
            f: Box::new(move |inputs| Box::pin(f(inputs))),
        }
    }

    /// Wrap an async closure as a shared handler
    pub fn shared<F, Fut>(f: F) -> Arc<dyn BlockHandler>
    where
        F: Fn(BlockValues) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<BlockValues>> + Send + 'static,
    {
        Arc::new(Self::new(f))
    }
}

#[async_trait]
impl BlockHandler for FnHandler {
    async fn run(&self, inputs: BlockValues) -> Result<BlockValues> {
        (self.f)(inputs).await
    }
}

/// A reusable node template: named, typed ports plus an optional handler
#[derive(Clone)]
pub struct BlockType {
    /// Unique type identifier (e.g., "pdf-parser")
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Category for palette grouping
    pub category: BlockCategory,
    /// Input port declarations
    pub inputs: PortSchema,
    /// Output port declarations
    pub outputs: PortSchema,
    /// Execution logic; a node whose type has no handler fails at run time
    pub handler: Option<Arc<dyn BlockHandler>>,
}

impl BlockType {
    /// Create a block type with no handler
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        category: BlockCategory,
        inputs: PortSchema,
        outputs: PortSchema,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            category,
            inputs,
            outputs,
            handler: None,
        }
    }

    /// Attach a handler
    pub fn with_handler(mut self, handler: Arc<dyn BlockHandler>) -> Self {
        self.handler = Some(handler);
        self
    }
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("category", &self.category)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("handler", &self.handler.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

/// Registry of built-in and custom block types
pub struct BlockRegistry {
    builtins: Vec<BlockType>,
    customs: Vec<BlockType>,
}

impl BlockRegistry {
    /// Create a registry with the given built-in block types
    ///
    /// Built-ins are immutable after construction.
    pub fn new(builtins: Vec<BlockType>) -> Self {
        Self {
            builtins,
            customs: Vec::new(),
        }
    }

    /// Create a registry with no built-ins
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Look up a block type by ID, searching built-ins first, then customs
    pub fn resolve(&self, id: &str) -> Option<&BlockType> {
        self.builtins
            .iter()
            .find(|b| b.id == id)
            .or_else(|| self.customs.iter().find(|b| b.id == id))
    }

    /// Check if a block type is registered
    pub fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    /// Append a custom block type
    ///
    /// Custom entries are append-only for the lifetime of the session.
    pub fn register_custom(&mut self, block: BlockType) {
        self.customs.push(block);
    }

    /// All registered block types, built-ins first
    pub fn all_block_types(&self) -> impl Iterator<Item = &BlockType> {
        self.builtins.iter().chain(self.customs.iter())
    }

    /// Number of built-in block types
    pub fn builtin_count(&self) -> usize {
        self.builtins.len()
    }

    /// Number of custom block types
    pub fn custom_count(&self) -> usize {
        self.customs.len()
    }
}
