//! Undo/redo history using compressed snapshots
//!
//! Every committing store mutation pushes the pre-mutation graph onto the
//! `past` stack and clears `future`; undo/redo shuttle states between the
//! two stacks. Snapshots are zstd-compressed JSON, so a stored state is
//! always a structural copy that later mutation of the live graph cannot
//! touch.

use std::collections::VecDeque;

use crate::error::{EngineError, Result};
use crate::types::WorkflowGraph;

/// Compression level for snapshot encoding
const SNAPSHOT_ZSTD_LEVEL: i32 = 3;

/// Two-stack undo/redo history
///
/// `past` holds prior states oldest-first; `future` holds undone states
/// most-recently-undone-first.
#[derive(Default)]
pub struct History {
    past: Vec<Vec<u8>>,
    future: VecDeque<Vec<u8>>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pre-mutation snapshot and clear the redo stack
    pub fn record(&mut self, graph: &WorkflowGraph) -> Result<()> {
        let snapshot = encode(graph)?;
        self.past.push(snapshot);
        self.future.clear();
        Ok(())
    }

    /// Step back one state
    ///
    /// Pops the most recent past snapshot and returns it; `current` (the
    /// live state being left) moves to the front of the redo stack.
    /// Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, current: &WorkflowGraph) -> Option<Result<WorkflowGraph>> {
        let snapshot = self.past.pop()?;
        match encode(current) {
            Ok(bytes) => {
                self.future.push_front(bytes);
                Some(decode(&snapshot))
            }
            Err(e) => {
                // Keep the stacks consistent if the live state won't encode
                self.past.push(snapshot);
                Some(Err(e))
            }
        }
    }

    /// Step forward one state
    ///
    /// Pops the front of the redo stack and returns it; `current` moves to
    /// the end of the undo stack. Returns `None` when there is nothing to
    /// redo.
    pub fn redo(&mut self, current: &WorkflowGraph) -> Option<Result<WorkflowGraph>> {
        let snapshot = self.future.pop_front()?;
        match encode(current) {
            Ok(bytes) => {
                self.past.push(bytes);
                Some(decode(&snapshot))
            }
            Err(e) => {
                self.future.push_front(snapshot);
                Some(Err(e))
            }
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undoable states
    pub fn len(&self) -> usize {
        self.past.len()
    }

    /// Number of redoable states
    pub fn future_len(&self) -> usize {
        self.future.len()
    }

    /// Check if there is no undoable state
    pub fn is_empty(&self) -> bool {
        self.past.is_empty()
    }

    /// Drop all stored states
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Total compressed size of all stored snapshots
    pub fn compressed_size(&self) -> usize {
        self.past.iter().chain(self.future.iter()).map(|s| s.len()).sum()
    }
}

fn encode(graph: &WorkflowGraph) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(graph)?;
    zstd::encode_all(&json[..], SNAPSHOT_ZSTD_LEVEL)
        .map_err(|e| EngineError::Compression(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<WorkflowGraph> {
    let json = zstd::decode_all(bytes).map_err(|e| EngineError::Compression(e.to_string()))?;
    let graph: WorkflowGraph = serde_json::from_slice(&json)?;
    Ok(graph)
}
