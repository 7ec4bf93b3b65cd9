//! Source mapping: generated item → declaring source location.
//!
//! Each entry maps a synthesized item (accessor, wrapper or entry point)
//! back to the declaration that caused it, so tooling can point at the
//! `component!` or `#[embeddable_as]` line behind generated code.

use graft_types::Span;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceMap {
    pub entries: Vec<SourceMapEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMapEntry {
    /// Generated item name, e.g. `HasComponentImpl_ownable` or `Ownable`.
    pub item: String,
    pub kind: ItemKind,
    /// File holding the originating declaration.
    pub file: String,
    /// Span of the originating declaration.
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Accessor,
    Wrapper,
    EntryPoint,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl Into<String>, kind: ItemKind, file: impl Into<String>, span: Span) {
        self.entries.push(SourceMapEntry {
            item: item.into(),
            kind,
            file: file.into(),
            span,
        });
    }

    pub fn find(&self, item: &str, kind: ItemKind) -> Option<&SourceMapEntry> {
        self.entries.iter().find(|e| e.item == item && e.kind == kind)
    }

    pub fn to_json(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }

    pub fn from_json(data: &[u8]) -> Option<Self> {
        serde_json::from_slice(data).ok()
    }
}
