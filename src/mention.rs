use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An entity reference ("mention"): a half-open span of document text,
/// in codepoint offsets, labeled with the id of the entity it refers to.
///
/// `begin < end` is expected but not enforced; degenerate spans are
/// tolerated by the tracker and end up reported as skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// Inclusive codepoint offset where the span starts
    pub begin: usize,
    /// Exclusive codepoint offset where the span ends
    pub end: usize,
    /// Opaque id of the entity being referred to
    #[serde(rename = "entity")]
    pub entity_id: String,
}

impl Mention {
    pub fn new(begin: usize, end: usize, entity_id: impl Into<String>) -> Self {
        Self {
            begin,
            end,
            entity_id: entity_id.into(),
        }
    }
}

/// An entity or entity group from the annotation source.
///
/// The tracking core never looks inside; entities only feed the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub label: String,
    /// Ids of entities subsumed under this one as a group, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<BTreeSet<String>>,
}

/// Location of one token in the document text, in codepoint offsets.
/// Produced by the alignment step, consumed immediately by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan {
    /// Inclusive codepoint offset of the token's first character
    pub start: usize,
    /// Exclusive codepoint offset one past the token's last character
    pub end: usize,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}
