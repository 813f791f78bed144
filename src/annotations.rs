//! The annotation-interchange boundary: document text, mentions, and
//! entity metadata as one JSON document.
//!
//! ```json
//! {
//!   "text": "This is a documenttext.",
//!   "mentions": [ { "begin": 15, "end": 20, "entity": "21508" } ],
//!   "entities": [ { "id": "21508", "label": "PER" },
//!                 { "id": "g1", "label": "GROUP", "members": ["21508"] } ]
//! }
//! ```
//!
//! Offsets are codepoint indices into `text`, begin inclusive, end
//! exclusive. No validation beyond deserialization happens here: entity
//! ids are opaque, and degenerate or out-of-range mention spans are the
//! tracker's and report's concern.

use crate::mention::{Entity, Mention};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Everything the annotation source supplies for one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentAnnotations {
    pub text: String,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl DocumentAnnotations {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("failed to parse annotations JSON")
    }
}
