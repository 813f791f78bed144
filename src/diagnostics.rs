//! Diagnostic occasions raised during alignment and mention tracking.
//!
//! The core components never print or abort themselves; they hand each
//! occasion to an injected [`DiagnosticSink`] and carry on (or, for
//! alignment failures, let the caller stop). Wording and destination are
//! the sink's concern: the CLI installs [`TracingSink`], tests usually use
//! [`CollectingSink`].

use crate::mention::Mention;
use tracing::{error, warn};

/// One reportable occasion. Positions are codepoint offsets into the
/// document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A mention overlaps no token in the supplied tokenization and was
    /// excluded from the output.
    MentionSkipped { mention: Mention },
    /// A mention extends past the end of a sentence; it is force-closed at
    /// the sentence's last token and re-opened in the next sentence.
    MentionCrossesSentenceBoundary { mention: Mention },
    /// Non-whitespace document text remains after the last token.
    ResidualText { position: usize },
    /// An expected token could not be aligned: only whitespace remains
    /// before the end of the document text.
    TokenNotFound { position: usize, expected: String },
    /// The document text at the aligned position does not start with the
    /// expected token.
    TokenMismatch { position: usize, expected: String },
}

impl Diagnostic {
    /// Alignment failures are fatal to the current document; everything
    /// else is a warning.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Diagnostic::TokenNotFound { .. } | Diagnostic::TokenMismatch { .. }
        )
    }
}

/// Side-channel observer for diagnostic occasions.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Renders diagnostics as human-readable messages against the document
/// text, with positions given as codepoint index plus 1-based line/column
/// and a bounded context window around mismatches.
pub struct DiagnosticFormatter<'a> {
    text: &'a str,
}

const CONTEXT_CODEPOINTS: usize = 30;

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(document_text: &'a str) -> Self {
        Self {
            text: document_text,
        }
    }

    pub fn format(&self, diagnostic: &Diagnostic) -> String {
        match diagnostic {
            Diagnostic::MentionSkipped { mention } => format!(
                "mention of entity {} {} does not hit any token in the provided tokenization",
                mention.entity_id,
                self.describe_range(mention.begin, mention.end),
            ),
            Diagnostic::MentionCrossesSentenceBoundary { mention } => format!(
                "mention of entity {} {} crosses a sentence boundary in the provided tokenization",
                mention.entity_id,
                self.describe_range(mention.begin, mention.end),
            ),
            Diagnostic::ResidualText { position } => format!(
                "the remainder of the document text starting at {} is not covered by the provided tokenization",
                self.describe_position(*position),
            ),
            Diagnostic::TokenNotFound { position, expected } => format!(
                "the provided tokenization does not match the document text: \
                 expecting a token, but there is only whitespace until the end of the text; \
                 location: {}; expected token: {expected}",
                self.describe_position(*position),
            ),
            Diagnostic::TokenMismatch { position, expected } => {
                let end = position + expected.chars().count();
                format!(
                    "the provided tokenization does not match the document text: \
                     text and expected token deviate; location: {}; \
                     expected token: {expected}; there instead: {}; more context: {}",
                    self.describe_position(*position),
                    self.slice(*position, end),
                    self.slice(
                        position.saturating_sub(CONTEXT_CODEPOINTS),
                        end + CONTEXT_CODEPOINTS
                    ),
                )
            }
        }
    }

    fn describe_position(&self, pos: usize) -> String {
        let (line, col) = self.line_col(pos);
        format!("index {pos} (l. {line}, c. {col})")
    }

    fn describe_range(&self, from: usize, to: usize) -> String {
        format!(
            "from {} to {}",
            self.describe_position(from),
            self.describe_position(to)
        )
    }

    /// 1-based line and column of a codepoint offset. A line break is
    /// `\r\n`, `\n` or `\r`; a break only starts a new line for positions
    /// at or past its end, so a position inside `\r\n` still counts on the
    /// old line.
    fn line_col(&self, pos: usize) -> (usize, usize) {
        let mut line = 1;
        let mut line_start = 0;
        let mut i = 0;
        let mut chars = self.text.chars().peekable();
        while i < pos {
            let Some(c) = chars.next() else { break };
            i += 1;
            match c {
                '\n' => {
                    line += 1;
                    line_start = i;
                }
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        if i < pos {
                            chars.next();
                            i += 1;
                            line += 1;
                            line_start = i;
                        }
                    } else {
                        line += 1;
                        line_start = i;
                    }
                }
                _ => {}
            }
        }
        (line, pos - line_start + 1)
    }

    /// Substring by codepoint offsets, clamped to the text.
    fn slice(&self, from: usize, to: usize) -> &'a str {
        let start = self.byte_offset(from);
        let end = self.byte_offset(to.max(from));
        &self.text[start..end]
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }
}

/// Sink for the CLI: formats against the document text and logs warnings
/// via `tracing`, alignment failures at error level.
pub struct TracingSink<'a> {
    formatter: DiagnosticFormatter<'a>,
}

impl<'a> TracingSink<'a> {
    pub fn new(document_text: &'a str) -> Self {
        Self {
            formatter: DiagnosticFormatter::new(document_text),
        }
    }
}

impl DiagnosticSink for TracingSink<'_> {
    fn report(&mut self, diagnostic: Diagnostic) {
        let message = self.formatter.format(&diagnostic);
        if diagnostic.is_fatal() {
            error!("{message}");
        } else {
            warn!("{message}");
        }
    }
}

/// Sink that stores every diagnostic for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
