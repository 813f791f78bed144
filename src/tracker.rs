//! Tracking of mention spans against a left-to-right stream of token spans.
//!
//! Given the full set of mentions up front and the token spans of a
//! document in order, grouped into sentences, a [`MentionTracker`] decides
//! for each token which mentions open there, close there, or both, and
//! drives a [`MarkerConsumer`] with the result. Mentions are force-closed
//! at sentence boundaries and re-opened in the next sentence when they
//! extend across the boundary.
//!
//! Whether a mention ends with a token or extends further can only be
//! decided once the *next* token's span is known, so each call finalizes
//! the markers of the *previous* token. For each sentence the caller
//! invokes, in order:
//!
//! 1. [`start_sentence`](MentionTracker::start_sentence) with the span of
//!    the sentence's first token;
//! 2. [`advance_token`](MentionTracker::advance_token) with the span of
//!    every subsequent token, carrying the consumer for the token before;
//! 3. [`end_sentence`](MentionTracker::end_sentence), which finalizes the
//!    sentence's last token.
//!
//! After the last sentence, [`finish`](MentionTracker::finish) reports the
//! mentions the sweep never reached.

use crate::consumer::MarkerConsumer;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::mention::{Mention, TokenSpan};
use std::collections::VecDeque;
use tracing::debug;

/// Single-pass interval sweep with one token of lookahead.
///
/// Mentions are sorted ascending by `begin` once; a cursor walks that
/// order and is never rewound. The open set is kept in discovery order,
/// with a partition counter separating mentions that opened at the
/// current token from ones carried over from earlier tokens.
#[derive(Debug)]
pub struct MentionTracker {
    /// All mentions, sorted ascending by `begin`; ties keep input order.
    mentions: Vec<Mention>,
    /// Sweep cursor: index of the first mention not yet examined.
    next: usize,
    /// Indices into `mentions` of the currently open mentions, in
    /// discovery order. The first `newly_opened` entries opened at the
    /// token currently being looked ahead from.
    open: VecDeque<usize>,
    newly_opened: usize,
}

impl MentionTracker {
    /// Takes ownership of the mention collection; it is sorted in place by
    /// `begin` and must not be observed through an external order
    /// dependency afterwards.
    pub fn new(mut mentions: Vec<Mention>) -> Self {
        mentions.sort_by_key(|m| m.begin);
        debug!("tracking {} mentions", mentions.len());
        Self {
            mentions,
            next: 0,
            open: VecDeque::new(),
            newly_opened: 0,
        }
    }

    /// To be called with the span of the first token of each sentence.
    ///
    /// Mentions left open when the previous sentence ended are re-opened
    /// here if they also hit this token, raising a crossing diagnostic;
    /// the rest are discarded (their close was already emitted by
    /// [`end_sentence`](MentionTracker::end_sentence)).
    pub fn start_sentence(&mut self, token: TokenSpan, sink: &mut dyn DiagnosticSink) {
        let carried = self.open.len();
        for _ in 0..carried {
            if let Some(idx) = self.open.pop_front() {
                if self.ends_late_enough(idx, token) {
                    sink.report(Diagnostic::MentionCrossesSentenceBoundary {
                        mention: self.mentions[idx].clone(),
                    });
                    self.open.push_back(idx);
                }
            }
        }
        self.load_mentions_opened_at(token, sink);
        // every open mention opens (again) at this token
        self.newly_opened = self.open.len();
    }

    /// To be called, in order, with the span of every token of a sentence
    /// except the first. Finalizes the markers of the *previous* token
    /// through `consumer`, using this token's span as lookahead: a mention
    /// remains open iff it ends past this token's start. Consumer errors
    /// are relayed untouched.
    pub fn advance_token<C: MarkerConsumer>(
        &mut self,
        token: TokenSpan,
        consumer: &mut C,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), C::Error> {
        let remaining = self.open.len();
        self.load_mentions_opened_at(token, sink);
        let newly_loaded = self.open.len() - remaining;

        consumer.begin_markers()?;

        // mentions that opened at the previous token
        for _ in 0..self.newly_opened {
            if let Some(idx) = self.open.pop_front() {
                if self.ends_late_enough(idx, token) {
                    consumer.open_mention(&self.mentions[idx].entity_id)?;
                    self.open.push_back(idx);
                } else {
                    consumer.open_and_close_mention(&self.mentions[idx].entity_id)?;
                }
            }
        }

        // mentions that were already open before the previous token
        for _ in self.newly_opened..remaining {
            if let Some(idx) = self.open.pop_front() {
                if self.ends_late_enough(idx, token) {
                    self.open.push_back(idx);
                } else {
                    consumer.close_mention(&self.mentions[idx].entity_id)?;
                }
            }
        }

        consumer.end_markers()?;

        self.newly_opened = newly_loaded;
        Ok(())
    }

    /// To be called at the end of each sentence. Finalizes the markers of
    /// the sentence's last token, closing every still-open mention
    /// unconditionally. Mentions extending past the boundary stay in the
    /// open set so the next [`start_sentence`](MentionTracker::start_sentence)
    /// can re-open them.
    pub fn end_sentence<C: MarkerConsumer>(&mut self, consumer: &mut C) -> Result<(), C::Error> {
        consumer.begin_markers()?;
        for (i, &idx) in self.open.iter().enumerate() {
            if i < self.newly_opened {
                consumer.open_and_close_mention(&self.mentions[idx].entity_id)?;
            } else {
                consumer.close_mention(&self.mentions[idx].entity_id)?;
            }
        }
        consumer.end_markers()
    }

    /// To be called once after the last sentence. Mentions the sweep never
    /// loaded start at or beyond the end of the last token, so they
    /// overlap no token at all; each is reported as skipped.
    pub fn finish(&mut self, sink: &mut dyn DiagnosticSink) {
        while self.next < self.mentions.len() {
            sink.report(Diagnostic::MentionSkipped {
                mention: self.mentions[self.next].clone(),
            });
            self.next += 1;
        }
        self.open.clear();
        self.newly_opened = 0;
    }

    /// Advances the sweep cursor over every mention starting early enough
    /// to hit this token (`begin < token.end`). Mentions that also end
    /// late enough to hit it become open; the rest lie entirely in an
    /// inter-token gap and are reported as skipped.
    fn load_mentions_opened_at(&mut self, token: TokenSpan, sink: &mut dyn DiagnosticSink) {
        while self.next < self.mentions.len() && self.mentions[self.next].begin < token.end {
            if self.mentions[self.next].end > token.start {
                self.open.push_back(self.next);
            } else {
                sink.report(Diagnostic::MentionSkipped {
                    mention: self.mentions[self.next].clone(),
                });
            }
            self.next += 1;
        }
    }

    /// Partial overlap check: does the mention end late enough to hit this
    /// token? For mentions already known to start early enough, this is
    /// the whole overlap test; testing the end alone against the lookahead
    /// token's start is what keeps the sweep single-pass.
    fn ends_late_enough(&self, idx: usize, token: TokenSpan) -> bool {
        self.mentions[idx].end > token.start
    }
}
