//! Orchestration of one document's conversion: alignment verification,
//! mention tracking, and CoNLL serialization over a stream of token lines.

use crate::aligner::Aligner;
use crate::conll::Conll2012Writer;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::mention::{Mention, TokenSpan};
use crate::tracker::MentionTracker;
use anyhow::Result;
use std::fmt::Write;
use tracing::{debug, info};

/// Why the supplied tokenization could not be aligned with the document
/// text. Fatal to the current document: no marker stream is produced and
/// the caller should substitute a clearly distinguishable fallback output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentFailure {
    /// Codepoint offset at which alignment stopped
    pub position: usize,
    /// The token the tokenization expected there
    pub expected: String,
    pub kind: AlignmentFailureKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentFailureKind {
    /// Only whitespace remains before the end of the document text.
    OnlyWhitespaceRemains,
    /// The text at the aligned position does not start with the token.
    TextMismatch,
}

/// Outcome of a conversion run. Alignment failure is an expected, locally
/// handled condition, not an `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Converted,
    AlignmentFailed(AlignmentFailure),
}

/// Converts one document: aligns `token_lines` with `document_text`,
/// tracks `mentions` against the aligned token spans, and serializes the
/// result through `writer`.
///
/// Token lines are consumed in order; surrounding whitespace is trimmed,
/// and a blank line marks a sentence boundary. Diagnostics (skipped and
/// boundary-crossing mentions, residual text, alignment failures) go to
/// `sink`.
///
/// On alignment failure the partially written output must be discarded by
/// the caller; `Err` is reserved for failures of the output writer.
pub fn convert_document<'a, W, I>(
    document_text: &str,
    mentions: Vec<Mention>,
    token_lines: I,
    writer: &mut Conll2012Writer<W>,
    sink: &mut dyn DiagnosticSink,
) -> Result<PipelineOutcome>
where
    W: Write,
    I: IntoIterator<Item = &'a str>,
{
    let mut aligner = Aligner::new(document_text);
    let mut tracker = MentionTracker::new(mentions);
    let mut inside_sentence = false;
    let mut token_count = 0u64;

    writer.begin_document()?;

    for line in token_lines {
        let token_text = line.trim();
        if token_text.is_empty() {
            if inside_sentence {
                tracker.end_sentence(writer)?;
                inside_sentence = false;
            }
            writer.sentence_boundary()?;
            continue;
        }

        let span = if aligner.find_next_token() {
            let start = aligner.position();
            if aligner.remaining_text().starts_with(token_text) {
                let token_chars = token_text.chars().count();
                aligner.advance(token_chars);
                TokenSpan::new(start, start + token_chars)
            } else {
                sink.report(Diagnostic::TokenMismatch {
                    position: start,
                    expected: token_text.to_string(),
                });
                return Ok(PipelineOutcome::AlignmentFailed(AlignmentFailure {
                    position: start,
                    expected: token_text.to_string(),
                    kind: AlignmentFailureKind::TextMismatch,
                }));
            }
        } else {
            sink.report(Diagnostic::TokenNotFound {
                position: aligner.position(),
                expected: token_text.to_string(),
            });
            return Ok(PipelineOutcome::AlignmentFailed(AlignmentFailure {
                position: aligner.position(),
                expected: token_text.to_string(),
                kind: AlignmentFailureKind::OnlyWhitespaceRemains,
            }));
        };

        if inside_sentence {
            tracker.advance_token(span, writer, sink)?;
        } else {
            tracker.start_sentence(span, sink);
            inside_sentence = true;
        }

        writer.token_text(token_text)?;
        token_count += 1;
    }

    if inside_sentence {
        tracker.end_sentence(writer)?;
    }
    writer.end_document()?;

    tracker.finish(sink);

    // leftover non-whitespace text after the last token
    if aligner.find_next_token() {
        sink.report(Diagnostic::ResidualText {
            position: aligner.position(),
        });
    }

    debug!("aligned {token_count} tokens");
    info!("document converted");
    Ok(PipelineOutcome::Converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;

    fn convert(
        text: &str,
        mentions: Vec<Mention>,
        token_lines: &[&str],
        document_name: &str,
    ) -> (PipelineOutcome, String, Vec<Diagnostic>) {
        let mut buf = String::new();
        let mut writer = Conll2012Writer::new(&mut buf, document_name);
        let mut sink = CollectingSink::new();
        let outcome = convert_document(
            text,
            mentions,
            token_lines.iter().copied(),
            &mut writer,
            &mut sink,
        )
        .unwrap();
        (outcome, buf, sink.diagnostics)
    }

    #[test]
    fn converts_single_sentence_document_bit_exact() {
        let (outcome, output, diagnostics) = convert(
            "This is a documenttext.",
            vec![Mention::new(15, 20, "X"), Mention::new(4, 8, "Y")],
            &["This", "is", "a", "document", "text", "."],
            "doc",
        );
        assert_eq!(outcome, PipelineOutcome::Converted);
        assert!(diagnostics.is_empty());
        assert_eq!(
            output,
            "#begin document (doc); part 0\n\
             doc\t0\t1\tThis\t_\t_\t_\t_\t_\t_\t_\t_\n\
             doc\t0\t2\tis\t_\t_\t_\t_\t_\t_\t_\t(Y)\n\
             doc\t0\t3\ta\t_\t_\t_\t_\t_\t_\t_\t_\n\
             doc\t0\t4\tdocument\t_\t_\t_\t_\t_\t_\t_\t(X\n\
             doc\t0\t5\ttext\t_\t_\t_\t_\t_\t_\t_\tX)\n\
             doc\t0\t6\t.\t_\t_\t_\t_\t_\t_\t_\t_\n\
             #end document doc"
        );
    }

    #[test]
    fn sentence_boundaries_produce_blank_lines_and_boundary_closing() {
        let (outcome, output, diagnostics) = convert(
            "Sentence one. Sentence two! Sentence three?",
            vec![Mention::new(9, 30, "123")],
            &[
                "Sentence", "one", ".", "", "Sentence", "two", "!", "", "Sentence", "three", "?",
            ],
            "d",
        );
        assert_eq!(outcome, PipelineOutcome::Converted);
        assert_eq!(
            output,
            "#begin document (d); part 0\n\
             d\t0\t1\tSentence\t_\t_\t_\t_\t_\t_\t_\t_\n\
             d\t0\t2\tone\t_\t_\t_\t_\t_\t_\t_\t(123\n\
             d\t0\t3\t.\t_\t_\t_\t_\t_\t_\t_\t123)\n\
             \n\
             d\t0\t1\tSentence\t_\t_\t_\t_\t_\t_\t_\t(123\n\
             d\t0\t2\ttwo\t_\t_\t_\t_\t_\t_\t_\t_\n\
             d\t0\t3\t!\t_\t_\t_\t_\t_\t_\t_\t123)\n\
             \n\
             d\t0\t1\tSentence\t_\t_\t_\t_\t_\t_\t_\t(123)\n\
             d\t0\t2\tthree\t_\t_\t_\t_\t_\t_\t_\t_\n\
             d\t0\t3\t?\t_\t_\t_\t_\t_\t_\t_\t_\n\
             #end document d"
        );
        assert_eq!(
            diagnostics
                .iter()
                .filter(|d| matches!(d, Diagnostic::MentionCrossesSentenceBoundary { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn mismatching_tokenization_fails_alignment_at_offset_zero() {
        let (outcome, _, diagnostics) =
            convert("Thus spoke the narrator.", vec![], &["This"], "d");
        assert_eq!(
            outcome,
            PipelineOutcome::AlignmentFailed(AlignmentFailure {
                position: 0,
                expected: "This".to_string(),
                kind: AlignmentFailureKind::TextMismatch,
            })
        );
        assert_eq!(
            diagnostics,
            [Diagnostic::TokenMismatch {
                position: 0,
                expected: "This".to_string(),
            }]
        );
    }

    #[test]
    fn token_beyond_end_of_text_fails_alignment() {
        let (outcome, _, diagnostics) = convert("one  ", vec![], &["one", "two"], "d");
        assert_eq!(
            outcome,
            PipelineOutcome::AlignmentFailed(AlignmentFailure {
                position: 3,
                expected: "two".to_string(),
                kind: AlignmentFailureKind::OnlyWhitespaceRemains,
            })
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn uncovered_trailing_text_raises_residual_diagnostic() {
        let (outcome, output, diagnostics) =
            convert("one two three", vec![], &["one", "two"], "d");
        assert_eq!(outcome, PipelineOutcome::Converted);
        assert_eq!(diagnostics, [Diagnostic::ResidualText { position: 8 }]);
        assert!(output.contains("d\t0\t2\ttwo"));
    }

    #[test]
    fn mention_in_whitespace_gap_never_reaches_the_output() {
        let (outcome, output, diagnostics) = convert(
            "one      two",
            vec![Mention::new(4, 7, "Z")],
            &["one", "two"],
            "d",
        );
        assert_eq!(outcome, PipelineOutcome::Converted);
        assert_eq!(
            diagnostics,
            [Diagnostic::MentionSkipped {
                mention: Mention::new(4, 7, "Z"),
            }]
        );
        assert!(!output.contains('Z'));
    }

    #[test]
    fn tokens_with_surrounding_whitespace_are_trimmed() {
        let (outcome, output, _) = convert("a b", vec![], &["  a\t", " b "], "d");
        assert_eq!(outcome, PipelineOutcome::Converted);
        assert!(output.contains("d\t0\t1\ta"));
        assert!(output.contains("d\t0\t2\tb"));
    }

    #[test]
    fn empty_token_stream_still_brackets_the_document() {
        let (outcome, output, diagnostics) = convert("", vec![], &[], "d");
        assert_eq!(outcome, PipelineOutcome::Converted);
        assert_eq!(output, "#begin document (d); part 0\n#end document d");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unicode_text_aligns_by_codepoints() {
        // mention covers the second token only
        let (outcome, output, diagnostics) = convert(
            "f\u{FC}r\u{A0}\u{4E16}\u{754C}",
            vec![Mention::new(4, 6, "W")],
            &["f\u{FC}r", "\u{4E16}\u{754C}"],
            "d",
        );
        assert_eq!(outcome, PipelineOutcome::Converted);
        assert!(diagnostics.is_empty());
        assert!(output.contains("\t\u{4E16}\u{754C}\t_\t_\t_\t_\t_\t_\t_\t(W)"));
    }
}
