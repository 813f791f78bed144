//! Reference span-marker encoder: CoNLL-2012 `*_conll` text layout.
//!
//! One line per token with tab-separated columns: document id, part
//! number (always `0`), word number (1-based, reset per sentence), the
//! word itself, seven filler columns (`_`), and the coreference column.
//! Sentence boundaries are blank lines; the whole document is bracketed
//! by `#begin document (<name>); part 0` and `#end document <name>`
//! comment lines.
//!
//! In the coreference column the markers of a token are pipe-separated:
//! `(123` for a mention of entity 123 opening here, `123)` for one
//! closing here, `(123)` for one covering only this token. A token
//! without markers gets a single underscore.

use crate::consumer::MarkerConsumer;
use std::fmt::{self, Write};

/// Writes tokens plus marker batches to any [`fmt::Write`] destination.
///
/// The running token index is purely a formatting concern; it carries no
/// tracking decisions.
#[derive(Debug)]
pub struct Conll2012Writer<W> {
    out: W,
    document_name: String,
    token_index: u64,
    first_marker: bool,
}

impl<W: Write> Conll2012Writer<W> {
    pub fn new(out: W, document_name: impl Into<String>) -> Self {
        Self {
            out,
            document_name: document_name.into(),
            token_index: 0,
            first_marker: true,
        }
    }

    /// Writes the opening comment line.
    pub fn begin_document(&mut self) -> fmt::Result {
        self.token_index = 0;
        write!(self.out, "#begin document ({}); part 0", self.document_name)
    }

    /// Starts the line for the next token; all columns up to and including
    /// the tab before the coreference column are written. The coreference
    /// column itself is filled by the [`MarkerConsumer`] calls that follow.
    pub fn token_text(&mut self, token_text: &str) -> fmt::Result {
        self.token_index += 1;
        write!(
            self.out,
            "\n{}\t0\t{}\t{}\t_\t_\t_\t_\t_\t_\t_\t",
            self.document_name, self.token_index, token_text
        )
    }

    /// Writes a sentence boundary (blank line) and restarts token
    /// numbering.
    pub fn sentence_boundary(&mut self) -> fmt::Result {
        self.token_index = 0;
        self.out.write_char('\n')
    }

    /// Writes the closing comment line.
    pub fn end_document(&mut self) -> fmt::Result {
        write!(self.out, "\n#end document {}", self.document_name)
    }

    /// Releases the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn marker(&mut self, entity_id: &str, opens_here: bool, closes_here: bool) -> fmt::Result {
        if self.first_marker {
            self.first_marker = false;
        } else {
            self.out.write_char('|')?;
        }
        if opens_here {
            self.out.write_char('(')?;
        }
        self.out.write_str(entity_id)?;
        if closes_here {
            self.out.write_char(')')?;
        }
        Ok(())
    }
}

impl<W: Write> MarkerConsumer for Conll2012Writer<W> {
    type Error = fmt::Error;

    fn begin_markers(&mut self) -> fmt::Result {
        self.first_marker = true;
        Ok(())
    }

    fn open_mention(&mut self, entity_id: &str) -> fmt::Result {
        self.marker(entity_id, true, false)
    }

    fn close_mention(&mut self, entity_id: &str) -> fmt::Result {
        self.marker(entity_id, false, true)
    }

    fn open_and_close_mention(&mut self, entity_id: &str) -> fmt::Result {
        self.marker(entity_id, true, true)
    }

    fn end_markers(&mut self) -> fmt::Result {
        if self.first_marker {
            self.out.write_char('_')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_tokens_markers_and_document_brackets() {
        let mut buf = String::new();
        let mut writer = Conll2012Writer::new(&mut buf, "story");

        writer.begin_document().unwrap();

        writer.token_text("Anna").unwrap();
        writer.begin_markers().unwrap();
        writer.open_and_close_mention("7").unwrap();
        writer.end_markers().unwrap();

        writer.token_text("slept").unwrap();
        writer.begin_markers().unwrap();
        writer.end_markers().unwrap();

        writer.end_document().unwrap();

        assert_eq!(
            buf,
            "#begin document (story); part 0\n\
             story\t0\t1\tAnna\t_\t_\t_\t_\t_\t_\t_\t(7)\n\
             story\t0\t2\tslept\t_\t_\t_\t_\t_\t_\t_\t_\n\
             #end document story"
        );
    }

    #[test]
    fn markers_are_pipe_separated() {
        let mut buf = String::new();
        let mut writer = Conll2012Writer::new(&mut buf, "d");
        writer.token_text("w").unwrap();
        writer.begin_markers().unwrap();
        writer.open_mention("21508").unwrap();
        writer.open_and_close_mention("21557").unwrap();
        writer.close_mention("3").unwrap();
        writer.end_markers().unwrap();
        assert!(buf.ends_with("\t(21508|(21557)|3)"));
    }

    #[test]
    fn token_numbering_restarts_after_sentence_boundary() {
        let mut buf = String::new();
        let mut writer = Conll2012Writer::new(&mut buf, "d");
        writer.token_text("one").unwrap();
        writer.token_text("two").unwrap();
        writer.sentence_boundary().unwrap();
        writer.token_text("three").unwrap();
        assert!(buf.contains("d\t0\t2\ttwo"));
        assert!(buf.contains("d\t0\t1\tthree"));
    }

    #[test]
    fn empty_batch_renders_underscore_placeholder() {
        let mut buf = String::new();
        let mut writer = Conll2012Writer::new(&mut buf, "d");
        writer.token_text("w").unwrap();
        writer.begin_markers().unwrap();
        writer.end_markers().unwrap();
        assert!(buf.ends_with("\t_"));
    }
}
