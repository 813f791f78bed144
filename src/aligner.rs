//! Whitespace-skipping alignment of a tokenization with a raw text.
//!
//! An [`Aligner`] is initialized with the text a tokenization is to be
//! aligned with, and successively delivers the codepoint offsets at which
//! the tokens are found. It performs no matching itself: verifying that the
//! located offset actually starts with the expected token text is the
//! caller's job, so that mismatches can be reported with caller context.
//!
//! ```
//! use conll_marks::Aligner;
//!
//! let text = "one  two";
//! let mut aligner = Aligner::new(text);
//! for token in ["one", "two"] {
//!     assert!(aligner.find_next_token());
//!     assert!(aligner.remaining_text().starts_with(token));
//!     aligner.advance(token.chars().count());
//! }
//! assert!(!aligner.find_next_token());
//! ```

/// Whitespace as far as alignment is concerned: U+0009..U+000D, the four
/// ASCII information separators U+001C..U+001F, and every codepoint in the
/// Unicode general category Z. This differs from `char::is_whitespace`
/// (the White_Space property) in exactly two points: the information
/// separators are in, U+0085 NEL is out.
pub fn is_alignment_whitespace(c: char) -> bool {
    matches!(c, '\u{1C}'..='\u{1F}') || (c.is_whitespace() && c != '\u{85}')
}

/// Incrementally locates the next non-whitespace run in a fixed text.
///
/// Positions are reported as codepoint offsets, matching the offset space
/// of mention annotations; the byte-level view needed for prefix checks is
/// available through [`Aligner::remaining_text`].
#[derive(Debug)]
pub struct Aligner<'a> {
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
}

impl<'a> Aligner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            byte_pos: 0,
            char_pos: 0,
        }
    }

    /// Skips a run of whitespace (possibly empty) starting at the current
    /// position. Returns `true` if a non-whitespace character remains, in
    /// which case [`Aligner::position`] afterwards reports its offset.
    /// Returns `false` if only whitespace (or nothing) remains before the
    /// end of the text, leaving the position unchanged.
    pub fn find_next_token(&mut self) -> bool {
        let mut byte_pos = self.byte_pos;
        let mut char_pos = self.char_pos;
        for c in self.text[self.byte_pos..].chars() {
            if !is_alignment_whitespace(c) {
                self.byte_pos = byte_pos;
                self.char_pos = char_pos;
                return true;
            }
            byte_pos += c.len_utf8();
            char_pos += 1;
        }
        false
    }

    /// Codepoint offset established by the last successful
    /// [`Aligner::find_next_token`], or the initial position if none has
    /// succeeded yet.
    pub fn position(&self) -> usize {
        self.char_pos
    }

    /// The not-yet-consumed tail of the text, starting at the current
    /// position. Callers use this to verify that the expected token text
    /// actually occurs here before calling [`Aligner::advance`].
    pub fn remaining_text(&self) -> &'a str {
        &self.text[self.byte_pos..]
    }

    /// Moves the position forward by `n_chars` codepoints. The caller must
    /// have verified that the text at the current position begins with the
    /// token being passed over; advancing past the end of the text stops
    /// at the end.
    pub fn advance(&mut self, n_chars: usize) {
        let mut chars = self.text[self.byte_pos..].chars();
        for _ in 0..n_chars {
            match chars.next() {
                Some(c) => {
                    self.byte_pos += c.len_utf8();
                    self.char_pos += 1;
                }
                None => break,
            }
        }
    }
}
