use std::{iter::Peekable, str::CharIndices};

use tracing::trace;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Result, StackGolfError};

/// Scanner state: plain text, or inside a (possibly nested) delimited span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Normal,
    InQuote,
    InBrackets,
    InBraces,
}

impl ScanState {
    fn opened_by(ch: char) -> Option<Self> {
        match ch {
            '"' => Some(ScanState::InQuote),
            '[' => Some(ScanState::InBrackets),
            '{' => Some(ScanState::InBraces),
            _ => None,
        }
    }

    fn open(self) -> char {
        match self {
            ScanState::InQuote => '"',
            ScanState::InBrackets => '[',
            ScanState::InBraces => '{',
            ScanState::Normal => '\0',
        }
    }

    fn close(self) -> char {
        match self {
            ScanState::InQuote => '"',
            ScanState::InBrackets => ']',
            ScanState::InBraces => '}',
            ScanState::Normal => '\0',
        }
    }
}

/// A maximal run of source text to be classified and executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    /// Byte offset of the word within the scanned fragment.
    pub offset: usize,
}

/// Splits a fragment into words on the fly.
///
/// Outside a span, whitespace separates words. `"`, `[` and `{` open a span
/// that runs to the matching close character; only the span's own delimiter
/// pair is counted, so `[1 [2] 3]` nests while `[ "]" ]` closes early. A
/// span always forms a word of its own: text directly before an opening
/// delimiter is emitted first, and the word ends when the span closes.
pub struct Tokenizer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    state: ScanState,
    depth: usize,
    start: Option<usize>,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            state: ScanState::Normal,
            depth: 0,
            start: None,
            finished: false,
        }
    }

    fn take_word(&mut self, end: usize) -> Option<Word<'a>> {
        self.start.take().map(|start| Word {
            text: &self.source[start..end],
            offset: start,
        })
    }

    fn unbalanced(&self) -> StackGolfError {
        let start = self.start.unwrap_or_default();
        StackGolfError::from(
            Diagnostic::new(
                DiagnosticKind::UnbalancedSpan,
                format!(
                    "`{}` opened at offset {start} is never closed",
                    self.state.open()
                ),
            )
            .with_note(format!("unterminated text: {}", &self.source[start..])),
        )
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Word<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let Some(&(idx, ch)) = self.chars.peek() else {
                self.finished = true;
                if self.state != ScanState::Normal {
                    return Some(Err(self.unbalanced()));
                }
                return self.take_word(self.source.len()).map(Ok);
            };

            if self.state == ScanState::Normal {
                if ch.is_whitespace() {
                    self.chars.next();
                    if let Some(word) = self.take_word(idx) {
                        return Some(Ok(word));
                    }
                } else if let Some(state) = ScanState::opened_by(ch) {
                    // Emit pending text first; the delimiter is seen again next call.
                    if let Some(word) = self.take_word(idx) {
                        return Some(Ok(word));
                    }
                    self.chars.next();
                    trace!(?state, offset = idx, "entering span");
                    self.state = state;
                    self.depth = 1;
                    self.start = Some(idx);
                } else {
                    self.chars.next();
                    self.start.get_or_insert(idx);
                }
                continue;
            }

            self.chars.next();
            if ch == self.state.close() {
                self.depth -= 1;
                if self.depth == 0 {
                    trace!(state = ?self.state, offset = idx, "leaving span");
                    self.state = ScanState::Normal;
                    if let Some(word) = self.take_word(idx + ch.len_utf8()) {
                        return Some(Ok(word));
                    }
                }
            } else if ch == self.state.open() {
                self.depth += 1;
            }
        }
    }
}

/// Collects every word of `source`, stopping at the first scanning error.
pub fn tokenize(source: &str) -> Result<Vec<Word<'_>>> {
    Tokenizer::new(source).collect()
}
