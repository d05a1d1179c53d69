//! Boundary classifier for SQL scripts.
//!
//! A tiny deterministic automaton that is fed one character at a time and
//! reports the lexical context the scanner is in afterwards. It knows exactly
//! four constructs: `--` line comments, `/* */` block comments, `'...'` string
//! literals and `"..."` quoted identifiers. Everything else is plain code, and
//! a `;` in plain code reports [`LexState::Final`].
//!
//! Notes:
//! - A lone `/` or `-` only *might* open a comment. If the next character does
//!   not confirm it, the state falls back to `Start` and that next character is
//!   consumed as the trigger of the fallback, not re-examined. `-;` therefore
//!   does not end a statement, and neither does `/'` open a string literal.
//! - Block comments do not nest: `/* /* */` is closed by the first `*/`.
//! - A `*` that fails to close a comment goes back inside it, so a second `*`
//!   cannot close either: `/***/` is still an open comment.
//! - Doubled quotes (`'it''s'`) work out naturally: the literal closes and
//!   immediately reopens.

/// Lexical context of the scanner at a given position of the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::Display)]
pub enum LexState {
    /// Plain code, outside any literal or comment.
    #[default]
    Start,
    /// Seen `/`, waiting for `*`.
    MaybeBlockComment,
    InsideBlockComment,
    /// Seen `*` inside a block comment, waiting for `/`.
    MaybeEndOfBlockComment,
    /// Seen `-`, waiting for a second `-`.
    MaybeLineComment,
    InsideLineComment,
    StringLiteral,
    QuotedName,
    /// A statement delimiter was reached. Signal only: the driver must reset
    /// to `Start` before feeding more input.
    Final,
}

impl LexState {
    /// Transition on a single input character.
    ///
    /// Total for every state except [`LexState::Final`], which has no outgoing
    /// transitions. Calling this on `Final` is a driver bug and panics.
    pub fn next(self, input: char) -> Self {
        use LexState::*;
        match self {
            Start => match input {
                '/' => MaybeBlockComment,
                '-' => MaybeLineComment,
                '\'' => StringLiteral,
                '"' => QuotedName,
                ';' => Final,
                _ => Start,
            },
            MaybeBlockComment => match input {
                '*' => InsideBlockComment,
                _ => Start,
            },
            InsideBlockComment => match input {
                '*' => MaybeEndOfBlockComment,
                _ => InsideBlockComment,
            },
            MaybeEndOfBlockComment => match input {
                '/' => Start,
                _ => InsideBlockComment,
            },
            MaybeLineComment => match input {
                '-' => InsideLineComment,
                _ => Start,
            },
            InsideLineComment => match input {
                '\n' | '\r' => Start,
                _ => InsideLineComment,
            },
            StringLiteral => match input {
                '\'' => Start,
                _ => StringLiteral,
            },
            QuotedName => match input {
                '"' => Start,
                _ => QuotedName,
            },
            Final => panic!("no transition out of {self}; reset to Start before scanning on"),
        }
    }

    /// True once a statement delimiter has been consumed.
    pub const fn is_final(self) -> bool {
        matches!(self, LexState::Final)
    }

    /// True while inside a comment (or its closing candidate).
    pub const fn in_comment(self) -> bool {
        matches!(
            self,
            LexState::InsideBlockComment
                | LexState::MaybeEndOfBlockComment
                | LexState::InsideLineComment
        )
    }
}

/// Free-function form of [`LexState::next`].
pub fn next_state(current: LexState, input: char) -> LexState {
    current.next(input)
}
