//! Lenient, comment- and quote-aware SQL statement splitting.
//!
//! This module turns a free-form script into the ordered list of statements it
//! contains without parsing SQL. The only thing it understands is where a `;`
//! actually ends a statement, as opposed to a `;` inside a string literal, a
//! quoted identifier or a comment.
//!
//! Modules:
//! - `lex_state` : `LexState`, the per-character boundary classifier.
//! - `statement` : `Statement`, an extracted statement plus its source span.
//! - `extractor` : Drives the classifier over a buffer (`extract`, `segments`,
//!   `statement_at`).
//!
//! Design Principles:
//! 1. Every input is valid. Unterminated literals and comments are tolerated,
//!    the rest of the buffer is simply flushed as the last statement.
//! 2. Statements come out strictly in source order; callers execute them in
//!    that order.
//! 3. No grammar, no dialects: only `'...'`, `"..."`, `--` and `/* */`.
//!
//! Example:
//! ```rust,ignore
//! use sqlscript::sql::prelude::*;
//!
//! let stmts = extract("SELECT ';'; -- done\nSELECT 2");
//! assert_eq!(stmts, ["SELECT ';'", "SELECT 2"]);
//! ```

pub mod extractor;
pub mod lex_state;
pub mod statement;

pub use extractor::{Segment, Segments, extract, segments, statement_at};
pub use lex_state::{LexState, next_state};
pub use statement::Statement;

/// Convenience prelude re-exporting the most commonly used items.
pub mod prelude {
    pub use super::{LexState, Statement, extract, statement_at};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_and_access() {
        let stmts = extract("CREATE TABLE t (a INT);\nINSERT INTO t VALUES (1);");
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].text().starts_with("CREATE TABLE"));
        assert!(stmts[1].text().starts_with("INSERT INTO"));
        assert!(stmts[0].end() <= stmts[1].start());
    }

    #[test]
    fn prelude_import_works() {
        use super::prelude::*;
        assert_eq!(extract("SELECT ';'; -- done\nSELECT 2"), ["SELECT ';'", "SELECT 2"]);
        assert_eq!(LexState::default(), LexState::Start);
    }
}
