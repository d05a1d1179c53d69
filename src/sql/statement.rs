//! A single statement cut out of a script.
//!
//! The text is kept as written (internal whitespace and newlines included),
//! minus comments, and trimmed at both ends. `start`/`end` are the byte offsets
//! of the first and last kept character within the original script, which lets
//! editor integrations highlight the statement without a second scan.

/// One extracted statement with its byte span in the source script.
///
/// Invariants:
/// - `end > start` (a statement is never empty)
/// - `&script[start..end] == text` whenever the statement holds no comment
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{text}")]
pub struct Statement {
    text: String,
    start: usize,
    end: usize,
}

impl Statement {
    pub(crate) fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn start(&self) -> usize {
        self.start
    }

    pub const fn end(&self) -> usize {
        self.end
    }

    pub const fn span(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

impl AsRef<str> for Statement {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl PartialEq<&str> for Statement {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_access() {
        let s = Statement::new("SELECT 1", 4, 12);
        assert_eq!(s.span(), (4, 12));
        assert_eq!((s.start(), s.end()), (4, 12));
    }

    #[test]
    fn display_is_text() {
        let s = Statement::new("DELETE FROM t", 0, 13);
        assert_eq!(s.to_string(), "DELETE FROM t");
        assert_eq!(s, "DELETE FROM t");
    }
}
