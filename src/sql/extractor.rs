use crate::sql::{
    lex_state::{LexState, next_state},
    statement::Statement,
};
use crate::*;
use std::{ops::Range, str::CharIndices};

/// Split a script into its statements, in source order.
///
/// Drives [`LexState`] over every character. Each time the classifier reports
/// [`LexState::Final`] the characters kept since the previous delimiter are
/// trimmed and, if anything is left, emitted as a [`Statement`]. Whatever is
/// left at the end of the buffer is flushed the same way, so a trailing
/// statement does not need a closing `;`.
///
/// Behavior:
/// - The delimiter itself is dropped and never re-examined.
/// - Comments never reach the statement text. A closed block comment leaves a
///   single space behind so the tokens around it stay apart; a line comment
///   leaves its terminating newline.
/// - Unterminated literals, quoted names and comments are not closed
///   artificially: scanning simply runs to the end of the buffer.
/// - Whitespace- or comment-only segments (`;;`, `-- note;`) emit nothing.
///
/// Never fails and keeps no state between calls.
pub fn extract(script: &str) -> Vec<Statement> {
    let statements: Vec<Statement> = segments(script)
        .filter_map(|segment| segment.statement)
        .inspect(|stmt| trace!("Extracted statement at {:?}: {stmt}", stmt.span()))
        .collect();
    debug!(
        "Extracted {} statement(s) from {} byte script",
        statements.len(),
        script.len()
    );
    statements
}

/// Find the statement an editor cursor sits in.
///
/// A segment reaches from just after the previous delimiter up to and including
/// its own delimiter, so a cursor placed directly behind a `;` still belongs to
/// the statement that `;` closes. Offsets past the end of the script clamp to
/// the last segment. Returns `None` when the segment holds no statement.
pub fn statement_at(script: &str, cursor: Cursor) -> Option<Statement> {
    let pos = cursor.start().min(script.len());
    segments(script)
        .find(|segment| segment.range.start <= pos && pos <= segment.range.end)
        .and_then(|segment| segment.statement)
}

/// Iterate over every delimiter-separated segment of `script`.
///
/// Always yields at least one segment (the end-of-buffer flush), even for an
/// empty script.
pub fn segments(script: &str) -> Segments<'_> {
    Segments {
        script,
        chars: script.char_indices(),
        state: LexState::Start,
        segment_start: 0,
        kept: Vec::new(),
        done: false,
    }
}

/// A slice of the script between two delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Source bytes of the segment, including its closing `;` if any.
    pub range: Range<usize>,
    /// The statement found in the segment, if it held any code.
    pub statement: Option<Statement>,
}

/// Iterator returned by [`segments`].
pub struct Segments<'a> {
    script: &'a str,
    chars: CharIndices<'a>,
    state: LexState,
    segment_start: usize,
    // Characters of the current segment that belong to the statement, with
    // their byte offsets in the script.
    kept: Vec<(usize, char)>,
    done: bool,
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.done {
            return None;
        }
        while let Some((pos, c)) = self.chars.next() {
            debug_assert!(!self.state.is_final(), "scanner left in Final state");
            let next = next_state(self.state, c);
            if next.is_final() {
                self.state = LexState::Start;
                return Some(self.seal(pos + c.len_utf8()));
            }
            self.keep(next, pos, c);
            self.state = next;
        }
        self.done = true;
        Some(self.seal(self.script.len()))
    }
}

impl Segments<'_> {
    fn keep(&mut self, next: LexState, pos: usize, c: char) {
        use LexState::*;
        match (self.state, next) {
            // The pending `/` or `-` turned out to open a comment.
            (MaybeBlockComment, InsideBlockComment) | (MaybeLineComment, InsideLineComment) => {
                self.kept.pop();
            }
            (MaybeEndOfBlockComment, Start) => self.kept.push((pos, ' ')),
            (_, next) if next.in_comment() => {}
            _ => self.kept.push((pos, c)),
        }
    }

    fn seal(&mut self, end: usize) -> Segment {
        let range = self.segment_start..end;
        self.segment_start = end;
        let kept = std::mem::take(&mut self.kept);
        Segment {
            range,
            statement: trimmed(&kept),
        }
    }
}

fn trimmed(kept: &[(usize, char)]) -> Option<Statement> {
    let first = kept.iter().position(|(_, c)| !c.is_whitespace())?;
    let last = kept.iter().rposition(|(_, c)| !c.is_whitespace())?;
    let text: String = kept[first..=last].iter().map(|&(_, c)| c).collect();
    let (last_pos, last_char) = kept[last];
    Some(Statement::new(text, kept[first].0, last_pos + last_char.len_utf8()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn extract_texts(script: &str) -> Vec<String> {
        extract(script)
            .iter()
            .map(|stmt| stmt.text().to_owned())
            .collect()
    }

    #[rstest]
    #[case("")]
    #[case("   \n\t  ")]
    #[case("-- only a comment")]
    #[case("-- comment\n-- another\n")]
    #[case("/* block */")]
    #[case("/* unterminated block")]
    #[case("  /* a */ -- b\n /* c ; d */ ")]
    #[case(";;;")]
    #[case(" ; \n ; -- x ;\n ;")]
    fn nothing_to_extract(#[case] script: &str) {
        assert!(extract(script).is_empty(), "{script:?} yielded {:?}", extract(script));
    }

    #[rstest]
    #[case("SELECT 1;", &["SELECT 1"])]
    #[case("SELECT 1", &["SELECT 1"])]
    #[case("SELECT 1;SELECT 2;", &["SELECT 1", "SELECT 2"])]
    #[case("  SELECT 1  ;\n\n  SELECT 2  ", &["SELECT 1", "SELECT 2"])]
    #[case("SELECT ';' FROM t;", &["SELECT ';' FROM t"])]
    #[case("SELECT \"a;b\" FROM t;", &["SELECT \"a;b\" FROM t"])]
    #[case("SELECT 'it''s;' FROM t; SELECT 2", &["SELECT 'it''s;' FROM t", "SELECT 2"])]
    #[case("SELECT '\"' ; SELECT \"'\" ;", &["SELECT '\"'", "SELECT \"'\""])]
    #[case(";;SELECT 1;;", &["SELECT 1"])]
    #[case("SELECT 1 -- comment ; still comment\n;", &["SELECT 1"])]
    #[case("SELECT 1 -- comment ; still comment\r;", &["SELECT 1"])]
    #[case("SELECT 1 /* a ; b */ ;", &["SELECT 1"])]
    #[case("SELECT/* x */1;", &["SELECT 1"])]
    #[case("SELECT 1 /* /* nested? */ ; SELECT 2", &["SELECT 1", "SELECT 2"])]
    // An odd run of stars never closes: `*` after `*` goes back inside.
    #[case("SELECT 1 /***/; SELECT 2", &["SELECT 1"])]
    #[case("SELECT 10-2;", &["SELECT 10-2"])]
    #[case("SELECT 10/2;", &["SELECT 10/2"])]
    #[case("SELECT 1 -; SELECT 2", &["SELECT 1 -; SELECT 2"])]
    #[case("SELECT 'open; SELECT 2", &["SELECT 'open; SELECT 2"])]
    #[case("SELECT \"open; SELECT 2", &["SELECT \"open; SELECT 2"])]
    #[case("SELECT 1; -- trailing note", &["SELECT 1"])]
    fn extracts(#[case] script: &str, #[case] expected: &[&str]) {
        assert_eq!(extract_texts(script), expected);
    }

    #[test]
    fn keeps_inner_layout() {
        let script = "INSERT INTO t (a, b)\n  VALUES (1,\t2);\n";
        assert_eq!(extract_texts(script), ["INSERT INTO t (a, b)\n  VALUES (1,\t2)"]);
    }

    #[test]
    fn line_comment_leaves_its_newline() {
        let script = "SELECT a -- the a\nFROM t;";
        assert_eq!(extract_texts(script), ["SELECT a \nFROM t"]);
    }

    #[test]
    fn failed_block_opener_swallows_delimiter() {
        // `/` followed by `;` cancels the block comment candidate and the `;`
        // is consumed as that trigger, so it does not end the statement.
        assert_eq!(extract_texts("SELECT 4 /; SELECT 5;"), ["SELECT 4 /; SELECT 5"]);
    }

    #[test]
    fn spans_point_into_script() {
        let script = "  SELECT 1 ;\nSELECT 'ä' ;  ";
        let stmts = extract(script);
        assert_eq!(stmts.len(), 2);
        for stmt in &stmts {
            let (start, end) = stmt.span();
            assert_eq!(&script[start..end], stmt.text());
        }
        assert_eq!(stmts[0].span(), (2, 10));
    }

    #[test]
    fn span_covers_inner_comment() {
        let script = "SELECT /* c */ 1;";
        let stmt = &extract(script)[0];
        assert_eq!(stmt.text(), "SELECT   1");
        assert_eq!(stmt.span(), (0, 16));
    }

    #[test]
    fn segments_cover_script() {
        let script = "SELECT 1; ;SELECT 2";
        let segs: Vec<_> = segments(script).collect();
        let ranges: Vec<_> = segs.iter().map(|s| s.range.clone()).collect();
        assert_eq!(ranges, [0..9, 9..11, 11..19]);
        assert!(segs[1].statement.is_none());
    }

    #[test]
    fn empty_script_has_one_segment() {
        let segs: Vec<_> = segments("").collect();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].range, 0..0);
        assert!(segs[0].statement.is_none());
    }

    #[rstest]
    #[case(0, Some("SELECT 1"))]
    #[case(4, Some("SELECT 1"))]
    #[case(8, Some("SELECT 1"))] // on the delimiter
    #[case(9, Some("SELECT 1"))] // directly behind it
    #[case(10, None)] // inside the empty segment
    #[case(13, Some("SELECT 2"))]
    #[case(500, Some("SELECT 2"))]
    fn finds_statement_under_cursor(#[case] pos: usize, #[case] expected: Option<&str>) {
        let script = "SELECT 1; ;\nSELECT 2";
        let found = statement_at(script, Cursor::at(pos));
        assert_eq!(found.as_ref().map(Statement::text), expected);
    }

    #[test]
    fn repeated_runs_agree() {
        let script = "CREATE TABLE t (a INT); -- x\nINSERT INTO t VALUES (1); SELECT * FROM t";
        assert_eq!(extract(script), extract(script));
    }

    #[test]
    fn independent_threads_agree() {
        let script = "SELECT 1; SELECT ';'; /* ; */ SELECT 3";
        let expected = extract(script);
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(move || extract(script)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("extractor thread panicked"), expected);
        }
    }
}
