/// Caret position (and optional selection end) in an editor buffer, as byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    start: usize,
    end: Option<usize>,
}

impl Cursor {
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// A plain caret without selection.
    pub const fn at(start: usize) -> Self {
        Self { start, end: None }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// Selected slice of `buffer`, if the selection is non-empty and lies on
    /// character boundaries.
    pub fn selection<'a>(&self, buffer: &'a str) -> Option<&'a str> {
        let end = self.end?;
        let (from, to) = (self.start.min(end), self.start.max(end));
        buffer.get(from..to).filter(|s| !s.is_empty())
    }
}
