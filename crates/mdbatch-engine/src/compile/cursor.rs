use crate::ops::TextRange;

/// Length of `s` in the units the Document Update Service addresses (UTF-16 code units).
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Monotonic insertion offset into the target document.
///
/// Owned by exactly one compilation run. The only mutation is advancing by a
/// non-negative amount, so the offset never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    offset: usize,
}

impl Cursor {
    /// Creates a cursor at `initial`, the first offset new content will occupy.
    pub fn new(initial: usize) -> Self {
        Self { offset: initial }
    }

    /// Returns the current absolute offset.
    pub fn pos(&self) -> usize {
        self.offset
    }

    /// Advances by `n` offsets and returns the pre-advance position.
    pub fn advance(&mut self, n: usize) -> usize {
        let start = self.offset;
        self.offset += n;
        start
    }

    /// Advances over `text` as it will be inserted, returning the range it occupies.
    pub fn advance_over(&mut self, text: &str) -> TextRange {
        let len = utf16_len(text);
        TextRange::at(self.advance(len), len)
    }
}
