//! Core data models for the linking pipeline.
//!
//! These types are designed to be:
//! - **Serializable**: All types derive Serialize/Deserialize
//! - **Debuggable**: Derive Debug for easy inspection
//! - **Offset-based**: Spans and matches index into the original content by byte offset
//! - **Type-Safe**: Enums replace magic strings

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;

/// Position in source text (line, column, byte offset)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
    pub length: usize,
}

impl SourcePosition {
    /// Create position from byte offset using a pre-computed line index.
    ///
    /// This is O(log n) - use for bulk operations.
    pub fn from_offset_indexed(index: &LineIndex, offset: usize, length: usize) -> Self {
        let (line, column) = index.line_col(offset);
        Self {
            line,
            column,
            offset,
            length,
        }
    }
}

/// Pre-computed line starts for O(log n) line/column lookup.
///
/// # Example
/// ```
/// use autolinker_core::{LineIndex, SourcePosition};
///
/// let content = "Line 1\nLine 2\nLine 3";
/// let index = LineIndex::new(content);
///
/// let pos = SourcePosition::from_offset_indexed(&index, 7, 6);
/// assert_eq!(pos.line, 2);
/// assert_eq!(pos.column, 1);
/// ```
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets where each line starts (line 1 = index 0)
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Build line index in O(n) - do once per document.
    pub fn new(content: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(content.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    /// Get (line, column) for a byte offset in O(log n) via binary search.
    ///
    /// Line numbers start at 1, column numbers start at 1 and count bytes.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line_idx = self.line_starts.partition_point(|&start| start <= offset);
        let line = line_idx.max(1);
        let line_start = self
            .line_starts
            .get(line_idx.saturating_sub(1))
            .copied()
            .unwrap_or(0);
        (line, offset - line_start + 1)
    }

}

/// What a span of content is.
///
/// Only [`ZoneKind::Text`] is eligible for rewriting; every other kind is
/// copied through byte for byte.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    /// Prose, eligible for linking
    Text,
    /// ```` ``` ... ``` ````, both fences included
    FencedCode,
    /// `` `code` `` on a single line, or an unterminated backtick to end of line
    InlineCode,
    /// `[display](target)` or `![alt](src)`
    MarkdownLink,
    /// An existing `[[page]]` reference
    PageRef,
    /// An existing `#tag` or `#[[tag]]`
    Tag,
    /// `{{macro ...}}`
    Macro,
    /// `scheme://...`
    Url,
    /// The `key::` part of a `key:: value` property line
    PropertyKey,
    /// `#+BEGIN_QUERY ... #+END_QUERY`, marker lines included
    QueryBlock,
    /// A leading workflow marker such as `TODO`, plus its priority cookie
    TaskMarker,
}

impl ZoneKind {
    /// Whether text in this zone may be rewritten.
    pub fn is_linkable(self) -> bool {
        matches!(self, Self::Text)
    }
}

/// A contiguous, tagged region of the original content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    pub kind: ZoneKind,
    pub start: usize,
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(kind: ZoneKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// Whether the span may be rewritten
    pub fn is_linkable(&self) -> bool {
        self.kind.is_linkable()
    }

    /// The slice of `content` this span covers
    pub fn text<'c>(&self, content: &'c str) -> &'c str {
        &content[self.start..self.end]
    }
}

/// A single rewritten title occurrence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TitleMatch {
    /// The page title the phrase resolved to, in its literal casing
    pub title: String,
    /// The phrase as it appeared in the content
    pub phrase_text: String,
    /// The markup that replaced the phrase
    pub rendered: String,
    /// Byte offset where the phrase starts
    pub start: usize,
    /// Byte offset just past the phrase
    pub end: usize,
    /// Line/column of the phrase in the original content
    pub position: SourcePosition,
}

impl TitleMatch {
    /// Byte range consumed in the original content
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Result of linking one piece of content.
///
/// `content` borrows the input when nothing was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome<'a> {
    pub content: Cow<'a, str>,
    pub matches: Vec<TitleMatch>,
}

impl<'a> LinkOutcome<'a> {
    /// An outcome that leaves `content` untouched.
    pub fn unchanged(content: &'a str) -> Self {
        Self {
            content: Cow::Borrowed(content),
            matches: Vec::new(),
        }
    }

    /// True iff at least one match was rewritten.
    pub fn changed(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Number of rewritten matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Convert into the `(content, changed)` pair hosts persist from.
    pub fn into_parts(self) -> (String, bool) {
        let changed = self.changed();
        (self.content.into_owned(), changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_position() {
        let index = LineIndex::new("one\ntwo three");
        let pos = SourcePosition::from_offset_indexed(&index, 8, 5);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 5);
        assert_eq!(pos.offset, 8);
        assert_eq!(pos.length, 5);
    }

    #[test]
    fn test_line_index_single_line() {
        let content = "Hello, world!";
        let index = LineIndex::new(content);

        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(7), (1, 8));
    }

    #[test]
    fn test_line_index_multiline() {
        let content = "Line 1\nLine 2\nLine 3";
        let index = LineIndex::new(content);

        assert_eq!(index.line_col(5), (1, 6));
        assert_eq!(index.line_col(7), (2, 1));
        assert_eq!(index.line_col(13), (2, 7));
        assert_eq!(index.line_col(14), (3, 1));
    }

    #[test]
    fn test_line_index_trailing_newline() {
        let index = LineIndex::new("a\n");
        assert_eq!(index.line_col(1), (1, 2));
        assert_eq!(index.line_col(2), (2, 1));
    }

    #[test]
    fn test_span_helpers() {
        let content = "page `code`";
        let span = Span::new(ZoneKind::InlineCode, 5, 11);
        assert_eq!(span.text(content), "`code`");
        assert!(!span.is_linkable());
        assert!(Span::new(ZoneKind::Text, 0, 5).is_linkable());
    }

    #[test]
    fn test_outcome_unchanged_borrows() {
        let outcome = LinkOutcome::unchanged("plain text");
        assert!(!outcome.changed());
        assert!(matches!(outcome.content, Cow::Borrowed("plain text")));
        assert_eq!(outcome.into_parts(), ("plain text".to_string(), false));
    }

    #[test]
    fn test_zone_kind_serde() {
        let json = serde_json::to_string(&ZoneKind::QueryBlock).unwrap();
        assert_eq!(json, "\"query_block\"");
    }
}
