//! Workflow marker filter.
//!
//! A block that starts with a workflow keyword (`TODO`, `NOW`, ...) uses it as
//! task state syntax, not prose. The keyword and an optional priority cookie
//! `[#A]` right after it are carved out of the linkable text so they are never
//! rewritten, even when a page with the same name exists. The same word later
//! in the line is ordinary text.

use autolinker_core::{Span, ZoneKind};
use regex::Regex;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::zones::block_start_of;

/// Priority cookie following a marker: `[#A]`
static PRIORITY_COOKIE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]+\[#[A-Za-z]\]").unwrap());

/// The closed set of workflow markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowMarker {
    Now,
    Later,
    Todo,
    Doing,
    Done,
    Canceled,
    Cancelled,
    Wait,
    Waiting,
    InProgress,
}

impl WorkflowMarker {
    /// All recognized markers.
    pub const ALL: [WorkflowMarker; 10] = [
        Self::Now,
        Self::Later,
        Self::Todo,
        Self::Doing,
        Self::Done,
        Self::Canceled,
        Self::Cancelled,
        Self::Wait,
        Self::Waiting,
        Self::InProgress,
    ];

    /// Canonical keyword as written in notes.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Now => "NOW",
            Self::Later => "LATER",
            Self::Todo => "TODO",
            Self::Doing => "DOING",
            Self::Done => "DONE",
            Self::Canceled => "CANCELED",
            Self::Cancelled => "CANCELLED",
            Self::Wait => "WAIT",
            Self::Waiting => "WAITING",
            Self::InProgress => "IN-PROGRESS",
        }
    }
}

impl fmt::Display for WorkflowMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for WorkflowMarker {
    type Err = ();

    /// Case-insensitive keyword lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.keyword().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

/// A marker found at the start of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerExclusion {
    pub marker: WorkflowMarker,
    /// Marker keyword, plus the priority cookie when present
    pub range: Range<usize>,
}

/// Detect a workflow marker at `block_start`.
///
/// The marker must be a whole token: followed by whitespace or the end of
/// the content.
///
/// # Example
/// ```
/// use autolinker_parser::markers::{leading_marker, WorkflowMarker};
///
/// let found = leading_marker("LATER [#B] call", 0).unwrap();
/// assert_eq!(found.marker, WorkflowMarker::Later);
/// assert_eq!(found.range, 0..10);
/// assert!(leading_marker("Latergram", 0).is_none());
/// ```
pub fn leading_marker(content: &str, block_start: usize) -> Option<MarkerExclusion> {
    let rest = &content[block_start..];
    let token_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let marker = rest[..token_len].parse::<WorkflowMarker>().ok()?;

    let cookie_len = PRIORITY_COOKIE
        .find(&rest[token_len..])
        .map_or(0, |m| m.end());

    Some(MarkerExclusion {
        marker,
        range: block_start..block_start + token_len + cookie_len,
    })
}

/// Find the leading marker of every line whose keyword lies in linkable text.
///
/// `spans` must cover `content` in order, as [`segment`](crate::segment)
/// returns them. Markers come back in content order.
pub fn find_markers(content: &str, spans: &[Span]) -> Vec<MarkerExclusion> {
    let line_starts =
        std::iter::once(0).chain(content.match_indices('\n').map(|(i, _)| i + 1));

    line_starts
        .filter_map(|line_start| {
            let start = block_start_of(content, line_start);
            let found = leading_marker(content, start)?;
            let keyword_end = start + found.marker.keyword().len();
            let in_text = spans
                .get(spans.partition_point(|s| s.end <= start))
                .is_some_and(|s| s.is_linkable() && s.start <= start && keyword_end <= s.end);
            in_text.then_some(found)
        })
        .collect()
}

/// Carve marker ranges out of the linkable spans, re-tagging them as
/// [`ZoneKind::TaskMarker`]. Protected spans a marker range overlaps (the
/// `#A` of a priority cookie is already a tag) are left as they are.
/// Coverage and order are preserved. Both inputs must be in content order.
pub fn apply_exclusions(spans: Vec<Span>, exclusions: &[MarkerExclusion]) -> Vec<Span> {
    if exclusions.is_empty() {
        return spans;
    }

    let mut out = Vec::with_capacity(spans.len() + exclusions.len() * 2);
    let mut first = 0;
    for span in spans {
        if !span.is_linkable() {
            out.push(span);
            continue;
        }

        while exclusions
            .get(first)
            .is_some_and(|e| e.range.end <= span.start)
        {
            first += 1;
        }

        let mut cursor = span.start;
        for excl in exclusions[first..]
            .iter()
            .take_while(|e| e.range.start < span.end)
        {
            let start = excl.range.start.max(cursor);
            let end = excl.range.end.min(span.end);
            if start > cursor {
                out.push(Span::new(ZoneKind::Text, cursor, start));
            }
            if end > start {
                out.push(Span::new(ZoneKind::TaskMarker, start, end));
            }
            cursor = cursor.max(end);
        }
        if span.end > cursor {
            out.push(Span::new(ZoneKind::Text, cursor, span.end));
        }
    }
    out
}
