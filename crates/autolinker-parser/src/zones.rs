//! Zone segmentation: split content into linkable text and protected regions.
//!
//! A single left-to-right scan over the content. Multi-line constructs
//! (fenced code, inline code, query blocks) are explicit scanner states;
//! bracketed constructs that cannot outlive their line are recognized in one
//! lookahead from the normal state.
//!
//! Every delimiter is ASCII, so the scanner walks bytes. A span boundary can
//! only fall on an ASCII delimiter or a line end, which keeps every span on a
//! UTF-8 character boundary.
//!
//! Malformed input errs toward protection: an unterminated fence or query
//! block runs to the end of the content, an unterminated inline code span or
//! page reference runs to the end of its line.

use autolinker_core::{Span, ZoneKind};
use regex::Regex;
use std::sync::LazyLock;

/// `key::` at a block start, followed by whitespace or end of line
static PROPERTY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s:`\[\]#]+::)(?:\s|$)").unwrap());

/// Bare `scheme://...` URL
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^\s<>`\[\]{}]+").unwrap()
});

/// Closing marker of a custom query block
static QUERY_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)#\+END_QUERY").unwrap());

const QUERY_BEGIN: &str = "#+BEGIN_QUERY";

/// Split `content` into ordered spans covering every byte exactly once.
///
/// # Example
/// ```
/// use autolinker_parser::segment;
/// use autolinker_core::ZoneKind;
///
/// let spans = segment("see `page` here");
/// let kinds: Vec<_> = spans.iter().map(|s| s.kind).collect();
/// assert_eq!(kinds, vec![ZoneKind::Text, ZoneKind::InlineCode, ZoneKind::Text]);
/// ```
pub fn segment(content: &str) -> Vec<Span> {
    Segmenter::new(content).run()
}

/// Offset where the block content of the line starting at `line_start`
/// begins: after leading spaces/tabs and an optional `- ` or `* ` bullet.
pub(crate) fn block_start_of(content: &str, line_start: usize) -> usize {
    let bytes = content.as_bytes();
    let skip_blanks = |mut i: usize| {
        while i < bytes.len() && matches!(bytes[i], b' ' | b'\t') {
            i += 1;
        }
        i
    };

    let i = skip_blanks(line_start);
    if i + 1 < bytes.len() && matches!(bytes[i], b'-' | b'*') && bytes[i + 1] == b' ' {
        skip_blanks(i + 2)
    } else {
        i
    }
}

/// Scanner states for zones that are resolved by searching ahead for their
/// closing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    FencedCode { open: usize },
    InlineCode { open: usize, run: usize },
    QueryBlock { open: usize },
}

struct Segmenter<'a> {
    content: &'a str,
    bytes: &'a [u8],
    spans: Vec<Span>,
    /// Start of the pending run of linkable text
    text_start: usize,
    /// Block start of the current line, if the scan has not passed it
    block_start: Option<usize>,
}

impl<'a> Segmenter<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            bytes: content.as_bytes(),
            spans: Vec::new(),
            text_start: 0,
            block_start: Some(block_start_of(content, 0)),
        }
    }

    fn run(mut self) -> Vec<Span> {
        let len = self.bytes.len();
        let mut state = State::Normal;
        let mut pos = 0;

        while pos < len || state != State::Normal {
            (state, pos) = match state {
                State::Normal => self.step(pos),
                State::FencedCode { open } => {
                    let end = self.find_fence(pos).unwrap_or(len);
                    self.protect(ZoneKind::FencedCode, open, end);
                    (State::Normal, end)
                }
                State::InlineCode { open, run } => {
                    let end = self.find_inline_close(pos, run);
                    self.protect(ZoneKind::InlineCode, open, end);
                    (State::Normal, end)
                }
                State::QueryBlock { open } => {
                    let end = QUERY_END
                        .find(&self.content[pos..])
                        .map_or(len, |m| self.line_end(pos + m.end()));
                    self.protect(ZoneKind::QueryBlock, open, end);
                    (State::Normal, end)
                }
            };
        }

        self.flush_text(len);
        self.spans
    }

    /// One step of the normal state.
    fn step(&mut self, pos: usize) -> (State, usize) {
        if self.block_start == Some(pos)
            && let Some(next) = self.block_construct(pos)
        {
            return next;
        }

        let next_byte = self.bytes.get(pos + 1).copied();
        match self.bytes[pos] {
            b'\n' => {
                self.block_start = Some(block_start_of(self.content, pos + 1));
                (State::Normal, pos + 1)
            }
            b'\\' if next_byte.is_some_and(|b| b.is_ascii_punctuation()) => {
                (State::Normal, pos + 2)
            }
            b'`' => {
                let run = self.run_length(pos, b'`');
                let state = if run >= 3 {
                    State::FencedCode { open: pos }
                } else {
                    State::InlineCode { open: pos, run }
                };
                (state, pos + run)
            }
            b'[' if next_byte == Some(b'[') => {
                let end = self
                    .find_balanced(pos, b'[', b']')
                    .unwrap_or_else(|| self.line_end(pos));
                self.protect_to(ZoneKind::PageRef, pos, end)
            }
            b'[' => match self.find_markdown_link(pos) {
                Some(end) => self.protect_to(ZoneKind::MarkdownLink, pos, end),
                None => (State::Normal, pos + 1),
            },
            b'!' if next_byte == Some(b'[') => match self.find_markdown_link(pos + 1) {
                Some(end) => self.protect_to(ZoneKind::MarkdownLink, pos, end),
                None => (State::Normal, pos + 1),
            },
            b'{' if next_byte == Some(b'{') => {
                let end = self
                    .find_balanced(pos, b'{', b'}')
                    .unwrap_or_else(|| self.line_end(pos));
                self.protect_to(ZoneKind::Macro, pos, end)
            }
            b'#' => match self.find_tag(pos) {
                Some(end) => self.protect_to(ZoneKind::Tag, pos, end),
                None => (State::Normal, pos + 1),
            },
            b if b.is_ascii_alphabetic() && self.at_word_start(pos) => match self.find_url(pos) {
                Some(end) => self.protect_to(ZoneKind::Url, pos, end),
                None => (State::Normal, pos + 1),
            },
            _ => (State::Normal, pos + 1),
        }
    }

    /// Constructs only recognized at the start of a block.
    fn block_construct(&mut self, pos: usize) -> Option<(State, usize)> {
        let rest = &self.content[pos..];
        if rest
            .get(..QUERY_BEGIN.len())
            .is_some_and(|s| s.eq_ignore_ascii_case(QUERY_BEGIN))
        {
            return Some((State::QueryBlock { open: pos }, pos + QUERY_BEGIN.len()));
        }

        let line = &self.content[pos..self.line_end(pos)];
        let key = PROPERTY_KEY.captures(line)?.get(1)?;
        Some(self.protect_to(ZoneKind::PropertyKey, pos, pos + key.end()))
    }

    fn protect_to(&mut self, kind: ZoneKind, start: usize, end: usize) -> (State, usize) {
        self.protect(kind, start, end);
        (State::Normal, end)
    }

    fn protect(&mut self, kind: ZoneKind, start: usize, end: usize) {
        self.flush_text(start);
        if end > start {
            self.spans.push(Span::new(kind, start, end));
        }
        self.text_start = end;
        // No zone ends at a line start, so the current line's block start is behind us
        self.block_start = None;
    }

    fn flush_text(&mut self, until: usize) {
        if until > self.text_start {
            self.spans
                .push(Span::new(ZoneKind::Text, self.text_start, until));
        }
        self.text_start = until;
    }

    fn line_end(&self, pos: usize) -> usize {
        self.content[pos..]
            .find('\n')
            .map_or(self.bytes.len(), |i| pos + i)
    }

    fn run_length(&self, pos: usize, byte: u8) -> usize {
        self.bytes[pos..].iter().take_while(|&&b| b == byte).count()
    }

    fn at_word_start(&self, pos: usize) -> bool {
        self.content[..pos]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    }

    /// End of the next run of three or more backticks at or after `from`.
    fn find_fence(&self, from: usize) -> Option<usize> {
        let mut i = from;
        while i < self.bytes.len() {
            if self.bytes[i] == b'`' {
                let run = self.run_length(i, b'`');
                if run >= 3 {
                    return Some(i + run);
                }
                i += run;
            } else {
                i += 1;
            }
        }
        None
    }

    /// End of the backtick run of exactly `run` that closes an inline code
    /// span, or the end of the line when there is none.
    fn find_inline_close(&self, from: usize, run: usize) -> usize {
        let mut i = from;
        while i < self.bytes.len() && self.bytes[i] != b'\n' {
            if self.bytes[i] == b'`' {
                let len = self.run_length(i, b'`');
                if len == run {
                    return i + len;
                }
                i += len;
            } else {
                i += 1;
            }
        }
        i
    }

    /// End of a doubled-delimiter construct (`[[..]]`, `{{..}}`) opened at
    /// `pos`, honoring nesting, without leaving the line.
    fn find_balanced(&self, pos: usize, open: u8, close: u8) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = pos;
        while i + 1 < self.bytes.len() && self.bytes[i] != b'\n' {
            let pair = (self.bytes[i], self.bytes[i + 1]);
            if pair == (open, open) {
                depth += 1;
                i += 2;
            } else if pair == (close, close) {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return Some(i);
                }
            } else {
                i += 1;
            }
        }
        None
    }

    /// End of a `[display](target)` construct whose `[` is at `pos`.
    fn find_markdown_link(&self, pos: usize) -> Option<usize> {
        let close = self.find_closing(pos, b'[', b']')?;
        if self.bytes.get(close + 1) != Some(&b'(') {
            return None;
        }
        let end = self.find_closing(close + 1, b'(', b')')?;
        Some(end + 1)
    }

    /// Offset of the delimiter closing the one at `pos`, skipping escapes
    /// and nested pairs, without leaving the line.
    fn find_closing(&self, pos: usize, open: u8, close: u8) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = pos;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\n' => return None,
                b'\\' => {
                    if self.bytes.get(i + 1) == Some(&b'\n') {
                        return None;
                    }
                    i += 2;
                    continue;
                }
                b if b == open => depth += 1,
                b if b == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// End of a `#tag` or `#[[tag]]` whose `#` is at `pos`.
    fn find_tag(&self, pos: usize) -> Option<usize> {
        let opens_tag = self.content[..pos]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace() || matches!(c, '(' | '[' | ','));
        if !opens_tag {
            return None;
        }

        let rest = &self.content[pos + 1..];
        if rest.starts_with("[[") {
            return Some(
                self.find_balanced(pos + 1, b'[', b']')
                    .unwrap_or_else(|| self.line_end(pos)),
            );
        }

        let len: usize = rest
            .chars()
            .take_while(|&c| is_tag_char(c))
            .map(char::len_utf8)
            .sum();
        (len > 0).then_some(pos + 1 + len)
    }

    fn find_url(&self, pos: usize) -> Option<usize> {
        let found = URL.find(&self.content[pos..])?.as_str();
        let trimmed = found.trim_end_matches(|c: char| {
            matches!(c, '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"')
                || (c == ')' && !found.contains('('))
        });
        Some(pos + trimmed.len())
    }
}

fn is_tag_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_' | '/')
}
