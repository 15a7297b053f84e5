//! Matcher and rewriter.
//!
//! Scans the NFC form of each linkable span left to right. At each cluster
//! the index group for the upcoming word (or character) is tried longest
//! first; the first title that matches with valid boundaries is consumed and
//! the scan resumes right after it. Matches map back to byte ranges of the
//! original content, so untouched text keeps its original form. Protected
//! spans are never queried and are copied through verbatim.

use autolinker_core::{LineIndex, LinkOptions, SourcePosition, Span, TitleMatch};
use std::borrow::Cow;
use std::ops::Range;

use crate::titles::{
    NormalizedChar, Title, TitleIndex, is_unspaced_script, is_word_char, normalize, word_key,
};

/// Find every title occurrence in the linkable spans and render it.
///
/// Matches are returned in content order and never overlap.
///
/// # Example
/// ```
/// use autolinker_core::LinkOptions;
/// use autolinker_parser::{TitleIndex, find_matches, segment};
///
/// let content = "a page, not `page`";
/// let index = TitleIndex::build(&["page"]);
/// let matches = find_matches(content, &segment(content), &index, &LinkOptions::default());
///
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].rendered, "[[page]]");
/// assert_eq!(matches[0].start, 2);
/// ```
pub fn find_matches(
    content: &str,
    spans: &[Span],
    index: &TitleIndex,
    options: &LinkOptions,
) -> Vec<TitleMatch> {
    if index.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for span in spans.iter().filter(|s| s.is_linkable()) {
        scan_span(content, span, index, &mut hits);
    }
    if hits.is_empty() {
        return Vec::new();
    }

    let lines = LineIndex::new(content);
    hits.into_iter()
        .map(|(title, range)| {
            let phrase = &content[range.clone()];
            let label = if title.is_all_lowercase() {
                phrase
            } else {
                title.literal()
            };
            let rendered = options.style_for(title.word_count()).render(label);
            log::trace!("Matched {:?} at {:?} as {}", title.literal(), range, rendered);

            TitleMatch {
                title: title.literal().to_string(),
                phrase_text: phrase.to_string(),
                rendered,
                position: SourcePosition::from_offset_indexed(&lines, range.start, range.len()),
                start: range.start,
                end: range.end,
            }
        })
        .collect()
}

/// Splice rendered matches into `content`.
///
/// Borrows `content` when there is nothing to splice. `matches` must be in
/// content order and non-overlapping, as [`find_matches`] returns them.
pub fn rewrite<'a>(content: &'a str, matches: &[TitleMatch]) -> Cow<'a, str> {
    if matches.is_empty() {
        return Cow::Borrowed(content);
    }

    let growth: usize = matches
        .iter()
        .map(|m| m.rendered.len().saturating_sub(m.end - m.start))
        .sum();
    let mut out = String::with_capacity(content.len() + growth);
    let mut cursor = 0;
    for m in matches {
        out.push_str(&content[cursor..m.start]);
        out.push_str(&m.rendered);
        cursor = m.end;
    }
    out.push_str(&content[cursor..]);
    Cow::Owned(out)
}

fn scan_span<'i>(
    content: &str,
    span: &Span,
    index: &'i TitleIndex,
    hits: &mut Vec<(&'i Title, Range<usize>)>,
) {
    let chars = normalize(span.text(content), span.start);
    let mut prev = content[..span.start].chars().next_back();
    let mut resume = span.start;

    for (i, nc) in chars.iter().enumerate() {
        let cluster_start = i == 0 || chars[i - 1].start != nc.start;
        if cluster_start
            && nc.start >= resume
            && let Some((title, end)) = longest_at(content, &chars[i..], prev, index)
        {
            hits.push((title, nc.start..end));
            resume = end;
        }
        prev = Some(nc.c);
    }
}

/// The first title in the group for the upcoming word (or character) that
/// matches at the start of `rest` with valid boundaries on both sides.
/// Returns the title and the byte offset where the match ends.
fn longest_at<'i>(
    content: &str,
    rest: &[NormalizedChar],
    prev: Option<char>,
    index: &'i TitleIndex,
) -> Option<(&'i Title, usize)> {
    let after_word = prev.is_some_and(is_word_char);
    let first = rest.first()?.c.to_lowercase().next()?;

    let group = if is_word_char(first) && !is_unspaced_script(first) {
        if after_word {
            return None;
        }
        index.by_word(&word_key(rest.iter().map(|nc| nc.c)))
    } else {
        index.by_char(first)
    };

    group.iter().find_map(|title| {
        if after_word && !title.unspaced_start() {
            return None;
        }
        let end = rest[title.match_at(rest)? - 1].end;
        let before_word = content[end..].chars().next().is_some_and(is_word_char);
        if before_word && !title.unspaced_end() {
            return None;
        }
        Some((title, end))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::segment;
    use pretty_assertions::assert_eq;

    fn link(titles: &[&str], content: &str, options: LinkOptions) -> String {
        let index = TitleIndex::build(titles);
        let matches = find_matches(content, &segment(content), &index, &options);
        rewrite(content, &matches).into_owned()
    }

    #[test]
    fn test_word_boundaries() {
        assert_eq!(
            link(&["page"], "page pages subpage page_x page.", LinkOptions::default()),
            "[[page]] pages subpage page_x [[page]]."
        );
    }

    #[test]
    fn test_longest_phrase_wins() {
        assert_eq!(
            link(&["new", "new page"], "a new page and new", LinkOptions::default()),
            "a [[new page]] and [[new]]"
        );
    }

    #[test]
    fn test_no_overlap_after_match() {
        assert_eq!(
            link(&["to do", "do it"], "to do it", LinkOptions::default()),
            "[[to do]] it"
        );
    }

    #[test]
    fn test_phrase_does_not_cross_line_break() {
        assert_eq!(
            link(&["John Doe"], "john\ndoe", LinkOptions::default()),
            "john\ndoe"
        );
    }

    #[test]
    fn test_match_stays_inside_its_span() {
        assert_eq!(
            link(&["page code"], "page `code`", LinkOptions::default()),
            "page `code`"
        );
    }

    #[test]
    fn test_unspaced_script_substring() {
        assert_eq!(
            link(&["测试"], "这是测试和", LinkOptions::default()),
            "这是[[测试]]和"
        );
    }

    #[test]
    fn test_case_resolution() {
        assert_eq!(
            link(&["logseq", "John Doe"], "LogSeq by JOHN DOE", LinkOptions::default()),
            "[[LogSeq]] by [[John Doe]]"
        );
    }

    #[test]
    fn test_rendering_styles() {
        assert_eq!(
            link(&["page", "two words"], "page two words", LinkOptions::tags()),
            "#page #[[two words]]"
        );
        assert_eq!(
            link(&["page", "two words"], "page two words", LinkOptions::single_word_tags()),
            "#page [[two words]]"
        );
    }

    #[test]
    fn test_match_positions() {
        let content = "first\nthe page";
        let index = TitleIndex::build(&["Page"]);
        let matches = find_matches(content, &segment(content), &index, &LinkOptions::default());

        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.title, "Page");
        assert_eq!(m.phrase_text, "page");
        assert_eq!(m.range(), 10..14);
        assert_eq!((m.position.line, m.position.column), (2, 5));
        assert_eq!(m.position.length, 4);
    }

    #[test]
    fn test_decomposed_content_matches() {
        assert_eq!(
            link(&["Übung"], "Eine U\u{308}bung hier", LinkOptions::default()),
            "Eine [[Übung]] hier"
        );
        assert_eq!(
            link(&["übung"], "zwei U\u{308}bungen, eine U\u{308}bung", LinkOptions::default()),
            "zwei U\u{308}bungen, eine [[U\u{308}bung]]"
        );
    }

    #[test]
    fn test_decomposed_title_matches_composed_content() {
        let content = "Eine Übung";
        let index = TitleIndex::build(&["U\u{308}bung"]);
        let matches = find_matches(content, &segment(content), &index, &LinkOptions::default());

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].range(), 5..content.len());
    }

    #[test]
    fn test_trailing_combining_mark_blocks_match() {
        assert_eq!(link(&["q"], "q\u{301} q", LinkOptions::default()), "q\u{301} [[q]]");
    }

    #[test]
    fn test_first_word_lookup() {
        assert_eq!(
            link(
                &["In-Progress", "c++ (lang)", "(lang)", "Mr测试"],
                "in-progress C++ (Lang), (lang) mr测试",
                LinkOptions::default()
            ),
            "[[In-Progress]] [[C++ (Lang)]], [[(lang)]] [[Mr测试]]"
        );
    }

    #[test]
    fn test_many_titles_sharing_first_letter() {
        let titles: Vec<String> = (0..5000).map(|i| format!("s{i}x")).collect();
        let index = TitleIndex::build(&titles);
        let content = "see some stuff, s42x and s4999x. ".repeat(200);
        let matches = find_matches(&content, &segment(&content), &index, &LinkOptions::default());

        assert_eq!(matches.len(), 400);
        assert_eq!(matches[0].title, "s42x");
        assert_eq!(matches[1].title, "s4999x");
    }

    #[test]
    fn test_rewrite_without_matches_borrows() {
        let content = "nothing here";
        assert!(matches!(rewrite(content, &[]), Cow::Borrowed(_)));
    }

    #[test]
    fn test_empty_index_finds_nothing() {
        let index = TitleIndex::default();
        assert!(find_matches("page", &segment("page"), &index, &LinkOptions::default()).is_empty());
    }
}
