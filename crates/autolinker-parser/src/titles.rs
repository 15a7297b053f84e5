//! Title index: folded titles grouped by their first word, or by their first
//! character when they don't start with a word of a spaced script.
//!
//! Content is compared in NFC, so a decomposed `U\u{308}` matches a title
//! typed with a precomposed `Ü`.

use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::canonical_combining_class;
use unicode_script::{Script, UnicodeScript};

/// Fold text for comparison: trimmed, NFC-normalized, lowercased char by
/// char, with whitespace runs collapsed to a single space.
///
/// # Example
/// ```
/// use autolinker_parser::titles::fold;
///
/// assert_eq!(fold("  John   Doe "), "john doe");
/// assert_eq!(fold("ТЕСТ"), "тест");
/// ```
pub fn fold(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.trim().nfc().flat_map(char::to_lowercase) {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            folded.push(' ');
            pending_space = false;
        }
        folded.push(c);
    }
    folded
}

/// Scripts written without spaces between words.
pub fn is_unspaced_script(c: char) -> bool {
    matches!(
        c.script(),
        Script::Han
            | Script::Hiragana
            | Script::Katakana
            | Script::Thai
            | Script::Lao
            | Script::Khmer
            | Script::Myanmar
    )
}

/// Word characters for boundary checks.
#[inline]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// One character of NFC-normalized content, mapped back to the byte range of
/// the source cluster it came from.
///
/// A cluster is a starter followed by its combining marks. Characters
/// composed from the same cluster share its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedChar {
    pub c: char,
    pub start: usize,
    pub end: usize,
}

/// NFC-normalize `text` one cluster at a time. Byte ranges are offset by
/// `base`.
///
/// # Example
/// ```
/// use autolinker_parser::titles::normalize;
///
/// let chars = normalize("U\u{308}b", 10);
/// assert_eq!(chars.len(), 2);
/// assert_eq!(chars[0].c, 'Ü');
/// assert_eq!((chars[0].start, chars[0].end), (10, 13));
/// ```
pub fn normalize(text: &str, base: usize) -> Vec<NormalizedChar> {
    let mut out = Vec::with_capacity(text.len());
    let mut starts = text
        .char_indices()
        .filter(|&(i, c)| i == 0 || canonical_combining_class(c) == 0)
        .map(|(i, _)| i)
        .peekable();

    while let Some(start) = starts.next() {
        let end = starts.peek().copied().unwrap_or(text.len());
        out.extend(text[start..end].nfc().map(|c| NormalizedChar {
            c,
            start: base + start,
            end: base + end,
        }));
    }
    out
}

/// Leading run of lowercased word characters in a script written with
/// spaces. Empty when `chars` does not start with one.
///
/// # Example
/// ```
/// use autolinker_parser::titles::word_key;
///
/// assert_eq!(word_key("In-Progress".chars()), "in");
/// assert_eq!(word_key("C++ (lang)".chars()), "c");
/// assert_eq!(word_key("(lang)".chars()), "");
/// ```
pub fn word_key(chars: impl IntoIterator<Item = char>) -> String {
    chars
        .into_iter()
        .flat_map(char::to_lowercase)
        .take_while(|&c| is_word_char(c) && !is_unspaced_script(c))
        .collect()
}

/// Index key of a title.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TitleKey {
    /// First word, for titles starting with a word in a spaced script
    Word(String),
    /// First character, for everything else
    Char(char),
}

/// A known page title with the attributes derived for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    literal: String,
    folded: Vec<char>,
    key: TitleKey,
    word_count: usize,
    is_all_lowercase: bool,
    unspaced_start: bool,
    unspaced_end: bool,
}

impl Title {
    /// Derive a title from raw input. Returns `None` for blank titles.
    pub fn new(raw: &str) -> Option<Self> {
        let literal = raw.trim();
        let folded: Vec<char> = fold(literal).chars().collect();
        let (&first, &last) = (folded.first()?, folded.last()?);

        let word = word_key(folded.iter().copied());
        let key = if word.is_empty() {
            TitleKey::Char(first)
        } else {
            TitleKey::Word(word)
        };

        Some(Self {
            literal: literal.to_string(),
            key,
            word_count: literal.split_whitespace().count(),
            is_all_lowercase: !literal.chars().any(char::is_uppercase),
            unspaced_start: is_unspaced_script(first),
            unspaced_end: is_unspaced_script(last),
            folded,
        })
    }

    /// The title as given, trimmed.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn key(&self) -> &TitleKey {
        &self.key
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// True when the literal title has no uppercase letter.
    pub fn is_all_lowercase(&self) -> bool {
        self.is_all_lowercase
    }

    /// Whether a match may start right after a word character.
    pub fn unspaced_start(&self) -> bool {
        self.unspaced_start
    }

    /// Whether a match may end right before a word character.
    pub fn unspaced_end(&self) -> bool {
        self.unspaced_end
    }

    /// Number of normalized characters at the start of `text` this title
    /// matches, if any.
    ///
    /// Content characters are lowercased one at a time and compared with the
    /// folded title. A space in the title matches exactly one whitespace
    /// character that is not a line break. Title text is always literal. A
    /// match never ends inside a cluster.
    ///
    /// # Example
    /// ```
    /// use autolinker_parser::titles::{Title, normalize};
    ///
    /// let title = Title::new("John Doe").unwrap();
    /// assert_eq!(title.match_at(&normalize("john\tDOE, hi", 0)), Some(8));
    /// assert_eq!(title.match_at(&normalize("john\nDoe", 0)), None);
    /// ```
    pub fn match_at(&self, text: &[NormalizedChar]) -> Option<usize> {
        let mut expected = self.folded.iter();

        for (i, nc) in text.iter().enumerate() {
            if nc.c == '\n' {
                return None;
            }
            if nc.c.is_whitespace() {
                if *expected.next()? != ' ' {
                    return None;
                }
            } else {
                for lower in nc.c.to_lowercase() {
                    if *expected.next()? != lower {
                        return None;
                    }
                }
            }
            if expected.as_slice().is_empty() {
                let cluster_end = text.get(i + 1).is_none_or(|next| next.start != nc.start);
                return cluster_end.then_some(i + 1);
            }
        }
        None
    }
}

/// Lookup structure over the known titles.
///
/// Titles starting with a word in a spaced script are grouped by that first
/// word, so a position only ever sees titles sharing its whole first word.
/// Everything else (unspaced scripts, punctuation) is grouped by first
/// character. Each group is ordered so the first title that matches at a
/// position is the longest one: more words first, then more characters.
///
/// Built once, read-only afterward.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    words: HashMap<String, Vec<Title>>,
    chars: HashMap<char, Vec<Title>>,
    len: usize,
}

impl TitleIndex {
    /// Build the index. Blank titles are skipped; of several titles with the
    /// same folded form, the first one wins.
    ///
    /// # Example
    /// ```
    /// use autolinker_parser::TitleIndex;
    ///
    /// let index = TitleIndex::build(&["page", "Page Two", "PAGE", ""]);
    /// assert_eq!(index.len(), 2);
    ///
    /// let order: Vec<_> = index.by_word("page").iter().map(|t| t.literal()).collect();
    /// assert_eq!(order, vec!["Page Two", "page"]);
    /// ```
    pub fn build<S: AsRef<str>>(titles: &[S]) -> Self {
        let mut seen = HashSet::new();
        let mut words: HashMap<String, Vec<Title>> = HashMap::new();
        let mut chars: HashMap<char, Vec<Title>> = HashMap::new();
        let mut blank = 0;
        let mut duplicates = 0;

        for raw in titles {
            let Some(title) = Title::new(raw.as_ref()) else {
                blank += 1;
                continue;
            };
            if !seen.insert(title.folded.clone()) {
                duplicates += 1;
                continue;
            }
            match &title.key {
                TitleKey::Word(word) => words.entry(word.clone()).or_default().push(title),
                TitleKey::Char(c) => chars.entry(*c).or_default().push(title),
            }
        }

        // Stable sort keeps first-seen order among equals
        for group in words.values_mut().chain(chars.values_mut()) {
            group.sort_by(|a, b| {
                b.word_count
                    .cmp(&a.word_count)
                    .then_with(|| b.folded.len().cmp(&a.folded.len()))
            });
        }

        let len = seen.len();
        log::debug!(
            "Indexed {} titles in {} word and {} char groups ({} duplicates, {} blank skipped)",
            len,
            words.len(),
            chars.len(),
            duplicates,
            blank
        );

        Self { words, chars, len }
    }

    /// Titles whose first word folds to `word`, longest first.
    pub fn by_word(&self, word: &str) -> &[Title] {
        self.words.get(word).map(Vec::as_slice).unwrap_or_default()
    }

    /// Titles keyed by their first character `c`, longest first.
    pub fn by_char(&self, c: char) -> &[Title] {
        self.chars.get(&c).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of distinct titles indexed.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Page", "page")]
    #[case("  Neue   Seite ", "neue seite")]
    #[case("Straße", "straße")]
    #[case("ТЕСТ", "тест")]
    #[case("测试", "测试")]
    #[case("e\u{301}cole", "\u{e9}cole")]
    fn test_fold(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(fold(input), expected);
    }

    #[test]
    fn test_title_attributes() {
        let title = Title::new(" Multiple Words ").unwrap();
        assert_eq!(title.literal(), "Multiple Words");
        assert_eq!(title.key(), &TitleKey::Word("multiple".into()));
        assert_eq!(title.word_count(), 2);
        assert!(!title.is_all_lowercase());
        assert!(!title.unspaced_start());

        let lower = Title::new("for pages").unwrap();
        assert!(lower.is_all_lowercase());
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(Title::new("").is_none());
        assert!(Title::new("   ").is_none());
    }

    #[test]
    fn test_unspaced_scripts() {
        let han = Title::new("测试").unwrap();
        assert!(han.unspaced_start() && han.unspaced_end());

        let kana = Title::new("テスト文書").unwrap();
        assert!(kana.unspaced_start() && kana.unspaced_end());

        // Hangul separates words with spaces
        let hangul = Title::new("테스트").unwrap();
        assert!(!hangul.unspaced_start());
    }

    fn chars(text: &str) -> Vec<NormalizedChar> {
        normalize(text, 0)
    }

    #[test]
    fn test_normalize_composes_clusters() {
        let nc = chars("Eine U\u{308}bung");
        let text: String = nc.iter().map(|n| n.c).collect();
        assert_eq!(text, "Eine Übung");

        let u = nc[5];
        assert_eq!(u.c, 'Ü');
        assert_eq!((u.start, u.end), (5, 8));
        assert_eq!((nc[6].start, nc[6].end), (8, 9));
    }

    #[test]
    fn test_normalize_keeps_uncomposable_marks_in_cluster() {
        let nc = chars("q\u{301}x");
        assert_eq!(nc.len(), 3);
        assert_eq!((nc[0].start, nc[0].end), (0, 3));
        assert_eq!((nc[1].start, nc[1].end), (0, 3));
        assert_eq!(nc[2].start, 3);
    }

    #[test]
    fn test_match_at() {
        let title = Title::new("In Progress").unwrap();
        assert_eq!(title.match_at(&chars("in progress To Do")), Some(11));
        assert_eq!(title.match_at(&chars("IN PROGRESS")), Some(11));
        assert_eq!(title.match_at(&chars("in  progress")), None);
        assert_eq!(title.match_at(&chars("in-progress")), None);
        assert_eq!(title.match_at(&chars("in prog")), None);
    }

    #[test]
    fn test_match_at_multibyte() {
        let title = Title::new("Größe").unwrap();
        assert_eq!(title.match_at(&chars("GRÖßE mit")), Some(5));
    }

    #[test]
    fn test_match_at_decomposed_content() {
        let title = Title::new("Übung").unwrap();
        assert_eq!(title.match_at(&chars("U\u{308}bung")), Some(5));
    }

    #[test]
    fn test_match_never_ends_inside_cluster() {
        let title = Title::new("q").unwrap();
        assert_eq!(title.match_at(&chars("q\u{301}")), None);
        assert_eq!(title.match_at(&chars("q")), Some(1));
    }

    #[test]
    fn test_match_at_is_literal() {
        let title = Title::new("c++ (lang)").unwrap();
        assert_eq!(title.match_at(&chars("C++ (Lang) rocks")), Some(10));
        assert_eq!(title.match_at(&chars("cxx (lang)")), None);
    }

    #[rstest]
    #[case("Page Two", TitleKey::Word("page".into()))]
    #[case("In-Progress", TitleKey::Word("in".into()))]
    #[case("c++ (lang)", TitleKey::Word("c".into()))]
    #[case("Mr测试", TitleKey::Word("mr".into()))]
    #[case("테스트 문서", TitleKey::Word("테스트".into()))]
    #[case("(lang)", TitleKey::Char('('))]
    #[case("测试", TitleKey::Char('测'))]
    #[case("テスト文書", TitleKey::Char('テ'))]
    fn test_title_key(#[case] title: &str, #[case] expected: TitleKey) {
        assert_eq!(Title::new(title).unwrap().key(), &expected);
    }

    #[test]
    fn test_index_first_seen_wins() {
        let index = TitleIndex::build(&["тест", "ТЕСТ", "Тест"]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.by_word("тест")[0].literal(), "тест");
    }

    #[test]
    fn test_index_ordering() {
        let index = TitleIndex::build(&["to", "To Do", "todo", "to do list", "tomato"]);
        let order: Vec<_> = index.by_word("to").iter().map(|t| t.literal()).collect();
        assert_eq!(order, vec!["to do list", "To Do", "to"]);
        assert_eq!(index.by_word("todo").len(), 1);
        assert_eq!(index.by_word("tomato").len(), 1);
    }

    #[test]
    fn test_index_groups_by_whole_first_word() {
        let titles: Vec<String> = (0..1000).map(|i| format!("s{i}x")).collect();
        let index = TitleIndex::build(&titles);

        assert_eq!(index.len(), 1000);
        assert!(index.by_word("see").is_empty());
        assert!(index.by_char('s').is_empty());
        assert_eq!(index.by_word("s7x").len(), 1);
    }

    #[test]
    fn test_index_char_groups() {
        let index = TitleIndex::build(&["测试", "测试文档", "(lang)"]);
        let order: Vec<_> = index.by_char('测').iter().map(|t| t.literal()).collect();
        assert_eq!(order, vec!["测试文档", "测试"]);
        assert_eq!(index.by_char('(').len(), 1);
    }

    #[test]
    fn test_empty_index() {
        let index = TitleIndex::build::<&str>(&[]);
        assert!(index.is_empty());
        assert!(index.by_word("a").is_empty());
        assert!(index.by_char('a').is_empty());
    }
}
