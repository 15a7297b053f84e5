//! # Autolinker Parser
//!
//! Rewrites bare mentions of known page titles into `[[links]]` or `#tags`,
//! without touching text that already carries meaning.
//!
//! ## Architecture
//!
//! A single forward pipeline, one module per stage:
//!
//! 1. [`zones`] - partitions content into linkable text and protected spans
//!    (code, links, page references, tags, macros, URLs, property keys,
//!    query blocks)
//! 2. [`titles`] - folds titles and groups them for longest-first lookup
//! 3. [`markers`] - carves leading workflow markers (`TODO`, `NOW`, ...) out
//!    of the linkable text
//! 4. [`matcher`] - finds non-overlapping title occurrences, resolves casing,
//!    renders and splices them back
//!
//! [`Linker`] runs the pipeline against a prebuilt index.
//!
//! ## Quick Start
//!
//! ```
//! use autolinker_parser::replace_content_with_page_links;
//!
//! let (content, changed) = replace_content_with_page_links(
//!     &["page"],
//!     "page before ```\npage within code\n```",
//!     false,
//!     false,
//! );
//! assert!(changed);
//! assert_eq!(content, "[[page]] before ```\npage within code\n```");
//! ```
//!
//! ## Guarantees
//!
//! - Linking never fails, for any input
//! - Titles are matched as literal text, never as patterns
//! - Protected spans come out byte-identical
//! - Content without matches is returned unchanged with `changed == false`

pub mod engine;
pub mod markers;
pub mod matcher;
pub mod titles;
pub mod zones;

pub use engine::Linker;
pub use markers::{MarkerExclusion, WorkflowMarker, leading_marker};
pub use matcher::{find_matches, rewrite};
pub use titles::{Title, TitleIndex, TitleKey};
pub use zones::segment;

// Re-export core types for consumers (no need to depend on autolinker-core separately)
pub use autolinker_core::{LinkOptions, LinkOutcome, LinkStyle, Span, TitleMatch, ZoneKind};

/// Replace title mentions in `content` with page links or tags.
///
/// Returns the new content and whether anything changed. When nothing
/// changed the content is returned as given. A fresh index is built per call;
/// use [`Linker`] to reuse one.
///
/// # Example
/// ```
/// use autolinker_parser::replace_content_with_page_links;
///
/// let (content, changed) = replace_content_with_page_links(
///     &["one", "multiple words"],
///     "This one becomes a tag but multiple words get brackets",
///     false,
///     true,
/// );
/// assert!(changed);
/// assert_eq!(content, "This #one becomes a tag but [[multiple words]] get brackets");
/// ```
pub fn replace_content_with_page_links<S: AsRef<str>>(
    titles: &[S],
    content: &str,
    parse_as_tags: bool,
    parse_single_word_as_tag: bool,
) -> (String, bool) {
    let options = LinkOptions {
        parse_as_tags,
        parse_single_word_as_tag,
    };
    Linker::new(titles, options).link(content).into_parts()
}

/// Convenient prelude for common imports.
pub mod prelude {
    pub use autolinker_core::{LineIndex, LinkOptions, LinkOutcome, LinkStyle, Span, TitleMatch, ZoneKind};

    pub use crate::{Linker, Title, TitleIndex, WorkflowMarker};
    pub use crate::{find_matches, leading_marker, replace_content_with_page_links, rewrite, segment};
}
