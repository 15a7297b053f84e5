//! Linking engine - wires the pipeline stages together.
//!
//! Segment -> marker exclusion -> match -> rewrite. The [`Linker`] owns the
//! title index and rendering options so a host can link many blocks against
//! the same title set without rebuilding the index.

use autolinker_core::{LinkOptions, LinkOutcome, LinkerConfig, Result};

use crate::markers::{apply_exclusions, find_markers};
use crate::matcher::{find_matches, rewrite};
use crate::titles::TitleIndex;
use crate::zones::segment;

/// Rewrites bare title mentions into links or tags.
///
/// Immutable once built; share it freely across threads.
///
/// # Example
/// ```
/// use autolinker_core::LinkOptions;
/// use autolinker_parser::Linker;
///
/// let linker = Linker::new(&["page", "multiple words"], LinkOptions::tags());
/// let outcome = linker.link("This page has multiple words");
///
/// assert!(outcome.changed());
/// assert_eq!(outcome.content, "This #page has #[[multiple words]]");
/// ```
#[derive(Debug, Clone)]
pub struct Linker {
    index: TitleIndex,
    options: LinkOptions,
}

impl Linker {
    /// Build a linker over `titles`.
    pub fn new<S: AsRef<str>>(titles: &[S], options: LinkOptions) -> Self {
        Self {
            index: TitleIndex::build(titles),
            options,
        }
    }

    /// Build a linker after applying the host limits in `config`.
    pub fn from_config<S: AsRef<str>>(titles: &[S], config: &LinkerConfig) -> Result<Self> {
        config.validate()?;
        let selected = config.select_titles(titles)?;
        Ok(Self::new(&selected, config.options))
    }

    pub fn options(&self) -> &LinkOptions {
        &self.options
    }

    pub fn index(&self) -> &TitleIndex {
        &self.index
    }

    /// Link one piece of content. Never fails; content with no matches is
    /// returned borrowed.
    pub fn link<'a>(&self, content: &'a str) -> LinkOutcome<'a> {
        if content.is_empty() || self.index.is_empty() {
            return LinkOutcome::unchanged(content);
        }

        let spans = segment(content);
        let markers = find_markers(content, &spans);
        let spans = apply_exclusions(spans, &markers);
        let matches = find_matches(content, &spans, &self.index, &self.options);

        log::debug!(
            "Linked {} bytes: {} spans, {} markers excluded, {} matches",
            content.len(),
            spans.len(),
            markers.len(),
            matches.len()
        );

        LinkOutcome {
            content: rewrite(content, &matches),
            matches,
        }
    }
}
