//! # Autolinker
//!
//! Links bare mentions of known page titles in note text, leaving code,
//! existing links, properties, queries and workflow markers untouched.
//!
//! This crate re-exports the public API of `autolinker-core` and
//! `autolinker-parser`, adds helpers for hosts that keep their title list and
//! settings in files, and ships the `autolinker` command line tool.
//!
//! ```
//! use autolinker::prelude::*;
//!
//! let linker = Linker::new(&["Logseq", "page"], LinkOptions::default());
//! let outcome = linker.link("a logseq page, `page` in code");
//! assert_eq!(outcome.content, "a [[Logseq]] [[page]], `page` in code");
//! ```

use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub use autolinker_core::prelude::*;
pub use autolinker_core::{LinkerConfigBuilder, error};
pub use autolinker_parser::{
    Linker, MarkerExclusion, Title, TitleIndex, WorkflowMarker, find_matches, leading_marker,
    replace_content_with_page_links, rewrite, segment,
};

/// Read a title list: one title per line, surrounding whitespace trimmed,
/// blank lines skipped.
pub fn read_titles<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut titles = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let title = line.trim();
        if !title.is_empty() {
            titles.push(title.to_string());
        }
    }
    Ok(titles)
}

/// Read a title list from a file. See [`read_titles`].
pub fn read_titles_file(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(Error::file_not_found(path));
    }
    let titles = read_titles(BufReader::new(File::open(path)?))?;
    log::debug!("Read {} titles from {}", titles.len(), path.display());
    Ok(titles)
}

/// Load a YAML config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<LinkerConfig> {
    match path {
        Some(path) => LinkerConfig::load(path),
        None => Ok(LinkerConfig::default()),
    }
}

/// Machine-readable summary of one linking run.
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport {
    pub changed: bool,
    pub matches: Vec<TitleMatch>,
    pub content: String,
}

impl From<LinkOutcome<'_>> for LinkReport {
    fn from(outcome: LinkOutcome<'_>) -> Self {
        Self {
            changed: outcome.changed(),
            matches: outcome.matches,
            content: outcome.content.into_owned(),
        }
    }
}

impl LinkReport {
    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Re-export commonly used types
pub mod prelude {
    pub use autolinker_core::prelude::*;
    pub use autolinker_parser::prelude::*;

    pub use crate::{LinkReport, load_config, read_titles, read_titles_file};
}
