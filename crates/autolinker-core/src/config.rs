//! Rendering options and host configuration.
//!
//! [`LinkOptions`] decides how a matched title is written back.
//! [`LinkerConfig`] wraps it with the caller-side limits a host applies
//! before handing titles to the linker, and follows a builder pattern with
//! validation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a single match is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStyle {
    /// `[[label]]`
    Brackets,
    /// `#label`, or `#[[label]]` when the label contains whitespace
    Tag,
}

impl LinkStyle {
    /// Render a resolved label in this style.
    ///
    /// # Example
    /// ```
    /// use autolinker_core::LinkStyle;
    ///
    /// assert_eq!(LinkStyle::Brackets.render("page"), "[[page]]");
    /// assert_eq!(LinkStyle::Tag.render("page"), "#page");
    /// assert_eq!(LinkStyle::Tag.render("two words"), "#[[two words]]");
    /// ```
    pub fn render(self, label: &str) -> String {
        match self {
            Self::Brackets => format!("[[{}]]", label),
            Self::Tag if label.chars().any(char::is_whitespace) => format!("#[[{}]]", label),
            Self::Tag => format!("#{}", label),
        }
    }
}

/// Output formatting flags.
///
/// Both flags false (the default) produces bracket links everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    /// Render every match as a tag
    pub parse_as_tags: bool,
    /// Render single-word matches as tags, phrases as bracket links
    pub parse_single_word_as_tag: bool,
}

impl LinkOptions {
    /// Bracket links for everything.
    pub fn brackets() -> Self {
        Self::default()
    }

    /// Tags for everything.
    pub fn tags() -> Self {
        Self {
            parse_as_tags: true,
            parse_single_word_as_tag: false,
        }
    }

    /// Tags for single words, bracket links for phrases.
    pub fn single_word_tags() -> Self {
        Self {
            parse_as_tags: false,
            parse_single_word_as_tag: true,
        }
    }

    /// Builder method to enable tag output.
    pub fn with_tags(mut self) -> Self {
        self.parse_as_tags = true;
        self
    }

    /// Builder method to enable single-word tag output.
    pub fn with_single_word_tags(mut self) -> Self {
        self.parse_single_word_as_tag = true;
        self
    }

    /// Pick the rendering for a title with `word_count` words.
    ///
    /// | parse_as_tags | parse_single_word_as_tag | 1 word | phrase |
    /// |---|---|---|---|
    /// | false | false | brackets | brackets |
    /// | true | any | tag | tag |
    /// | false | true | tag | brackets |
    pub fn style_for(&self, word_count: usize) -> LinkStyle {
        if self.parse_as_tags || (self.parse_single_word_as_tag && word_count <= 1) {
            LinkStyle::Tag
        } else {
            LinkStyle::Brackets
        }
    }
}

/// Host-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkerConfig {
    /// Rendering flags
    pub options: LinkOptions,
    /// Refuse title lists longer than this
    pub max_titles: Option<usize>,
    /// Drop titles shorter than this many characters before linking
    pub min_title_chars: usize,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            options: LinkOptions::default(),
            max_titles: None,
            min_title_chars: 1,
        }
    }
}

impl LinkerConfig {
    /// Create new configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new config with builder
    pub fn builder() -> LinkerConfigBuilder {
        LinkerConfigBuilder::new()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_titles == Some(0) {
            return Err(Error::config_error("max_titles must be greater than zero"));
        }
        if self.min_title_chars == 0 {
            return Err(Error::config_error(
                "min_title_chars must be at least 1 (empty titles never match)",
            ));
        }
        Ok(())
    }

    /// Apply the title limits, returning the titles that should be indexed.
    ///
    /// Order is preserved so first-seen tie-breaking still holds downstream.
    pub fn select_titles<S: AsRef<str>>(&self, titles: &[S]) -> Result<Vec<String>> {
        if let Some(max) = self.max_titles
            && titles.len() > max
        {
            return Err(Error::invalid_titles(format!(
                "{} titles exceeds the configured maximum of {}",
                titles.len(),
                max
            )));
        }

        let selected: Vec<String> = titles
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| t.chars().count() >= self.min_title_chars)
            .map(str::to_string)
            .collect();

        if selected.len() < titles.len() {
            log::debug!(
                "Dropped {} titles shorter than {} chars",
                titles.len() - selected.len(),
                self.min_title_chars
            );
        }

        Ok(selected)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config_error(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config_error(format!(
                "Failed to load configuration from {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml_str(&content)
    }
}

/// Builder for LinkerConfig
#[derive(Debug, Default)]
pub struct LinkerConfigBuilder {
    config: LinkerConfig,
}

impl LinkerConfigBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the rendering flags
    pub fn options(mut self, options: LinkOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Cap the number of titles accepted
    pub fn max_titles(mut self, max: usize) -> Self {
        self.config.max_titles = Some(max);
        self
    }

    /// Set the minimum title length in characters
    pub fn min_title_chars(mut self, min: usize) -> Self {
        self.config.min_title_chars = min;
        self
    }

    /// Build and validate
    pub fn build(self) -> Result<LinkerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
