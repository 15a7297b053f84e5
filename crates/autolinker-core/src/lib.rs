//! # Autolinker Core
//!
//! Core data models, rendering options, configuration and error types shared
//! by the autolinker crates.
//!
//! ## Architecture Principles
//!
//! - **Infallible transform**: linking never fails; [`Error`] only covers host-facing I/O and config
//! - **Type-Driven Design**: zones, styles and markers are enums, not strings
//! - **Offsets, not copies**: spans and matches index into the caller's content
//! - **Builder Pattern for Configuration**: [`LinkerConfig`] is built and validated
//!
//! ## Core Modules
//!
//! - [`models`] - Spans, zone kinds, matches and positions
//! - [`config`] - Rendering options and host configuration
//! - [`error`] - Error types and Result alias
//!
//! ## Usage Examples
//!
//! ```
//! use autolinker_core::prelude::*;
//!
//! let options = LinkOptions::single_word_tags();
//! assert_eq!(options.style_for(1).render("one"), "#one");
//! assert_eq!(options.style_for(2).render("multiple words"), "[[multiple words]]");
//! ```

pub mod config;
pub mod error;
pub mod models;

pub use config::*;
pub use error::{Error, Result};
pub use models::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{LinkOptions, LinkStyle, LinkerConfig};
    pub use crate::error::{Error, Result};
    pub use crate::models::{LineIndex, LinkOutcome, SourcePosition, Span, TitleMatch, ZoneKind};
}
