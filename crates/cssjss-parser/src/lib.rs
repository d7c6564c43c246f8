//! CSS Parser
//!
//! Parses CSS source text into a stylesheet tree of rules and declarations.
//! Tokenizing is done by `cssparser`. The tree keeps source order and keeps
//! comments as their own nodes, so consumers decide what to do with them.
//!
//! Recognized at-rules: `@media`, `@keyframes` (with vendor prefixes),
//! `@font-face`, `@supports`, `@document`, `@page`, `@host`,
//! `@custom-media`, `@import`, `@charset` and `@namespace`. Any other
//! at-rule is parsed as an ordinary rule whose selector starts with `@`.
//!
//! # Example
//!
//! ```
//! use cssjss_parser::{Parser, Rule};
//!
//! let sheet = Parser::parse(".a { color: red; }").unwrap();
//! assert!(matches!(sheet.rules[0], Rule::Style(_)));
//! ```

pub mod ast;
pub mod parser;

pub use ast::{
    Declaration, DeclarationNode, Keyframe, KeyframeNode, KeyframesRule, MediaRule, Rule,
    Stylesheet, StyleRule,
};
pub use parser::Parser;

/// Parser error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Parse error at line {line}, column {column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// Name of the source the CSS came from, when the caller supplied one.
    pub file: Option<String>,
}

/// Options controlling how a stylesheet is parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Name of the source, attached to every error.
    pub source: Option<String>,
    /// Collect errors into [`Stylesheet::parsing_errors`] and keep going
    /// instead of stopping at the first one.
    pub silent: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}
