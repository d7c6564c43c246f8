//! Stylesheet tree.
//!
//! Rules and declarations appear in source order. Comments are kept as
//! nodes at every level (between rules, inside declaration blocks and
//! between keyframes).

use crate::ParseError;

/// A parsed stylesheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
    /// Errors collected while parsing in silent mode. Always empty otherwise.
    pub parsing_errors: Vec<ParseError>,
}

/// A rule in a stylesheet or inside a grouping at-rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// `a, .b { ... }`
    Style(StyleRule),

    /// `/* ... */`
    Comment(String),

    /// `@media <query> { rules }`
    Media(MediaRule),

    /// `@keyframes <name> { frames }`, optionally vendor prefixed.
    Keyframes(KeyframesRule),

    /// `@font-face { declarations }`
    FontFace(Vec<DeclarationNode>),

    /// `@supports <condition> { rules }`
    Supports(SupportsRule),

    /// `@document <matcher> { rules }`, optionally vendor prefixed.
    Document(DocumentRule),

    /// `@page <selectors> { declarations }`
    Page(PageRule),

    /// `@host { rules }`
    Host(Vec<Rule>),

    /// `@custom-media --name <query>;`
    CustomMedia(CustomMediaRule),

    /// `@import <target>;`
    Import(String),

    /// `@charset <encoding>;`
    Charset(String),

    /// `@namespace <prefix url>;`
    Namespace(String),
}

impl Rule {
    /// Short name of the rule kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Style(_) => "rule",
            Rule::Comment(_) => "comment",
            Rule::Media(_) => "media",
            Rule::Keyframes(_) => "keyframes",
            Rule::FontFace(_) => "font-face",
            Rule::Supports(_) => "supports",
            Rule::Document(_) => "document",
            Rule::Page(_) => "page",
            Rule::Host(_) => "host",
            Rule::CustomMedia(_) => "custom-media",
            Rule::Import(_) => "import",
            Rule::Charset(_) => "charset",
            Rule::Namespace(_) => "namespace",
        }
    }
}

/// A plain selector rule.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selectors: Vec<String>,
    pub declarations: Vec<DeclarationNode>,
}

/// An entry of a declaration block.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationNode {
    Declaration(Declaration),
    Comment(String),
}

/// `property: value`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaRule {
    pub media: String,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyframesRule {
    pub name: String,
    /// Vendor prefix of the at-keyword, e.g. `-webkit-`.
    pub vendor: Option<String>,
    pub keyframes: Vec<KeyframeNode>,
}

/// An entry of a `@keyframes` block.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyframeNode {
    Keyframe(Keyframe),
    Comment(String),
}

/// A single frame: `0%, 100% { ... }` or `from { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframe {
    pub values: Vec<String>,
    pub declarations: Vec<DeclarationNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupportsRule {
    pub supports: String,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRule {
    pub document: String,
    pub vendor: Option<String>,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageRule {
    pub selectors: Vec<String>,
    pub declarations: Vec<DeclarationNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomMediaRule {
    pub name: String,
    pub media: String,
}
