//! Stylesheet parser on top of the `cssparser` tokenizer.
//!
//! `cssparser` handles strings, escapes, comments and block nesting; this
//! module turns its token stream into the [`Stylesheet`] tree. Selectors,
//! preludes and values are kept as the verbatim source text of their tokens
//! (comments left out), so `url(a;b)`, `"}"` and `.a\{b` survive untouched.
//!
//! In silent mode errors are recorded and parsing resumes at the next
//! declaration or rule, so malformed input still yields as many rules as can
//! be recovered.

use cssparser::{
    Delimiter, ParseError as CssParseError, Parser as CssParser, ParserInput, ParserState,
    SourceLocation, Token,
};
use tracing::debug;

use crate::ast::{
    CustomMediaRule, Declaration, DeclarationNode, DocumentRule, Keyframe, KeyframeNode,
    KeyframesRule, MediaRule, PageRule, Rule, StyleRule, Stylesheet, SupportsRule,
};
use crate::{ParseError, ParseOptions};

type ParseResult<T> = Result<T, ParseError>;

/// CSS stylesheet parser.
pub struct Parser {
    silent: bool,
    file: Option<String>,
    errors: Vec<ParseError>,
}

impl Parser {
    fn new(options: &ParseOptions) -> Self {
        Self {
            silent: options.silent,
            file: options.source.clone(),
            errors: Vec::new(),
        }
    }

    /// Parse a stylesheet, stopping at the first error.
    pub fn parse(source: &str) -> ParseResult<Stylesheet> {
        Self::parse_with(source, &ParseOptions::default())
    }

    /// Parse a stylesheet with explicit options.
    pub fn parse_with(source: &str, options: &ParseOptions) -> ParseResult<Stylesheet> {
        let mut input = ParserInput::new(source);
        let mut css = CssParser::new(&mut input);

        let mut parser = Parser::new(options);
        let rules = parser.parse_rules(&mut css)?;
        debug!(
            rules = rules.len(),
            errors = parser.errors.len(),
            "parsed stylesheet"
        );
        Ok(Stylesheet {
            rules,
            parsing_errors: parser.errors,
        })
    }

    // =========================================================================
    // Rules
    // =========================================================================

    /// Parse rules until the end of the input or of the enclosing block.
    fn parse_rules(&mut self, input: &mut CssParser<'_, '_>) -> ParseResult<Vec<Rule>> {
        let mut rules = Vec::new();

        loop {
            let state = input.state();
            let token = match input.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };

            match token {
                Token::WhiteSpace(_) | Token::Semicolon | Token::CDO | Token::CDC => {}
                Token::Comment(text) => {
                    if self.comment_closed(input, &state)? {
                        rules.push(Rule::Comment(text.to_string()));
                    }
                }
                Token::CloseCurlyBracket => {
                    debug!(line = state.source_location().line + 1, "skipping unmatched '}}'");
                }
                Token::AtKeyword(name) => {
                    let name = name.to_ascii_lowercase();
                    if let Some(rule) = self.parse_at_rule(&name, &state, input)? {
                        rules.push(rule);
                    }
                }
                _ => {
                    input.reset(&state);
                    if let Some(rule) = self.parse_style_rule(input)? {
                        rules.push(rule);
                    }
                }
            }
        }

        Ok(rules)
    }

    /// Parse `selectors { declarations }`.
    fn parse_style_rule(&mut self, input: &mut CssParser<'_, '_>) -> ParseResult<Option<Rule>> {
        let location = input.current_source_location();
        let selectors = until_block(input, true);

        if selectors.iter().all(String::is_empty) {
            self.error_at(location, "selector missing")?;
            skip_block(input);
            return Ok(None);
        }

        let declarations = self.parse_declaration_block(input, None)?.unwrap_or_default();
        Ok(Some(Rule::Style(StyleRule {
            selectors,
            declarations,
        })))
    }

    // =========================================================================
    // At-rules
    // =========================================================================

    /// Dispatch on an at-keyword that has just been consumed. Unknown
    /// at-rules are re-read from `start` as plain rules.
    fn parse_at_rule(
        &mut self,
        name: &str,
        start: &ParserState,
        input: &mut CssParser<'_, '_>,
    ) -> ParseResult<Option<Rule>> {
        if let Some(vendor) = vendor_keyword(name, "keyframes") {
            return self.parse_keyframes(vendor, input);
        }
        if let Some(vendor) = vendor_keyword(name, "document") {
            let document = prelude(input);
            let Some(rules) = self.parse_group(input, "document")? else {
                return Ok(None);
            };
            return Ok(Some(Rule::Document(DocumentRule {
                document,
                vendor,
                rules,
            })));
        }

        match name {
            "media" => {
                let media = prelude(input);
                let rules = self.parse_group(input, "media")?;
                Ok(rules.map(|rules| Rule::Media(MediaRule { media, rules })))
            }
            "supports" => {
                let supports = prelude(input);
                let rules = self.parse_group(input, "supports")?;
                Ok(rules.map(|rules| Rule::Supports(SupportsRule { supports, rules })))
            }
            "host" => {
                prelude(input);
                Ok(self.parse_group(input, "host")?.map(Rule::Host))
            }
            "page" => {
                let selectors: Vec<String> = until_block(input, true)
                    .into_iter()
                    .filter(|s| !s.is_empty())
                    .collect();
                let declarations = self.parse_declaration_block(input, Some("page"))?;
                Ok(declarations.map(|declarations| {
                    Rule::Page(PageRule {
                        selectors,
                        declarations,
                    })
                }))
            }
            "font-face" => {
                prelude(input);
                Ok(self
                    .parse_declaration_block(input, Some("font-face"))?
                    .map(Rule::FontFace))
            }
            "custom-media" => match custom_media(input) {
                Some(rule) => Ok(Some(rule)),
                None => self.reparse_as_style_rule(start, input),
            },
            "import" | "charset" | "namespace" => {
                let Some(value) = statement(input) else {
                    return self.reparse_as_style_rule(start, input);
                };
                Ok(Some(match name {
                    "import" => Rule::Import(value),
                    "charset" => Rule::Charset(value),
                    _ => Rule::Namespace(value),
                }))
            }
            _ => self.reparse_as_style_rule(start, input),
        }
    }

    fn reparse_as_style_rule(
        &mut self,
        start: &ParserState,
        input: &mut CssParser<'_, '_>,
    ) -> ParseResult<Option<Rule>> {
        input.reset(start);
        self.parse_style_rule(input)
    }

    /// `@keyframes name { frames }`, also `@-webkit-keyframes` and friends.
    fn parse_keyframes(
        &mut self,
        vendor: Option<String>,
        input: &mut CssParser<'_, '_>,
    ) -> ParseResult<Option<Rule>> {
        let location = input.current_source_location();
        let name = prelude(input);
        if name.is_empty() {
            self.error_at(location, "@keyframes missing name")?;
            skip_block(input);
            return Ok(None);
        }

        if !self.open_block(input, Some("keyframes"))? {
            return Ok(None);
        }
        let keyframes = self.nested_block(input, Some("keyframes"), |this, block| {
            this.parse_keyframe_list(block)
        })?;

        Ok(Some(Rule::Keyframes(KeyframesRule {
            name,
            vendor,
            keyframes,
        })))
    }

    fn parse_keyframe_list(
        &mut self,
        input: &mut CssParser<'_, '_>,
    ) -> ParseResult<Vec<KeyframeNode>> {
        let mut nodes = Vec::new();

        loop {
            let state = input.state();
            let token = match input.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };

            match token {
                Token::WhiteSpace(_) | Token::Semicolon => {}
                Token::Comment(text) => {
                    if self.comment_closed(input, &state)? {
                        nodes.push(KeyframeNode::Comment(text.to_string()));
                    }
                }
                _ => {
                    input.reset(&state);
                    if let Some(frame) = self.parse_keyframe(input)? {
                        nodes.push(KeyframeNode::Keyframe(frame));
                    }
                }
            }
        }

        Ok(nodes)
    }

    /// A single frame: `0%, 50.5% { ... }`, `from { ... }`.
    fn parse_keyframe(&mut self, input: &mut CssParser<'_, '_>) -> ParseResult<Option<Keyframe>> {
        let location = input.current_source_location();
        let values = until_block(input, true);

        if values.iter().all(String::is_empty) {
            self.error_at(location, "selector missing")?;
            skip_block(input);
            return Ok(None);
        }

        let declarations = self.parse_declaration_block(input, None)?.unwrap_or_default();
        Ok(Some(Keyframe {
            values,
            declarations,
        }))
    }

    /// Parse `{ rules }` for a grouping at-rule.
    fn parse_group(
        &mut self,
        input: &mut CssParser<'_, '_>,
        name: &str,
    ) -> ParseResult<Option<Vec<Rule>>> {
        if !self.open_block(input, Some(name))? {
            return Ok(None);
        }
        let rules = self.nested_block(input, Some(name), |this, block| this.parse_rules(block))?;
        Ok(Some(rules))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Parse `{ declarations }`. Returns `None` when the opening brace is missing.
    fn parse_declaration_block(
        &mut self,
        input: &mut CssParser<'_, '_>,
        context: Option<&str>,
    ) -> ParseResult<Option<Vec<DeclarationNode>>> {
        if !self.open_block(input, context)? {
            return Ok(None);
        }
        let nodes = self.nested_block(input, context, |this, block| this.parse_declarations(block))?;
        Ok(Some(nodes))
    }

    fn parse_declarations(
        &mut self,
        input: &mut CssParser<'_, '_>,
    ) -> ParseResult<Vec<DeclarationNode>> {
        let mut nodes = Vec::new();

        loop {
            let state = input.state();
            let token = match input.next_including_whitespace_and_comments() {
                Ok(token) => token.clone(),
                Err(_) => break,
            };

            match token {
                Token::WhiteSpace(_) | Token::Semicolon => {}
                Token::Comment(text) => {
                    if self.comment_closed(input, &state)? {
                        nodes.push(DeclarationNode::Comment(text.to_string()));
                    }
                }
                _ => {
                    input.reset(&state);
                    if let Some(declaration) = self.parse_declaration(input)? {
                        nodes.push(DeclarationNode::Declaration(declaration));
                    }
                }
            }
        }

        Ok(nodes)
    }

    /// Parse `property: value` up to and including the next `;`.
    fn parse_declaration<'i>(
        &mut self,
        input: &mut CssParser<'i, '_>,
    ) -> ParseResult<Option<Declaration>> {
        let location = input.current_source_location();
        let parsed = input.parse_until_after(Delimiter::Semicolon, |p| {
            let property = property_name(p)?;
            Ok::<_, CssParseError<'i, ()>>(Declaration::new(property, source_text(p)))
        });

        match parsed {
            Ok(declaration) => Ok(Some(declaration)),
            Err(_) => {
                self.error_at(location, "property missing ':'")?;
                Ok(None)
            }
        }
    }

    // =========================================================================
    // Blocks and errors
    // =========================================================================

    /// Consume the `{` that opens a block, reporting it when absent.
    fn open_block(
        &mut self,
        input: &mut CssParser<'_, '_>,
        context: Option<&str>,
    ) -> ParseResult<bool> {
        let state = input.state();
        if matches!(input.next(), Ok(Token::CurlyBracketBlock)) {
            return Ok(true);
        }
        input.reset(&state);
        self.error_at(input.current_source_location(), missing(context, "'{'"))?;
        Ok(false)
    }

    /// Run `parse` over the block whose `{` was just consumed, then check
    /// that the block was closed rather than cut off by the end of input.
    fn nested_block<'i, T>(
        &mut self,
        input: &mut CssParser<'i, '_>,
        context: Option<&str>,
        parse: impl for<'tt> FnOnce(&mut Self, &mut CssParser<'i, 'tt>) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let nested = input.parse_nested_block(|block| {
            let value = parse(self, block);
            drain(block);
            Ok::<_, CssParseError<'i, ()>>((value, block.position()))
        });

        let (value, end) = match nested {
            Ok(nested) => nested,
            Err(error) => return Err(self.make_error(error.location, "unbalanced block")),
        };
        let value = value?;

        if !input.slice_from(end).ends_with('}') {
            self.error_at(input.current_source_location(), missing(context, "'}'"))?;
        }
        Ok(value)
    }

    /// Check that the comment token read from `start` has its `*/`.
    fn comment_closed(
        &mut self,
        input: &CssParser<'_, '_>,
        start: &ParserState,
    ) -> ParseResult<bool> {
        let text = input.slice_from(start.position());
        if text.len() >= 4 && text.ends_with("*/") {
            return Ok(true);
        }
        self.error_at(start.source_location(), "End of comment missing")?;
        Ok(false)
    }

    /// Report an error. Silent parsers record it and carry on.
    fn error_at(&mut self, location: SourceLocation, message: impl Into<String>) -> ParseResult<()> {
        let error = self.make_error(location, message);
        if self.silent {
            self.errors.push(error);
            Ok(())
        } else {
            Err(error)
        }
    }

    fn make_error(&self, location: SourceLocation, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            line: location.line as usize + 1,
            column: location.column as usize,
            file: self.file.clone(),
        }
    }
}

fn missing(context: Option<&str>, what: &str) -> String {
    match context {
        Some(rule) => format!("@{rule} missing {what}"),
        None => format!("missing {what}"),
    }
}

/// `keyframes` → `Some(None)`, `-webkit-keyframes` → `Some(Some("-webkit-"))`.
fn vendor_keyword(name: &str, keyword: &str) -> Option<Option<String>> {
    match name.strip_suffix(keyword)? {
        "" => Some(None),
        vendor if vendor.len() > 2 && vendor.starts_with('-') && vendor.ends_with('-') => {
            Some(Some(vendor.to_string()))
        }
        _ => None,
    }
}

/// `--name <query>;`
fn custom_media(input: &mut CssParser<'_, '_>) -> Option<Rule> {
    let text = statement(input)?;
    let (name, media) = text.split_once(char::is_whitespace)?;
    let media = media.trim();
    if !name.starts_with("--") || name.len() < 3 || media.is_empty() {
        return None;
    }
    Some(Rule::CustomMedia(CustomMediaRule {
        name: name.to_string(),
        media: media.to_string(),
    }))
}

/// Prelude of a statement at-rule plus its `;`. `None` when the prelude is
/// empty or a block follows instead.
fn statement(input: &mut CssParser<'_, '_>) -> Option<String> {
    let value = prelude(input);
    let state = input.state();
    if !matches!(input.next(), Ok(Token::Semicolon) | Err(_)) {
        input.reset(&state);
        return None;
    }
    (!value.is_empty()).then_some(value)
}

// =============================================================================
// Token helpers
// =============================================================================

/// Text of an at-rule prelude, up to its block or `;`.
fn prelude<'i>(input: &mut CssParser<'i, '_>) -> String {
    input
        .parse_until_before(Delimiter::CurlyBracketBlock | Delimiter::Semicolon, |p| {
            Ok::<_, CssParseError<'i, ()>>(source_text(p))
        })
        .unwrap_or_default()
}

/// Text up to the next `{`, split at top-level commas when `split` is set.
fn until_block<'i>(input: &mut CssParser<'i, '_>, split: bool) -> Vec<String> {
    input
        .parse_until_before(Delimiter::CurlyBracketBlock, |p| {
            Ok::<_, CssParseError<'i, ()>>(source_pieces(p, split))
        })
        .unwrap_or_default()
}

/// Consume a whole `{ ... }` block if one comes next.
fn skip_block(input: &mut CssParser<'_, '_>) {
    let state = input.state();
    if !matches!(input.next(), Ok(Token::CurlyBracketBlock)) {
        input.reset(&state);
    }
}

/// Property name up to and including its `:`. Accepts the `*zoom` and
/// `color[ie]` hacks.
fn property_name<'i>(input: &mut CssParser<'i, '_>) -> Result<String, CssParseError<'i, ()>> {
    let start = input.position();
    loop {
        let end = input.position();
        let token = input.next_including_whitespace_and_comments()?.clone();
        match token {
            Token::Colon => {
                let name = input.slice(start..end).trim();
                if name.is_empty() || name.contains(char::is_whitespace) {
                    return Err(input.new_custom_error(()));
                }
                return Ok(name.to_string());
            }
            Token::Ident(_) | Token::WhiteSpace(_) | Token::Delim('*') | Token::Delim('_') => {}
            Token::SquareBracketBlock => skip_contents(input),
            _ => return Err(input.new_custom_error(())),
        }
    }
}

fn source_text(input: &mut CssParser<'_, '_>) -> String {
    source_pieces(input, false).concat()
}

/// Verbatim source of the remaining tokens, trimmed, comments left out.
/// Commas inside functions, brackets and strings never split.
fn source_pieces(input: &mut CssParser<'_, '_>, split: bool) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    loop {
        let start = input.position();
        let token = match input.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        match token {
            Token::Comment(_) => continue,
            Token::Comma if split => {
                pieces.push(current.trim().to_string());
                current.clear();
                continue;
            }
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => skip_contents(input),
            _ => {}
        }
        current.push_str(input.slice_from(start));
    }

    pieces.push(current.trim().to_string());
    pieces
}

/// Consume the contents of the block whose opening token was just read.
fn skip_contents<'i>(input: &mut CssParser<'i, '_>) {
    let _ = input.parse_nested_block(|block| {
        drain(block);
        Ok::<_, CssParseError<'i, ()>>(())
    });
}

fn drain(input: &mut CssParser<'_, '_>) {
    while input.next_including_whitespace_and_comments().is_ok() {}
}
