//! CSS → JSS conversion.
//!
//! Walks a parsed stylesheet once, building a style object keyed by
//! selector or at-rule, then renders it as a `makeStyles` hook module.
//!
//! ```text
//! .foo { width: 10px; }   →   makeStyles((theme) => ({ "foo": { "width": 10 } }))
//! ```

use cssjss_parser::{
    Declaration, DeclarationNode, KeyframeNode, Parser, Rule, StyleRule, Stylesheet,
};
use tracing::{debug, trace, warn};

use crate::casing::format_property;
use crate::unit::strip_unit;
use crate::value::{StyleObject, StyleValue, FALLBACKS_KEY};
use crate::{ConvertError, ConvertOptions};

/// Text before the style object literal.
const MODULE_HEAD: &str = "\nimport { makeStyles } from \"@material-ui/core/styles\";\n\n\
                           export const useStyles = makeStyles((theme) => \n(";

/// Text after the style object literal.
const MODULE_TAIL: &str = "));\n";

/// Convert CSS source into a `makeStyles` module.
///
/// A stylesheet without rules produces an empty string.
pub fn css_to_jss(code: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
    let sheet = parse_stylesheet(code, options)?;
    if sheet.rules.is_empty() {
        return Ok(String::new());
    }

    let styles = stylesheet_to_jss(&sheet.rules, options);
    debug!(keys = styles.len(), "converted stylesheet to JSS");
    render_styles_module(&styles)
}

/// Parse CSS with the parser options in `options`.
///
/// In lenient mode every collected error is logged and the partial
/// stylesheet is returned.
pub fn parse_stylesheet(code: &str, options: &ConvertOptions) -> Result<Stylesheet, ConvertError> {
    let sheet = Parser::parse_with(code, &options.parse)?;
    for error in &sheet.parsing_errors {
        warn!(%error, "recovered from CSS syntax error");
    }
    Ok(sheet)
}

/// Map top-level rules to a style object.
///
/// Plain rules, `@media`, `@font-face` and `@keyframes` are converted.
/// Comments and every other rule kind are skipped.
pub fn stylesheet_to_jss(rules: &[Rule], options: &ConvertOptions) -> StyleObject {
    let mut styles = StyleObject::new();

    for rule in rules {
        match rule {
            Rule::Style(style) => add_rule(style, &mut styles, options),
            Rule::Media(media) => {
                edit_object(&mut styles, format!("@media {}", media.media), |block| {
                    for nested in &media.rules {
                        match nested {
                            Rule::Style(style) => add_rule(style, block, options),
                            Rule::Comment(_) => {}
                            other => debug!(kind = other.kind(), "skipping rule nested in @media"),
                        }
                    }
                });
            }
            Rule::FontFace(nodes) => {
                edit_object(&mut styles, "@font-face".to_string(), |block| {
                    for decl in declarations(nodes) {
                        block.insert(
                            format_property(&decl.property, options.dashes),
                            StyleValue::Scalar(decl.value.clone()),
                        );
                    }
                });
            }
            Rule::Keyframes(keyframes) => {
                edit_object(&mut styles, format!("@keyframes {}", keyframes.name), |block| {
                    for node in &keyframes.keyframes {
                        let KeyframeNode::Keyframe(frame) = node else {
                            continue;
                        };
                        edit_object(block, frame.values.join(", "), |frame_block| {
                            for decl in declarations(&frame.declarations) {
                                frame_block.insert(
                                    format_property(&decl.property, options.dashes),
                                    strip_unit(&decl.value, options.unit()),
                                );
                            }
                        });
                    }
                });
            }
            Rule::Comment(_) => {}
            other => debug!(kind = other.kind(), "skipping unsupported rule"),
        }
    }

    styles
}

/// Render a style object as a `makeStyles` hook module.
pub fn render_styles_module(styles: &StyleObject) -> Result<String, ConvertError> {
    let literal = serde_json::to_string_pretty(styles)?;
    Ok(format!("{MODULE_HEAD}{literal}{MODULE_TAIL}"))
}

/// Merge a plain rule into `styles`.
///
/// A property seen again moves its earlier value to the front of the
/// rule's `fallbacks` list before being overwritten.
fn add_rule(rule: &StyleRule, styles: &mut StyleObject, options: &ConvertOptions) {
    let selector = rule.selectors.join(", ");
    let key = selector
        .strip_prefix(['.', '#'])
        .unwrap_or(&selector)
        .to_string();

    edit_object(styles, key, |style| {
        for decl in declarations(&rule.declarations) {
            let property = format_property(&decl.property, options.dashes);

            if let Some(previous) = style.get(&property).cloned() {
                trace!(%property, "keeping earlier value as fallback");
                push_fallback(style, StyleObject::from([(property.clone(), previous)]));
            }

            // Values end up inside a string literal
            let value = match strip_unit(&decl.value, options.unit()) {
                StyleValue::Scalar(text) => StyleValue::Scalar(text.replace('\\', "\\\\")),
                other => other,
            };
            style.insert(property, value);
        }
    });
}

fn declarations(nodes: &[DeclarationNode]) -> impl Iterator<Item = &Declaration> {
    nodes.iter().filter_map(|node| match node {
        DeclarationNode::Declaration(decl) => Some(decl),
        DeclarationNode::Comment(_) => None,
    })
}

/// Run `edit` on the object stored under `key`.
///
/// A missing key is appended; a non-object value is replaced by an empty
/// object. An existing key keeps its position.
fn edit_object(styles: &mut StyleObject, key: String, edit: impl FnOnce(&mut StyleObject)) {
    let mut object = match styles.get_mut(&key) {
        Some(StyleValue::Nested(object)) => std::mem::take(object),
        _ => StyleObject::new(),
    };
    edit(&mut object);
    styles.insert(key, StyleValue::Nested(object));
}

/// Put `fallback` at the front of the rule's `fallbacks` list.
fn push_fallback(style: &mut StyleObject, fallback: StyleObject) {
    let mut list = match style.get_mut(FALLBACKS_KEY) {
        Some(StyleValue::FallbackList(list)) => std::mem::take(list),
        _ => Vec::new(),
    };
    list.insert(0, fallback);
    style.insert(FALLBACKS_KEY.to_string(), StyleValue::FallbackList(list));
}
