//! JSS → CSS conversion.
//!
//! Every object-valued key becomes a `.key { ... }` block. Scalar keys
//! become `kebab-key:value;` lines, with `px` appended to numbers.
//! The output is not pretty-printed; it mirrors the JSS tree directly.

use std::borrow::Cow;

use tracing::debug;

use crate::casing::kebab_case;
use crate::value::{StyleObject, StyleValue};
use crate::ConvertError;

/// Convert a style object to CSS text.
pub fn jss_to_css(styles: &StyleObject) -> String {
    let mut out = String::new();

    for (key, value) in styles {
        match as_object(value) {
            Some(object) => {
                let body = if is_leaf_level(value) {
                    declarations(&object)
                } else {
                    jss_to_css(&object)
                };
                out.push_str(&format!("\n.{key} {{\n  {body}}}"));
            }
            None => {
                if let Some(line) = declaration(key, value) {
                    out.push_str(&line);
                }
            }
        }
    }

    out
}

/// Parse JSON text as a style object and convert it to CSS.
///
/// A top-level array is read as an object keyed by index.
pub fn json_to_css(json: &str) -> Result<String, ConvertError> {
    let value: StyleValue = serde_json::from_str(json)?;
    let Some(styles) = as_object(&value) else {
        return Err(ConvertError::Json(serde::de::Error::custom(
            "expected a style object or array",
        )));
    };
    debug!(keys = styles.len(), "converting JSS to CSS");
    Ok(jss_to_css(&styles))
}

/// Whether a value holds no nested objects.
///
/// Scalars are leaves. An object or list is a leaf when none of its
/// children is an object or list, so a fallback list is a leaf only when
/// empty.
pub fn is_leaf_level(value: &StyleValue) -> bool {
    match value {
        StyleValue::Nested(object) => !object.values().any(StyleValue::is_object),
        StyleValue::FallbackList(list) => list.is_empty(),
        StyleValue::List(list) => !list.iter().any(StyleValue::is_object),
        _ => true,
    }
}

/// Declarations for the scalar entries of an object, objects skipped.
fn declarations(object: &StyleObject) -> String {
    object
        .iter()
        .filter_map(|(key, value)| declaration(key, value))
        .collect()
}

/// One `property:value;` line. Numbers get a `px` suffix.
fn declaration(key: &str, value: &StyleValue) -> Option<String> {
    let text = value.css_text()?;
    let suffix = if matches!(value, StyleValue::Number(_)) {
        "px"
    } else {
        ""
    };
    Some(format!("{}:{text}{suffix};\n", kebab_case(key)))
}

/// View a value as an object. A list is keyed by index: `"0"`, `"1"`, ...
fn as_object(value: &StyleValue) -> Option<Cow<'_, StyleObject>> {
    match value {
        StyleValue::Nested(object) => Some(Cow::Borrowed(object)),
        StyleValue::FallbackList(list) => Some(Cow::Owned(
            list.iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), StyleValue::Nested(item.clone())))
                .collect(),
        )),
        StyleValue::List(list) => Some(Cow::Owned(
            list.iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item.clone()))
                .collect(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn styles(json: &str) -> StyleObject {
        serde_json::from_str(json).unwrap()
    }

    // =========================================================================
    // is_leaf_level
    // =========================================================================

    #[test]
    fn test_scalars_are_leaves() {
        assert!(is_leaf_level(&StyleValue::from("red")));
        assert!(is_leaf_level(&StyleValue::Number(1.0)));
        assert!(is_leaf_level(&StyleValue::Null));
    }

    #[test]
    fn test_flat_object_is_leaf() {
        let value = StyleValue::Nested(styles(r#"{"width": 10, "color": "red"}"#));
        assert!(is_leaf_level(&value));
        assert!(is_leaf_level(&StyleValue::Nested(StyleObject::new())));
    }

    #[test]
    fn test_object_with_child_object_is_not_leaf() {
        let value = StyleValue::Nested(styles(r#"{"color": "red", "bar": {"color": "blue"}}"#));
        assert!(!is_leaf_level(&value));

        let value = StyleValue::Nested(styles(r#"{"fallbacks": [{"display": "box"}]}"#));
        assert!(!is_leaf_level(&value));
    }

    #[test]
    fn test_fallback_list_leaf_only_when_empty() {
        assert!(is_leaf_level(&StyleValue::FallbackList(Vec::new())));
        assert!(!is_leaf_level(&StyleValue::FallbackList(vec![StyleObject::new()])));
    }

    // =========================================================================
    // jss_to_css
    // =========================================================================

    #[test]
    fn test_flat_rule() {
        let css = jss_to_css(&styles(r#"{"foo": {"width": 10, "color": "red"}}"#));
        assert_eq!(css, "\n.foo {\n  width:10px;\ncolor:red;\n}");
    }

    #[test]
    fn test_nested_rule() {
        let css = jss_to_css(&styles(r#"{"foo": {"bar": {"color": "red"}}}"#));
        assert_eq!(css, "\n.foo {\n  \n.bar {\n  color:red;\n}}");
    }

    #[test]
    fn test_mixed_rule_keeps_scalars_inline() {
        let css = jss_to_css(&styles(r#"{"foo": {"color": "red", "bar": {"margin": 0}}}"#));
        assert_eq!(css, "\n.foo {\n  color:red;\n\n.bar {\n  margin:0px;\n}}");
    }

    #[test]
    fn test_keys_kebab_cased() {
        let css = jss_to_css(&styles(r#"{"a": {"fontSize": 12, "WebkitTransform": "none"}}"#));
        assert_eq!(css, "\n.a {\n  font-size:12px;\nwebkit-transform:none;\n}");
    }

    #[test]
    fn test_top_level_scalar() {
        let css = jss_to_css(&styles(r#"{"zIndex": 3, "color": "red"}"#));
        assert_eq!(css, "z-index:3px;\ncolor:red;\n");
    }

    #[test]
    fn test_fractional_and_literal_values() {
        let css = jss_to_css(&styles(r#"{"a": {"opacity": 0.5, "flag": true, "none": null}}"#));
        assert_eq!(css, "\n.a {\n  opacity:0.5px;\nflag:true;\nnone:null;\n}");
    }

    #[test]
    fn test_fallbacks_rendered_by_index() {
        let css = jss_to_css(&styles(
            r#"{"a": {"display": "flex", "fallbacks": [{"display": "-webkit-box"}]}}"#,
        ));
        assert_eq!(
            css,
            "\n.a {\n  display:flex;\n\n.fallbacks {\n  \n.0 {\n  display:-webkit-box;\n}}}"
        );
    }

    #[test]
    fn test_scalar_list_rendered_by_index() {
        let css = jss_to_css(&styles(r#"{"a":{"transition":["x","y"]}}"#));
        assert_eq!(css, "\n.a {\n  \n.transition {\n  0:x;\n1:y;\n}}");
    }

    #[test]
    fn test_scalar_list_is_leaf() {
        let list = StyleValue::List(vec![StyleValue::from("x"), StyleValue::Number(1.0)]);
        assert!(is_leaf_level(&list));

        let nested = StyleValue::List(vec![StyleValue::Nested(StyleObject::new())]);
        assert!(!is_leaf_level(&nested));
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(jss_to_css(&StyleObject::new()), "");
        assert_eq!(jss_to_css(&styles(r#"{"a": {}}"#)), "\n.a {\n  }");
    }

    // =========================================================================
    // json_to_css
    // =========================================================================

    #[test]
    fn test_json_to_css() {
        let css = json_to_css(r#"{"foo": {"width": 10}}"#).unwrap();
        assert_eq!(css, "\n.foo {\n  width:10px;\n}");
    }

    #[test]
    fn test_json_to_css_top_level_array() {
        assert_eq!(json_to_css("[1, 2]").unwrap(), "0:1px;\n1:2px;\n");
        assert_eq!(
            json_to_css(r#"[{"color": "red"}]"#).unwrap(),
            "\n.0 {\n  color:red;\n}"
        );
    }

    #[test]
    fn test_json_to_css_rejects_invalid_json() {
        assert!(matches!(json_to_css("{"), Err(ConvertError::Json(_))));
        assert!(matches!(json_to_css("\"red\""), Err(ConvertError::Json(_))));
    }
}
