//! Style values.
//!
//! A JSS style sheet is a tree of ordered objects. Keys are selectors,
//! at-rules or property names; values are scalars or further objects.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

/// An insertion-ordered style object.
pub type StyleObject = IndexMap<String, StyleValue>;

/// Key under which duplicate declarations keep their earlier values.
pub const FALLBACKS_KEY: &str = "fallbacks";

/// Largest integer a JavaScript number holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A value in a style object.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// Text value: `"red"`, `"10px 20px"`
    Scalar(String),

    /// Numeric value: `10`, `0.5`
    Number(f64),

    /// A nested style object (rule body, media block, keyframe).
    Nested(StyleObject),

    /// Earlier values of duplicated properties, each a single-entry object.
    FallbackList(Vec<StyleObject>),

    /// Any other JSON array, e.g. `["opacity 1s", "transform 2s"]`.
    List(Vec<StyleValue>),

    /// `true` / `false` from JSON input.
    Boolean(bool),

    /// `null` from JSON input.
    Null,
}

impl StyleValue {
    /// Whether the value is an object or a list rather than a scalar.
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            StyleValue::Nested(_) | StyleValue::FallbackList(_) | StyleValue::List(_)
        )
    }

    pub fn as_object(&self) -> Option<&StyleObject> {
        match self {
            StyleValue::Nested(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Scalar(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Text of a scalar as written into CSS. `None` for objects.
    pub fn css_text(&self) -> Option<String> {
        match self {
            StyleValue::Scalar(text) => Some(text.clone()),
            StyleValue::Number(n) => Some(format_number(*n)),
            StyleValue::Boolean(b) => Some(b.to_string()),
            StyleValue::Null => Some("null".into()),
            StyleValue::Nested(_) | StyleValue::FallbackList(_) | StyleValue::List(_) => None,
        }
    }
}

impl From<&str> for StyleValue {
    fn from(text: &str) -> Self {
        StyleValue::Scalar(text.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(text: String) -> Self {
        StyleValue::Scalar(text)
    }
}

impl From<f64> for StyleValue {
    fn from(n: f64) -> Self {
        StyleValue::Number(n)
    }
}

impl From<StyleObject> for StyleValue {
    fn from(object: StyleObject) -> Self {
        StyleValue::Nested(object)
    }
}

/// Format a number the way JavaScript's `String(n)` does.
///
/// Plain decimal between `1e-6` and `1e21`, exponent form with an explicit
/// sign outside it: `1e-7`, `1.5e+300`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if (1e-6..1e21).contains(&n.abs()) {
        return format!("{n}");
    }

    let text = format!("{n:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

// =========================================================================
// Serde
// =========================================================================

/// Numbers go out through `serde_json`, which writes exponents without a
/// `+` (`1e21`) and switches to exponent form below `1e-5`, where
/// `JSON.stringify` writes `1e+21` and `0.000001`. Integers up to
/// `Number.MAX_SAFE_INTEGER` print as plain digits in both.
impl Serialize for StyleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StyleValue::Scalar(text) => serializer.serialize_str(text),
            StyleValue::Number(n) if !n.is_finite() => serializer.serialize_unit(),
            StyleValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            StyleValue::Number(n) => serializer.serialize_f64(*n),
            StyleValue::Nested(object) => object.serialize(serializer),
            StyleValue::FallbackList(list) => list.serialize(serializer),
            StyleValue::List(list) => list.serialize(serializer),
            StyleValue::Boolean(b) => serializer.serialize_bool(*b),
            StyleValue::Null => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for StyleValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(StyleValueVisitor)
    }
}

struct StyleValueVisitor;

impl<'de> Visitor<'de> for StyleValueVisitor {
    type Value = StyleValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, style object or array")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<StyleValue, E> {
        Ok(StyleValue::Boolean(b))
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(n as f64))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(n as f64))
    }

    fn visit_f64<E: de::Error>(self, n: f64) -> Result<StyleValue, E> {
        Ok(StyleValue::Number(n))
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<StyleValue, E> {
        Ok(StyleValue::Scalar(text.to_string()))
    }

    fn visit_string<E: de::Error>(self, text: String) -> Result<StyleValue, E> {
        Ok(StyleValue::Scalar(text))
    }

    fn visit_unit<E: de::Error>(self) -> Result<StyleValue, E> {
        Ok(StyleValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<StyleValue, E> {
        Ok(StyleValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<StyleValue, D::Error> {
        StyleValue::deserialize(deserializer)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<StyleValue, A::Error> {
        let mut object = StyleObject::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, StyleValue>()? {
            object.insert(key, value);
        }
        Ok(StyleValue::Nested(object))
    }

    /// An array of objects reads as a fallback list, anything else as a
    /// plain list.
    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<StyleValue, A::Error> {
        let mut list = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<StyleValue>()? {
            list.push(value);
        }

        if !list.iter().all(|value| matches!(value, StyleValue::Nested(_))) {
            return Ok(StyleValue::List(list));
        }
        let objects = list
            .into_iter()
            .filter_map(|value| match value {
                StyleValue::Nested(object) => Some(object),
                _ => None,
            })
            .collect();
        Ok(StyleValue::FallbackList(objects))
    }
}
