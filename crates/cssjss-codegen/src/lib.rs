//! CSS ↔ JSS Converter
//!
//! Converts CSS source into a JSS `makeStyles` module, and a JSS style
//! object back into CSS text.
//!
//! ```text
//! CSS source → Parser → Stylesheet → css_to_jss() → makeStyles module
//! JSON       → StyleObject        → jss_to_css() → CSS text
//! ```
//!
//! The two directions are not inverses. Fallbacks are emitted as nested
//! blocks on the way back and vendor-prefixed names lose their leading dash.

pub mod casing;
pub mod css;
pub mod jss;
pub mod unit;
pub mod value;

pub use css::{is_leaf_level, jss_to_css, json_to_css};
pub use jss::{css_to_jss, parse_stylesheet, render_styles_module, stylesheet_to_jss};
pub use value::{StyleObject, StyleValue, FALLBACKS_KEY};

use cssjss_parser::{ParseError, ParseOptions};

/// Options for CSS → JSS conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Unit removed from single numeric values (`"px"` turns `10px` into `10`).
    pub unit: Option<String>,
    /// Keep property names as written instead of camelCasing them.
    pub dashes: bool,
    /// Options passed through to the CSS parser.
    pub parse: ParseOptions,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn dashes(mut self, dashes: bool) -> Self {
        self.dashes = dashes;
        self
    }

    pub fn with_parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }

    /// The configured unit, if any. An empty unit counts as none.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref().filter(|unit| !unit.is_empty())
    }
}

/// Conversion error.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn px() -> ConvertOptions {
        ConvertOptions::new().with_unit("px")
    }

    /// The style object literal inside a rendered module.
    fn module_body(module: &str) -> StyleObject {
        let start = module.find("\n(").unwrap() + 2;
        let end = module.rfind("));").unwrap();
        serde_json::from_str(&module[start..end]).unwrap()
    }

    // =========================================================================
    // Options
    // =========================================================================

    #[test]
    fn test_options_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.unit(), None);
        assert!(!options.dashes);
        assert!(!options.parse.silent);
    }

    #[test]
    fn test_empty_unit_is_none() {
        assert_eq!(ConvertOptions::new().with_unit("").unit(), None);
        assert_eq!(px().unit(), Some("px"));
    }

    #[test]
    fn test_options_from_json() {
        let options: ConvertOptions =
            serde_json::from_str(r#"{"unit": "em", "parse": {"silent": true}}"#).unwrap();
        assert_eq!(options.unit(), Some("em"));
        assert!(!options.dashes);
        assert!(options.parse.silent);
    }

    // =========================================================================
    // End to end
    // =========================================================================

    #[test]
    fn test_css_to_jss_module_body() {
        let module = css_to_jss(
            ".card { padding: 8px; margin: 0 auto; }\n@media print { .card { display: none; } }",
            &px(),
        )
        .unwrap();
        let body = module_body(&module);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "card": { "padding": 8, "margin": "0 auto" },
                "@media print": { "card": { "display": "none" } }
            })
        );
    }

    #[test]
    fn test_round_trip_without_fallbacks() {
        let module = css_to_jss(".foo { width: 10px; font-size: 12px; }", &px()).unwrap();
        let css = jss_to_css(&module_body(&module));
        assert_eq!(css, "\n.foo {\n  width:10px;\nfont-size:12px;\n}");
    }

    #[test]
    fn test_round_trip_loses_vendor_dash() {
        let module = css_to_jss(".a { -webkit-box-flex: 1; }", &ConvertOptions::default()).unwrap();
        let css = jss_to_css(&module_body(&module));
        assert_eq!(css, "\n.a {\n  webkit-box-flex:1;\n}");
    }

    #[test]
    fn test_parse_error_message() {
        let options = ConvertOptions::new()
            .with_parse_options(ParseOptions::new().with_source("app.css"));
        let err = css_to_jss(".a {\n  color red;\n}", &options).unwrap_err();
        match err {
            ConvertError::Parse(e) => {
                assert_eq!(e.file.as_deref(), Some("app.css"));
                assert_eq!(e.line, 2);
            }
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    // =========================================================================
    // Properties
    // =========================================================================

    fn arb_selector() -> impl Strategy<Value = (String, String)> {
        ("[.#]", "[a-z][a-z0-9]{0,8}").prop_map(|(prefix, name)| (format!("{prefix}{name}"), name))
    }

    fn arb_properties() -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set("[a-z]{1,6}(-[a-z]{1,6}){0,2}", 1..6)
            .prop_map(|set| set.into_iter().collect())
    }

    /// `border-top-color` → `borderTopColor`, written out by hand.
    fn camel(property: &str) -> String {
        property
            .split('-')
            .enumerate()
            .map(|(i, word)| {
                if i == 0 {
                    word.to_string()
                } else {
                    word[..1].to_uppercase() + &word[1..]
                }
            })
            .collect()
    }

    fn rule(selector: &str, declarations: &[(String, u32)]) -> String {
        let body: String = declarations
            .iter()
            .map(|(property, n)| format!(" {property}: {n}px;"))
            .collect();
        format!("{selector} {{{body} }}")
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_single_rule_keys((selector, name) in arb_selector(), properties in arb_properties()) {
            let declarations: Vec<_> = properties.iter().map(|p| (p.clone(), 1)).collect();
            let sheet = cssjss_parser::Parser::parse(&rule(&selector, &declarations)).unwrap();
            let styles = stylesheet_to_jss(&sheet.rules, &ConvertOptions::default());

            let keys: Vec<_> = styles.keys().cloned().collect();
            prop_assert_eq!(keys, vec![name.clone()]);

            let style = styles[&name].as_object().unwrap();
            let expected: Vec<_> = properties.iter().map(|p| camel(p)).collect();
            prop_assert_eq!(style.keys().cloned().collect::<Vec<_>>(), expected);
        }

        #[test]
        fn prop_dashes_keeps_property_names((selector, name) in arb_selector(), properties in arb_properties()) {
            let declarations: Vec<_> = properties.iter().map(|p| (p.clone(), 2)).collect();
            let sheet = cssjss_parser::Parser::parse(&rule(&selector, &declarations)).unwrap();

            let dashed = stylesheet_to_jss(&sheet.rules, &ConvertOptions::new().dashes(true));
            let keys: Vec<_> = dashed[&name].as_object().unwrap().keys().cloned().collect();
            prop_assert_eq!(keys, properties.clone());

            let camelled = stylesheet_to_jss(&sheet.rules, &ConvertOptions::new().dashes(false));
            let keys: Vec<_> = camelled[&name].as_object().unwrap().keys().cloned().collect();
            prop_assert_eq!(keys, properties.iter().map(|p| camel(p)).collect::<Vec<_>>());
        }

        #[test]
        fn prop_round_trip_px_values(
            (selector, name) in arb_selector(),
            properties in arb_properties(),
            values in prop::collection::vec(0u32..10_000, 6),
        ) {
            let declarations: Vec<_> = properties.iter().cloned().zip(values).collect();
            let module = css_to_jss(&rule(&selector, &declarations), &px()).unwrap();

            let expected: String = declarations
                .iter()
                .map(|(property, n)| format!("{property}:{n}px;\n"))
                .collect();
            prop_assert_eq!(jss_to_css(&module_body(&module)), format!("\n.{name} {{\n  {expected}}}"));
        }
    }
}
