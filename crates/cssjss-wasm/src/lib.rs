//! WASM bindings for the CSS/JSS converter.
//!
//! Exposes `cssToJss()`, `cssToStyles()` and `jssToCss()` to JavaScript via
//! wasm-bindgen. Conversion errors are thrown as JS errors.

use cssjss_codegen::{ConvertError, ConvertOptions};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Convert CSS source to a `makeStyles` module.
///
/// `unit` is stripped from single numeric values; `dashes` keeps property
/// names as written. Returns an empty string for a stylesheet without rules.
#[wasm_bindgen(js_name = cssToJss)]
pub fn css_to_jss(code: &str, unit: Option<String>, dashes: bool) -> Result<String, JsError> {
    convert_css(code, &options(unit, dashes)).map_err(to_js_error)
}

/// Convert CSS source to a plain JS style object instead of module text.
///
/// `options` is `undefined` or `{ unit?, dashes?, parse?: { source?, silent? } }`.
#[wasm_bindgen(js_name = cssToStyles)]
pub fn css_to_styles(code: &str, options: JsValue) -> Result<JsValue, JsError> {
    let options: ConvertOptions = if options.is_undefined() || options.is_null() {
        ConvertOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options)
            .map_err(|e| JsError::new(&format!("Invalid options: {e}")))?
    };

    let sheet = cssjss_codegen::parse_stylesheet(code, &options).map_err(to_js_error)?;
    let styles = cssjss_codegen::stylesheet_to_jss(&sheet.rules, &options);

    // Plain objects rather than Maps, so callers can index by key
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    styles
        .serialize(&serializer)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Convert a JSS style object to CSS text.
///
/// Accepts either the object itself or its JSON text. Objects go through
/// `JSON.stringify`, so members whose value is `undefined` (or a function)
/// are dropped before conversion instead of rendering as `undefined`.
#[wasm_bindgen(js_name = jssToCss)]
pub fn jss_to_css(styles: JsValue) -> Result<String, JsError> {
    let json = match styles.as_string() {
        Some(text) => text,
        None => js_sys::JSON::stringify(&styles)
            .map_err(|_| JsError::new("Style object is not serialisable"))?
            .into(),
    };
    convert_json(&json).map_err(to_js_error)
}

/// Get the converter version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn options(unit: Option<String>, dashes: bool) -> ConvertOptions {
    let options = ConvertOptions::new().dashes(dashes);
    match unit {
        Some(unit) => options.with_unit(unit),
        None => options,
    }
}

fn convert_css(code: &str, options: &ConvertOptions) -> Result<String, ConvertError> {
    cssjss_codegen::css_to_jss(code, options)
}

fn convert_json(json: &str) -> Result<String, ConvertError> {
    cssjss_codegen::json_to_css(json)
}

fn to_js_error(error: ConvertError) -> JsError {
    JsError::new(&error.to_string())
}
