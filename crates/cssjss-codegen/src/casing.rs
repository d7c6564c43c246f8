//! Property name casing.
//!
//! CSS uses kebab-case (`border-top-color`), JSS uses camelCase
//! (`borderTopColor`). Vendor prefixes keep their leading dash in CSS and
//! become a leading capital in JSS (`-webkit-transform` → `WebkitTransform`).
//!
//! The two directions are not inverses: `kebab_case("WebkitTransform")` is
//! `webkit-transform`, without the leading dash.

use heck::ToLowerCamelCase;

/// Convert to camelCase: `font-size` → `fontSize`, `FONT_SIZE` → `fontSize`.
///
/// Any non-alphanumeric run separates words; digits stay with their word.
pub fn camel_case(input: &str) -> String {
    input.to_lower_camel_case()
}

/// Convert a camelCase key to kebab-case.
///
/// Splits before every ASCII capital, joins with `-` and lowercases the
/// result. Consecutive capitals each start a piece: `MSGrid` → `m-s-grid`.
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            out.push('-');
        }
        out.push(c);
    }
    out.to_lowercase()
}

/// Name a CSS property the way JSS expects it.
///
/// With `dashes` set the name is used verbatim. Otherwise it is camelCased,
/// and a vendor-prefixed name (leading `-`) gets a capital first letter.
pub fn format_property(property: &str, dashes: bool) -> String {
    if dashes {
        return property.to_string();
    }
    let name = camel_case(property);
    if property.starts_with('-') {
        upper_first(&name)
    } else {
        name
    }
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
