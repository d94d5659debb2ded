//! `key: value` property lines and value coercion.
//!
//! Every block except the diagram body carries indented property lines.
//! Values are coerced the same way everywhere:
//!
//! | text | value |
//! |------|-------|
//! | `true` / `false` | [`PropertyValue::Bool`] |
//! | a finite number (`2`, `-0.5`, `1e3`) | [`PropertyValue::Number`] |
//! | anything else | [`PropertyValue::Str`], with one surrounding quote stripped on each side |

use animflow_core::semantic::PropertyValue;

/// Coerces raw property text into a typed value.
///
/// Coercion never fails: text that is neither a boolean nor a finite number
/// falls back to a string.
///
/// # Examples
///
/// ```
/// use animflow_core::semantic::PropertyValue;
/// use animflow_parser::coerce;
///
/// assert_eq!(coerce("true"), PropertyValue::Bool(true));
/// assert_eq!(coerce("1.5"), PropertyValue::Number(1.5));
/// assert_eq!(coerce("1.5s"), PropertyValue::Str("1.5s".to_string()));
/// assert_eq!(coerce("\"#FFD700\""), PropertyValue::Str("#FFD700".to_string()));
/// ```
pub fn coerce(raw: &str) -> PropertyValue {
    let value = raw.trim();
    match value {
        "true" => PropertyValue::Bool(true),
        "false" => PropertyValue::Bool(false),
        _ => match value.parse::<f64>() {
            Ok(number) if number.is_finite() => PropertyValue::Number(number),
            _ => PropertyValue::Str(strip_quotes(value).to_string()),
        },
    }
}

/// Removes at most one leading and one trailing quote (`"` or `'`).
pub(crate) fn strip_quotes(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

/// Splits a trimmed `key: value` line at its first colon.
///
/// Returns `None` when there is no colon or the key is empty.
pub(crate) fn split_property(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}

/// Converts a kebab-case key to camelCase (`stroke-width` → `strokeWidth`).
pub(crate) fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Reads the leading number of a value such as `2px` or `14`.
pub(crate) fn leading_number(value: &str) -> Option<f32> {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || *c == '.' || (*i == 0 && matches!(*c, '-' | '+'))))
        .map_or(value.len(), |(i, _)| i);
    value[..end].parse::<f32>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_coerce_literals() {
        assert_eq!(coerce("false"), PropertyValue::Bool(false));
        assert_eq!(coerce(" 42 "), PropertyValue::Number(42.0));
        assert_eq!(coerce("-0.25"), PropertyValue::Number(-0.25));
        assert_eq!(coerce("fadeIn"), PropertyValue::Str("fadeIn".to_string()));
    }

    #[test]
    fn test_coerce_keeps_case_sensitive_booleans_as_text() {
        assert_eq!(coerce("True"), PropertyValue::Str("True".to_string()));
    }

    #[test]
    fn test_coerce_non_finite_falls_back_to_text() {
        assert_eq!(coerce("inf"), PropertyValue::Str("inf".to_string()));
        assert_eq!(coerce("NaN"), PropertyValue::Str("NaN".to_string()));
    }

    #[test]
    fn test_coerce_empty_is_empty_text() {
        assert_eq!(coerce(""), PropertyValue::Str(String::new()));
    }

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"hello\""), "hello");
        assert_eq!(strip_quotes("'hello'"), "hello");
        assert_eq!(strip_quotes("\"mixed'"), "mixed");
        assert_eq!(strip_quotes("\"\"quoted\"\""), "\"quoted\"");
        assert_eq!(strip_quotes("\""), "");
        assert_eq!(strip_quotes("it's"), "it's");
    }

    #[test]
    fn test_split_property() {
        assert_eq!(split_property("duration: 1s"), Some(("duration", "1s")));
        assert_eq!(
            split_property("text: Step one: the client"),
            Some(("text", "Step one: the client"))
        );
        assert_eq!(split_property("color:"), Some(("color", "")));
        assert_eq!(split_property(": value"), None);
        assert_eq!(split_property("no colon"), None);
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("stroke-width"), "strokeWidth");
        assert_eq!(camel_case("border-radius"), "borderRadius");
        assert_eq!(camel_case("fill"), "fill");
        assert_eq!(camel_case("fontSize"), "fontSize");
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("2px"), Some(2.0));
        assert_eq!(leading_number("14"), Some(14.0));
        assert_eq!(leading_number("1.5em"), Some(1.5));
        assert_eq!(leading_number("bold"), None);
    }

    proptest! {
        #[test]
        fn coercion_is_total(raw in ".*") {
            match coerce(&raw) {
                PropertyValue::Number(n) => prop_assert!(n.is_finite()),
                PropertyValue::Bool(b) => prop_assert_eq!(raw.trim(), if b { "true" } else { "false" }),
                PropertyValue::Str(s) => prop_assert!(s.len() <= raw.trim().len()),
            }
        }
    }
}
