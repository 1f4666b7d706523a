//! Lenient parsing of response bodies.
//!
//! Some daemon builds emit `\u` escapes with five or six hex digits for characters outside the
//! basic multilingual plane. Those are not valid JSON, so they are replaced with the literal
//! character before parsing. Anything that still fails to parse is treated as an empty object.

use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use tracing::trace;

static WIDE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\\u([0-9a-f]{5,6})").expect("pattern is valid"));

/// Replaces five and six digit `\u` escapes with the character they name.
///
/// Escapes that do not name a valid character (surrogates, or anything past `U+10FFFF`) are
/// left untouched.
pub fn decode_wide_escapes(raw: &str) -> Cow<'_, str> {
    WIDE_ESCAPE.replace_all(raw, |caps: &Captures<'_>| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    })
}

/// Parses a response body into a JSON object, never failing.
///
/// Bodies that are not JSON, or JSON that is not an object, yield an empty map.
pub fn parse_body(raw: &str) -> Map<String, Value> {
    match serde_json::from_str(&decode_wide_escapes(raw)) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            trace!("Response body is not a JSON object: {other}");
            Map::new()
        }
        Err(e) => {
            trace!("Response body is not valid JSON: {e}");
            Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Builds the text of a `\u` escape with the given hex digits.
    fn esc(hex: &str) -> String {
        format!(r"\u{hex}")
    }

    #[test]
    fn five_digit_escape_is_decoded() {
        assert_eq!(decode_wide_escapes(&esc("00e90")), "\u{e90}");
        assert_eq!(
            decode_wide_escapes(&format!("\"a{}z\"", esc("1f600"))),
            "\"a\u{1f600}z\""
        );
    }

    #[test]
    fn six_digit_escape_is_decoded() {
        assert_eq!(decode_wide_escapes(&esc("01f600")), "\u{1f600}");
    }

    #[test]
    fn escape_match_is_case_insensitive() {
        assert_eq!(decode_wide_escapes(&esc("1F600")), "\u{1f600}");
    }

    #[test]
    fn four_digit_escape_is_untouched() {
        let raw = format!(r#"{{"name":"caf{}"}}"#, esc("00e9"));
        assert!(matches!(decode_wide_escapes(&raw), Cow::Borrowed(_)));
        assert_eq!(parse_body(&raw)["name"], "caf\u{e9}");
    }

    #[test]
    fn invalid_code_points_are_left_verbatim() {
        for hex in ["0d800", "0dfff", "110000", "ffffff"] {
            let raw = format!("x{}y", esc(hex));
            assert_eq!(decode_wide_escapes(&raw), raw);
        }
    }

    #[test]
    fn escape_digits_are_matched_greedily() {
        // The trailing `b` is a hex digit, so this reads as the out of range `\u1f600b`.
        let raw = format!("{}b", esc("1f600"));
        assert_eq!(decode_wide_escapes(&raw), raw);
    }

    #[test]
    fn invalid_escape_does_not_stop_other_replacements() {
        let raw = format!("{} {}", esc("110000"), esc("1f600"));
        assert_eq!(
            decode_wide_escapes(&raw),
            format!("{} \u{1f600}", esc("110000"))
        );
    }

    #[test]
    fn parses_sanitized_body() {
        let raw = format!(
            r#"{{"result":"success","arguments":{{"name":"{}"}}}}"#,
            esc("1f600")
        );
        let body = parse_body(&raw);
        assert_eq!(body["result"], "success");
        assert_eq!(body["arguments"], json!({ "name": "\u{1f600}" }));
    }

    #[test]
    fn invalid_json_yields_empty_object() {
        assert!(parse_body("<html>502 Bad Gateway</html>").is_empty());
        assert!(parse_body("").is_empty());
    }

    #[test]
    fn out_of_range_escape_does_not_abort_parsing() {
        // Left verbatim, the escape reads as a regular four digit one followed by digits.
        let body = parse_body(&format!(r#"{{"result":"{}"}}"#, esc("110000")));
        assert_eq!(body["result"], "\u{1100}00");
    }

    #[test]
    fn non_object_json_yields_empty_object() {
        assert!(parse_body("[1, 2, 3]").is_empty());
        assert!(parse_body("\"success\"").is_empty());
    }
}
