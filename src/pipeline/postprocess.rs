//! Post-processing: normalise the model's text before JSON decoding.
//!
//! Even with a declared JSON response type, models occasionally wrap the
//! object in a ```` ```json ```` fence or prefix it with a BOM. Only the
//! envelope around the JSON text is touched: a leading BOM, surrounding
//! whitespace and one outer fence. Characters inside the JSON (zero-width
//! joiners in emoji, soft hyphens) reach the decoder unchanged.

use once_cell::sync::Lazy;
use regex::Regex;

/// Clean a raw response payload. Returns `None` if nothing is left.
pub fn clean_response_text(input: &str) -> Option<String> {
    let s = strip_leading_bom(input);
    let s = strip_code_fences(s);
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ── Rule 1: Leading byte-order mark ──────────────────────────────────────────

fn strip_leading_bom(input: &str) -> &str {
    input.trim_start().trim_start_matches('\u{FEFF}')
}

// ── Rule 2: Strip outer code fences ──────────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```(?:json|JSON)?[ \t]*\r?\n(.*?)\r?\n?```\s*$").unwrap());

fn strip_code_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_plain_json_through() {
        assert_eq!(
            clean_response_text(r#"{"a":1}"#).as_deref(),
            Some(r#"{"a":1}"#)
        );
    }

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"a\":1}\n```\n";
        assert_eq!(clean_response_text(raw).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn strips_bare_fence_with_crlf() {
        let raw = "```\r\n{\"a\":1}\r\n```";
        assert_eq!(clean_response_text(raw).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn removes_leading_bom() {
        let raw = "\u{FEFF}{\"a\":1}";
        assert_eq!(clean_response_text(raw).as_deref(), Some("{\"a\":1}"));
        let fenced = "\u{FEFF}```json\n{\"a\":1}\n```";
        assert_eq!(clean_response_text(fenced).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn invisible_characters_inside_values_survive() {
        let raw = "{\"summary\":\"Dev \u{1F469}\u{200D}\u{1F4BB} lead\",\"s\":\"co\u{00AD}operative\u{200B}\"}";
        assert_eq!(clean_response_text(raw).as_deref(), Some(raw));
    }

    #[test]
    fn blank_is_none() {
        assert_eq!(clean_response_text(""), None);
        assert_eq!(clean_response_text("  \n\t"), None);
        assert_eq!(clean_response_text("```json\n```"), None);
    }

    #[test]
    fn inner_fences_are_left_alone() {
        let raw = "{\"summary\": \"uses ```code``` blocks\"}";
        assert_eq!(clean_response_text(raw).as_deref(), Some(raw));
    }
}
