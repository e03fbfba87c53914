//! Whitespace, control-character and punctuation normalization

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static MULTI_NEWLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid newline regex"));
static SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("Invalid space regex"));
static SPACE_BEFORE_NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" +\n").expect("Invalid space regex"));
static SPACE_AFTER_NEWLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n +").expect("Invalid space regex"));
static CONTROL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]").expect("Invalid control regex"));
static CONTROL_CHARS_AND_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x1F\x7F]").expect("Invalid control regex"));
static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("Invalid space regex"));

/// Skill tokens that would be destroyed by naive punctuation stripping.
/// Each is swapped for a private-use-area sentinel before stripping and
/// restored verbatim afterwards; the sentinels contain no ASCII
/// punctuation, so the round trip is bit-exact.
const PROTECTED_TOKENS: [(&str, &str); 4] = [
    ("C++", "\u{E000}0\u{E000}"),
    ("C#", "\u{E000}1\u{E000}"),
    ("Pro/Engineer", "\u{E000}2\u{E000}"),
    ("GD&T", "\u{E000}3\u{E000}"),
];

/// Clean raw resume text for downstream extraction.
///
/// Applies Unicode NFC normalization, collapses 3+ newlines to exactly
/// two, collapses space/tab runs to one space while preserving
/// newlines, and strips spaces adjacent to newlines.
pub fn clean_text(raw_text: &str) -> String {
    if raw_text.is_empty() {
        return String::new();
    }

    let text: String = raw_text.nfc().collect();
    let text = MULTI_NEWLINE.replace_all(&text, "\n\n");
    let text = SPACE_RUN.replace_all(&text, " ");
    let text = SPACE_BEFORE_NEWLINE.replace_all(&text, "\n");
    let text = SPACE_AFTER_NEWLINE.replace_all(&text, "\n");

    text.trim().to_string()
}

/// Strip non-printable control characters.
///
/// Carriage returns are always removed. When `keep_newlines` is false,
/// newlines and tabs are removed as well.
pub fn remove_special_characters(text: &str, keep_newlines: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let cleaned = if keep_newlines {
        CONTROL_CHARS.replace_all(text, "")
    } else {
        CONTROL_CHARS_AND_NEWLINES.replace_all(text, "")
    };
    let cleaned = cleaned.replace('\r', "");

    cleaned.trim().to_string()
}

/// Replace punctuation with spaces ahead of skill matching, keeping
/// `/` and `&` and the protected compound tokens intact.
pub fn normalize_punctuation_for_skills(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut text = text.to_string();
    for (token, placeholder) in PROTECTED_TOKENS {
        text = text.replace(token, placeholder);
    }

    let mut text: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_punctuation() && c != '/' && c != '&' {
                ' '
            } else {
                c
            }
        })
        .collect();

    for (token, placeholder) in PROTECTED_TOKENS {
        text = text.replace(placeholder, token);
    }

    let text = MULTI_SPACE.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_whitespace() {
        let cleaned = clean_text("  Python    Developer  \n\n\n\n  React  ");
        assert_eq!(cleaned, "Python Developer\n\nReact");
    }

    #[test]
    fn test_clean_text_empty() {
        assert_eq!(clean_text(""), "");
    }

    #[test]
    fn test_clean_text_preserves_single_newlines() {
        assert_eq!(clean_text("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_remove_special_characters_keeps_newlines() {
        let cleaned = remove_special_characters("Python\x00\x01Developer\nReact", true);
        assert_eq!(cleaned, "PythonDeveloper\nReact");
    }

    #[test]
    fn test_remove_special_characters_strips_newlines() {
        let cleaned = remove_special_characters("Python\tDeveloper\nReact", false);
        assert_eq!(cleaned, "PythonDeveloperReact");
    }

    #[test]
    fn test_remove_special_characters_strips_carriage_returns() {
        assert_eq!(remove_special_characters("a\r\nb", true), "a\nb");
        assert_eq!(remove_special_characters("a\r\nb", false), "ab");
    }

    #[test]
    fn test_punctuation_protects_compound_tokens() {
        let normalized = normalize_punctuation_for_skills("C++, C#; Pro/Engineer (GD&T)");
        assert!(normalized.contains("C++"));
        assert!(normalized.contains("C#"));
        assert!(normalized.contains("Pro/Engineer"));
        assert!(normalized.contains("GD&T"));
        assert!(!normalized.contains(','));
        assert!(!normalized.contains('('));
    }

    #[test]
    fn test_punctuation_replaced_with_spaces() {
        let normalized = normalize_punctuation_for_skills("Python, Django! React?");
        assert_eq!(normalized, "Python Django React");
    }

    #[test]
    fn test_punctuation_keeps_slash_and_ampersand() {
        let normalized = normalize_punctuation_for_skills("TCP/IP and R&D");
        assert_eq!(normalized, "TCP/IP and R&D");
    }

    #[test]
    fn test_punctuation_idempotent() {
        let input = "Jane (C++, C#) - Pro/Engineer & GD&T; jane@example.com";
        let once = normalize_punctuation_for_skills(input);
        let twice = normalize_punctuation_for_skills(&once);
        assert_eq!(once, twice);
    }
}
