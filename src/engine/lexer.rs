//! Backslash escaping and escape-aware splitting.
//!
//! The language has a single escape character, `\`. Splitting never decodes
//! escapes: it only skips the character after a backslash so that escaped
//! separators stay inside their segment. Decoding happens later, with
//! [`unescape`], once a segment's role is known.

use crate::{Error, Result};

/// Decode backslash escapes: `\n` is a newline, `\x` is `x` for any other
/// character. A backslash with nothing after it is an error.
pub fn unescape(s: &str) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(escaped) => out.push(escaped),
            None => return Err(Error::TrailingBackslash),
        }
    }
    Ok(out)
}

/// Split `s` at every unescaped character accepted by `is_separator`.
///
/// Always returns at least one segment; the last one is whatever follows the
/// final split point, possibly empty.
pub(crate) fn split_unescaped(s: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut chars = s.char_indices();
    while let Some((idx, c)) = chars.next() {
        if c == '\\' {
            chars.next();
            continue;
        }
        if is_separator(c) {
            segments.push(&s[start..idx]);
            start = idx + c.len_utf8();
        }
    }
    segments.push(&s[start..]);
    segments
}

/// Split a statement at its first unescaped `=`.
pub(crate) fn split_key_value(statement: &str) -> Option<(&str, &str)> {
    let mut chars = statement.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '=' => return Some((&statement[..idx], &statement[idx + 1..])),
            _ => {}
        }
    }
    None
}

/// Escape `s` so that, as a regex, it matches exactly itself.
///
/// Hyphens are written as `\x2d` even though they are only special inside a
/// character class.
pub(crate) fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '|' | '\\' | '{' | '}' | '(' | ')' | '[' | ']' | '^' | '$' | '+' | '*' | '?' | '.' => {
                out.push('\\');
                out.push(c);
            }
            '-' => out.push_str("\\x2d"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape arbitrary text so it can be spliced into any position of a program
/// (initial string, key, value or meta-rule list) and read back unchanged.
pub(crate) fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' | ';' | '=' | ',' | '%' | '\r' | '\t' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

/// Length in UTF-16 code units, the unit all size ceilings are measured in.
pub(crate) fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_decodes_newline_and_literals() {
        assert_eq!(unescape("a\\nb").unwrap(), "a\nb");
        assert_eq!(unescape("\\;\\=\\%\\,\\\\").unwrap(), ";=%,\\");
        assert_eq!(unescape("\\ x\\t").unwrap(), " xt");
    }

    #[test]
    fn unescape_is_identity_without_backslashes() {
        for text in ["", "plain", "a=b;c", "ünïcödé 😀", "%,%"] {
            assert_eq!(unescape(text).unwrap(), text);
        }
    }

    #[test]
    fn unescape_rejects_trailing_backslash() {
        for prefix in ["", "abc", "a\\\\", "\\n"] {
            let text = format!("{prefix}\\");
            assert_eq!(unescape(&text), Err(Error::TrailingBackslash), "input {text:?}");
        }
    }

    #[test]
    fn split_skips_escaped_separators() {
        assert_eq!(split_unescaped("a,b\\,c,", |c| c == ','), vec!["a", "b\\,c", ""]);
        assert_eq!(split_unescaped("", |c| c == ','), vec![""]);
        assert_eq!(split_unescaped("x;y\nz", |c| c == ';' || c == '\n'), vec!["x", "y", "z"]);
        // An escaped backslash does not protect the separator after it.
        assert_eq!(split_unescaped("a\\\\%b", |c| c == '%'), vec!["a\\\\", "b"]);
    }

    #[test]
    fn split_handles_multibyte_text() {
        assert_eq!(split_unescaped("ä%ö\\%ü", |c| c == '%'), vec!["ä", "ö\\%ü"]);
    }

    #[test]
    fn key_value_uses_first_unescaped_equals() {
        assert_eq!(split_key_value("a=b=c"), Some(("a", "b=c")));
        assert_eq!(split_key_value("a\\=b=c"), Some(("a\\=b", "c")));
        assert_eq!(split_key_value("no rule here"), None);
        assert_eq!(split_key_value("a\\=b"), None);
    }

    #[test]
    fn literal_escape_covers_regex_metacharacters() {
        assert_eq!(escape_literal("a.b*c"), "a\\.b\\*c");
        assert_eq!(escape_literal("(x|y)"), "\\(x\\|y\\)");
        assert_eq!(escape_literal("a-b"), "a\\x2db");
        let re = regex::Regex::new(&escape_literal("[^$]{1}+?\\")).unwrap();
        assert!(re.is_match("[^$]{1}+?\\"));
    }

    #[test]
    fn escaped_text_reads_back_unchanged() {
        for text in ["a;b", "k=v", "1,2", "50%", "line\nbreak", "tab\tcr\r", "back\\slash"] {
            assert_eq!(unescape(&escape_text(text)).unwrap(), text);
        }
        assert_eq!(escape_text("a;b\n"), "a\\;b\\n");
    }

    #[test]
    fn utf16_length_counts_surrogate_pairs() {
        assert_eq!(utf16_len("abc"), 3);
        assert_eq!(utf16_len("😀"), 2);
    }
}
