//! Escaping and unescaping per
//! [CSSOM § 2.1 Common Serializing Idioms](https://drafts.csswg.org/cssom/#common-serializing-idioms)
//! and [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point).
//!
//! The object model stores identifiers and strings unescaped. These helpers
//! are only called when a value is written back out as CSS text.

/// How aggressively characters outside the identifier grammar are escaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeLevel {
    /// Escape with a backslash followed by the character itself where the
    /// grammar allows it (`a\.b`). Non-ASCII characters are left intact.
    #[default]
    Backslash,
    /// Escape every character that needs escaping, and every non-ASCII
    /// character, as a hexadecimal code point followed by a space (`a\2e b`).
    Hex,
}

/// [§ 4.3.10 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// Append `c` as a hexadecimal escape: "the code point as hexadecimal
/// followed by a single SPACE".
fn push_hex_escape(out: &mut String, c: char) {
    out.push('\\');
    out.push_str(&format!("{:x}", u32::from(c)));
    out.push(' ');
}

/// [CSSOM § 2.1 serialize an identifier](https://drafts.csswg.org/cssom/#serialize-an-identifier)
///
/// Escape `text` so it can be written where an identifier is expected.
#[must_use]
pub fn escape_identifier(text: &str, level: EscapeLevel) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();

    for (index, &c) in chars.iter().enumerate() {
        match c {
            // "If the character is NULL (U+0000), then the REPLACEMENT CHARACTER (U+FFFD)."
            '\0' => out.push('\u{FFFD}'),

            // "If the character is in the range [\1-\1f] (U+0001 to U+001F) or is
            // U+007F, then the character escaped as code point."
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_hex_escape(&mut out, c),

            // "If the character is the first character and is in the range [0-9],
            // or is the second character, in the range [0-9] and the first
            // character is a "-", then the character escaped as code point."
            '0'..='9' if index == 0 || (index == 1 && chars[0] == '-') => {
                push_hex_escape(&mut out, c);
            }

            // "If the character is the first character and is a "-" (U+002D),
            // and there is no second character, then the escaped character."
            '-' if index == 0 && chars.len() == 1 => out.push_str("\\-"),

            _ if !c.is_ascii() && level == EscapeLevel::Hex => push_hex_escape(&mut out, c),

            _ if is_ident_char(c) => out.push(c),

            _ => match level {
                EscapeLevel::Backslash => {
                    out.push('\\');
                    out.push(c);
                }
                EscapeLevel::Hex => push_hex_escape(&mut out, c),
            },
        }
    }

    out
}

/// [CSSOM § 2.1 serialize a string](https://drafts.csswg.org/cssom/#serialize-a-string)
///
/// Escape `text` for use between double quotes. The quotes themselves are
/// not added.
#[must_use]
pub fn escape_string(text: &str, level: EscapeLevel) -> String {
    let mut out = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => push_hex_escape(&mut out, c),
            // "If the character is '"' (U+0022) or "\" (U+005C), the escaped character."
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ if !c.is_ascii() && level == EscapeLevel::Hex => push_hex_escape(&mut out, c),
            _ => out.push(c),
        }
    }

    out
}

/// Reverse both escaping forms: backslash-character and hexadecimal
/// code points (optionally terminated by one whitespace character). An
/// escaped newline is a line continuation and disappears.
#[must_use]
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some(first) if first.is_ascii_hexdigit() => {
                // "Consume as many hex digits as possible, but no more than 5."
                let mut hex = String::from(first);
                while hex.len() < 6 {
                    match chars.peek() {
                        Some(&d) if d.is_ascii_hexdigit() => {
                            hex.push(d);
                            let _ = chars.next();
                        }
                        _ => break,
                    }
                }
                // "If the next input code point is whitespace, consume it as well."
                if chars.peek().is_some_and(|d| d.is_ascii_whitespace()) {
                    let _ = chars.next();
                }
                let code_point = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
                let decoded = if code_point == 0 {
                    '\u{FFFD}'
                } else {
                    char::from_u32(code_point).unwrap_or('\u{FFFD}')
                };
                out.push(decoded);
            }
            Some('\n') => {}
            Some(other) => out.push(other),
            // "EOF: This is a parse error. Return U+FFFD REPLACEMENT CHARACTER."
            None => out.push('\u{FFFD}'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_escape_identifier_plain() {
        assert_eq!(escape_identifier("main-nav_2", EscapeLevel::Backslash), "main-nav_2");
    }

    #[test]
    fn test_escape_identifier_leading_digit() {
        assert_eq!(escape_identifier("1col", EscapeLevel::Backslash), "\\31 col");
        assert_eq!(escape_identifier("-2x", EscapeLevel::Backslash), "-\\32 x");
    }

    #[test]
    fn test_escape_identifier_lone_hyphen() {
        assert_eq!(escape_identifier("-", EscapeLevel::Backslash), "\\-");
    }

    #[test]
    fn test_escape_identifier_levels() {
        assert_eq!(escape_identifier("a.b", EscapeLevel::Backslash), "a\\.b");
        assert_eq!(escape_identifier("a.b", EscapeLevel::Hex), "a\\2e b");
        assert_eq!(escape_identifier("caf\u{e9}", EscapeLevel::Backslash), "caf\u{e9}");
        assert_eq!(escape_identifier("caf\u{e9}", EscapeLevel::Hex), "caf\\e9 ");
    }

    #[test]
    fn test_escape_string_quotes() {
        assert_eq!(escape_string("say \"hi\"", EscapeLevel::Backslash), "say \\\"hi\\\"");
        assert_eq!(escape_string("a\nb", EscapeLevel::Backslash), "a\\a b");
    }

    #[test]
    fn test_unescape_forms() {
        assert_eq!(unescape("a\\.b"), "a.b");
        assert_eq!(unescape("\\31 col"), "1col");
        assert_eq!(unescape("\\000041"), "A");
        assert_eq!(unescape("line\\\ncontinued"), "linecontinued");
        assert_eq!(unescape("\\0"), "\u{FFFD}");
    }

    #[quickcheck]
    fn prop_identifier_escape_is_reversible(text: String) -> bool {
        let text = text.replace('\0', "\u{FFFD}");
        unescape(&escape_identifier(&text, EscapeLevel::Hex)) == text
            && unescape(&escape_identifier(&text, EscapeLevel::Backslash)) == text
    }
}
