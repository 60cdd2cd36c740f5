//! The `an+b` micro-syntax.
//!
//! [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
//!
//! "The An+B notation defines an integer step (A) and offset (B), and
//! represents the An+Bth elements in a list, for every positive integer or
//! zero value of n, with the first element in the list having index 1."

/// Decode an `an+b` argument into `(a, b)`.
///
/// Accepts `odd`, `even`, a bare integer, and `an+b` forms with an omitted
/// or signed coefficient (`n`, `-n+3`, `+2n-1`). Whitespace may surround the
/// argument and the sign of `b` (`2n + 1`, `2n -1`), nowhere else.
/// Returns `None` for anything else.
#[must_use]
pub fn decode_index(text: &str) -> Option<(i32, i32)> {
    let text = text.trim_matches(|c: char| c.is_ascii_whitespace()).to_ascii_lowercase();

    match text.as_str() {
        // "odd: Represents every element with an odd index (2n+1)"
        "odd" => return Some((2, 1)),
        // "even: Represents every element with an even index (2n)"
        "even" => return Some((2, 0)),
        "" => return None,
        _ => {}
    }

    let Some((coefficient, offset)) = text.split_once('n') else {
        return Some((0, parse_integer(&text)?));
    };

    let a = match coefficient {
        "" | "+" => 1,
        "-" => -1,
        digits => parse_integer(digits)?,
    };
    let offset = offset.trim_start_matches(|c: char| c.is_ascii_whitespace());
    if offset.is_empty() {
        return Some((a, 0));
    }
    let (negative, magnitude) = if let Some(rest) = offset.strip_prefix('+') {
        (false, rest)
    } else if let Some(rest) = offset.strip_prefix('-') {
        (true, rest)
    } else {
        return None;
    };
    // "2n+ 1" is fine, "2n+-1" is not.
    let magnitude = magnitude.trim_start_matches(|c: char| c.is_ascii_whitespace());
    if magnitude.starts_with(['+', '-']) {
        return None;
    }
    let b = parse_integer(magnitude)?;
    Some((a, if negative { -b } else { b }))
}

/// Whether the 1-based `position` is one of `a*k + b` for some `k >= 0`.
///
/// With `a = 0` only `position == b` matches. Otherwise `position - b` must
/// be zero, or share the sign of `a` and be a multiple of it.
#[must_use]
pub fn position_matches(position: i32, a: i32, b: i32) -> bool {
    let diff = i64::from(position) - i64::from(b);
    let a = i64::from(a);
    if a == 0 {
        return diff == 0;
    }
    diff == 0 || (diff.signum() == a.signum() && diff % a == 0)
}

/// An optionally signed run of ASCII digits.
fn parse_integer(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
