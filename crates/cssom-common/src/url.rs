//! URL resolution for `url()` values.
//!
//! [CSS Values § 4.5.1 Relative URLs](https://www.w3.org/TR/css-values-4/#relative-urls)
//! [URL Standard](https://url.spec.whatwg.org/)

/// [CSS Values § 4.5.1](https://www.w3.org/TR/css-values-4/#relative-urls)
///
/// "Relative URLs are resolved to full URLs using a base URL."
///
/// Resolve a potentially relative `href` against `base_url`.
///
/// # Algorithm
///
/// STEP 1: If `href` carries a scheme, it is already absolute.
///
/// STEP 2: Without a base, `href` is returned unchanged.
///
/// STEP 3: Scheme-relative (`//host/path`), root-relative (`/path`) and
/// path-relative (`a/b`, `../b`) references are joined with the matching
/// part of the base, then `.` and `..` segments are removed.
///
/// NOTE: This is a simplified implementation. Query strings on the base and
/// percent-encoding are not interpreted.
#[must_use]
pub fn resolve_url(href: &str, base_url: Option<&str>) -> String {
    // STEP 1: "An absolute-URL string is a URL-scheme string, followed by
    // U+003A (:), followed by a scheme-specific part."
    if has_scheme(href) {
        return href.to_string();
    }

    // STEP 2
    let Some(base) = base_url else {
        return href.to_string();
    };

    // STEP 3
    let (scheme, rest) = base.split_once("://").unwrap_or(("", base));
    let (authority, base_path) = rest.find('/').map_or((rest, "/"), |i| rest.split_at(i));
    let prefix = if scheme.is_empty() {
        authority.to_string()
    } else {
        format!("{scheme}://{authority}")
    };

    if let Some(network_path) = href.strip_prefix("//") {
        return if scheme.is_empty() {
            href.to_string()
        } else {
            format!("{scheme}://{network_path}")
        };
    }

    let joined = if href.starts_with('/') {
        href.to_string()
    } else if href.starts_with('#') || href.starts_with('?') {
        format!("{base_path}{href}")
    } else {
        let directory = base_path.rsplit_once('/').map_or("", |(dir, _)| dir);
        format!("{directory}/{href}")
    };

    format!("{prefix}{}", remove_dot_segments(&joined))
}

/// [RFC 3986 § 5.2.4 Remove Dot Segments](https://www.rfc-editor.org/rfc/rfc3986#section-5.2.4)
fn remove_dot_segments(path: &str) -> String {
    let (path, suffix) = path
        .find(['?', '#'])
        .map_or((path, ""), |i| path.split_at(i));

    let mut output: Vec<&str> = Vec::new();
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len().saturating_sub(1);
    for (index, segment) in segments.iter().enumerate() {
        match *segment {
            "." => {
                if index == last {
                    output.push("");
                }
            }
            ".." => {
                if output.len() > 1 {
                    let _ = output.pop();
                }
                if index == last {
                    output.push("");
                }
            }
            other => output.push(other),
        }
    }

    let mut resolved = output.join("/");
    if !resolved.starts_with('/') {
        resolved.insert(0, '/');
    }
    resolved.push_str(suffix);
    resolved
}

/// [URL Standard § 4.1](https://url.spec.whatwg.org/#url-scheme-string)
///
/// "A URL-scheme string must be one ASCII alpha, followed by zero or more of
/// ASCII alphanumeric, U+002B (+), U+002D (-), and U+002E (.)"
fn has_scheme(href: &str) -> bool {
    href.split_once(':').is_some_and(|(scheme, _)| {
        let mut chars = scheme.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
