//! Shared collaborators for the CSS object model.
//!
//! This crate provides the peripheral infrastructure the core consumes but
//! does not own:
//! - **Warning System** - deduplicated, colored diagnostics on stderr
//! - **Escaping** - identifier and string escaping/unescaping per
//!   [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
//! - **Named Colors** - the static keyword table of
//!   [CSS Color Level 4 § 6.1](https://www.w3.org/TR/css-color-4/#named-colors)
//! - **URL resolution** - resolving `url()` values against a base

/// Named color keywords and the RGBA color value.
pub mod color;
/// Escaping and unescaping of CSS identifiers and strings.
pub mod escape;
/// Relative URL resolution.
pub mod url;
/// Deduplicated diagnostics.
pub mod warning;

pub use color::{Color, color_by_name};
pub use escape::{EscapeLevel, escape_identifier, escape_string, unescape};
pub use url::resolve_url;
pub use warning::{clear_warnings, emitted_warnings, warn_once};
