//! `@font-face`
//!
//! [CSS Fonts § 4 Font Resources](https://www.w3.org/TR/css-fonts-4/#font-resources)
//!
//! The descriptors are stored as ordinary declarations; the typed getters
//! read the last declaration of each descriptor, so a later `src` replaces
//! an earlier one the way the cascade would.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use super::{
    Declaration, RuleContainer, RuleList, SheetLink, StyleSheetRef, indent, write_declarations,
};
use crate::term::{NumericKind, Term, TermUri, TermValue};

/// One entry of the `src` descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum FontSource {
    /// `url(...) format(...)`
    Url {
        /// Where to download the font.
        uri: TermUri,
        /// The `format()` hint, if any.
        format: Option<String>,
    },
    /// `local(...)`: a font installed on the system, by full name.
    Local(String),
}

/// [§ 3.2 Font style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum FontStyle {
    /// `normal`
    #[default]
    Normal,
    /// `italic`
    Italic,
    /// `oblique`
    Oblique,
}

/// [§ 2.2 Font weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontWeight {
    /// `normal`, same as 400
    Normal,
    /// `bold`, same as 700
    Bold,
    /// `bolder`
    Bolder,
    /// `lighter`
    Lighter,
    /// A number between 1 and 1000.
    Numeric(u16),
}

impl FontWeight {
    /// Read a weight from a single term.
    #[must_use]
    pub fn from_term(term: &Term) -> Option<Self> {
        if let Some(ident) = term.as_ident() {
            return match ident.to_ascii_lowercase().as_str() {
                "normal" => Some(Self::Normal),
                "bold" => Some(Self::Bold),
                "bolder" => Some(Self::Bolder),
                "lighter" => Some(Self::Lighter),
                _ => None,
            };
        }
        let numeric = term.as_numeric()?;
        if !matches!(numeric.kind(), NumericKind::Integer | NumericKind::Number)
            || !numeric.is_integral()
        {
            return None;
        }
        let value = numeric.value();
        if !(1.0..=1000.0).contains(&value) {
            return None;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let weight = value as u16;
        Some(Self::Numeric(weight))
    }

    /// The numeric weight, for the absolute keywords and numbers.
    #[must_use]
    pub const fn value(self) -> Option<u16> {
        match self {
            Self::Normal => Some(400),
            Self::Bold => Some(700),
            Self::Numeric(weight) => Some(weight),
            Self::Bolder | Self::Lighter => None,
        }
    }
}

/// [§ 4.1 The @font-face rule](https://www.w3.org/TR/css-fonts-4/#font-face-rule)
///
/// "The @font-face rule allows for linking to fonts that are automatically
/// fetched and activated when needed."
#[derive(Debug, Clone, Default, PartialEq, Hash)]
pub struct RuleFontFace {
    declarations: RuleList<Declaration>,
    sheet: SheetLink,
}

impl RuleFontFace {
    /// An empty `@font-face` rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn descriptor(&self, name: &str) -> Option<&Declaration> {
        self.declarations
            .iter()
            .rev()
            .find(|declaration| declaration.property() == name)
    }

    /// [§ 4.2 font-family](https://www.w3.org/TR/css-fonts-4/#font-family-desc)
    ///
    /// A quoted name, or unquoted identifiers joined with single spaces.
    #[must_use]
    pub fn font_family(&self) -> Option<String> {
        text_argument(self.descriptor("font-family")?.as_list())
    }

    /// [§ 4.3 src](https://www.w3.org/TR/css-fonts-4/#src-desc)
    ///
    /// The sources in preference order. A `format()` hint attaches to the
    /// `url()` right before it.
    #[must_use]
    pub fn sources(&self) -> Vec<FontSource> {
        let mut sources = Vec::new();
        let Some(src) = self.descriptor("src") else {
            return sources;
        };
        for term in src.as_list() {
            match term.value() {
                TermValue::Uri(uri) => sources.push(FontSource::Url {
                    uri: uri.clone(),
                    format: None,
                }),
                TermValue::Function(function) if function.name().eq_ignore_ascii_case("format") => {
                    if let Some(FontSource::Url { format, .. }) = sources.last_mut() {
                        *format = text_argument(function.args());
                    }
                }
                TermValue::Function(function) if function.name().eq_ignore_ascii_case("local") => {
                    if let Some(name) = text_argument(function.args()) {
                        sources.push(FontSource::Local(name));
                    }
                }
                _ => {}
            }
        }
        sources
    }

    /// [§ 4.4 font-style](https://www.w3.org/TR/css-fonts-4/#font-prop-desc)
    #[must_use]
    pub fn font_style(&self) -> Option<FontStyle> {
        let ident = self.descriptor("font-style")?.as_list().first()?.as_ident()?;
        FontStyle::from_str(ident).ok()
    }

    /// [§ 4.4 font-weight](https://www.w3.org/TR/css-fonts-4/#font-prop-desc)
    #[must_use]
    pub fn font_weight(&self) -> Option<FontWeight> {
        FontWeight::from_term(self.descriptor("font-weight")?.as_list().first()?)
    }

    /// [§ 4.5 unicode-range](https://www.w3.org/TR/css-fonts-4/#unicode-range-desc)
    ///
    /// The ranges as written, e.g. `U+0000-00FF`.
    #[must_use]
    pub fn unicode_ranges(&self) -> Vec<String> {
        self.descriptor("unicode-range")
            .map(|declaration| {
                declaration
                    .as_list()
                    .iter()
                    .filter_map(|term| match term.value() {
                        TermValue::UnicodeRange(range) => Some(range.clone()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The style sheet this rule belongs to.
    #[must_use]
    pub const fn style_sheet(&self) -> Option<StyleSheetRef> {
        self.sheet.0
    }

    /// Link the rule to a style sheet.
    pub const fn set_style_sheet(&mut self, sheet: Option<StyleSheetRef>) {
        self.sheet = SheetLink(sheet);
    }

    /// Serialize, indented by `depth` tabs.
    #[must_use]
    pub fn to_css(&self, depth: usize) -> String {
        let mut out = String::new();
        indent(&mut out, depth);
        out.push_str("@font-face {\n");
        write_declarations(&mut out, &self.declarations, depth);
        indent(&mut out, depth);
        out.push_str("}\n");
        out
    }
}

/// Terms read as text: a quoted string, or identifiers
/// joined with spaces (`local(Open Sans)`).
fn text_argument(args: &[Term]) -> Option<String> {
    if let Some(quoted) = args.first().and_then(Term::as_string) {
        return Some(quoted.to_owned());
    }
    let words: Vec<&str> = args.iter().filter_map(Term::as_ident).collect();
    (!words.is_empty()).then(|| words.join(" "))
}

impl RuleContainer for RuleFontFace {
    type Item = Declaration;

    fn list(&self) -> &RuleList<Declaration> {
        &self.declarations
    }

    fn list_mut(&mut self) -> &mut RuleList<Declaration> {
        &mut self.declarations
    }
}

impl fmt::Display for RuleFontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(0))
    }
}
