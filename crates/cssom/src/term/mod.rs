//! CSS value terms
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! A [`Term`] is one component of a declaration value: `10px`, `red`,
//! `url(a.png)`, `rgb(0, 0, 0)`, `calc(1em + 2px)`. Every term carries an
//! optional prefix [`Operator`] describing how it is joined to the previous
//! term (`1px 2px` has a space operator on `2px`, `a, b` has a comma
//! operator on `b`).

mod color;
mod function;
mod numeric;

use std::fmt::{self, Write};

use cssom_common::{Color, EscapeLevel, escape_identifier, escape_string, resolve_url};
use serde::Serialize;

use crate::calc::TermCalc;
use crate::error::CssError;

pub use color::{ColorKeyword, TermColor};
pub use function::TermFunction;
pub use numeric::{Numeric, NumericKind, TermType, Unit};

/// [§ 2.2 Component value combinators](https://www.w3.org/TR/css-values-4/#component-combinators)
///
/// How a term is joined to the term before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    /// "Juxtaposing components means that all of them must occur"
    Space,
    /// `,`
    Comma,
    /// `/`
    Slash,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
}

impl Operator {
    /// The text written in front of a term carrying this operator.
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Space => " ",
            Self::Comma => ", ",
            Self::Slash => "/",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Multiply => "*",
        }
    }
}

/// [§ 4.2 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization)
///
/// A bare delimiter token left in a value, as found in raw `calc()` and
/// function argument lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Delim {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `,`
    Comma,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
}

impl Delim {
    /// The delimiter character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Plus => '+',
            Self::Minus => '-',
            Self::Star => '*',
            Self::Slash => '/',
            Self::Comma => ',',
            Self::LeftParen => '(',
            Self::RightParen => ')',
        }
    }
}

/// [§ 4.5 Resource Locators](https://www.w3.org/TR/css-values-4/#urls)
///
/// A `url()` value with the base it appeared under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TermUri {
    /// The URL exactly as written, unescaped.
    pub value: String,
    /// Base URL of the style sheet the value came from.
    pub base: Option<String>,
}

impl TermUri {
    /// Create a URI term payload.
    #[must_use]
    pub fn new(value: &str, base: Option<&str>) -> Self {
        Self {
            value: value.to_string(),
            base: base.map(str::to_string),
        }
    }

    /// [§ 4.5.1 Relative URLs](https://www.w3.org/TR/css-values-4/#relative-urls)
    ///
    /// The value resolved against [`TermUri::base`].
    #[must_use]
    pub fn resolved(&self) -> String {
        resolve_url(&self.value, self.base.as_deref())
    }
}

/// [CSS 2.1 § 11.1.2 Clipping](https://www.w3.org/TR/CSS21/visufx.html#clipping)
///
/// "`rect(<top>, <right>, <bottom>, <left>)`". `None` is `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Hash, Serialize)]
pub struct TermRect {
    edges: [Option<Numeric>; 4],
}

impl TermRect {
    /// Create a rect from top, right, bottom and left edges.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if an edge is present but is not
    /// a length. Unitless zero is accepted as a length.
    pub fn new(edges: [Option<Numeric>; 4]) -> Result<Self, CssError> {
        for edge in edges.iter().flatten() {
            let is_zero = matches!(edge.kind(), NumericKind::Integer | NumericKind::Number)
                && edge.value() == 0.0;
            if edge.kind() != NumericKind::Length && !is_zero {
                return Err(CssError::invalid(format!("rect() edge must be a length: {edge}")));
            }
        }
        Ok(Self { edges })
    }

    /// Edges in top, right, bottom, left order.
    #[must_use]
    pub const fn edges(&self) -> &[Option<Numeric>; 4] {
        &self.edges
    }
}

/// A key with an associated term, as used for property-value associations.
#[derive(Debug, Clone, PartialEq, Hash, Serialize)]
pub struct TermPair {
    /// The key.
    pub key: String,
    /// The associated value.
    pub value: Box<Term>,
}

/// The payload of a [`Term`].
#[derive(Debug, Clone, PartialEq, Hash, Serialize)]
pub enum TermValue {
    /// Integers, numbers, percentages and dimensions.
    Numeric(Numeric),
    /// [CSS Color Level 4 § 4](https://www.w3.org/TR/css-color-4/#color-syntax)
    Color(TermColor),
    /// [§ 4.3 Quoted Strings](https://www.w3.org/TR/css-values-4/#strings), unescaped.
    String(String),
    /// [§ 4.2 Author-defined Identifiers](https://www.w3.org/TR/css-values-4/#identifier-value), unescaped.
    Ident(String),
    /// `url(...)`
    Uri(TermUri),
    /// [§ 4.3.8 Functional notation](https://www.w3.org/TR/css-syntax-3/#consume-function)
    Function(TermFunction),
    /// A raw list of terms.
    List(Vec<Term>),
    /// `rect(...)`
    Rect(TermRect),
    /// A key/value association.
    Pair(TermPair),
    /// [CSS Fonts § 4.5 unicode-range](https://www.w3.org/TR/css-fonts-4/#unicode-range-desc),
    /// kept as written (`U+0025-00FF`).
    UnicodeRange(String),
    /// [CSS Grid § 7.2 Named lines](https://www.w3.org/TR/css-grid-1/#named-lines):
    /// identifiers between `[` and `]`.
    BracketedIdents(Vec<String>),
    /// [§ 10.1 calc()](https://www.w3.org/TR/css-values-4/#calc-func)
    Calc(TermCalc),
    /// A bare delimiter token.
    Delim(Delim),
}

/// One component of a declaration value.
#[derive(Debug, Clone, PartialEq, Hash, Serialize)]
pub struct Term {
    operator: Option<Operator>,
    value: TermValue,
}

impl Term {
    /// Create a term with no operator.
    #[must_use]
    pub const fn new(value: TermValue) -> Self {
        Self {
            operator: None,
            value,
        }
    }

    /// `<integer>`
    #[must_use]
    pub fn integer(value: i32) -> Self {
        Self::new(TermValue::Numeric(Numeric::integer(value)))
    }

    /// `<number>`
    ///
    /// # Errors
    ///
    /// See [`Numeric::number`].
    pub fn number(value: f32) -> Result<Self, CssError> {
        Ok(Self::new(TermValue::Numeric(Numeric::number(value)?)))
    }

    /// `<percentage>`
    ///
    /// # Errors
    ///
    /// See [`Numeric::percent`].
    pub fn percent(value: f32) -> Result<Self, CssError> {
        Ok(Self::new(TermValue::Numeric(Numeric::percent(value)?)))
    }

    /// A dimension; the kind follows from the unit family.
    ///
    /// # Errors
    ///
    /// See [`Numeric::new`].
    pub fn dimension(value: f32, unit: Unit) -> Result<Self, CssError> {
        let kind = match unit.family() {
            TermType::Length | TermType::Unitless => NumericKind::Length,
            TermType::Angle => NumericKind::Angle,
            TermType::Time => NumericKind::Time,
            TermType::Frequency => NumericKind::Frequency,
            TermType::Resolution => NumericKind::Resolution,
        };
        Ok(Self::new(TermValue::Numeric(Numeric::new(
            kind,
            value,
            Some(unit),
        )?)))
    }

    /// An identifier.
    #[must_use]
    pub fn ident(name: &str) -> Self {
        Self::new(TermValue::Ident(name.to_string()))
    }

    /// A quoted string.
    #[must_use]
    pub fn string(text: &str) -> Self {
        Self::new(TermValue::String(text.to_string()))
    }

    /// A `url()` with an optional base.
    #[must_use]
    pub fn uri(value: &str, base: Option<&str>) -> Self {
        Self::new(TermValue::Uri(TermUri::new(value, base)))
    }

    /// A bare delimiter.
    #[must_use]
    pub const fn delim(delim: Delim) -> Self {
        Self::new(TermValue::Delim(delim))
    }

    /// Builder-style operator setter.
    #[must_use]
    pub const fn with_operator(mut self, operator: Option<Operator>) -> Self {
        self.operator = operator;
        self
    }

    /// The prefix operator.
    #[must_use]
    pub const fn operator(&self) -> Option<Operator> {
        self.operator
    }

    /// Replace the prefix operator in place.
    pub const fn set_operator(&mut self, operator: Option<Operator>) {
        self.operator = operator;
    }

    /// The payload.
    #[must_use]
    pub const fn value(&self) -> &TermValue {
        &self.value
    }

    /// Mutable access to the payload.
    pub const fn value_mut(&mut self) -> &mut TermValue {
        &mut self.value
    }

    /// The numeric payload, if any.
    #[must_use]
    pub const fn as_numeric(&self) -> Option<&Numeric> {
        match &self.value {
            TermValue::Numeric(numeric) => Some(numeric),
            _ => None,
        }
    }

    /// The identifier, if this is one.
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match &self.value {
            TermValue::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// The string, if this is one.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match &self.value {
            TermValue::String(text) => Some(text),
            _ => None,
        }
    }

    /// The function payload, if any.
    #[must_use]
    pub const fn as_function(&self) -> Option<&TermFunction> {
        match &self.value {
            TermValue::Function(function) => Some(function),
            _ => None,
        }
    }

    /// The URI payload, if any.
    #[must_use]
    pub const fn as_uri(&self) -> Option<&TermUri> {
        match &self.value {
            TermValue::Uri(uri) => Some(uri),
            _ => None,
        }
    }

    /// The calc payload, if any.
    #[must_use]
    pub const fn as_calc(&self) -> Option<&TermCalc> {
        match &self.value {
            TermValue::Calc(calc) => Some(calc),
            _ => None,
        }
    }

    /// The delimiter, if this is a bare delimiter.
    #[must_use]
    pub const fn as_delim(&self) -> Option<Delim> {
        match &self.value {
            TermValue::Delim(delim) => Some(*delim),
            _ => None,
        }
    }

    /// A copy of this term with a leading minus applied to its value:
    /// numbers are negated, identifiers and function names get a `-`
    /// prefix. The operator is kept.
    ///
    /// Returns `None` for terms that cannot take a minus sign, including
    /// times and frequencies whose negation would be out of range.
    #[must_use]
    pub fn negated(&self) -> Option<Self> {
        let value = match &self.value {
            TermValue::Numeric(numeric) => {
                TermValue::Numeric(numeric.with_value(-numeric.value()).ok()?)
            }
            TermValue::Ident(name) if !name.is_empty() => TermValue::Ident(format!("-{name}")),
            TermValue::Function(function) => TermValue::Function(function.negated()),
            _ => return None,
        };
        Some(Self {
            operator: self.operator,
            value,
        })
    }

    /// [CSS Color Level 4 § 4](https://www.w3.org/TR/css-color-4/#color-syntax)
    ///
    /// Coerce the term to a color: color terms as they are, identifiers
    /// through the named-color table, and `rgb()`, `rgba()`, `hsl()`,
    /// `hsla()` functions.
    #[must_use]
    pub fn to_color(&self) -> Option<TermColor> {
        match &self.value {
            TermValue::Color(color) => Some(*color),
            TermValue::Ident(name) => TermColor::from_ident(name),
            TermValue::Function(function) => TermColor::from_function(function),
            _ => None,
        }
    }

    /// Whether the term may be used. Invalid functions and `calc()`
    /// expressions are treated as absent by consumers.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match &self.value {
            TermValue::Function(function) => function.is_valid(),
            TermValue::Calc(calc) => calc.is_valid(),
            TermValue::List(terms) => terms.iter().all(Self::is_valid),
            TermValue::Pair(pair) => pair.value.is_valid(),
            _ => true,
        }
    }

    /// Serialize to CSS text, escaping identifiers and strings at `level`.
    #[must_use]
    pub fn to_css(&self, level: EscapeLevel) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_css(&mut out, level);
        out
    }

    pub(crate) fn write_css<W: Write>(&self, out: &mut W, level: EscapeLevel) -> fmt::Result {
        if let Some(operator) = self.operator {
            out.write_str(operator.as_css())?;
        }
        self.value.write_css(out, level)
    }
}

impl From<TermValue> for Term {
    fn from(value: TermValue) -> Self {
        Self::new(value)
    }
}

impl From<Numeric> for Term {
    fn from(numeric: Numeric) -> Self {
        Self::new(TermValue::Numeric(numeric))
    }
}

impl From<TermColor> for Term {
    fn from(color: TermColor) -> Self {
        Self::new(TermValue::Color(color))
    }
}

impl From<TermFunction> for Term {
    fn from(function: TermFunction) -> Self {
        Self::new(TermValue::Function(function))
    }
}

impl From<TermCalc> for Term {
    fn from(calc: TermCalc) -> Self {
        Self::new(TermValue::Calc(calc))
    }
}

impl From<Color> for Term {
    fn from(color: Color) -> Self {
        Self::new(TermValue::Color(TermColor::new(color)))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, EscapeLevel::default())
    }
}

impl TermValue {
    fn write_css<W: Write>(&self, out: &mut W, level: EscapeLevel) -> fmt::Result {
        match self {
            Self::Numeric(numeric) => write!(out, "{numeric}"),
            Self::Color(color) => write!(out, "{color}"),
            Self::String(text) => write!(out, "\"{}\"", escape_string(text, level)),
            Self::Ident(name) => out.write_str(&escape_identifier(name, level)),
            Self::Uri(uri) => write!(out, "url(\"{}\")", escape_string(&uri.value, level)),
            Self::Function(function) => function.write_css(out, level),
            Self::List(terms) => terms.iter().try_for_each(|term| term.write_css(out, level)),
            Self::Rect(rect) => {
                out.write_str("rect(")?;
                for (index, edge) in rect.edges.iter().enumerate() {
                    if index > 0 {
                        out.write_str(", ")?;
                    }
                    match edge {
                        Some(edge) => write!(out, "{edge}")?,
                        None => out.write_str("auto")?,
                    }
                }
                out.write_char(')')
            }
            Self::Pair(pair) => {
                write!(out, "{} ", escape_identifier(&pair.key, level))?;
                pair.value.write_css(out, level)
            }
            Self::UnicodeRange(range) => out.write_str(range),
            Self::BracketedIdents(names) => {
                out.write_char('[')?;
                for (index, name) in names.iter().enumerate() {
                    if index > 0 {
                        out.write_char(' ')?;
                    }
                    out.write_str(&escape_identifier(name, level))?;
                }
                out.write_char(']')
            }
            Self::Calc(calc) => write!(out, "{calc}"),
            Self::Delim(delim) => out.write_char(delim.as_char()),
        }
    }
}
