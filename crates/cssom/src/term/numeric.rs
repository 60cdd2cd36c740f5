//! Numeric terms per [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/).
//!
//! Every float-valued term (integers, numbers, percentages and the five
//! dimension families) shares one representation: a kind, an `f32` value
//! and an optional unit.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::CssError;

/// [§ 4 Numeric Data Types](https://www.w3.org/TR/css-values-4/#numeric-types)
///
/// The unit family of a value, as tracked by `calc()` type checking.
/// `Unitless` covers `<integer>` and `<number>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TermType {
    /// No unit family has been fixed (plain numbers only).
    #[default]
    Unitless,
    /// [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
    Length,
    /// [§ 7.1 Angle Units](https://www.w3.org/TR/css-values-4/#angles)
    Angle,
    /// [§ 7.2 Duration Units](https://www.w3.org/TR/css-values-4/#time)
    Time,
    /// [§ 7.3 Frequency Units](https://www.w3.org/TR/css-values-4/#frequency)
    Frequency,
    /// [§ 7.4 Resolution Units](https://www.w3.org/TR/css-values-4/#resolution)
    Resolution,
}

/// [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths) and
/// [§ 7 Other Quantities](https://www.w3.org/TR/css-values-4/#other-units)
///
/// Units are parsed ASCII case-insensitively and serialized in canonical case.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// "1px = 1/96th of 1in"
    Px,
    /// "Equal to the computed value of the font-size property of the element"
    Em,
    /// "Equal to the used x-height of the first available font"
    Ex,
    /// "Equal to the used advance measure of the '0' glyph"
    Ch,
    /// "Equal to the computed value of font-size on the root element"
    Rem,
    /// "Equal to 1% of the width of the initial containing block"
    Vw,
    /// "Equal to 1% of the height of the initial containing block"
    Vh,
    /// "Equal to the smaller of vw or vh"
    Vmin,
    /// "Equal to the larger of vw or vh"
    Vmax,
    /// "1cm = 96px/2.54"
    Cm,
    /// "1mm = 1/10th of 1cm"
    Mm,
    /// "1Q = 1/40th of 1cm"
    #[strum(serialize = "Q")]
    Q,
    /// "1in = 2.54cm = 96px"
    In,
    /// "1pt = 1/72nd of 1in"
    Pt,
    /// "1pc = 1/6th of 1in"
    Pc,
    /// "Degrees. There are 360 degrees in a full circle."
    Deg,
    /// "Radians. There are 2π radians in a full circle."
    Rad,
    /// "Gradians. There are 400 gradians in a full circle."
    Grad,
    /// "Turns. There is 1 turn in a full circle."
    Turn,
    /// "Seconds."
    S,
    /// "Milliseconds. There are 1000 milliseconds in a second."
    Ms,
    /// "Hertz. It represents the number of occurrences per second."
    #[strum(serialize = "Hz")]
    Hz,
    /// "KiloHertz. A kiloHertz is 1000 Hertz."
    #[strum(serialize = "kHz")]
    KHz,
    /// "Dots per inch."
    Dpi,
    /// "Dots per centimeter."
    Dpcm,
    /// "Dots per px unit."
    Dppx,
}

impl Unit {
    /// The unit family this unit measures.
    #[must_use]
    pub const fn family(self) -> TermType {
        match self {
            Self::Px
            | Self::Em
            | Self::Ex
            | Self::Ch
            | Self::Rem
            | Self::Vw
            | Self::Vh
            | Self::Vmin
            | Self::Vmax
            | Self::Cm
            | Self::Mm
            | Self::Q
            | Self::In
            | Self::Pt
            | Self::Pc => TermType::Length,
            Self::Deg | Self::Rad | Self::Grad | Self::Turn => TermType::Angle,
            Self::S | Self::Ms => TermType::Time,
            Self::Hz | Self::KHz => TermType::Frequency,
            Self::Dpi | Self::Dpcm | Self::Dppx => TermType::Resolution,
        }
    }
}

/// Which numeric term a [`Numeric`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NumericKind {
    /// [§ 5.1 Integers](https://www.w3.org/TR/css-values-4/#integers)
    Integer,
    /// [§ 5.2 Real Numbers](https://www.w3.org/TR/css-values-4/#numbers)
    Number,
    /// [§ 5.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    Percent,
    /// `<length>`
    Length,
    /// `<angle>`
    Angle,
    /// `<time>`
    Time,
    /// `<frequency>`
    Frequency,
    /// `<resolution>`
    Resolution,
}

impl NumericKind {
    /// The unit family a unit attached to this kind must belong to, or
    /// `None` for kinds that never carry a unit.
    #[must_use]
    pub const fn unit_family(self) -> Option<TermType> {
        match self {
            Self::Integer | Self::Number | Self::Percent => None,
            Self::Length => Some(TermType::Length),
            Self::Angle => Some(TermType::Angle),
            Self::Time => Some(TermType::Time),
            Self::Frequency => Some(TermType::Frequency),
            Self::Resolution => Some(TermType::Resolution),
        }
    }

    /// Time and frequency cannot be negative.
    const fn rejects_negative(self) -> bool {
        matches!(self, Self::Time | Self::Frequency)
    }
}

/// A float-valued, unit-aware numeric term payload.
///
/// The stored value is never negative zero, and never negative for time
/// and frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Numeric {
    kind: NumericKind,
    value: f32,
    unit: Option<Unit>,
}

impl Numeric {
    /// Create a numeric payload of `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if the value is not finite, if
    /// a time or frequency is negative, or if `unit` does not belong to the
    /// family of `kind`.
    pub fn new(kind: NumericKind, value: f32, unit: Option<Unit>) -> Result<Self, CssError> {
        Self::check_unit(kind, unit)?;
        let mut numeric = Self {
            kind,
            value: 0.0,
            unit,
        };
        numeric.set_value(value)?;
        Ok(numeric)
    }

    /// `<integer>`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn integer(value: i32) -> Self {
        Self {
            kind: NumericKind::Integer,
            value: normalize_zero(value as f32),
            unit: None,
        }
    }

    /// `<number>`
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `value` is not finite.
    pub fn number(value: f32) -> Result<Self, CssError> {
        Self::new(NumericKind::Number, value, None)
    }

    /// `<percentage>`
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `value` is not finite.
    pub fn percent(value: f32) -> Result<Self, CssError> {
        Self::new(NumericKind::Percent, value, None)
    }

    /// `<length>` with a unit.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `unit` is not a length unit.
    pub fn length(value: f32, unit: Unit) -> Result<Self, CssError> {
        Self::new(NumericKind::Length, value, Some(unit))
    }

    /// `<angle>` with a unit.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `unit` is not an angle unit.
    pub fn angle(value: f32, unit: Unit) -> Result<Self, CssError> {
        Self::new(NumericKind::Angle, value, Some(unit))
    }

    /// `<time>` with a unit.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `value` is negative or `unit`
    /// is not a time unit.
    pub fn time(value: f32, unit: Unit) -> Result<Self, CssError> {
        Self::new(NumericKind::Time, value, Some(unit))
    }

    /// `<frequency>` with a unit.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `value` is negative or `unit`
    /// is not a frequency unit.
    pub fn frequency(value: f32, unit: Unit) -> Result<Self, CssError> {
        Self::new(NumericKind::Frequency, value, Some(unit))
    }

    /// `<resolution>` with a unit.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `unit` is not a resolution unit.
    pub fn resolution(value: f32, unit: Unit) -> Result<Self, CssError> {
        Self::new(NumericKind::Resolution, value, Some(unit))
    }

    /// Which numeric term this is.
    #[must_use]
    pub const fn kind(&self) -> NumericKind {
        self.kind
    }

    /// The numeric value.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// The attached unit, if any.
    #[must_use]
    pub const fn unit(&self) -> Option<Unit> {
        self.unit
    }

    /// Whether the value has no fractional part.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        self.value.fract() == 0.0
    }

    /// Replace the value in place. `-0.0` is stored as `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] for non-finite values, and for
    /// negative times and frequencies. The stored value is unchanged on error.
    pub fn set_value(&mut self, value: f32) -> Result<(), CssError> {
        if !value.is_finite() {
            return Err(CssError::invalid(format!("{} value must be finite", self.kind)));
        }
        if self.kind.rejects_negative() && value < 0.0 {
            return Err(CssError::invalid(format!(
                "{} value cannot be negative: {value}",
                self.kind
            )));
        }
        self.value = normalize_zero(value);
        Ok(())
    }

    /// Replace the unit in place.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `unit` does not belong to
    /// this kind's unit family.
    pub fn set_unit(&mut self, unit: Option<Unit>) -> Result<(), CssError> {
        Self::check_unit(self.kind, unit)?;
        self.unit = unit;
        Ok(())
    }

    /// Copy with a different value.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Numeric::set_value`].
    pub fn with_value(mut self, value: f32) -> Result<Self, CssError> {
        self.set_value(value)?;
        Ok(self)
    }

    fn check_unit(kind: NumericKind, unit: Option<Unit>) -> Result<(), CssError> {
        match (kind.unit_family(), unit) {
            (_, None) => Ok(()),
            (Some(family), Some(unit)) if unit.family() == family => Ok(()),
            (_, Some(unit)) => Err(CssError::invalid(format!(
                "unit '{unit}' cannot be used with a {kind} term"
            ))),
        }
    }
}

/// Fold `-0.0` into `0.0`.
fn normalize_zero(value: f32) -> f32 {
    if value == 0.0 { 0.0 } else { value }
}

impl Hash for Numeric {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.value.to_bits().hash(state);
        self.unit.hash(state);
    }
}

impl fmt::Display for Numeric {
    /// Integral values are written without a decimal point (`10px`, not `10.0px`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        match (self.kind, self.unit) {
            (NumericKind::Percent, _) => f.write_str("%"),
            (_, Some(unit)) => f.write_str(unit.as_ref()),
            (_, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_parse_is_case_insensitive() {
        assert_eq!("PX".parse::<Unit>().ok(), Some(Unit::Px));
        assert_eq!("khz".parse::<Unit>().ok(), Some(Unit::KHz));
        assert_eq!(Unit::KHz.to_string(), "kHz");
        assert_eq!(Unit::Q.as_ref(), "Q");
    }

    #[test]
    fn test_integral_display() {
        let length = Numeric::length(10.0, Unit::Px).unwrap();
        assert_eq!(length.to_string(), "10px");
        let half = Numeric::number(0.5).unwrap();
        assert_eq!(half.to_string(), "0.5");
        assert_eq!(Numeric::percent(50.0).unwrap().to_string(), "50%");
    }
}
