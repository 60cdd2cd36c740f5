//! Color terms.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use std::fmt;

use cssom_common::{Color, color_by_name};
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use super::{Numeric, NumericKind, Term, TermFunction};

/// Keyword colors that do not stand for a fixed sRGB value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColorKeyword {
    /// [§ 6.2](https://www.w3.org/TR/css-color-4/#transparent-color)
    /// "The keyword transparent specifies a transparent black."
    Transparent,
    /// [§ 6.4](https://www.w3.org/TR/css-color-4/#currentcolor-color)
    /// "The keyword currentcolor represents value of the color property on
    /// the same element."
    CurrentColor,
}

/// A color value, optionally remembered as the keyword it was written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TermColor {
    color: Color,
    keyword: Option<ColorKeyword>,
}

impl TermColor {
    /// A plain color.
    #[must_use]
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            keyword: None,
        }
    }

    /// A keyword color. `currentcolor` has no value of its own; it carries
    /// transparent black until the host resolves it.
    #[must_use]
    pub const fn keyword(keyword: ColorKeyword) -> Self {
        Self {
            color: Color::TRANSPARENT,
            keyword: Some(keyword),
        }
    }

    /// The RGBA value.
    #[must_use]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// The keyword this color was written as, if it was a keyword color.
    #[must_use]
    pub const fn color_keyword(&self) -> Option<ColorKeyword> {
        self.keyword
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// Resolve a keyword: `transparent`, `currentcolor` or a named color.
    #[must_use]
    pub fn from_ident(name: &str) -> Option<Self> {
        if let Ok(keyword) = name.parse::<ColorKeyword>() {
            return Some(Self::keyword(keyword));
        }
        color_by_name(name).map(Self::new)
    }

    /// [§ 5.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        Color::from_hex(hex).map(Self::new)
    }

    /// [§ 5.1 The RGB functions](https://www.w3.org/TR/css-color-4/#rgb-functions) and
    /// [§ 7 HSL Colors](https://www.w3.org/TR/css-color-4/#the-hsl-notation)
    ///
    /// Legacy comma-separated `rgb()`, `rgba()`, `hsl()` and `hsla()`.
    /// Returns `None` for any other function or a malformed argument list.
    #[must_use]
    pub fn from_function(function: &TermFunction) -> Option<Self> {
        if !function.is_valid() {
            return None;
        }
        let args = function
            .separated_args()
            .into_iter()
            .map(|group| match group {
                [single] => single.as_numeric().copied(),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        let name = function.name().to_ascii_lowercase();
        let (channels, alpha) = match (name.as_str(), args.as_slice()) {
            ("rgb", [r, g, b]) | ("rgba", [r, g, b, _]) => {
                // Channels are either all numbers or all percentages.
                let percents = [r, g, b]
                    .iter()
                    .filter(|channel| channel.kind() == NumericKind::Percent)
                    .count();
                if percents != 0 && percents != 3 {
                    return None;
                }
                ([rgb_channel(r)?, rgb_channel(g)?, rgb_channel(b)?], args.get(3))
            }
            ("hsl", [h, s, l]) | ("hsla", [h, s, l, _]) => {
                if !is_plain_number(h)
                    || s.kind() != NumericKind::Percent
                    || l.kind() != NumericKind::Percent
                {
                    return None;
                }
                (hsl_to_rgb(h.value(), s.value(), l.value()), args.get(3))
            }
            _ => return None,
        };

        let alpha = match alpha {
            Some(alpha) => alpha_channel(alpha)?,
            None => 255,
        };
        let [r, g, b] = channels;
        Some(Self::new(Color::rgba(r, g, b, alpha)))
    }
}

impl fmt::Display for TermColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.keyword {
            Some(keyword) => f.write_str(keyword.as_ref()),
            None => f.write_str(&self.color.to_hex_string()),
        }
    }
}

impl From<Color> for TermColor {
    fn from(color: Color) -> Self {
        Self::new(color)
    }
}

fn is_plain_number(numeric: &Numeric) -> bool {
    matches!(numeric.kind(), NumericKind::Integer | NumericKind::Number)
}

/// "Values outside these ranges are not invalid, but are clamped to the
/// ranges defined here at parsed-value time."
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_to_byte(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn rgb_channel(numeric: &Numeric) -> Option<u8> {
    match numeric.kind() {
        NumericKind::Integer | NumericKind::Number => Some(clamp_to_byte(numeric.value())),
        NumericKind::Percent => Some(clamp_to_byte(numeric.value() * 2.55)),
        _ => None,
    }
}

fn alpha_channel(numeric: &Numeric) -> Option<u8> {
    match numeric.kind() {
        NumericKind::Integer | NumericKind::Number => {
            Some(clamp_to_byte(numeric.value().clamp(0.0, 1.0) * 255.0))
        }
        NumericKind::Percent => Some(clamp_to_byte(numeric.value() * 2.55)),
        _ => None,
    }
}

/// [§ 7.1 Converting HSL Colors to sRGB](https://www.w3.org/TR/css-color-4/#hsl-to-rgb)
fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> [u8; 3] {
    let hue = hue.rem_euclid(360.0);
    let saturation = (saturation / 100.0).clamp(0.0, 1.0);
    let lightness = (lightness / 100.0).clamp(0.0, 1.0);

    let channel = |n: f32| {
        let k = (n + hue / 30.0) % 12.0;
        let a = saturation * lightness.min(1.0 - lightness);
        lightness - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
    };

    [
        clamp_to_byte(channel(0.0) * 255.0),
        clamp_to_byte(channel(8.0) * 255.0),
        clamp_to_byte(channel(4.0) * 255.0),
    ]
}

impl Term {
    /// A color term.
    #[must_use]
    pub fn color(color: TermColor) -> Self {
        Self::from(color)
    }
}
