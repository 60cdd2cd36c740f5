//! Attribute selectors.
//!
//! [Selectors Level 4 § 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)

use std::fmt;

use cssom_common::{EscapeLevel, escape_identifier, escape_string};
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use super::CaseSensitivity;
use crate::error::CssError;

/// The comparison an attribute selector performs on the attribute value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString, AsRefStr, EnumIter,
)]
pub enum AttributeOperator {
    /// `[att]`: "Represents an element with the att attribute, whatever the
    /// value of the attribute."
    #[default]
    #[strum(serialize = "")]
    NoOperator,
    /// `[att=val]`: "Represents an element with the att attribute whose value
    /// is exactly "val"."
    #[strum(serialize = "=")]
    Equals,
    /// `[att~=val]`: "Represents an element with the att attribute whose value
    /// is a whitespace-separated list of words, one of which is exactly
    /// "val". If "val" contains whitespace, it will never represent anything.
    /// Also if "val" is the empty string, it will never represent anything."
    #[strum(serialize = "~=")]
    Includes,
    /// `[att|=val]`: "Represents an element with the att attribute, its value
    /// either being exactly "val" or beginning with "val" immediately
    /// followed by "-" (U+002D)."
    #[strum(serialize = "|=")]
    DashMatch,
    /// `[att*=val]`: "Represents an element with the att attribute whose value
    /// contains at least one instance of the substring "val"."
    #[strum(serialize = "*=")]
    Contains,
    /// `[att^=val]`: "Represents an element with the att attribute whose value
    /// begins with the prefix "val"."
    #[strum(serialize = "^=")]
    StartsWith,
    /// `[att$=val]`: "Represents an element with the att attribute whose value
    /// ends with the suffix "val"."
    #[strum(serialize = "$=")]
    EndsWith,
}

impl AttributeOperator {
    /// Test an attribute's `actual` value against the selector's `expected`
    /// value.
    ///
    /// For `^=`, `$=` and `*=`: "If "val" is the empty string then the
    /// selector does not represent anything."
    #[must_use]
    pub fn matches(self, actual: &str, expected: &str, case: CaseSensitivity) -> bool {
        let (actual, expected) = match case {
            CaseSensitivity::Sensitive => (actual.to_string(), expected.to_string()),
            CaseSensitivity::Insensitive => {
                (actual.to_ascii_lowercase(), expected.to_ascii_lowercase())
            }
        };
        match self {
            Self::NoOperator => true,
            Self::Equals => actual == expected,
            Self::Includes => {
                !expected.is_empty()
                    && !expected.contains(|c: char| c.is_ascii_whitespace())
                    && actual.split_ascii_whitespace().any(|word| word == expected)
            }
            Self::DashMatch => {
                actual == expected
                    || actual
                        .strip_prefix(expected.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }
            Self::Contains => !expected.is_empty() && actual.contains(expected.as_str()),
            Self::StartsWith => !expected.is_empty() && actual.starts_with(expected.as_str()),
            Self::EndsWith => !expected.is_empty() && actual.ends_with(expected.as_str()),
        }
    }
}

/// `[name op value]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AttributeSelector {
    name: String,
    value: String,
    operator: AttributeOperator,
    is_string_value: bool,
}

impl AttributeSelector {
    /// Create an attribute selector. `is_string_value` records whether the
    /// value was written quoted.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn new(
        name: &str,
        value: &str,
        operator: AttributeOperator,
        is_string_value: bool,
    ) -> Result<Self, CssError> {
        if name.is_empty() {
            return Err(CssError::invalid("attribute name must not be empty"));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.to_string(),
            operator,
            is_string_value,
        })
    }

    /// The attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value compared against. Empty for `[att]`.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The comparison.
    #[must_use]
    pub const fn operator(&self) -> AttributeOperator {
        self.operator
    }

    /// Whether the value was quoted in the source.
    #[must_use]
    pub const fn is_string_value(&self) -> bool {
        self.is_string_value
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = EscapeLevel::default();
        write!(f, "[{}", escape_identifier(&self.name, level))?;
        if self.operator != AttributeOperator::NoOperator {
            f.write_str(self.operator.as_ref())?;
            if self.is_string_value {
                write!(f, "\"{}\"", escape_string(&self.value, level))?;
            } else {
                f.write_str(&escape_identifier(&self.value, level))?;
            }
        }
        f.write_str("]")
    }
}
