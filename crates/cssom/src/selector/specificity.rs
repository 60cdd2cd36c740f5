//! Selector specificity.

use std::fmt;
use std::ops::{Add, AddAssign};

use serde::Serialize;

/// One component of a [`Specificity`], from most to least significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecificityLevel {
    /// Inline style (a DOM-identity selector with inline priority).
    A,
    /// ID selectors.
    B,
    /// Class selectors, attribute selectors and pseudo-classes.
    C,
    /// Type selectors and pseudo-elements.
    D,
}

/// [§ 17 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
///
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and
///    pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the
///    selector (= C)
///
/// Specificities are compared by comparing the three components in order."
///
/// A fourth, most significant component counts inline style, following
/// [CSS 2.1 § 6.4.3](https://www.w3.org/TR/CSS21/cascade.html#specificity).
/// The derived ordering is lexicographic over the four components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a specificity with (A, B, C, D) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32, d: u32) -> Self {
        Self(a, b, c, d)
    }

    /// The count at `level`.
    #[must_use]
    pub const fn get(&self, level: SpecificityLevel) -> u32 {
        match level {
            SpecificityLevel::A => self.0,
            SpecificityLevel::B => self.1,
            SpecificityLevel::C => self.2,
            SpecificityLevel::D => self.3,
        }
    }

    /// Count one more selector at `level`.
    pub const fn add_one(&mut self, level: SpecificityLevel) {
        let slot = match level {
            SpecificityLevel::A => &mut self.0,
            SpecificityLevel::B => &mut self.1,
            SpecificityLevel::C => &mut self.2,
            SpecificityLevel::D => &mut self.3,
        };
        *slot = slot.saturating_add(1);
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(
            self.0.saturating_add(other.0),
            self.1.saturating_add(other.1),
            self.2.saturating_add(other.2),
            self.3.saturating_add(other.3),
        )
    }
}

impl AddAssign for Specificity {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.0, self.1, self.2, self.3)
    }
}
