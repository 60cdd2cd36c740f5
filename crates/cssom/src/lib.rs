//! The CSS object model: value terms, `calc()`, selectors and rules.
//!
//! # Scope
//!
//! This crate implements:
//! - **Value terms** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/))
//!   - Numbers, percentages and dimensions with unit families
//!   - Colors, strings, identifiers, URLs, functions, `rect()`
//!   - Serialization back to CSS text
//!
//! - **`calc()`** ([§ 10 Mathematical Expressions](https://www.w3.org/TR/css-values-4/#math))
//!   - Infix to postfix reordering with type checking
//!   - Reduction through a caller-supplied [`calc::Evaluator`]
//!
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, attribute and universal selectors
//!   - Structural, negation and condition-driven pseudo-classes
//!   - Combinators and specificity
//!
//! - **Rules** ([CSSOM](https://drafts.csswg.org/cssom/))
//!   - Rule sets, `@media`, `@keyframes`, `@font-face`, `@page`, `@viewport`
//!   - Style sheets with cascade origin
//!
//! # Not Implemented
//!
//! - Tokenizing and parsing CSS text
//! - The cascade and computed values

/// `calc()` expressions and their evaluation.
pub mod calc;
/// Error types.
pub mod error;
/// Rule containers and style sheets per [CSSOM](https://drafts.csswg.org/cssom/).
pub mod rule;
/// Selector model and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Value terms per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod term;

// Re-exports for convenience
pub use calc::{Evaluator, NumericEvaluator, ResolutionContext, StringEvaluator, TermCalc};
pub use error::CssError;
pub use rule::{
    Declaration, Origin, RuleBlock, RuleContainer, RuleFontFace, RuleKeyframes, RuleMedia,
    RulePage, RuleSet, RuleViewport, StyleSheet,
};
pub use selector::{
    CombinedSelector, ElementMatcher, MatchCondition, Selector, SelectorPart, Specificity,
    StandardMatcher,
};
pub use term::{Numeric, Term, TermValue, Unit};
