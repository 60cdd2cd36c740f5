//! Function terms.
//!
//! [CSS Syntax § 4.3.8 Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)

use std::fmt::{self, Write};

use cssom_common::{EscapeLevel, escape_identifier, warn_once};
use serde::Serialize;

use super::{Delim, Operator, Term};
use crate::error::CssError;

/// A function call: a name and its argument terms.
///
/// Arguments are stored flat, each carrying the operator that joined it to
/// the previous one, so `f(1, 2 3)` holds `1`, `, 2` and ` 3`.
#[derive(Debug, Clone, PartialEq, Hash, Serialize)]
pub struct TermFunction {
    name: String,
    args: Vec<Term>,
    valid: bool,
}

impl TermFunction {
    /// Create a function term.
    ///
    /// A `-` delimiter at the start of the argument list or right after a
    /// comma is a sign, not an operator: it is folded into the argument that
    /// follows, which takes over the delimiter's operator. A sign that has
    /// nothing to apply to leaves the function invalid.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] if `name` is empty.
    pub fn new(name: &str, args: Vec<Term>) -> Result<Self, CssError> {
        if name.is_empty() {
            return Err(CssError::invalid("function name must not be empty"));
        }

        let mut folded: Vec<Term> = Vec::with_capacity(args.len());
        let mut valid = true;
        let mut args = args.into_iter().peekable();

        while let Some(arg) = args.next() {
            let is_sign = arg.as_delim() == Some(Delim::Minus)
                && (folded.is_empty() || arg.operator() == Some(Operator::Comma));
            if !is_sign {
                folded.push(arg);
                continue;
            }

            match args.peek().and_then(Term::negated) {
                Some(negated) => {
                    let _ = args.next();
                    folded.push(negated.with_operator(arg.operator()));
                }
                None => {
                    warn_once(
                        "term",
                        &format!("dangling '-' in arguments of {name}(), function ignored"),
                    );
                    valid = false;
                    folded.push(arg);
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            args: folded,
            valid,
        })
    }

    /// The function name, unescaped.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument terms, in source order.
    #[must_use]
    pub fn args(&self) -> &[Term] {
        &self.args
    }

    /// Whether the argument list was well formed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Override the validity flag, for hosts that check arguments against
    /// a particular function's grammar.
    pub const fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    /// [§ 2.2 Component value combinators](https://www.w3.org/TR/css-values-4/#component-combinators)
    ///
    /// The arguments split into comma-separated groups. An empty argument
    /// list has no groups.
    #[must_use]
    pub fn separated_args(&self) -> Vec<&[Term]> {
        let mut groups = Vec::new();
        let mut start = 0;
        for (index, arg) in self.args.iter().enumerate() {
            if index > start && arg.operator() == Some(Operator::Comma) {
                groups.push(&self.args[start..index]);
                start = index;
            }
        }
        if start < self.args.len() {
            groups.push(&self.args[start..]);
        }
        groups
    }

    /// Copy with a `-` prefixed to the name.
    pub(super) fn negated(&self) -> Self {
        Self {
            name: format!("-{}", self.name),
            ..self.clone()
        }
    }

    pub(super) fn write_css<W: Write>(&self, out: &mut W, level: EscapeLevel) -> fmt::Result {
        out.write_str(&escape_identifier(&self.name, level))?;
        out.write_char('(')?;
        for (index, arg) in self.args.iter().enumerate() {
            // The first argument never gets a separator in front.
            if index == 0 {
                arg.value.write_css(out, level)?;
            } else {
                arg.write_css(out, level)?;
            }
        }
        out.write_char(')')
    }
}

impl fmt::Display for TermFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_css(f, EscapeLevel::default())
    }
}

impl Term {
    /// A function term.
    ///
    /// # Errors
    ///
    /// See [`TermFunction::new`].
    pub fn function(name: &str, args: Vec<Term>) -> Result<Self, CssError> {
        Ok(Self::from(TermFunction::new(name, args)?))
    }
}
