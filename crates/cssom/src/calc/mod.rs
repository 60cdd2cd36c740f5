//! `calc()` expressions
//!
//! [CSS Values and Units Level 4 § 10 Mathematical Expressions](https://www.w3.org/TR/css-values-4/#math)
//!
//! A `calc()` argument list arrives as a flat infix sequence of terms and
//! delimiter tokens. [`CalcArgs::new`] reorders it into postfix (reverse
//! Polish) form once, checking operand types on the way, so evaluation is a
//! single stack walk that any [`Evaluator`] can drive.
//!
//! ```text
//!   infix:    1px + 2px * 3
//!   postfix:  1px 2px 3 * +
//!   string:   (1px + (2px * 3))
//! ```

mod evaluator;

use std::fmt;

use cssom_common::warn_once;
use serde::Serialize;
use strum_macros::Display;

use crate::error::{CssError, EvalError};
use crate::term::{Delim, NumericKind, Term, TermType, TermValue};

pub use evaluator::{DEFAULT_FONT_SIZE_PX, NumericEvaluator, ResolutionContext};

/// [§ 10.1 calc()](https://www.w3.org/TR/css-values-4/#calc-syntax)
///
/// An operator in the postfix sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
pub enum CalcOperator {
    /// `+`
    #[strum(serialize = "+")]
    Add,
    /// `-`
    #[strum(serialize = "-")]
    Subtract,
    /// `*`
    #[strum(serialize = "*")]
    Multiply,
    /// `/`
    #[strum(serialize = "/")]
    Divide,
    /// Unary minus. Written `~` so it cannot be confused with subtraction.
    #[strum(serialize = "~")]
    Negate,
}

impl CalcOperator {
    /// Binding strength: `+ -` bind loosest, then `* /`, then unary minus.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 0,
            Self::Multiply | Self::Divide => 1,
            Self::Negate => 2,
        }
    }

    /// Whether the operator takes a single operand.
    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Negate)
    }

    const fn binary_from(delim: Delim) -> Option<Self> {
        match delim {
            Delim::Plus => Some(Self::Add),
            Delim::Minus => Some(Self::Subtract),
            Delim::Star => Some(Self::Multiply),
            Delim::Slash => Some(Self::Divide),
            Delim::Comma | Delim::LeftParen | Delim::RightParen => None,
        }
    }
}

/// One entry of the postfix sequence.
#[derive(Debug, Clone, PartialEq, Hash, Serialize)]
pub enum CalcItem {
    /// A leaf value, or a nested `calc()`.
    Operand(Term),
    /// An operator applied to the operands before it.
    Operator(CalcOperator),
}

/// Pluggable backend for [`CalcArgs::evaluate`].
///
/// Each callback may fail; failures surface as
/// [`CssError::CalcEvaluation`] with the callback's error as the source.
pub trait Evaluator<T> {
    /// Produce a value for a leaf operand.
    ///
    /// # Errors
    ///
    /// Any failure to interpret the operand.
    fn evaluate_argument(&self, argument: &Term) -> Result<T, EvalError>;

    /// Combine two operands, given in source order.
    ///
    /// # Errors
    ///
    /// Any failure to apply the operator.
    fn evaluate_binary(&self, left: T, right: T, operator: CalcOperator) -> Result<T, EvalError>;

    /// Apply a unary operator.
    ///
    /// # Errors
    ///
    /// Any failure to apply the operator.
    fn evaluate_unary(&self, value: T, operator: CalcOperator) -> Result<T, EvalError>;
}

/// The reduced argument list of a `calc()` expression, in postfix order.
#[derive(Debug, Clone, PartialEq, Hash, Serialize)]
pub struct CalcArgs {
    items: Vec<CalcItem>,
    term_type: TermType,
    is_integer: bool,
    valid: bool,
}

/// Entry of the operator stack while reordering.
#[derive(Clone, Copy)]
enum Pending {
    Open,
    Operator(CalcOperator),
}

impl CalcArgs {
    /// [§ 10.8 Syntax](https://www.w3.org/TR/css-values-4/#calc-syntax)
    ///
    /// Reorder an infix argument list into postfix with the shunting-yard
    /// algorithm. Operators are `+ - * /` delimiters, grouping uses `(` and
    /// `)` delimiters, and operands are numeric terms or nested `calc()`s.
    ///
    /// An expression that mixes unit families, has unbalanced parentheses,
    /// contains a non-numeric operand or is missing operands is built but
    /// marked invalid. Scanning stops at the first problem.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::InvalidArgument`] for an empty argument list.
    pub fn new(args: Vec<Term>) -> Result<Self, CssError> {
        if args.is_empty() {
            return Err(CssError::invalid("calc() needs at least one argument"));
        }

        let mut calc = Self {
            items: Vec::with_capacity(args.len()),
            term_type: TermType::Unitless,
            is_integer: true,
            valid: true,
        };
        if let Err(problem) = calc.reorder(args) {
            calc.valid = false;
            warn_once("calc", &format!("invalid calc() expression: {problem}"));
        }
        Ok(calc)
    }

    fn reorder(&mut self, args: Vec<Term>) -> Result<(), String> {
        let mut stack: Vec<Pending> = Vec::new();
        // A sign is expected at the start, after `(` and after an operator.
        let mut unary = true;

        for arg in args {
            if let Some(delim) = arg.as_delim() {
                if let Some(operator) = CalcOperator::binary_from(delim) {
                    self.push_operator(operator, unary, &mut stack)?;
                    unary = true;
                    continue;
                }
                match delim {
                    Delim::LeftParen => {
                        stack.push(Pending::Open);
                        unary = true;
                    }
                    Delim::RightParen => {
                        loop {
                            match stack.pop() {
                                Some(Pending::Operator(operator)) => {
                                    self.items.push(CalcItem::Operator(operator));
                                }
                                Some(Pending::Open) => break,
                                None => return Err("unbalanced ')'".to_string()),
                            }
                        }
                        unary = false;
                    }
                    _ => return Err(format!("'{}' is not allowed", delim.as_char())),
                }
                continue;
            }

            self.consider_type(&arg)?;
            self.items.push(CalcItem::Operand(arg.with_operator(None)));
            unary = false;
        }

        while let Some(pending) = stack.pop() {
            match pending {
                Pending::Operator(operator) => self.items.push(CalcItem::Operator(operator)),
                Pending::Open => return Err("unbalanced '('".to_string()),
            }
        }

        self.check_arity()
    }

    /// Where a sign is expected, `-` becomes negation and `+` is dropped.
    /// Otherwise operators of equal or higher priority are emitted first.
    fn push_operator(
        &mut self,
        operator: CalcOperator,
        unary: bool,
        stack: &mut Vec<Pending>,
    ) -> Result<(), String> {
        if unary {
            return match operator {
                CalcOperator::Subtract => {
                    stack.push(Pending::Operator(CalcOperator::Negate));
                    Ok(())
                }
                CalcOperator::Add => Ok(()),
                _ => Err(format!("'{operator}' has no left operand")),
            };
        }
        while let Some(&Pending::Operator(top)) = stack.last() {
            if top.priority() < operator.priority() {
                break;
            }
            let _ = stack.pop();
            self.items.push(CalcItem::Operator(top));
        }
        stack.push(Pending::Operator(operator));
        Ok(())
    }

    /// Fold an operand into the running type. Percentages stand in for
    /// lengths; bare numbers combine with anything.
    fn consider_type(&mut self, operand: &Term) -> Result<(), String> {
        let (operand_type, operand_is_integer) = match operand.value() {
            TermValue::Numeric(numeric) => {
                let operand_type = match numeric.kind() {
                    NumericKind::Integer | NumericKind::Number => TermType::Unitless,
                    NumericKind::Percent | NumericKind::Length => TermType::Length,
                    NumericKind::Angle => TermType::Angle,
                    NumericKind::Time => TermType::Time,
                    NumericKind::Frequency => TermType::Frequency,
                    NumericKind::Resolution => TermType::Resolution,
                };
                // Only a non-integral plain number clears the flag.
                let fractional = numeric.kind() == NumericKind::Number && !numeric.is_integral();
                (operand_type, !fractional)
            }
            TermValue::Calc(nested) if nested.is_valid() => {
                (nested.args.term_type, nested.args.is_integer)
            }
            _ => return Err(format!("'{operand}' is not a numeric operand")),
        };

        self.is_integer &= operand_is_integer;
        if operand_type == TermType::Unitless {
            return Ok(());
        }
        if self.term_type == TermType::Unitless {
            self.term_type = operand_type;
            return Ok(());
        }
        if self.term_type != operand_type {
            return Err(format!(
                "cannot combine {} with {operand_type}",
                self.term_type
            ));
        }
        Ok(())
    }

    /// Every operator must find its operands and exactly one value must
    /// remain.
    fn check_arity(&self) -> Result<(), String> {
        let mut depth: usize = 0;
        for item in &self.items {
            match item {
                CalcItem::Operand(_) => depth += 1,
                CalcItem::Operator(operator) if operator.is_unary() => {
                    if depth == 0 {
                        return Err(format!("'{operator}' has no operand"));
                    }
                }
                CalcItem::Operator(operator) => {
                    if depth < 2 {
                        return Err(format!("'{operator}' is missing an operand"));
                    }
                    depth -= 1;
                }
            }
        }
        if depth == 1 {
            Ok(())
        } else {
            Err("operands are not joined by operators".to_string())
        }
    }

    /// The postfix sequence.
    #[must_use]
    pub fn items(&self) -> &[CalcItem] {
        &self.items
    }

    /// The unit family of the result. `Unitless` when only plain numbers
    /// took part.
    #[must_use]
    pub const fn term_type(&self) -> TermType {
        self.term_type
    }

    /// Whether no operand was a plain number with a fractional part.
    /// Dimensions and percentages leave the flag alone.
    #[must_use]
    pub const fn is_integer(&self) -> bool {
        self.is_integer
    }

    /// Whether the expression may be evaluated.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Walk the postfix sequence with `evaluator`.
    ///
    /// # Errors
    ///
    /// Returns [`CssError::Unsupported`] for an invalid expression, and
    /// [`CssError::CalcEvaluation`] wrapping the first evaluator failure.
    pub fn evaluate<T, E>(&self, evaluator: &E) -> Result<T, CssError>
    where
        E: Evaluator<T> + ?Sized,
    {
        if !self.valid {
            return Err(CssError::Unsupported("evaluating an invalid calc() expression"));
        }
        self.walk(evaluator).map_err(CssError::CalcEvaluation)
    }

    fn walk<T, E>(&self, evaluator: &E) -> Result<T, EvalError>
    where
        E: Evaluator<T> + ?Sized,
    {
        let mut stack: Vec<T> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            let value = match item {
                CalcItem::Operand(term) => evaluator.evaluate_argument(term)?,
                CalcItem::Operator(operator) if operator.is_unary() => {
                    let value = stack.pop().ok_or("operand stack underflow")?;
                    evaluator.evaluate_unary(value, *operator)?
                }
                CalcItem::Operator(operator) => {
                    let right = stack.pop().ok_or("operand stack underflow")?;
                    let left = stack.pop().ok_or("operand stack underflow")?;
                    evaluator.evaluate_binary(left, right, *operator)?
                }
            };
            stack.push(value);
        }
        stack.pop().ok_or_else(|| "empty calc() expression".into())
    }
}

/// Renders an expression back to text, parenthesizing every binary
/// operation: `(1px + (2px * 3))`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringEvaluator;

impl Evaluator<String> for StringEvaluator {
    fn evaluate_argument(&self, argument: &Term) -> Result<String, EvalError> {
        match argument.as_calc() {
            Some(nested) => Ok(nested.args.evaluate(self)?),
            None => Ok(argument.to_string()),
        }
    }

    fn evaluate_binary(
        &self,
        left: String,
        right: String,
        operator: CalcOperator,
    ) -> Result<String, EvalError> {
        Ok(format!("({left} {operator} {right})"))
    }

    fn evaluate_unary(&self, value: String, operator: CalcOperator) -> Result<String, EvalError> {
        match operator {
            // Two signs cancel; `--1px` would read as an identifier.
            CalcOperator::Negate => Ok(value
                .strip_prefix('-')
                .map_or_else(|| format!("-{value}"), str::to_string)),
            _ => Err(format!("'{operator}' is not a unary operator").into()),
        }
    }
}

/// A `calc()` term. Its kind follows from the operands: a length
/// expression is a length, an expression of integers is an integer.
#[derive(Debug, Clone, PartialEq, Hash, Serialize)]
pub struct TermCalc {
    args: CalcArgs,
}

impl TermCalc {
    /// Reduce `args` and wrap the result.
    ///
    /// # Errors
    ///
    /// See [`CalcArgs::new`].
    pub fn new(args: Vec<Term>) -> Result<Self, CssError> {
        Ok(Self {
            args: CalcArgs::new(args)?,
        })
    }

    /// The reduced expression.
    #[must_use]
    pub const fn args(&self) -> &CalcArgs {
        &self.args
    }

    /// The numeric kind the expression resolves to.
    #[must_use]
    pub const fn kind(&self) -> NumericKind {
        match self.args.term_type {
            TermType::Unitless if self.args.is_integer => NumericKind::Integer,
            TermType::Unitless => NumericKind::Number,
            TermType::Length => NumericKind::Length,
            TermType::Angle => NumericKind::Angle,
            TermType::Time => NumericKind::Time,
            TermType::Frequency => NumericKind::Frequency,
            TermType::Resolution => NumericKind::Resolution,
        }
    }

    /// Whether the expression may be evaluated.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.args.valid
    }

    /// Evaluate with `evaluator`. See [`CalcArgs::evaluate`].
    ///
    /// # Errors
    ///
    /// See [`CalcArgs::evaluate`].
    pub fn evaluate<T, E>(&self, evaluator: &E) -> Result<T, CssError>
    where
        E: Evaluator<T> + ?Sized,
    {
        self.args.evaluate(evaluator)
    }
}

impl fmt::Display for TermCalc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(text) = self.args.evaluate::<String, _>(&StringEvaluator) else {
            // Invalid expressions are written out as far as they were read.
            f.write_str("calc(")?;
            for (index, item) in self.args.items.iter().enumerate() {
                if index > 0 {
                    f.write_str(" ")?;
                }
                match item {
                    CalcItem::Operand(term) => write!(f, "{term}")?,
                    CalcItem::Operator(operator) => write!(f, "{operator}")?,
                }
            }
            return f.write_str(")");
        };

        let wrapped = matches!(
            self.args.items.last(),
            Some(CalcItem::Operator(operator)) if !operator.is_unary()
        );
        if wrapped {
            write!(f, "calc{text}")
        } else {
            write!(f, "calc({text})")
        }
    }
}

impl Term {
    /// A `calc()` term.
    ///
    /// # Errors
    ///
    /// See [`CalcArgs::new`].
    pub fn calc(args: Vec<Term>) -> Result<Self, CssError> {
        Ok(Self::from(TermCalc::new(args)?))
    }
}
