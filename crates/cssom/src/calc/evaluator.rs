//! Numeric evaluation of `calc()` expressions.
//!
//! [§ 4.4 Used Values](https://www.w3.org/TR/css-cascade-4/#used-value)
//!
//! Operands are converted to the canonical unit of their family before they
//! are combined:
//!
//! | family     | canonical unit |
//! |------------|----------------|
//! | length     | `px`           |
//! | angle      | `deg`          |
//! | time       | `ms`           |
//! | frequency  | `Hz`           |
//! | resolution | `dppx`         |
//!
//! Relative lengths and percentages need a [`ResolutionContext`].

use std::f64::consts::PI;

use super::{CalcOperator, Evaluator};
use crate::error::EvalError;
use crate::term::{Numeric, NumericKind, Term, TermValue, Unit};

/// User agent default font size.
///
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// "Initial: medium" - medium is 16px per common browser convention.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// Context required to resolve relative units to canonical values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolutionContext {
    /// [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    ///
    /// "em: Equal to the computed value of the font-size property of the element
    /// on which it is used."
    pub font_size_px: f64,

    /// "rem: Equal to the computed value of font-size on the root element."
    pub root_font_size_px: f64,

    /// [§ 5.1.2 Viewport-percentage lengths](https://www.w3.org/TR/css-values-4/#viewport-relative-lengths)
    ///
    /// "The viewport-percentage lengths are relative to the size of the
    /// initial containing block."
    pub viewport_width: f64,

    /// Height of the initial containing block.
    pub viewport_height: f64,

    /// [§ 5.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    ///
    /// The length that 100% stands for. Percentages fail to evaluate
    /// without one.
    pub percent_base: Option<f64>,
}

impl ResolutionContext {
    /// Create a context with default font sizes (16px) and specified viewport.
    #[must_use]
    pub const fn with_viewport(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            font_size_px: DEFAULT_FONT_SIZE_PX,
            root_font_size_px: DEFAULT_FONT_SIZE_PX,
            viewport_width,
            viewport_height,
            percent_base: None,
        }
    }

    /// Builder-style percentage base setter.
    #[must_use]
    pub const fn with_percent_base(mut self, base: f64) -> Self {
        self.percent_base = Some(base);
        self
    }
}

impl Default for ResolutionContext {
    fn default() -> Self {
        Self::with_viewport(0.0, 0.0)
    }
}

/// Evaluates expressions to plain numbers in canonical units, as `f64` or
/// `f32`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericEvaluator {
    context: ResolutionContext,
}

impl NumericEvaluator {
    /// Create an evaluator resolving relative units through `context`.
    #[must_use]
    pub const fn new(context: ResolutionContext) -> Self {
        Self { context }
    }

    /// The resolution context in use.
    #[must_use]
    pub const fn context(&self) -> &ResolutionContext {
        &self.context
    }

    /// The value of `numeric` in the canonical unit of its family.
    fn canonical(&self, numeric: &Numeric) -> Result<f64, EvalError> {
        let value = f64::from(numeric.value());
        if numeric.kind() == NumericKind::Percent {
            return self
                .context
                .percent_base
                .map(|base| value / 100.0 * base)
                .ok_or_else(|| format!("no base to resolve {numeric} against").into());
        }
        let Some(unit) = numeric.unit() else {
            return Ok(value);
        };
        let ctx = &self.context;
        let factor = match unit {
            // [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
            Unit::Px => 1.0,
            Unit::In => 96.0,
            Unit::Cm => 96.0 / 2.54,
            Unit::Mm => 96.0 / 25.4,
            Unit::Q => 96.0 / 101.6,
            Unit::Pt => 96.0 / 72.0,
            Unit::Pc => 16.0,
            // [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
            // "In the cases where it is impossible or impractical to determine
            // the x-height, a value of 0.5em must be assumed."
            Unit::Em => ctx.font_size_px,
            Unit::Rem => ctx.root_font_size_px,
            Unit::Ex | Unit::Ch => ctx.font_size_px * 0.5,
            Unit::Vw => ctx.viewport_width / 100.0,
            Unit::Vh => ctx.viewport_height / 100.0,
            Unit::Vmin => ctx.viewport_width.min(ctx.viewport_height) / 100.0,
            Unit::Vmax => ctx.viewport_width.max(ctx.viewport_height) / 100.0,
            // [§ 7.1 Angle Units](https://www.w3.org/TR/css-values-4/#angles)
            Unit::Deg => 1.0,
            Unit::Rad => 180.0 / PI,
            Unit::Grad => 0.9,
            Unit::Turn => 360.0,
            // [§ 7.2 Duration Units](https://www.w3.org/TR/css-values-4/#time)
            Unit::S => 1000.0,
            Unit::Ms => 1.0,
            // [§ 7.3 Frequency Units](https://www.w3.org/TR/css-values-4/#frequency)
            Unit::Hz => 1.0,
            Unit::KHz => 1000.0,
            // [§ 7.4 Resolution Units](https://www.w3.org/TR/css-values-4/#resolution)
            Unit::Dppx => 1.0,
            Unit::Dpi => 1.0 / 96.0,
            Unit::Dpcm => 2.54 / 96.0,
        };
        Ok(value * factor)
    }
}

impl Evaluator<f64> for NumericEvaluator {
    fn evaluate_argument(&self, argument: &Term) -> Result<f64, EvalError> {
        match argument.value() {
            TermValue::Numeric(numeric) => self.canonical(numeric),
            TermValue::Calc(nested) => Ok(nested.args().evaluate::<f64, _>(self)?),
            _ => Err(format!("'{argument}' is not a numeric operand").into()),
        }
    }

    fn evaluate_binary(
        &self,
        left: f64,
        right: f64,
        operator: CalcOperator,
    ) -> Result<f64, EvalError> {
        match operator {
            CalcOperator::Add => Ok(left + right),
            CalcOperator::Subtract => Ok(left - right),
            CalcOperator::Multiply => Ok(left * right),
            // [§ 10.9](https://www.w3.org/TR/css-values-4/#calc-type-checking)
            // "If a division by zero is detected, the expression is invalid."
            CalcOperator::Divide if right == 0.0 => Err("division by zero".into()),
            CalcOperator::Divide => Ok(left / right),
            CalcOperator::Negate => Err("'~' is not a binary operator".into()),
        }
    }

    fn evaluate_unary(&self, value: f64, operator: CalcOperator) -> Result<f64, EvalError> {
        match operator {
            CalcOperator::Negate => Ok(-value),
            _ => Err(format!("'{operator}' is not a unary operator").into()),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
impl Evaluator<f32> for NumericEvaluator {
    fn evaluate_argument(&self, argument: &Term) -> Result<f32, EvalError> {
        Evaluator::<f64>::evaluate_argument(self, argument).map(|value| value as f32)
    }

    fn evaluate_binary(
        &self,
        left: f32,
        right: f32,
        operator: CalcOperator,
    ) -> Result<f32, EvalError> {
        Evaluator::<f64>::evaluate_binary(self, f64::from(left), f64::from(right), operator)
            .map(|value| value as f32)
    }

    fn evaluate_unary(&self, value: f32, operator: CalcOperator) -> Result<f32, EvalError> {
        Evaluator::<f64>::evaluate_unary(self, f64::from(value), operator).map(|value| value as f32)
    }
}
