use std::convert::Infallible;
use std::fmt;
use std::iter::Peekable;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use finstore_types::{FinStoreError, TimeSeriesPoint};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::resample::{HistoryValues, ResampleWindow, build_sorted_history_data};

/// Binary operator applied pointwise to two series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComposeType {
    /// `left + right`
    Add,
    /// `left - right`
    Subtract,
    /// `left * right`
    Multiply,
    /// `left / right`
    Divide,
}

impl ComposeType {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }

    /// Apply the operator with checked decimal arithmetic.
    ///
    /// # Errors
    /// Returns `DivisionByZero` for a zero divisor and `Overflow` when the result
    /// does not fit a `Decimal`.
    pub fn apply(self, left: Decimal, right: Decimal) -> Result<Decimal, ArithmeticError> {
        let out = match self {
            Self::Add => left.checked_add(right),
            Self::Subtract => left.checked_sub(right),
            Self::Multiply => left.checked_mul(right),
            Self::Divide => {
                if right.is_zero() {
                    return Err(ArithmeticError::DivisionByZero);
                }
                left.checked_div(right)
            }
        };
        out.ok_or(ArithmeticError::Overflow)
    }
}

impl fmt::Display for ComposeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComposeType {
    type Err = FinStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FinStoreError::InvalidArg(format!("unknown compose type: {s}")))
    }
}

/// Per-point arithmetic failure routed to the composition error handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    /// Right operand of a division was zero.
    #[error("division by zero")]
    DivisionByZero,
    /// Result does not fit the decimal representation.
    #[error("decimal overflow")]
    Overflow,
}

/// Error policy substituting zero for any failed point.
///
/// # Errors
/// Never fails.
pub fn zero_on_error(
    _error: ArithmeticError,
    _compose_type: ComposeType,
    _moment: DateTime<FixedOffset>,
    _left: Decimal,
    _right: Decimal,
) -> Result<Decimal, Infallible> {
    Ok(Decimal::ZERO)
}

/// Resample both series over `window` and combine them pointwise.
///
/// One value is produced per moment present in either resampled series.
/// A side without a value at that moment contributes its most recent earlier
/// value; moments where one side has no value yet are skipped.
///
/// Arithmetic failures go to `on_error`, whose `Ok` value replaces the failed
/// point. An `Err` from the handler is yielded once and ends the sequence.
pub fn build_composed_sorted_history_data<L, R, F, E>(
    left: L,
    right: R,
    compose_type: ComposeType,
    window: &ResampleWindow,
    on_error: F,
) -> ComposedValues<F>
where
    L: IntoIterator<Item = TimeSeriesPoint>,
    R: IntoIterator<Item = TimeSeriesPoint>,
    F: FnMut(ArithmeticError, ComposeType, DateTime<FixedOffset>, Decimal, Decimal) -> Result<Decimal, E>,
{
    ComposedValues {
        left: build_sorted_history_data(left, window).peekable(),
        right: build_sorted_history_data(right, window).peekable(),
        last_left: None,
        last_right: None,
        compose_type,
        on_error,
        done: false,
    }
}

/// Lazy, ascending sequence of composed values.
pub struct ComposedValues<F> {
    left: Peekable<HistoryValues>,
    right: Peekable<HistoryValues>,
    last_left: Option<Decimal>,
    last_right: Option<Decimal>,
    compose_type: ComposeType,
    on_error: F,
    done: bool,
}

impl<F> fmt::Debug for ComposedValues<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComposedValues")
            .field("compose_type", &self.compose_type)
            .field("last_left", &self.last_left)
            .field("last_right", &self.last_right)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<F, E> Iterator for ComposedValues<F>
where
    F: FnMut(ArithmeticError, ComposeType, DateTime<FixedOffset>, Decimal, Decimal) -> Result<Decimal, E>,
{
    type Item = Result<TimeSeriesPoint, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let moment = match (self.left.peek(), self.right.peek()) {
                (None, None) => return None,
                (Some(l), None) => l.moment,
                (None, Some(r)) => r.moment,
                (Some(l), Some(r)) => l.moment.min(r.moment),
            };
            if let Some(p) = self.left.next_if(|p| p.moment == moment) {
                self.last_left = Some(p.value);
            }
            if let Some(p) = self.right.next_if(|p| p.moment == moment) {
                self.last_right = Some(p.value);
            }
            let (Some(left), Some(right)) = (self.last_left, self.last_right) else {
                continue;
            };
            let value = match self.compose_type.apply(left, right) {
                Ok(v) => v,
                Err(err) => match (self.on_error)(err, self.compose_type, moment, left, right) {
                    Ok(v) => v,
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
            };
            return Some(Ok(TimeSeriesPoint::new(moment, value)));
        }
    }
}
