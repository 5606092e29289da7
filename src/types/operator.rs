use std::collections::BTreeSet;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::token::Resolved;
use super::value::ValueKind;

/// Comparisons accepted by numeric tokens. Baselines are bound at construction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NumericOp {
    Lt(f64),
    Lte(f64),
    Gt(f64),
    Gte(f64),
    Eq(f64),
    NotEq(f64),
    /// Inclusive on both ends.
    Between { floor: f64, ceiling: f64 },
    IsNone,
}

/// Comparisons accepted by string tokens. Matching is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StringOp {
    In(BTreeSet<String>),
    NotIn(BTreeSet<String>),
    /// Substring presence.
    Contains(String),
    Equals(String),
    IsNone,
}

/// Comparisons accepted by boolean tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BooleanOp {
    Is(bool),
    IsNone,
}

/// A predicate bound to its baseline parameters, applied to one resolved value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    Numeric(NumericOp),
    String(StringOp),
    Boolean(BooleanOp),
}

impl Operator {
    #[must_use]
    pub fn lt(v: impl Into<f64>) -> Self {
        Operator::Numeric(NumericOp::Lt(v.into()))
    }

    #[must_use]
    pub fn lte(v: impl Into<f64>) -> Self {
        Operator::Numeric(NumericOp::Lte(v.into()))
    }

    #[must_use]
    pub fn gt(v: impl Into<f64>) -> Self {
        Operator::Numeric(NumericOp::Gt(v.into()))
    }

    #[must_use]
    pub fn gte(v: impl Into<f64>) -> Self {
        Operator::Numeric(NumericOp::Gte(v.into()))
    }

    #[must_use]
    pub fn eq(v: impl Into<f64>) -> Self {
        Operator::Numeric(NumericOp::Eq(v.into()))
    }

    #[must_use]
    pub fn not_eq(v: impl Into<f64>) -> Self {
        Operator::Numeric(NumericOp::NotEq(v.into()))
    }

    /// Inclusive range check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBounds`] if `floor > ceiling` or either
    /// bound is NaN.
    pub fn between(floor: impl Into<f64>, ceiling: impl Into<f64>) -> Result<Self, ConfigError> {
        let op = Operator::Numeric(NumericOp::Between {
            floor: floor.into(),
            ceiling: ceiling.into(),
        });
        op.validate()?;
        Ok(op)
    }

    pub fn is_in<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Operator::String(StringOp::In(values.into_iter().map(Into::into).collect()))
    }

    pub fn not_in<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Operator::String(StringOp::NotIn(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    #[must_use]
    pub fn contains(needle: impl Into<String>) -> Self {
        Operator::String(StringOp::Contains(needle.into()))
    }

    #[must_use]
    pub fn equals(v: impl Into<String>) -> Self {
        Operator::String(StringOp::Equals(v.into()))
    }

    #[must_use]
    pub fn is(v: bool) -> Self {
        Operator::Boolean(BooleanOp::Is(v))
    }

    /// Matches exactly when the value is missing. Bound to the given kind so
    /// it can pair with a token of that kind.
    #[must_use]
    pub fn is_none(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Numeric => Operator::Numeric(NumericOp::IsNone),
            ValueKind::String => Operator::String(StringOp::IsNone),
            ValueKind::Boolean => Operator::Boolean(BooleanOp::IsNone),
        }
    }

    /// The value kind this operator accepts.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Operator::Numeric(_) => ValueKind::Numeric,
            Operator::String(_) => ValueKind::String,
            Operator::Boolean(_) => ValueKind::Boolean,
        }
    }

    /// Check the bound parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBounds`] for an empty or NaN `Between`
    /// range and [`ConfigError::NaNBaseline`] for a comparison against NaN.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Operator::Numeric(op) = self else {
            return Ok(());
        };
        match *op {
            NumericOp::Between { floor, ceiling } => {
                // also rejects NaN
                if !(floor <= ceiling) {
                    return Err(ConfigError::InvalidBounds { floor, ceiling });
                }
            }
            NumericOp::Lt(v)
            | NumericOp::Lte(v)
            | NumericOp::Gt(v)
            | NumericOp::Gte(v)
            | NumericOp::Eq(v)
            | NumericOp::NotEq(v)
                if v.is_nan() =>
            {
                return Err(ConfigError::NaNBaseline {
                    operator: self.to_string(),
                });
            }
            _ => {}
        }
        Ok(())
    }

    /// Apply the predicate. `None` stands for a missing value: only `IsNone`
    /// matches it. A value of a kind this operator does not accept never matches.
    #[must_use]
    pub fn apply(&self, value: Option<&Resolved<'_>>) -> bool {
        match (self, value) {
            (Operator::Numeric(NumericOp::IsNone), v)
            | (Operator::String(StringOp::IsNone), v)
            | (Operator::Boolean(BooleanOp::IsNone), v) => v.is_none(),
            (_, None) => false,
            (Operator::Numeric(op), Some(Resolved::Number(n))) => apply_numeric(op, *n),
            (Operator::String(op), Some(Resolved::Text(s))) => apply_string(op, s),
            (Operator::Boolean(BooleanOp::Is(expected)), Some(Resolved::Bool(b))) => {
                expected == b
            }
            _ => false,
        }
    }
}

#[allow(clippy::float_cmp)]
fn apply_numeric(op: &NumericOp, n: f64) -> bool {
    match *op {
        NumericOp::Lt(v) => n < v,
        NumericOp::Lte(v) => n <= v,
        NumericOp::Gt(v) => n > v,
        NumericOp::Gte(v) => n >= v,
        NumericOp::Eq(v) => n == v,
        NumericOp::NotEq(v) => n != v,
        NumericOp::Between { floor, ceiling } => floor <= n && n <= ceiling,
        NumericOp::IsNone => false,
    }
}

fn apply_string(op: &StringOp, s: &str) -> bool {
    match op {
        StringOp::In(set) => set.contains(s),
        StringOp::NotIn(set) => !set.contains(s),
        StringOp::Contains(needle) => s.contains(needle.as_str()),
        StringOp::Equals(v) => s == v,
        StringOp::IsNone => false,
    }
}

fn write_set(f: &mut fmt::Formatter<'_>, set: &BTreeSet<String>) -> fmt::Result {
    write!(f, "[")?;
    for (i, item) in set.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "\"{item}\"")?;
    }
    write!(f, "]")
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Numeric(op) => match op {
                NumericOp::Lt(v) => write!(f, "< {v}"),
                NumericOp::Lte(v) => write!(f, "<= {v}"),
                NumericOp::Gt(v) => write!(f, "> {v}"),
                NumericOp::Gte(v) => write!(f, ">= {v}"),
                NumericOp::Eq(v) => write!(f, "== {v}"),
                NumericOp::NotEq(v) => write!(f, "!= {v}"),
                NumericOp::Between { floor, ceiling } => write!(f, "between {floor} and {ceiling}"),
                NumericOp::IsNone => write!(f, "is none"),
            },
            Operator::String(op) => match op {
                StringOp::In(set) => {
                    write!(f, "in ")?;
                    write_set(f, set)
                }
                StringOp::NotIn(set) => {
                    write!(f, "not in ")?;
                    write_set(f, set)
                }
                StringOp::Contains(v) => write!(f, "contains \"{v}\""),
                StringOp::Equals(v) => write!(f, "== \"{v}\""),
                StringOp::IsNone => write!(f, "is none"),
            },
            Operator::Boolean(op) => match op {
                BooleanOp::Is(v) => write!(f, "is {v}"),
                BooleanOp::IsNone => write!(f, "is none"),
            },
        }
    }
}
