use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::{ConfigError, EvalError};
use super::facts::Facts;
use super::operator::Operator;
use super::token::Token;
use super::value::ValueKind;

/// A token paired with an operator of the same kind: the atomic boolean test.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serial::ExpressionDef"))]
pub struct Expression {
    token: Token,
    operator: Operator,
}

impl Expression {
    /// Pair a token with an operator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::KindMismatch`] if the operator does not accept
    /// the token's kind, [`ConfigError::InvalidBounds`] for a bad range, or
    /// [`ConfigError::NaNBaseline`] for a comparison against NaN.
    pub fn new(token: Token, operator: Operator) -> Result<Self, ConfigError> {
        crate::compile::check_expression(&token, &operator)?;
        Ok(Self { token, operator })
    }

    #[must_use]
    pub fn token(&self) -> &Token {
        &self.token
    }

    #[must_use]
    pub fn operator(&self) -> &Operator {
        &self.operator
    }

    /// Resolve the token and apply the operator. A missing fact is a
    /// non-match except under `IsNone`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] if the fact is present with the wrong kind.
    pub fn evaluate(&self, facts: &Facts) -> Result<bool, EvalError> {
        crate::evaluate::eval_expression(self, facts)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} {})", self.token, self.operator)
    }
}

/// Builder for numeric fact expressions. Created by [`numeric()`].
///
/// Baselines are not checked here. A NaN baseline is rejected when the
/// enclosing rule is built.
#[derive(Debug, Clone)]
pub struct NumericTerm {
    name: String,
}

/// Builder for string fact expressions. Created by [`string()`].
#[derive(Debug, Clone)]
pub struct StringTerm {
    name: String,
}

/// Builder for boolean fact expressions. Created by [`boolean()`].
#[derive(Debug, Clone)]
pub struct BooleanTerm {
    name: String,
}

fn typed(token: Token, operator: Operator) -> Expression {
    debug_assert_eq!(token.kind(), operator.kind());
    Expression { token, operator }
}

impl NumericTerm {
    fn token(self) -> Token {
        Token::Numeric(self.name)
    }

    #[must_use]
    pub fn lt(self, v: impl Into<f64>) -> Expression {
        typed(self.token(), Operator::lt(v))
    }

    #[must_use]
    pub fn lte(self, v: impl Into<f64>) -> Expression {
        typed(self.token(), Operator::lte(v))
    }

    #[must_use]
    pub fn gt(self, v: impl Into<f64>) -> Expression {
        typed(self.token(), Operator::gt(v))
    }

    #[must_use]
    pub fn gte(self, v: impl Into<f64>) -> Expression {
        typed(self.token(), Operator::gte(v))
    }

    #[must_use]
    pub fn eq(self, v: impl Into<f64>) -> Expression {
        typed(self.token(), Operator::eq(v))
    }

    #[must_use]
    pub fn not_eq(self, v: impl Into<f64>) -> Expression {
        typed(self.token(), Operator::not_eq(v))
    }

    /// Inclusive range check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBounds`] if `floor > ceiling`.
    pub fn between(
        self,
        floor: impl Into<f64>,
        ceiling: impl Into<f64>,
    ) -> Result<Expression, ConfigError> {
        Ok(typed(self.token(), Operator::between(floor, ceiling)?))
    }

    #[must_use]
    pub fn is_none(self) -> Expression {
        typed(self.token(), Operator::is_none(ValueKind::Numeric))
    }
}

impl StringTerm {
    fn token(self) -> Token {
        Token::String(self.name)
    }

    pub fn is_in<I, S>(self, values: I) -> Expression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        typed(self.token(), Operator::is_in(values))
    }

    pub fn not_in<I, S>(self, values: I) -> Expression
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        typed(self.token(), Operator::not_in(values))
    }

    #[must_use]
    pub fn contains(self, needle: impl Into<String>) -> Expression {
        typed(self.token(), Operator::contains(needle))
    }

    #[must_use]
    pub fn equals(self, v: impl Into<String>) -> Expression {
        typed(self.token(), Operator::equals(v))
    }

    #[must_use]
    pub fn is_none(self) -> Expression {
        typed(self.token(), Operator::is_none(ValueKind::String))
    }
}

impl BooleanTerm {
    fn token(self) -> Token {
        Token::Boolean(self.name)
    }

    #[must_use]
    pub fn is(self, v: bool) -> Expression {
        typed(self.token(), Operator::is(v))
    }

    #[must_use]
    pub fn is_none(self) -> Expression {
        typed(self.token(), Operator::is_none(ValueKind::Boolean))
    }
}

#[must_use]
pub fn numeric(name: &str) -> NumericTerm {
    NumericTerm {
        name: name.to_owned(),
    }
}

#[must_use]
pub fn string(name: &str) -> StringTerm {
    StringTerm {
        name: name.to_owned(),
    }
}

#[must_use]
pub fn boolean(name: &str) -> BooleanTerm {
    BooleanTerm {
        name: name.to_owned(),
    }
}
