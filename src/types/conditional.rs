use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::EvalError;
use super::expression::Expression;
use super::facts::Facts;

/// One child of a [`Conditional`]: an expression or a nested conditional.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Condition {
    Expression(Expression),
    Conditional(Conditional),
}

/// Short-circuit AND/OR over an ordered list of conditions.
///
/// An empty `WhenAll` is `true` and an empty `WhenAny` is `false`, the
/// identities of AND and OR.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Conditional {
    WhenAll(Vec<Condition>),
    WhenAny(Vec<Condition>),
}

impl Conditional {
    /// True when every condition is true. Stops at the first false one.
    pub fn all<I, C>(conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Conditional::WhenAll(conditions.into_iter().map(Into::into).collect())
    }

    /// True when any condition is true. Stops at the first true one.
    pub fn any<I, C>(conditions: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Condition>,
    {
        Conditional::WhenAny(conditions.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        match self {
            Conditional::WhenAll(c) | Conditional::WhenAny(c) => c,
        }
    }

    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] if an evaluated expression meets a
    /// fact of the wrong kind. Conditions skipped by short-circuiting are
    /// never resolved and cannot fail.
    pub fn evaluate(&self, facts: &Facts) -> Result<bool, EvalError> {
        crate::evaluate::eval_conditional(self, facts)
    }
}

impl From<Expression> for Condition {
    fn from(expr: Expression) -> Self {
        Condition::Expression(expr)
    }
}

impl From<Conditional> for Condition {
    fn from(cond: Conditional) -> Self {
        Condition::Conditional(cond)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Expression(e) => write!(f, "{e}"),
            Condition::Conditional(c) => write!(f, "{c}"),
        }
    }
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (joiner, empty) = match self {
            Conditional::WhenAll(_) => (" AND ", "true"),
            Conditional::WhenAny(_) => (" OR ", "false"),
        };
        let conditions = self.conditions();
        if conditions.is_empty() {
            return write!(f, "{empty}");
        }
        write!(f, "(")?;
        for (i, c) in conditions.iter().enumerate() {
            if i > 0 {
                write!(f, "{joiner}")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{numeric, string};

    fn loan_facts() -> Facts {
        Facts::new().set("cibil_score", 700).set("pet", "dog")
    }

    #[test]
    fn when_all_true() {
        let cond = Conditional::all([
            numeric("cibil_score").gte(650),
            numeric("cibil_score").lte(800),
        ]);
        assert_eq!(cond.evaluate(&loan_facts()), Ok(true));
    }

    #[test]
    fn when_all_one_false() {
        let cond = Conditional::all([
            numeric("cibil_score").gte(650),
            numeric("cibil_score").gt(750),
        ]);
        assert_eq!(cond.evaluate(&loan_facts()), Ok(false));
    }

    #[test]
    fn when_any() {
        let cond = Conditional::any([
            string("pet").equals("cat"),
            string("pet").equals("dog"),
        ]);
        assert_eq!(cond.evaluate(&loan_facts()), Ok(true));

        let cond = Conditional::any([string("pet").equals("cat")]);
        assert_eq!(cond.evaluate(&loan_facts()), Ok(false));
    }

    #[test]
    fn empty_identities() {
        let facts = Facts::new();
        assert_eq!(Conditional::all(Vec::<Condition>::new()).evaluate(&facts), Ok(true));
        assert_eq!(Conditional::any(Vec::<Condition>::new()).evaluate(&facts), Ok(false));
    }

    #[test]
    fn nested_any_inside_all() {
        let cond = Conditional::all([
            Condition::from(numeric("cibil_score").gte(650)),
            Condition::from(Conditional::any([
                string("pet").equals("cat"),
                string("pet").equals("dog"),
            ])),
        ]);
        assert_eq!(cond.evaluate(&loan_facts()), Ok(true));
    }

    #[test]
    fn when_all_short_circuits_before_bad_fact() {
        // pet is a string, so the second expression would fail if evaluated
        let cond = Conditional::all([numeric("cibil_score").lt(0), numeric("pet").gte(0)]);
        assert_eq!(cond.evaluate(&loan_facts()), Ok(false));
    }

    #[test]
    fn when_any_short_circuits_before_bad_fact() {
        let cond = Conditional::any([numeric("cibil_score").gt(0), numeric("pet").gte(0)]);
        assert_eq!(cond.evaluate(&loan_facts()), Ok(true));
    }

    #[test]
    fn evaluated_bad_fact_propagates() {
        let cond = Conditional::all([numeric("cibil_score").gt(0), numeric("pet").gte(0)]);
        assert!(matches!(
            cond.evaluate(&loan_facts()),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn display() {
        let cond = Conditional::all([
            Condition::from(numeric("a").gt(1)),
            Condition::from(Conditional::any([numeric("b").lt(2), numeric("c").eq(3)])),
        ]);
        assert_eq!(cond.to_string(), "((a > 1) AND ((b < 2) OR (c == 3)))");
        assert_eq!(Conditional::any(Vec::<Condition>::new()).to_string(), "false");
    }
}
