use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::conditional::Conditional;
use super::decision::Decision;
use super::error::{ConfigError, EvalError};
use super::facts::Facts;

/// An antecedent paired with a decision consequent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleRowDecision {
    antecedent: Conditional,
    consequent: Decision,
}

/// An antecedent paired with a numeric score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serial::RuleRowScoreDef"))]
pub struct RuleRowScore {
    antecedent: Conditional,
    score: f64,
}

impl RuleRowDecision {
    #[must_use]
    pub fn new(antecedent: Conditional, consequent: impl Into<Decision>) -> Self {
        Self {
            antecedent,
            consequent: consequent.into(),
        }
    }

    #[must_use]
    pub fn antecedent(&self) -> &Conditional {
        &self.antecedent
    }

    #[must_use]
    pub fn consequent(&self) -> &Decision {
        &self.consequent
    }

    /// Whether the antecedent holds for `facts`.
    ///
    /// # Errors
    ///
    /// Propagates [`EvalError`] from the antecedent.
    pub fn matches(&self, facts: &Facts) -> Result<bool, EvalError> {
        self.antecedent.evaluate(facts)
    }
}

impl RuleRowScore {
    /// # Errors
    ///
    /// Returns [`ConfigError::NonFiniteScore`] for NaN or infinite scores.
    pub fn new(antecedent: Conditional, score: f64) -> Result<Self, ConfigError> {
        if !score.is_finite() {
            return Err(ConfigError::NonFiniteScore { score });
        }
        Ok(Self { antecedent, score })
    }

    #[must_use]
    pub fn antecedent(&self) -> &Conditional {
        &self.antecedent
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Whether the antecedent holds for `facts`.
    ///
    /// # Errors
    ///
    /// Propagates [`EvalError`] from the antecedent.
    pub fn matches(&self, facts: &Facts) -> Result<bool, EvalError> {
        self.antecedent.evaluate(facts)
    }
}

impl fmt::Display for RuleRowDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "when {} then {}", self.antecedent, self.consequent)
    }
}

impl fmt::Display for RuleRowScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "when {} score {}", self.antecedent, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric;

    #[test]
    fn decision_row_matches() {
        let row = RuleRowDecision::new(Conditional::all([numeric("age").gte(18)]), "adult");
        assert_eq!(row.matches(&Facts::new().set("age", 20)), Ok(true));
        assert_eq!(row.matches(&Facts::new().set("age", 12)), Ok(false));
        assert_eq!(row.consequent(), &Decision::from("adult"));
    }

    #[test]
    fn score_row_rejects_non_finite() {
        let cond = Conditional::all([numeric("age").gte(18)]);
        assert!(matches!(
            RuleRowScore::new(cond.clone(), f64::NAN),
            Err(ConfigError::NonFiniteScore { .. })
        ));
        assert!(RuleRowScore::new(cond.clone(), f64::INFINITY).is_err());
        assert_eq!(RuleRowScore::new(cond, -100.0).unwrap().score(), -100.0);
    }

    #[test]
    fn display() {
        let row = RuleRowScore::new(Conditional::all([numeric("n").gte(7)]), -100.0).unwrap();
        assert_eq!(row.to_string(), "when ((n >= 7)) score -100");
    }
}
