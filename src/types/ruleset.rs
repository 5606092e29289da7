use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::conditional::Conditional;
use super::decision::Decision;
use super::error::{ConfigError, EvalError};
use super::facts::Facts;
use super::rule_row::{RuleRowDecision, RuleRowScore};

/// Ordered decision rows, evaluated first-match-wins.
///
/// # Example
///
/// ```
/// use simple_rule_engine::{numeric, string, Conditional, Decision, Facts, RuleSetDecision};
///
/// let ruleset = RuleSetDecision::builder()
///     .row(Conditional::all([numeric("age").lt(18)]), "NO_GO")
///     .row(Conditional::all([string("pet").is_in(["dog", "cat"])]), "GO")
///     .build();
///
/// let facts = Facts::new().set("age", 30).set("pet", "dog");
/// assert_eq!(ruleset.evaluate(&facts).unwrap(), Some(Decision::from("GO")));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RuleSetDecision {
    rows: Vec<RuleRowDecision>,
}

/// Ordered score rows, evaluated first-match-wins, scaled by a weight in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::serial::RuleSetScoreDef"))]
pub struct RuleSetScore {
    rows: Vec<RuleRowScore>,
    weight: f64,
}

/// Builder for [`RuleSetDecision`].
#[derive(Debug, Default)]
pub struct RuleSetDecisionBuilder {
    rows: Vec<RuleRowDecision>,
}

/// Builder for [`RuleSetScore`]. Validation happens in [`build()`](Self::build).
#[derive(Debug)]
pub struct RuleSetScoreBuilder {
    rows: Vec<(Conditional, f64)>,
    weight: f64,
}

impl RuleSetDecision {
    #[must_use]
    pub fn new(rows: Vec<RuleRowDecision>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn builder() -> RuleSetDecisionBuilder {
        RuleSetDecisionBuilder::default()
    }

    #[must_use]
    pub fn rows(&self) -> &[RuleRowDecision] {
        &self.rows
    }

    /// Return the consequent of the first row whose antecedent holds, or
    /// `None` when no row matches. Rows after the match are not evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if an evaluated row meets a fact of the wrong kind.
    pub fn evaluate(&self, facts: &Facts) -> Result<Option<Decision>, EvalError> {
        Ok(crate::evaluate::first_decision_row(self, facts)?
            .map(|(_, row)| row.consequent().clone()))
    }
}

impl RuleSetScore {
    /// # Errors
    ///
    /// Returns [`ConfigError::WeightOutOfRange`] unless `0 <= weight <= 1`.
    pub fn new(rows: Vec<RuleRowScore>, weight: f64) -> Result<Self, ConfigError> {
        crate::compile::check_weight(weight)?;
        Ok(Self { rows, weight })
    }

    #[must_use]
    pub fn builder(weight: f64) -> RuleSetScoreBuilder {
        RuleSetScoreBuilder {
            rows: Vec::new(),
            weight,
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[RuleRowScore] {
        &self.rows
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The first matching row's score multiplied by the weight. A ruleset
    /// with no matching row contributes `0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] if an evaluated row meets a fact of the wrong kind.
    pub fn evaluate(&self, facts: &Facts) -> Result<f64, EvalError> {
        Ok(crate::evaluate::first_score_row(self, facts)?
            .map_or(0.0, |(_, row)| row.score() * self.weight))
    }
}

impl RuleSetDecisionBuilder {
    /// Append a row. Rows are evaluated in the order they are added.
    #[must_use]
    pub fn row(mut self, antecedent: Conditional, consequent: impl Into<Decision>) -> Self {
        self.rows.push(RuleRowDecision::new(antecedent, consequent));
        self
    }

    #[must_use]
    pub fn build(self) -> RuleSetDecision {
        RuleSetDecision { rows: self.rows }
    }
}

impl RuleSetScoreBuilder {
    /// Append a row. Rows are evaluated in the order they are added.
    #[must_use]
    pub fn row(mut self, antecedent: Conditional, score: f64) -> Self {
        self.rows.push((antecedent, score));
        self
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] for a non-finite score or a weight outside `[0, 1]`.
    pub fn build(self) -> Result<RuleSetScore, ConfigError> {
        let rows = self
            .rows
            .into_iter()
            .map(|(antecedent, score)| RuleRowScore::new(antecedent, score))
            .collect::<Result<Vec<_>, _>>()?;
        RuleSetScore::new(rows, self.weight)
    }
}

impl fmt::Display for RuleSetDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSetDecision({} rows)", self.rows.len())
    }
}

impl fmt::Display for RuleSetScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleSetScore({} rows, weight {})",
            self.rows.len(),
            self.weight
        )
    }
}
