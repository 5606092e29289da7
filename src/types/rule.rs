use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::decision::Decision;
use super::error::{ConfigError, EvalError};
use super::evaluation_report::EvaluationReport;
use super::facts::Facts;
use super::requirements::RequiredTokens;
use super::ruleset::{RuleSetDecision, RuleSetScore};
use super::value::ValueKind;

/// A decision rule: exactly one decision ruleset.
///
/// Immutable once built, so a single instance can be shared across threads
/// and evaluated concurrently.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        into = "crate::serial::RuleDecisionDef",
        try_from = "crate::serial::RuleDecisionDef"
    )
)]
pub struct RuleDecision {
    pub(crate) ruleset: RuleSetDecision,
    pub(crate) requirements: RequiredTokens,
    pub(crate) depth: usize,
}

/// A score rule: the weighted sum of one or more score rulesets whose
/// weights sum to 1.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        into = "crate::serial::RuleScoreDef",
        try_from = "crate::serial::RuleScoreDef"
    )
)]
pub struct RuleScore {
    pub(crate) rulesets: Vec<RuleSetScore>,
    pub(crate) requirements: RequiredTokens,
    pub(crate) depth: usize,
}

/// Either kind of rule. This is what a [`RuleToken`](super::RuleToken) embeds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rule {
    Decision(RuleDecision),
    Score(RuleScore),
}

/// The result of executing a [`Rule`].
///
/// `NoMatch` is a normal outcome, not an error: no row of the decision
/// ruleset applied to the supplied facts.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Decision(Decision),
    NoMatch,
    Score(f64),
}

impl RuleDecision {
    /// # Errors
    ///
    /// Returns [`ConfigError::ConflictingTokenKind`] if one fact name is
    /// declared with two kinds anywhere in the tree, or
    /// [`ConfigError::NaNBaseline`] if a row compares against NaN.
    pub fn new(ruleset: RuleSetDecision) -> Result<Self, ConfigError> {
        crate::compile::compile_decision(ruleset)
    }

    /// Build from a list of rulesets, as stored forms often carry them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DecisionRuleSetCount`] unless the list holds
    /// exactly one ruleset.
    pub fn from_rulesets(rulesets: Vec<RuleSetDecision>) -> Result<Self, ConfigError> {
        let found = rulesets.len();
        let mut rulesets = rulesets.into_iter();
        match (rulesets.next(), rulesets.next()) {
            (Some(ruleset), None) => Self::new(ruleset),
            _ => Err(ConfigError::DecisionRuleSetCount { found }),
        }
    }

    #[must_use]
    pub fn ruleset(&self) -> &RuleSetDecision {
        &self.ruleset
    }

    /// Facts the caller must supply, with their expected kinds.
    #[must_use]
    pub fn required_tokens(&self) -> &RequiredTokens {
        &self.requirements
    }

    /// The decision of the first matching row, or `None` if no row matches.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] if an evaluated fact has the wrong kind.
    pub fn execute(&self, facts: &Facts) -> Result<Option<Decision>, EvalError> {
        crate::evaluate::execute_decision(self, facts)
    }
}

impl RuleScore {
    /// # Errors
    ///
    /// Returns [`ConfigError::NoRuleSets`] for an empty list,
    /// [`ConfigError::WeightSum`] unless the weights sum to 1 (within
    /// [`WEIGHT_TOLERANCE`](crate::WEIGHT_TOLERANCE)),
    /// [`ConfigError::ConflictingTokenKind`], or [`ConfigError::NaNBaseline`].
    pub fn new(rulesets: Vec<RuleSetScore>) -> Result<Self, ConfigError> {
        crate::compile::compile_score(rulesets)
    }

    #[must_use]
    pub fn rulesets(&self) -> &[RuleSetScore] {
        &self.rulesets
    }

    /// Facts the caller must supply, with their expected kinds.
    #[must_use]
    pub fn required_tokens(&self) -> &RequiredTokens {
        &self.requirements
    }

    /// Sum of the weighted scores of every ruleset. Rulesets with no
    /// matching row contribute zero.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] if an evaluated fact has the wrong kind.
    pub fn execute(&self, facts: &Facts) -> Result<f64, EvalError> {
        crate::evaluate::execute_score(self, facts)
    }
}

impl Rule {
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] if an evaluated fact has the wrong kind.
    pub fn execute(&self, facts: &Facts) -> Result<Outcome, EvalError> {
        match self {
            Rule::Decision(rule) => Ok(rule
                .execute(facts)?
                .map_or(Outcome::NoMatch, Outcome::Decision)),
            Rule::Score(rule) => Ok(Outcome::Score(rule.execute(facts)?)),
        }
    }

    /// Execute and report which row matched in every ruleset, each
    /// ruleset's weighted contribution, and the elapsed time.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] if an evaluated fact has the wrong kind.
    pub fn execute_detailed(&self, facts: &Facts) -> Result<EvaluationReport, EvalError> {
        crate::evaluate::execute_detailed(self, facts)
    }

    /// Facts the caller must supply, with their expected kinds.
    #[must_use]
    pub fn required_tokens(&self) -> &RequiredTokens {
        match self {
            Rule::Decision(rule) => rule.required_tokens(),
            Rule::Score(rule) => rule.required_tokens(),
        }
    }

    /// The kind a rule token embedding this rule resolves to. `None` when a
    /// decision rule's consequents do not share a single comparable kind.
    #[must_use]
    pub fn output_kind(&self) -> Option<ValueKind> {
        match self {
            Rule::Decision(rule) => crate::compile::decision_output_kind(&rule.ruleset),
            Rule::Score(_) => Some(ValueKind::Numeric),
        }
    }

    /// Number of rules on the longest rule-token path, counting this one.
    #[must_use]
    pub fn chain_depth(&self) -> usize {
        match self {
            Rule::Decision(rule) => rule.depth,
            Rule::Score(rule) => rule.depth,
        }
    }
}

impl From<RuleDecision> for Rule {
    fn from(rule: RuleDecision) -> Self {
        Rule::Decision(rule)
    }
}

impl From<RuleScore> for Rule {
    fn from(rule: RuleScore) -> Self {
        Rule::Score(rule)
    }
}

impl From<RuleDecision> for Arc<Rule> {
    fn from(rule: RuleDecision) -> Self {
        Arc::new(Rule::Decision(rule))
    }
}

impl From<RuleScore> for Arc<Rule> {
    fn from(rule: RuleScore) -> Self {
        Arc::new(Rule::Score(rule))
    }
}

impl Outcome {
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self, Outcome::NoMatch)
    }

    #[must_use]
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Outcome::Decision(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn score(&self) -> Option<f64> {
        match self {
            Outcome::Score(s) => Some(*s),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Decision(d) => write!(f, "decision {d}"),
            Outcome::NoMatch => write!(f, "no match"),
            Outcome::Score(s) => write!(f, "score {s}"),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Decision(rule) => write!(
                f,
                "RuleDecision({} rows, {} facts)",
                rule.ruleset.rows().len(),
                rule.requirements.len(),
            ),
            Rule::Score(rule) => write!(
                f,
                "RuleScore({} rulesets, {} facts)",
                rule.rulesets.len(),
                rule.requirements.len(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{numeric, string, Conditional, Expression, Operator, RuleToken};

    fn score_set(field: &str, weight: f64, score: f64) -> RuleSetScore {
        RuleSetScore::builder(weight)
            .row(Conditional::all([numeric(field).gte(0)]), score)
            .build()
            .unwrap()
    }

    #[test]
    fn score_weights_must_sum_to_one() {
        for weights in [[0.5, 0.4], [0.6, 0.5]] {
            let result = RuleScore::new(vec![
                score_set("a", weights[0], 1.0),
                score_set("b", weights[1], 1.0),
            ]);
            assert!(
                matches!(result, Err(ConfigError::WeightSum { .. })),
                "accepted weights {weights:?}"
            );
        }
        assert!(RuleScore::new(vec![score_set("a", 0.5, 1.0), score_set("b", 0.5, 1.0)]).is_ok());
    }

    #[test]
    fn score_weights_tolerate_rounding() {
        let result = RuleScore::new(vec![
            score_set("a", 0.1, 1.0),
            score_set("b", 0.2, 1.0),
            score_set("c", 0.7, 1.0),
        ]);
        assert!(result.is_ok());
    }

    #[test]
    fn score_requires_rulesets() {
        assert_eq!(RuleScore::new(vec![]), Err(ConfigError::NoRuleSets));
    }

    #[test]
    fn score_aggregation() {
        let rule = RuleScore::new(vec![score_set("a", 0.5, 30.0), score_set("b", 0.5, 40.0)])
            .unwrap();
        let facts = Facts::new().set("a", 1).set("b", 1);
        assert_eq!(rule.execute(&facts), Ok(35.0));
    }

    #[test]
    fn score_partial_match_under_scores() {
        let rule = RuleScore::new(vec![score_set("a", 0.5, 30.0), score_set("b", 0.5, 40.0)])
            .unwrap();
        let facts = Facts::new().set("a", 1);
        assert_eq!(rule.execute(&facts), Ok(15.0));
    }

    #[test]
    fn decision_from_rulesets_requires_exactly_one() {
        assert_eq!(
            RuleDecision::from_rulesets(vec![]),
            Err(ConfigError::DecisionRuleSetCount { found: 0 })
        );
        assert_eq!(
            RuleDecision::from_rulesets(vec![
                RuleSetDecision::default(),
                RuleSetDecision::default()
            ]),
            Err(ConfigError::DecisionRuleSetCount { found: 2 })
        );
        assert!(RuleDecision::from_rulesets(vec![RuleSetDecision::default()]).is_ok());
    }

    #[test]
    fn decision_rejects_conflicting_kinds() {
        let set = RuleSetDecision::builder()
            .row(Conditional::all([numeric("age").gte(18)]), "adult")
            .row(Conditional::all([string("age").equals("unknown")]), "unknown")
            .build();
        assert!(matches!(
            RuleDecision::new(set),
            Err(ConfigError::ConflictingTokenKind { .. })
        ));
    }

    #[test]
    fn rule_execute_outcomes() {
        let set = RuleSetDecision::builder()
            .row(Conditional::all([numeric("age").gte(18)]), "adult")
            .build();
        let rule: Rule = RuleDecision::new(set).unwrap().into();
        assert_eq!(
            rule.execute(&Facts::new().set("age", 20)),
            Ok(Outcome::Decision(Decision::from("adult")))
        );
        let no_match = rule.execute(&Facts::new().set("age", 10)).unwrap();
        assert!(no_match.is_no_match());
        assert_eq!(no_match.decision(), None);

        let rule: Rule = RuleScore::new(vec![score_set("a", 1.0, 7.0)]).unwrap().into();
        assert_eq!(rule.execute(&Facts::new().set("a", 0)).unwrap().score(), Some(7.0));
    }

    #[test]
    fn required_tokens_skip_rule_token_labels() {
        let inner: Rule = RuleScore::new(vec![score_set("cibil_score", 1.0, 100.0)])
            .unwrap()
            .into();
        let token = RuleToken::new("cibil_rule", inner).unwrap();
        let set = RuleSetDecision::builder()
            .row(
                Conditional::all([
                    Expression::new(token.into(), Operator::gt(0)).unwrap(),
                    string("pet").is_in(["dog", "cat"]),
                ]),
                "GO",
            )
            .build();
        let rule: Rule = RuleDecision::new(set).unwrap().into();
        let names: Vec<(&str, ValueKind)> = rule.required_tokens().iter().collect();
        assert_eq!(
            names,
            vec![
                ("cibil_score", ValueKind::Numeric),
                ("pet", ValueKind::String)
            ]
        );
        assert_eq!(rule.chain_depth(), 2);
    }

    #[test]
    fn output_kinds() {
        let rule: Rule = RuleScore::new(vec![score_set("a", 1.0, 1.0)]).unwrap().into();
        assert_eq!(rule.output_kind(), Some(ValueKind::Numeric));

        let set = RuleSetDecision::builder()
            .row(Conditional::all([numeric("a").gte(0)]), true)
            .row(Conditional::all([numeric("a").lt(0)]), false)
            .build();
        let rule: Rule = RuleDecision::new(set).unwrap().into();
        assert_eq!(rule.output_kind(), Some(ValueKind::Boolean));

        let rule: Rule = RuleDecision::new(RuleSetDecision::default()).unwrap().into();
        assert_eq!(rule.output_kind(), None);
    }

    #[test]
    fn display() {
        let rule: Rule = RuleScore::new(vec![score_set("a", 0.5, 1.0), score_set("b", 0.5, 1.0)])
            .unwrap()
            .into();
        assert_eq!(rule.to_string(), "RuleScore(2 rulesets, 2 facts)");
        assert_eq!(Outcome::NoMatch.to_string(), "no match");
        assert_eq!(Outcome::Score(35.0).to_string(), "score 35");
    }
}
