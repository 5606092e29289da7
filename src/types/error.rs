use thiserror::Error;

use super::value::ValueKind;

/// Authoring defects detected while building a rule tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("token '{token}' is {token_kind} but the operator accepts {operator_kind}")]
    KindMismatch {
        token: String,
        token_kind: ValueKind,
        operator_kind: ValueKind,
    },

    #[error("invalid between bounds: floor {floor} must not exceed ceiling {ceiling}")]
    InvalidBounds { floor: f64, ceiling: f64 },

    #[error("operator '{operator}' compares against NaN")]
    NaNBaseline { operator: String },

    #[error("score {score} is not a finite number")]
    NonFiniteScore { score: f64 },

    #[error("ruleset weight {weight} is outside [0, 1]")]
    WeightOutOfRange { weight: f64 },

    #[error("ruleset weights sum to {sum}, expected 1")]
    WeightSum { sum: f64 },

    #[error("score rule requires at least one ruleset")]
    NoRuleSets,

    #[error("decision rule requires exactly one ruleset, found {found}")]
    DecisionRuleSetCount { found: usize },

    #[error("fact '{name}' is declared both {first} and {second}")]
    ConflictingTokenKind {
        name: String,
        first: ValueKind,
        second: ValueKind,
    },

    #[error("rule token '{token}' embeds a rule without a single comparable output kind")]
    UnembeddableRule { token: String },

    #[error("rule token '{token}' would nest rules {depth} deep, maximum is {max}")]
    ChainTooDeep {
        token: String,
        depth: usize,
        max: usize,
    },
}

/// Fact-supply defects detected while evaluating a rule tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("fact '{fact}' should be {expected} but is {found}")]
    TypeMismatch {
        fact: String,
        expected: ValueKind,
        found: ValueKind,
    },
}
