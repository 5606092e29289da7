//! Decision and scoring rules declared as data.
//!
//! A rule is a tree: [`Expression`]s compare one fact against a bound
//! [`Operator`], [`Conditional`]s combine them with short-circuit AND/OR,
//! rows pair a conditional with a consequent, rulesets pick the first
//! matching row, and rules turn rulesets into a [`Decision`] or a weighted
//! score. A [`RuleToken`] feeds one rule's output into another rule.
//!
//! ```
//! use simple_rule_engine::{numeric, Conditional, Facts, RuleScore, RuleSetScore};
//!
//! let cibil = RuleSetScore::builder(1.0)
//!     .row(Conditional::all([numeric("cibil_score").lt(650)]), 0.0)
//!     .row(Conditional::all([numeric("cibil_score").between(650, 800).unwrap()]), 100.0)
//!     .build()
//!     .unwrap();
//! let rule = RuleScore::new(vec![cibil]).unwrap();
//!
//! let facts = Facts::new().set("cibil_score", 725);
//! assert_eq!(rule.execute(&facts).unwrap(), 100.0);
//! ```

mod compile;
mod evaluate;
#[cfg(feature = "serde")]
mod serial;
mod types;

pub use compile::WEIGHT_TOLERANCE;
pub use types::{
    boolean, numeric, string, BooleanOp, BooleanTerm, Condition, Conditional, ConfigError,
    Decision, EvalError, EvaluationReport, Expression, Facts, NumericOp, NumericTerm, Operator,
    Outcome, RequiredTokens, Resolved, Rule, RuleDecision, RuleRowDecision, RuleRowScore,
    RuleScore, RuleSetDecision, RuleSetDecisionBuilder, RuleSetScore, RuleSetScoreBuilder,
    RuleSetTrace, RuleToken, StringOp, StringTerm, Token, Value, ValueKind, MAX_CHAIN_DEPTH,
};
