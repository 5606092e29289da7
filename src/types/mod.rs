mod conditional;
mod decision;
mod error;
mod evaluation_report;
mod expression;
mod facts;
mod operator;
mod requirements;
mod rule;
mod rule_row;
mod ruleset;
mod token;
mod value;

pub use conditional::{Condition, Conditional};
pub use decision::Decision;
pub use error::{ConfigError, EvalError};
pub use evaluation_report::{EvaluationReport, RuleSetTrace};
pub use expression::{boolean, numeric, string, BooleanTerm, Expression, NumericTerm, StringTerm};
pub use facts::Facts;
pub use operator::{BooleanOp, NumericOp, Operator, StringOp};
pub use requirements::RequiredTokens;
pub use rule::{Outcome, Rule, RuleDecision, RuleScore};
pub use rule_row::{RuleRowDecision, RuleRowScore};
pub use ruleset::{RuleSetDecision, RuleSetDecisionBuilder, RuleSetScore, RuleSetScoreBuilder};
pub use token::{Resolved, RuleToken, Token, MAX_CHAIN_DEPTH};
pub use value::{Value, ValueKind};
