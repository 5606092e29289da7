//! Serde representations of validated rule types.
//!
//! Every type whose constructor enforces an invariant deserializes through a
//! plain mirror struct and is then rebuilt with that constructor, so a
//! decoded rule passes exactly the same checks as one built in code. A
//! payload with a bad weight, a kind mismatch, or a conflicting fact
//! declaration is rejected with the [`ConfigError`] the constructor would
//! have returned.
//!
//! Cached data (required tokens, chain depth, rule token kinds) is never
//! written out. It is recomputed on load.
//!
//! ## Sharing
//!
//! A rule embedded through several [`RuleToken`]s is written once per token.
//! After a round trip each token owns its own copy of the rule.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::{
    Conditional, ConfigError, Expression, Operator, Rule, RuleDecision, RuleRowScore, RuleScore,
    RuleSetDecision, RuleSetScore, RuleToken, Token,
};

// ---------------------------------------------------------------------------
// Tokens and expressions
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
pub(crate) struct RuleTokenDef {
    name: String,
    rule: Arc<Rule>,
}

impl From<RuleToken> for RuleTokenDef {
    fn from(token: RuleToken) -> Self {
        Self {
            name: token.name().to_owned(),
            rule: Arc::clone(token.rule()),
        }
    }
}

impl TryFrom<RuleTokenDef> for RuleToken {
    type Error = ConfigError;

    fn try_from(def: RuleTokenDef) -> Result<Self, Self::Error> {
        RuleToken::new(&def.name, def.rule)
    }
}

#[derive(Deserialize)]
pub(crate) struct ExpressionDef {
    token: Token,
    operator: Operator,
}

impl TryFrom<ExpressionDef> for Expression {
    type Error = ConfigError;

    fn try_from(def: ExpressionDef) -> Result<Self, Self::Error> {
        Expression::new(def.token, def.operator)
    }
}

// ---------------------------------------------------------------------------
// Rows and rulesets
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub(crate) struct RuleRowScoreDef {
    antecedent: Conditional,
    score: f64,
}

impl TryFrom<RuleRowScoreDef> for RuleRowScore {
    type Error = ConfigError;

    fn try_from(def: RuleRowScoreDef) -> Result<Self, Self::Error> {
        RuleRowScore::new(def.antecedent, def.score)
    }
}

#[derive(Deserialize)]
pub(crate) struct RuleSetScoreDef {
    rows: Vec<RuleRowScore>,
    weight: f64,
}

impl TryFrom<RuleSetScoreDef> for RuleSetScore {
    type Error = ConfigError;

    fn try_from(def: RuleSetScoreDef) -> Result<Self, Self::Error> {
        RuleSetScore::new(def.rows, def.weight)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
pub(crate) struct RuleDecisionDef {
    ruleset: RuleSetDecision,
}

impl From<RuleDecision> for RuleDecisionDef {
    fn from(rule: RuleDecision) -> Self {
        Self {
            ruleset: rule.ruleset,
        }
    }
}

impl TryFrom<RuleDecisionDef> for RuleDecision {
    type Error = ConfigError;

    fn try_from(def: RuleDecisionDef) -> Result<Self, Self::Error> {
        RuleDecision::new(def.ruleset)
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct RuleScoreDef {
    rulesets: Vec<RuleSetScore>,
}

impl From<RuleScore> for RuleScoreDef {
    fn from(rule: RuleScore) -> Self {
        Self {
            rulesets: rule.rulesets,
        }
    }
}

impl TryFrom<RuleScoreDef> for RuleScore {
    type Error = ConfigError;

    fn try_from(def: RuleScoreDef) -> Result<Self, Self::Error> {
        RuleScore::new(def.rulesets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{numeric, string, Facts, ValueKind};

    fn config() -> bincode::config::Configuration {
        bincode::config::standard()
    }

    fn encode<T: Serialize>(value: &T) -> Vec<u8> {
        bincode::serde::encode_to_vec(value, config()).unwrap()
    }

    fn decode<T: serde::de::DeserializeOwned>(
        bytes: &[u8],
    ) -> Result<T, bincode::error::DecodeError> {
        bincode::serde::decode_from_slice(bytes, config()).map(|(v, _)| v)
    }

    #[test]
    fn token_def_keeps_name_and_rule() {
        let set = RuleSetScore::builder(1.0)
            .row(Conditional::all([numeric("x").gte(0)]), 10.0)
            .build()
            .unwrap();
        let rule: Rule = RuleScore::new(vec![set]).unwrap().into();
        let token = RuleToken::new("inner", rule).unwrap();

        let def = RuleTokenDef::from(token.clone());
        assert_eq!(def.name, "inner");
        let rebuilt = RuleToken::try_from(def).unwrap();
        assert_eq!(rebuilt, token);
        assert_eq!(rebuilt.kind(), ValueKind::Numeric);
    }

    #[test]
    fn decision_rule_requirements_recomputed() {
        let set = RuleSetDecision::builder()
            .row(Conditional::all([string("pet").equals("dog")]), "GO")
            .build();
        let rule = RuleDecision::new(set).unwrap();

        let decoded: RuleDecision = decode(&encode(&rule)).unwrap();
        assert_eq!(decoded.required_tokens().get("pet"), Some(ValueKind::String));
        let facts = Facts::new().set("pet", "dog");
        assert_eq!(decoded.execute(&facts), rule.execute(&facts));
    }

    #[test]
    fn kind_mismatch_rejected_on_decode() {
        // same shape as an Expression, but with a string operator on a numeric token
        #[derive(Serialize)]
        struct Raw {
            token: Token,
            operator: Operator,
        }
        let raw = Raw {
            token: Token::numeric("age"),
            operator: Operator::equals("ten"),
        };
        assert!(decode::<Expression>(&encode(&raw)).is_err());
    }
}
