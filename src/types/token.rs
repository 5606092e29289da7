use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::{ConfigError, EvalError};
use super::facts::Facts;
use super::rule::Rule;
use super::value::ValueKind;

/// Maximum number of rules that may be nested through rule tokens,
/// counting the outermost rule.
pub const MAX_CHAIN_DEPTH: usize = 32;

/// A typed reference to a fact, or to a nested rule whose output stands in
/// for a fact.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Token {
    Numeric(String),
    String(String),
    Boolean(String),
    Rule(RuleToken),
}

/// A token that resolves by executing an embedded rule against the same facts.
///
/// The rule is shared, so one sub-rule can feed several outer rules. Because
/// the embedded rule is fully built before the token exists, a rule can never
/// reach itself through its own tokens.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(into = "crate::serial::RuleTokenDef", try_from = "crate::serial::RuleTokenDef")
)]
pub struct RuleToken {
    name: String,
    rule: Arc<Rule>,
    kind: ValueKind,
}

/// A token's value after resolution against a fact mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    Number(f64),
    Text(Cow<'a, str>),
    Bool(bool),
}

impl Resolved<'_> {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Resolved::Number(_) => ValueKind::Numeric,
            Resolved::Text(_) => ValueKind::String,
            Resolved::Bool(_) => ValueKind::Boolean,
        }
    }
}

impl Token {
    #[must_use]
    pub fn numeric(name: &str) -> Self {
        Token::Numeric(name.to_owned())
    }

    #[must_use]
    pub fn string(name: &str) -> Self {
        Token::String(name.to_owned())
    }

    #[must_use]
    pub fn boolean(name: &str) -> Self {
        Token::Boolean(name.to_owned())
    }

    /// The fact name, or the label of a rule token.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Token::Numeric(name) | Token::String(name) | Token::Boolean(name) => name,
            Token::Rule(rt) => rt.name(),
        }
    }

    /// The kind of value this token resolves to.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Token::Numeric(_) => ValueKind::Numeric,
            Token::String(_) => ValueKind::String,
            Token::Boolean(_) => ValueKind::Boolean,
            Token::Rule(rt) => rt.kind(),
        }
    }

    /// Resolve against `facts`. `Ok(None)` means the value is missing.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::TypeMismatch`] if a fact is present with a kind
    /// other than the token's declared kind, including inside an embedded rule.
    pub fn resolve<'f>(&self, facts: &'f Facts) -> Result<Option<Resolved<'f>>, EvalError> {
        crate::evaluate::resolve_token(self, facts)
    }
}

impl From<RuleToken> for Token {
    fn from(rt: RuleToken) -> Self {
        Token::Rule(rt)
    }
}

impl RuleToken {
    /// Wrap a rule so its output can be compared inside another rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnembeddableRule`] if the rule has no single
    /// comparable output kind (a decision rule with structured or mixed
    /// consequents), or [`ConfigError::ChainTooDeep`] if nesting it would
    /// exceed [`MAX_CHAIN_DEPTH`].
    pub fn new(name: &str, rule: impl Into<Arc<Rule>>) -> Result<Self, ConfigError> {
        let rule = rule.into();
        let kind = rule
            .output_kind()
            .ok_or_else(|| ConfigError::UnembeddableRule {
                token: name.to_owned(),
            })?;
        let depth = rule.chain_depth() + 1;
        if depth > MAX_CHAIN_DEPTH {
            return Err(ConfigError::ChainTooDeep {
                token: name.to_owned(),
                depth,
                max: MAX_CHAIN_DEPTH,
            });
        }
        Ok(Self {
            name: name.to_owned(),
            rule,
            kind,
        })
    }

    /// The label. Not used as a fact key.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn rule(&self) -> &Arc<Rule> {
        &self.rule
    }

    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

impl PartialEq for RuleToken {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && (Arc::ptr_eq(&self.rule, &other.rule) || self.rule == other.rule)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Numeric(name) | Token::String(name) | Token::Boolean(name) => {
                write!(f, "{name}")
            }
            Token::Rule(rt) => write!(f, "rule({})", rt.name),
        }
    }
}
