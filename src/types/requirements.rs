use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::error::{ConfigError, EvalError};
use super::facts::Facts;
use super::value::ValueKind;

/// The facts a rule needs from its caller: fact name to expected kind.
///
/// Built once while the rule is constructed. Rule tokens contribute the
/// requirements of their embedded rule, never their own label, so the map
/// only names facts the caller must supply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredTokens {
    kinds: BTreeMap<String, ValueKind>,
}

impl RequiredTokens {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a fact requirement.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConflictingTokenKind`] if the same fact was
    /// already recorded with another kind.
    pub(crate) fn register(&mut self, name: &str, kind: ValueKind) -> Result<(), ConfigError> {
        match self.kinds.entry(name.to_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(kind);
                Ok(())
            }
            Entry::Occupied(slot) if *slot.get() == kind => Ok(()),
            Entry::Occupied(slot) => Err(ConfigError::ConflictingTokenKind {
                name: name.to_owned(),
                first: *slot.get(),
                second: kind,
            }),
        }
    }

    pub(crate) fn merge(&mut self, other: &RequiredTokens) -> Result<(), ConfigError> {
        for (name, &kind) in &other.kinds {
            self.register(name, kind)?;
        }
        Ok(())
    }

    /// The expected kind of a fact, if the rule reads it.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ValueKind> {
        self.kinds.get(name).copied()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Iterate over `(fact name, kind)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ValueKind)> {
        self.kinds.iter().map(|(k, v)| (k.as_str(), *v))
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, ValueKind> {
        &self.kinds
    }

    /// Required facts that are absent or null in `facts`, in name order.
    #[must_use]
    pub fn missing<'a>(&'a self, facts: &Facts) -> Vec<&'a str> {
        self.kinds
            .keys()
            .filter(|name| facts.is_missing(name))
            .map(String::as_str)
            .collect()
    }

    /// Check every supplied fact against its expected kind. Missing facts
    /// are not an error here; see [`missing()`](Self::missing).
    ///
    /// # Errors
    ///
    /// Returns the first [`EvalError::TypeMismatch`] in name order.
    pub fn check(&self, facts: &Facts) -> Result<(), EvalError> {
        for (name, &expected) in &self.kinds {
            if let Some(found) = facts.get(name).and_then(super::Value::kind) {
                if found != expected {
                    return Err(EvalError::TypeMismatch {
                        fact: name.clone(),
                        expected,
                        found,
                    });
                }
            }
        }
        Ok(())
    }
}
