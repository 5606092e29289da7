use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Value;

/// The fact mapping a rule is evaluated against: fact name to [`Value`].
///
/// Supplied fresh for each evaluation and never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Facts {
    data: HashMap<String, Value>,
}

impl Facts {
    /// Create an empty fact mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fact, replacing any previous value under the same name.
    #[must_use]
    pub fn set(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value.into());
        self
    }

    /// Insert a fact (mutable reference version).
    pub fn insert(&mut self, name: &str, value: Value) {
        self.data.insert(name.to_owned(), value);
    }

    /// Look up a fact by name. An explicit null is returned as [`Value::Null`].
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Whether a fact is absent or explicitly null.
    #[must_use]
    pub fn is_missing(&self, name: &str) -> bool {
        self.get(name).map_or(true, Value::is_null)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.data.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Facts {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<HashMap<String, Value>> for Facts {
    fn from(data: HashMap<String, Value>) -> Self {
        Self { data }
    }
}
