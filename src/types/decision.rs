use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::value::ValueKind;

/// The consequent of a decision row and the result of a decision rule.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Decision {
    Number(f64),
    Text(String),
    Bool(bool),
    List(Vec<Decision>),
    Map(BTreeMap<String, Decision>),
}

impl Decision {
    /// The kind a rule token resolves to when it embeds a rule producing this
    /// decision. Structured decisions have no comparable kind.
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Decision::Number(_) => Some(ValueKind::Numeric),
            Decision::Text(_) => Some(ValueKind::String),
            Decision::Bool(_) => Some(ValueKind::Boolean),
            Decision::List(_) | Decision::Map(_) => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Decision::Number(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Decision::Text(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Decision::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f64> for Decision {
    fn from(v: f64) -> Self {
        Decision::Number(v)
    }
}

impl From<i32> for Decision {
    fn from(v: i32) -> Self {
        Decision::Number(f64::from(v))
    }
}

impl From<bool> for Decision {
    fn from(v: bool) -> Self {
        Decision::Bool(v)
    }
}

impl From<&str> for Decision {
    fn from(v: &str) -> Self {
        Decision::Text(v.to_owned())
    }
}

impl From<String> for Decision {
    fn from(v: String) -> Self {
        Decision::Text(v)
    }
}

impl From<Vec<Decision>> for Decision {
    fn from(v: Vec<Decision>) -> Self {
        Decision::List(v)
    }
}

impl From<BTreeMap<String, Decision>> for Decision {
    fn from(v: BTreeMap<String, Decision>) -> Self {
        Decision::Map(v)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Number(v) => write!(f, "{v}"),
            Decision::Text(v) => write!(f, "\"{v}\""),
            Decision::Bool(v) => write!(f, "{v}"),
            Decision::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Decision::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, item)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {item}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
