//! Logical values carried by a [Record].

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

/// The decoded, human-facing form of a packed buffer: field name to value.
pub type Record = BTreeMap<String, Value>;

/// A value for one field of a schema.
///
/// With the `serde` feature, values (and so records) serialize externally
/// tagged, dates as ISO 8601 strings: `{"Date": "2015-09-16"}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Unsigned integer.
    Int(u64),
    Bool(bool),
    /// Hex digits; decoded values are always lowercase.
    Hex(String),
    /// A single label out of a choice list.
    Choice(String),
    /// Any subset of a choice list.
    Choices(BTreeSet<String>),
    Date(NaiveDate),
    List(Vec<Value>),
}

impl Value {
    /// Hex value from a string of digits.
    pub fn hex(digits: impl Into<String>) -> Self {
        Value::Hex(digits.into())
    }

    /// Single choice label.
    pub fn choice(label: impl Into<String>) -> Self {
        Value::Choice(label.into())
    }

    /// Set of choice labels; duplicates collapse.
    pub fn choices<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Choices(labels.into_iter().map(Into::into).collect())
    }

    /// Short name of the variant, used in type mismatch errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Hex(_) => "hex string",
            Value::Choice(_) => "choice",
            Value::Choices(_) => "choice set",
            Value::Date(_) => "date",
            Value::List(_) => "list",
        }
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}
