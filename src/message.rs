//! Shared message plumbing: the unknown-fields bag and the [`Message`] trait
//!
//! Branch responses are irregular. An error payload such as `{"errors": [...]}` arrives with a
//! 200 status under the same shape as a success payload, so messages decode leniently: every
//! JSON member that does not map to a declared attribute is kept in an [`UnknownFields`] bag
//! and written back out on serialization.

use crate::error::Violation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON members of a message that have no declared attribute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnknownFields(BTreeMap<String, Value>);

impl UnknownFields {
    /// Create an empty bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a member by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether a member with this name is present
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Insert a member, returning the previous value if any
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(name.into(), value)
    }

    /// Iterate over members in name order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the bag is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One violation per member named like a declared attribute
    ///
    /// Such a member would be written a second time under the same key.
    pub fn shadowing(&self, declared: &[&str]) -> Vec<Violation> {
        declared
            .iter()
            .filter(|name| self.contains(name))
            .map(|name| {
                Violation::new(*name, "is declared and must not be set as an unknown field")
            })
            .collect()
    }
}

impl FromIterator<(String, Value)> for UnknownFields {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Accessor contract shared by every request and response type
pub trait Message {
    /// Members that did not map to a declared attribute
    fn unknown_fields(&self) -> &UnknownFields;

    /// Invariants this message currently violates; empty when valid
    fn validate(&self) -> Vec<Violation>;

    /// Look up an unknown member by name
    fn unknown_field(&self, name: &str) -> Option<&Value> {
        self.unknown_fields().get(name)
    }

    /// Whether [`validate`](Message::validate) reports no violations
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

/// Whether an optional string is absent or whitespace only
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
