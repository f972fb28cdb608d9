//! Agents: profiles carrying bound attribute values.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::attribute::{Attribute, AttributeValue};

/// Identifier of an agent, unique within a comparison set.
///
/// Numeric identifiers are stored in their decimal form. Ids that parse as
/// unsigned integers order numerically and come before all other ids, which
/// order lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for AgentId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0.parse::<u64>(), other.0.parse::<u64>()) {
            (Ok(a), Ok(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for AgentId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for AgentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A profile taking part in diversity comparisons.
///
/// Equality, ordering and hashing derive from the id only.
///
/// The `equivalent` map follows a two-phase lifecycle: it is empty after
/// construction and is filled by an explicit call to
/// [`Agent::set_equivalents`] (usually through
/// [`AgentPool::populate_equivalents`](super::pool::AgentPool::populate_equivalents)),
/// so the quadratic equivalence scan only runs when a caller needs it.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    attributes: Vec<Attribute>,
    equivalent: HashMap<String, Vec<AgentId>>,
}

impl Agent {
    /// Creates an agent with the given bound attributes.
    pub fn new(id: impl Into<AgentId>, attributes: Vec<Attribute>) -> Self {
        Self {
            id: id.into(),
            attributes,
            equivalent: HashMap::new(),
        }
    }

    pub fn id(&self) -> &AgentId {
        &self.id
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the value bound to the attribute with the given id, if any.
    pub fn value(&self, attribute_id: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.id() == attribute_id)
            .and_then(Attribute::value)
    }

    /// Returns the value this agent holds for `attribute`, if any.
    pub fn value_of(&self, attribute: &Attribute) -> Option<&AttributeValue> {
        self.value(attribute.id())
    }

    /// Agents interchangeable with this one on every requirement except `attribute`.
    ///
    /// Returns an empty slice until the map has been populated.
    pub fn equivalents(&self, attribute: &Attribute) -> &[AgentId] {
        self.equivalent
            .get(attribute.id())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records the agents equivalent to this one with respect to `attribute`.
    pub fn set_equivalents(&mut self, attribute: &Attribute, agents: Vec<AgentId>) {
        self.equivalent.insert(attribute.id().to_string(), agents);
    }

    /// Returns true once an equivalence list has been recorded for `attribute`.
    pub fn has_equivalents_for(&self, attribute: &Attribute) -> bool {
        self.equivalent.contains_key(attribute.id())
    }

    pub fn clear_equivalents(&mut self) {
        self.equivalent.clear();
    }
}

impl PartialEq for Agent {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Agent {}

impl PartialOrd for Agent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Agent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Agent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
