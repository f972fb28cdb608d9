//! Attribute definitions and bound attribute values.
//!
//! An [`Attribute`] is a named dimension of a profile. Without a value it acts
//! as a team-level requirement; with a value it is an agent-level instance.
//! Identity, ordering and hashing are defined by the attribute id alone.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Lower bound of the conventional quantitative range.
pub const DEFAULT_RANGE_MIN: f64 = 0.0;

/// Upper bound of the conventional quantitative range.
pub const DEFAULT_RANGE_MAX: f64 = 1.0;

/// Kind of a profile attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Numeric value inside a range.
    Quantitative,
    /// One label out of a finite set.
    Qualitative,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Quantitative => write!(f, "quantitative"),
            AttributeKind::Qualitative => write!(f, "qualitative"),
        }
    }
}

/// Set of admissible values of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeDomain {
    /// Closed numeric range.
    Range { min: f64, max: f64 },
    /// Finite set of category labels.
    Labels(Vec<String>),
}

impl AttributeDomain {
    /// Returns the kind of attribute this domain belongs to.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeDomain::Range { .. } => AttributeKind::Quantitative,
            AttributeDomain::Labels(_) => AttributeKind::Qualitative,
        }
    }

    /// Returns true if `value` is admissible in this domain.
    pub fn contains(&self, value: &AttributeValue) -> bool {
        match (self, value) {
            (AttributeDomain::Range { min, max }, AttributeValue::Number(v)) => {
                (*min..=*max).contains(v)
            }
            (AttributeDomain::Labels(labels), AttributeValue::Label(l)) => labels.contains(l),
            _ => false,
        }
    }
}

/// Value bound to an attribute instance.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Number(f64),
    Label(String),
}

impl AttributeValue {
    /// Kind of attribute that can hold this value.
    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeValue::Number(_) => AttributeKind::Quantitative,
            AttributeValue::Label(_) => AttributeKind::Qualitative,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(v) => Some(*v),
            AttributeValue::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            AttributeValue::Label(l) => Some(l),
            AttributeValue::Number(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Number(v) => write!(f, "{}", v),
            AttributeValue::Label(l) => write!(f, "{}", l),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Label(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Label(value)
    }
}

/// A named profile dimension, optionally bound to a value.
///
/// Two attributes are equal when their ids are equal, whatever their domain
/// or value. This lets a requirement (unbound) be matched against the
/// instances (bound) carried by agents.
#[derive(Debug, Clone)]
pub struct Attribute {
    id: String,
    domain: AttributeDomain,
    value: Option<AttributeValue>,
}

impl Attribute {
    /// Creates an attribute with an explicit domain.
    pub fn new(id: impl Into<String>, domain: AttributeDomain) -> Self {
        Self {
            id: id.into(),
            domain,
            value: None,
        }
    }

    /// Creates a quantitative attribute over the conventional [0, 1] range.
    pub fn quantitative(id: impl Into<String>) -> Self {
        Self::quantitative_in(id, DEFAULT_RANGE_MIN, DEFAULT_RANGE_MAX)
    }

    /// Creates a quantitative attribute over `[min, max]`.
    pub fn quantitative_in(id: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(id, AttributeDomain::Range { min, max })
    }

    /// Creates a qualitative attribute over the given labels.
    pub fn qualitative<I, S>(id: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            id,
            AttributeDomain::Labels(labels.into_iter().map(Into::into).collect()),
        )
    }

    /// Binds a value, turning a requirement into an instance.
    pub fn with_value(mut self, value: impl Into<AttributeValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Returns an unbound copy usable as a requirement.
    pub fn as_requirement(&self) -> Self {
        Self {
            id: self.id.clone(),
            domain: self.domain.clone(),
            value: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> AttributeKind {
        self.domain.kind()
    }

    pub fn domain(&self) -> &AttributeDomain {
        &self.domain
    }

    pub fn value(&self) -> Option<&AttributeValue> {
        self.value.as_ref()
    }

    /// Returns true if this attribute carries no value.
    pub fn is_requirement(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the domain labels of a qualitative attribute.
    pub fn labels(&self) -> Option<&[String]> {
        match &self.domain {
            AttributeDomain::Labels(labels) => Some(labels),
            AttributeDomain::Range { .. } => None,
        }
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Attribute {}

impl PartialOrd for Attribute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Attribute {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
