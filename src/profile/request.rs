//! Request and response shapes for profile diversity.
//!
//! Field names follow the JSON consumed by the profile manager
//! (`camelCase`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute values of one agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProfile {
    /// Identifier of the agent.
    pub id: String,
    /// Quantitative values, each expected in [0, 1].
    #[serde(default)]
    pub quantitative_attributes: BTreeMap<String, f64>,
    /// Qualitative values, each expected among the declared labels.
    #[serde(default)]
    pub qualitative_attributes: BTreeMap<String, String>,
}

impl AgentProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder method to add a quantitative value.
    pub fn with_quantitative(mut self, name: impl Into<String>, value: f64) -> Self {
        self.quantitative_attributes.insert(name.into(), value);
        self
    }

    /// Builder method to add a qualitative value.
    pub fn with_qualitative(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.qualitative_attributes.insert(name.into(), value.into());
        self
    }
}

/// A set of agents together with the attributes their diversity is computed on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiversityRequest {
    /// Agents to compare.
    #[serde(default)]
    pub agents: Vec<AgentProfile>,
    /// Qualitative attribute names with their admissible labels.
    #[serde(default, alias = "qualitativeDomains")]
    pub qualitative_attributes: BTreeMap<String, Vec<String>>,
    /// Quantitative attribute names; each ranges over [0, 1].
    #[serde(default, alias = "quantitativeNames")]
    pub quantitative_attributes: Vec<String>,
}

/// Normalized diversity of a set of agents, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiversityResponse {
    pub value: f64,
}

/// A user described only by named quantitative attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Builder method to add an attribute value.
    pub fn with_attribute(mut self, name: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

/// Users whose diversity is computed over every attribute any of them carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDiversityRequest {
    #[serde(default)]
    pub users: Vec<UserProfile>,
}
