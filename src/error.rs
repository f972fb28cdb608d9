//! Error types for profile-diversity operations.
//!
//! Defines error types for the major subsystems:
//! - Diversity computation over agents and requirement attributes
//! - Profile request handling at the service boundary
//! - The pairwise similarity cache

use thiserror::Error;

/// Errors raised by the diversity engine.
///
/// The engine fails loudly; substituting a neutral score is left to the
/// caller (see [`crate::profile::compute_diversity`]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiversityError {
    #[error("Qualitative attribute '{attribute}' has {labels} label(s); entropy needs at least 2")]
    EmptyDomain { attribute: String, labels: usize },

    #[error("Agent '{agent}' has no value for attribute '{attribute}'")]
    MissingAttributeValue { agent: String, attribute: String },

    #[error("Agent '{agent}' holds a value of the wrong kind for attribute '{attribute}'")]
    KindMismatch { agent: String, attribute: String },

    #[error("Agent '{agent}' has value '{value}' outside the domain of attribute '{attribute}'")]
    ValueOutsideDomain {
        agent: String,
        attribute: String,
        value: String,
    },

    #[error("Agent '{0}' not found in pool")]
    UnknownAgent(String),

    #[error("Agent '{0}' already exists in pool")]
    DuplicateAgent(String),
}

/// Errors raised while turning a profile request into agents and requirements.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Qualitative attribute '{attribute}' of agent '{agent}' has no declared domain")]
    UnknownQualitativeAttribute { agent: String, attribute: String },

    #[error("Quantitative attribute '{attribute}' of agent '{agent}' is {value}, expected a value in [0, 1]")]
    QuantitativeOutOfRange {
        agent: String,
        attribute: String,
        value: f64,
    },

    #[error("Diversity error: {0}")]
    Diversity(#[from] DiversityError),
}

/// Errors raised by the similarity cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed cache entry: {0}")]
    MalformedEntry(String),
}
