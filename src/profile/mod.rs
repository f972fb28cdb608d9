//! Profile diversity at the service boundary.
//!
//! Turns profile requests into requirement attributes and agents, runs the
//! diversity engine, and normalizes the result into [0, 1] by dividing by the
//! number of requirements.
//!
//! The engine fails loudly; this is the one place where failures are
//! swallowed. [`compute_diversity`] and [`compute_user_diversity`] log the
//! cause and answer 0.0, a neutral score, for any invalid request.

mod request;

pub use request::{
    AgentProfile, DiversityRequest, DiversityResponse, UserDiversityRequest, UserProfile,
};

use tracing::{debug, warn};

use crate::diversity::{Agent, AgentPool, Attribute, DiversityEngine};
use crate::error::ProfileError;

/// Builds the requirement attributes of a request: quantitative ones over
/// [0, 1] first, then qualitative ones over their declared labels.
pub fn build_requirements(request: &DiversityRequest) -> Vec<Attribute> {
    request
        .quantitative_attributes
        .iter()
        .map(Attribute::quantitative)
        .chain(
            request
                .qualitative_attributes
                .iter()
                .map(|(name, labels)| Attribute::qualitative(name.as_str(), labels.iter().cloned())),
        )
        .collect()
}

/// Builds one agent per profile of the request.
///
/// # Errors
///
/// Fails if a quantitative value lies outside [0, 1], if a qualitative value
/// names an attribute without a declared domain, or if two agents share an id.
pub fn build_agents(request: &DiversityRequest) -> Result<AgentPool, ProfileError> {
    let mut pool = AgentPool::new();

    for profile in &request.agents {
        let mut attributes = Vec::with_capacity(
            profile.quantitative_attributes.len() + profile.qualitative_attributes.len(),
        );

        for (name, &value) in &profile.quantitative_attributes {
            check_unit_range(&profile.id, name, value)?;
            attributes.push(Attribute::quantitative(name.as_str()).with_value(value));
        }

        for (name, value) in &profile.qualitative_attributes {
            let labels = request.qualitative_attributes.get(name).ok_or_else(|| {
                ProfileError::UnknownQualitativeAttribute {
                    agent: profile.id.clone(),
                    attribute: name.clone(),
                }
            })?;
            attributes.push(
                Attribute::qualitative(name.as_str(), labels.iter().cloned())
                    .with_value(value.as_str()),
            );
        }

        pool.insert(Agent::new(profile.id.as_str(), attributes))?;
    }

    Ok(pool)
}

/// Computes the normalized diversity of a request.
///
/// Returns 0.0 without requirements or agents.
///
/// # Errors
///
/// Fails on any invalid input (see [`build_agents`]) or engine error, such as
/// an agent missing a value for a requirement.
pub fn try_compute_diversity(
    engine: &DiversityEngine,
    request: &DiversityRequest,
) -> Result<f64, ProfileError> {
    let requirements = build_requirements(request);
    if requirements.is_empty() {
        return Ok(0.0);
    }

    let pool = build_agents(request)?;
    if pool.is_empty() {
        return Ok(0.0);
    }

    let team: Vec<&Agent> = pool.agents().iter().collect();
    let total = engine.diversity(&team, &requirements)?;
    let normalized = total / requirements.len() as f64;

    debug!(
        agents = team.len(),
        requirements = requirements.len(),
        total,
        normalized,
        "Computed profile diversity"
    );

    Ok(normalized)
}

/// Computes the normalized diversity of a request with the default engine,
/// answering 0.0 on any failure.
pub fn compute_diversity(request: &DiversityRequest) -> f64 {
    compute_diversity_with(&DiversityEngine::default(), request)
}

/// Computes the normalized diversity of a request, answering 0.0 on any
/// failure.
pub fn compute_diversity_with(engine: &DiversityEngine, request: &DiversityRequest) -> f64 {
    try_compute_diversity(engine, request).unwrap_or_else(|e| {
        warn!(error = %e, "Diversity computation failed, answering 0.0");
        0.0
    })
}

/// Computes the normalized diversity of users carrying only quantitative
/// attributes.
///
/// The requirements are every attribute name seen across the users, in
/// first-seen order. A user lacking one of them makes the computation fail.
pub fn try_compute_user_diversity(
    engine: &DiversityEngine,
    request: &UserDiversityRequest,
) -> Result<f64, ProfileError> {
    let mut names: Vec<&str> = Vec::new();
    for user in &request.users {
        for name in user.attributes.keys() {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
    }

    if names.is_empty() {
        return Ok(0.0);
    }

    let requirements: Vec<Attribute> = names.iter().copied().map(Attribute::quantitative).collect();

    let mut pool = AgentPool::new();
    for user in &request.users {
        let mut attributes = Vec::with_capacity(user.attributes.len());
        for (name, &value) in &user.attributes {
            check_unit_range(&user.id, name, value)?;
            attributes.push(Attribute::quantitative(name.as_str()).with_value(value));
        }
        pool.insert(Agent::new(user.id.as_str(), attributes))?;
    }

    let team: Vec<&Agent> = pool.agents().iter().collect();
    let total = engine.diversity(&team, &requirements)?;
    Ok(total / requirements.len() as f64)
}

/// Computes user diversity with the default engine, answering 0.0 on any
/// failure.
pub fn compute_user_diversity(request: &UserDiversityRequest) -> f64 {
    compute_user_diversity_with(&DiversityEngine::default(), request)
}

/// Computes user diversity, answering 0.0 on any failure.
pub fn compute_user_diversity_with(engine: &DiversityEngine, request: &UserDiversityRequest) -> f64 {
    try_compute_user_diversity(engine, request).unwrap_or_else(|e| {
        warn!(error = %e, "User diversity computation failed, answering 0.0");
        0.0
    })
}

fn check_unit_range(agent: &str, attribute: &str, value: f64) -> Result<(), ProfileError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ProfileError::QuantitativeOutOfRange {
            agent: agent.to_string(),
            attribute: attribute.to_string(),
            value,
        })
    }
}
