//! Heterogeneity metrics for a team of agents.
//!
//! Qualitative attributes are scored with Shannon entropy normalized by the
//! size of the attribute's label domain; quantitative attributes are scored
//! with the population standard deviation of the agents' values.

use ndarray::Array1;

use crate::error::DiversityError;

use super::agent::Agent;
use super::attribute::{Attribute, AttributeDomain, AttributeValue};

/// Shannon entropy, in nats, of a team's label counts.
///
/// `counts[i]` is the number of members holding label `i`; unused labels
/// contribute nothing. An all-zero or empty slice has entropy 0.0.
pub fn shannon_entropy(counts: &[usize]) -> f64 {
    let members: usize = counts.iter().sum();
    if members == 0 {
        return 0.0;
    }

    let shares = Array1::from_iter(counts.iter().filter(|&&c| c > 0).map(|&c| c as f64))
        / members as f64;
    -(&shares * &shares.mapv(f64::ln)).sum()
}

/// Entropy of `counts` divided by `ln(domain_size)`, the entropy of a team
/// spread evenly over the whole domain.
///
/// Domains with fewer than two labels score 0.0. The result lies in [0, 1]
/// when `counts` has at most `domain_size` entries.
pub fn normalized_entropy(counts: &[usize], domain_size: usize) -> f64 {
    if domain_size < 2 {
        return 0.0;
    }

    shannon_entropy(counts) / (domain_size as f64).ln()
}

/// Population standard deviation (no Bessel correction).
///
/// Returns 0.0 for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    Array1::from_vec(values.to_vec()).std(0.0)
}

/// Heterogeneity of `team` along a single requirement attribute.
///
/// An empty team always scores 0.0. A qualitative domain with fewer than two
/// labels scores 0.0, or fails with [`DiversityError::EmptyDomain`] when
/// `strict_domains` is set.
///
/// # Errors
///
/// Fails if a member lacks a value for `attribute`, holds a value of the other
/// kind, or holds a label outside the attribute's domain.
pub fn heterogeneity(
    team: &[&Agent],
    attribute: &Attribute,
    strict_domains: bool,
) -> Result<f64, DiversityError> {
    if team.is_empty() {
        return Ok(0.0);
    }

    match attribute.domain() {
        AttributeDomain::Labels(labels) => {
            let counts = label_counts(team, attribute, labels)?;
            if labels.len() < 2 && strict_domains {
                return Err(DiversityError::EmptyDomain {
                    attribute: attribute.id().to_string(),
                    labels: labels.len(),
                });
            }
            Ok(normalized_entropy(&counts, labels.len()))
        }
        AttributeDomain::Range { .. } => {
            let values = numeric_values(team, attribute)?;
            Ok(population_std_dev(&values))
        }
    }
}

/// Counts how many members hold each label of `labels`, in label order.
fn label_counts(
    team: &[&Agent],
    attribute: &Attribute,
    labels: &[String],
) -> Result<Vec<usize>, DiversityError> {
    let mut counts = vec![0usize; labels.len()];

    for agent in team {
        let label = match agent.value_of(attribute) {
            Some(AttributeValue::Label(label)) => label,
            Some(AttributeValue::Number(_)) => return Err(kind_mismatch(agent, attribute)),
            None => return Err(missing_value(agent, attribute)),
        };

        match labels.iter().position(|l| l == label) {
            Some(i) => counts[i] += 1,
            None => {
                return Err(DiversityError::ValueOutsideDomain {
                    agent: agent.id().to_string(),
                    attribute: attribute.id().to_string(),
                    value: label.clone(),
                })
            }
        }
    }

    Ok(counts)
}

/// Collects the members' numeric values for `attribute`.
fn numeric_values(team: &[&Agent], attribute: &Attribute) -> Result<Vec<f64>, DiversityError> {
    team.iter()
        .map(|agent| match agent.value_of(attribute) {
            Some(AttributeValue::Number(v)) => Ok(*v),
            Some(AttributeValue::Label(_)) => Err(kind_mismatch(agent, attribute)),
            None => Err(missing_value(agent, attribute)),
        })
        .collect()
}

fn missing_value(agent: &Agent, attribute: &Attribute) -> DiversityError {
    DiversityError::MissingAttributeValue {
        agent: agent.id().to_string(),
        attribute: attribute.id().to_string(),
    }
}

fn kind_mismatch(agent: &Agent, attribute: &Attribute) -> DiversityError {
    DiversityError::KindMismatch {
        agent: agent.id().to_string(),
        attribute: attribute.id().to_string(),
    }
}
