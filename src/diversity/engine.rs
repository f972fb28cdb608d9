//! Team diversity, equivalent-agent discovery and alternative-team search.
//!
//! # Overview
//!
//! - [`diversity`] sums per-attribute heterogeneity over a team. The result is
//!   not normalized; dividing by the number of requirements projects it into
//!   [0, 1] and is left to the caller.
//! - [`find_equivalent_agents`] finds agents matching a reference agent on
//!   every requirement except one.
//! - [`change_diversity`] explores single-member substitutions, drawn from the
//!   agents' equivalence lists, that shift diversity along one attribute.
//!
//! [`DiversityEngine`] bundles these with an [`EngineConfig`].

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::DiversityError;

use super::agent::{Agent, AgentId};
use super::attribute::{Attribute, AttributeKind, AttributeValue};
use super::config::EngineConfig;
use super::metrics::heterogeneity;
use super::pool::AgentPool;

/// A team in canonical form: members sorted by id, no duplicates.
pub type Team<'a> = Vec<&'a Agent>;

/// Acceptance rule of an alternative-team search.
///
/// Both variants look at `diff = current - candidate`, the diversity of the
/// team minus the diversity of the substituted team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    /// Accepts when `diff >= epsilon`.
    Increase,
    /// Accepts when `diff <= -epsilon`, the mirror of `Increase`.
    Decrease,
}

impl ChangeDirection {
    /// Returns true if replacing a team scoring `current` by one scoring
    /// `candidate` satisfies this rule.
    pub fn accepts(self, current: f64, candidate: f64, epsilon: f64) -> bool {
        let diff = current - candidate;
        match self {
            ChangeDirection::Increase => diff >= epsilon,
            ChangeDirection::Decrease => diff <= -epsilon,
        }
    }
}

impl std::str::FromStr for ChangeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "increase" | "up" => Ok(ChangeDirection::Increase),
            "decrease" | "down" => Ok(ChangeDirection::Decrease),
            other => Err(format!(
                "unknown direction '{}': expected 'increase' or 'decrease'",
                other
            )),
        }
    }
}

/// Computes the diversity of `team` over `requirements`.
///
/// Qualitative domains with fewer than two labels contribute 0.0.
///
/// # Errors
///
/// Fails if a member lacks a value for a requirement, or holds a value of the
/// wrong kind or outside the requirement's domain.
pub fn diversity(team: &[&Agent], requirements: &[Attribute]) -> Result<f64, DiversityError> {
    diversity_with(team, requirements, false)
}

fn diversity_with(
    team: &[&Agent],
    requirements: &[Attribute],
    strict_domains: bool,
) -> Result<f64, DiversityError> {
    requirements.iter().try_fold(0.0, |total, attribute| {
        Ok(total + heterogeneity(team, attribute, strict_domains)?)
    })
}

/// Finds agents in `candidates` equivalent to `agent` on every requirement
/// except `attribute`.
///
/// Qualitative requirements must match exactly; quantitative ones within
/// `epsilon`. When `requirements` is `None`, the agent's own attributes are
/// used. A value missing on either side, or of the wrong kind, makes the
/// candidate non-equivalent. `agent` itself is never returned, and results
/// keep the order of `candidates`.
pub fn find_equivalent_agents<'a, I>(
    agent: &Agent,
    attribute: &Attribute,
    candidates: I,
    requirements: Option<&[Attribute]>,
    epsilon: f64,
) -> Vec<&'a Agent>
where
    I: IntoIterator<Item = &'a Agent>,
{
    let requirements = requirements.unwrap_or_else(|| agent.attributes());

    candidates
        .into_iter()
        .filter(|candidate| *candidate != agent)
        .filter(|candidate| {
            requirements
                .iter()
                .filter(|requirement| *requirement != attribute)
                .all(|requirement| values_match(agent, candidate, requirement, epsilon))
        })
        .collect()
}

fn values_match(reference: &Agent, candidate: &Agent, requirement: &Attribute, epsilon: f64) -> bool {
    match (
        requirement.kind(),
        reference.value_of(requirement),
        candidate.value_of(requirement),
    ) {
        (
            AttributeKind::Qualitative,
            Some(AttributeValue::Label(a)),
            Some(AttributeValue::Label(b)),
        ) => a == b,
        (
            AttributeKind::Quantitative,
            Some(AttributeValue::Number(a)),
            Some(AttributeValue::Number(b)),
        ) => (a - b).abs() <= epsilon,
        _ => false,
    }
}

/// Finds teams obtained by swapping one member of `team` for one of its
/// recorded equivalents, keeping those whose diversity along `attribute`
/// satisfies `direction` (see [`ChangeDirection::accepts`]).
///
/// Equivalents are read from each member's `equivalent` map and resolved
/// through `pool`; candidates already in the team are skipped. Returned teams
/// are canonical (sorted by id) and unique.
///
/// # Errors
///
/// Fails with [`DiversityError::UnknownAgent`] if an equivalence entry is not
/// in `pool`, or with any error raised while scoring a team.
pub fn change_diversity<'a>(
    team: &[&'a Agent],
    attribute: &Attribute,
    pool: &'a AgentPool,
    epsilon: f64,
    direction: ChangeDirection,
) -> Result<Vec<Team<'a>>, DiversityError> {
    change_diversity_with(team, attribute, pool, epsilon, direction, false)
}

fn change_diversity_with<'a>(
    team: &[&'a Agent],
    attribute: &Attribute,
    pool: &'a AgentPool,
    epsilon: f64,
    direction: ChangeDirection,
    strict_domains: bool,
) -> Result<Vec<Team<'a>>, DiversityError> {
    let requirement = std::slice::from_ref(attribute);
    let current = diversity_with(team, requirement, strict_domains)?;
    let members: HashSet<&AgentId> = team.iter().map(|a| a.id()).collect();

    let mut seen: HashSet<Vec<AgentId>> = HashSet::new();
    let mut alternatives: Vec<Team<'a>> = Vec::new();
    let mut evaluated = 0usize;

    for agent in team {
        for candidate_id in agent.equivalents(attribute) {
            if members.contains(candidate_id) {
                continue;
            }
            let candidate = pool
                .get(candidate_id)
                .ok_or_else(|| DiversityError::UnknownAgent(candidate_id.to_string()))?;

            let mut new_team: Team<'a> = team
                .iter()
                .copied()
                .filter(|member| member.id() != agent.id())
                .collect();
            new_team.push(candidate);
            new_team.sort();

            let key: Vec<AgentId> = new_team.iter().map(|a| a.id().clone()).collect();
            if seen.contains(&key) {
                continue;
            }

            evaluated += 1;
            let candidate_diversity = diversity_with(&new_team, requirement, strict_domains)?;
            if direction.accepts(current, candidate_diversity, epsilon) {
                debug!(
                    out = %agent.id(),
                    into = %candidate.id(),
                    from = current,
                    to = candidate_diversity,
                    "Accepted alternative team"
                );
                seen.insert(key);
                alternatives.push(new_team);
            }
        }
    }

    info!(
        attribute = %attribute,
        direction = ?direction,
        team_size = team.len(),
        evaluated,
        accepted = alternatives.len(),
        "Alternative team search complete"
    );

    Ok(alternatives)
}

/// Heterogeneity of a team along one requirement attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeScore {
    pub attribute: String,
    pub kind: String,
    pub heterogeneity: f64,
}

/// Per-attribute breakdown of a team's diversity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityReport {
    /// Number of agents scored.
    pub team_size: usize,
    /// Heterogeneity for each requirement, in requirement order.
    pub attributes: Vec<AttributeScore>,
    /// Sum of per-attribute heterogeneity.
    pub total: f64,
    /// `total` divided by the number of requirements (0.0 without requirements).
    pub normalized: f64,
}

impl DiversityReport {
    /// Returns a summary of the report as a formatted string.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Diversity Report:\n - Team size: {}\n - Attributes: {}\n",
            self.team_size,
            self.attributes.len()
        );
        for score in &self.attributes {
            out.push_str(&format!(
                "   - {} ({}): {:.4}\n",
                score.attribute, score.kind, score.heterogeneity
            ));
        }
        out.push_str(&format!(
            " - Total: {:.4}\n - Normalized: {:.4}",
            self.total, self.normalized
        ));
        out
    }
}

/// Diversity operations bound to an [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct DiversityEngine {
    config: EngineConfig,
}

impl DiversityEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes the diversity of `team`, honouring the domain policy.
    pub fn diversity(&self, team: &[&Agent], requirements: &[Attribute]) -> Result<f64, DiversityError> {
        diversity_with(team, requirements, self.config.strict_domains)
    }

    /// Computes diversity with a per-attribute breakdown.
    pub fn report(
        &self,
        team: &[&Agent],
        requirements: &[Attribute],
    ) -> Result<DiversityReport, DiversityError> {
        let mut attributes = Vec::with_capacity(requirements.len());
        for requirement in requirements {
            let score = heterogeneity(team, requirement, self.config.strict_domains)?;
            debug!(attribute = %requirement, heterogeneity = score, "Scored attribute");
            attributes.push(AttributeScore {
                attribute: requirement.id().to_string(),
                kind: requirement.kind().to_string(),
                heterogeneity: score,
            });
        }

        let total: f64 = attributes.iter().map(|s| s.heterogeneity).sum();
        let normalized = if attributes.is_empty() {
            0.0
        } else {
            total / attributes.len() as f64
        };

        Ok(DiversityReport {
            team_size: team.len(),
            attributes,
            total,
            normalized,
        })
    }

    /// Finds equivalent agents using the configured tolerance.
    pub fn find_equivalent_agents<'a, I>(
        &self,
        agent: &Agent,
        attribute: &Attribute,
        candidates: I,
        requirements: Option<&[Attribute]>,
    ) -> Vec<&'a Agent>
    where
        I: IntoIterator<Item = &'a Agent>,
    {
        find_equivalent_agents(
            agent,
            attribute,
            candidates,
            requirements,
            self.config.equivalence_epsilon,
        )
    }

    /// Searches alternative teams using the configured minimum shift.
    pub fn change_diversity<'a>(
        &self,
        team: &[&'a Agent],
        attribute: &Attribute,
        pool: &'a AgentPool,
        direction: ChangeDirection,
    ) -> Result<Vec<Team<'a>>, DiversityError> {
        change_diversity_with(
            team,
            attribute,
            pool,
            self.config.change_epsilon,
            direction,
            self.config.strict_domains,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS: [&str; 3] = ["low", "mid", "high"];

    fn agent(id: &str, x: f64, level: &str) -> Agent {
        Agent::new(
            id,
            vec![
                Attribute::quantitative("x").with_value(x),
                Attribute::qualitative("level", OPTIONS).with_value(level),
            ],
        )
    }

    fn requirements() -> Vec<Attribute> {
        vec![
            Attribute::quantitative("x"),
            Attribute::qualitative("level", OPTIONS),
        ]
    }

    #[test]
    fn test_diversity_sums_attributes() {
        let agents = [agent("1", 1.0, "low"), agent("2", 0.0, "high")];
        let team: Vec<&Agent> = agents.iter().collect();

        // std-dev 0.5 plus entropy ln 2 / ln 3
        let expected = 0.5 + 2.0_f64.ln() / 3.0_f64.ln();
        let d = diversity(&team, &requirements()).unwrap();
        assert!((d - expected).abs() < 1e-12, "got {}", d);
    }

    #[test]
    fn test_diversity_without_requirements() {
        let agents = [agent("1", 1.0, "low")];
        let team: Vec<&Agent> = agents.iter().collect();
        assert_eq!(diversity(&team, &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_engine_strict_domains() {
        let agents = [Agent::new(
            "1",
            vec![Attribute::qualitative("planet", ["earth"]).with_value("earth")],
        )];
        let team: Vec<&Agent> = agents.iter().collect();
        let reqs = [Attribute::qualitative("planet", ["earth"])];

        assert_eq!(diversity(&team, &reqs).unwrap(), 0.0);

        let strict = DiversityEngine::new(EngineConfig::new().with_strict_domains(true));
        assert!(matches!(
            strict.diversity(&team, &reqs),
            Err(DiversityError::EmptyDomain { .. })
        ));
    }

    #[test]
    fn test_find_equivalent_excludes_self_and_target_attribute() {
        let agents = vec![
            agent("1", 0.50, "low"),
            agent("2", 0.505, "high"),
            agent("3", 0.90, "high"),
            agent("4", 0.50, "low"),
        ];
        let reqs = requirements();

        // Ignoring "level": agents 2 and 4 are within 0.01 on x.
        let found = find_equivalent_agents(&agents[0], &reqs[1], &agents, Some(reqs.as_slice()), 1e-2);
        let ids: Vec<&str> = found.iter().map(|a| a.id().as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);

        // Ignoring "x": only agent 4 shares the label.
        let found = find_equivalent_agents(&agents[0], &reqs[0], &agents, Some(reqs.as_slice()), 1e-2);
        let ids: Vec<&str> = found.iter().map(|a| a.id().as_str()).collect();
        assert_eq!(ids, vec!["4"]);
    }

    #[test]
    fn test_find_equivalent_defaults_to_agent_attributes() {
        let agents = vec![agent("1", 0.2, "mid"), agent("2", 0.8, "mid")];
        let x = Attribute::quantitative("x");

        let found = find_equivalent_agents(&agents[0], &x, &agents, None, 1e-2);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id().as_str(), "2");
    }

    #[test]
    fn test_find_equivalent_missing_value_fails_closed() {
        let reference = agent("1", 0.2, "mid");
        let partial = Agent::new("2", vec![Attribute::quantitative("x").with_value(0.2)]);
        let candidates = [partial];
        let reqs = requirements();

        let found = find_equivalent_agents(&reference, &reqs[0], &candidates, Some(reqs.as_slice()), 1.0);
        assert!(found.is_empty());
    }

    #[test]
    fn test_direction_accepts() {
        // diff = current - candidate
        assert!(ChangeDirection::Increase.accepts(0.35, 0.2, 0.1));
        assert!(ChangeDirection::Increase.accepts(0.5, 0.25, 0.25));
        assert!(!ChangeDirection::Increase.accepts(0.25, 0.2, 0.1));
        assert!(!ChangeDirection::Increase.accepts(0.2, 0.4, 0.1));
        assert!(ChangeDirection::Decrease.accepts(0.2, 0.4, 0.1));
        assert!(!ChangeDirection::Decrease.accepts(0.35, 0.2, 0.1));
        assert!(!ChangeDirection::Decrease.accepts(0.35, 0.4, 0.1));
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("Increase".parse::<ChangeDirection>(), Ok(ChangeDirection::Increase));
        assert_eq!("down".parse::<ChangeDirection>(), Ok(ChangeDirection::Decrease));
        assert!("sideways".parse::<ChangeDirection>().is_err());
    }

    fn swap_pool() -> AgentPool {
        let mut pool = AgentPool::from_agents(vec![
            agent("a", 0.0, "low"),
            agent("b", 0.0, "low"),
            agent("c", 0.0, "high"),
            agent("d", 0.0, "mid"),
        ])
        .unwrap();
        pool.populate_equivalents(&requirements(), 1e-2);
        pool
    }

    #[test]
    fn test_change_diversity_decrease() {
        let pool = swap_pool();
        let team: Vec<&Agent> = ["a", "b"].iter().filter_map(|id| pool.get_str(id)).collect();
        let level = Attribute::qualitative("level", OPTIONS);

        let teams = change_diversity(&team, &level, &pool, 0.1, ChangeDirection::Decrease).unwrap();
        let ids: Vec<Vec<&str>> = teams
            .iter()
            .map(|t| t.iter().map(|a| a.id().as_str()).collect())
            .collect();

        // Either "low" member can be swapped for c or d, raising diversity.
        assert_eq!(ids, vec![vec!["b", "c"], vec!["b", "d"], vec!["a", "c"], vec!["a", "d"]]);
    }

    #[test]
    fn test_change_diversity_increase() {
        let pool = swap_pool();
        let team: Vec<&Agent> = ["a", "c"].iter().filter_map(|id| pool.get_str(id)).collect();
        let level = Attribute::qualitative("level", OPTIONS);

        let teams = change_diversity(&team, &level, &pool, 0.1, ChangeDirection::Increase).unwrap();
        let ids: Vec<Vec<&str>> = teams
            .iter()
            .map(|t| t.iter().map(|a| a.id().as_str()).collect())
            .collect();

        // Only replacing c by b drops the diversity, to 0.
        assert_eq!(ids, vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_change_diversity_increase_on_two_labels() {
        let two = ["low", "high"];
        let make = |id: &str, level: &str| {
            Agent::new(
                id,
                vec![
                    Attribute::quantitative("x").with_value(0.5),
                    Attribute::qualitative("level", two).with_value(level),
                ],
            )
        };
        let level = Attribute::qualitative("level", two);
        let mut pool =
            AgentPool::from_agents(vec![make("a", "low"), make("b", "high"), make("c", "low")])
                .unwrap();
        pool.populate_equivalents(&[Attribute::quantitative("x"), level.clone()], 1e-2);
        let team: Vec<&Agent> = ["a", "b"].iter().filter_map(|id| pool.get_str(id)).collect();

        // current 1.0; swapping b for c scores 0.0, so diff = 1.0
        let teams = change_diversity(&team, &level, &pool, 0.1, ChangeDirection::Increase).unwrap();
        let ids: Vec<Vec<&str>> = teams
            .iter()
            .map(|t| t.iter().map(|a| a.id().as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["a", "c"]]);

        let teams = change_diversity(&team, &level, &pool, 0.1, ChangeDirection::Decrease).unwrap();
        assert!(teams.is_empty());
    }

    #[test]
    fn test_engine_change_diversity_honours_strict_domains() {
        let planet = Attribute::qualitative("planet", ["earth"]);
        let pool = AgentPool::from_agents(vec![
            Agent::new("1", vec![planet.clone().with_value("earth")]),
            Agent::new("2", vec![planet.clone().with_value("earth")]),
        ])
        .unwrap();
        let team: Vec<&Agent> = pool.agents().iter().collect();

        let lenient = DiversityEngine::default();
        assert_eq!(
            lenient.change_diversity(&team, &planet, &pool, ChangeDirection::Increase),
            Ok(vec![])
        );

        let strict = DiversityEngine::new(EngineConfig::new().with_strict_domains(true));
        assert!(matches!(
            strict.change_diversity(&team, &planet, &pool, ChangeDirection::Increase),
            Err(DiversityError::EmptyDomain { .. })
        ));
    }

    #[test]
    fn test_change_diversity_unknown_equivalent() {
        let mut ghost_ref = agent("a", 0.0, "low");
        let level = Attribute::qualitative("level", OPTIONS);
        ghost_ref.set_equivalents(&level, vec![AgentId::from("ghost")]);
        let pool = AgentPool::from_agents(vec![ghost_ref]).unwrap();
        let team: Vec<&Agent> = pool.agents().iter().collect();

        assert_eq!(
            change_diversity(&team, &level, &pool, 0.1, ChangeDirection::Increase),
            Err(DiversityError::UnknownAgent("ghost".to_string()))
        );
    }

    #[test]
    fn test_report() {
        let agents = [agent("1", 1.0, "low"), agent("2", 0.0, "low")];
        let team: Vec<&Agent> = agents.iter().collect();
        let engine = DiversityEngine::default();

        let report = engine.report(&team, &requirements()).unwrap();
        assert_eq!(report.team_size, 2);
        assert_eq!(report.attributes.len(), 2);
        assert_eq!(report.attributes[0].kind, "quantitative");
        assert!((report.total - 0.5).abs() < 1e-12);
        assert!((report.normalized - 0.25).abs() < 1e-12);
        assert!(report.summary().contains("Normalized: 0.2500"));
    }

    #[test]
    fn test_report_without_requirements() {
        let report = DiversityEngine::default().report(&[], &[]).unwrap();
        assert_eq!(report.normalized, 0.0);
        assert_eq!(report.total, 0.0);
    }
}
