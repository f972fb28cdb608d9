//! Owned collection of agents addressable by id.
//!
//! Teams borrow agents from a pool, and equivalence lists store ids that
//! resolve back through it.

use std::collections::HashMap;

use tracing::debug;

use crate::error::DiversityError;

use super::agent::{Agent, AgentId};
use super::attribute::Attribute;
use super::engine::find_equivalent_agents;

/// Agents of a comparison set, unique by id, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct AgentPool {
    agents: Vec<Agent>,
    index: HashMap<AgentId, usize>,
}

impl AgentPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pool from `agents`.
    ///
    /// # Errors
    ///
    /// Fails with [`DiversityError::DuplicateAgent`] if two agents share an id.
    pub fn from_agents(agents: Vec<Agent>) -> Result<Self, DiversityError> {
        let mut pool = Self::new();
        for agent in agents {
            pool.insert(agent)?;
        }
        Ok(pool)
    }

    /// Builds a pool from agents whose ids are distinct by construction.
    pub(crate) fn from_distinct(agents: Vec<Agent>) -> Self {
        let index: HashMap<AgentId, usize> = agents
            .iter()
            .enumerate()
            .map(|(i, agent)| (agent.id().clone(), i))
            .collect();
        debug_assert_eq!(index.len(), agents.len(), "agent ids must be distinct");
        Self { agents, index }
    }

    /// Adds an agent to the pool.
    ///
    /// # Errors
    ///
    /// Fails with [`DiversityError::DuplicateAgent`] if the id is taken.
    pub fn insert(&mut self, agent: Agent) -> Result<(), DiversityError> {
        if self.index.contains_key(agent.id()) {
            return Err(DiversityError::DuplicateAgent(agent.id().to_string()));
        }
        self.index.insert(agent.id().clone(), self.agents.len());
        self.agents.push(agent);
        Ok(())
    }

    pub fn get(&self, id: &AgentId) -> Option<&Agent> {
        self.index.get(id).map(|&i| &self.agents[i])
    }

    pub fn get_str(&self, id: &str) -> Option<&Agent> {
        self.get(&AgentId::from(id))
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Resolves a list of ids into a team borrowed from this pool.
    ///
    /// # Errors
    ///
    /// Fails with [`DiversityError::UnknownAgent`] on the first unknown id.
    pub fn team<'a, I>(&self, ids: I) -> Result<Vec<&Agent>, DiversityError>
    where
        I: IntoIterator<Item = &'a AgentId>,
    {
        ids.into_iter()
            .map(|id| {
                self.get(id)
                    .ok_or_else(|| DiversityError::UnknownAgent(id.to_string()))
            })
            .collect()
    }

    /// Fills every agent's equivalence map for each of `requirements`.
    ///
    /// Each entry lists the other agents of the pool matching the agent on all
    /// requirements but the keyed one, within `epsilon` for quantitative
    /// values. Existing entries for these requirements are replaced.
    pub fn populate_equivalents(&mut self, requirements: &[Attribute], epsilon: f64) {
        let mut computed: Vec<Vec<Vec<AgentId>>> = Vec::with_capacity(self.agents.len());

        for agent in &self.agents {
            let per_attribute = requirements
                .iter()
                .map(|attribute| {
                    find_equivalent_agents(
                        agent,
                        attribute,
                        &self.agents,
                        Some(requirements),
                        epsilon,
                    )
                    .into_iter()
                    .map(|a| a.id().clone())
                    .collect()
                })
                .collect();
            computed.push(per_attribute);
        }

        let mut links = 0usize;
        for (agent, per_attribute) in self.agents.iter_mut().zip(computed) {
            for (attribute, ids) in requirements.iter().zip(per_attribute) {
                links += ids.len();
                agent.set_equivalents(attribute, ids);
            }
        }

        debug!(
            agents = self.agents.len(),
            requirements = requirements.len(),
            links,
            "Populated equivalence lists"
        );
    }
}
