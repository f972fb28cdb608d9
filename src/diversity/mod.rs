//! Team diversity over agent profiles.
//!
//! This module scores how heterogeneous a team of agents is across a set of
//! requirement attributes, finds agents that are interchangeable on all
//! attributes but one, and searches single-member substitutions that move a
//! team's diversity up or down.
//!
//! # Overview
//!
//! 1. **Attributes** - Quantitative (numeric range) or qualitative (label set)
//!    dimensions; unbound they act as requirements, bound as agent values
//! 2. **Agents** - Profiles identified by id, with a lazily filled
//!    equivalence map
//! 3. **Metrics** - Normalized Shannon entropy for labels, population
//!    standard deviation for numbers
//! 4. **Engine** - Diversity, equivalence and alternative-team search
//!
//! # Usage
//!
//! ```
//! use profile_diversity::diversity::{diversity, Agent, Attribute};
//!
//! let agents = vec![
//!     Agent::new("1", vec![Attribute::quantitative("x").with_value(1.0)]),
//!     Agent::new("2", vec![Attribute::quantitative("x").with_value(0.0)]),
//! ];
//! let team: Vec<&Agent> = agents.iter().collect();
//!
//! let score = diversity(&team, &[Attribute::quantitative("x")]).unwrap();
//! assert_eq!(score, 0.5);
//! ```

pub mod agent;
pub mod attribute;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod pool;
pub mod sampling;

// Re-export main types for convenience
pub use agent::{Agent, AgentId};
pub use attribute::{Attribute, AttributeDomain, AttributeKind, AttributeValue};
pub use config::{ConfigError, EngineConfig};
pub use engine::{
    change_diversity, diversity, find_equivalent_agents, AttributeScore, ChangeDirection,
    DiversityEngine, DiversityReport, Team,
};
pub use metrics::{heterogeneity, normalized_entropy, population_std_dev, shannon_entropy};
pub use pool::AgentPool;
pub use sampling::{default_schema, PopulationSampler, RATING_OPTIONS};
