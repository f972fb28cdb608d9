//! Synthetic populations and random team selection.
//!
//! Used to exercise the engine on generated data: agents get uniform values
//! over each quantitative range and a uniformly chosen label for each
//! qualitative attribute.

use rand::seq::{IndexedRandom, SliceRandom};
use rand::{RngExt, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::agent::Agent;
use super::attribute::{Attribute, AttributeDomain};
use super::pool::AgentPool;

/// Labels of the default qualitative rating scale.
pub const RATING_OPTIONS: [&str; 5] = ["poor", "bad", "mediocre", "good", "excellent"];

/// Default mixed schema: three quantitative and two qualitative attributes.
pub fn default_schema() -> Vec<Attribute> {
    vec![
        Attribute::quantitative("1000"),
        Attribute::quantitative("1001"),
        Attribute::qualitative("1002", RATING_OPTIONS),
        Attribute::qualitative("1003", RATING_OPTIONS),
        Attribute::quantitative("1004"),
    ]
}

/// Generates agents and samples teams, reproducibly when seeded.
#[derive(Debug, Clone, Default)]
pub struct PopulationSampler {
    /// Random seed for reproducibility (None = non-deterministic).
    seed: Option<u64>,
}

impl PopulationSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generates `size` agents with ids `0..size`, each bound to a random
    /// value of every attribute in `schema`.
    ///
    /// Attributes with an empty label domain are left unbound.
    pub fn generate(&self, size: usize, schema: &[Attribute]) -> AgentPool {
        let mut rng = self.create_rng();

        let agents = (0..size)
            .map(|i| {
                let attributes = schema
                    .iter()
                    .map(|attribute| random_instance(attribute, &mut rng))
                    .collect();
                Agent::new(i as u64, attributes)
            })
            .collect();

        AgentPool::from_distinct(agents)
    }

    /// Picks `size` distinct agents of `pool` (all of them if `size` exceeds
    /// the pool).
    pub fn sample_team<'a>(&self, pool: &'a AgentPool, size: usize) -> Vec<&'a Agent> {
        let mut rng = self.create_rng();
        let mut team: Vec<&Agent> = pool.agents().iter().collect();
        team.shuffle(&mut rng);
        team.truncate(size);
        team
    }

    /// Creates a random number generator.
    fn create_rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}

fn random_instance(attribute: &Attribute, rng: &mut ChaCha8Rng) -> Attribute {
    match attribute.domain() {
        AttributeDomain::Range { min, max } => {
            let value = if min < max {
                rng.random_range(*min..=*max)
            } else {
                *min
            };
            attribute.as_requirement().with_value(value)
        }
        AttributeDomain::Labels(labels) => match labels.choose(rng) {
            Some(label) => attribute.as_requirement().with_value(label.clone()),
            None => attribute.as_requirement(),
        },
    }
}
