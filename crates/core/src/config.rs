//! Run configuration for the evolution loop.

use std::fmt;
use std::str::FromStr;

use crate::crossover::Crossover;
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How many top-ranked tours form the breeding pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BreedingPoolPolicy {
    /// `ceil(log2(population_size) + 1)`.
    #[default]
    Log2,
    /// `ceil(sqrt(population_size) + 1)`.
    Sqrt,
}

impl BreedingPoolPolicy {
    /// Breeding pool size for a population, clamped to `1..=population_size`.
    pub fn pool_size(&self, population_size: usize) -> usize {
        if population_size == 0 {
            return 0;
        }
        let p = population_size as f64;
        let k = match self {
            BreedingPoolPolicy::Log2 => (p.log2() + 1.0).ceil(),
            BreedingPoolPolicy::Sqrt => (p.sqrt() + 1.0).ceil(),
        };
        (k as usize).clamp(1, population_size)
    }
}

impl fmt::Display for BreedingPoolPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BreedingPoolPolicy::Log2 => "log2",
            BreedingPoolPolicy::Sqrt => "sqrt",
        })
    }
}

impl FromStr for BreedingPoolPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log2" | "log" => Ok(BreedingPoolPolicy::Log2),
            "sqrt" => Ok(BreedingPoolPolicy::Sqrt),
            other => Err(Error::invalid_config(format!(
                "unknown breeding pool policy '{}' (expected log2 or sqrt)",
                other
            ))),
        }
    }
}

/// How offspring enter the next generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReplacementPolicy {
    /// Merge children with the population, rank, keep the best
    /// `population_size`. Never loses the best tour found so far.
    #[default]
    Elitist,
    /// Children replace the population. When there are fewer children than
    /// `population_size`, the best current members fill the remaining slots.
    Generational,
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReplacementPolicy::Elitist => "elitist",
            ReplacementPolicy::Generational => "generational",
        })
    }
}

impl FromStr for ReplacementPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "elitist" => Ok(ReplacementPolicy::Elitist),
            "generational" => Ok(ReplacementPolicy::Generational),
            other => Err(Error::invalid_config(format!(
                "unknown replacement policy '{}' (expected elitist or generational)",
                other
            ))),
        }
    }
}

/// Configuration for one evolution run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvolutionConfig {
    /// Number of tours kept alive each generation (at least 2).
    pub population_size: usize,
    /// Number of generations to run (0 = only rank the initial population).
    pub generations_count: usize,
    /// Per-member, per-generation probability of a swap mutation (0.0 - 1.0).
    pub mutation_factor: f64,
    /// Crossover operator applied to every parent pair.
    pub crossover: Crossover,
    /// Breeding pool sizing rule.
    pub breeding_pool: BreedingPoolPolicy,
    /// Replacement rule.
    pub replacement: ReplacementPolicy,
    /// Seed for reproducible runs (None = seeded from entropy).
    pub seed: Option<u64>,
    /// Evaluate tour lengths on the rayon thread pool.
    pub parallel_evaluation: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10,
            generations_count: 1000,
            mutation_factor: 0.1,
            crossover: Crossover::default(),
            breeding_pool: BreedingPoolPolicy::default(),
            replacement: ReplacementPolicy::default(),
            seed: None,
            parallel_evaluation: false,
        }
    }
}

impl EvolutionConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations_count(mut self, count: usize) -> Self {
        self.generations_count = count;
        self
    }

    /// Sets the mutation factor.
    pub fn with_mutation_factor(mut self, factor: f64) -> Self {
        self.mutation_factor = factor;
        self
    }

    /// Sets the crossover operator.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the breeding pool policy.
    pub fn with_breeding_pool(mut self, policy: BreedingPoolPolicy) -> Self {
        self.breeding_pool = policy;
        self
    }

    /// Sets the replacement policy.
    pub fn with_replacement(mut self, policy: ReplacementPolicy) -> Self {
        self.replacement = policy;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables parallel length evaluation.
    pub fn with_parallel_evaluation(mut self, enabled: bool) -> Self {
        self.parallel_evaluation = enabled;
        self
    }

    /// Breeding pool size implied by this configuration.
    pub fn pool_size(&self) -> usize {
        self.breeding_pool.pool_size(self.population_size)
    }

    /// Checks that the configuration can be run.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(Error::invalid_config(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_factor) {
            return Err(Error::invalid_config(format!(
                "mutation_factor must be within [0, 1], got {}",
                self.mutation_factor
            )));
        }
        Ok(())
    }
}
