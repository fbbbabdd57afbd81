//! # TSP-GA Core
//!
//! Genetic algorithm engine for the symmetric travelling salesman problem.
//!
//! The crate knows nothing about where points come from. It needs a
//! [`DistanceOracle`] (usually a [`DistanceMatrix`] built from [`GeoPoint`]s)
//! and an [`EvolutionConfig`], and returns an [`EvolutionResult`] holding the
//! best [`Tour`] and the per-generation best-length history.
//!
//! ## Core Components
//!
//! - **Geography**: [`GeoPoint`] with haversine great-circle distance
//! - **Distances**: [`DistanceOracle`] trait, dense [`DistanceMatrix`]
//! - **Tours**: [`Tour`] - cyclic permutation with length, validity and swap mutation
//! - **Crossover**: [`Crossover`] - PMX, OX and CX operators
//! - **Evolution**: [`EvolutionRunner`] - ranking, breeding pool, replacement, mutation
//!
//! ## Crossover Operators
//!
//! | Operator | Keeps from parents | Randomness |
//! |----------|--------------------|------------|
//! | `Pmx` | absolute positions via a mapped slice | random slice |
//! | `Ox` | relative order around a slice | random slice |
//! | `Cx` | positions along the cycle through index 0 | none |
//!
//! ## Configuration
//!
//! ```rust
//! use tsp_ga_core::{BreedingPoolPolicy, Crossover, EvolutionConfig};
//!
//! let config = EvolutionConfig::new()
//!     .with_population_size(64)
//!     .with_generations_count(500)
//!     .with_mutation_factor(0.2)
//!     .with_crossover(Crossover::Ox)
//!     .with_breeding_pool(BreedingPoolPolicy::Sqrt)
//!     .with_seed(42);
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod config;
pub mod crossover;
pub mod distance;
pub mod error;
pub mod evolution;
pub mod geo;
pub mod result;
pub mod tour;

// Re-exports
pub use config::{BreedingPoolPolicy, EvolutionConfig, ReplacementPolicy};
pub use crossover::{
    cycle_crossover, order_crossover, ox_with_slice, pmx, pmx_with_slice, random_slice, Crossover,
};
pub use distance::{DistanceMatrix, DistanceOracle};
pub use error::{Error, Result};
pub use evolution::EvolutionRunner;
pub use geo::{GeoPoint, EARTH_RADIUS_KM};
pub use result::{EvolutionProgress, EvolutionResult};
pub use tour::Tour;
