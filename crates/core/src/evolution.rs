//! The generational evolution loop.
//!
//! Each generation walks the same states:
//!
//! 1. **Ranked**: the population is sorted by ascending length; the first
//!    member is the best tour.
//! 2. **Reproducing**: the top `k` tours form the breeding pool and every
//!    ordered pair (self-pairs included) is crossed, yielding `2 * k²` children.
//! 3. **Replacing**: children enter the population according to the
//!    [`ReplacementPolicy`].
//! 4. **Mutating**: each member is swap-mutated with probability
//!    `mutation_factor`. Under elitist replacement the best member is exempt,
//!    so the recorded best length never increases.
//!
//! The loop runs `generations_count` times and records the best length after
//! ranking the initial population and after every generation.
//!
//! # Example
//!
//! ```rust
//! use tsp_ga_core::{Crossover, DistanceMatrix, EvolutionConfig, EvolutionRunner};
//!
//! let distances = DistanceMatrix::from_fn(6, |i, j| (i as f64 - j as f64).abs()).unwrap();
//! let config = EvolutionConfig::new()
//!     .with_population_size(12)
//!     .with_generations_count(25)
//!     .with_crossover(Crossover::Ox)
//!     .with_seed(7);
//!
//! let result = EvolutionRunner::new(config, &distances).unwrap().run().unwrap();
//! assert_eq!(result.history.len(), 26);
//! assert!(result.is_monotonic());
//! ```

use std::time::Instant;

use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::config::{EvolutionConfig, ReplacementPolicy};
use crate::distance::DistanceOracle;
use crate::error::{Error, Result};
use crate::result::{EvolutionProgress, EvolutionResult};
use crate::tour::Tour;

/// A tour together with its cached length.
#[derive(Debug, Clone)]
struct Scored {
    tour: Tour,
    length: f64,
}

/// Runs the genetic algorithm against a distance oracle.
pub struct EvolutionRunner<'a, D: DistanceOracle + ?Sized> {
    config: EvolutionConfig,
    oracle: &'a D,
}

impl<'a, D: DistanceOracle + ?Sized> EvolutionRunner<'a, D> {
    /// Creates a runner, rejecting configurations that cannot run.
    pub fn new(config: EvolutionConfig, oracle: &'a D) -> Result<Self> {
        config.validate()?;
        if oracle.size() < 2 {
            return Err(Error::TooFewPoints {
                found: oracle.size(),
            });
        }
        Ok(Self { config, oracle })
    }

    /// The configuration this runner was built with.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Runs the loop, seeding from `config.seed` when set.
    pub fn run(&self) -> Result<EvolutionResult> {
        let mut rng = self.seeded_rng();
        self.run_with_rng(&mut rng)
    }

    /// Runs the loop with a progress callback.
    pub fn run_with_progress<F>(&self, progress_callback: F) -> Result<EvolutionResult>
    where
        F: Fn(EvolutionProgress),
    {
        let mut rng = self.seeded_rng();
        self.run_with_rng_and_progress(&mut rng, Some(progress_callback))
    }

    /// Runs the loop with a caller-supplied random source.
    pub fn run_with_rng<R: Rng>(&self, rng: &mut R) -> Result<EvolutionResult> {
        self.run_with_rng_and_progress::<R, fn(EvolutionProgress)>(rng, None)
    }

    /// Runs the loop with a caller-supplied random source and an optional
    /// progress callback.
    pub fn run_with_rng_and_progress<R: Rng, F>(
        &self,
        rng: &mut R,
        progress_callback: Option<F>,
    ) -> Result<EvolutionResult>
    where
        F: Fn(EvolutionProgress),
    {
        let start = Instant::now();
        let n = self.oracle.size();
        let population_size = self.config.population_size;
        let generations_count = self.config.generations_count;
        let pool_size = self.config.pool_size();

        log::info!(
            "evolving {} tours over {} points for {} generations ({}, {} pool of {}, {} replacement)",
            population_size,
            n,
            generations_count,
            self.config.crossover,
            self.config.breeding_pool,
            pool_size,
            self.config.replacement
        );

        // Init
        let initial: Vec<Tour> = (0..population_size)
            .map(|_| Tour::random(n, rng))
            .collect();
        let mut population = self.evaluate(initial)?;
        rank(&mut population);

        let mut history = Vec::with_capacity(generations_count + 1);
        history.push(population[0].length);

        for generation in 1..=generations_count {
            let children = self.reproduce(&population[..pool_size], rng);
            let children = self.evaluate(children)?;

            population = self.replace(population, children);
            self.mutate(&mut population, rng);
            rank(&mut population);

            let best_length = population[0].length;
            history.push(best_length);
            log::debug!("generation {}: best length {:.3}", generation, best_length);

            if let Some(ref callback) = progress_callback {
                callback(EvolutionProgress {
                    generation,
                    generations_count,
                    best_length,
                    avg_length: average_length(&population),
                    elapsed: start.elapsed(),
                    running: true,
                });
            }
        }

        // Final progress callback indicating completion
        if let Some(ref callback) = progress_callback {
            callback(EvolutionProgress {
                generation: generations_count,
                generations_count,
                best_length: population[0].length,
                avg_length: average_length(&population),
                elapsed: start.elapsed(),
                running: false,
            });
        }

        let Scored {
            tour: best,
            length: best_length,
        } = population.swap_remove(0);

        log::info!(
            "finished {} generations in {:?}: best length {:.3} (initial {:.3})",
            generations_count,
            start.elapsed(),
            best_length,
            history[0]
        );

        Ok(EvolutionResult {
            best,
            best_length,
            history,
            generations: generations_count,
            crossover: self.config.crossover,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn seeded_rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Crosses every ordered pair of the breeding pool.
    fn reproduce<R: Rng>(&self, pool: &[Scored], rng: &mut R) -> Vec<Tour> {
        let mut children = Vec::with_capacity(2 * pool.len() * pool.len());
        for parent1 in pool {
            for parent2 in pool {
                let (child1, child2) = self.config.crossover.apply(&parent1.tour, &parent2.tour, rng);
                children.push(child1);
                children.push(child2);
            }
        }
        children
    }

    /// Scores tours, failing on the first one that is not a permutation.
    fn evaluate(&self, tours: Vec<Tour>) -> Result<Vec<Scored>> {
        let oracle = self.oracle;
        let score = |tour: Tour| -> Result<Scored> {
            let length = tour.try_length(oracle)?;
            Ok(Scored { tour, length })
        };

        if self.config.parallel_evaluation {
            tours.into_par_iter().map(score).collect()
        } else {
            tours.into_iter().map(score).collect()
        }
    }

    /// Builds the next population, ranked, of exactly `population_size`.
    fn replace(&self, mut population: Vec<Scored>, mut children: Vec<Scored>) -> Vec<Scored> {
        let population_size = self.config.population_size;
        match self.config.replacement {
            ReplacementPolicy::Elitist => {
                population.append(&mut children);
                rank(&mut population);
                population.truncate(population_size);
                population
            }
            ReplacementPolicy::Generational => {
                rank(&mut children);
                children.truncate(population_size);
                let missing = population_size - children.len();
                // `population` is still ranked from the previous generation.
                children.extend(population.into_iter().take(missing));
                rank(&mut children);
                children
            }
        }
    }

    /// Applies swap mutation to each member with probability `mutation_factor`.
    fn mutate<R: Rng>(&self, population: &mut [Scored], rng: &mut R) {
        let protected = match self.config.replacement {
            ReplacementPolicy::Elitist => 1,
            ReplacementPolicy::Generational => 0,
        };

        let mut mutated = vec![false; population.len()];
        for (i, member) in population.iter_mut().enumerate().skip(protected) {
            if rng.gen::<f64>() < self.config.mutation_factor {
                member.tour.mutate_swap(rng);
                mutated[i] = true;
            }
        }

        let oracle = self.oracle;
        if self.config.parallel_evaluation {
            population
                .par_iter_mut()
                .zip(mutated.par_iter())
                .filter(|(_, changed)| **changed)
                .for_each(|(member, _)| member.length = member.tour.length(oracle));
        } else {
            for (member, _) in population
                .iter_mut()
                .zip(&mutated)
                .filter(|(_, changed)| **changed)
            {
                member.length = member.tour.length(oracle);
            }
        }
    }
}

/// Sorts ascending by length; the best tour ends up first.
fn rank(population: &mut [Scored]) {
    population.sort_by(|a, b| a.length.total_cmp(&b.length));
}

fn average_length(population: &[Scored]) -> f64 {
    population.iter().map(|m| m.length).sum::<f64>() / population.len().max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BreedingPoolPolicy;
    use crate::crossover::Crossover;
    use crate::distance::DistanceMatrix;
    use std::cell::RefCell;

    /// Points on a circle: the optimal tour visits them in angular order.
    fn circle(n: usize) -> DistanceMatrix {
        let pts: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                (a.cos(), a.sin())
            })
            .collect();
        DistanceMatrix::from_fn(n, |i, j| {
            let (dx, dy) = (pts[i].0 - pts[j].0, pts[i].1 - pts[j].1);
            (dx * dx + dy * dy).sqrt()
        })
        .unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let m = circle(5);
        let config = EvolutionConfig::new().with_population_size(1);
        assert!(matches!(
            EvolutionRunner::new(config, &m),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_history_length() {
        let m = circle(8);
        let config = EvolutionConfig::new()
            .with_population_size(10)
            .with_generations_count(15)
            .with_seed(1);
        let result = EvolutionRunner::new(config, &m).unwrap().run().unwrap();
        assert_eq!(result.history.len(), 16);
        assert_eq!(result.generations, 15);
        assert_eq!(*result.history.last().unwrap(), result.best_length);
        assert!(result.best.is_valid(8));
    }

    #[test]
    fn test_zero_generations() {
        let m = circle(6);
        let config = EvolutionConfig::new()
            .with_population_size(5)
            .with_generations_count(0)
            .with_seed(3);
        let result = EvolutionRunner::new(config, &m).unwrap().run().unwrap();
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.history[0], result.best_length);
        assert!(result.best.is_valid(6));
    }

    #[test]
    fn test_elitist_history_is_monotonic() {
        let m = circle(12);
        for crossover in Crossover::ALL {
            let config = EvolutionConfig::new()
                .with_population_size(20)
                .with_generations_count(60)
                .with_mutation_factor(0.5)
                .with_crossover(crossover)
                .with_seed(11);
            let result = EvolutionRunner::new(config, &m).unwrap().run().unwrap();
            assert!(result.is_monotonic(), "{crossover}: {:?}", result.history);
        }
    }

    #[test]
    fn test_population_of_two() {
        let m = circle(5);
        for policy in [BreedingPoolPolicy::Log2, BreedingPoolPolicy::Sqrt] {
            let config = EvolutionConfig::new()
                .with_population_size(2)
                .with_generations_count(10)
                .with_breeding_pool(policy)
                .with_seed(5);
            let result = EvolutionRunner::new(config, &m).unwrap().run().unwrap();
            assert_eq!(result.history.len(), 11);
        }
    }

    #[test]
    fn test_generational_replacement_keeps_population_size() {
        // 1000 tours with a log2 pool of 11 breed only 242 children.
        let m = circle(6);
        let config = EvolutionConfig::new()
            .with_population_size(1000)
            .with_generations_count(2)
            .with_replacement(ReplacementPolicy::Generational)
            .with_seed(8);
        let runner = EvolutionRunner::new(config, &m).unwrap();
        let mut rng = StdRng::seed_from_u64(8);

        let initial: Vec<Tour> = (0..1000).map(|_| Tour::random(6, &mut rng)).collect();
        let mut population = runner.evaluate(initial).unwrap();
        rank(&mut population);
        let children = runner.reproduce(&population[..runner.config().pool_size()], &mut rng);
        assert_eq!(children.len(), 2 * 11 * 11);

        let children = runner.evaluate(children).unwrap();
        let next = runner.replace(population, children);
        assert_eq!(next.len(), 1000);
    }

    #[test]
    fn test_same_seed_same_result() {
        let m = circle(10);
        let config = EvolutionConfig::new()
            .with_population_size(16)
            .with_generations_count(30)
            .with_crossover(Crossover::Cx)
            .with_seed(99);
        let a = EvolutionRunner::new(config.clone(), &m).unwrap().run().unwrap();
        let b = EvolutionRunner::new(config, &m).unwrap().run().unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_parallel_evaluation_matches_serial() {
        let m = circle(10);
        let config = EvolutionConfig::new()
            .with_population_size(16)
            .with_generations_count(20)
            .with_seed(4);
        let serial = EvolutionRunner::new(config.clone(), &m).unwrap().run().unwrap();
        let parallel = EvolutionRunner::new(config.with_parallel_evaluation(true), &m)
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(serial.history, parallel.history);
        assert_eq!(serial.best, parallel.best);
    }

    #[test]
    fn test_progress_callback() {
        let m = circle(7);
        let config = EvolutionConfig::new()
            .with_population_size(8)
            .with_generations_count(5)
            .with_seed(2);
        let seen = RefCell::new(Vec::new());
        let result = EvolutionRunner::new(config, &m)
            .unwrap()
            .run_with_progress(|p| seen.borrow_mut().push((p.generation, p.running)))
            .unwrap();

        let seen = seen.into_inner();
        assert_eq!(seen.len(), 6);
        assert!(seen.iter().all(|&(generation, _)| generation >= 1));
        assert_eq!(seen[0], (1, true));
        assert_eq!(seen[5], (5, false));
        assert_eq!(result.generations, 5);
    }

    #[test]
    fn test_finds_optimum_on_small_circle() {
        let m = circle(6);
        let optimum = Tour::identity(6).length(&m);
        let config = EvolutionConfig::new()
            .with_population_size(30)
            .with_generations_count(200)
            .with_mutation_factor(0.3)
            .with_seed(21);
        let result = EvolutionRunner::new(config, &m).unwrap().run().unwrap();
        assert!(
            (result.best_length - optimum).abs() < 1e-9,
            "best {} vs optimum {}",
            result.best_length,
            optimum
        );
    }

    #[test]
    fn test_evaluate_rejects_invalid_child() {
        let m = circle(3);
        for parallel in [false, true] {
            let config = EvolutionConfig::new()
                .with_population_size(4)
                .with_parallel_evaluation(parallel);
            let runner = EvolutionRunner::new(config, &m).unwrap();

            let tours = vec![Tour::identity(3), Tour::new(vec![0, 0, 1])];
            assert!(matches!(
                runner.evaluate(tours),
                Err(Error::InvalidTour { .. })
            ));
            assert_eq!(runner.evaluate(vec![Tour::identity(3)]).unwrap().len(), 1);
        }
    }
}
