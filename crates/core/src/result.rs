//! Evolution results and progress reports.

use std::time::Duration;

use crate::crossover::Crossover;
use crate::tour::Tour;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of an evolution run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EvolutionResult {
    /// Best tour of the final population.
    pub best: Tour,

    /// Length of [`EvolutionResult::best`].
    pub best_length: f64,

    /// Best length per generation, starting with generation 0.
    /// Always holds `generations + 1` entries.
    pub history: Vec<f64>,

    /// Number of generations run.
    pub generations: usize,

    /// Crossover operator used.
    pub crossover: Crossover,

    /// Computation time in milliseconds.
    pub elapsed_ms: u64,
}

impl EvolutionResult {
    /// Best length of the initial random population.
    pub fn initial_length(&self) -> f64 {
        self.history.first().copied().unwrap_or(self.best_length)
    }

    /// Absolute length saved relative to generation 0.
    pub fn improvement(&self) -> f64 {
        self.initial_length() - self.best_length
    }

    /// Relative improvement over generation 0 (0.0 - 1.0).
    pub fn improvement_ratio(&self) -> f64 {
        let initial = self.initial_length();
        if initial > 0.0 {
            self.improvement() / initial
        } else {
            0.0
        }
    }

    /// Returns true if the history never gets worse from one generation to
    /// the next.
    pub fn is_monotonic(&self) -> bool {
        self.history.windows(2).all(|w| w[1] <= w[0])
    }
}

/// Progress information reported after each generation.
#[derive(Debug, Clone)]
pub struct EvolutionProgress {
    /// Generation just completed, starting at 1. The initial population is
    /// not reported.
    pub generation: usize,
    /// Total generations configured.
    pub generations_count: usize,
    /// Best length in the current population.
    pub best_length: f64,
    /// Mean length of the current population.
    pub avg_length: f64,
    /// Elapsed time since start.
    pub elapsed: Duration,
    /// Whether the loop is still running.
    pub running: bool,
}

impl EvolutionProgress {
    /// Fraction of generations completed (0.0 - 1.0).
    pub fn progress_percent(&self) -> f64 {
        if self.generations_count > 0 {
            self.generation as f64 / self.generations_count as f64
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(history: Vec<f64>) -> EvolutionResult {
        EvolutionResult {
            best: Tour::identity(3),
            best_length: *history.last().unwrap(),
            generations: history.len() - 1,
            history,
            crossover: Crossover::Pmx,
            elapsed_ms: 0,
        }
    }

    #[test]
    fn test_improvement() {
        let r = result(vec![100.0, 90.0, 80.0]);
        assert_eq!(r.initial_length(), 100.0);
        assert_eq!(r.improvement(), 20.0);
        assert!((r.improvement_ratio() - 0.2).abs() < 1e-12);
        assert!(r.is_monotonic());
    }

    #[test]
    fn test_non_monotonic_history() {
        let r = result(vec![100.0, 90.0, 95.0]);
        assert!(!r.is_monotonic());
    }

    #[test]
    fn test_progress_percent() {
        let p = EvolutionProgress {
            generation: 5,
            generations_count: 20,
            best_length: 1.0,
            avg_length: 2.0,
            elapsed: Duration::ZERO,
            running: true,
        };
        assert_eq!(p.progress_percent(), 0.25);
    }
}
