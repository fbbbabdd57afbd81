//! Candidate tours.
//!
//! A [`Tour`] is a cyclic permutation of point indices. Its fitness is the
//! total length of the closed loop, including the edge from the last city back
//! to the first. Lower is better.

use std::fmt;

use rand::prelude::*;

use crate::distance::DistanceOracle;
use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One candidate solution: the order in which the points are visited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tour {
    cities: Vec<usize>,
}

impl Tour {
    /// Wraps an explicit visiting order. No validation is performed.
    pub fn new(cities: Vec<usize>) -> Self {
        Self { cities }
    }

    /// The identity tour `0, 1, ..., n-1`.
    pub fn identity(n: usize) -> Self {
        Self::new((0..n).collect())
    }

    /// A uniformly shuffled permutation of `0..n`.
    pub fn random<R: Rng>(n: usize, rng: &mut R) -> Self {
        let mut cities: Vec<usize> = (0..n).collect();
        cities.shuffle(rng);
        Self::new(cities)
    }

    /// The visiting order.
    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    /// Consumes the tour, returning the visiting order.
    pub fn into_inner(self) -> Vec<usize> {
        self.cities
    }

    /// Number of stops.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Returns true if the tour visits nothing.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Returns true iff the tour is a permutation of `0..n`.
    ///
    /// Logs a warning describing the first defect found; never panics.
    pub fn is_valid(&self, n: usize) -> bool {
        if self.cities.len() != n {
            log::warn!(
                "invalid tour: {} stops, expected {}",
                self.cities.len(),
                n
            );
            return false;
        }

        let mut seen = vec![false; n];
        for (pos, &city) in self.cities.iter().enumerate() {
            if city >= n {
                log::warn!("invalid tour: city {} at position {} is out of range", city, pos);
                return false;
            }
            if seen[city] {
                log::warn!("invalid tour: city {} repeated at position {}", city, pos);
                return false;
            }
            seen[city] = true;
        }
        true
    }

    /// Total cyclic length of the tour.
    ///
    /// An invalid tour scores `f64::INFINITY` so ascending ranking always puts
    /// it last.
    pub fn length<D: DistanceOracle + ?Sized>(&self, oracle: &D) -> f64 {
        if !self.is_valid(oracle.size()) {
            return f64::INFINITY;
        }
        self.cycle_length(oracle)
    }

    /// Like [`Tour::length`] but reports an invalid tour as an error.
    pub fn try_length<D: DistanceOracle + ?Sized>(&self, oracle: &D) -> Result<f64> {
        if !self.is_valid(oracle.size()) {
            return Err(Error::InvalidTour {
                len: self.cities.len(),
                expected_len: oracle.size(),
            });
        }
        Ok(self.cycle_length(oracle))
    }

    fn cycle_length<D: DistanceOracle + ?Sized>(&self, oracle: &D) -> f64 {
        let (Some(&first), Some(&last)) = (self.cities.first(), self.cities.last()) else {
            return 0.0;
        };

        let open: f64 = self
            .cities
            .windows(2)
            .map(|w| oracle.distance(w[0], w[1]))
            .sum();
        open + oracle.distance(last, first)
    }

    /// Swap mutation: exchanges two positions drawn independently.
    ///
    /// Both positions may coincide, in which case the tour is unchanged.
    pub fn mutate_swap<R: Rng>(&mut self, rng: &mut R) {
        if self.cities.len() < 2 {
            return;
        }

        let i = rng.gen_range(0..self.cities.len());
        let j = rng.gen_range(0..self.cities.len());
        self.cities.swap(i, j);
    }
}

impl From<Vec<usize>> for Tour {
    fn from(cities: Vec<usize>) -> Self {
        Self::new(cities)
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.cities
    }
}

impl fmt::Display for Tour {
    /// Renders the closed loop, e.g. `0 -> 2 -> 1 -> 0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, city) in self.cities.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", city)?;
        }
        if let Some(first) = self.cities.first() {
            write!(f, " -> {}", first)?;
        }
        Ok(())
    }
}
