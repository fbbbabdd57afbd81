//! Permutation-preserving crossover operators.
//!
//! Every operator takes two parent tours of equal length and returns two
//! children. Child 1 inherits mostly from parent 1 and child 2 from parent 2;
//! both are permutations whenever the parents are.
//!
//! | Operator | Preserves | Slice |
//! |----------|-----------|-------|
//! | [`Crossover::Pmx`] | absolute positions | random `[pos1, pos2]` |
//! | [`Crossover::Ox`] | relative order | random `[pos1, pos2]` |
//! | [`Crossover::Cx`] | absolute positions (cycles) | none |
//!
//! PMX and OX copy the slice from the *opposite* parent into each child and
//! fill the rest from the child's own parent.
//!
//! # References
//!
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Oliver, Smith & Holland (1987), "A study of permutation crossover operators"

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::Error;
use crate::tour::Tour;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The crossover operator used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Crossover {
    /// Partially Mapped Crossover.
    #[default]
    Pmx,
    /// Order Crossover.
    Ox,
    /// Cycle Crossover.
    Cx,
}

impl Crossover {
    /// All operators, in a stable order.
    pub const ALL: [Crossover; 3] = [Crossover::Pmx, Crossover::Ox, Crossover::Cx];

    /// Short lowercase selector (`"pmx"`, `"ox"`, `"cx"`).
    pub fn name(&self) -> &'static str {
        match self {
            Crossover::Pmx => "pmx",
            Crossover::Ox => "ox",
            Crossover::Cx => "cx",
        }
    }

    /// Combines two parents into two children.
    ///
    /// Parents must be permutations of the same length; this is not checked.
    pub fn apply<R: Rng>(&self, parent1: &Tour, parent2: &Tour, rng: &mut R) -> (Tour, Tour) {
        match self {
            Crossover::Pmx => pmx(parent1, parent2, rng),
            Crossover::Ox => order_crossover(parent1, parent2, rng),
            Crossover::Cx => cycle_crossover(parent1, parent2),
        }
    }
}

impl fmt::Display for Crossover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Crossover::Pmx => "PMX",
            Crossover::Ox => "OX",
            Crossover::Cx => "CX",
        })
    }
}

impl FromStr for Crossover {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pmx" => Ok(Crossover::Pmx),
            "ox" => Ok(Crossover::Ox),
            "cx" => Ok(Crossover::Cx),
            other => Err(Error::invalid_config(format!(
                "unknown crossover algorithm '{}' (expected pmx, ox or cx)",
                other
            ))),
        }
    }
}

/// Picks a slice `[pos1, pos2]` with `pos1 <= pos2`, both in `0..n-1`.
///
/// Requires `n >= 2`.
pub fn random_slice<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let a = rng.gen_range(0..n - 1);
    let b = rng.gen_range(0..n - 1);
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Partially Mapped Crossover with a random slice.
pub fn pmx<R: Rng>(parent1: &Tour, parent2: &Tour, rng: &mut R) -> (Tour, Tour) {
    let n = parent1.len();
    if n < 2 {
        return (parent1.clone(), parent2.clone());
    }
    let (start, end) = random_slice(n, rng);
    pmx_with_slice(parent1, parent2, start, end)
}

/// Partially Mapped Crossover over the inclusive slice `[start, end]`.
///
/// Requires `start <= end < parent1.len()`.
pub fn pmx_with_slice(parent1: &Tour, parent2: &Tour, start: usize, end: usize) -> (Tour, Tour) {
    debug_assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    debug_assert!(start <= end && end < parent1.len(), "slice [{start}, {end}] out of bounds");
    let child1 = pmx_build_child(parent1.cities(), parent2.cities(), start, end);
    let child2 = pmx_build_child(parent2.cities(), parent1.cities(), start, end);
    (Tour::new(child1), Tour::new(child2))
}

/// Builds one PMX child: slice from `donor`, everything else from `own`.
fn pmx_build_child(own: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = own.len();
    let mut child = own.to_vec();
    // mapping[v] = w: slice value v displaced w from the same position.
    let mut mapping: Vec<Option<usize>> = vec![None; n];

    for i in start..=end {
        child[i] = donor[i];
        if donor[i] != own[i] {
            mapping[donor[i]] = Some(own[i]);
        }
    }

    // The chain starts outside the image of `mapping`, so it cannot cycle.
    for i in (0..start).chain(end + 1..n) {
        let mut value = own[i];
        while let Some(next) = mapping[value] {
            value = next;
        }
        child[i] = value;
    }

    child
}

/// Order Crossover with a random slice.
pub fn order_crossover<R: Rng>(parent1: &Tour, parent2: &Tour, rng: &mut R) -> (Tour, Tour) {
    let n = parent1.len();
    if n < 2 {
        return (parent1.clone(), parent2.clone());
    }
    let (start, end) = random_slice(n, rng);
    ox_with_slice(parent1, parent2, start, end)
}

/// Order Crossover over the inclusive slice `[start, end]`.
///
/// Requires `start <= end < parent1.len()`.
pub fn ox_with_slice(parent1: &Tour, parent2: &Tour, start: usize, end: usize) -> (Tour, Tour) {
    debug_assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    debug_assert!(start <= end && end < parent1.len(), "slice [{start}, {end}] out of bounds");
    let child1 = ox_build_child(parent1.cities(), parent2.cities(), start, end);
    let child2 = ox_build_child(parent2.cities(), parent1.cities(), start, end);
    (Tour::new(child1), Tour::new(child2))
}

/// Builds one OX child: slice from `donor`, the rest in `own`'s cyclic order
/// starting right after the slice.
fn ox_build_child(own: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = own.len();
    let mut child = vec![usize::MAX; n];
    let mut in_slice = vec![false; n];

    for i in start..=end {
        child[i] = donor[i];
        in_slice[donor[i]] = true;
    }

    let mut pos = (end + 1) % n;
    for offset in 0..n {
        let value = own[(end + 1 + offset) % n];
        if !in_slice[value] {
            child[pos] = value;
            pos = (pos + 1) % n;
        }
    }

    child
}

/// Cycle Crossover.
///
/// Deterministic: the cycle through position 0 keeps each parent's own values,
/// every other position comes from the opposite parent.
pub fn cycle_crossover(parent1: &Tour, parent2: &Tour) -> (Tour, Tour) {
    debug_assert_eq!(parent1.len(), parent2.len(), "parents must have equal length");
    if parent1.len() < 2 {
        return (parent1.clone(), parent2.clone());
    }
    let child1 = cx_build_child(parent1.cities(), parent2.cities());
    let child2 = cx_build_child(parent2.cities(), parent1.cities());
    (Tour::new(child1), Tour::new(child2))
}

fn cx_build_child(own: &[usize], other: &[usize]) -> Vec<usize> {
    let mut position = vec![0; own.len()];
    for (i, &value) in own.iter().enumerate() {
        position[value] = i;
    }

    let mut child = other.to_vec();
    let mut i = 0;
    loop {
        child[i] = own[i];
        i = position[other[i]];
        if i == 0 {
            break;
        }
    }

    child
}
