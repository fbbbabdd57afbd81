//! Distance oracle and the dense distance matrix.
//!
//! Every tour evaluation goes through a [`DistanceOracle`]. The engine never
//! reaches for global state: the oracle is passed by shared reference into
//! each call, and implementations must be immutable after construction.

use crate::error::{Error, Result};
use crate::geo::GeoPoint;

/// Source of pairwise travel costs between point indices.
///
/// Implementations must be symmetric (`distance(i, j) == distance(j, i)`),
/// return `0.0` on the diagonal and never return a negative value. The
/// triangle inequality is not required.
pub trait DistanceOracle: Sync {
    /// Number of points, i.e. indices are `0..size()`.
    fn size(&self) -> usize;

    /// Cost of travelling between `from` and `to`.
    fn distance(&self, from: usize, to: usize) -> f64;
}

/// Dense symmetric N×N matrix with O(1) lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    /// Row-major storage, `n * n` entries.
    values: Vec<f64>,
}

impl DistanceMatrix {
    /// Builds the matrix of great-circle distances (km) between `points`.
    pub fn from_points(points: &[GeoPoint]) -> Result<Self> {
        Self::from_fn(points.len(), |i, j| points[i].haversine_km(&points[j]))
    }

    /// Builds the matrix by evaluating `f` once per unordered pair.
    ///
    /// Only the upper triangle is evaluated; the lower triangle is mirrored so
    /// the result is symmetric by construction.
    pub fn from_fn<F>(n: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f64,
    {
        if n < 2 {
            return Err(Error::TooFewPoints { found: n });
        }

        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = f(i, j);
                check_entry(i, j, d)?;
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }

        Ok(Self { n, values })
    }

    /// Builds the matrix from explicit rows, validating the contract.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n = rows.len();
        if n < 2 {
            return Err(Error::TooFewPoints { found: n });
        }

        let mut values = Vec::with_capacity(n * n);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(Error::InvalidDistanceMatrix {
                    reason: format!("row {} has {} entries, expected {}", i, row.len(), n),
                });
            }
            for (j, &d) in row.iter().enumerate() {
                check_entry(i, j, d)?;
                if i == j && d != 0.0 {
                    return Err(Error::InvalidDistanceMatrix {
                        reason: format!("diagonal entry ({i}, {i}) is {d}, expected 0"),
                    });
                }
                if j < i && rows[j][i] != d {
                    return Err(Error::InvalidDistanceMatrix {
                        reason: format!("entries ({i}, {j}) and ({j}, {i}) differ"),
                    });
                }
            }
            values.extend_from_slice(row);
        }

        Ok(Self { n, values })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Always false: a matrix holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Largest entry in the matrix.
    pub fn max_distance(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

impl DistanceOracle for DistanceMatrix {
    fn size(&self) -> usize {
        self.n
    }

    #[inline]
    fn distance(&self, from: usize, to: usize) -> f64 {
        self.values[from * self.n + to]
    }
}

fn check_entry(i: usize, j: usize, d: f64) -> Result<()> {
    if !d.is_finite() || d < 0.0 {
        return Err(Error::InvalidDistanceMatrix {
            reason: format!("entry ({i}, {j}) is {d}, expected a finite non-negative value"),
        });
    }
    Ok(())
}
