use std::ops::RangeInclusive;

use crate::ClusteringError;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Total within-cluster squared distance for every achievable candidate cluster count.
///
/// A curve requested up to `k_max` only holds the counts the data can support: with `n`
/// distinct records the points stop at `k = min(k_max, n)`. Looking up a count past that
/// fails with [`ClusteringError::DataInsufficient`] instead of silently reporting nothing.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct InertiaCurve {
    points: Vec<(usize, f64)>,
    k_max: usize,
    n_distinct: usize,
}

impl InertiaCurve {
    /// `inertias[i]` is the inertia for `k = i + 1`
    pub(crate) fn new(inertias: Vec<f64>, k_max: usize, n_distinct: usize) -> Self {
        Self {
            points: inertias
                .into_iter()
                .enumerate()
                .map(|(i, inertia)| (i + 1, inertia))
                .collect(),
            k_max,
            n_distinct,
        }
    }

    /// `(k, inertia)` pairs, ordered by `k` starting at 1
    pub fn points(&self) -> &[(usize, f64)] {
        &self.points
    }

    pub fn inertias(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, inertia)| inertia).collect()
    }

    /// Number of points on the curve
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The largest candidate count that was requested
    pub fn k_max(&self) -> usize {
        self.k_max
    }

    /// Number of distinct records the curve was computed on
    pub fn n_distinct(&self) -> usize {
        self.n_distinct
    }

    /// Inertia for `k` clusters
    pub fn inertia(&self, k: usize) -> Result<f64, ClusteringError> {
        if k == 0 || k > self.k_max {
            return Err(ClusteringError::NotOnCurve {
                k,
                k_max: self.k_max,
            });
        }
        self.points
            .get(k - 1)
            .map(|&(_, inertia)| inertia)
            .ok_or(ClusteringError::DataInsufficient {
                requested: k,
                available: self.n_distinct,
            })
    }

    /// Requested counts that the data could not support
    pub fn shortfall(&self) -> Option<RangeInclusive<usize>> {
        if self.points.len() < self.k_max {
            Some(self.points.len() + 1..=self.k_max)
        } else {
            None
        }
    }

    /// Whether inertia never grows with `k` by more than `tolerance`.
    ///
    /// With perfect convergence more clusters can only lower the inertia; small violations
    /// come from local optima, large ones point to a bug.
    pub fn is_non_increasing(&self, tolerance: f64) -> bool {
        self.points
            .windows(2)
            .all(|pair| pair[1].1 <= pair[0].1 + tolerance)
    }
}
