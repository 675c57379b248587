use crate::{KMeans, KMeansParams, KMeansParamsError, DEFAULT_SEED};
use ndarray_rand::rand::SeedableRng;
use rand_isaac::Isaac64Rng;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use stock_cluster::ParamGuard;
use thiserror::Error;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [partitioner](crate::Partition).
pub struct PartitionValidParams {
    n_clusters: usize,
    seed: u64,
    n_runs: usize,
    max_n_iterations: u64,
    tolerance: f64,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](PartitionValidParams)
/// for the [partitioner](crate::Partition) (using the builder pattern).
pub struct PartitionParams(PartitionValidParams);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PartitionParamsError {
    #[error("n_clusters cannot be 0")]
    NClusters,
    #[error(transparent)]
    KMeans(#[from] KMeansParamsError),
}

impl PartitionParams {
    /// Partition into `n_clusters` groups.
    ///
    /// Defaults:
    /// * `seed = 42`
    /// * `n_runs = 10`, `max_n_iterations = 300`, `tolerance = 1e-4`
    pub fn new(n_clusters: usize) -> Self {
        Self(PartitionValidParams {
            n_clusters,
            seed: DEFAULT_SEED,
            n_runs: 10,
            max_n_iterations: 300,
            tolerance: 1e-4,
        })
    }

    /// Seed of the random generator driving the K-Means initializations
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }

    pub fn n_runs(mut self, n_runs: usize) -> Self {
        self.0.n_runs = n_runs;
        self
    }

    pub fn max_n_iterations(mut self, max_n_iterations: u64) -> Self {
        self.0.max_n_iterations = max_n_iterations;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.0.tolerance = tolerance;
        self
    }
}

impl ParamGuard for PartitionParams {
    type Checked = PartitionValidParams;
    type Error = PartitionParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.n_clusters == 0 {
            return Err(PartitionParamsError::NClusters);
        }
        self.0.kmeans_params().check_ref()?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl PartitionValidParams {
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    pub fn max_n_iterations(&self) -> u64 {
        self.max_n_iterations
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub(crate) fn kmeans_params(&self) -> KMeansParams<f64, Isaac64Rng> {
        KMeans::params_with_rng(self.n_clusters, Isaac64Rng::seed_from_u64(self.seed))
            .n_runs(self.n_runs)
            .max_n_iterations(self.max_n_iterations)
            .tolerance(self.tolerance)
    }
}
