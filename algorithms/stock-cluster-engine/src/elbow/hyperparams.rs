use crate::{KMeans, KMeansParamsError, DEFAULT_SEED};
use ndarray_rand::rand::SeedableRng;
use rand_isaac::Isaac64Rng;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use stock_cluster::ParamGuard;
use thiserror::Error;

/// What the elbow selector answers when no candidate passes the threshold
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElbowFallback {
    /// Treat the data as a single group
    SingleCluster,
    /// Use the largest cluster count present on the curve
    LargestCandidate,
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [elbow selector](crate::Elbow).
pub struct ElbowValidParams {
    /// Largest candidate cluster count
    k_max: usize,
    /// A candidate `k` is the elbow when the inertia drop before it, divided by the drop after
    /// it, exceeds `threshold`
    threshold: f64,
    fallback: ElbowFallback,
    /// K-Means restarts per candidate count
    n_runs: usize,
    max_n_iterations: u64,
    tolerance: f64,
    /// Every candidate count is clustered with a generator seeded with this value
    seed: u64,
}

#[derive(Clone, Debug, PartialEq)]
/// An helper struct used to construct a set of [valid hyperparameters](ElbowValidParams) for
/// the [elbow selector](crate::Elbow) (using the builder pattern).
pub struct ElbowParams(ElbowValidParams);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElbowParamsError {
    #[error("k_max cannot be 0")]
    KMax,
    #[error("threshold must be finite and not negative")]
    Threshold,
    #[error(transparent)]
    KMeans(#[from] KMeansParamsError),
}

impl Default for ElbowParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ElbowParams {
    /// Defaults:
    /// * `k_max = 10`
    /// * `threshold = 0.1`
    /// * `fallback = SingleCluster`
    /// * `n_runs = 10`, `max_n_iterations = 300`, `tolerance = 1e-4`
    /// * `seed = 42`
    pub fn new() -> Self {
        Self(ElbowValidParams {
            k_max: 10,
            threshold: 0.1,
            fallback: ElbowFallback::SingleCluster,
            n_runs: 10,
            max_n_iterations: 300,
            tolerance: 1e-4,
            seed: DEFAULT_SEED,
        })
    }

    pub fn k_max(mut self, k_max: usize) -> Self {
        self.0.k_max = k_max;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.0.threshold = threshold;
        self
    }

    pub fn fallback(mut self, fallback: ElbowFallback) -> Self {
        self.0.fallback = fallback;
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

    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl ParamGuard for ElbowParams {
    type Checked = ElbowValidParams;
    type Error = ElbowParamsError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.k_max == 0 {
            return Err(ElbowParamsError::KMax);
        }
        if !self.0.threshold.is_finite() || self.0.threshold < 0. {
            return Err(ElbowParamsError::Threshold);
        }
        self.0.kmeans_params(1).check_ref()?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl ElbowValidParams {
    pub fn k_max(&self) -> usize {
        self.k_max
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn fallback(&self) -> ElbowFallback {
        self.fallback
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

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// K-Means hyperparameters for one candidate count
    pub(crate) fn kmeans_params(&self, n_clusters: usize) -> crate::KMeansParams<f64, Isaac64Rng> {
        KMeans::params_with_rng(n_clusters, Isaac64Rng::seed_from_u64(self.seed))
            .n_runs(self.n_runs)
            .max_n_iterations(self.max_n_iterations)
            .tolerance(self.tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<ElbowParams>();
        has_autotraits::<ElbowValidParams>();
    }

    #[test]
    fn defaults() {
        let params = ElbowParams::new().check().unwrap();
        assert_eq!(params.k_max(), 10);
        assert_eq!(params.threshold(), 0.1);
        assert_eq!(params.fallback(), ElbowFallback::SingleCluster);
        assert_eq!(params.seed(), DEFAULT_SEED);
    }

    #[test]
    fn k_max_cannot_be_zero() {
        let res = ElbowParams::new().k_max(0).check();
        assert!(matches!(res, Err(ElbowParamsError::KMax)));
    }

    #[test]
    fn threshold_must_be_finite_and_positive() {
        let res = ElbowParams::new().threshold(-0.5).check();
        assert!(matches!(res, Err(ElbowParamsError::Threshold)));
        let res = ElbowParams::new().threshold(f64::NAN).check();
        assert!(matches!(res, Err(ElbowParamsError::Threshold)));
        assert!(ElbowParams::new().threshold(0.).check().is_ok());
    }

    #[test]
    fn kmeans_options_are_validated() {
        let res = ElbowParams::new().n_runs(0).check();
        assert!(matches!(
            res,
            Err(ElbowParamsError::KMeans(KMeansParamsError::NRuns))
        ));
        let res = ElbowParams::new().tolerance(0.).check();
        assert!(matches!(
            res,
            Err(ElbowParamsError::KMeans(KMeansParamsError::Tolerance))
        ));
    }
}
