use ndarray_stats::errors::MultiInputError;
use thiserror::Error;

use crate::{ElbowParamsError, KMeansParamsError, PartitionParamsError};

/// An error when running the clustering engine
#[derive(Error, Debug)]
pub enum ClusteringError {
    #[error("Invalid hyperparameter: {0}")]
    KMeansParams(#[from] KMeansParamsError),
    #[error("Invalid hyperparameter: {0}")]
    ElbowParams(#[from] ElbowParamsError),
    #[error("Invalid hyperparameter: {0}")]
    PartitionParams(#[from] PartitionParamsError),
    /// Fewer distinct records than requested clusters, or no records at all
    #[error("cannot form {requested} clusters from {available} distinct records")]
    DataInsufficient { requested: usize, available: usize },
    /// A cluster count outside of `1..=k_max` was looked up on an inertia curve
    #[error("cluster count {k} is outside of the inertia curve range 1..={k_max}")]
    NotOnCurve { k: usize, k_max: usize },
    #[error(transparent)]
    Deviation(#[from] MultiInputError),
    #[error(transparent)]
    Records(#[from] stock_cluster::Error),
}
