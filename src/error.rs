//! Error types in stock-cluster
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A feature value is NaN or infinite
    #[error("record {index} has a non-finite value for `{feature}`")]
    NonFinite { index: usize, feature: &'static str },
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}
