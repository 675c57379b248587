mod algorithm;
mod curve;
mod hyperparams;

pub use algorithm::*;
pub use curve::*;
pub use hyperparams::*;
