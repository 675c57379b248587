mod algorithm;
mod hyperparams;
mod report;

pub use algorithm::*;
pub use hyperparams::*;
pub use report::*;
