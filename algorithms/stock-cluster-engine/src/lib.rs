//! `stock-cluster-engine` partitions inventory records into behaviourally similar groups.
//!
//! ## The big picture
//!
//! `stock-cluster-engine` is the algorithmic part of the `stock-cluster` workspace. It takes
//! records with three numeric features (initial stock, final stock, units sold) and an
//! optional label, and answers two questions:
//!
//! * how many clusters does the data support? The [elbow selector](Elbow) runs
//!   [K-Means](KMeans) for every candidate count `1..=k_max`, builds the [`InertiaCurve`]
//!   and picks the count past which extra clusters stop paying off;
//! * which records belong together? The [partitioner](Partition) runs K-Means once with the
//!   chosen count and returns a [`ClusterReport`] grouping the original, labelled records.
//!
//! Both steps are one-shot, single-threaded computations over an in-memory dataset. Every
//! K-Means run is seeded, so both the inertia curve and the final partition are reproducible.
//!
//! ```
//! use stock_cluster::{FeatureRecord, LabeledRecord};
//! use stock_cluster_engine::{partition, select_cluster_count};
//!
//! let records = vec![
//!     LabeledRecord::new("shirt", FeatureRecord::new(10., 2., 8.)),
//!     LabeledRecord::new("blouse", FeatureRecord::new(12., 3., 9.)),
//!     LabeledRecord::new("scarf", FeatureRecord::new(1., 9., 1.)),
//!     LabeledRecord::new("gloves", FeatureRecord::new(2., 8., 0.)),
//!     LabeledRecord::new("coat", FeatureRecord::new(50., 50., 50.)),
//!     LabeledRecord::new("jacket", FeatureRecord::new(48., 49., 51.)),
//! ];
//! let features = records.iter().map(|r| r.features).collect::<Vec<_>>();
//!
//! let (k, curve) = select_cluster_count(&features, 10).unwrap();
//! assert!(curve.len() <= 10);
//!
//! let report = partition(&records, k, Some(42)).unwrap();
//! assert_eq!(report.assignment().len(), records.len());
//! ```

mod elbow;
mod error;
mod k_means;
mod partition;

pub use elbow::*;
pub use error::*;
pub use k_means::*;
pub use partition::*;

/// Seed used by every clustering run that is not given one explicitly
pub const DEFAULT_SEED: u64 = 42;
