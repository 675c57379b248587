//! `stock-cluster` groups inventory records (initial stock, final stock, units sold)
//! into behaviourally similar clusters.
//!
//! ## The big picture
//!
//! This crate is the root of a small workspace:
//!
//! * `stock-cluster` (this crate) holds the shared data model ([`FeatureRecord`],
//!   [`LabeledRecord`], [`Inventory`]), the [`Float`] bound, the error type and the
//!   traits every algorithm implements ([`Fit`](traits::Fit), [`Predict`](traits::Predict),
//!   [`ParamGuard`]).
//! * `stock-cluster-engine` implements K-Means, the elbow heuristic that picks the number
//!   of clusters from the inertia curve, and the partitioner that reports each cluster with
//!   the original record labels.
//! * `stock-cluster-datasets` loads and exports inventory records as CSV.
//!
//! Algorithms follow the same configuration flow: an unchecked `*Params` builder is
//! validated by [`ParamGuard::check`] into `*ValidParams`, which is then fitted on records.
//!
//! ```
//! use stock_cluster::{FeatureRecord, Inventory, LabeledRecord};
//!
//! let inventory = Inventory::new(vec![
//!     LabeledRecord::new("shirt", FeatureRecord::new(10., 2., 8.)),
//!     LabeledRecord::unlabeled(FeatureRecord::new(12., 3., 9.)),
//! ])
//! .unwrap();
//!
//! assert_eq!(inventory.len(), 2);
//! assert_eq!(inventory[1].display_label(1), "1");
//! ```

pub mod dataset;
pub mod error;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{
    count_distinct, records_to_array, AssignedRecord, FeatureRecord, Float, Inventory,
    LabeledRecord, Records,
};
pub use error::{Error, Result};
pub use param_guard::ParamGuard;
