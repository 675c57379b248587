use crate::partition::{ClusterReport, PartitionParams, PartitionValidParams};
use crate::ClusteringError;
use ndarray::Array1;
use stock_cluster::traits::{Fit, Predict, Transformer};
use stock_cluster::{count_distinct, records_to_array, LabeledRecord, ParamGuard};
use tracing::info;

/// Labelled partitioning of inventory records.
///
/// K-Means is run once with the requested number of clusters (keeping the best of
/// `n_runs` initializations), every record is assigned to its nearest center and the
/// records are grouped by cluster into a [`ClusterReport`], each keeping its label. A
/// record without a label is reported under its input index.
///
/// The run is seeded, so the same records, cluster count and seed always give the same
/// assignment and centers.
///
/// ```
/// use stock_cluster::prelude::*;
/// use stock_cluster_engine::Partition;
///
/// let records = vec![
///     LabeledRecord::new("shirt", FeatureRecord::new(10., 2., 8.)),
///     LabeledRecord::unlabeled(FeatureRecord::new(12., 3., 9.)),
///     LabeledRecord::new("coat", FeatureRecord::new(50., 50., 50.)),
/// ];
/// let report = Partition::params(2)
///     .seed(42)
///     .check()
///     .unwrap()
///     .fit(&records[..])
///     .unwrap();
///
/// let group = report.group(report.assignment()[1]).unwrap();
/// assert!(group.members().iter().any(|m| m.label == "1"));
/// ```
#[derive(Clone, Debug)]
pub struct Partition;

impl Partition {
    pub fn params(n_clusters: usize) -> PartitionParams {
        PartitionParams::new(n_clusters)
    }
}

impl Fit<[LabeledRecord], ClusteringError> for PartitionValidParams {
    type Object = ClusterReport;

    fn fit(&self, records: &[LabeledRecord]) -> Result<Self::Object, ClusteringError> {
        let features = records.iter().map(|r| r.features).collect::<Vec<_>>();
        let available = count_distinct(&features);
        if available < self.n_clusters() {
            return Err(ClusteringError::DataInsufficient {
                requested: self.n_clusters(),
                available,
            });
        }

        let observations = records_to_array(&features)?;
        let model = self.kmeans_params().check()?.fit(&observations)?;
        let assignment: Array1<usize> = model.predict(&observations);
        let distances = model.transform(&observations);

        let report = ClusterReport::assemble(
            records,
            assignment,
            &distances,
            model.centroids().clone(),
            model.converged(),
        );
        info!(
            n_clusters = self.n_clusters(),
            n_records = records.len(),
            inertia = report.inertia(),
            "partitioned records"
        );
        Ok(report)
    }
}

/// Partitions `records` into `k` clusters. Without a `seed` the
/// [`DEFAULT_SEED`](crate::DEFAULT_SEED) is used.
pub fn partition(
    records: &[LabeledRecord],
    k: usize,
    seed: Option<u64>,
) -> Result<ClusterReport, ClusteringError> {
    let mut params = Partition::params(k);
    if let Some(seed) = seed {
        params = params.seed(seed);
    }
    params.check()?.fit(records)
}
