use ndarray::{Array1, Array2, ArrayBase, Data, Ix1};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use stock_cluster::{AssignedRecord, LabeledRecord};

/// The records assigned to one cluster
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterGroup {
    id: usize,
    center: Array1<f64>,
    members: Vec<AssignedRecord>,
    inertia: f64,
}

impl ClusterGroup {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Centroid of the cluster, `(initial_stock, final_stock, units_sold)`
    pub fn center(&self) -> &Array1<f64> {
        &self.center
    }

    /// Members in their original input order
    pub fn members(&self) -> &[AssignedRecord] {
        &self.members
    }

    /// Sum of the squared distances of the members to the center
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// A group can be empty when the initialization produced a degenerate split
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// The outcome of one partitioning run.
///
/// Holds one [`ClusterGroup`] for every cluster id in `0..n_clusters`, including groups
/// without members, the per-record assignment and the cluster centers. The report is
/// returned by value: keeping it around for later export is up to the caller.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterReport {
    groups: Vec<ClusterGroup>,
    assignment: Array1<usize>,
    centers: Array2<f64>,
    converged: bool,
}

impl ClusterReport {
    /// Groups `records` by `assignment`. `distances[i]` is the squared distance of record `i`
    /// to the center it is assigned to.
    pub(crate) fn assemble(
        records: &[LabeledRecord],
        assignment: Array1<usize>,
        distances: &ArrayBase<impl Data<Elem = f64>, Ix1>,
        centers: Array2<f64>,
        converged: bool,
    ) -> Self {
        let mut groups = centers
            .rows()
            .into_iter()
            .enumerate()
            .map(|(id, center)| ClusterGroup {
                id,
                center: center.to_owned(),
                members: Vec::new(),
                inertia: 0.,
            })
            .collect::<Vec<_>>();

        for (index, ((record, &cluster), &distance)) in records
            .iter()
            .zip(assignment.iter())
            .zip(distances.iter())
            .enumerate()
        {
            let group = &mut groups[cluster];
            group.inertia += distance;
            group.members.push(AssignedRecord {
                index,
                label: record.display_label(index),
                features: record.features,
                cluster,
            });
        }

        Self {
            groups,
            assignment,
            centers,
            converged,
        }
    }

    pub fn n_clusters(&self) -> usize {
        self.groups.len()
    }

    pub fn groups(&self) -> &[ClusterGroup] {
        &self.groups
    }

    pub fn group(&self, id: usize) -> Option<&ClusterGroup> {
        self.groups.get(id)
    }

    /// Cluster id of every record, indexed like the input
    pub fn assignment(&self) -> &Array1<usize> {
        &self.assignment
    }

    /// Cluster centers with shape `(n_clusters, 3)`
    pub fn centers(&self) -> &Array2<f64> {
        &self.centers
    }

    /// Total within-cluster sum of squared distances
    pub fn inertia(&self) -> f64 {
        self.groups.iter().map(ClusterGroup::inertia).sum()
    }

    /// Number of members of every group
    pub fn sizes(&self) -> Vec<usize> {
        self.groups.iter().map(ClusterGroup::len).collect()
    }

    /// Whether K-Means met its tolerance before the iteration cap
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Every assigned record, in input order
    pub fn entries(&self) -> Vec<&AssignedRecord> {
        let mut entries = self
            .groups
            .iter()
            .flat_map(|group| group.members.iter())
            .collect::<Vec<_>>();
        entries.sort_by_key(|entry| entry.index);
        entries
    }
}
