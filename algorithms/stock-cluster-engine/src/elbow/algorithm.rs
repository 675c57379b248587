use crate::elbow::{ElbowFallback, ElbowParams, ElbowValidParams, InertiaCurve};
use crate::ClusteringError;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use stock_cluster::traits::Fit;
use stock_cluster::{count_distinct, records_to_array, FeatureRecord, ParamGuard};
use tracing::{debug, info};

/// Elbow method for choosing the number of clusters.
///
/// K-Means is run for every candidate count `k = 1..=k_max` and the resulting total
/// inertia (within-cluster sum of squared distances) forms the [`InertiaCurve`]. Inertia
/// always shrinks as clusters are added; the elbow is the count after which it stops
/// shrinking much.
///
/// The scan visits every interior point `i` of the curve and compares the drop leading
/// into it with the drop leading out of it:
///
/// ```text
/// ratio(i) = (inertia[i - 1] - inertia[i]) / (inertia[i] - inertia[i + 1])
/// ```
///
/// The first point whose ratio exceeds `threshold` is the elbow. An outgoing drop of zero
/// counts as an infinite ratio: nothing is gained past that point. When no point qualifies
/// (or the curve has fewer than three points) the configured [`ElbowFallback`] decides.
///
/// Counts larger than the number of distinct records cannot be fitted and are left off the
/// curve, see [`InertiaCurve::shortfall`].
///
/// ```
/// use stock_cluster::prelude::*;
/// use stock_cluster_engine::Elbow;
///
/// let features = vec![
///     FeatureRecord::new(10., 2., 8.),
///     FeatureRecord::new(12., 3., 9.),
///     FeatureRecord::new(50., 50., 50.),
///     FeatureRecord::new(48., 49., 51.),
/// ];
/// let selection = Elbow::params()
///     .k_max(4)
///     .check()
///     .unwrap()
///     .fit(&features[..])
///     .unwrap();
///
/// assert!((1..=4).contains(&selection.optimal_k()));
/// assert_eq!(selection.curve().len(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct Elbow;

impl Elbow {
    pub fn params() -> ElbowParams {
        ElbowParams::new()
    }
}

/// The outcome of the elbow selector: the chosen count and the curve it was read from
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ElbowSelection {
    optimal_k: usize,
    elbow: Option<usize>,
    curve: InertiaCurve,
}

impl ElbowSelection {
    pub fn optimal_k(&self) -> usize {
        self.optimal_k
    }

    /// The elbow found on the curve, `None` when the fallback was used
    pub fn elbow(&self) -> Option<usize> {
        self.elbow
    }

    pub fn curve(&self) -> &InertiaCurve {
        &self.curve
    }

    pub fn into_curve(self) -> InertiaCurve {
        self.curve
    }
}

impl Fit<[FeatureRecord], ClusteringError> for ElbowValidParams {
    type Object = ElbowSelection;

    fn fit(&self, features: &[FeatureRecord]) -> Result<Self::Object, ClusteringError> {
        let n_distinct = count_distinct(features);
        if n_distinct == 0 {
            return Err(ClusteringError::DataInsufficient {
                requested: self.k_max(),
                available: 0,
            });
        }

        let observations = records_to_array(features)?;
        let achievable = self.k_max().min(n_distinct);
        if achievable < self.k_max() {
            debug!(
                k_max = self.k_max(),
                n_distinct, "not enough distinct records for every candidate count"
            );
        }

        let inertias = (1..=achievable)
            .map(|k| -> Result<f64, ClusteringError> {
                let model = self.kmeans_params(k).check()?.fit(&observations)?;
                debug!(k, inertia = model.inertia(), "candidate cluster count");
                Ok(model.inertia())
            })
            .collect::<Result<Vec<_>, ClusteringError>>()?;

        let elbow = find_elbow(&inertias, self.threshold()).map(|i| i + 1);
        let optimal_k = match (elbow, self.fallback()) {
            (Some(k), _) => k,
            (None, ElbowFallback::SingleCluster) => 1,
            (None, ElbowFallback::LargestCandidate) => inertias.len(),
        };
        info!(optimal_k, elbow_found = elbow.is_some(), "selected cluster count");

        Ok(ElbowSelection {
            optimal_k,
            elbow,
            curve: InertiaCurve::new(inertias, self.k_max(), n_distinct),
        })
    }
}

/// Zero-based index of the first interior point of `inertias` whose incoming drop, divided
/// by its outgoing drop, exceeds `threshold`. The matching cluster count is the index plus one.
///
/// ```
/// use stock_cluster_engine::find_elbow;
///
/// // the flat segment after k = 2 makes the second ratio infinite
/// assert_eq!(find_elbow(&[100., 50., 50., 49., 48.], 0.1), Some(1));
/// assert_eq!(find_elbow(&[100., 50.], 0.1), None);
/// ```
pub fn find_elbow(inertias: &[f64], threshold: f64) -> Option<usize> {
    (1..inertias.len().saturating_sub(1)).find(|&i| {
        let before = inertias[i - 1] - inertias[i];
        let after = inertias[i] - inertias[i + 1];
        let ratio = if after == 0. {
            f64::INFINITY
        } else {
            before / after
        };
        ratio > threshold
    })
}

/// Picks a cluster count for `features` with the default [elbow parameters](ElbowParams)
/// and candidates `1..=k_max`.
pub fn select_cluster_count(
    features: &[FeatureRecord],
    k_max: usize,
) -> Result<(usize, InertiaCurve), ClusteringError> {
    let selection = Elbow::params().k_max(k_max).check()?.fit(features)?;
    Ok((selection.optimal_k(), selection.into_curve()))
}
