use crate::k_means::{KMeansInit, KMeansParams, KMeansParamsError, KMeansValidParams};
use crate::{ClusteringError, DEFAULT_SEED};
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, DataMut, Ix1, Ix2, Zip};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand::SeedableRng;
use ndarray_stats::DeviationExt;
use rand_isaac::Isaac64Rng;
use stock_cluster::traits::{Fit, PredictInplace, Transformer};
use stock_cluster::{Float, Records};
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
/// K-means clustering aims to partition a set of unlabeled observations into clusters,
/// where each observation belongs to the cluster with the nearest mean.
///
/// The mean of the points within a cluster is called *centroid*.
///
/// Given the set of centroids, you can assign an observation to a cluster
/// choosing the nearest centroid.
///
/// We provide an implementation of the _standard algorithm_, also known as
/// Lloyd's algorithm, under the squared euclidean distance.
///
/// ## The algorithm
///
/// K-means is an iterative algorithm: it progressively refines the choice of centroids.
///
/// It's guaranteed to converge, even though it might not find the optimal set of centroids
/// (unfortunately it can get stuck in a local minimum, finding the optimal minimum if NP-hard!).
///
/// There are three steps in the standard algorithm:
/// - initialisation step: select initial centroids using one of our provided algorithms.
/// - assignment step: assign each observation to the nearest cluster
///                    (minimum distance between the observation and the cluster's centroid);
/// - update step: recompute the centroid of each cluster.
///
/// The initialisation step is a one-off, done at the very beginning.
/// Assignment and update are repeated in a loop until convergence is reached (either the
/// squared euclidean distance between the old and the new clusters is below `tolerance` or
/// we exceed the `max_n_iterations`).
///
/// Reaching `max_n_iterations` is not an error: the best centroids found so far are kept and
/// [`converged`](KMeans::converged) reports `false`.
///
/// A cluster that loses all of its observations during the update step keeps its previous
/// centroid, so a fitted model may contain clusters without members.
///
/// ## Tutorial
///
/// ```
/// use stock_cluster::traits::{Fit, Predict};
/// use stock_cluster_engine::KMeans;
/// use ndarray::{array, Array1};
/// use ndarray_rand::rand::SeedableRng;
/// use rand_isaac::Isaac64Rng;
///
/// let observations = array![[10., 2., 8.], [12., 3., 9.], [50., 50., 50.], [48., 49., 51.]];
///
/// // Our random number generator, seeded for reproducibility
/// let rng = Isaac64Rng::seed_from_u64(42);
/// let model = KMeans::params_with_rng(2, rng)
///     .tolerance(1e-2)
///     .fit(&observations)
///     .expect("KMeans fitted");
///
/// // Predict returns the **index** of the nearest cluster
/// let memberships: Array1<usize> = model.predict(&observations);
/// assert_eq!(memberships[0], memberships[1]);
/// assert_eq!(memberships[2], memberships[3]);
/// assert_ne!(memberships[0], memberships[2]);
/// ```
pub struct KMeans<F: Float> {
    centroids: Array2<F>,
    cluster_count: Array1<usize>,
    inertia: F,
    converged: bool,
}

impl<F: Float> KMeans<F> {
    /// Hyperparameters seeded with [`DEFAULT_SEED`](crate::DEFAULT_SEED)
    pub fn params(nclusters: usize) -> KMeansParams<F, Isaac64Rng> {
        KMeansParams::new(nclusters, Isaac64Rng::seed_from_u64(DEFAULT_SEED))
    }

    pub fn params_with_rng<R: Rng>(nclusters: usize, rng: R) -> KMeansParams<F, R> {
        KMeansParams::new(nclusters, rng)
    }

    /// Return the set of centroids as a 2-dimensional matrix with shape
    /// `(n_centroids, n_features)`.
    pub fn centroids(&self) -> &Array2<F> {
        &self.centroids
    }

    /// Return the number of training points belonging to each cluster
    pub fn cluster_count(&self) -> &Array1<usize> {
        &self.cluster_count
    }

    /// Return the sum of squared distances between each training point and its closest centroid.
    pub fn inertia(&self) -> F {
        self.inertia
    }

    /// Whether the best run met the tolerance before hitting `max_n_iterations`
    pub fn converged(&self) -> bool {
        self.converged
    }
}

impl<F: Float, R: Rng + Clone, DA: Data<Elem = F>> Fit<ArrayBase<DA, Ix2>, ClusteringError>
    for KMeansValidParams<F, R>
{
    type Object = KMeans<F>;

    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `fit` identifies `n_clusters` centroids based on the training data distribution.
    ///
    /// An instance of `KMeans` is returned.
    ///
    fn fit(&self, observations: &ArrayBase<DA, Ix2>) -> Result<Self::Object, ClusteringError> {
        let n_samples = observations.nsamples();
        if n_samples < self.n_clusters() {
            return Err(ClusteringError::DataInsufficient {
                requested: self.n_clusters(),
                available: n_samples,
            });
        }
        if let KMeansInit::Precomputed(centroids) = self.init_method() {
            if centroids.ncols() != observations.nfeatures() {
                return Err(KMeansParamsError::PrecomputedShape.into());
            }
        }

        let mut rng = self.rng().clone();
        let observations = observations.view();

        let mut best: Option<(Array2<F>, F, bool)> = None;
        let mut memberships = Array1::zeros(n_samples);
        let mut dists = Array1::zeros(n_samples);

        for run in 0..self.n_runs() {
            let mut centroids = self
                .init_method()
                .run(self.n_clusters(), observations, &mut rng);
            let mut converged = false;
            let mut n_iter = 0;
            while n_iter < self.max_n_iterations() {
                n_iter += 1;
                update_cluster_memberships(&centroids, &observations, &mut memberships);
                let new_centroids = compute_centroids(&centroids, &observations, &memberships);
                let shift = centroids.sq_l2_dist(&new_centroids)?;
                centroids = new_centroids;
                if shift < self.tolerance() {
                    converged = true;
                    break;
                }
            }

            // The inertia is measured against the final centroids, not the ones
            // used for the last assignment step
            update_min_dists(&centroids, &observations, &mut dists);
            let inertia = dists.sum();
            debug!(
                n_clusters = self.n_clusters(),
                run,
                n_iter,
                converged,
                inertia = %inertia,
                "k-means run finished"
            );

            // We keep the centroids which minimize the inertia (defined as the sum of
            // the squared distances of the closest centroid for all observations)
            // over the n runs of the KMeans algorithm.
            let improves = match &best {
                Some((_, min_inertia, _)) => inertia < *min_inertia,
                None => true,
            };
            if improves {
                best = Some((centroids, inertia, converged));
            }
        }

        let (centroids, inertia, converged) = best.ok_or(KMeansParamsError::NRuns)?;
        if !converged {
            warn!(
                n_clusters = self.n_clusters(),
                max_n_iterations = self.max_n_iterations(),
                "k-means did not converge, keeping the best centroids found"
            );
        }

        update_cluster_memberships(&centroids, &observations, &mut memberships);
        let mut cluster_count = Array1::zeros(self.n_clusters());
        memberships.iter().for_each(|&c| cluster_count[c] += 1);

        Ok(KMeans {
            centroids,
            cluster_count,
            inertia,
            converged,
        })
    }
}

impl<F: Float, DA: Data<Elem = F>> Transformer<&ArrayBase<DA, Ix2>, Array1<F>> for KMeans<F> {
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `transform` returns, for each observation, its squared distance to its centroid.
    fn transform(&self, observations: &ArrayBase<DA, Ix2>) -> Array1<F> {
        let mut dists = Array1::zeros(observations.nrows());
        update_min_dists(&self.centroids, observations, &mut dists);
        dists
    }
}

impl<F: Float, DA: Data<Elem = F>> PredictInplace<ArrayBase<DA, Ix2>, Array1<usize>>
    for KMeans<F>
{
    /// Given an input matrix `observations`, with shape `(n_observations, n_features)`,
    /// `predict` returns, for each observation, the index of the closest cluster/centroid.
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict_inplace(&self, observations: &ArrayBase<DA, Ix2>, memberships: &mut Array1<usize>) {
        assert_eq!(
            observations.nrows(),
            memberships.len(),
            "The number of data points must match the number of memberships."
        );

        update_cluster_memberships(&self.centroids, observations, memberships);
    }

    fn default_target(&self, x: &ArrayBase<DA, Ix2>) -> Array1<usize> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float, DA: Data<Elem = F>> PredictInplace<ArrayBase<DA, Ix1>, usize> for KMeans<F> {
    /// Given one input observation, return the index of its closest cluster
    ///
    /// You can retrieve the centroid associated to an index using the
    /// [`centroids` method](#method.centroids).
    fn predict_inplace(&self, observation: &ArrayBase<DA, Ix1>, membership: &mut usize) {
        *membership = closest_centroid(&self.centroids, observation).0;
    }

    fn default_target(&self, _x: &ArrayBase<DA, Ix1>) -> usize {
        0
    }
}

/// K-means is an iterative algorithm.
/// We will perform the assignment and update steps until we are satisfied
/// (according to our convergence criteria).
///
/// `compute_centroids` returns a 2-dimensional array,
/// where the i-th row corresponds to the i-th cluster.
/// Clusters without members keep their old centroid.
fn compute_centroids<F: Float>(
    old_centroids: &Array2<F>,
    // (n_observations, n_features)
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_observations,)
    cluster_memberships: &ArrayBase<impl Data<Elem = usize>, Ix1>,
) -> Array2<F> {
    let n_clusters = old_centroids.nrows();
    let mut counts: Array1<usize> = Array1::zeros(n_clusters);
    let mut centroids = Array2::zeros((n_clusters, observations.ncols()));

    Zip::from(observations.rows())
        .and(cluster_memberships)
        .for_each(|observation, &cluster_membership| {
            let mut centroid = centroids.row_mut(cluster_membership);
            centroid += &observation;
            counts[cluster_membership] += 1;
        });

    Zip::from(centroids.rows_mut())
        .and(old_centroids.rows())
        .and(&counts)
        .for_each(|mut centroid, old_centroid, &cnt| {
            if cnt == 0 {
                centroid.assign(&old_centroid);
            } else {
                centroid /= F::cast(cnt);
            }
        });
    centroids
}

// Update `cluster_memberships` with the index of the cluster each observation belongs to.
pub(crate) fn update_cluster_memberships<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    cluster_memberships: &mut ArrayBase<impl DataMut<Elem = usize>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(cluster_memberships)
        .for_each(|observation, cluster_membership| {
            *cluster_membership = closest_centroid(centroids, &observation).0
        });
}

// Updates `dists` with the squared distance of each observation from its closest centroid.
pub(crate) fn update_min_dists<F: Float>(
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    observations: &ArrayBase<impl Data<Elem = F>, Ix2>,
    dists: &mut ArrayBase<impl DataMut<Elem = F>, Ix1>,
) {
    Zip::from(observations.axis_iter(Axis(0)))
        .and(dists)
        .for_each(|observation, dist| *dist = closest_centroid(centroids, &observation).1);
}

fn squared_distance<F: Float>(
    a: &ArrayBase<impl Data<Elem = F>, Ix1>,
    b: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> F {
    Zip::from(a)
        .and(b)
        .fold(F::zero(), |acc, &x, &y| acc + (x - y) * (x - y))
}

/// Given a matrix of centroids with shape (n_centroids, n_features) and an observation,
/// return the index of the closest centroid (the index of the corresponding row in `centroids`)
/// and its squared distance. Ties go to the lowest index.
pub(crate) fn closest_centroid<F: Float>(
    // (n_centroids, n_features)
    centroids: &ArrayBase<impl Data<Elem = F>, Ix2>,
    // (n_features)
    observation: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> (usize, F) {
    let mut iterator = centroids.rows().into_iter().enumerate();

    let (mut closest_index, mut minimum_distance) = match iterator.next() {
        Some((_, first_centroid)) => (0, squared_distance(&first_centroid, observation)),
        None => return (0, F::infinity()),
    };

    for (centroid_index, centroid) in iterator {
        let distance = squared_distance(&centroid, observation);
        if distance < minimum_distance {
            closest_index = centroid_index;
            minimum_distance = distance;
        }
    }
    (closest_index, minimum_distance)
}
