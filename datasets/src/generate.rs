//! Utility functions for randomly generating inventories

use ndarray::{s, Array, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
    RandomExt,
};
use stock_cluster::{FeatureRecord, LabeledRecord};

/// Given an input matrix `centers`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the centers.
///
/// Each blob is formed by `blob_size` points sampled from `distribution` shifted to the
/// blob center. Rows are ordered blob by blob.
pub fn blobs_with_distribution(
    blob_size: usize,
    centers: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    distribution: impl Distribution<f64> + Clone,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centers, n_features) = centers.dim();
    let mut blobs: Array2<f64> = Array2::zeros((n_centers * blob_size, n_features));

    for (blob_index, center) in centers.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &center, distribution.clone(), rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }
    blobs
}

fn make_blob(
    blob_size: usize,
    center: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    distribution: impl Distribution<f64>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, center.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, distribution, rng);
    origin_blob + center
}

/// Labelled inventory records sampled with a standard normal spread around `centers`.
///
/// `centers` has shape `(n_blobs, 3)` with columns `initial_stock, final_stock, units_sold`.
/// Record `j` of blob `i` is labelled `blob-i-j`.
///
/// # Panics
///
/// If `centers` does not have exactly three columns.
///
/// ```
/// use ndarray::array;
/// use rand_isaac::Isaac64Rng;
/// use ndarray_rand::rand::SeedableRng;
/// use stock_cluster_datasets::generate::inventory_blobs;
///
/// let mut rng = Isaac64Rng::seed_from_u64(42);
/// let records = inventory_blobs(5, &array![[100., 20., 80.], [40., 35., 5.]], &mut rng);
///
/// assert_eq!(records.len(), 10);
/// assert_eq!(records[7].label.as_deref(), Some("blob-1-2"));
/// ```
pub fn inventory_blobs(
    blob_size: usize,
    centers: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Vec<LabeledRecord> {
    assert_eq!(
        centers.ncols(),
        FeatureRecord::FEATURE_NAMES.len(),
        "inventory centers need one column per feature"
    );

    let blobs = blobs_with_distribution(blob_size, centers, StandardNormal, rng);
    blobs
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| LabeledRecord {
            label: Some(format!("blob-{}-{}", i / blob_size, i % blob_size)),
            features: FeatureRecord::new(row[0], row[1], row[2]),
        })
        .collect()
}
