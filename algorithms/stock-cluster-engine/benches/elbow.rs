use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration,
};
use ndarray::Array2;
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_isaac::Isaac64Rng;
use stock_cluster::prelude::*;
use stock_cluster::records_to_array;
use stock_cluster_datasets::generate::inventory_blobs;
use stock_cluster_engine::{Elbow, KMeans, KMeansInit, Partition};

fn inventory(
    rng: &mut Isaac64Rng,
    blob_size: usize,
    n_blobs: usize,
) -> (Vec<LabeledRecord>, Vec<FeatureRecord>) {
    let centers = Array2::random_using((n_blobs, 3), Uniform::new(0., 500.), rng);
    let records = inventory_blobs(blob_size, &centers, rng);
    let features = records.iter().map(|r| r.features).collect();
    (records, features)
}

fn k_means_bench(c: &mut Criterion) {
    let mut rng = Isaac64Rng::seed_from_u64(40);
    let sizes = vec![(100, 4), (400, 10), (3000, 10)];

    let mut benchmark = c.benchmark_group("k_means");
    benchmark.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    for (blob_size, n_clusters) in sizes {
        let (_, features) = inventory(&mut rng, blob_size, n_clusters);
        let observations = records_to_array(&features).unwrap();
        benchmark.bench_function(BenchmarkId::new("k_means", blob_size), |bencher| {
            bencher.iter(|| {
                KMeans::params_with_rng(black_box(n_clusters), black_box(rng.clone()))
                    .init_method(KMeansInit::KMeansPlusPlus)
                    .max_n_iterations(black_box(1000))
                    .tolerance(black_box(1e-3))
                    .fit(&observations)
                    .unwrap()
            });
        });
    }

    benchmark.finish();
}

fn elbow_bench(c: &mut Criterion) {
    let mut rng = Isaac64Rng::seed_from_u64(40);
    let sizes = vec![(20, 3), (100, 5), (500, 5)];

    let mut benchmark = c.benchmark_group("elbow");
    benchmark.sample_size(10);
    for (blob_size, n_blobs) in sizes {
        let (records, features) = inventory(&mut rng, blob_size, n_blobs);
        benchmark.bench_function(
            BenchmarkId::new("select_cluster_count", blob_size * n_blobs),
            |bencher| {
                bencher.iter(|| {
                    Elbow::params()
                        .k_max(black_box(10))
                        .check()
                        .unwrap()
                        .fit(&features[..])
                        .unwrap()
                });
            },
        );
        benchmark.bench_function(
            BenchmarkId::new("partition", blob_size * n_blobs),
            |bencher| {
                bencher.iter(|| {
                    Partition::params(black_box(n_blobs))
                        .check()
                        .unwrap()
                        .fit(&records[..])
                        .unwrap()
                });
            },
        );
    }

    benchmark.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = k_means_bench, elbow_bench
}
criterion_main!(benches);
