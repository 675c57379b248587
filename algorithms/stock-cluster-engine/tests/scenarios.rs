use approx::assert_abs_diff_eq;
use ndarray::{array, Array2};
use ndarray_rand::rand::SeedableRng;
use rand_isaac::Isaac64Rng;
use rand_xoshiro::Xoshiro256Plus;
use stock_cluster::prelude::*;
use stock_cluster::records_to_array;
use stock_cluster_datasets::generate::inventory_blobs;
use stock_cluster_datasets::{load_inventory, write_assignments};
use stock_cluster_engine::{
    find_elbow, partition, select_cluster_count, ClusteringError, Elbow, KMeans,
};

fn three_pairs() -> Vec<LabeledRecord> {
    vec![
        LabeledRecord::new("kaos", FeatureRecord::new(10., 2., 8.)),
        LabeledRecord::new("kemeja", FeatureRecord::new(12., 3., 9.)),
        LabeledRecord::new("syal", FeatureRecord::new(1., 9., 1.)),
        LabeledRecord::new("sarung tangan", FeatureRecord::new(2., 8., 0.)),
        LabeledRecord::new("jaket", FeatureRecord::new(50., 50., 50.)),
        LabeledRecord::new("mantel", FeatureRecord::new(48., 49., 51.)),
    ]
}

fn features(records: &[LabeledRecord]) -> Vec<FeatureRecord> {
    records.iter().map(|r| r.features).collect()
}

#[test]
fn three_pairs_are_kept_together() {
    let records = three_pairs();
    let (k, curve) = select_cluster_count(&features(&records), 10).unwrap();

    assert!((2..=4).contains(&k), "selected k = {}", k);
    // six distinct records support at most six clusters
    assert_eq!(curve.len(), 6);
    assert_eq!(curve.shortfall(), Some(7..=10));
    assert!(curve.is_non_increasing(1e-6));

    for &k in &[k, 3] {
        let report = partition(&records, k, None).unwrap();
        let a = report.assignment();
        assert_eq!(a[0], a[1]);
        assert_eq!(a[2], a[3]);
        assert_eq!(a[4], a[5]);
    }

    let report = partition(&records, 3, None).unwrap();
    let a = report.assignment();
    assert_ne!(a[0], a[2]);
    assert_ne!(a[0], a[4]);
    assert_ne!(a[2], a[4]);
    assert_eq!(report.sizes(), vec![2, 2, 2]);
}

#[test]
fn two_distinct_records() {
    let records = vec![
        LabeledRecord::new("a", FeatureRecord::new(5., 1., 4.)),
        LabeledRecord::new("b", FeatureRecord::new(5., 1., 4.)),
        LabeledRecord::new("c", FeatureRecord::new(30., 10., 20.)),
        LabeledRecord::new("d", FeatureRecord::new(30., 10., 20.)),
    ];

    let (k, curve) = select_cluster_count(&features(&records), 10).unwrap();
    assert!((1..=2).contains(&k));
    assert_eq!(curve.len(), 2);
    assert_eq!(curve.k_max(), 10);
    assert_eq!(curve.shortfall(), Some(3..=10));
    assert_abs_diff_eq!(curve.inertia(2).unwrap(), 0.);
    assert!(matches!(
        curve.inertia(5),
        Err(ClusteringError::DataInsufficient {
            requested: 5,
            available: 2
        })
    ));

    let res = partition(&records, 3, None);
    assert!(matches!(
        res,
        Err(ClusteringError::DataInsufficient {
            requested: 3,
            available: 2
        })
    ));
}

#[test]
fn zero_variance_dataset() {
    let records = vec![LabeledRecord::unlabeled(FeatureRecord::new(7., 7., 7.)); 8];

    let (k, curve) = select_cluster_count(&features(&records), 10).unwrap();
    assert_eq!(k, 1);
    assert!(curve.inertias().iter().all(|&inertia| inertia == 0.));

    // fitting more clusters than distinct points still costs nothing
    let observations = records_to_array(&features(&records)).unwrap();
    let model = KMeans::params(3).check().unwrap().fit(&observations).unwrap();
    assert_abs_diff_eq!(model.inertia(), 0.);

    let report = partition(&records, 1, None).unwrap();
    assert_eq!(report.sizes(), vec![8]);
    assert_abs_diff_eq!(report.inertia(), 0.);
}

#[test]
fn degenerate_ratio_is_defined() {
    assert_eq!(find_elbow(&[100., 50., 50., 49., 48.], 0.1), Some(1));
}

#[test]
fn partition_is_idempotent() {
    let mut rng = Xoshiro256Plus::seed_from_u64(3);
    let records = inventory_blobs(
        30,
        &array![[100., 20., 80.], [40., 35., 5.], [200., 25., 175.]],
        &mut rng,
    );

    let first = partition(&records, 3, Some(1234)).unwrap();
    let second = partition(&records, 3, Some(1234)).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.assignment(), second.assignment());
    assert_eq!(first.centers(), second.centers());
}

#[test]
fn every_record_is_assigned_exactly_once() {
    let mut rng = Isaac64Rng::seed_from_u64(42);
    let records = inventory_blobs(
        20,
        &array![[100., 20., 80.], [40., 35., 5.], [200., 25., 175.], [60., 40., 20.]],
        &mut rng,
    );

    for k in 1..=6 {
        let report = partition(&records, k, Some(k as u64)).unwrap();
        assert_eq!(report.assignment().len(), records.len());
        assert!(report.assignment().iter().all(|&c| c < k));

        let mut indices = report.entries().iter().map(|e| e.index).collect::<Vec<_>>();
        indices.dedup();
        assert_eq!(indices, (0..records.len()).collect::<Vec<_>>());
    }
}

#[test]
fn curve_on_blobs_is_monotone() {
    let mut rng = Isaac64Rng::seed_from_u64(42);
    let centers: Array2<f64> = array![[100., 20., 80.], [40., 35., 5.], [200., 25., 175.]];
    let records = inventory_blobs(25, &centers, &mut rng);

    let selection = Elbow::params()
        .k_max(8)
        .check()
        .unwrap()
        .fit(&features(&records)[..])
        .unwrap();
    assert!((1..=8).contains(&selection.optimal_k()));
    assert_eq!(selection.curve().len(), 8);
    assert!(selection.curve().is_non_increasing(10.));
}

#[test]
fn unlabelled_records_report_their_index() {
    let csv = "label,stok_awal,stok_akhir,terjual\n\
               Kaos,120,18,102\n\
               ,115,20,95\n\
               Jaket,40,35,5\n\
               ,45,39,6\n";
    let inventory = load_inventory(csv.as_bytes()).unwrap();
    let report = partition(&inventory, 2, None).unwrap();

    let labels = report
        .entries()
        .iter()
        .map(|e| e.label.clone())
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["Kaos", "1", "Jaket", "3"]);

    let group = report.group(report.assignment()[1]).unwrap();
    assert!(group.members().iter().any(|m| m.label == "1"));

    let mut buf = Vec::new();
    write_assignments(&mut buf, report.entries()).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.lines().count(), 5);
    assert!(text.lines().nth(2).unwrap().starts_with("1,115"));
}

#[test]
fn huge_finite_features_do_not_panic() {
    let inventory = Inventory::new(vec![
        LabeledRecord::new("a", FeatureRecord::new(1e155, 0., 0.)),
        LabeledRecord::new("b", FeatureRecord::new(-1e155, 0., 0.)),
        LabeledRecord::new("c", FeatureRecord::new(0., 0., 0.)),
    ])
    .unwrap();

    let report = partition(&inventory, 2, None).unwrap();
    assert_eq!(report.assignment().len(), 3);
    assert!(report.assignment().iter().all(|&c| c < 2));

    let (k, curve) = select_cluster_count(&inventory.features(), 3).unwrap();
    assert!((1..=3).contains(&k));
    assert_eq!(curve.len(), 3);
}
