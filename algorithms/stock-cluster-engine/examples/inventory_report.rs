use std::error::Error;
use std::fs::{self, File};
use std::path::PathBuf;

use stock_cluster_datasets::{load_inventory_file, write_assignments};
use stock_cluster_engine::{partition, select_cluster_count, DEFAULT_SEED};

// Cluster an inventory file and export the groups.
//
// usage: inventory_report [INVENTORY_CSV] [OUTPUT_DIR]
// Set RUST_LOG=stock_cluster_engine=debug to follow every k-means run.
fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stock_cluster_engine=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next().map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../datasets/data/inventory.csv")
    });
    let output = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("inventory-report"));

    let inventory = load_inventory_file(&input)?;
    if inventory.is_empty() {
        println!("{} holds no records, nothing to cluster", input.display());
        return Ok(());
    }
    println!(
        "{} records ({} distinct) from {}",
        inventory.len(),
        inventory.n_distinct(),
        input.display()
    );
    let offset = inventory.len() - inventory.latest(5).len();
    for (i, record) in inventory.latest(5).iter().enumerate() {
        println!("  latest: {}", record.display_label(offset + i));
    }

    let (k, curve) = select_cluster_count(&inventory.features(), 10)?;
    println!("\ninertia per cluster count");
    for (n_clusters, inertia) in curve.points() {
        let marker = if *n_clusters == k { "  <- elbow" } else { "" };
        println!("  k = {:>2}: {:>12.2}{}", n_clusters, inertia, marker);
    }
    if let Some(missing) = curve.shortfall() {
        println!(
            "  k = {}..={} skipped: not enough distinct records",
            missing.start(),
            missing.end()
        );
    }

    let report = partition(&inventory, k, Some(DEFAULT_SEED))?;
    if !report.converged() {
        println!("\nk-means hit its iteration cap, groups may be approximate");
    }

    fs::create_dir_all(&output)?;
    for group in report.groups() {
        let center = group.center();
        println!(
            "\ncluster {} ({} records), center: initial {:.1}, final {:.1}, sold {:.1}",
            group.id(),
            group.len(),
            center[0],
            center[1],
            center[2]
        );
        for member in group.members() {
            println!(
                "  {:<20} {:>8} {:>8} {:>8}",
                member.label,
                member.features.initial_stock,
                member.features.final_stock,
                member.features.units_sold
            );
        }

        let path = output.join(format!("cluster_{}.csv", group.id()));
        write_assignments(File::create(path)?, group.members())?;
    }

    write_assignments(File::create(output.join("clusters.csv"))?, report.entries())?;
    println!("\nexports written to {}", output.display());

    Ok(())
}
