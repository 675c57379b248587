//! `stock-cluster-datasets` moves inventory records in and out of the clustering engine.
//!
//! ## The Big Picture
//!
//! The engine in `stock-cluster-engine` only works on in-memory records. This crate is the
//! thin layer around it: it reads an inventory from CSV, appends newly entered records to an
//! inventory file and exports clustering results back to CSV.
//!
//! ## File format
//!
//! Inventories are comma separated with a header row:
//!
//! ```text
//! label,initial_stock,final_stock,units_sold
//! Kaos Polos Hitam,120,18,102
//! ,65,40,25
//! ```
//!
//! The `label` column is optional and an empty cell means the record has no label. The
//! columns `stok_awal`, `stok_akhir` and `terjual` are accepted in place of the three
//! feature columns.
//!
//! ## Using a dataset
//!
//! ```
//! use stock_cluster_datasets::load_inventory;
//!
//! let csv = "label,initial_stock,final_stock,units_sold\nshirt,10,2,8\n,12,3,9\n";
//! let inventory = load_inventory(csv.as_bytes()).unwrap();
//!
//! assert_eq!(inventory.len(), 2);
//! assert_eq!(inventory[1].display_label(1), "1");
//! ```
//!
//! With the `generate` feature enabled, [`generate`] samples synthetic inventories for tests
//! and benchmarks.

use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::Path;
use stock_cluster::{AssignedRecord, FeatureRecord, Inventory, LabeledRecord};
use thiserror::Error;

#[cfg(feature = "generate")]
pub mod generate;

/// Header of an inventory file
pub const INVENTORY_HEADER: [&str; 4] = ["label", "initial_stock", "final_stock", "units_sold"];

/// Header of a clustering export
pub const ASSIGNMENT_HEADER: [&str; 5] = [
    "label",
    "initial_stock",
    "final_stock",
    "units_sold",
    "cluster",
];

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("invalid record: {0}")]
    Record(#[from] stock_cluster::Error),
    /// An existing inventory file has no column for a feature
    #[error("inventory header has no `{0}` column")]
    Header(&'static str),
}

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Deserialize)]
struct InventoryRow {
    #[serde(default)]
    label: Option<String>,
    #[serde(alias = "stok_awal")]
    initial_stock: f64,
    #[serde(alias = "stok_akhir")]
    final_stock: f64,
    #[serde(alias = "terjual")]
    units_sold: f64,
}

impl InventoryRow {
    fn into_record(self) -> LabeledRecord {
        LabeledRecord {
            label: self.label.filter(|label| !label.is_empty()),
            features: FeatureRecord::new(self.initial_stock, self.final_stock, self.units_sold),
        }
    }
}

/// A column of an inventory file, recognised by its header under any accepted name
#[derive(Clone, Copy, Debug, PartialEq)]
enum Column {
    Label,
    InitialStock,
    FinalStock,
    UnitsSold,
    Other,
}

impl Column {
    const FEATURES: [Column; 3] = [Column::InitialStock, Column::FinalStock, Column::UnitsSold];

    fn from_header(name: &str) -> Self {
        match name.trim() {
            "label" => Column::Label,
            "initial_stock" | "stok_awal" => Column::InitialStock,
            "final_stock" | "stok_akhir" => Column::FinalStock,
            "units_sold" | "terjual" => Column::UnitsSold,
            _ => Column::Other,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Column::Label => "label",
            Column::InitialStock => "initial_stock",
            Column::FinalStock => "final_stock",
            Column::UnitsSold => "units_sold",
            Column::Other => "",
        }
    }

    fn field(self, record: &LabeledRecord) -> String {
        match self {
            Column::Label => record.label.clone().unwrap_or_default(),
            Column::InitialStock => record.features.initial_stock.to_string(),
            Column::FinalStock => record.features.final_stock.to_string(),
            Column::UnitsSold => record.features.units_sold.to_string(),
            Column::Other => String::new(),
        }
    }
}

/// Columns of an existing, non-empty inventory file in file order
fn existing_columns(path: &Path) -> Result<Option<Vec<Column>>> {
    let is_empty = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(err) if err.kind() == io::ErrorKind::NotFound => true,
        Err(err) => return Err(err.into()),
    };
    if is_empty {
        return Ok(None);
    }

    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let columns = reader
        .headers()?
        .iter()
        .map(Column::from_header)
        .collect::<Vec<_>>();
    Ok(Some(columns))
}

#[derive(Serialize)]
struct AssignmentRow<'a> {
    label: &'a str,
    initial_stock: f64,
    final_stock: f64,
    units_sold: f64,
    cluster: usize,
}

/// Read an inventory from CSV. Every record is checked for non-finite features.
pub fn load_inventory<R: Read>(reader: R) -> Result<Inventory> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let records = reader
        .deserialize::<InventoryRow>()
        .map(|row| row.map(InventoryRow::into_record))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Inventory::new(records)?)
}

/// Read an inventory file. A file that does not exist yet is an empty inventory.
pub fn load_inventory_file(path: impl AsRef<Path>) -> Result<Inventory> {
    match File::open(path) {
        Ok(file) => load_inventory(file),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Inventory::default()),
        Err(err) => Err(err.into()),
    }
}

/// Append one record to an inventory file, creating the file with its header if needed.
///
/// The row follows the column order of the existing header, whichever of the accepted
/// column names it uses. Columns that are not inventory fields are left empty. Records with
/// a NaN or infinite feature are refused, as are files whose header misses a feature column.
pub fn append_record(path: impl AsRef<Path>, record: &LabeledRecord) -> Result<()> {
    let path = path.as_ref();
    let existing = load_inventory_file(path)?;
    record.features.validate(existing.len())?;

    let header = existing_columns(path)?;
    let columns = match &header {
        Some(columns) => {
            if let Some(missing) = Column::FEATURES.iter().find(|c| !columns.contains(*c)) {
                return Err(DatasetError::Header(missing.name()));
            }
            columns.clone()
        }
        None => INVENTORY_HEADER
            .iter()
            .map(|name| Column::from_header(name))
            .collect(),
    };
    let needs_newline = header.is_some() && !fs::read(path)?.ends_with(b"\n");

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_newline {
        file.write_all(b"\n")?;
    }
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    if header.is_none() {
        writer.write_record(&INVENTORY_HEADER)?;
    }
    writer.write_record(columns.iter().map(|column| column.field(record)))?;
    writer.flush()?;
    Ok(())
}

/// Write clustering results as CSV with the [`ASSIGNMENT_HEADER`] columns.
///
/// The same format serves a single cluster's members and the combined export of all clusters.
pub fn write_assignments<'a, W, I>(writer: W, entries: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a AssignedRecord>,
{
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(&ASSIGNMENT_HEADER)?;
    for entry in entries {
        writer.serialize(AssignmentRow {
            label: &entry.label,
            initial_stock: entry.features.initial_stock,
            final_stock: entry.features.final_stock,
            units_sold: entry.features.units_sold,
            cluster: entry.cluster,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "stock-cluster-{}-{}.csv",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn load_with_optional_labels() {
        let csv = "label,initial_stock,final_stock,units_sold\n\
                   shirt,10,2,8\n\
                   ,12,3,9\n\
                   \x20 ,1,1,0\n";
        let inventory = load_inventory(csv.as_bytes()).unwrap();

        assert_eq!(inventory.len(), 3);
        assert_eq!(inventory[0].label.as_deref(), Some("shirt"));
        assert_eq!(inventory[1].label, None);
        assert_eq!(inventory[2].label, None);
        assert_abs_diff_eq!(inventory[1].features.final_stock, 3.);
    }

    #[test]
    fn load_without_label_column() {
        let csv = "initial_stock,final_stock,units_sold\n5,1,4\n";
        let inventory = load_inventory(csv.as_bytes()).unwrap();
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory[0].display_label(0), "0");
    }

    #[test]
    fn load_with_alias_columns() {
        let csv = "label,stok_awal,stok_akhir,terjual\nKemeja,60,41,19\n";
        let inventory = load_inventory(csv.as_bytes()).unwrap();
        assert_eq!(inventory[0].features, FeatureRecord::new(60., 41., 19.));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let csv = "label,initial_stock,final_stock,units_sold\na,1,2,3\nb,1,NaN,3\n";
        let res = load_inventory(csv.as_bytes());
        assert!(matches!(
            res,
            Err(DatasetError::Record(stock_cluster::Error::NonFinite {
                index: 1,
                feature: "final_stock"
            }))
        ));
    }

    #[test]
    fn malformed_numbers_are_csv_errors() {
        let csv = "label,initial_stock,final_stock,units_sold\na,ten,2,3\n";
        assert!(matches!(
            load_inventory(csv.as_bytes()),
            Err(DatasetError::Csv(_))
        ));
    }

    #[test]
    fn missing_file_is_empty() {
        let path = scratch_file("missing");
        let inventory = load_inventory_file(&path).unwrap();
        assert!(inventory.is_empty());
    }

    #[test]
    fn append_creates_and_extends() {
        let path = scratch_file("append");
        append_record(&path, &LabeledRecord::new("shirt", FeatureRecord::new(10., 2., 8.)))
            .unwrap();
        append_record(&path, &LabeledRecord::unlabeled(FeatureRecord::new(12., 3., 9.))).unwrap();

        let inventory = load_inventory_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory[0].label.as_deref(), Some("shirt"));
        assert_eq!(inventory[1].label, None);
        assert_eq!(inventory[1].features, FeatureRecord::new(12., 3., 9.));
    }

    #[test]
    fn append_follows_existing_column_order() {
        let path = scratch_file("append-order");
        fs::write(&path, "stok_awal,stok_akhir,terjual,label\n60,41,19,Kemeja").unwrap();
        append_record(&path, &LabeledRecord::new("Jaket", FeatureRecord::new(40., 35., 5.)))
            .unwrap();
        append_record(&path, &LabeledRecord::unlabeled(FeatureRecord::new(45., 39., 6.))).unwrap();

        let inventory = load_inventory_file(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(inventory.len(), 3);
        assert_eq!(inventory[1].label.as_deref(), Some("Jaket"));
        assert_eq!(inventory[1].features, FeatureRecord::new(40., 35., 5.));
        assert_eq!(inventory[2].label, None);
        assert_eq!(inventory[2].features, FeatureRecord::new(45., 39., 6.));
        assert_eq!(text.lines().next(), Some("stok_awal,stok_akhir,terjual,label"));
    }

    #[test]
    fn append_refuses_header_without_feature_column() {
        let path = scratch_file("append-header");
        fs::write(&path, "label,initial_stock,final_stock\n").unwrap();
        let res = append_record(&path, &LabeledRecord::new("a", FeatureRecord::new(1., 1., 0.)));
        let text = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert!(matches!(res, Err(DatasetError::Header("units_sold"))));
        assert_eq!(text, "label,initial_stock,final_stock\n");
    }

    #[test]
    fn append_refuses_non_finite() {
        let path = scratch_file("append-nan");
        let res = append_record(
            &path,
            &LabeledRecord::new("bad", FeatureRecord::new(1., f64::INFINITY, 0.)),
        );
        assert!(matches!(res, Err(DatasetError::Record(_))));
        assert!(!path.exists());
    }

    #[test]
    fn assignments_export() {
        let entries = vec![
            AssignedRecord {
                index: 0,
                label: "shirt".to_string(),
                features: FeatureRecord::new(10., 2., 8.),
                cluster: 1,
            },
            AssignedRecord {
                index: 1,
                label: "1".to_string(),
                features: FeatureRecord::new(12.5, 3., 9.),
                cluster: 0,
            },
        ];
        let mut buf = Vec::new();
        write_assignments(&mut buf, &entries).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[0],
            "label,initial_stock,final_stock,units_sold,cluster"
        );
        assert!(lines[1].starts_with("shirt,10"));
        assert!(lines[1].ends_with(",1"));
        assert!(lines[2].starts_with("1,12.5"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_export_keeps_header() {
        let mut buf = Vec::new();
        write_assignments(&mut buf, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "label,initial_stock,final_stock,units_sold,cluster\n"
        );
    }
}
