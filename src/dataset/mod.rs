//! Datasets
//!
//! This module implements the inventory records the clustering engine consumes and produces,
//! together with the numeric bound and the `Records` helper trait shared by all algorithms.
use ndarray::{Array1, Array2, ScalarOperand};

use num_traits::{FromPrimitive, NumAssignOps, NumCast, Signed};
use rand::distributions::uniform::SampleUniform;

use std::collections::HashSet;
use std::fmt;
use std::iter::Sum;
use std::ops::{AddAssign, Deref};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Error, Result};

mod impl_records;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used in the observation
/// matrices the clustering algorithms operate on.
pub trait Float:
    FromPrimitive
    + num_traits::Float
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Signed
    + Sum
    + NumAssignOps
    + for<'a> AddAssign<&'a Self>
    + SampleUniform
    + ScalarOperand
    + approx::AbsDiffEq
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// Record trait
pub trait Records {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}

/// The numeric part of an inventory record.
///
/// Records are immutable once loaded and are identified by their position in the input
/// sequence, never by their values.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FeatureRecord {
    pub initial_stock: f64,
    pub final_stock: f64,
    pub units_sold: f64,
}

impl FeatureRecord {
    /// Column names, in the order used by [`to_array`](Self::to_array)
    pub const FEATURE_NAMES: [&'static str; 3] = ["initial_stock", "final_stock", "units_sold"];

    pub fn new(initial_stock: f64, final_stock: f64, units_sold: f64) -> Self {
        Self {
            initial_stock,
            final_stock,
            units_sold,
        }
    }

    pub fn values(&self) -> [f64; 3] {
        [self.initial_stock, self.final_stock, self.units_sold]
    }

    pub fn to_array(&self) -> Array1<f64> {
        Array1::from(self.values().to_vec())
    }

    /// Fails with [`Error::NonFinite`] naming the first NaN or infinite feature
    pub fn validate(&self, index: usize) -> Result<()> {
        for (feature, value) in Self::FEATURE_NAMES.iter().zip(self.values().iter()) {
            if !value.is_finite() {
                return Err(Error::NonFinite {
                    index,
                    feature: *feature,
                });
            }
        }
        Ok(())
    }

    // `-0.0` and `0.0` must hash alike
    fn distinct_key(&self) -> [u64; 3] {
        let key = |x: f64| if x == 0.0 { 0u64 } else { x.to_bits() };
        [
            key(self.initial_stock),
            key(self.final_stock),
            key(self.units_sold),
        ]
    }
}

impl From<[f64; 3]> for FeatureRecord {
    fn from(values: [f64; 3]) -> Self {
        Self::new(values[0], values[1], values[2])
    }
}

/// A [`FeatureRecord`] with an optional free-text identity.
///
/// The label is only carried for reporting, it never influences clustering.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabeledRecord {
    pub label: Option<String>,
    pub features: FeatureRecord,
}

impl LabeledRecord {
    pub fn new(label: impl Into<String>, features: FeatureRecord) -> Self {
        Self {
            label: Some(label.into()),
            features,
        }
    }

    pub fn unlabeled(features: FeatureRecord) -> Self {
        Self {
            label: None,
            features,
        }
    }

    /// The printable identity of a record at position `index`: its label, or the index
    /// itself when no label is present.
    pub fn display_label(&self, index: usize) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => index.to_string(),
        }
    }
}

/// One row of a clustering result: a record resolved to its printable label and the
/// cluster it was assigned to.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct AssignedRecord {
    /// Position of the record in the clustered input
    pub index: usize,
    pub label: String,
    pub features: FeatureRecord,
    pub cluster: usize,
}

/// Inventory
///
/// An ordered collection of [`LabeledRecord`]s whose features are known to be finite.
/// Validation happens here, at the load boundary, so the clustering algorithms never
/// have to re-check their input.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inventory {
    records: Vec<LabeledRecord>,
}

impl Inventory {
    pub fn new(records: Vec<LabeledRecord>) -> Result<Self> {
        for (index, record) in records.iter().enumerate() {
            record.features.validate(index)?;
        }
        Ok(Self { records })
    }

    /// Appends a record after validating its features
    pub fn push(&mut self, record: LabeledRecord) -> Result<()> {
        record.features.validate(self.records.len())?;
        self.records.push(record);
        Ok(())
    }

    pub fn features(&self) -> Vec<FeatureRecord> {
        self.records.iter().map(|r| r.features).collect()
    }

    /// The last `n` records (all of them if there are fewer than `n`)
    pub fn latest(&self, n: usize) -> &[LabeledRecord] {
        let start = self.records.len().saturating_sub(n);
        &self.records[start..]
    }

    pub fn n_distinct(&self) -> usize {
        count_distinct(&self.features())
    }

    pub fn into_records(self) -> Vec<LabeledRecord> {
        self.records
    }
}

impl Deref for Inventory {
    type Target = [LabeledRecord];

    fn deref(&self) -> &[LabeledRecord] {
        &self.records
    }
}

/// Number of distinct feature tuples, compared bitwise
pub fn count_distinct(features: &[FeatureRecord]) -> usize {
    features
        .iter()
        .map(FeatureRecord::distinct_key)
        .collect::<HashSet<_>>()
        .len()
}

/// Build the observation matrix with shape `(n_records, 3)`
pub fn records_to_array(features: &[FeatureRecord]) -> Result<Array2<f64>> {
    let flat = features
        .iter()
        .flat_map(|r| r.values().to_vec())
        .collect::<Vec<_>>();

    Ok(Array2::from_shape_vec(
        (features.len(), FeatureRecord::FEATURE_NAMES.len()),
        flat,
    )?)
}
