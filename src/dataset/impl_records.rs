use super::{FeatureRecord, Float, Inventory, LabeledRecord, Records};
use ndarray::{ArrayBase, Axis, Data, Ix2};

/// Implement records for NdArrays
impl<F: Float, S: Data<Elem = F>> Records for ArrayBase<S, Ix2> {
    type Elem = F;

    fn nsamples(&self) -> usize {
        self.len_of(Axis(0))
    }

    fn nfeatures(&self) -> usize {
        self.len_of(Axis(1))
    }
}

impl Records for [FeatureRecord] {
    type Elem = f64;

    fn nsamples(&self) -> usize {
        self.len()
    }

    fn nfeatures(&self) -> usize {
        FeatureRecord::FEATURE_NAMES.len()
    }
}

impl Records for [LabeledRecord] {
    type Elem = f64;

    fn nsamples(&self) -> usize {
        self.len()
    }

    fn nfeatures(&self) -> usize {
        FeatureRecord::FEATURE_NAMES.len()
    }
}

impl Records for Inventory {
    type Elem = f64;

    fn nsamples(&self) -> usize {
        self.records.len()
    }

    fn nfeatures(&self) -> usize {
        FeatureRecord::FEATURE_NAMES.len()
    }
}

/// Implement records for references
impl<R: Records + ?Sized> Records for &R {
    type Elem = R::Elem;

    fn nsamples(&self) -> usize {
        (*self).nsamples()
    }

    fn nfeatures(&self) -> usize {
        (*self).nfeatures()
    }
}
