//! The EOPatch container
//!
//! An EOPatch holds the co-registered raster/vector/scalar layers of one
//! spatio-temporal tile: one field-name-to-array mapping per [`FeatureType`].
//! Every stored array must have exactly the rank its feature type requires;
//! violating inserts are rejected up front, never coerced.
//!
//! ## Usage Example
//! ```rust
//! use eopatch::prelude::*;
//! use ndarray::ArrayD;
//!
//! let bands = ArrayD::from_shape_vec(vec![2, 3, 3, 2], (0..36).map(|i| i as f32).collect())?;
//!
//! let mut eop = EOPatch::new();
//! eop.add_feature(FeatureType::Data, "bands", bands)?;
//!
//! assert_eq!(eop.features()[&FeatureType::Data]["bands"], vec![2, 3, 3, 2]);
//! # Ok::<(), EOPatchError>(())
//! ```

use std::collections::HashMap;

use log::debug;
use ndarray::{concatenate, ArrayD, Axis};

use crate::errors::{EOPatchError, Result};
use crate::feature_type::FeatureType;

/// Mapping from field name to array, held once per feature type.
pub type FeatureMap = HashMap<String, ArrayD<f32>>;

/// In-memory container for the typed array layers of one spatio-temporal tile.
///
/// The container owns its arrays; all eight feature-type slots exist from
/// construction and a slot is simply empty when no feature of that type is
/// stored. Equality compares the full set of (type, field, array) triples
/// elementwise, with no tolerance.
#[derive(Debug, Clone)]
pub struct EOPatch {
    slots: HashMap<FeatureType, FeatureMap>,
}

impl EOPatch {
    /// Create an empty container.
    pub fn new() -> Self {
        let mut slots = HashMap::with_capacity(FeatureType::ALL.len());
        for ft in FeatureType::ALL {
            slots.insert(ft, FeatureMap::new());
        }
        EOPatch { slots }
    }

    /// Create a container from an initial mapping of mappings.
    ///
    /// Every entry is rank-validated exactly like a later
    /// [`add_feature`](Self::add_feature) call; any single violation fails
    /// the whole construction and no container is returned.
    pub fn with_features(features: HashMap<FeatureType, FeatureMap>) -> Result<Self> {
        let mut patch = EOPatch::new();
        for (feature_type, fields) in features {
            for (field, value) in fields {
                patch.add_feature(feature_type, &field, value)?;
            }
        }
        Ok(patch)
    }

    /// Store `value` under `(feature_type, field)`, overwriting any previous
    /// array for that field.
    ///
    /// Fails with [`EOPatchError::DimensionMismatch`] when the array's rank
    /// differs from the type's required rank, leaving the container unchanged.
    pub fn add_feature(
        &mut self,
        feature_type: FeatureType,
        field: &str,
        value: ArrayD<f32>,
    ) -> Result<()> {
        let expected = feature_type.required_rank();
        let actual = value.ndim();
        if actual != expected {
            return Err(EOPatchError::DimensionMismatch {
                feature_type,
                field: field.to_string(),
                expected,
                actual,
            });
        }
        self.slot_mut(feature_type).insert(field.to_string(), value);
        Ok(())
    }

    /// Return the array stored under `(feature_type, field)`.
    pub fn get_feature(&self, feature_type: FeatureType, field: &str) -> Result<&ArrayD<f32>> {
        self.slot(feature_type)
            .get(field)
            .ok_or_else(|| EOPatchError::FeatureNotFound {
                feature_type,
                field: field.to_string(),
            })
    }

    /// Remove the feature stored under `(feature_type, field)`.
    ///
    /// Removing an absent field is a no-op; the return value reports whether
    /// a feature was actually removed. No other entry, under this or any
    /// other type, is affected.
    pub fn remove_feature(&mut self, feature_type: FeatureType, field: &str) -> bool {
        self.slot_mut(feature_type).remove(field).is_some()
    }

    /// Temporal raster data features, e.g. reflectance bands.
    pub fn data(&self) -> &FeatureMap {
        self.slot(FeatureType::Data)
    }

    /// Temporal raster mask features.
    pub fn mask(&self) -> &FeatureMap {
        self.slot(FeatureType::Mask)
    }

    /// Temporal per-patch attribute features.
    pub fn scalar(&self) -> &FeatureMap {
        self.slot(FeatureType::Scalar)
    }

    /// Temporal per-patch label features.
    pub fn label(&self) -> &FeatureMap {
        self.slot(FeatureType::Label)
    }

    /// Static raster data features, e.g. a DEM.
    pub fn data_timeless(&self) -> &FeatureMap {
        self.slot(FeatureType::DataTimeless)
    }

    /// Static raster mask features.
    pub fn mask_timeless(&self) -> &FeatureMap {
        self.slot(FeatureType::MaskTimeless)
    }

    /// Static per-patch attribute features.
    pub fn scalar_timeless(&self) -> &FeatureMap {
        self.slot(FeatureType::ScalarTimeless)
    }

    /// Static per-patch label features.
    pub fn label_timeless(&self) -> &FeatureMap {
        self.slot(FeatureType::LabelTimeless)
    }

    /// Read view over the stored features: per feature type, a mapping from
    /// field name to that array's shape (not the array itself).
    pub fn features(&self) -> HashMap<FeatureType, HashMap<String, Vec<usize>>> {
        FeatureType::ALL
            .iter()
            .map(|&ft| {
                let shapes = self
                    .slot(ft)
                    .iter()
                    .map(|(field, value)| (field.clone(), value.shape().to_vec()))
                    .collect();
                (ft, shapes)
            })
            .collect()
    }

    /// Iterate over every stored `(feature_type, field, array)` triple.
    pub fn iter_features(&self) -> impl Iterator<Item = (FeatureType, &str, &ArrayD<f32>)> {
        FeatureType::ALL.into_iter().flat_map(move |ft| {
            self.slot(ft)
                .iter()
                .map(move |(field, value)| (ft, field.as_str(), value))
        })
    }

    /// Concatenate two patches feature-wise into a fresh container, leaving
    /// both inputs untouched.
    ///
    /// Temporal families are strict: every field must be present in both
    /// inputs, and each pair of arrays is joined along the time axis. A field
    /// present on only one side aborts the whole operation with
    /// [`EOPatchError::KeySetMismatch`] before any result is built.
    ///
    /// Timeless families carry forward consensus state only: a field survives
    /// when it is present in both inputs with elementwise-equal arrays, and is
    /// silently dropped otherwise. Survivors are copied unchanged.
    pub fn concatenate(a: &EOPatch, b: &EOPatch) -> Result<EOPatch> {
        // Validate every temporal key set before building anything.
        for ft in FeatureType::ALL.iter().copied().filter(|ft| ft.is_temporal()) {
            let (left, right) = (a.slot(ft), b.slot(ft));
            for field in left.keys().chain(right.keys()) {
                if !(left.contains_key(field) && right.contains_key(field)) {
                    return Err(EOPatchError::KeySetMismatch {
                        feature_type: ft,
                        field: field.clone(),
                    });
                }
            }
        }

        let mut result = EOPatch::new();
        for ft in FeatureType::ALL {
            let (left, right) = (a.slot(ft), b.slot(ft));
            if ft.is_temporal() {
                for (field, lhs) in left {
                    let rhs = &right[field];
                    let joined = concatenate(Axis(0), &[lhs.view(), rhs.view()])?;
                    result.slot_mut(ft).insert(field.clone(), joined);
                }
            } else {
                for (field, lhs) in left {
                    match right.get(field) {
                        Some(rhs) if rhs == lhs => {
                            result.slot_mut(ft).insert(field.clone(), lhs.clone());
                        }
                        Some(_) => {
                            debug!("dropping timeless field '{}' of type {}: values differ", field, ft);
                        }
                        None => {
                            debug!("dropping timeless field '{}' of type {}: present on one side only", field, ft);
                        }
                    }
                }
            }
        }
        Ok(result)
    }

    fn slot(&self, feature_type: FeatureType) -> &FeatureMap {
        &self.slots[&feature_type]
    }

    fn slot_mut(&mut self, feature_type: FeatureType) -> &mut FeatureMap {
        // All eight slots are inserted by every constructor.
        self.slots.get_mut(&feature_type).unwrap()
    }
}

impl Default for EOPatch {
    fn default() -> Self {
        EOPatch::new()
    }
}

impl PartialEq for EOPatch {
    fn eq(&self, other: &Self) -> bool {
        FeatureType::ALL.iter().all(|&ft| {
            let (left, right) = (self.slot(ft), other.slot(ft));
            left.len() == right.len()
                && left
                    .iter()
                    .all(|(field, value)| right.get(field).map_or(false, |v| v == value))
        })
    }
}
