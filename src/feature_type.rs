//! The closed set of feature types an EOPatch can hold
//!
//! Feature types are partitioned along two axes: temporal vs timeless, and
//! raster vs attribute. Each type fixes the rank every array stored under it
//! must have; the rank is part of the enumeration, not configurable per
//! container.

use std::fmt;

/// Classification tag for a stored feature, fixing its required array rank.
///
/// | Family | Rank | Axes |
/// |---|---|---|
/// | [`Data`](Self::Data), [`Mask`](Self::Mask) | 4 | (time, height, width, channel) |
/// | [`DataTimeless`](Self::DataTimeless), [`MaskTimeless`](Self::MaskTimeless) | 3 | (height, width, channel) |
/// | [`Label`](Self::Label), [`Scalar`](Self::Scalar) | 2 | (time, attribute) |
/// | [`LabelTimeless`](Self::LabelTimeless), [`ScalarTimeless`](Self::ScalarTimeless) | 1 | (attribute) |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureType {
    /// Temporal raster data, e.g. reflectance bands
    Data,
    /// Temporal raster mask, e.g. per-acquisition cloud mask
    Mask,
    /// Temporal per-patch attribute vector
    Scalar,
    /// Temporal per-patch label vector
    Label,
    /// Static raster data, e.g. a DEM
    DataTimeless,
    /// Static raster mask, e.g. a land/sea mask
    MaskTimeless,
    /// Static per-patch attribute vector
    ScalarTimeless,
    /// Static per-patch label vector
    LabelTimeless,
}

impl FeatureType {
    /// All feature types, in the canonical iteration order used by equality
    /// and persistence.
    pub const ALL: [FeatureType; 8] = [
        FeatureType::Data,
        FeatureType::Mask,
        FeatureType::Scalar,
        FeatureType::Label,
        FeatureType::DataTimeless,
        FeatureType::MaskTimeless,
        FeatureType::ScalarTimeless,
        FeatureType::LabelTimeless,
    ];

    /// Rank every array stored under this type must have.
    pub fn required_rank(self) -> usize {
        match self {
            FeatureType::Data | FeatureType::Mask => 4,
            FeatureType::DataTimeless | FeatureType::MaskTimeless => 3,
            FeatureType::Scalar | FeatureType::Label => 2,
            FeatureType::ScalarTimeless | FeatureType::LabelTimeless => 1,
        }
    }

    /// Whether arrays of this type carry a leading time axis.
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            FeatureType::Data | FeatureType::Mask | FeatureType::Scalar | FeatureType::Label
        )
    }

    /// Stable snake_case name, used as the on-disk directory name.
    pub fn dir_name(self) -> &'static str {
        match self {
            FeatureType::Data => "data",
            FeatureType::Mask => "mask",
            FeatureType::Scalar => "scalar",
            FeatureType::Label => "label",
            FeatureType::DataTimeless => "data_timeless",
            FeatureType::MaskTimeless => "mask_timeless",
            FeatureType::ScalarTimeless => "scalar_timeless",
            FeatureType::LabelTimeless => "label_timeless",
        }
    }

    /// Inverse of [`dir_name`](Self::dir_name).
    pub fn from_dir_name(name: &str) -> Option<FeatureType> {
        FeatureType::ALL.iter().copied().find(|ft| ft.dir_name() == name)
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
