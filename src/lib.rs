//! eopatch: typed in-memory container for earth-observation array data
//!
//! An [`EOPatch`] holds the co-registered raster/vector/scalar layers of one
//! spatio-temporal tile as N-dimensional arrays, grouped under a closed set of
//! [`FeatureType`] slots. Each feature type fixes the rank its arrays must
//! have, so a patch can never hold, say, a 2-dimensional image under a
//! temporal raster slot.
//!
//! ## Key Features
//!
//! - **Typed storage**: per-type rank validation on every insert
//! - **Feature-wise concatenation**: strict along the time axis, consensus
//!   intersection for timeless layers
//! - **Exact equality**: elementwise array comparison, no tolerance
//! - **Round-trip persistence**: directory store with a JSON manifest and raw
//!   binary array files
//!
//! ## Module Organization
//!
//! - [`feature_type`]: the feature-type enumeration and its rank table
//! - [`eodata`]: the EOPatch container and its operations
//! - [`storage`]: save/load of a patch to a directory store
//! - [`errors`]: centralized error handling
//!
//! ## Usage Example
//!
//! ```rust
//! use eopatch::prelude::*;
//! use ndarray::ArrayD;
//!
//! let bands = ArrayD::from_shape_vec(vec![2, 3, 3, 2], (0..36).map(|i| i as f32).collect())?;
//!
//! let mut eop = EOPatch::new();
//! eop.add_feature(FeatureType::Data, "bands", bands.clone())?;
//! assert_eq!(eop.get_feature(FeatureType::Data, "bands")?, &bands);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod eodata;
pub mod errors;
pub mod feature_type;
pub mod storage;

// Direct re-exports for the public API
pub use eodata::{EOPatch, FeatureMap};
pub use errors::{EOPatchError, Result};
pub use feature_type::FeatureType;

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::eodata::{EOPatch, FeatureMap};
    pub use crate::errors::{EOPatchError, Result};
    pub use crate::feature_type::FeatureType;
}
