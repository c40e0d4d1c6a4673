//! Centralized error handling for eopatch
//!
//! This module provides structured error types for container validation,
//! concatenation, and store I/O, enabling better error context and type safety
//! than a generic `Box<dyn Error>`.

use std::fmt;
use std::path::PathBuf;

use crate::feature_type::FeatureType;

/// Main error type for eopatch operations
#[derive(Debug)]
pub enum EOPatchError {
    /// Array rank does not match the rank required by a feature type
    DimensionMismatch {
        feature_type: FeatureType,
        field: String,
        expected: usize,
        actual: usize,
    },

    /// Feature not found in the container
    FeatureNotFound {
        feature_type: FeatureType,
        field: String,
    },

    /// Temporal concatenation with non-identical field sets
    KeySetMismatch {
        feature_type: FeatureType,
        field: String,
    },

    /// Field name unusable as a store path component
    InvalidFieldName { field: String },

    /// No saved container at the given path
    PatchNotFound { path: PathBuf },

    /// Saved container exists but cannot be reconstructed
    MalformedPatch { path: PathBuf, message: String },

    /// I/O operation errors
    IoError(std::io::Error),

    /// Manifest serialization errors
    JsonError(serde_json::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),
}

impl fmt::Display for EOPatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EOPatchError::DimensionMismatch {
                feature_type,
                field,
                expected,
                actual,
            } => write!(
                f,
                "Field '{}' of type {} requires a {}-dimensional array, got {} dimensions",
                field, feature_type, expected, actual
            ),
            EOPatchError::FeatureNotFound {
                feature_type,
                field,
            } => write!(f, "Feature '{}' not found under type {}", field, feature_type),
            EOPatchError::KeySetMismatch {
                feature_type,
                field,
            } => write!(
                f,
                "Temporal field '{}' of type {} is present in only one of the concatenated patches",
                field, feature_type
            ),
            EOPatchError::InvalidFieldName { field } => {
                write!(f, "Field name '{}' cannot be used as a store path component", field)
            }
            EOPatchError::PatchNotFound { path } => {
                write!(f, "No saved EOPatch found at {}", path.display())
            }
            EOPatchError::MalformedPatch { path, message } => {
                write!(f, "Malformed EOPatch store at {}: {}", path.display(), message)
            }
            EOPatchError::IoError(e) => write!(f, "I/O error: {}", e),
            EOPatchError::JsonError(e) => write!(f, "Manifest error: {}", e),
            EOPatchError::ArrayError(e) => write!(f, "Array error: {}", e),
        }
    }
}

impl std::error::Error for EOPatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EOPatchError::IoError(e) => Some(e),
            EOPatchError::JsonError(e) => Some(e),
            EOPatchError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EOPatchError {
    fn from(error: std::io::Error) -> Self {
        EOPatchError::IoError(error)
    }
}

impl From<serde_json::Error> for EOPatchError {
    fn from(error: serde_json::Error) -> Self {
        EOPatchError::JsonError(error)
    }
}

impl From<ndarray::ShapeError> for EOPatchError {
    fn from(error: ndarray::ShapeError) -> Self {
        EOPatchError::ArrayError(error)
    }
}

/// Result type alias for eopatch operations
pub type Result<T> = std::result::Result<T, EOPatchError>;
