//! EOPatch store I/O
//!
//! A saved EOPatch is a directory holding a JSON manifest plus one raw binary
//! file per feature:
//!
//! ```text
//! <path>/eopatch.json            manifest: format marker + feature entries
//! <path>/<feature_type>/<field>.bin   little-endian f32, C order
//! ```
//!
//! The manifest records every feature's type, field name and shape, and doubles
//! as the store-validity marker: a path without one is not a saved EOPatch.
//! Loading reconstructs each array byte for byte, so `load(save(p)) == p`
//! holds exactly, including for an empty patch.

use std::path::{Path, PathBuf};

use log::{debug, info};
use ndarray::ArrayD;
use rayon::prelude::*;
use serde_json::Value as JsonValue;

use crate::eodata::EOPatch;
use crate::errors::{EOPatchError, Result};
use crate::feature_type::FeatureType;

const MANIFEST_NAME: &str = "eopatch.json";
const FORMAT: &str = "eopatch";
const DTYPE: &str = "<f4";

impl EOPatch {
    /// Serialize every stored feature under `path`, creating intermediate
    /// directories as needed.
    ///
    /// Arrays are written in parallel, one `.bin` file per feature, followed
    /// by the manifest. A field name that is empty or contains a path
    /// separator fails with [`EOPatchError::InvalidFieldName`] before anything
    /// is written. A failed save may leave a partial tree behind, but never a
    /// loadable one, because the manifest is written last.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let root = path.as_ref();

        let features: Vec<(FeatureType, &str, &ArrayD<f32>)> = self.iter_features().collect();
        for (_, field, _) in &features {
            if field.is_empty() || field.contains(['/', '\\']) {
                return Err(EOPatchError::InvalidFieldName {
                    field: field.to_string(),
                });
            }
        }

        std::fs::create_dir_all(root)?;
        for ft in FeatureType::ALL {
            if features.iter().any(|(t, _, _)| *t == ft) {
                std::fs::create_dir_all(root.join(ft.dir_name()))?;
            }
        }

        features.par_iter().try_for_each(|&(ft, field, value)| {
            let bytes: Vec<u8> = value.iter().flat_map(|v| v.to_le_bytes()).collect();
            let file = array_path(root, ft, field);
            debug!("writing {} ({} bytes)", file.display(), bytes.len());
            std::fs::write(file, bytes).map_err(EOPatchError::IoError)
        })?;

        let entries: Vec<JsonValue> = features
            .iter()
            .map(|(ft, field, value)| {
                serde_json::json!({
                    "feature_type": ft.dir_name(),
                    "field": field,
                    "shape": value.shape(),
                    "dtype": DTYPE,
                })
            })
            .collect();
        let manifest = serde_json::json!({
            "format": FORMAT,
            "features": entries,
        });
        std::fs::write(
            root.join(MANIFEST_NAME),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        info!("saved EOPatch with {} features to {}", features.len(), root.display());
        Ok(())
    }

    /// Reconstruct a previously saved EOPatch from `path`.
    ///
    /// Fails with [`EOPatchError::PatchNotFound`] when no manifest exists at
    /// the path, and with [`EOPatchError::MalformedPatch`] when the manifest
    /// or any array file cannot be read back consistently. A missing store is
    /// never mistaken for an empty container.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<EOPatch> {
        let root = path.as_ref();
        let manifest_path = root.join(MANIFEST_NAME);
        if !manifest_path.exists() {
            return Err(EOPatchError::PatchNotFound {
                path: root.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(&manifest_path)?;
        let manifest: JsonValue = serde_json::from_str(&content)
            .map_err(|e| malformed(root, format!("unparsable manifest: {}", e)))?;
        if manifest["format"].as_str() != Some(FORMAT) {
            return Err(malformed(root, "missing format marker".to_string()));
        }
        let entries = manifest["features"]
            .as_array()
            .ok_or_else(|| malformed(root, "missing feature list".to_string()))?;

        let mut patch = EOPatch::new();
        for entry in entries {
            let (ft, field, shape) = parse_entry(root, entry)?;
            let file = array_path(root, ft, &field);
            let bytes = std::fs::read(&file).map_err(|e| {
                malformed(root, format!("cannot read array file {}: {}", file.display(), e))
            })?;

            let expected_len: usize = shape.iter().product::<usize>() * 4;
            if bytes.len() != expected_len {
                return Err(malformed(
                    root,
                    format!(
                        "array file {} holds {} bytes, manifest shape {:?} requires {}",
                        file.display(),
                        bytes.len(),
                        shape,
                        expected_len
                    ),
                ));
            }

            let values: Vec<f32> = bytes
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            let array = ArrayD::from_shape_vec(shape, values)
                .map_err(|e| malformed(root, format!("cannot shape array '{}': {}", field, e)))?;
            patch
                .add_feature(ft, &field, array)
                .map_err(|e| malformed(root, format!("invalid feature '{}': {}", field, e)))?;
        }

        debug!("loaded EOPatch with {} features from {}", entries.len(), root.display());
        Ok(patch)
    }
}

fn array_path(root: &Path, feature_type: FeatureType, field: &str) -> PathBuf {
    root.join(feature_type.dir_name()).join(format!("{}.bin", field))
}

fn parse_entry(root: &Path, entry: &JsonValue) -> Result<(FeatureType, String, Vec<usize>)> {
    let type_name = entry["feature_type"]
        .as_str()
        .ok_or_else(|| malformed(root, "feature entry without a type".to_string()))?;
    let ft = FeatureType::from_dir_name(type_name)
        .ok_or_else(|| malformed(root, format!("unknown feature type '{}'", type_name)))?;
    let field = entry["field"]
        .as_str()
        .ok_or_else(|| malformed(root, "feature entry without a field name".to_string()))?
        .to_string();
    let shape = entry["shape"]
        .as_array()
        .ok_or_else(|| malformed(root, format!("feature '{}' has no shape", field)))?
        .iter()
        .map(|v| v.as_u64().map(|n| n as usize))
        .collect::<Option<Vec<usize>>>()
        .ok_or_else(|| malformed(root, format!("feature '{}' has a non-integer shape", field)))?;
    if entry["dtype"].as_str() != Some(DTYPE) {
        return Err(malformed(root, format!("feature '{}' has an unsupported dtype", field)));
    }
    Ok((ft, field, shape))
}

fn malformed(root: &Path, message: String) -> EOPatchError {
    EOPatchError::MalformedPatch {
        path: root.to_path_buf(),
        message,
    }
}
