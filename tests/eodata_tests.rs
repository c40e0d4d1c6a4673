//! Tests for the EOPatch container semantics
//!
//! Covers rank validation, feature CRUD, the shape view, equality, and the
//! asymmetric concatenation policy.

use std::collections::HashMap;

use eopatch::{EOPatch, EOPatchError, FeatureType, Result};
use ndarray::{concatenate, ArrayD, Axis};

/// Row-major 0..n array of the given shape.
fn arange(shape: &[usize]) -> ArrayD<f32> {
    let len: usize = shape.iter().product();
    ArrayD::from_shape_vec(shape.to_vec(), (0..len).map(|i| i as f32).collect())
        .expect("shape matches length")
}

#[test]
fn test_add_feature() -> Result<()> {
    let bands = arange(&[2, 3, 3, 2]);

    let mut eop = EOPatch::new();
    eop.add_feature(FeatureType::Data, "bands", bands.clone())?;

    assert_eq!(eop.data()["bands"], bands, "Data array not stored");
    Ok(())
}

#[test]
fn test_get_feature() -> Result<()> {
    let bands = arange(&[2, 3, 3, 2]);

    let mut eop = EOPatch::new();
    eop.add_feature(FeatureType::Data, "bands", bands.clone())?;

    let eop_bands = eop.get_feature(FeatureType::Data, "bands")?;
    assert_eq!(eop_bands, &bands, "Data array not returned properly");

    let missing = eop.get_feature(FeatureType::Data, "no_such_field");
    match missing {
        Err(EOPatchError::FeatureNotFound { feature_type, field }) => {
            assert_eq!(feature_type, FeatureType::Data);
            assert_eq!(field, "no_such_field");
        }
        _ => panic!("Expected FeatureNotFound error"),
    }
    Ok(())
}

#[test]
fn test_remove_feature() -> Result<()> {
    let bands = arange(&[2, 3, 3, 2]);

    let mut eop = EOPatch::new();
    eop.add_feature(FeatureType::Data, "bands", bands.clone())?;
    eop.add_feature(FeatureType::Data, "bands_copy", bands.clone())?;
    eop.add_feature(FeatureType::DataTimeless, "dem", arange(&[3, 3, 1]))?;

    assert!(eop.data().contains_key("bands_copy"), "Data array not stored");
    assert!(
        eop.features()[&FeatureType::Data].contains_key("bands_copy"),
        "Feature key not in shape view"
    );

    assert!(eop.remove_feature(FeatureType::Data, "bands_copy"));
    assert!(!eop.data().contains_key("bands_copy"), "Data array not removed");
    assert!(
        !eop.features()[&FeatureType::Data].contains_key("bands_copy"),
        "Feature key not removed from shape view"
    );

    // Siblings and other types are untouched.
    assert!(eop.data().contains_key("bands"), "Sibling removed as well");
    assert!(eop.data_timeless().contains_key("dem"), "Other type disturbed");

    // Removing an absent key is a no-op.
    assert!(!eop.remove_feature(FeatureType::Data, "bands_copy"));
    assert!(eop.data().contains_key("bands"));
    Ok(())
}

#[test]
fn test_check_dims() {
    let bands_2d = arange(&[3, 3]);
    let bands_3d = arange(&[3, 3, 3]);

    let mut initial = HashMap::new();
    initial.insert(
        FeatureType::Data,
        HashMap::from([("bands".to_string(), bands_2d.clone())]),
    );
    assert!(EOPatch::with_features(initial).is_err());

    let mut eop = EOPatch::new();
    assert!(eop.add_feature(FeatureType::Data, "bands", bands_2d.clone()).is_err());
    assert!(eop.add_feature(FeatureType::Mask, "mask", bands_2d.clone()).is_err());
    assert!(eop
        .add_feature(FeatureType::DataTimeless, "bands_timeless", bands_2d.clone())
        .is_err());
    assert!(eop
        .add_feature(FeatureType::MaskTimeless, "mask_timeless", bands_2d.clone())
        .is_err());
    assert!(eop.add_feature(FeatureType::Label, "label", bands_3d.clone()).is_err());
    assert!(eop.add_feature(FeatureType::Scalar, "scalar", bands_3d.clone()).is_err());
    assert!(eop
        .add_feature(FeatureType::LabelTimeless, "label_timeless", bands_2d.clone())
        .is_err());
    assert!(eop
        .add_feature(FeatureType::ScalarTimeless, "scalar_timeless", bands_2d)
        .is_err());

    // Failed inserts leave no trace.
    assert_eq!(eop, EOPatch::new());

    let result = eop.add_feature(FeatureType::Data, "bands", bands_3d);
    match result {
        Err(EOPatchError::DimensionMismatch {
            feature_type,
            field,
            expected,
            actual,
        }) => {
            assert_eq!(feature_type, FeatureType::Data);
            assert_eq!(field, "bands");
            assert_eq!(expected, 4);
            assert_eq!(actual, 3);
        }
        _ => panic!("Expected DimensionMismatch error"),
    }
}

#[test]
fn test_get_features() -> Result<()> {
    let mut eop = EOPatch::new();
    eop.add_feature(FeatureType::Data, "bands", arange(&[2, 3, 3, 2]))?;

    assert_eq!(eop.features()[&FeatureType::Data]["bands"], vec![2, 3, 3, 2]);
    Ok(())
}

#[test]
fn test_concatenate() -> Result<()> {
    let bands1 = arange(&[2, 3, 3, 2]);
    let bands2 = arange(&[3, 3, 3, 2]);

    let mut eop1 = EOPatch::new();
    eop1.add_feature(FeatureType::Data, "bands", bands1.clone())?;

    let mut eop2 = EOPatch::new();
    eop2.add_feature(FeatureType::Data, "bands", bands2.clone())?;

    let eop = EOPatch::concatenate(&eop1, &eop2)?;

    let expected = concatenate(Axis(0), &[bands1.view(), bands2.view()])?;
    assert_eq!(eop.data()["bands"], expected, "Array mismatch");
    assert_eq!(eop.data()["bands"].shape(), &[5, 3, 3, 2]);

    // Inputs are untouched.
    assert_eq!(eop1.data()["bands"], bands1);
    assert_eq!(eop2.data()["bands"], bands2);
    Ok(())
}

#[test]
fn test_concatenate_prohibit_key_mismatch() -> Result<()> {
    let mut eop1 = EOPatch::new();
    eop1.add_feature(FeatureType::Data, "bands", arange(&[2, 3, 3, 2]))?;

    let mut eop2 = EOPatch::new();
    eop2.add_feature(FeatureType::Data, "measurements", arange(&[3, 3, 3, 2]))?;

    let result = EOPatch::concatenate(&eop1, &eop2);
    match result {
        Err(EOPatchError::KeySetMismatch { feature_type, .. }) => {
            assert_eq!(feature_type, FeatureType::Data);
        }
        _ => panic!("Expected KeySetMismatch error"),
    }
    Ok(())
}

#[test]
fn test_concatenate_prohibit_non_time_shape_mismatch() -> Result<()> {
    let mut eop1 = EOPatch::new();
    eop1.add_feature(FeatureType::Data, "bands", arange(&[2, 3, 3, 2]))?;

    let mut eop2 = EOPatch::new();
    eop2.add_feature(FeatureType::Data, "bands", arange(&[2, 4, 3, 2]))?;

    // Same field on both sides, but the height axis disagrees.
    let result = EOPatch::concatenate(&eop1, &eop2);
    assert!(matches!(result, Err(EOPatchError::ArrayError(_))));
    Ok(())
}

#[test]
fn test_concatenate_leave_out_timeless_mismatched_keys() -> Result<()> {
    let mask1 = arange(&[3, 3, 2]);
    let mask2 = arange(&[3, 3, 2]);

    let mut eop1 = EOPatch::new();
    eop1.add_feature(FeatureType::DataTimeless, "mask1", mask1.clone())?;
    eop1.add_feature(FeatureType::DataTimeless, "mask", mask1.mapv(|v| 5.0 * v))?;

    let mut eop2 = EOPatch::new();
    eop2.add_feature(FeatureType::DataTimeless, "mask2", mask2)?;
    eop2.add_feature(FeatureType::DataTimeless, "mask", mask1.mapv(|v| 5.0 * v))?;

    let eop = EOPatch::concatenate(&eop1, &eop2)?;

    assert!(!eop.data_timeless().contains_key("mask1"));
    assert!(!eop.data_timeless().contains_key("mask2"));
    assert!(eop.data_timeless().contains_key("mask"));
    Ok(())
}

#[test]
fn test_concatenate_leave_out_keys_with_mismatched_value() -> Result<()> {
    let mask = arange(&[3, 3, 2]);

    let mut eop1 = EOPatch::new();
    eop1.add_feature(FeatureType::DataTimeless, "mask", mask.clone())?;
    eop1.add_feature(FeatureType::DataTimeless, "nask", mask.mapv(|v| 3.0 * v))?;

    let mut eop2 = EOPatch::new();
    eop2.add_feature(FeatureType::DataTimeless, "mask", mask.clone())?;
    eop2.add_feature(FeatureType::DataTimeless, "nask", mask.mapv(|v| 5.0 * v))?;

    let eop = EOPatch::concatenate(&eop1, &eop2)?;

    assert!(eop.data_timeless().contains_key("mask"));
    assert!(!eop.data_timeless().contains_key("nask"));
    assert_eq!(eop.data_timeless()["mask"], mask);
    Ok(())
}

#[test]
fn test_concatenate_scalar_along_time() -> Result<()> {
    let mut eop1 = EOPatch::new();
    eop1.add_feature(FeatureType::Scalar, "cloud_coverage", arange(&[2, 1]))?;

    let mut eop2 = EOPatch::new();
    eop2.add_feature(FeatureType::Scalar, "cloud_coverage", arange(&[3, 1]))?;

    let eop = EOPatch::concatenate(&eop1, &eop2)?;
    assert_eq!(eop.scalar()["cloud_coverage"].shape(), &[5, 1]);
    Ok(())
}

#[test]
fn test_equals() -> Result<()> {
    let eop1_init = HashMap::from([(
        FeatureType::Data,
        HashMap::from([("bands".to_string(), arange(&[2, 3, 3, 2]))]),
    )]);
    let eop2_init = HashMap::from([(
        FeatureType::Data,
        HashMap::from([("bands".to_string(), arange(&[2, 3, 3, 2]))]),
    )]);

    let mut eop1 = EOPatch::with_features(eop1_init)?;
    let eop2 = EOPatch::with_features(eop2_init)?;

    assert_eq!(eop1, eop1, "Equality not reflexive");
    assert_eq!(eop1, eop2);
    assert_eq!(eop2, eop1, "Equality not symmetric");

    eop1.add_feature(FeatureType::DataTimeless, "dem", arange(&[3, 3, 2]))?;
    assert_ne!(eop1, eop2);
    assert_ne!(eop2, eop1);
    Ok(())
}

#[test]
fn test_equals_detects_modified_value() -> Result<()> {
    let mut eop1 = EOPatch::new();
    eop1.add_feature(FeatureType::ScalarTimeless, "height", arange(&[4]))?;

    let mut eop2 = eop1.clone();
    assert_eq!(eop1, eop2);

    eop2.add_feature(FeatureType::ScalarTimeless, "height", arange(&[4]).mapv(|v| v + 1.0))?;
    assert_ne!(eop1, eop2);
    Ok(())
}

#[test]
fn test_error_display() {
    let dim_err = EOPatchError::DimensionMismatch {
        feature_type: FeatureType::Data,
        field: "bands".to_string(),
        expected: 4,
        actual: 2,
    };
    assert!(format!("{}", dim_err).contains("'bands'"));
    assert!(format!("{}", dim_err).contains("4"));

    let missing_err = EOPatchError::FeatureNotFound {
        feature_type: FeatureType::MaskTimeless,
        field: "valid".to_string(),
    };
    assert!(format!("{}", missing_err).contains("Feature 'valid' not found"));

    let key_err = EOPatchError::KeySetMismatch {
        feature_type: FeatureType::Data,
        field: "measurements".to_string(),
    };
    assert!(format!("{}", key_err).contains("only one"));
}
