use assert_float_eq::{assert_float_absolute_eq, assert_float_relative_eq};
use nalgebra::{DMatrix, DVector};
use ordistat::{
    Axis,
    Error,
    ErrorKind,
    center_along,
    covariance,
    mean_and_std,
    scale,
    scale_in_place,
};

fn column_mean_and_std(m: &DMatrix<f64>, j: usize) -> (f64, f64) {
    let column = m.column(j);
    let n = column.len() as f64;
    let mean = column.sum() / n;
    let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    (mean, var.sqrt())
}

#[test]
fn scale_centers_and_reduces_columns() {
    let x = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 2.0, 1.0, 3.0, 3.0, 4.0, 2.0]);
    let scaled = scale(&x, None, true, true, 0).unwrap();

    for j in 0..2 {
        let (mean, std) = column_mean_and_std(&scaled, j);
        assert_float_absolute_eq!(mean, 0.0, 1e-12);
        assert_float_absolute_eq!(std, 1.0, 1e-12);
    }

    // The input is left untouched.
    assert_eq!(x[(0, 0)], 1.0);
}

#[test]
fn scale_maps_constant_columns_to_zero() {
    let x = DMatrix::from_row_slice(3, 2, &[1.0, 7.5, 2.0, 7.5, 6.0, 7.5]);
    let scaled = scale(&x, None, true, true, 0).unwrap();

    for i in 0..3 {
        assert_eq!(scaled[(i, 1)], 0.0);
    }

    assert!(scaled.iter().all(|v: &f64| v.is_finite()));
}

#[test]
fn scale_maps_inexact_constants_to_zero() {
    for constant in [0.1, 0.3, 1e-7, -2.7] {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, constant, 2.0, constant, 6.0, constant]);

        for ddof in [0, 1] {
            let scaled = scale(&x, None, true, true, ddof).unwrap();

            for i in 0..3 {
                assert_eq!(scaled[(i, 1)], 0.0, "constant {constant}, ddof {ddof}");
            }
        }

        let moments = mean_and_std(&x, Some(Axis::Rows), None, true, true, 0).unwrap();
        assert_eq!(moments.mean.unwrap()[1], constant);
        assert_eq!(moments.std.unwrap()[1], 0.0);
    }
}

#[test]
fn weighted_constant_column_has_no_spread() {
    let x = DMatrix::from_row_slice(4, 2, &[1.0, 0.1, 3.0, 0.1, 4.0, 0.1, 10.0, 0.1]);
    let weights = [2.0, 1.0, 0.3, 0.5];

    let moments = mean_and_std(&x, Some(Axis::Rows), Some(&weights[..]), true, true, 1).unwrap();
    assert_eq!(moments.mean.unwrap()[1], 0.1);
    assert_eq!(moments.std.unwrap()[1], 0.0);

    let scaled = scale(&x, Some(&weights[..]), true, true, 0).unwrap();
    assert!(scaled.column(1).iter().all(|&v| v == 0.0));
}

#[test]
fn zero_weights_do_not_break_a_constant_lane() {
    let a = DMatrix::from_row_slice(3, 1, &[0.1, 0.1, 5.0]);
    let moments = mean_and_std(&a, Some(Axis::Rows), Some(&[1.0, 3.0, 0.0][..]), true, true, 0)
        .unwrap();

    assert_eq!(moments.mean.unwrap()[0], 0.1);
    assert_eq!(moments.std.unwrap()[0], 0.0);
}

#[test]
fn scale_without_centering_only_divides() {
    let x = DMatrix::from_row_slice(4, 1, &[1.0, 3.0, 4.0, 10.0]);
    let scaled = scale(&x, None, false, true, 1).unwrap();
    let sample_std = (x.column(0).iter().map(|v: &f64| (v - 4.5).powi(2)).sum::<f64>() / 3.0).sqrt();

    assert_float_relative_eq!(scaled[(3, 0)], 10.0 / sample_std, 1e-12);
}

#[test]
fn scale_in_place_matches_scale() {
    let x = DMatrix::from_row_slice(5, 3, &[
        0.2, 1.0, -3.0, 0.4, 2.0, -1.0, 0.1, 2.5, -2.0, 0.9, 0.5, 0.0, 0.3, 1.5, -4.0,
    ]);
    let weights = [1.0, 2.0, 0.5, 1.0, 3.0];

    let scaled = scale(&x, Some(&weights[..]), true, true, 1).unwrap();
    let mut in_place = x.clone();
    scale_in_place(&mut in_place, Some(&weights[..]), true, true, 1).unwrap();

    assert_eq!(scaled, in_place);
}

#[test]
fn scale_in_place_leaves_input_alone_on_error() {
    let mut x = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    let original = x.clone();

    assert!(scale_in_place(&mut x, Some(&[1.0][..]), true, true, 0).is_err());
    assert_eq!(x, original);
}

#[test]
fn weighted_moments_along_rows() {
    let a = DMatrix::from_row_slice(4, 1, &[1.0, 3.0, 4.0, 10.0]);
    let weights = [2.0, 1.0, 1.0, 0.5];

    let biased = mean_and_std(&a, Some(Axis::Rows), Some(&weights[..]), true, true, 0).unwrap();
    assert_float_relative_eq!(biased.mean.unwrap()[0], 3.111_111_111_111_111, 1e-12);
    assert_float_relative_eq!(biased.std.unwrap()[0], 2.726_187_588_085_622, 1e-12);

    let corrected = mean_and_std(&a, Some(Axis::Rows), Some(&weights[..]), false, true, 1).unwrap();
    assert!(corrected.mean.is_none());
    assert_float_relative_eq!(corrected.std.unwrap()[0], 3.147_930_275_685_301, 1e-12);
}

#[test]
fn weighted_moments_of_flattened_matrix() {
    // Observation weights are broadcast across each row.
    let a = DMatrix::from_row_slice(2, 2, &[1.0, 3.0, 4.0, 10.0]);
    let weights = [2.0, 1.0];

    let moments = mean_and_std(&a, None, Some(&weights[..]), true, true, 0).unwrap();
    let mean = moments.mean.unwrap();
    let std = moments.std.unwrap();

    assert_eq!(mean.len(), 1);
    assert_float_relative_eq!(mean[0], 3.666_666_666_666_666_5, 1e-12);
    assert_float_relative_eq!(std[0], 3.036_811_193_048_1, 1e-12);

    let corrected = mean_and_std(&a, None, Some(&weights[..]), true, true, 2).unwrap();
    assert_float_relative_eq!(corrected.std.unwrap()[0], 4.294_699_575_575_042, 1e-12);
}

#[test]
fn unweighted_moments_along_each_axis() {
    let a = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 6.0, 3.0, 4.0, 8.0]);

    let by_column = mean_and_std(&a, Some(Axis::Rows), None, true, true, 0).unwrap();
    assert_eq!(by_column.mean.unwrap(), DVector::from_vec(vec![2.0, 3.0, 7.0]));
    assert_eq!(by_column.std.unwrap(), DVector::from_vec(vec![1.0, 1.0, 1.0]));

    let by_row = mean_and_std(&a, Some(Axis::Columns), None, true, true, 1).unwrap();
    assert_eq!(by_row.mean.unwrap(), DVector::from_vec(vec![3.0, 5.0]));
    let std = by_row.std.unwrap();
    assert_float_relative_eq!(std[0], 7.0_f64.sqrt(), 1e-12);
    assert_float_relative_eq!(std[1], 7.0_f64.sqrt(), 1e-12);

    let flat = mean_and_std(&a, None, None, true, true, 0).unwrap();
    assert_float_relative_eq!(flat.mean.unwrap()[0], 4.0, 1e-12);
    assert_float_relative_eq!(flat.std.unwrap()[0], (34.0_f64 / 6.0).sqrt(), 1e-12);
}

#[test]
fn uniform_weights_match_unweighted_moments() {
    let a = DMatrix::from_row_slice(5, 2, &[
        0.3, 12.0, 1.7, 8.5, -0.4, 9.1, 2.2, 15.3, 0.9, 11.0,
    ]);

    for w in [0.25, 1.0, 3.7] {
        let weights = [w; 5];

        for ddof in [0, 1] {
            let unweighted = mean_and_std(&a, Some(Axis::Rows), None, true, true, ddof).unwrap();
            let weighted =
                mean_and_std(&a, Some(Axis::Rows), Some(&weights[..]), true, true, ddof).unwrap();

            let (um, us) = (unweighted.mean.unwrap(), unweighted.std.unwrap());
            let (wm, ws) = (weighted.mean.unwrap(), weighted.std.unwrap());

            for j in 0..2 {
                assert_float_relative_eq!(um[j], wm[j], 1e-12);
                assert_float_relative_eq!(us[j], ws[j], 1e-12);
            }
        }
    }
}

#[test]
fn mean_and_std_rejects_bad_arguments() {
    let a = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    let nothing = mean_and_std(&a, Some(Axis::Rows), None, false, false, 0).unwrap_err();
    assert_eq!(nothing.kind(), ErrorKind::InvalidArgument);

    assert_eq!(
        mean_and_std(&a, Some(Axis::Rows), Some(&[1.0, 1.0][..]), true, true, 0),
        Err(Error::DimensionMismatch {
            expected: 3,
            given: 2
        })
    );

    assert!(matches!(
        mean_and_std(&a, Some(Axis::Rows), Some(&[1.0, -1.0, 1.0][..]), true, true, 0),
        Err(Error::InvalidArgument(_))
    ));

    assert!(matches!(
        mean_and_std(&a, Some(Axis::Rows), Some(&[0.0, 0.0, 0.0][..]), true, true, 0),
        Err(Error::InvalidArgument(_))
    ));

    assert!(matches!(
        mean_and_std(&a, Some(Axis::Rows), None, true, true, 3),
        Err(Error::InvalidArgument(_))
    ));

    let with_nan = DMatrix::from_row_slice(2, 1, &[1.0, f64::NAN]);
    assert_eq!(
        mean_and_std(&with_nan, None, None, true, true, 0),
        Err(Error::ContainsNaN)
    );
}

#[test]
fn center_along_checks_the_center_length() {
    let a = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

    assert_eq!(
        center_along(&a, Axis::Rows, &DVector::from_vec(vec![1.0, 2.0])),
        Err(Error::DimensionMismatch {
            expected: 3,
            given: 2
        })
    );
}

#[test]
fn covariance_matches_hand_computation() {
    let a = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 2.0, 1.0, 3.0, 3.0, 4.0, 2.0]);

    let unbiased = covariance(&a, 1).unwrap();
    let biased = covariance(&a, 0).unwrap();

    assert_float_relative_eq!(unbiased[(0, 0)], 5.0 / 3.0, 1e-12);
    assert_float_relative_eq!(unbiased[(0, 1)], 1.0 / 3.0, 1e-12);
    assert_eq!(unbiased[(0, 1)], unbiased[(1, 0)]);
    assert_float_relative_eq!(biased[(1, 1)], 0.5, 1e-12);

    assert_eq!(
        covariance(&DMatrix::from_row_slice(1, 2, &[1.0, 2.0]), 1),
        Err(Error::InsufficientSampleSize {
            given: 1,
            needed: 2
        })
    );
}

#[test]
fn scale_works_in_single_precision() {
    let x = DMatrix::<f32>::from_row_slice(4, 2, &[1.0, 2.0, 2.0, 1.0, 3.0, 3.0, 4.0, 2.0]);
    let scaled = scale(&x, None, true, true, 0).unwrap();

    let mean: f32 = scaled.column(0).sum() / 4.0;
    assert!(mean.abs() < 1e-6);
}
