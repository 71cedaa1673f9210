use nalgebra::{DMatrix, DVector, RealField};

use crate::matrix::ensure_no_nan;
use crate::{Error, Float, from_f64, to_f64};

/// The direction along which a matrix is reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Axis {
    /// Reduce down the rows: one statistic per column (per variable).
    Rows,

    /// Reduce across the columns: one statistic per row (per observation).
    Columns,
}

/// Mean and standard deviation returned by [`mean_and_std`].
///
/// A statistic that was not requested is `None`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Moments<T: Float + RealField> {
    /// The (weighted) average along the reduced axis.
    pub mean: Option<DVector<T>>,

    /// The (weighted) standard deviation along the reduced axis.
    pub std: Option<DVector<T>>,
}

/// Computes the weighted average and standard deviation of `a` along `axis`.
///
/// With `axis` set to `None` the matrix is flattened and the returned vectors hold a single value.
///
/// Without `weights` this is the arithmetic mean and the standard deviation with `ddof` subtracted
/// from the number of reduced elements. With `weights`, the variance is the weighted average of
/// squared deviations, multiplied by `m / (m - ddof)` when `ddof` is not zero (`m` being the
/// number of reduced elements). Weights hold one entry per element of the reduced axis; when the
/// matrix is flattened they are observation weights, one per row.
///
/// At least one of `with_mean` and `with_std` must be `true`, and `ddof` must be smaller than the
/// number of reduced elements.
///
/// # Examples
///
/// ```
/// use assert_float_eq::assert_float_absolute_eq;
/// use nalgebra::DMatrix;
/// use ordistat::{Axis, mean_and_std};
///
/// let a = DMatrix::from_row_slice(3, 2, &[1.0, 10.0, 2.0, 20.0, 3.0, 60.0]);
///
/// let moments = mean_and_std(&a, Some(Axis::Rows), None, true, true, 0).unwrap();
/// let mean = moments.mean.unwrap();
/// assert_float_absolute_eq!(mean[0], 2.0);
/// assert_float_absolute_eq!(mean[1], 30.0);
///
/// // Heavier weight on the last observation pulls the mean towards it.
/// let weights = [1.0, 1.0, 2.0];
/// let weighted = mean_and_std(&a, Some(Axis::Rows), Some(&weights[..]), true, false, 0).unwrap();
/// assert_float_absolute_eq!(weighted.mean.unwrap()[0], 2.25);
/// assert!(weighted.std.is_none());
/// ```
pub fn mean_and_std<T: Float + RealField>(
    a: &DMatrix<T>,
    axis: Option<Axis>,
    weights: Option<&[T]>,
    with_mean: bool,
    with_std: bool,
    ddof: usize,
) -> Result<Moments<T>, Error> {
    if !(with_mean || with_std) {
        return Err(Error::InvalidArgument(
            "Either the mean or standard deviation need to be computed.".into(),
        ));
    }

    if a.is_empty() {
        return Err(Error::InsufficientSampleSize {
            given: 0,
            needed: 1,
        });
    }

    ensure_no_nan(a)?;

    let (lanes, lane_len, weight_len) = match axis {
        Some(Axis::Rows) => (a.ncols(), a.nrows(), a.nrows()),
        Some(Axis::Columns) => (a.nrows(), a.ncols(), a.ncols()),
        None => (1, a.len(), a.nrows()),
    };

    if with_std && ddof >= lane_len {
        return Err(Error::InvalidArgument(format!(
            "ddof ({ddof}) must be smaller than the number of reduced elements ({lane_len})."
        )));
    }

    let weights = weights.map(|w| validate_weights(w, weight_len)).transpose()?;

    // `k` walks a lane; for a flattened matrix it is the column-major linear index.
    let value = |lane: usize, k: usize| -> f64 {
        let v = match axis {
            Some(Axis::Rows) => a[(k, lane)],
            Some(Axis::Columns) => a[(lane, k)],
            None => a[k],
        };
        to_f64(v)
    };

    let weight = |k: usize| -> f64 {
        weights.as_ref().map_or(1.0, |w| match axis {
            None => w[k % a.nrows()],
            Some(_) => w[k],
        })
    };

    let total_weight: f64 = (0..lane_len).map(&weight).sum();
    let mut means = Vec::with_capacity(lanes);
    let mut stds = Vec::with_capacity(lanes);

    for lane in 0..lanes {
        // Constant lanes: the value itself is the mean and the spread is exactly zero.
        let mut weighted = (0..lane_len).filter(|&k| weight(k) > 0.0).map(|k| value(lane, k));
        let first = weighted.next().unwrap_or(f64::NAN);

        if weighted.all(|v| v == first) {
            means.push(from_f64(first));

            if with_std {
                stds.push(T::zero());
            }

            continue;
        }

        let mean = (0..lane_len).map(|k| weight(k) * value(lane, k)).sum::<f64>() / total_weight;

        if with_std {
            let sum_sq = (0..lane_len)
                .map(|k| weight(k) * (value(lane, k) - mean).powi(2))
                .sum::<f64>();
            let m = lane_len as f64;
            let d = ddof as f64;

            let variance = if weights.is_none() {
                sum_sq / (m - d)
            } else if ddof != 0 {
                sum_sq / total_weight * (m / (m - d))
            } else {
                sum_sq / total_weight
            };

            stds.push(from_f64(variance.sqrt()));
        }

        means.push(from_f64(mean));
    }

    Ok(Moments {
        mean: with_mean.then(|| DVector::from_vec(means)),
        std: with_std.then(|| DVector::from_vec(stds)),
    })
}

fn validate_weights<T: Float + RealField>(
    weights: &[T],
    expected: usize,
) -> Result<Vec<f64>, Error> {
    if weights.len() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            given: weights.len(),
        });
    }

    let weights: Vec<f64> = weights.iter().map(|&w| to_f64(w)).collect();

    if weights.iter().any(|w| w.is_nan()) {
        return Err(Error::ContainsNaN);
    }

    if weights.iter().any(|&w| w < 0.0) {
        return Err(Error::InvalidArgument("Weights must be non-negative.".into()));
    }

    if weights.iter().sum::<f64>() <= 0.0 {
        return Err(Error::InvalidArgument(
            "Weights sum to zero, the average is undefined.".into(),
        ));
    }

    Ok(weights)
}

/// Subtracts `center` from every lane of `a` along `axis`.
///
/// With [`Axis::Rows`] `center` holds one value per column and is subtracted from every row; with
/// [`Axis::Columns`] it holds one value per row and is subtracted from every column.
///
/// # Examples
///
/// ```
/// use nalgebra::{DMatrix, DVector};
/// use ordistat::{Axis, center_along};
///
/// let a = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
///
/// let by_column = center_along(&a, Axis::Rows, &DVector::from_vec(vec![1.0, 2.0, 3.0])).unwrap();
/// assert_eq!(by_column, DMatrix::from_row_slice(2, 3, &[0.0, 0.0, 0.0, 3.0, 3.0, 3.0]));
///
/// let by_row = center_along(&a, Axis::Columns, &DVector::from_vec(vec![2.0, 5.0])).unwrap();
/// assert_eq!(by_row, DMatrix::from_row_slice(2, 3, &[-1.0, 0.0, 1.0, -1.0, 0.0, 1.0]));
/// ```
pub fn center_along<T: Float + RealField>(
    a: &DMatrix<T>,
    axis: Axis,
    center: &DVector<T>,
) -> Result<DMatrix<T>, Error> {
    let mut centered = a.clone();
    center_along_mut(&mut centered, axis, center)?;

    Ok(centered)
}

pub(crate) fn center_along_mut<T: Float + RealField>(
    a: &mut DMatrix<T>,
    axis: Axis,
    center: &DVector<T>,
) -> Result<(), Error> {
    let expected = match axis {
        Axis::Rows => a.ncols(),
        Axis::Columns => a.nrows(),
    };

    if center.len() != expected {
        return Err(Error::DimensionMismatch {
            expected,
            given: center.len(),
        });
    }

    match axis {
        Axis::Rows => {
            for (j, mut column) in a.column_iter_mut().enumerate() {
                column.add_scalar_mut(-center[j]);
            }
        },
        Axis::Columns => {
            for (i, mut row) in a.row_iter_mut().enumerate() {
                row.add_scalar_mut(-center[i]);
            }
        },
    }

    Ok(())
}

/// Computes the `p × p` covariance matrix of the columns of `a`, dividing by `n - ddof`.
///
/// `ddof = 1` gives the unbiased estimator, `ddof = 0` the maximum likelihood one.
///
/// # Examples
///
/// ```
/// use assert_float_eq::assert_float_absolute_eq;
/// use nalgebra::DMatrix;
/// use ordistat::covariance;
///
/// let a = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 2.0, 1.0, 3.0, 3.0, 4.0, 2.0]);
/// let cov = covariance(&a, 1).unwrap();
///
/// assert_float_absolute_eq!(cov[(0, 0)], 5.0 / 3.0);
/// assert_float_absolute_eq!(cov[(1, 1)], 2.0 / 3.0);
/// assert_float_absolute_eq!(cov[(0, 1)], 1.0 / 3.0);
/// ```
pub fn covariance<T: Float + RealField>(a: &DMatrix<T>, ddof: usize) -> Result<DMatrix<T>, Error> {
    let n = a.nrows();

    if n <= ddof {
        return Err(Error::InsufficientSampleSize {
            given: n,
            needed: ddof + 1,
        });
    }

    let mean = a.row_mean_tr();
    let centered = center_along(a, Axis::Rows, &mean)?;
    let divisor: T = from_f64((n - ddof) as f64);

    Ok(centered.tr_mul(&centered) / divisor)
}
