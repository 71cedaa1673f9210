use nalgebra::{DMatrix, RealField};

use crate::methods::moments::{Axis, Moments, center_along_mut, mean_and_std};
use crate::{Error, Float};

/// Standardizes the columns of `a` to weighted mean 0 and weighted standard deviation 1.
///
/// Returns a new matrix and leaves `a` untouched; see [`scale_in_place`] for the in-place variant.
/// The moments are computed with [`mean_and_std`] along [`Axis::Rows`], so `weights` holds one
/// entry per row and `ddof` follows the same rules.
///
/// A column whose standard deviation is exactly zero is divided by 1 instead, so a constant
/// column comes out as zeros when centered.
///
/// # Examples
///
/// ```
/// use assert_float_eq::assert_float_absolute_eq;
/// use nalgebra::DMatrix;
/// use ordistat::scale;
///
/// let x: DMatrix<f64> = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 2.0, 1.0, 3.0, 3.0, 4.0, 2.0]);
/// let scaled = scale(&x, None, true, true, 0).unwrap();
///
/// for column in scaled.column_iter() {
///     let mean = column.mean();
///     let var = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 4.0;
///
///     assert_float_absolute_eq!(mean, 0.0);
///     assert_float_absolute_eq!(var.sqrt(), 1.0);
/// }
/// ```
pub fn scale<T: Float + RealField>(
    a: &DMatrix<T>,
    weights: Option<&[T]>,
    with_mean: bool,
    with_std: bool,
    ddof: usize,
) -> Result<DMatrix<T>, Error> {
    let mut scaled = a.clone();
    scale_in_place(&mut scaled, weights, with_mean, with_std, ddof)?;

    Ok(scaled)
}

/// Standardizes the columns of `a` in place.
///
/// Same semantics as [`scale`]. On error `a` is left unchanged.
///
/// # Examples
///
/// ```
/// use nalgebra::DMatrix;
/// use ordistat::scale_in_place;
///
/// let mut x = DMatrix::from_row_slice(3, 2, &[1.0, 5.0, 2.0, 5.0, 3.0, 5.0]);
/// scale_in_place(&mut x, None, true, false, 0).unwrap();
///
/// assert_eq!(x, DMatrix::from_row_slice(3, 2, &[-1.0, 0.0, 0.0, 0.0, 1.0, 0.0]));
/// ```
pub fn scale_in_place<T: Float + RealField>(
    a: &mut DMatrix<T>,
    weights: Option<&[T]>,
    with_mean: bool,
    with_std: bool,
    ddof: usize,
) -> Result<(), Error> {
    let Moments { mean, std } = mean_and_std(a, Some(Axis::Rows), weights, with_mean, with_std, ddof)?;

    if let Some(mean) = mean {
        center_along_mut(a, Axis::Rows, &mean)?;
    }

    if let Some(std) = std {
        for (j, mut column) in a.column_iter_mut().enumerate() {
            let divisor = if std[j] == T::zero() { T::one() } else { std[j] };
            column /= divisor;
        }
    }

    Ok(())
}
