use nalgebra::{DMatrix, RealField};
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

use crate::matrix::ensure_no_nan;
use crate::methods::moments::{Axis, center_along};
use crate::{Error, Float, from_f64, to_f64};

/// Holds the statistics and p-values of Mardia's skewness and kurtosis tests.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MardiaComputation<T: Float> {
    /// Multivariate skewness: the mean of the cubed Mahalanobis cross products.
    pub g1p: T,

    /// Skewness statistic `n * g1p / 6`, chi-squared distributed under normality.
    pub chi_skew: T,

    /// Upper-tail p-value of `chi_skew`.
    pub p_value_skew: T,

    /// Skewness statistic with the small-sample correction factor applied.
    pub chi_small_skew: T,

    /// Upper-tail p-value of `chi_small_skew`.
    pub p_value_small: T,

    /// Multivariate kurtosis: the mean of the squared Mahalanobis distances.
    pub g2p: T,

    /// Standardized kurtosis, standard normal under normality.
    pub z_kurtosis: T,

    /// Two-sided p-value of `z_kurtosis`.
    pub p_value_kurtosis: T,
}

/// Performs Mardia’s skewness and kurtosis tests to assess multivariate normality.
///
/// `data` holds observations in rows. The data are centered, and the Mahalanobis cross products
/// `D = X_c S^-1 X_c'` are computed from the covariance `S`. With `cov` set to `true`, `S` is the
/// maximum likelihood covariance (divisor `n`); otherwise the unbiased one (divisor `n - 1`).
///
/// Skewness is tested against a chi-squared distribution with `p (p + 1) (p + 2) / 6` degrees of
/// freedom, both raw and with the small-sample correction; kurtosis against the standard normal.
///
/// Needs at least 2 variables. Fails with [`Error::SingularMatrix`] when `S` cannot be inverted,
/// which is always the case when `n <= p`.
///
/// # Examples
///
/// ```
/// use nalgebra::DMatrix;
/// use ordistat::multivariate::mardia_test;
///
/// let data = DMatrix::from_row_slice(
///     8,
///     2,
///     &[
///         0.1, 0.2, 0.5, 0.1, -0.2, 0.3, 0.0, 0.0, 0.8, -0.5, -0.4, -0.1, 0.3, 0.6, -0.6, 0.2,
///     ],
/// );
///
/// let result = mardia_test(&data, true).unwrap();
/// assert!(result.p_value_skew > 0.05);
/// assert!(result.p_value_kurtosis > 0.05);
/// assert!(result.chi_small_skew > result.chi_skew);
/// ```
pub fn mardia_test<T: Float + RealField>(
    data: &DMatrix<T>,
    cov: bool,
) -> Result<MardiaComputation<T>, Error> {
    let (n, p) = data.shape();

    if p < 2 {
        return Err(Error::InsufficientVariables {
            given: p,
            needed: 2,
        });
    }

    if n < 2 {
        return Err(Error::InsufficientSampleSize {
            given: n,
            needed: 2,
        });
    }

    ensure_no_nan(data)?;

    let (g1p, g2p) = calculate_mardia_moments(data, cov)?;
    let n_f64 = n as f64;
    let p_f64 = p as f64;
    let df = p_f64 * (p_f64 + 1.0) * (p_f64 + 2.0) / 6.0;
    let k = ((p_f64 + 1.0) * (n_f64 + 1.0) * (n_f64 + 3.0))
        / (n_f64 * ((n_f64 + 1.0) * (p_f64 + 1.0) - 6.0));

    let chi_skew = n_f64 * g1p / 6.0;
    let chi_small_skew = n_f64 * k * g1p / 6.0;
    let z_kurtosis =
        (g2p - p_f64 * (p_f64 + 2.0)) * (n_f64 / (8.0 * p_f64 * (p_f64 + 2.0))).sqrt();

    let dist_skew = ChiSquared::new(df)?;
    let dist_kurt = Normal::new(0.0, 1.0)?;
    let p_value_skew = dist_skew.sf(chi_skew);
    let p_value_small = dist_skew.sf(chi_small_skew);
    let p_value_kurtosis = 2.0 * dist_kurt.sf(z_kurtosis.abs());

    log::debug!(
        "mardia: n = {n}, p = {p}, g1p = {g1p}, g2p = {g2p}, skew = {chi_skew}, z = {z_kurtosis}"
    );

    Ok(MardiaComputation {
        g1p: from_f64(g1p),
        chi_skew: from_f64(chi_skew),
        p_value_skew: from_f64(p_value_skew),
        chi_small_skew: from_f64(chi_small_skew),
        p_value_small: from_f64(p_value_small),
        g2p: from_f64(g2p),
        z_kurtosis: from_f64(z_kurtosis),
        p_value_kurtosis: from_f64(p_value_kurtosis),
    })
}

fn calculate_mardia_moments<T: Float + RealField>(
    x_mat: &DMatrix<T>,
    use_population_covariance: bool,
) -> Result<(f64, f64), Error> {
    let n = x_mat.nrows();
    let n_f64 = n as f64;
    let x_centered = center_along(x_mat, Axis::Rows, &x_mat.row_mean_tr())?;

    let s_raw = x_centered.tr_mul(&x_centered);
    let s_mat = if use_population_covariance {
        s_raw / from_f64::<T>(n_f64)
    } else {
        s_raw / from_f64::<T>(n_f64 - 1.0)
    };

    let s_inv = s_mat
        .try_inverse()
        .ok_or_else(|| Error::SingularMatrix("The sample covariance matrix".into()))?;

    let d_mat = &x_centered * s_inv * x_centered.transpose();
    let sum_d_cubed: f64 = d_mat.iter().map(|&v| to_f64(v).powi(3)).sum();
    let g1p = sum_d_cubed / (n_f64 * n_f64);
    let sum_diag_sq: f64 = d_mat.diagonal().iter().map(|&v| to_f64(v).powi(2)).sum();
    let g2p = sum_diag_sq / n_f64;

    Ok((g1p, g2p))
}
