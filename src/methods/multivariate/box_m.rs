use std::hash::Hash;

use indexmap::IndexMap;
use nalgebra::{Cholesky, DMatrix, DVector, RealField};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use statrs::function::factorial::binomial;

use crate::matrix::{check_group_labels, ensure_no_nan, group_rows};
use crate::methods::moments::covariance;
use crate::{Error, Float, from_f64, to_f64};

/// Holds the result of Box's M test together with the matrices it was computed from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct BoxMComputation<T: Float + RealField, G: Eq + Hash> {
    /// Chi-squared approximation of Box's M statistic.
    pub chi_squared: T,

    /// Degrees of freedom of the chi-squared approximation, `(p (p - 1) / 2 + p) (g - 1)`.
    pub parameter: T,

    /// Upper-tail p-value of `chi_squared`.
    pub p_value: T,

    /// Unbiased covariance matrix of each group, in order of first occurrence.
    pub covariances: IndexMap<G, DMatrix<T>>,

    /// Degrees-of-freedom weighted average of the group covariances.
    pub pooled_covariance: DMatrix<T>,

    /// Natural logarithm of the determinant of each group covariance, in the same order as
    /// `covariances`.
    pub log_determinants: DVector<T>,
}

/// Performs Box's M test for the homogeneity of covariance matrices across groups.
///
/// Rows of `data` are observations, and `groups` assigns each row to a group. Each group
/// covariance is compared against the pooled covariance through their log-determinants, and the
/// resulting statistic is corrected for small samples and referred to a chi-squared distribution.
///
/// Needs at least 2 groups with at least 2 observations each. A group with fewer degrees of
/// freedom than variables has a singular covariance: a warning is logged, and the test then fails
/// with [`Error::SingularMatrix`] unless rounding leaves the determinant positive.
///
/// # Examples
///
/// ```
/// use nalgebra::DMatrix;
/// use ordistat::multivariate::box_mtest;
///
/// let data = DMatrix::from_row_slice(
///     10,
///     2,
///     &[
///         1.0, 2.0, 2.0, 1.5, 3.0, 3.5, 4.0, 3.0, 2.5, 1.0, //
///         1.2, 2.1, 2.2, 1.4, 2.9, 3.8, 4.1, 2.7, 2.4, 1.3,
///     ],
/// );
/// let groups = ['a', 'a', 'a', 'a', 'a', 'b', 'b', 'b', 'b', 'b'];
///
/// let result = box_mtest(&data, &groups).unwrap();
/// assert_eq!(result.parameter, 3.0);
/// assert!(result.p_value > 0.05);
/// assert_eq!(result.covariances.len(), 2);
/// ```
pub fn box_mtest<T: Float + RealField, G: Eq + Hash + Clone>(
    data: &DMatrix<T>,
    groups: &[G],
) -> Result<BoxMComputation<T, G>, Error> {
    let (n, p) = data.shape();

    if p == 0 {
        return Err(Error::InsufficientVariables {
            given: 0,
            needed: 1,
        });
    }

    check_group_labels(groups, n)?;
    ensure_no_nan(data)?;

    let partition = group_rows(groups);
    let n_groups = partition.len();

    if n_groups < 2 {
        return Err(Error::InvalidArgument(format!(
            "Box's M test needs at least 2 groups, but was given {n_groups}."
        )));
    }

    if let Some(rows) = partition.values().find(|rows| rows.len() < 2) {
        return Err(Error::InsufficientSampleSize {
            given: rows.len(),
            needed: 2,
        });
    }

    let small_groups = partition.values().filter(|rows| rows.len() - 1 < p).count();

    if small_groups > 0 {
        log::warn!(
            "Box's M test: {small_groups} group(s) have fewer degrees of freedom than the {p} \
             variables, their covariance matrices are likely singular"
        );
    }

    let mut covariances = IndexMap::with_capacity(n_groups);
    let mut dofs = Vec::with_capacity(n_groups);
    let mut log_dets = Vec::with_capacity(n_groups);
    let mut pooled = DMatrix::<T>::zeros(p, p);

    for (index, (label, rows)) in partition.into_iter().enumerate() {
        let subset = data.select_rows(&rows);
        let cov = covariance(&subset, 1)?;
        let dof = (rows.len() - 1) as f64;

        pooled += &cov * from_f64::<T>(dof);
        log_dets.push(log_determinant(&cov, || format!("The covariance matrix of group #{index}"))?);
        dofs.push(dof);
        covariances.insert(label, cov);
    }

    let total_dof: f64 = dofs.iter().sum();
    let total_inv_dof: f64 = dofs.iter().map(|d| 1.0 / d).sum();
    pooled /= from_f64::<T>(total_dof);

    let pooled_log_det = log_determinant(&pooled, || "The pooled covariance matrix".into())?;
    let box_log = total_dof * pooled_log_det
        - log_dets.iter().zip(&dofs).map(|(log_det, dof)| log_det * dof).sum::<f64>();

    let p_f64 = p as f64;
    let g_f64 = n_groups as f64;
    let co = ((2.0 * p_f64 * p_f64 + 3.0 * p_f64 - 1.0) / (6.0 * (p_f64 + 1.0) * (g_f64 - 1.0)))
        * (total_inv_dof - 1.0 / total_dof);
    let chi_squared = box_log * (1.0 - co);
    let parameter = (binomial(p as u64, 2) + p_f64) * (g_f64 - 1.0);
    let p_value = ChiSquared::new(parameter)?.sf(chi_squared);

    log::debug!(
        "box_mtest: groups = {n_groups}, pooled log det = {pooled_log_det}, M = {box_log}, \
         correction = {co}, chi2 = {chi_squared}, df = {parameter}"
    );

    Ok(BoxMComputation {
        chi_squared: from_f64(chi_squared),
        parameter: from_f64(parameter),
        p_value: from_f64(p_value),
        covariances,
        pooled_covariance: pooled,
        log_determinants: DVector::from_iterator(
            n_groups,
            log_dets.into_iter().map(from_f64::<T>),
        ),
    })
}

/// `ln det(cov)` through the Cholesky factor: twice the sum of the logs of its diagonal.
fn log_determinant<T: Float + RealField>(
    cov: &DMatrix<T>,
    describe: impl FnOnce() -> String,
) -> Result<f64, Error> {
    let l = Cholesky::new(cov.clone())
        .ok_or_else(|| Error::SingularMatrix(describe()))?
        .l();

    Ok(2.0 * l.diagonal().iter().map(|&v| to_f64(v).ln()).sum::<f64>())
}
