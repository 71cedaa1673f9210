use std::f64::consts::TAU;
use std::hash::Hash;
use std::str::FromStr;

use indexmap::IndexMap;
use nalgebra::{Cholesky, DMatrix, RealField};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

use crate::matrix::{check_group_labels, ensure_no_nan, group_rows};
use crate::methods::moments::covariance;
use crate::{Error, Float, from_f64};

/// What a confidence ellipse encloses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum EllipseMethod {
    /// The expected dispersion of individual observations.
    Deviation,

    /// The expected location of the group mean (standard error region). Narrower than
    /// [`Deviation`](EllipseMethod::Deviation) by a factor of `sqrt(n)`.
    Error,
}

impl FromStr for EllipseMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deviation" => Ok(Self::Deviation),
            "error" => Ok(Self::Error),
            other => Err(Error::InvalidArgument(format!(
                "Method should be either 'deviation' or 'error', but was given '{other}'."
            ))),
        }
    }
}

/// Radius of the confidence ellipse of `n` bivariate observations, in units of the Cholesky
/// factor of their covariance.
///
/// For [`EllipseMethod::Deviation`] this is `sqrt(2 * F(level; 2, n - 1))` where `F` is the
/// quantile function of the F distribution; [`EllipseMethod::Error`] divides it by `sqrt(n)`.
///
/// # Examples
///
/// ```
/// use assert_float_eq::assert_float_relative_eq;
/// use ordistat::{EllipseMethod, ellipse_radius};
///
/// let deviation = ellipse_radius(25, 0.95, EllipseMethod::Deviation).unwrap();
/// let error = ellipse_radius(25, 0.95, EllipseMethod::Error).unwrap();
///
/// assert_float_relative_eq!(error, deviation / 5.0, 1e-12);
/// ```
pub fn ellipse_radius(n: usize, level: f64, method: EllipseMethod) -> Result<f64, Error> {
    if n < 2 {
        return Err(Error::InsufficientSampleSize {
            given: n,
            needed: 2,
        });
    }

    if !(level > 0.0 && level < 1.0) {
        return Err(Error::InvalidArgument(format!(
            "Confidence level must lie in (0, 1), but was given {level}."
        )));
    }

    let f_dist = FisherSnedecor::new(2.0, (n - 1) as f64)?;
    let radius = (2.0 * f_dist.inverse_cdf(level)).sqrt();

    Ok(match method {
        EllipseMethod::Deviation => radius,
        EllipseMethod::Error => radius / (n as f64).sqrt(),
    })
}

/// Computes the confidence ellipse of a bivariate sample as a closed polygon.
///
/// `x` must have exactly two columns. The polygon is centered on the column means and shaped by
/// the covariance matrix of `x`: `npoints` angles evenly spaced on the unit circle are mapped
/// through the lower Cholesky factor of the covariance, scaled by [`ellipse_radius`] and
/// translated to the center. The returned matrix has `npoints + 1` rows, the last one repeating
/// the first so the ring is closed.
///
/// Fails with [`Error::SingularMatrix`] when the covariance is not positive definite, e.g. when
/// every observation lies on a line.
///
/// # Examples
///
/// ```
/// use nalgebra::DMatrix;
/// use ordistat::{EllipseMethod, ellipse};
///
/// let x = DMatrix::from_row_slice(5, 2, &[1.0, 2.0, 2.0, 1.0, 3.0, 3.0, 4.0, 2.0, 2.5, 2.5]);
/// let polygon = ellipse(&x, 0.95, EllipseMethod::Deviation, 4).unwrap();
///
/// assert_eq!(polygon.nrows(), 5);
/// assert_eq!(polygon.row(0), polygon.row(4));
/// ```
pub fn ellipse<T: Float + RealField>(
    x: &DMatrix<T>,
    level: f64,
    method: EllipseMethod,
    npoints: usize,
) -> Result<DMatrix<T>, Error> {
    if x.ncols() != 2 {
        return Err(Error::InvalidArgument(format!(
            "An ellipse needs data with 2 columns, but was given {}.",
            x.ncols()
        )));
    }

    if npoints == 0 {
        return Err(Error::InvalidArgument(
            "An ellipse needs at least one point.".into(),
        ));
    }

    ensure_no_nan(x)?;

    let n = x.nrows();
    let radius = ellipse_radius(n, level, method)?;
    let center = x.row_mean();
    let cov = covariance(x, 1)?;
    let l = Cholesky::new(cov)
        .ok_or_else(|| Error::SingularMatrix("The covariance matrix of the ellipse".into()))?
        .l();

    log::debug!("ellipse: n = {n}, level = {level}, method = {method:?}, radius = {radius}");

    // Points are `radius * L * (cos, sin)` shifted to the center, with L lower triangular.
    let (l00, l10, l11) = (l[(0, 0)], l[(1, 0)], l[(1, 1)]);
    let radius_t: T = from_f64(radius);
    let step = TAU / npoints as f64;
    let mut polygon = DMatrix::zeros(npoints + 1, 2);

    for k in 0..npoints {
        let angle = k as f64 * step;
        let (cos, sin) = (from_f64::<T>(angle.cos()), from_f64::<T>(angle.sin()));

        polygon[(k, 0)] = center[0] + radius_t * l00 * cos;
        polygon[(k, 1)] = center[1] + radius_t * (l10 * cos + l11 * sin);
    }

    let first = polygon.row(0).clone_owned();
    polygon.set_row(npoints, &first);

    Ok(polygon)
}

/// Computes one confidence ellipse per group of a two-column score matrix.
///
/// Rows of `scores` are partitioned by `groups` and [`ellipse`] is applied to each subset. The
/// map keeps groups in the order of their first occurrence, the order in which an ordination plot
/// assigns them colors.
///
/// # Examples
///
/// ```
/// use nalgebra::DMatrix;
/// use ordistat::{EllipseMethod, group_ellipses};
///
/// let scores = DMatrix::from_row_slice(
///     8,
///     2,
///     &[
///         1.0, 2.0, 2.0, 1.0, 3.0, 3.0, 4.0, 2.0, //
///         -1.0, -2.0, -2.0, -1.0, -3.0, -3.0, -4.0, -2.0,
///     ],
/// );
/// let groups = ["north", "north", "north", "north", "south", "south", "south", "south"];
///
/// let ellipses = group_ellipses(&scores, &groups, 0.95, EllipseMethod::Error, 50).unwrap();
///
/// assert_eq!(ellipses.keys().copied().collect::<Vec<_>>(), vec!["north", "south"]);
/// assert_eq!(ellipses["south"].nrows(), 51);
/// ```
pub fn group_ellipses<T: Float + RealField, G: Eq + Hash + Clone>(
    scores: &DMatrix<T>,
    groups: &[G],
    level: f64,
    method: EllipseMethod,
    npoints: usize,
) -> Result<IndexMap<G, DMatrix<T>>, Error> {
    check_group_labels(groups, scores.nrows())?;

    group_rows(groups)
        .into_iter()
        .map(|(label, rows)| {
            let subset = scores.select_rows(&rows);
            ellipse(&subset, level, method, npoints).map(|polygon| (label, polygon))
        })
        .collect()
}
