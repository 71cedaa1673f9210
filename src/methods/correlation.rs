use nalgebra::{DMatrix, RealField};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::methods::scale::scale;
use crate::{Error, Float, from_f64, to_f64};

/// Computes the correlation between the columns of `x`, or between the columns of `x` and `y`.
///
/// Correlation is the covariance of column-standardized matrices: each matrix is centered and
/// scaled to unit variance with `ddof = 0`, then the cross product is divided by `n`.
///
/// The result has shape `p × q`, or `p × p` when `y` is `None`. Constant columns correlate as 0
/// with everything, themselves included.
///
/// # Examples
///
/// ```
/// use assert_float_eq::assert_float_absolute_eq;
/// use nalgebra::DMatrix;
/// use ordistat::corr;
///
/// let x = DMatrix::from_row_slice(4, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0, 4.0, 8.0]);
/// let y = DMatrix::from_row_slice(4, 1, &[4.0, 3.0, 2.0, 1.0]);
///
/// let xx = corr(&x, None).unwrap();
/// assert_float_absolute_eq!(xx[(0, 1)], 1.0);
///
/// let xy = corr(&x, Some(&y)).unwrap();
/// assert_eq!(xy.shape(), (2, 1));
/// assert_float_absolute_eq!(xy[(0, 0)], -1.0);
/// ```
pub fn corr<T: Float + RealField>(
    x: &DMatrix<T>,
    y: Option<&DMatrix<T>>,
) -> Result<DMatrix<T>, Error> {
    let n = x.nrows();

    if let Some(y) = y {
        if y.nrows() != n {
            return Err(Error::DimensionMismatch {
                expected: n,
                given: y.nrows(),
            });
        }
    }

    let x_scaled = scale(x, None, true, true, 0)?;
    let y_scaled = y.map(|y| scale(y, None, true, true, 0)).transpose()?;
    let y_scaled = y_scaled.as_ref().unwrap_or(&x_scaled);

    // Scaling used ddof = 0, so the covariance divides by n as well.
    let n_t: T = from_f64(n as f64);

    Ok(x_scaled.tr_mul(y_scaled) / n_t)
}

/// Pearson correlation between two columns together with its significance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct CorrelationTest<T: Float> {
    /// Index of the first column.
    pub first: usize,

    /// Index of the second column, always greater than `first`.
    pub second: usize,

    /// Pearson's correlation coefficient.
    pub coefficient: T,

    /// Two-sided p-value for the null hypothesis of zero correlation.
    pub p_value: T,

    /// Whether `p_value` is below the requested level.
    pub significant: bool,
}

/// Tests every pair of columns of `x` for non-zero correlation.
///
/// These are the values a scatterplot matrix annotates in its upper triangle. The p-value comes
/// from Student's t distribution with `n - 2` degrees of freedom, applied to
/// `t = r * sqrt((n - 2) / (1 - r^2))`. Pairs are returned in row-major order of the upper
/// triangle: `(0, 1), (0, 2), ..., (1, 2), ...`.
///
/// Needs at least 3 observations and 2 columns, and `level` must lie in `(0, 1)`.
///
/// # Examples
///
/// ```
/// use nalgebra::DMatrix;
/// use ordistat::pairwise_correlation_tests;
///
/// let x = DMatrix::from_row_slice(
///     6,
///     3,
///     &[
///         1.0, 2.1, 0.3, 2.0, 3.9, -0.2, 3.0, 6.2, 0.1, 4.0, 8.1, 0.4, 5.0, 9.8, -0.3, 6.0, 12.2,
///         0.0,
///     ],
/// );
///
/// let tests = pairwise_correlation_tests(&x, 0.05).unwrap();
/// assert_eq!(tests.len(), 3);
///
/// assert_eq!((tests[0].first, tests[0].second), (0, 1));
/// assert!(tests[0].significant);
/// assert!(tests[1].p_value > 0.05);
/// ```
pub fn pairwise_correlation_tests<T: Float + RealField>(
    x: &DMatrix<T>,
    level: f64,
) -> Result<Vec<CorrelationTest<T>>, Error> {
    let (n, p) = x.shape();

    if n < 3 {
        return Err(Error::InsufficientSampleSize {
            given: n,
            needed: 3,
        });
    }

    if p < 2 {
        return Err(Error::InsufficientVariables {
            given: p,
            needed: 2,
        });
    }

    if !(level > 0.0 && level < 1.0) {
        return Err(Error::InvalidArgument(format!(
            "Significance level must lie in (0, 1), but was given {level}."
        )));
    }

    let r = corr(x, None)?;
    let df = (n - 2) as f64;
    let t_dist = StudentsT::new(0.0, 1.0, df)?;
    let pairs: Vec<(usize, usize)> =
        (0..p).flat_map(|i| (i + 1..p).map(move |j| (i, j))).collect();

    let tests = into_iter_if_parallel!(pairs)
        .map(|(i, j)| {
            let coefficient = to_f64(r[(i, j)]).clamp(-1.0, 1.0);
            let residual = 1.0 - coefficient * coefficient;

            let p_value = if residual <= 0.0 {
                0.0
            } else {
                let t = coefficient * (df / residual).sqrt();
                (2.0 * t_dist.sf(t.abs())).min(1.0)
            };

            CorrelationTest {
                first: i,
                second: j,
                coefficient: from_f64(coefficient),
                p_value: from_f64(p_value),
                significant: p_value < level,
            }
        })
        .collect();

    Ok(tests)
}

#[cfg(all(feature = "serde", test))]
mod correlation_test_serde_test {
    use serde_test::{Token, assert_ser_tokens};

    use super::CorrelationTest;

    #[test]
    fn test_correlation_test_tokens() {
        let test = CorrelationTest {
            first: 0,
            second: 2,
            coefficient: 0.5,
            p_value: 0.01,
            significant: true,
        };

        let expected_tokens = vec![
            Token::Struct {
                name: "CorrelationTest",
                len: 5,
            },
            Token::Str("first"),
            Token::U64(0),
            Token::Str("second"),
            Token::U64(2),
            Token::Str("coefficient"),
            Token::F64(0.5),
            Token::Str("p_value"),
            Token::F64(0.01),
            Token::Str("significant"),
            Token::Bool(true),
            Token::StructEnd,
        ];

        assert_ser_tokens(&test, &expected_tokens);
    }
}
