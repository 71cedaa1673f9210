//! Building observation matrices and splitting them by group label.
//!
//! Every statistic in this crate works on a [`DMatrix`] whose rows are observations and whose
//! columns are variables. [`from_rows`] builds one from nested iterators, and [`group_rows`]
//! partitions its rows by an arbitrary label.

use std::hash::Hash;

use indexmap::IndexMap;
use nalgebra::{DMatrix, RealField};

use crate::{Error, Float};

/// Collects an iterator of rows into an `n × p` matrix.
///
/// Every row must have the same, non-zero length and no value may be `NaN`.
///
/// # Examples
///
/// ```
/// use ordistat::Error;
/// use ordistat::matrix::from_rows;
///
/// let m = from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
/// assert_eq!(m.shape(), (3, 2));
/// assert_eq!(m[(2, 1)], 6.0);
///
/// let ragged = from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
/// assert_eq!(ragged, Err(Error::DimensionMismatch { expected: 2, given: 1 }));
/// ```
pub fn from_rows<T: Float + RealField, I: IntoIterator<Item = J>, J: IntoIterator<Item = T>>(
    data: I,
) -> Result<DMatrix<T>, Error> {
    let mut flat_data = Vec::new();
    let mut n = 0;
    let mut p = 0;

    for (i, row) in data.into_iter().enumerate() {
        n += 1;
        let mut row_len = 0;

        for val in row {
            if val.is_nan() {
                return Err(Error::ContainsNaN);
            }
            flat_data.push(val);
            row_len += 1;
        }

        if i == 0 {
            p = row_len;

            if p == 0 {
                return Err(Error::InsufficientVariables {
                    given: 0,
                    needed: 1,
                });
            }
        } else if row_len != p {
            return Err(Error::DimensionMismatch {
                expected: p,
                given: row_len,
            });
        }
    }

    if n == 0 {
        return Err(Error::InsufficientSampleSize {
            given: 0,
            needed: 1,
        });
    }

    Ok(DMatrix::from_row_slice(n, p, &flat_data))
}

/// Partitions row indices by label.
///
/// Keys appear in the order of their first occurrence in `groups`, and each index list is in
/// ascending row order.
///
/// # Examples
///
/// ```
/// use ordistat::matrix::group_rows;
///
/// let groups = group_rows(&["b", "a", "b", "c", "a"]);
/// let keys: Vec<_> = groups.keys().copied().collect();
///
/// assert_eq!(keys, vec!["b", "a", "c"]);
/// assert_eq!(groups["b"], vec![0, 2]);
/// ```
#[must_use]
pub fn group_rows<G: Eq + Hash + Clone>(groups: &[G]) -> IndexMap<G, Vec<usize>> {
    let mut partition: IndexMap<G, Vec<usize>> = IndexMap::new();

    for (i, label) in groups.iter().enumerate() {
        partition.entry(label.clone()).or_default().push(i);
    }

    partition
}

pub(crate) fn ensure_no_nan<T: Float + RealField>(a: &DMatrix<T>) -> Result<(), Error> {
    if a.iter().any(|v| v.is_nan()) {
        return Err(Error::ContainsNaN);
    }

    Ok(())
}

pub(crate) fn check_group_labels<G>(groups: &[G], n: usize) -> Result<(), Error> {
    if groups.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            given: groups.len(),
        });
    }

    Ok(())
}
