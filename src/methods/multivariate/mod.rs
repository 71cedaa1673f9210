//! Multivariate hypothesis tests.
//!
//! Ordination methods such as LDA assume multivariate normal groups sharing one covariance
//! matrix. This module tests both assumptions: Mardia's test for multivariate normality and Box's
//! M test for the homogeneity of covariance matrices across groups.
//!
//! # Example
//!
//! ```rust
//! use nalgebra::DMatrix;
//! use ordistat::multivariate::{box_mtest, mardia_test};
//!
//! let data = DMatrix::from_row_slice(
//!     8,
//!     2,
//!     &[
//!         0.1, 0.2, 0.5, 0.1, -0.2, 0.3, 0.0, 0.0, 0.8, -0.5, -0.4, -0.1, 0.3, 0.6, -0.6, 0.2,
//!     ],
//! );
//!
//! let normality = mardia_test(&data, true).unwrap();
//! assert!(normality.p_value_kurtosis > 0.05);
//!
//! let homogeneity = box_mtest(&data, &[1, 1, 1, 1, 2, 2, 2, 2]).unwrap();
//! assert_eq!(homogeneity.log_determinants.len(), 2);
//! ```

mod box_m;
mod mardia;

pub use box_m::{BoxMComputation, box_mtest};
pub use mardia::{MardiaComputation, mardia_test};
