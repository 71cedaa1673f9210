#![doc = include_str!("../README.md")]
#![warn(clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_precision_loss,
    clippy::missing_errors_doc
)]

#[macro_use]
pub(crate) mod macros;

mod error;
pub mod matrix;
mod methods;

use std::iter::Sum;

pub use error::{Error, ErrorKind};
pub use methods::*;
use nalgebra::RealField;
use num_traits::{Float as Float_, Num, NumAssign, NumOps};

/// A convenience trait combining bounds frequently used for floating-point computations.
#[cfg(feature = "parallel")]
pub trait Float: Float_ + Num + NumAssign + NumOps + Sum + Send + Sync {}

/// Blanket implementation of [`Float`] for any type that satisfies its bounds.
#[cfg(feature = "parallel")]
impl<T: Float_ + Num + NumAssign + NumOps + Sum + Send + Sync> Float for T {}

/// A convenience trait combining bounds frequently used for floating-point computations.
#[cfg(not(feature = "parallel"))]
pub trait Float: Float_ + Num + NumAssign + NumOps + Sum {}

/// Blanket implementation of [`Float`] for any type that satisfies its bounds.
#[cfg(not(feature = "parallel"))]
impl<T: Float_ + Num + NumAssign + NumOps + Sum> Float for T {}

/// Narrows a double precision result into the caller's element type.
pub(crate) fn from_f64<T: Float + RealField>(value: f64) -> T {
    nalgebra::convert(value)
}

/// Widens an element to `f64`. Distribution functions only work in double precision.
pub(crate) fn to_f64<T: Float + RealField>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
