mod correlation;
mod ellipse;
mod moments;
pub mod multivariate;
mod scale;

pub use correlation::{CorrelationTest, corr, pairwise_correlation_tests};
pub use ellipse::{EllipseMethod, ellipse, ellipse_radius, group_ellipses};
pub use moments::{Axis, Moments, center_along, covariance, mean_and_std};
pub use scale::{scale, scale_in_place};
