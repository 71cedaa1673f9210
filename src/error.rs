use thiserror::Error as ThisError;

/// Represents errors that can occur while computing a statistic.
#[derive(Debug, ThisError, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input sample size is too small for the computation.
    #[error("Sample size must be at least {needed}, but was given {given}.")]
    InsufficientSampleSize { given: usize, needed: usize },

    /// The input has fewer variables (columns) than the computation requires.
    #[error("Number of variables must be at least {needed}, but was given {given}.")]
    InsufficientVariables { given: usize, needed: usize },

    /// Two inputs that must line up (rows of two matrices, weights and an axis, group labels and
    /// observations, or the rows of a ragged input) have different lengths.
    #[error("Expected a length of {expected}, but was given {given}.")]
    DimensionMismatch { expected: usize, given: usize },

    /// The input data contains `NaN` values.
    #[error("Input data must not contain NaN values.")]
    ContainsNaN,

    /// An argument is outside of its accepted domain.
    #[error("{0}")]
    InvalidArgument(String),

    /// A covariance matrix could not be inverted or factorized.
    #[error("{0} is singular or not positive definite.")]
    SingularMatrix(String),

    /// See [`statrs::distribution::NormalError`].
    #[error("{0}")]
    NormalDistributionError(#[from] statrs::distribution::NormalError),

    /// See [`statrs::distribution::GammaError`].
    #[error("{0}")]
    GammaError(#[from] statrs::distribution::GammaError),

    /// See [`statrs::distribution::FisherSnedecorError`].
    #[error("{0}")]
    FisherSnedecorError(#[from] statrs::distribution::FisherSnedecorError),

    /// See [`statrs::distribution::StudentsTError`].
    #[error("{0}")]
    StudentsTError(#[from] statrs::distribution::StudentsTError),
}

/// The two broad families an [`Error`] falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed shapes, mismatched lengths, out-of-domain arguments.
    InvalidArgument,

    /// Singular or non positive definite matrices met during inversion, determinants or
    /// Cholesky factorization.
    Numerical,
}

impl Error {
    /// Classifies the error.
    ///
    /// Only [`Error::SingularMatrix`] is [`ErrorKind::Numerical`]. Everything else, the wrapped
    /// statrs distribution errors included, is [`ErrorKind::InvalidArgument`]: statrs only rejects
    /// distribution parameters derived from the caller's sample size or level.
    ///
    /// ```
    /// use ordistat::{Error, ErrorKind};
    ///
    /// assert_eq!(Error::ContainsNaN.kind(), ErrorKind::InvalidArgument);
    /// assert_eq!(Error::SingularMatrix("S".into()).kind(), ErrorKind::Numerical);
    ///
    /// let parameters = statrs::distribution::StudentsT::new(0.0, 1.0, -1.0).unwrap_err();
    /// assert_eq!(Error::from(parameters).kind(), ErrorKind::InvalidArgument);
    /// ```
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SingularMatrix(_) => ErrorKind::Numerical,
            _ => ErrorKind::InvalidArgument,
        }
    }
}
