use thiserror::Error;

/// Failures of the figure pipeline. Nothing is retried: the first error
/// aborts the run.
#[derive(Debug, Error)]
pub enum Error {

    #[error("At least two observations are required, but {rows} were informed")]
    TooFewRows { rows : usize },

    #[error("Column {column} has zero variance and cannot be standardized")]
    ZeroVariance { column : usize },

    #[error("Sample has no variance to decompose")]
    NoVariance,

    #[error("Expected {expected} columns, but {found} were informed")]
    Shape { expected : usize, found : usize },

    #[error("Invalid distribution parameter: {0}")]
    Distribution(String),

    #[error("Eigendecomposition of the covariance matrix did not converge")]
    Eigen,

    #[error("Failed to draw figure: {0}")]
    Render(String),

    #[error(transparent)]
    Io(#[from] std::io::Error)

}

pub type Result<T> = std::result::Result<T, Error>;
