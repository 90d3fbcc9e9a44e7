/// Principal components analysis basis rotation. The components are the
/// eigenvectors of the empirical covariance matrix, ordered by the variance
/// they preserve.
pub mod pca;

pub use pca::Pca;
