use nalgebra::*;
use std::cmp::Ordering;
use crate::calc::{running, Variate};
use crate::{Error, Result};

const EPS : f64 = 1E-12;

/// Principal components fitted to a sample. Each row of components is a unit
/// eigenvector of the sample covariance, and rows are ordered by descending
/// explained variance. Projection onto the components is a pure rotation of the
/// centered data (no whitening).
#[derive(Debug, Clone)]
pub struct Pca {

    /// Column means of the fitted sample.
    pub mean : DVector<f64>,

    /// p x p matrix holding one orthonormal direction per row.
    pub components : DMatrix<f64>,

    /// Eigenvalues of the unbiased covariance matrix, in component order.
    pub explained_variance : DVector<f64>,

    pub explained_variance_ratio : DVector<f64>

}

impl Pca {

    /// Decomposes the covariance of the n x p sample y. The sign of each
    /// eigenvector is arbitrary up to the decomposition, so it is fixed here
    /// by requiring the first non-zero entry of each direction to be positive.
    pub fn fit(y : &DMatrix<f64>) -> Result<Self> {
        let (n, p) = y.shape();
        if n < 2 {
            return Err(Error::TooFewRows { rows : n });
        }
        let mean = DVector::from_iterator(p, y.column_iter().map(|c| running::mean(c.iter().copied(), n) ));
        let centered = center(y, &mean);
        let cov = (centered.transpose() * &centered).unscale((n - 1) as f64);
        let eigen = SymmetricEigen::try_new(cov, f64::EPSILON, 0).ok_or(Error::Eigen)?;

        let mut order : Vec<usize> = (0..p).collect();
        order.sort_by(|a, b| {
            eigen.eigenvalues[*b].partial_cmp(&eigen.eigenvalues[*a]).unwrap_or(Ordering::Equal)
        });

        // Round-off might leave eigenvalues of a rank-deficient covariance slightly negative.
        let explained_variance = DVector::from_iterator(p, order.iter().map(|ix| eigen.eigenvalues[*ix].max(0.0) ));
        let total = explained_variance.sum();
        if !(total > 0.0) {
            return Err(Error::NoVariance);
        }
        let explained_variance_ratio = explained_variance.unscale(total);

        let mut components = DMatrix::zeros(p, p);
        for (k, ix) in order.iter().enumerate() {
            let mut dir = eigen.eigenvectors.column(*ix).normalize();
            if let Some(first) = dir.iter().find(|v| v.abs() > EPS ) {
                if *first < 0.0 {
                    dir = -dir;
                }
            }
            components.set_row(k, &dir.transpose());
        }
        log::debug!(
            "Principal components {} with eigenvalues {:?}",
            components,
            explained_variance.as_slice()
        );
        Ok(Self { mean, components, explained_variance, explained_variance_ratio })
    }

    /// Number of components (equal to the number of fitted columns).
    pub fn len(&self) -> usize {
        self.components.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.components.nrows() == 0
    }

    /// The k-th principal direction, as a column vector.
    pub fn component(&self, k : usize) -> DVector<f64> {
        self.components.row(k).transpose()
    }

    /// Rotates x (centered by the fitted mean) into the component basis: (x - mean) V^T.
    pub fn transform(&self, x : &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.check_cols(x)?;
        Ok(center(x, &self.mean) * self.components.transpose())
    }

    /// Rotates scores z back to the original basis: z V + mean.
    pub fn inverse_transform(&self, z : &DMatrix<f64>) -> Result<DMatrix<f64>> {
        self.check_cols(z)?;
        let mut x = z * &self.components;
        for (j, m) in self.mean.iter().enumerate() {
            x.column_mut(j).add_scalar_mut(*m);
        }
        Ok(x)
    }

    fn check_cols(&self, m : &DMatrix<f64>) -> Result<()> {
        if m.ncols() != self.mean.nrows() {
            Err(Error::Shape { expected : self.mean.nrows(), found : m.ncols() })
        } else {
            Ok(())
        }
    }

}

fn center(y : &DMatrix<f64>, mean : &DVector<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(y.nrows(), y.ncols(), |i, j| y[(i, j)].center(&mean[j]) )
}

#[cfg(test)]
pub mod test {

    use super::*;
    use crate::calc::standardize;
    use crate::sample::synthesize;

    const TOL : f64 = 1E-9;

    #[test]
    fn orthonormal_components() {
        let z = standardize(&synthesize(42, 100).unwrap()).unwrap();
        let pca = Pca::fit(&z).unwrap();
        let (pc1, pc2) = (pca.component(0), pca.component(1));
        println!("PC1 = {}, PC2 = {}", pc1, pc2);
        assert!((pc1.norm() - 1.).abs() < TOL);
        assert!((pc2.norm() - 1.).abs() < TOL);
        assert!(pc1.dot(&pc2).abs() < TOL);
        assert!(pca.explained_variance[0] >= pca.explained_variance[1]);
        assert!((pca.explained_variance_ratio.sum() - 1.).abs() < TOL);
    }

    #[test]
    fn standardized_pair_directions() {
        // The correlation matrix of two standardized columns is [[1, r], [r, 1]]:
        // its eigenvectors are the diagonals, with eigenvalues 1 + r and 1 - r.
        let z = standardize(&synthesize(42, 100).unwrap()).unwrap();
        let pca = Pca::fit(&z).unwrap();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        assert!((pca.component(0) - DVector::from_vec(vec![h, h])).norm() < 1E-8);
        assert!((pca.component(1) - DVector::from_vec(vec![h, -h])).norm() < 1E-8);
        let r = (z.column(0).dot(&z.column(1))) / 100.;
        assert!((pca.explained_variance_ratio[0] - (1. + r) / 2.).abs() < 1E-8);
    }

    #[test]
    fn sign_convention() {
        let y = DMatrix::from_row_slice(4, 2, &[
            -2., 2.1,
            -1., 0.9,
            1., -1.2,
            2., -1.8
        ]);
        let pca = Pca::fit(&y).unwrap();
        for k in 0..pca.len() {
            assert!(pca.component(k)[0] > 0.0);
        }
        // Negatively correlated columns: the leading direction points down the anti-diagonal.
        assert!(pca.component(0)[1] < 0.0);
    }

    #[test]
    fn round_trip() {
        let z = standardize(&synthesize(11, 50).unwrap()).unwrap();
        let pca = Pca::fit(&z).unwrap();
        let proj = pca.transform(&z).unwrap();
        let back = pca.inverse_transform(&proj).unwrap();
        assert!((back - &z).amax() < TOL);
        // A rotation preserves the total sum of squares of the centered data.
        let centered = center(&z, &pca.mean);
        assert!((proj.norm() - centered.norm()).abs() < TOL);
    }

    #[test]
    fn constant_sample() {
        let y = DMatrix::from_element(5, 2, 3.0);
        assert!(matches!(Pca::fit(&y), Err(Error::NoVariance)));
    }

    #[test]
    fn column_mismatch() {
        let z = standardize(&synthesize(1, 20).unwrap()).unwrap();
        let pca = Pca::fit(&z).unwrap();
        let wide = DMatrix::zeros(3, 3);
        assert!(matches!(pca.transform(&wide), Err(Error::Shape { expected : 2, found : 3 })));
    }

}
