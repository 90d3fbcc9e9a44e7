use nalgebra::*;
use serde::{Serialize, Deserialize};
use crate::{Error, Result};

/// Functions applicable to individual observations, given summary
/// statistics of the column they belong to.
pub trait Variate {

    fn center(&self, mean : &Self) -> Self;

    fn standardize(&self, mean : &Self, stddev : &Self) -> Self;

}

impl Variate for f64 {

    fn center(&self, mean : &Self) -> Self {
        *self - *mean
    }

    fn standardize(&self, mean : &Self, stddev : &Self) -> Self {
        (*self - *mean) / *stddev
    }

}

/// Univariate statistical calculations over iterators and slices.
pub mod running {

    use std::borrow::Borrow;

    pub fn mean(d : impl Iterator<Item=f64>, count : usize) -> f64 {
        d.sum::<f64>() / count as f64
    }

    /// Mean and variance calculated in two passes (the deviations are
    /// summed around the already-known mean, which avoids the cancellation
    /// of the sum-of-squares formula for columns far from the origin).
    /// The variance divisor is n-1 if unbiased, n otherwise.
    pub fn mean_variance(d : &[impl Borrow<f64>], unbiased : bool) -> (f64, f64) {
        let n = d.len() as f64;
        let mean = mean(d.iter().map(|v| *v.borrow() ), d.len());
        let sq_dev = d.iter()
            .map(|v| (*v.borrow() - mean).powf(2.) )
            .sum::<f64>();
        let var = sq_dev / if unbiased { n - 1. } else { n };
        (mean, var)
    }

}

/// Shifts and scales each column of a matrix to zero mean and unit
/// standard deviation. The default divides by the population standard
/// deviation (n); set unbiased to divide by the sample standard deviation (n-1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub unbiased : bool
}

/// Standardized data, and the column moments used to build it.
#[derive(Debug, Clone)]
pub struct Standardization {
    pub data : DMatrix<f64>,
    pub means : DVector<f64>,
    pub stddevs : DVector<f64>
}

impl Standardizer {

    pub fn apply(&self, m : &DMatrix<f64>) -> Result<Standardization> {
        if m.nrows() < 2 {
            return Err(Error::TooFewRows { rows : m.nrows() });
        }
        let mut means = DVector::zeros(m.ncols());
        let mut stddevs = DVector::zeros(m.ncols());
        for (j, col) in m.column_iter().enumerate() {
            let vals : Vec<f64> = col.iter().copied().collect();
            let (mean, var) = running::mean_variance(&vals[..], self.unbiased);
            if vals.iter().all(|v| *v == vals[0]) || !(var > 0.0) {
                return Err(Error::ZeroVariance { column : j });
            }
            means[j] = mean;
            stddevs[j] = var.sqrt();
        }
        log::debug!("Column means: {:?}; standard deviations: {:?}", means.as_slice(), stddevs.as_slice());
        let data = DMatrix::from_fn(m.nrows(), m.ncols(), |i, j| {
            m[(i, j)].standardize(&means[j], &stddevs[j])
        });
        Ok(Standardization { data, means, stddevs })
    }

}

/// Standardizes the columns of m using the population standard deviation.
pub fn standardize(m : &DMatrix<f64>) -> Result<DMatrix<f64>> {
    Standardizer::default().apply(m).map(|s| s.data )
}
