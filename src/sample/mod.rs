use nalgebra::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Serialize, Deserialize};
use crate::{Error, Result};

/// Generator of paired (height, weight) observations. Heights follow a normal
/// distribution; weights are a noisy linear function of height:
///
/// weight = intercept + slope * height + e, e ~ N(0, noise_sd)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightWeight {
    pub height_mean : f64,
    pub height_sd : f64,
    pub intercept : f64,
    pub slope : f64,
    pub noise_sd : f64
}

impl Default for HeightWeight {

    /// Heights in inches centered at 67 (5'7"); weights in lbs.
    fn default() -> Self {
        Self {
            height_mean : 67.0,
            height_sd : 4.0,
            intercept : 50.0,
            slope : 3.0,
            noise_sd : 10.0
        }
    }

}

impl HeightWeight {

    /// Draws an n x 2 matrix, with heights at the first column and weights at the second.
    /// The generator is seeded once; all n heights are drawn before the n noise terms,
    /// so the same seed and n always yield the same matrix.
    pub fn sample(&self, seed : u64, n : usize) -> Result<DMatrix<f64>> {
        let height = Normal::new(self.height_mean, self.height_sd)
            .map_err(|e| Error::Distribution(format!("height ({:?})", e)) )?;
        let noise = Normal::new(0.0, self.noise_sd)
            .map_err(|e| Error::Distribution(format!("weight noise ({:?})", e)) )?;
        let mut rng = StdRng::seed_from_u64(seed);
        let heights : Vec<f64> = (0..n).map(|_| height.sample(&mut rng) ).collect();
        let weights : Vec<f64> = heights.iter()
            .map(|h| self.intercept + self.slope * h + noise.sample(&mut rng) )
            .collect();
        log::debug!("Synthesized {} height/weight pairs (seed {})", n, seed);
        Ok(DMatrix::from_fn(n, 2, |i, j| if j == 0 { heights[i] } else { weights[i] }))
    }

}

/// Draws n observations from the default height/weight generator.
pub fn synthesize(seed : u64, n : usize) -> Result<DMatrix<f64>> {
    HeightWeight::default().sample(seed, n)
}
