use nalgebra::*;
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use crate::basis::Pca;
use crate::calc::Standardizer;
use crate::plot::Layout;
use crate::sample::HeightWeight;
use crate::Result;

pub const OUTPUT_FILE : &str = "31-pca-height-weight-intuition.png";

/// Every fixed parameter of a figure run. The defaults reproduce the
/// published figure: 100 observations drawn with seed 42.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureParams {
    pub seed : u64,
    pub samples : usize,
    pub generator : HeightWeight,
    pub standardizer : Standardizer,
    pub layout : Layout,
    pub output : PathBuf
}

impl Default for FigureParams {

    fn default() -> Self {
        Self {
            seed : 42,
            samples : 100,
            generator : HeightWeight::default(),
            standardizer : Standardizer::default(),
            layout : Layout::default(),
            output : PathBuf::from(OUTPUT_FILE)
        }
    }

}

/// Everything the renderer draws: the standardized sample, its principal
/// components and its projection onto them.
#[derive(Debug, Clone)]
pub struct Figure {
    pub sample : DMatrix<f64>,
    pub standardized : DMatrix<f64>,
    pub pca : Pca,
    pub projected : DMatrix<f64>
}

impl Figure {

    /// Runs synthesize -> standardize -> decompose -> project.
    pub fn build(params : &FigureParams) -> Result<Self> {
        let sample = params.generator.sample(params.seed, params.samples)?;
        let standardized = params.standardizer.apply(&sample)?.data;
        let pca = Pca::fit(&standardized)?;
        let projected = pca.transform(&standardized)?;
        Ok(Self { sample, standardized, pca, projected })
    }

    /// Percentage of variance explained by each component.
    pub fn variance_percent(&self) -> Vec<f64> {
        self.pca.explained_variance_ratio.iter().map(|r| r * 100. ).collect()
    }

    /// Lines reported to the console once the figure is written to path.
    pub fn status_lines(&self, path : &Path) -> Vec<String> {
        let name = path.file_name()
            .map(|f| f.to_string_lossy().to_string() )
            .unwrap_or_else(|| path.display().to_string() );
        let mut lines = vec![format!("✓ Figure saved: {}", name)];
        for (k, pct) in self.variance_percent().iter().enumerate() {
            lines.push(format!("  - PC{} explains {:.1}% of variance", k + 1, pct));
        }
        lines
    }

}
