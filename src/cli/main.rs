use anyhow::Context;
use pca_figure::figure::{Figure, FigureParams};
use pca_figure::plot;

/// Renders the PCA height/weight intuition figure to the working directory.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let params = FigureParams::default();
    log::debug!("Figure parameters: {}", serde_json::to_string(&params)?);
    let fig = Figure::build(&params)
        .context("Failed to compute the principal components of the synthetic sample")?;
    plot::render(&fig, &params.layout, &params.output)
        .with_context(|| format!("Failed to save figure to {}", params.output.display()) )?;
    for line in fig.status_lines(&params.output) {
        println!("{}", line);
    }
    Ok(())
}
