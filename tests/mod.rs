use nalgebra::*;
use proptest::prelude::*;
use pca_figure::basis::Pca;
use pca_figure::calc::{running, standardize};
use pca_figure::figure::{Figure, FigureParams};
use pca_figure::plot;
use pca_figure::sample::synthesize;

const EPS : f64 = 1E-8;

fn column(m : &DMatrix<f64>, j : usize) -> Vec<f64> {
    m.column(j).iter().copied().collect()
}

fn sample_matrix(rows : &[(f64, f64)]) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), 2, |i, j| if j == 0 { rows[i].0 } else { rows[i].1 })
}

fn has_spread(vals : &[f64]) -> bool {
    let (_, var) = running::mean_variance(vals, false);
    var > 1E-6
}

fn non_degenerate() -> impl Strategy<Value=Vec<(f64, f64)>> {
    prop::collection::vec((-1E3..1E3f64, -1E3..1E3f64), 2..200)
}

proptest! {

    #[test]
    fn standardized_moments(rows in non_degenerate()) {
        let m = sample_matrix(&rows);
        prop_assume!(has_spread(&column(&m, 0)) && has_spread(&column(&m, 1)));
        let z = standardize(&m).unwrap();
        for j in 0..2 {
            let (mean, var) = running::mean_variance(&column(&z, j), false);
            prop_assert!(mean.abs() < EPS);
            prop_assert!((var.sqrt() - 1.).abs() < EPS);
        }
    }

    #[test]
    fn decomposition_laws(rows in non_degenerate()) {
        let m = sample_matrix(&rows);
        prop_assume!(has_spread(&column(&m, 0)) && has_spread(&column(&m, 1)));
        let z = standardize(&m).unwrap();
        let pca = Pca::fit(&z).unwrap();
        let (pc1, pc2) = (pca.component(0), pca.component(1));
        prop_assert!((pc1.norm() - 1.).abs() < EPS);
        prop_assert!((pc2.norm() - 1.).abs() < EPS);
        prop_assert!(pc1.dot(&pc2).abs() < EPS);
        for r in pca.explained_variance_ratio.iter() {
            prop_assert!(*r >= 0. && *r <= 1.);
        }
        prop_assert!((pca.explained_variance_ratio.sum() - 1.).abs() < EPS);
        let back = pca.inverse_transform(&pca.transform(&z).unwrap()).unwrap();
        prop_assert!((back - &z).amax() < EPS);
    }

}

#[test]
fn seeded_sample_repeats() {
    let first = synthesize(42, 100).unwrap();
    for _ in 0..3 {
        assert_eq!(synthesize(42, 100).unwrap(), first);
    }
}

#[test]
fn projection_is_rotation() {
    let z = standardize(&synthesize(42, 100).unwrap()).unwrap();
    let pca = Pca::fit(&z).unwrap();
    let proj = pca.transform(&z).unwrap();
    // Scores are uncorrelated, and their variances are the explained variances.
    let cov = proj.transpose() * &proj / 99.;
    println!("Covariance of scores: {}", cov);
    assert!(cov[(0, 1)].abs() < EPS);
    assert!((cov[(0, 0)] - pca.explained_variance[0]).abs() < EPS);
    assert!((cov[(1, 1)] - pca.explained_variance[1]).abs() < EPS);
}

#[test]
fn renders_figure() {
    let dir = tempfile::tempdir().unwrap();
    let params = FigureParams {
        output : dir.path().join("figures").join("31-pca-height-weight-intuition.png"),
        ..FigureParams::default()
    };
    let fig = Figure::build(&params).unwrap();
    plot::render(&fig, &params.layout, &params.output).unwrap();
    let meta = std::fs::metadata(&params.output).unwrap();
    assert!(meta.len() > 0);

    let pct = fig.variance_percent();
    assert_eq!(pct.len(), 2);
    assert!(pct.iter().all(|p| *p >= 0. && *p <= 100. ));
    assert!((pct[0] + pct[1] - 100.).abs() < EPS);

    let lines = fig.status_lines(&params.output);
    assert_eq!(lines[0], "✓ Figure saved: 31-pca-height-weight-intuition.png");
    let reported : f64 = lines[1..].iter()
        .map(|l| {
            let value = l.trim_start_matches("  - PC1 explains ")
                .trim_start_matches("  - PC2 explains ")
                .trim_end_matches("% of variance");
            value.parse::<f64>().unwrap()
        })
        .sum();
    assert!((reported - 100.).abs() <= 0.1 + EPS);
}

#[test]
fn png_signature() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.png");
    let params = FigureParams::default();
    let fig = Figure::build(&params).unwrap();
    plot::render(&fig, &params.layout, &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
}
