#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use gwr_select::internals::algorithms::gwr::GwrEvaluator;
use gwr_select::internals::engine::backfitting::{
    score_of_change, BackfitConfig, Backfitter, MultiConvergence, MultiInit,
    DEFAULT_MAX_ITER_MULTI, DEFAULT_TOL_MULTI,
};
use gwr_select::internals::engine::selector::{BandwidthSelector, SelectorConfig};
use gwr_select::internals::math::kernel::{KernelFunction, KernelSpec};
use gwr_select::internals::primitives::bandwidth::Bandwidth;
use gwr_select::internals::primitives::errors::GwrError;

// ============================================================================
// Fixtures
// ============================================================================

fn grid_data() -> (Vec<[f64; 2]>, Vec<f64>, Vec<f64>) {
    let n = 49;
    let coords: Vec<[f64; 2]> = (0..n).map(|i| [(i % 7) as f64, (i / 7) as f64]).collect();
    let x1: Vec<f64> = (0..n).map(|i| ((i * 37) % 17) as f64 / 17.0 * 4.0).collect();
    let y: Vec<f64> = (0..n)
        .map(|i| {
            let [cx, cy] = coords[i];
            1.0 + (0.5 + 0.2 * cx) * x1[i]
                + 0.5 * cy.sin()
                + (((i * 53) % 23) as f64 / 23.0 - 0.5)
        })
        .collect();
    let design: Vec<f64> = x1.iter().flat_map(|&v| [1.0, v]).collect();
    (coords, y, design)
}

fn backfitter(config: BackfitConfig<f64>) -> Backfitter<f64> {
    Backfitter::new(BandwidthSelector::new(SelectorConfig::default()), config)
}

fn evaluator(coords: &[[f64; 2]]) -> GwrEvaluator<f64> {
    GwrEvaluator::new(coords, KernelSpec::new(KernelFunction::Bisquare, false))
}

// ============================================================================
// Backfitting Tests
// ============================================================================

#[test]
fn test_backfitting_converges() {
    let (coords, y, x) = grid_data();
    let eval = evaluator(&coords);
    let result = backfitter(BackfitConfig {
        max_iter_multi: 50,
        ..BackfitConfig::default()
    })
    .fit(&eval, &y, &x, 2)
    .unwrap();

    assert!(result.converged);
    assert!(result.sweeps <= 50);
    assert_eq!(result.scores.len(), result.sweeps);
    assert_eq!(result.bandwidth_history.len(), result.sweeps);
    assert!(*result.scores.last().unwrap() < DEFAULT_TOL_MULTI);
    assert_eq!(result.bandwidths.len(), 2);
    for bw in &result.bandwidths {
        assert!(matches!(bw, Bandwidth::Adaptive(k) if (2..=49).contains(k)));
    }
    assert_eq!(result.bandwidth_history.last().unwrap(), &result.values());
}

#[test]
fn test_backfitting_sweep_cap() {
    let (coords, y, x) = grid_data();
    let eval = evaluator(&coords);
    let result = backfitter(BackfitConfig {
        max_iter_multi: 2,
        ..BackfitConfig::default()
    })
    .fit(&eval, &y, &x, 2)
    .unwrap();

    assert!(!result.converged);
    assert_eq!(result.sweeps, 2);
    assert_eq!(result.scores.len(), 2);
}

#[test]
fn test_backfitting_decomposition_holds() {
    let (coords, y, x) = grid_data();
    let eval = evaluator(&coords);
    let result = backfitter(BackfitConfig {
        max_iter_multi: 3,
        ..BackfitConfig::default()
    })
    .fit(&eval, &y, &x, 2)
    .unwrap();

    assert_eq!(result.fitted.len(), 49);
    assert_eq!(result.params.len(), 98);
    for i in 0..49 {
        assert_relative_eq!(result.fitted[i] + result.residuals[i], y[i], epsilon = 1e-9);
        // Partial fits are x_ij * beta_ij.
        let total = result.param(i, 0) * x[2 * i] + result.param(i, 1) * x[2 * i + 1];
        assert_relative_eq!(total, result.fitted[i], epsilon = 1e-9);
    }
    let rss: f64 = result.residuals.iter().map(|r| r * r).sum();
    assert_relative_eq!(result.rss(), rss);
}

#[test]
fn test_backfitting_is_deterministic() {
    let (coords, y, x) = grid_data();
    let eval = evaluator(&coords);
    let fitter = backfitter(BackfitConfig {
        max_iter_multi: 4,
        ..BackfitConfig::default()
    });

    let a = fitter.fit(&eval, &y, &x, 2).unwrap();
    let b = fitter.fit(&eval, &y, &x, 2).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_backfitting_alternative_inits() {
    let (coords, y, x) = grid_data();
    let eval = evaluator(&coords);

    for init in [MultiInit::Global, MultiInit::Ols] {
        let result = backfitter(BackfitConfig {
            init,
            max_iter_multi: 3,
            ..BackfitConfig::default()
        })
        .fit(&eval, &y, &x, 2)
        .unwrap();
        assert_eq!(result.bandwidths.len(), 2);
        assert!(result.sweeps >= 1 && result.sweeps <= 3);
        for i in 0..49 {
            assert_relative_eq!(result.fitted[i] + result.residuals[i], y[i], epsilon = 1e-9);
        }
    }
}

#[test]
fn test_backfitting_alternative_measures() {
    let (coords, y, x) = grid_data();
    let eval = evaluator(&coords);

    for convergence in [MultiConvergence::ResidualSumOfSquares, MultiConvergence::Bandwidths] {
        let result = backfitter(BackfitConfig {
            convergence,
            max_iter_multi: 50,
            ..BackfitConfig::default()
        })
        .fit(&eval, &y, &x, 2)
        .unwrap();
        assert_eq!(result.convergence, convergence);
        assert!(result.scores.iter().all(|s| *s >= 0.0));
        if result.converged {
            assert!(*result.scores.last().unwrap() < DEFAULT_TOL_MULTI);
        }
    }
}

#[test]
fn test_backfitting_rejects_bad_input() {
    let (coords, y, x) = grid_data();
    let eval = evaluator(&coords);
    let fitter = backfitter(BackfitConfig::default());

    assert!(matches!(
        fitter.fit(&eval, &y, &x[..50], 2),
        Err(GwrError::MismatchedInputs { .. })
    ));
    assert!(matches!(
        fitter.fit(&eval, &y, &x, 0),
        Err(GwrError::MismatchedInputs { .. })
    ));

    let bad = backfitter(BackfitConfig {
        tol_multi: -1.0,
        ..BackfitConfig::default()
    });
    assert!(matches!(bad.fit(&eval, &y, &x, 2), Err(GwrError::InvalidTolerance(_))));
}

// ============================================================================
// Convergence Measure Tests
// ============================================================================

#[test]
fn test_score_of_change_values() {
    assert_relative_eq!(score_of_change(&[0.0, 0.0], &[1.0, 1.0], 2, 1), 0.5_f64.sqrt());
    assert_eq!(score_of_change(&[1.0, 2.0], &[1.0, 2.0], 2, 1), 0.0);
    assert_eq!(score_of_change(&[0.0, 0.0], &[0.0, 0.0], 2, 1), 0.0);
    assert!(score_of_change::<f64>(&[1.0, 0.0], &[0.0, 0.0], 2, 1).is_infinite());
}

#[test]
fn test_score_of_change_sums_columns() {
    // One observation with two partial fits summing to 2.
    let old = [0.5, 0.5];
    let new = [1.0, 1.0];
    // change = 0.5 / 1, scale = 4.
    assert_relative_eq!(score_of_change(&old, &new, 1, 2), (0.5_f64 / 4.0).sqrt());
}

// ============================================================================
// Option Tests
// ============================================================================

#[test]
fn test_backfit_defaults() {
    let config = BackfitConfig::<f64>::default();
    assert_eq!(config.init, MultiInit::PerCovariate);
    assert_eq!(config.convergence, MultiConvergence::ScoreOfChange);
    assert_eq!(config.tol_multi, DEFAULT_TOL_MULTI);
    assert_eq!(config.max_iter_multi, DEFAULT_MAX_ITER_MULTI);
    assert!(config.validate().is_ok());

    let zero = BackfitConfig::<f64> {
        max_iter_multi: 0,
        ..BackfitConfig::default()
    };
    assert!(matches!(zero.validate(), Err(GwrError::InvalidIterations(0))));
}

#[test]
fn test_option_parsing() {
    assert_eq!("per_covariate".parse::<MultiInit>().unwrap(), MultiInit::PerCovariate);
    assert_eq!("GWR".parse::<MultiInit>().unwrap(), MultiInit::Global);
    assert_eq!("ols".parse::<MultiInit>().unwrap(), MultiInit::Ols);
    assert!("random".parse::<MultiInit>().is_err());

    assert_eq!("soc".parse::<MultiConvergence>().unwrap(), MultiConvergence::ScoreOfChange);
    assert_eq!("rss".parse::<MultiConvergence>().unwrap(), MultiConvergence::ResidualSumOfSquares);
    assert_eq!("bw".parse::<MultiConvergence>().unwrap(), MultiConvergence::Bandwidths);
    assert!("none".parse::<MultiConvergence>().is_err());

    assert_eq!(MultiInit::Global.to_string(), "global");
    assert_eq!(MultiConvergence::Bandwidths.to_string(), "bandwidths");
}
