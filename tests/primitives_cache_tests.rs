#![cfg(feature = "dev")]

use gwr_select::internals::primitives::bandwidth::Bandwidth;
use gwr_select::internals::primitives::cache::{
    CovariateSubset, Evaluation, EvaluationCache, FitDiagnostics,
};
use gwr_select::internals::primitives::errors::GwrError;

fn eval(bandwidth: f64, score: f64) -> Evaluation<f64> {
    Evaluation {
        bandwidth,
        score,
        diagnostics: None,
    }
}

// ============================================================================
// Evaluation Ordering Tests
// ============================================================================

#[test]
fn test_lower_score_wins() {
    assert!(eval(30.0, 1.0).better_than(&eval(20.0, 2.0)));
    assert!(!eval(20.0, 2.0).better_than(&eval(30.0, 1.0)));
}

#[test]
fn test_ties_prefer_smaller_bandwidth() {
    assert!(eval(20.0, 1.0).better_than(&eval(30.0, 1.0)));
    assert!(!eval(30.0, 1.0).better_than(&eval(20.0, 1.0)));
    assert!(!eval(20.0, 1.0).better_than(&eval(20.0, 1.0)));
}

#[test]
fn test_degenerate_loses_to_finite() {
    let degenerate = Evaluation::<f64>::degenerate(5.0);
    assert!(degenerate.score.is_infinite());
    assert!(degenerate.diagnostics.is_none());
    assert!(eval(50.0, 1e9).better_than(&degenerate));
    assert!(!degenerate.better_than(&eval(50.0, 1e9)));
}

#[test]
fn test_nan_never_beats_number() {
    assert!(eval(10.0, 3.0).better_than(&eval(5.0, f64::NAN)));
    assert!(!eval(5.0, f64::NAN).better_than(&eval(10.0, 3.0)));
}

// ============================================================================
// Cache Tests
// ============================================================================

#[test]
fn test_cache_computes_once() {
    let mut cache = EvaluationCache::<f64>::new();
    let mut calls = 0;

    for _ in 0..3 {
        let e = cache
            .get_or_try_insert_with(12.0, CovariateSubset::All, |bw| {
                calls += 1;
                Ok::<_, GwrError>(eval(bw, bw * 2.0))
            })
            .unwrap();
        assert_eq!(e.score, 24.0);
    }

    assert_eq!(calls, 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 2);
}

#[test]
fn test_cache_keys_include_subset() {
    let mut cache = EvaluationCache::<f64>::new();
    cache
        .get_or_try_insert_with(12.0, CovariateSubset::Column(0), |bw| {
            Ok::<_, GwrError>(eval(bw, 1.0))
        })
        .unwrap();
    cache
        .get_or_try_insert_with(12.0, CovariateSubset::Column(1), |bw| {
            Ok::<_, GwrError>(eval(bw, 2.0))
        })
        .unwrap();

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(12.0, CovariateSubset::Column(1)).unwrap().score, 2.0);
    assert!(cache.get(12.0, CovariateSubset::All).is_none());
}

#[test]
fn test_cache_negative_zero_shares_key() {
    let mut cache = EvaluationCache::<f64>::new();
    cache.insert(CovariateSubset::All, eval(0.0, 7.0));
    assert_eq!(cache.get(-0.0, CovariateSubset::All).unwrap().score, 7.0);
}

#[test]
fn test_cache_does_not_store_errors() {
    let mut cache = EvaluationCache::<f64>::new();
    let err = cache.get_or_try_insert_with(3.0, CovariateSubset::All, |_| {
        Err(GwrError::InvalidInput("boom".to_string()))
    });
    assert!(err.is_err());
    assert!(cache.is_empty());

    // A later successful computation is stored normally.
    let ok = cache
        .get_or_try_insert_with(3.0, CovariateSubset::All, |bw| {
            Ok::<_, GwrError>(eval(bw, 1.0))
        })
        .unwrap();
    assert_eq!(ok.bandwidth, 3.0);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_insert_never_overwrites() {
    let mut cache = EvaluationCache::<f64>::new();
    cache.insert(CovariateSubset::All, eval(8.0, 1.0));
    cache.insert(CovariateSubset::All, eval(8.0, 99.0));
    assert_eq!(cache.get(8.0, CovariateSubset::All).unwrap().score, 1.0);
}

#[test]
fn test_evaluations_sorted_by_bandwidth() {
    let mut cache = EvaluationCache::<f64>::new();
    for bw in [30.0, 10.0, 20.0] {
        cache.insert(CovariateSubset::All, eval(bw, 1.0));
    }
    cache.insert(CovariateSubset::Column(2), eval(15.0, 1.0));

    let bws: Vec<f64> = cache
        .evaluations(CovariateSubset::All)
        .iter()
        .map(|e| e.bandwidth)
        .collect();
    assert_eq!(bws, vec![10.0, 20.0, 30.0]);
}

#[test]
fn test_diagnostics_are_kept() {
    let mut cache = EvaluationCache::<f64>::new();
    let diag = FitDiagnostics {
        rss: 4.0,
        trace_hat: 2.5,
    };
    cache.insert(
        CovariateSubset::All,
        Evaluation {
            bandwidth: 9.0,
            score: 1.0,
            diagnostics: Some(diag),
        },
    );
    assert_eq!(
        cache.get(9.0, CovariateSubset::All).unwrap().diagnostics,
        Some(diag)
    );
}

// ============================================================================
// Bandwidth Tests
// ============================================================================

#[test]
fn test_bandwidth_from_value() {
    assert_eq!(Bandwidth::from_value(12.4, false), Bandwidth::<f64>::Adaptive(12));
    assert_eq!(Bandwidth::from_value(12.6, false), Bandwidth::<f64>::Adaptive(13));
    assert_eq!(Bandwidth::from_value(1.25, true), Bandwidth::Fixed(1.25));
    assert_eq!(Bandwidth::<f64>::Adaptive(7).value(), 7.0);
    assert!(Bandwidth::Fixed(2.0).is_fixed());
    assert!(!Bandwidth::<f64>::Adaptive(2).is_fixed());
}

#[test]
fn test_bandwidth_display() {
    assert_eq!(format!("{}", Bandwidth::Fixed(1.23456)), "1.23");
    assert_eq!(format!("{}", Bandwidth::<f64>::Adaptive(17)), "17 neighbors");
}
