#![cfg(feature = "dev")]

use approx::assert_relative_eq;
use gwr_select::internals::primitives::errors::GwrError;
use gwr_select::internals::search::bounded::{BoundedBrent, DEFAULT_MAX_EVALS, DEFAULT_XATOL};
use gwr_select::internals::search::BandwidthSearch;

fn parabola(center: f64) -> impl FnMut(f64) -> Result<f64, GwrError> {
    move |bw: f64| Ok((bw - center) * (bw - center))
}

#[test]
fn test_brent_defaults() {
    let search = BoundedBrent::<f64>::default();
    assert_eq!(search.xatol, DEFAULT_XATOL);
    assert_eq!(search.max_iter, DEFAULT_MAX_EVALS);
    assert_eq!(search.name(), "scipy");
}

#[test]
fn test_brent_continuous_parabola() {
    let search = BoundedBrent::default();
    let outcome = search.run(&mut parabola(37.0), 0.0, 100.0, false).unwrap();

    assert_relative_eq!(outcome.best.bandwidth, 37.0, epsilon = 1e-4);
    assert!(outcome.converged);
    // A parabola is solved by interpolation in a handful of evaluations.
    assert!(outcome.iterations < 15);
    assert_eq!(outcome.history.len(), outcome.iterations);
}

#[test]
fn test_brent_integer_probes_are_whole() {
    let search = BoundedBrent::default();
    let outcome = search.run(&mut parabola(37.3), 2.0, 100.0, true).unwrap();

    assert_eq!(outcome.best.bandwidth, 37.0);
    for eval in &outcome.history {
        assert_eq!(eval.bandwidth, eval.bandwidth.round());
        assert!(eval.bandwidth >= 2.0 && eval.bandwidth <= 100.0);
    }
}

#[test]
fn test_brent_increasing_objective_hugs_lower_bound() {
    let search = BoundedBrent::default();
    let mut increasing = |bw: f64| Ok::<f64, GwrError>(bw);
    let outcome = search.run(&mut increasing, 0.5, 8.0, false).unwrap();

    assert!(outcome.best.bandwidth >= 0.5);
    assert_relative_eq!(outcome.best.bandwidth, 0.5, epsilon = 1e-4);
}

#[test]
fn test_brent_stays_in_bounds() {
    let search = BoundedBrent::default();
    let mut decreasing = |bw: f64| Ok::<f64, GwrError>(-bw);
    let outcome = search.run(&mut decreasing, 2.0, 50.0, true).unwrap();

    assert!(outcome.best.bandwidth >= 49.0 && outcome.best.bandwidth <= 50.0);
    assert!(outcome.history.iter().all(|e| e.bandwidth <= 50.0));
}

#[test]
fn test_brent_evaluation_cap() {
    let search = BoundedBrent::new(1e-5, 3);
    let outcome = search.run(&mut parabola(37.0), 0.0, 100.0, false).unwrap();

    assert!(!outcome.converged);
    assert_eq!(outcome.iterations, 3);
}

#[test]
fn test_brent_propagates_objective_errors() {
    let search = BoundedBrent::default();
    let mut failing = |_: f64| -> Result<f64, GwrError> { Err(GwrError::InvalidInput("boom".to_string())) };
    assert!(matches!(
        search.run(&mut failing, 0.0, 1.0, false),
        Err(GwrError::InvalidInput(_))
    ));
}
