use approx::assert_relative_eq;
use gwr_select::prelude::*;

// ============================================================================
// Fixtures
// ============================================================================

/// 7 x 7 grid with one covariate whose slope drifts east.
fn grid_data() -> (Vec<[f64; 2]>, Vec<f64>, Vec<f64>) {
    let n = 49;
    let coords: Vec<[f64; 2]> = (0..n).map(|i| [(i % 7) as f64, (i / 7) as f64]).collect();
    let x: Vec<f64> = (0..n).map(|i| ((i * 37) % 17) as f64 / 17.0 * 4.0).collect();
    let y: Vec<f64> = (0..n)
        .map(|i| {
            let [cx, cy] = coords[i];
            1.0 + (0.5 + 0.2 * cx) * x[i]
                + 0.5 * cy.sin()
                + (((i * 53) % 23) as f64 / 23.0 - 0.5)
        })
        .collect();
    (coords, y, x)
}

// ============================================================================
// Builder Tests
// ============================================================================

#[test]
fn test_builder_defaults() {
    let builder = Selector::<f64>::new().mode(Single);
    assert_eq!(builder.kernel, Bisquare);
    assert!(!builder.fixed);
    assert_eq!(builder.criterion, AICc);
    assert_eq!(builder.search_method, GoldenSection);
    assert!(builder.constant);
    assert!(builder.bw_min.is_none());

    let multi = Selector::<f64>::new().mode(Multi);
    assert_eq!(multi.multi_init, PerCovariate);
    assert_eq!(multi.multi_convergence, ScoreOfChange);
    assert_relative_eq!(multi.tol_multi, 1e-5);
    assert_eq!(multi.max_iter_multi, 200);
}

#[test]
fn test_builder_carries_settings() {
    let builder = Selector::<f64>::new()
        .kernel(Gaussian)
        .fixed(true)
        .criterion(CV)
        .search_method(Scipy)
        .max_iter(50)
        .constant(false)
        .mode(Single);
    assert_eq!(builder.kernel, Gaussian);
    assert!(builder.fixed);
    assert_eq!(builder.criterion, CV);
    assert_eq!(builder.search_method, Scipy);
    assert_eq!(builder.max_iter, Some(50));
    assert!(!builder.constant);

    let selector = builder.build().unwrap();
    assert_eq!(selector.kernel(), KernelSpec::new(Gaussian, true));
}

#[test]
fn test_duplicate_parameter_is_rejected() {
    let err = Selector::<f64>::new()
        .kernel(Gaussian)
        .kernel(Bisquare)
        .mode(Single)
        .build()
        .unwrap_err();
    assert_eq!(err, GwrError::DuplicateParameter { parameter: "kernel" });

    let err = Selector::<f64>::new()
        .tol_multi(1e-4)
        .tol_multi(1e-6)
        .mode(Multi)
        .build()
        .unwrap_err();
    assert_eq!(err, GwrError::DuplicateParameter { parameter: "tol_multi" });
}

#[test]
fn test_interval_requires_bounds() {
    let err = Selector::<f64>::new()
        .search_method(Interval)
        .bw_min(10.0)
        .interval(1.0)
        .mode(Single)
        .build()
        .unwrap_err();
    assert_eq!(err, GwrError::MissingIntervalBounds { missing: "bw_max" });
}

#[test]
fn test_invalid_settings_are_rejected() {
    assert!(matches!(
        Selector::<f64>::new().tol(0.0).mode(Single).build(),
        Err(GwrError::InvalidTolerance(_))
    ));
    assert!(matches!(
        Selector::<f64>::new().interval(-1.0).mode(Single).build(),
        Err(GwrError::InvalidInterval(_))
    ));
    assert!(matches!(
        Selector::<f64>::new().max_iter(0).mode(Single).build(),
        Err(GwrError::InvalidIterations(0))
    ));
    assert!(matches!(
        Selector::<f64>::new().bw_min(20.0).bw_max(10.0).mode(Single).build(),
        Err(GwrError::InvertedBounds { .. })
    ));
    assert!(matches!(
        Selector::<f64>::new().tol_multi(f64::NAN).mode(Multi).build(),
        Err(GwrError::InvalidTolerance(_))
    ));
    assert!(matches!(
        Selector::<f64>::new().max_iter_multi(0).mode(Multi).build(),
        Err(GwrError::InvalidIterations(0))
    ));
}

// ============================================================================
// Input Validation Tests
// ============================================================================

#[test]
fn test_search_rejects_bad_inputs() {
    let (coords, y, x) = grid_data();
    let selector = Selector::<f64>::new().mode(Single).build().unwrap();

    assert_eq!(
        selector.search(&[], &[], &[]).unwrap_err(),
        GwrError::EmptyInput
    );
    assert!(matches!(
        selector.search(&coords, &y[..10], &x),
        Err(GwrError::MismatchedInputs { .. })
    ));
    assert!(matches!(
        selector.search(&coords[..40], &y, &x),
        Err(GwrError::MismatchedInputs { .. })
    ));

    let mut bad = y.clone();
    bad[7] = f64::INFINITY;
    assert!(matches!(
        selector.search(&coords, &bad, &x),
        Err(GwrError::InvalidNumericValue(_))
    ));

    assert!(matches!(
        selector.search(&coords[..3], &y[..3], &x[..3]),
        Err(GwrError::TooFewPoints { got: 3, min: 4 })
    ));
}

#[test]
fn test_adaptive_bounds_beyond_n_are_rejected() {
    let (coords, y, x) = grid_data();
    let selector = Selector::new().bw_max(100.0).mode(Single).build().unwrap();
    assert!(matches!(
        selector.search(&coords, &y, &x),
        Err(GwrError::InvalidBounds(_))
    ));
}

// ============================================================================
// Single Bandwidth Tests
// ============================================================================

#[test]
fn test_single_adaptive_search() {
    let _ = env_logger::builder().is_test(true).try_init();
    let (coords, y, x) = grid_data();

    let result = Selector::new()
        .kernel(Bisquare)
        .criterion(AICc)
        .mode(Single)
        .build()
        .unwrap()
        .search(&coords, &y, &x)
        .unwrap();

    assert_eq!(result.bandwidth, Bandwidth::Adaptive(17));
    assert_eq!(result.value(), 17.0);
    assert!(result.score.is_finite());
    assert!(result.converged);
    assert_eq!(result.search_method, GoldenSection);
    assert_eq!(result.criterion, AICc);
    assert_eq!(result.bounds, (4.0, 49.0));
    assert!(result.n_evaluations <= result.history.len());

    let profile = result.profile();
    assert!(profile.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(profile.iter().any(|&(bw, _)| bw == 17.0));
}

#[test]
fn test_single_interval_search() {
    let (coords, y, x) = grid_data();
    let result = Selector::new()
        .search_method(Interval)
        .bw_min(10.0)
        .bw_max(20.0)
        .interval(1.0)
        .mode(Single)
        .build()
        .unwrap()
        .search(&coords, &y, &x)
        .unwrap();

    assert_eq!(result.value(), 17.0);
    assert_eq!(result.history.len(), 11);
}

#[test]
fn test_single_fixed_search() {
    let (coords, y, x) = grid_data();
    let result = Selector::new()
        .kernel(Gaussian)
        .fixed(true)
        .mode(Single)
        .build()
        .unwrap()
        .search(&coords, &y, &x)
        .unwrap();

    assert!(result.bandwidth.is_fixed());
    assert_relative_eq!(result.value(), 1.11, epsilon = 1e-12);
    assert_relative_eq!(result.bounds.0, 0.5);
}

#[test]
fn test_single_display() {
    let (coords, y, x) = grid_data();
    let result = Selector::new()
        .mode(Single)
        .build()
        .unwrap()
        .search(&coords, &y, &x)
        .unwrap();

    let text = result.to_string();
    assert!(text.starts_with("Summary:"));
    assert!(text.contains("Kernel: adaptive bisquare"));
    assert!(text.contains("Criterion: AICc"));
    assert!(text.contains("Search: golden_section"));
    assert!(text.contains("Selected bandwidth: 17 neighbors"));
    assert!(text.contains("Model fits:"));
}

// ============================================================================
// Custom Evaluator Tests
// ============================================================================

/// Evaluator whose fit quality peaks at 12 neighbors.
struct PeakedEvaluator;

impl ModelEvaluator<f64> for PeakedEvaluator {
    fn n_obs(&self) -> usize {
        30
    }

    fn kernel(&self) -> KernelSpec {
        KernelSpec::new(Triangular, false)
    }

    fn distance_range(&self) -> (f64, f64) {
        (1.0, 5.0)
    }

    fn fit(&self, y: &[f64], _x: &[f64], n_vars: usize, bandwidth: f64) -> Result<LocalFit<f64>, GwrError> {
        let offset = ((bandwidth - 12.0).abs() + 0.5).sqrt();
        let fitted: Vec<f64> = y
            .iter()
            .enumerate()
            .map(|(i, &v)| if i == 0 { v - offset } else { v })
            .collect();
        Ok(LocalFit::new(y, n_vars, vec![0.0; y.len() * n_vars], fitted, vec![0.1; y.len()]))
    }
}

#[test]
fn test_search_with_custom_evaluator() {
    let y = vec![1.0; 30];
    let design = vec![1.0; 30];
    let result = Selector::new()
        .search_method(Interval)
        .bw_min(3.0)
        .bw_max(30.0)
        .interval(1.0)
        .mode(Single)
        .build()
        .unwrap()
        .search_with(&PeakedEvaluator, &y, &design, 1)
        .unwrap();

    assert_eq!(result.bandwidth, Bandwidth::Adaptive(12));
    assert_eq!(result.kernel, KernelSpec::new(Triangular, false));
}

// ============================================================================
// Multi Bandwidth Tests
// ============================================================================

#[test]
fn test_multi_search() {
    let (coords, y, x) = grid_data();
    let result = Selector::new()
        .max_iter_multi(50)
        .mode(Multi)
        .build()
        .unwrap()
        .search(&coords, &y, &x)
        .unwrap();

    assert_eq!(result.bandwidths.len(), 2);
    assert_eq!(result.n_vars, 2);
    assert!(result.converged);
    assert_eq!(result.convergence, ScoreOfChange);
    assert_eq!(result.fitted.len(), 49);
    for i in 0..49 {
        assert_relative_eq!(result.fitted[i] + result.residuals[i], y[i], epsilon = 1e-9);
    }

    let text = result.to_string();
    assert!(text.contains("Bandwidths:"));
    assert!(text.contains("Converged: true"));
}

#[test]
fn test_multi_without_constant() {
    let (coords, y, x) = grid_data();
    let result = Selector::new()
        .constant(false)
        .max_iter_multi(5)
        .mode(Multi)
        .build()
        .unwrap()
        .search(&coords, &y, &x)
        .unwrap();

    assert_eq!(result.bandwidths.len(), 1);
    assert!(result.sweeps >= 1 && result.sweeps <= 5);
}

/// 8 x 8 grid with three covariates and no intercept, row-major `n x 3`.
fn three_covariate_data() -> (Vec<[f64; 2]>, Vec<f64>, Vec<f64>) {
    let n = 64;
    let coords: Vec<[f64; 2]> = (0..n).map(|i| [(i % 8) as f64, (i / 8) as f64]).collect();
    let mut x = Vec::with_capacity(3 * n);
    let mut y = Vec::with_capacity(n);
    for (i, &[cx, cy]) in coords.iter().enumerate() {
        let x1 = 1.0 + ((i * 29) % 13) as f64 / 13.0;
        let x2 = ((i * 37) % 17) as f64 / 17.0 * 4.0;
        let x3 = (i as f64 * 0.7).sin() + ((i * 11) % 7) as f64 / 7.0;
        x.extend([x1, x2, x3]);
        y.push(
            (1.0 + 0.1 * cy) * x1 + (0.5 + 0.2 * cx) * x2 - 0.8 * x3
                + (((i * 53) % 23) as f64 / 23.0 - 0.5),
        );
    }
    (coords, y, x)
}

#[test]
fn test_multi_three_covariates_without_constant() {
    let (coords, y, x) = three_covariate_data();
    let selector = Selector::new()
        .constant(false)
        .tol_multi(1e-3)
        .mode(Multi)
        .build()
        .unwrap();

    let first = selector.search(&coords, &y, &x).unwrap();
    let second = selector.search(&coords, &y, &x).unwrap();

    assert!(first.converged);
    assert_eq!(first.bandwidths.len(), 3);
    assert_eq!(first.n_vars, 3);
    assert_eq!(first.bandwidths, second.bandwidths);
    assert_eq!(first.sweeps, second.sweeps);
    for bw in &first.bandwidths {
        assert!(!bw.is_fixed());
        // One column per search: at least three neighbors, at most every point.
        assert!(bw.value() >= 3.0 && bw.value() <= 64.0);
    }
}

#[test]
fn test_multi_sweep_cap_is_not_an_error() {
    let (coords, y, x) = grid_data();
    let result = Selector::new()
        .max_iter_multi(2)
        .mode(Multi)
        .build()
        .unwrap()
        .search(&coords, &y, &x)
        .unwrap();

    assert!(!result.converged);
    assert_eq!(result.sweeps, 2);
}

// ============================================================================
// Parsing Tests
// ============================================================================

#[test]
fn test_enums_parse_from_strings() {
    assert_eq!("gaussian".parse::<KernelFunction>().unwrap(), Gaussian);
    assert_eq!("bic".parse::<Criterion>().unwrap(), BIC);
    assert_eq!("interval".parse::<SearchMethod>().unwrap(), Interval);
    assert_eq!("ols".parse::<MultiInit>().unwrap(), Ols);
    assert_eq!("rss".parse::<MultiConvergence>().unwrap(), ResidualSumOfSquares);
    assert!(matches!(
        "cosine".parse::<KernelFunction>(),
        Err(GwrError::UnknownKernel(_))
    ));
}
