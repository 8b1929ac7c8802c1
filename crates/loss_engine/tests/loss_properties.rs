//! Statistical and structural properties of simulated loss distributions.
//!
//! # Test Categories
//!
//! 1. **Correlation recovery**: sample correlation of draws vs target
//! 2. **Marginal calibration**: default frequency vs probability
//! 3. **Loss bounds**: every trial loss lies in `[0, Σ LGD]`
//! 4. **Reproducibility**: same seed gives the same run
//! 5. **Degenerate structures**: identity, zero probability, perfect correlation

use approx::assert_abs_diff_eq;
use loss_core::math::{CorrelationMatrix, QuantileMethod};
use loss_core::types::{Portfolio, SimulationError};
use loss_engine::mc::{
    aggregate_losses, classify_defaults_with, simulate, CorrelatedDraws, CorrelationSampler,
    LossSimulator, SimulationConfig,
};
use loss_engine::rng::StreamFactory;
use proptest::prelude::*;

/// Sample correlation matrix of the rows of `draws`, row-major.
fn sample_correlation_matrix(draws: &CorrelatedDraws) -> Vec<f64> {
    let n = draws.obligors();
    let m = draws.trials() as f64;
    let rows: Vec<Vec<f64>> = (0..n).map(|i| draws.obligor_values(i).collect()).collect();
    let means: Vec<f64> = rows.iter().map(|r| r.iter().sum::<f64>() / m).collect();
    let std: Vec<f64> = rows
        .iter()
        .zip(&means)
        .map(|(r, mu)| (r.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / m).sqrt())
        .collect();

    let mut out = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            let cov = rows[i]
                .iter()
                .zip(&rows[j])
                .map(|(a, b)| (a - means[i]) * (b - means[j]))
                .sum::<f64>()
                / m;
            out[i * n + j] = cov / (std[i] * std[j]);
        }
    }
    out
}

fn frobenius_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn mixed_portfolio() -> Portfolio {
    Portfolio::from_columns(
        &[250_000.0, 400_000.0, 125_000.0, 900_000.0, 610_000.0],
        &[0.02, 0.05, 0.08, 0.01, 0.1],
        &[0.3, 0.45, 0.6, 0.4, 0.5],
    )
    .unwrap()
}

// ============================================================================
// Correlation recovery
// ============================================================================

#[test]
fn test_sample_correlation_matches_target() {
    #[rustfmt::skip]
    let target = CorrelationMatrix::new(&[
        1.0, 0.5, 0.2, 0.0, -0.1,
        0.5, 1.0, 0.3, 0.1, 0.0,
        0.2, 0.3, 1.0, 0.4, 0.2,
        0.0, 0.1, 0.4, 1.0, 0.3,
        -0.1, 0.0, 0.2, 0.3, 1.0,
    ], 5).unwrap();

    let sampler = CorrelationSampler::new(&target).unwrap();
    let draws = sampler
        .sample(100_000, &StreamFactory::new(31), true)
        .unwrap();

    let empirical = sample_correlation_matrix(&draws);
    let distance = frobenius_distance(&empirical, target.as_slice());
    assert!(distance < 0.05, "Frobenius distance {} too large", distance);
}

#[test]
fn test_identity_gives_uncorrelated_draws() {
    let sampler = CorrelationSampler::new(&CorrelationMatrix::identity(4)).unwrap();
    let draws = sampler.sample(100_000, &StreamFactory::new(4), true).unwrap();
    let empirical = sample_correlation_matrix(&draws);

    for i in 0..4 {
        for j in 0..4 {
            if i != j {
                assert_abs_diff_eq!(empirical[i * 4 + j], 0.0, epsilon = 0.02);
            }
        }
    }
}

#[test]
fn test_identity_gives_independent_defaults() {
    let trials = 200_000;
    let probabilities = [0.2, 0.3, 0.5];
    let draws = CorrelationSampler::new(&CorrelationMatrix::identity(3))
        .unwrap()
        .sample(trials, &StreamFactory::new(21), true)
        .unwrap();
    let indicators = classify_defaults_with(&probabilities, &draws, true).unwrap();

    for i in 0..3 {
        for j in (i + 1)..3 {
            let joint = (0..trials)
                .filter(|&t| indicators.get(i, t) && indicators.get(j, t))
                .count() as f64
                / trials as f64;
            let product = indicators.default_frequency(i) * indicators.default_frequency(j);
            let p = probabilities[i] * probabilities[j];
            let tolerance = 4.0 * (p * (1.0 - p) / trials as f64).sqrt();
            assert_abs_diff_eq!(joint, product, epsilon = tolerance);
        }
    }
}

// ============================================================================
// Marginal calibration
// ============================================================================

#[test]
fn test_default_frequency_matches_probability() {
    let portfolio = mixed_portfolio();
    let correlation = CorrelationMatrix::uniform(portfolio.len(), 0.4).unwrap();
    let trials = 200_000;

    let draws = CorrelationSampler::new(&correlation)
        .unwrap()
        .sample(trials, &StreamFactory::new(8), true)
        .unwrap();
    let indicators =
        classify_defaults_with(&portfolio.default_probabilities(), &draws, true).unwrap();

    for (i, p) in portfolio.default_probabilities().into_iter().enumerate() {
        let tolerance = 4.0 * (p * (1.0 - p) / trials as f64).sqrt();
        assert_abs_diff_eq!(indicators.default_frequency(i), p, epsilon = tolerance);
    }
}

#[test]
fn test_mean_loss_converges_to_expected_loss() {
    let portfolio = mixed_portfolio();
    let correlation = CorrelationMatrix::uniform(portfolio.len(), 0.2).unwrap();
    let summary = simulate(&portfolio, &correlation, 200_000, 12).unwrap();

    let expected = portfolio.expected_loss();
    let tolerance = 4.0 * summary.std_dev / (summary.trial_count as f64).sqrt();
    assert_abs_diff_eq!(summary.mean, expected, epsilon = tolerance);
}

// ============================================================================
// Loss bounds and monotone quantiles
// ============================================================================

#[test]
fn test_losses_within_bounds_and_quantiles_monotone() {
    let portfolio = mixed_portfolio();
    let correlation = CorrelationMatrix::uniform(portfolio.len(), 0.3).unwrap();
    let config = SimulationConfig::builder()
        .trial_count(50_000)
        .seed(77)
        .quantile_levels(vec![0.0, 0.01, 0.05, 0.5, 0.95, 0.99, 1.0])
        .build()
        .unwrap();

    let run = LossSimulator::new(config).run(&portfolio, &correlation).unwrap();
    let cap = portfolio.total_loss_given_default();

    for loss in run.losses.iter() {
        assert!((0.0..=cap).contains(&loss), "loss {} outside [0, {}]", loss, cap);
    }

    let summary = &run.summary;
    for pair in summary.quantiles.windows(2) {
        assert!(pair[0].loss <= pair[1].loss);
    }
    assert_eq!(summary.quantile(0.0), Some(summary.min_loss));
    assert_eq!(summary.quantile(1.0), Some(summary.max_loss));
    assert!(summary.min_loss <= summary.mean && summary.mean <= summary.max_loss);
}

#[test]
fn test_quantile_methods_bracket_linear() {
    let portfolio = mixed_portfolio();
    let correlation = CorrelationMatrix::uniform(portfolio.len(), 0.3).unwrap();
    let run_with = |method| {
        let config = SimulationConfig::builder()
            .trial_count(10_001)
            .seed(5)
            .quantile_levels(vec![0.95, 0.99])
            .quantile_method(method)
            .build()
            .unwrap();
        LossSimulator::new(config)
            .run(&portfolio, &correlation)
            .unwrap()
            .summary
    };

    let lower = run_with(QuantileMethod::Lower);
    let linear = run_with(QuantileMethod::Linear);
    let higher = run_with(QuantileMethod::Higher);

    for level in [0.95, 0.99] {
        let (lo, mid, hi) = (
            lower.quantile(level).unwrap(),
            linear.quantile(level).unwrap(),
            higher.quantile(level).unwrap(),
        );
        assert!(lo <= mid && mid <= hi);
    }
}

// ============================================================================
// Reproducibility
// ============================================================================

#[test]
fn test_same_seed_same_summary() {
    let portfolio = mixed_portfolio();
    let correlation = CorrelationMatrix::uniform(portfolio.len(), 0.2).unwrap();

    let a = simulate(&portfolio, &correlation, 20_000, 2024).unwrap();
    let b = simulate(&portfolio, &correlation, 20_000, 2024).unwrap();
    let c = simulate(&portfolio, &correlation, 20_000, 2025).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_sequential_and_parallel_runs_identical() {
    let portfolio = mixed_portfolio();
    let correlation = CorrelationMatrix::uniform(portfolio.len(), 0.35).unwrap();
    let run = |parallel| {
        let config = SimulationConfig::builder()
            .trial_count(12_345)
            .seed(9)
            .parallel(parallel)
            .build()
            .unwrap();
        LossSimulator::new(config).run(&portfolio, &correlation).unwrap()
    };

    assert_eq!(run(true), run(false));
}

// ============================================================================
// Degenerate structures
// ============================================================================

#[test]
fn test_zero_probability_never_loses() {
    let portfolio = Portfolio::from_columns(&[1_000.0, 2_000.0], &[0.0, 0.0], &[0.4, 0.4]).unwrap();
    let summary = simulate(&portfolio, &CorrelationMatrix::uniform(2, 0.5).unwrap(), 10_000, 3)
        .unwrap();

    assert_eq!(summary.max_loss, 0.0);
    assert_eq!(summary.mean, 0.0);
    assert!(summary.quantiles.iter().all(|q| q.loss == 0.0));
}

#[test]
fn test_single_obligor_zero_probability() {
    let portfolio = Portfolio::from_columns(&[750.0], &[0.0], &[0.2]).unwrap();
    let config = SimulationConfig::builder()
        .trial_count(5_000)
        .seed(9)
        .quantile_levels(vec![0.0, 0.5, 0.99, 1.0])
        .build()
        .unwrap();

    let run = LossSimulator::new(config)
        .run(&portfolio, &CorrelationMatrix::identity(1))
        .unwrap();

    assert_eq!(run.summary.mean, 0.0);
    assert_eq!(run.summary.std_dev, 0.0);
    assert_eq!(run.summary.quantiles.len(), 4);
    for point in &run.summary.quantiles {
        assert_eq!(point.loss, 0.0);
        assert!(!point.loss.is_sign_negative());
    }
    for loss in run.losses.iter() {
        assert_eq!(loss, 0.0);
        assert!(!loss.is_sign_negative());
    }
    assert!(!run.summary.min_loss.is_sign_negative());
    assert!(!run.summary.max_loss.is_sign_negative());
}

#[test]
fn test_certain_default_always_loses_full_lgd() {
    let portfolio = Portfolio::from_columns(&[1_000.0, 2_000.0], &[1.0, 1.0], &[0.25, 0.5]).unwrap();
    let summary = simulate(&portfolio, &CorrelationMatrix::identity(2), 1_000, 3).unwrap();

    let total = portfolio.total_loss_given_default();
    assert_eq!(summary.min_loss, total);
    assert_eq!(summary.max_loss, total);
    assert_eq!(summary.std_dev, 0.0);
}

#[test]
fn test_perfect_correlation_defaults_jointly() {
    let portfolio = Portfolio::from_columns(&[100.0, 150.0], &[0.5, 0.5], &[0.4, 0.4]).unwrap();
    let correlation = CorrelationMatrix::uniform(2, 1.0).unwrap();
    let config = SimulationConfig::builder()
        .trial_count(20_000)
        .seed(1)
        .build()
        .unwrap();

    let run = LossSimulator::new(config).run(&portfolio, &correlation).unwrap();
    let total = portfolio.total_loss_given_default();
    for loss in run.losses.iter() {
        assert!(loss == 0.0 || loss == total, "partial default loss {}", loss);
    }
    assert_abs_diff_eq!(run.summary.mean, 0.5 * total, epsilon = 0.02 * total);
}

#[test]
fn test_perfect_correlation_loss_support() {
    let portfolio = Portfolio::from_columns(&[100.0, 200.0], &[0.5, 0.5], &[0.5, 0.5]).unwrap();
    let correlation = CorrelationMatrix::uniform(2, 1.0).unwrap();
    let config = SimulationConfig::builder()
        .trial_count(10_000)
        .seed(3)
        .build()
        .unwrap();

    let run = LossSimulator::new(config).run(&portfolio, &correlation).unwrap();
    for loss in run.losses.iter() {
        assert!(loss == 0.0 || loss == 150.0, "unexpected loss {}", loss);
    }
    assert!(run.losses.iter().any(|loss| loss == 150.0));
    assert!(run.losses.iter().any(|loss| loss == 0.0));
}

#[test]
fn test_single_obligor_bernoulli() {
    let portfolio = Portfolio::from_columns(&[500.0], &[0.1], &[0.0]).unwrap();
    let summary = simulate(&portfolio, &CorrelationMatrix::identity(1), 100_000, 6).unwrap();

    assert_abs_diff_eq!(summary.mean, 50.0, epsilon = 4.0 * 150.0 / 100_000.0_f64.sqrt());
    assert_eq!(summary.quantile(0.05), Some(0.0));
    assert_eq!(summary.quantile(0.95), Some(500.0));
    assert_eq!(summary.quantile(0.99), Some(500.0));
}

#[test]
fn test_draw_matrix_dimension_checks() {
    let draws = CorrelatedDraws::new(2, 2, vec![0.0; 4]).unwrap();
    let indicators = classify_defaults_with(&[0.5, 0.5], &draws, false).unwrap();
    let err = aggregate_losses(&[1.0, 2.0, 3.0], &indicators).unwrap_err();
    assert!(matches!(err, SimulationError::DimensionMismatch { .. }));
}

#[test]
fn test_not_psd_correlation_rejected() {
    let portfolio = mixed_portfolio();
    let correlation = CorrelationMatrix::uniform(portfolio.len(), -0.5).unwrap();
    let err = simulate(&portfolio, &correlation, 1_000, 1).unwrap_err();
    assert!(matches!(err, SimulationError::InvalidCorrelationStructure(_)));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property test: losses stay within bounds for arbitrary valid inputs.
    #[test]
    fn prop_losses_bounded(
        seed in any::<u64>(),
        rho in 0.0_f64..0.95,
        probabilities in prop::collection::vec(0.0_f64..=1.0, 1..8),
    ) {
        let n = probabilities.len();
        let exposures: Vec<f64> = (0..n).map(|i| 100.0 * (i + 1) as f64).collect();
        let recoveries = vec![0.4; n];
        let portfolio = Portfolio::from_columns(&exposures, &probabilities, &recoveries).unwrap();
        let correlation = CorrelationMatrix::uniform(n, rho).unwrap();

        let summary = simulate(&portfolio, &correlation, 2_000, seed).unwrap();
        let cap = portfolio.total_loss_given_default();
        prop_assert!(summary.min_loss >= 0.0);
        prop_assert!(summary.max_loss <= cap + 1e-9);
        for pair in summary.quantiles.windows(2) {
            prop_assert!(pair[0].loss <= pair[1].loss);
        }
    }
}
