//! Integration tests for module exports.
//!
//! Verify that public modules and types are reachable via absolute paths
//! and via the crate-root re-exports.

/// Test that math items are accessible via absolute path.
#[test]
fn test_math_module_exports() {
    use loss_core::math::correlation::{CholeskyFactor, CorrelationMatrix};
    use loss_core::math::distributions::{default_thresholds, standard_normal_cdf};
    use loss_core::math::statistics::{empirical_quantile, LossHistogram, QuantileMethod};

    let corr = CorrelationMatrix::identity(2);
    let factor: CholeskyFactor = corr.cholesky().unwrap();
    assert_eq!(factor.rank(), 2);

    let thresholds = default_thresholds(&[0.5]).unwrap();
    assert!((standard_normal_cdf(thresholds[0]) - 0.5).abs() < 1e-12);

    let q = empirical_quantile(&[1.0, 2.0], 1.0, QuantileMethod::Linear).unwrap();
    assert_eq!(q, 2.0);

    let histogram = LossHistogram::from_losses(&[1.0, 2.0], 1).unwrap();
    assert_eq!(histogram.counts(), &[2]);
}

/// Test that types are accessible via absolute path.
#[test]
fn test_types_module_exports() {
    use loss_core::types::error::{CorrelationError, SimulationError, SimulationResult};
    use loss_core::types::portfolio::{Obligor, Portfolio};

    let portfolio: SimulationResult<Portfolio> =
        Portfolio::new(vec![Obligor::new(100.0, 0.1, 0.4)]);
    assert_eq!(portfolio.unwrap().len(), 1);

    let err: SimulationError = CorrelationError::NotPositiveSemiDefinite { pivot: 1 }.into();
    assert!(matches!(err, SimulationError::InvalidCorrelationStructure(_)));
}

/// Test crate-root re-exports.
#[test]
fn test_root_reexports() {
    use loss_core::{CorrelationMatrix, Obligor, Portfolio, QuantileMethod, SimulationError};

    let portfolio = Portfolio::new(vec![
        Obligor::new(100.0, 0.1, 0.4),
        Obligor::new(200.0, 0.2, 0.5),
    ])
    .unwrap();
    let corr = CorrelationMatrix::uniform(portfolio.len(), 0.3).unwrap();
    assert_eq!(corr.dim(), 2);
    assert_eq!("midpoint".parse::<QuantileMethod>().unwrap(), QuantileMethod::Midpoint);
    assert!(matches!(
        "median".parse::<QuantileMethod>(),
        Err(SimulationError::InvalidParameter { .. })
    ));
}
