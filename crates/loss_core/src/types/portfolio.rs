//! Obligor and portfolio definitions.
//!
//! A [`Portfolio`] is a fixed, ordered list of [`Obligor`]s. The position of
//! an obligor in the portfolio is its index everywhere else in the
//! workspace: in the correlation matrix, in the draw matrix and in error
//! messages.

use super::error::{SimulationError, SimulationResult};

/// A single credit obligor.
///
/// Holds the exposure at default, the marginal default probability over
/// the horizon and the recovery rate applied to the exposure on default.
///
/// # Examples
///
/// ```
/// use loss_core::types::Obligor;
///
/// let obligor = Obligor::new(1_000_000.0, 0.02, 0.4);
/// assert_eq!(obligor.loss_given_default(), 600_000.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obligor {
    /// Exposure at default (currency units).
    exposure: f64,
    /// Marginal default probability.
    default_probability: f64,
    /// Fraction of exposure recovered on default.
    recovery_rate: f64,
}

impl Obligor {
    /// Creates an obligor.
    ///
    /// Values are checked when the obligor joins a [`Portfolio`], where the
    /// obligor's index is known and can be reported.
    #[inline]
    pub fn new(exposure: f64, default_probability: f64, recovery_rate: f64) -> Self {
        Self {
            exposure,
            default_probability,
            recovery_rate,
        }
    }

    /// Returns the exposure at default.
    #[inline]
    pub fn exposure(&self) -> f64 {
        self.exposure
    }

    /// Returns the marginal default probability.
    #[inline]
    pub fn default_probability(&self) -> f64 {
        self.default_probability
    }

    /// Returns the recovery rate.
    #[inline]
    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    /// Loss given default: `exposure * (1 - recovery)`.
    #[inline]
    pub fn loss_given_default(&self) -> f64 {
        self.exposure * (1.0 - self.recovery_rate)
    }

    /// Validates the obligor, reporting failures against `index`.
    ///
    /// # Errors
    ///
    /// - `InvalidExposure` if the exposure is not positive and finite
    /// - `InvalidProbability` if the probability is outside [0, 1] or NaN
    /// - `InvalidRecovery` if the recovery rate is outside [0, 1] or NaN
    pub fn validate(&self, index: usize) -> SimulationResult<()> {
        if !(self.exposure.is_finite() && self.exposure > 0.0) {
            return Err(SimulationError::InvalidExposure {
                index,
                value: self.exposure,
            });
        }
        if !(0.0..=1.0).contains(&self.default_probability) {
            return Err(SimulationError::InvalidProbability {
                index,
                value: self.default_probability,
            });
        }
        if !(0.0..=1.0).contains(&self.recovery_rate) {
            return Err(SimulationError::InvalidRecovery {
                index,
                value: self.recovery_rate,
            });
        }
        Ok(())
    }
}

/// Immutable, validated collection of obligors.
///
/// # Examples
///
/// ```
/// use loss_core::types::Portfolio;
///
/// let portfolio = Portfolio::from_columns(
///     &[100.0, 200.0],
///     &[0.5, 0.5],
///     &[0.5, 0.5],
/// ).unwrap();
///
/// assert_eq!(portfolio.len(), 2);
/// assert_eq!(portfolio.loss_given_default(), vec![50.0, 100.0]);
/// assert_eq!(portfolio.total_exposure(), 300.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Obligor>", into = "Vec<Obligor>")
)]
pub struct Portfolio {
    obligors: Vec<Obligor>,
}

impl Portfolio {
    /// Builds a portfolio from obligors, validating each one.
    ///
    /// # Errors
    ///
    /// - `DimensionMismatch` if `obligors` is empty
    /// - the first per-obligor validation failure otherwise
    pub fn new(obligors: Vec<Obligor>) -> SimulationResult<Self> {
        if obligors.is_empty() {
            return Err(SimulationError::DimensionMismatch {
                context: "portfolio obligor count",
                expected: 1,
                got: 0,
            });
        }
        for (index, obligor) in obligors.iter().enumerate() {
            obligor.validate(index)?;
        }
        Ok(Self { obligors })
    }

    /// Builds a portfolio from three parallel columns.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if the columns differ in length, then the same
    /// errors as [`Portfolio::new`].
    pub fn from_columns(
        exposures: &[f64],
        default_probabilities: &[f64],
        recovery_rates: &[f64],
    ) -> SimulationResult<Self> {
        let n = exposures.len();
        if default_probabilities.len() != n {
            return Err(SimulationError::DimensionMismatch {
                context: "default probabilities vs exposures",
                expected: n,
                got: default_probabilities.len(),
            });
        }
        if recovery_rates.len() != n {
            return Err(SimulationError::DimensionMismatch {
                context: "recovery rates vs exposures",
                expected: n,
                got: recovery_rates.len(),
            });
        }

        let obligors = exposures
            .iter()
            .zip(default_probabilities)
            .zip(recovery_rates)
            .map(|((&e, &p), &r)| Obligor::new(e, p, r))
            .collect();
        Self::new(obligors)
    }

    /// Number of obligors.
    #[inline]
    pub fn len(&self) -> usize {
        self.obligors.len()
    }

    /// Always false; an empty portfolio cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.obligors.is_empty()
    }

    /// Obligors in portfolio order.
    #[inline]
    pub fn obligors(&self) -> &[Obligor] {
        &self.obligors
    }

    /// Exposures in portfolio order.
    pub fn exposures(&self) -> Vec<f64> {
        self.obligors.iter().map(Obligor::exposure).collect()
    }

    /// Marginal default probabilities in portfolio order.
    pub fn default_probabilities(&self) -> Vec<f64> {
        self.obligors
            .iter()
            .map(Obligor::default_probability)
            .collect()
    }

    /// Loss given default per obligor, in portfolio order.
    pub fn loss_given_default(&self) -> Vec<f64> {
        self.obligors
            .iter()
            .map(Obligor::loss_given_default)
            .collect()
    }

    /// Sum of exposures; the upper bound of any scenario loss.
    pub fn total_exposure(&self) -> f64 {
        self.obligors.iter().map(Obligor::exposure).sum()
    }

    /// Loss if every obligor defaults.
    pub fn total_loss_given_default(&self) -> f64 {
        self.obligors.iter().map(Obligor::loss_given_default).sum()
    }

    /// Exposure-weighted expected loss, `sum(p_i * LGD_i)`.
    ///
    /// The simulated mean loss converges to this value whatever the
    /// correlation, which makes it a convenient sanity check.
    pub fn expected_loss(&self) -> f64 {
        self.obligors
            .iter()
            .map(|o| o.default_probability() * o.loss_given_default())
            .sum()
    }
}

impl TryFrom<Vec<Obligor>> for Portfolio {
    type Error = SimulationError;

    fn try_from(obligors: Vec<Obligor>) -> Result<Self, Self::Error> {
        Self::new(obligors)
    }
}

impl From<Portfolio> for Vec<Obligor> {
    fn from(portfolio: Portfolio) -> Self {
        portfolio.obligors
    }
}
