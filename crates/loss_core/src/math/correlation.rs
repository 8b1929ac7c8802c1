//! Correlation matrices and their Cholesky factors.
//!
//! This module provides the factor transform used to impose a target
//! correlation structure on independent standard normal draws.
//!
//! ## Mathematical Background
//!
//! Given `n` independent standard normal random variables `Z = [Z1, ..., Zn]`,
//! correlated normals `W = [W1, ..., Wn]` are obtained as:
//!
//! ```text
//! W = L * Z
//! ```
//!
//! where `L` is the lower triangular Cholesky factor of the correlation
//! matrix `C`:
//!
//! ```text
//! C = L * L^T
//! ```
//!
//! ## Semi-definite input
//!
//! Perfectly correlated obligors make `C` singular. The factorisation here
//! accepts positive *semi*-definite matrices: a pivot whose residual is
//! within [`PIVOT_TOLERANCE`] of zero yields a zero column, as long as the
//! entries below it are consistent with zero.
//!
//! ## Usage
//!
//! ```
//! use loss_core::math::CorrelationMatrix;
//!
//! let corr = CorrelationMatrix::new(&[
//!     1.0, 0.5,
//!     0.5, 1.0,
//! ], 2).unwrap();
//!
//! let cholesky = corr.cholesky().unwrap();
//! let w = cholesky.transform(&[0.5, 0.8]);
//! assert_eq!(w.len(), 2);
//! ```

use crate::types::CorrelationError;

/// Tolerance for the unit diagonal and symmetry checks.
pub const VALIDATION_TOLERANCE: f64 = 1e-10;

/// Pivot residual at or below which a Cholesky column is treated as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-10;

/// Largest sub-diagonal residual allowed under a zero pivot.
///
/// For a semi-definite matrix the residual is bounded by the square root of
/// the product of the two pivots, so this is `sqrt(PIVOT_TOLERANCE)`.
pub const RESIDUAL_TOLERANCE: f64 = 1e-5;

/// Correlation matrix with validation and Cholesky decomposition.
///
/// A correlation matrix must satisfy:
/// - Square, with finite entries
/// - Diagonal elements equal to 1.0
/// - Symmetric
/// - Off-diagonal elements in [-1, 1]
/// - Positive semi-definite (checked by [`CorrelationMatrix::cholesky`])
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix {
    /// Matrix elements in row-major order
    data: Vec<f64>,
    /// Matrix dimension (n x n)
    dim: usize,
}

impl CorrelationMatrix {
    /// Creates a correlation matrix from a flat row-major array.
    ///
    /// # Arguments
    ///
    /// * `data` - Matrix elements in row-major order (`dim * dim` elements)
    /// * `dim` - Matrix dimension
    ///
    /// # Errors
    ///
    /// `InvalidDimensions`, `NonFinite`, `InvalidDiagonal`, `NotSymmetric`
    /// or `OutOfRange`, checked in that order.
    pub fn new(data: &[f64], dim: usize) -> Result<Self, CorrelationError> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(CorrelationError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        for i in 0..dim {
            for j in 0..dim {
                if !data[i * dim + j].is_finite() {
                    return Err(CorrelationError::NonFinite { i, j });
                }
            }
        }

        for i in 0..dim {
            let diag = data[i * dim + i];
            if (diag - 1.0).abs() > VALIDATION_TOLERANCE {
                return Err(CorrelationError::InvalidDiagonal {
                    index: i,
                    value: diag,
                });
            }
        }

        for i in 0..dim {
            for j in (i + 1)..dim {
                let val_ij = data[i * dim + j];
                let val_ji = data[j * dim + i];

                if (val_ij - val_ji).abs() > VALIDATION_TOLERANCE {
                    return Err(CorrelationError::NotSymmetric { i, j });
                }

                if !(-1.0..=1.0).contains(&val_ij) {
                    return Err(CorrelationError::OutOfRange {
                        i,
                        j,
                        value: val_ij,
                    });
                }
            }
        }

        Ok(Self {
            data: data.to_vec(),
            dim,
        })
    }

    /// Creates a correlation matrix from rows.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` if any row length differs from the row count,
    /// otherwise as [`CorrelationMatrix::new`].
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, CorrelationError> {
        let dim = rows.len();
        if let Some(row) = rows.iter().find(|row| row.len() != dim) {
            return Err(CorrelationError::InvalidDimensions {
                expected: dim * dim,
                got: dim * row.len(),
            });
        }
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new(&data, dim)
    }

    /// Creates an identity correlation matrix (independent obligors).
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self { data, dim }
    }

    /// Creates a matrix with every off-diagonal entry equal to `rho`.
    ///
    /// This is the single-factor structure most portfolio models start
    /// from. It is positive semi-definite for `rho` in `[-1/(dim-1), 1]`;
    /// values below that range pass construction and fail at
    /// factorisation.
    ///
    /// # Errors
    ///
    /// `NonFinite` or `OutOfRange` if `rho` is not a valid correlation.
    pub fn uniform(dim: usize, rho: f64) -> Result<Self, CorrelationError> {
        let mut data = vec![rho; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self::new(&data, dim)
    }

    /// Returns the matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the element at (i, j).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    /// Returns the elements in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Computes the lower triangular factor `L` with `C = L * L^T`.
    ///
    /// # Errors
    ///
    /// `NotPositiveSemiDefinite` with the failing pivot if a pivot residual
    /// is negative beyond [`PIVOT_TOLERANCE`], or if a zero pivot has a
    /// sub-diagonal residual above [`RESIDUAL_TOLERANCE`].
    pub fn cholesky(&self) -> Result<CholeskyFactor, CorrelationError> {
        let n = self.dim;
        let mut lower = vec![0.0; n * n];

        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..j {
                let l_jk = lower[j * n + k];
                sum += l_jk * l_jk;
            }
            let diag = self.get(j, j) - sum;

            if diag < -PIVOT_TOLERANCE {
                return Err(CorrelationError::NotPositiveSemiDefinite { pivot: j });
            }

            if diag <= PIVOT_TOLERANCE {
                // Column j is linearly dependent on earlier columns.
                for i in (j + 1)..n {
                    let mut residual = self.get(i, j);
                    for k in 0..j {
                        residual -= lower[i * n + k] * lower[j * n + k];
                    }
                    if residual.abs() > RESIDUAL_TOLERANCE {
                        return Err(CorrelationError::NotPositiveSemiDefinite { pivot: j });
                    }
                }
                continue;
            }

            let l_jj = diag.sqrt();
            lower[j * n + j] = l_jj;

            for i in (j + 1)..n {
                let mut acc = self.get(i, j);
                for k in 0..j {
                    acc -= lower[i * n + k] * lower[j * n + k];
                }
                lower[i * n + j] = acc / l_jj;
            }
        }

        Ok(CholeskyFactor { data: lower, dim: n })
    }
}

/// Lower triangular Cholesky factor of a correlation matrix.
///
/// Transforms independent standard normals into correlated normals.
#[derive(Clone, Debug, PartialEq)]
pub struct CholeskyFactor {
    /// Lower triangular matrix elements (row-major)
    data: Vec<f64>,
    /// Matrix dimension
    dim: usize,
}

impl CholeskyFactor {
    /// Returns the matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the element at (i, j); zero above the diagonal.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if j > i {
            0.0
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Number of non-zero pivots, i.e. the rank of the correlation matrix.
    pub fn rank(&self) -> usize {
        (0..self.dim)
            .filter(|&i| self.data[i * self.dim + i] > 0.0)
            .count()
    }

    /// Computes `W = L * Z` into a caller-provided buffer.
    ///
    /// # Panics
    ///
    /// Panics if `z` or `out` is shorter than `self.dim()`.
    #[inline]
    pub fn transform_into(&self, z: &[f64], out: &mut [f64]) {
        assert!(
            z.len() >= self.dim && out.len() >= self.dim,
            "Buffer lengths ({}, {}) are less than matrix dimension {}",
            z.len(),
            out.len(),
            self.dim
        );

        let n = self.dim;
        for i in 0..n {
            let row = &self.data[i * n..i * n + i + 1];
            out[i] = row.iter().zip(&z[..=i]).map(|(l, z)| l * z).sum();
        }
    }

    /// Transforms independent standard normals to correlated normals.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform(&self, z: &[f64]) -> Vec<f64> {
        let mut w = vec![0.0; self.dim];
        self.transform_into(z, &mut w);
        w
    }
}
