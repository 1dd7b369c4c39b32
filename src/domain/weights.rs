//! Long-only portfolio weights on the unit simplex.

use rand::Rng;

use crate::domain::error::AnalysisError;

/// Tolerance for the sum-to-one check.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    /// Wrap weights that already satisfy the simplex constraint.
    pub fn new(weights: Vec<f64>) -> Result<Self, AnalysisError> {
        if weights.is_empty() {
            return Err(AnalysisError::invalid("weights", "no weights given"));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(AnalysisError::invalid(
                "weights",
                "weights must be finite and non-negative",
            ));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(AnalysisError::invalid(
                "weights",
                format!("weights sum to {sum}, expected 1"),
            ));
        }
        Ok(Self(weights))
    }

    /// Every asset gets `1 / n`.
    pub fn equal(n: usize) -> Result<Self, AnalysisError> {
        if n == 0 {
            return Err(AnalysisError::invalid("weights", "no assets to weight"));
        }
        Ok(Self(vec![1.0 / n as f64; n]))
    }

    /// Independent `U[0, 1)` draws normalized by their sum.
    ///
    /// An all-zero draw is redrawn so the result is always on the simplex.
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Result<Self, AnalysisError> {
        if n == 0 {
            return Err(AnalysisError::invalid("weights", "no assets to weight"));
        }
        loop {
            let raw: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
            let sum: f64 = raw.iter().sum();
            if sum > 0.0 {
                return Ok(Self(raw.into_iter().map(|w| w / sum).collect()));
            }
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
