//! Z-score scaling for the numeric screening features.
//!
//! Two semantics live side by side. [`zscore_batch`] reproduces the original
//! per-batch behavior: mean and sample standard deviation are recomputed from
//! the batch being transformed, which degenerates to `NaN` for a single-row
//! batch. [`ColumnStats`] separates fit from transform: statistics are learned
//! once over the training data, persisted with the model artifact, and applied
//! as a pure function at inference time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScalerError {
    #[error("cannot fit scaler statistics on an empty column")]
    EmptyColumn,
    #[error("column contains a non-finite value: {0}")]
    NonFinite(f64),
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1, matching `pandas.Series.std`).
/// A single observation yields `NaN`.
fn sample_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (n as f64 - 1.0)).sqrt()
}

/// Replace every value in the batch with its z-score computed from the batch
/// itself. Faithful to the source convention: a batch of one produces `NaN`,
/// and a constant batch divides by zero. Callers wanting stable inference
/// should use fitted [`ColumnStats`] instead.
pub fn zscore_batch(values: &mut [f64]) {
    if values.is_empty() {
        return;
    }
    let m = mean(values);
    let s = sample_std(values, m);
    if values.len() < 2 {
        tracing::warn!(
            batch_len = values.len(),
            "z-scoring a single-row batch yields NaN; supply fitted statistics instead"
        );
    }
    for value in values.iter_mut() {
        *value = (*value - m) / s;
    }
}

/// Fitted location/scale for one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub mean: f64,
    pub std: f64,
}

impl ColumnStats {
    /// Learn mean and sample standard deviation from a training column.
    /// A constant column gets a standard deviation of 1.0 so the transform
    /// stays finite.
    pub fn fit(values: &[f64]) -> Result<Self, ScalerError> {
        if values.is_empty() {
            return Err(ScalerError::EmptyColumn);
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ScalerError::NonFinite(*bad));
        }

        let m = mean(values);
        let s = sample_std(values, m);
        let s = if s == 0.0 || s.is_nan() { 1.0 } else { s };

        Ok(Self { mean: m, std: s })
    }

    /// Z-score one value against the fitted statistics.
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }
}

/// Fitted statistics for the two scaled columns, persisted inside the model
/// artifact so inference uses training-time parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerStats {
    pub applicant_income: ColumnStats,
    pub loan_amount: ColumnStats,
}
