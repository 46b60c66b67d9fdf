//! Min-max feature scaling
//!
//! Scalers are plain values: fit them on a series, keep them next to the
//! transformed data, and reuse them (or not) explicitly. Nothing is shared
//! behind the caller's back.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Linear rescaling of a 1-D series into `[range_min, range_max]`.
///
/// A constant series (zero data range) maps every value to `range_min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    range_min: f64,
    range_max: f64,
    data_min: f64,
    data_max: f64,
}

impl MinMaxScaler {
    /// Fit a scaler targeting `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `data` is empty or contains a
    /// non-finite value.
    pub fn fit(data: &[f64]) -> Result<Self> {
        Self::fit_with_range(data, 0.0, 1.0)
    }

    /// Fit a scaler targeting `[range_min, range_max]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `data` is empty, contains a
    /// non-finite value, or the range is not increasing.
    pub fn fit_with_range(data: &[f64], range_min: f64, range_max: f64) -> Result<Self> {
        if range_min >= range_max {
            return Err(Error::InvalidInput(format!(
                "feature range must be increasing, got [{range_min}, {range_max}]"
            )));
        }
        if data.is_empty() {
            return Err(Error::InvalidInput(
                "cannot fit a scaler on an empty series".to_string(),
            ));
        }
        if let Some(bad) = data.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "cannot fit a scaler on non-finite value {bad}"
            )));
        }

        let (data_min, data_max) = data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        Ok(Self {
            range_min,
            range_max,
            data_min,
            data_max,
        })
    }

    /// Smallest value seen during fitting.
    #[must_use]
    pub const fn data_min(&self) -> f64 {
        self.data_min
    }

    /// Largest value seen during fitting.
    #[must_use]
    pub const fn data_max(&self) -> f64 {
        self.data_max
    }

    /// Multiplier applied after shifting by `data_min`.
    #[must_use]
    pub fn scale(&self) -> f64 {
        let span = self.data_max - self.data_min;
        if span == 0.0 {
            1.0
        } else {
            (self.range_max - self.range_min) / span
        }
    }

    /// Rescale one value.
    #[must_use]
    pub fn transform_value(&self, v: f64) -> f64 {
        (v - self.data_min).mul_add(self.scale(), self.range_min)
    }

    /// Rescale a series.
    #[must_use]
    pub fn transform(&self, data: &[f64]) -> Vec<f64> {
        data.iter().map(|&v| self.transform_value(v)).collect()
    }

    /// Map a rescaled value back into data units.
    #[must_use]
    pub fn inverse_transform_value(&self, v: f64) -> f64 {
        (v - self.range_min) / self.scale() + self.data_min
    }

    /// Fit on `data` and return the scaler with the rescaled series.
    ///
    /// # Errors
    ///
    /// See [`MinMaxScaler::fit`].
    pub fn fit_transform(data: &[f64]) -> Result<(Self, Vec<f64>)> {
        let scaler = Self::fit(data)?;
        let scaled = scaler.transform(data);
        Ok((scaler, scaled))
    }
}
