//! Dense row-major tensors handed to model trainers

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Dense `(rows, cols)` matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// All-zero matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wrap row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidInput(format!(
                "matrix data has {} elements, shape ({rows}, {cols}) needs {}",
                data.len(),
                rows * cols
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// `(rows, cols)`
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Element at `(r, c)`.
    #[must_use]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    /// Set element at `(r, c)`.
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        self.data[r * self.cols + c] = value;
    }

    /// Borrow row `r`.
    #[must_use]
    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// Row-major data.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Dense `(samples, steps, channels)` tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor3 {
    shape: [usize; 3],
    data: Vec<f64>,
}

impl Tensor3 {
    /// All-zero tensor.
    #[must_use]
    pub fn zeros(samples: usize, steps: usize, channels: usize) -> Self {
        Self {
            shape: [samples, steps, channels],
            data: vec![0.0; samples * steps * channels],
        }
    }

    /// Wrap row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the data length does not match the shape.
    pub fn from_vec(shape: [usize; 3], data: Vec<f64>) -> Result<Self> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(Error::InvalidInput(format!(
                "tensor data has {} elements, shape {shape:?} needs {expected}",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    /// `[samples, steps, channels]`
    #[must_use]
    pub const fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Number of samples (first axis).
    #[must_use]
    pub const fn samples(&self) -> usize {
        self.shape[0]
    }

    const fn offset(&self, s: usize, t: usize, c: usize) -> usize {
        (s * self.shape[1] + t) * self.shape[2] + c
    }

    /// Element at `[s][t][c]`.
    #[must_use]
    pub fn get(&self, s: usize, t: usize, c: usize) -> f64 {
        self.data[self.offset(s, t, c)]
    }

    /// Set element at `[s][t][c]`.
    pub fn set(&mut self, s: usize, t: usize, c: usize, value: f64) {
        let i = self.offset(s, t, c);
        self.data[i] = value;
    }

    /// Borrow sample `s` as a flat `(steps * channels)` slice.
    #[must_use]
    pub fn sample(&self, s: usize) -> &[f64] {
        let stride = self.shape[1] * self.shape[2];
        &self.data[s * stride..(s + 1) * stride]
    }

    /// Flatten each sample into one row: `(samples, steps * channels)`.
    #[must_use]
    pub fn to_rows(&self) -> Matrix {
        Matrix {
            rows: self.shape[0],
            cols: self.shape[1] * self.shape[2],
            data: self.data.clone(),
        }
    }

    /// Row-major data.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor3_indexing() {
        let mut t = Tensor3::zeros(2, 3, 2);
        t.set(1, 2, 1, 7.0);
        assert!((t.get(1, 2, 1) - 7.0).abs() < f64::EPSILON);
        assert!((t.sample(1)[5] - 7.0).abs() < f64::EPSILON);
        assert_eq!(t.as_slice().iter().filter(|&&v| v != 0.0).count(), 1);
    }

    #[test]
    fn test_to_rows() {
        let y = Tensor3::from_vec([2, 1, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let rows = y.to_rows();
        assert_eq!(rows.shape(), (2, 2));
        assert_eq!(rows.row(1), &[3.0, 4.0]);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        assert!(Tensor3::from_vec([2, 2, 2], vec![0.0; 7]).is_err());
        assert!(Matrix::from_vec(2, 2, vec![0.0; 3]).is_err());
    }

    #[test]
    fn test_matrix_rows() {
        let m = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert!((m.get(0, 1) - 2.0).abs() < f64::EPSILON);
    }
}
