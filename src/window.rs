//! Sliding-window sampling ("convolution")
//!
//! Windows are full-length contiguous copies taken at a fixed stride from
//! offset 0. They never wrap and never pad; a sequence shorter than the
//! window yields nothing.

use crate::{Error, Result};

/// Window geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    /// Elements per window
    pub len: usize,
    /// Upper bound on windows produced per sequence
    pub max_count: usize,
    /// Offset between consecutive window starts
    pub stride: usize,
}

impl WindowSpec {
    /// Windows of `len` elements, non-overlapping (stride = `len`).
    #[must_use]
    pub const fn new(len: usize, max_count: usize) -> Self {
        Self {
            len,
            max_count,
            stride: len,
        }
    }

    /// Override the stride.
    #[must_use]
    pub const fn stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Number of windows this spec yields over a sequence of `n` elements.
    #[must_use]
    pub fn count_for(&self, n: usize) -> usize {
        if self.len == 0 || self.stride == 0 || n < self.len {
            return 0;
        }
        ((n - self.len) / self.stride + 1).min(self.max_count)
    }

    fn validate(&self) -> Result<()> {
        if self.len == 0 {
            return Err(Error::InvalidInput("window length must be at least 1".to_string()));
        }
        if self.stride == 0 {
            return Err(Error::InvalidInput("window stride must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Cut `seq` into windows following `spec`.
///
/// Produces exactly `min(max_count, (n - len) / stride + 1)` windows when
/// `n >= len`, otherwise none.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the window length or stride is zero.
pub fn sliding_windows<T: Clone>(seq: &[T], spec: WindowSpec) -> Result<Vec<Vec<T>>> {
    spec.validate()?;

    let windows: Vec<Vec<T>> = (0..)
        .map(|k| k * spec.stride)
        .take_while(|&start| start + spec.len <= seq.len())
        .take(spec.max_count)
        .map(|start| seq[start..start + spec.len].to_vec())
        .collect();

    if windows.is_empty() && spec.max_count > 0 {
        tracing::warn!(
            seq_len = seq.len(),
            window_len = spec.len,
            "sequence too short for a single window"
        );
    }
    Ok(windows)
}
