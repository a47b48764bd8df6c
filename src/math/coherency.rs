//! Coherency-matrix estimation.
//!
//! The 6x6 coherency matrix is the normalized outer-product sum of the
//! windowed six-component samples: `C = D' D / N` for the `N x 6` window
//! data matrix `D`, divided by its trace so the result is invariant to
//! the overall amplitude of the recording.

use nalgebra::{Matrix6, Vector6};

use crate::error::Result;
use crate::signal::SixComponentSignal;

/// Estimate the coherency matrix of the analysis window centered on
/// `center_index` with `window_length` samples.
///
/// The result is symmetric positive-semidefinite with unit trace (zero
/// trace for an all-zero window, left for downstream regularization).
///
/// # Errors
///
/// Returns [`crate::MusicError::InvalidWindow`] if the window exceeds the
/// signal bounds.
pub fn estimate_coherency(
    signal: &SixComponentSignal,
    center_index: usize,
    window_length: usize,
) -> Result<Matrix6<f64>> {
    let window = signal.window(center_index, window_length)?;

    let mut c = Matrix6::zeros();
    for sample in window {
        let x = Vector6::from_column_slice(sample);
        c += x * x.transpose();
    }
    c /= window.len() as f64;

    let trace = c.trace();
    if trace > 0.0 {
        c /= trace;
    }
    Ok(c)
}
