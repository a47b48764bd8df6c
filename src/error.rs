//! Error types for six-component MUSIC analysis.
//!
//! This module provides the error hierarchy for all operations in the
//! library, from input validation through eigendecomposition to the
//! grid search itself.

use thiserror::Error;

/// Main error type for MUSIC analysis operations.
#[derive(Error, Debug)]
pub enum MusicError {
    /// The requested analysis window exceeds the signal bounds.
    #[error("Invalid window: samples {start}..{end} outside signal of length {signal_len}")]
    InvalidWindow {
        start: i64,
        end: i64,
        signal_len: usize,
    },

    /// The coherency matrix could not be decomposed into a stable
    /// eigenbasis, even after diagonal regularization.
    #[error("Degenerate coherency matrix: {0}")]
    DegenerateCoherency(String),

    /// The theoretical polarization vector has zero norm for the given
    /// parameter combination.
    #[error("Degenerate polarization model: {wave_type} with theta={theta}, phi={phi}, vp={vp}, vs={vs}")]
    DegenerateModel {
        wave_type: String,
        theta: f64,
        phi: f64,
        vp: f64,
        vs: f64,
    },

    /// The wave-type tag is not recognized by the polarization model.
    #[error("Unsupported wave type: {0:?} (expected one of P, SV, SH, Rayleigh, Love)")]
    UnsupportedWaveType(String),

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Channel lengths do not match.
    #[error("Length mismatch: {expected} samples expected, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Two signals with different sampling intervals cannot be combined.
    #[error("Sampling mismatch: {dt_a} s vs {dt_b} s")]
    SamplingMismatch { dt_a: f64, dt_b: f64 },
}

/// Result type alias for MUSIC analysis operations.
pub type Result<T> = std::result::Result<T, MusicError>;

impl MusicError {
    /// Create an invalid window error.
    #[must_use]
    pub const fn invalid_window(start: i64, end: i64, signal_len: usize) -> Self {
        Self::InvalidWindow {
            start,
            end,
            signal_len,
        }
    }

    /// Create a degenerate coherency error.
    #[must_use]
    pub fn degenerate_coherency(msg: impl Into<String>) -> Self {
        Self::DegenerateCoherency(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a length mismatch error.
    #[must_use]
    pub const fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_window_display() {
        let err = MusicError::invalid_window(-4, 28, 16);
        let msg = err.to_string();
        assert!(msg.contains("-4..28"));
        assert!(msg.contains("16"));
    }

    #[test]
    fn test_unsupported_wave_type_display() {
        let err = MusicError::UnsupportedWaveType("X".to_string());
        assert!(err.to_string().contains("Rayleigh"));
    }
}
