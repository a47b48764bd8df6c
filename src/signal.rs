//! Six-component signal container.
//!
//! A [`SixComponentSignal`] holds one station's co-located recording of
//! three translational and three rotational channels on a common time
//! base. Channel order is fixed as `[tx, ty, tz, rx, ry, rz]`.

use serde::{Deserialize, Serialize};

use crate::error::{MusicError, Result};

/// Number of channels in a six-component recording.
pub const NUM_CHANNELS: usize = 6;

/// A six-component ground-motion recording.
///
/// All channels share the same sampling interval and length; the container
/// stores one 6-vector per sample. The signal is treated as immutable by
/// the analysis engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SixComponentSignal {
    samples: Vec<[f64; NUM_CHANNELS]>,
    dt: f64,
}

impl SixComponentSignal {
    /// Create a signal from per-sample 6-vectors.
    ///
    /// # Errors
    ///
    /// Returns [`MusicError::InvalidConfig`] if `dt` is not positive.
    pub fn new(samples: Vec<[f64; NUM_CHANNELS]>, dt: f64) -> Result<Self> {
        if dt <= 0.0 || !dt.is_finite() {
            return Err(MusicError::invalid_config(
                "sampling interval must be positive and finite",
            ));
        }
        Ok(Self { samples, dt })
    }

    /// Create a signal from six equal-length channel slices, ordered
    /// `[tx, ty, tz, rx, ry, rz]`.
    ///
    /// # Errors
    ///
    /// Returns [`MusicError::LengthMismatch`] if the channels differ in
    /// length.
    pub fn from_channels(channels: &[&[f64]; NUM_CHANNELS], dt: f64) -> Result<Self> {
        let n = channels[0].len();
        for ch in channels.iter().skip(1) {
            if ch.len() != n {
                return Err(MusicError::length_mismatch(n, ch.len()));
            }
        }
        let samples = (0..n)
            .map(|i| {
                [
                    channels[0][i],
                    channels[1][i],
                    channels[2][i],
                    channels[3][i],
                    channels[4][i],
                    channels[5][i],
                ]
            })
            .collect();
        Self::new(samples, dt)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the signal holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sampling interval in seconds.
    #[must_use]
    pub const fn dt(&self) -> f64 {
        self.dt
    }

    /// All samples as 6-vectors.
    #[must_use]
    pub fn samples(&self) -> &[[f64; NUM_CHANNELS]] {
        &self.samples
    }

    /// Extract the analysis window centered on `center_index`.
    ///
    /// The window starts at `center_index - window_length / 2` and spans
    /// `window_length` samples.
    ///
    /// # Errors
    ///
    /// Returns [`MusicError::InvalidWindow`] if the window is empty or any
    /// part of it lies outside the signal.
    pub fn window(&self, center_index: usize, window_length: usize) -> Result<&[[f64; 6]]> {
        let start = center_index as i64 - (window_length / 2) as i64;
        let end = start + window_length as i64;
        if window_length == 0 || start < 0 || end > self.samples.len() as i64 {
            return Err(MusicError::invalid_window(start, end, self.samples.len()));
        }
        Ok(&self.samples[start as usize..end as usize])
    }

    /// Add another signal sample-by-sample, for building multi-wave test
    /// scenes.
    ///
    /// # Errors
    ///
    /// Returns [`MusicError::LengthMismatch`] or
    /// [`MusicError::SamplingMismatch`] if the two signals are not on the
    /// same time base.
    pub fn superpose(&mut self, other: &Self) -> Result<()> {
        if self.samples.len() != other.samples.len() {
            return Err(MusicError::length_mismatch(
                self.samples.len(),
                other.samples.len(),
            ));
        }
        if (self.dt - other.dt).abs() > f64::EPSILON * self.dt.abs() {
            return Err(MusicError::SamplingMismatch {
                dt_a: self.dt,
                dt_b: other.dt,
            });
        }
        for (a, b) in self.samples.iter_mut().zip(other.samples.iter()) {
            for c in 0..NUM_CHANNELS {
                a[c] += b[c];
            }
        }
        Ok(())
    }
}
